//! Query builder for weather records.
//!
//! [`RecordQuery`] follows the builder pattern: every filter is optional and
//! methods can be chained in any order.
//!
//! # Example
//!
//! ```
//! use skylog_store::{RecordQuery, Store};
//!
//! let store = Store::open_in_memory()?;
//!
//! // Everything, newest first
//! let all = store.list_records(&RecordQuery::new())?;
//!
//! // Second page of matches for "paris"
//! let query = RecordQuery::new().search("paris").limit(20).offset(20);
//! let page = store.list_records(&query)?;
//! # Ok::<(), skylog_store::Error>(())
//! ```

/// Columns selected for every record query, in row-decoding order.
pub(crate) const RECORD_COLUMNS: &str = "id, location, location_type, temperature, condition, \
     description, humidity, wind_speed, pressure, icon, forecast_data, date_range_start, \
     date_range_end, timestamp, saved_at, created_at";

/// Fluent query builder for stored records.
///
/// Use this with [`Store::list_records`](crate::Store::list_records).
/// By default, results are ordered by `created_at` descending (most recent
/// first), with `id` breaking ties between records created in the same
/// instant.
#[derive(Debug, Default, Clone)]
pub struct RecordQuery {
    /// Case-insensitive substring to look for.
    pub term: Option<String>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
    /// Order by created_at descending (newest first).
    pub newest_first: bool,
}

impl RecordQuery {
    /// Create a new query with default settings.
    ///
    /// Default behavior:
    /// - No search term (all records)
    /// - No limit
    /// - Ordered by newest first
    pub fn new() -> Self {
        Self {
            newest_first: true,
            ..Default::default()
        }
    }

    /// Only include records whose location, description, or date range
    /// start/end contains `term`, ignoring case.
    ///
    /// A blank term matches every record.
    pub fn search(mut self, term: &str) -> Self {
        self.term = Some(term.to_string());
        self
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first N results.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Order results by oldest first.
    pub fn oldest_first(mut self) -> Self {
        self.newest_first = false;
        self
    }

    /// The effective search needle, lowercased, or `None` when blank.
    pub(crate) fn needle(&self) -> Option<String> {
        self.term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        let Some(needle) = self.needle() else {
            return (String::new(), params);
        };

        let conditions: Vec<String> = ["location", "description", "date_range_start", "date_range_end"]
            .iter()
            .map(|column| {
                params.push(Box::new(needle.clone()));
                format!("instr(fold_case({column}), ?) > 0")
            })
            .collect();

        (format!("WHERE {}", conditions.join(" OR ")), params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();
        let order = if self.newest_first { "DESC" } else { "ASC" };

        let mut sql = format!(
            "SELECT {RECORD_COLUMNS} FROM weather_records {where_clause} \
             ORDER BY created_at {order}, id {order}"
        );

        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }

        sql
    }
}
