//! Config command implementation.

use anyhow::{Context, Result};

use crate::cli::ConfigAction;
use crate::config::Config;
use crate::style;

pub fn cmd_config(action: ConfigAction, no_color: bool) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load();
            print!("{}", render_config(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path().display());
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load();
            config.set(key, &value)?;
            config.save()?;
            eprintln!(
                "{}",
                style::format_success(&format!("Updated {}", Config::path().display()), no_color)
            );
        }
    }
    Ok(())
}

/// Render config as TOML with the API key masked.
fn render_config(config: &Config) -> Result<String> {
    let mut shown = config.clone();
    shown.api_key = shown.api_key.as_deref().map(mask);
    toml::to_string_pretty(&shown).context("Failed to serialize config")
}

fn mask(key: &str) -> String {
    let visible: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("****{}", visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcdef123456"), "****3456");
        assert_eq!(mask("abc"), "****");
    }

    #[test]
    fn test_render_config_masks_key() {
        let config = Config {
            api_key: Some("0123456789abcdef".to_string()),
            ..Default::default()
        };
        let text = render_config(&config).unwrap();
        assert!(text.contains("api_key = \"****cdef\""));
        assert!(!text.contains("0123456789"));
        assert!(text.contains("timeout = 30"));
    }
}
