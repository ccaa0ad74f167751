//! # Output Configuration
//!
//! Color and emoji handling for the CLI. The `--color=never|always|auto`
//! flag decides first; in `auto` mode the usual environment conventions
//! apply, strongest first:
//!
//! - `NO_COLOR` set (even empty) disables colors (https://no-color.org/)
//! - `CLICOLOR_FORCE` non-empty and not `0` forces colors, TTY or not
//! - `CLICOLOR=0` or `TERM=dumb` disables colors
//! - otherwise the terminal's own capabilities decide

use std::env;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `--color=always` forces colors on (overrides `NO_COLOR`),
    /// `--color=never` forces them off, and `auto` detects from the
    /// environment and the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        match Self::env_override() {
            Some(forced) => forced,
            None => console::Term::stdout().features().colors_supported(),
        }
    }

    /// Explicit user preference from the environment, strongest first;
    /// `None` leaves the decision to terminal detection.
    fn env_override() -> Option<bool> {
        // The presence of NO_COLOR (even empty) wins over everything else.
        if env::var_os("NO_COLOR").is_some() {
            return Some(false);
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| !v.is_empty() && v != "0") {
            return Some(true);
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return Some(false);
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return Some(false);
        }
        None
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain alternative
/// otherwise.
///
/// ```rust,ignore
/// let config = OutputConfig::from_env_and_flag("auto");
/// println!("{} Validating document...", emoji(&config, "🔍", "[SCAN]"));
/// ```
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("never");
        assert!(!config.use_color);
    }

    #[test]
    fn test_emoji_helper_with_color() {
        let config = OutputConfig::with_color();
        assert_eq!(emoji(&config, "🔍", "[SCAN]"), "🔍");
    }

    #[test]
    fn test_emoji_helper_without_color() {
        let config = OutputConfig::without_color();
        assert_eq!(emoji(&config, "🔍", "[SCAN]"), "[SCAN]");
    }
}
