//! # Output Configuration
//!
//! Decides whether the CLI decorates its output with colors and emoji.
//!
//! The decision honors, in order:
//! - `--color=always|never|auto`
//! - `NO_COLOR` (any value, see https://no-color.org/)
//! - `CLICOLOR=0`
//! - `CLICOLOR_FORCE=1`, which wins over a non-TTY stdout
//! - `TERM=dumb`
//! - the terminal's own capabilities, as reported by `console`

use std::env;
use std::fmt::Display;

use console::Style;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from the environment and the value of
    /// the `--color` flag.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Bold text, for headings.
    pub fn heading(&self, text: impl Display) -> String {
        self.paint(Style::new().bold(), text)
    }

    /// Dimmed text, for secondary details such as paths.
    pub fn dim(&self, text: impl Display) -> String {
        self.paint(Style::new().dim(), text)
    }

    /// Green text, for success messages.
    pub fn success(&self, text: impl Display) -> String {
        self.paint(Style::new().green(), text)
    }

    /// Yellow text, for warnings and dry-run notices.
    pub fn warning(&self, text: impl Display) -> String {
        self.paint(Style::new().yellow(), text)
    }

    fn paint(&self, style: Style, text: impl Display) -> String {
        if self.use_color {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain alternative
/// otherwise.
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
    use serial_test::serial;

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("NEVER");
        assert!(!config.use_color);
    }

    /// Run `f` with the color-related variables cleared except `vars`.
    fn with_env(vars: &[(&str, &str)], f: impl FnOnce()) {
        const KEYS: [&str; 4] = ["NO_COLOR", "CLICOLOR", "CLICOLOR_FORCE", "TERM"];
        let saved: Vec<_> = KEYS.iter().map(|k| (*k, env::var_os(k))).collect();
        for key in KEYS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }

        f();

        for (key, value) in saved {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_no_color_disables_auto() {
        with_env(&[("NO_COLOR", "1"), ("CLICOLOR_FORCE", "1")], || {
            assert!(!OutputConfig::from_env_and_flag("auto").use_color);
            assert!(OutputConfig::from_env_and_flag("always").use_color);
        });
    }

    #[test]
    #[serial]
    fn test_clicolor_force_enables_auto() {
        with_env(&[("CLICOLOR_FORCE", "1"), ("TERM", "dumb")], || {
            assert!(OutputConfig::from_env_and_flag("auto").use_color);
        });
    }

    #[test]
    #[serial]
    fn test_clicolor_zero_and_dumb_term_disable_auto() {
        with_env(&[("CLICOLOR", "0")], || {
            assert!(!OutputConfig::from_env_and_flag("auto").use_color);
        });
        with_env(&[("TERM", "dumb")], || {
            assert!(!OutputConfig::from_env_and_flag("auto").use_color);
        });
    }

    #[test]
    fn test_emoji_helper() {
        assert_eq!(emoji(&OutputConfig::with_color(), "✨", "[OK]"), "✨");
        assert_eq!(emoji(&OutputConfig::without_color(), "✨", "[OK]"), "[OK]");
    }

    #[test]
    fn test_styles_are_plain_without_color() {
        let config = OutputConfig::without_color();
        assert_eq!(config.heading("Skeletons"), "Skeletons");
        assert_eq!(config.dim("/tmp/x"), "/tmp/x");
        assert_eq!(config.success("done"), "done");
        assert_eq!(config.warning("dry run"), "dry run");
    }

    #[test]
    fn test_styles_add_escape_codes_with_color() {
        let config = OutputConfig::with_color();
        let styled = config.heading("Skeletons");
        assert!(styled.contains("Skeletons"));
        assert!(styled.contains('\u{1b}'));
    }
}
