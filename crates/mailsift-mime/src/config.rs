//! Parser configuration types.

/// Default bound on multipart nesting.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Maximum multipart nesting depth before extraction gives up.
    pub max_depth: usize,
    /// Whether `text/html` parts may contribute text after tag stripping.
    pub html_fallback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            html_fallback: true,
        }
    }
}

impl Config {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for parser configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    max_depth: Option<usize>,
    html_fallback: Option<bool>,
}

impl ConfigBuilder {
    /// Sets the maximum multipart nesting depth.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Enables or disables the HTML fallback.
    #[must_use]
    pub const fn html_fallback(mut self, enabled: bool) -> Self {
        self.html_fallback = Some(enabled);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        let defaults = Config::default();
        Config {
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            html_fallback: self.html_fallback.unwrap_or(defaults.html_fallback),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_depth, 20);
        assert!(config.html_fallback);
    }

    #[test]
    fn test_config_builder() {
        let config = Config::builder().max_depth(3).html_fallback(false).build();
        assert_eq!(config.max_depth, 3);
        assert!(!config.html_fallback);
    }

    #[test]
    fn test_config_builder_keeps_defaults() {
        let config = Config::builder().max_depth(5).build();
        assert_eq!(config.max_depth, 5);
        assert!(config.html_fallback);
    }
}
