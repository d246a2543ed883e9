//! Codec configuration.

/// Default upper bound on the number of elements in one list.
pub const DEFAULT_MAX_LIST_ELEMENTS: u32 = 16 * 1024 * 1024;

/// Configuration for reading and writing tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest list count the reader will accept before allocating.
    pub max_list_elements: u32,

    /// Whether the reader rejects string terminators other than `0`.
    pub strict_terminators: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_list_elements: DEFAULT_MAX_LIST_ELEMENTS,
            strict_terminators: false,
        }
    }
}

impl CodecConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the largest accepted list count.
    #[must_use]
    pub const fn max_list_elements(mut self, value: u32) -> Self {
        self.max_list_elements = value;
        self
    }

    /// Sets whether non-zero string terminators are rejected.
    #[must_use]
    pub const fn strict_terminators(mut self, value: bool) -> Self {
        self.strict_terminators = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CodecConfig::default();
        assert_eq!(config.max_list_elements, DEFAULT_MAX_LIST_ELEMENTS);
        assert!(!config.strict_terminators);
    }

    #[test]
    fn builder_pattern() {
        let config = CodecConfig::new()
            .max_list_elements(64)
            .strict_terminators(true);

        assert_eq!(config.max_list_elements, 64);
        assert!(config.strict_terminators);
    }
}
