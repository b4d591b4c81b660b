#![forbid(unsafe_code)]

//! Registry configuration.

/// Attribute that tags an element as bound to a state, unless overridden.
pub const DEFAULT_MARKER_ATTRIBUTE: &str = "client-hook";

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HooksConfig {
    /// Marker attribute whose value names the state an element is bound to.
    pub attribute: String,
    /// Sync bound elements once at declaration when the initial value is
    /// non-null.
    pub sync_on_declare: bool,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            attribute: DEFAULT_MARKER_ATTRIBUTE.to_owned(),
            sync_on_declare: true,
        }
    }
}

impl HooksConfig {
    /// Use a different marker attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }

    /// Enable or disable the declaration-time sync.
    #[must_use]
    pub fn with_sync_on_declare(mut self, enabled: bool) -> Self {
        self.sync_on_declare = enabled;
        self
    }
}
