#![forbid(unsafe_code)]

//! Error kinds surfaced by state declaration and effect registration.

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    /// A state name or callback argument had the wrong shape.
    InvalidArgument(String),
    /// The state name is already declared (or already occupies the host's
    /// global binding point).
    NameCollision(String),
    /// An effect referenced a state that was never declared.
    UndefinedDependency(String),
    /// A by-name read or write referenced a state that was never declared.
    UnknownState(String),
}

impl HookError {
    /// The state name involved, if the error is tied to one.
    #[must_use]
    pub fn state_name(&self) -> Option<&str> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::NameCollision(name) | Self::UndefinedDependency(name) | Self::UnknownState(name) => {
                Some(name)
            }
        }
    }
}

impl std::fmt::Display for HookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::NameCollision(name) => {
                write!(f, "'{name}' is already defined, use another name")
            }
            Self::UndefinedDependency(name) => write!(f, "'{name}' is not a declared state"),
            Self::UnknownState(name) => write!(f, "no state named '{name}'"),
        }
    }
}

impl std::error::Error for HookError {}
