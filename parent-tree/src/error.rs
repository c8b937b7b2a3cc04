use std::fmt::Debug;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Not found: {}", .0)]
    NotFound(String),

    #[error("Already exists: {}", .0)]
    AlreadyExists(String),

    #[error("Cycle detected at {}", .0)]
    Cycle(String),

    #[error("Inconsistent link: {}", .0)]
    Inconsistent(String),

    #[error("Multiple strong references")]
    MultipleStrongRef,
}

impl Error {
    pub(crate) fn not_found(key: &impl Debug) -> Self {
        Self::NotFound(format!("{:?}", key))
    }

    pub(crate) fn already_exists(key: &impl Debug) -> Self {
        Self::AlreadyExists(format!("{:?}", key))
    }

    pub(crate) fn cycle(key: &impl Debug) -> Self {
        Self::Cycle(format!("{:?}", key))
    }

    /// true if the operation referenced a key that is not in the tree
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// true for errors that indicate a broken tree structure rather than bad input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::Cycle(_) | Self::Inconsistent(_))
    }
}
