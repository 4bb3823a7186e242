//! Error type shared by every fallible table operation.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// The bucket array, an entry slot, or a key copy could not be allocated.
    #[error("allocation failed")]
    AllocationFailure,
    /// Doubling the bucket count would overflow `usize`.
    #[error("bucket capacity overflow")]
    CapacityOverflow,
    /// A configuration value is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The key is already present; the existing entry is left untouched.
    #[error("duplicate key")]
    DuplicateKey,
}

impl From<std::collections::TryReserveError> for TableError {
    fn from(_: std::collections::TryReserveError) -> Self {
        TableError::AllocationFailure
    }
}

#[cfg(test)]
mod tests {
    use super::TableError;

    #[test]
    fn display_messages() {
        assert_eq!(TableError::DuplicateKey.to_string(), "duplicate key");
        assert_eq!(
            TableError::InvalidArgument("max_load_factor").to_string(),
            "invalid argument: max_load_factor"
        );
    }

    #[test]
    fn try_reserve_error_maps_to_allocation_failure() {
        let mut v: Vec<u8> = Vec::new();
        let err = v.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(TableError::from(err), TableError::AllocationFailure);
    }
}
