//! Construction-time settings for `ChainedTable`.

use crate::error::TableError;

pub const DEFAULT_INITIAL_CAPACITY: usize = 16;
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    /// Bucket count at init. Zero is treated as one.
    pub initial_capacity: usize,
    /// Growth triggers when `len / capacity` exceeds this before an insert.
    pub max_load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_max_load_factor(mut self, lf: f64) -> Self {
        self.max_load_factor = lf;
        self
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0.0 {
            return Err(TableError::InvalidArgument(
                "max_load_factor must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Effective bucket count at init.
    pub(crate) fn bucket_count(&self) -> usize {
        self.initial_capacity.max(1)
    }
}
