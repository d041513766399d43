//! Max-hold block errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// Vector size of zero
    #[error("configuration error: vector size must be at least 1, got {0}")]
    Configuration(usize),

    /// Sample buffer is not a whole number of vectors
    #[error("invalid input: {len} samples is not a multiple of vector size {vector_size}")]
    InvalidInput { len: usize, vector_size: usize },

    #[error("block registry full ({capacity} blocks)")]
    RegistryFull { capacity: usize },

    #[error("block {0} not found")]
    NotFound(u64),
}

impl BlockError {
    /// Short atom-style tag for the host side
    pub fn tag(&self) -> &'static str {
        match self {
            BlockError::Configuration(_) => "invalid_vector_size",
            BlockError::InvalidInput { .. } => "invalid_sample_count",
            BlockError::RegistryFull { .. } => "slab_full",
            BlockError::NotFound(_) => "block_not_found",
        }
    }
}

pub type Result<T> = std::result::Result<T, BlockError>;
