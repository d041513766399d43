//! Max-hold vector block
//!
//! The input stream is a sequence of fixed-size `f32` vectors. Each output
//! vector has the same length as its input vector, with every element set
//! to that vector's maximum:
//!
//! ```text
//! in:  [1, 5, 2, 3] [0, -1, 4, 4]
//! out: [5, 5, 5, 5] [4,  4, 4, 4]
//! ```
//!
//! A NaN anywhere in a vector makes the whole output vector NaN.

use tracing::{debug, trace};

use crate::error::{BlockError, Result};

/// Vector size used when none is configured
pub const DEFAULT_VECTOR_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxHold {
    vector_size: usize,
}

impl Default for MaxHold {
    fn default() -> Self {
        Self { vector_size: DEFAULT_VECTOR_SIZE }
    }
}

impl MaxHold {
    pub fn configure(vector_size: usize) -> Result<Self> {
        validate(vector_size)?;
        debug!(vector_size, "max-hold block configured");
        Ok(Self { vector_size })
    }

    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    /// Change the vector size; the old size stays in effect on error.
    pub fn reconfigure(&mut self, vector_size: usize) -> Result<()> {
        validate(vector_size)?;
        debug!(from = self.vector_size, to = vector_size, "max-hold block reconfigured");
        self.vector_size = vector_size;
        Ok(())
    }

    /// Process a flat buffer of whole vectors.
    pub fn process(&self, input: &[f32]) -> Result<Vec<f32>> {
        if input.len() % self.vector_size != 0 {
            return Err(BlockError::InvalidInput {
                len: input.len(),
                vector_size: self.vector_size,
            });
        }

        let mut output = vec![0.0f32; input.len()];
        for (vin, vout) in input
            .chunks_exact(self.vector_size)
            .zip(output.chunks_exact_mut(self.vector_size))
        {
            vout.fill(vector_max(vin));
        }
        trace!(vectors = input.len() / self.vector_size, "max-hold processed");
        Ok(output)
    }
}

fn validate(vector_size: usize) -> Result<()> {
    if vector_size == 0 {
        return Err(BlockError::Configuration(vector_size));
    }
    Ok(())
}

/// Maximum of a non-empty vector, NaN if any element is NaN
#[inline]
fn vector_max(v: &[f32]) -> f32 {
    let mut max = f32::NEG_INFINITY;
    for &x in v {
        if x.is_nan() {
            return f32::NAN;
        }
        if x > max {
            max = x;
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_vector() {
        let block = MaxHold::configure(4).unwrap();
        assert_eq!(block.process(&[1.0, 5.0, 2.0, 3.0]).unwrap(), vec![5.0; 4]);
    }

    #[test]
    fn test_multiple_vectors_are_independent() {
        let block = MaxHold::configure(4).unwrap();
        let out = block.process(&[1.0, 5.0, 2.0, 3.0, 0.0, -1.0, 4.0, 4.0]).unwrap();
        assert_eq!(out, vec![5.0, 5.0, 5.0, 5.0, 4.0, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_all_negative_and_infinite() {
        let block = MaxHold::configure(3).unwrap();
        let out = block.process(&[-3.0, -7.5, -0.25]).unwrap();
        assert_eq!(out, vec![-0.25; 3]);

        let out = block.process(&[f32::NEG_INFINITY; 3]).unwrap();
        assert_eq!(out, vec![f32::NEG_INFINITY; 3]);

        let out = block.process(&[1.0, f32::INFINITY, 2.0]).unwrap();
        assert_eq!(out, vec![f32::INFINITY; 3]);
    }

    #[test]
    fn test_nan_propagates_within_vector_only() {
        let block = MaxHold::configure(2).unwrap();
        let out = block.process(&[1.0, f32::NAN, 3.0, 2.0]).unwrap();
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_eq!(&out[2..], &[3.0, 3.0]);
    }

    #[test]
    fn test_vector_size_one_is_identity() {
        let block = MaxHold::configure(1).unwrap();
        let input = [0.5, -2.0, 9.0];
        assert_eq!(block.process(&input).unwrap(), input.to_vec());
    }

    #[test]
    fn test_empty_input() {
        let block = MaxHold::default();
        assert_eq!(block.vector_size(), 16);
        assert!(block.process(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_partial_vector_rejected() {
        let block = MaxHold::configure(4).unwrap();
        let err = block.process(&[1.0; 6]).unwrap_err();
        assert_eq!(err, BlockError::InvalidInput { len: 6, vector_size: 4 });
    }

    #[test]
    fn test_zero_vector_size_rejected() {
        assert_eq!(MaxHold::configure(0).unwrap_err(), BlockError::Configuration(0));

        let mut block = MaxHold::configure(8).unwrap();
        assert!(block.reconfigure(0).is_err());
        assert_eq!(block.vector_size(), 8);
        block.reconfigure(2).unwrap();
        assert_eq!(block.process(&[1.0, 2.0, 4.0, 3.0]).unwrap(), vec![2.0, 2.0, 4.0, 4.0]);
    }
}
