//! Max-hold vector block NIF
//!
//! Host-managed max-hold blocks. Each block is created with a vector size,
//! lives in a global registry under an integer handle, and processes
//! native-endian `f32` binaries until the host destroys it.

pub mod block;
pub mod error;
pub mod slab;

use rustler::{Binary, Env, NifResult, OwnedBinary};
use tracing::debug;

use block::MaxHold;
use error::BlockError;
use slab::BlockSlab;

pub use block::DEFAULT_VECTOR_SIZE;

const REGISTRY_CAPACITY: usize = 1024;
const SAMPLE_BYTES: usize = std::mem::size_of::<f32>();

lazy_static::lazy_static! {
    static ref BLOCKS: BlockSlab<MaxHold> = BlockSlab::new(REGISTRY_CAPACITY);
}

mod atoms {
    rustler::atoms! {
        ok,
        error,
    }
}

rustler::init!("Elixir.SdrBlocks.MaxHold.Native");

fn term_error(e: BlockError) -> rustler::Error {
    rustler::Error::Term(Box::new(e.tag()))
}

/// Decode a native-endian f32 binary; `None` if the length is not whole samples.
fn decode_samples(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % SAMPLE_BYTES != 0 {
        return None;
    }
    let samples = bytes
        .chunks_exact(SAMPLE_BYTES)
        .map(|chunk| {
            let mut raw = [0u8; SAMPLE_BYTES];
            raw.copy_from_slice(chunk);
            f32::from_ne_bytes(raw)
        })
        .collect();
    Some(samples)
}

fn encode_samples(samples: &[f32], out: &mut [u8]) {
    for (dst, sample) in out.chunks_exact_mut(SAMPLE_BYTES).zip(samples) {
        dst.copy_from_slice(&sample.to_ne_bytes());
    }
}

/// Creates a max-hold block and returns its handle.
#[rustler::nif]
fn create_block(vector_size: usize) -> NifResult<(rustler::Atom, u64)> {
    let block = MaxHold::configure(vector_size).map_err(term_error)?;
    let id = BLOCKS.insert(block).map_err(term_error)?;
    Ok((atoms::ok(), id))
}

/// Runs max-hold over a buffer of whole vectors.
/// Input and output: f32 samples as binary (native endian, same length)
#[rustler::nif]
fn process_block<'a>(
    env: Env<'a>,
    block_id: u64,
    input: Binary,
) -> NifResult<(rustler::Atom, Binary<'a>)> {
    let samples = decode_samples(input.as_slice())
        .ok_or_else(|| rustler::Error::Term(Box::new("invalid_sample_size")))?;

    // Lock only this block while processing
    let output = BLOCKS
        .with_block(block_id, |block| block.process(&samples))
        .and_then(|r| r)
        .map_err(term_error)?;

    let mut owned = OwnedBinary::new(output.len() * SAMPLE_BYTES)
        .ok_or_else(|| rustler::Error::Term(Box::new("binary_alloc_failed")))?;
    encode_samples(&output, owned.as_mut_slice());

    Ok((atoms::ok(), owned.release(env)))
}

/// Changes the vector size of an existing block.
#[rustler::nif]
fn reconfigure_block(block_id: u64, vector_size: usize) -> NifResult<rustler::Atom> {
    BLOCKS
        .with_block_mut(block_id, |block| block.reconfigure(vector_size))
        .and_then(|r| r)
        .map_err(term_error)?;
    Ok(atoms::ok())
}

#[rustler::nif]
fn vector_size(block_id: u64) -> NifResult<(rustler::Atom, usize)> {
    let size = BLOCKS
        .with_block(block_id, |block| block.vector_size())
        .map_err(term_error)?;
    Ok((atoms::ok(), size))
}

/// Drop a block from `slab`; returns whether the handle was live.
fn release(slab: &BlockSlab<MaxHold>, block_id: u64) -> bool {
    match slab.remove(block_id) {
        Ok(_) => true,
        Err(e) => {
            debug!(block_id, error = %e, "destroy of unknown block ignored");
            false
        }
    }
}

/// Destroys a block and frees its registry slot. Unknown handles are ignored.
#[rustler::nif]
fn destroy_block(block_id: u64) -> NifResult<rustler::Atom> {
    release(&BLOCKS, block_id);
    Ok(atoms::ok())
}

/// Returns the number of live blocks.
#[rustler::nif]
fn block_count() -> NifResult<u64> {
    Ok(BLOCKS.count() as u64)
}
