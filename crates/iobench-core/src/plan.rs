//! Block planning for the randomized traversal.
//!
//! Blocks alternate between the low and high end of the file, converging toward
//! the middle: block `i` starts at `i * block_size` when `i` is even and at
//! `size - (i + 1) * block_size` (clamped to 0) when `i` is odd.

/// Block size used by the benchmark: 8 MiB.
pub const BLOCK_SIZE: usize = 8 * 1024 * 1024;

/// One block of the randomized traversal: byte range [offset, offset + len).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Position in the traversal (0-based).
    pub index: u64,
    pub offset: u64,
    pub len: usize,
}

impl Block {
    /// End offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.len as u64
    }
}

/// Number of blocks covering `size` bytes: ceil(size / block_size).
pub fn block_count(size: u64, block_size: usize) -> u64 {
    if block_size == 0 {
        return 0;
    }
    size.div_ceil(block_size as u64)
}

/// Start offset of block `index`, before the `offset >= size` check.
pub fn block_offset(index: u64, size: u64, block_size: usize) -> u64 {
    let block_size = block_size as u64;
    if index % 2 == 0 {
        index.saturating_mul(block_size)
    } else {
        size.saturating_sub((index + 1).saturating_mul(block_size))
    }
}

/// Builds the randomized block plan for a file of `size` bytes.
///
/// Blocks whose offset falls at or past the end of the file are skipped; the
/// last block at the tail is shortened to the remaining bytes. Returns an empty
/// vec if `size` or `block_size` is 0.
pub fn plan_blocks(size: u64, block_size: usize) -> Vec<Block> {
    (0..block_count(size, block_size))
        .filter_map(|index| {
            let offset = block_offset(index, size, block_size);
            if offset >= size {
                return None;
            }
            let len = (size - offset).min(block_size as u64) as usize;
            Some(Block { index, offset, len })
        })
        .collect()
}
