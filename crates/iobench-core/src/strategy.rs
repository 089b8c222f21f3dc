//! The four read strategies.
//!
//! Each strategy is a single straight pass over a [`ByteSource`] that feeds the
//! bytes it obtains to the CRC-64 engine. Buffers and mappings are acquired and
//! released inside the strategy call.

use std::fmt;

use crate::crc64;
use crate::error::{BenchError, Result};
use crate::plan;
use crate::source::ByteSource;

/// What a strategy produced: the checksum and how many bytes were fed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyOutcome {
    pub checksum: u64,
    pub bytes: u64,
}

impl StrategyOutcome {
    fn new() -> Self {
        Self {
            checksum: crc64::INITIAL,
            bytes: 0,
        }
    }

    fn feed(&mut self, data: &[u8]) {
        self.checksum = crc64::update(self.checksum, data);
        self.bytes += data.len() as u64;
    }
}

/// Read strategy, in the order the benchmark runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    SequentialRead,
    SequentialMapped,
    RandomRead,
    RandomMapped,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SequentialRead,
        Strategy::SequentialMapped,
        Strategy::RandomRead,
        Strategy::RandomMapped,
    ];

    /// Label printed in the report.
    pub fn label(self) -> &'static str {
        match self {
            Strategy::SequentialRead => "1. read() sequential",
            Strategy::SequentialMapped => "2. mmap() sequential",
            Strategy::RandomRead => "3. read() random",
            Strategy::RandomMapped => "4. mmap() random",
        }
    }

    /// True for the two memory-mapped strategies.
    pub fn is_mapped(self) -> bool {
        matches!(self, Strategy::SequentialMapped | Strategy::RandomMapped)
    }

    pub fn run<S: ByteSource>(self, src: &mut S, block_size: usize) -> Result<StrategyOutcome> {
        match self {
            Strategy::SequentialRead => sequential_read(src, block_size),
            Strategy::SequentialMapped => sequential_mapped(src),
            Strategy::RandomRead => randomized_read(src, block_size),
            Strategy::RandomMapped => randomized_mapped(src, block_size),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Allocate a zeroed scratch buffer of `size` bytes, reporting allocation failure.
pub fn alloc_block_buffer(size: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|source| BenchError::BufferAlloc { size, source })?;
    buf.resize(size, 0);
    Ok(buf)
}

/// Read the file front to back in `block_size` chunks.
///
/// A read error ends the traversal like end of file does; the checksum covers the
/// bytes read before it. Only a failed rewind aborts the strategy.
pub fn sequential_read<S: ByteSource>(src: &mut S, block_size: usize) -> Result<StrategyOutcome> {
    let mut buf = alloc_block_buffer(block_size)?;
    let mut out = StrategyOutcome::new();
    src.rewind()
        .map_err(|source| BenchError::Read { offset: 0, source })?;
    loop {
        let n = match src.read_sequential(&mut buf) {
            Ok(n) => n,
            Err(err) => {
                tracing::warn!(
                    offset = out.bytes,
                    error = %err,
                    "sequential read failed, treating as end of file"
                );
                break;
            }
        };
        if n == 0 {
            break;
        }
        out.feed(&buf[..n]);
    }
    Ok(out)
}

/// Map the whole file and feed it in a single update.
pub fn sequential_mapped<S: ByteSource>(src: &S) -> Result<StrategyOutcome> {
    let view = src.map_whole()?;
    let mut out = StrategyOutcome::new();
    out.feed(&view);
    Ok(out)
}

/// Seek to each planned block and read a full block from there.
///
/// A read that fails or returns no bytes skips the block and the traversal goes
/// on; in the sequential strategy the same condition ends the traversal.
pub fn randomized_read<S: ByteSource>(src: &mut S, block_size: usize) -> Result<StrategyOutcome> {
    let mut buf = alloc_block_buffer(block_size)?;
    let mut out = StrategyOutcome::new();
    for block in plan::plan_blocks(src.len(), block_size) {
        match src.read_at(block.offset, &mut buf) {
            Ok(0) => {
                tracing::debug!(
                    index = block.index,
                    offset = block.offset,
                    "empty read, block skipped"
                );
            }
            Ok(n) => out.feed(&buf[..n]),
            Err(err) => {
                tracing::debug!(
                    index = block.index,
                    offset = block.offset,
                    error = %err,
                    "read failed, block skipped"
                );
            }
        }
    }
    Ok(out)
}

/// Walk the same block plan as [`randomized_read`] over a whole-file view.
pub fn randomized_mapped<S: ByteSource>(src: &S, block_size: usize) -> Result<StrategyOutcome> {
    let view = src.map_whole()?;
    let mut out = StrategyOutcome::new();
    for block in plan::plan_blocks(view.len() as u64, block_size) {
        let start = block.offset as usize;
        out.feed(&view[start..start + block.len]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// In-memory source with an optional failing offset.
    struct MemSource {
        data: Vec<u8>,
        cursor: usize,
        fail_at: Option<u64>,
    }

    impl MemSource {
        fn new(data: Vec<u8>) -> Self {
            Self {
                data,
                cursor: 0,
                fail_at: None,
            }
        }

        fn failing_at(data: Vec<u8>, offset: u64) -> Self {
            Self {
                fail_at: Some(offset),
                ..Self::new(data)
            }
        }
    }

    impl ByteSource for MemSource {
        type View = Vec<u8>;

        fn len(&self) -> u64 {
            self.data.len() as u64
        }

        fn rewind(&mut self) -> io::Result<()> {
            self.cursor = 0;
            Ok(())
        }

        fn read_sequential(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if let Some(fail) = self.fail_at {
                if self.cursor as u64 >= fail {
                    return Err(io::Error::new(io::ErrorKind::Other, "injected"));
                }
            }
            let n = buf.len().min(self.data.len() - self.cursor);
            buf[..n].copy_from_slice(&self.data[self.cursor..self.cursor + n]);
            self.cursor += n;
            Ok(n)
        }

        fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
            if self.fail_at == Some(offset) {
                return Err(io::Error::new(io::ErrorKind::Other, "injected"));
            }
            let start = (offset as usize).min(self.data.len());
            let n = buf.len().min(self.data.len() - start);
            buf[..n].copy_from_slice(&self.data[start..start + n]);
            Ok(n)
        }

        fn map_whole(&self) -> Result<Vec<u8>> {
            Ok(self.data.clone())
        }
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn labels_in_run_order() {
        let labels: Vec<&str> = Strategy::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec![
                "1. read() sequential",
                "2. mmap() sequential",
                "3. read() random",
                "4. mmap() random"
            ]
        );
        assert!(Strategy::SequentialMapped.is_mapped());
        assert!(!Strategy::RandomRead.is_mapped());
    }

    #[test]
    fn sequential_pair_matches_whole_stream() {
        let data = pattern(1000);
        let expected = crc64::update(crc64::INITIAL, &data);
        let mut src = MemSource::new(data);
        let read = sequential_read(&mut src, 64).unwrap();
        let mapped = sequential_mapped(&src).unwrap();
        assert_eq!(read.checksum, expected);
        assert_eq!(mapped.checksum, expected);
        assert_eq!(read.bytes, 1000);
        assert_eq!(mapped.bytes, 1000);
    }

    #[test]
    fn sequential_read_rewinds_first() {
        let data = pattern(100);
        let mut src = MemSource::new(data);
        let first = sequential_read(&mut src, 16).unwrap();
        let second = sequential_read(&mut src, 16).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn randomized_pair_matches_and_follows_plan() {
        let data = pattern(10);
        // blocks for 10 bytes / 4: [0,4) [2,6) [8,10)
        let mut expected = crc64::update(crc64::INITIAL, &data[0..4]);
        expected = crc64::update(expected, &data[2..6]);
        expected = crc64::update(expected, &data[8..10]);

        let mut src = MemSource::new(data);
        let read = randomized_read(&mut src, 4).unwrap();
        let mapped = randomized_mapped(&src, 4).unwrap();
        assert_eq!(read.checksum, expected);
        assert_eq!(mapped.checksum, expected);
        assert_eq!(read.bytes, 10);
    }

    #[test]
    fn randomized_differs_from_sequential() {
        let data = pattern(1000);
        let mut src = MemSource::new(data);
        let seq = sequential_read(&mut src, 64).unwrap();
        let rand = randomized_read(&mut src, 64).unwrap();
        assert_ne!(seq.checksum, rand.checksum);
    }

    #[test]
    fn empty_source_yields_initial_everywhere() {
        let mut src = MemSource::new(Vec::new());
        for strategy in Strategy::ALL {
            let out = strategy.run(&mut src, 8).unwrap();
            assert_eq!(out.checksum, crc64::INITIAL, "{}", strategy);
            assert_eq!(out.bytes, 0);
        }
    }

    #[test]
    fn sequential_read_error_ends_traversal() {
        let data = pattern(100);
        let expected = crc64::update(crc64::INITIAL, &data[..32]);
        let mut src = MemSource::failing_at(data, 32);
        let out = sequential_read(&mut src, 16).unwrap();
        assert_eq!(out.checksum, expected);
        assert_eq!(out.bytes, 32);
    }

    #[test]
    fn randomized_read_error_skips_block() {
        // 10 bytes / 4: block 1 at offset 2 fails and is skipped
        let data = pattern(10);
        let mut expected = crc64::update(crc64::INITIAL, &data[0..4]);
        expected = crc64::update(expected, &data[8..10]);

        let mut src = MemSource::failing_at(data, 2);
        let out = randomized_read(&mut src, 4).unwrap();
        assert_eq!(out.checksum, expected);
        assert_eq!(out.bytes, 6);
    }

    #[test]
    fn alloc_block_buffer_is_zeroed() {
        let buf = alloc_block_buffer(4096).unwrap();
        assert_eq!(buf.len(), 4096);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn alloc_block_buffer_reports_failure() {
        let err = alloc_block_buffer(usize::MAX).unwrap_err();
        assert!(matches!(err, BenchError::BufferAlloc { .. }));
    }
}
