//! Benchmark driver: run every strategy over one file and report time + checksum.
//!
//! Strategies run in a fixed order on the current thread. Each one is timed with a
//! monotonic clock around its full execution, including buffer allocation and
//! mapping. The first failing strategy ends the run.

use std::path::Path;
use std::time::Instant;

use crate::error::Result;
use crate::plan::BLOCK_SIZE;
use crate::source::{BenchFile, ByteSource};
use crate::strategy::Strategy;

/// Benchmark parameters. The CLI always runs with the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    /// Scratch buffer size and randomized block size in bytes.
    pub block_size: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE,
        }
    }
}

impl BenchConfig {
    /// Config with a custom block size. Returns None for 0.
    pub fn new(block_size: usize) -> Option<Self> {
        (block_size > 0).then_some(Self { block_size })
    }
}

/// Result of one strategy run.
#[derive(Debug, Clone)]
pub struct StrategyResult {
    pub strategy: Strategy,
    pub elapsed_secs: f64,
    pub checksum: u64,
    pub bytes: u64,
    pub throughput_mib_s: f64,
}

impl StrategyResult {
    /// Report line: label, seconds with six decimals, checksum as 16 hex digits.
    pub fn report_line(&self) -> String {
        format!(
            "{}: {:.6} s, CRC64 = {:016x}",
            self.strategy.label(),
            self.elapsed_secs,
            self.checksum
        )
    }
}

/// Whether the two cross-check pairs agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossCheck {
    /// Sequential read vs sequential mmap.
    pub sequential: Option<bool>,
    /// Random read vs random mmap.
    pub randomized: Option<bool>,
}

/// Compares the sequential pair and the randomized pair. A pair missing from
/// `results` is reported as None.
pub fn cross_check(results: &[StrategyResult]) -> CrossCheck {
    let checksum = |s: Strategy| {
        results
            .iter()
            .find(|r| r.strategy == s)
            .map(|r| r.checksum)
    };
    let pair = |a: Strategy, b: Strategy| match (checksum(a), checksum(b)) {
        (Some(x), Some(y)) => Some(x == y),
        _ => None,
    };
    CrossCheck {
        sequential: pair(Strategy::SequentialRead, Strategy::SequentialMapped),
        randomized: pair(Strategy::RandomRead, Strategy::RandomMapped),
    }
}

/// Open `path` and run all four strategies over it.
pub fn run_bench(path: &Path, cfg: &BenchConfig) -> Result<Vec<StrategyResult>> {
    let mut file = BenchFile::open(path)?;
    run_strategies(&mut file, cfg)
}

/// Run all four strategies in order over an already opened source.
pub fn run_strategies<S: ByteSource>(
    src: &mut S,
    cfg: &BenchConfig,
) -> Result<Vec<StrategyResult>> {
    let mut results = Vec::with_capacity(Strategy::ALL.len());

    for strategy in Strategy::ALL {
        let start = Instant::now();
        let outcome = strategy.run(src, cfg.block_size)?;
        let elapsed_secs = start.elapsed().as_secs_f64();

        let throughput_mib_s = if elapsed_secs > 0.0 && outcome.bytes > 0 {
            (outcome.bytes as f64 / 1_048_576.0) / elapsed_secs
        } else {
            0.0
        };
        tracing::debug!(
            strategy = strategy.label(),
            bytes = outcome.bytes,
            elapsed_secs,
            throughput_mib_s,
            "strategy finished"
        );

        results.push(StrategyResult {
            strategy,
            elapsed_secs,
            checksum: outcome.checksum,
            bytes: outcome.bytes,
            throughput_mib_s,
        });
    }

    let check = cross_check(&results);
    if check.sequential == Some(false) {
        tracing::warn!("sequential read and sequential mmap checksums differ");
    }
    if check.randomized == Some(false) {
        tracing::warn!("random read and random mmap checksums differ");
    }

    Ok(results)
}
