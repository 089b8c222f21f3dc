//! CLI for the iobench file-read benchmark.

use anyhow::Result;
use clap::Parser;
use iobench_core::bench::{self, BenchConfig, StrategyResult};
use iobench_core::BenchError;
use std::path::PathBuf;

/// Top-level CLI: a single input file.
#[derive(Debug, Parser)]
#[command(name = "iobench")]
#[command(
    about = "Compare buffered and memory-mapped reads of one file by time and CRC-64",
    long_about = None
)]
pub struct Cli {
    /// File to read with every strategy. May start with `-`.
    #[arg(allow_hyphen_values = true)]
    pub path: PathBuf,
}

fn print_results(results: &[StrategyResult]) {
    for r in results {
        println!("{}", r.report_line());
    }
}

/// Setup failures are reported as is; failures inside a strategy are marked as
/// having cut the run short.
fn bench_failure(err: BenchError) -> anyhow::Error {
    if err.is_setup() {
        err.into()
    } else {
        anyhow::Error::new(err).context("benchmark aborted")
    }
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        let cfg = BenchConfig::default();
        tracing::debug!(
            path = %self.path.display(),
            block_size = cfg.block_size,
            "starting benchmark"
        );

        let results = bench::run_bench(&self.path, &cfg).map_err(bench_failure)?;
        print_results(&results);
        Ok(())
    }
}
