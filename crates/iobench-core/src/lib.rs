pub mod logging;

pub mod bench;
pub mod crc64;
pub mod error;
pub mod plan;
pub mod source;
pub mod strategy;

pub use error::BenchError;
