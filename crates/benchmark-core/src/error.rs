use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BenchmarkError {
    #[error("No benchmark data supplied for comparison")]
    MissingBenchmark,

    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),
}
