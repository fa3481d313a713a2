pub mod aggregator;
pub mod exposition;
pub mod queries;
pub mod refresh;
pub mod snapshot;
pub mod upstream;
mod utils;

#[cfg(test)]
mod test_upstream;
