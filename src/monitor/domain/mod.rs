pub mod aggregator;
pub mod extractor;
pub mod model;
pub mod projector;
pub mod statistics;
pub mod units;
