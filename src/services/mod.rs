pub mod error;
pub mod estimator;
pub mod holders;
pub mod pipeline;
pub mod prices;
pub mod profit;
pub mod report;
