pub mod import;
pub mod planner;
pub mod ports;
pub mod report;
pub mod utils;

pub use planner::{PlanOutcome, Planner};
pub use ports::{AllocationSink, HoldingsLedger, PortfolioSource};
