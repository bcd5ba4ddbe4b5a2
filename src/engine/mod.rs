//! The allocation engine.
//!
//! Everything in here is synchronous and free of I/O: a run takes a
//! [`PortfolioSnapshot`](crate::models::PortfolioSnapshot), a contribution
//! and an exchange rate, and returns an
//! [`AllocationPlan`](crate::models::AllocationPlan).

pub mod allocator;
pub mod currency;
pub mod deficit;
pub mod error;
pub mod normalize;
pub mod rebalancer;

pub use allocator::{AllocationOutcome, PurchaseAllocator};
pub use currency::CurrencyConverter;
pub use deficit::{category_deficits, scan_asset_deficits};
pub use error::EngineError;
pub use normalize::{Allocation, normalize_contribution};
pub use rebalancer::{DEFAULT_MIN_FOREIGN_TICKET, EngineConfig, Rebalancer};
