pub mod asset;
pub mod category;
pub mod deficit;
pub mod plan;
pub mod purchase;
pub mod snapshot;

pub use asset::Asset;
pub use category::{Category, CurrencyDomain, UnitPolicy};
pub use deficit::{AssetDeficit, Deficit};
pub use plan::{AllocationPlan, PlanNotice};
pub use purchase::PurchaseInstruction;
pub use snapshot::PortfolioSnapshot;
