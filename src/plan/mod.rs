pub mod blend;
pub mod boil;
pub mod error;
pub mod lot;


pub use blend::{plan_blend, BlendPlan, LotDraw};
pub use boil::{BoilModel, BoilSummary, CapacityNotice};
pub use error::PlanError;
pub use lot::Lot;
