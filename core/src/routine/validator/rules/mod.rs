//! Validation Rules
//!
//! - `duplicate_point.rs` - two suspension points sharing a label
//! - `finish_placement.rs` - FINISH missing, repeated, nested, or followed by a yield
//! - `yield_in_select.rs` - suspension inside a multi-way branch
//! - `loop_control.rs` - break/continue with no enclosing loop
//! - `point_limit.rs` - more suspension points than a `PointId` can number

mod duplicate_point;
mod finish_placement;
mod loop_control;
mod point_limit;
mod yield_in_select;

pub use duplicate_point::DuplicatePointRule;
pub use finish_placement::FinishPlacementRule;
pub use loop_control::LoopControlRule;
pub use point_limit::PointLimitRule;
pub use yield_in_select::YieldInSelectRule;
