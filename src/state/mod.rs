//! State module for tracking pagination progress
//!
//! - `PaginationState`: where the pagination loop currently is
//! - `StopReason`: why a terminated loop stopped

mod pagination;

pub use pagination::{PaginationState, StopReason};
