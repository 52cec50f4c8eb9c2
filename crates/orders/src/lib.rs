//! Orders domain module.
//!
//! This crate contains the order lifecycle and the reservation bookkeeping
//! that keeps orders and available stock consistent. It only *plans* stock
//! movements; applying them to inventory is the caller's job.

pub mod order;
pub mod status;

pub use order::{Order, OrderChanges, OrderPlan};
pub use status::OrderStatus;
