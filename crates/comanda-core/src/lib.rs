//! Core business logic for the comanda platform.
//!
//! This module contains the two computations the platform is built around:
//! the order lifecycle rules (forward-only status flow, cancellation, kanban
//! grouping) and the RFV customer segmentation engine, plus the dashboard
//! aggregation and the async state machine that applies lifecycle rules to
//! stored orders.

/// Event bus broadcasting order updates to live consumers.
pub mod event_bus;
/// Pure order lifecycle rules: status flow, transition legality, grouping.
pub mod lifecycle;
/// Dashboard aggregation over order snapshots.
pub mod reporting;
/// RFV customer segmentation engine.
pub mod segmentation;
/// Async order state machine applying lifecycle rules to stored orders.
pub mod state;

pub use event_bus::EventBus;
pub use state::{OrderStateError, OrderStateMachine};
