//! Order draft: the customer flow from a product click to a confirmed order.
//!
//! - [`state`]: the pure machine, `transition(state, event) -> (state, effects)`.
//! - [`OrderDraftController`]: runs the machine against the session and the backend.

pub mod controller;
pub mod state;

pub use controller::OrderDraftController;
pub use state::{transition, DraftEffect, DraftEvent, DraftPhase, DraftState, Modal, ModalVisibility};
