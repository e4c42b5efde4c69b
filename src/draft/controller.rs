use crate::backend::OrderBackend;
use crate::draft::state::{transition, DraftEffect, DraftEvent, DraftPhase, DraftState, Modal};
use crate::model::{OrderCreate, OrderItem, Product};
use crate::session::SessionGate;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Drives the order draft from product click to confirmed order.
///
/// Transitions run one at a time: every operation takes `&mut self`, so a second
/// action cannot start while `confirm` is awaiting the backend. The only network
/// call is the order creation in [`confirm`](Self::confirm); it is attempted once,
/// and a failure waits for the customer to confirm again.
pub struct OrderDraftController {
    state: DraftState,
    session: Arc<dyn SessionGate>,
    backend: Arc<dyn OrderBackend>,
}

impl OrderDraftController {
    pub fn new(session: Arc<dyn SessionGate>, backend: Arc<dyn OrderBackend>) -> Self {
        Self {
            state: DraftState::default(),
            session,
            backend,
        }
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    /// Starts a draft for `product`, then routes to the login or the confirmation
    /// dialog depending on the cached session.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn select_product(&mut self, product: Product) -> &DraftState {
        self.step(DraftEvent::SelectProduct(product));
        if matches!(self.state.phase, DraftPhase::LoginRequired { .. }) {
            info!("Login required before ordering");
        }
        &self.state
    }

    /// Sets the quantity, clamped to `[1, stock]`. Ignored outside the confirmation dialog.
    pub fn set_quantity(&mut self, quantity: i64) -> &DraftState {
        self.step(DraftEvent::SetQuantity(quantity));
        &self.state
    }

    /// Hides `modal`; closing the login or confirmation dialog abandons the draft.
    pub fn dismiss(&mut self, modal: Modal) -> &DraftState {
        self.step(DraftEvent::Dismiss(modal));
        &self.state
    }

    /// Abandons the draft, e.g. when the customer navigates away.
    pub fn reset(&mut self) {
        debug!("Draft reset");
        self.state = DraftState::default();
    }

    /// Submits the draft. Valid while confirming a quantity, or after a failure to retry.
    #[instrument(skip(self))]
    pub async fn confirm(&mut self) -> &DraftState {
        let Some(line) = self.step(DraftEvent::Confirm) else {
            debug!(phase = ?self.state.phase, "Confirm ignored");
            return &self.state;
        };

        let Some(user) = self.session.current_user() else {
            warn!("Session lost before submission");
            self.step(DraftEvent::SessionLost);
            return &self.state;
        };

        let order = OrderCreate {
            user_id: user.id,
            items: vec![line],
            payment_method: None,
            details: None,
        };
        debug!(?order, "Submitting order");

        let event = match self.backend.create_order(order).await {
            Ok(order) => {
                info!(order_id = %order.id, total = order.total_amount, "Order confirmed");
                DraftEvent::SubmitSucceeded(order)
            }
            Err(e) => {
                warn!(error = %e, "Order submission failed");
                DraftEvent::SubmitFailed(e.to_string())
            }
        };
        self.step(event);
        &self.state
    }

    /// Applies `event` and performs the synchronous effects it triggers. Returns the
    /// order line to submit when the machine asks for a submission.
    fn step(&mut self, event: DraftEvent) -> Option<OrderItem> {
        let mut pending = vec![event];
        let mut submission = None;

        while let Some(event) = pending.pop() {
            let state = std::mem::take(&mut self.state);
            let (next, effects) = transition(state, event);
            self.state = next;

            for effect in effects {
                match effect {
                    DraftEffect::CheckSession => {
                        let authenticated = self.session.is_authenticated();
                        debug!(authenticated, "Session checked");
                        pending.push(DraftEvent::SessionChecked { authenticated });
                    }
                    DraftEffect::SubmitOrder(line) => submission = Some(line),
                }
            }
        }
        submission
    }
}
