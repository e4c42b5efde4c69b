//! Pure state of the order draft.
//!
//! [`transition`] maps `(state, event)` to the next state plus the effects the
//! driver has to perform. It never touches the network or the session, so every
//! path through the machine is unit-testable.
//!
//! ```text
//! Idle -> ProductSelected -> LoginRequired
//!                         -> ConfirmingQuantity -> Submitting -> Succeeded
//!                                                             -> Failed -> Submitting (retry)
//! ```

use crate::model::{Order, OrderItem, Product};

/// The four dialogs the draft can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modal {
    Login,
    Confirm,
    Success,
    Error,
}

/// Visibility flags of the dialogs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalVisibility {
    pub login: bool,
    pub confirm: bool,
    pub success: bool,
    pub error: bool,
}

impl ModalVisibility {
    pub fn is_visible(&self, modal: Modal) -> bool {
        match modal {
            Modal::Login => self.login,
            Modal::Confirm => self.confirm,
            Modal::Success => self.success,
            Modal::Error => self.error,
        }
    }

    fn set(&mut self, modal: Modal, visible: bool) {
        match modal {
            Modal::Login => self.login = visible,
            Modal::Confirm => self.confirm = visible,
            Modal::Success => self.success = visible,
            Modal::Error => self.error = visible,
        }
    }

    /// Hides `hide` and shows `show`, leaving the others as they are.
    fn swap(&mut self, hide: Modal, show: Modal) {
        self.set(hide, false);
        self.set(show, true);
    }
}

/// Where the draft is in the flow. Each phase carries exactly the data valid in it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DraftPhase {
    #[default]
    Idle,
    ProductSelected {
        product: Product,
    },
    LoginRequired {
        product: Product,
    },
    ConfirmingQuantity {
        product: Product,
        quantity: u32,
    },
    Submitting {
        product: Product,
        quantity: u32,
    },
    Succeeded {
        order: Order,
        confirmation: String,
    },
    /// Product and quantity are kept so the customer can retry without reselecting.
    Failed {
        product: Product,
        quantity: u32,
        error: String,
    },
}

/// The draft: current phase plus dialog visibility.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftState {
    pub phase: DraftPhase,
    pub modals: ModalVisibility,
}

impl DraftState {
    pub fn selected_product(&self) -> Option<&Product> {
        match &self.phase {
            DraftPhase::ProductSelected { product }
            | DraftPhase::LoginRequired { product }
            | DraftPhase::ConfirmingQuantity { product, .. }
            | DraftPhase::Submitting { product, .. }
            | DraftPhase::Failed { product, .. } => Some(product),
            DraftPhase::Idle | DraftPhase::Succeeded { .. } => None,
        }
    }

    /// Selected quantity; 1 whenever no quantity has been chosen.
    pub fn quantity(&self) -> u32 {
        match &self.phase {
            DraftPhase::ConfirmingQuantity { quantity, .. }
            | DraftPhase::Submitting { quantity, .. }
            | DraftPhase::Failed { quantity, .. } => *quantity,
            _ => 1,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, DraftPhase::Submitting { .. })
    }

    /// Confirmation or error text to display, if any.
    pub fn message(&self) -> Option<&str> {
        match &self.phase {
            DraftPhase::Succeeded { confirmation, .. } => Some(confirmation),
            DraftPhase::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Inputs of the machine: user actions and completions of effects.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEvent {
    SelectProduct(Product),
    SessionChecked { authenticated: bool },
    SetQuantity(i64),
    Confirm,
    /// The session disappeared between confirmation and submission.
    SessionLost,
    SubmitSucceeded(Order),
    SubmitFailed(String),
    Dismiss(Modal),
}

/// Work the driver performs on behalf of the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEffect {
    /// Ask the session gate whether someone is logged in; answer with `SessionChecked`.
    CheckSession,
    /// Place an order for this single line; answer with `SubmitSucceeded`/`SubmitFailed`.
    SubmitOrder(OrderItem),
}

fn confirmation_message(order: &Order, product: &Product, quantity: u32) -> String {
    format!(
        "Order {} confirmed: {} x {} for {:.2}",
        order.id, quantity, product.name, order.total_amount
    )
}

/// Computes the next state. Events that are not valid in the current phase leave
/// the state unchanged and produce no effect.
pub fn transition(state: DraftState, event: DraftEvent) -> (DraftState, Vec<DraftEffect>) {
    let DraftState { phase, mut modals } = state;

    match (phase, event) {
        (_, DraftEvent::SelectProduct(product)) => (
            DraftState {
                phase: DraftPhase::ProductSelected { product },
                modals: ModalVisibility::default(),
            },
            vec![DraftEffect::CheckSession],
        ),

        (DraftPhase::ProductSelected { product }, DraftEvent::SessionChecked { authenticated }) => {
            let phase = if authenticated {
                modals.confirm = true;
                DraftPhase::ConfirmingQuantity { product, quantity: 1 }
            } else {
                modals.login = true;
                DraftPhase::LoginRequired { product }
            };
            (DraftState { phase, modals }, vec![])
        }

        (DraftPhase::ConfirmingQuantity { product, .. }, DraftEvent::SetQuantity(requested)) => {
            let quantity = product.clamp_quantity(requested);
            (
                DraftState {
                    phase: DraftPhase::ConfirmingQuantity { product, quantity },
                    modals,
                },
                vec![],
            )
        }

        (
            DraftPhase::ConfirmingQuantity { product, quantity } | DraftPhase::Failed { product, quantity, .. },
            DraftEvent::Confirm,
        ) => {
            modals.swap(Modal::Error, Modal::Confirm);
            let line = OrderItem::new(product.id.clone(), quantity, product.price);
            (
                DraftState {
                    phase: DraftPhase::Submitting { product, quantity },
                    modals,
                },
                vec![DraftEffect::SubmitOrder(line)],
            )
        }

        (DraftPhase::Submitting { product, .. }, DraftEvent::SessionLost) => {
            modals.swap(Modal::Confirm, Modal::Login);
            (
                DraftState {
                    phase: DraftPhase::LoginRequired { product },
                    modals,
                },
                vec![],
            )
        }

        (DraftPhase::Submitting { product, quantity }, DraftEvent::SubmitSucceeded(order)) => {
            modals.swap(Modal::Confirm, Modal::Success);
            let confirmation = confirmation_message(&order, &product, quantity);
            (
                DraftState {
                    phase: DraftPhase::Succeeded { order, confirmation },
                    modals,
                },
                vec![],
            )
        }

        (DraftPhase::Submitting { product, quantity }, DraftEvent::SubmitFailed(error)) => {
            modals.swap(Modal::Confirm, Modal::Error);
            (
                DraftState {
                    phase: DraftPhase::Failed { product, quantity, error },
                    modals,
                },
                vec![],
            )
        }

        (phase, DraftEvent::Dismiss(modal)) => {
            modals.set(modal, false);
            let phase = match modal {
                Modal::Login | Modal::Confirm => DraftPhase::Idle,
                Modal::Success | Modal::Error => phase,
            };
            (DraftState { phase, modals }, vec![])
        }

        (phase, _) => (DraftState { phase, modals }, vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerRef, OrderCreate, OrderId, UserId};

    fn chair() -> Product {
        Product::new("p1", "Chaise", 1000.0, 3)
    }

    fn run(state: DraftState, events: Vec<DraftEvent>) -> DraftState {
        events
            .into_iter()
            .fold(state, |state, event| transition(state, event).0)
    }

    fn confirming(quantity: i64) -> DraftState {
        run(
            DraftState::default(),
            vec![
                DraftEvent::SelectProduct(chair()),
                DraftEvent::SessionChecked { authenticated: true },
                DraftEvent::SetQuantity(quantity),
            ],
        )
    }

    fn placed(quantity: u32) -> Order {
        let params = OrderCreate {
            user_id: UserId::from("u1"),
            items: vec![OrderItem::new("p1", quantity, 1000.0)],
            payment_method: None,
            details: None,
        };
        Order::placed(OrderId::from("o1"), params, CustomerRef::Id("u1".into()))
    }

    #[test]
    fn select_asks_for_session() {
        let (state, effects) = transition(DraftState::default(), DraftEvent::SelectProduct(chair()));
        assert_eq!(state.phase, DraftPhase::ProductSelected { product: chair() });
        assert_eq!(state.quantity(), 1);
        assert_eq!(effects, vec![DraftEffect::CheckSession]);
    }

    #[test]
    fn unauthenticated_routes_to_login_without_submission() {
        let state = run(
            DraftState::default(),
            vec![
                DraftEvent::SelectProduct(chair()),
                DraftEvent::SessionChecked { authenticated: false },
            ],
        );
        assert!(matches!(state.phase, DraftPhase::LoginRequired { .. }));
        assert!(state.modals.login);
        assert!(!state.modals.confirm);

        let (state, effects) = transition(state, DraftEvent::Confirm);
        assert!(effects.is_empty());
        assert!(matches!(state.phase, DraftPhase::LoginRequired { .. }));
    }

    #[test]
    fn quantity_is_clamped_to_stock() {
        for (requested, expected) in [(2, 2), (0, 1), (-7, 1), (3, 3), (50, 3)] {
            assert_eq!(confirming(requested).quantity(), expected, "requested {requested}");
        }
    }

    #[test]
    fn set_quantity_ignored_outside_confirmation() {
        let state = run(
            DraftState::default(),
            vec![DraftEvent::SelectProduct(chair()), DraftEvent::SetQuantity(3)],
        );
        assert_eq!(state.quantity(), 1);
        assert!(matches!(state.phase, DraftPhase::ProductSelected { .. }));
    }

    #[test]
    fn confirm_submits_one_line_with_copied_price() {
        let (state, effects) = transition(confirming(2), DraftEvent::Confirm);
        assert!(state.is_submitting());
        assert_eq!(effects, vec![DraftEffect::SubmitOrder(OrderItem::new("p1", 2, 1000.0))]);
    }

    #[test]
    fn success_clears_selection_and_shows_success() {
        let (submitting, _) = transition(confirming(2), DraftEvent::Confirm);
        let (state, _) = transition(submitting, DraftEvent::SubmitSucceeded(placed(2)));

        assert!(!state.is_submitting());
        assert!(state.selected_product().is_none());
        assert_eq!(state.quantity(), 1);
        assert!(!state.modals.confirm);
        assert!(state.modals.success);
        assert_eq!(state.message(), Some("Order o1 confirmed: 2 x Chaise for 2000.00"));
    }

    #[test]
    fn failure_keeps_selection_and_allows_retry() {
        let (submitting, _) = transition(confirming(2), DraftEvent::Confirm);
        let (failed, _) = transition(submitting, DraftEvent::SubmitFailed("Stock insuffisant".into()));

        assert!(!failed.is_submitting());
        assert_eq!(failed.selected_product(), Some(&chair()));
        assert_eq!(failed.quantity(), 2);
        assert_eq!(failed.message(), Some("Stock insuffisant"));
        assert!(failed.modals.error);
        assert!(!failed.modals.confirm);

        let (retry, effects) = transition(failed, DraftEvent::Confirm);
        assert!(retry.is_submitting());
        assert!(!retry.modals.error);
        assert_eq!(effects, vec![DraftEffect::SubmitOrder(OrderItem::new("p1", 2, 1000.0))]);
    }

    #[test]
    fn dismissing_confirm_or_login_drops_the_draft() {
        let (state, _) = transition(confirming(2), DraftEvent::Dismiss(Modal::Confirm));
        assert_eq!(state.phase, DraftPhase::Idle);
        assert_eq!(state.modals, ModalVisibility::default());

        let login = run(
            DraftState::default(),
            vec![
                DraftEvent::SelectProduct(chair()),
                DraftEvent::SessionChecked { authenticated: false },
                DraftEvent::Dismiss(Modal::Login),
            ],
        );
        assert_eq!(login.phase, DraftPhase::Idle);
        assert!(!login.modals.login);
    }

    #[test]
    fn dismissing_error_only_hides_the_modal() {
        let (submitting, _) = transition(confirming(2), DraftEvent::Confirm);
        let (failed, _) = transition(submitting, DraftEvent::SubmitFailed("boom".into()));
        let (state, _) = transition(failed, DraftEvent::Dismiss(Modal::Error));
        assert!(!state.modals.error);
        assert!(matches!(state.phase, DraftPhase::Failed { quantity: 2, .. }));
    }

    #[test]
    fn late_result_after_dismiss_is_discarded() {
        let (submitting, _) = transition(confirming(2), DraftEvent::Confirm);
        let (idle, _) = transition(submitting, DraftEvent::Dismiss(Modal::Confirm));
        let (state, effects) = transition(idle, DraftEvent::SubmitSucceeded(placed(2)));
        assert_eq!(state.phase, DraftPhase::Idle);
        assert!(!state.modals.success);
        assert!(effects.is_empty());
    }

    #[test]
    fn lost_session_during_submission_requires_login() {
        let (submitting, _) = transition(confirming(1), DraftEvent::Confirm);
        let (state, _) = transition(submitting, DraftEvent::SessionLost);
        assert!(matches!(state.phase, DraftPhase::LoginRequired { .. }));
        assert!(state.modals.login);
        assert!(!state.modals.confirm);
    }
}
