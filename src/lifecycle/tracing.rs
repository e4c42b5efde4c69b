//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the `tracing` subscriber used by the `storefront`
//! binary. Library code only emits events; it never installs a subscriber.
//!
//! The format is compact and hides the module prefix (`with_target(false)`).
//! Levels come from `RUST_LOG`:
//!
//! ```bash
//! # Transitions, confirmed orders, admin edits
//! RUST_LOG=info cargo run
//!
//! # Payloads sent to the backend, optimistic like counts, session checks
//! RUST_LOG=debug cargo run
//!
//! # Only the admin manager
//! RUST_LOG=storefront_orders::admin=debug cargo run
//! ```
//!
//! Async operations of the backends and of the three components run inside
//! `#[instrument]` spans, so a failing call shows the path that led to it:
//!
//! ```text
//! INFO confirm: Order confirmed order_id=order_000001 total=2000.0
//! WARN toggle{id=ProductId("product_000002")}: Like toggle failed, rolling back product_id=product_000002 error=Network error: ...
//! INFO update_order{id=OrderId("order_000001") ...}: Order updated order_id=order_000001 status=Expédiée payment_method=card
//! ```
//!
//! Payloads are logged once, at `debug`, with the `?` field syntax:
//!
//! ```rust,ignore
//! debug!(?order, "Submitting order");
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
