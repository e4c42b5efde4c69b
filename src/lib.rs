#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Storefront Orders
//!
//! > **Order lifecycle core of a furniture storefront.**
//!
//! This crate holds the parts of the storefront with real state-transition logic:
//! the customer flow that turns a product click into a confirmed order, the
//! optimistic like toggle next to it, and the back-office manager that lists,
//! filters, edits and deletes orders. Rendering, forms and navigation live elsewhere.
//!
//! ## 🏗️ Design
//!
//! ### Pure machine, thin driver
//! The order draft is a tagged-union state and a pure `transition(state, event)`
//! returning the effects to run. [`OrderDraftController`](draft::OrderDraftController)
//! executes them against the session and the backend. Every transition is unit
//! testable without a backend.
//!
//! ### Injected collaborators
//! Nothing reaches for ambient state. The session is a [`SessionGate`](session::SessionGate),
//! the remote API an [`OrderBackend`](backend::OrderBackend), the liked set a
//! [`LikeStore`](likes::LikeStore). All three are handed in as `Arc<dyn ...>`.
//!
//! ### Concurrency
//! Within one component, transitions are sequential. Across components there is no
//! shared lock: a like toggle, a draft submission and an admin edit may interleave
//! freely. Order records carry no version, so concurrent admin edits are
//! last-write-wins.
//!
//! ### Observability
//! `tracing` everywhere with structured fields; async operations run inside
//! `#[instrument]` spans. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. Data ([`model`], [`session`])
//! - Products, orders, the five order statuses and their wire labels.
//! - [`SessionGate`](session::SessionGate): who is logged in, answered from cache.
//!
//! ### 2. The API ([`backend`])
//! - [`OrderBackend`](backend::OrderBackend): create, list, update, delete orders and toggle likes.
//! - [`HttpOrderBackend`](backend::HttpOrderBackend) over REST,
//!   [`InMemoryBackend`](backend::InMemoryBackend) over actors,
//!   [`MockBackend`](backend::MockBackend) for tests.
//!
//! ### 3. The Engine ([`framework`])
//! The generic `ResourceActor<T>` powering the in-memory stores.
//!
//! ### 4. The Components ([`draft`], [`likes`], [`admin`])
//! - [`OrderDraftController`](draft::OrderDraftController)
//! - [`LikeToggleCoordinator`](likes::LikeToggleCoordinator)
//! - [`AdminOrderManager`](admin::AdminOrderManager)
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! [`Storefront`](lifecycle::Storefront) wires the components over one backend and
//! shuts the in-memory stores down.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Demo against the in-memory stores
//! RUST_LOG=info cargo run
//!
//! # List the back office of a running API instead
//! STOREFRONT_API_URL=http://localhost:5000 STOREFRONT_API_TOKEN=... cargo run
//!
//! cargo test
//! ```

pub mod admin;
pub mod backend;
pub mod config;
pub mod draft;
pub mod framework;
pub mod lifecycle;
pub mod likes;
pub mod model;
pub mod session;
