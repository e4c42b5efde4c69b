//! Generic actor framework for resource stores.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that stored resource types implement
//! - [`ResourceActor`] - Generic actor that owns a store of entities
//! - [`ResourceClient`] - Type-safe client for talking to an actor
//! - [`FrameworkError`] - Common error types
//!
//! The in-memory [`OrderBackend`](crate::backend::OrderBackend) is built on top of it,
//! see [`crate::backend::memory`].

pub mod core;

pub use self::core::{ActorEntity, FrameworkError, ResourceActor, ResourceClient, ResourceRequest, Response};
