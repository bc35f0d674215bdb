//! Core types for the serverless gateway edge adapter.
//!
//! This crate provides the fundamental types and traits:
//! - `IncomingEvent` / `OutgoingResponse` - Gateway v1 event envelopes
//! - `InternalRequest` / `InternalResponse` - The generic internal HTTP call
//! - `Dispatcher` trait - The HTTP-handling collaborator
//! - `TimingContext` - Invocation lifecycle tracking

mod context;
mod dispatch;
mod event;
mod lifecycle;

pub use context::*;
pub use dispatch::*;
pub use event::*;
pub use lifecycle::*;
