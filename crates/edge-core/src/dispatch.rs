//! The HTTP-handling collaborator.

use async_trait::async_trait;

use crate::context::{InternalRequest, InternalResponse};

/// Error type for dispatcher failures.
///
/// The adapter never inspects or wraps these; they reach the hosting platform as-is.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Handler error: {0}")]
    Handler(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Produces an internal response for an internal request.
///
/// Implementations are shared across concurrent invocations and must not
/// hold per-invocation mutable state.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Handle one internal HTTP call.
    async fn dispatch(&self, request: InternalRequest) -> Result<InternalResponse, DispatchError>;
}
