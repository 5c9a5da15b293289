//! Error types for route computation.

use thiserror::Error;

/// Errors from a routing provider.
///
/// The adapter swallows all of these; they exist for logging and for
/// callers that use a [`RoutingClient`](super::RoutingClient) directly.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Transport failure or client construction failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Provider answered with a non-success HTTP status.
    #[error("Routing provider returned HTTP {0}")]
    Status(u16),

    /// Response body was not the expected JSON.
    #[error("Failed to parse routing response: {0}")]
    Json(String),

    /// Provider answered but found no route (code other than `Ok`, or an
    /// empty route list).
    #[error("No route found: {0}")]
    NoRoute(String),

    /// The route geometry had no usable coordinates.
    #[error("Route geometry contains no valid coordinates")]
    InvalidGeometry,
}
