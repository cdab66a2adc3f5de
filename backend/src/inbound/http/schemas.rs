//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// The requested category has no available codes.
    #[schema(rename = "out_of_stock")]
    OutOfStock,
    /// The durable store is unreachable; retry with backoff.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// The request exceeded its deadline; retry with backoff.
    #[schema(rename = "gateway_timeout")]
    GatewayTimeout,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "out_of_stock")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "no COINS codes remain and the player has no prior redemption")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "5d3f0b12-8a4e-4c11-9b6f-0e2f4a7c9d10")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}
