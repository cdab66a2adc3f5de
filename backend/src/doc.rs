//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: the redemption and inventory endpoints, the health
//! probes, the error envelope schemas, and the `X-Api-Key` security scheme.
//! The generated specification backs Swagger UI in debug builds.

use crate::inbound::http::inventory::{
    CategoryStatsBody, CodeStatusBody, NextAvailableBody, RedemptionBody, StatsResponseBody,
};
use crate::inbound::http::redemptions::{RedeemRequestBody, RedeemResponseBody};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the API key security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "ApiKey",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-Api-Key",
                "Shared secret configured on the server.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "redeemd API",
        description = "HTTP interface for single-use code redemption, inventory \
                       inspection, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("ApiKey" = [])),
    paths(
        crate::inbound::http::redemptions::redeem,
        crate::inbound::http::inventory::code_status,
        crate::inbound::http::inventory::peek_next,
        crate::inbound::http::inventory::stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RedeemRequestBody,
        RedeemResponseBody,
        CodeStatusBody,
        RedemptionBody,
        NextAvailableBody,
        CategoryStatsBody,
        StatsResponseBody,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "redemptions", description = "Single-use code redemption"),
        (name = "inventory", description = "Read-only inventory inspection"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
