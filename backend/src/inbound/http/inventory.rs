//! Inventory HTTP handlers.
//!
//! Read-only operator endpoints:
//!
//! ```text
//! GET /api/v1/status?code=&category=
//! GET /api/v1/peek?category=
//! GET /api/v1/stats
//! ```

use actix_web::{HttpRequest, get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CodeStatus, NextAvailable};
use crate::domain::{CategoryStats, RedemptionRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_api_key;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_category, parse_optional_category,
};

/// Query parameters for code status lookup.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub code: Option<String>,
    pub category: Option<String>,
}

/// Query parameters for the peek endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PeekQuery {
    pub category: Option<String>,
}

/// Redemption details embedded in a status response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionBody {
    pub player_id: i64,
    pub correlation_id: Option<String>,
    #[schema(format = "date-time")]
    pub redeemed_at: String,
}

/// Response payload for code status lookup.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeStatusBody {
    pub code_id: i64,
    pub code: String,
    pub category: String,
    pub available: bool,
    #[schema(format = "date-time")]
    pub created_at: String,
    pub redemption: Option<RedemptionBody>,
}

/// Response payload for the peek endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextAvailableBody {
    pub id: i64,
    pub value: String,
}

/// One category's counters in the stats response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatsBody {
    pub category: String,
    pub remaining: u64,
    pub used: u64,
}

/// Response payload for the stats endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponseBody {
    pub categories: Vec<CategoryStatsBody>,
}

impl From<RedemptionRecord> for RedemptionBody {
    fn from(record: RedemptionRecord) -> Self {
        Self {
            player_id: record.player_id.get(),
            correlation_id: record
                .correlation_id
                .map(|id| id.as_str().to_owned()),
            redeemed_at: record.redeemed_at.to_rfc3339(),
        }
    }
}

impl From<CodeStatus> for CodeStatusBody {
    fn from(status: CodeStatus) -> Self {
        Self {
            code_id: status.code.id.get(),
            code: status.code.value.clone(),
            category: status.code.category.as_str().to_owned(),
            available: status.code.is_available(),
            created_at: status.code.created_at.to_rfc3339(),
            redemption: status.redemption.map(RedemptionBody::from),
        }
    }
}

impl From<NextAvailable> for NextAvailableBody {
    fn from(next: NextAvailable) -> Self {
        Self {
            id: next.code_id.get(),
            value: next.value,
        }
    }
}

impl From<CategoryStats> for CategoryStatsBody {
    fn from(entry: CategoryStats) -> Self {
        Self {
            category: entry.category.as_str().to_owned(),
            remaining: entry.remaining,
            used: entry.used,
        }
    }
}

/// Look up a code's status by value.
#[utoipa::path(
    get,
    path = "/api/v1/status",
    params(StatusQuery),
    responses(
        (status = 200, description = "Code status", body = CodeStatusBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unknown code", body = ErrorSchema)
    ),
    tags = ["inventory"],
    operation_id = "codeStatus",
    security(("ApiKey" = []))
)]
#[get("/status")]
pub async fn code_status(
    state: web::Data<HttpState>,
    request: HttpRequest,
    query: web::Query<StatusQuery>,
) -> ApiResult<web::Json<CodeStatusBody>> {
    require_api_key(request.headers(), &state.credential)?;
    let StatusQuery { code, category } = query.into_inner();
    let code = code.ok_or_else(|| missing_field_error(FieldName::new("code")))?;
    let category = parse_optional_category(category.as_deref(), FieldName::new("category"))?;

    let status = state.inventory.code_status(&code, category).await?;

    Ok(web::Json(CodeStatusBody::from(status)))
}

/// Preview the code the next allocation would hand out.
#[utoipa::path(
    get,
    path = "/api/v1/peek",
    params(PeekQuery),
    responses(
        (status = 200, description = "Next available code", body = NextAvailableBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Category out of stock", body = ErrorSchema)
    ),
    tags = ["inventory"],
    operation_id = "peekNext",
    security(("ApiKey" = []))
)]
#[get("/peek")]
pub async fn peek_next(
    state: web::Data<HttpState>,
    request: HttpRequest,
    query: web::Query<PeekQuery>,
) -> ApiResult<web::Json<NextAvailableBody>> {
    require_api_key(request.headers(), &state.credential)?;
    let category = query
        .into_inner()
        .category
        .ok_or_else(|| missing_field_error(FieldName::new("category")))?;
    let category = parse_category(&category, FieldName::new("category"))?;

    let next = state.inventory.peek_next(category).await?;

    Ok(web::Json(NextAvailableBody::from(next)))
}

/// Remaining and used counts per category.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Per-category counters", body = StatsResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["inventory"],
    operation_id = "inventoryStats",
    security(("ApiKey" = []))
)]
#[get("/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    request: HttpRequest,
) -> ApiResult<web::Json<StatsResponseBody>> {
    require_api_key(request.headers(), &state.credential)?;

    let categories = state.inventory.stats().await?;

    Ok(web::Json(StatsResponseBody {
        categories: categories.into_iter().map(CategoryStatsBody::from).collect(),
    }))
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
