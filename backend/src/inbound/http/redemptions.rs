//! Redemption HTTP handlers.
//!
//! ```text
//! POST /api/v1/redeem
//! ```

use actix_web::{HttpRequest, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{RedeemReceipt, RedeemRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_api_key;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_category, parse_player_id,
};

/// Request payload for redeeming a code.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequestBody {
    pub category: Option<String>,
    pub player_id: Option<i64>,
    pub correlation_id: Option<String>,
}

/// Response payload for a successful redemption.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponseBody {
    pub code_id: i64,
    pub code: String,
    pub category: String,
    pub replayed: bool,
    #[schema(format = "date-time")]
    pub redeemed_at: String,
}

fn parse_redeem_payload(payload: RedeemRequestBody) -> Result<RedeemRequest, Error> {
    let category = payload
        .category
        .ok_or_else(|| missing_field_error(FieldName::new("category")))?;
    let player_id = payload
        .player_id
        .ok_or_else(|| missing_field_error(FieldName::new("playerId")))?;

    Ok(RedeemRequest {
        category: parse_category(&category, FieldName::new("category"))?,
        player: parse_player_id(player_id, FieldName::new("playerId"))?,
        correlation_id: payload.correlation_id,
    })
}

impl From<RedeemReceipt> for RedeemResponseBody {
    fn from(receipt: RedeemReceipt) -> Self {
        Self {
            code_id: receipt.code_id.get(),
            code: receipt.code,
            category: receipt.category.as_str().to_owned(),
            replayed: receipt.replayed,
            redeemed_at: receipt.redeemed_at.to_rfc3339(),
        }
    }
}

/// Redeem a single-use code for a player.
///
/// Replaying a `(playerId, category)` pair that already redeemed returns the
/// original code with `replayed` set, never a second code.
#[utoipa::path(
    post,
    path = "/api/v1/redeem",
    request_body = RedeemRequestBody,
    responses(
        (status = 200, description = "Code issued or replayed", body = RedeemResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Category out of stock", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 504, description = "Deadline exceeded", body = ErrorSchema)
    ),
    tags = ["redemptions"],
    operation_id = "redeemCode",
    security(("ApiKey" = []))
)]
#[post("/redeem")]
pub async fn redeem(
    state: web::Data<HttpState>,
    request: HttpRequest,
    payload: web::Json<RedeemRequestBody>,
) -> ApiResult<web::Json<RedeemResponseBody>> {
    require_api_key(request.headers(), &state.credential)?;
    let command = parse_redeem_payload(payload.into_inner())?;

    let receipt = state.redeem.redeem(command).await?;

    Ok(web::Json(RedeemResponseBody::from(receipt)))
}

#[cfg(test)]
#[path = "redemptions_tests.rs"]
mod tests;
