//! Stored lead listing.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tal_core::lead::StoredLead;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLeadsQuery {
    pub company_slug: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListLeadsResponse {
    pub leads: Vec<StoredLead>,
}

pub async fn list_leads(
    State(state): State<AppState>,
    Query(query): Query<ListLeadsQuery>,
) -> Result<Json<ListLeadsResponse>, AppError> {
    let leads = state
        .intake
        .list_leads(query.company_slug.as_deref())
        .await?;
    Ok(Json(ListLeadsResponse { leads }))
}
