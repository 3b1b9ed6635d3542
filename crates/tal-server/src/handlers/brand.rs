//! Branding endpoint.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tal_core::config::BrandConfig;

use crate::state::AppState;

const DEFAULT_GREETING: &str = "hi tal";

#[derive(Debug, Default, Deserialize)]
pub struct BrandQuery {
    /// Pre-filled WhatsApp message (e.g. "hi tal, i'm Asha").
    pub greeting: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BrandResponse {
    #[serde(flatten)]
    pub brand: BrandConfig,
    /// `whatsapp_link` with the requested greeting pre-filled.
    pub whatsapp_greeting_link: String,
}

pub async fn brand(
    State(state): State<AppState>,
    Query(query): Query<BrandQuery>,
) -> Json<BrandResponse> {
    let greeting = query
        .greeting
        .filter(|g| !g.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GREETING.to_string());

    Json(BrandResponse {
        whatsapp_greeting_link: state.brand.whatsapp_link_with_greeting(&greeting),
        brand: state.brand.as_ref().clone(),
    })
}
