//! Lead-intake endpoints.
//!
//! Malformed JSON is answered with 400; validation failures carry the
//! service's message.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tal_core::lead::wire::{
    ChatOnboardingPayload, IntakeResponse, LeadPayload, RegisterLeadPayload,
};

use crate::error::AppError;
use crate::state::AppState;

pub async fn chat_onboarding(
    State(state): State<AppState>,
    payload: Result<Json<ChatOnboardingPayload>, JsonRejection>,
) -> Result<Json<IntakeResponse>, AppError> {
    let Json(payload) = payload?;
    Ok(Json(state.intake.chat_onboarding(payload).await?))
}

pub async fn lead(
    State(state): State<AppState>,
    payload: Result<Json<LeadPayload>, JsonRejection>,
) -> Result<Json<IntakeResponse>, AppError> {
    let Json(payload) = payload?;
    Ok(Json(state.intake.lead(payload).await?))
}

pub async fn register_lead(
    State(state): State<AppState>,
    payload: Result<Json<RegisterLeadPayload>, JsonRejection>,
) -> Result<Json<IntakeResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::from(e).with_ok_flag())?;
    let response = state
        .intake
        .register_lead(payload)
        .await
        .map_err(|e| AppError::from(e).with_ok_flag())?;
    Ok(Json(response))
}
