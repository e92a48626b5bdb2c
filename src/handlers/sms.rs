// src/handlers/sms.rs
//
// Webhook de SMS entrante do provedor de telefonia. O corpo chega
// form-encoded (From/To/Body) e a resposta é um documento TwiML vazio.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Form,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::error::AppError, config::AppState};

// Convenção do provedor: campos com inicial maiúscula.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InboundSmsForm {
    #[serde(rename = "From")]
    #[validate(length(min = 1, message = "required"))]
    pub from: String,
    #[serde(rename = "To")]
    #[validate(length(min = 1, message = "required"))]
    pub to: String,
    #[serde(rename = "Body")]
    pub body: String,
}

const EMPTY_TWIML: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>";

// POST /api/webhooks/sms
#[utoipa::path(
    post,
    path = "/api/webhooks/sms",
    tag = "Webhooks",
    request_body(content = InboundSmsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "TwiML vazio"),
        (status = 404, description = "Número de destino desconhecido")
    )
)]
pub async fn inbound_sms(
    State(app_state): State<AppState>,
    Form(payload): Form<InboundSmsForm>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    tracing::info!(
        "SMS recebido de {} para {}: \"{}\"",
        payload.from,
        payload.to,
        payload.body
    );

    app_state
        .sms_service
        .handle_inbound(&payload.from, &payload.to, &payload.body)
        .await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/xml")],
        EMPTY_TWIML,
    ))
}
