// src/handlers/voice.rs
//
// O webhook da plataforma de voz. Tudo chega num único POST com um
// envelope `{ "message": { "type": ... } }`; o tipo decide o fluxo:
// configuração pré-chamada, lote de tool calls ou relatório de fim de
// chamada.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        events::{CallPayload, VoiceWebhook, WebhookMessage},
        practice::Practice,
    },
};

const EVENT_ASSISTANT_REQUEST: &str = "assistant-request";
const EVENT_TOOL_CALLS: &str = "tool-calls";
const EVENT_END_OF_CALL: &str = "end-of-call-report";

// POST /api/webhooks/voice
#[utoipa::path(
    post,
    path = "/api/webhooks/voice",
    tag = "Webhooks",
    request_body = VoiceWebhook,
    responses(
        (status = 200, description = "Evento processado"),
        (status = 400, description = "Envelope inválido"),
        (status = 401, description = "Segredo compartilhado incorreto")
    ),
    security(("webhook_secret" = []))
)]
pub async fn voice_webhook(
    State(app_state): State<AppState>,
    Json(payload): Json<VoiceWebhook>,
) -> Result<impl IntoResponse, AppError> {
    let Some(message) = payload.message else {
        return Err(AppError::InvalidPayload(
            "Envelope sem o objeto 'message'.".to_string(),
        ));
    };

    tracing::info!("Webhook de voz: evento '{}'", message.kind);

    match message.kind.as_str() {
        EVENT_ASSISTANT_REQUEST => assistant_request(&app_state, &message).await,
        EVENT_TOOL_CALLS => tool_calls(&app_state, &message).await,
        EVENT_END_OF_CALL => end_of_call(&app_state, &message).await,
        other => {
            tracing::info!("Evento de voz não tratado: {}", other);
            Ok((StatusCode::OK, Json(json!({ "received": true }))))
        }
    }
}

// Configuração dinâmica pré-chamada: resolve o consultório pelo número
// do cliente e devolve a assistente montada. Sem consultório, devolve um
// corpo vazio e a plataforma usa o comportamento padrão.
async fn assistant_request(
    app_state: &AppState,
    message: &WebhookMessage,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let number = message
        .call
        .as_ref()
        .and_then(|c| c.customer.as_ref())
        .and_then(|c| c.number.as_deref());

    if let Some(number) = number {
        if let Some(practice) = app_state.assistant_service.resolve_by_number(number).await? {
            tracing::info!("Configuração dinâmica para o consultório '{}'", practice.name);
            let config = app_state.assistant_service.config_for_practice(&practice).await?;
            return Ok((StatusCode::OK, Json(json!({ "assistant": config }))));
        }
    }

    tracing::warn!(
        "Nenhum consultório para o número {:?}; usando comportamento padrão",
        number
    );
    Ok((StatusCode::OK, Json(json!({}))))
}

// Lote de tool calls de uma chamada ativa. A resposta tem exatamente uma
// entrada por tool call, correlacionada por toolCallId.
async fn tool_calls(
    app_state: &AppState,
    message: &WebhookMessage,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let call = message.call.as_ref();
    let call_id = call.and_then(|c| c.id.as_deref());
    let caller_number = call
        .and_then(|c| c.customer.as_ref())
        .and_then(|c| c.number.as_deref());

    let practice = resolve_practice_for_call(app_state, call).await?;

    let results = app_state
        .tool_service
        .dispatch_batch(
            &message.tool_call_list,
            call_id,
            caller_number,
            practice.as_ref(),
        )
        .await;

    Ok((StatusCode::OK, Json(json!({ "results": results }))))
}

// Relatório de fim de chamada: persiste a chamada e roda a reconciliação.
async fn end_of_call(
    app_state: &AppState,
    message: &WebhookMessage,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let Some(call) = message.call.as_ref() else {
        tracing::warn!("Relatório de fim de chamada sem objeto 'call'");
        return Ok((StatusCode::OK, Json(json!({ "success": true }))));
    };

    let practice_id = resolve_practice_for_call(app_state, Some(call))
        .await?
        .map(|p| p.id);

    app_state
        .call_service
        .handle_end_of_call(call, practice_id)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

// O consultório de uma chamada: primeiro pelo assistant id (sempre
// presente nos eventos de chamada ativa), depois pelo número do cliente.
async fn resolve_practice_for_call(
    app_state: &AppState,
    call: Option<&CallPayload>,
) -> Result<Option<Practice>, AppError> {
    let Some(call) = call else {
        return Ok(None);
    };

    if let Some(assistant_id) = call.assistant_id.as_deref() {
        if let Some(practice) = app_state
            .assistant_service
            .resolve_by_assistant(assistant_id)
            .await?
        {
            return Ok(Some(practice));
        }
    }

    if let Some(number) = call.customer.as_ref().and_then(|c| c.number.as_deref()) {
        return app_state.assistant_service.resolve_by_number(number).await;
    }

    Ok(None)
}
