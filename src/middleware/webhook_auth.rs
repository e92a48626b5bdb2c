// src/middleware/webhook_auth.rs

use axum::{extract::State, middleware::Next, response::Response};

use crate::{common::error::AppError, config::AppState};

// O cabeçalho que a plataforma de voz ecoa em cada evento, com o segredo
// compartilhado entregue na configuração da assistente.
const WEBHOOK_SECRET_HEADER: &str = "x-vapi-secret";

// O guard dos webhooks de voz: segredo ausente ou diferente rejeita a
// requisição antes de qualquer processamento — nenhum efeito colateral,
// nada gravado.
pub async fn webhook_secret_guard(
    State(app_state): State<AppState>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(secret) if secret == app_state.settings.voice_webhook_secret => {
            Ok(next.run(request).await)
        }
        _ => Err(AppError::Unauthorized),
    }
}
