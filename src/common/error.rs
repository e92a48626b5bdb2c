use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Segredo compartilhado do webhook não confere.
    #[error("Não autorizado")]
    Unauthorized,

    // Número de destino que não pertence a nenhum consultório.
    #[error("Número desconhecido")]
    UnknownNumber,

    #[error("Payload de webhook inválido: {0}")]
    InvalidPayload(String),

    // Falha de um colaborador externo (agenda, telefonia).
    #[error("Erro do provedor externo: {0}")]
    ProviderError(String),

    #[error("Erro de requisição HTTP")]
    HttpError(#[from] reqwest::Error),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Não autorizado.".to_string()),
            AppError::UnknownNumber => (
                StatusCode::NOT_FOUND,
                "Número não pertence a nenhum consultório.".to_string(),
            ),
            AppError::InvalidPayload(reason) => (StatusCode::BAD_REQUEST, reason),

            // Todos os outros erros (DatabaseError, ProviderError, ...) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
