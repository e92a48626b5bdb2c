// src/models/call.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Registro de uma chamada atendida pela assistente.
//
// `voice_call_id` é o id atribuído pela plataforma de voz e funciona como
// chave natural de idempotência: reentregas do relatório de fim de chamada
// fazem upsert, nunca uma segunda linha.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: Uuid,
    pub practice_id: Option<Uuid>,
    pub voice_call_id: String,
    pub caller_number: Option<String>,
    pub status: Option<String>,
    pub duration_seconds: i32,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub recording_url: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados da chamada a persistir, extraídos do relatório de fim de chamada.
#[derive(Debug, Clone)]
pub struct NewCall {
    pub practice_id: Option<Uuid>,
    pub voice_call_id: String,
    pub caller_number: Option<String>,
    pub status: Option<String>,
    pub duration_seconds: i32,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub recording_url: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}
