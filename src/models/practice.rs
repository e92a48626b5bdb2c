// src/models/practice.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS ---

// Mapeia o CREATE TYPE ai_tone do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "ai_tone", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AiTone {
    Professional,
    Friendly,
    Casual,
    Empathetic,
}

// --- HORÁRIO DE FUNCIONAMENTO ---

// Guardado como JSONB na coluna office_hours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct OfficeHours {
    pub start: String, // Ex: "09:00"
    pub end: String,   // Ex: "17:00"
}

impl Default for OfficeHours {
    fn default() -> Self {
        Self {
            start: "09:00".to_string(),
            end: "17:00".to_string(),
        }
    }
}

// --- CONSULTÓRIO (o tenant) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Practice {
    pub id: Uuid,
    pub name: String,

    // Número de contato/encaminhamento e número de destino das ligações,
    // ambos em E.164.
    pub phone_number: Option<String>,
    pub destination_number: Option<String>,

    // Preferências da assistente
    pub ai_voice: Option<String>,
    pub ai_tone: AiTone,
    pub ai_greeting: Option<String>,
    pub transfer_keywords: Vec<String>,
    pub emergency_keywords: Vec<String>,
    #[schema(value_type = Option<OfficeHours>)]
    pub office_hours: Option<Json<OfficeHours>>,

    // Credenciais do provedor de agenda
    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub calcom_api_key: Option<String>,
    pub calcom_event_type_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- BASE DE CONHECIMENTO ---

// Entradas livres que o consultório cadastra no onboarding.
// A ordem de cadastro é a ordem em que aparecem no prompt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeEntry {
    pub id: Uuid,
    pub practice_id: Uuid,
    pub category: String,
    pub question: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
