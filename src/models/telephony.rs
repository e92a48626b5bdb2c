// src/models/telephony.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "number_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NumberStatus {
    Pending,
    Active,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "message_direction", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    Inbound,
    Outbound,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "message_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Received,
    Sent,
    Failed,
    Pending,
}

// --- NÚMERO PROVISIONADO ---

// Um número pertence a exatamente um consultório. No máximo um número
// primário por consultório (regra de aplicação, não do banco).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    pub id: Uuid,
    pub practice_id: Uuid,
    pub phone_number: String,
    pub voice_phone_number_id: Option<String>,
    pub voice_assistant_id: Option<String>,
    pub status: NumberStatus,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

// --- MENSAGEM (trilha de auditoria de SMS) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub practice_id: Uuid,
    pub patient_id: Option<Uuid>,
    pub message_type: String,
    pub direction: MessageDirection,
    pub from_address: String,
    pub to_address: String,
    pub body: String,
    pub provider: Option<String>,
    pub provider_message_id: Option<String>,
    pub status: MessageStatus,
    pub error_message: Option<String>,

    // Vínculo opcional com outra entidade (ex: booking), por par tipo+id.
    pub related_type: Option<String>,
    pub related_id: Option<Uuid>,

    pub received_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Registro de um SMS de saída para a trilha de auditoria, com o desfecho
// do envio (enviado ou falho) e o vínculo opcional com um agendamento.
#[derive(Debug, Clone)]
pub struct NewOutboundMessage {
    pub practice_id: Uuid,
    pub patient_id: Option<Uuid>,
    pub from_address: String,
    pub to_address: String,
    pub body: String,
    pub provider: String,
    pub provider_message_id: Option<String>,
    pub status: MessageStatus,
    pub error_message: Option<String>,
    pub related_type: Option<String>,
    pub related_id: Option<Uuid>,
}
