// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Interested,
    Scheduled,
    Lost,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "lead_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadPriority {
    Low,
    Medium,
    High,
}

// Oportunidade de acompanhamento criada pela reconciliação (chamada sem
// agendamento) ou pelo cancelamento via SMS. Quando ligado a uma chamada,
// `call_id` carrega o id interno — nunca o id externo da plataforma.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub practice_id: Option<Uuid>,
    pub call_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub expected_value: Option<f64>,
    pub notes: Option<String>,
    pub lead_source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLead {
    pub practice_id: Option<Uuid>,
    pub call_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub notes: String,
    pub lead_source: String,
}
