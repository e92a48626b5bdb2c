// src/models/booking.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Scheduled,
}

// Agendamento criado durante a chamada (tool call) ou manualmente.
//
// Correlação em duas fases: `voice_call_id` guarda o id externo da chamada
// no momento do agendamento (a linha em `calls` ainda não existe);
// `call_id` é a FK interna, preenchida pela reconciliação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub practice_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub voice_call_id: Option<String>,
    pub call_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub appointment_type: Option<String>,
    pub calendar_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub practice_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub voice_call_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub appointment_type: String,
    pub calendar_event_id: Option<String>,
}
