// src/clients/calcom.rs
//
// Cliente do provedor de agenda (Cal.com, API v1). O provedor é a fonte
// de verdade sobre horários: os slots retornados são repassados sem
// filtragem local.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::common::error::AppError;

// Credenciais por consultório, com fallback global via configuração.
#[derive(Debug, Clone)]
pub struct SchedulingCredentials {
    pub api_key: String,
    pub event_type_id: String,
}

#[derive(Debug, Clone)]
pub struct CalendarBookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub start_time: String, // ISO 8601
    pub time_zone: String,
}

// O que precisamos de volta do provedor: o id do evento criado.
#[derive(Debug, Clone)]
pub struct CalendarBooking {
    pub id: String,
}

// Trait no limite com o colaborador externo, para os testes injetarem
// um provedor falso.
#[async_trait]
pub trait SchedulingProvider: Send + Sync {
    async fn get_slots(
        &self,
        creds: &SchedulingCredentials,
        start_time: &str,
        end_time: &str,
    ) -> Result<Value, AppError>;

    async fn create_booking(
        &self,
        creds: &SchedulingCredentials,
        request: &CalendarBookingRequest,
    ) -> Result<CalendarBooking, AppError>;
}

#[derive(Clone)]
pub struct CalComClient {
    http: reqwest::Client,
    base_url: String,
}

impl CalComClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Falha ao construir o cliente HTTP do Cal.com");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SchedulingProvider for CalComClient {
    async fn get_slots(
        &self,
        creds: &SchedulingCredentials,
        start_time: &str,
        end_time: &str,
    ) -> Result<Value, AppError> {
        let url = format!("{}/slots", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("apiKey", creds.api_key.as_str()),
                ("startTime", start_time),
                ("endTime", end_time),
                ("eventTypeId", creds.event_type_id.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ProviderError(format!(
                "Cal.com respondeu {} na consulta de slots",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        Ok(data.get("slots").cloned().unwrap_or_else(|| json!([])))
    }

    async fn create_booking(
        &self,
        creds: &SchedulingCredentials,
        request: &CalendarBookingRequest,
    ) -> Result<CalendarBooking, AppError> {
        let event_type_id: i64 = creds.event_type_id.parse().map_err(|_| {
            AppError::ProviderError(format!(
                "eventTypeId inválido na configuração da agenda: '{}'",
                creds.event_type_id
            ))
        })?;

        let url = format!("{}/bookings", self.base_url);

        let body = json!({
            "apiKey": creds.api_key,
            "eventTypeId": event_type_id,
            "start": request.start_time,
            "responses": {
                "name": request.name,
                "email": request.email,
                "location": {
                    "optionValue": request.phone,
                    "value": "phone"
                }
            },
            "timeZone": request.time_zone,
            "language": "en"
        });

        let response = self.http.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderError(format!(
                "Cal.com rejeitou o agendamento ({}): {}",
                status, detail
            )));
        }

        let data: Value = response.json().await?;
        let id = data
            .get("id")
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .ok_or_else(|| {
                AppError::ProviderError("Cal.com criou o agendamento sem retornar id".to_string())
            })?;

        Ok(CalendarBooking { id })
    }
}
