// src/models/events.rs
//
// Envelope dos webhooks da plataforma de voz. Tudo chega num único POST
// com `{ "message": { "type": ..., ... } }`; o tipo decide o fluxo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VoiceWebhook {
    pub message: Option<WebhookMessage>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMessage {
    // "assistant-request", "tool-calls", "end-of-call-report", ...
    #[serde(rename = "type")]
    pub kind: String,

    pub call: Option<CallPayload>,

    #[serde(default)]
    pub tool_call_list: Vec<ToolCallEntry>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallPayload {
    pub id: Option<String>,
    pub assistant_id: Option<String>,
    pub customer: Option<CustomerPayload>,
    pub status: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    pub transcript: Option<String>,
    pub recording_url: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub analysis: Option<AnalysisPayload>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CustomerPayload {
    pub number: Option<String>,
}

// A plataforma resume a chamada ao final; pode vir vazio.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnalysisPayload {
    pub summary: Option<String>,
}

// --- TOOL CALLS ---

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ToolCallEntry {
    pub id: String,
    pub function: ToolFunction,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ToolFunction {
    pub name: String,
    // Os argumentos chegam como objeto JSON livre; cada tool faz o
    // seu próprio parse.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub arguments: Value,
}

// Uma entrada de resultado por tool call recebido, correlacionada por id.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultEntry {
    pub tool_call_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResultEntry {
    pub fn ok(tool_call_id: impl Into<String>, result: Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            result: Some(result),
            error: None,
        }
    }

    pub fn err(tool_call_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            result: None,
            error: Some(error.into()),
        }
    }
}
