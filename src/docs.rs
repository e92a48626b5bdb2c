// src/docs.rs

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Webhooks ---
        handlers::voice::voice_webhook,
        handlers::sms::inbound_sms,
    ),
    components(
        schemas(
            // --- Envelope da plataforma de voz ---
            models::events::VoiceWebhook,
            models::events::WebhookMessage,
            models::events::CallPayload,
            models::events::CustomerPayload,
            models::events::AnalysisPayload,
            models::events::ToolCallEntry,
            models::events::ToolFunction,
            models::events::ToolResultEntry,

            // --- SMS ---
            handlers::sms::InboundSmsForm,
            models::telephony::PhoneNumber,
            models::telephony::NumberStatus,
            models::telephony::Message,
            models::telephony::MessageDirection,
            models::telephony::MessageStatus,

            // --- Consultório ---
            models::practice::Practice,
            models::practice::AiTone,
            models::practice::OfficeHours,
            models::practice::KnowledgeEntry,

            // --- Registros dos webhooks ---
            models::patient::Patient,
            models::patient::PatientType,
            models::call::Call,
            models::booking::Booking,
            models::booking::BookingStatus,
            models::lead::Lead,
            models::lead::LeadStatus,
            models::lead::LeadPriority,
        )
    ),
    tags(
        (name = "Webhooks", description = "Eventos da plataforma de voz e do provedor de SMS")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "webhook_secret",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-vapi-secret"))),
        );
    }
}
