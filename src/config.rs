// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

use crate::clients::{
    calcom::SchedulingCredentials, CalComClient, SchedulingProvider, SmsTransport, TwilioClient,
};
use crate::db::{
    BookingRepository, CallRepository, LeadRepository, MessageRepository, PatientRepository,
    PhoneNumberRepository, PracticeRepository,
};
use crate::services::{AssistantService, CallService, SmsService, ToolService};

// Toda a configuração vinda do ambiente, num struct explícito que é
// passado adiante na construção — nada de singletons preguiçosos por
// módulo para os clientes externos.
#[derive(Clone)]
pub struct Settings {
    pub database_url: String,

    // Segredo compartilhado que a plataforma de voz ecoa em cada evento.
    pub voice_webhook_secret: String,

    // URL pública desta aplicação, base do callback entregue à plataforma.
    pub public_base_url: String,

    // Provedor de agenda: credenciais globais de fallback, usadas quando
    // o consultório não tem as próprias.
    pub calcom_base_url: String,
    pub calcom_api_key: Option<String>,
    pub calcom_event_type_id: Option<String>,

    // Provedor de telefonia (SMS de saída)
    pub twilio_base_url: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,

    // Timeout de toda chamada a colaborador externo.
    pub provider_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        let provider_timeout_secs = env::var("PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida"),
            voice_webhook_secret: env::var("VOICE_WEBHOOK_SECRET")
                .expect("VOICE_WEBHOOK_SECRET deve ser definido"),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            calcom_base_url: env::var("CALCOM_BASE_URL")
                .unwrap_or_else(|_| "https://api.cal.com/v1".to_string()),
            calcom_api_key: env::var("CALCOM_API_KEY").ok(),
            calcom_event_type_id: env::var("CALCOM_EVENT_TYPE_ID").ok(),
            twilio_base_url: env::var("TWILIO_BASE_URL")
                .unwrap_or_else(|_| "https://api.twilio.com".to_string()),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            provider_timeout: Duration::from_secs(provider_timeout_secs),
        }
    }

    // Credenciais globais de agenda, se as duas metades existirem.
    pub fn fallback_scheduling_creds(&self) -> Option<SchedulingCredentials> {
        match (&self.calcom_api_key, &self.calcom_event_type_id) {
            (Some(api_key), Some(event_type_id)) => Some(SchedulingCredentials {
                api_key: api_key.clone(),
                event_type_id: event_type_id.clone(),
            }),
            _ => None,
        }
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Settings,
    pub assistant_service: AssistantService,
    pub tool_service: ToolService,
    pub call_service: CallService,
    pub sms_service: SmsService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Settings::from_env();

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let practice_repo = PracticeRepository::new(db_pool.clone());
        let phone_repo = PhoneNumberRepository::new(db_pool.clone());
        let patient_repo = PatientRepository::new(db_pool.clone());
        let call_repo = CallRepository::new(db_pool.clone());
        let booking_repo = BookingRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let message_repo = MessageRepository::new(db_pool.clone());

        let scheduling: Arc<dyn SchedulingProvider> = Arc::new(CalComClient::new(
            &settings.calcom_base_url,
            settings.provider_timeout,
        ));
        let sms_transport: Arc<dyn SmsTransport> = Arc::new(TwilioClient::new(
            &settings.twilio_base_url,
            &settings.twilio_account_sid,
            &settings.twilio_auth_token,
            settings.provider_timeout,
        ));

        let server_url = format!(
            "{}/api/webhooks/voice",
            settings.public_base_url.trim_end_matches('/')
        );

        let assistant_service = AssistantService::new(
            practice_repo.clone(),
            phone_repo.clone(),
            server_url,
            settings.voice_webhook_secret.clone(),
        );

        let sms_service = SmsService::new(
            phone_repo,
            patient_repo.clone(),
            booking_repo.clone(),
            lead_repo.clone(),
            message_repo,
            sms_transport,
        );

        let tool_service = ToolService::new(
            scheduling,
            patient_repo.clone(),
            booking_repo.clone(),
            sms_service.clone(),
            settings.fallback_scheduling_creds(),
        );

        let call_service = CallService::new(call_repo, booking_repo, lead_repo, patient_repo);

        Ok(Self {
            db_pool,
            settings,
            assistant_service,
            tool_service,
            call_service,
            sms_service,
        })
    }
}
