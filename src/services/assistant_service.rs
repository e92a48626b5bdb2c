// src/services/assistant_service.rs
//
// Resolve o consultório de uma ligação entrante e monta a configuração
// da assistente (prompt de sistema, voz, modelo e tools) que a plataforma
// de voz consome antes de atender.

use serde_json::{json, Value};

use crate::{
    common::{error::AppError, phone},
    db::{PhoneNumberRepository, PracticeRepository},
    models::practice::{AiTone, KnowledgeEntry, OfficeHours, Practice},
};

// Vozes nomeadas que o consultório escolhe nas configurações, mapeadas
// para os ids do provedor. Fallback fixo quando a preferência não existe.
const VOICE_MAP: [(&str, &str); 4] = [
    ("jennifer", "21m00Tcm4TlvDq8ikWAM"),
    ("mark", "TxGEqnHWrfWFTfGW9XjX"),
    ("sarah", "EXAVITQu4vr4xnSDxMaL"),
    ("david", "ErXwobaYiN019PkySvjV"),
];

const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM"; // jennifer
const VOICE_PROVIDER: &str = "11labs";

const DEFAULT_GREETING: &str = "Hello! How can I help you today?";

#[derive(Clone)]
pub struct AssistantService {
    practice_repo: PracticeRepository,
    phone_repo: PhoneNumberRepository,
    server_url: String,
    server_secret: String,
}

impl AssistantService {
    pub fn new(
        practice_repo: PracticeRepository,
        phone_repo: PhoneNumberRepository,
        server_url: String,
        server_secret: String,
    ) -> Self {
        Self {
            practice_repo,
            phone_repo,
            server_url,
            server_secret,
        }
    }

    // Resolve o consultório pelo número (destino ou encaminhamento).
    // `None` é um desfecho válido: a plataforma cai no comportamento padrão.
    pub async fn resolve_by_number(&self, raw_number: &str) -> Result<Option<Practice>, AppError> {
        let normalized = phone::normalize(raw_number);
        if normalized.is_empty() {
            return Ok(None);
        }
        self.practice_repo.find_by_number(&normalized).await
    }

    // Resolve o consultório pelo assistant id da chamada (tool calls).
    pub async fn resolve_by_assistant(
        &self,
        assistant_id: &str,
    ) -> Result<Option<Practice>, AppError> {
        self.phone_repo.find_practice_by_assistant(assistant_id).await
    }

    // Configuração completa para uma ligação entrante deste consultório.
    pub async fn config_for_practice(&self, practice: &Practice) -> Result<Value, AppError> {
        let knowledge = self
            .practice_repo
            .knowledge_for_practice(practice.id)
            .await?;

        Ok(build_assistant_config(
            practice,
            &knowledge,
            &self.server_url,
            &self.server_secret,
        ))
    }
}

// =============================================================================
//  MONTAGEM DO PROMPT E DA CONFIGURAÇÃO (funções puras)
// =============================================================================

// Prompt de sistema, determinístico para o mesmo estado do consultório.
pub fn generate_system_prompt(practice: &Practice, knowledge: &[KnowledgeEntry]) -> String {
    let greeting = practice.ai_greeting.as_deref().unwrap_or(DEFAULT_GREETING);
    let office_hours = practice
        .office_hours
        .as_ref()
        .map(|j| j.0.clone())
        .unwrap_or_else(OfficeHours::default);

    let mut prompt = format!(
        "You are an AI receptionist for {}. \
         Your role is to help patients schedule appointments and answer basic questions. ",
        practice.name
    );

    match practice.ai_tone {
        AiTone::Friendly => {
            prompt.push_str("Be very warm, friendly, and casual. ");
        }
        AiTone::Empathetic => {
            prompt.push_str("Be deeply understanding and patient. Many callers may be in pain. ");
        }
        // Casual cai na instrução padrão, junto com professional.
        AiTone::Professional | AiTone::Casual => {
            prompt.push_str("Be professional, concise, and polite. ");
        }
    }

    prompt.push_str("\n\nCORE RULES:\n");
    prompt.push_str("1. Verify if the user is a new or existing patient.\n");
    prompt.push_str(
        "2. If they want to book, use the 'checkAvailability' and 'bookAppointment' tools.\n",
    );
    prompt.push_str(&format!(
        "3. The office is open from {} to {}.\n",
        office_hours.start, office_hours.end
    ));

    // Cláusula de transferência, apenas se houver palavras cadastradas.
    if !practice.transfer_keywords.is_empty() {
        prompt.push_str(&format!(
            "4. If the user says any of these phrases: [{}], \
             or asks for a \"real person\", immediately transfer the call by \
             ending the conversation with the reason \"transfer\".\n",
            practice.transfer_keywords.join(", ")
        ));
    }

    // Cláusula de emergência, idem.
    if !practice.emergency_keywords.is_empty() {
        prompt.push_str(&format!(
            "5. If the user mentions [{}], treat it as an emergency and advise \
             them to call 911 if life-threatening, or transfer immediately.\n",
            practice.emergency_keywords.join(", ")
        ));
    }

    // Base de conhecimento, uma entrada por linha, na ordem de cadastro.
    if !knowledge.is_empty() {
        prompt.push_str("\nKNOWLEDGE BASE:\n");
        for entry in knowledge {
            match &entry.question {
                Some(question) => {
                    prompt.push_str(&format!("Q: {} A: {}\n", question, entry.content));
                }
                None => {
                    prompt.push_str(&format!("- {}\n", entry.content));
                }
            }
        }
    }

    prompt.push_str(&format!(
        "\nYour first message to the user is: \"{}\"",
        greeting
    ));

    prompt
}

fn resolve_voice_id(practice: &Practice) -> &'static str {
    let wanted = practice.ai_voice.as_deref().unwrap_or("jennifer");
    VOICE_MAP
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, id)| *id)
        .unwrap_or(DEFAULT_VOICE_ID)
}

// O objeto de assistente que a plataforma de voz espera: voz, modelo com
// o prompt de sistema e exatamente as duas tools chamáveis, além do
// callback autenticado por segredo compartilhado.
pub fn build_assistant_config(
    practice: &Practice,
    knowledge: &[KnowledgeEntry],
    server_url: &str,
    server_secret: &str,
) -> Value {
    let system_prompt = generate_system_prompt(practice, knowledge);
    let voice_id = resolve_voice_id(practice);

    json!({
        "name": practice.name,
        "voice": {
            "provider": VOICE_PROVIDER,
            "voiceId": voice_id,
            "stability": 0.5,
            "similarityBoost": 0.75
        },
        "model": {
            "provider": "openai",
            "model": "gpt-4-turbo",
            "messages": [
                { "role": "system", "content": system_prompt }
            ],
            "tools": [
                {
                    "type": "function",
                    "function": {
                        "name": "checkAvailability",
                        "description": "Check available appointment slots for a given time range.",
                        "parameters": {
                            "type": "object",
                            "properties": {
                                "startTime": { "type": "string", "description": "ISO 8601 start time" },
                                "endTime": { "type": "string", "description": "ISO 8601 end time" }
                            },
                            "required": ["startTime", "endTime"]
                        }
                    }
                },
                {
                    "type": "function",
                    "function": {
                        "name": "bookAppointment",
                        "description": "Book an appointment for the patient.",
                        "parameters": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string", "description": "Patient's full name" },
                                "email": { "type": "string", "description": "Patient's email address" },
                                "phone": { "type": "string", "description": "Patient's phone number for SMS confirmation" },
                                "startTime": { "type": "string", "description": "ISO 8601 start time needed" },
                                "timeZone": { "type": "string", "description": "Timezone (default UTC)" }
                            },
                            "required": ["name", "email", "phone", "startTime"]
                        }
                    }
                }
            ]
        },
        "serverUrl": server_url,
        "serverUrlSecret": server_secret
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn practice_base() -> Practice {
        Practice {
            id: Uuid::nil(),
            name: "Sorriso Dental".to_string(),
            phone_number: Some("+15550001111".to_string()),
            destination_number: Some("+15550002222".to_string()),
            ai_voice: None,
            ai_tone: AiTone::Professional,
            ai_greeting: None,
            transfer_keywords: vec![],
            emergency_keywords: vec![],
            office_hours: None,
            calcom_api_key: None,
            calcom_event_type_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn entry(question: Option<&str>, content: &str) -> KnowledgeEntry {
        KnowledgeEntry {
            id: Uuid::new_v4(),
            practice_id: Uuid::nil(),
            category: "general".to_string(),
            question: question.map(str::to_string),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn prompt_deterministico_para_mesmo_estado() {
        let practice = practice_base();
        let knowledge = vec![entry(Some("Do you take insurance?"), "Yes, most plans.")];

        let first = generate_system_prompt(&practice, &knowledge);
        let second = generate_system_prompt(&practice, &knowledge);
        assert_eq!(first, second);
    }

    #[test]
    fn clausula_de_transferencia_condicional() {
        let mut practice = practice_base();
        let sem_transferencia = generate_system_prompt(&practice, &[]);
        assert!(!sem_transferencia.contains("transfer the call"));

        practice.transfer_keywords = vec!["speak to someone".to_string()];
        let com_transferencia = generate_system_prompt(&practice, &[]);
        assert!(com_transferencia.contains("speak to someone"));
        assert!(com_transferencia.contains("transfer the call"));
    }

    #[test]
    fn clausula_de_emergencia_condicional() {
        let mut practice = practice_base();
        assert!(!generate_system_prompt(&practice, &[]).contains("emergency"));

        practice.emergency_keywords = vec!["severe pain".to_string(), "bleeding".to_string()];
        let prompt = generate_system_prompt(&practice, &[]);
        assert!(prompt.contains("severe pain, bleeding"));
        assert!(prompt.contains("911"));
    }

    #[test]
    fn tom_muda_a_instrucao() {
        let mut practice = practice_base();
        assert!(generate_system_prompt(&practice, &[]).contains("professional, concise"));

        practice.ai_tone = AiTone::Friendly;
        assert!(generate_system_prompt(&practice, &[]).contains("warm, friendly"));

        practice.ai_tone = AiTone::Empathetic;
        assert!(generate_system_prompt(&practice, &[]).contains("may be in pain"));

        // Casual usa a instrução padrão.
        practice.ai_tone = AiTone::Casual;
        assert!(generate_system_prompt(&practice, &[]).contains("professional, concise"));
    }

    #[test]
    fn horario_padrao_quando_nao_configurado() {
        let practice = practice_base();
        let prompt = generate_system_prompt(&practice, &[]);
        assert!(prompt.contains("open from 09:00 to 17:00"));
    }

    #[test]
    fn horario_configurado_aparece_no_prompt() {
        let mut practice = practice_base();
        practice.office_hours = Some(Json(OfficeHours {
            start: "08:30".to_string(),
            end: "18:00".to_string(),
        }));
        let prompt = generate_system_prompt(&practice, &[]);
        assert!(prompt.contains("open from 08:30 to 18:00"));
    }

    #[test]
    fn base_de_conhecimento_em_ordem() {
        let practice = practice_base();
        let knowledge = vec![
            entry(Some("Where do I park?"), "Free lot behind the building."),
            entry(None, "We are closed on national holidays."),
        ];

        let prompt = generate_system_prompt(&practice, &knowledge);
        assert!(prompt.contains("KNOWLEDGE BASE:"));

        let qa = prompt
            .find("Q: Where do I park? A: Free lot behind the building.")
            .expect("entrada com pergunta");
        let bullet = prompt
            .find("- We are closed on national holidays.")
            .expect("entrada sem pergunta");
        assert!(qa < bullet);
    }

    #[test]
    fn saudacao_literal_encerra_o_prompt() {
        let mut practice = practice_base();
        practice.ai_greeting = Some("Thanks for calling Sorriso Dental!".to_string());
        let prompt = generate_system_prompt(&practice, &[]);
        assert!(prompt
            .ends_with("Your first message to the user is: \"Thanks for calling Sorriso Dental!\""));
    }

    #[test]
    fn config_traz_exatamente_duas_tools() {
        let practice = practice_base();
        let config = build_assistant_config(&practice, &[], "https://api.example.com/api/webhooks/voice", "s3cr3t");

        let tools = config["model"]["tools"].as_array().expect("array de tools");
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["function"]["name"], "checkAvailability");
        assert_eq!(tools[1]["function"]["name"], "bookAppointment");

        assert_eq!(config["serverUrl"], "https://api.example.com/api/webhooks/voice");
        assert_eq!(config["serverUrlSecret"], "s3cr3t");
    }

    #[test]
    fn voz_com_fallback_fixo() {
        let mut practice = practice_base();
        let config = build_assistant_config(&practice, &[], "u", "s");
        assert_eq!(config["voice"]["voiceId"], DEFAULT_VOICE_ID);
        assert_eq!(config["voice"]["provider"], "11labs");

        practice.ai_voice = Some("mark".to_string());
        let config = build_assistant_config(&practice, &[], "u", "s");
        assert_eq!(config["voice"]["voiceId"], "TxGEqnHWrfWFTfGW9XjX");

        // Preferência desconhecida volta para o fallback.
        practice.ai_voice = Some("does-not-exist".to_string());
        let config = build_assistant_config(&practice, &[], "u", "s");
        assert_eq!(config["voice"]["voiceId"], DEFAULT_VOICE_ID);
    }
}
