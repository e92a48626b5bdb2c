// src/services/call_service.rs
//
// Reconciliação de fim de chamada: persiste o registro da chamada e
// decide se ela virou agendamento ou deve virar um lead de retorno.

use uuid::Uuid;

use crate::{
    common::{error::AppError, phone},
    db::{BookingRepository, CallRepository, LeadRepository, PatientRepository},
    models::{
        call::NewCall,
        events::CallPayload,
        lead::NewLead,
    },
};

// Chamadas até este limiar são descartes (engano, desligou na saudação)
// e nunca viram lead.
const MIN_LEAD_DURATION_SECS: i32 = 10;

const LEAD_SOURCE_PHONE: &str = "phone_call";

// =============================================================================
//  REGRA DE DECISÃO (pura)
// =============================================================================

// Agendamento existente suprime o lead; chamada curta também.
pub fn should_create_lead(has_booking: bool, duration_seconds: i32) -> bool {
    !has_booking && duration_seconds > MIN_LEAD_DURATION_SECS
}

// Notas do lead a partir do resumo da análise, com texto fixo quando a
// plataforma não mandou resumo.
pub fn lead_notes(summary: Option<&str>) -> String {
    format!(
        "Auto-generated from call analysis: {}",
        summary.unwrap_or("No summary available.")
    )
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Clone)]
pub struct CallService {
    call_repo: CallRepository,
    booking_repo: BookingRepository,
    lead_repo: LeadRepository,
    patient_repo: PatientRepository,
}

impl CallService {
    pub fn new(
        call_repo: CallRepository,
        booking_repo: BookingRepository,
        lead_repo: LeadRepository,
        patient_repo: PatientRepository,
    ) -> Self {
        Self {
            call_repo,
            booking_repo,
            lead_repo,
            patient_repo,
        }
    }

    // Relatório de fim de chamada.
    //
    // Só a persistência da chamada propaga erro (a plataforma reentrega o
    // webhook); o vínculo com o agendamento e o lead são registrados e
    // engolidos em caso de falha. Reentregas do mesmo relatório caem no
    // upsert e na guarda de lead, sem duplicar nada.
    pub async fn handle_end_of_call(
        &self,
        call: &CallPayload,
        practice_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let Some(voice_call_id) = call.id.as_deref() else {
            tracing::warn!("Relatório de fim de chamada sem id; ignorado");
            return Ok(());
        };

        let caller_number = call
            .customer
            .as_ref()
            .and_then(|c| c.number.as_deref())
            .map(phone::normalize)
            .filter(|n| !n.is_empty());

        let duration_seconds = call.duration_seconds.unwrap_or(0.0).floor() as i32;
        let summary = call.analysis.as_ref().and_then(|a| a.summary.clone());

        let new_call = NewCall {
            practice_id,
            voice_call_id: voice_call_id.to_string(),
            caller_number: caller_number.clone(),
            status: call.status.clone(),
            duration_seconds,
            transcript: call.transcript.clone(),
            summary: summary.clone(),
            recording_url: call.recording_url.clone(),
            started_at: call.started_at,
        };

        // Escrita crítica: se falhar, o webhook responde erro e a
        // plataforma tenta de novo.
        let saved = self.call_repo.upsert(&new_call).await?;

        tracing::info!(
            "Chamada {} persistida ({}s, consultório {:?})",
            voice_call_id,
            duration_seconds,
            practice_id
        );

        // Fase dois da correlação: agendamento feito durante a chamada.
        let booking = self
            .booking_repo
            .find_by_voice_call_id(voice_call_id)
            .await?;

        if let Some(booking) = booking {
            if booking.call_id.is_none() {
                if let Err(e) = self.booking_repo.link_call(booking.id, saved.id).await {
                    tracing::error!("Falha ao vincular agendamento à chamada: {}", e);
                }
            }
            // Chamada convertida: nada de lead.
            return Ok(());
        }

        if !should_create_lead(false, duration_seconds) {
            return Ok(());
        }

        // Guarda explícita: no máximo um lead automático por chamada,
        // mesmo com o relatório reentregue.
        if self.lead_repo.exists_for_call(saved.id).await? {
            return Ok(());
        }

        let patient_id = match &caller_number {
            Some(number) => {
                let patient = match practice_id {
                    Some(pid) => self.patient_repo.find_by_phone(pid, number).await?,
                    None => self.patient_repo.find_by_phone_global(number).await?,
                };
                patient.map(|p| p.id)
            }
            None => None,
        };

        let lead = NewLead {
            practice_id: saved.practice_id,
            call_id: Some(saved.id),
            patient_id,
            notes: lead_notes(summary.as_deref()),
            lead_source: LEAD_SOURCE_PHONE.to_string(),
        };

        match self.lead_repo.create(&lead).await {
            Ok(_) => {
                tracing::info!("Lead criado para a chamada {}", voice_call_id);
            }
            Err(AppError::DatabaseError(e))
                if e.as_database_error()
                    .map(|db| db.is_unique_violation())
                    .unwrap_or(false) =>
            {
                // Reentrega concorrente perdeu a corrida para o índice
                // único; o lead já existe.
                tracing::debug!("Lead já existia para a chamada {}", voice_call_id);
            }
            Err(e) => {
                // Lead é não-crítico: não falha o webhook.
                tracing::error!("Falha ao criar lead da chamada {}: {}", voice_call_id, e);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agendamento_suprime_lead() {
        assert!(!should_create_lead(true, 45));
        assert!(!should_create_lead(true, 11));
    }

    #[test]
    fn chamada_curta_suprime_lead() {
        assert!(!should_create_lead(false, 5));
        assert!(!should_create_lead(false, 0));
        // O limiar é estrito: exatamente 10 segundos ainda é descarte.
        assert!(!should_create_lead(false, 10));
    }

    #[test]
    fn chamada_substantiva_sem_agendamento_vira_lead() {
        assert!(should_create_lead(false, 45));
        assert!(should_create_lead(false, 11));
    }

    #[test]
    fn notas_carregam_o_resumo() {
        let notes = lead_notes(Some("Patient asked about pricing but did not book."));
        assert_eq!(
            notes,
            "Auto-generated from call analysis: Patient asked about pricing but did not book."
        );
    }

    #[test]
    fn notas_com_texto_fixo_sem_resumo() {
        assert_eq!(
            lead_notes(None),
            "Auto-generated from call analysis: No summary available."
        );
    }
}
