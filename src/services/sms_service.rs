// src/services/sms_service.rs
//
// SMS de entrada (palavras-chave CONFIRM/CANCEL contra o último
// agendamento do remetente) e envio de SMS de saída com trilha de
// auditoria em `messages`.

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    clients::SmsTransport,
    common::{error::AppError, phone},
    db::{
        BookingRepository, LeadRepository, MessageRepository, PatientRepository,
        PhoneNumberRepository,
    },
    models::{
        booking::{Booking, BookingStatus},
        lead::NewLead,
        patient::Patient,
        practice::Practice,
        telephony::{MessageStatus, NewOutboundMessage, PhoneNumber},
    },
};

const SMS_PROVIDER: &str = "twilio";

const CONFIRM_ACK: &str = "Great! Your appointment has been confirmed. See you then!";
const CANCEL_ACK: &str = "We have cancelled your appointment as requested. Someone from our \
                          office will call you shortly to reschedule. Have a nice day!";

// =============================================================================
//  PALAVRAS-CHAVE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsKeyword {
    Confirm,
    Cancel,
}

impl SmsKeyword {
    // Busca por substring no corpo em maiúsculas. Quando as duas palavras
    // aparecem na mesma mensagem, CANCEL vence: confirmar em silêncio um
    // pedido de cancelamento é o pior desfecho.
    pub fn parse(body: &str) -> Option<Self> {
        let normalized = body.trim().to_uppercase();
        if normalized.contains("CANCEL") {
            Some(SmsKeyword::Cancel)
        } else if normalized.contains("CONFIRM") {
            Some(SmsKeyword::Confirm)
        } else {
            None
        }
    }
}

// Texto do SMS de confirmação de agendamento.
pub fn booking_confirmation_body(practice: &Practice, patient: &Patient, booking: &Booking) -> String {
    format!(
        "Hi {}! Your appointment at {} is confirmed for {}. \
         Reply CONFIRM to confirm or CANCEL to reschedule.",
        patient.first_name,
        practice.name,
        booking.start_time.format("%Y-%m-%d at %H:%M"),
    )
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Clone)]
pub struct SmsService {
    phone_repo: PhoneNumberRepository,
    patient_repo: PatientRepository,
    booking_repo: BookingRepository,
    lead_repo: LeadRepository,
    message_repo: MessageRepository,
    transport: Arc<dyn SmsTransport>,
}

impl SmsService {
    pub fn new(
        phone_repo: PhoneNumberRepository,
        patient_repo: PatientRepository,
        booking_repo: BookingRepository,
        lead_repo: LeadRepository,
        message_repo: MessageRepository,
        transport: Arc<dyn SmsTransport>,
    ) -> Self {
        Self {
            phone_repo,
            patient_repo,
            booking_repo,
            lead_repo,
            message_repo,
            transport,
        }
    }

    // Webhook de SMS entrante.
    //
    // Ordem fixa: resolver o destinatário, registrar a mensagem (a
    // auditoria não pode se perder se o tratamento falhar) e só então
    // tratar palavras-chave. Remetente sem paciente ou sem agendamento é
    // um no-op silencioso.
    pub async fn handle_inbound(&self, from: &str, to: &str, body: &str) -> Result<(), AppError> {
        let from = phone::normalize(from);
        let to = phone::normalize(to);

        let Some(practice_phone) = self.phone_repo.find_by_number(&to).await? else {
            tracing::warn!("SMS para número desconhecido: {}", to);
            return Err(AppError::UnknownNumber);
        };

        if let Err(e) = self
            .message_repo
            .log_inbound(practice_phone.practice_id, &from, &to, body, SMS_PROVIDER)
            .await
        {
            // Auditoria é não-crítica: registra a falha e segue.
            tracing::error!("Falha ao registrar SMS entrante: {}", e);
        }

        match SmsKeyword::parse(body) {
            Some(SmsKeyword::Confirm) => self.handle_confirm(&practice_phone, &from).await,
            Some(SmsKeyword::Cancel) => self.handle_cancel(&practice_phone, &from).await,
            None => Ok(()),
        }
    }

    // CONFIRM: o agendamento já está confirmado; só reconhecemos.
    async fn handle_confirm(
        &self,
        practice_phone: &PhoneNumber,
        patient_phone: &str,
    ) -> Result<(), AppError> {
        let Some(patient) = self
            .patient_repo
            .find_by_phone(practice_phone.practice_id, patient_phone)
            .await?
        else {
            return Ok(());
        };

        let Some(booking) = self
            .booking_repo
            .latest_confirmed_for_patient(patient.id)
            .await?
        else {
            return Ok(());
        };

        self.send_and_log(
            practice_phone.practice_id,
            Some(patient.id),
            &practice_phone.phone_number,
            patient_phone,
            CONFIRM_ACK,
            Some(("booking", booking.id)),
        )
        .await;

        Ok(())
    }

    // CANCEL: cancela o último agendamento confirmado, avisa o paciente
    // e cria um lead para a recepção retornar a ligação.
    async fn handle_cancel(
        &self,
        practice_phone: &PhoneNumber,
        patient_phone: &str,
    ) -> Result<(), AppError> {
        let Some(patient) = self
            .patient_repo
            .find_by_phone(practice_phone.practice_id, patient_phone)
            .await?
        else {
            return Ok(());
        };

        let Some(booking) = self
            .booking_repo
            .latest_confirmed_for_patient(patient.id)
            .await?
        else {
            return Ok(());
        };

        self.booking_repo
            .set_status(booking.id, BookingStatus::Cancelled)
            .await?;

        self.send_and_log(
            practice_phone.practice_id,
            Some(patient.id),
            &practice_phone.phone_number,
            patient_phone,
            CANCEL_ACK,
            Some(("booking", booking.id)),
        )
        .await;

        let lead = NewLead {
            practice_id: Some(practice_phone.practice_id),
            call_id: None,
            patient_id: Some(patient.id),
            notes: format!("SMS Cancellation follow-up needed for {}", patient_phone),
            lead_source: "sms".to_string(),
        };

        if let Err(e) = self.lead_repo.create(&lead).await {
            // Lead de acompanhamento é não-crítico.
            tracing::error!("Falha ao criar lead de cancelamento: {}", e);
        }

        Ok(())
    }

    // SMS de confirmação após um agendamento criado durante a chamada.
    // Qualquer falha aqui é registrada e engolida: o agendamento já existe.
    pub async fn send_booking_confirmation(
        &self,
        practice: &Practice,
        patient: &Patient,
        booking: &Booking,
    ) {
        let primary = match self.phone_repo.find_primary_for_practice(practice.id).await {
            Ok(Some(primary)) => primary,
            Ok(None) => {
                tracing::warn!(
                    "Consultório {} sem número primário; confirmação por SMS não enviada",
                    practice.id
                );
                return;
            }
            Err(e) => {
                tracing::error!("Falha ao buscar número primário: {}", e);
                return;
            }
        };

        let body = booking_confirmation_body(practice, patient, booking);
        self.send_and_log(
            practice.id,
            Some(patient.id),
            &primary.phone_number,
            &patient.phone,
            &body,
            Some(("booking", booking.id)),
        )
        .await;
    }

    // Envia pelo provedor e registra o desfecho (enviado ou falho) na
    // trilha de auditoria. Nunca propaga erro: o envio de SMS jamais
    // derruba a operação que o disparou.
    pub async fn send_and_log(
        &self,
        practice_id: Uuid,
        patient_id: Option<Uuid>,
        from: &str,
        to: &str,
        body: &str,
        related: Option<(&str, Uuid)>,
    ) {
        let (status, provider_message_id, error_message) =
            match self.transport.send(from, to, body).await {
                Ok(sid) => (MessageStatus::Sent, Some(sid), None),
                Err(e) => {
                    tracing::error!("Falha no envio de SMS para {}: {}", to, e);
                    (MessageStatus::Failed, None, Some(e.to_string()))
                }
            };

        let log = NewOutboundMessage {
            practice_id,
            patient_id,
            from_address: from.to_string(),
            to_address: to.to_string(),
            body: body.to_string(),
            provider: SMS_PROVIDER.to_string(),
            provider_message_id,
            status,
            error_message,
            related_type: related.map(|(kind, _)| kind.to_string()),
            related_id: related.map(|(_, id)| id),
        };

        if let Err(e) = self.message_repo.log_outbound(&log).await {
            tracing::error!("Falha ao registrar SMS de saída: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_por_substring() {
        assert_eq!(
            SmsKeyword::parse("please confirm my appointment"),
            Some(SmsKeyword::Confirm)
        );
        assert_eq!(SmsKeyword::parse("CONFIRM"), Some(SmsKeyword::Confirm));
    }

    #[test]
    fn cancel_por_substring() {
        assert_eq!(
            SmsKeyword::parse("please CANCEL my appointment"),
            Some(SmsKeyword::Cancel)
        );
        assert_eq!(SmsKeyword::parse("  cancelar  "), Some(SmsKeyword::Cancel));
    }

    #[test]
    fn cancel_vence_quando_ambos_aparecem() {
        assert_eq!(
            SmsKeyword::parse("CONFIRM? no, CANCEL it"),
            Some(SmsKeyword::Cancel)
        );
    }

    #[test]
    fn sem_palavra_chave() {
        assert_eq!(SmsKeyword::parse("what time is my appointment?"), None);
        assert_eq!(SmsKeyword::parse(""), None);
    }
}
