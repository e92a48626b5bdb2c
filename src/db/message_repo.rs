// src/db/message_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::telephony::{Message, NewOutboundMessage},
};

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Registra o SMS recebido ANTES de qualquer tratamento de palavra-chave,
    // para a auditoria não se perder se o tratamento falhar.
    pub async fn log_inbound(
        &self,
        practice_id: Uuid,
        from_address: &str,
        to_address: &str,
        body: &str,
        provider: &str,
    ) -> Result<Message, AppError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (
                practice_id, message_type, direction, from_address, to_address,
                body, provider, status, received_at
            )
            VALUES ($1, 'sms', 'inbound', $2, $3, $4, $5, 'received', NOW())
            RETURNING *
            "#,
        )
        .bind(practice_id)
        .bind(from_address)
        .bind(to_address)
        .bind(body)
        .bind(provider)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    pub async fn log_outbound(&self, msg: &NewOutboundMessage) -> Result<Message, AppError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (
                practice_id, patient_id, message_type, direction, from_address,
                to_address, body, provider, provider_message_id, status,
                error_message, related_type, related_id, sent_at
            )
            VALUES (
                $1, $2, 'sms', 'outbound', $3, $4, $5, $6, $7, $8, $9, $10, $11,
                CASE WHEN $8 = 'sent'::message_status THEN NOW() ELSE NULL END
            )
            RETURNING *
            "#,
        )
        .bind(msg.practice_id)
        .bind(msg.patient_id)
        .bind(&msg.from_address)
        .bind(&msg.to_address)
        .bind(&msg.body)
        .bind(&msg.provider)
        .bind(&msg.provider_message_id)
        .bind(msg.status)
        .bind(&msg.error_message)
        .bind(&msg.related_type)
        .bind(msg.related_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }
}
