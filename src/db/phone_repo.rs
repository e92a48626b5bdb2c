// src/db/phone_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{practice::Practice, telephony::PhoneNumber},
};

#[derive(Clone)]
pub struct PhoneNumberRepository {
    pool: PgPool,
}

impl PhoneNumberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca o número provisionado pelo próprio número (E.164).
    // Usado pelo webhook de SMS para achar o consultório destinatário.
    pub async fn find_by_number(&self, number: &str) -> Result<Option<PhoneNumber>, AppError> {
        let phone = sqlx::query_as::<_, PhoneNumber>(
            "SELECT * FROM phone_numbers WHERE phone_number = $1 LIMIT 1",
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(phone)
    }

    // Resolve o consultório a partir do assistant id da plataforma de voz.
    // Os tool calls chegam com o assistantId da chamada, não com o número.
    pub async fn find_practice_by_assistant(
        &self,
        assistant_id: &str,
    ) -> Result<Option<Practice>, AppError> {
        let practice = sqlx::query_as::<_, Practice>(
            r#"
            SELECT p.*
            FROM practices p
            INNER JOIN phone_numbers n ON n.practice_id = p.id
            WHERE n.voice_assistant_id = $1
            LIMIT 1
            "#,
        )
        .bind(assistant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(practice)
    }

    // O número primário do consultório, remetente dos SMS de saída.
    pub async fn find_primary_for_practice(
        &self,
        practice_id: Uuid,
    ) -> Result<Option<PhoneNumber>, AppError> {
        let phone = sqlx::query_as::<_, PhoneNumber>(
            "SELECT * FROM phone_numbers WHERE practice_id = $1 AND is_primary = TRUE LIMIT 1",
        )
        .bind(practice_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(phone)
    }
}
