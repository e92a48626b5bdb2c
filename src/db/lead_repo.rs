// src/db/lead_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{Lead, NewLead},
};

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Guarda explícita do "no máximo um lead automático por chamada".
    // O índice único parcial em leads(call_id) cobre a corrida entre
    // reentregas concorrentes; esta checagem cobre o caminho comum.
    pub async fn exists_for_call(&self, call_id: Uuid) -> Result<bool, AppError> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM leads WHERE call_id = $1 LIMIT 1")
                .bind(call_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.is_some())
    }

    pub async fn create(&self, lead: &NewLead) -> Result<Lead, AppError> {
        let saved = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (practice_id, call_id, patient_id, status, priority, notes, lead_source)
            VALUES ($1, $2, $3, 'new', 'medium', $4, $5)
            RETURNING *
            "#,
        )
        .bind(lead.practice_id)
        .bind(lead.call_id)
        .bind(lead.patient_id)
        .bind(&lead.notes)
        .bind(&lead.lead_source)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}
