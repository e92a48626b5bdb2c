// src/db/call_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::call::{Call, NewCall},
};

#[derive(Clone)]
pub struct CallRepository {
    pool: PgPool,
}

impl CallRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Upsert idempotente pela chave natural `voice_call_id`.
    //
    // Reentregas do relatório de fim de chamada atualizam a linha existente
    // em vez de criar uma segunda. COALESCE preserva o consultório e o
    // número do chamador já conhecidos caso a reentrega venha sem eles.
    pub async fn upsert(&self, call: &NewCall) -> Result<Call, AppError> {
        let saved = sqlx::query_as::<_, Call>(
            r#"
            INSERT INTO calls (
                practice_id, voice_call_id, caller_number, status,
                duration_seconds, transcript, summary, recording_url, started_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (voice_call_id) DO UPDATE SET
                practice_id      = COALESCE(EXCLUDED.practice_id, calls.practice_id),
                caller_number    = COALESCE(EXCLUDED.caller_number, calls.caller_number),
                status           = EXCLUDED.status,
                duration_seconds = EXCLUDED.duration_seconds,
                transcript       = COALESCE(EXCLUDED.transcript, calls.transcript),
                summary          = COALESCE(EXCLUDED.summary, calls.summary),
                recording_url    = COALESCE(EXCLUDED.recording_url, calls.recording_url),
                started_at       = COALESCE(EXCLUDED.started_at, calls.started_at),
                updated_at       = NOW()
            RETURNING *
            "#,
        )
        .bind(call.practice_id)
        .bind(&call.voice_call_id)
        .bind(&call.caller_number)
        .bind(&call.status)
        .bind(call.duration_seconds)
        .bind(&call.transcript)
        .bind(&call.summary)
        .bind(&call.recording_url)
        .bind(call.started_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}
