// src/db/practice_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::practice::{KnowledgeEntry, Practice},
};

// O repositório de consultórios, responsável pelas tabelas 'practices'
// e 'knowledge_base'.
#[derive(Clone)]
pub struct PracticeRepository {
    pool: PgPool,
}

impl PracticeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Resolve o consultório dono de um número (destino OU encaminhamento).
    // O número já deve chegar normalizado em E.164.
    // Nenhum resultado é um desfecho válido, não um erro.
    pub async fn find_by_number(&self, number: &str) -> Result<Option<Practice>, AppError> {
        let practice = sqlx::query_as::<_, Practice>(
            "SELECT * FROM practices WHERE destination_number = $1 OR phone_number = $1 LIMIT 1",
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(practice)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Practice>, AppError> {
        let practice = sqlx::query_as::<_, Practice>("SELECT * FROM practices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(practice)
    }

    // Entradas da base de conhecimento, na ordem de cadastro.
    pub async fn knowledge_for_practice(
        &self,
        practice_id: Uuid,
    ) -> Result<Vec<KnowledgeEntry>, AppError> {
        let entries = sqlx::query_as::<_, KnowledgeEntry>(
            "SELECT * FROM knowledge_base WHERE practice_id = $1 ORDER BY created_at ASC",
        )
        .bind(practice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
