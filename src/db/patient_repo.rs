// src/db/patient_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::patient::{Patient, PatientType},
};

#[derive(Clone)]
pub struct PatientRepository {
    pool: PgPool,
}

impl PatientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Paciente por telefone dentro de um consultório (fluxo de SMS).
    pub async fn find_by_phone(
        &self,
        practice_id: Uuid,
        phone: &str,
    ) -> Result<Option<Patient>, AppError> {
        let patient = sqlx::query_as::<_, Patient>(
            "SELECT * FROM patients WHERE practice_id = $1 AND phone = $2 LIMIT 1",
        )
        .bind(practice_id)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(patient)
    }

    // Paciente por telefone sem escopo de consultório (reconciliação:
    // a chamada pode chegar sem consultório resolvido).
    pub async fn find_by_phone_global(&self, phone: &str) -> Result<Option<Patient>, AppError> {
        let patient =
            sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE phone = $1 LIMIT 1")
                .bind(phone)
                .fetch_optional(&self.pool)
                .await?;

        Ok(patient)
    }

    // Busca por e-mail, usada no upsert do agendamento.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, AppError> {
        let patient =
            sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE email = $1 LIMIT 1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(patient)
    }

    pub async fn create(
        &self,
        practice_id: Uuid,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
        phone: &str,
        patient_type: PatientType,
        source: &str,
    ) -> Result<Patient, AppError> {
        let patient = sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO patients (practice_id, first_name, last_name, email, phone, patient_type, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(practice_id)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(phone)
        .bind(patient_type)
        .bind(source)
        .fetch_one(&self.pool)
        .await?;

        Ok(patient)
    }
}
