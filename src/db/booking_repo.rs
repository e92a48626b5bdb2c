// src/db/booking_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::booking::{Booking, BookingStatus, NewBooking},
};

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, booking: &NewBooking) -> Result<Booking, AppError> {
        let saved = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                practice_id, patient_id, voice_call_id,
                start_time, end_time, status, appointment_type, calendar_event_id
            )
            VALUES ($1, $2, $3, $4, $5, 'confirmed', $6, $7)
            RETURNING *
            "#,
        )
        .bind(booking.practice_id)
        .bind(booking.patient_id)
        .bind(&booking.voice_call_id)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(&booking.appointment_type)
        .bind(&booking.calendar_event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    // Correlação pelo id externo da chamada (a FK interna ainda pode
    // não existir no momento do agendamento).
    pub async fn find_by_voice_call_id(
        &self,
        voice_call_id: &str,
    ) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE voice_call_id = $1 LIMIT 1",
        )
        .bind(voice_call_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    // Segunda fase da correlação: grava a FK interna quando a linha
    // de `calls` passa a existir.
    pub async fn link_call(&self, booking_id: Uuid, call_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE bookings SET call_id = $1, updated_at = NOW() WHERE id = $2")
            .bind(call_id)
            .bind(booking_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // O agendamento confirmado mais recente do paciente (fluxo de SMS).
    pub async fn latest_confirmed_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE patient_id = $1 AND status = 'confirmed'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn set_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE bookings SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status)
            .bind(booking_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
