//! Reservation repository for database operations.
//!
//! Bookings are written inside a transaction that first locks the room row
//! with `SELECT ... FOR UPDATE`, so two bookings for the same room run their
//! overlap check and insert one after the other.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use domain::models::ReservationStatus;

use crate::entities::{ReservationDetailsEntity, ReservationEntity, RoomEntity};
use crate::metrics::QueryTimer;
use crate::repositories::room::ROOM_COLUMNS;

const RESERVATION_COLUMNS: &str = "id, date_in, date_out, number_of_guests, status, total_price, \
                                   client_id, room_id, created_at, updated_at";

const DETAILS_SELECT: &str = r#"
    SELECT r.id, r.date_in, r.date_out, r.number_of_guests, r.status, r.total_price,
           r.client_id, r.room_id, r.created_at, r.updated_at,
           c.name AS client_name, c.lastname AS client_lastname, c.user_id AS client_user_id,
           rm.number AS room_number, rm.type AS room_type, rm.price_for_night AS price_per_night
    FROM reservations r
    JOIN clients c ON c.id = r.client_id
    JOIN rooms rm ON rm.id = r.room_id
"#;

/// Values for a reservation row, used for both insert and full update.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub date_in: NaiveDate,
    pub date_out: NaiveDate,
    pub number_of_guests: i32,
    pub status: ReservationStatus,
    pub total_price: Decimal,
    pub client_id: i64,
    pub room_id: i64,
}

/// Repository for reservations.
#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A reservation with its client and room fields.
    pub async fn find_details(&self, id: i64) -> Result<Option<ReservationDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_reservation_details");
        let sql = format!("{} WHERE r.id = $1", DETAILS_SELECT);
        let result = sqlx::query_as::<_, ReservationDetailsEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Every reservation, newest stay first.
    pub async fn list_details(&self) -> Result<Vec<ReservationDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_reservation_details");
        let sql = format!("{} ORDER BY r.date_in DESC, r.id DESC", DETAILS_SELECT);
        let result = sqlx::query_as::<_, ReservationDetailsEntity>(&sql)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Reservations of the client profile linked to `user_id`. Empty when the
    /// account has no profile.
    pub async fn list_details_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ReservationDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_reservation_details_for_user");
        let sql = format!(
            "{} WHERE c.user_id = $1 ORDER BY r.date_in DESC, r.id DESC",
            DETAILS_SELECT
        );
        let result = sqlx::query_as::<_, ReservationDetailsEntity>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_reservation");
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Locks the room row until the surrounding transaction ends.
    pub async fn lock_room(conn: &mut PgConnection, room_id: i64) -> Result<Option<RoomEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_room");
        let sql = format!("SELECT {} FROM rooms WHERE id = $1 FOR UPDATE", ROOM_COLUMNS);
        let result = sqlx::query_as::<_, RoomEntity>(&sql)
            .bind(room_id)
            .fetch_optional(&mut *conn)
            .await;
        timer.record();
        result
    }

    /// Locks a reservation row until the surrounding transaction ends.
    pub async fn lock(conn: &mut PgConnection, id: i64) -> Result<Option<ReservationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_reservation");
        let sql = format!(
            "SELECT {} FROM reservations WHERE id = $1 FOR UPDATE",
            RESERVATION_COLUMNS
        );
        let result = sqlx::query_as::<_, ReservationEntity>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await;
        timer.record();
        result
    }

    pub async fn client_exists(conn: &mut PgConnection, client_id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("reservation_client_exists");
        let result = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
            .bind(client_id)
            .fetch_one(&mut *conn)
            .await;
        timer.record();
        result
    }

    /// Whether a pending or confirmed reservation on the room intersects
    /// `[date_in, date_out)`, ignoring `exclude_id`.
    pub async fn has_overlap(
        conn: &mut PgConnection,
        room_id: i64,
        date_in: NaiveDate,
        date_out: NaiveDate,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("reservation_has_overlap");
        let active: Vec<&str> = ReservationStatus::ACTIVE.iter().map(|s| s.as_str()).collect();
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reservations
                WHERE room_id = $1
                  AND status = ANY($2)
                  AND date_in < $4
                  AND date_out > $3
                  AND ($5::BIGINT IS NULL OR id <> $5)
            )
            "#,
        )
        .bind(room_id)
        .bind(&active)
        .bind(date_in)
        .bind(date_out)
        .bind(exclude_id)
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Inserts a reservation and returns its id.
    pub async fn insert(conn: &mut PgConnection, reservation: &NewReservation) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("create_reservation");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO reservations (date_in, date_out, number_of_guests, status, total_price,
                                      client_id, room_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(reservation.date_in)
        .bind(reservation.date_out)
        .bind(reservation.number_of_guests)
        .bind(reservation.status.as_str())
        .bind(reservation.total_price)
        .bind(reservation.client_id)
        .bind(reservation.room_id)
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Overwrites every editable column of a reservation.
    pub async fn update(
        conn: &mut PgConnection,
        id: i64,
        reservation: &NewReservation,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("update_reservation");
        sqlx::query(
            r#"
            UPDATE reservations
            SET date_in = $2, date_out = $3, number_of_guests = $4, status = $5,
                total_price = $6, client_id = $7, room_id = $8, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(reservation.date_in)
        .bind(reservation.date_out)
        .bind(reservation.number_of_guests)
        .bind(reservation.status.as_str())
        .bind(reservation.total_price)
        .bind(reservation.client_id)
        .bind(reservation.room_id)
        .execute(&mut *conn)
        .await?;
        timer.record();
        Ok(())
    }
}
