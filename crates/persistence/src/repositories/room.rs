//! Room repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use domain::models::{AvailabilityCriteria, ReservationStatus, Room, RoomStatus, RoomType};

use crate::entities::RoomEntity;
use crate::metrics::QueryTimer;

pub(crate) const ROOM_COLUMNS: &str =
    "id, number, type, price_for_night, is_reserved, status, description, capacity, amenities";

/// Values for a room row, used for both insert and full update.
#[derive(Debug, Clone)]
pub struct NewRoom<'a> {
    pub number: i32,
    pub room_type: RoomType,
    pub price_for_night: Decimal,
    pub is_reserved: bool,
    pub status: RoomStatus,
    pub description: &'a str,
    pub capacity: i32,
    pub amenities: &'a serde_json::Value,
}

impl<'a> From<&'a Room> for NewRoom<'a> {
    fn from(r: &'a Room) -> Self {
        Self {
            number: r.number,
            room_type: r.room_type,
            price_for_night: r.price_for_night,
            is_reserved: r.is_reserved,
            status: r.status,
            description: &r.description,
            capacity: r.capacity,
            amenities: &r.amenities,
        }
    }
}

/// Repository for room inventory.
#[derive(Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a room by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<RoomEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_room_by_id");
        let sql = format!("SELECT {} FROM rooms WHERE id = $1", ROOM_COLUMNS);
        let result = sqlx::query_as::<_, RoomEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// All rooms ordered by room number.
    pub async fn list(&self) -> Result<Vec<RoomEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_rooms");
        let sql = format!("SELECT {} FROM rooms ORDER BY number, id", ROOM_COLUMNS);
        let result = sqlx::query_as::<_, RoomEntity>(&sql)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn create(&self, room: &NewRoom<'_>) -> Result<RoomEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_room");
        let sql = format!(
            r#"
            INSERT INTO rooms (number, type, price_for_night, is_reserved, status, description,
                               capacity, amenities)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            ROOM_COLUMNS
        );
        let result = sqlx::query_as::<_, RoomEntity>(&sql)
            .bind(room.number)
            .bind(room.room_type.as_str())
            .bind(room.price_for_night)
            .bind(room.is_reserved)
            .bind(room.status.as_str())
            .bind(room.description)
            .bind(room.capacity)
            .bind(room.amenities)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Overwrites every column of a room.
    pub async fn update(&self, id: i64, room: &NewRoom<'_>) -> Result<Option<RoomEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_room");
        let sql = format!(
            r#"
            UPDATE rooms
            SET number = $2, type = $3, price_for_night = $4, is_reserved = $5, status = $6,
                description = $7, capacity = $8, amenities = $9
            WHERE id = $1
            RETURNING {}
            "#,
            ROOM_COLUMNS
        );
        let result = sqlx::query_as::<_, RoomEntity>(&sql)
            .bind(id)
            .bind(room.number)
            .bind(room.room_type.as_str())
            .bind(room.price_for_night)
            .bind(room.is_reserved)
            .bind(room.status.as_str())
            .bind(room.description)
            .bind(room.capacity)
            .bind(room.amenities)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Deletes a room; its reservations cascade.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_room");
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Rooms matching the search filter with no pending or confirmed stay
    /// overlapping `[date_in, date_out)`.
    pub async fn find_available(
        &self,
        criteria: &AvailabilityCriteria,
    ) -> Result<Vec<RoomEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_available_rooms");
        let sql = r#"
            SELECT r.id, r.number, r.type, r.price_for_night, r.is_reserved, r.status,
                   r.description, r.capacity, r.amenities
            FROM rooms r
            WHERE r.status = $1
              AND r.capacity >= $2
              AND ($3::TEXT IS NULL OR r.type = $3)
              AND NOT EXISTS (
                  SELECT 1 FROM reservations res
                  WHERE res.room_id = r.id
                    AND res.status = ANY($4)
                    AND res.date_in < $6
                    AND res.date_out > $5
              )
            ORDER BY r.number, r.id
            "#;
        let active: Vec<&str> = ReservationStatus::ACTIVE.iter().map(|s| s.as_str()).collect();
        let result = sqlx::query_as::<_, RoomEntity>(sql)
            .bind(RoomStatus::Available.as_str())
            .bind(criteria.guests)
            .bind(criteria.room_type.map(|t| t.as_str()))
            .bind(&active)
            .bind(criteria.date_in)
            .bind(criteria.date_out)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }
}
