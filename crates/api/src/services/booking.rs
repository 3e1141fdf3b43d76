//! Reservation booking service.
//!
//! Create and update run the whole check-then-write inside one transaction
//! that holds a row lock on the target room. Competing bookings for the same
//! room queue on that lock, so the overlap lookup always sees committed
//! neighbours.

use domain::models::reservation::{
    validate_total_price, CreateReservationRequest, ReservationResponse, UpdateReservationRequest,
};
use domain::models::{Reservation, ReservationDetails, Room};
use domain::services::reservation_rules::{
    check_dates_and_guests, check_room_fit, needs_overlap_check, resolve_total_price,
    BookingCandidate,
};
use domain::FieldErrors;
use persistence::repositories::{NewReservation, ReservationRepository};
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extractors::user_auth::PERMISSION_DENIED;
use crate::middleware::metrics::record_reservation;
use crate::middleware::UserAuth;

pub const RESERVATION_NOT_FOUND: &str = "Reservation not found";

fn missing_object(id: i64) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

/// A reservation write after merging the request over any stored row.
#[derive(Debug, Clone)]
struct Booking {
    candidate: BookingCandidate,
    client_id: i64,
    room_id: i64,
    supplied_price: Option<rust_decimal::Decimal>,
}

impl Booking {
    fn from_create(req: CreateReservationRequest) -> Self {
        Self {
            candidate: BookingCandidate {
                date_in: req.date_in,
                date_out: req.date_out,
                number_of_guests: req.number_of_guests,
                status: req.status,
            },
            client_id: req.client,
            room_id: req.room,
            supplied_price: req.total_price,
        }
    }

    fn from_update(existing: &Reservation, update: UpdateReservationRequest) -> Self {
        Self {
            candidate: BookingCandidate {
                date_in: update.date_in.unwrap_or(existing.date_in),
                date_out: update.date_out.unwrap_or(existing.date_out),
                number_of_guests: update.number_of_guests.unwrap_or(existing.number_of_guests),
                status: update.status.unwrap_or(existing.status),
            },
            client_id: update.client.unwrap_or(existing.client_id),
            room_id: update.room.unwrap_or(existing.room_id),
            supplied_price: update.total_price,
        }
    }

    fn nights(&self) -> i64 {
        (self.candidate.date_out - self.candidate.date_in).num_days()
    }

    /// Dates or room differ from the stored reservation.
    fn pricing_changed(&self, existing: &Reservation) -> bool {
        self.candidate.date_in != existing.date_in
            || self.candidate.date_out != existing.date_out
            || self.room_id != existing.room_id
    }
}

pub struct BookingService {
    pool: PgPool,
    reservations: ReservationRepository,
}

impl BookingService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reservations: ReservationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Every reservation for staff; only the caller's own otherwise.
    pub async fn list(&self, auth: &UserAuth) -> Result<Vec<ReservationResponse>, ApiError> {
        if auth.is_staff {
            let rows = self.reservations.list_details().await?;
            Ok(rows.into_iter().map(into_response).collect())
        } else {
            self.my_reservations(auth).await
        }
    }

    /// Reservations of the caller's own client profile, for any role.
    pub async fn my_reservations(&self, auth: &UserAuth) -> Result<Vec<ReservationResponse>, ApiError> {
        let rows = self.reservations.list_details_for_user(auth.user_id).await?;
        Ok(rows.into_iter().map(into_response).collect())
    }

    pub async fn get(&self, auth: &UserAuth, id: i64) -> Result<ReservationResponse, ApiError> {
        let details: ReservationDetails = self.details(id).await?;
        if !auth.is_staff && details.client_user_id != Some(auth.user_id) {
            return Err(ApiError::Forbidden(PERMISSION_DENIED.to_string()));
        }
        Ok(details.into())
    }

    pub async fn create(
        &self,
        req: CreateReservationRequest,
        created_by: Uuid,
    ) -> Result<ReservationResponse, ApiError> {
        let booking = Booking::from_create(req);

        let mut tx = self.pool.begin().await?;
        let result = write_booking(&mut tx, &booking, None).await;
        let id = match result {
            Ok(id) => id,
            Err(e) => {
                record_reservation("rejected");
                return Err(e);
            }
        };
        tx.commit().await?;
        record_reservation("created");

        info!(
            reservation_id = id,
            room_id = booking.room_id,
            client_id = booking.client_id,
            date_in = %booking.candidate.date_in,
            date_out = %booking.candidate.date_out,
            created_by = %created_by,
            "Reservation created"
        );
        Ok(self.details(id).await?.into())
    }

    /// Applies a full (`PUT`) or partial (`PATCH`) update.
    pub async fn update(
        &self,
        id: i64,
        update: UpdateReservationRequest,
        updated_by: Uuid,
    ) -> Result<ReservationResponse, ApiError> {
        let mut tx = self.pool.begin().await?;

        let existing: Reservation = ReservationRepository::lock(&mut tx, id)
            .await?
            .ok_or_else(|| ApiError::NotFound(RESERVATION_NOT_FOUND.to_string()))?
            .into();
        let booking = Booking::from_update(&existing, update);

        if let Err(e) = write_booking(&mut tx, &booking, Some(&existing)).await {
            record_reservation("rejected");
            return Err(e);
        }
        tx.commit().await?;
        record_reservation("updated");

        info!(
            reservation_id = id,
            status = %booking.candidate.status,
            updated_by = %updated_by,
            "Reservation updated"
        );
        Ok(self.details(id).await?.into())
    }

    pub async fn delete(&self, id: i64, deleted_by: Uuid) -> Result<(), ApiError> {
        if !self.reservations.delete(id).await? {
            return Err(ApiError::NotFound(RESERVATION_NOT_FOUND.to_string()));
        }
        record_reservation("deleted");
        info!(reservation_id = id, deleted_by = %deleted_by, "Reservation deleted");
        Ok(())
    }

    async fn details(&self, id: i64) -> Result<ReservationDetails, ApiError> {
        self.reservations
            .find_details(id)
            .await?
            .map(ReservationDetails::from)
            .ok_or_else(|| ApiError::NotFound(RESERVATION_NOT_FOUND.to_string()))
    }
}

fn into_response(row: persistence::entities::ReservationDetailsEntity) -> ReservationResponse {
    ReservationDetails::from(row).into()
}

/// Whether this write takes the room now: on create, when moving to another
/// room, or when a cancelled reservation becomes pending or confirmed again.
fn books_room(booking: &Booking, existing: Option<&Reservation>) -> bool {
    match existing {
        None => true,
        Some(r) => {
            r.room_id != booking.room_id
                || (!r.status.is_active() && booking.candidate.status.is_active())
        }
    }
}

/// Validates and stores a booking on `conn`, returning the reservation id.
///
/// `existing` is the locked row being updated, or `None` on create.
async fn write_booking(
    conn: &mut PgConnection,
    booking: &Booking,
    existing: Option<&Reservation>,
) -> Result<i64, ApiError> {
    let mut errors = FieldErrors::new();

    let client_changed = existing.map_or(true, |r| r.client_id != booking.client_id);
    if client_changed && !ReservationRepository::client_exists(conn, booking.client_id).await? {
        errors.push("client", missing_object(booking.client_id));
    }

    let room: Option<Room> = ReservationRepository::lock_room(conn, booking.room_id)
        .await?
        .map(Room::from);
    if room.is_none() {
        errors.push("room", missing_object(booking.room_id));
    }

    if let Err(e) = validate_total_price(booking.supplied_price.as_ref()) {
        errors.push("total_price", e.message.map(|m| m.to_string()).unwrap_or_default());
    }
    errors.into_result()?;

    let Some(room) = room else {
        return Err(FieldErrors::single("room", missing_object(booking.room_id)).into());
    };

    let candidate = &booking.candidate;
    check_dates_and_guests(candidate)?;

    let exclude_id = existing.map(|r| r.id);
    let has_overlap = needs_overlap_check(candidate)
        && ReservationRepository::has_overlap(
            conn,
            room.id,
            candidate.date_in,
            candidate.date_out,
            exclude_id,
        )
        .await?;

    check_room_fit(candidate, &room, has_overlap, books_room(booking, existing))?;

    let total_price = resolve_total_price(
        booking.supplied_price,
        existing.and_then(|r| r.total_price),
        existing.map_or(true, |r| booking.pricing_changed(r)),
        room.price_for_night,
        booking.nights(),
    )?;

    let row = NewReservation {
        date_in: candidate.date_in,
        date_out: candidate.date_out,
        number_of_guests: candidate.number_of_guests,
        status: candidate.status,
        total_price,
        client_id: booking.client_id,
        room_id: booking.room_id,
    };

    match existing {
        Some(r) => {
            ReservationRepository::update(conn, r.id, &row).await?;
            Ok(r.id)
        }
        None => Ok(ReservationRepository::insert(conn, &row).await?),
    }
}
