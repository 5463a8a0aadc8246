use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use tourbook_core::{BookingRecord, BookingRepository, BookingRequest, BookingStatus, StorageError, StorageResult};
use tourbook_shared::Masked;
use crate::database::storage_error;

/// Advisory lock key serializing booking inserts, so `created_at` follows
/// commit order across connections.
const BOOKING_CLOCK_LOCK: i64 = 0x746f_7572_626b;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    package_id: String,
    package_name: String,
    customer_name: String,
    customer_email: Option<String>,
    guest_count: i32,
    booking_date: NaiveDate,
    requester_id: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for BookingRecord {
    type Error = StorageError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status: BookingStatus = row.status.parse().map_err(StorageError::Rejected)?;
        let guest_count = u32::try_from(row.guest_count)
            .map_err(|_| StorageError::Rejected(format!("negative guest count on booking {}", row.id)))?;

        Ok(BookingRecord {
            id: row.id,
            package_id: row.package_id,
            package_name: row.package_name,
            customer_name: row.customer_name,
            customer_email: row.customer_email.map(Masked),
            guest_count,
            booking_date: row.booking_date,
            requester_id: row.requester_id,
            status,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_booking(&self, request: &BookingRequest) -> StorageResult<BookingRecord> {
        let guest_count = i32::try_from(request.guest_count)
            .map_err(|_| StorageError::Rejected(format!("guest count {} out of range", request.guest_count)))?;

        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        // Held until commit; the next writer sees this row's timestamp.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BOOKING_CLOCK_LOCK)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (id, package_id, package_name, customer_name, customer_email, guest_count, booking_date, requester_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9,
                    GREATEST(clock_timestamp(), (SELECT max(created_at) FROM bookings)))
            RETURNING id, package_id, package_name, customer_name, customer_email, guest_count, booking_date, requester_id, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.package_id)
        .bind(&request.package_name)
        .bind(&request.customer_name)
        .bind(request.customer_email.as_ref().map(|email| email.expose().as_str()))
        .bind(guest_count)
        .bind(request.booking_date)
        .bind(&request.requester_id)
        .bind(BookingStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;

        info!("Inserted booking row {}", row.id);
        row.try_into()
    }
}
