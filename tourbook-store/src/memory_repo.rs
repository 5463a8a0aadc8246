use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;
use tourbook_catalog::{NewPackage, PackageRepository, TourPackage};
use tourbook_core::{BookingRecord, BookingRepository, BookingRequest, Requester, StorageResult};

/// Process-local store used when no database is configured, and in tests.
/// Timestamps come from a single clock guarded by the same lock as the
/// data, so `created_at` never decreases across inserts.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_timestamp: Option<DateTime<Utc>>,
    bookings: Vec<BookingRecord>,
    packages: Vec<TourPackage>,
}

impl Inner {
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded bookings in insertion order
    pub async fn bookings(&self) -> Vec<BookingRecord> {
        self.inner.lock().await.bookings.clone()
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> StorageResult<BookingRecord> {
        let mut inner = self.inner.lock().await;
        let created_at = inner.next_timestamp();
        let record = BookingRecord::from_request(Uuid::new_v4(), request, created_at);
        inner.bookings.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl PackageRepository for InMemoryStore {
    async fn create_package(
        &self,
        package: NewPackage,
        guide: &Requester,
    ) -> StorageResult<TourPackage> {
        let mut inner = self.inner.lock().await;
        let created_at = inner.next_timestamp();
        let pkg = package.into_package(Uuid::new_v4(), guide, created_at);
        inner.packages.push(pkg.clone());
        Ok(pkg)
    }

    async fn get_package(
        &self,
        id: Uuid,
    ) -> StorageResult<Option<TourPackage>> {
        let inner = self.inner.lock().await;
        Ok(inner.packages.iter().find(|p| p.id == id).cloned())
    }

    async fn list_packages(&self) -> StorageResult<Vec<TourPackage>> {
        let inner = self.inner.lock().await;
        // Insertion order is timestamp order, so reversing is newest first
        Ok(inner.packages.iter().rev().cloned().collect())
    }

    async fn list_packages_by_guide(
        &self,
        guide_id: &str,
    ) -> StorageResult<Vec<TourPackage>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .packages
            .iter()
            .rev()
            .filter(|p| p.guide_id == guide_id)
            .cloned()
            .collect())
    }
}
