use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use tourbook_catalog::{NewPackage, PackageRepository, TourPackage};
use tourbook_core::{Requester, StorageResult};
use crate::database::storage_error;

pub struct PgPackageRepository {
    pool: PgPool,
}

impl PgPackageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PACKAGE_COLUMNS: &str =
    "id, title, place, hotel, transport, duration, description, price, image_url, guide_id, guide_name, created_at";

#[derive(sqlx::FromRow)]
struct PackageRow {
    id: Uuid,
    title: String,
    place: String,
    hotel: String,
    transport: String,
    duration: String,
    description: String,
    price: i32,
    image_url: String,
    guide_id: String,
    guide_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<PackageRow> for TourPackage {
    fn from(row: PackageRow) -> Self {
        TourPackage {
            id: row.id,
            title: row.title,
            place: row.place,
            hotel: row.hotel,
            transport: row.transport,
            duration: row.duration,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            guide_id: row.guide_id,
            guide_name: row.guide_name,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl PackageRepository for PgPackageRepository {
    async fn create_package(
        &self,
        package: NewPackage,
        guide: &Requester,
    ) -> StorageResult<TourPackage> {
        // created_at placeholder is replaced by the database default below
        let pkg = package.into_package(Uuid::new_v4(), guide, Utc::now());

        let row = sqlx::query_as::<_, PackageRow>(&format!(
            r#"
            INSERT INTO packages (id, title, place, hotel, transport, duration, description, price, image_url, guide_id, guide_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            PACKAGE_COLUMNS
        ))
        .bind(pkg.id)
        .bind(&pkg.title)
        .bind(&pkg.place)
        .bind(&pkg.hotel)
        .bind(&pkg.transport)
        .bind(&pkg.duration)
        .bind(&pkg.description)
        .bind(pkg.price)
        .bind(&pkg.image_url)
        .bind(&pkg.guide_id)
        .bind(&pkg.guide_name)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.into())
    }

    async fn get_package(
        &self,
        id: Uuid,
    ) -> StorageResult<Option<TourPackage>> {
        let row = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {} FROM packages WHERE id = $1",
            PACKAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(TourPackage::from))
    }

    async fn list_packages(&self) -> StorageResult<Vec<TourPackage>> {
        let rows = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {} FROM packages ORDER BY created_at DESC",
            PACKAGE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(TourPackage::from).collect())
    }

    async fn list_packages_by_guide(
        &self,
        guide_id: &str,
    ) -> StorageResult<Vec<TourPackage>> {
        let rows = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {} FROM packages WHERE guide_id = $1 ORDER BY created_at DESC",
            PACKAGE_COLUMNS
        ))
        .bind(guide_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(TourPackage::from).collect())
    }
}
