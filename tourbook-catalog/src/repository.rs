use async_trait::async_trait;
use uuid::Uuid;
use tourbook_core::{Requester, StorageResult};
use crate::package::{NewPackage, TourPackage};

/// Storage gateway for the package catalog
#[async_trait]
pub trait PackageRepository: Send + Sync {
    /// Store an already validated package under `guide`
    async fn create_package(
        &self,
        package: NewPackage,
        guide: &Requester,
    ) -> StorageResult<TourPackage>;

    async fn get_package(
        &self,
        id: Uuid,
    ) -> StorageResult<Option<TourPackage>>;

    /// All packages, newest first
    async fn list_packages(&self) -> StorageResult<Vec<TourPackage>>;

    /// Packages created by one guide, newest first
    async fn list_packages_by_guide(
        &self,
        guide_id: &str,
    ) -> StorageResult<Vec<TourPackage>>;
}
