pub mod app_config;
pub mod database;
pub mod booking_repo;
pub mod package_repo;
pub mod memory_repo;
pub mod email;

pub use database::DbClient;
pub use booking_repo::PgBookingRepository;
pub use package_repo::PgPackageRepository;
pub use memory_repo::InMemoryStore;
pub use email::{EmailJsNotifier, UnconfiguredNotifier};
