pub mod package;
pub mod filter;
pub mod repository;

pub use package::{TourPackage, NewPackage, CatalogError, DEFAULT_IMAGE_URL};
pub use filter::PackageFilter;
pub use repository::PackageRepository;
