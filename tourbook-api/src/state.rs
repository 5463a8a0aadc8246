use std::sync::Arc;
use tourbook_booking::BookingWorkflow;
use tourbook_catalog::PackageRepository;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<BookingWorkflow>,
    pub packages: Arc<dyn PackageRepository>,
    pub auth: AuthConfig,
}
