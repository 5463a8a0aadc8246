use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use uuid::Uuid;
use tourbook_catalog::{NewPackage, PackageFilter, TourPackage};
use tourbook_core::Requester;

use crate::{error::AppError, middleware::session_middleware, state::AppState};

pub fn routes(state: AppState) -> Router<AppState> {
    let session = || from_fn_with_state(state.clone(), session_middleware);

    Router::new()
        .route(
            "/v1/packages",
            get(list_packages).merge(post(create_package).route_layer(session())),
        )
        .route("/v1/packages/mine", get(list_my_packages).route_layer(session()))
        .route("/v1/packages/{id}", get(get_package))
}

/// GET /v1/packages?q=&min_price=&max_price=
/// Newest first
async fn list_packages(
    State(state): State<AppState>,
    query: Result<Query<PackageFilter>, QueryRejection>,
) -> Result<Json<Vec<TourPackage>>, AppError> {
    let Query(filter) = query.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let packages = state.packages.list_packages().await?;
    Ok(Json(filter.apply(packages)))
}

/// GET /v1/packages/{id}
async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TourPackage>, AppError> {
    state.packages.get_package(id).await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("Package not found. It might have been removed.".to_string()))
}

/// POST /v1/packages
async fn create_package(
    State(state): State<AppState>,
    Extension(guide): Extension<Requester>,
    Json(new_package): Json<NewPackage>,
) -> Result<(StatusCode, Json<TourPackage>), AppError> {
    new_package.validate()?;

    let package = state.packages.create_package(new_package, &guide).await?;
    info!("Package created: {} by guide {}", package.id, guide.id);

    Ok((StatusCode::CREATED, Json(package)))
}

/// GET /v1/packages/mine
async fn list_my_packages(
    State(state): State<AppState>,
    Extension(guide): Extension<Requester>,
) -> Result<Json<Vec<TourPackage>>, AppError> {
    let packages = state.packages.list_packages_by_guide(&guide.id).await?;
    Ok(Json(packages))
}
