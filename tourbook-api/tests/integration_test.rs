use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use tourbook_api::{app, middleware::SessionClaims, AppState, AuthConfig};
use tourbook_booking::BookingWorkflow;
use tourbook_core::{
    BookingRecord, BookingRepository, BookingRequest, ConfirmationParams, NotificationError,
    Notifier, StorageError,
};
use tourbook_store::InMemoryStore;

const SECRET: &str = "test-secret";
const AMALFI_FORM: &str = "packageId=p1&packageName=Amalfi+Coast&name=Jane+Doe&email=jane%40example.com&guests=2&bookingDate=2025-06-01";

#[derive(Default)]
struct RecordingNotifier {
    fail: bool,
    sent: Mutex<Vec<ConfirmationParams>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_confirmation(&self, params: &ConfirmationParams) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(params.clone());
        if self.fail {
            return Err(NotificationError::DispatchFailed("dispatcher down".to_string()));
        }
        Ok(())
    }
}

struct DownRepository;

#[async_trait]
impl BookingRepository for DownRepository {
    async fn create_booking(&self, _request: &BookingRequest) -> Result<BookingRecord, StorageError> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
}

struct Harness {
    app: Router,
    store: Arc<InMemoryStore>,
    notifier: Arc<RecordingNotifier>,
}

fn harness(notifier: RecordingNotifier) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(notifier);
    let state = AppState {
        workflow: Arc::new(BookingWorkflow::new(store.clone(), notifier.clone())),
        packages: store.clone(),
        auth: AuthConfig { secret: SECRET.to_string() },
    };
    Harness { app: app(state), store, notifier }
}

fn token(sub: &str, email: Option<&str>, name: Option<&str>) -> String {
    let claims = SessionClaims {
        sub: sub.to_string(),
        email: email.map(String::from),
        name: name.map(String::from),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

fn booking_request(body: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/v1/bookings")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn test_booking_recorded_and_confirmed() {
    let h = harness(RecordingNotifier::default());
    let tok = token("u1", None, None);

    let (status, body) = send(&h.app, booking_request(AMALFI_FORM, Some(&tok))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["persisted"], json!(true));
    assert_eq!(body["notified"], json!(true));
    assert_eq!(body["message"], json!("Booking submitted successfully!"));
    assert_eq!(body["delivery_warning"], json!(false));
    assert!(body["booking_id"].is_string());

    let bookings = h.store.bookings().await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].requester_id, "u1");
    assert_eq!(bookings[0].guest_count, 2);

    let sent = h.notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].name, "Jane Doe");
    assert_eq!(sent[0].title, "Amalfi Coast");
    assert_eq!(sent[0].to_email.expose(), "jane@example.com");
}

#[tokio::test]
async fn test_booking_with_failed_email_is_partial_success() {
    let h = harness(RecordingNotifier { fail: true, ..Default::default() });
    let tok = token("u1", None, None);

    let (status, body) = send(&h.app, booking_request(AMALFI_FORM, Some(&tok))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["persisted"], json!(true));
    assert_eq!(body["notified"], json!(false));
    assert_eq!(body["delivery_warning"], json!(true));
    assert_eq!(h.store.bookings().await.len(), 1);
    assert_eq!(h.notifier.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_booking_missing_name_is_rejected_without_side_effects() {
    let h = harness(RecordingNotifier::default());
    let tok = token("u1", Some("jane@example.com"), None);
    let form = "packageId=p1&packageName=Amalfi+Coast&email=jane%40example.com&guests=2&bookingDate=2025-06-01";

    let (status, body) = send(&h.app, booking_request(form, Some(&tok))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({
        "persisted": false,
        "notified": null,
        "message": "Please fill out all fields.",
        "delivery_warning": false
    }));
    assert!(h.store.bookings().await.is_empty());
    assert!(h.notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_accepts_snake_case_field_names() {
    let h = harness(RecordingNotifier::default());
    let tok = token("u1", None, None);
    let form = "package_id=p1&package_name=Amalfi+Coast&name=Jane+Doe&email=jane%40example.com&guests=2&booking_date=2025-06-01";

    let (status, body) = send(&h.app, booking_request(form, Some(&tok))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["persisted"], json!(true));
    assert_eq!(h.store.bookings().await[0].package_name, "Amalfi Coast");
}

#[tokio::test]
async fn test_booking_with_oversized_guest_count_is_rejected() {
    let h = harness(RecordingNotifier::default());
    let tok = token("u1", None, None);
    let form = AMALFI_FORM.replace("guests=2", "guests=3000000000");

    let (status, body) = send(&h.app, booking_request(&form, Some(&tok))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["persisted"], json!(false));
    assert_eq!(body["message"], json!("Number of guests must be a whole number of at least 1."));
    assert!(h.store.bookings().await.is_empty());
    assert!(h.notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_falls_back_to_profile_email() {
    let h = harness(RecordingNotifier::default());
    let tok = token("u1", Some("profile@example.com"), Some("Jane"));
    let form = "packageId=p1&packageName=Amalfi+Coast&name=Jane+Doe&guests=2&bookingDate=2025-06-01";

    let (status, body) = send(&h.app, booking_request(form, Some(&tok))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notified"], json!(true));
    assert_eq!(h.notifier.sent.lock().unwrap()[0].to_email.expose(), "profile@example.com");
}

#[tokio::test]
async fn test_booking_without_any_address_skips_email() {
    let h = harness(RecordingNotifier::default());
    let tok = token("u1", None, None);
    let form = "packageId=p1&packageName=Amalfi+Coast&name=Jane+Doe&email=&guests=2&bookingDate=2025-06-01";

    let (status, body) = send(&h.app, booking_request(form, Some(&tok))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["persisted"], json!(true));
    assert_eq!(body["notified"], Value::Null);
    assert_eq!(body["delivery_warning"], json!(false));
    assert!(h.notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_storage_down_returns_503_without_email() {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState {
        workflow: Arc::new(BookingWorkflow::new(Arc::new(DownRepository), notifier.clone())),
        packages: store,
        auth: AuthConfig { secret: SECRET.to_string() },
    };
    let app = app(state);
    let tok = token("u1", Some("jane@example.com"), None);

    let (status, body) = send(&app, booking_request(AMALFI_FORM, Some(&tok))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["persisted"], json!(false));
    assert_eq!(body["notified"], Value::Null);
    assert_eq!(body["message"], json!("There was an error submitting your booking. Please try again."));
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_requires_valid_session() {
    let h = harness(RecordingNotifier::default());

    let (status, _) = send(&h.app, booking_request(AMALFI_FORM, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&h.app, booking_request(AMALFI_FORM, Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    assert!(h.store.bookings().await.is_empty());
    assert!(h.notifier.sent.lock().unwrap().is_empty());
}

fn package_json(title: &str, price: i32) -> Value {
    json!({
        "title": title,
        "place": "Bali",
        "hotel": "Ubud Hanging Gardens",
        "transport": "Private driver",
        "duration": "5 Days, 4 Nights",
        "description": "Rice terraces, temples and a sunrise volcano hike.",
        "price": price
    })
}

fn create_package_request(body: &Value, bearer: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/packages")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_package_catalog_flow() {
    let h = harness(RecordingNotifier::default());
    let marie = token("guide-1", None, Some("Marie"));
    let kenji = token("guide-2", None, None);

    let (status, created) = send(&h.app, create_package_request(&package_json("Bali Retreat", 900), &marie)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["guide_id"], json!("guide-1"));
    assert_eq!(created["guide_name"], json!("Marie"));
    assert_eq!(created["image_url"], json!("https://placehold.co/600x400.png"));

    let (status, _) = send(&h.app, create_package_request(&package_json("Tokyo Nights", 2400), &kenji)).await;
    assert_eq!(status, StatusCode::CREATED);

    // Public listing, newest first
    let (status, all) = send(&h.app, get("/v1/packages", None)).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = all.as_array().unwrap().iter().map(|p| p["title"].as_str().unwrap().to_string()).collect();
    assert_eq!(titles, vec!["Tokyo Nights", "Bali Retreat"]);

    let (_, filtered) = send(&h.app, get("/v1/packages?q=bali&max_price=1000", None)).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["title"], json!("Bali Retreat"));

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&h.app, get(&format!("/v1/packages/{}", id), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], json!("Bali Retreat"));

    let (status, mine) = send(&h.app, get("/v1/packages/mine", Some(&kenji))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["title"], json!("Tokyo Nights"));
}

#[tokio::test]
async fn test_browse_with_blank_filter_params() {
    let h = harness(RecordingNotifier::default());
    let tok = token("guide-1", None, None);
    send(&h.app, create_package_request(&package_json("Bali Retreat", 900), &tok)).await;

    let (status, all) = send(&h.app, get("/v1/packages?q=&min_price=&max_price=", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_browse_with_malformed_price_is_json_error() {
    let h = harness(RecordingNotifier::default());

    let (status, body) = send(&h.app, get("/v1/packages?min_price=cheap", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid price"));
}

#[tokio::test]
async fn test_package_not_found() {
    let h = harness(RecordingNotifier::default());
    let uri = format!("/v1/packages/{}", uuid::Uuid::new_v4());

    let (status, body) = send(&h.app, get(&uri, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Package not found. It might have been removed."));
}

#[tokio::test]
async fn test_invalid_package_is_rejected() {
    let h = harness(RecordingNotifier::default());
    let tok = token("guide-1", None, None);

    let (status, body) = send(&h.app, create_package_request(&package_json("Bali", 900), &tok)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Title must be at least 5 characters."));

    let (_, all) = send(&h.app, get("/v1/packages", None)).await;
    assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_creating_package_requires_session() {
    let h = harness(RecordingNotifier::default());
    let req = Request::builder()
        .method("POST")
        .uri("/v1/packages")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(package_json("Bali Retreat", 900).to_string()))
        .unwrap();

    let (status, _) = send(&h.app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
