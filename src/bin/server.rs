//! REST API server for the card form.
//!
//! # Usage
//!
//! ```bash
//! # Start server
//! cardform-server
//!
//! # With custom port and a faster simulated payment endpoint
//! cardform-server --port 8080 --latency-ms 250
//! ```
//!
//! # Swagger UI
//!
//! Visit http://localhost:3000/swagger-ui/ for interactive API documentation.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use card_form::catalog::{ACCEPTED_BRANDS, EXPIRATION_LABEL, PAY_LABEL};
use card_form::store::DEFAULT_LATENCY;
use card_form::validate::validate_record_with;
use card_form::{
    validate_field, Expiration, ExpirationPart, FormController, FormOptions, Record, RecordReport,
    SubmitError, TextField, TransactionStore, ValidationMode,
};

// ============================================================================
// OpenAPI Documentation
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Card Form API",
        version = "0.1.0",
        description = "Payment card form validation and submission REST API. Transactions live in memory only. Work in progress - no auth or rate limiting.",
        license(name = "MIT"),
        contact(name = "API Support")
    ),
    tags(
        (name = "Catalog", description = "Field labels, placeholders and selector options"),
        (name = "Validation", description = "Per-field and whole-record checks"),
        (name = "Transactions", description = "Submitting records and reading the transaction log"),
        (name = "System", description = "Health and status endpoints")
    ),
    paths(
        fields,
        validate_field_handler,
        validate_record_handler,
        submit_transaction,
        list_transactions,
        health,
    ),
    components(schemas(
        FieldsResponse,
        TextFieldInfo,
        ExpirationInfo,
        FieldRequest,
        FieldResponse,
        RecordRequest,
        ValidateRecordRequest,
        ValidateRecordResponse,
        FailureInfo,
        SubmitResponse,
        TransactionInfo,
        HealthResponse,
    ))
)]
struct ApiDoc;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Clone)]
struct AppState {
    store: TransactionStore,
}

#[derive(Serialize, ToSchema)]
struct FieldsResponse {
    /// Card brands shown above the form
    accepted: Vec<String>,
    /// Text inputs in display order
    text_fields: Vec<TextFieldInfo>,
    /// Expiration selectors
    expiration: ExpirationInfo,
    /// Submit button label
    pay_label: String,
}

#[derive(Serialize, ToSchema)]
struct TextFieldInfo {
    /// Field identifier: card_number, cvc or card_holder_name
    id: String,
    /// Input label
    label: String,
    /// Placeholder shown while empty
    placeholder: String,
    /// Maximum characters the input accepts
    max_length: usize,
    /// Message shown while the field is flagged
    error_message: String,
}

#[derive(Serialize, ToSchema)]
struct ExpirationInfo {
    /// Label shown above both selectors
    label: String,
    /// Month options, January to December
    months: Vec<String>,
    /// Year options, 2020 to 2030
    years: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"field": "cvc", "value": "12a"}))]
struct FieldRequest {
    /// Field identifier: card_number, cvc or card_holder_name
    field: String,
    /// Value as typed
    value: String,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "field": "cvc",
    "error": true,
    "message": "Please enter 3 characters, no spaces and only numeric values"
}))]
struct FieldResponse {
    /// Field identifier
    field: String,
    /// Whether the value would flag the field while typing
    error: bool,
    /// Message to show when flagged
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({
    "card_number": "4444555566667777",
    "cvc": "123",
    "card_holder_name": "John Doe",
    "month": "January",
    "year": "2020"
}))]
struct RecordRequest {
    /// Card number, 16 digits
    #[serde(default)]
    card_number: String,
    /// Card verification code, 3 digits
    #[serde(default)]
    cvc: String,
    /// Card holder name
    #[serde(default)]
    card_holder_name: String,
    /// Expiration month name, e.g. "January"
    #[serde(default)]
    month: String,
    /// Expiration year, "2020" to "2030"
    #[serde(default)]
    year: String,
}

impl RecordRequest {
    fn into_record(self) -> Record {
        Record {
            card_number: self.card_number,
            cvc: self.cvc,
            card_holder_name: self.card_holder_name,
            expiration: Expiration {
                month: self.month,
                year: self.year,
            },
        }
    }
}

#[derive(Deserialize, ToSchema)]
struct ValidateRecordRequest {
    /// Record to check
    record: RecordRequest,
    /// Report every failing field instead of stopping at the first one
    #[serde(default)]
    all: bool,
}

#[derive(Serialize, ToSchema)]
struct ValidateRecordResponse {
    /// Whether the record passes every submit-time check
    valid: bool,
    /// Failing fields in priority order
    failures: Vec<FailureInfo>,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "field": "card_number",
    "error": "must be 16 digits, got 4",
    "message": "Please enter 16 characters, no spaces and only numeric values"
}))]
struct FailureInfo {
    /// Field identifier
    field: String,
    /// What is wrong with the value
    error: String,
    /// Message the form shows for this field
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Serialize, ToSchema)]
struct SubmitResponse {
    /// Whether the record was accepted into the transaction log
    accepted: bool,
    /// Position of the accepted record in the log
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence: Option<usize>,
    /// Failing fields when the record was refused by validation
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<FailureInfo>,
    /// Submission-level error
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "sequence": 0,
    "card_number": "****-****-****-7777",
    "card_holder_name": "John Doe",
    "expiration": "January 2020"
}))]
struct TransactionInfo {
    /// Position in the log
    sequence: usize,
    /// Masked card number (safe for display)
    card_number: String,
    /// Card holder name
    card_holder_name: String,
    /// Expiration as "Month Year"
    expiration: String,
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    /// Service status
    status: String,
    /// API version
    version: String,
    /// Number of accepted transactions
    transactions: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// List the form fields
#[utoipa::path(
    get,
    path = "/fields",
    responses(
        (status = 200, description = "Field catalog", body = FieldsResponse)
    ),
    tag = "Catalog"
)]
async fn fields() -> Json<FieldsResponse> {
    let options = |part: ExpirationPart| part.options().iter().map(|s| s.to_string()).collect();

    Json(FieldsResponse {
        accepted: ACCEPTED_BRANDS.iter().map(|s| s.to_string()).collect(),
        text_fields: TextField::ALL
            .iter()
            .map(|field| TextFieldInfo {
                id: field.id().to_string(),
                label: field.label().to_string(),
                placeholder: field.placeholder().to_string(),
                max_length: field.max_length(),
                error_message: field.error_message().to_string(),
            })
            .collect(),
        expiration: ExpirationInfo {
            label: EXPIRATION_LABEL.to_string(),
            months: options(ExpirationPart::Month),
            years: options(ExpirationPart::Year),
        },
        pay_label: PAY_LABEL.to_string(),
    })
}

/// Check a text field value as typed
#[utoipa::path(
    post,
    path = "/validate/field",
    request_body = FieldRequest,
    responses(
        (status = 200, description = "Field flag", body = FieldResponse),
        (status = 400, description = "Unknown field")
    ),
    tag = "Validation"
)]
async fn validate_field_handler(
    Json(req): Json<FieldRequest>,
) -> Result<Json<FieldResponse>, (StatusCode, String)> {
    let field: TextField = req
        .field
        .parse()
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("{}", e)))?;

    let error = validate_field(field, &req.value);
    Ok(Json(FieldResponse {
        field: field.id().to_string(),
        error,
        message: error.then(|| field.error_message().to_string()),
    }))
}

/// Check a whole record with the submit-time rules
#[utoipa::path(
    post,
    path = "/validate/record",
    request_body = ValidateRecordRequest,
    responses(
        (status = 200, description = "Validation result", body = ValidateRecordResponse)
    ),
    tag = "Validation"
)]
async fn validate_record_handler(
    Json(req): Json<ValidateRecordRequest>,
) -> Json<ValidateRecordResponse> {
    let mode = if req.all {
        ValidationMode::AllFailures
    } else {
        ValidationMode::FirstFailure
    };
    let record = req.record.into_record();
    let report = validate_record_with(&record, mode);

    Json(ValidateRecordResponse {
        valid: report.is_valid(),
        failures: failure_infos(&report),
    })
}

/// Submit a record through the form controller
#[utoipa::path(
    post,
    path = "/transactions",
    request_body = RecordRequest,
    responses(
        (status = 201, description = "Record accepted", body = SubmitResponse),
        (status = 400, description = "Unknown selector option", body = SubmitResponse),
        (status = 422, description = "Record failed validation", body = SubmitResponse),
        (status = 503, description = "Sink refused the record", body = SubmitResponse)
    ),
    tag = "Transactions"
)]
async fn submit_transaction(
    State(state): State<AppState>,
    Json(req): Json<RecordRequest>,
) -> (StatusCode, Json<SubmitResponse>) {
    let mut form = FormController::with_options(state.store.clone(), FormOptions::whole_values());

    form.on_field_edit(TextField::CardNumber, req.card_number);
    form.on_field_edit(TextField::Cvc, req.cvc);
    form.on_field_edit(TextField::CardHolderName, req.card_holder_name);
    for (part, value) in [
        (ExpirationPart::Month, req.month),
        (ExpirationPart::Year, req.year),
    ] {
        if let Err(e) = form.on_expiration_edit(part, value) {
            return (StatusCode::BAD_REQUEST, Json(refused(e.to_string())));
        }
    }

    match form.submit().await {
        Ok(receipt) => (
            StatusCode::CREATED,
            Json(SubmitResponse {
                accepted: true,
                sequence: Some(receipt.sequence),
                failures: Vec::new(),
                error: None,
            }),
        ),
        Err(SubmitError::Invalid(report)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(SubmitResponse {
                failures: failure_infos(&report),
                ..refused("record failed validation".to_string())
            }),
        ),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, Json(refused(e.to_string()))),
    }
}

/// List accepted transactions
#[utoipa::path(
    get,
    path = "/transactions",
    responses(
        (status = 200, description = "Accepted transactions, card numbers masked", body = [TransactionInfo])
    ),
    tag = "Transactions"
)]
async fn list_transactions(State(state): State<AppState>) -> Json<Vec<TransactionInfo>> {
    Json(
        state
            .store
            .summaries()
            .into_iter()
            .map(|s| TransactionInfo {
                sequence: s.sequence,
                card_number: s.card_number,
                card_holder_name: s.card_holder_name,
                expiration: s.expiration,
            })
            .collect(),
    )
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "System"
)]
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        transactions: state.store.len(),
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn failure_infos(report: &RecordReport) -> Vec<FailureInfo> {
    report
        .failures()
        .iter()
        .map(|failure| FailureInfo {
            field: failure.field.id().to_string(),
            error: failure.error.to_string(),
            message: failure.field.error_message().map(str::to_string),
        })
        .collect()
}

fn refused(error: String) -> SubmitResponse {
    SubmitResponse {
        accepted: false,
        sequence: None,
        failures: Vec::new(),
        error: Some(error),
    }
}

fn arg<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::args()
        .skip_while(|a| a != name)
        .nth(1)
        .and_then(|v| v.parse().ok())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse args
    let port: u16 = arg("--port").unwrap_or(3000);
    let latency = arg::<u64>("--latency-ms")
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_LATENCY);

    let state = AppState {
        store: TransactionStore::with_latency(latency),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any);

    // Build router with Swagger UI
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/fields", get(fields))
        .route("/validate/field", post(validate_field_handler))
        .route("/validate/record", post(validate_record_handler))
        .route(
            "/transactions",
            post(submit_transaction).get(list_transactions),
        )
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Simulated sink latency: {:?}", latency);
    tracing::info!("Swagger UI available at http://{}:{}/swagger-ui/", "localhost", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
