//! # API REST
//!
//! REST API implementation for Patientor.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - Mapping core errors to status codes and `{"error": ...}` bodies
//!
//! Uses `api-shared` for common types and `patientor-core` for everything else.

#![warn(rust_2018_idioms)]

use api_shared::{ErrorBody, HealthRes, HealthService};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use patientor_core::{
    render, Diagnosis, Discharge, Entry, EntryDetails, Gender, HealthCheckRating, Issue,
    IssueCode, NewEntry, NewPatient, PathSegment, Patient, PatientError, PublicPatient, Services,
    SickLeave,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server
///
/// Wraps the core services; clones share the same patient store.
#[derive(Clone)]
pub struct AppState {
    services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_diagnoses,
        list_patients,
        get_patient,
        create_patient,
        add_entry,
        patient_summary,
    ),
    components(schemas(
        HealthRes,
        ErrorBody,
        Diagnosis,
        Patient,
        PublicPatient,
        NewPatient,
        Gender,
        Entry,
        NewEntry,
        EntryDetails,
        HealthCheckRating,
        SickLeave,
        Discharge,
        Issue,
        IssueCode,
        PathSegment,
    ))
)]
pub struct ApiDoc;

/// Build the REST router over `state`, including Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/diagnoses", get(list_diagnoses))
        .route("/api/patients", get(list_patients).post(create_patient))
        .route("/api/patients/:id", get(get_patient))
        .route("/api/patients/:id/entries", post(add_entry))
        .route("/api/patients/:id/summary", get(patient_summary))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Error response: a status code and an [`ErrorBody`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody::message(message),
        }
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody::message("Internal error"),
        }
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::Validation(e) => {
                tracing::warn!("Rejected input: {}", e);
                match ErrorBody::issues(e.issues()) {
                    Ok(body) => Self {
                        status: StatusCode::BAD_REQUEST,
                        body,
                    },
                    Err(ser) => {
                        tracing::error!("Issue serialisation error: {:?}", ser);
                        Self::internal()
                    }
                }
            }
            PatientError::NotFound(id) => {
                tracing::warn!("Patient not found: {}", id);
                Self {
                    status: StatusCode::NOT_FOUND,
                    body: ErrorBody::message("Patient not found"),
                }
            }
            PatientError::InvalidInput(message) => {
                tracing::warn!("Rejected input: {}", message);
                Self::bad_request(message)
            }
            e => {
                tracing::error!("Patient store error: {:?}", e);
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/diagnoses",
    responses(
        (status = 200, description = "Diagnosis catalogue", body = [Diagnosis])
    )
)]
/// List the diagnosis catalogue.
#[axum::debug_handler]
async fn list_diagnoses(State(state): State<AppState>) -> Json<Vec<Diagnosis>> {
    Json(state.services.diagnoses.list().to_vec())
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "All patients without their national id", body = [PublicPatient]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
/// List all patients
///
/// The public view carries every field except `ssn`, entries included.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicPatient>>, ApiError> {
    Ok(Json(state.services.patients.list()?))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Full patient record", body = Patient),
        (status = 404, description = "Patient not found", body = ErrorBody)
    )
)]
/// Fetch one full patient record
///
/// # Errors
/// Returns `404 Not Found` if the id does not resolve to a patient.
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(state.services.patients.get(&id)?))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = NewPatient,
    responses(
        (status = 200, description = "Patient registered", body = Patient),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
/// Register a new patient
///
/// The body is validated against the patient schema, including any entries it carries.
/// The patient and each entry get fresh ids.
///
/// # Errors
/// Returns `400 Bad Request` with the list of issues if validation fails.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Patient>, ApiError> {
    let Json(body) = payload?;
    let new_patient = state
        .services
        .patient_schema
        .parse(&body)
        .map_err(PatientError::from)?;
    Ok(Json(state.services.patients.add_patient(new_patient)?))
}

#[utoipa::path(
    post,
    path = "/api/patients/{id}/entries",
    params(("id" = String, Path, description = "Patient id")),
    request_body = NewEntry,
    responses(
        (status = 200, description = "Updated patient record", body = Patient),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "Patient not found", body = ErrorBody)
    )
)]
/// Append a clinical entry to a patient
///
/// The body is validated before the patient is looked up, so an invalid entry is a
/// `400` even when the id is unknown.
///
/// # Errors
/// Returns:
/// - `400 Bad Request` with the list of issues if validation fails,
/// - `404 Not Found` if the id does not resolve to a patient.
#[axum::debug_handler]
async fn add_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Patient>, ApiError> {
    let Json(body) = payload?;
    let entry = state
        .services
        .entry_schema
        .parse(&body)
        .map_err(PatientError::from)?;
    Ok(Json(state.services.patients.append_entry(&id, entry)?))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/summary",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Plain-text patient page", body = String, content_type = "text/plain"),
        (status = 404, description = "Patient not found", body = ErrorBody)
    )
)]
#[axum::debug_handler]
async fn patient_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<String, ApiError> {
    let patient = state.services.patients.get(&id)?;
    Ok(render::render_patient(&patient, &state.services.diagnoses))
}
