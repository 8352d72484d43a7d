// src/routes/reports.rs

use std::any::Any;

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use tracing::Span;

use super::ApiError;
use crate::{
    models::ReportDto,
    store::{Credentials, StoreError},
    AppState,
};

const EMPLOYEE_ID_REQUIRED: &str = "Employee ID is required";
const EMPLOYEE_NOT_FOUND: &str = "Employee not found";
const ORGANIZATION_NOT_FOUND: &str = "Organization not found";
const NOT_IN_ORGANIZATION: &str = "Employee not found in your organization";
const FETCH_FAILED: &str = "Failed to fetch reports";

const EMPLOYEE_ID_PARAM: &str = "employeeId";

/// First value of `name` in the query string; later repeats are ignored.
fn first_param(pairs: Vec<(String, String)>, name: &str) -> Option<String> {
    pairs.into_iter().find(|(k, _)| k == name).map(|(_, v)| v)
}

/// Bearer token from the `Authorization` header, else the `cookie` named cookie.
fn credentials_from(headers: &HeaderMap, jar: &CookieJar, cookie: &str) -> Option<Credentials> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(Credentials::bearer(token));
    }

    jar.get(cookie)
        .map(|c| c.value().trim())
        .filter(|token| !token.is_empty())
        .map(Credentials::bearer)
}

/// Unwraps a point lookup. A store error is answered like a miss, but is
/// logged as an error.
fn require<T>(
    found: Result<Option<T>, StoreError>,
    lookup: &'static str,
    miss: ApiError,
) -> Result<T, ApiError> {
    match found {
        Ok(Some(v)) => Ok(v),
        Ok(None) => {
            tracing::warn!(lookup, "no matching record");
            Err(miss)
        }
        Err(e) => {
            tracing::error!(lookup, error = %e, "store lookup failed");
            Err(miss)
        }
    }
}

/// GET /api/reports?employeeId=<id>
///
/// Reports of one employee, newest month first. The caller must own the
/// organization the employee belongs to.
#[tracing::instrument(skip_all, fields(employee_id = tracing::field::Empty, caller_id = tracing::field::Empty))]
pub async fn list_reports(
    State(state): State<AppState>,
    query: Option<Query<Vec<(String, String)>>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<Json<Vec<ReportDto>>, ApiError> {
    let Some(employee_id) = query
        .and_then(|Query(pairs)| first_param(pairs, EMPLOYEE_ID_PARAM))
        .filter(|id| !id.is_empty())
    else {
        tracing::warn!("employeeId missing from query");
        return Err(ApiError::Validation(EMPLOYEE_ID_REQUIRED));
    };
    Span::current().record("employee_id", employee_id.as_str());

    let Some(credentials) = credentials_from(&headers, &jar, &state.auth_cookie) else {
        tracing::warn!("request carries no access token");
        return Err(ApiError::Auth);
    };

    let store = state.store.as_ref();

    let caller = require(store.resolve_caller(&credentials).await, "caller", ApiError::Auth)?;
    Span::current().record("caller_id", caller.id.as_str());

    let employee = require(
        store.find_employee(&credentials, &employee_id).await,
        "employee",
        ApiError::NotFound(EMPLOYEE_NOT_FOUND),
    )?;

    let organization = require(
        store.find_organization_by_owner(&credentials, &caller.id).await,
        "organization",
        ApiError::NotFound(ORGANIZATION_NOT_FOUND),
    )?;

    if employee.organization_id != organization.id {
        tracing::warn!(
            employee_org = %employee.organization_id,
            caller_org = %organization.id,
            "employee belongs to another organization"
        );
        return Err(ApiError::Forbidden(NOT_IN_ORGANIZATION));
    }

    let reports = store
        .list_reports_by_employee(&credentials, &employee_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to fetch reports");
            ApiError::Internal(FETCH_FAILED)
        })?;

    tracing::debug!(count = reports.len(), "reports fetched");
    Ok(Json(reports.into_iter().map(ReportDto::from).collect()))
}

/// Response for a panic inside the reports route.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "reports handler panicked");
    ApiError::Internal(FETCH_FAILED).into_response()
}
