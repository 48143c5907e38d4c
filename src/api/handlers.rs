//! HTTP request handlers for the vacation engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{
    Employee, EmployeeId, NewEmployee, NewTeam, TeamId, VacationId, VacationRequest,
};
use crate::reconciliation::ENGINE_VERSION;
use crate::store::VacationStore;

use super::request::{CompareQuery, PeriodQuery};
use super::response::{
    ApiError, ApiErrorResponse, HealthResponse, MessageResponse, VacationDeletedResponse,
};
use super::state::AppState;

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/employees", post(create_employee_handler))
        .route(
            "/employees/:employee_id",
            get(get_employee_handler).delete(delete_employee_handler),
        )
        .route("/employees/:employee_id/balance", get(balance_handler))
        .route(
            "/employees/:employee_id/team",
            delete(leave_team_handler),
        )
        .route(
            "/employees/:employee_id/team/:team_id",
            put(join_team_handler),
        )
        .route(
            "/employees/:employee_id/vacations",
            get(list_vacations_handler).post(create_vacation_handler),
        )
        .route(
            "/employees/:employee_id/vacations/:vacation_id",
            put(update_vacation_handler).delete(delete_vacation_handler),
        )
        .route("/teams", post(create_team_handler))
        .route("/teams/by_name/:name", get(team_by_name_handler))
        .route("/teams/:team_id", get(get_team_handler))
        .route("/teams/:team_id/employees", get(team_members_handler))
        .route(
            "/vacations/search_employees_by_period",
            get(search_employees_handler),
        )
        .route(
            "/vacations/compare_employees_vacations",
            get(compare_vacations_handler),
        )
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Logs an engine error and converts it to its HTTP form.
fn engine_failure(correlation_id: Uuid, error: EngineError) -> ApiErrorResponse {
    if error.is_recoverable() {
        warn!(correlation_id = %correlation_id, error = %error, "Request rejected");
    } else {
        error!(correlation_id = %correlation_id, error = %error, "Request failed");
    }
    error.into()
}

fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            warn!(
                correlation_id = %correlation_id,
                "Missing Content-Type header"
            );
            ApiError::malformed_json("Missing Content-Type: application/json header")
        }
        _ => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection,
                "JSON parsing error"
            );
            ApiError::malformed_json(format!("Failed to parse JSON: {}", rejection))
        }
    };
    Err(ApiErrorResponse::bad_request(error))
}

fn path_params<T>(
    correlation_id: Uuid,
    path: Result<Path<T>, PathRejection>,
) -> Result<T, ApiErrorResponse> {
    path.map(|Path(params)| params).map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Invalid path parameter");
        ApiErrorResponse::bad_request(ApiError::invalid_path(rejection.body_text()))
    })
}

fn query_params<T>(
    correlation_id: Uuid,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, ApiErrorResponse> {
    query.map(|Query(params)| params).map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Invalid query string");
        ApiErrorResponse::bad_request(ApiError::invalid_query(rejection.body_text()))
    })
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Response {
    let healthy = state.vacations().store().is_healthy();
    let body = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: ENGINE_VERSION.to_string(),
        regions: state
            .config()
            .calendar()
            .regions()
            .into_iter()
            .map(str::to_string)
            .collect(),
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    json_response(status, &body)
}

// ============================================================================
// Employees
// ============================================================================

/// Handler for POST /employees.
async fn create_employee_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Registering employee");

    let new_employee = json_body(correlation_id, payload)?;
    let employee = state
        .employees()
        .register(new_employee)
        .map_err(|e| engine_failure(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %employee.id,
        "Employee registered"
    );
    Ok(json_response(StatusCode::CREATED, &employee))
}

/// Handler for GET /employees/:employee_id.
async fn get_employee_handler(
    State(state): State<AppState>,
    path: Result<Path<EmployeeId>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let employee_id = path_params(correlation_id, path)?;

    let employee = state
        .employees()
        .get(employee_id)
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, &employee))
}

/// Handler for DELETE /employees/:employee_id.
async fn delete_employee_handler(
    State(state): State<AppState>,
    path: Result<Path<EmployeeId>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let employee_id = path_params(correlation_id, path)?;
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Deleting employee");

    let employee = state
        .employees()
        .delete(employee_id)
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(json_response(
        StatusCode::OK,
        &MessageResponse::new(format!("Deleted employee {}", employee.full_name())),
    ))
}

/// Handler for GET /employees/:employee_id/balance.
async fn balance_handler(
    State(state): State<AppState>,
    path: Result<Path<EmployeeId>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let employee_id = path_params(correlation_id, path)?;

    let balance = state
        .employees()
        .balance(employee_id)
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, &balance))
}

/// Handler for PUT /employees/:employee_id/team/:team_id.
async fn join_team_handler(
    State(state): State<AppState>,
    path: Result<Path<(EmployeeId, TeamId)>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let (employee_id, team_id) = path_params(correlation_id, path)?;

    let employee = state
        .employees()
        .assign_team(employee_id, team_id)
        .map_err(|e| engine_failure(correlation_id, e))?;
    let team = state
        .teams()
        .get(team_id)
        .map_err(|e| engine_failure(correlation_id, e))?;

    Ok(json_response(
        StatusCode::OK,
        &MessageResponse::new(format!(
            "Employee {} joined the team {}",
            employee.full_name(),
            team.name
        )),
    ))
}

/// Handler for DELETE /employees/:employee_id/team.
async fn leave_team_handler(
    State(state): State<AppState>,
    path: Result<Path<EmployeeId>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let employee_id = path_params(correlation_id, path)?;

    let employee = state
        .employees()
        .leave_team(employee_id)
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(json_response(
        StatusCode::OK,
        &MessageResponse::new(format!("Employee {} has no team", employee.full_name())),
    ))
}

// ============================================================================
// Teams
// ============================================================================

/// Handler for POST /teams.
async fn create_team_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewTeam>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let new_team = json_body(correlation_id, payload)?;

    let team = state
        .teams()
        .create(new_team)
        .map_err(|e| engine_failure(correlation_id, e))?;
    info!(correlation_id = %correlation_id, team_id = %team.id, "Team created");
    Ok(json_response(StatusCode::CREATED, &team))
}

/// Handler for GET /teams/:team_id.
async fn get_team_handler(
    State(state): State<AppState>,
    path: Result<Path<TeamId>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let team_id = path_params(correlation_id, path)?;

    let team = state
        .teams()
        .get(team_id)
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, &team))
}

/// Handler for GET /teams/by_name/:name.
async fn team_by_name_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let name = path_params(correlation_id, path)?;

    let team = state
        .teams()
        .find_by_name(&name)
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, &team))
}

/// Handler for GET /teams/:team_id/employees.
async fn team_members_handler(
    State(state): State<AppState>,
    path: Result<Path<TeamId>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let team_id = path_params(correlation_id, path)?;

    let members = state
        .teams()
        .members(team_id)
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, &members))
}

// ============================================================================
// Vacations
// ============================================================================

/// Handler for GET /employees/:employee_id/vacations.
async fn list_vacations_handler(
    State(state): State<AppState>,
    path: Result<Path<EmployeeId>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let employee_id = path_params(correlation_id, path)?;

    let vacations = state
        .vacations()
        .list_vacations(employee_id)
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, &vacations))
}

/// Rejects a body whose employee differs from the path.
fn same_employee(
    correlation_id: Uuid,
    path_employee: EmployeeId,
    request: &VacationRequest,
) -> Result<(), ApiErrorResponse> {
    if request.employee_id == path_employee {
        return Ok(());
    }
    Err(engine_failure(
        correlation_id,
        EngineError::InvalidRequest {
            message: format!(
                "body names employee {} but the path names {}",
                request.employee_id, path_employee
            ),
        },
    ))
}

/// The vacation must exist and belong to the employee in the path.
fn owned_vacation(
    state: &AppState,
    correlation_id: Uuid,
    employee_id: EmployeeId,
    vacation_id: VacationId,
) -> Result<(), ApiErrorResponse> {
    state
        .employees()
        .get(employee_id)
        .map_err(|e| engine_failure(correlation_id, e))?;
    let owned = state
        .vacations()
        .store()
        .vacation(vacation_id)
        .map_err(|e| engine_failure(correlation_id, e))?
        .is_some_and(|vacation| vacation.employee_id == employee_id);
    if owned {
        Ok(())
    } else {
        Err(engine_failure(
            correlation_id,
            EngineError::VacationNotFound { vacation_id },
        ))
    }
}

/// Handler for POST /employees/:employee_id/vacations.
///
/// Responds with the full reconciliation result, including its audit trace.
async fn create_vacation_handler(
    State(state): State<AppState>,
    path: Result<Path<EmployeeId>, PathRejection>,
    payload: Result<Json<VacationRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing vacation request");

    let employee_id = path_params(correlation_id, path)?;
    let request = json_body(correlation_id, payload)?;
    same_employee(correlation_id, employee_id, &request)?;

    let result = state
        .vacations()
        .create_vacation(request)
        .map_err(|e| engine_failure(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        vacation_id = %result.vacation.id,
        workdays = result.workdays,
        merged = result.merged(),
        "Vacation reconciled"
    );
    Ok(json_response(StatusCode::CREATED, &result))
}

/// Handler for PUT /employees/:employee_id/vacations/:vacation_id.
async fn update_vacation_handler(
    State(state): State<AppState>,
    path: Result<Path<(EmployeeId, VacationId)>, PathRejection>,
    payload: Result<Json<VacationRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing vacation update");

    let (employee_id, vacation_id) = path_params(correlation_id, path)?;
    let request = json_body(correlation_id, payload)?;
    owned_vacation(&state, correlation_id, employee_id, vacation_id)?;
    same_employee(correlation_id, employee_id, &request)?;

    let result = state
        .vacations()
        .update_vacation(vacation_id, request)
        .map_err(|e| engine_failure(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        vacation_id = %result.vacation.id,
        superseded = result.superseded.len(),
        "Vacation updated"
    );
    Ok(json_response(StatusCode::OK, &result))
}

/// Handler for DELETE /employees/:employee_id/vacations/:vacation_id.
async fn delete_vacation_handler(
    State(state): State<AppState>,
    path: Result<Path<(EmployeeId, VacationId)>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let (employee_id, vacation_id) = path_params(correlation_id, path)?;
    owned_vacation(&state, correlation_id, employee_id, vacation_id)?;

    let balance = state
        .vacations()
        .delete_vacation(vacation_id)
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(json_response(
        StatusCode::OK,
        &VacationDeletedResponse {
            message: "Vacation deleted".to_string(),
            balance: balance.balance,
        },
    ))
}

/// Handler for GET /vacations/search_employees_by_period.
async fn search_employees_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let query = query_params(correlation_id, query)?;

    let employees: Vec<Employee> = state
        .vacations()
        .employees_on_vacation(query.start_date, query.end_date, query.vacation_type)
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, &employees))
}

/// Handler for GET /vacations/compare_employees_vacations.
async fn compare_vacations_handler(
    State(state): State<AppState>,
    query: Result<Query<CompareQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let query = query_params(correlation_id, query)?;

    let days: Vec<NaiveDate> = state
        .vacations()
        .shared_vacation_days(
            query.employee_1_id,
            query.employee_2_id,
            query.start_date,
            query.end_date,
        )
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, &days))
}
