use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::dto::{ApiResponse, CalculatePriceRequest, CreateCommandRequest, PricePreview, UserCommandsQuery};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::{InsuranceCommand, InsuranceDuration};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub fn create_insurance_command_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/insurance-commands/", post(create_command).get(list_commands))
        .route("/insurance-commands/calculate/", post(calculate_price))
        .route("/insurance-commands/durations/", get(list_durations))
        .route("/insurance-commands/user-commands/", get(user_commands))
        .route("/insurance-commands/:id/", get(get_command).delete(delete_command))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn path_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path
        .map(|Path(id)| id)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

async fn create_command(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateCommandRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<InsuranceCommand>>)> {
    let request = json_body(payload)?;
    let command = state.command_service().create_command(&user.context(), request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(command))))
}

async fn calculate_price(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CalculatePriceRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<PricePreview>>> {
    let request = json_body(payload)?;
    let preview = state.command_service().preview_price(&user.context(), request).await?;
    Ok(Json(ApiResponse::success(preview)))
}

async fn list_durations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<InsuranceDuration>>>> {
    let durations = state.command_service().list_durations(&user.context()).await?;
    Ok(Json(ApiResponse::success(durations)))
}

async fn user_commands(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<UserCommandsQuery>,
) -> AppResult<Json<ApiResponse<Vec<InsuranceCommand>>>> {
    let commands = state
        .command_service()
        .list_user_commands(&user.context(), query.user_id.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(commands)))
}

async fn list_commands(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<InsuranceCommand>>>> {
    let commands = state.command_service().list_commands(&user.context()).await?;
    Ok(Json(ApiResponse::success(commands)))
}

async fn get_command(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<ApiResponse<InsuranceCommand>>> {
    let id = path_id(path)?;
    let command = state.command_service().get_command(&user.context(), id).await?;
    Ok(Json(ApiResponse::success(command)))
}

async fn delete_command(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = path_id(path)?;
    state.command_service().soft_delete_command(&user.context(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
