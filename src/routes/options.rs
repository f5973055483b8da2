use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::options::{CreateOptionRequest, OptionList, UpdateOptionRequest},
    error::AppResult,
    models::MenuOption,
    response::ApiResponse,
    services::option_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_options).post(create_option))
        .route(
            "/{id}",
            get(get_option).put(update_option).delete(delete_option),
        )
}

#[utoipa::path(
    get,
    path = "/api/options",
    responses(
        (status = 200, description = "List option catalog", body = ApiResponse<OptionList>)
    ),
    tag = "Options"
)]
pub async fn list_options(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<OptionList>>> {
    let resp = option_service::list_options(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/options/{id}",
    params(
        ("id" = String, Path, description = "Option ID")
    ),
    responses(
        (status = 200, description = "Get option", body = ApiResponse<MenuOption>),
        (status = 404, description = "Option not found"),
    ),
    tag = "Options"
)]
pub async fn get_option(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuOption>>> {
    let resp = option_service::get_option(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/options",
    request_body = CreateOptionRequest,
    responses(
        (status = 200, description = "Create option", body = ApiResponse<MenuOption>),
        (status = 400, description = "Invalid name or price"),
        (status = 409, description = "Option name already exists"),
    ),
    tag = "Options"
)]
pub async fn create_option(
    State(state): State<AppState>,
    Json(payload): Json<CreateOptionRequest>,
) -> AppResult<Json<ApiResponse<MenuOption>>> {
    let resp = option_service::create_option(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/options/{id}",
    params(
        ("id" = String, Path, description = "Option ID")
    ),
    request_body = UpdateOptionRequest,
    responses(
        (status = 200, description = "Update option", body = ApiResponse<MenuOption>),
        (status = 404, description = "Option not found"),
        (status = 409, description = "Name taken, or renaming an option in use"),
    ),
    tag = "Options"
)]
pub async fn update_option(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOptionRequest>,
) -> AppResult<Json<ApiResponse<MenuOption>>> {
    let resp = option_service::update_option(&state, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/options/{id}",
    params(
        ("id" = String, Path, description = "Option ID")
    ),
    responses(
        (status = 200, description = "Option deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Option not found"),
        (status = 409, description = "Option is used by a menu item"),
    ),
    tag = "Options"
)]
pub async fn delete_option(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = option_service::delete_option(&state, &id).await?;
    Ok(Json(resp))
}
