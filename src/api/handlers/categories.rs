use crate::AppState;
use crate::api::error::AppError;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::handlers::users::required;
use crate::api::middleware::auth::AuthUser;
use crate::api::response::{ApiResponse, Empty};
use crate::entities::{
    categories::{self, CategoryIcon, DEFAULT_ICON_SIZE},
    prelude::*,
};
use axum::{
    Extension,
    extract::{Path, State},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CategoryListQuery {
    /// Include deactivated categories
    pub include_inactive: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub icon_size: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub icon_size: Option<i32>,
    pub is_active: Option<bool>,
}

fn parse_icon(raw: &str) -> Result<CategoryIcon, AppError> {
    CategoryIcon::parse(raw.trim())
        .ok_or_else(|| AppError::BadRequest(format!("Unknown icon: {}", raw.trim())))
}

fn check_icon_size(size: i32) -> Result<i32, AppError> {
    if (1..=256).contains(&size) {
        Ok(size)
    } else {
        Err(AppError::BadRequest(
            "iconSize must be between 1 and 256".to_string(),
        ))
    }
}

async fn find_category(state: &AppState, id: &str) -> Result<categories::Model, AppError> {
    Categories::find()
        .filter(categories::Column::Id.eq(id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    params(CategoryListQuery),
    responses((status = 200, description = "Categories sorted by name", body = [categories::Model])),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CategoryListQuery>,
) -> Result<ApiResponse<Vec<categories::Model>>, AppError> {
    let mut select = Categories::find();
    if !query.include_inactive.unwrap_or(false) {
        select = select.filter(categories::Column::IsActive.eq(true));
    }

    let list = select
        .order_by_asc(categories::Column::Name)
        .all(&state.db)
        .await?;

    Ok(ApiResponse::list(list))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category key")),
    responses(
        (status = 200, description = "The category", body = categories::Model),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<categories::Model>, AppError> {
    Ok(ApiResponse::ok(find_category(&state, &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = categories::Model),
        (status = 400, description = "Missing fields, duplicate id or unknown icon"),
        (status = 401, description = "Not authenticated")
    ),
    security(("jwt" = [])),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    ApiJson(payload): ApiJson<CreateCategoryRequest>,
) -> Result<ApiResponse<categories::Model>, AppError> {
    let (Some(id), Some(name)) = (required(&payload.id), required(&payload.name)) else {
        return Err(AppError::BadRequest(
            "Please provide a category id and name".to_string(),
        ));
    };

    let icon = match payload.icon.as_deref() {
        Some(raw) => parse_icon(raw)?,
        None => CategoryIcon::default(),
    };
    let icon_size = check_icon_size(payload.icon_size.unwrap_or(DEFAULT_ICON_SIZE))?;

    let exists = Categories::find()
        .filter(categories::Column::Id.eq(&id))
        .one(&state.db)
        .await?
        .is_some();
    if exists {
        return Err(AppError::BadRequest(format!(
            "Category '{}' already exists",
            id
        )));
    }

    let category = categories::ActiveModel {
        internal_id: Set(Uuid::new_v4().to_string()),
        id: Set(id),
        name: Set(name),
        icon: Set(icon),
        icon_size: Set(icon_size),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    info!("🏷️  Category {} created by {}", category.id, actor.username);
    Ok(ApiResponse::created(category))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category key")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = categories::Model),
        (status = 400, description = "Unknown icon"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Category not found")
    ),
    security(("jwt" = [])),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateCategoryRequest>,
) -> Result<ApiResponse<categories::Model>, AppError> {
    let category = find_category(&state, &id).await?;
    let mut active: categories::ActiveModel = category.clone().into();

    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("Category name cannot be empty".to_string()));
        }
        active.name = Set(name);
    }
    if let Some(raw) = payload.icon.as_deref() {
        active.icon = Set(parse_icon(raw)?);
    }
    if let Some(size) = payload.icon_size {
        active.icon_size = Set(check_icon_size(size)?);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }

    if !active.is_changed() {
        return Ok(ApiResponse::ok(category));
    }

    let updated = active.update(&state.db).await?;
    info!("🏷️  Category {} updated by {}", updated.id, actor.username);
    Ok(ApiResponse::ok(updated))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category key")),
    responses(
        (status = 200, description = "Category deleted", body = Empty),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Category not found")
    ),
    security(("jwt" = [])),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Empty>, AppError> {
    let category = find_category(&state, &id).await?;
    Categories::delete_by_id(category.internal_id)
        .exec(&state.db)
        .await?;

    info!("🗑️  Category {} deleted by {}", id, actor.username);
    Ok(ApiResponse::ok(Empty {}))
}
