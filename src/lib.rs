pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::api::error::AppError;
use crate::api::handlers::{categories, health, users, videos};
use crate::api::middleware::{auth::auth_middleware, security::security_headers};
use crate::config::AppConfig;
use crate::services::media_host::MediaHost;
use crate::services::video_service::VideoService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::register,
        users::login,
        users::logout,
        users::get_me,
        users::update_me,
        users::upload_avatar,
        users::get_user_by_username,
        users::get_user_videos,
        users::get_user_liked_videos,
        users::get_suggested_users,
        videos::list_videos,
        videos::trending_videos,
        videos::videos_by_category,
        videos::get_video,
        videos::share_video,
        videos::create_video,
        videos::update_video,
        videos::delete_video,
        videos::like_video,
        videos::add_comment,
        videos::delete_comment,
        videos::upload_signature,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
    ),
    components(
        schemas(
            api::response::Empty,
            api::response::PageRef,
            api::response::Pagination,
            health::HealthResponse,
            users::AccountResponse,
            users::AuthPayload,
            users::PublicProfile,
            users::PrivateProfile,
            users::SuggestedUser,
            users::RegisterRequest,
            users::LoginRequest,
            users::UpdateProfileRequest,
            users::AvatarRequest,
            videos::CreateVideoRequest,
            videos::UpdateVideoRequest,
            videos::CommentRequest,
            services::video_service::VideoResponse,
            services::video_service::UserSummary,
            services::video_service::CommentResponse,
            services::video_service::LikeToggle,
            services::video_service::ShareCount,
            services::media_host::UploadSignature,
            categories::CreateCategoryRequest,
            categories::UpdateCategoryRequest,
            entities::categories::Model,
            entities::categories::CategoryIcon,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "users", description = "Accounts, sessions and profiles"),
        (name = "videos", description = "Publishing, feeds and engagement"),
        (name = "categories", description = "Category catalogue"),
        (name = "system", description = "Health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub media: Arc<dyn MediaHost>,
    pub videos: Arc<VideoService>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, media: Arc<dyn MediaHost>, config: AppConfig) -> Self {
        let videos = Arc::new(VideoService::new(db.clone(), media.clone()));
        Self {
            db,
            media,
            videos,
            config,
        }
    }
}

fn user_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(users::get_me).put(users::update_me))
        .route("/avatar", post(users::upload_avatar))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/logout", get(users::logout))
        .route("/suggested", get(users::get_suggested_users))
        .route("/:username", get(users::get_user_by_username))
        .route("/:username/videos", get(users::get_user_videos))
        .route("/:username/liked-videos", get(users::get_user_liked_videos))
        .merge(protected)
}

fn video_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(videos::create_video))
        .route("/upload-signature", get(videos::upload_signature))
        .route(
            "/:id",
            put(videos::update_video).delete(videos::delete_video),
        )
        .route("/:id/like", put(videos::like_video))
        .route("/:id/comments", post(videos::add_comment))
        .route("/:id/comments/:comment_id", delete(videos::delete_comment))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(videos::list_videos))
        .route("/trending", get(videos::trending_videos))
        .route("/category/:category_id", get(videos::videos_by_category))
        .route("/:id", get(videos::get_video))
        .route("/:id/share", put(videos::share_video))
        .merge(protected)
}

fn category_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(categories::create_category))
        .route(
            "/:id",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(categories::list_categories))
        .route("/:id", get(categories::get_category))
        .merge(protected)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("⚠️ Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    // Credentials rule out wildcards, so everything is listed explicitly
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .nest("/api/users", user_routes(&state))
        .nest("/api/videos", video_routes(&state))
        .nest("/api/categories", category_routes(&state))
        .fallback(route_not_found)
        .layer(from_fn(security_headers))
        .layer(cors_layer(&state.config))
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .with_state(state)
}
