use axum::{
    routing::{get, MethodRouter},
    Router,
};

use repository::Repository;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

pub mod healthz;
pub mod not_found;
pub mod post;
mod response;

pub use response::{ApiResponse, ErrorResponse, MessageResponse};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    ServerError,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        post::create_post,
        post::get_posts,
        post::get_post,
        post::update_post,
        post::delete_post,
    ),
    components(schemas(
        post::request::CreatePostRequest,
        post::request::UpdatePostRequest,
        post::response::PostResponse,
        MessageResponse,
        ErrorResponse,
    )),
    tags(
        (name = "posts", description = "Post management API")
    )
)]
struct ApiDoc;

/// `/posts` and `/posts/` are the same collection.
fn post_collection() -> MethodRouter<Repository> {
    get(post::get_posts)
        .post(post::create_post)
        .fallback(not_found::get_404)
}

pub fn router(repository: Repository) -> Router {
    info!(task = "build api router");

    // posts
    let post_router = Router::new()
        .route("/posts", post_collection())
        .route("/posts/", post_collection())
        .route(
            "/posts/:id",
            get(post::get_post)
                .put(post::update_post)
                .delete(post::delete_post)
                .fallback(not_found::get_404),
        )
        .with_state(repository);

    Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .route("/healthz", get(healthz::get_health))
        .merge(post_router)
        .fallback(not_found::get_404)
        .layer(CatchPanicLayer::custom(response::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
