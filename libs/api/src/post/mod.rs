use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use repository::Repository;
use tracing::debug;

pub mod request;
pub mod response;

use crate::response::{ApiResponse, IntoApiResponse, MessageResponse};
use crate::ApiError;

use self::{
    request::{CreatePostRequest, UpdatePostRequest},
    response::PostResponse,
};

/// Ids that do not parse can never match a stored post.
fn parse_id(id: &str) -> Option<i32> {
    id.parse().ok()
}

fn not_found(message: &str) -> ApiError {
    ApiError::NotFound(message.to_string())
}

/// Create a post
#[utoipa::path(
    post,
    path = "/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 500, description = "Missing title or store failure", body = ErrorResponse)
    )
)]
pub async fn create_post(
    State(repo): State<Repository>,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResponse<(StatusCode, Json<PostResponse>)> {
    let Json(body) = body?;

    let post = repo
        .post
        .create(body.into())
        .await
        .into_response("error creating post")?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// List all posts
#[utoipa::path(
    get,
    path = "/posts",
    tag = "posts",
    responses(
        (status = 200, description = "List all posts successfully", body = [PostResponse]),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn get_posts(
    State(repo): State<Repository>,
) -> ApiResponse<Json<Vec<PostResponse>>> {
    let posts = repo
        .post
        .find_all()
        .await
        .into_response("error fetching posts")?;
    debug!(count = posts.len(), "fetched posts");

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Get a post
#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "posts",
    responses(
        (status = 200, description = "Post found", body = PostResponse),
        (status = 404, description = "Post Not Found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    params(
        ("id" = String, Path, description = "post id"),
    )
)]
pub async fn get_post(
    State(repo): State<Repository>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResponse<Json<PostResponse>> {
    let Path(id) = id?;
    let Some(id) = parse_id(&id) else {
        return Err(not_found("Post Not Found"));
    };

    let post = repo
        .post
        .find_by_id(id)
        .await
        .into_response("error fetching post")?;

    let Some(post) = post else {
        return Err(not_found("Post Not Found"));
    };

    Ok(Json(PostResponse::from(post)))
}

/// Update a post
#[utoipa::path(
    put,
    path = "/posts/{id}",
    tag = "posts",
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated successfully", body = MessageResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 500, description = "Invalid title or store failure", body = ErrorResponse)
    ),
    params(
        ("id" = String, Path, description = "post id"),
    )
)]
pub async fn update_post(
    State(repo): State<Repository>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> ApiResponse<Json<MessageResponse>> {
    let Path(id) = id?;
    let Json(body) = body?;

    let Some(id) = parse_id(&id) else {
        return Err(not_found("Post not found"));
    };

    let updated_rows = repo
        .post
        .update(id, body.into())
        .await
        .into_response("error updating post")?;

    if updated_rows == 0 {
        return Err(not_found("Post not found"));
    }

    Ok(MessageResponse::new("Post updated successfully"))
}

// The "Task" wording is kept for compatibility with existing clients.
/// Delete a post
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "posts",
    responses(
        (status = 200, description = "Task deleted successfully", body = MessageResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    params(
        ("id" = String, Path, description = "post id"),
    )
)]
pub async fn delete_post(
    State(repo): State<Repository>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResponse<Json<MessageResponse>> {
    let Path(id) = id?;
    let Some(id) = parse_id(&id) else {
        return Err(not_found("Task not found"));
    };

    let deleted_rows = repo
        .post
        .delete(id)
        .await
        .into_response("error deleting post")?;

    if deleted_rows == 0 {
        return Err(not_found("Task not found"));
    }

    Ok(MessageResponse::new("Task deleted successfully"))
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use repository::init_repository;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::router;

    async fn app() -> Router {
        let repo = init_repository("sqlite::memory:", 1).await.unwrap();
        router(repo)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, value)
    }

    async fn create(app: &Router, title: &str, content: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/posts",
            Some(json!({ "title": title, "content": content })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn test_create_post() {
        // Arrange
        let app = app().await;

        // Act
        let (status, body) = send(
            &app,
            Method::POST,
            "/posts",
            Some(json!({ "title": "hello", "content": "world" })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].as_i64().unwrap() > 0);
        assert_eq!(body["title"], "hello");
        assert_eq!(body["content"], "world");
        assert_eq!(body["createdAt"], body["updatedAt"]);
    }

    #[tokio::test]
    async fn test_create_post_without_content() {
        let app = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/posts",
            Some(json!({ "title": "only a title" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["content"], Value::Null);
    }

    #[tokio::test]
    async fn test_create_post_without_title_is_internal_error() {
        let app = app().await;

        for body in [json!({ "content": "no title" }), json!({ "title": "" })] {
            let (status, body) =
                send(&app, Method::POST, "/posts", Some(body)).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, json!({ "error": "Internal Server Error" }));
        }

        let (_, posts) = send(&app, Method::GET, "/posts", None).await;
        assert_eq!(posts, json!([]));
    }

    #[tokio::test]
    async fn test_create_post_with_malformed_body_is_internal_error() {
        let app = app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/posts")
            .header("content-type", "application/json")
            .body(Body::from("{\"title\": "))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_posts_lists_every_created_post_once() {
        // Arrange
        let app = app().await;
        let mut ids = vec![];
        for n in 0..3 {
            let post = create(&app, &format!("post {n}"), "body").await;
            ids.push(post["id"].as_i64().unwrap());
        }

        // Act
        let (status, body) = send(&app, Method::GET, "/posts", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let listed: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_get_posts_on_empty_store() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/posts", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_get_post() {
        let app = app().await;
        let created = create(&app, "hello", "world").await;

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/posts/{}", created["id"]),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, created);
    }

    #[tokio::test]
    async fn test_get_post_not_found() {
        let app = app().await;

        for uri in ["/posts/999999", "/posts/abc"] {
            let (status, body) = send(&app, Method::GET, uri, None).await;

            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, json!({ "error": "Post Not Found" }));
        }
    }

    #[tokio::test]
    async fn test_update_post() {
        // Arrange
        let app = app().await;
        let created = create(&app, "before", "old").await;
        let uri = format!("/posts/{}", created["id"]);
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Act
        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({ "title": "after", "content": "new" })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Post updated successfully" }));

        let (_, updated) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(updated["title"], "after");
        assert_eq!(updated["content"], "new");
        assert_eq!(updated["createdAt"], created["createdAt"]);
        let before: chrono::DateTime<chrono::Utc> =
            serde_json::from_value(created["updatedAt"].clone()).unwrap();
        let after: chrono::DateTime<chrono::Utc> =
            serde_json::from_value(updated["updatedAt"].clone()).unwrap();
        assert!(after > before);
    }

    #[tokio::test]
    async fn test_update_post_with_same_values_still_succeeds() {
        let app = app().await;
        let created = create(&app, "same", "same").await;

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/posts/{}", created["id"]),
            Some(json!({ "title": "same", "content": "same" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_post_with_null_title_is_internal_error() {
        let app = app().await;
        let created = create(&app, "title", "body").await;

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/posts/{}", created["id"]),
            Some(json!({ "title": null })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal Server Error" }));
    }

    #[tokio::test]
    async fn test_update_post_not_found() {
        let app = app().await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/posts/999999",
            Some(json!({ "title": "ghost" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Post not found" }));
        let (_, posts) = send(&app, Method::GET, "/posts", None).await;
        assert_eq!(posts, json!([]));
    }

    #[tokio::test]
    async fn test_delete_post_twice() {
        // Arrange
        let app = app().await;
        let created = create(&app, "gone", "soon").await;
        let uri = format!("/posts/{}", created["id"]);

        // Act
        let (first_status, first_body) =
            send(&app, Method::DELETE, &uri, None).await;
        let (second_status, second_body) =
            send(&app, Method::DELETE, &uri, None).await;

        // Assert
        assert_eq!(first_status, StatusCode::OK);
        assert_eq!(first_body, json!({ "message": "Task deleted successfully" }));
        assert_eq!(second_status, StatusCode::NOT_FOUND);
        assert_eq!(second_body, json!({ "error": "Task not found" }));

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_undecodable_path_id_is_internal_error() {
        // Arrange
        let app = app().await;

        for (method, body) in [
            (Method::GET, None),
            (Method::PUT, Some(json!({ "title": "x" }))),
            (Method::DELETE, None),
        ] {
            // Act
            let (status, body) = send(&app, method, "/posts/%FF", body).await;

            // Assert
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, json!({ "error": "Internal Server Error" }));
        }
    }

    #[tokio::test]
    async fn test_trailing_slash_is_the_collection() {
        let app = app().await;
        let created = create(&app, "slash", "body").await;

        let (status, body) = send(&app, Method::GET, "/posts/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([created]));
    }

    #[tokio::test]
    async fn test_unknown_routes_are_not_found() {
        let app = app().await;

        for (method, uri) in [
            (Method::GET, "/nonexistent"),
            (Method::PATCH, "/posts"),
            (Method::POST, "/posts/1"),
            (Method::GET, "/posts/1/comments"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;

            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, json!({ "error": "Not Found" }));
        }
    }
}
