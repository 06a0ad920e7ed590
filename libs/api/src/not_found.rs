use crate::ApiError;

pub(super) async fn get_404() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}
