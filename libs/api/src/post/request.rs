use entity::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Fields left out of the body keep their stored value; `null` clears them.
#[derive(Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub content: Option<Option<String>>,
}

impl From<CreatePostRequest> for NewPost {
    fn from(value: CreatePostRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
        }
    }
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(value: UpdatePostRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
        }
    }
}
