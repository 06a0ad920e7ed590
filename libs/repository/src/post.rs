use chrono::Utc;
use entity::prelude::*;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::active_models::{prelude::*, *};
use crate::response::{IntoResponse, Response};
use crate::RepositoryError;

#[derive(Clone, Debug)]
pub struct PostRepository {
    db: DatabaseConnection,
}

impl PostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl From<post::Model> for PostEntity {
    fn from(value: post::Model) -> Self {
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Stored titles are never null nor empty.
fn required_title(title: Option<String>) -> Response<String> {
    match title {
        Some(title) if !title.is_empty() => Ok(title),
        _ => Err(RepositoryError::MissingTitle),
    }
}

impl PostRepository {
    pub async fn create(&self, post: NewPost) -> Response<PostEntity> {
        let title = required_title(post.title)?;
        let now = Utc::now();

        let model = post::ActiveModel {
            id: ActiveValue::NotSet,
            title: ActiveValue::set(title),
            content: ActiveValue::set(post.content),
            created_at: ActiveValue::set(now),
            updated_at: ActiveValue::set(now),
        };

        let post = model.insert(&self.db).await.into_response("in create")?;

        Ok(PostEntity::from(post))
    }

    pub async fn find_all(&self) -> Response<Vec<PostEntity>> {
        let posts = Post::find()
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .into_response("in find all")?;

        Ok(posts.into_iter().map(PostEntity::from).collect())
    }

    pub async fn find_by_id(&self, id: i32) -> Response<Option<PostEntity>> {
        let post = Post::find_by_id(id)
            .one(&self.db)
            .await
            .into_response("in find by id")?;

        Ok(post.map(PostEntity::from))
    }

    /// Applies `changes` to the post with `id` and returns how many rows
    /// matched. `updatedAt` is refreshed even when nothing else changes.
    pub async fn update(&self, id: i32, changes: PostChanges) -> Response<u64> {
        let mut query = Post::update_many()
            .col_expr(post::Column::UpdatedAt, Expr::value(Utc::now()));

        if let Some(title) = changes.title {
            let title = required_title(title)?;
            query = query.col_expr(post::Column::Title, Expr::value(title));
        }

        if let Some(content) = changes.content {
            query = query.col_expr(post::Column::Content, Expr::value(content));
        }

        let result = query
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .into_response("in update")?;

        Ok(result.rows_affected)
    }

    pub async fn delete(&self, id: i32) -> Response<u64> {
        let result = Post::delete_by_id(id)
            .exec(&self.db)
            .await
            .into_response("in delete")?;

        Ok(result.rows_affected)
    }
}
