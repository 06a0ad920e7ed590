use chrono::{DateTime, Utc};

#[derive(Debug, Default, PartialEq, Clone)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a post. `title` is optional here so that
/// the store, not the caller, decides whether a post without one is valid.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Fields replaced by an update.
///
/// The outer `Option` tells whether the field was supplied at all: `None`
/// leaves the stored value untouched, `Some(None)` writes null.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct PostChanges {
    pub title: Option<Option<String>>,
    pub content: Option<Option<String>>,
}
