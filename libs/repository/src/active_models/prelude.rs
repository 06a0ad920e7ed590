pub use super::post::Entity as Post;
