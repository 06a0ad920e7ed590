pub mod prelude;

pub mod post;
