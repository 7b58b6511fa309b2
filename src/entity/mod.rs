//! SeaORM entity definitions.

pub mod post;
pub mod project;
pub mod user;
