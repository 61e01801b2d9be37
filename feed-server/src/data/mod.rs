pub mod post_repository;
pub mod predicate;
pub mod user_repository;
