pub mod error;
pub mod filter;
pub mod pagination;
pub mod post;
pub mod user;
