pub mod fault_policy;
pub mod invalidation;
pub mod post_service;
pub mod user_service;
