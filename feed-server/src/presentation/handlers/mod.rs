use actix_web::{Scope, web};

pub mod health;
pub mod post;
pub mod user;

/// Everything under `/api`.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(health::health)
        .service(post::list_posts)
        .service(post::get_post)
        .service(post::delete_post)
        .service(user::search_users)
}
