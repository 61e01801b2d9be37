use crate::application::invalidation::RouteRevisions;
use crate::application::post_service::PostService;
use crate::application::user_service::UserService;
use crate::infrastructure::config::AppConfig;
use crate::presentation::handlers::api_scope;
use crate::presentation::middleware::RequestContextMiddleware;
use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use tracing::info;

pub async fn start_rest_server(
    config: AppConfig,
    post_service: PostService,
    user_service: UserService,
    revisions: Arc<RouteRevisions>,
) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(
        host = %bind_address.0,
        port = bind_address.1,
        "HTTP server starting"
    );

    let post_service = web::Data::new(post_service);
    let user_service = web::Data::new(user_service);
    let revisions = web::Data::from(revisions);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestContextMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(build_cors(&config))
            .app_data(post_service.clone())
            .app_data(user_service.clone())
            .app_data(revisions.clone())
            .service(api_scope())
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    info!("HTTP server stopped");
    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::IF_NONE_MATCH,
        ])
        .expose_headers(vec![actix_web::http::header::ETAG])
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }

    cors
}
