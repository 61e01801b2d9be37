mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use application::fault_policy::FaultPolicy;
use application::invalidation::RouteRevisions;
use application::post_service::PostService;
use application::user_service::UserService;
use data::post_repository::PostgresPostRepository;
use data::user_repository::PostgresUserRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::{LogFormat, init_logging};
use tracing::warn;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging(LogFormat::from_env());

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database).await?;
    run_migrations(&pool).await?;

    let faults = FaultPolicy::from_tag(config.force_errors);
    if let Some(tag) = faults.forced() {
        warn!(operation = %tag, "error simulation enabled");
    }

    let revisions = Arc::new(RouteRevisions::new());
    let post_service = PostService::new(
        Arc::new(PostgresPostRepository::new(pool.clone())),
        faults,
        revisions.clone(),
    );
    let user_service = UserService::new(Arc::new(PostgresUserRepository::new(pool)), faults);

    server::start_rest_server(config, post_service, user_service, revisions).await
}
