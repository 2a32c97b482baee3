use std::sync::Arc;

use actix_web::{App, HttpServer};
use anyhow::Context;
use paperclip::actix::{web, OpenApiExt};
use tracing_actix_web::TracingLogger;

use dogwalk_api::app_config::{config_app, cors, json_config, query_config};
use dogwalk_api::settings::Settings;
use dogwalk_api::telemetry::init_telemetry;
use dogwalk_api::walk_repository::{
    InMemoryWalkRepository, PostgresWalkRepository, WalkRepository,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry("dogwalk_api")?;

    let settings = Settings::from_env()?;
    settings.log_startup();

    let walk_repository: Arc<dyn WalkRepository> = if settings.use_in_memory_db {
        Arc::new(InMemoryWalkRepository::default())
    } else {
        Arc::new(
            PostgresWalkRepository::init(settings.postgres_config())
                .await
                .context("Failed to init postgres")?,
        )
    };
    let cors_origins = settings.cors_origins();

    HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(web::Data::new(walk_repository.clone()))
            .app_data(json_config())
            .app_data(query_config())
            .wrap(cors(&cors_origins))
            .wrap(TracingLogger::default())
            .configure(config_app)
            .with_json_spec_at("/apispec/v2")
            .build()
    })
    .bind((settings.http_host.as_str(), settings.http_port))?
    .run()
    .await?;

    Ok(())
}
