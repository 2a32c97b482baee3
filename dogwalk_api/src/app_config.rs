use actix_cors::Cors;
use actix_web::web::{JsonConfig, QueryConfig};
use paperclip::actix::web;

use crate::error::ServiceError;
use crate::handlers;

pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(web::resource("/users").route(web::post().to(handlers::create_user)))
        .service(
            web::scope("/paths")
                .service(web::resource("").route(web::post().to(handlers::create_path)))
                .service(
                    web::resource("/liked").route(web::get().to(handlers::get_liked_paths)),
                ),
        )
        .service(web::resource("/feedback").route(web::post().to(handlers::create_feedback)))
        .service(
            web::scope("/routes").service(
                web::resource("/recommend").route(web::post().to(handlers::recommend_routes)),
            ),
        );
}

/// Malformed JSON bodies are rejected with 422 and a `detail` message
pub fn json_config() -> JsonConfig {
    JsonConfig::default()
        .error_handler(|err, _req| ServiceError::Unprocessable(err.to_string()).into())
}

/// Malformed query strings are rejected with 422 and a `detail` message
pub fn query_config() -> QueryConfig {
    QueryConfig::default()
        .error_handler(|err, _req| ServiceError::Unprocessable(err.to_string()).into())
}

/// Empty allow-list lets any origin in, otherwise only the listed origins
pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if allowed_origins.is_empty() {
        cors.allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(cors.supports_credentials(), |cors, origin| {
                cors.allowed_origin(origin)
            })
    }
}
