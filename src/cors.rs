use actix_cors::Cors;
use actix_web::http::header;
use log::debug;

use crate::config::Config;

/// CORS policy for the API. Only exact renderer origins are accepted, so
/// pages served from anywhere else cannot drive the file or launch routes.
pub fn renderer_cors(config: &Config) -> Cors {
    let origins = config.renderer_origins();
    debug!("Allowed CORS origins: {:?}", origins);

    Cors::default()
        .allowed_origin_fn(move |origin, _req| {
            origin
                .to_str()
                .is_ok_and(|origin| origins.iter().any(|allowed| allowed == origin))
        })
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE, header::CACHE_CONTROL])
        .max_age(3600)
}
