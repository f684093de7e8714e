use crate::{
    api::{attendance, profile},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    middleware::{Condition, from_fn},
    web,
};
use std::sync::Arc;

/// Body parse failures become `AppError::Validation` (400 with a JSON message).
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid request body: {err}")).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid query string: {err}")).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let ms_per_request = 60_000 / requests_per_min.max(1) as u64;
        let cfg = GovernorConfigBuilder::default()
            .milliseconds_per_request(ms_per_request.max(1))
            .burst_size(requests_per_min.max(1))
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("limiter period and burst are non-zero");
        Governor::new(&cfg)
    }

    let limited = config.rate_limit_enabled;
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope(&format!("{}/auth", config.api_prefix))
            .app_data(json_config())
            .service(
                web::resource("/login")
                    .wrap(Condition::new(limited, login_limiter.clone()))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/verify")
                    .wrap(from_fn(auth_middleware))
                    .wrap(Condition::new(limited, login_limiter.clone()))
                    .route(web::get().to(handlers::verify)),
            )
            .service(
                web::resource("/logout")
                    .wrap(Condition::new(limited, login_limiter))
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .app_data(json_config())
            .app_data(query_config())
            // authentication
            .wrap(from_fn(auth_middleware))
            .wrap(Condition::new(limited, protected_limiter)) // rate limiting
            .service(web::resource("/profile").route(web::get().to(profile::get_profile)))
            .service(
                web::scope("/attendance")
                    // /attendance/mark
                    .service(web::resource("/mark").route(web::post().to(attendance::mark)))
                    // /attendance/history/{staff_id}
                    .service(
                        web::resource("/history/{staff_id}")
                            .route(web::get().to(attendance::history)),
                    )
                    // /attendance/all
                    .service(web::resource("/all").route(web::get().to(attendance::all_records))),
            ),
    );
}

// LOGIN
//  └─ token (24h, no refresh)

// API REQUEST
//  └─ Authorization: Bearer token

// VERIFY
//  └─ same checks as a protected route, answers with the profile

// LOGOUT
//  └─ client drops the token; it stays valid until exp
