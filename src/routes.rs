use crate::{api::attendance, auth::middleware::auth_middleware, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(build_limiter(config.rate_protected_per_min)) // rate limiting
            .service(
                web::scope("/attendances")
                    // /attendances
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendances))
                            .route(web::post().to(attendance::mark_attendance)),
                    )
                    // /attendances/user/{user_id}
                    .service(
                        web::resource("/user/{user_id}")
                            .route(web::get().to(attendance::get_user_attendances)),
                    )
                    // /attendances/user/{user_id}/stats
                    .service(
                        web::resource("/user/{user_id}/stats")
                            .route(web::get().to(attendance::get_user_stats)),
                    )
                    // /attendances/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(attendance::get_attendance))
                            .route(web::put().to(attendance::update_attendance))
                            .route(web::patch().to(attendance::update_attendance))
                            .route(web::delete().to(attendance::delete_attendance)),
                    ),
            ),
    );
}
