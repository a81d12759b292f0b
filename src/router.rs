use actix_web::{HttpResponse, web};

use crate::controller::{booking, caddie, scoring};
use crate::error::ClubError;

/// Every route the service answers. Malformed bodies, paths and queries come
/// back as validation errors in the usual error body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ClubError::validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ClubError::validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ClubError::validation(err.to_string()).into()),
    )
    .route("/health", web::get().to(HttpResponse::Ok))
    .route(
        "/bookings",
        web::post().to(booking::http_handlers::create_booking),
    )
    .route(
        "/bookings/{id}",
        web::get().to(booking::http_handlers::get_booking),
    )
    .route(
        "/bookings/{id}/invite",
        web::post().to(booking::http_handlers::invite_member),
    )
    .route(
        "/bookings/{id}/rsvp",
        web::post().to(booking::http_handlers::respond_to_invite),
    )
    .route(
        "/bookings/{id}/cancel",
        web::post().to(booking::http_handlers::cancel_booking),
    )
    .route(
        "/bookings/{id}/cost",
        web::get().to(booking::http_handlers::total_cost),
    )
    .route(
        "/bookings/{id}/start",
        web::post().to(booking::http_handlers::start_round),
    )
    .route(
        "/bookings/{id}/complete",
        web::post().to(scoring::http_handlers::complete_round),
    )
    .route(
        "/bookings/{id}/caddies",
        web::post().to(caddie::http_handlers::assign_caddie),
    )
    .route(
        "/bookings/{id}/caddies/{caddie_id}",
        web::delete().to(caddie::http_handlers::release_caddie),
    )
    .route(
        "/bookings/{id}/caddie-suggestions",
        web::get().to(caddie::http_handlers::suggest_caddies),
    )
    .route(
        "/caddies",
        web::get().to(caddie::http_handlers::caddie_availability),
    )
    .route(
        "/tee-times",
        web::get().to(booking::http_handlers::list_tee_times),
    )
    .route(
        "/tee-times/{id}/scores",
        web::get().to(scoring::http_handlers::get_scores),
    )
    .route(
        "/tee-times/{id}/scores",
        web::post().to(scoring::http_handlers::save_scores),
    )
    .route(
        "/tee-times/{id}/verification-code",
        web::post().to(scoring::http_handlers::request_code),
    )
    .route(
        "/tee-times/{id}/verify",
        web::post().to(scoring::http_handlers::verify),
    );
}
