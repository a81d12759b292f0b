use actix_web::web::{self, Data};
use actix_web::HttpResponse;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::booking_service::{self, BookingView, CreateBookingRequest};
use crate::controller::context::ClubContext;
use crate::error::ClubError;
use crate::model::{BookingStatus, InviteResponse};
use crate::storage::TeeTimeFilter;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub member_id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    pub member_id: String,
    pub response: InviteResponse,
}

#[derive(Deserialize, Debug, Default)]
pub struct TeeTimeQuery {
    pub date: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
}

pub async fn create_booking(
    ctx: Data<ClubContext>,
    body: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, ClubError> {
    let booking = booking_service::create_booking(&ctx, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(BookingView::from(booking)))
}

pub async fn get_booking(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ClubError> {
    let booking = booking_service::get_booking(&ctx, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(BookingView::from(booking)))
}

pub async fn invite_member(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
    body: web::Json<InviteRequest>,
) -> Result<HttpResponse, ClubError> {
    let booking =
        booking_service::invite_member(&ctx, path.into_inner(), &body.member_id).await?;
    Ok(HttpResponse::Ok().json(BookingView::from(booking)))
}

pub async fn respond_to_invite(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
    body: web::Json<RsvpRequest>,
) -> Result<HttpResponse, ClubError> {
    let RsvpRequest {
        member_id,
        response,
    } = body.into_inner();
    let booking =
        booking_service::respond_to_invite(&ctx, path.into_inner(), &member_id, response).await?;
    Ok(HttpResponse::Ok().json(BookingView::from(booking)))
}

pub async fn cancel_booking(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ClubError> {
    let booking = booking_service::cancel_booking(&ctx, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(BookingView::from(booking)))
}

pub async fn total_cost(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ClubError> {
    let booking_id = path.into_inner();
    let total = booking_service::compute_total_cost(&ctx, booking_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "bookingId": booking_id,
        "totalCostCents": total,
    })))
}

pub async fn start_round(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ClubError> {
    let booking = booking_service::start_round(&ctx, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(BookingView::from(booking)))
}

pub async fn list_tee_times(
    ctx: Data<ClubContext>,
    query: web::Query<TeeTimeQuery>,
) -> Result<HttpResponse, ClubError> {
    let TeeTimeQuery { date, status } = query.into_inner();
    let bookings = booking_service::list_tee_times(&ctx, &TeeTimeFilter { date, status }).await?;
    let views: Vec<BookingView> = bookings.into_iter().map(BookingView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}
