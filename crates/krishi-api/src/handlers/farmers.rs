//! Farmer directory handlers.
//!
//! GET /v1/api/farmers - all farmers (public)
//! GET /v1/api/farmers/nearby - farmers at the caller's location (auth required)

use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use krishi_core::AppContext;

use super::caller_id;
use crate::models::{error_response, ErrorResponse, FarmersResponse};

pub async fn get_farmers(ctx: web::Data<Arc<AppContext>>) -> HttpResponse {
    match ctx.users().all_farmers().await {
        Ok(farmers) => HttpResponse::Ok().json(FarmersResponse::new(farmers)),
        Err(e) => error_response(e),
    }
}

pub async fn get_nearby_farmers(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
) -> HttpResponse {
    let Some(me) = caller_id(&req) else {
        return HttpResponse::Unauthorized()
            .json(ErrorResponse::new("Not authorized to access this route"));
    };

    match ctx.users().farmers_near(me).await {
        Ok(farmers) => HttpResponse::Ok().json(FarmersResponse::new(farmers)),
        Err(e) => error_response(e),
    }
}
