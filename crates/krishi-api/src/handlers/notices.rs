//! Notice aggregation handler.
//!
//! GET /v1/api/notices - merged government notices (public)
//!
//! This endpoint never hard-fails: the aggregator absorbs every upstream
//! failure and always produces at least the static forms. The response is a
//! bare array, unlike the enveloped routes; that shape is published API.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use krishi_core::AppContext;

pub async fn get_notices(ctx: web::Data<Arc<AppContext>>) -> HttpResponse {
    let notices = ctx.notices().aggregate().await;
    HttpResponse::Ok().json(notices)
}
