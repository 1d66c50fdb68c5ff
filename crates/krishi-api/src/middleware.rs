//! Authentication middleware.
//!
//! Validates the `Authorization: Bearer <token>` header and attaches the
//! resulting [`AuthenticatedUser`] to request extensions. Protected handlers
//! read the caller id from there and never from the request body.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use log::debug;

use crate::auth::{AuthenticatedUser, JwtAuth};
use crate::models::ErrorResponse;

/// Message matching the rest of the API's terse auth failures.
const UNAUTHORIZED_MESSAGE: &str = "Not authorized to access this route";

/// Authentication middleware factory.
pub struct AuthMiddleware {
    jwt: Arc<JwtAuth>,
}

impl AuthMiddleware {
    pub fn new(jwt: Arc<JwtAuth>) -> Self {
        Self { jwt }
    }
}

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt: self.jwt.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt: Arc<JwtAuth>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let jwt = self.jwt.clone();

        Box::pin(async move {
            let header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .map(str::to_string);

            let claims = header
                .as_deref()
                .ok_or(crate::auth::JwtError::MissingToken)
                .and_then(JwtAuth::bearer_token)
                .and_then(|token| jwt.validate(token))
                .and_then(|claims| claims.user_id().map(|id| (claims, id)));

            match claims {
                Ok((_claims, user_id)) => {
                    req.extensions_mut().insert(AuthenticatedUser::new(user_id));
                    service.call(req).await
                }
                Err(e) => {
                    debug!("rejected request to {}: {}", req.path(), e);
                    let (req, _) = req.into_parts();
                    let response = HttpResponse::Unauthorized()
                        .json(ErrorResponse::new(UNAUTHORIZED_MESSAGE));
                    Ok(ServiceResponse::new(req, response))
                }
            }
        })
    }
}
