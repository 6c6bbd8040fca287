//! Session authentication for protected scopes.
//!
//! On success the [`VerifiedIdentity`] is inserted into request extensions
//! for the `CurrentUser` extractor. On failure the request never reaches
//! the handler and the mapped `AppError` response is returned directly.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::authenticator::{SessionAuthenticator, VerifiedIdentity};
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct SessionAuth;

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                let err = AppError::internal("AppState not available");
                return Ok(req.error_response(err).map_into_right_body());
            };

            let outcome = SessionAuthenticator::new(&state.security, state.credentials.as_ref())
                .authenticate(req.headers(), req.path())
                .await;

            match outcome {
                Ok(identity) => {
                    req.extensions_mut().insert::<VerifiedIdentity>(identity);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(e) => Ok(req.error_response(AppError::from(e)).map_into_right_body()),
            }
        })
    }
}
