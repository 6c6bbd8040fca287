use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::authenticator::{UnauthReason, VerifiedIdentity};
use crate::error::AppError;

/// The caller of a route behind `SessionAuth`.
///
/// Rejects with 401 "missing token" when no identity was attached, which
/// only happens if a handler is mounted outside a protected scope.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub VerifiedIdentity);

impl Deref for CurrentUser {
    type Target = VerifiedIdentity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<VerifiedIdentity>().cloned();
        ready(
            identity
                .map(CurrentUser)
                .ok_or(AppError::unauthenticated(UnauthReason::MissingToken)),
        )
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[actix_web::test]
    async fn test_reads_attached_identity() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(VerifiedIdentity {
            id: "sub-1".into(),
            user_id: 1,
            username: "reader".into(),
            email: "reader@example.test".into(),
        });

        let user = CurrentUser::extract(&req).await.unwrap();
        assert_eq!(user.id, "sub-1");
        assert_eq!(user.user_id, 1);
    }

    #[actix_web::test]
    async fn test_without_identity_is_unauthenticated() {
        let req = TestRequest::default().to_http_request();
        let err = CurrentUser::extract(&req).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Unauthenticated {
                reason: UnauthReason::MissingToken
            }
        ));
    }
}
