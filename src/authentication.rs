use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use actix_web_httpauth::extractors::bearer::BearerAuth;

use crate::auth_client::{AuthClient, AuthClientError, AuthenticatedUser};
use crate::utils::{error_chain_fmt, json_error};

/// Extractor that only succeeds for requests carrying a valid bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedUser);

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("Missing bearer token.")]
    MissingToken,
    #[error("Invalid bearer token.")]
    InvalidToken,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let code = match self {
            AuthError::MissingToken | AuthError::InvalidToken => "unauthorized",
            AuthError::UnexpectedError(_) => "internal_error",
        };
        json_error(self.status_code(), code)
    }
}

impl FromRequest for Authenticated {
    type Error = AuthError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let credentials = BearerAuth::extract(req);
        let client = req.app_data::<web::Data<AuthClient>>().cloned();

        Box::pin(async move {
            let credentials = credentials.await.map_err(|_| AuthError::MissingToken)?;
            let token = credentials.token().trim();
            if token.is_empty() {
                return Err(AuthError::MissingToken);
            }
            let client = client
                .ok_or_else(|| anyhow::anyhow!("The auth client is not registered."))?;

            match client.get_user(token).await {
                Ok(user) => Ok(Authenticated(user)),
                Err(AuthClientError::Rejected) => Err(AuthError::InvalidToken),
                Err(e) => Err(anyhow::Error::new(e)
                    .context("Failed to verify the access token.")
                    .into()),
            }
        })
    }
}
