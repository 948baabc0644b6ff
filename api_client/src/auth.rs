//! Login, token refresh and logout for administrator accounts.
//!
//! None of these keep state of their own; the session lives in the
//! [`TokenStore`](crate::TokenStore) behind the context. `login` and
//! `refresh_token` only return the new [`Session`]; the caller decides whether
//! to persist it. `logout` always clears the store, even when the backend
//! could not be reached.

use domain::{LoginCredentials, Session};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::context::ApiContext;
use crate::envelope::{ApiResponse, SUCCESS_CODE, WRAPPER_KEY};
use crate::error::{ApiError, AuthError};
use crate::transport::{ApiRequest, Credential};

pub const LOGIN_PATH: &str = "adminMember/login";
pub const REFRESH_PATH: &str = "adminMember/tokenrefresh";
pub const LOGOUT_PATH: &str = "adminMember/logout";

pub struct AuthClient {
    ctx: ApiContext,
}

impl AuthClient {
    pub fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, AuthError> {
        let body = serde_json::to_value(credentials).map_err(ApiError::from)?;
        let req = ApiRequest::new(Method::POST, LOGIN_PATH)
            .json(body)
            .credential(Credential::None);
        let session = session_from(self.ctx.send(req).await?)?;
        info!(user = session.user.id, "logged in");
        Ok(session)
    }

    /// Exchanges the stored refresh token for a new session.
    pub async fn refresh_token(&self) -> Result<Session, AuthError> {
        let req = ApiRequest::new(Method::POST, REFRESH_PATH)
            .json(json!({}))
            .credential(Credential::RefreshToken);
        session_from(self.ctx.send(req).await?)
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        let req = ApiRequest::new(Method::POST, LOGOUT_PATH);
        let outcome = self.ctx.send(req).await;

        if let Err(e) = self.ctx.tokens().clear() {
            warn!(error = %e, "could not clear local session");
            if outcome.is_ok() {
                return Err(e.into());
            }
        }

        match outcome {
            Ok(body) => check_logout(&body),
            Err(e) => {
                warn!(error = %e, "logout request failed");
                Err(logout_failure(e))
            }
        }
    }
}

fn session_from(body: Value) -> Result<Session, AuthError> {
    let resp: ApiResponse<Session> = ApiResponse::from_body(body)?;
    if !resp.is_success() {
        return Err(AuthError::Rejected {
            code: resp.error_code,
            message: resp.message,
        });
    }
    resp.result.ok_or(AuthError::EmptyResult)
}

/// A logout reply is only a failure when it carries a non-success code.
fn check_logout(body: &Value) -> Result<(), AuthError> {
    let Some(wrapper) = body.get(WRAPPER_KEY) else {
        return Ok(());
    };
    let code = wrapper.get("ErrorCode").and_then(Value::as_str).unwrap_or(SUCCESS_CODE);
    if code == SUCCESS_CODE {
        return Ok(());
    }
    let message = wrapper
        .get("Message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or("logout failed");
    Err(AuthError::Rejected {
        code: code.to_string(),
        message: message.to_string(),
    })
}

fn logout_failure(err: ApiError) -> AuthError {
    match err {
        ApiError::Status {
            status,
            message: Some(message),
        } => AuthError::Rejected {
            code: status.to_string(),
            message,
        },
        other => AuthError::Api(other),
    }
}
