use api_client::AdminClient;
use domain::forms::LoginForm;
use tracing::warn;

use super::{Outcome, Route, SubmitGuard};

pub struct LoginPage<'a> {
    client: &'a AdminClient,
    submitting: SubmitGuard,
}

impl<'a> LoginPage<'a> {
    pub fn new(client: &'a AdminClient) -> Self {
        Self {
            client,
            submitting: SubmitGuard::default(),
        }
    }

    /// Logs in and persists the session; the auth client itself never does.
    pub async fn submit(&self, form: &LoginForm) -> Outcome {
        let credentials = match form.validate() {
            Ok(c) => c,
            Err(e) => return Outcome::invalid(&e),
        };
        let Some(submitting) = self.submitting.begin() else {
            return Outcome::ignored();
        };
        let result = self.client.auth().login(&credentials).await;
        drop(submitting);

        let session = match result {
            Ok(s) => s,
            Err(e) => return Outcome::error(e.user_message()),
        };
        if let Err(e) = self.client.tokens().save_session(&session) {
            warn!(error = %e, "session not saved");
            return Outcome::error("Logged in, but the session could not be saved.");
        }
        Outcome::success(format!("Welcome, {}", session.user.name), Some(Route::Dashboard))
    }
}

/// Always lands on the login page: the local session is gone either way.
pub async fn logout(client: &AdminClient) -> Outcome {
    match client.auth().logout().await {
        Ok(()) => Outcome::success("Logged out", Some(Route::Login)),
        Err(e) => Outcome {
            navigate_to: Some(Route::Login),
            ..Outcome::error(e.user_message())
        },
    }
}

/// Swaps the stored tokens for fresh ones.
pub async fn refresh(client: &AdminClient) -> Outcome {
    let session = match client.auth().refresh_token().await {
        Ok(s) => s,
        Err(e) => return Outcome::error(e.user_message()),
    };
    match client.tokens().save_session(&session) {
        Ok(()) => Outcome::success("Session refreshed", None),
        Err(e) => Outcome::error(format!("Session not saved: {e}")),
    }
}
