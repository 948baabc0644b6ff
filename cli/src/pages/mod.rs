//! Console pages: validate a form, make one backend call, report the result
//! as a toast and the route to show next.

pub mod auth;
pub mod board;
pub mod content;
pub mod members;

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use api_client::ApiError;
use domain::forms::FormError;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Error(String),
}

impl Toast {
    pub fn is_error(&self) -> bool {
        matches!(self, Toast::Error(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Toast::Success(m) | Toast::Error(m) => m,
        }
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Toast::Success(m) => write!(f, "{m}"),
            Toast::Error(m) => write!(f, "Error: {m}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    NoticeList,
    Notice(i64),
    FaqList,
    InquiryList,
    Inquiry(i64),
    MemberList,
    ArticleList,
    VideoList,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => write!(f, "/login"),
            Route::Dashboard => write!(f, "/admin"),
            Route::NoticeList => write!(f, "/admin/board/notices"),
            Route::Notice(id) => write!(f, "/admin/board/notices/{id}"),
            Route::FaqList => write!(f, "/admin/board/faqs"),
            Route::InquiryList => write!(f, "/admin/board/inquiries"),
            Route::Inquiry(id) => write!(f, "/admin/board/inquiries/{id}"),
            Route::MemberList => write!(f, "/admin/members"),
            Route::ArticleList => write!(f, "/admin/articles"),
            Route::VideoList => write!(f, "/admin/videos"),
        }
    }
}

/// What the operator sees after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub toast: Option<Toast>,
    pub navigate_to: Option<Route>,
}

impl Outcome {
    pub fn success(message: impl Into<String>, route: Option<Route>) -> Self {
        Self {
            toast: Some(Toast::Success(message.into())),
            navigate_to: route,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            toast: Some(Toast::Error(message.into())),
            navigate_to: None,
        }
    }

    /// A submission that was dropped because another one is in flight.
    pub fn ignored() -> Self {
        Self {
            toast: None,
            navigate_to: None,
        }
    }

    pub fn invalid(err: &FormError) -> Self {
        Self::error(err.to_string())
    }

    pub fn failed(err: &ApiError) -> Self {
        Self::error(err.user_message())
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.toast, Some(Toast::Success(_)))
    }
}

/// Whether a page is creating a new item or editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// The "submitting" flag of a page.
///
/// Set while a request is in flight; a second submission in that window is
/// dropped. There is no queue behind it.
#[derive(Debug, Default)]
pub struct SubmitGuard(AtomicBool);

impl SubmitGuard {
    pub(crate) fn begin(&self) -> Option<Submitting<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Submitting(&self.0))
    }
}

/// Clears the flag when the request finishes or is abandoned.
pub(crate) struct Submitting<'a>(&'a AtomicBool);

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs `call` under `guard` and turns the result into an [`Outcome`].
pub(crate) async fn submit<T, F>(
    guard: &SubmitGuard,
    call: F,
    on_success: impl FnOnce(T) -> Outcome,
) -> Outcome
where
    F: Future<Output = Result<T, ApiError>>,
{
    let Some(_submitting) = guard.begin() else {
        debug!("submission already in flight");
        return Outcome::ignored();
    };
    match call.await {
        Ok(value) => on_success(value),
        Err(e) => {
            warn!(error = %e, "request failed");
            Outcome::failed(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn done(_: ()) -> Outcome {
        Outcome::success("done", None)
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_ignored() {
        let guard = SubmitGuard::default();
        let (release, pending) = oneshot::channel::<()>();
        let first = submit(
            &guard,
            async { pending.await.map_err(|_| ApiError::Transport("closed".into())) },
            done,
        );
        let second = async {
            let outcome = submit(&guard, async { Ok(()) }, done).await;
            release.send(()).unwrap();
            outcome
        };

        let (first, second) = tokio::join!(first, second);
        assert!(first.succeeded());
        assert_eq!(second, Outcome::ignored());
        assert!(!guard.0.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn flag_is_released_after_a_failure() {
        let guard = SubmitGuard::default();
        let offline = async { Err::<(), _>(ApiError::Transport("offline".into())) };
        let failed = submit(&guard, offline, done).await;
        assert!(failed.toast.unwrap().is_error());
        assert!(submit(&guard, async { Ok(()) }, done).await.succeeded());
    }

    #[test]
    fn toasts_print_plainly() {
        assert_eq!(Toast::Success("Saved".into()).to_string(), "Saved");
        assert_eq!(Toast::Error("Nope".into()).to_string(), "Error: Nope");
        assert_eq!(Route::Notice(4).to_string(), "/admin/board/notices/4");
    }
}
