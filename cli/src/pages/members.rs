use api_client::PublicMembersClient;
use domain::forms::PublicMemberForm;

use super::{submit, FormMode, Outcome, Route, SubmitGuard};

pub struct MemberFormPage<'a> {
    members: &'a PublicMembersClient,
    mode: FormMode,
    submitting: SubmitGuard,
}

impl<'a> MemberFormPage<'a> {
    pub fn new(members: &'a PublicMembersClient, mode: FormMode) -> Self {
        Self {
            members,
            mode,
            submitting: SubmitGuard::default(),
        }
    }

    pub async fn submit(&self, form: &PublicMemberForm) -> Outcome {
        let input = match form.validate() {
            Ok(input) => input,
            Err(e) => return Outcome::invalid(&e),
        };
        if self.mode == FormMode::Create && input.password.is_none() {
            return Outcome::error("password is required");
        }
        let (members, mode) = (self.members, self.mode);
        let call = async move {
            match mode {
                FormMode::Create => members.create(&input).await,
                FormMode::Edit(id) => members.update(id, &input).await,
            }
        };
        submit(&self.submitting, call, |member| {
            Outcome::success(format!("Member {} saved", member.username), Some(Route::MemberList))
        })
        .await
    }
}

pub async fn delete_member(guard: &SubmitGuard, members: &PublicMembersClient, id: i64) -> Outcome {
    submit(guard, members.delete(id), |_| {
        Outcome::success("Member deleted", Some(Route::MemberList))
    })
    .await
}
