use api_client::BoardClient;
use domain::forms::{FaqForm, InquiryAnswerForm, NoticeForm};

use super::{submit, FormMode, Outcome, Route, SubmitGuard};

pub struct NoticeFormPage<'a> {
    board: &'a BoardClient,
    mode: FormMode,
    submitting: SubmitGuard,
}

impl<'a> NoticeFormPage<'a> {
    pub fn new(board: &'a BoardClient, mode: FormMode) -> Self {
        Self {
            board,
            mode,
            submitting: SubmitGuard::default(),
        }
    }

    pub async fn submit(&self, form: &NoticeForm) -> Outcome {
        let input = match form.validate() {
            Ok(input) => input,
            Err(e) => return Outcome::invalid(&e),
        };
        let (board, mode) = (self.board, self.mode);
        let call = async move {
            match mode {
                FormMode::Create => board.create_notice(&input).await,
                FormMode::Edit(id) => board.update_notice(id, &input).await,
            }
        };
        submit(&self.submitting, call, |notice| match mode {
            FormMode::Create => Outcome::success("Notice created", Some(Route::NoticeList)),
            FormMode::Edit(_) => Outcome::success("Notice updated", Some(Route::Notice(notice.id))),
        })
        .await
    }
}

pub async fn delete_notice(guard: &SubmitGuard, board: &BoardClient, id: i64) -> Outcome {
    submit(guard, board.delete_notice(id), |_| {
        Outcome::success("Notice deleted", Some(Route::NoticeList))
    })
    .await
}

pub struct FaqFormPage<'a> {
    board: &'a BoardClient,
    mode: FormMode,
    submitting: SubmitGuard,
}

impl<'a> FaqFormPage<'a> {
    pub fn new(board: &'a BoardClient, mode: FormMode) -> Self {
        Self {
            board,
            mode,
            submitting: SubmitGuard::default(),
        }
    }

    pub async fn submit(&self, form: &FaqForm) -> Outcome {
        let input = match form.validate() {
            Ok(input) => input,
            Err(e) => return Outcome::invalid(&e),
        };
        let (board, mode) = (self.board, self.mode);
        let call = async move {
            match mode {
                FormMode::Create => board.create_faq(&input).await,
                FormMode::Edit(id) => board.update_faq(id, &input).await,
            }
        };
        submit(&self.submitting, call, |_| {
            Outcome::success("FAQ saved", Some(Route::FaqList))
        })
        .await
    }
}

pub async fn delete_faq(guard: &SubmitGuard, board: &BoardClient, id: i64) -> Outcome {
    submit(guard, board.delete_faq(id), |_| {
        Outcome::success("FAQ deleted", Some(Route::FaqList))
    })
    .await
}

pub struct InquiryAnswerPage<'a> {
    board: &'a BoardClient,
    id: i64,
    submitting: SubmitGuard,
}

impl<'a> InquiryAnswerPage<'a> {
    pub fn new(board: &'a BoardClient, id: i64) -> Self {
        Self {
            board,
            id,
            submitting: SubmitGuard::default(),
        }
    }

    pub async fn submit(&self, form: &InquiryAnswerForm) -> Outcome {
        let input = match form.validate() {
            Ok(input) => input,
            Err(e) => return Outcome::invalid(&e),
        };
        let (board, id) = (self.board, self.id);
        let call = async move { board.answer_inquiry(id, &input).await };
        submit(&self.submitting, call, |inquiry| {
            Outcome::success("Answer sent", Some(Route::Inquiry(inquiry.id)))
        })
        .await
    }
}
