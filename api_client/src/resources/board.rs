use domain::{Faq, FaqInput, Inquiry, InquiryAnswer, ListQuery, Notice, NoticeInput, Page};

use super::Collection;
use crate::context::ApiContext;
use crate::error::ApiError;

pub const NOTICES: &str = "board/notices/";
pub const FAQS: &str = "board/faqs/";
pub const INQUIRIES: &str = "board/inquiries/";

/// Notices, FAQs and inquiries under `board/`.
pub struct BoardClient {
    notices: Collection<Notice, NoticeInput>,
    faqs: Collection<Faq, FaqInput>,
    inquiries: Collection<Inquiry, InquiryAnswer>,
}

impl BoardClient {
    pub fn new(ctx: ApiContext) -> Self {
        Self {
            notices: Collection::new(ctx.clone(), NOTICES),
            faqs: Collection::new(ctx.clone(), FAQS),
            inquiries: Collection::new(ctx, INQUIRIES),
        }
    }

    pub async fn list_notices(&self, query: &ListQuery) -> Result<Page<Notice>, ApiError> {
        self.notices.list(query).await
    }

    pub async fn get_notice(&self, id: i64) -> Result<Notice, ApiError> {
        self.notices.get(id).await
    }

    pub async fn create_notice(&self, body: &NoticeInput) -> Result<Notice, ApiError> {
        self.notices.create(body).await
    }

    pub async fn update_notice(&self, id: i64, body: &NoticeInput) -> Result<Notice, ApiError> {
        self.notices.update(id, body).await
    }

    pub async fn delete_notice(&self, id: i64) -> Result<(), ApiError> {
        self.notices.delete(id).await
    }

    pub async fn list_faqs(&self, query: &ListQuery) -> Result<Page<Faq>, ApiError> {
        self.faqs.list(query).await
    }

    pub async fn get_faq(&self, id: i64) -> Result<Faq, ApiError> {
        self.faqs.get(id).await
    }

    pub async fn create_faq(&self, body: &FaqInput) -> Result<Faq, ApiError> {
        self.faqs.create(body).await
    }

    pub async fn update_faq(&self, id: i64, body: &FaqInput) -> Result<Faq, ApiError> {
        self.faqs.update(id, body).await
    }

    pub async fn delete_faq(&self, id: i64) -> Result<(), ApiError> {
        self.faqs.delete(id).await
    }

    pub async fn list_inquiries(&self, query: &ListQuery) -> Result<Page<Inquiry>, ApiError> {
        self.inquiries.list(query).await
    }

    pub async fn get_inquiry(&self, id: i64) -> Result<Inquiry, ApiError> {
        self.inquiries.get(id).await
    }

    /// Inquiries are never created or deleted here, only answered.
    pub async fn answer_inquiry(&self, id: i64, body: &InquiryAnswer) -> Result<Inquiry, ApiError> {
        self.inquiries.patch(id, body).await
    }
}
