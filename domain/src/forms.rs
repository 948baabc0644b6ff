//! Presence checks run before anything is sent to the backend.
//!
//! Each form holds the raw text the operator typed. `validate` trims the
//! fields and turns the form into the request body, or reports the first
//! missing field.

use thiserror::Error;

use crate::{
    ArticleInput, FaqInput, InquiryAnswer, InquiryStatus, LoginCredentials, NoticeInput,
    PublicMemberInput, VideoInput,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Required(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn email(value: &str) -> Result<String, FormError> {
    let addr = required(value, "email")?;
    match addr.split_once('@') {
        Some((local, host)) if !local.is_empty() && host.contains('.') => Ok(addr),
        _ => Err(FormError::InvalidEmail(addr)),
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginCredentials, FormError> {
        let email = required(&self.email, "email")?;
        // passwords are sent as typed
        if self.password.is_empty() {
            return Err(FormError::Required("password"));
        }
        Ok(LoginCredentials {
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoticeForm {
    pub title: String,
    pub content: String,
    pub is_important: bool,
}

impl NoticeForm {
    pub fn validate(&self) -> Result<NoticeInput, FormError> {
        Ok(NoticeInput {
            title: required(&self.title, "title")?,
            content: self.content.trim().to_string(),
            is_important: self.is_important,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct FaqForm {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub order: Option<i32>,
}

impl FaqForm {
    pub fn validate(&self) -> Result<FaqInput, FormError> {
        Ok(FaqInput {
            question: required(&self.question, "question")?,
            answer: required(&self.answer, "answer")?,
            category: optional(&self.category),
            order: self.order,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InquiryAnswerForm {
    pub answer: String,
}

impl InquiryAnswerForm {
    pub fn validate(&self) -> Result<InquiryAnswer, FormError> {
        Ok(InquiryAnswer {
            answer: required(&self.answer, "answer")?,
            status: InquiryStatus::Answered,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PublicMemberForm {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub is_active: bool,
}

impl PublicMemberForm {
    pub fn validate(&self) -> Result<PublicMemberInput, FormError> {
        Ok(PublicMemberInput {
            username: required(&self.username, "username")?,
            name: required(&self.name, "name")?,
            email: email(&self.email)?,
            phone: optional(&self.phone),
            password: self.password.clone().filter(|p| !p.is_empty()),
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArticleForm {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
    pub is_published: bool,
}

impl ArticleForm {
    pub fn validate(&self) -> Result<ArticleInput, FormError> {
        Ok(ArticleInput {
            title: required(&self.title, "title")?,
            content: required(&self.content, "content")?,
            author: optional(&self.author),
            category: optional(&self.category),
            thumbnail: optional(&self.thumbnail),
            is_published: self.is_published,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct VideoForm {
    pub title: String,
    pub video_url: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<u32>,
    pub is_published: bool,
}

impl VideoForm {
    pub fn validate(&self) -> Result<VideoInput, FormError> {
        Ok(VideoInput {
            title: required(&self.title, "title")?,
            video_url: required(&self.video_url, "video_url")?,
            description: optional(&self.description),
            thumbnail: optional(&self.thumbnail),
            duration: self.duration,
            is_published: self.is_published,
        })
    }
}
