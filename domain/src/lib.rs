//! Types shared by the admin console crates.

pub mod board;
pub mod content;
pub mod forms;
pub mod members;

use serde::{Deserialize, Serialize};

pub use board::{Faq, FaqInput, Inquiry, InquiryAnswer, InquiryStatus, Notice, NoticeInput};
pub use content::{Article, ArticleInput, Video, VideoInput};
pub use members::{PublicMember, PublicMemberInput};

/// Snapshot of the signed-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub level: i32,
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_count: Option<i64>,
}

/// Tokens issued by login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime the server declares, in seconds. Informational only.
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Pagination envelope returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// Filter and sort parameters for list endpoints.
///
/// Values are forwarded as query parameters without validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl ListQuery {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(p) = self.page {
            pairs.push(("page".to_string(), p.to_string()));
        }
        if let Some(s) = self.page_size {
            pairs.push(("page_size".to_string(), s.to_string()));
        }
        if let Some(q) = &self.search {
            pairs.push(("search".to_string(), q.clone()));
        }
        if let Some(o) = &self.ordering {
            pairs.push(("ordering".to_string(), o.clone()));
        }
        pairs.extend(self.extra.iter().cloned());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_renders_in_order() {
        let q = ListQuery::page(2, 20);
        assert_eq!(
            q.to_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn extra_params_pass_through_untouched() {
        let mut q = ListQuery::default().with("status", "pending").with("status", "answered");
        q.ordering = Some("-created_at".into());
        let pairs = q.to_pairs();
        assert_eq!(pairs[0], ("ordering".to_string(), "-created_at".to_string()));
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[2].1, "answered");
    }

    #[test]
    fn user_info_uses_camel_case_and_optional_fields() {
        let json = r#"{"id":3,"name":"Kim","email":"kim@example.com","level":9,"isAdmin":true}"#;
        let user: UserInfo = serde_json::from_str(json).unwrap();
        assert!(user.is_admin);
        assert_eq!(user.phone, None);
        assert_eq!(user.login_count, None);
        let back = serde_json::to_value(&user).unwrap();
        assert!(back.get("phone").is_none());
        assert_eq!(back["isAdmin"], true);
    }

    #[test]
    fn session_decodes_from_login_result() {
        let json = r#"{
            "accessToken": "a", "refreshToken": "r", "expiresIn": 3600,
            "user": {"id":1,"name":"n","email":"e","level":1,"isAdmin":false,"loginCount":4}
        }"#;
        let s: Session = serde_json::from_str(json).unwrap();
        assert_eq!(s.expires_in, 3600);
        assert_eq!(s.user.login_count, Some(4));
    }
}
