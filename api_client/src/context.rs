use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::envelope::decode_checked;
use crate::error::ApiError;
use crate::token_store::TokenStore;
use crate::transport::{ApiRequest, Credential, Transport};

/// Everything a client needs to talk to the backend on behalf of one session.
///
/// Cloning is cheap; clones share the transport and the token store.
#[derive(Clone)]
pub struct ApiContext {
    transport: Arc<dyn Transport>,
    tokens: Arc<TokenStore>,
}

impl ApiContext {
    pub fn new(transport: Arc<dyn Transport>, tokens: Arc<TokenStore>) -> Self {
        Self { transport, tokens }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Attaches the requested credential and sends the request as-is.
    pub async fn send(&self, mut request: ApiRequest) -> Result<Value, ApiError> {
        if request.bearer.is_none() {
            request.bearer = match request.credential {
                Credential::AccessToken => self.tokens.get_access_token(),
                Credential::RefreshToken => self.tokens.get_refresh_token(),
                Credential::None => None,
            };
        }
        self.transport.execute(request).await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        decode_checked(self.send(request).await?)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        self.fetch(ApiRequest::new(Method::GET, path).query(query)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.fetch(ApiRequest::new(Method::POST, path).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.fetch(ApiRequest::new(Method::PUT, path).json(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.fetch(ApiRequest::new(Method::PATCH, path).json(body)).await
    }

    /// Deletes and discards whatever the backend sends back.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::new(Method::DELETE, path)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingTransport;
    use crate::token_store::CookieAttributes;
    use serde_json::json;

    fn context(transport: Arc<RecordingTransport>) -> ApiContext {
        ApiContext::new(transport, Arc::new(TokenStore::in_memory(CookieAttributes::default())))
    }

    #[tokio::test]
    async fn access_token_is_attached_when_stored() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_ok(json!({"Result": 1}));
        transport.push_ok(json!({"Result": 2}));
        let ctx = context(transport.clone());

        let _: i32 = ctx.get("board/notices/1/", Vec::new()).await.unwrap();
        ctx.tokens().save("acc", "ref", None).unwrap();
        let _: i32 = ctx.get("board/notices/1/", Vec::new()).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].bearer, None);
        assert_eq!(requests[1].bearer.as_deref(), Some("acc"));
    }

    #[tokio::test]
    async fn refresh_credential_uses_refresh_token() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_ok(Value::Null);
        let ctx = context(transport.clone());
        ctx.tokens().save("acc", "ref", None).unwrap();

        let request = ApiRequest::new(Method::POST, "adminMember/tokenrefresh")
            .credential(Credential::RefreshToken);
        ctx.send(request).await.unwrap();
        assert_eq!(transport.requests()[0].bearer.as_deref(), Some("ref"));
    }

    #[tokio::test]
    async fn delete_ignores_the_body() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_ok(Value::Null);
        let ctx = context(transport.clone());
        ctx.delete("board/faqs/9/").await.unwrap();
        let req = &transport.requests()[0];
        assert_eq!(req.method, Method::DELETE);
        assert_eq!(req.path, "board/faqs/9/");
        assert!(req.body.is_none());
    }
}
