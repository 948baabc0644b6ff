//! Typed CRUD wrappers over the backend's resource endpoints.

mod articles;
mod board;
mod members;
mod videos;

use std::marker::PhantomData;

use domain::{ListQuery, Page};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::ApiContext;
use crate::error::ApiError;

pub use articles::ArticlesClient;
pub use board::BoardClient;
pub use members::PublicMembersClient;
pub use videos::VideoClient;

/// One collection endpoint, `base/` for lists and `base/{id}/` for items.
pub(crate) struct Collection<T, I: ?Sized> {
    ctx: ApiContext,
    base: &'static str,
    _marker: PhantomData<fn(&I) -> T>,
}

impl<T: DeserializeOwned, I: Serialize + ?Sized> Collection<T, I> {
    pub(crate) fn new(ctx: ApiContext, base: &'static str) -> Self {
        Self {
            ctx,
            base,
            _marker: PhantomData,
        }
    }

    pub(crate) fn item_path(&self, id: i64) -> String {
        format!("{}{}/", self.base, id)
    }

    pub(crate) async fn list(&self, query: &ListQuery) -> Result<Page<T>, ApiError> {
        self.ctx.get(self.base, query.to_pairs()).await
    }

    pub(crate) async fn get(&self, id: i64) -> Result<T, ApiError> {
        self.ctx.get(&self.item_path(id), Vec::new()).await
    }

    pub(crate) async fn create(&self, body: &I) -> Result<T, ApiError> {
        self.ctx.post(self.base, body).await
    }

    pub(crate) async fn update(&self, id: i64, body: &I) -> Result<T, ApiError> {
        self.ctx.put(&self.item_path(id), body).await
    }

    pub(crate) async fn patch<P: Serialize + ?Sized>(
        &self,
        id: i64,
        body: &P,
    ) -> Result<T, ApiError> {
        self.ctx.patch(&self.item_path(id), body).await
    }

    pub(crate) async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.ctx.delete(&self.item_path(id)).await
    }
}
