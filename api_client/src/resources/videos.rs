use domain::{ListQuery, Page, Video, VideoInput};

use super::Collection;
use crate::context::ApiContext;
use crate::error::ApiError;

pub const VIDEOS: &str = "videos/";

pub struct VideoClient {
    videos: Collection<Video, VideoInput>,
}

impl VideoClient {
    pub fn new(ctx: ApiContext) -> Self {
        Self {
            videos: Collection::new(ctx, VIDEOS),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<Video>, ApiError> {
        self.videos.list(query).await
    }

    pub async fn get(&self, id: i64) -> Result<Video, ApiError> {
        self.videos.get(id).await
    }

    pub async fn create(&self, body: &VideoInput) -> Result<Video, ApiError> {
        self.videos.create(body).await
    }

    pub async fn update(&self, id: i64, body: &VideoInput) -> Result<Video, ApiError> {
        self.videos.update(id, body).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.videos.delete(id).await
    }
}
