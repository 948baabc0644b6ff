use domain::{Article, ArticleInput, ListQuery, Page};

use super::Collection;
use crate::context::ApiContext;
use crate::error::ApiError;

pub const ARTICLES: &str = "articles/";

pub struct ArticlesClient {
    articles: Collection<Article, ArticleInput>,
}

impl ArticlesClient {
    pub fn new(ctx: ApiContext) -> Self {
        Self {
            articles: Collection::new(ctx, ARTICLES),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<Article>, ApiError> {
        self.articles.list(query).await
    }

    pub async fn get(&self, id: i64) -> Result<Article, ApiError> {
        self.articles.get(id).await
    }

    pub async fn create(&self, body: &ArticleInput) -> Result<Article, ApiError> {
        self.articles.create(body).await
    }

    pub async fn update(&self, id: i64, body: &ArticleInput) -> Result<Article, ApiError> {
        self.articles.update(id, body).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.articles.delete(id).await
    }
}
