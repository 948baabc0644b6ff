use api_client::{ArticlesClient, VideoClient};
use domain::forms::{ArticleForm, VideoForm};

use super::{submit, FormMode, Outcome, Route, SubmitGuard};

pub struct ArticleFormPage<'a> {
    articles: &'a ArticlesClient,
    mode: FormMode,
    submitting: SubmitGuard,
}

impl<'a> ArticleFormPage<'a> {
    pub fn new(articles: &'a ArticlesClient, mode: FormMode) -> Self {
        Self {
            articles,
            mode,
            submitting: SubmitGuard::default(),
        }
    }

    pub async fn submit(&self, form: &ArticleForm) -> Outcome {
        let input = match form.validate() {
            Ok(input) => input,
            Err(e) => return Outcome::invalid(&e),
        };
        let (articles, mode) = (self.articles, self.mode);
        let call = async move {
            match mode {
                FormMode::Create => articles.create(&input).await,
                FormMode::Edit(id) => articles.update(id, &input).await,
            }
        };
        submit(&self.submitting, call, |article| {
            let message = format!("Article \"{}\" saved", article.title);
            Outcome::success(message, Some(Route::ArticleList))
        })
        .await
    }
}

pub async fn delete_article(guard: &SubmitGuard, articles: &ArticlesClient, id: i64) -> Outcome {
    submit(guard, articles.delete(id), |_| {
        Outcome::success("Article deleted", Some(Route::ArticleList))
    })
    .await
}

pub struct VideoFormPage<'a> {
    videos: &'a VideoClient,
    mode: FormMode,
    submitting: SubmitGuard,
}

impl<'a> VideoFormPage<'a> {
    pub fn new(videos: &'a VideoClient, mode: FormMode) -> Self {
        Self {
            videos,
            mode,
            submitting: SubmitGuard::default(),
        }
    }

    pub async fn submit(&self, form: &VideoForm) -> Outcome {
        let input = match form.validate() {
            Ok(input) => input,
            Err(e) => return Outcome::invalid(&e),
        };
        let (videos, mode) = (self.videos, self.mode);
        let call = async move {
            match mode {
                FormMode::Create => videos.create(&input).await,
                FormMode::Edit(id) => videos.update(id, &input).await,
            }
        };
        submit(&self.submitting, call, |video| {
            Outcome::success(format!("Video \"{}\" saved", video.title), Some(Route::VideoList))
        })
        .await
    }
}

pub async fn delete_video(guard: &SubmitGuard, videos: &VideoClient, id: i64) -> Outcome {
    submit(guard, videos.delete(id), |_| {
        Outcome::success("Video deleted", Some(Route::VideoList))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::test_support::{context_with, RecordingTransport};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn article_without_content_is_not_sent() {
        let transport = Arc::new(RecordingTransport::new());
        let articles = ArticlesClient::new(context_with(transport.clone()));
        let outcome = ArticleFormPage::new(&articles, FormMode::Create)
            .submit(&ArticleForm {
                title: "Launch".into(),
                ..ArticleForm::default()
            })
            .await;
        assert!(transport.requests().is_empty());
        assert_eq!(outcome.toast.unwrap().message(), "content is required");
    }

    #[tokio::test]
    async fn saved_video_names_itself_in_the_toast() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_ok(json!({"id": 3, "title": "Tour", "video_url": "https://cdn.example.com/t.mp4"}));
        let videos = VideoClient::new(context_with(transport.clone()));
        let outcome = VideoFormPage::new(&videos, FormMode::Edit(3))
            .submit(&VideoForm {
                title: "Tour".into(),
                video_url: "https://cdn.example.com/t.mp4".into(),
                ..VideoForm::default()
            })
            .await;
        assert_eq!(outcome.toast.unwrap().message(), "Video \"Tour\" saved");
        assert_eq!(outcome.navigate_to, Some(Route::VideoList));
        assert_eq!(transport.requests()[0].path, "videos/3/");
    }
}
