use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server returned {status}: {kind}: {message}")]
    Api {
        status: StatusCode,
        kind: String,
        message: String,
    },
}

/// Error envelope returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    kind: String,
    message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

/// Fields sent on create and update. Unset fields are sent as absent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleInput {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

pub struct BlogClient {
    client: Client,
    base_url: String,
    api_prefix: String,
}

impl BlogClient {
    /// `base_url` is the server root, e.g. `http://localhost:5000`.
    pub fn new(base_url: &str) -> Self {
        Self::with_prefix(base_url, "/api/posts")
    }

    pub fn with_prefix(base_url: &str, api_prefix: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: api_prefix.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_prefix, path)
    }

    /// Create an article, optionally attaching the image at `image`.
    pub async fn create(&self, input: &ArticleInput, image: Option<&Path>) -> Result<String, SdkError> {
        let form = build_form(input, image).await?;
        let resp = self.client.post(self.url("/add")).multipart(form).send().await?;
        text_or_error(resp).await
    }

    pub async fn list(&self) -> Result<Vec<Article>, SdkError> {
        let resp = self.client.get(self.url("/view")).send().await?;
        Ok(success(resp).await?.json().await?)
    }

    /// `None` when no article has this id.
    pub async fn get(&self, id: &str) -> Result<Option<Article>, SdkError> {
        let resp = self.client.get(self.url(&format!("/view/{}", id))).send().await?;
        Ok(success(resp).await?.json().await?)
    }

    pub async fn update(
        &self,
        id: &str,
        input: &ArticleInput,
        image: Option<&Path>,
    ) -> Result<String, SdkError> {
        let form = build_form(input, image).await?;
        let resp = self
            .client
            .patch(self.url(&format!("/update/{}", id)))
            .multipart(form)
            .send()
            .await?;
        text_or_error(resp).await
    }

    pub async fn delete(&self, id: &str) -> Result<String, SdkError> {
        let resp = self
            .client
            .delete(self.url(&format!("/delete/{}", id)))
            .send()
            .await?;
        text_or_error(resp).await
    }

    /// Headlines JSON exactly as the upstream API returned it.
    pub async fn top_news(&self) -> Result<serde_json::Value, SdkError> {
        let resp = self.client.get(self.url("/top-news")).send().await?;
        Ok(success(resp).await?.json().await?)
    }
}

async fn build_form(input: &ArticleInput, image: Option<&Path>) -> Result<Form, SdkError> {
    let mut form = Form::new();
    let fields = [
        ("title", &input.title),
        ("subtitle", &input.subtitle),
        ("content", &input.content),
        ("category", &input.category),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            form = form.text(name, value.clone());
        }
    }

    if let Some(path) = image {
        let bytes = tokio::fs::read(path).await.map_err(|source| SdkError::File {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        form = form.part("image", Part::bytes(bytes).file_name(file_name));
    }
    Ok(form)
}

async fn success(resp: Response) -> Result<Response, SdkError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await?;
    Err(match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => SdkError::Api {
            status,
            kind: body.kind,
            message: body.message,
        },
        Err(_) => SdkError::Api {
            status,
            kind: "unknown".to_string(),
            message: text,
        },
    })
}

async fn text_or_error(resp: Response) -> Result<String, SdkError> {
    Ok(success(resp).await?.text().await?)
}
