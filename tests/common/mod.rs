//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use blog_api::config::{AppConfig, NewsConfig};
use blog_api::http::{AppState, HttpServer};
use blog_api::lifecycle::Shutdown;
use blog_api::news::NewsClient;
use blog_api::store::{ArticleStore, InMemoryArticleStore};
use blog_api::upload::ImageStorage;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A running server on an ephemeral port with its own uploads directory.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub uploads: TempDir,
    shutdown: Shutdown,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Server over a fresh in-memory store; also returns the store for inspection.
pub async fn spawn_app() -> (TestApp, Arc<InMemoryArticleStore>) {
    let store = Arc::new(InMemoryArticleStore::new());
    let app = spawn_with(store.clone(), NewsConfig::default()).await;
    (app, store)
}

pub async fn spawn_with(store: Arc<dyn ArticleStore>, news: NewsConfig) -> TestApp {
    spawn_configured(store, |config| config.news = news).await
}

/// Server whose config is adjusted by `configure` before startup.
/// The uploads directory is always a fresh temp dir.
pub async fn spawn_configured(
    store: Arc<dyn ArticleStore>,
    configure: impl FnOnce(&mut AppConfig),
) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();

    let mut config = AppConfig::default();
    configure(&mut config);
    config.uploads.dir = uploads.path().display().to_string();

    let images = ImageStorage::from_config(&config.uploads);
    let news = NewsClient::new(config.news.clone()).unwrap();
    let state = AppState::new(store, images, news);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, state);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestApp {
        address,
        client,
        uploads,
        shutdown,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}/api/posts{}", self.address, path)
    }

    pub async fn create(&self, form: Form) -> reqwest::Response {
        self.client
            .post(self.api("/add"))
            .multipart(form)
            .send()
            .await
            .expect("server unreachable")
    }

    pub async fn update(&self, id: &str, form: Form) -> reqwest::Response {
        self.client
            .patch(self.api(&format!("/update/{}", id)))
            .multipart(form)
            .send()
            .await
            .expect("server unreachable")
    }

    pub async fn list(&self) -> Vec<Value> {
        let res = self.client.get(self.api("/view")).send().await.unwrap();
        assert_eq!(res.status(), 200);
        res.json().await.unwrap()
    }

    pub async fn get(&self, id: &str) -> reqwest::Response {
        self.client
            .get(self.api(&format!("/view/{}", id)))
            .send()
            .await
            .unwrap()
    }

    /// Id of the only listed article with this title.
    pub async fn id_of(&self, title: &str) -> String {
        let matches: Vec<_> = self
            .list()
            .await
            .into_iter()
            .filter(|a| a["title"] == title)
            .collect();
        assert_eq!(matches.len(), 1, "expected exactly one article titled {title}");
        matches[0]["_id"].as_str().unwrap().to_string()
    }

    /// Names of the files currently in the uploads directory.
    pub fn uploaded_files(&self) -> Vec<String> {
        list_dir(self.uploads.path())
    }
}

pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Multipart form with the four article fields.
pub fn article_form(title: &str, subtitle: &str, content: &str, category: &str) -> Form {
    Form::new()
        .text("title", title.to_string())
        .text("subtitle", subtitle.to_string())
        .text("content", content.to_string())
        .text("category", category.to_string())
}

pub fn image_part(file_name: &str, bytes: &[u8]) -> Part {
    Part::bytes(bytes.to_vec()).file_name(file_name.to_string())
}
