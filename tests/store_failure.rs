//! Failure injection at the store boundary.

use std::sync::Arc;

use blog_api::article::{Article, ArticleFields, ArticleId};
use blog_api::config::NewsConfig;
use blog_api::store::{ArticleStore, InMemoryArticleStore, StoreError, StoreFuture};
use serde_json::{json, Value};

mod common;

use common::{article_form, image_part, spawn_with};

/// Reads succeed with one fixed article; every write fails.
struct ReadOnlyStore {
    article: Article,
}

impl ReadOnlyStore {
    fn new() -> Self {
        let fields = ArticleFields {
            title: Some("existing".into()),
            ..Default::default()
        };
        Self {
            article: Article::new(ArticleId::generate(), fields, None),
        }
    }
}

fn unavailable<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("connection reset".into()))
}

impl ArticleStore for ReadOnlyStore {
    fn insert(&self, _: ArticleFields, _: Option<String>) -> StoreFuture<'_, Article> {
        Box::pin(async { unavailable() })
    }

    fn list(&self) -> StoreFuture<'_, Vec<Article>> {
        Box::pin(async move { Ok(vec![self.article.clone()]) })
    }

    fn find(&self, _: &str) -> StoreFuture<'_, Option<Article>> {
        Box::pin(async move { Ok(Some(self.article.clone())) })
    }

    fn save(&self, _: Article) -> StoreFuture<'_, ()> {
        Box::pin(async { unavailable() })
    }

    fn delete(&self, _: &str) -> StoreFuture<'_, ()> {
        Box::pin(async { unavailable() })
    }
}

/// Every operation fails.
struct DownStore;

impl ArticleStore for DownStore {
    fn insert(&self, _: ArticleFields, _: Option<String>) -> StoreFuture<'_, Article> {
        Box::pin(async { unavailable() })
    }

    fn list(&self) -> StoreFuture<'_, Vec<Article>> {
        Box::pin(async { unavailable() })
    }

    fn find(&self, _: &str) -> StoreFuture<'_, Option<Article>> {
        Box::pin(async { unavailable() })
    }

    fn save(&self, _: Article) -> StoreFuture<'_, ()> {
        Box::pin(async { unavailable() })
    }

    fn delete(&self, _: &str) -> StoreFuture<'_, ()> {
        Box::pin(async { unavailable() })
    }
}

/// Deletes each article right after handing it out, as a concurrent
/// DELETE landing between an update's lookup and its write would.
struct VanishingStore {
    inner: InMemoryArticleStore,
}

impl ArticleStore for VanishingStore {
    fn insert(&self, fields: ArticleFields, image: Option<String>) -> StoreFuture<'_, Article> {
        self.inner.insert(fields, image)
    }

    fn list(&self) -> StoreFuture<'_, Vec<Article>> {
        self.inner.list()
    }

    fn find(&self, id: &str) -> StoreFuture<'_, Option<Article>> {
        let id = id.to_string();
        Box::pin(async move {
            let found = self.inner.find(&id).await?;
            self.inner.delete(&id).await?;
            Ok(found)
        })
    }

    fn save(&self, article: Article) -> StoreFuture<'_, ()> {
        self.inner.save(article)
    }

    fn delete(&self, id: &str) -> StoreFuture<'_, ()> {
        self.inner.delete(id)
    }
}

fn server_error() -> Value {
    json!({"kind": "store", "message": "Server Error"})
}

#[tokio::test]
async fn test_failed_create_removes_uploaded_image() {
    let app = spawn_with(Arc::new(ReadOnlyStore::new()), NewsConfig::default()).await;

    let form = article_form("lost", "", "", "").part("image", image_part("lost.png", b"bytes"));
    let res = app.create(form).await;
    assert_eq!(res.status(), 500);
    assert_eq!(res.json::<Value>().await.unwrap(), server_error());

    assert!(app.uploaded_files().is_empty(), "orphaned upload left behind");
}

#[tokio::test]
async fn test_failed_update_removes_new_image() {
    let app = spawn_with(Arc::new(ReadOnlyStore::new()), NewsConfig::default()).await;

    let id = ArticleId::generate().to_string();
    let form = article_form("x", "", "", "").part("image", image_part("new.png", b"bytes"));
    let res = app.update(&id, form).await;
    assert_eq!(res.status(), 500);
    assert_eq!(res.json::<Value>().await.unwrap(), server_error());

    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_update_racing_delete_is_404_and_removes_new_image() {
    let store = Arc::new(VanishingStore {
        inner: InMemoryArticleStore::new(),
    });
    let app = spawn_with(store.clone(), NewsConfig::default()).await;

    let existing = store.insert(ArticleFields::default(), None).await.unwrap();
    let form = article_form("late", "", "", "").part("image", image_part("late.png", b"late"));
    let res = app.update(&existing.id.to_string(), form).await;

    assert_eq!(res.status(), 404);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"kind": "not_found", "message": "Article not found"})
    );
    assert!(store.inner.is_empty().await);
    assert!(app.uploaded_files().is_empty(), "orphaned upload left behind");
}

#[tokio::test]
async fn test_every_route_reports_store_outage_as_500() {
    let app = spawn_with(Arc::new(DownStore), NewsConfig::default()).await;
    let id = ArticleId::generate().to_string();

    let res = app.client.get(app.api("/view")).send().await.unwrap();
    assert_eq!(res.status(), 500);
    assert_eq!(res.json::<Value>().await.unwrap(), server_error());

    let res = app.get(&id).await;
    assert_eq!(res.status(), 500);

    let res = app
        .client
        .delete(app.api(&format!("/delete/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
    assert_eq!(res.json::<Value>().await.unwrap(), server_error());

    let res = app.create(article_form("a", "b", "c", "d")).await;
    assert_eq!(res.status(), 500);
}

#[tokio::test]
async fn test_outage_does_not_affect_root() {
    let app = spawn_with(Arc::new(DownStore), NewsConfig::default()).await;

    let res = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
}
