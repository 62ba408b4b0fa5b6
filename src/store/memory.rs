//! Process-local article store.
//!
//! Keeps insertion order so listing behaves like a collection scan.

use tokio::sync::RwLock;

use crate::article::{Article, ArticleFields, ArticleId};
use crate::store::{parse_id, ArticleStore, StoreError, StoreFuture};

#[derive(Debug, Default)]
pub struct InMemoryArticleStore {
    articles: RwLock<Vec<Article>>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored articles.
    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }
}

impl ArticleStore for InMemoryArticleStore {
    fn insert(&self, fields: ArticleFields, image: Option<String>) -> StoreFuture<'_, Article> {
        Box::pin(async move {
            let article = Article::new(ArticleId::generate(), fields, image);
            self.articles.write().await.push(article.clone());
            Ok(article)
        })
    }

    fn list(&self) -> StoreFuture<'_, Vec<Article>> {
        Box::pin(async move { Ok(self.articles.read().await.clone()) })
    }

    fn find(&self, id: &str) -> StoreFuture<'_, Option<Article>> {
        let id = parse_id(id);
        Box::pin(async move {
            let id = id?;
            let articles = self.articles.read().await;
            Ok(articles.iter().find(|a| a.id == id).cloned())
        })
    }

    fn save(&self, article: Article) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut articles = self.articles.write().await;
            // A document deleted in the meantime stays deleted.
            match articles.iter_mut().find(|a| a.id == article.id) {
                Some(slot) => {
                    *slot = article;
                    Ok(())
                }
                None => Err(StoreError::Missing(article.id)),
            }
        })
    }

    fn delete(&self, id: &str) -> StoreFuture<'_, ()> {
        let id = parse_id(id);
        Box::pin(async move {
            let id = id?;
            self.articles.write().await.retain(|a| a.id != id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> ArticleFields {
        ArticleFields {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = InMemoryArticleStore::new();
        let created = store.insert(titled("A"), None).await.unwrap();

        let found = store.find(&created.id.to_string()).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = InMemoryArticleStore::new();
        for title in ["one", "two", "three"] {
            store.insert(titled(title), None).await.unwrap();
        }

        let titles: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title.unwrap())
            .collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_find_unknown_id_is_none() {
        let store = InMemoryArticleStore::new();
        let found = store.find(&ArticleId::generate().to_string()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_malformed_id_errors() {
        let store = InMemoryArticleStore::new();
        assert!(matches!(store.find("123").await, Err(StoreError::InvalidId(_))));
        assert!(matches!(store.delete("xyz").await, Err(StoreError::InvalidId(_))));
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let store = InMemoryArticleStore::new();
        let mut article = store.insert(titled("draft"), None).await.unwrap();
        article.apply_update(titled("final"), Some("uploads/9-x.png".into()));
        store.save(article.clone()).await.unwrap();

        let found = store.find(&article.id.to_string()).await.unwrap().unwrap();
        assert_eq!(found.title.as_deref(), Some("final"));
        assert_eq!(found.image.as_deref(), Some("uploads/9-x.png"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_after_delete_is_missing() {
        let store = InMemoryArticleStore::new();
        let mut article = store.insert(titled("raced"), None).await.unwrap();
        let id = article.id.to_string();

        let loaded = store.find(&id).await.unwrap();
        assert!(loaded.is_some());
        store.delete(&id).await.unwrap();

        article.apply_update(titled("late edit"), Some("uploads/1-late.png".into()));
        let err = store.save(article.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::Missing(missing) if missing == article.id));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryArticleStore::new();
        let article = store.insert(titled("gone"), None).await.unwrap();
        let id = article.id.to_string();

        store.delete(&id).await.unwrap();
        store.delete(&id).await.unwrap();
        assert!(store.is_empty().await);
    }
}
