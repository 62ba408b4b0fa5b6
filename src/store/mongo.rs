//! MongoDB-backed article store.

use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::article::{Article, ArticleFields};
use crate::config::DatabaseConfig;
use crate::store::{parse_id, ArticleStore, StoreError, StoreFuture};

/// On-disk document shape. Unknown keys (e.g. a `__v` version field) are ignored.
#[derive(Debug, Serialize, Deserialize)]
struct ArticleDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: Option<String>,
    subtitle: Option<String>,
    content: Option<String>,
    category: Option<String>,
    image: Option<String>,
}

impl From<ArticleDocument> for Article {
    fn from(doc: ArticleDocument) -> Self {
        Self {
            id: doc.id.into(),
            title: doc.title,
            subtitle: doc.subtitle,
            content: doc.content,
            category: doc.category,
            image: doc.image,
        }
    }
}

impl From<&Article> for ArticleDocument {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.object_id(),
            title: article.title.clone(),
            subtitle: article.subtitle.clone(),
            content: article.content.clone(),
            category: article.category.clone(),
            image: article.image.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MongoArticleStore {
    collection: Collection<ArticleDocument>,
}

impl MongoArticleStore {
    /// Connect and ping the server; fails if the deployment is unreachable.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.uri).await?;
        let database = client.database(&config.name);
        database.run_command(doc! { "ping": 1 }).await?;

        tracing::info!(
            database = %config.name,
            collection = %config.collection,
            "Connected to document store"
        );

        Ok(Self {
            collection: database.collection(&config.collection),
        })
    }
}

impl ArticleStore for MongoArticleStore {
    fn insert(&self, fields: ArticleFields, image: Option<String>) -> StoreFuture<'_, Article> {
        Box::pin(async move {
            let article = Article::new(ObjectId::new().into(), fields, image);
            self.collection
                .insert_one(ArticleDocument::from(&article))
                .await?;
            Ok(article)
        })
    }

    fn list(&self) -> StoreFuture<'_, Vec<Article>> {
        Box::pin(async move {
            let cursor = self.collection.find(doc! {}).await?;
            let docs: Vec<ArticleDocument> = cursor.try_collect().await?;
            Ok(docs.into_iter().map(Article::from).collect())
        })
    }

    fn find(&self, id: &str) -> StoreFuture<'_, Option<Article>> {
        let id = parse_id(id);
        Box::pin(async move {
            let id = id?;
            let found = self
                .collection
                .find_one(doc! { "_id": id.object_id() })
                .await?;
            Ok(found.map(Article::from))
        })
    }

    fn save(&self, article: Article) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let document = ArticleDocument::from(&article);
            let result = self
                .collection
                .replace_one(doc! { "_id": document.id }, &document)
                .await?;
            if result.matched_count == 0 {
                return Err(StoreError::Missing(article.id));
            }
            Ok(())
        })
    }

    fn delete(&self, id: &str) -> StoreFuture<'_, ()> {
        let id = parse_id(id);
        Box::pin(async move {
            let id = id?;
            self.collection
                .delete_one(doc! { "_id": id.object_id() })
                .await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn test_document_tolerates_missing_fields_and_version_key() {
        let oid = ObjectId::new();
        let raw = doc! { "_id": oid, "title": "A", "image": bson::Bson::Null, "__v": 0 };
        let parsed: ArticleDocument = bson::from_document(raw).unwrap();
        let article = Article::from(parsed);

        assert_eq!(article.id.object_id(), oid);
        assert_eq!(article.title.as_deref(), Some("A"));
        assert_eq!(article.subtitle, None);
        assert_eq!(article.image, None);
    }

    #[test]
    fn test_document_stores_null_image() {
        let article = Article::new(ObjectId::new().into(), ArticleFields::default(), None);
        let document = bson::to_document(&ArticleDocument::from(&article)).unwrap();
        assert_eq!(document.get("image"), Some(&bson::Bson::Null));
    }
}
