//! The Article entity and its identifier.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer};

use crate::store::StoreError;

/// Store-assigned article identifier.
///
/// Rendered as the 24-character hex form of a document ObjectId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArticleId(ObjectId);

impl ArticleId {
    /// Allocate a fresh identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for ArticleId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for ArticleId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| StoreError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for ArticleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

/// Text fields a client submits on create and update.
///
/// Every field is optional; absent values are stored as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleFields {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl ArticleFields {
    /// Assign a named multipart/form field. Returns false for names that are not article fields.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "subtitle" => &mut self.subtitle,
            "content" => &mut self.content,
            "category" => &mut self.category,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// A persisted blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: ArticleId,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

impl Article {
    pub fn new(id: ArticleId, fields: ArticleFields, image: Option<String>) -> Self {
        Self {
            id,
            title: fields.title,
            subtitle: fields.subtitle,
            content: fields.content,
            category: fields.category,
            image,
        }
    }

    /// Overwrite every text field; replace the image only when a new one is given.
    pub fn apply_update(&mut self, fields: ArticleFields, image: Option<String>) {
        self.title = fields.title;
        self.subtitle = fields.subtitle;
        self.content = fields.content;
        self.category = fields.category;
        if let Some(image) = image {
            self.image = Some(image);
        }
    }
}
