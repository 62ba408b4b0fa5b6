//! Typed client for the blog API.

mod client;

pub use client::{Article, ArticleInput, BlogClient, SdkError};
