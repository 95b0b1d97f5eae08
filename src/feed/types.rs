// Feed payload types.
// Defines structs for deserializing the article feed JSON body.

use serde::{Deserialize, Serialize};

/// A single article. Every field is publisher-supplied and untrusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub author: String,
    pub article: String,
}

/// The full feed as returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPayload {
    pub publication: String,
    pub tagline: String,
    pub articles: Vec<Article>,
}

impl FeedPayload {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
