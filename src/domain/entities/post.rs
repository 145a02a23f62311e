use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::services::html_preview;

/// Unique identifier for a feed post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl PostId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PostId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// An article or board post as returned by the backend.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// Body as HTML.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Free-form type label (e.g. "story", "question").
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_excellent: bool,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub scrap_count: u32,
    #[serde(default)]
    pub comment_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Creates a post with empty body and zero counters.
    #[must_use]
    pub fn new(id: impl Into<PostId>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            image_url: None,
            tags: Vec::new(),
            category: None,
            kind: None,
            is_excellent: false,
            like_count: 0,
            scrap_count: 0,
            comment_count: 0,
            created_at,
        }
    }

    /// Sets the HTML body.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets the card thumbnail URL.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Replaces the tag list.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the board category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the post type.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Marks the post as excellent.
    #[must_use]
    pub const fn excellent(mut self) -> Self {
        self.is_excellent = true;
        self
    }

    /// Sets like, scrap and comment counters.
    #[must_use]
    pub const fn with_counts(mut self, likes: u32, scraps: u32, comments: u32) -> Self {
        self.like_count = likes;
        self.scrap_count = scraps;
        self.comment_count = comments;
        self
    }

    /// Returns true if the post carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns the image shown on the post card: the explicit `image_url`,
    /// or else the first `<img>` embedded in the body.
    #[must_use]
    pub fn primary_image(&self) -> Option<String> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ToOwned::to_owned)
            .or_else(|| {
                html_preview::extract_image_sources(&self.content)
                    .into_iter()
                    .next()
            })
    }
}
