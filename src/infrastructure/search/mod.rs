use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::domain::entities::{Post, PostId};
use crate::domain::services::html_preview;

/// A service that performs fuzzy searching using the Skim algorithm.
#[derive(Clone)]
pub struct FuzzySearcher {
    matcher: Arc<SkimMatcherV2>,
}

impl Default for FuzzySearcher {
    fn default() -> Self {
        Self {
            matcher: Arc::new(SkimMatcherV2::default().ignore_case()),
        }
    }
}

impl std::fmt::Debug for FuzzySearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzySearcher").finish_non_exhaustive()
    }
}

impl FuzzySearcher {
    /// Creates a case-insensitive matcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fuzzy score of `pattern` in `choice`, or `None` when it does not match.
    #[must_use]
    pub fn score(&self, choice: &str, pattern: &str) -> Option<i64> {
        self.matcher.fuzzy_match(choice, pattern)
    }

    /// Scores a post against `pattern`. The title wins over the body.
    #[must_use]
    pub fn score_post(&self, post: &Post, pattern: &str) -> Option<i64> {
        let title = self.score(&post.title, pattern);
        let body = self.score(&html_preview::strip_html(&post.content), pattern);

        match (title, body) {
            (Some(t), Some(b)) => Some(t.max(b / 2)),
            (Some(t), None) => Some(t),
            (None, Some(b)) => Some(b / 2),
            (None, None) => None,
        }
    }

    /// Returns matching post IDs, best match first.
    #[must_use]
    pub fn search_posts(&self, posts: &[Post], pattern: &str) -> Vec<(PostId, i64)> {
        let mut results: Vec<(PostId, i64)> = posts
            .iter()
            .filter_map(|post| self.score_post(post, pattern).map(|score| (post.id, score)))
            .collect();

        results.sort_by(|a, b| b.1.cmp(&a.1));
        results
    }
}
