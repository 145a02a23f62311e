//! Client-side filtering and ordering of fetched posts.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::entities::Post;
use crate::infrastructure::search::FuzzySearcher;

/// Which counter dominates the popularity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopularityWeight {
    /// `likes * 2 + comments`.
    #[default]
    Likes,
    /// `scraps * 2 + comments`.
    Scraps,
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Latest,
    /// Highest popularity score first, newest first on ties.
    Popular(PopularityWeight),
}

/// Weight applied to likes or scraps in the popularity score.
pub const POPULARITY_WEIGHT: u64 = 2;

/// Computes the popularity score of a post.
#[must_use]
pub fn popularity_score(post: &Post, weight: PopularityWeight) -> u64 {
    let weighted = match weight {
        PopularityWeight::Likes => post.like_count,
        PopularityWeight::Scraps => post.scrap_count,
    };
    u64::from(weighted) * POPULARITY_WEIGHT + u64::from(post.comment_count)
}

/// Criteria for a list page.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub tag: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub excellent_only: bool,
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl PostQuery {
    /// An empty query: everything, newest first.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps posts carrying `tag`.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Keeps posts in `category`.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Keeps posts of type `kind`.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Keeps only excellent posts.
    #[must_use]
    pub const fn excellent_only(mut self) -> Self {
        self.excellent_only = true;
        self
    }

    /// Narrows by fuzzy match on title and body.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub const fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    fn matches(&self, post: &Post) -> bool {
        if let Some(tag) = self.tag.as_deref()
            && !post.has_tag(tag)
        {
            return false;
        }
        if let Some(category) = self.category.as_deref()
            && !post
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category))
        {
            return false;
        }
        if let Some(kind) = self.kind.as_deref()
            && !post
                .kind
                .as_deref()
                .is_some_and(|k| k.eq_ignore_ascii_case(kind))
        {
            return false;
        }
        !self.excellent_only || post.is_excellent
    }
}

/// Applies a [`PostQuery`] to an already-fetched list.
#[derive(Debug, Clone, Default)]
pub struct FeedFilter {
    searcher: FuzzySearcher,
}

impl FeedFilter {
    /// Creates a filter with a case-insensitive fuzzy searcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the posts matching `query`, ordered by `query.sort`.
    /// Same input, same output.
    #[must_use]
    pub fn apply(&self, posts: &[Post], query: &PostQuery) -> Vec<Post> {
        let mut selected: Vec<Post> = posts
            .iter()
            .filter(|post| query.matches(post))
            .cloned()
            .collect();

        if let Some(pattern) = query.search.as_deref().map(str::trim)
            && !pattern.is_empty()
        {
            let hits: HashSet<_> = self
                .searcher
                .search_posts(&selected, pattern)
                .into_iter()
                .map(|(id, _)| id)
                .collect();
            selected.retain(|post| hits.contains(&post.id));
        }

        selected.sort_by(|a, b| compare(a, b, query.sort));
        selected
    }
}

fn compare(a: &Post, b: &Post, sort: SortOrder) -> Ordering {
    let latest = b.created_at.cmp(&a.created_at);
    match sort {
        SortOrder::Latest => latest,
        SortOrder::Popular(weight) => popularity_score(b, weight)
            .cmp(&popularity_score(a, weight))
            .then(latest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use test_case::test_case;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn sample() -> Vec<Post> {
        vec![
            Post::new(1, "Interview checklist", ts(100))
                .with_tags(["hiring"])
                .with_category("Career")
                .with_kind("story")
                .with_counts(10, 0, 1),
            Post::new(2, "Payroll questions", ts(300))
                .with_tags(["payroll", "hiring"])
                .with_category("career")
                .with_kind("question")
                .with_counts(1, 9, 4)
                .excellent(),
            Post::new(3, "Lounge chat", ts(200))
                .with_tags(["lounge"])
                .with_category("Lounge")
                .with_kind("story")
                .with_counts(3, 3, 20),
        ]
    }

    fn ids(posts: &[Post]) -> Vec<u64> {
        posts.iter().map(|p| p.id.as_u64()).collect()
    }

    #[test_case(SortOrder::Latest, vec![2, 3, 1] ; "latest")]
    #[test_case(SortOrder::Popular(PopularityWeight::Likes), vec![3, 1, 2] ; "popular_by_likes")]
    #[test_case(SortOrder::Popular(PopularityWeight::Scraps), vec![3, 2, 1] ; "popular_by_scraps")]
    fn test_sort(sort: SortOrder, expected: Vec<u64>) {
        let result = FeedFilter::new().apply(&sample(), &PostQuery::new().sorted(sort));
        assert_eq!(ids(&result), expected);
    }

    #[test]
    fn test_popularity_tie_falls_back_to_latest() {
        let posts = vec![
            Post::new(1, "old", ts(1)).with_counts(2, 0, 0),
            Post::new(2, "new", ts(2)).with_counts(1, 0, 2),
        ];

        let result = FeedFilter::new().apply(
            &posts,
            &PostQuery::new().sorted(SortOrder::Popular(PopularityWeight::Likes)),
        );
        assert_eq!(ids(&result), vec![2, 1]);
    }

    #[test]
    fn test_popularity_score() {
        let post = Post::new(1, "p", ts(0)).with_counts(5, 7, 3);
        assert_eq!(popularity_score(&post, PopularityWeight::Likes), 13);
        assert_eq!(popularity_score(&post, PopularityWeight::Scraps), 17);
    }

    #[test_case(PostQuery::new().with_tag("hiring"), vec![2, 1] ; "by_tag")]
    #[test_case(PostQuery::new().with_category("CAREER"), vec![2, 1] ; "by_category_case_insensitive")]
    #[test_case(PostQuery::new().with_kind("story"), vec![3, 1] ; "by_kind")]
    #[test_case(PostQuery::new().excellent_only(), vec![2] ; "excellent_only")]
    #[test_case(PostQuery::new().with_tag("hiring").with_kind("story"), vec![1] ; "filters_compose")]
    #[test_case(PostQuery::new().with_tag("missing"), vec![] ; "no_match")]
    fn test_filters(query: PostQuery, expected: Vec<u64>) {
        let result = FeedFilter::new().apply(&sample(), &query);
        assert_eq!(ids(&result), expected);
    }

    #[test]
    fn test_search_keeps_requested_order() {
        let query = PostQuery::new()
            .with_search("ch")
            .sorted(SortOrder::Latest);

        let result = FeedFilter::new().apply(&sample(), &query);
        assert_eq!(ids(&result), vec![3, 1]);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let result = FeedFilter::new().apply(&sample(), &PostQuery::new().with_search("   "));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_apply_is_repeatable() {
        let filter = FeedFilter::new();
        let query = PostQuery::new().sorted(SortOrder::Popular(PopularityWeight::Scraps));
        let posts = sample();

        assert_eq!(filter.apply(&posts, &query), filter.apply(&posts, &query));
    }
}
