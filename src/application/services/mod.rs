/// List filtering and ordering.
pub mod feed_filter;

pub use feed_filter::{FeedFilter, PopularityWeight, PostQuery, SortOrder, popularity_score};
