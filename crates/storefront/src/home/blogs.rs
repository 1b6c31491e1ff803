//! Blog feeds shown on the home page.
//!
//! Shopify has no "blog by title" lookup on the `blogs` connection, so each
//! feed fetches the first few blogs and keeps the one whose title matches.
//! A feed never fails the page: upstream errors become an empty feed.

use tracing::instrument;

use crate::home::loader::{StorefrontQuery, optional};
use crate::shopify::types::Blog;

/// Number of blogs requested per feed query.
pub const BLOGS_FIRST: i64 = 3;

/// A blog feed rendered on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogFeed {
    /// Latest articles grid near the bottom of the page.
    BalancedDiet,
    /// Video episodes in the science carousel.
    Podcasts,
}

impl BlogFeed {
    /// Blog title the feed is filtered by (exact match).
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::BalancedDiet => "Balanced Diet",
            Self::Podcasts => "Podcasts",
        }
    }

    /// Articles requested per blog.
    #[must_use]
    pub const fn articles_first(self) -> i64 {
        match self {
            Self::BalancedDiet => 3,
            Self::Podcasts => 100,
        }
    }
}

/// Keep the blogs whose title is exactly `title`, in their original order.
#[must_use]
pub fn filter_blogs_by_title(blogs: Vec<Blog>, title: &str) -> Vec<Blog> {
    blogs.into_iter().filter(|blog| blog.title == title).collect()
}

/// Fetch the blogs backing `feed`.
///
/// Any upstream failure is logged and yields an empty list.
#[instrument(skip(storefront), fields(feed = feed.title()))]
pub async fn fetch_filtered_blogs<S: StorefrontQuery>(
    storefront: &S,
    feed: BlogFeed,
) -> Vec<Blog> {
    optional(
        storefront.blogs(BLOGS_FIRST, feed.articles_first()).await,
        feed.title(),
    )
    .map(|blogs| filter_blogs_by_title(blogs, feed.title()))
    .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::home::fixtures::{article, blog};
    use crate::home::loader::tests::FakeStorefront;

    fn titles(blogs: &[Blog]) -> Vec<&str> {
        blogs.iter().map(|b| b.title.as_str()).collect()
    }

    #[test]
    fn test_filter_keeps_exact_match() {
        let blogs = vec![
            blog(
                1,
                "Balanced Diet",
                vec![article(1, "a"), article(2, "b"), article(3, "c")],
            ),
            blog(2, "Podcasts", vec![article(4, "d")]),
        ];

        let filtered = filter_blogs_by_title(blogs, "Podcasts");

        assert_eq!(titles(&filtered), ["Podcasts"]);
        let articles: Vec<_> = filtered
            .first()
            .unwrap()
            .articles
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(articles, ["d"]);
    }

    #[test]
    fn test_filter_no_match_is_empty() {
        let blogs = vec![blog(1, "Balanced Diet", vec![])];
        assert!(filter_blogs_by_title(blogs, "Recipes").is_empty());
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let blogs = vec![blog(1, "podcasts", vec![]), blog(2, "Podcasts ", vec![])];
        assert!(filter_blogs_by_title(blogs, "Podcasts").is_empty());
    }

    #[test]
    fn test_filter_preserves_order() {
        let blogs = vec![
            blog(1, "Podcasts", vec![article(1, "first")]),
            blog(2, "Balanced Diet", vec![]),
            blog(3, "Podcasts", vec![article(2, "second")]),
        ];

        let filtered = filter_blogs_by_title(blogs, "Podcasts");

        let ids: Vec<_> = filtered.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["gid://shopify/Blog/1", "gid://shopify/Blog/3"]);
    }

    #[test]
    fn test_feed_article_bounds() {
        assert_eq!(BlogFeed::BalancedDiet.articles_first(), 3);
        assert_eq!(BlogFeed::Podcasts.articles_first(), 100);
    }

    #[tokio::test]
    async fn test_fetch_requests_feed_bounds() {
        let storefront = FakeStorefront::default();

        let blogs = fetch_filtered_blogs(&storefront, BlogFeed::Podcasts).await;

        assert_eq!(titles(&blogs), ["Podcasts"]);
        assert_eq!(storefront.blog_requests(), [(BLOGS_FIRST, 100)]);
    }

    #[tokio::test]
    async fn test_fetch_error_is_empty() {
        let storefront = FakeStorefront {
            fail_blogs: true,
            ..FakeStorefront::default()
        };

        let blogs = fetch_filtered_blogs(&storefront, BlogFeed::BalancedDiet).await;

        assert!(blogs.is_empty());
    }
}
