//! Blog type conversion functions.

use crate::shopify::types::{Article, Blog};

use super::super::queries::{ArticleData, BlogData};
use super::convert_image;

/// Convert a blog node, keeping article order.
pub fn convert_blog(blog: BlogData) -> Blog {
    Blog {
        id: blog.id,
        title: blog.title,
        handle: blog.handle,
        articles: blog.articles.nodes.into_iter().map(convert_article).collect(),
    }
}

fn convert_article(article: ArticleData) -> Article {
    Article {
        id: article.id,
        title: article.title,
        content_html: article.content_html,
        excerpt: article.excerpt.filter(|e| !e.is_empty()),
        published_at: article.published_at,
        author_name: article.author_v2.map(|a| a.name),
        image: article.image.map(convert_image),
    }
}
