//! Home page route handler.
//!
//! The page is streamed in two chunks. The first carries everything the
//! loader fetched eagerly, with "Loading..." slots where recommended products
//! go. The second is sent once the deferred recommendations resolve: one
//! `<template>` per slot plus a nonce'd script that swaps them in. Crawlers
//! get a single, fully rendered document instead.

use std::convert::Infallible;

use askama::Template;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::home::{CarouselPresets, HomeSection, load_home_data};
use crate::middleware::CspNonce;
use crate::routes::cart::ImageView;
use crate::shopify::types::{Article, Blog, Image, Product};
use crate::state::AppState;

/// Shown when an article has no author.
const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// User-Agent fragments that identify crawlers and link unfurlers.
const BOT_MARKERS: [&str; 7] = [
    "crawler",
    "spider",
    "slurp",
    "facebookexternalhit",
    "embedly",
    "lighthouse",
    "headlesschrome",
];

/// Device names whose User-Agent token ends in "bot".
const BOT_LOOKALIKES: [&str; 1] = ["cubot"];

// =============================================================================
// Static Content
// =============================================================================

/// Partner logo in the hero strip.
#[derive(Clone)]
pub struct PartnerLogo {
    pub name: &'static str,
    pub image: &'static str,
}

/// A goal card in the advantages grid.
#[derive(Clone)]
pub struct Advantage {
    pub title: &'static str,
    pub blurb: &'static str,
    pub image: &'static str,
}

/// One point of the "why" section.
#[derive(Clone)]
pub struct InfoPoint {
    pub title: &'static str,
    pub text: &'static str,
    pub icon: &'static str,
}

/// Copy and imagery that does not come from Shopify.
#[derive(Clone)]
pub struct HomeContent {
    pub marquee: Vec<&'static str>,
    pub partners: Vec<PartnerLogo>,
    pub advantages: Vec<Advantage>,
    pub information: Vec<InfoPoint>,
    pub blend: Vec<&'static str>,
    pub instagram: Vec<String>,
}

impl Default for HomeContent {
    fn default() -> Self {
        Self {
            marquee: vec![
                "✸ High Quality Ingredients",
                "✸ Independently Certified",
                "✸ Expert Driven",
                "✸ Shipped Internationally",
            ],
            partners: vec![
                PartnerLogo {
                    name: "Rolling Stone",
                    image: "/static/images/partners/img.png",
                },
                PartnerLogo {
                    name: "Mens Journal",
                    image: "/static/images/partners/img_1.png",
                },
                PartnerLogo {
                    name: "LA Weekly",
                    image: "/static/images/partners/img_2.png",
                },
                PartnerLogo {
                    name: "Herb",
                    image: "/static/images/partners/img_3.png",
                },
                PartnerLogo {
                    name: "The New Work Times",
                    image: "/static/images/partners/img_4.png",
                },
                PartnerLogo {
                    name: "BBC News",
                    image: "/static/images/partners/img_5.png",
                },
            ],
            advantages: vec![
                Advantage {
                    title: "Sleep",
                    blurb: "Optimize Your Sleep Patterns.",
                    image: "/static/images/advantages/sleep.jpg",
                },
                Advantage {
                    title: "Cognitive Function",
                    blurb: "Enhance your brain's performance and connectivity",
                    image: "/static/images/advantages/cognitive.jpg",
                },
                Advantage {
                    title: "Foundational Health",
                    blurb: "Promoting healthy, natural deep sleep day to day",
                    image: "/static/images/advantages/foundational.jpg",
                },
                Advantage {
                    title: "Athletic Performance",
                    blurb: "Increase your healthy tissue, muscle, and energy",
                    image: "/static/images/advantages/athletic.jpg",
                },
                Advantage {
                    title: "Diet & Nutrition",
                    blurb: "Get a better diet plan and healthy meals.",
                    image: "/static/images/advantages/diet.jpg",
                },
            ],
            information: vec![
                InfoPoint {
                    title: "We Make It Easy",
                    text: "Personalized packs, delivered to your door every month.",
                    icon: "/static/images/why-health-fitness/img.png",
                },
                InfoPoint {
                    title: "Clean & Effective",
                    text: "Third-party tested ingredients at doses that work.",
                    icon: "/static/images/why-health-fitness/img_1.png",
                },
                InfoPoint {
                    title: "Your Free Dietitian",
                    text: "Talk to an expert whenever your goals change.",
                    icon: "/static/images/why-health-fitness/img_2.png",
                },
                InfoPoint {
                    title: "Made For You",
                    text: "Built around your goals, not a one-size-fits-all formula.",
                    icon: "/static/images/why-health-fitness/img_3.png",
                },
            ],
            blend: vec!["Whey Based", "Build Muscle", "Clean Ingredients"],
            instagram: (1..=10)
                .map(|n| format!("/static/images/instagram/{n}.jpg"))
                .collect(),
        }
    }
}

// =============================================================================
// Product, Article and Blog Views
// =============================================================================

impl From<&Image> for ImageView {
    fn from(image: &Image) -> Self {
        Self {
            url: image.url.clone(),
            alt: image.alt_text.clone().unwrap_or_default(),
        }
    }
}

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub handle: String,
    pub title: String,
    pub price: String,
    pub image: Option<ImageView>,
    /// Variant added by the card's button.
    pub variant_id: Option<String>,
    pub available: bool,
    /// Pre-rendered star rating markup from the reviews app.
    pub star_rating: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let variant = product.default_variant();
        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            price: product.price_range.min_variant_price.display(),
            image: product.featured_image().map(|image| {
                let mut view = ImageView::from(image);
                if view.alt.is_empty() {
                    view.alt.clone_from(&product.title);
                }
                view
            }),
            variant_id: variant.map(|v| v.id.clone()),
            available: variant.is_some_and(|v| v.available_for_sale),
            star_rating: product.star_rating_snippet.clone(),
        }
    }
}

/// Article display data for templates.
#[derive(Debug, Clone)]
pub struct ArticleView {
    pub title: String,
    pub content_html: String,
    pub image: Option<ImageView>,
    pub author: String,
    pub published: String,
}

impl From<&Article> for ArticleView {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            content_html: sanitize_content_html(&article.content_html),
            image: article.image.as_ref().map(|image| {
                let mut view = ImageView::from(image);
                if view.alt.is_empty() {
                    view.alt.clone_from(&article.title);
                }
                view
            }),
            author: article
                .author_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            published: format_published(article.published_at),
        }
    }
}

/// Blog display data for templates.
#[derive(Debug, Clone)]
pub struct BlogView {
    pub title: String,
    pub articles: Vec<ArticleView>,
}

impl From<&Blog> for BlogView {
    fn from(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            articles: blog.articles.iter().map(ArticleView::from).collect(),
        }
    }
}

/// Recommended products, and the one paired with each podcast video.
#[derive(Debug, Clone, Default)]
pub struct RecommendedView {
    pub products: Vec<ProductCardView>,
    pub featured: Option<ProductCardView>,
}

impl RecommendedView {
    /// Build from the resolved recommendations; a failed fetch is empty.
    #[must_use]
    pub fn from_products(products: Option<Vec<Product>>) -> Self {
        let products: Vec<ProductCardView> = products
            .unwrap_or_default()
            .iter()
            .map(ProductCardView::from)
            .collect();
        Self {
            featured: products.first().cloned(),
            products,
        }
    }
}

/// Carousel presets as `data-carousel` attribute values.
#[derive(Debug, Clone)]
pub struct CarouselAttrs {
    pub marquee: String,
    pub partners: String,
    pub videos: String,
    pub trending_products: String,
}

impl CarouselAttrs {
    fn new(presets: &CarouselPresets) -> std::result::Result<Self, serde_json::Error> {
        Ok(Self {
            marquee: presets.marquee.to_json()?,
            partners: presets.partners.to_json()?,
            videos: presets.videos.to_json()?,
            trending_products: presets.trending_products.to_json()?,
        })
    }
}

/// Make Shopify's article HTML valid for embedding.
///
/// Rich-text video embeds arrive as `controls="controls"`; the bare boolean
/// attribute is what the page expects.
#[must_use]
pub fn sanitize_content_html(html: &str) -> String {
    html.replace(r#"controls="controls""#, "controls")
}

/// Format a publish date as `Month D, YYYY`.
fn format_published(published_at: DateTime<Utc>) -> String {
    published_at.format("%B %-d, %Y").to_string()
}

/// Whether the request comes from a crawler that needs the whole page at once.
///
/// Besides the fixed markers, any word of the User-Agent ending in `bot` or
/// `bots` (`Googlebot/2.1`, `AhrefsBot`, `bingbot`) counts, except device
/// names such as `CUBOT_X30`.
#[must_use]
pub fn is_bot(user_agent: Option<&str>) -> bool {
    user_agent.is_some_and(|agent| {
        let agent = agent.to_ascii_lowercase();
        BOT_MARKERS.iter().any(|marker| agent.contains(marker))
            || agent
                .split(|c: char| !c.is_ascii_alphanumeric())
                .any(|word| {
                    (word.ends_with("bot") || word.ends_with("bots"))
                        && !BOT_LOOKALIKES.contains(&word)
                })
    })
}

// =============================================================================
// Templates
// =============================================================================

/// Home page up to the end of the footer.
///
/// With `recommended` unset, recommendation slots render as placeholders and
/// the document is left open for [`HomeTailTemplate`].
#[derive(Template)]
#[template(path = "home/shell.html")]
pub struct HomeShellTemplate {
    pub nonce: String,
    pub sections: [HomeSection; 10],
    pub content: HomeContent,
    pub carousels: CarouselAttrs,
    pub bundles: Vec<ProductCardView>,
    pub podcasts: Vec<ArticleView>,
    pub blogs: Vec<BlogView>,
    pub recommended: Option<RecommendedView>,
}

/// Closing chunk of the home page.
///
/// With `fragments` set, emits the resolved recommendation fragments and the
/// script that moves them into their slots.
#[derive(Template)]
#[template(path = "home/tail.html")]
pub struct HomeTailTemplate {
    pub nonce: String,
    pub fragments: Option<RecommendedView>,
}

fn render<T: Template>(template: &T) -> Result<String> {
    template
        .render()
        .map_err(|e| AppError::Internal(format!("Template render failed: {e}")))
}

// =============================================================================
// Handler
// =============================================================================

/// Display the home page.
///
/// # Errors
///
/// Fails with a 502 if the bundles collection cannot be fetched.
#[instrument(skip(state, nonce, headers))]
pub async fn home(
    State(state): State<AppState>,
    CspNonce(nonce): CspNonce,
    headers: HeaderMap,
) -> Result<Response> {
    let data = load_home_data(state.storefront()).await?;

    let carousels = CarouselAttrs::new(&CarouselPresets::default())
        .map_err(|e| AppError::Internal(format!("Carousel settings: {e}")))?;

    let podcasts = data
        .podcast_blogs
        .iter()
        .flat_map(|blog| blog.articles.iter().map(ArticleView::from))
        .collect();

    let mut shell = HomeShellTemplate {
        nonce: nonce.clone(),
        sections: HomeSection::ORDER,
        content: HomeContent::default(),
        carousels,
        bundles: data.bundles.iter().map(ProductCardView::from).collect(),
        podcasts,
        blogs: data.balanced_diet_blogs.iter().map(BlogView::from).collect(),
        recommended: None,
    };

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());

    if is_bot(user_agent) {
        let products = data.recommended_products.resolve().await;
        shell.recommended = Some(RecommendedView::from_products(products));
        let mut page = render(&shell)?;
        page.push_str(&render(&HomeTailTemplate {
            nonce,
            fragments: None,
        })?);
        return Ok(Html(page).into_response());
    }

    let first_chunk = render(&shell)?;
    let recommended_products = data.recommended_products;

    let body = async_stream::stream! {
        yield Ok::<_, Infallible>(Bytes::from(first_chunk));

        let products = recommended_products.resolve().await;
        let tail = HomeTailTemplate {
            nonce,
            fragments: Some(RecommendedView::from_products(products)),
        };
        match tail.render() {
            Ok(html) => yield Ok(Bytes::from(html)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render deferred home fragments");
                yield Ok(Bytes::from_static(b"</body>\n</html>\n"));
            }
        }
    };

    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response())
}
