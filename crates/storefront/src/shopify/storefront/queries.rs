//! GraphQL documents for the Shopify Storefront API.
//!
//! Each operation is a unit struct implementing `graphql_client::GraphQLQuery`
//! by hand: the document is a string constant and the variables/response
//! shapes are plain serde types mirroring the selection set.

use chrono::{DateTime, Utc};
use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use crate::shopify::types::{CartLineInput, CartLineUpdateInput};

/// Handle of the collection shown in the bundles section.
pub const BUNDLES_COLLECTION_HANDLE: &str = "Sleep";

macro_rules! product_card_fragment {
    () => {
        r#"
fragment ProductCard on Product {
  id
  title
  handle
  priceRange {
    minVariantPrice {
      amount
      currencyCode
    }
  }
  images(first: 1) {
    nodes {
      id
      url
      altText
      width
      height
    }
  }
  variants(first: 1) {
    nodes {
      id
      availableForSale
    }
  }
  okendoStarRatingSnippet: metafield(
    namespace: "$app:reviews"
    key: "star_rating_snippet"
  ) {
    value
  }
}
"#
    };
}

macro_rules! cart_fragment {
    () => {
        r#"
fragment CartFields on Cart {
  id
  checkoutUrl
  totalQuantity
  cost {
    subtotalAmount {
      amount
      currencyCode
    }
  }
  lines(first: 100) {
    nodes {
      id
      quantity
      cost {
        totalAmount {
          amount
          currencyCode
        }
      }
      merchandise {
        ... on ProductVariant {
          id
          title
          image {
            id
            url
            altText
            width
            height
          }
          selectedOptions {
            name
            value
          }
          product {
            id
            title
            handle
          }
        }
      }
    }
  }
}
"#
    };
}

/// Most recently updated products, rendered below the fold.
pub const RECOMMENDED_PRODUCTS_QUERY: &str = concat!(
    product_card_fragment!(),
    r#"
query RecommendedProducts($country: CountryCode, $language: LanguageCode)
@inContext(country: $country, language: $language) {
  products(first: 100, sortKey: UPDATED_AT, reverse: true) {
    nodes {
      ...ProductCard
    }
  }
}
"#
);

/// Products of the bundles collection, rendered above the fold.
pub const BUNDLES_COLLECTION_QUERY: &str = concat!(
    product_card_fragment!(),
    r#"
query BundlesCollection(
  $handle: String!
  $country: CountryCode
  $language: LanguageCode
) @inContext(country: $country, language: $language) {
  collection(handle: $handle) {
    id
    title
    products(first: 4) {
      nodes {
        ...ProductCard
      }
    }
  }
}
"#
);

/// Blogs with their latest articles.
pub const BLOGS_QUERY: &str = r#"
query Blogs(
  $first: Int!
  $articlesFirst: Int!
  $country: CountryCode
  $language: LanguageCode
) @inContext(country: $country, language: $language) {
  blogs(first: $first) {
    nodes {
      id
      title
      handle
      articles(first: $articlesFirst) {
        nodes {
          id
          title
          contentHtml
          excerpt
          publishedAt
          authorV2 {
            name
          }
          image {
            id
            url
            altText
            width
            height
          }
        }
      }
    }
  }
}
"#;

pub const GET_CART_QUERY: &str = concat!(
    cart_fragment!(),
    r#"
query GetCart($cartId: ID!, $country: CountryCode, $language: LanguageCode)
@inContext(country: $country, language: $language) {
  cart(id: $cartId) {
    ...CartFields
  }
}
"#
);

pub const CREATE_CART_MUTATION: &str = concat!(
    cart_fragment!(),
    r#"
mutation CreateCart($input: CartInput!, $country: CountryCode, $language: LanguageCode)
@inContext(country: $country, language: $language) {
  cartCreate(input: $input) {
    cart {
      ...CartFields
    }
    userErrors {
      field
      message
    }
  }
}
"#
);

pub const ADD_CART_LINES_MUTATION: &str = concat!(
    cart_fragment!(),
    r#"
mutation AddCartLines(
  $cartId: ID!
  $lines: [CartLineInput!]!
  $country: CountryCode
  $language: LanguageCode
) @inContext(country: $country, language: $language) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFields
    }
    userErrors {
      field
      message
    }
  }
}
"#
);

pub const UPDATE_CART_LINES_MUTATION: &str = concat!(
    cart_fragment!(),
    r#"
mutation UpdateCartLines(
  $cartId: ID!
  $lines: [CartLineUpdateInput!]!
  $country: CountryCode
  $language: LanguageCode
) @inContext(country: $country, language: $language) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFields
    }
    userErrors {
      field
      message
    }
  }
}
"#
);

pub const REMOVE_CART_LINES_MUTATION: &str = concat!(
    cart_fragment!(),
    r#"
mutation RemoveCartLines(
  $cartId: ID!
  $lineIds: [ID!]!
  $country: CountryCode
  $language: LanguageCode
) @inContext(country: $country, language: $language) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart {
      ...CartFields
    }
    userErrors {
      field
      message
    }
  }
}
"#
);

macro_rules! storefront_operation {
    ($(#[$meta:meta])* $name:ident, $operation:literal, $document:expr, $variables:ty, $data:ty) => {
        $(#[$meta])*
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $variables;
            type ResponseData = $data;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: $operation,
                }
            }
        }
    };
}

storefront_operation!(
    /// `RecommendedProducts` query.
    RecommendedProducts,
    "RecommendedProducts",
    RECOMMENDED_PRODUCTS_QUERY,
    InContext,
    RecommendedProductsData
);
storefront_operation!(
    /// `BundlesCollection` query.
    BundlesCollection,
    "BundlesCollection",
    BUNDLES_COLLECTION_QUERY,
    BundlesCollectionVariables,
    BundlesCollectionData
);
storefront_operation!(
    /// `Blogs` query.
    Blogs,
    "Blogs",
    BLOGS_QUERY,
    BlogsVariables,
    BlogsData
);
storefront_operation!(
    /// `GetCart` query.
    GetCart,
    "GetCart",
    GET_CART_QUERY,
    CartVariables,
    GetCartData
);
storefront_operation!(
    /// `CreateCart` mutation.
    CreateCart,
    "CreateCart",
    CREATE_CART_MUTATION,
    CreateCartVariables,
    CreateCartData
);
storefront_operation!(
    /// `AddCartLines` mutation.
    AddCartLines,
    "AddCartLines",
    ADD_CART_LINES_MUTATION,
    AddCartLinesVariables,
    AddCartLinesData
);
storefront_operation!(
    /// `UpdateCartLines` mutation.
    UpdateCartLines,
    "UpdateCartLines",
    UPDATE_CART_LINES_MUTATION,
    UpdateCartLinesVariables,
    UpdateCartLinesData
);
storefront_operation!(
    /// `RemoveCartLines` mutation.
    RemoveCartLines,
    "RemoveCartLines",
    REMOVE_CART_LINES_MUTATION,
    RemoveCartLinesVariables,
    RemoveCartLinesData
);

// =============================================================================
// Variables
// =============================================================================

/// `@inContext` arguments shared by every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InContext {
    pub country: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BundlesCollectionVariables {
    pub handle: String,
    #[serde(flatten)]
    pub context: InContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogsVariables {
    pub first: i64,
    pub articles_first: i64,
    #[serde(flatten)]
    pub context: InContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartVariables {
    pub cart_id: String,
    #[serde(flatten)]
    pub context: InContext,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartInput {
    pub lines: Vec<CartLineInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCartVariables {
    pub input: CartInput,
    #[serde(flatten)]
    pub context: InContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartLinesVariables {
    pub cart_id: String,
    pub lines: Vec<CartLineInput>,
    #[serde(flatten)]
    pub context: InContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartLinesVariables {
    pub cart_id: String,
    pub lines: Vec<CartLineUpdateInput>,
    #[serde(flatten)]
    pub context: InContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartLinesVariables {
    pub cart_id: String,
    pub line_ids: Vec<String>,
    #[serde(flatten)]
    pub context: InContext,
}

// =============================================================================
// Response Data
// =============================================================================

/// GraphQL connection reduced to its `nodes`.
#[derive(Debug, Clone, Deserialize)]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyData {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub id: Option<String>,
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeData {
    pub min_variant_price: MoneyData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantData {
    pub id: String,
    pub available_for_sale: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetafieldData {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCardData {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub price_range: PriceRangeData,
    pub images: Nodes<ImageData>,
    pub variants: Nodes<VariantData>,
    pub okendo_star_rating_snippet: Option<MetafieldData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendedProductsData {
    pub products: Nodes<ProductCardData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BundleCollectionData {
    pub id: String,
    pub title: String,
    pub products: Nodes<ProductCardData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BundlesCollectionData {
    pub collection: Option<BundleCollectionData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorData {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleData {
    pub id: String,
    pub title: String,
    pub content_html: String,
    pub excerpt: Option<String>,
    pub published_at: DateTime<Utc>,
    pub author_v2: Option<AuthorData>,
    pub image: Option<ImageData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogData {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub articles: Nodes<ArticleData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogsData {
    pub blogs: Nodes<BlogData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOptionData {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MerchandiseProductData {
    pub id: String,
    pub title: String,
    pub handle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseData {
    pub id: String,
    pub title: String,
    pub image: Option<ImageData>,
    pub selected_options: Vec<SelectedOptionData>,
    pub product: MerchandiseProductData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCostData {
    pub total_amount: MoneyData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLineData {
    pub id: String,
    pub quantity: i64,
    pub cost: LineCostData,
    pub merchandise: MerchandiseData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCostData {
    pub subtotal_amount: MoneyData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartData {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: i64,
    pub cost: CartCostData,
    pub lines: Nodes<CartLineData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorData {
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Payload shared by every cart mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<CartData>,
    pub user_errors: Vec<UserErrorData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetCartData {
    pub cart: Option<CartData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCartData {
    pub cart_create: Option<CartMutationPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartLinesData {
    pub cart_lines_add: Option<CartMutationPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartLinesData {
    pub cart_lines_update: Option<CartMutationPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartLinesData {
    pub cart_lines_remove: Option<CartMutationPayload>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn context() -> InContext {
        InContext {
            country: "US".to_string(),
            language: "EN".to_string(),
        }
    }

    #[test]
    fn test_documents_include_fragments() {
        assert!(RECOMMENDED_PRODUCTS_QUERY.contains("fragment ProductCard on Product"));
        assert!(BUNDLES_COLLECTION_QUERY.contains("...ProductCard"));
        assert!(BUNDLES_COLLECTION_QUERY.contains("collection(handle: $handle)"));
        assert!(UPDATE_CART_LINES_MUTATION.contains("fragment CartFields on Cart"));
    }

    #[test]
    fn test_build_query_sets_operation_name() {
        let body = Blogs::build_query(BlogsVariables {
            first: 3,
            articles_first: 100,
            context: context(),
        });
        assert_eq!(body.operation_name, "Blogs");
        assert_eq!(body.query, BLOGS_QUERY);
    }

    #[test]
    fn test_blogs_variables_serialize_flat() {
        let json = serde_json::to_value(BlogsVariables {
            first: 3,
            articles_first: 100,
            context: context(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "first": 3,
                "articlesFirst": 100,
                "country": "US",
                "language": "EN"
            })
        );
    }

    #[test]
    fn test_remove_variables_use_line_ids() {
        let json = serde_json::to_value(RemoveCartLinesVariables {
            cart_id: "gid://shopify/Cart/1".to_string(),
            line_ids: vec!["gid://shopify/CartLine/9".to_string()],
            context: context(),
        })
        .unwrap();
        assert_eq!(json["cartId"], "gid://shopify/Cart/1");
        assert_eq!(json["lineIds"][0], "gid://shopify/CartLine/9");
    }

    #[test]
    fn test_article_deserializes_author_v2() {
        let article: ArticleData = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Article/1",
            "title": "Sleep Better",
            "contentHtml": "<p>Hi</p>",
            "excerpt": null,
            "publishedAt": "2024-11-05T16:00:00Z",
            "authorV2": { "name": "Dana" },
            "image": null
        }))
        .unwrap();
        assert_eq!(article.author_v2.unwrap().name, "Dana");
    }
}
