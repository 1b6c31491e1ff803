//! Home page section order.

/// A section of the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeSection {
    Hero,
    Advantages,
    RecommendedProducts,
    Information,
    /// Podcast videos, each paired with the top recommended product.
    Science,
    Bundles,
    CustomizedProduct,
    InnovateEngineering,
    /// Latest "Balanced Diet" articles.
    Blogs,
    ImagesCollection,
}

impl HomeSection {
    /// Render order, top to bottom.
    pub const ORDER: [Self; 10] = [
        Self::Hero,
        Self::Advantages,
        Self::RecommendedProducts,
        Self::Information,
        Self::Science,
        Self::Bundles,
        Self::CustomizedProduct,
        Self::InnovateEngineering,
        Self::Blogs,
        Self::ImagesCollection,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_fixed() {
        assert_eq!(HomeSection::ORDER.first(), Some(&HomeSection::Hero));
        assert_eq!(
            HomeSection::ORDER.last(),
            Some(&HomeSection::ImagesCollection)
        );

        let recommended = HomeSection::ORDER
            .iter()
            .position(|s| *s == HomeSection::RecommendedProducts);
        let bundles = HomeSection::ORDER
            .iter()
            .position(|s| *s == HomeSection::Bundles);
        assert_eq!(recommended, Some(2));
        assert_eq!(bundles, Some(5));
    }
}
