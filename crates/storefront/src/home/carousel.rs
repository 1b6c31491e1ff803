//! Slider presets for the home page carousels.
//!
//! Serialized to JSON (slick option names) and written into each carousel's
//! `data-carousel` attribute; the widget reads its options from there.

use serde::Serialize;

/// Options for one carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselSettings {
    pub infinite: bool,
    pub slides_to_show: u32,
    pub slides_to_scroll: u32,
    pub autoplay: bool,
    /// Transition duration in milliseconds.
    pub speed: u32,
    /// Delay between automatic slides in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay_speed: Option<u32>,
    pub css_ease: &'static str,
    pub arrows: bool,
    pub dots: bool,
    pub rtl: bool,
    pub focus_on_select: bool,
    /// Overrides applied below each breakpoint width.
    pub responsive: Vec<Breakpoint>,
}

/// Settings that apply below a viewport width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakpoint {
    /// Viewport width in pixels.
    pub breakpoint: u32,
    pub settings: BreakpointSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointSettings {
    pub slides_to_show: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides_to_scroll: Option<u32>,
}

const MOBILE: u32 = 768;
const TABLET: u32 = 1024;

/// Continuous marquee timing shared by the auto-scrolling carousels.
const MARQUEE_MS: u32 = 2000;

impl Breakpoint {
    const fn show(breakpoint: u32, slides_to_show: u32) -> Self {
        Self {
            breakpoint,
            settings: BreakpointSettings {
                slides_to_show,
                slides_to_scroll: None,
            },
        }
    }

    const fn page(breakpoint: u32, slides: u32) -> Self {
        Self {
            breakpoint,
            settings: BreakpointSettings {
                slides_to_show: slides,
                slides_to_scroll: Some(slides),
            },
        }
    }
}

impl CarouselSettings {
    /// Auto-scrolling strip of slides moving at constant speed.
    fn auto_scroll(slides_to_show: u32, mobile: u32, tablet: u32) -> Self {
        Self {
            infinite: true,
            slides_to_show,
            slides_to_scroll: 1,
            autoplay: true,
            speed: MARQUEE_MS,
            autoplay_speed: Some(MARQUEE_MS),
            css_ease: "linear",
            arrows: false,
            dots: false,
            rtl: false,
            focus_on_select: false,
            responsive: vec![
                Breakpoint::show(MOBILE, mobile),
                Breakpoint::show(TABLET, tablet),
            ],
        }
    }

    /// Value propositions scrolling under the hero.
    #[must_use]
    pub fn marquee() -> Self {
        Self::auto_scroll(4, 1, 2)
    }

    /// Press logos, scrolling right to left.
    #[must_use]
    pub fn partners() -> Self {
        Self {
            rtl: true,
            ..Self::auto_scroll(6, 2, 4)
        }
    }

    /// Podcast videos in the science section.
    #[must_use]
    pub fn videos() -> Self {
        Self {
            focus_on_select: true,
            ..Self::auto_scroll(5, 2, 4)
        }
    }

    /// Paged trending products with arrows.
    #[must_use]
    pub fn trending_products() -> Self {
        Self {
            infinite: true,
            slides_to_show: 4,
            slides_to_scroll: 4,
            autoplay: false,
            speed: 1000,
            autoplay_speed: None,
            css_ease: "linear",
            arrows: true,
            dots: false,
            rtl: false,
            focus_on_select: true,
            responsive: vec![Breakpoint::page(MOBILE, 1), Breakpoint::page(TABLET, 2)],
        }
    }

    /// JSON for a `data-carousel` attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// All carousel presets used by the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarouselPresets {
    pub marquee: CarouselSettings,
    pub partners: CarouselSettings,
    pub videos: CarouselSettings,
    pub trending_products: CarouselSettings,
}

impl Default for CarouselPresets {
    fn default() -> Self {
        Self {
            marquee: CarouselSettings::marquee(),
            partners: CarouselSettings::partners(),
            videos: CarouselSettings::videos(),
            trending_products: CarouselSettings::trending_products(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn to_value(settings: &CarouselSettings) -> Value {
        serde_json::from_str(&settings.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_marquee_json() {
        let value = to_value(&CarouselSettings::marquee());

        assert_eq!(
            value,
            json!({
                "infinite": true,
                "slidesToShow": 4,
                "slidesToScroll": 1,
                "autoplay": true,
                "speed": 2000,
                "autoplaySpeed": 2000,
                "cssEase": "linear",
                "arrows": false,
                "dots": false,
                "rtl": false,
                "focusOnSelect": false,
                "responsive": [
                    { "breakpoint": 768, "settings": { "slidesToShow": 1 } },
                    { "breakpoint": 1024, "settings": { "slidesToShow": 2 } }
                ]
            })
        );
    }

    #[test]
    fn test_partners_scroll_right_to_left() {
        let partners = CarouselSettings::partners();
        assert!(partners.rtl);
        assert_eq!(partners.slides_to_show, 6);
        assert_eq!(
            partners.responsive,
            [Breakpoint::show(768, 2), Breakpoint::show(1024, 4)]
        );
    }

    #[test]
    fn test_videos_focus_on_select() {
        let videos = CarouselSettings::videos();
        assert!(videos.focus_on_select);
        assert!(!videos.rtl);
        assert_eq!(videos.slides_to_show, 5);
    }

    #[test]
    fn test_trending_products_pages_by_breakpoint() {
        let value = to_value(&CarouselSettings::trending_products());

        assert_eq!(value["slidesToScroll"], 4);
        assert_eq!(value["arrows"], true);
        assert!(value.get("autoplaySpeed").is_none());
        assert_eq!(
            value["responsive"],
            json!([
                { "breakpoint": 768, "settings": { "slidesToShow": 1, "slidesToScroll": 1 } },
                { "breakpoint": 1024, "settings": { "slidesToShow": 2, "slidesToScroll": 2 } }
            ])
        );
    }
}
