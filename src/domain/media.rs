//! Prop contract of the media component (images and video).
//!
//! These are plain data types. Rendering and layout live in the front-end.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Container width used when none is given
pub const DEFAULT_MAX_CONTAINER_WIDTH: &str = "100vw";

/// Width the media occupies from a breakpoint upwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsiveWidth {
    /// Breakpoint name or media query, e.g. `md`
    pub breakpoint: String,

    /// CSS width, e.g. `100%`, `33.33%`, `50%`
    pub width: String,
}

impl ResponsiveWidth {
    pub fn new(breakpoint: impl Into<String>, width: impl Into<String>) -> Self {
        Self {
            breakpoint: breakpoint.into(),
            width: width.into(),
        }
    }
}

/// Image loading strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loading {
    Lazy,
    Eager,
}

/// Image bundled with the front-end at build time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticImage {
    pub src: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_data_url: Option<String>,
}

/// Reference to an uploaded media item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaResource {
    /// Numeric media id
    Id(u64),

    /// String media id
    Key(String),

    /// Fully populated media record
    Record(Map<String, Value>),
}

/// Props accepted by the media component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Fill the parent container (images only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_class_name: Option<String>,

    /// Images only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading: Option<Loading>,

    /// Preload the image (images only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<MediaResource>,

    /// Fixed `sizes` value, overrides `responsive_widths` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<StaticImage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responsive_widths: Vec<ResponsiveWidth>,

    /// px, vw, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_container_width: Option<String>,
}

impl MediaProps {
    /// Props for an uploaded media item
    pub fn for_resource(resource: MediaResource) -> Self {
        Self {
            resource: Some(resource),
            ..Default::default()
        }
    }

    pub fn with_responsive_width(mut self, width: ResponsiveWidth) -> Self {
        self.responsive_widths.push(width);
        self
    }

    /// Container width, falling back to `100vw`
    pub fn effective_max_container_width(&self) -> &str {
        self.max_container_width
            .as_deref()
            .unwrap_or(DEFAULT_MAX_CONTAINER_WIDTH)
    }

    /// Whether a fixed `size` takes precedence over responsive widths
    pub fn uses_fixed_size(&self) -> bool {
        self.size.is_some()
    }
}
