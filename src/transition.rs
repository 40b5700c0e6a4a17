//! Page transition animations.
//!
//! The router never animates anything itself. Animation settings ride along
//! on navigation requests and are handed to the host, which applies them to
//! its native page-stack transition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Window animation used by the host when a page enters or leaves.
///
/// Serialized in the host's kebab-case form (`"slide-out-right"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationType {
    /// Let the host pick its platform default.
    #[default]
    Auto,
    /// No animation.
    None,
    /// Slide out towards the right.
    SlideOutRight,
    /// Slide out towards the left.
    SlideOutLeft,
    /// Slide out towards the top.
    SlideOutTop,
    /// Slide out towards the bottom.
    SlideOutBottom,
    /// Fade out.
    FadeOut,
    /// Zoom in.
    ZoomIn,
    /// Zoom in while fading.
    ZoomFadeIn,
    /// Pop out.
    PopOut,
}

impl AnimationType {
    /// The host's string name for this animation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::SlideOutRight => "slide-out-right",
            Self::SlideOutLeft => "slide-out-left",
            Self::SlideOutTop => "slide-out-top",
            Self::SlideOutBottom => "slide-out-bottom",
            Self::FadeOut => "fade-out",
            Self::ZoomIn => "zoom-in",
            Self::ZoomFadeIn => "zoom-fade-in",
            Self::PopOut => "pop-out",
        }
    }
}

impl fmt::Display for AnimationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Animation settings attached to one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    /// Animation kind; `None` leaves the choice to the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_type: Option<AnimationType>,
    /// Duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_duration: Option<u32>,
}

impl Animation {
    /// Animation with an explicit kind and duration.
    pub fn new(animation_type: AnimationType, duration_ms: u32) -> Self {
        Self {
            animation_type: Some(animation_type),
            animation_duration: Some(duration_ms),
        }
    }

    /// `true` when neither field is set.
    pub fn is_default(&self) -> bool {
        self.animation_type.is_none() && self.animation_duration.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_type_names() {
        assert_eq!(AnimationType::SlideOutRight.as_str(), "slide-out-right");
        assert_eq!(AnimationType::ZoomFadeIn.to_string(), "zoom-fade-in");
        assert_eq!(AnimationType::default(), AnimationType::Auto);
    }

    #[test]
    fn test_animation_type_serde_matches_as_str() {
        for kind in [
            AnimationType::Auto,
            AnimationType::None,
            AnimationType::SlideOutBottom,
            AnimationType::PopOut,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_animation_default() {
        assert!(Animation::default().is_default());
        let animation = Animation::new(AnimationType::FadeOut, 300);
        assert!(!animation.is_default());
        assert_eq!(animation.animation_duration, Some(300));
    }

    #[test]
    fn test_unset_animation_fields_are_omitted() {
        assert_eq!(serde_json::to_string(&Animation::default()).unwrap(), "{}");

        let value = serde_json::to_value(Animation {
            animation_type: Some(AnimationType::ZoomIn),
            animation_duration: None,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({ "animationType": "zoom-in" }));
    }
}
