//! CSS fragments for orb elements

use crate::sim::OrbStyle;

/// Class list applied to every orb element
pub const ORB_CLASS: &str = "orb absolute rounded-full shadow-md";

/// Thin translucent rim
pub const ORB_BORDER: &str = "1px solid rgba(255, 255, 255, 0.2)";

/// `hsla(h, s%, l%, a)` fill
pub fn fill_css(style: &OrbStyle) -> String {
    format!(
        "hsla({}, {}%, {}%, {})",
        style.hue, style.saturation, style.lightness, style.alpha
    )
}

/// Soft drop shadow, slightly darker and less saturated than the fill
pub fn shadow_css(style: &OrbStyle) -> String {
    format!(
        "0 4px 8px hsla({}, {}%, {}%, 0.3)",
        style.hue,
        (style.saturation - 10.0).max(0.0),
        (style.lightness - 10.0).max(0.0)
    )
}

/// Square size in px
pub fn size_css(diameter: f32) -> String {
    format!("{}px", diameter)
}
