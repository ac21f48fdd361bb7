//! Configuration types for Pericope layout passes.
//!
//! This module provides configuration structures that control layout
//! constants and label styling. All types implement [`serde::Deserialize`]
//! for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Margins, label metrics, selection control size and scale.
//! - [`StyleConfig`] - Label border, role placement and text direction.
//!
//! # Example
//!
//! ```
//! # use pericope::config::AppConfig;
//! let config: AppConfig = toml::from_str(r#"
//!     [layout]
//!     margin = 6.0
//!
//!     [style]
//!     label_border = "box"
//!     direction = "right-to-left"
//! "#).expect("valid config");
//!
//! assert_eq!(config.layout().margin(), 6.0);
//! assert_eq!(config.layout().pixels_per_grid_unit(), 24.0);
//! ```

use serde::Deserialize;

use pericope_core::{
    geometry::Size,
    style::{LabelBorder, RolePlacement, StylePolicy, TextDirection},
};

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Layout constants.
///
/// Horizontal values are footprint units (the unit of the text measure).
/// Vertical values are output units: grid units times `pixels_per_grid_unit`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed margin added to every relation footprint.
    margin: f32,

    /// Selection control shown on root relations.
    selection_control: Size,

    /// Padding on each side of a bordered role label.
    label_padding: f32,

    /// Height of a role label.
    label_height: f32,

    /// Advance per character used to measure text.
    char_width: f32,

    /// Default vertical scale when the renderer does not supply one.
    pixels_per_grid_unit: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 10.0,
            selection_control: Size::new(14.0, 14.0),
            label_padding: 3.0,
            label_height: 14.0,
            char_width: 7.0,
            pixels_per_grid_unit: 24.0,
        }
    }
}

impl LayoutConfig {
    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn selection_control(&self) -> Size {
        self.selection_control
    }

    pub fn label_padding(&self) -> f32 {
        self.label_padding
    }

    pub fn label_height(&self) -> f32 {
        self.label_height
    }

    pub fn char_width(&self) -> f32 {
        self.char_width
    }

    pub fn pixels_per_grid_unit(&self) -> f32 {
        self.pixels_per_grid_unit
    }

    /// Checks that every configured value is usable.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        let checks = [
            ("margin", self.margin),
            ("label_padding", self.label_padding),
            ("label_height", self.label_height),
            ("char_width", self.char_width),
        ];
        if let Some((name, value)) = checks
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value >= 0.0))
        {
            return Err(format!("`layout.{name}` must be non-negative, got {value}"));
        }
        if !(self.pixels_per_grid_unit.is_finite() && self.pixels_per_grid_unit > 0.0) {
            return Err(format!(
                "`layout.pixels_per_grid_unit` must be positive, got {}",
                self.pixels_per_grid_unit
            ));
        }
        if !self.selection_control.is_valid() {
            return Err("`layout.selection_control` must have non-negative dimensions".to_string());
        }
        Ok(())
    }
}

/// Label styling and reading direction.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    label_border: LabelBorder,

    #[serde(default)]
    role_placement: RolePlacement,

    /// Default text direction when the renderer does not supply one.
    #[serde(default)]
    direction: TextDirection,
}

impl StyleConfig {
    pub fn new(
        label_border: LabelBorder,
        role_placement: RolePlacement,
        direction: TextDirection,
    ) -> Self {
        Self {
            label_border,
            role_placement,
            direction,
        }
    }

    /// The label style as a [`StylePolicy`].
    pub fn policy(&self) -> StylePolicy {
        StylePolicy::new(self.label_border, self.role_placement)
    }

    pub fn direction(&self) -> TextDirection {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_approx_eq!(f32, config.layout().margin(), 10.0);
        assert_eq!(config.layout().selection_control(), Size::new(14.0, 14.0));
        assert_eq!(config.style().policy(), StylePolicy::default());
        assert_eq!(config.style().direction(), TextDirection::LeftToRight);
        assert!(config.layout().validate().is_ok());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            selection_control = { width = 20.0, height = 10.0 }

            [style]
            role_placement = "overlapping"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.layout().selection_control(), Size::new(20.0, 10.0));
        assert_approx_eq!(f32, config.layout().char_width(), 7.0);
        assert_eq!(config.style().policy().role_placement(), RolePlacement::Overlapping);
        assert_eq!(config.style().policy().label_border(), LabelBorder::None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config: LayoutConfig = toml::from_str("margin = -1.0").expect("valid toml");
        let err = config.validate().unwrap_err();
        assert!(err.contains("layout.margin"), "unexpected message: {err}");

        let config: LayoutConfig = toml::from_str("pixels_per_grid_unit = 0.0").expect("valid toml");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_style_value_fails_to_parse() {
        let result: Result<StyleConfig, _> = toml::from_str(r#"label_border = "dotted""#);
        assert!(result.is_err());
    }
}
