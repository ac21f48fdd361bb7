//! Style policy shared by every rendering context.
//!
//! The same layout core serves the analysis view (bordered role boxes that sit
//! on the connector line) and the plain view (unbordered labels above the
//! line). A [`StylePolicy`] captures the differences that affect geometry.

use serde::{Deserialize, Serialize};

/// Border drawn around a role label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelBorder {
    #[default]
    None,
    Box,
    Rounded,
}

impl LabelBorder {
    /// Whether the border takes horizontal space around the label text.
    pub fn is_drawn(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Where a role label sits relative to its associate's connector line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RolePlacement {
    #[default]
    Above,
    Overlapping,
}

/// Reading direction of the proposition text.
///
/// Determines on which edge of a relation's footprint the vertical spine is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Label styling that influences footprint and label placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylePolicy {
    #[serde(default)]
    label_border: LabelBorder,
    #[serde(default)]
    role_placement: RolePlacement,
}

impl StylePolicy {
    pub fn new(label_border: LabelBorder, role_placement: RolePlacement) -> Self {
        Self {
            label_border,
            role_placement,
        }
    }

    /// Style of the analysis view: boxed labels drawn over the line.
    pub fn boxed() -> Self {
        Self::new(LabelBorder::Box, RolePlacement::Overlapping)
    }

    pub fn label_border(&self) -> LabelBorder {
        self.label_border
    }

    pub fn role_placement(&self) -> RolePlacement {
        self.role_placement
    }
}
