//! Connector segments and decorations for one relation.
//!
//! Emission runs after every other stage and only reads resolved geometry. All
//! positions are local to the relation: `x` runs from the left edge of its
//! column and `y` runs down from the top edge of its first grid cell, scaled by
//! the renderer's pixels per grid unit. Horizontal lines leave the footprint
//! and end at the column edge of their associate, which may be negative for
//! right-to-left text.

use serde::Serialize;

use pericope_core::{
    geometry::{GridSpan, Point, Size},
    style::{RolePlacement, StylePolicy, TextDirection},
};

/// Orientation of a connector segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentKind {
    Horizontal,
    Vertical,
}

/// A straight line the renderer draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectorSegment {
    kind: SegmentKind,
    from: Point,
    to: Point,
}

impl ConnectorSegment {
    fn horizontal(y: f32, from_x: f32, to_x: f32) -> Self {
        Self {
            kind: SegmentKind::Horizontal,
            from: Point::new(from_x, y),
            to: Point::new(to_x, y),
        }
    }

    fn vertical(x: f32, top: f32, bottom: f32) -> Self {
        Self {
            kind: SegmentKind::Vertical,
            from: Point::new(x, top),
            to: Point::new(x, bottom),
        }
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn from(&self) -> Point {
        self.from
    }

    pub fn to(&self) -> Point {
        self.to
    }
}

/// A role label with its top-left position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPlacement {
    associate: usize,
    text: String,
    position: Point,
    width: f32,
}

impl LabelPlacement {
    /// Position of the labeled associate within its relation.
    pub fn associate(&self) -> usize {
        self.associate
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

/// Top-left position and size of a root relation's selection control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionControl {
    position: Point,
    size: Size,
}

impl SelectionControl {
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

/// Everything the renderer draws for one relation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Connectors {
    segments: Vec<ConnectorSegment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    labels: Vec<LabelPlacement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selection_control: Option<SelectionControl>,
}

impl Connectors {
    /// Horizontal segments in associate order, then the vertical spine.
    pub fn segments(&self) -> &[ConnectorSegment] {
        &self.segments
    }

    pub fn labels(&self) -> &[LabelPlacement] {
        &self.labels
    }

    /// Present only for forest roots.
    pub fn selection_control(&self) -> Option<SelectionControl> {
        self.selection_control
    }
}

/// One associate as the emitter draws it.
#[derive(Debug, Clone, Copy)]
pub(super) struct AssociateLine {
    pub(super) connect_y: f32,
    /// Local `x` of the associate's column edge that faces this relation.
    pub(super) reach: f32,
}

/// Resolved geometry of a single relation, as the emitter consumes it.
pub(super) struct RelationGeometry<'g> {
    pub(super) span: GridSpan,
    pub(super) connect_y: f32,
    pub(super) width: f32,
    pub(super) is_root: bool,
    pub(super) associates: &'g [AssociateLine],
    /// Rendered labels with their widths; `None` when the relation is folded.
    pub(super) labels: Option<&'g [(String, f32)]>,
}

/// Turns resolved geometry into drawable connectors.
pub(super) struct ConnectorEmitter {
    pixels_per_grid_unit: f32,
    direction: TextDirection,
    style: StylePolicy,
    selection_control: Size,
    label_height: f32,
}

impl ConnectorEmitter {
    pub(super) fn new(
        pixels_per_grid_unit: f32,
        direction: TextDirection,
        style: StylePolicy,
        selection_control: Size,
        label_height: f32,
    ) -> Self {
        Self {
            pixels_per_grid_unit,
            direction,
            style,
            selection_control,
            label_height,
        }
    }

    /// Vertical offset of a grid coordinate from the relation's top edge.
    fn offset(&self, span: GridSpan, y: f32) -> f32 {
        (y - span.top()) * self.pixels_per_grid_unit
    }

    pub(super) fn emit(&self, geometry: &RelationGeometry) -> Connectors {
        let RelationGeometry {
            span,
            connect_y,
            width,
            is_root,
            associates,
            labels,
        } = *geometry;

        let line_ys: Vec<f32> = associates
            .iter()
            .map(|line| self.offset(span, line.connect_y))
            .collect();

        let mut segments: Vec<ConnectorSegment> = associates
            .iter()
            .zip(&line_ys)
            .map(|(line, &y)| match self.direction {
                TextDirection::LeftToRight => ConnectorSegment::horizontal(y, 0.0, line.reach),
                TextDirection::RightToLeft => ConnectorSegment::horizontal(y, line.reach, width),
            })
            .collect();

        let top = line_ys.iter().copied().fold(f32::INFINITY, f32::min);
        let bottom = line_ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if top <= bottom {
            let spine_x = match self.direction {
                TextDirection::LeftToRight => 0.0,
                TextDirection::RightToLeft => width,
            };
            segments.push(ConnectorSegment::vertical(spine_x, top, bottom));
        }

        let control_width = if is_root {
            self.selection_control.width()
        } else {
            0.0
        };

        let selection_control = is_root.then(|| {
            let x = match self.direction {
                TextDirection::LeftToRight => 0.0,
                TextDirection::RightToLeft => width - control_width,
            };
            let y = self.offset(span, connect_y) - self.selection_control.height() / 2.0;
            SelectionControl {
                position: Point::new(x, y),
                size: self.selection_control,
            }
        });

        let labels = labels
            .map(|labels| self.place_labels(labels, &line_ys, width, control_width))
            .unwrap_or_default();

        Connectors {
            segments,
            labels,
            selection_control,
        }
    }

    /// Center each non-empty label in the part of the footprint left of or
    /// right of the selection control, on or above its associate's line.
    fn place_labels(
        &self,
        labels: &[(String, f32)],
        line_ys: &[f32],
        width: f32,
        control_width: f32,
    ) -> Vec<LabelPlacement> {
        let (region_start, region_width) = match self.direction {
            TextDirection::LeftToRight => (control_width, width - control_width),
            TextDirection::RightToLeft => (0.0, width - control_width),
        };

        labels
            .iter()
            .zip(line_ys)
            .enumerate()
            .filter(|(_, ((text, _), _))| !text.is_empty())
            .map(|(associate, ((text, label_width), &line_y))| {
                let x = region_start + (region_width - label_width) / 2.0;
                let y = match self.style.role_placement() {
                    RolePlacement::Above => line_y - self.label_height,
                    RolePlacement::Overlapping => line_y - self.label_height / 2.0,
                };
                LabelPlacement {
                    associate,
                    text: text.clone(),
                    position: Point::new(x, y),
                    width: *label_width,
                }
            })
            .collect()
    }
}
