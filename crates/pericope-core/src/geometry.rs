//! Geometric primitives for connector layout.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in a relation's local space
//! - [`Size`] - Width and height dimensions
//! - [`GridSpan`] - A closed interval on the one-dimensional grid line
//!
//! # Coordinate System
//!
//! The vertical axis is the *grid line*: leaf proposition `i` occupies the cell
//! `[i, i + 1]` and connects at its center `i + 0.5`. Vertical output values are
//! grid offsets multiplied by the renderer's scale, measured from the top edge of
//! the node. The horizontal axis is measured in footprint units from the node's
//! left edge:
//!
//! ```text
//!   (0,0) ────────► +X  (footprint units)
//!     │
//!     │
//!     ▼
//!    +Y  (grid units × scale)
//! ```

use serde::{Deserialize, Serialize};

/// A 2D point in a node's local coordinate space.
///
/// # Examples
///
/// ```
/// # use pericope_core::geometry::Point;
/// let p = Point::new(4.0, 1.5).with_y(2.5);
/// assert_eq!(p.x(), 4.0);
/// assert_eq!(p.y(), 2.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }
}

/// Width and height of an element, such as the root selection control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Checks that neither dimension is negative or non-finite.
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Closed interval `[first, last]` on the grid line.
///
/// A leaf spans the single point `[connect_y, connect_y]`; a relation spans from
/// its first leaf's center to its last leaf's center.
///
/// # Examples
///
/// ```
/// # use pericope_core::geometry::GridSpan;
/// let outer = GridSpan::new(0.5, 4.5);
/// let inner = GridSpan::new(1.5, 2.5);
/// let other = GridSpan::new(3.5, 6.5);
///
/// assert!(outer.contains_span(inner));
/// assert!(inner.is_disjoint(other));
/// assert!(outer.crosses(other));
/// assert_eq!(outer.grid_height(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSpan {
    first: f32,
    last: f32,
}

impl GridSpan {
    /// Creates a span; `first` must not exceed `last`.
    pub fn new(first: f32, last: f32) -> Self {
        debug_assert!(first <= last, "GridSpan start {first} exceeds end {last}");
        Self { first, last }
    }

    /// Creates a degenerate span covering a single grid coordinate.
    pub fn point(y: f32) -> Self {
        Self { first: y, last: y }
    }

    pub fn first(self) -> f32 {
        self.first
    }

    pub fn last(self) -> f32 {
        self.last
    }

    /// Number of leaf rows covered: `last - first + 1`.
    pub fn grid_height(self) -> f32 {
        self.last - self.first + 1.0
    }

    /// Top edge of the covered cells, half a row above the first center.
    pub fn top(self) -> f32 {
        self.first - 0.5
    }

    /// Returns the smallest span covering both spans.
    pub fn union(self, other: GridSpan) -> Self {
        Self {
            first: self.first.min(other.first),
            last: self.last.max(other.last),
        }
    }

    pub fn contains(self, y: f32) -> bool {
        self.first <= y && y <= self.last
    }

    pub fn contains_span(self, other: GridSpan) -> bool {
        self.first <= other.first && other.last <= self.last
    }

    pub fn is_disjoint(self, other: GridSpan) -> bool {
        self.last < other.first || other.last < self.first
    }

    /// True when the spans overlap without one containing the other.
    pub fn crosses(self, other: GridSpan) -> bool {
        !self.is_disjoint(other) && !self.contains_span(other) && !other.contains_span(self)
    }
}
