//! Pericope - connector layout for nested relations over a proposition sequence.
//!
//! A text is split into an ordered sequence of propositions. Analysts group
//! adjacent propositions into labeled relations, and relations into larger
//! relations, forming a forest. This crate computes where every relation's
//! bracket-like connector goes: its vertical span, the point at which it
//! attaches to its parent, its horizontal column and the role labels drawn on
//! each branch.

pub mod config;
pub mod layout;
pub mod text;

mod error;
mod structure;

pub use pericope_core::{geometry, identifier, semantic, style};

pub use error::PericopeError;
pub use structure::StructureError;

use std::{collections::BTreeSet, rc::Rc};

use log::{debug, info, trace};

use pericope_core::style::TextDirection;

use config::AppConfig;
use layout::{EngineBuilder, Layout};
use text::{MonospaceMeasure, TextMeasure};

/// Per-pass view options supplied by the renderer.
///
/// Anything left unset falls back to the [`AppConfig`] the
/// [`LayoutBuilder`] was created with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    folded_depths: BTreeSet<usize>,
    direction: Option<TextDirection>,
    pixels_per_grid_unit: Option<f32>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide role labels on relations at `depth`.
    pub fn with_folded_depth(mut self, depth: usize) -> Self {
        self.folded_depths.insert(depth);
        self
    }

    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_pixels_per_grid_unit(mut self, scale: f32) -> Self {
        self.pixels_per_grid_unit = Some(scale);
        self
    }

    pub fn folded_depths(&self) -> &BTreeSet<usize> {
        &self.folded_depths
    }

    pub fn direction(&self) -> Option<TextDirection> {
        self.direction
    }

    pub fn pixels_per_grid_unit(&self) -> Option<f32> {
        self.pixels_per_grid_unit
    }
}

/// Builder for loading snapshots and laying them out.
///
/// # Examples
///
/// ```
/// use pericope::{LayoutBuilder, ViewState, identifier::Id};
///
/// let source = r#"
///     [[propositions]]
///     id = "p0"
///     text = "The rain fell"
///
///     [[propositions]]
///     id = "p1"
///     text = "so the river rose"
///
///     [[relations]]
///     id = "r"
///     associates = [
///         { node = "p0", role = "Cause" },
///         { node = "p1", role = "Effect", high_weight = true },
///     ]
/// "#;
///
/// let builder = LayoutBuilder::default();
/// let snapshot = builder.parse(source).expect("valid snapshot");
/// let layout = builder
///     .layout(&snapshot, &ViewState::new().with_pixels_per_grid_unit(1.0))
///     .expect("valid layout");
///
/// let relation = layout.node(Id::new("r")).expect("relation is laid out");
/// assert_eq!(relation.connect_y(), 1.5);
///
/// let exported = builder.render_toml(&layout).expect("serializable layout");
/// assert!(exported.contains("[relations.r"));
/// ```
#[derive(Default)]
pub struct LayoutBuilder {
    config: AppConfig,
    measure: Option<Rc<dyn TextMeasure>>,
}

impl LayoutBuilder {
    /// Create a new layout builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            measure: None,
        }
    }

    /// Use `measure` instead of a monospace measure derived from the config.
    pub fn with_measure(mut self, measure: Rc<dyn TextMeasure>) -> Self {
        self.measure = Some(measure);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a TOML snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PericopeError::Snapshot`] with the source span of the
    /// offending input when the text is not a valid snapshot document.
    pub fn parse(&self, source: &str) -> Result<semantic::Snapshot, PericopeError> {
        info!("Parsing snapshot");

        let snapshot: semantic::Snapshot = toml::from_str(source).map_err(|err| {
            PericopeError::new_snapshot_error(err.message(), err.span(), source)
        })?;

        debug!(
            propositions = snapshot.propositions().len(),
            relations = snapshot.relations().len();
            "Snapshot parsed successfully"
        );
        trace!(snapshot:?; "Parsed snapshot");

        Ok(snapshot)
    }

    /// Run a layout pass over `snapshot` with the given view options.
    ///
    /// # Errors
    ///
    /// Returns [`PericopeError::Config`] for an unusable configuration,
    /// [`PericopeError::Structure`] for a malformed relation forest and
    /// [`PericopeError::Layout`] for invalid view options.
    pub fn layout(
        &self,
        snapshot: &semantic::Snapshot,
        view: &ViewState,
    ) -> Result<Layout, PericopeError> {
        let layout_config = self.config.layout();
        layout_config.validate().map_err(PericopeError::Config)?;

        let measure = self.measure.clone().unwrap_or_else(|| {
            Rc::new(MonospaceMeasure::new(layout_config.char_width())) as Rc<dyn TextMeasure>
        });

        let engine = EngineBuilder::new()
            .with_margin(layout_config.margin())
            .with_selection_control(layout_config.selection_control())
            .with_label_padding(layout_config.label_padding())
            .with_label_height(layout_config.label_height())
            .with_pixels_per_grid_unit(
                view.pixels_per_grid_unit
                    .unwrap_or_else(|| layout_config.pixels_per_grid_unit()),
            )
            .with_direction(
                view.direction
                    .unwrap_or_else(|| self.config.style().direction()),
            )
            .with_style(self.config.style().policy())
            .with_folded_depths(view.folded_depths.iter().copied())
            .with_measure(measure);
        debug!(engine:?; "Layout engine configured");

        engine.build(snapshot)
    }

    /// Serialize a layout to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`PericopeError::Export`] if the layout cannot be represented.
    pub fn render_toml(&self, layout: &Layout) -> Result<String, PericopeError> {
        let rendered =
            toml::to_string(layout).map_err(|err| PericopeError::Export(err.to_string()))?;
        info!(bytes = rendered.len(); "Layout exported");
        Ok(rendered)
    }
}
