//! Horizontal space each node needs.

use pericope_core::{semantic::Proposition, style::LabelBorder};

use crate::text::TextMeasure;

/// Computes footprint widths from label text and layout constants.
pub(super) struct FootprintCalculator<'m> {
    margin: f32,
    selection_control_width: f32,
    label_padding: f32,
    label_border: LabelBorder,
    measure: &'m dyn TextMeasure,
}

impl<'m> FootprintCalculator<'m> {
    pub(super) fn new(
        margin: f32,
        selection_control_width: f32,
        label_padding: f32,
        label_border: LabelBorder,
        measure: &'m dyn TextMeasure,
    ) -> Self {
        Self {
            margin,
            selection_control_width,
            label_padding,
            label_border,
            measure,
        }
    }

    /// Width of one rendered role label, including its border padding.
    ///
    /// Empty labels are not drawn and take no space.
    pub(super) fn label_width(&self, label: &str) -> f32 {
        if label.is_empty() {
            return 0.0;
        }

        let padding = if self.label_border.is_drawn() {
            2.0 * self.label_padding
        } else {
            0.0
        };
        self.measure.text_width(label) + padding
    }

    /// Intrinsic width of a proposition cell, measured from its text when the
    /// host did not supply one.
    pub(super) fn leaf(&self, proposition: &Proposition) -> f32 {
        proposition
            .width()
            .unwrap_or_else(|| self.measure.text_width(proposition.text()))
    }

    /// Widest label, plus the selection control for roots, plus the margin.
    ///
    /// Labels of a folded relation are hidden and take no space.
    pub(super) fn relation(&self, labels: &[String], is_root: bool, folded: bool) -> f32 {
        let label_width = if folded {
            0.0
        } else {
            labels
                .iter()
                .map(|label| self.label_width(label))
                .fold(0.0, f32::max)
        };

        let control_width = if is_root {
            self.selection_control_width
        } else {
            0.0
        };

        label_width + control_width + self.margin
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use pericope_core::identifier::Id;

    use super::*;
    use crate::text::MonospaceMeasure;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_nested_relation_uses_widest_label() {
        let measure = MonospaceMeasure::new(1.0);
        let calculator = FootprintCalculator::new(4.0, 10.0, 2.0, LabelBorder::None, &measure);

        let width = calculator.relation(&labels(&["Head", "Modifier"]), false, false);
        assert_approx_eq!(f32, width, 8.0 + 4.0);
    }

    #[test]
    fn test_root_adds_selection_control() {
        let measure = MonospaceMeasure::new(1.0);
        let calculator = FootprintCalculator::new(4.0, 10.0, 2.0, LabelBorder::None, &measure);

        let width = calculator.relation(&labels(&["Head", "Mod"]), true, false);
        assert_approx_eq!(f32, width, 4.0 + 10.0 + 4.0);
    }

    #[test]
    fn test_border_adds_padding() {
        let measure = MonospaceMeasure::new(1.0);
        let calculator = FootprintCalculator::new(0.0, 0.0, 3.0, LabelBorder::Box, &measure);

        assert_approx_eq!(f32, calculator.label_width("Cause"), 5.0 + 6.0);
        assert_approx_eq!(f32, calculator.label_width(""), 0.0);
    }

    #[test]
    fn test_folded_relation_omits_labels() {
        let measure = MonospaceMeasure::new(1.0);
        let calculator = FootprintCalculator::new(4.0, 10.0, 2.0, LabelBorder::Rounded, &measure);

        let folded = calculator.relation(&labels(&["Very long label"]), true, true);
        assert_approx_eq!(f32, folded, 10.0 + 4.0);

        let nested_folded = calculator.relation(&labels(&["Very long label"]), false, true);
        assert_approx_eq!(f32, nested_folded, 4.0);
    }

    #[test]
    fn test_relation_without_labels() {
        let measure = MonospaceMeasure::new(1.0);
        let calculator = FootprintCalculator::new(4.0, 10.0, 2.0, LabelBorder::None, &measure);

        assert_approx_eq!(f32, calculator.relation(&labels(&["", ""]), false, false), 4.0);
    }

    #[test]
    fn test_leaf_width_prefers_intrinsic() {
        let measure = MonospaceMeasure::new(2.0);
        let calculator = FootprintCalculator::new(0.0, 0.0, 0.0, LabelBorder::None, &measure);

        let measured = Proposition::new(Id::new("p0"), "four");
        let fixed = Proposition::new(Id::new("p1"), "four").with_width(99.0);

        assert_approx_eq!(f32, calculator.leaf(&measured), 8.0);
        assert_approx_eq!(f32, calculator.leaf(&fixed), 99.0);
    }
}
