//! Text measurement seam.
//!
//! Fonts are the renderer's business. The layout engine only needs a width for
//! each role label and for propositions without an intrinsic width, so it asks
//! a [`TextMeasure`]. [`MonospaceMeasure`] is the default.

/// Measures the rendered width of a text run, in footprint units.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f32,
{
    fn text_width(&self, text: &str) -> f32 {
        self(text)
    }
}

/// Fixed advance per character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    char_width: f32,
}

impl MonospaceMeasure {
    pub fn new(char_width: f32) -> Self {
        Self { char_width }
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new(7.0)
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_monospace_counts_chars() {
        let measure = MonospaceMeasure::new(2.0);
        assert_approx_eq!(f32, measure.text_width("abc"), 6.0);
        assert_approx_eq!(f32, measure.text_width(""), 0.0);
        // Characters, not bytes.
        assert_approx_eq!(f32, measure.text_width("λόγος"), 10.0);
    }

    #[test]
    fn test_closure_measure() {
        let measure = |text: &str| text.len() as f32 * 0.5;
        assert_approx_eq!(f32, measure.text_width("abcd"), 2.0);
    }
}
