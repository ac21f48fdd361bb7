//! Disambiguation of repeated role labels within one relation.

/// Number runs of identical neighbouring labels.
///
/// Each maximal run of two or more equal, non-empty labels gets a 1-based
/// counter appended to every member in order. Labels that repeat only at a
/// distance are left alone, as are empty labels.
///
/// # Examples
///
/// ```
/// use pericope::layout::deduplicate_labels;
///
/// assert_eq!(deduplicate_labels(&["X", "X"]), vec!["X1", "X2"]);
/// assert_eq!(
///     deduplicate_labels(&["Subject", "Object", "Subject"]),
///     vec!["Subject", "Object", "Subject"],
/// );
/// ```
pub fn deduplicate_labels<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let mut result = Vec::with_capacity(labels.len());
    let mut start = 0;

    while start < labels.len() {
        let label: &str = labels[start].as_ref();
        let run = labels[start..]
            .iter()
            .take_while(|other| {
                let other: &str = other.as_ref();
                other == label
            })
            .count();

        if run > 1 && !label.is_empty() {
            result.extend((1..=run).map(|counter| format!("{label}{counter}")));
        } else {
            result.extend(std::iter::repeat_n(label.to_string(), run));
        }

        start += run;
    }

    result
}
