//! Single-pass literal replacement for token aliases.

/// A set of literal replacements applied in one left-to-right pass.
///
/// At every position the longest matching source string wins, and replaced
/// text is never scanned again, so `{A}->{B}` and `{B}->{A}` swap cleanly
/// instead of chaining.
///
/// # Example
///
/// ```
/// use bbforge_templates::Replacements;
///
/// let mut replacements = Replacements::new();
/// replacements.add("{WIDTH}", "{NUMBER1}");
/// replacements.add("{HEIGHT}", "{NUMBER2}");
///
/// assert_eq!(
///     replacements.apply("<embed width=\"{WIDTH}\" height=\"{HEIGHT}\"/>"),
///     "<embed width=\"{NUMBER1}\" height=\"{NUMBER2}\"/>"
/// );
/// ```
#[derive(Debug, Default, Clone)]
pub struct Replacements {
    items: Vec<(String, String)>,
}

impl Replacements {
    /// Create a new empty replacement set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a replacement set from `(from, to)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut replacements = Self::new();
        for (from, to) in pairs {
            replacements.add(*from, *to);
        }
        replacements
    }

    /// Register a replacement. Empty sources are ignored.
    pub fn add(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        if from.is_empty() {
            return;
        }
        self.items.push((from, to.into()));
        // Longest source first so the first hit at a position is the longest
        self.items.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Apply all replacements to `input`.
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        if self.items.is_empty() {
            return input.to_owned();
        }

        let mut output = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(c) = rest.chars().next() {
            match self.items.iter().find(|(from, _)| rest.starts_with(from.as_str())) {
                Some((from, to)) => {
                    output.push_str(to);
                    rest = &rest[from.len()..];
                }
                None => {
                    output.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        output
    }

    /// Check if there are any replacements registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of registered replacements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
