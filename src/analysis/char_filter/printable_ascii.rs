//! Printable ASCII char filter.

use super::CharFilter;

/// A char filter that keeps only code points in `32..=127`.
///
/// Every other character (control characters, tabs, newlines, anything
/// non-ASCII) becomes exactly one space, so token boundaries survive.
#[derive(Clone, Debug, Default)]
pub struct PrintableAsciiCharFilter;

impl PrintableAsciiCharFilter {
    /// Create a new printable ASCII char filter.
    pub fn new() -> Self {
        PrintableAsciiCharFilter
    }

    #[inline]
    fn is_kept(c: char) -> bool {
        let code = c as u32;
        code > 31 && code < 128
    }
}

impl CharFilter for PrintableAsciiCharFilter {
    fn filter(&self, input: &str) -> String {
        input
            .chars()
            .map(|c| if Self::is_kept(c) { c } else { ' ' })
            .collect()
    }

    fn name(&self) -> &'static str {
        "printable_ascii"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_control_and_non_ascii() {
        let filter = PrintableAsciiCharFilter::new();
        assert_eq!(filter.filter("a\tb\nc"), "a b c");
        assert_eq!(filter.filter("naïve"), "na ve");
        assert_eq!(filter.filter("\u{0}\u{1f}x"), "  x");
    }

    #[test]
    fn test_keeps_printable_range_and_del() {
        let filter = PrintableAsciiCharFilter::new();
        let printable: String = (32u8..=127).map(char::from).collect();
        assert_eq!(filter.filter(&printable), printable);
    }

    #[test]
    fn test_one_space_per_multibyte_char() {
        let filter = PrintableAsciiCharFilter::new();
        assert_eq!(filter.filter("😀😀"), "  ");
    }
}
