//! In-window free-text search with reversible highlighting.
//!
//! Highlighting operates on display lines, never on the window itself. Each
//! line caches its pristine text once, so clearing a search restores
//! byte-identical content no matter how many searches ran in between.

use regex::{Regex, RegexBuilder};

/// Inverse-video markers wrapped around each match in a highlighted line.
pub const MARK_START: &str = "\x1b[7m";
pub const MARK_END: &str = "\x1b[27m";

/// How many lines may carry highlight markup at once. Lines past the cap
/// still count as matches and stay visible; they just render unmarked.
pub const DEFAULT_HIGHLIGHT_CAP: usize = 200;

// ---------------------------------------------------------------------------
// DisplayLine
// ---------------------------------------------------------------------------

/// One rendered record row: the pristine text plus whatever is currently
/// on display (pristine or highlighted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pristine: String,
    current: String,
}

impl DisplayLine {
    #[must_use]
    pub fn new(text: String) -> Self {
        Self {
            current: text.clone(),
            pristine: text,
        }
    }

    /// What the UI should render right now.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.current
    }

    /// The unmodified content this line started with.
    #[must_use]
    pub fn pristine(&self) -> &str {
        &self.pristine
    }

    fn restore(&mut self) {
        if self.current != self.pristine {
            self.current = self.pristine.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// SearchMatches
// ---------------------------------------------------------------------------

/// Outcome of one search pass over the display lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchMatches {
    /// The raw (unescaped) search text this outcome belongs to.
    pub query: String,
    /// Indices of matching lines, in display order. Includes matches past
    /// the highlight cap.
    pub matching: Vec<usize>,
    /// How many lines actually received markup (bounded by the cap).
    pub highlighted: usize,
}

impl SearchMatches {
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.matching.len()
    }
}

// ---------------------------------------------------------------------------
// SearchHighlighter
// ---------------------------------------------------------------------------

/// Case-insensitive substring search over display lines.
#[derive(Debug, Clone, Copy)]
pub struct SearchHighlighter {
    highlight_cap: usize,
}

impl Default for SearchHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchHighlighter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            highlight_cap: DEFAULT_HIGHLIGHT_CAP,
        }
    }

    #[must_use]
    pub fn with_cap(highlight_cap: usize) -> Self {
        Self { highlight_cap }
    }

    /// Run a search, highlighting matches in place.
    ///
    /// Every line is restored to pristine first, so re-running a search (or
    /// running a different one) starts from clean content, and applying
    /// the same search twice produces the same display. Empty search text is
    /// equivalent to [`clear`](Self::clear).
    pub fn apply(&self, lines: &mut [DisplayLine], text: &str) -> SearchMatches {
        self.clear(lines);
        if text.is_empty() {
            return SearchMatches::default();
        }

        let Some(pattern) = build_pattern(text) else {
            // Escaped input only fails compilation at absurd lengths; treat
            // it as matching nothing rather than surfacing an error.
            tracing::debug!(len = text.len(), "search pattern failed to compile");
            return SearchMatches {
                query: text.to_owned(),
                ..SearchMatches::default()
            };
        };

        let mut matching = Vec::new();
        let mut highlighted = 0usize;
        for (index, line) in lines.iter_mut().enumerate() {
            if !pattern.is_match(&line.pristine) {
                continue;
            }
            matching.push(index);
            if highlighted < self.highlight_cap {
                line.current = pattern
                    .replace_all(&line.pristine, |caps: &regex::Captures<'_>| {
                        format!("{MARK_START}{}{MARK_END}", &caps[0])
                    })
                    .into_owned();
                highlighted += 1;
            }
        }

        SearchMatches {
            query: text.to_owned(),
            matching,
            highlighted,
        }
    }

    /// Restore every line to its pristine content.
    pub fn clear(&self, lines: &mut [DisplayLine]) {
        for line in lines.iter_mut() {
            line.restore();
        }
    }
}

/// Escape the raw text and compile a case-insensitive literal matcher.
fn build_pattern(text: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(text))
        .case_insensitive(true)
        .build()
        .ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<DisplayLine> {
        texts
            .iter()
            .map(|t| DisplayLine::new((*t).to_owned()))
            .collect()
    }

    #[test]
    fn finds_case_insensitive_matches() {
        let mut display = lines(&["Connection refused", "Starting scan", "REFUSED again"]);
        let outcome = SearchHighlighter::new().apply(&mut display, "refused");
        assert_eq!(outcome.matching, vec![0, 2]);
        assert_eq!(outcome.match_count(), 2);
        assert_eq!(outcome.highlighted, 2);
    }

    #[test]
    fn highlights_wrap_each_occurrence() {
        let mut display = lines(&["error then error"]);
        SearchHighlighter::new().apply(&mut display, "error");
        assert_eq!(
            display[0].text(),
            format!("{MARK_START}error{MARK_END} then {MARK_START}error{MARK_END}")
        );
        assert_eq!(display[0].pristine(), "error then error");
    }

    #[test]
    fn clear_restores_byte_identical_content() {
        let originals = ["Connection refused", "Starting scan"];
        let mut display = lines(&originals);
        let highlighter = SearchHighlighter::new();
        highlighter.apply(&mut display, "c");
        highlighter.clear(&mut display);
        for (line, original) in display.iter().zip(originals) {
            assert_eq!(line.text(), original);
        }
    }

    #[test]
    fn apply_is_idempotent() {
        let mut display = lines(&["error here"]);
        let highlighter = SearchHighlighter::new();
        highlighter.apply(&mut display, "error");
        let once = display[0].text().to_owned();
        highlighter.apply(&mut display, "error");
        assert_eq!(display[0].text(), once);
    }

    #[test]
    fn switching_searches_starts_from_pristine() {
        let mut display = lines(&["warning and error"]);
        let highlighter = SearchHighlighter::new();
        highlighter.apply(&mut display, "warning");
        highlighter.apply(&mut display, "error");
        assert_eq!(
            display[0].text(),
            format!("warning and {MARK_START}error{MARK_END}")
        );
    }

    #[test]
    fn empty_search_clears_markup() {
        let mut display = lines(&["error"]);
        let highlighter = SearchHighlighter::new();
        highlighter.apply(&mut display, "error");
        let outcome = highlighter.apply(&mut display, "");
        assert_eq!(outcome.match_count(), 0);
        assert_eq!(display[0].text(), "error");
    }

    #[test]
    fn regex_metacharacters_match_literally() {
        let mut display = lines(&["path (old) [v1.2]", "path old v12"]);
        let outcome = SearchHighlighter::new().apply(&mut display, "(old) [v1.2]");
        assert_eq!(outcome.matching, vec![0]);
    }

    #[test]
    fn cap_bounds_markup_but_not_match_count() {
        let texts: Vec<String> = (0..10).map(|i| format!("error {i}")).collect();
        let mut display: Vec<DisplayLine> =
            texts.iter().map(|t| DisplayLine::new(t.clone())).collect();
        let outcome = SearchHighlighter::with_cap(3).apply(&mut display, "error");
        assert_eq!(outcome.match_count(), 10);
        assert_eq!(outcome.highlighted, 3);
        assert!(display[2].text().contains(MARK_START));
        assert_eq!(display[3].text(), "error 3");
    }

    #[test]
    fn no_matches_leaves_lines_untouched() {
        let mut display = lines(&["Starting scan"]);
        let outcome = SearchHighlighter::new().apply(&mut display, "zzz");
        assert!(outcome.matching.is_empty());
        assert_eq!(display[0].text(), "Starting scan");
    }
}
