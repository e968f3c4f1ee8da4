// src/core/styled_text.rs

//! Text made of `(substring, style)` runs.
//!
//! Offsets used by every operation are byte offsets into the plain-text
//! projection. They always come from regex matches or `str::find`, so they
//! fall on character boundaries.

use regex::Regex;
use std::fmt;
use std::ops::{Add, Range};

/// An opaque style descriptor, e.g. `"bold bright_white"` or `"grey42"`.
///
/// The descriptor is interpreted only when painting (see `core::color`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Style(String);

impl Style {
    /// Builds a style from a descriptor. Blank descriptors mean "no style".
    pub fn parse(descriptor: &str) -> Option<Self> {
        let trimmed = descriptor.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw descriptor string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Layers `over` on top of this style. Later words win when painted.
    pub fn layered(&self, over: &Self) -> Self {
        if self == over {
            return self.clone();
        }
        Self(format!("{} {}", self.0, over.0))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single run of text sharing one style (or none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    text: String,
    style: Option<Style>,
}

impl Run {
    /// The characters of this run.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The style of this run, if any.
    pub fn style(&self) -> Option<&Style> {
        self.style.as_ref()
    }
}

/// An ordered sequence of styled runs.
///
/// Runs are kept normalized: no empty runs, and adjacent runs with the same
/// style are merged. Two texts compare equal when they have the same plain
/// text and the same style attribution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    runs: Vec<Run>,
}

impl StyledText {
    /// Creates an empty text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a text made of one run.
    pub fn styled(text: impl Into<String>, style: Option<Style>) -> Self {
        let mut out = Self::new();
        out.push_styled(text, style);
        out
    }

    /// Joins `items` with `separator` between each pair.
    pub fn join<I>(separator: &Self, items: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut out = Self::new();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                out.append(separator.clone());
            }
            out.append(item);
        }
        out
    }

    /// The plain-text projection.
    pub fn plain(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Length of the plain text in bytes.
    pub fn len(&self) -> usize {
        self.runs.iter().map(|run| run.text.len()).sum()
    }

    /// True when there is no text at all.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The normalized runs.
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Appends unstyled text.
    pub fn push_str(&mut self, text: &str) {
        self.push_styled(text, None);
    }

    /// Appends a run with the given style.
    pub fn push_styled(&mut self, text: impl Into<String>, style: Option<Style>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.runs.last_mut()
            && last.style == style
        {
            last.text.push_str(&text);
            return;
        }
        self.runs.push(Run { text, style });
    }

    /// Appends another styled text.
    pub fn append(&mut self, other: Self) {
        for run in other.runs {
            self.push_styled(run.text, run.style);
        }
    }

    /// Returns the part of the text covered by `range`.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let mut out = Self::new();
        let mut offset = 0;
        for run in &self.runs {
            let run_end = offset + run.text.len();
            let start = range.start.max(offset);
            let end = range.end.min(run_end);
            if start < end
                && let Some(part) = run.text.get(start - offset..end - offset)
            {
                out.push_styled(part, run.style.clone());
            }
            offset = run_end;
        }
        out
    }

    /// Layers `style` over every run intersecting `range`.
    pub fn stylize(&mut self, range: Range<usize>, style: &Style) {
        if range.start >= range.end {
            return;
        }
        let len = self.len();
        let mut out = self.slice(0..range.start);
        let middle = self.slice(range.start..range.end);
        for run in middle.runs {
            let layered = match &run.style {
                Some(existing) => existing.layered(style),
                None => style.clone(),
            };
            out.push_styled(run.text, Some(layered));
        }
        out.append(self.slice(range.end..len));
        *self = out;
    }

    /// Layers `style` over the whole text.
    pub fn stylize_all(&mut self, style: &Style) {
        let len = self.len();
        self.stylize(0..len, style);
    }

    /// Puts `style` beneath every run, so each run's own style still wins.
    pub fn underlay_all(&mut self, style: &Style) {
        let runs = std::mem::take(&mut self.runs);
        for run in runs {
            let base = match &run.style {
                Some(existing) => style.layered(existing),
                None => style.clone(),
            };
            self.push_styled(run.text, Some(base));
        }
    }

    /// Returns a copy where `range` is replaced by `replacement`.
    pub fn replace_range(&self, range: Range<usize>, replacement: &Self) -> Self {
        let mut out = self.slice(0..range.start);
        out.append(replacement.clone());
        out.append(self.slice(range.end..self.len()));
        out
    }

    /// Splits on every literal occurrence of `separator`, discarding it.
    pub fn split(&self, separator: &str) -> Vec<Self> {
        if separator.is_empty() {
            return vec![self.clone()];
        }
        let plain = self.plain();
        let mut parts = Vec::new();
        let mut start = 0;
        for (index, _) in plain.match_indices(separator) {
            parts.push(self.slice(start..index));
            start = index + separator.len();
        }
        parts.push(self.slice(start..plain.len()));
        parts
    }

    /// Replaces every literal occurrence of `token` with `replacement`.
    pub fn replace_all(&self, token: &str, replacement: &Self) -> Self {
        Self::join(replacement, self.split(token))
    }

    /// Removes every literal occurrence of `token`.
    pub fn remove_all(&self, token: &str) -> Self {
        self.replace_all(token, &Self::new())
    }

    /// Finds the first match of `pattern` in the plain projection.
    pub fn find(&self, pattern: &Regex) -> Option<Range<usize>> {
        pattern.find(&self.plain()).map(|m| m.range())
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::styled(text, None)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        Self::styled(text, None)
    }
}

impl Add for StyledText {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.append(rhs);
        self
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(s: &str) -> Style {
        Style::parse(s).unwrap()
    }

    #[test]
    fn test_blank_descriptor_is_no_style() {
        assert!(Style::parse("   ").is_none());
        assert_eq!(Style::parse(" bold ").unwrap().as_str(), "bold");
    }

    #[test]
    fn test_adjacent_runs_with_same_style_merge() {
        let mut text = StyledText::from("an ");
        text.push_str("example");
        assert_eq!(text.runs().len(), 1);
        assert_eq!(text, StyledText::from("an example"));
    }

    #[test]
    fn test_slice_across_runs() {
        let text = StyledText::from("ab") + StyledText::styled("cd", Some(style("bold")));
        let sliced = text.slice(1..3);
        assert_eq!(sliced.plain(), "bc");
        assert_eq!(sliced.runs().len(), 2);
        assert_eq!(sliced.runs()[1].style(), Some(&style("bold")));
    }

    #[test]
    fn test_stylize_layers_over_existing_style() {
        let mut text = StyledText::styled("bold words", Some(style("bold")));
        text.stylize(5..10, &style("italic"));

        assert_eq!(text.plain(), "bold words");
        assert_eq!(text.runs().len(), 2);
        assert_eq!(text.runs()[0].style(), Some(&style("bold")));
        assert_eq!(text.runs()[1].style(), Some(&style("bold italic")));
    }

    #[test]
    fn test_underlay_keeps_run_styles_on_top() {
        let mut text = StyledText::from("see ") + StyledText::styled("this", Some(style("italic")));
        text.underlay_all(&style("grey42"));

        assert_eq!(text.runs()[0].style(), Some(&style("grey42")));
        assert_eq!(text.runs()[1].style(), Some(&style("grey42 italic")));
    }

    #[test]
    fn test_split_discards_separator() {
        let text = StyledText::from("{bc}an {bc}example{bc}");
        let parts: Vec<String> = text.split("{bc}").iter().map(StyledText::plain).collect();
        assert_eq!(parts, vec!["", "an ", "example", ""]);
    }

    #[test]
    fn test_remove_all_keeps_styles_of_remaining_text() {
        let mut text = StyledText::from("an {rdquo}example");
        text.stylize(10..17, &style("cyan"));
        let removed = text.remove_all("{rdquo}");

        assert_eq!(removed.plain(), "an example");
        assert_eq!(removed.runs()[1].text(), "example");
        assert_eq!(removed.runs()[1].style(), Some(&style("cyan")));
    }

    #[test]
    fn test_replace_range() {
        let text = StyledText::from("a {bc} b");
        let replaced = text.replace_range(2..6, &StyledText::styled(":", Some(style("bold"))));
        assert_eq!(replaced.plain(), "a : b");
        assert_eq!(replaced.runs().len(), 3);
    }

    #[test]
    fn test_join_and_find() {
        let joined = StyledText::join(
            &StyledText::from(", "),
            vec![StyledText::from("one"), StyledText::from("two")],
        );
        assert_eq!(joined.plain(), "one, two");

        let re = Regex::new("two").unwrap();
        assert_eq!(joined.find(&re), Some(5..8));
        assert!(StyledText::new().is_empty());
    }
}
