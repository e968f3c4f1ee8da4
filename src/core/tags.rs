// src/core/tags.rs

//! The ordered table of markup tags understood by the transformer.
//!
//! Order matters: paired tags are resolved before solo tokens, and the
//! structured and cross-reference tokens come after them so that a token
//! nested inside `{it}…{/it}` is already unwrapped when it is expanded.

use crate::core::styled_text::Style;
use crate::models::StyleSheet;

/// How a tag is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `{name}…{/name}`: style the span, drop both tokens.
    Paired,
    /// Like `Paired`, but the tokens become literal brackets.
    Bracketing {
        open: &'static str,
        close: &'static str,
    },
    /// `{name}` replaced by a fixed literal.
    Solo { replacement: &'static str },
    /// `{ds|vd|num|letter|paren}` date-sense token.
    Structured,
    /// `{name|f0|f1|…}` replaced by the payload field at `field`.
    CrossReference { field: usize },
    /// Closes up line breaks left around parentheses by run-ins.
    RunIn,
}

/// One row of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpec {
    pub name: &'static str,
    pub kind: TagKind,
    /// Key into `style.tags`. `None` means the result is never styled.
    pub style_key: Option<&'static str>,
}

impl TagSpec {
    const fn paired(name: &'static str, style_key: &'static str) -> Self {
        Self {
            name,
            kind: TagKind::Paired,
            style_key: Some(style_key),
        }
    }

    const fn solo(name: &'static str, replacement: &'static str, style_key: &'static str) -> Self {
        Self {
            name,
            kind: TagKind::Solo { replacement },
            style_key: Some(style_key),
        }
    }

    const fn cross_reference(name: &'static str, field: usize) -> Self {
        Self {
            name,
            kind: TagKind::CrossReference { field },
            style_key: Some("cross_reference"),
        }
    }

    /// The literal opening token, e.g. `{it}`.
    pub fn open_token(&self) -> String {
        format!("{{{}}}", self.name)
    }

    /// The literal closing token, e.g. `{/it}`.
    pub fn close_token(&self) -> String {
        format!("{{/{}}}", self.name)
    }

    /// Resolves this tag's style from the configured style sheet.
    pub fn style(&self, styles: &StyleSheet) -> Option<Style> {
        self.style_key.and_then(|key| styles.tag(key))
    }
}

/// Every handled tag, in processing order.
pub static TAG_REGISTRY: &[TagSpec] = &[
    // Paired formatting tokens
    TagSpec::paired("b", "bold"),
    TagSpec::paired("it", "italic"),
    TagSpec::paired("sc", "small_caps"),
    TagSpec::paired("inf", "subscript"),
    TagSpec::paired("sup", "superscript"),
    TagSpec {
        name: "gloss",
        kind: TagKind::Bracketing {
            open: "[",
            close: "]",
        },
        style_key: Some("glossary"),
    },
    TagSpec::paired("parahw", "paragraph_word"),
    TagSpec::paired("phrase", "phrase"),
    TagSpec::paired("qword", "quote_word"),
    TagSpec::paired("wi", "run_in_word"),
    // Solo substitution tokens
    TagSpec::solo("bc", ": ", "bold_colon"),
    TagSpec::solo("ldquo", "\"", "l_double_quote"),
    TagSpec::solo("rdquo", "\"", "r_double_quote"),
    // Structured tokens
    TagSpec {
        name: "ds",
        kind: TagKind::Structured,
        style_key: Some("italic"),
    },
    // Cross-reference tokens
    TagSpec::cross_reference("sx", 1),
    TagSpec::cross_reference("dxt", 1),
    TagSpec::cross_reference("a_link", 0),
    TagSpec::cross_reference("d_link", 0),
    TagSpec::cross_reference("i_link", 0),
    TagSpec::cross_reference("et_link", 0),
    TagSpec::cross_reference("mat", 0),
    // Newline cleanup
    TagSpec {
        name: "ri",
        kind: TagKind::RunIn,
        style_key: None,
    },
];

/// Finds a tag by name.
pub fn find_tag(name: &str) -> Option<&'static TagSpec> {
    TAG_REGISTRY.iter().find(|spec| spec.name == name)
}
