// src/core/transformer.rs

use crate::{
    core::{
        styled_text::{Style, StyledText},
        tags::{TAG_REGISTRY, TagKind, TagSpec},
    },
    models::StyleSheet,
};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Substitutions allowed for one tag beyond the occurrences present in the
/// input. Only replacements that reintroduce a match consume this budget.
pub const MAX_SUBSTITUTIONS: usize = 4096;

const DATE_SENSE_PREFIX: &str = ", in the meaning of ";

/// Compiled patterns for one registry row.
#[derive(Debug)]
struct TagPatterns {
    primary: Regex,
    secondary: Option<Regex>,
}

impl TagPatterns {
    fn compile(spec: &TagSpec) -> Self {
        let name = regex::escape(spec.name);
        let (primary, secondary) = match spec.kind {
            TagKind::Paired | TagKind::Bracketing { .. } => {
                (format!(r"\{{{name}\}}(.*?)\{{/{name}\}}"), None)
            }
            TagKind::Solo { .. } => (format!(r"\{{{name}\}}"), None),
            TagKind::Structured => (format!(r"\{{{name}(.*?)\}}"), None),
            TagKind::CrossReference { .. } => (format!(r"\{{{name}\|[^{{}}]*\}}"), None),
            TagKind::RunIn => (r"\(\n".to_string(), Some(r"\n\s\)".to_string())),
        };
        Self {
            primary: Regex::new(&primary).expect("tag pattern must be a valid regex"),
            secondary: secondary
                .map(|pattern| Regex::new(&pattern).expect("tag pattern must be a valid regex")),
        }
    }
}

lazy_static! {
    static ref TAG_PATTERNS: Vec<TagPatterns> =
        TAG_REGISTRY.iter().map(TagPatterns::compile).collect();
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// A pipe-delimited token did not have the fields its tag requires.
    #[error("Malformed '{{{tag}}}' token '{token}': {reason}")]
    MalformedTag {
        tag: &'static str,
        token: String,
        reason: String,
    },
    /// A tag kept matching after its occurrences plus `MAX_SUBSTITUTIONS`
    /// replacements.
    #[error("Gave up resolving '{{{tag}}}' after {limit} substitutions.")]
    SubstitutionLimit { tag: &'static str, limit: usize },
}

/// Rewrites dictionary markup into styled text.
///
/// The transformer walks `TAG_REGISTRY` in order and resolves every
/// occurrence of one tag before moving to the next.
#[derive(Debug, Clone, Copy)]
pub struct TagTransformer<'a> {
    styles: &'a StyleSheet,
}

impl<'a> TagTransformer<'a> {
    pub fn new(styles: &'a StyleSheet) -> Self {
        Self { styles }
    }

    /// The style sheet used for tag styles.
    pub fn styles(&self) -> &'a StyleSheet {
        self.styles
    }

    /// Resolves every registered tag in `text`.
    pub fn transform(&self, text: StyledText) -> Result<StyledText, FormatError> {
        TAG_REGISTRY
            .iter()
            .zip(TAG_PATTERNS.iter())
            .try_fold(text, |text, (spec, patterns)| {
                self.apply_tag(spec, patterns, text)
            })
    }

    /// Convenience wrapper for raw, unstyled markup.
    pub fn transform_str(&self, raw: &str) -> Result<StyledText, FormatError> {
        self.transform(StyledText::from(raw))
    }

    /// Runs only the run-in newline cleanup.
    pub fn normalize_run_ins(&self, text: StyledText) -> Result<StyledText, FormatError> {
        match TAG_REGISTRY
            .iter()
            .zip(TAG_PATTERNS.iter())
            .find(|(spec, _)| spec.kind == TagKind::RunIn)
        {
            Some((spec, patterns)) => self.apply_tag(spec, patterns, text),
            None => Ok(text),
        }
    }

    fn apply_tag(
        &self,
        spec: &TagSpec,
        patterns: &TagPatterns,
        text: StyledText,
    ) -> Result<StyledText, FormatError> {
        let style = spec.style(self.styles);
        match spec.kind {
            TagKind::Paired => Ok(strip_pair(spec, patterns, text, style.as_ref(), None)),
            TagKind::Bracketing { open, close } => Ok(strip_pair(
                spec,
                patterns,
                text,
                style.as_ref(),
                Some((open, close)),
            )),
            TagKind::Solo { replacement } => {
                let replacement = StyledText::styled(replacement, style);
                substitute_each(spec.name, &patterns.primary, text, |_| Ok(replacement.clone()))
            }
            TagKind::Structured => substitute_each(spec.name, &patterns.primary, text, |token| {
                expand_date_sense(spec.name, token, style.as_ref())
            }),
            TagKind::CrossReference { field } => {
                substitute_each(spec.name, &patterns.primary, text, |token| {
                    let display = cross_reference_field(spec.name, token, field)?;
                    Ok(StyledText::styled(display, style.clone()))
                })
            }
            TagKind::RunIn => {
                let text = substitute_each(spec.name, &patterns.primary, text, |_| {
                    Ok(StyledText::from("("))
                })?;
                match &patterns.secondary {
                    Some(close) => {
                        substitute_each(spec.name, close, text, |_| Ok(StyledText::from(" )")))
                    }
                    None => Ok(text),
                }
            }
        }
    }
}

/// Styles every between-span of a paired tag, then drops (or brackets) the tokens.
fn strip_pair(
    spec: &TagSpec,
    patterns: &TagPatterns,
    mut text: StyledText,
    style: Option<&Style>,
    brackets: Option<(&str, &str)>,
) -> StyledText {
    let open_token = spec.open_token();
    let close_token = spec.close_token();

    let plain = text.plain();
    if !plain.contains(&open_token) && !plain.contains(&close_token) {
        return text;
    }

    if let Some(style) = style {
        let spans: Vec<_> = patterns
            .primary
            .captures_iter(&plain)
            .filter_map(|caps| caps.get(1))
            .map(|inner| inner.range())
            .collect();
        for span in spans {
            text.stylize(span, style);
        }
    }

    match brackets {
        Some((open, close)) => {
            let open = StyledText::styled(open, style.cloned());
            let close = StyledText::styled(close, style.cloned());
            text.replace_all(&open_token, &open)
                .replace_all(&close_token, &close)
        }
        None => text.remove_all(&open_token).remove_all(&close_token),
    }
}

/// Replaces the first match of `pattern` until none is left.
fn substitute_each<F>(
    tag: &'static str,
    pattern: &Regex,
    mut text: StyledText,
    mut replacement_for: F,
) -> Result<StyledText, FormatError>
where
    F: FnMut(&str) -> Result<StyledText, FormatError>,
{
    let occurrences = pattern.find_iter(&text.plain()).count();
    for _ in 0..occurrences.saturating_add(MAX_SUBSTITUTIONS) {
        let plain = text.plain();
        let Some(found) = pattern.find(&plain) else {
            return Ok(text);
        };
        let replacement = replacement_for(found.as_str())?;
        text = text.replace_range(found.range(), &replacement);
    }

    if pattern.is_match(&text.plain()) {
        return Err(FormatError::SubstitutionLimit {
            tag,
            limit: MAX_SUBSTITUTIONS,
        });
    }
    Ok(text)
}

/// Expands `{ds|vd|num|letter|paren}`.
fn expand_date_sense(
    tag: &'static str,
    token: &str,
    style: Option<&Style>,
) -> Result<StyledText, FormatError> {
    let fields: Vec<&str> = token.split('|').collect();
    let [_, verb_divider, sense_number, sense_letter, parenthesized] = fields.as_slice() else {
        return Err(FormatError::MalformedTag {
            tag,
            token: token.to_string(),
            reason: format!("expected 5 '|'-separated fields, found {}", fields.len()),
        });
    };

    let divider = match *verb_divider {
        "t" => "transitive",
        "i" => "intransitive",
        _ => "",
    };

    let mut text = StyledText::from(DATE_SENSE_PREFIX);
    text.push_styled(divider, style.cloned());
    if !sense_number.is_empty() {
        text.push_styled(format!("sense {sense_number}"), style.cloned());
    }
    if !sense_letter.is_empty() {
        text.push_styled(*sense_letter, style.cloned());
    }
    if !parenthesized.is_empty() {
        // The last field still carries the token's closing brace.
        let mut chars = parenthesized.chars();
        chars.next_back();
        text.push_styled(chars.as_str(), style.cloned());
    }
    Ok(text)
}

/// Picks the display field out of `{name|f0|f1|…}`.
fn cross_reference_field(
    tag: &'static str,
    token: &str,
    field: usize,
) -> Result<String, FormatError> {
    let inner = token
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(token);

    inner
        .split('|')
        .skip(1)
        .nth(field)
        .map(str::to_string)
        .ok_or_else(|| FormatError::MalformedTag {
            tag,
            token: token.to_string(),
            reason: format!("missing payload field {}", field),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> StyleSheet {
        let mut sheet = StyleSheet::default();
        for (key, value) in [
            ("bold", "bold"),
            ("italic", "italic"),
            ("small_caps", "uppercase"),
            ("subscript", "dim"),
            ("superscript", "dim"),
            ("glossary", "cyan"),
            ("paragraph_word", "bold"),
            ("phrase", "bold italic"),
            ("quote_word", "italic"),
            ("run_in_word", "bold"),
            ("bold_colon", "bold"),
            ("l_double_quote", "white"),
            ("r_double_quote", "white"),
            ("cross_reference", "underline blue"),
        ] {
            sheet.tags.insert(key.to_string(), value.to_string());
        }
        sheet
    }

    fn style(s: &str) -> Option<Style> {
        Style::parse(s)
    }

    #[test]
    fn test_text_without_tags_is_unchanged() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let out = transformer.transform_str("a plain (definition), with punctuation").unwrap();

        assert_eq!(out, StyledText::from("a plain (definition), with punctuation"));
        assert!(out.runs().iter().all(|run| run.style().is_none()));
    }

    #[test]
    fn test_paired_tags_are_removed_and_styled() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let out = transformer
            .transform_str("an example {b}bold me{/b} and also {b}me{/b}")
            .unwrap();

        assert_eq!(out.plain(), "an example bold me and also me");
        let expected = StyledText::from("an example ")
            + StyledText::styled("bold me", style("bold"))
            + StyledText::from(" and also ")
            + StyledText::styled("me", style("bold"));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_pair_removal_is_idempotent() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let once = transformer
            .transform_str("an example {sup}sup me{/sup} and {it}{sc}nested{/sc}{/it}")
            .unwrap();
        let twice = transformer.transform(once.clone()).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.plain(), "an example sup me and nested");
    }

    #[test]
    fn test_no_tokens_remain_for_handled_tags() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let raw = "{bc}a {it}word{/it} {gloss}note{/gloss} {ldquo}q{rdquo} {wi}w{/wi} \
                   {phrase}p{/phrase} {qword}x{/qword} {parahw}h{/parahw} {inf}2{/inf}";
        let out = transformer.transform_str(raw).unwrap().plain();

        for spec in TAG_REGISTRY {
            assert!(!out.contains(&spec.open_token()), "left {}", spec.open_token());
            assert!(!out.contains(&spec.close_token()), "left {}", spec.close_token());
        }
    }

    #[test]
    fn test_nested_pairs_layer_styles() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let out = transformer.transform_str("{b}big {it}deal{/it}{/b}").unwrap();

        assert_eq!(out.plain(), "big deal");
        assert_eq!(out.runs()[0].style(), style("bold").as_ref());
        assert_eq!(out.runs()[1].style(), style("bold italic").as_ref());
    }

    #[test]
    fn test_gloss_becomes_styled_brackets() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let out = transformer.transform_str("x {gloss}short for{/gloss} y").unwrap();

        assert_eq!(out.plain(), "x [short for] y");
        assert_eq!(
            out,
            StyledText::from("x ") + StyledText::styled("[short for]", style("cyan")) + " y".into()
        );
    }

    #[test]
    fn test_solo_tokens_replace_every_occurrence() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let out = transformer.transform_str("{bc}an {bc}example{bc}").unwrap();

        assert_eq!(out.plain(), ": an : example: ");
        assert_eq!(out.runs().len(), 5);
        assert_eq!(out.runs()[0].style(), style("bold").as_ref());

        let quotes = transformer.transform_str("an example {ldquo}quote{rdquo}").unwrap();
        assert_eq!(quotes.plain(), "an example \"quote\"");
    }

    #[test]
    fn test_date_sense_token() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let out = transformer.transform_str("1580{ds|t|1|a|(1)}").unwrap();

        let expected = StyledText::from("1580, in the meaning of ")
            + StyledText::styled("transitivesense 1a(1)", style("italic"));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_date_sense_with_empty_fields() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);

        let out = transformer.transform_str("before 12th century{ds|x|2||}").unwrap();
        assert_eq!(out.plain(), "before 12th century, in the meaning of sense 2");

        let repeated = transformer
            .transform_str("{ds|i|1||} and {ds|t|||}")
            .unwrap();
        assert_eq!(
            repeated.plain(),
            ", in the meaning of intransitivesense 1 and , in the meaning of transitive"
        );
    }

    #[test]
    fn test_malformed_date_sense_fails_loudly() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let err = transformer.transform_str("1580{ds|t|1}").unwrap_err();

        assert!(matches!(err, FormatError::MalformedTag { tag: "ds", .. }));
    }

    #[test]
    fn test_cross_reference_selects_display_field() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let out = transformer.transform_str("{sx|run|run:2|}").unwrap();

        assert_eq!(out, StyledText::styled("run:2", style("underline blue")));
    }

    #[test]
    fn test_cross_references_repeat_and_empty_display_field_shows_nothing() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let out = transformer
            .transform_str("compare {sx|fast||} and {sx|quick|quick:1|}; see {a_link|speed}")
            .unwrap();

        // `{sx|fast||}` has an empty field 1, so it leaves nothing behind.

        assert_eq!(out.plain(), "compare  and quick:1; see speed");
    }

    #[test]
    fn test_many_solo_tokens_resolve_past_the_budget() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let count = MAX_SUBSTITUTIONS + 10;

        let out = transformer.transform_str(&"{bc}".repeat(count)).unwrap();

        assert_eq!(out.plain(), ": ".repeat(count));
    }

    #[test]
    fn test_substitution_limit_stops_self_reproducing_replacements() {
        // --- Setup ---
        let pattern = Regex::new(r"\{bc\}").unwrap();
        let mut calls = 0;

        // --- Execute ---
        let err = substitute_each("bc", &pattern, StyledText::from("a {bc} b"), |token| {
            calls += 1;
            Ok(StyledText::from(token))
        })
        .unwrap_err();

        // --- Assert ---
        assert_eq!(
            err,
            FormatError::SubstitutionLimit {
                tag: "bc",
                limit: MAX_SUBSTITUTIONS,
            }
        );
        assert_eq!(calls, MAX_SUBSTITUTIONS + 1);
    }

    #[test]
    fn test_cross_reference_missing_field_fails() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let err = transformer.transform_str("{sx|run}").unwrap_err();
        assert!(matches!(err, FormatError::MalformedTag { tag: "sx", .. }));
    }

    #[test]
    fn test_run_in_newlines_are_closed_up() {
        let sheet = sheet();
        let transformer = TagTransformer::new(&sheet);
        let out = transformer
            .normalize_run_ins(StyledText::from("often used (\n run in\n )"))
            .unwrap();

        assert_eq!(out.plain(), "often used ( run in )");
    }

    #[test]
    fn test_missing_style_keys_leave_text_unstyled() {
        let sheet = StyleSheet::default();
        let transformer = TagTransformer::new(&sheet);
        let out = transformer.transform_str("{it}word{/it}{bc}").unwrap();

        assert_eq!(out, StyledText::from("word: "));
    }
}
