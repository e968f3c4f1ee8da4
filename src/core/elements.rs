// src/core/elements.rs

//! Formatters for the structured fields of a dictionary entry.
//!
//! Every formatter returns text whose markup is already resolved, so callers
//! can join the pieces without running the transformer again.

use crate::{
    core::{
        styled_text::StyledText,
        transformer::{FormatError, TagTransformer},
    },
    models::StyleSheet,
    schema::{
        AttributionQuote, CalledAlso, DefiningTextElement, Quotation, RunInElement,
        SupplementalNoteElement, UsageNote, UsageNoteElement, VerbalIllustration,
    },
};

const ILLUSTRATION_PREFIX: &str = " — ";
const ATTRIBUTION_PREFIX: &str = " ↳ ";
const NOTE_PREFIX: &str = "NOTE: ";
const ARROW_PREFIX: &str = "-> ";
const QUOTATIONS_TITLE: &str = "Examples:";

/// Position of a sense inside the definitions grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenseAddress {
    /// Leading number, e.g. `1`.
    pub major: Option<u32>,
    /// Letter, e.g. `"a"`.
    pub minor: Option<String>,
    /// Parenthesized number, e.g. `"(1)"`.
    pub sequence: Option<String>,
}

/// Splits a sense number such as `"1 a (2)"` into its grid columns.
///
/// Tokens are classified one by one: integers are the major sense, three
/// character tokens the sequence, anything else the minor sense. A later
/// token of the same class replaces an earlier one.
pub fn parse_sense_number(sn: Option<&str>) -> SenseAddress {
    let mut address = SenseAddress::default();
    let Some(sn) = sn else {
        return address;
    };

    for token in sn.split_whitespace() {
        if let Ok(major) = token.parse::<u32>() {
            address.major = Some(major);
        } else if token.chars().count() == 3 {
            address.sequence = Some(token.to_string());
        } else {
            address.minor = Some(token.to_string());
        }
    }
    address
}

/// Turns typed entry fields into styled text.
#[derive(Debug, Clone, Copy)]
pub struct FieldFormatter<'a> {
    transformer: TagTransformer<'a>,
    styles: &'a StyleSheet,
}

impl<'a> FieldFormatter<'a> {
    pub fn new(styles: &'a StyleSheet) -> Self {
        Self {
            transformer: TagTransformer::new(styles),
            styles,
        }
    }

    pub fn transformer(&self) -> &TagTransformer<'a> {
        &self.transformer
    }

    /// Attribution line with its markup left untouched.
    pub fn attribution_raw(aq: &AttributionQuote) -> StyledText {
        let mut fields: Vec<StyledText> = [&aq.auth, &aq.source, &aq.aqdate]
            .into_iter()
            .flatten()
            .map(|field| StyledText::from(field.as_str()))
            .collect();

        if let Some(subsource) = &aq.subsource {
            let mut sub = StyledText::new();
            if let Some(source) = &subsource.source {
                sub.push_str(source);
            }
            if let Some(date) = &subsource.aqdate {
                sub.push_str(&format!(", {}", date));
            }
            fields.push(sub);
        }

        StyledText::from(ATTRIBUTION_PREFIX) + StyledText::join(&", ".into(), fields)
    }

    /// ` ↳ author, source, date` with markup resolved.
    pub fn attribution(&self, aq: &AttributionQuote) -> Result<StyledText, FormatError> {
        self.transformer.transform(Self::attribution_raw(aq))
    }

    /// One ` — example` line per illustration, each followed by its attribution.
    pub fn verbal_illustrations(
        &self,
        illustrations: &[VerbalIllustration],
    ) -> Result<StyledText, FormatError> {
        let lines = illustrations
            .iter()
            .map(|vis| {
                let mut line =
                    StyledText::from(ILLUSTRATION_PREFIX) + self.transformer.transform_str(&vis.t)?;
                if let Some(aq) = &vis.aq {
                    line.push_str("\n");
                    line.append(self.attribution(aq)?);
                }
                Ok(line)
            })
            .collect::<Result<Vec<_>, FormatError>>()?;

        Ok(StyledText::join(&"\n".into(), lines))
    }

    /// Run-in words and the text between them.
    pub fn run_in(&self, elements: &[RunInElement]) -> Result<StyledText, FormatError> {
        let mut text = StyledText::from(" ");
        for element in elements {
            match element {
                RunInElement::Wrap(wrap) => text.append(self.transformer.transform_str(&wrap.rie)?),
                RunInElement::Text(between) => {
                    text.append(self.transformer.transform_str(between)?);
                }
                // TODO: render run-in pronunciations and variants once their layout is decided.
                RunInElement::Other(value) => {
                    log::debug!("Skipping unhandled run-in element: {}", value);
                }
            }
        }
        Ok(text)
    }

    /// `NOTE: ` followed by the note's text, illustrations and run-ins.
    pub fn supplemental_note(
        &self,
        elements: &[SupplementalNoteElement],
    ) -> Result<StyledText, FormatError> {
        let mut text = StyledText::from(NOTE_PREFIX);
        for element in elements {
            match element {
                SupplementalNoteElement::Text(t) => text.append(self.transformer.transform_str(t)?),
                SupplementalNoteElement::Illustrations(vis) => {
                    text.push_str("\n");
                    text.append(self.verbal_illustrations(vis)?);
                }
                SupplementalNoteElement::RunIn(ri) => text.append(self.run_in(ri)?),
                SupplementalNoteElement::Other(kind) => {
                    log::debug!("Skipping unhandled supplemental note element '{}'.", kind);
                }
            }
        }
        Ok(text)
    }

    /// One line per usage-note element, across all groups.
    pub fn usage_notes(&self, notes: &[UsageNote]) -> Result<StyledText, FormatError> {
        let mut lines = Vec::new();
        for element in notes.iter().flatten() {
            match element {
                UsageNoteElement::Text(t) => {
                    let mut line = StyledText::from(ARROW_PREFIX) + self.transformer.transform_str(t)?;
                    if let Some(style) = self.styles.display("usage_note") {
                        line.underlay_all(&style);
                    }
                    lines.push(line);
                }
                UsageNoteElement::Illustrations(vis) => lines.push(self.noted(self.verbal_illustrations(vis)?)),
                UsageNoteElement::RunIn(ri) => lines.push(self.run_in(ri)?),
                UsageNoteElement::Other(kind) => {
                    log::debug!("Skipping unhandled usage note element '{}'.", kind);
                }
            }
        }
        Ok(StyledText::join(&"\n".into(), lines))
    }

    /// `-> called also ` followed by the italicized targets.
    pub fn called_also(&self, ca: &CalledAlso) -> Result<StyledText, FormatError> {
        let targets = ca
            .cats
            .iter()
            .map(|target| self.transformer.transform_str(&format!("{{it}}{}{{/it}}", target.cat)))
            .collect::<Result<Vec<_>, FormatError>>()?;

        Ok(StyledText::from(format!("{}{} ", ARROW_PREFIX, ca.intro))
            + StyledText::join(&", ".into(), targets))
    }

    /// Assembles the defining text of a sense, one line per element.
    pub fn defining_text(&self, dt: &[DefiningTextElement]) -> Result<StyledText, FormatError> {
        let definition_style = self.styles.display("definition_content");
        let mut lines = Vec::new();

        for element in dt {
            let line = match element {
                DefiningTextElement::Text(raw) => {
                    let mut line = self.transformer.transform_str(raw)?;
                    if let Some(style) = &definition_style {
                        line.underlay_all(style);
                    }
                    line
                }
                DefiningTextElement::UsageNotes(uns) => self.usage_notes(uns)?,
                DefiningTextElement::Illustrations(vis) => self.noted(self.verbal_illustrations(vis)?),
                DefiningTextElement::CalledAlso(ca) => self.called_also(ca)?,
                DefiningTextElement::RunIn(ri) => {
                    let mut line = self.run_in(ri)?;
                    if let Some(style) = &definition_style {
                        line.underlay_all(style);
                    }
                    line
                }
                DefiningTextElement::SupplementalNote(snote) => self.noted(self.supplemental_note(snote)?),
                DefiningTextElement::BiographicalName(_) => {
                    log::debug!("Skipping biographical name wrap in defining text.");
                    continue;
                }
                DefiningTextElement::Other(kind) => {
                    log::debug!("Skipping unhandled defining text element '{}'.", kind);
                    continue;
                }
            };
            lines.push(line);
        }

        self.transformer
            .normalize_run_ins(StyledText::join(&"\n".into(), lines))
    }

    /// `Examples:` followed by each quotation and its attribution.
    ///
    /// The block is assembled raw and resolved in one pass. Returns `None`
    /// when there are no quotations.
    pub fn quotations(&self, quotes: &[Quotation]) -> Result<Option<StyledText>, FormatError> {
        if quotes.is_empty() {
            return Ok(None);
        }

        let mut lines = vec![StyledText::from(QUOTATIONS_TITLE)];
        for quote in quotes {
            let mut line = StyledText::from(quote.t.as_str());
            if let Some(aq) = &quote.aq {
                line.push_str("\n");
                line.append(Self::attribution_raw(aq));
            }
            lines.push(line);
        }

        self.transformer
            .transform(StyledText::join(&"\n".into(), lines))
            .map(Some)
    }

    fn noted(&self, mut text: StyledText) -> StyledText {
        if let Some(style) = self.styles.display("note") {
            text.underlay_all(&style);
        }
        text
    }
}
