// src/schema.rs

//! Typed view of the Collegiate dictionary JSON response.
//!
//! Most sub-fields are tagged unions written as two-element arrays,
//! `["kind", payload]`. They are decoded through `TryFrom<(String, Value)>`
//! so that unknown kinds survive as `Other` instead of failing the whole
//! entry.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("The response body is not valid JSON.")]
    Json(#[from] serde_json::Error),
    #[error("Expected a JSON array at the top level of the response.")]
    NotAnArray,
    #[error("Dictionary entry #{index} does not match the expected schema.")]
    Entry {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

fn payload<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

// --- HEADWORD & METADATA ---

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Meta {
    pub id: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub stems: Vec<String>,
    #[serde(default)]
    pub offensive: bool,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Pronunciation {
    pub mw: Option<String>,
    pub l: Option<String>,
    pub l2: Option<String>,
    pub pun: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HeadwordInfo {
    pub hw: String,
    #[serde(default)]
    pub prs: Vec<Pronunciation>,
}

// --- ATTRIBUTIONS & ILLUSTRATIONS ---

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Subsource {
    pub source: Option<String>,
    pub aqdate: Option<String>,
}

/// Author, source and date of a quoted example.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AttributionQuote {
    pub auth: Option<String>,
    pub source: Option<String>,
    pub aqdate: Option<String>,
    pub subsource: Option<Subsource>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct VerbalIllustration {
    pub t: String,
    pub aq: Option<AttributionQuote>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Quotation {
    pub t: String,
    pub aq: Option<AttributionQuote>,
}

// --- RUN-INS ---

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RunInWrap {
    pub rie: String,
}

/// One element of an `ri` list.
///
/// Pronunciation and variant objects can appear bare in the list; those are
/// kept as `Other`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Value")]
pub enum RunInElement {
    Wrap(RunInWrap),
    Text(String),
    Other(Value),
}

impl TryFrom<Value> for RunInElement {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if let Value::Array(items) = &value
            && let [Value::String(kind), inner] = items.as_slice()
        {
            match kind.as_str() {
                "riw" => return Ok(Self::Wrap(payload(inner.clone())?)),
                "text" => return Ok(Self::Text(payload(inner.clone())?)),
                _ => {}
            }
        }
        Ok(Self::Other(value))
    }
}

// --- NOTES ---

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "(String, Value)")]
pub enum SupplementalNoteElement {
    Text(String),
    Illustrations(Vec<VerbalIllustration>),
    RunIn(Vec<RunInElement>),
    Other(String),
}

impl TryFrom<(String, Value)> for SupplementalNoteElement {
    type Error = serde_json::Error;

    fn try_from((kind, value): (String, Value)) -> Result<Self, Self::Error> {
        Ok(match kind.as_str() {
            "t" => Self::Text(payload(value)?),
            "vis" => Self::Illustrations(payload(value)?),
            "ri" => Self::RunIn(payload(value)?),
            _ => Self::Other(kind),
        })
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "(String, Value)")]
pub enum UsageNoteElement {
    Text(String),
    Illustrations(Vec<VerbalIllustration>),
    RunIn(Vec<RunInElement>),
    Other(String),
}

impl TryFrom<(String, Value)> for UsageNoteElement {
    type Error = serde_json::Error;

    fn try_from((kind, value): (String, Value)) -> Result<Self, Self::Error> {
        Ok(match kind.as_str() {
            "text" => Self::Text(payload(value)?),
            "vis" => Self::Illustrations(payload(value)?),
            "ri" => Self::RunIn(payload(value)?),
            _ => Self::Other(kind),
        })
    }
}

/// One usage-note group: the elements of a single `uns` paragraph.
pub type UsageNote = Vec<UsageNoteElement>;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CalledAlsoTarget {
    pub cat: String,
    pub catref: Option<String>,
    pub pn: Option<String>,
    pub psl: Option<String>,
    pub prs: Option<Value>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CalledAlso {
    pub intro: String,
    #[serde(default)]
    pub cats: Vec<CalledAlsoTarget>,
}

// --- DEFINING TEXT ---

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "(String, Value)")]
pub enum DefiningTextElement {
    Text(String),
    UsageNotes(Vec<UsageNote>),
    Illustrations(Vec<VerbalIllustration>),
    CalledAlso(CalledAlso),
    BiographicalName(Value),
    RunIn(Vec<RunInElement>),
    SupplementalNote(Vec<SupplementalNoteElement>),
    Other(String),
}

impl TryFrom<(String, Value)> for DefiningTextElement {
    type Error = serde_json::Error;

    fn try_from((kind, value): (String, Value)) -> Result<Self, Self::Error> {
        Ok(match kind.as_str() {
            "text" => Self::Text(payload(value)?),
            "uns" => Self::UsageNotes(payload(value)?),
            "vis" => Self::Illustrations(payload(value)?),
            "ca" => Self::CalledAlso(payload(value)?),
            "bnw" => Self::BiographicalName(value),
            "ri" => Self::RunIn(payload(value)?),
            "snote" => Self::SupplementalNote(payload(value)?),
            _ => Self::Other(kind),
        })
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "(String, Value)")]
pub enum EtymologyElement {
    Text(String),
    Note(Value),
    Other(String),
}

impl TryFrom<(String, Value)> for EtymologyElement {
    type Error = serde_json::Error;

    fn try_from((kind, value): (String, Value)) -> Result<Self, Self::Error> {
        Ok(match kind.as_str() {
            "text" => Self::Text(payload(value)?),
            "et_snote" => Self::Note(value),
            _ => Self::Other(kind),
        })
    }
}

// --- SENSES ---

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DividedSense {
    pub sd: String,
    #[serde(default)]
    pub dt: Vec<DefiningTextElement>,
    #[serde(default)]
    pub et: Vec<EtymologyElement>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Sense {
    pub sn: Option<String>,
    #[serde(default)]
    pub dt: Vec<DefiningTextElement>,
    #[serde(default)]
    pub et: Vec<EtymologyElement>,
    pub sdsense: Option<DividedSense>,
}

/// A sense that carries only a number and an etymology.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TruncatedSense {
    pub sn: Option<String>,
    #[serde(default)]
    pub et: Vec<EtymologyElement>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
struct SenseObject {
    sense: Sense,
}

/// One item of a sense group.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "(String, Value)")]
pub enum SenseItem {
    Sense(Sense),
    Truncated(TruncatedSense),
    BindingSubstitute(Sense),
    Parenthesized(Vec<SenseItem>),
    Other(String),
}

impl TryFrom<(String, Value)> for SenseItem {
    type Error = serde_json::Error;

    fn try_from((kind, value): (String, Value)) -> Result<Self, Self::Error> {
        Ok(match kind.as_str() {
            "sense" => Self::Sense(payload(value)?),
            "sen" => Self::Truncated(payload(value)?),
            "bs" => Self::BindingSubstitute(payload::<SenseObject>(value)?.sense),
            "pseq" => Self::Parenthesized(payload(value)?),
            _ => Self::Other(kind),
        })
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Definition {
    /// Verb divider, e.g. `"transitive verb"`.
    pub vd: Option<String>,
    #[serde(default)]
    pub sls: Vec<String>,
    #[serde(default)]
    pub sseq: Vec<Vec<SenseItem>>,
}

// --- ENTRY ---

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CollegiateEntry {
    pub meta: Meta,
    pub hom: Option<u32>,
    pub hwi: HeadwordInfo,
    /// Functional label, e.g. `"noun"`.
    pub fl: Option<String>,
    #[serde(rename = "def", default)]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub et: Vec<EtymologyElement>,
    pub date: Option<String>,
    #[serde(default)]
    pub shortdef: Vec<String>,
    #[serde(default)]
    pub quotes: Vec<Quotation>,
}

/// A decoded collegiate response.
#[derive(Debug, Clone, PartialEq)]
pub enum CollegiateResponse {
    /// The word was found.
    Entries(Vec<CollegiateEntry>),
    /// No exact match; the API answered with alternative spellings.
    Suggestions(Vec<String>),
}

impl CollegiateResponse {
    /// Parses a raw response body.
    pub fn from_text(text: &str) -> Result<Self, ResponseError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(value)
    }

    /// Types an already-deserialized response.
    ///
    /// An empty array, or one whose first element is a string, is the API's
    /// "no exact match" answer.
    pub fn from_json(value: Value) -> Result<Self, ResponseError> {
        let Value::Array(items) = value else {
            return Err(ResponseError::NotAnArray);
        };

        match items.first() {
            None => Ok(Self::Suggestions(Vec::new())),
            Some(Value::String(_)) => Ok(Self::Suggestions(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(word) => Some(word),
                        _ => None,
                    })
                    .collect(),
            )),
            Some(_) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    serde_json::from_value(item)
                        .map_err(|source| ResponseError::Entry { index, source })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_first_element_is_suggestions() {
        let response = CollegiateResponse::from_json(json!(["run", "rune", "runt"])).unwrap();
        assert_eq!(
            response,
            CollegiateResponse::Suggestions(vec!["run".into(), "rune".into(), "runt".into()])
        );
    }

    #[test]
    fn test_empty_payload_is_empty_suggestions() {
        let response = CollegiateResponse::from_text("[]").unwrap();
        assert_eq!(response, CollegiateResponse::Suggestions(Vec::new()));
    }

    #[test]
    fn test_non_array_is_rejected() {
        let err = CollegiateResponse::from_json(json!({"error": "bad key"})).unwrap_err();
        assert!(matches!(err, ResponseError::NotAnArray));
    }

    #[test]
    fn test_minimal_entry() {
        let response = CollegiateResponse::from_json(json!([
            {"meta": {"id": "run:1"}, "hwi": {"hw": "run"}}
        ]))
        .unwrap();

        let CollegiateResponse::Entries(entries) = response else {
            unreachable!("expected entries");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].meta.id, "run:1");
        assert!(entries[0].definitions.is_empty());
        assert!(entries[0].fl.is_none());
    }

    #[test]
    fn test_sense_sequence_variants() {
        let definition: Definition = serde_json::from_value(json!({
            "vd": "intransitive verb",
            "sseq": [
                [
                    ["sense", {"sn": "1 a", "dt": [["text", "{bc}to go"]]}],
                    ["sen", {"sn": "2", "et": [["text", "from Old English"]]}],
                    ["bs", {"sense": {"sn": "3", "dt": [["text", "{bc}bound"]]}}],
                    ["pseq", [
                        ["sense", {"sn": "(1)", "dt": [["text", "first"]]}],
                        ["bs", {"sense": {"dt": [["text", "second"]]}}]
                    ]],
                    ["unknown_kind", {}]
                ]
            ]
        }))
        .unwrap();

        let group = &definition.sseq[0];
        assert!(matches!(group[0], SenseItem::Sense(_)));
        assert!(matches!(group[1], SenseItem::Truncated(_)));
        assert!(matches!(group[2], SenseItem::BindingSubstitute(_)));
        assert!(matches!(&group[3], SenseItem::Parenthesized(items) if items.len() == 2));
        assert_eq!(group[4], SenseItem::Other("unknown_kind".into()));
    }

    #[test]
    fn test_defining_text_elements() {
        let dt: Vec<DefiningTextElement> = serde_json::from_value(json!([
            ["text", "{bc}a plain definition"],
            ["vis", [{"t": "an {it}example{/it}", "aq": {"auth": "Someone"}}]],
            ["uns", [[["text", "usually used in plural"], ["vis", [{"t": "ex"}]]]]],
            ["ca", {"intro": "called also", "cats": [{"cat": "alias"}]}],
            ["ri", [["riw", {"rie": "run in"}], ["text", " between "], {"l": "variant"}]],
            ["snote", [["t", "a note"], ["vis", [{"t": "snote ex"}]]]],
            ["bnw", {"pname": "Ada"}]
        ]))
        .unwrap();

        assert!(matches!(dt[0], DefiningTextElement::Text(_)));
        assert!(matches!(dt[1], DefiningTextElement::Illustrations(_)));
        assert!(matches!(dt[2], DefiningTextElement::UsageNotes(_)));
        assert!(matches!(dt[3], DefiningTextElement::CalledAlso(_)));
        let DefiningTextElement::RunIn(elements) = &dt[4] else {
            unreachable!("expected a run-in");
        };
        assert_eq!(elements[0], RunInElement::Wrap(RunInWrap { rie: "run in".into() }));
        assert_eq!(elements[1], RunInElement::Text(" between ".into()));
        assert!(matches!(elements[2], RunInElement::Other(_)));
        assert!(matches!(dt[5], DefiningTextElement::SupplementalNote(_)));
        assert!(matches!(dt[6], DefiningTextElement::BiographicalName(_)));
    }

    #[test]
    fn test_bad_entry_reports_its_index() {
        let err = CollegiateResponse::from_json(json!([
            {"meta": {"id": "ok"}, "hwi": {"hw": "ok"}},
            {"meta": {"id": "broken"}}
        ]))
        .unwrap_err();
        assert!(matches!(err, ResponseError::Entry { index: 1, .. }));
    }
}
