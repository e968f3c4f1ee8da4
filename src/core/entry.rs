// src/core/entry.rs

use crate::{
    core::{
        document::{Block, DefinitionRow, GridRow},
        elements::{FieldFormatter, parse_sense_number},
        styled_text::StyledText,
        transformer::FormatError,
    },
    models::StyleSheet,
    schema::{
        CollegiateEntry, CollegiateResponse, Definition, EtymologyElement, Sense, SenseItem,
        TruncatedSense,
    },
};

const TITLE_SEPARATOR: &str = " ── ";

/// Composes dictionary entries into render blocks.
#[derive(Debug, Clone, Copy)]
pub struct EntryAssembler<'a> {
    formatter: FieldFormatter<'a>,
    styles: &'a StyleSheet,
}

impl<'a> EntryAssembler<'a> {
    pub fn new(styles: &'a StyleSheet) -> Self {
        Self {
            formatter: FieldFormatter::new(styles),
            styles,
        }
    }

    /// Renders a whole response: every entry, or the alternate terms.
    pub fn assemble_response(
        &self,
        response: &CollegiateResponse,
    ) -> Result<Vec<Block>, FormatError> {
        match response {
            CollegiateResponse::Entries(entries) => {
                let mut blocks = Vec::new();
                for (index, entry) in entries.iter().enumerate() {
                    blocks.extend(self.assemble(index, entry)?);
                }
                Ok(blocks)
            }
            CollegiateResponse::Suggestions(words) => Ok(Self::alternate_terms(words)),
        }
    }

    /// Fallback listing for a search without an exact match.
    pub fn alternate_terms(words: &[String]) -> Vec<Block> {
        words
            .iter()
            .map(|word| Block::Text(StyledText::from(word.as_str())))
            .collect()
    }

    /// Renders one entry: its title rule, the present sections and a blank line.
    pub fn assemble(&self, index: usize, entry: &CollegiateEntry) -> Result<Vec<Block>, FormatError> {
        let definitions = self.definitions(entry)?;
        let short_definitions = if definitions.is_none() {
            self.short_definitions(entry)
        } else {
            None
        };

        let sections: Vec<Block> = [
            self.pronunciations(entry).map(Block::Text),
            definitions,
            short_definitions.map(Block::Text),
            self.stems(entry).map(Block::Text),
            self.date(entry)?.map(Block::Text),
            self.formatter.quotations(&entry.quotes)?.map(Block::Text),
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(vec![
            Block::Rule {
                title: self.title(index, entry),
                style: self.styles.display("panel"),
            },
            Block::Group(sections),
            Block::Blank,
        ])
    }

    /// ` 1  ── run : 1 ── verb`
    pub fn title(&self, index: usize, entry: &CollegiateEntry) -> StyledText {
        let separator = StyledText::styled(TITLE_SEPARATOR, self.styles.display("panel"));

        let mut title = StyledText::styled(format!(" {} ", index + 1), self.styles.display("item_index"));
        title.append(separator.clone());
        title.push_styled(entry.meta.id.replace(':', " : "), self.styles.display("headword"));

        if let Some(fl) = &entry.fl {
            title.append(separator);
            title.push_styled(fl.as_str(), self.styles.display("fl"));
        }
        title
    }

    fn pronunciations(&self, entry: &CollegiateEntry) -> Option<StyledText> {
        let style = self.styles.display("pronunciation_content");
        let written: Vec<StyledText> = entry
            .hwi
            .prs
            .iter()
            .filter_map(|pr| pr.mw.as_deref())
            .map(|mw| StyledText::styled(mw, style.clone()))
            .collect();

        if written.is_empty() {
            return None;
        }
        Some(StyledText::join(&" | ".into(), written))
    }

    fn short_definitions(&self, entry: &CollegiateEntry) -> Option<StyledText> {
        if entry.shortdef.is_empty() {
            return None;
        }
        let style = self.styles.display("short_def_content");
        let items = entry
            .shortdef
            .iter()
            .map(|def| StyledText::styled(format!("• {}", def), style.clone()));

        let mut text =
            StyledText::styled("Short Definition:", self.styles.display("short_def_title"));
        text.push_str("\n");
        text.append(StyledText::join(&"\n".into(), items));
        Some(text)
    }

    fn stems(&self, entry: &CollegiateEntry) -> Option<StyledText> {
        if entry.meta.stems.is_empty() {
            return None;
        }
        let style = self.styles.display("stem_content");
        let stems = entry
            .meta
            .stems
            .iter()
            .map(|stem| StyledText::styled(stem.as_str(), style.clone()));

        let mut text = StyledText::styled("Stems:", self.styles.display("stem_title"));
        text.push_str(" ");
        text.append(StyledText::join(&" | ".into(), stems));
        Some(text)
    }

    fn date(&self, entry: &CollegiateEntry) -> Result<Option<StyledText>, FormatError> {
        let Some(date) = &entry.date else {
            return Ok(None);
        };
        let mut text =
            StyledText::styled("First Known Use:\n", self.styles.display("date_title"));
        text.append(self.formatter.transformer().transform_str(date)?);
        Ok(Some(text))
    }

    fn definitions(&self, entry: &CollegiateEntry) -> Result<Option<Block>, FormatError> {
        if entry.definitions.is_empty() {
            return Ok(None);
        }

        let mut groups = entry
            .definitions
            .iter()
            .map(|definition| self.definition(definition))
            .collect::<Result<Vec<_>, _>>()?;
        groups.push(Block::Blank);
        Ok(Some(Block::Group(groups)))
    }

    /// The verb divider (if any) followed by the definition's sense grid.
    fn definition(&self, definition: &Definition) -> Result<Block, FormatError> {
        let mut rows = Vec::new();
        for item in definition.sseq.iter().flatten() {
            rows.extend(self.sense_item_rows(item)?);
        }

        let grid = rows
            .into_iter()
            .map(|row| GridRow {
                cells: row.cells(self.styles),
                text: row.text,
            })
            .collect();

        let mut blocks = Vec::new();
        if let Some(vd) = &definition.vd {
            blocks.push(Block::Text(StyledText::styled(
                vd.as_str(),
                self.styles.display("verb_divider"),
            )));
        }
        blocks.push(Block::Grid(grid));
        Ok(Block::Group(blocks))
    }

    fn sense_item_rows(&self, item: &SenseItem) -> Result<Vec<DefinitionRow>, FormatError> {
        match item {
            SenseItem::Sense(sense) | SenseItem::BindingSubstitute(sense) => {
                Ok(vec![self.sense_row(sense)?])
            }
            SenseItem::Truncated(sen) => Ok(vec![self.truncated_sense_row(sen)?]),
            SenseItem::Parenthesized(items) => {
                let mut rows = Vec::new();
                for inner in items {
                    match inner {
                        SenseItem::Sense(sense) | SenseItem::BindingSubstitute(sense) => {
                            rows.push(self.sense_row(sense)?);
                        }
                        other => log::debug!("Skipping unexpected item inside pseq: {:?}", other),
                    }
                }
                Ok(rows)
            }
            SenseItem::Other(kind) => {
                log::debug!("Skipping unhandled sense item '{}'.", kind);
                Ok(Vec::new())
            }
        }
    }

    fn sense_row(&self, sense: &Sense) -> Result<DefinitionRow, FormatError> {
        let mut text = self.formatter.defining_text(&sense.dt)?;

        if let Some(divided) = &sense.sdsense {
            text.push_str("\n");
            text.push_styled(divided.sd.as_str(), self.styles.tag("italic"));
            text.push_str(" ");
            text.append(self.formatter.defining_text(&divided.dt)?);
        }

        Ok(DefinitionRow::new(parse_sense_number(sense.sn.as_deref()), text))
    }

    fn truncated_sense_row(&self, sen: &TruncatedSense) -> Result<DefinitionRow, FormatError> {
        let etymology = sen.et.iter().rev().find_map(|element| match element {
            EtymologyElement::Text(text) => Some(text.as_str()),
            _ => None,
        });

        let text = match etymology {
            Some(raw) => self.formatter.transformer().transform_str(raw)?,
            None => StyledText::new(),
        };
        Ok(DefinitionRow::new(parse_sense_number(sen.sn.as_deref()), text))
    }
}
