// src/core/document.rs

//! The render tree handed from the entry assembler to the painter.

use crate::core::{
    elements::SenseAddress,
    styled_text::{Style, StyledText},
};
use crate::models::StyleSheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Center,
}

/// A fixed-width grid column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub width: usize,
    pub justify: Justify,
}

/// Major sense, minor sense and sequence columns. The defining text takes
/// the rest of the line.
pub const SENSE_COLUMNS: [Column; 3] = [
    Column {
        width: 1,
        justify: Justify::Left,
    },
    Column {
        width: 3,
        justify: Justify::Center,
    },
    Column {
        width: 4,
        justify: Justify::Left,
    },
];

/// Width taken by the sense columns before the defining text starts.
pub fn sense_columns_width() -> usize {
    SENSE_COLUMNS.iter().map(|column| column.width).sum()
}

/// One sense of a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRow {
    pub address: SenseAddress,
    pub text: StyledText,
}

impl DefinitionRow {
    pub fn new(address: SenseAddress, text: StyledText) -> Self {
        Self { address, text }
    }

    /// The three styled sense cells, blank where a part is missing.
    pub fn cells(&self, styles: &StyleSheet) -> [StyledText; 3] {
        let major = match self.address.major {
            Some(major) if major != 0 => {
                StyledText::styled(major.to_string(), styles.display("sense_major"))
            }
            _ => StyledText::from(" "),
        };
        let minor = match &self.address.minor {
            Some(minor) => StyledText::styled(minor.as_str(), styles.display("sense_minor")),
            None => StyledText::from("   "),
        };
        let sequence = match &self.address.sequence {
            Some(sequence) => {
                StyledText::styled(format!("{} ", sequence), styles.display("sense_sequence"))
            }
            None => StyledText::from("   "),
        };
        [major, minor, sequence]
    }
}

/// A row whose cells are ready to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub cells: [StyledText; 3],
    pub text: StyledText,
}

/// Renderable blocks, painted top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A horizontal rule with a left-aligned title.
    Rule {
        title: StyledText,
        style: Option<Style>,
    },
    Text(StyledText),
    Grid(Vec<GridRow>),
    Group(Vec<Block>),
    Blank,
}

impl Block {
    /// True for an empty group, or a group of empty groups.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Group(children) => children.iter().all(Self::is_empty),
            Self::Grid(rows) => rows.is_empty(),
            Self::Text(text) => text.is_empty(),
            Self::Rule { .. } | Self::Blank => false,
        }
    }
}
