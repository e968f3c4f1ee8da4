// src/core/painter.rs

//! Turns render blocks into terminal text.

use crate::core::{
    color::paint,
    document::{Block, Column, GridRow, Justify, SENSE_COLUMNS, sense_columns_width},
    styled_text::{Style, StyledText},
};

const RULE_CHAR: char = '─';

/// Paints blocks at a fixed console width.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    width: usize,
}

impl Painter {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Paints every block, one per line group.
    pub fn paint_blocks(&self, blocks: &[Block]) -> String {
        let mut out = String::new();
        for block in blocks {
            self.paint_block(block, &mut out);
        }
        out
    }

    /// Frames the painted blocks between a titled top rule and a closing rule.
    pub fn paint_panel(
        &self,
        title: &StyledText,
        border: Option<&Style>,
        blocks: &[Block],
    ) -> String {
        let mut out = self.centered_rule(title, border);
        out.push('\n');
        out.push_str(&self.paint_blocks(blocks));
        out.push_str(&styled_line(&RULE_CHAR.to_string().repeat(self.width), border));
        out.push('\n');
        out
    }

    fn paint_block(&self, block: &Block, out: &mut String) {
        match block {
            Block::Rule { title, style } => {
                out.push_str(&self.left_rule(title, style.as_ref()));
                out.push('\n');
            }
            Block::Text(text) => {
                for line in text.split("\n") {
                    out.push_str(&paint_text(&line));
                    out.push('\n');
                }
            }
            Block::Grid(rows) => {
                for row in rows {
                    self.paint_row(row, out);
                }
            }
            Block::Group(children) => {
                for child in children {
                    self.paint_block(child, out);
                }
            }
            Block::Blank => out.push('\n'),
        }
    }

    /// Sense cells on the first line; continuation lines are indented
    /// under the text column.
    fn paint_row(&self, row: &GridRow, out: &mut String) {
        let indent = " ".repeat(sense_columns_width());
        for (index, line) in row.text.split("\n").iter().enumerate() {
            if index == 0 {
                for (cell, column) in row.cells.iter().zip(SENSE_COLUMNS.iter()) {
                    out.push_str(&pad_cell(cell, column));
                }
            } else {
                out.push_str(&indent);
            }
            out.push_str(&paint_text(line));
            out.push('\n');
        }
    }

    /// `── title ─────────`
    fn left_rule(&self, title: &StyledText, style: Option<&Style>) -> String {
        let lead = RULE_CHAR.to_string().repeat(2);
        let used = 2 + 1 + title.plain().chars().count() + 1;
        let fill = RULE_CHAR.to_string().repeat(self.width.saturating_sub(used));

        let mut out = styled_line(&lead, style);
        out.push_str(&format!(" {} ", paint_text(title)));
        out.push_str(&styled_line(&fill, style));
        out
    }

    /// `──────── TITLE ────────`
    fn centered_rule(&self, title: &StyledText, style: Option<&Style>) -> String {
        let title_width = title.plain().chars().count() + 2;
        let remaining = self.width.saturating_sub(title_width);
        let left = remaining / 2;
        let right = remaining - left;

        let mut out = styled_line(&RULE_CHAR.to_string().repeat(left), style);
        out.push_str(&format!(" {} ", paint_text(title)));
        out.push_str(&styled_line(&RULE_CHAR.to_string().repeat(right), style));
        out
    }
}

/// Paints each run of `text` with its own style.
pub fn paint_text(text: &StyledText) -> String {
    text.runs()
        .iter()
        .map(|run| match run.style() {
            Some(style) => paint(run.text(), style).to_string(),
            None => run.text().to_string(),
        })
        .collect()
}

fn styled_line(text: &str, style: Option<&Style>) -> String {
    match style {
        Some(style) => paint(text, style).to_string(),
        None => text.to_string(),
    }
}

fn pad_cell(cell: &StyledText, column: &Column) -> String {
    let used = cell.plain().chars().count();
    let spare = column.width.saturating_sub(used);
    let (left, right) = match column.justify {
        Justify::Left => (0, spare),
        Justify::Center => (spare / 2, spare - spare / 2),
    };
    format!("{}{}{}", " ".repeat(left), paint_text(cell), " ".repeat(right))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_row(cells: [&str; 3], text: &str) -> GridRow {
        GridRow {
            cells: cells.map(StyledText::from),
            text: StyledText::from(text),
        }
    }

    #[test]
    fn test_grid_columns_and_continuation_indent() {
        let painter = Painter::new(40);
        let out = painter.paint_blocks(&[Block::Grid(vec![
            plain_row(["1", "a", "   "], ": to go\n — went home"),
            plain_row([" ", "   ", "(1) "], ": contend"),
        ])]);

        assert_eq!(
            out,
            "1 a     : to go\n         — went home\n    (1) : contend\n"
        );
    }

    #[test]
    fn test_rules_fill_the_width() {
        let painter = Painter::new(20);
        let out = painter.paint_blocks(&[Block::Rule {
            title: StyledText::from("run"),
            style: None,
        }]);
        assert_eq!(out, "── run ─────────────\n");
        assert_eq!(out.trim_end().chars().count(), 20);
    }

    #[test]
    fn test_panel_frames_content() {
        let painter = Painter::new(11);
        let out = painter.paint_panel(
            &StyledText::from("RUN"),
            None,
            &[Block::Text(StyledText::from("a\nb")), Block::Blank],
        );
        assert_eq!(out, "─── RUN ───\na\nb\n\n───────────\n");
    }
}
