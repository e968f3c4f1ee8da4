// src/core/color.rs

use crate::core::styled_text::Style;
use anyhow::{Context, Result, anyhow};
use colored::{Color, ColoredString, Colorize};

/// Parses a color word (e.g. `"red"`, `"bright_cyan"`, `"grey42"`, `"#ff8800"`).
pub fn parse_color_name(name: &str) -> Result<Color> {
    let name = name.to_lowercase();
    let color = match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "bright_black" => Color::BrightBlack,
        "bright_red" => Color::BrightRed,
        "bright_green" => Color::BrightGreen,
        "bright_yellow" => Color::BrightYellow,
        "bright_blue" => Color::BrightBlue,
        "bright_magenta" => Color::BrightMagenta,
        "bright_cyan" => Color::BrightCyan,
        "bright_white" => Color::BrightWhite,
        other => {
            if let Some(hex_digits) = other.strip_prefix('#') {
                return parse_hex(hex_digits);
            }
            if let Some(level) = other
                .strip_prefix("grey")
                .or_else(|| other.strip_prefix("gray"))
            {
                return parse_grey(level);
            }
            return Err(anyhow!("Unknown color token: '{}'", name));
        }
    };
    Ok(color)
}

fn parse_hex(digits: &str) -> Result<Color> {
    let bytes = hex::decode(digits).with_context(|| format!("Invalid hex color '#{}'", digits))?;
    match bytes.as_slice() {
        [r, g, b] => Ok(Color::TrueColor {
            r: *r,
            g: *g,
            b: *b,
        }),
        _ => Err(anyhow!("Hex color '#{}' must have exactly 6 digits", digits)),
    }
}

/// `greyNN` is a percentage of white, `grey0` being black and `grey100` white.
fn parse_grey(level: &str) -> Result<Color> {
    let percent: u16 = level
        .parse()
        .with_context(|| format!("Invalid grey level '{}'", level))?;
    if percent > 100 {
        return Err(anyhow!("Grey level {} is above 100", percent));
    }
    let value = u8::try_from(percent * 255 / 100).unwrap_or(u8::MAX);
    Ok(Color::TrueColor {
        r: value,
        g: value,
        b: value,
    })
}

/// Applies a style descriptor to `text`.
///
/// Words are applied left to right, so a later color replaces an earlier one.
/// `on <color>` sets the background. Unknown words are logged and ignored.
pub fn paint(text: &str, style: &Style) -> ColoredString {
    let mut painted = text.normal();
    let mut words = style.as_str().split_whitespace();

    while let Some(word) = words.next() {
        painted = match word {
            "bold" => painted.bold(),
            "italic" => painted.italic(),
            "underline" => painted.underline(),
            "dim" => painted.dimmed(),
            "strike" | "strikethrough" => painted.strikethrough(),
            "reverse" => painted.reversed(),
            "blink" => painted.blink(),
            "none" | "default" => painted,
            "on" => match words.next().map(parse_color_name) {
                Some(Ok(background)) => painted.on_color(background),
                Some(Err(err)) => {
                    log::warn!("{} in style '{}'.", err, style);
                    painted
                }
                None => {
                    log::warn!("Missing background color after 'on' in style '{}'.", style);
                    painted
                }
            },
            color_word => match parse_color_name(color_word) {
                Ok(color) => painted.color(color),
                Err(err) => {
                    log::warn!("{} in style '{}'.", err, style);
                    painted
                }
            },
        };
    }
    painted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_and_bright_colors() {
        assert_eq!(parse_color_name("Blue").unwrap(), Color::Blue);
        assert_eq!(parse_color_name("bright_white").unwrap(), Color::BrightWhite);
        assert!(parse_color_name("chartreuse").is_err());
    }

    #[test]
    fn test_grey_and_hex_colors() {
        assert_eq!(
            parse_color_name("grey100").unwrap(),
            Color::TrueColor {
                r: 255,
                g: 255,
                b: 255
            }
        );
        assert_eq!(
            parse_color_name("#ff8000").unwrap(),
            Color::TrueColor {
                r: 255,
                g: 128,
                b: 0
            }
        );
        assert!(parse_color_name("grey101").is_err());
        assert!(parse_color_name("#fff").is_err());
    }

    #[test]
    fn test_paint_applies_every_word() {
        colored::control::set_override(true);
        let style = Style::parse("bold italic cyan on black").unwrap();
        let painted = paint("word", &style);

        assert_eq!(painted.fgcolor, Some(Color::Cyan));
        assert_eq!(painted.bgcolor, Some(Color::Black));
        assert_eq!(painted.input, "word");
    }
}
