//! ANSI escape sequence functionality for truecolor terminal output.
//!
//! This module provides low-level ANSI escape sequence generation for
//! [`Color`] and [`StyleSet`] values. Only 24-bit truecolor sequences are
//! emitted; callers are responsible for knowing that the target terminal
//! understands them.

use std::any::Any;
use std::fmt;
use std::io;

use crate::{Color, StyleSet};

/// The escape sequence that resets all colors and styles.
pub const RESET: &str = "\x1B[0m";

/// Writes the truecolor escape sequence for `color`.
///
/// If `bg` is true, then the color is treated as a background color.
/// Otherwise, it's treated as a foreground color. Alpha is ignored.
///
/// The caller must provide their own `io::Write` to write to.
pub fn write_color<W: io::Write>(
    mut wtr: W,
    color: &Color,
    bg: bool,
) -> io::Result<()> {
    write!(wtr, "{}", AnsiColor { color: *color, bg })
}

/// Writes the escape sequences of every active style in `styles`.
///
/// Nothing is written for an empty set.
pub fn write_styles<W: io::Write>(
    mut wtr: W,
    styles: &StyleSet,
) -> io::Result<()> {
    for style in styles.iter() {
        wtr.write_all(style.code().as_bytes())?;
    }
    Ok(())
}

/// Returns the foreground escape sequence for `value` if it is a [`Color`].
///
/// Any other value is rendered with its `Display` implementation and no
/// escape sequence at all.
pub fn ansi_foreground<T: Any + fmt::Display>(value: &T) -> String {
    ansi_or_display(value, false)
}

/// Returns the background escape sequence for `value` if it is a [`Color`].
///
/// Any other value is rendered with its `Display` implementation.
pub fn ansi_background<T: Any + fmt::Display>(value: &T) -> String {
    ansi_or_display(value, true)
}

fn ansi_or_display<T: Any + fmt::Display>(value: &T, bg: bool) -> String {
    let any: &dyn Any = value;
    match any.downcast_ref::<Color>() {
        Some(&color) => AnsiColor { color, bg }.to_string(),
        None => value.to_string(),
    }
}

/// A color that can be formatted to a truecolor ANSI escape sequence.
///
/// This is created by [`AnsiColor::foreground`] or
/// [`AnsiColor::background`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AnsiColor {
    color: Color,
    bg: bool,
}

impl AnsiColor {
    /// Formats `color` as a foreground color, `ESC[38;2;R;G;Bm`.
    pub fn foreground(color: Color) -> AnsiColor {
        AnsiColor { color, bg: false }
    }

    /// Formats `color` as a background color, `ESC[48;2;R;G;Bm`.
    pub fn background(color: Color) -> AnsiColor {
        AnsiColor { color, bg: true }
    }
}

impl fmt::Display for AnsiColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, _) = self.color.to_tuple();
        if self.bg {
            write!(f, "\x1B[48;2;{r};{g};{b}m")
        } else {
            write!(f, "\x1B[38;2;{r};{g};{b}m")
        }
    }
}
