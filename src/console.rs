//! Composition of styled console lines.
//!
//! A styled line is described by a sequence of [`Token`]s. The sequence is
//! scanned once, left to right, while tracking a current color and a current
//! set of styles:
//!
//! * A [`Token::Color`] replaces the current color.
//! * A [`Token::Styles`] replaces the current styles.
//! * A [`Token::Text`] is a format template (see [`crate::template`]). It
//!   consumes as many of the following tokens as it has specifiers, and is
//!   rendered as one segment.
//! * A [`Token::Value`] is rendered as one segment using its `Display` form.
//!
//! Every segment is written as the current color, the current styles, the
//! text and a reset code. The color and styles carry over to later segments,
//! but the reset means nothing ever bleeds past the end of a segment.
//!
//! ```rust,no_run
//! use rgbaterm::{Color, Style, StyleSet};
//!
//! # fn main() -> Result<(), rgbaterm::PrintError> {
//! let red = Color::rgb(255, 0, 0);
//! rgbaterm::print_styled!(red, StyleSet::new().with(Style::Bold), "Bold red text!")?;
//! rgbaterm::print_styled!(red, "Red text without %s!", "styles")?;
//! # Ok(()) }
//! ```

use std::fmt;
use std::io;

use crate::ansi::{AnsiColor, RESET};
use crate::template::{FormatError, count_specifiers, render};
use crate::writers::StandardStream;
use crate::{Color, Style, StyleSet, WriteLine};

/// A plain value that is printed or used as a template argument.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// `true` or `false`.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
        }
    }
}

/// One element of a styled line.
///
/// Every Rust value that can appear in a styled line converts into a token
/// with `From`, which is what the [`styled!`](crate::styled) macro relies on.
/// Strings always become [`Token::Text`].
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Sets the foreground color of the following segments.
    Color(Color),
    /// Sets the styles of the following segments.
    Styles(StyleSet),
    /// A format template, or a string argument when consumed by one.
    Text(String),
    /// A value printed as its own segment, or an argument when consumed by a
    /// template.
    Value(Value),
}

impl Token {
    /// A short description of what kind of token this is.
    pub fn kind(&self) -> &'static str {
        match *self {
            Token::Color(_) => "color",
            Token::Styles(_) => "style set",
            Token::Text(_) => "text",
            Token::Value(Value::Bool(_)) => "boolean",
            Token::Value(Value::Int(_)) => "integer",
            Token::Value(Value::Float(_)) => "float",
        }
    }
}

/// The generic string form of a token.
///
/// Colors display as `rgba(R, G, B, A)` and style sets as their escape
/// codes.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Token::Color(ref c) => fmt::Display::fmt(c, f),
            Token::Styles(ref s) => fmt::Display::fmt(s, f),
            Token::Text(ref s) => f.write_str(s),
            Token::Value(ref v) => fmt::Display::fmt(v, f),
        }
    }
}

impl From<Color> for Token {
    fn from(color: Color) -> Token {
        Token::Color(color)
    }
}

impl From<StyleSet> for Token {
    fn from(styles: StyleSet) -> Token {
        Token::Styles(styles)
    }
}

impl From<Style> for Token {
    fn from(style: Style) -> Token {
        Token::Styles(StyleSet::new().with(style))
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Token {
        Token::Text(s.to_string())
    }
}

impl From<&String> for Token {
    fn from(s: &String) -> Token {
        Token::Text(s.clone())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Token {
        Token::Text(s)
    }
}

impl From<Value> for Token {
    fn from(value: Value) -> Token {
        Token::Value(value)
    }
}

impl From<bool> for Token {
    fn from(b: bool) -> Token {
        Token::Value(Value::Bool(b))
    }
}

macro_rules! token_from_int {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Token {
                fn from(n: $ty) -> Token {
                    Token::Value(Value::Int(i64::from(n)))
                }
            }
        )+
    };
}

token_from_int!(u8, u16, u32, i8, i16, i32, i64);

impl From<f32> for Token {
    fn from(x: f32) -> Token {
        Token::Value(Value::Float(f64::from(x)))
    }
}

impl From<f64> for Token {
    fn from(x: f64) -> Token {
        Token::Value(Value::Float(x))
    }
}

/// An error from printing a styled line.
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    /// A template couldn't be rendered with its arguments.
    #[error("failed to format styled line: {0}")]
    Format(#[from] FormatError),
    /// The line couldn't be written.
    #[error("failed to write styled line: {0}")]
    Io(#[from] io::Error),
}

/// Accumulates segments under the current color and style prefixes.
#[derive(Debug, Default)]
struct Composer {
    color: String,
    styles: String,
    line: String,
    segments: usize,
}

impl Composer {
    fn segment(&mut self, text: &str) {
        self.line.push_str(&self.color);
        self.line.push_str(&self.styles);
        self.line.push_str(text);
        self.line.push_str(RESET);
        self.segments += 1;
    }

    fn finish(self) -> String {
        tracing::trace!(
            segments = self.segments,
            len = self.line.len(),
            "composed styled line"
        );
        self.line
    }
}

/// Composes a styled line from `tokens`, without a trailing newline.
///
/// See the [module documentation](self) for how tokens are interpreted.
/// A template with more specifiers than there are tokens left fails with
/// [`FormatError::MissingArgument`].
pub fn compose(tokens: &[Token]) -> Result<String, FormatError> {
    let mut composer = Composer::default();
    let mut rest = tokens;
    while let Some((token, tail)) = rest.split_first() {
        rest = tail;
        match *token {
            Token::Color(ref color) => {
                composer.color = AnsiColor::foreground(*color).to_string();
            }
            Token::Styles(ref styles) => {
                composer.styles = styles.to_string();
            }
            Token::Text(ref template) => {
                let wanted = count_specifiers(template);
                let (args, tail) = rest.split_at(wanted.min(rest.len()));
                rest = tail;
                composer.segment(&render(template, args)?);
            }
            Token::Value(ref value) => composer.segment(&value.to_string()),
        }
    }
    Ok(composer.finish())
}

/// Composes a single segment from a color, optional styles and a template.
///
/// Every argument in `args` is available to the template; arguments beyond
/// the number of specifiers are ignored.
pub fn compose_fixed(
    color: &Color,
    styles: Option<&StyleSet>,
    template: &str,
    args: &[Token],
) -> Result<String, FormatError> {
    let mut composer = Composer {
        color: AnsiColor::foreground(*color).to_string(),
        styles: styles.map(StyleSet::to_string).unwrap_or_default(),
        ..Composer::default()
    };
    composer.segment(&render(template, args)?);
    Ok(composer.finish())
}

/// Writes the styled line described by `tokens` to `wtr`.
pub fn write_styled<W: WriteLine + ?Sized>(
    wtr: &mut W,
    tokens: &[Token],
) -> Result<(), PrintError> {
    let line = compose(tokens)?;
    wtr.write_line(&line)?;
    Ok(())
}

/// Writes a fixed-arity styled line to `wtr`. See [`compose_fixed`].
pub fn write_styled_fixed<W: WriteLine + ?Sized>(
    wtr: &mut W,
    color: &Color,
    styles: Option<&StyleSet>,
    template: &str,
    args: &[Token],
) -> Result<(), PrintError> {
    let line = compose_fixed(color, styles, template, args)?;
    wtr.write_line(&line)?;
    Ok(())
}

/// Prints the styled line described by `tokens` to standard output.
///
/// The line and its newline are written with a single write.
pub fn print_styled(tokens: &[Token]) -> Result<(), PrintError> {
    write_styled(&mut StandardStream::stdout(), tokens)
}

/// Prints a fixed-arity styled line to standard output. See
/// [`compose_fixed`].
pub fn print_styled_fixed(
    color: &Color,
    styles: Option<&StyleSet>,
    template: &str,
    args: &[Token],
) -> Result<(), PrintError> {
    write_styled_fixed(
        &mut StandardStream::stdout(),
        color,
        styles,
        template,
        args,
    )
}

/// Builds a `Vec<Token>` from a list of values.
///
/// Every value is converted with `Token::from`.
#[macro_export]
macro_rules! styled {
    ($($token:expr),* $(,)?) => {
        vec![$($crate::Token::from($token)),*]
    };
}

/// Prints a styled line built from a list of values to standard output.
///
/// This is shorthand for `print_styled(&styled![...])`.
#[macro_export]
macro_rules! print_styled {
    ($($token:expr),* $(,)?) => {
        $crate::print_styled(&$crate::styled![$($token),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styled;
    use pretty_assertions::assert_eq;

    const RED: &str = "\x1B[38;2;255;0;0m";
    const BOLD: &str = "\x1B[1m";

    #[test]
    fn color_and_styles_prefix_a_segment() {
        let tokens = styled![
            Color::rgb(255, 0, 0),
            StyleSet::new().with(Style::Bold),
            "Bold red text!",
        ];
        assert_eq!(
            compose(&tokens).unwrap(),
            format!("{RED}{BOLD}Bold red text!{RESET}")
        );
    }

    #[test]
    fn template_consumes_its_arguments() {
        let tokens = styled![Color::rgb(255, 0, 0), "Red text without %s!", "styles"];
        assert_eq!(
            compose(&tokens).unwrap(),
            format!("{RED}Red text without styles!{RESET}")
        );
    }

    #[test]
    fn prefixes_carry_over_between_segments() {
        let tokens = styled!["a", Color::rgb(255, 0, 0), "b", Style::Bold, "c", 7];
        assert_eq!(
            compose(&tokens).unwrap(),
            format!("a{RESET}{RED}b{RESET}{RED}{BOLD}c{RESET}{RED}{BOLD}7{RESET}")
        );
    }

    #[test]
    fn later_styles_replace_earlier_ones() {
        let tokens = styled![Style::Bold, Style::Italic, "x"];
        assert_eq!(compose(&tokens).unwrap(), format!("\x1B[3mx{RESET}"));
    }

    #[test]
    fn consumed_arguments_are_not_interpreted() {
        // The color is an argument here, so it is printed, not applied.
        let tokens = styled!["%s|%d", Color::rgb(1, 2, 3), 4, "tail"];
        assert_eq!(
            compose(&tokens).unwrap(),
            format!("rgba(1, 2, 3, 255)|4{RESET}tail{RESET}")
        );
    }

    #[test]
    fn short_argument_list_is_an_error() {
        let tokens = styled!["%s and %s", "one"];
        assert_eq!(
            compose(&tokens).unwrap_err(),
            FormatError::MissingArgument { position: 2, spec: "%s".to_string() }
        );
    }

    #[test]
    fn oversized_field_is_an_error() {
        let tokens = styled!["%.99999999999999999999d", 1];
        assert_eq!(
            compose(&tokens).unwrap_err(),
            FormatError::InvalidConversion {
                spec: "%.99999999999999999999".to_string()
            }
        );
    }

    #[test]
    fn empty_sequence_is_empty_line() {
        assert_eq!(compose(&[]).unwrap(), "");
    }

    #[test]
    fn fixed_arity() {
        let red = Color::rgb(255, 0, 0);
        let bold = StyleSet::new().with(Style::Bold);
        assert_eq!(
            compose_fixed(&red, Some(&bold), "%d%%", &styled![99, "ignored"]).unwrap(),
            format!("{RED}{BOLD}99%{RESET}")
        );
        assert_eq!(
            compose_fixed(&red, None, "plain", &[]).unwrap(),
            format!("{RED}plain{RESET}")
        );
    }

    #[test]
    fn write_styled_appends_one_newline() {
        let mut buf: Vec<u8> = vec![];
        write_styled(&mut buf, &styled![Color::rgb(255, 0, 0), "hi"]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{RED}hi{RESET}\n"));
    }

    #[test]
    fn token_kinds() {
        let kinds: Vec<&str> = styled![Color::BLACK, Style::Dim, "t", true, 1, 1.5]
            .iter()
            .map(Token::kind)
            .collect();
        assert_eq!(kinds, ["color", "style set", "text", "boolean", "integer", "float"]);
    }
}
