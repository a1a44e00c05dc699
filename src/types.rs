use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::ansi::AnsiColor;

/// A loosely typed input for one color channel.
///
/// Channel inputs are converted with a "never fail" policy: anything that
/// cannot be read as a number becomes 255, and every number is clamped into
/// `[0, 255]` and rounded to the nearest byte.
///
/// Text is trimmed and accepts decimal or float syntax, as well as
/// hexadecimal integers with a `0x` prefix.
#[derive(Clone, Debug, PartialEq)]
pub enum Channel {
    /// A numeric value, possibly out of range or fractional.
    Number(f64),
    /// A numeric-looking string such as `"128"`, `" 12.5 "` or `"0x7f"`.
    Text(String),
    /// No value was given.
    Missing,
}

impl Channel {
    /// The value used when a channel can't be converted to a number.
    pub const FALLBACK: u8 = 255;

    /// Resolves this input to a byte.
    ///
    /// A missing input is the 255 default and is not reported.
    pub fn to_u8(&self) -> u8 {
        let n = match *self {
            Channel::Missing => return Channel::FALLBACK,
            Channel::Number(n) => Some(n).filter(|n| !n.is_nan()),
            Channel::Text(ref s) => parse_number(s),
        };
        match n {
            Some(n) => clamp_channel(n),
            None => {
                tracing::debug!(input = ?self, "unconvertible color channel, using 255");
                Channel::FALLBACK
            }
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if let Some(hex) =
        digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X"))
    {
        // `from_str_radix` would accept a second sign.
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let n = u64::from_str_radix(hex, 16).ok()? as f64;
        return Some(if negative { -n } else { n });
    }
    // Only digit syntax counts, not "inf", "infinity" or "nan".
    if !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Clamps a numeric channel into `[0, 255]`, rounding half up.
fn clamp_channel(n: f64) -> u8 {
    if n.is_nan() {
        return Channel::FALLBACK;
    }
    n.round().clamp(0.0, 255.0) as u8
}

macro_rules! channel_from_number {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Channel {
                fn from(n: $ty) -> Channel {
                    Channel::Number(n as f64)
                }
            }
        )+
    };
}

channel_from_number!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl From<&str> for Channel {
    fn from(s: &str) -> Channel {
        Channel::Text(s.to_string())
    }
}

impl From<String> for Channel {
    fn from(s: String) -> Channel {
        Channel::Text(s)
    }
}

impl<T: Into<Channel>> From<Option<T>> for Channel {
    fn from(value: Option<T>) -> Channel {
        value.map_or(Channel::Missing, Into::into)
    }
}

/// An RGBA color with byte channels.
///
/// Every channel is always within `[0, 255]`: constructors clamp their input
/// and every transform returns a freshly clamped color. Colors are plain
/// `Copy` values and are never mutated in place.
///
/// The `Display` implementation renders the same text as
/// [`Color::to_rgba_string`]. The `FromStr` implementation is the strict form
/// of [`Color::from_hex`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// The default is opaque white.
impl Default for Color {
    fn default() -> Color {
        Color::WHITE
    }
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Creates an opaque color from loosely typed channel inputs.
    ///
    /// This never fails. Unconvertible inputs fall back to 255 and numbers
    /// are clamped into `[0, 255]`.
    pub fn new(
        r: impl Into<Channel>,
        g: impl Into<Channel>,
        b: impl Into<Channel>,
    ) -> Color {
        Color::new_rgba(r, g, b, Channel::Missing)
    }

    /// Creates a color from loosely typed channel inputs, including alpha.
    ///
    /// An alpha that is missing or unconvertible becomes 255.
    pub fn new_rgba(
        r: impl Into<Channel>,
        g: impl Into<Channel>,
        b: impl Into<Channel>,
        a: impl Into<Channel>,
    ) -> Color {
        Color {
            r: r.into().to_u8(),
            g: g.into().to_u8(),
            b: b.into().to_u8(),
            a: a.into().to_u8(),
        }
    }

    /// Creates an opaque color from bytes.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }

    /// Creates a color from bytes.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    fn from_f64(r: f64, g: f64, b: f64, a: f64) -> Color {
        Color {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_channel(a),
        }
    }

    /// Returns true if and only if `value` is a `Color`.
    ///
    /// This is a nominal check: a different type with the same fields is not
    /// a color.
    pub fn is_color(value: &dyn Any) -> bool {
        value.is::<Color>()
    }

    /// The red channel.
    pub fn r(&self) -> u8 {
        self.r
    }

    /// The green channel.
    pub fn g(&self) -> u8 {
        self.g
    }

    /// The blue channel.
    pub fn b(&self) -> u8 {
        self.b
    }

    /// The alpha channel. 255 is fully opaque.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Returns the channels as an `(r, g, b, a)` tuple.
    pub fn to_tuple(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    /// Parses a hex color, falling back to opaque white.
    ///
    /// Accepts an optional leading `#` followed by exactly six (`RRGGBB`) or
    /// exactly three (`RGB`) hex digits. In the short form every digit is
    /// doubled, so `FA0` is `FFAA00`. The parsed color is always opaque.
    pub fn from_hex(text: &str) -> Color {
        match Color::try_from_hex(text) {
            Ok(color) => color,
            Err(err) => {
                tracing::debug!(%err, "falling back to white");
                Color::WHITE
            }
        }
    }

    /// Parses a hex color, returning an error if `text` isn't one.
    ///
    /// See [`Color::from_hex`] for the accepted forms.
    pub fn try_from_hex(text: &str) -> Result<Color, ParseHexError> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        let err = || ParseHexError { given: text.to_string() };
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
        match digits.len() {
            6 => Ok(Color::rgb(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            )),
            3 => {
                // Each digit d stands for the byte 0xdd.
                let short = |s: &str| byte(s).map(|n| n * 0x11);
                Ok(Color::rgb(
                    short(&digits[0..1])?,
                    short(&digits[1..2])?,
                    short(&digits[2..3])?,
                ))
            }
            _ => Err(err()),
        }
    }

    /// Formats this color as `#RRGGBB` with uppercase digits. Alpha is
    /// dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Formats this color as `rgba(R, G, B, A)`.
    pub fn to_rgba_string(&self) -> String {
        self.to_string()
    }

    /// Returns the 24-bit foreground escape sequence, `ESC[38;2;R;G;Bm`.
    ///
    /// Alpha is ignored since ANSI truecolor has no alpha channel.
    pub fn to_ansi_foreground(&self) -> String {
        AnsiColor::foreground(*self).to_string()
    }

    /// Returns the 24-bit background escape sequence, `ESC[48;2;R;G;Bm`.
    pub fn to_ansi_background(&self) -> String {
        AnsiColor::background(*self).to_string()
    }

    /// Linearly interpolates every channel, alpha included, towards `other`.
    ///
    /// `t` is clamped into `[0, 1]`; NaN is treated as 0. `t = 0` returns
    /// `self` and `t = 1` returns `other`.
    pub fn blend(&self, other: &Color, t: f64) -> Color {
        let t = clamp_unit(t);
        let mix = |from: u8, to: u8| {
            let from = f64::from(from);
            from + (f64::from(to) - from) * t
        };
        Color::from_f64(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Inverts the color channels. Alpha is preserved.
    pub fn invert(&self) -> Color {
        Color::rgba(255 - self.r, 255 - self.g, 255 - self.b, self.a)
    }

    /// Blends towards white, keeping this color's alpha.
    pub fn lighten(&self, factor: f64) -> Color {
        let white = Color::rgba(255, 255, 255, self.a);
        self.blend(&white, clamp_unit(factor))
    }

    /// Blends towards black, keeping this color's alpha.
    pub fn darken(&self, factor: f64) -> Color {
        let black = Color::rgba(0, 0, 0, self.a);
        self.blend(&black, clamp_unit(factor))
    }
}

fn clamp_unit(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Color, ParseHexError> {
        Color::try_from_hex(s)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Color {
        Color::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Color {
        Color::rgba(r, g, b, a)
    }
}

/// An error from parsing an invalid hex color.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error(
    "unrecognized hex color '{given}', should be '#RRGGBB' or '#RGB' \
     (the '#' is optional)"
)]
pub struct ParseHexError {
    given: String,
}

impl ParseHexError {
    /// Return the string that couldn't be parsed as a hex color.
    pub fn invalid(&self) -> &str {
        &self.given
    }
}

/// A text style with a fixed ANSI SGR code.
///
/// The declaration order is the order in which active styles are emitted.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Style {
    Reset,
    Bold,
    Dim,
    Italic,
    Underline,
    Blink,
    Reverse,
    Hidden,
}

/// Name and escape code of every style, indexed by `Style as usize`.
static STYLE_TABLE: [(Style, &str, &str); 8] = [
    (Style::Reset, "reset", "\x1B[0m"),
    (Style::Bold, "bold", "\x1B[1m"),
    (Style::Dim, "dim", "\x1B[2m"),
    (Style::Italic, "italic", "\x1B[3m"),
    (Style::Underline, "underline", "\x1B[4m"),
    (Style::Blink, "blink", "\x1B[5m"),
    (Style::Reverse, "reverse", "\x1B[7m"),
    (Style::Hidden, "hidden", "\x1B[8m"),
];

impl Style {
    /// Every style in declaration order.
    pub const ALL: [Style; 8] = [
        Style::Reset,
        Style::Bold,
        Style::Dim,
        Style::Italic,
        Style::Underline,
        Style::Blink,
        Style::Reverse,
        Style::Hidden,
    ];

    /// The lowercase name of this style, e.g. `"underline"`.
    pub fn name(self) -> &'static str {
        STYLE_TABLE[self as usize].1
    }

    /// The ANSI escape sequence that turns this style on.
    pub fn code(self) -> &'static str {
        STYLE_TABLE[self as usize].2
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Style, ParseStyleError> {
        STYLE_TABLE
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(style, _, _)| style)
            .ok_or_else(|| ParseStyleError { unknown_style: s.to_string() })
    }
}

/// An error that occurs when parsing a `Style` fails.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error(
    "unrecognized style '{unknown_style}': valid styles are: reset, bold, \
     dim, italic, underline, blink, reverse, hidden"
)]
pub struct ParseStyleError {
    unknown_style: String,
}

impl ParseStyleError {
    /// Return the string that couldn't be parsed as a style.
    pub fn invalid_style(&self) -> &str {
        &self.unknown_style
    }
}

/// A set of text styles, each either on or off.
///
/// Styles are always emitted in [`Style`] declaration order, regardless of
/// the order they were set in. Building a set from names silently ignores
/// names that aren't styles.
///
/// The `Display` implementation writes the escape codes of every active
/// style. The `FromStr` implementation reads a comma separated list of style
/// names such as `"bold,underline"`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct StyleSet {
    active: [bool; 8],
}

impl StyleSet {
    /// Create a new style set with no active styles.
    pub fn new() -> StyleSet {
        StyleSet::default()
    }

    /// Returns this set with `style` turned on.
    pub fn with(mut self, style: Style) -> StyleSet {
        self.active[style as usize] = true;
        self
    }

    /// Set whether `style` is active.
    pub fn set(&mut self, style: Style, yes: bool) -> &mut StyleSet {
        self.active[style as usize] = yes;
        self
    }

    /// Set whether the style called `name` is active.
    ///
    /// Unknown names are ignored.
    pub fn set_named(&mut self, name: &str, yes: bool) -> &mut StyleSet {
        if let Ok(style) = name.trim().parse::<Style>() {
            self.set(style, yes);
        }
        self
    }

    /// Get whether `style` is active.
    pub fn is_set(&self, style: Style) -> bool {
        self.active[style as usize]
    }

    /// Returns the active styles in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Style> + '_ {
        Style::ALL.into_iter().filter(move |&style| self.is_set(style))
    }

    /// Returns true if no style is active.
    pub fn is_none(&self) -> bool {
        !self.active.iter().any(|&yes| yes)
    }

    /// Turns every style off.
    pub fn clear(&mut self) {
        self.active = [false; 8];
    }
}

impl<S: AsRef<str>> FromIterator<(S, bool)> for StyleSet {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> StyleSet {
        let mut set = StyleSet::new();
        for (name, yes) in iter {
            set.set_named(name.as_ref(), yes);
        }
        set
    }
}

impl FromIterator<Style> for StyleSet {
    fn from_iter<I: IntoIterator<Item = Style>>(iter: I) -> StyleSet {
        iter.into_iter().fold(StyleSet::new(), StyleSet::with)
    }
}

impl FromStr for StyleSet {
    type Err = Infallible;

    fn from_str(spec: &str) -> Result<StyleSet, Infallible> {
        Ok(spec
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| (part, true))
            .collect())
    }
}

impl fmt::Display for StyleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|style| f.write_str(style.code()))
    }
}
