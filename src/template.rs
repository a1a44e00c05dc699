//! printf-style rendering of format templates.
//!
//! A template is plain text with `%` specifiers of the form
//! `%[flags][width][.precision]conversion`. The supported flags are
//! `-`, `+`, space, `#` and `0`. The supported conversions are:
//!
//! * `d`, `i`, `u` - signed decimal integer.
//! * `c` - the character with the given code point.
//! * `o`, `x`, `X` - octal and hexadecimal integer.
//! * `e`, `E`, `f`, `F`, `g`, `G` - floating point.
//! * `s` - the argument's string form.
//!
//! `%%` is a literal percent sign and consumes no argument. Width and
//! precision are at most 99.

use std::iter::{self, Peekable};
use std::str::CharIndices;

use crate::console::{Token, Value};

/// An error from rendering a format template.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum FormatError {
    /// The template has more specifiers than there are arguments.
    #[error("missing argument #{position} for '{spec}'")]
    MissingArgument {
        /// 1-based argument position.
        position: usize,
        /// The specifier text, e.g. `%5d`.
        spec: String,
    },
    /// An argument can't be converted for its specifier.
    #[error("bad argument #{position} for '{spec}': expected {expected}, got {found}")]
    BadArgument {
        /// 1-based argument position.
        position: usize,
        /// The specifier text, e.g. `%5d`.
        spec: String,
        /// What the specifier needs.
        expected: &'static str,
        /// What was given instead.
        found: String,
    },
    /// A `%` is not followed by a supported conversion.
    #[error("invalid conversion '{spec}' in format template")]
    InvalidConversion {
        /// The specifier text up to and including the offending character.
        spec: String,
    },
}

/// Counts the specifiers in `template`.
///
/// Every `%` followed by a character other than `%` counts as one
/// specifier. `%%` counts as none, and so does a `%` at the very end.
pub fn count_specifiers(template: &str) -> usize {
    let mut count = 0;
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.next() {
                Some('%') | None => {}
                Some(_) => count += 1,
            }
        }
    }
    count
}

/// Renders `template`, consuming `args` from left to right.
///
/// Arguments left over once every specifier is rendered are ignored.
pub fn render(template: &str, args: &[Token]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut position = 0;
    let mut rest = template;
    while let Some(i) = rest.find('%') {
        out.push_str(&rest[..i]);
        rest = &rest[i + 1..];
        if let Some(after) = rest.strip_prefix('%') {
            out.push('%');
            rest = after;
            continue;
        }
        let (spec, after) = Spec::parse(rest)?;
        rest = after;
        position += 1;
        let arg = args.next().ok_or_else(|| FormatError::MissingArgument {
            position,
            spec: spec.spec_text(),
        })?;
        spec.render(arg, position, &mut out)?;
    }
    out.push_str(rest);
    Ok(out)
}

/// The largest width or precision a specifier may ask for.
const MAX_FIELD: usize = 99;

/// One parsed `%` specifier. `text` is everything after the `%`.
#[derive(Debug)]
struct Spec<'t> {
    text: &'t str,
    left: bool,
    plus: bool,
    space: bool,
    alt: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

impl<'t> Spec<'t> {
    /// Parses a specifier from `s`, which starts just after the `%`.
    ///
    /// Returns the specifier and the text following it.
    fn parse(s: &'t str) -> Result<(Spec<'t>, &'t str), FormatError> {
        let mut spec = Spec {
            text: "",
            left: false,
            plus: false,
            space: false,
            alt: false,
            zero: false,
            width: 0,
            precision: None,
            conversion: '\0',
        };
        let mut chars = s.char_indices().peekable();
        while let Some(&(_, c)) = chars.peek() {
            match c {
                '-' => spec.left = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '#' => spec.alt = true,
                '0' => spec.zero = true,
                _ => break,
            }
            chars.next();
        }
        let invalid = |end: usize| FormatError::InvalidConversion {
            spec: format!("%{}", &s[..end]),
        };
        let offset = |chars: &mut Peekable<CharIndices<'_>>| {
            chars.peek().map_or(s.len(), |&(i, _)| i)
        };
        spec.width = take_number(&mut chars);
        if spec.width > MAX_FIELD {
            return Err(invalid(offset(&mut chars)));
        }
        if chars.next_if(|&(_, c)| c == '.').is_some() {
            let precision = take_number(&mut chars);
            if precision > MAX_FIELD {
                return Err(invalid(offset(&mut chars)));
            }
            spec.precision = Some(precision);
        }
        let (i, c) = chars.next().ok_or_else(|| invalid(s.len()))?;
        let end = i + c.len_utf8();
        if !"diucoxXeEfFgGs".contains(c) {
            return Err(invalid(end));
        }
        spec.conversion = c;
        spec.text = &s[..end];
        Ok((spec, &s[end..]))
    }

    fn render(
        &self,
        arg: &Token,
        position: usize,
        out: &mut String,
    ) -> Result<(), FormatError> {
        match self.conversion {
            'd' | 'i' | 'u' => {
                let n = self.integer(arg, position)?;
                let digits = self.min_digits(n.unsigned_abs().to_string());
                let sign = self.sign(n < 0);
                self.pad(out, sign, "", &digits, self.precision.is_none());
            }
            'c' => {
                let n = self.integer(arg, position)?;
                let c = u32::try_from(n)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.bad(position, "character code", n.to_string()))?;
                self.pad(out, "", "", c.encode_utf8(&mut [0; 4]), false);
            }
            'o' | 'x' | 'X' => {
                // Negative numbers are printed as their two's complement.
                let n = self.integer(arg, position)? as u64;
                let digits = match self.conversion {
                    'o' => format!("{n:o}"),
                    'x' => format!("{n:x}"),
                    _ => format!("{n:X}"),
                };
                let digits = self.min_digits(digits);
                let prefix = match self.conversion {
                    'o' if self.alt && !digits.starts_with('0') => "0",
                    'x' if self.alt && n != 0 => "0x",
                    'X' if self.alt && n != 0 => "0X",
                    _ => "",
                };
                self.pad(out, "", prefix, &digits, self.precision.is_none());
            }
            'e' | 'E' | 'f' | 'F' | 'g' | 'G' => {
                let x = self.float(arg, position)?;
                let sign = self.sign(x.is_sign_negative() && !x.is_nan());
                let upper = self.conversion.is_ascii_uppercase();
                if !x.is_finite() {
                    let body = match (x.is_nan(), upper) {
                        (true, false) => "nan",
                        (true, true) => "NAN",
                        (false, false) => "inf",
                        (false, true) => "INF",
                    };
                    self.pad(out, sign, "", body, false);
                } else {
                    let body = self.float_body(x.abs(), upper);
                    self.pad(out, sign, "", &body, true);
                }
            }
            's' => {
                let text = arg.to_string();
                let text = match self.precision {
                    Some(p) => text.chars().take(p).collect(),
                    None => text,
                };
                self.pad(out, "", "", &text, false);
            }
            _ => unreachable!("conversion is validated by Spec::parse"),
        }
        Ok(())
    }

    fn float_body(&self, x: f64, upper: bool) -> String {
        let precision = self.precision.unwrap_or(6);
        let mut body = match self.conversion.to_ascii_lowercase() {
            'f' => {
                let mut s = format!("{x:.precision$}");
                if self.alt && precision == 0 {
                    s.push('.');
                }
                s
            }
            'e' => exponent_form(x, precision, self.alt),
            _ => general_form(x, precision, self.alt),
        };
        if upper {
            body.make_ascii_uppercase();
        }
        body
    }

    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        }
    }

    /// Applies an integer precision, the minimum number of digits.
    fn min_digits(&self, digits: String) -> String {
        match self.precision {
            Some(0) if digits == "0" => String::new(),
            Some(p) if digits.len() < p => {
                format!("{}{digits}", "0".repeat(p - digits.len()))
            }
            _ => digits,
        }
    }

    fn pad(
        &self,
        out: &mut String,
        sign: &str,
        prefix: &str,
        body: &str,
        zero_allowed: bool,
    ) {
        let len = sign.len() + prefix.len() + body.chars().count();
        let fill = self.width.saturating_sub(len);
        let zeros = !self.left && self.zero && zero_allowed;
        if !self.left && !zeros {
            out.extend(iter::repeat_n(' ', fill));
        }
        out.push_str(sign);
        out.push_str(prefix);
        if zeros {
            out.extend(iter::repeat_n('0', fill));
        }
        out.push_str(body);
        if self.left {
            out.extend(iter::repeat_n(' ', fill));
        }
    }

    fn integer(&self, arg: &Token, position: usize) -> Result<i64, FormatError> {
        let expected = "number with an integer representation";
        let n = match *arg {
            Token::Value(Value::Int(n)) => Some(n),
            Token::Value(Value::Float(x)) => float_to_int(x),
            Token::Text(ref s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float_to_int))
            }
            _ => None,
        };
        n.ok_or_else(|| self.bad(position, expected, describe(arg)))
    }

    fn float(&self, arg: &Token, position: usize) -> Result<f64, FormatError> {
        let x = match *arg {
            Token::Value(Value::Int(n)) => Some(n as f64),
            Token::Value(Value::Float(x)) => Some(x),
            Token::Text(ref s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        x.ok_or_else(|| self.bad(position, "number", describe(arg)))
    }

    fn bad(&self, position: usize, expected: &'static str, found: String) -> FormatError {
        FormatError::BadArgument {
            position,
            spec: self.spec_text(),
            expected,
            found,
        }
    }

    fn spec_text(&self) -> String {
        format!("%{}", self.text)
    }
}

fn take_number(chars: &mut Peekable<CharIndices<'_>>) -> usize {
    let mut n: usize = 0;
    while let Some(d) = chars.peek().and_then(|&(_, c)| c.to_digit(10)) {
        n = n.saturating_mul(10).saturating_add(d as usize);
        chars.next();
    }
    n
}

fn describe(arg: &Token) -> String {
    match *arg {
        Token::Text(ref s) => format!("text '{s}'"),
        _ => arg.kind().to_string(),
    }
}

fn float_to_int(x: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or beyond it overflows i64.
    let in_range = x >= -9_223_372_036_854_775_808.0 && x < 9_223_372_036_854_775_808.0;
    (x.fract() == 0.0 && in_range).then_some(x as i64)
}

/// `%e` formatting: one digit, `precision` decimals, and an exponent with a
/// sign and at least two digits.
fn exponent_form(x: f64, precision: usize, alt: bool) -> String {
    let s = format!("{x:.precision$e}");
    let (mantissa, exp) = s.split_once('e').unwrap_or((s.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    let dot = if alt && precision == 0 { "." } else { "" };
    format!("{mantissa}{dot}e{sign}{:02}", exp.unsigned_abs())
}

/// `%g` formatting: `%e` or `%f`, whichever suits the exponent, with
/// trailing zeros removed unless `alt` is set.
fn general_form(x: f64, precision: usize, alt: bool) -> String {
    let p = precision.max(1);
    let exp = if x == 0.0 {
        0
    } else {
        let digits = p - 1;
        let s = format!("{x:.digits$e}");
        s.split_once('e').and_then(|(_, e)| e.parse::<i64>().ok()).unwrap_or(0)
    };
    let mut s = if exp < -4 || exp >= p as i64 {
        exponent_form(x, p - 1, alt)
    } else {
        let decimals = (p as i64 - 1 - exp) as usize;
        let mut s = format!("{x:.decimals$}");
        if alt && decimals == 0 {
            s.push('.');
        }
        s
    };
    if !alt {
        let (mantissa, exp_part) = match s.find('e') {
            Some(i) => s.split_at(i),
            None => (s.as_str(), ""),
        };
        if mantissa.contains('.') {
            let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
            s = format!("{trimmed}{exp_part}");
        }
    }
    s
}
