/*!
This crate provides an RGBA color value type that renders as 24-bit ANSI
escape sequences, and a small routine for printing styled lines to a
terminal.

Colors never fail to construct: out of range channels are clamped, and
anything that can't be read as a number falls back to 255. Colors convert to
`#RRGGBB` hex, `rgba(R, G, B, A)` text and truecolor escape sequences, and can
be blended, inverted, lightened and darkened. All arithmetic is naive
per-channel arithmetic in RGBA space.

# Organization

`Color` is the value type. `Style` and `StyleSet` describe text styles such as
bold or underline.

A styled line is a sequence of `Token`s (colors, style sets, format templates
and plain values) that is composed into a single string by `compose` and
printed to standard output by `print_styled`. See the `console` module for how
the tokens are interpreted, and the `template` module for the supported
format specifiers.

The `WriteLine` trait describes where lines go. `StandardStream` writes to
stdout or stderr, `Ansi` wraps any `io::Write`, and `Vec<u8>` and `String`
collect lines in memory.

# Example

```rust,no_run
use rgbaterm::{Color, Style, StyleSet};

# fn main() -> Result<(), rgbaterm::PrintError> {
let orange = Color::from_hex("#FFA500");
assert_eq!(orange.to_ansi_foreground(), "\x1B[38;2;255;165;0m");

let faded = orange.lighten(0.5);
let bold = StyleSet::new().with(Style::Bold);
rgbaterm::print_styled!(orange, bold, "%d%% done", 50, faded, " (almost)")?;
# Ok(()) }
```
*/

pub mod ansi;
pub mod console;
pub mod template;
mod traits;
mod types;
mod writers;

// Re-export core traits and types
pub use ansi::{AnsiColor, RESET, ansi_background, ansi_foreground};
pub use console::{
    PrintError, Token, Value, compose, compose_fixed, print_styled,
    print_styled_fixed, write_styled, write_styled_fixed,
};
pub use template::FormatError;
pub use traits::WriteLine;
pub use types::{
    Channel, Color, ParseHexError, ParseStyleError, Style, StyleSet,
};
pub use writers::{Ansi, StandardStream};
