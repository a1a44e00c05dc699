//! Behavior of the public API, checked from outside the crate.

use pretty_assertions::assert_eq;
use rgbaterm::{
    Ansi, Color, FormatError, PrintError, RESET, Style, StyleSet, Token,
    ansi_foreground, styled, write_styled, write_styled_fixed,
};

const RED: &str = "\x1B[38;2;255;0;0m";
const BOLD: &str = "\x1B[1m";

/// A spread of colors covering the channel edges.
fn sample_colors() -> Vec<Color> {
    let levels = [0u8, 1, 127, 128, 254, 255];
    let mut colors = vec![];
    for &r in &levels {
        for &g in &levels {
            for &a in &[0u8, 128, 255] {
                colors.push(Color::rgba(r, g, 255 - r, a));
            }
        }
    }
    colors
}

// ============================================================================
// Color
// ============================================================================

#[test]
fn hex_round_trip_preserves_rgb() {
    for c in sample_colors() {
        let back = Color::from_hex(&c.to_hex());
        assert_eq!((back.r(), back.g(), back.b()), (c.r(), c.g(), c.b()));
        assert_eq!(back.a(), 255);
    }
}

#[test]
fn invert_twice_is_identity() {
    for c in sample_colors() {
        assert_eq!(c.invert().invert(), c);
        assert_eq!(c.invert().a(), c.a());
    }
}

#[test]
fn blend_identities() {
    let other = Color::rgba(3, 200, 99, 10);
    for c in sample_colors() {
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(c.blend(&c, t), c);
        }
        assert_eq!(c.blend(&other, 0.0), c);
        assert_eq!(c.blend(&other, 1.0), other);
        assert_eq!(c.blend(&other, -5.0), c);
        assert_eq!(c.blend(&other, 5.0), other);
    }
}

#[test]
fn lighten_darken_endpoints() {
    for c in sample_colors() {
        assert_eq!(c.lighten(0.0), c);
        assert_eq!(c.darken(0.0), c);
        assert_eq!(c.lighten(1.0), Color::rgba(255, 255, 255, c.a()));
        assert_eq!(c.darken(1.0), Color::rgba(0, 0, 0, c.a()));
    }
}

#[test]
fn documented_hex_examples() {
    assert_eq!(Color::from_hex("#FFA500"), Color::rgb(255, 165, 0));
    assert_eq!(Color::from_hex("FA0"), Color::rgb(255, 170, 0));
    assert_eq!(Color::from_hex("not-a-color"), Color::WHITE);
}

#[test]
fn malformed_channels_never_fail() {
    let c = Color::new_rgba("red", -1e9, 1e9, "");
    assert_eq!(c.to_tuple(), (255, 0, 255, 255));
    assert_eq!(Color::new(None::<i32>, "12", 3.6).to_tuple(), (255, 12, 4, 255));
}

#[test]
fn ansi_conversion() {
    let red = Color::new(255, 0, 0);
    assert_eq!(red.to_ansi_foreground(), RED);
    assert_eq!(ansi_foreground(&red), RED);
    assert_eq!(ansi_foreground(&"not a color"), "not a color");
}

#[derive(Debug)]
#[allow(dead_code)]
struct FakeColor {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

#[test]
fn look_alike_is_not_a_color() {
    assert!(!Color::is_color(&FakeColor { r: 1, g: 1, b: 1, a: 1 }));
    assert!(Color::is_color(&Color::new_rgba(1, 1, 1, 1)));
}

// ============================================================================
// Styled lines
// ============================================================================

#[test]
fn bold_red_line() {
    let mut out: Vec<u8> = vec![];
    let bold: StyleSet = [("bold", true)].into_iter().collect();
    write_styled(&mut out, &styled![Color::new(255, 0, 0), bold, "Bold red text!"])
        .unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("{RED}{BOLD}Bold red text!{RESET}\n")
    );
}

#[test]
fn red_line_with_argument() {
    let mut out = String::new();
    write_styled(
        &mut out,
        &styled![Color::new(255, 0, 0), "Red text without %s!", "styles"],
    )
    .unwrap();
    assert_eq!(out, format!("{RED}Red text without styles!{RESET}\n"));
}

#[test]
fn style_order_ignores_caller_order() {
    let styles: StyleSet = "hidden,blink,nonsense,dim".parse().unwrap();
    let mut out = String::new();
    write_styled(&mut out, &[Token::from(styles), Token::from("x")]).unwrap();
    assert_eq!(out, format!("\x1B[2m\x1B[5m\x1B[8mx{RESET}\n"));
}

#[test]
fn one_write_per_line_through_ansi_writer() {
    let mut wtr = Ansi::new(vec![]);
    write_styled(&mut wtr, &styled!["a", "b"]).unwrap();
    write_styled(&mut wtr, &styled![1.5, true]).unwrap();
    assert_eq!(
        String::from_utf8(wtr.into_inner()).unwrap(),
        format!("a{RESET}b{RESET}\n1.5{RESET}true{RESET}\n")
    );
}

#[test]
fn format_fault_propagates_and_writes_nothing() {
    let mut out = String::new();
    let err = write_styled(&mut out, &styled![Style::Bold, "%d items", "many"])
        .unwrap_err();
    match err {
        PrintError::Format(FormatError::BadArgument { position, .. }) => {
            assert_eq!(position, 1)
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(out, "");
}

#[test]
fn fixed_arity_entry_point() {
    let mut out = String::new();
    write_styled_fixed(
        &mut out,
        &Color::from_hex("#F00"),
        Some(&StyleSet::new().with(Style::Bold)),
        "%s=%d",
        &styled!["x", 3],
    )
    .unwrap();
    assert_eq!(out, format!("{RED}{BOLD}x=3{RESET}\n"));
}
