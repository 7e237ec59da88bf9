//! Decodes a CSI `m` parameter list into `vt_msg::SgrAttribute`s.
//!
//! Grounded on the code table `icy_engine`'s ANSI parser applies inline in
//! its `'m'` arm (`crates/icy_engine/src/parsers/ansi/mod.rs`), extended with
//! the xterm extended-color (`38`/`48`/`58`) and colon-subparameter forms
//! that BBS-art ANSI never needed.

use vt_msg::{Color, Intensity, SgrAttribute, SubParams, UnderlineStyle};

/// `38`/`48`/`58` accept either the legacy semicolon form (`38;5;n` /
/// `38;2;r;g;b`, three-to-five independent top-level parameters) or the
/// colon-subparameter form (`38:5:n` / `38:2::r:g:b`, one parameter whose
/// `values` holds the whole group). `i` is advanced past whatever it
/// consumed in the semicolon case.
fn decode_extended_color(params: &[SubParams], i: &mut usize) -> Color {
    let cur = &params[*i];
    if cur.colon_separated || cur.values.len() > 1 {
        return match cur.values.get(1).copied().unwrap_or(0) {
            5 => Color::Indexed(cur.values.get(2).copied().unwrap_or(0) as u8),
            2 => {
                let rest = &cur.values[2.min(cur.values.len())..];
                match rest.len() {
                    4 => Color::Rgb(rest[1] as u8, rest[2] as u8, rest[3] as u8),
                    3 => Color::Rgb(rest[0] as u8, rest[1] as u8, rest[2] as u8),
                    _ => Color::Default,
                }
            }
            _ => Color::Default,
        };
    }

    let next = |i: &usize| params.get(*i).and_then(SubParams::first).unwrap_or(0);
    *i += 1;
    match next(i) {
        5 => {
            *i += 1;
            Color::Indexed(next(i) as u8)
        }
        2 => {
            let r = params.get(*i + 1).and_then(SubParams::first).unwrap_or(0) as u8;
            let g = params.get(*i + 2).and_then(SubParams::first).unwrap_or(0) as u8;
            let b = params.get(*i + 3).and_then(SubParams::first).unwrap_or(0) as u8;
            *i += 3;
            Color::Rgb(r, g, b)
        }
        _ => Color::Default,
    }
}

fn underline_style_from_subparam(p: &SubParams) -> UnderlineStyle {
    match p.values.get(1).copied() {
        Some(0) => UnderlineStyle::None,
        Some(2) => UnderlineStyle::Double,
        Some(3) => UnderlineStyle::Curly,
        Some(4) => UnderlineStyle::Dotted,
        Some(5) => UnderlineStyle::Dashed,
        _ => UnderlineStyle::Single,
    }
}

pub fn decode_sgr(params: &[SubParams]) -> Vec<SgrAttribute> {
    if params.is_empty() {
        return vec![SgrAttribute::Reset];
    }

    let mut out = Vec::with_capacity(params.len());
    let mut i = 0;
    while i < params.len() {
        let code = params[i].first().unwrap_or(0);
        match code {
            0 => out.push(SgrAttribute::Reset),
            1 => out.push(SgrAttribute::Intensity(Intensity::Bold)),
            2 => out.push(SgrAttribute::Intensity(Intensity::Faint)),
            3 => out.push(SgrAttribute::Italic(true)),
            4 => out.push(SgrAttribute::Underline(underline_style_from_subparam(&params[i]))),
            5 => out.push(SgrAttribute::Blink(vt_msg::Blink::Slow)),
            6 => out.push(SgrAttribute::Blink(vt_msg::Blink::Rapid)),
            7 => out.push(SgrAttribute::Inverse(true)),
            8 => out.push(SgrAttribute::Concealed(true)),
            9 => out.push(SgrAttribute::CrossedOut(true)),
            10..=19 => out.push(SgrAttribute::Font((code - 10) as u8)),
            20 => out.push(SgrAttribute::Fraktur),
            21 => out.push(SgrAttribute::Underline(UnderlineStyle::Double)),
            22 => out.push(SgrAttribute::Intensity(Intensity::Normal)),
            23 => out.push(SgrAttribute::Italic(false)),
            24 => out.push(SgrAttribute::Underline(UnderlineStyle::None)),
            25 => out.push(SgrAttribute::Blink(vt_msg::Blink::Off)),
            26 => out.push(SgrAttribute::ProportionalSpacing(true)),
            27 => out.push(SgrAttribute::Inverse(false)),
            28 => out.push(SgrAttribute::Concealed(false)),
            29 => out.push(SgrAttribute::CrossedOut(false)),
            30..=37 => out.push(SgrAttribute::Foreground(Color::Named((code - 30) as u8))),
            38 => {
                let c = decode_extended_color(params, &mut i);
                out.push(SgrAttribute::Foreground(c));
            }
            39 => out.push(SgrAttribute::Foreground(Color::Default)),
            40..=47 => out.push(SgrAttribute::Background(Color::Named((code - 40) as u8))),
            48 => {
                let c = decode_extended_color(params, &mut i);
                out.push(SgrAttribute::Background(c));
            }
            49 => out.push(SgrAttribute::Background(Color::Default)),
            50 => out.push(SgrAttribute::ProportionalSpacing(false)),
            51 => out.push(SgrAttribute::Framed(true)),
            52 => out.push(SgrAttribute::Encircled(true)),
            53 => out.push(SgrAttribute::Overlined(true)),
            54 => {
                out.push(SgrAttribute::Framed(false));
                out.push(SgrAttribute::Encircled(false));
            }
            55 => out.push(SgrAttribute::Overlined(false)),
            58 => {
                let c = decode_extended_color(params, &mut i);
                out.push(SgrAttribute::UnderlineColor(c));
            }
            59 => out.push(SgrAttribute::UnderlineColor(Color::Default)),
            60 => out.push(SgrAttribute::IdeogramUnderline),
            61 => out.push(SgrAttribute::IdeogramDoubleUnderline),
            62 => out.push(SgrAttribute::IdeogramOverline),
            63 => out.push(SgrAttribute::IdeogramDoubleOverline),
            64 => out.push(SgrAttribute::IdeogramStress),
            65 => out.push(SgrAttribute::IdeogramAttributesOff),
            73 => out.push(SgrAttribute::Superscript(true)),
            74 => out.push(SgrAttribute::Subscript(true)),
            75 => {
                out.push(SgrAttribute::Superscript(false));
                out.push(SgrAttribute::Subscript(false));
            }
            90..=97 => out.push(SgrAttribute::Foreground(Color::Named((code - 90 + 8) as u8))),
            100..=107 => out.push(SgrAttribute::Background(Color::Named((code - 100 + 8) as u8))),
            _ => log::debug!("ignoring unrecognized SGR code {code}"),
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_means_reset() {
        assert_eq!(decode_sgr(&[]), vec![SgrAttribute::Reset]);
    }

    #[test]
    fn bold_and_foreground_combine() {
        let params = vec![SubParams::single(1), SubParams::single(31)];
        let out = decode_sgr(&params);
        assert_eq!(
            out,
            vec![
                SgrAttribute::Intensity(Intensity::Bold),
                SgrAttribute::Foreground(Color::Named(1)),
            ]
        );
    }

    #[test]
    fn semicolon_extended_rgb_foreground() {
        let params = vec![
            SubParams::single(38),
            SubParams::single(2),
            SubParams::single(10),
            SubParams::single(20),
            SubParams::single(30),
        ];
        let out = decode_sgr(&params);
        assert_eq!(out, vec![SgrAttribute::Foreground(Color::Rgb(10, 20, 30))]);
    }

    #[test]
    fn colon_extended_indexed_background() {
        let params = vec![SubParams {
            values: vec![48, 5, 201],
            colon_separated: true,
        }];
        let out = decode_sgr(&params);
        assert_eq!(out, vec![SgrAttribute::Background(Color::Indexed(201))]);
    }

    #[test]
    fn colon_underline_style() {
        let params = vec![SubParams {
            values: vec![4, 3],
            colon_separated: true,
        }];
        assert_eq!(
            decode_sgr(&params),
            vec![SgrAttribute::Underline(UnderlineStyle::Curly)]
        );
    }
}
