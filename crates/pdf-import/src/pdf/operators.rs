/// Winding rule used to decide the interior of a filled path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// `f`, `B`, `b`
    #[default]
    NonZero,
    /// `f*`, `B*`, `b*`
    EvenOdd,
}

/// A classified content-stream line with its typed operands.
///
/// Coordinates are raw user-space values; the interpreter applies the
/// current transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
    /// `a b c d e f cm`, optionally preceded by `q` on the same line.
    Transform { save: bool, matrix: [f64; 6] },
    /// `q`
    Save,
    /// `Q`, including a `Q` that leads a `cm` line.
    Restore,
    /// `x y m`
    MoveTo([f64; 2]),
    /// `x y l`
    LineTo([f64; 2]),
    /// `x1 y1 x2 y2 x3 y3 c`
    CurveC { c1: [f64; 2], c2: [f64; 2], end: [f64; 2] },
    /// `x2 y2 x3 y3 v` (first control point is the current point)
    CurveV { c2: [f64; 2], end: [f64; 2] },
    /// `x1 y1 x3 y3 y` (second control point is the end point)
    CurveY { c1: [f64; 2], end: [f64; 2] },
    /// `x y width height re`
    Rect { origin: [f64; 2], size: [f64; 2] },
    /// `W n`, `W* n`
    Clip,
    /// `h`
    ClosePath,
    /// `width w`
    SetWidth(f64),
    /// `n`
    NoOp,
    /// `S`, or `s` when `close` is set.
    Stroke { close: bool },
    /// `f`, `F`, `f*`, `F*`
    Fill(FillRule),
    /// `B`, `B*`, or `b`, `b*` when `close` is set.
    FillStroke { close: bool, rule: FillRule },
    /// `r g b RG`
    StrokeColor([f64; 3]),
}

/// Classify one decoded content-stream line.
///
/// A line carries at most one operator. Lines that match nothing, or whose
/// operands are not exactly the expected well-formed numbers, yield `None`.
pub fn classify(line: &str) -> Option<Operator> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&op, operands) = tokens.split_last()?;

    // Combined transform, possibly with a leading save marker. A leading
    // restore claims the line instead.
    if op == "cm" {
        return match operands {
            ["Q", ..] => Some(Operator::Restore),
            ["q", rest @ ..] => numbers::<6>(rest).map(|matrix| Operator::Transform {
                save: true,
                matrix,
            }),
            _ => numbers::<6>(operands).map(|matrix| Operator::Transform {
                save: false,
                matrix,
            }),
        };
    }

    // Save and restore claim the whole line
    match tokens[0] {
        "q" => return Some(Operator::Save),
        "Q" => return Some(Operator::Restore),
        _ => {}
    }

    match op {
        "m" => numbers::<2>(operands).map(Operator::MoveTo),
        "l" => numbers::<2>(operands).map(Operator::LineTo),
        "c" => numbers::<6>(operands).map(|[x1, y1, x2, y2, x3, y3]| Operator::CurveC {
            c1: [x1, y1],
            c2: [x2, y2],
            end: [x3, y3],
        }),
        "v" => numbers::<4>(operands).map(|[x2, y2, x3, y3]| Operator::CurveV {
            c2: [x2, y2],
            end: [x3, y3],
        }),
        "y" => numbers::<4>(operands).map(|[x1, y1, x3, y3]| Operator::CurveY {
            c1: [x1, y1],
            end: [x3, y3],
        }),
        "re" => numbers::<4>(operands).map(|[x, y, w, h]| Operator::Rect {
            origin: [x, y],
            size: [w, h],
        }),
        "W" | "W*" if operands.is_empty() => Some(Operator::Clip),
        "n" => match operands {
            [] => Some(Operator::NoOp),
            ["W"] | ["W*"] => Some(Operator::Clip),
            _ => None,
        },
        "h" if operands.is_empty() => Some(Operator::ClosePath),
        "w" => numbers::<1>(operands)
            .filter(|[w]| *w >= 0.0)
            .map(|[w]| Operator::SetWidth(w)),
        "S" | "SQ" if operands.is_empty() => Some(Operator::Stroke { close: false }),
        "Q" if matches!(operands, ["S"]) => Some(Operator::Stroke { close: false }),
        "s" if operands.is_empty() => Some(Operator::Stroke { close: true }),
        "f" | "F" if operands.is_empty() => Some(Operator::Fill(FillRule::NonZero)),
        "f*" | "F*" if operands.is_empty() => Some(Operator::Fill(FillRule::EvenOdd)),
        "B" if operands.is_empty() => Some(Operator::FillStroke {
            close: false,
            rule: FillRule::NonZero,
        }),
        "B*" if operands.is_empty() => Some(Operator::FillStroke {
            close: false,
            rule: FillRule::EvenOdd,
        }),
        "b" if operands.is_empty() => Some(Operator::FillStroke {
            close: true,
            rule: FillRule::NonZero,
        }),
        "b*" if operands.is_empty() => Some(Operator::FillStroke {
            close: true,
            rule: FillRule::EvenOdd,
        }),
        "RG" => numbers::<3>(operands)
            .filter(|rgb| rgb.iter().all(|c| *c >= 0.0))
            .map(Operator::StrokeColor),
        _ => None,
    }
}

/// Parse exactly `N` numeric operands.
fn numbers<const N: usize>(operands: &[&str]) -> Option<[f64; N]> {
    if operands.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(operands) {
        *slot = parse_number(token)?;
    }
    Some(out)
}

/// Parse a content-stream number: optional sign, digits with at most one
/// decimal point, at least one digit. No exponents.
fn parse_number(token: &str) -> Option<f64> {
    let body = token
        .strip_prefix(|c: char| c == '-' || c == '+')
        .unwrap_or(token);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for b in body.bytes() {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => return None,
        }
    }
    if !seen_digit {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        assert_eq!(
            classify("1 0 0 1 10.5 -20 cm"),
            Some(Operator::Transform {
                save: false,
                matrix: [1.0, 0.0, 0.0, 1.0, 10.5, -20.0],
            })
        );
    }

    #[test]
    fn test_transform_with_save_prefix() {
        assert_eq!(
            classify("q 0.12 0 0 0.12 0 0 cm"),
            Some(Operator::Transform {
                save: true,
                matrix: [0.12, 0.0, 0.0, 0.12, 0.0, 0.0],
            })
        );
    }

    #[test]
    fn test_transform_wrong_arity() {
        assert_eq!(classify("1 0 0 1 10 cm"), None);
        assert_eq!(classify("q q 1 0 0 1 0 0 cm"), None);
    }

    #[test]
    fn test_restore_prefix_on_transform_line() {
        assert_eq!(classify("Q 1 0 0 1 5 5 cm"), Some(Operator::Restore));
        assert_eq!(classify("Q cm"), Some(Operator::Restore));
    }

    #[test]
    fn test_save_restore() {
        assert_eq!(classify("q"), Some(Operator::Save));
        assert_eq!(classify("Q"), Some(Operator::Restore));
        assert_eq!(classify("  Q  "), Some(Operator::Restore));
    }

    #[test]
    fn test_path_construction() {
        assert_eq!(classify("10 10 m"), Some(Operator::MoveTo([10.0, 10.0])));
        assert_eq!(classify("-3.5 .25 l"), Some(Operator::LineTo([-3.5, 0.25])));
        assert_eq!(
            classify("1 2 3 4 5 6 c"),
            Some(Operator::CurveC {
                c1: [1.0, 2.0],
                c2: [3.0, 4.0],
                end: [5.0, 6.0],
            })
        );
        assert_eq!(
            classify("3 4 5 6 v"),
            Some(Operator::CurveV {
                c2: [3.0, 4.0],
                end: [5.0, 6.0],
            })
        );
        assert_eq!(
            classify("1 2 5 6 y"),
            Some(Operator::CurveY {
                c1: [1.0, 2.0],
                end: [5.0, 6.0],
            })
        );
        assert_eq!(
            classify("0 0 10 10 re"),
            Some(Operator::Rect {
                origin: [0.0, 0.0],
                size: [10.0, 10.0],
            })
        );
        assert_eq!(classify("h"), Some(Operator::ClosePath));
    }

    #[test]
    fn test_clip_variants() {
        assert_eq!(classify("W n"), Some(Operator::Clip));
        assert_eq!(classify("W* n"), Some(Operator::Clip));
        assert_eq!(classify("W"), Some(Operator::Clip));
        assert_eq!(classify("W* f"), None);
    }

    #[test]
    fn test_painting_operators() {
        assert_eq!(classify("n"), Some(Operator::NoOp));
        assert_eq!(classify("S"), Some(Operator::Stroke { close: false }));
        assert_eq!(classify("S Q"), Some(Operator::Stroke { close: false }));
        assert_eq!(classify("SQ"), Some(Operator::Stroke { close: false }));
        assert_eq!(classify("s"), Some(Operator::Stroke { close: true }));
        assert_eq!(classify("f"), Some(Operator::Fill(FillRule::NonZero)));
        assert_eq!(classify("F"), Some(Operator::Fill(FillRule::NonZero)));
        assert_eq!(classify("f*"), Some(Operator::Fill(FillRule::EvenOdd)));
        assert_eq!(
            classify("B*"),
            Some(Operator::FillStroke {
                close: false,
                rule: FillRule::EvenOdd,
            })
        );
        assert_eq!(
            classify("b"),
            Some(Operator::FillStroke {
                close: true,
                rule: FillRule::NonZero,
            })
        );
    }

    #[test]
    fn test_stroke_width() {
        assert_eq!(classify("0.5 w"), Some(Operator::SetWidth(0.5)));
        assert_eq!(classify("-1 w"), None);
        assert_eq!(classify("w"), None);
    }

    #[test]
    fn test_stroke_color() {
        assert_eq!(
            classify("1 0 0.5 RG"),
            Some(Operator::StrokeColor([1.0, 0.0, 0.5]))
        );
        assert_eq!(classify("1 0 RG"), None);
        // Non-stroking color is not a layer boundary
        assert_eq!(classify("1 0 0 rg"), None);
    }

    #[test]
    fn test_malformed_operands_fail_whole_line() {
        assert_eq!(classify("10 abc m"), None);
        assert_eq!(classify("1e3 0 l"), None);
        assert_eq!(classify("1.2.3 0 l"), None);
        assert_eq!(classify("-- 0 l"), None);
        assert_eq!(classify("10 10 10 m"), None);
    }

    #[test]
    fn test_unrelated_lines_ignored() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("BT"), None);
        assert_eq!(classify("/F1 12 Tf"), None);
        assert_eq!(classify("(hello) Tj"), None);
        assert_eq!(classify("h h"), None);
    }

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("+2.5"), Some(2.5));
        assert_eq!(parse_number("3."), Some(3.0));
        assert_eq!(parse_number("-.5"), Some(-0.5));
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("-"), None);
    }
}
