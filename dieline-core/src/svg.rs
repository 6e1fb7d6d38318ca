//! Small text helpers shared by the SVG writers.

use crate::geom::Affine;

/// Millimetre value as SVG text: at most three decimals, trailing zeros and
/// the sign of negative zero dropped, so output is stable across platforms.
pub fn fmt_mm(v: f64) -> String {
    let mut s = format!("{:.3}", v);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// `matrix(a b c d e f)` with [`fmt_mm`] numbers.
pub fn fmt_matrix(t: &Affine) -> String {
    format!(
        "matrix({} {} {} {} {} {})",
        fmt_mm(t.a),
        fmt_mm(t.b),
        fmt_mm(t.c),
        fmt_mm(t.d),
        fmt_mm(t.e),
        fmt_mm(t.f)
    )
}

pub fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_numbers() {
        assert_eq!(fmt_mm(100.0), "100");
        assert_eq!(fmt_mm(1.5), "1.5");
        assert_eq!(fmt_mm(2.0004), "2");
        assert_eq!(fmt_mm(0.1 + 0.2), "0.3");
        assert_eq!(fmt_mm(-0.0), "0");
        assert_eq!(fmt_mm(-0.0001), "0");
        assert_eq!(fmt_mm(-12.25), "-12.25");
    }

    #[test]
    fn matrix_of_quarter_turn() {
        let t = Affine::rotate(90.0).then(&Affine::translate(10.0, 5.5));
        assert_eq!(fmt_matrix(&t), "matrix(0 1 -1 0 10 5.5)");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(svg_escape("a<b & \"c\">"), "a&lt;b &amp; &quot;c&quot;&gt;");
    }
}
