//! The segment table: every cut and fold line of the box net as formulas.
//!
//! The table is data, kept in `assets/packlib_box.cs` in PackLib listing
//! syntax and parsed once on first use. The listing is hand-written: 152
//! records for the lid wrap, lid board, base wrap and base board, each placed
//! at the origin or at P1/P2/P3. It approximates the full PackLib box, which
//! runs to about 400 segments. `dieline table` turns it into JSON for review.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::expr::Expr;

/// The built-in, hand-written listing: rigid set-up box, lid and base.
pub const PACKLIB_LISTING: &str = include_str!("../assets/packlib_box.cs");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SegmentKind {
    Cut,
    Fold,
}

impl SegmentKind {
    /// Layer id in the SVG output.
    pub fn layer_id(self) -> &'static str {
        match self {
            SegmentKind::Cut => "CUT",
            SegmentKind::Fold => "FOLD",
        }
    }

    fn from_line_type(name: &str) -> Option<Self> {
        match name {
            "ltCut" => Some(SegmentKind::Cut),
            "ltFold" => Some(SegmentKind::Fold),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub kind: SegmentKind,
    pub x0: Expr,
    pub y0: Expr,
    pub x1: Expr,
    pub y1: Expr,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentTable {
    pub segments: Vec<SegmentSpec>,
}

static ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([xy][01])\s*=\s*(.+?)\s*;$").expect("static regex"));
static ADD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AddSegment\s*\(\s*(\w+)\s*,").expect("static regex"));

static BUILTIN: LazyLock<Result<SegmentTable, TableError>> =
    LazyLock::new(|| SegmentTable::from_listing(PACKLIB_LISTING));

impl SegmentTable {
    /// The table compiled from the embedded listing, shared read-only.
    pub fn builtin() -> Result<&'static SegmentTable> {
        BUILTIN.as_ref().map_err(|e| e.clone().into())
    }

    /// Parse a PackLib listing: `x0 = …;` `y0 = …;` `x1 = …;` `y1 = …;`
    /// followed by `AddSegment(ltCut|ltFold, …)`.
    pub fn from_listing(src: &str) -> Result<SegmentTable, TableError> {
        let mut segments = Vec::new();
        let mut buf: [Option<Expr>; 4] = [None, None, None, None];
        for (idx, text) in src.lines().enumerate() {
            let line_no = idx + 1;
            let line = match text.find("//") {
                Some(cut) => &text[..cut],
                None => text,
            }
            .trim();
            if line.is_empty() {
                continue;
            }
            if let Some(caps) = ASSIGN_RE.captures(line) {
                let slot = match &caps[1] {
                    "x0" => 0,
                    "y0" => 1,
                    "x1" => 2,
                    _ => 3,
                };
                let e = Expr::parse(&caps[2]).map_err(|m| TableError::new(line_no, m))?;
                buf[slot] = Some(e);
            } else if let Some(caps) = ADD_RE.captures(line) {
                let kind = SegmentKind::from_line_type(&caps[1]).ok_or_else(|| {
                    TableError::new(line_no, format!("unknown line type `{}`", &caps[1]))
                })?;
                let [x0, y0, x1, y1] = std::mem::take(&mut buf);
                let missing = |name: &str| {
                    TableError::new(line_no, format!("AddSegment without a value for {name}"))
                };
                segments.push(SegmentSpec {
                    kind,
                    x0: x0.ok_or_else(|| missing("x0"))?,
                    y0: y0.ok_or_else(|| missing("y0"))?,
                    x1: x1.ok_or_else(|| missing("x1"))?,
                    y1: y1.ok_or_else(|| missing("y1"))?,
                });
            }
        }
        if segments.is_empty() {
            return Err(TableError::new(0, "listing contains no AddSegment calls"));
        }
        tracing::debug!(count = segments.len(), "parsed segment listing");
        Ok(SegmentTable { segments })
    }

    pub fn from_json(txt: &str) -> Result<SegmentTable> {
        let table: SegmentTable = serde_json::from_str(txt)?;
        if table.segments.is_empty() {
            return Err(TableError::new(0, "table contains no segments").into());
        }
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn count(&self, kind: SegmentKind) -> usize {
        self.segments.iter().filter(|s| s.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::{DerivedQuantities, Symbol};
    use crate::error::DielineError;
    use crate::params::BoxParameters;

    const TWO: &str = "
        // comment line
        x0 = R1 + H3;
        y0 = R1;
        x1 = R1 + H3 + V3; // trailing comment
        y1 = 0;
        list.AddSegment(ltCut, x0, y0, x1, y1);
        x0 = 0;
        y0 = 0;
        x1 = L3;
        y1 = 0;
        y0 = R1;
        AddSegment(ltFold, x0, y0, x1, y1);
    ";

    #[test]
    fn parses_listing_statements() {
        let t = SegmentTable::from_listing(TWO).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.segments[0].kind, SegmentKind::Cut);
        assert_eq!(t.segments[0].x1.to_string(), "R1 + H3 + V3");
        assert_eq!(t.segments[1].kind, SegmentKind::Fold);
        // later assignment wins within one segment block
        assert_eq!(t.segments[1].y0, Expr::Var(Symbol::R1));
    }

    #[test]
    fn reports_line_numbers() {
        let src = "x0 = 1;\ny0 = 2;\nx1 = Q;\ny1 = 3;\nAddSegment(ltCut, x0, y0, x1, y1);";
        let err = SegmentTable::from_listing(src).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("unknown symbol"));

        let src = "x0 = 1;\ny0 = 2;\nx1 = 3;\nAddSegment(ltCut, x0, y0, x1, y1);";
        let err = SegmentTable::from_listing(src).unwrap_err();
        assert_eq!(err.line, 4);
        assert!(err.message.contains("y1"));

        let src = "x0 = 1;\ny0 = 2;\nx1 = 3;\ny1 = 4;\nAddSegment(ltPerf, x0, y0, x1, y1);";
        let err = SegmentTable::from_listing(src).unwrap_err();
        assert!(err.message.contains("ltPerf"));

        assert!(SegmentTable::from_listing("// nothing here").is_err());
    }

    #[test]
    fn builtin_table_has_all_components() {
        let t = SegmentTable::builtin().unwrap();
        assert_eq!(t.len(), 152);
        assert_eq!(t.count(SegmentKind::Cut), 112);
        assert_eq!(t.count(SegmentKind::Fold), 40);
        // lid wrap at the origin, then the lid board, base wrap and base board
        let placed_at = |anchor: &str| {
            t.segments
                .iter()
                .filter(|s| s.x0.to_string().contains(anchor))
                .count()
        };
        assert_eq!(placed_at("P1x"), 32);
        assert_eq!(placed_at("P2x"), 44);
        assert_eq!(placed_at("P3x"), 32);
        assert!(PACKLIB_LISTING.starts_with("// Rigid set-up box"));
    }

    #[test]
    fn json_form_evaluates_identically() {
        let t = SegmentTable::builtin().unwrap();
        let json = t.to_json().unwrap();
        assert!(json.contains("\"kind\": \"CUT\""));
        let back = SegmentTable::from_json(&json).unwrap();
        let q = DerivedQuantities::from_params(&BoxParameters {
            l: 120.0,
            b: 90.0,
            h: 35.0,
            r: 8.0,
            ep: 2.0,
        });
        for (a, b) in t.segments.iter().zip(&back.segments) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.x0.eval(&q), b.x0.eval(&q));
            assert_eq!(a.y1.eval(&q), b.y1.eval(&q));
        }
    }

    #[test]
    fn empty_json_table_is_rejected() {
        let err = SegmentTable::from_json(r#"{"segments":[]}"#).unwrap_err();
        assert!(matches!(err, DielineError::Table(_)));
        assert!(matches!(
            SegmentTable::from_json("not json"),
            Err(DielineError::Json(_))
        ));
    }
}
