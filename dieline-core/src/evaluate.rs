use float_cmp::approx_eq;
use serde::{Deserialize, Serialize};

use crate::derive::DerivedQuantities;
use crate::geom::Point;
use crate::table::{SegmentKind, SegmentTable};

/// Endpoints closer than this (mm, per axis) are the same point.
pub const SEGMENT_EPSILON: f64 = 1e-9;

/// A resolved line of the net, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Segment {
    pub fn start(&self) -> Point {
        Point {
            x: self.x0,
            y: self.y0,
        }
    }

    pub fn end(&self) -> Point {
        Point {
            x: self.x1,
            y: self.y1,
        }
    }

    pub fn length(&self) -> f64 {
        (self.x1 - self.x0).hypot(self.y1 - self.y0)
    }

    pub fn is_degenerate(&self) -> bool {
        same_coord(self.x0, self.x1) && same_coord(self.y0, self.y1)
    }
}

fn same_coord(a: f64, b: f64) -> bool {
    approx_eq!(f64, a, b, epsilon = SEGMENT_EPSILON, ulps = 4)
}

/// Resolve every table entry against `q`, in table order, dropping the ones
/// that collapse to a point.
pub fn evaluate_segments(table: &SegmentTable, q: &DerivedQuantities) -> Vec<Segment> {
    let mut out = Vec::with_capacity(table.len());
    for spec in &table.segments {
        let seg = Segment {
            kind: spec.kind,
            x0: spec.x0.eval(q),
            y0: spec.y0.eval(q),
            x1: spec.x1.eval(q),
            y1: spec.y1.eval(q),
        };
        if !seg.is_degenerate() {
            out.push(seg);
        }
    }
    tracing::debug!(
        kept = out.len(),
        dropped = table.len() - out.len(),
        "evaluated segment table"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use crate::params::BoxParameters;
    use crate::table::SegmentSpec;

    fn params(ep: f64) -> BoxParameters {
        BoxParameters {
            l: 100.0,
            b: 80.0,
            h: 40.0,
            r: 5.0,
            ep,
        }
    }

    fn spec(kind: SegmentKind, x0: &str, y0: &str, x1: &str, y1: &str) -> SegmentSpec {
        SegmentSpec {
            kind,
            x0: Expr::parse(x0).unwrap(),
            y0: Expr::parse(y0).unwrap(),
            x1: Expr::parse(x1).unwrap(),
            y1: Expr::parse(y1).unwrap(),
        }
    }

    #[test]
    fn builtin_table_has_no_degenerate_segments_for_common_boards() {
        let table = SegmentTable::builtin().unwrap();
        for ep in [1.0, 1.5, 2.0, 2.5] {
            let q = DerivedQuantities::from_params(&params(ep));
            let segs = evaluate_segments(table, &q);
            assert_eq!(segs.len(), table.len(), "ep={ep}");
            assert!(segs.iter().all(|s| s.length() > SEGMENT_EPSILON));
        }
    }

    #[test]
    fn collapsed_slots_are_dropped() {
        // V = ep - 0.45 is the width of the tab slots; at 0.45 they vanish
        let table = SegmentTable::builtin().unwrap();
        let q = DerivedQuantities::from_params(&params(0.45));
        let segs = evaluate_segments(table, &q);
        assert_eq!(segs.len(), table.len() - 8);
        assert!(segs.iter().all(|s| !s.is_degenerate()));
    }

    #[test]
    fn keeps_tiny_but_real_segments() {
        let table = SegmentTable {
            segments: vec![
                spec(SegmentKind::Cut, "0", "0", "0.000001", "0"),
                spec(SegmentKind::Cut, "H", "B", "H", "B"),
                spec(SegmentKind::Fold, "0.1 + 0.2", "1", "0.3", "1"),
                spec(SegmentKind::Fold, "0", "0", "0", "L"),
            ],
        };
        let q = DerivedQuantities::from_params(&params(1.5));
        let segs = evaluate_segments(&table, &q);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].kind, SegmentKind::Cut);
        assert_eq!(segs[0].x1, 0.000001);
        assert_eq!(segs[1].kind, SegmentKind::Fold);
        assert_eq!(segs[1].y1, 100.0);
    }

    #[test]
    fn preserves_table_order() {
        let table = SegmentTable::builtin().unwrap();
        let q = DerivedQuantities::from_params(&params(1.5));
        let segs = evaluate_segments(table, &q);
        for (seg, spec) in segs.iter().zip(&table.segments) {
            assert_eq!(seg.kind, spec.kind);
            assert_eq!(seg.x0, spec.x0.eval(&q));
        }
    }
}
