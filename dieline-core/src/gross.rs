//! Outer ("gross") size of the finished box, as printed on the label.

use float_cmp::approx_eq;
use serde::Serialize;

use crate::params::BoxParameters;

/// Board gauges with a known wrap allowance, and the millimetres they add
/// to length and width.
const GAUGE_ALLOWANCE: [(f64, f64); 3] = [(1.0, 6.0), (1.5, 8.0), (2.0, 10.0)];

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GrossDimensions {
    pub l: f64,
    pub b: f64,
    pub h: f64,
}

/// Length and width grow by the allowance of the board gauge (nothing for
/// gauges outside the table); height always grows by one board thickness.
pub fn gross_dimensions(p: &BoxParameters) -> GrossDimensions {
    let add = GAUGE_ALLOWANCE
        .iter()
        .find(|(gauge, _)| approx_eq!(f64, *gauge, p.ep, epsilon = 1e-6))
        .map(|(_, add)| *add)
        .unwrap_or(0.0);
    GrossDimensions {
        l: p.l + add,
        b: p.b + add,
        h: p.h + p.ep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gross(ep: f64) -> GrossDimensions {
        gross_dimensions(&BoxParameters {
            l: 100.0,
            b: 80.0,
            h: 40.0,
            r: 5.0,
            ep,
        })
    }

    #[test]
    fn known_gauges() {
        assert_eq!(gross(1.0), GrossDimensions { l: 106.0, b: 86.0, h: 41.0 });
        assert_eq!(gross(1.5), GrossDimensions { l: 108.0, b: 88.0, h: 41.5 });
        assert_eq!(gross(2.0), GrossDimensions { l: 110.0, b: 90.0, h: 42.0 });
    }

    #[test]
    fn other_gauges_only_grow_in_height() {
        assert_eq!(gross(0.8), GrossDimensions { l: 100.0, b: 80.0, h: 40.8 });
        assert_eq!(gross(3.0).l, 100.0);
    }

    #[test]
    fn gauge_match_tolerates_rounding() {
        assert_eq!(gross(0.1 * 15.0).l, 108.0);
    }
}
