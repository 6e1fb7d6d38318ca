//! Intermediate quantities of the box net.
//!
//! Naming follows the legacy listing: index 1 is the base (wrap + board),
//! index 2 the lid board, index 3 the lid wrap. `L`-named quantities run
//! along the x axis of the flat net and carry the box width `B`; the
//! `B`-named ones run along y and carry the box length `L`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::params::BoxParameters;

/// Fixed gap between the components laid out side by side (mm).
pub const PLACEMENT_PITCH: f64 = 30.0;
/// Corner tab length of the wraps (mm).
pub const TAB_LENGTH: f64 = 12.0;
/// Chamfer of the wrap tabs and board flaps (mm).
pub const TAB_CHAMFER: f64 = 3.0;

/// Every name a segment formula may reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    L,
    B,
    H,
    R,
    Ep,
    H1,
    H2,
    H3,
    L1,
    L2,
    L3,
    B1,
    B2,
    B3,
    R1,
    V,
    V1,
    V2,
    V3,
    Pdp,
    P1x,
    P1y,
    P2x,
    P2y,
    P3x,
    P3y,
}

impl Symbol {
    pub const ALL: [Symbol; 26] = [
        Symbol::L,
        Symbol::B,
        Symbol::H,
        Symbol::R,
        Symbol::Ep,
        Symbol::H1,
        Symbol::H2,
        Symbol::H3,
        Symbol::L1,
        Symbol::L2,
        Symbol::L3,
        Symbol::B1,
        Symbol::B2,
        Symbol::B3,
        Symbol::R1,
        Symbol::V,
        Symbol::V1,
        Symbol::V2,
        Symbol::V3,
        Symbol::Pdp,
        Symbol::P1x,
        Symbol::P1y,
        Symbol::P2x,
        Symbol::P2y,
        Symbol::P3x,
        Symbol::P3y,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Symbol::L => "L",
            Symbol::B => "B",
            Symbol::H => "H",
            Symbol::R => "R",
            Symbol::Ep => "Ep",
            Symbol::H1 => "H1",
            Symbol::H2 => "H2",
            Symbol::H3 => "H3",
            Symbol::L1 => "L1",
            Symbol::L2 => "L2",
            Symbol::L3 => "L3",
            Symbol::B1 => "B1",
            Symbol::B2 => "B2",
            Symbol::B3 => "B3",
            Symbol::R1 => "R1",
            Symbol::V => "V",
            Symbol::V1 => "V1",
            Symbol::V2 => "V2",
            Symbol::V3 => "V3",
            Symbol::Pdp => "Pdp",
            Symbol::P1x => "P1x",
            Symbol::P1y => "P1y",
            Symbol::P2x => "P2x",
            Symbol::P2y => "P2y",
            Symbol::P3x => "P3x",
            Symbol::P3y => "P3y",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // the listing uses both spellings for the thickness
        if s == "ep" {
            return Ok(Symbol::Ep);
        }
        Symbol::ALL
            .iter()
            .copied()
            .find(|sym| sym.name() == s)
            .ok_or_else(|| format!("unknown symbol `{s}`"))
    }
}

/// Half height of one wrap stack: turn-in + wall + half the base panel.
#[derive(Clone, Copy, Debug)]
pub struct StackExtent {
    pub turn_in: f64,
    pub wall: f64,
    pub panel: f64,
}

impl StackExtent {
    pub fn half_height(&self) -> f64 {
        self.turn_in + self.wall + self.panel / 2.0
    }

    pub fn full_height(&self) -> f64 {
        2.0 * (self.turn_in + self.wall) + self.panel
    }
}

/// Vertical offset of the second row: clears the taller of the two wrap
/// stacks of the first row, plus the pitch. Ties go to the base stack.
pub fn stack_offset(lid: StackExtent, base: StackExtent, pitch: f64) -> f64 {
    let taller = if lid.half_height() > base.half_height() {
        lid
    } else {
        base
    };
    taller.full_height() + pitch
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DerivedQuantities {
    #[serde(flatten)]
    pub params: BoxParameters,
    pub h1: f64,
    pub h2: f64,
    pub h3: f64,
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    pub r1: f64,
    pub v: f64,
    pub v1: f64,
    pub v2: f64,
    pub v3: f64,
    pub pdp: f64,
    pub p1x: f64,
    pub p1y: f64,
    pub p2x: f64,
    pub p2y: f64,
    pub p3x: f64,
    pub p3y: f64,
}

impl DerivedQuantities {
    pub fn from_params(p: &BoxParameters) -> Self {
        let BoxParameters { l, b, h, r, ep } = *p;
        let h2 = h;
        let l2 = b + 2.0 * ep + 2.5;
        let b2 = l + 2.0 * ep + 2.5;
        let b3 = b2 + 2.0 * ep + 1.0;
        let v = ep - 0.45;
        let l3 = l2 + 2.0 * ep;
        let h3 = h2 + ep;
        let r1 = r;
        let h1 = h + ep;
        let b1 = l + 2.0 * ep + 1.0;
        let l1 = b + 2.0 * ep;
        let v3 = ep + 0.5;
        let pdp = PLACEMENT_PITCH;

        let p1x = r1 + h3 + l3 / 2.0 - (l2 / 2.0 + h2);
        let p2x = r1 + h3 + l3 + h3 + r1 + pdp;
        let p2y = r1 + h3 + b3 / 2.0 - (b1 / 2.0 + h1 + r);
        let p3x = p2x + r + h1 + l1 / 2.0 - (h + b / 2.0);
        let lid = StackExtent {
            turn_in: r1,
            wall: h3,
            panel: b3,
        };
        let base = StackExtent {
            turn_in: r,
            wall: h1,
            panel: b1,
        };
        let p1y = stack_offset(lid, base, pdp);
        let p3y = p1y + h2 + b2 / 2.0 - (l / 2.0 + h);

        DerivedQuantities {
            params: *p,
            h1,
            h2,
            h3,
            l1,
            l2,
            l3,
            b1,
            b2,
            b3,
            r1,
            v,
            v1: TAB_LENGTH,
            v2: TAB_CHAMFER,
            v3,
            pdp,
            p1x,
            p1y,
            p2x,
            p2y,
            p3x,
            p3y,
        }
    }

    pub fn get(&self, sym: Symbol) -> f64 {
        match sym {
            Symbol::L => self.params.l,
            Symbol::B => self.params.b,
            Symbol::H => self.params.h,
            Symbol::R => self.params.r,
            Symbol::Ep => self.params.ep,
            Symbol::H1 => self.h1,
            Symbol::H2 => self.h2,
            Symbol::H3 => self.h3,
            Symbol::L1 => self.l1,
            Symbol::L2 => self.l2,
            Symbol::L3 => self.l3,
            Symbol::B1 => self.b1,
            Symbol::B2 => self.b2,
            Symbol::B3 => self.b3,
            Symbol::R1 => self.r1,
            Symbol::V => self.v,
            Symbol::V1 => self.v1,
            Symbol::V2 => self.v2,
            Symbol::V3 => self.v3,
            Symbol::Pdp => self.pdp,
            Symbol::P1x => self.p1x,
            Symbol::P1y => self.p1y,
            Symbol::P2x => self.p2x,
            Symbol::P2y => self.p2y,
            Symbol::P3x => self.p3x,
            Symbol::P3y => self.p3y,
        }
    }
}
