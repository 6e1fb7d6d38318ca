use serde::{Deserialize, Serialize};

use crate::error::{DielineError, Result};

/// The five physical inputs of a box, in millimetres.
///
/// The struct itself accepts any value: the geometry functions never reject
/// what they are given. Use [`BoxParameters::new`] or [`BoxRequest`] at the
/// input boundary to enforce the finite, strictly-positive invariant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxParameters {
    /// Body length.
    #[serde(rename = "L")]
    pub l: f64,
    /// Body width.
    #[serde(rename = "B")]
    pub b: f64,
    /// Body height.
    #[serde(rename = "H")]
    pub h: f64,
    /// Corner radius (also the turn-in depth of the wraps).
    #[serde(rename = "R")]
    pub r: f64,
    /// Board thickness.
    pub ep: f64,
}

impl BoxParameters {
    pub fn new(l: f64, b: f64, h: f64, r: f64, ep: f64) -> Result<Self> {
        let p = BoxParameters { l, b, h, r, ep };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, v) in [
            ("L", self.l),
            ("B", self.b),
            ("H", self.h),
            ("R", self.r),
            ("ep", self.ep),
        ] {
            check_positive(field, v)?;
        }
        Ok(())
    }
}

fn check_positive(field: &str, v: f64) -> Result<f64> {
    if !v.is_finite() {
        return Err(DielineError::invalid(field, "must be a finite number"));
    }
    if v <= 0.0 {
        return Err(DielineError::invalid(
            field,
            format!("must be greater than zero, got {v}"),
        ));
    }
    Ok(v)
}

/// Parse one raw form value into a strictly positive millimetre length.
pub fn parse_field(field: &str, raw: &str) -> Result<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(DielineError::invalid(field, "missing value"));
    }
    let v: f64 = s
        .parse()
        .map_err(|_| DielineError::invalid(field, format!("not a number: {raw:?}")))?;
    check_positive(field, v)
}

/// Value parser for command-line dimensions (`clap` reports the flag name).
pub fn parse_dimension(raw: &str) -> Result<f64> {
    parse_field("value", raw)
}

/// A raw field as submitted by a form: HTML forms send text, JSON clients
/// may send numbers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

/// Unvalidated request fields, as the web form posts them. The thickness
/// field was historically named `ep1`; both names are accepted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BoxRequest {
    #[serde(rename = "L")]
    pub l: Option<FormValue>,
    #[serde(rename = "B")]
    pub b: Option<FormValue>,
    #[serde(rename = "H")]
    pub h: Option<FormValue>,
    #[serde(rename = "R")]
    pub r: Option<FormValue>,
    #[serde(alias = "ep1")]
    pub ep: Option<FormValue>,
}

impl BoxRequest {
    pub fn from_json(txt: &str) -> Result<Self> {
        Ok(serde_json::from_str(txt)?)
    }

    /// Validate every field. The first offending field is reported.
    pub fn into_params(self) -> Result<BoxParameters> {
        let get = |field: &str, v: Option<FormValue>| -> Result<f64> {
            match v {
                None => Err(DielineError::invalid(field, "missing value")),
                Some(FormValue::Number(n)) => check_positive(field, n),
                Some(FormValue::Text(s)) => parse_field(field, &s),
            }
        };
        Ok(BoxParameters {
            l: get("L", self.l)?,
            b: get("B", self.b)?,
            h: get("H", self.h)?,
            r: get("R", self.r)?,
            ep: get("ep", self.ep)?,
        })
    }
}
