//! Aggregator group result parsing
//!
//! Reads `group_db.json` and keeps the three per-subject metric arrays:
//! `qc_motion` (2-tuples), `qc_cnr` (3-tuples), `qc_outliers` (4-tuples).
//! Other keys written by the aggregator are ignored.
//!
//! Values are coerced to `f64` the way a float-typed table would: numbers as
//! is, numeric strings parsed, booleans as 0/1, `null` as NaN. The bare
//! `NaN`, `Infinity` and `-Infinity` literals that Python's `json` module
//! writes for non-finite floats are accepted too.

use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use std::path::Path;

/// Per-subject metric arrays, indexed by the aggregator's subject order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupResults {
    /// `(abs, rel)`
    pub motion: Vec<[f64; 2]>,
    /// `(snr_b0, cnr_b1000, cnr_b2000)`
    pub cnr: Vec<[f64; 3]>,
    /// `(total, b1000, b2000, phase-encoding)`
    pub outliers: Vec<[f64; 4]>,
}

#[derive(Debug, Deserialize)]
struct GroupDb {
    qc_motion: Vec<[Coerced; 2]>,
    qc_cnr: Vec<[Coerced; 3]>,
    qc_outliers: Vec<[Coerced; 4]>,
}

/// A JSON value coerced to `f64`
#[derive(Debug, Clone, Copy)]
struct Coerced(f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl<'de> Deserialize<'de> for Coerced {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match Option::<RawValue>::deserialize(deserializer)? {
            None => f64::NAN,
            Some(RawValue::Number(n)) => n,
            Some(RawValue::Bool(b)) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            Some(RawValue::Text(s)) => s.trim().parse::<f64>().map_err(|_| {
                serde::de::Error::custom(format!("value {:?} is not numeric", s))
            })?,
        };
        Ok(Coerced(value))
    }
}

fn unwrap_rows<const N: usize>(rows: Vec<[Coerced; N]>) -> Vec<[f64; N]> {
    rows.into_iter().map(|row| row.map(|v| v.0)).collect()
}

/// Non-standard literals for non-finite floats, longest first
const NON_FINITE_LITERALS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

/// Quote bare `NaN` / `Infinity` / `-Infinity` tokens outside strings
///
/// The quoted forms go through numeric-string coercion.
fn quote_non_finite(json: &str) -> Cow<'_, str> {
    if !json.contains("NaN") && !json.contains("Infinity") {
        return Cow::Borrowed(json);
    }

    let mut out = String::with_capacity(json.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    let mut prev: Option<char> = None;
    let mut rest = json;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if !prev.is_some_and(|p| p.is_ascii_alphanumeric() || p == '_') {
            let literal = NON_FINITE_LITERALS.iter().find(|lit| {
                rest.starts_with(*lit)
                    && !rest[lit.len()..]
                        .chars()
                        .next()
                        .is_some_and(|n| n.is_ascii_alphanumeric() || n == '_')
            });
            if let Some(literal) = literal {
                out.push('"');
                out.push_str(literal);
                out.push('"');
                rest = &rest[literal.len()..];
                prev = Some('"');
                continue;
            }
        }

        out.push(c);
        prev = Some(c);
        rest = &rest[c.len_utf8()..];
    }

    Cow::Owned(out)
}

/// Parse aggregator JSON; `source` names the origin in error messages
pub fn parse_group_db(json: &str, source: &Path) -> PipelineResult<GroupResults> {
    let json = quote_non_finite(json);
    let db: GroupDb = serde_json::from_str(&json).map_err(|e| PipelineError::DataFormat {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(GroupResults {
        motion: unwrap_rows(db.qc_motion),
        cnr: unwrap_rows(db.qc_cnr),
        outliers: unwrap_rows(db.qc_outliers),
    })
}

/// Load `group_db.json`
///
/// A missing or unreadable file is a data format error: the aggregator did
/// not deliver its result.
pub fn load_group_db(path: &Path) -> PipelineResult<GroupResults> {
    let json = std::fs::read_to_string(path).map_err(|e| PipelineError::DataFormat {
        path: path.to_path_buf(),
        message: format!("cannot read aggregator result: {}", e),
    })?;

    let results = parse_group_db(&json, path)?;
    tracing::info!(
        path = %path.display(),
        motion = results.motion.len(),
        cnr = results.cnr.len(),
        outliers = results.outliers.len(),
        "Loaded aggregator results"
    );
    Ok(results)
}
