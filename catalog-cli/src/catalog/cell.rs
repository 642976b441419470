//! Coercion of untyped spreadsheet cells into catalog values
//!
//! Every conversion reports whether the cell actually held the value or a
//! fallback was substituted, so the loader can log what it papered over.

use calamine::Data;

use super::error::SequenceParseError;

/// Outcome of coercing a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coerced<T> {
    /// The cell held a usable value
    Parsed(T),
    /// The cell was missing, non-numeric or out of range; the default was used
    Fallback(T),
}

impl<T: Copy> Coerced<T> {
    pub fn value(&self) -> T {
        match self {
            Coerced::Parsed(v) | Coerced::Fallback(v) => *v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Coerced::Fallback(_))
    }
}

/// Whether a cell carries no data
pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Render a cell as text. Whole floats lose their trailing ".0".
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Stringify a header cell for role matching
pub fn header_text(cell: &Data) -> String {
    cell_text(cell)
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

/// Largest whole number an f64 cell holds exactly (2^53)
pub const MAX_EXACT_FLOAT_INTEGER: u64 = 1 << 53;

/// Coerce a quantity cell into a non-negative integer
///
/// Missing or non-numeric input falls back to 0, negative input is clamped
/// to 0 and fractional input is truncated toward zero.
pub fn quantity(cell: Option<&Data>) -> Coerced<u64> {
    match cell {
        Some(Data::Int(i)) => match u64::try_from(*i) {
            Ok(n) => Coerced::Parsed(n),
            Err(_) => Coerced::Fallback(0),
        },
        Some(Data::Float(f)) => float_quantity(*f),
        Some(Data::String(s)) => {
            let s = s.trim();
            match s.parse::<u64>() {
                Ok(n) => Coerced::Parsed(n),
                Err(_) => s
                    .parse::<f64>()
                    .map(float_quantity)
                    .unwrap_or(Coerced::Fallback(0)),
            }
        }
        _ => Coerced::Fallback(0),
    }
}

fn float_quantity(n: f64) -> Coerced<u64> {
    if n.is_finite() && n >= 0.0 {
        Coerced::Parsed(n.trunc() as u64)
    } else if n.is_finite() && n.trunc() == 0.0 {
        // Fractions in (-1, 0) truncate to zero rather than clamp
        Coerced::Parsed(0)
    } else {
        Coerced::Fallback(0)
    }
}

/// Parse a sequence cell into a positive integer
///
/// Integer and text cells are read exactly. Float cells are accepted only
/// when they hold a whole number no larger than 2^53.
pub fn sequence(cell: Option<&Data>, row: usize) -> Result<u64, SequenceParseError> {
    let parsed = match cell {
        Some(Data::Int(i)) => u64::try_from(*i).ok(),
        Some(Data::Float(f)) => exact_whole(*f),
        Some(Data::String(s)) => parse_whole(s),
        _ => None,
    };

    match parsed {
        Some(n) if n >= 1 => Ok(n),
        _ => Err(SequenceParseError {
            row,
            raw: cell.map(cell_text).unwrap_or_default(),
        }),
    }
}

fn exact_whole(f: f64) -> Option<u64> {
    let exact = f.is_finite()
        && f >= 0.0
        && f.fract() == 0.0
        && f <= MAX_EXACT_FLOAT_INTEGER as f64;
    exact.then(|| f as u64)
}

fn parse_whole(s: &str) -> Option<u64> {
    let s = s.trim();
    s.parse::<u64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(exact_whole))
}
