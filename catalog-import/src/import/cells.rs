//! Convert calamine cells to the text and numbers the importer works with

use calamine::Data;
use once_cell::sync::Lazy;
use regex::Regex;

/// `14.990` or `1.250.000`: dots used as thousands separators
static DOTTED_THOUSANDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(\.\d{3})+$").expect("valid regex"));

/// Render a cell as trimmed display text
///
/// Whole floats lose their fraction (`50.0` -> `50`), errors render empty.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Text of the cell at `idx`, empty when the row is shorter
pub fn cell_at(row: &[Data], idx: usize) -> String {
    row.get(idx).map(cell_to_string).unwrap_or_default()
}

/// Numeric value of a price-like cell
pub fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => parse_number(s),
        _ => None,
    }
}

/// Integer value of a quantity-like cell
pub fn cell_to_i64(cell: &Data) -> Option<i64> {
    match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) if f.fract() == 0.0 => Some(*f as i64),
        Data::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                parse_number(trimmed)
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

/// Parse a number written by hand: currency symbol, spaces, and either
/// comma or dotted thousands separators are accepted
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let cleaned = if DOTTED_THOUSANDS.is_match(&cleaned) {
        cleaned.replace('.', "")
    } else {
        cleaned.replace(',', "")
    };

    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("  Señuelo X ".into())), "Señuelo X");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Float(50.0)), "50");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }

    #[test]
    fn test_cell_at_out_of_range() {
        let row = vec![Data::String("a".into())];
        assert_eq!(cell_at(&row, 0), "a");
        assert_eq!(cell_at(&row, 5), "");
    }

    #[test]
    fn test_cell_to_f64() {
        assert_eq!(cell_to_f64(&Data::Float(14990.0)), Some(14990.0));
        assert_eq!(cell_to_f64(&Data::String("$14.990".into())), Some(14990.0));
        assert_eq!(cell_to_f64(&Data::String("1,250.50".into())), Some(1250.5));
        assert_eq!(cell_to_f64(&Data::String("19.99".into())), Some(19.99));
        assert_eq!(cell_to_f64(&Data::String("N/A".into())), None);
        assert_eq!(cell_to_f64(&Data::Empty), None);
    }

    #[test]
    fn test_cell_to_i64() {
        assert_eq!(cell_to_i64(&Data::Float(3.0)), Some(3));
        assert_eq!(cell_to_i64(&Data::Float(3.5)), None);
        assert_eq!(cell_to_i64(&Data::String(" 12 ".into())), Some(12));
        assert_eq!(cell_to_i64(&Data::String("1.000".into())), Some(1000));
        assert_eq!(cell_to_i64(&Data::String("many".into())), None);
    }
}
