//! Cell conversion between workbook cells and `CellValue`

use crate::types::{CellValue, Numeric};
use calamine::Data;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Format, Formula, Worksheet, XlsxError};

/// Number format applied to date cells so readers see them as dates again
pub const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Excel serial number of 1970-01-01 (1900 date system)
const UNIX_EPOCH_SERIAL: f64 = 25_569.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// xlsx cannot store an empty string cell, so `Text("")` travels as this formula
pub const EMPTY_TEXT_FORMULA: &str = "\"\"";

/// Convert an Excel serial date to a timestamp, rounded to the millisecond
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let millis = ((serial - UNIX_EPOCH_SERIAL) * MILLIS_PER_DAY).round();
    DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.naive_utc())
}

/// Convert a timestamp to an Excel serial date
pub fn datetime_to_serial(value: &NaiveDateTime) -> f64 {
    value.and_utc().timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_SERIAL
}

fn parse_iso(text: &str) -> Option<NaiveDateTime> {
    text.parse::<NaiveDateTime>().ok().or_else(|| {
        text.parse::<NaiveDate>()
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

/// Decode a workbook cell. A formula, when present, wins over the cached value.
pub fn from_data(data: &Data, formula: Option<&str>) -> CellValue {
    if let Some(source) = formula.map(str::trim).filter(|f| !f.is_empty()) {
        let source = source.trim_start_matches('=');
        if source == EMPTY_TEXT_FORMULA {
            return CellValue::Text(String::new());
        }
        return CellValue::Formula(source.to_string());
    }

    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(Numeric::from_f64(*f)),
        Data::Int(i) => CellValue::Number(Numeric::Int(*i)),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            serial_to_datetime(serial)
                .map(CellValue::Date)
                .unwrap_or_else(|| CellValue::Number(Numeric::from_f64(serial)))
        }
        Data::DateTimeIso(s) => parse_iso(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Write one cell. `Empty` writes nothing, leaving the cell blank. An empty
/// string is written as `=""` so the cell exists and reads back as text.
pub fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    date_format: &Format,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Empty => return Ok(()),
        CellValue::Text(s) if s.is_empty() => {
            worksheet.write_formula(row, col, Formula::new(EMPTY_TEXT_FORMULA))?
        }
        CellValue::Text(s) => worksheet.write_string(row, col, s.as_str())?,
        CellValue::Number(n) => worksheet.write_number(row, col, n.as_f64())?,
        CellValue::Boolean(b) => worksheet.write_boolean(row, col, *b)?,
        CellValue::Date(dt) => {
            worksheet.write_number_with_format(row, col, datetime_to_serial(dt), date_format)?
        }
        CellValue::Formula(f) => worksheet.write_formula(row, col, Formula::new(f.as_str()))?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_serial_conversion() {
        assert_eq!(serial_to_datetime(25_569.0), Some(datetime(1970, 1, 1, 0, 0, 0)));
        assert_eq!(serial_to_datetime(45_658.5), Some(datetime(2025, 1, 1, 12, 0, 0)));
        assert_eq!(datetime_to_serial(&datetime(2025, 1, 1, 12, 0, 0)), 45_658.5);
        assert_eq!(serial_to_datetime(f64::NAN), None);

        let odd = datetime(2024, 2, 29, 17, 45, 13);
        assert_eq!(serial_to_datetime(datetime_to_serial(&odd)), Some(odd));
    }

    #[test]
    fn test_from_data_scalars() {
        assert_eq!(from_data(&Data::Float(4.0), None), CellValue::number(4));
        assert_eq!(from_data(&Data::Float(4.5), None), CellValue::number(4.5));
        assert_eq!(from_data(&Data::Int(7), None), CellValue::number(7));
        assert_eq!(from_data(&Data::Bool(false), None), CellValue::Boolean(false));
        assert_eq!(
            from_data(&Data::String("vip".to_string()), None),
            CellValue::text("vip")
        );
        assert_eq!(
            from_data(&Data::String(String::new()), None),
            CellValue::text("")
        );
    }

    #[test]
    fn test_blank_and_error_cells_are_empty() {
        assert_eq!(from_data(&Data::Empty, None), CellValue::Empty);
        assert_eq!(
            from_data(&Data::Error(CellErrorType::Div0), None),
            CellValue::Empty
        );
    }

    #[test]
    fn test_iso_strings() {
        assert_eq!(
            from_data(&Data::DateTimeIso("2025-06-30T08:15:00".to_string()), None),
            CellValue::Date(datetime(2025, 6, 30, 8, 15, 0))
        );
        assert_eq!(
            from_data(&Data::DateTimeIso("2025-06-30".to_string()), None),
            CellValue::Date(datetime(2025, 6, 30, 0, 0, 0))
        );
        assert_eq!(
            from_data(&Data::DateTimeIso("not a date".to_string()), None),
            CellValue::text("not a date")
        );
        assert_eq!(
            from_data(&Data::DurationIso("PT1H".to_string()), None),
            CellValue::text("PT1H")
        );
    }

    #[test]
    fn test_formula_wins_over_cached_value() {
        assert_eq!(
            from_data(&Data::Float(0.0), Some("SUM(B2:B4)")),
            CellValue::Formula("SUM(B2:B4)".to_string())
        );
        assert_eq!(
            from_data(&Data::Float(3.0), Some("=A1*2")),
            CellValue::Formula("A1*2".to_string())
        );
        assert_eq!(from_data(&Data::Float(3.0), Some("")), CellValue::number(3));
    }

    #[test]
    fn test_empty_text_formula_reads_as_text() {
        assert_eq!(
            from_data(&Data::String(String::new()), Some("\"\"")),
            CellValue::text("")
        );
        assert_eq!(
            from_data(&Data::Float(0.0), Some("=\"\"")),
            CellValue::text("")
        );
        assert_eq!(
            from_data(&Data::String("ab".to_string()), Some("\"a\"&\"b\"")),
            CellValue::Formula("\"a\"&\"b\"".to_string())
        );
    }
}
