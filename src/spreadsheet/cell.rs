use crate::dataset::CellValue;
use crate::error::SheetError;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::Timelike;

/// Milliseconds in one day, the resolution of serial time fractions.
const MILLISECONDS_PER_DAY: f64 = 86_400_000f64;

/// Serial numbers representable as calendar values (0001-01-01 .. 9999-12-31).
const SERIAL_LOWER_BOUND: f64 = -693_593f64;
const SERIAL_UPPER_BOUND: f64 = 2_958_466f64;

/// Cell type tags found in the `t` attribute of worksheet cells.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    /// Numeric values (no tag or `n`)
    #[default]
    Number,
    /// Shared string table references (`s`)
    SharedString,
    /// Inline string values (`inlineStr`)
    InlineString,
    /// Date values (`d`)
    Date,
    /// Any other tag (`str`, `b`, `e`), read as plain text
    Text,
}

impl CellType {
    /// Parses the `t` attribute of a cell.
    pub(crate) fn parse(tag: Option<&str>) -> Self {
        match tag {
            None | Some("n") => CellType::Number,
            Some("s") => CellType::SharedString,
            Some("inlineStr") => CellType::InlineString,
            Some("d") => CellType::Date,
            Some(_) => CellType::Text,
        }
    }
}

/// Represents a single raw cell of a worksheet row.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Cell {
    /// Cell data type
    pub(crate) kind: CellType,
    /// Cell value as stored
    pub(crate) value: String,
}

impl Cell {
    /// Returns true if the cell carries no value.
    pub(crate) fn is_blank(&self) -> bool {
        self.value.is_empty()
    }

    /// Resolves the stored value into a dataset value.
    /// Empty cells resolve to `None`.
    pub(crate) fn resolve(&self, shared_strings: &[String], is_1904: bool) -> Result<Option<CellValue>, SheetError> {
        if self.is_blank() {
            return Ok(None);
        }
        let value = match self.kind {
            CellType::SharedString => {
                let index = self.value.trim().parse::<usize>()?;
                let text = shared_strings
                    .get(index)
                    .ok_or(SheetError::SharedStringOutOfRange(index))?;
                CellValue::Text(text.to_owned())
            }
            CellType::Date => match self.value.trim().parse::<f64>().ok().and_then(|serial| from_serial(serial, is_1904)) {
                Some(datetime) => CellValue::Date(datetime),
                None => CellValue::Text(self.value.to_owned()),
            },
            CellType::Number | CellType::InlineString | CellType::Text => CellValue::Text(self.value.to_owned()),
        };
        Ok(Some(value))
    }
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("NaiveDate Literal")
}

/// Converts a serial date number to a calendar value.
/// Handles the Lotus 1-2-3 leap year bug for the 1900 date system.
pub(crate) fn from_serial(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(SERIAL_LOWER_BOUND..SERIAL_UPPER_BOUND).contains(&serial) {
        return None;
    }
    let days = serial.floor();
    let mut milliseconds = ((serial - days) * MILLISECONDS_PER_DAY).round() as i64;
    let mut days = days as i64;
    if milliseconds >= MILLISECONDS_PER_DAY as i64 {
        days += 1;
        milliseconds = 0;
    }
    let offset = if is_1904 {
        1_462
    } else if (0..60).contains(&days) {
        1
    } else {
        0
    };
    let date = epoch().checked_add_signed(Duration::days(days + offset))?;
    let time = NaiveTime::MIN + Duration::milliseconds(milliseconds);
    Some(date.and_time(time))
}

/// Converts a calendar value to its serial date number.
pub(crate) fn to_serial(datetime: &NaiveDateTime, is_1904: bool) -> f64 {
    let mut days = (datetime.date() - epoch()).num_days();
    if is_1904 {
        days -= 1_462;
    } else if (1..61).contains(&days) {
        days -= 1;
    }
    let time = datetime.time();
    let milliseconds = time.num_seconds_from_midnight() as i64 * 1_000 + (time.nanosecond() / 1_000_000) as i64;
    days as f64 + milliseconds as f64 / MILLISECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, mi, s).unwrap()
    }

    #[test]
    fn parse_cell_type_tags() {
        assert_eq!(CellType::parse(None), CellType::Number);
        assert_eq!(CellType::parse(Some("n")), CellType::Number);
        assert_eq!(CellType::parse(Some("s")), CellType::SharedString);
        assert_eq!(CellType::parse(Some("inlineStr")), CellType::InlineString);
        assert_eq!(CellType::parse(Some("d")), CellType::Date);
        assert_eq!(CellType::parse(Some("str")), CellType::Text);
        assert_eq!(CellType::parse(Some("b")), CellType::Text);
    }

    #[test]
    fn serial_to_calendar_1900() {
        assert_eq!(from_serial(1.0, false), Some(datetime(1900, 1, 1, 0, 0, 0)));
        assert_eq!(from_serial(59.0, false), Some(datetime(1900, 2, 28, 0, 0, 0)));
        assert_eq!(from_serial(61.0, false), Some(datetime(1900, 3, 1, 0, 0, 0)));
        assert_eq!(from_serial(45_000.5, false), Some(datetime(2023, 3, 15, 12, 0, 0)));
    }

    #[test]
    fn serial_to_calendar_1904() {
        assert_eq!(from_serial(0.0, true), Some(datetime(1904, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn serial_out_of_range() {
        assert_eq!(from_serial(f64::NAN, false), None);
        assert_eq!(from_serial(1e300, false), None);
        assert_eq!(from_serial(-1e7, false), None);
    }

    #[test]
    fn calendar_to_serial_round_trip() {
        for value in [datetime(1900, 2, 28, 0, 0, 0), datetime(2023, 3, 15, 12, 0, 0), datetime(2026, 10, 18, 6, 30, 0)] {
            let serial = to_serial(&value, false);
            assert_eq!(from_serial(serial, false), Some(value));
        }
        assert_eq!(to_serial(&datetime(2023, 3, 15, 12, 0, 0), false), 45_000.5);
    }

    #[test]
    fn resolve_cells() {
        let shared = vec!["Title".to_owned()];
        let cell = Cell { kind: CellType::SharedString, value: "0".to_owned() };
        assert_eq!(cell.resolve(&shared, false).unwrap(), Some(CellValue::Text("Title".to_owned())));

        let cell = Cell { kind: CellType::SharedString, value: "3".to_owned() };
        assert!(matches!(cell.resolve(&shared, false), Err(SheetError::SharedStringOutOfRange(3))));

        let cell = Cell { kind: CellType::Date, value: "45000.5".to_owned() };
        assert_eq!(cell.resolve(&shared, false).unwrap(), Some(CellValue::Date(datetime(2023, 3, 15, 12, 0, 0))));

        let cell = Cell { kind: CellType::Date, value: "18/10/2026".to_owned() };
        assert_eq!(cell.resolve(&shared, false).unwrap(), Some(CellValue::Text("18/10/2026".to_owned())));

        let cell = Cell { kind: CellType::Number, value: "".to_owned() };
        assert_eq!(cell.resolve(&shared, false).unwrap(), None);
    }
}
