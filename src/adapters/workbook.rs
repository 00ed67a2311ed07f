use crate::domain::model::Workbook;
use crate::domain::ports::WorkbookReader;
use crate::utils::error::Result;

/// Reads `.xlsx` workbooks. Without the `xlsx` feature every read reports
/// [`AttendanceError::SpreadsheetUnavailable`](crate::utils::error::AttendanceError::SpreadsheetUnavailable).
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxReader;

impl XlsxReader {
    pub fn new() -> Self {
        Self
    }

    pub fn is_available() -> bool {
        cfg!(feature = "xlsx")
    }
}

#[cfg(feature = "xlsx")]
impl WorkbookReader for XlsxReader {
    fn read_workbook(&self, bytes: &[u8]) -> Result<Workbook> {
        xlsx::read(bytes)
    }
}

#[cfg(not(feature = "xlsx"))]
impl WorkbookReader for XlsxReader {
    fn read_workbook(&self, _bytes: &[u8]) -> Result<Workbook> {
        Err(crate::utils::error::AttendanceError::SpreadsheetUnavailable)
    }
}

#[cfg(feature = "xlsx")]
mod xlsx {
    use crate::domain::model::{RawRow, Sheet, Workbook};
    use crate::utils::error::{AttendanceError, Result};
    use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
    use chrono::Timelike;
    use serde_json::Value;
    use std::io::Cursor;

    pub(super) fn read(bytes: &[u8]) -> Result<Workbook> {
        let mut workbook: Xlsx<_> =
            open_workbook_from_rs(Cursor::new(bytes.to_vec())).map_err(workbook_error)?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name).map_err(workbook_error)?;
            let rows = sheet_rows(&range);
            tracing::debug!(sheet = %name, rows = rows.len(), "Read worksheet");
            sheets.push(Sheet { name, rows });
        }

        Ok(Workbook { sheets })
    }

    fn workbook_error(err: calamine::XlsxError) -> AttendanceError {
        AttendanceError::ImportFormatError {
            message: format!("cannot read workbook: {}", err),
        }
    }

    /// First row is the header row; blank rows are dropped.
    fn sheet_rows(range: &Range<Data>) -> Vec<RawRow> {
        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Vec::new();
        };
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        rows.filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
            .map(|cells| {
                RawRow::from_pairs(
                    headers
                        .iter()
                        .enumerate()
                        .filter(|(_, h)| !h.is_empty())
                        .map(|(i, h)| (h.clone(), cells.get(i).map(cell_value).unwrap_or(Value::Null))),
                )
            })
            .collect()
    }

    fn cell_value(cell: &Data) -> Value {
        match cell {
            Data::Int(i) => Value::from(*i),
            Data::Float(f) => Value::from(*f),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
            Data::Bool(b) => Value::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(ndt) if dt.is_duration() || dt.as_f64() < 1.0 => {
                    Value::String(ndt.format("%H:%M:%S").to_string())
                }
                Some(ndt) if ndt.num_seconds_from_midnight() == 0 => {
                    Value::String(ndt.format("%Y-%m-%d").to_string())
                }
                Some(ndt) => Value::String(ndt.format("%Y-%m-%d %H:%M:%S").to_string()),
                None => Value::from(dt.as_f64()),
            },
            Data::Error(_) | Data::Empty => Value::Null,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        #[test]
        fn test_sheet_rows_skip_blank_rows_and_unnamed_columns() {
            let mut range: Range<Data> = Range::new((0, 0), (3, 2));
            range.set_value((0, 0), Data::String("EmployeeID".to_string()));
            range.set_value((0, 1), Data::String(" Name ".to_string()));
            range.set_value((1, 0), Data::Float(101.0));
            range.set_value((1, 1), Data::String("Ana".to_string()));
            range.set_value((1, 2), Data::String("ignored".to_string()));
            range.set_value((3, 0), Data::Int(102));
            range.set_value((3, 1), Data::Bool(true));

            let rows = sheet_rows(&range);

            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].data.len(), 2);
            assert_eq!(rows[0].data["EmployeeID"], json!(101.0));
            assert_eq!(rows[0].data["Name"], json!("Ana"));
            assert_eq!(rows[1].data["EmployeeID"], json!(102));
            assert_eq!(rows[1].data["Name"], json!(true));
        }

        #[test]
        fn test_empty_range_has_no_rows() {
            assert!(sheet_rows(&Range::<Data>::empty()).is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_not_a_workbook() {
        let err = XlsxReader::new().read_workbook(b"not a zip archive").unwrap_err();
        if XlsxReader::is_available() {
            assert!(matches!(err, crate::utils::error::AttendanceError::ImportFormatError { .. }));
        } else {
            assert!(matches!(err, crate::utils::error::AttendanceError::SpreadsheetUnavailable));
        }
    }
}
