//! Boundary checks applied before any resolver or lifecycle logic runs.

use chrono::NaiveDate;

/// Malformed or inconsistent input rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a YYYY-MM-DD date")]
    MalformedDate { field: &'static str, value: String },
    #[error("{field}: start {start} is after end {end}")]
    InvertedRange {
        field: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("missing required identifier: {0}")]
    MissingIdentifier(&'static str),
    #[error("weekday {0} is outside 1..=7")]
    InvalidWeekday(u8),
    #[error("month {0} is outside 1..=12")]
    InvalidMonth(u32),
    #[error("service line '{0}' is not in the catalog")]
    UnknownServiceLine(String),
    #[error("service line '{0}' is the standby line and cannot be selected")]
    StandbyOverride(String),
    #[error("deployment room '{0}' listed more than once")]
    DuplicateDeploymentRoom(String),
    #[error("planning period {year}-{month:02} does not overlap absence starting {start}")]
    PeriodMismatch {
        year: i32,
        month: u32,
        start: NaiveDate,
    },
}

pub fn parse_iso_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::MalformedDate {
            field,
            value: raw.to_string(),
        }
    })
}

pub fn parse_optional_iso_date(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_iso_date(field, value).map(Some),
    }
}

pub fn ensure_ordered(
    field: &'static str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), ValidationError> {
    if start > end {
        return Err(ValidationError::InvertedRange { field, start, end });
    }
    Ok(())
}

pub fn ensure_present(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingIdentifier(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_iso_dates_and_rejects_everything_else() {
        assert_eq!(parse_iso_date("date", " 2025-06-01 "), Ok(date(2025, 6, 1)));
        for raw in ["2025-13-01", "01.06.2025", "2025-02-30", ""] {
            assert!(
                matches!(
                    parse_iso_date("date", raw),
                    Err(ValidationError::MalformedDate { field: "date", .. })
                ),
                "{raw}"
            );
        }
    }

    #[test]
    fn optional_dates_treat_blank_as_absent() {
        assert_eq!(parse_optional_iso_date("inactiveFrom", None), Ok(None));
        assert_eq!(parse_optional_iso_date("inactiveFrom", Some("  ")), Ok(None));
        assert_eq!(
            parse_optional_iso_date("inactiveFrom", Some("2025-06-01")),
            Ok(Some(date(2025, 6, 1)))
        );
    }

    #[test]
    fn ranges_must_not_be_inverted() {
        assert!(ensure_ordered("absence", date(2025, 1, 1), date(2025, 1, 1)).is_ok());
        assert_eq!(
            ensure_ordered("absence", date(2025, 1, 2), date(2025, 1, 1)),
            Err(ValidationError::InvertedRange {
                field: "absence",
                start: date(2025, 1, 2),
                end: date(2025, 1, 1),
            })
        );
    }

    #[test]
    fn blank_identifiers_are_missing() {
        assert_eq!(
            ensure_present("employeeId", " "),
            Err(ValidationError::MissingIdentifier("employeeId"))
        );
        assert!(ensure_present("employeeId", "e-1").is_ok());
    }
}
