//! Which occurrence of a weekday a date is, and whether a workplace's
//! weekday schedule applies on it.

use chrono::{Datelike, NaiveDate};

use super::domain::{Recurrence, WeekdaySetting, Workplace};

/// 1-based position of the date's weekday within its month (days 1-7 are occurrence 1).
pub fn weekday_occurrence_in_month(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

/// Absent or unrecognised recurrences match every date so a workplace is never
/// dropped from consideration by bad data.
pub fn matches_recurrence(recurrence: Option<Recurrence>, date: NaiveDate) -> bool {
    match recurrence {
        None | Some(Recurrence::Weekly) | Some(Recurrence::Unrecognized) => true,
        Some(Recurrence::MonthlyFirstThird) => {
            matches!(weekday_occurrence_in_month(date), 1 | 3)
        }
        Some(Recurrence::MonthlyOnce) => weekday_occurrence_in_month(date) == 1,
    }
}

/// First setting, in input order, whose weekday and recurrence match the date.
/// A closed first match yields `None`; later settings are not consulted.
pub fn setting_for_date(workplace: &Workplace, date: NaiveDate) -> Option<&WeekdaySetting> {
    schedule_for_date(workplace, date).ok()
}

/// Why a workplace has no usable setting on a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleGap {
    NoSchedule,
    Closed { reason: Option<String> },
}

pub(crate) fn schedule_for_date(
    workplace: &Workplace,
    date: NaiveDate,
) -> Result<&WeekdaySetting, ScheduleGap> {
    let iso_weekday = date.weekday().number_from_monday();
    let setting = workplace
        .weekday_settings
        .iter()
        .find(|setting| {
            u32::from(setting.weekday) == iso_weekday
                && matches_recurrence(setting.recurrence, date)
        })
        .ok_or(ScheduleGap::NoSchedule)?;

    if setting.is_closed {
        return Err(ScheduleGap::Closed {
            reason: setting.closed_reason.clone(),
        });
    }
    Ok(setting)
}
