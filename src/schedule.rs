//! Weekday handling for the new-slot form.
//!
//! Teachers publish availability by picking a weekday; the concrete date is
//! the next occurrence of that weekday, counting today as a candidate, so
//! the result is always today or at most seven days ahead.

use crate::error::{ErrorKind, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Parses the Portuguese day names used by the form select. Accented and
/// `-feira` suffixed spellings are accepted.
pub fn parse_weekday(name: &str) -> Result<Weekday> {
    let lowered = name.trim().to_lowercase();
    let day = lowered.split('-').next().unwrap_or(&lowered);

    match day {
        "domingo" => Ok(Weekday::Sun),
        "segunda" => Ok(Weekday::Mon),
        "terca" | "terça" => Ok(Weekday::Tue),
        "quarta" => Ok(Weekday::Wed),
        "quinta" => Ok(Weekday::Thu),
        "sexta" => Ok(Weekday::Fri),
        "sabado" | "sábado" => Ok(Weekday::Sat),
        _ => Err(ErrorKind::ParseError(format!("Dia inválido: {name}")).into()),
    }
}

/// Next date falling on `weekday`, anchored at `today` (inclusive).
pub fn next_date_for_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let offset = (weekday.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);

    today + Duration::days(offset)
}
