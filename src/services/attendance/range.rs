// src/services/attendance/range.rs

use chrono::{DateTime, NaiveDate, Utc};

use crate::common::{error::AppError, timezone::AppTimeZone};

const INVALID_RANGE: &str = "Invalid date range";

/// Converte um limite de consulta em instante.
///
/// Aceita uma data (`YYYY-MM-DD`, lida no fuso da aplicação) ou um instante
/// RFC 3339. Uma data no limite final cobre o dia inteiro.
fn parse_bound(tz: &AppTimeZone, raw: &str, is_end: bool) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(if is_end {
            tz.end_of_day(date)
        } else {
            tz.start_of_day(date)
        });
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Intervalo fechado de instantes para listar batidas.
pub fn parse_instant_range(
    tz: &AppTimeZone,
    start: &str,
    end: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let (Some(start), Some(end)) = (parse_bound(tz, start, false), parse_bound(tz, end, true))
    else {
        return Err(AppError::InvalidInput(INVALID_RANGE.to_string()));
    };

    if start > end {
        return Err(AppError::InvalidInput(INVALID_RANGE.to_string()));
    }

    Ok((start, end))
}

/// Intervalo fechado de dias locais para filtrar resumos por `period_start`.
pub fn parse_date_range(
    tz: &AppTimeZone,
    start: &str,
    end: &str,
) -> Result<(NaiveDate, NaiveDate), AppError> {
    let (start, end) = parse_instant_range(tz, start, end)?;
    Ok((tz.local_date(start), tz.local_date(end)))
}

/// Instante de uma batida; ausente ou vazio vale "agora".
pub fn parse_event_at(raw: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Utc::now()),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| AppError::InvalidInput("Invalid eventAt timestamp".to_string())),
    }
}
