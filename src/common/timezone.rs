// src/common/timezone.rs

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Fuso horário da aplicação (`APP_TIMEZONE`).
///
/// Toda conversão instante <-> dia de calendário passa por aqui; o resolvedor
/// de períodos e o agregador só trabalham com datas já convertidas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppTimeZone(pub Tz);

impl Default for AppTimeZone {
    fn default() -> Self {
        AppTimeZone(Tz::UTC)
    }
}

impl AppTimeZone {
    pub fn parse(name: &str) -> Result<Self, String> {
        name.trim()
            .parse::<Tz>()
            .map(AppTimeZone)
            .map_err(|_| format!("Invalid timezone: {}", name))
    }

    /// Dia de calendário local do instante.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.0).date_naive()
    }

    /// Primeiro instante do dia local, em UTC.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);
        self.0
            .from_local_datetime(&midnight)
            .earliest()
            // Meia-noite caiu num salto de horário de verão: o dia começa uma hora depois.
            .or_else(|| self.0.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
    }

    /// Último instante do dia local, em UTC (resolução de microssegundos, a mesma do Postgres).
    pub fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        match date.succ_opt() {
            Some(next) => self.start_of_day(next) - Duration::microseconds(1),
            None => Utc.from_utc_datetime(&NaiveDate::MAX.and_time(NaiveTime::MIN)),
        }
    }

    /// Intervalo fechado de instantes que cobre os dias `[start, end]`.
    pub fn day_bounds(&self, start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start_of_day(start), self.end_of_day(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn local_date_converts_before_taking_the_day() {
        let sao_paulo = AppTimeZone::parse("America/Sao_Paulo").unwrap();
        // 01:30Z ainda é o dia anterior em São Paulo (UTC-3).
        assert_eq!(sao_paulo.local_date(utc("2024-01-05T01:30:00Z")), date("2024-01-04"));
        assert_eq!(AppTimeZone::default().local_date(utc("2024-01-05T01:30:00Z")), date("2024-01-05"));
    }

    #[test]
    fn day_bounds_follow_local_midnight() {
        let tz = AppTimeZone::parse("America/Sao_Paulo").unwrap();
        let (start, end) = tz.day_bounds(date("2024-01-02"), date("2024-01-08"));
        assert_eq!(start, utc("2024-01-02T03:00:00Z"));
        assert_eq!(end, utc("2024-01-09T02:59:59.999999Z"));
    }

    #[test]
    fn rejects_unknown_zone() {
        assert!(AppTimeZone::parse("Mars/Olympus").is_err());
    }
}
