// src/services/attendance/period.rs

use std::num::NonZeroU32;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::models::attendance::WeekStart;

/// Janela de calendário `[start, end]` (datas locais, ambos inclusivos).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Resolve o período que contém `day`.
///
/// A âncora é a ocorrência mais recente de `week_start` em ou antes de `day`;
/// o período é o bloco de `period_days` dias, contado a partir da âncora, que
/// contém o dia. `day` já deve estar no fuso da aplicação.
///
/// Retorna `None` só quando a janela sairia do intervalo de datas do chrono.
pub fn resolve_period(day: NaiveDate, period_days: NonZeroU32, week_start: WeekStart) -> Option<Period> {
    let period_days = u64::from(period_days.get());

    let day_index = day.weekday().num_days_from_sunday();
    let target = week_start.weekday().num_days_from_sunday();
    let diff = (day_index + 7 - target) % 7;

    let anchor = day.checked_sub_days(Days::new(u64::from(diff)))?;
    let days_since_anchor = (day - anchor).num_days().max(0) as u64;
    let period_index = days_since_anchor / period_days;

    let start = anchor.checked_add_days(Days::new(period_index * period_days))?;
    let end = start.checked_add_days(Days::new(period_days - 1))?;

    Some(Period { start, end })
}
