// src/services/attendance/summary.rs

use chrono::{DateTime, Utc};

use crate::models::attendance::{AttendanceEvent, AttendanceEventType, AttendanceStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryTotals {
    pub total_minutes: i32,
    pub first_in: Option<DateTime<Utc>>,
    pub last_out: Option<DateTime<Utc>>,
}

/// Minutos inteiros entre dois instantes, arredondados e nunca negativos.
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    ((millis as f64) / 60_000.0).round().max(0.0) as i64
}

/// Soma os minutos trabalhados de um período.
///
/// Os eventos podem chegar fora de ordem; são ordenados por `event_at`.
/// Intervalos (BREAK_START -> BREAK_END) somam ao total, e o trecho IN -> OUT
/// é somado inteiro, com o intervalo dentro dele.
pub fn build_summary(events: &[AttendanceEvent]) -> SummaryTotals {
    if events.is_empty() {
        return SummaryTotals::default();
    }

    let mut sorted: Vec<&AttendanceEvent> = events.iter().collect();
    sorted.sort_by_key(|event| event.event_at);

    let first_in = sorted
        .iter()
        .find(|event| event.event_type == AttendanceEventType::In)
        .map(|event| event.event_at);
    let last_out = sorted
        .iter()
        .rev()
        .find(|event| event.event_type == AttendanceEventType::Out)
        .map(|event| event.event_at);

    let mut total: i64 = 0;
    let mut current_in: Option<DateTime<Utc>> = None;
    let mut break_start: Option<DateTime<Utc>> = None;

    for event in sorted {
        match event.event_type {
            AttendanceEventType::In => {
                current_in = Some(event.event_at);
                break_start = None;
            }
            AttendanceEventType::BreakStart => {
                if current_in.is_some() {
                    break_start = Some(event.event_at);
                }
            }
            AttendanceEventType::BreakEnd => {
                if let (Some(started), Some(_)) = (break_start, current_in) {
                    total += minutes_between(started, event.event_at);
                    break_start = None;
                }
            }
            AttendanceEventType::Out => {
                if let Some(clocked_in) = current_in {
                    total += minutes_between(clocked_in, event.event_at);
                    current_in = None;
                    break_start = None;
                }
            }
        }
    }

    SummaryTotals {
        total_minutes: i32::try_from(total.max(0)).unwrap_or(i32::MAX),
        first_in,
        last_out,
    }
}

pub fn classify_status(
    total_minutes: i32,
    first_in: Option<DateTime<Utc>>,
    last_out: Option<DateTime<Utc>>,
) -> AttendanceStatus {
    if first_in.is_none() && last_out.is_none() {
        return AttendanceStatus::Absent;
    }
    if total_minutes <= 0 {
        return AttendanceStatus::Partial;
    }
    AttendanceStatus::Present
}
