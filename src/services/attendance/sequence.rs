// src/services/attendance/sequence.rs

use thiserror::Error;

use crate::models::attendance::AttendanceEventType;

/// Motivos de rejeição de uma batida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequenceViolation {
    #[error("First punch must be IN")]
    FirstPunchMustBeIn,

    #[error("Next punch must start with IN after OUT")]
    InRequiredAfterOut,

    #[error("Duplicate {0} punch not allowed")]
    Duplicate(AttendanceEventType),

    #[error("Invalid punch order after {0}")]
    OutOfOrder(AttendanceEventType),

    #[error("BREAK_END requires BREAK_START")]
    BreakEndWithoutBreakStart,

    #[error("OUT requires BREAK_END")]
    OutDuringBreak,
}

// IN < BREAK_START < BREAK_END < OUT
fn rank(event_type: AttendanceEventType) -> u8 {
    match event_type {
        AttendanceEventType::In => 0,
        AttendanceEventType::BreakStart => 1,
        AttendanceEventType::BreakEnd => 2,
        AttendanceEventType::Out => 3,
    }
}

/// Decide se `next` pode seguir a última batida registrada da pessoa.
pub fn validate_sequence(
    last: Option<AttendanceEventType>,
    next: AttendanceEventType,
) -> Result<(), SequenceViolation> {
    use AttendanceEventType::*;

    let Some(last) = last else {
        return match next {
            In => Ok(()),
            _ => Err(SequenceViolation::FirstPunchMustBeIn),
        };
    };

    if last == Out && next != In {
        return Err(SequenceViolation::InRequiredAfterOut);
    }

    if next == last {
        return Err(SequenceViolation::Duplicate(next));
    }

    if rank(next) < rank(last) && !(last == Out && next == In) {
        return Err(SequenceViolation::OutOfOrder(last));
    }

    if last == In && next == BreakEnd {
        return Err(SequenceViolation::BreakEndWithoutBreakStart);
    }

    if last == BreakStart && next == Out {
        return Err(SequenceViolation::OutDuringBreak);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttendanceEventType::*;

    const ALL: [AttendanceEventType; 4] = [In, BreakStart, BreakEnd, Out];

    #[test]
    fn first_punch_must_be_in() {
        for next in ALL {
            let result = validate_sequence(None, next);
            assert_eq!(result.is_ok(), next == In, "first punch {next}");
        }
        assert_eq!(
            validate_sequence(None, Out).unwrap_err().to_string(),
            "First punch must be IN"
        );
    }

    #[test]
    fn only_in_follows_out() {
        assert_eq!(validate_sequence(Some(Out), In), Ok(()));
        for next in [BreakStart, BreakEnd, Out] {
            assert_eq!(
                validate_sequence(Some(Out), next),
                Err(SequenceViolation::InRequiredAfterOut)
            );
        }
    }

    #[test]
    fn duplicates_are_rejected() {
        for event_type in [In, BreakStart, BreakEnd] {
            assert_eq!(
                validate_sequence(Some(event_type), event_type),
                Err(SequenceViolation::Duplicate(event_type))
            );
        }
        assert_eq!(
            validate_sequence(Some(In), In).unwrap_err().to_string(),
            "Duplicate IN punch not allowed"
        );
    }

    #[test]
    fn break_end_needs_break_start() {
        let err = validate_sequence(Some(In), BreakEnd).unwrap_err();
        assert_eq!(err, SequenceViolation::BreakEndWithoutBreakStart);
        assert_eq!(err.to_string(), "BREAK_END requires BREAK_START");
    }

    #[test]
    fn out_during_break_is_rejected() {
        assert_eq!(
            validate_sequence(Some(BreakStart), Out),
            Err(SequenceViolation::OutDuringBreak)
        );
    }

    #[test]
    fn going_backwards_is_rejected() {
        assert_eq!(
            validate_sequence(Some(BreakStart), In),
            Err(SequenceViolation::OutOfOrder(BreakStart))
        );
        assert_eq!(
            validate_sequence(Some(BreakEnd), BreakStart),
            Err(SequenceViolation::OutOfOrder(BreakEnd))
        );
        assert_eq!(
            validate_sequence(Some(BreakEnd), In).unwrap_err().to_string(),
            "Invalid punch order after BREAK_END"
        );
    }

    #[test]
    fn full_day_is_accepted() {
        let day = [In, BreakStart, BreakEnd, Out, In, Out];
        let mut last = None;
        for next in day {
            assert_eq!(validate_sequence(last, next), Ok(()), "{last:?} -> {next}");
            last = Some(next);
        }
    }

    #[test]
    fn accepted_transitions_never_repeat_a_type() {
        for last in ALL {
            for next in ALL {
                if validate_sequence(Some(last), next).is_ok() {
                    assert_ne!(last, next);
                }
            }
        }
    }
}
