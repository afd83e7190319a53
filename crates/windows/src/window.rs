//! Window validation and the per-subject non-overlap invariant.

use quietsend_core::error::{QuietError, QuietResult};
use quietsend_core::types::Window;
use uuid::Uuid;

use crate::interval;

/// Reject degenerate windows before any overlap checking. A zero-length or
/// full-day window (`start == end`) is meaningless.
pub fn validate(window: &Window) -> QuietResult<()> {
    if window.start == window.end {
        return Err(QuietError::SameStartEnd);
    }
    Ok(())
}

/// Decide whether `candidate` may join `existing` without violating the
/// non-overlap invariant. `exclude` skips one id during an update-in-place
/// check so a window never conflicts with the version it replaces.
///
/// Pure decision — committing the window is the store's responsibility, and
/// the invariant only holds if the store honors the result before
/// persisting.
pub fn can_insert(
    candidate: &Window,
    existing: &[Window],
    exclude: Option<Uuid>,
) -> QuietResult<()> {
    validate(candidate)?;
    for other in existing {
        if Some(other.id) == exclude {
            continue;
        }
        if interval::overlaps(candidate.start, candidate.end, other.start, other.end) {
            return Err(QuietError::Overlap {
                conflicting_id: other.id,
            });
        }
    }
    Ok(())
}

/// Presentational ordering: ascending by start time.
pub fn sort_by_start(windows: &mut [Window]) {
    windows.sort_by_key(|w| w.start);
}

#[cfg(test)]
mod tests {
    use super::*;
    use quietsend_core::time::TimeOfDay;

    fn window(subject: Uuid, start: &str, end: &str) -> Window {
        Window::new(
            subject,
            TimeOfDay::parse(start).unwrap(),
            TimeOfDay::parse(end).unwrap(),
        )
    }

    #[test]
    fn test_validate_rejects_same_start_end() {
        let subject = Uuid::new_v4();
        let degenerate = window(subject, "09:00", "09:00");
        assert!(matches!(
            validate(&degenerate),
            Err(QuietError::SameStartEnd)
        ));
        assert!(validate(&window(subject, "09:00", "09:01")).is_ok());
    }

    #[test]
    fn test_non_overlapping_pair_accepted_in_either_order() {
        let subject = Uuid::new_v4();
        let morning = window(subject, "08:00", "10:00");
        let evening = window(subject, "20:00", "22:00");

        assert!(can_insert(&morning, &[evening], None).is_ok());
        assert!(can_insert(&evening, &[morning], None).is_ok());
    }

    #[test]
    fn test_overlap_rejected_with_conflicting_id() {
        let subject = Uuid::new_v4();
        let overnight = window(subject, "22:00", "07:00");
        let candidate = window(subject, "06:00", "08:00");

        match can_insert(&candidate, &[overnight], None) {
            Err(QuietError::Overlap { conflicting_id }) => {
                assert_eq!(conflicting_id, overnight.id);
            }
            other => panic!("expected Overlap, got {other:?}"),
        }
    }

    #[test]
    fn test_candidate_inside_wraparound_window_rejected() {
        let subject = Uuid::new_v4();
        let overnight = window(subject, "22:00", "07:00");
        let contained = window(subject, "23:00", "01:00");

        assert!(matches!(
            can_insert(&contained, &[overnight], None),
            Err(QuietError::Overlap { .. })
        ));
    }

    #[test]
    fn test_back_to_back_windows_accepted() {
        let subject = Uuid::new_v4();
        let overnight = window(subject, "22:00", "07:00");
        let morning = window(subject, "07:00", "08:00");

        assert!(can_insert(&morning, &[overnight], None).is_ok());
    }

    #[test]
    fn test_exclude_allows_update_in_place() {
        let subject = Uuid::new_v4();
        let original = window(subject, "22:00", "07:00");

        // Shift the same window by an hour; it only "conflicts" with itself.
        let mut replacement = original;
        replacement.start = TimeOfDay::parse("21:00").unwrap();

        assert!(matches!(
            can_insert(&replacement, &[original], None),
            Err(QuietError::Overlap { .. })
        ));
        assert!(can_insert(&replacement, &[original], Some(original.id)).is_ok());
    }

    #[test]
    fn test_sort_by_start() {
        let subject = Uuid::new_v4();
        let mut windows = vec![
            window(subject, "20:00", "22:00"),
            window(subject, "08:00", "10:00"),
            window(subject, "13:00", "15:00"),
        ];
        sort_by_start(&mut windows);
        let starts: Vec<String> = windows.iter().map(|w| w.start.to_string()).collect();
        assert_eq!(starts, ["08:00", "13:00", "20:00"]);
    }
}
