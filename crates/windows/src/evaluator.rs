//! Quiet-hours decision — "is instant T quiet for this window set".
//!
//! Performs no I/O: the caller supplies the subject's current windows,
//! fetched from whatever store owns them.

use chrono::{DateTime, Utc};
use quietsend_core::time::TimeOfDay;
use quietsend_core::types::Window;

use crate::interval;

/// True iff any window contains the instant. An empty set means no quiet
/// hours are configured, so never suppress.
pub fn is_quiet(windows: &[Window], instant: TimeOfDay) -> bool {
    windows
        .iter()
        .any(|w| interval::contains(instant, w.start, w.end))
}

/// Evaluate at a wall-clock instant, truncated to its minute-of-day.
pub fn is_quiet_at(windows: &[Window], instant: &DateTime<Utc>) -> bool {
    is_quiet(windows, TimeOfDay::from_datetime(instant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn windows(hours: &[(&str, &str)]) -> Vec<Window> {
        let subject = Uuid::new_v4();
        hours
            .iter()
            .map(|(s, e)| {
                Window::new(
                    subject,
                    TimeOfDay::parse(s).unwrap(),
                    TimeOfDay::parse(e).unwrap(),
                )
            })
            .collect()
    }

    fn t(text: &str) -> TimeOfDay {
        TimeOfDay::parse(text).unwrap()
    }

    #[test]
    fn test_overnight_containment() {
        let set = windows(&[("22:00", "07:00")]);
        assert!(is_quiet(&set, t("23:30")));
        assert!(is_quiet(&set, t("06:30")));
        assert!(!is_quiet(&set, t("08:00")));
    }

    #[test]
    fn test_daytime_window() {
        let set = windows(&[("13:00", "15:00")]);
        assert!(is_quiet(&set, t("14:00")));
        assert!(!is_quiet(&set, t("16:00")));
    }

    #[test]
    fn test_empty_set_is_never_quiet() {
        for m in [0u16, 360, 720, 1080, 1439] {
            assert!(!is_quiet(&[], TimeOfDay::from_minutes(m).unwrap()));
        }
    }

    #[test]
    fn test_multiple_windows() {
        let set = windows(&[("22:00", "07:00"), ("13:00", "14:00")]);
        assert!(is_quiet(&set, t("13:30")));
        assert!(is_quiet(&set, t("23:00")));
        assert!(!is_quiet(&set, t("12:00")));
    }
}
