//! Pure time-of-day interval algebra over the minute domain `[0, 1440)`.
//!
//! A wrapping interval (`end <= start`) is decomposed into the half-open
//! sub-ranges `[start, 1440)` and `[0, end)`; everything else is a single
//! `[start, end)`. Overlap and containment both fall out of that
//! decomposition, and touching endpoints never count as overlap.

use quietsend_core::time::{TimeOfDay, MINUTES_PER_DAY};

/// The one or two half-open minute spans an interval decomposes into. The
/// second slot is an empty span for a plain interval. `start == end` is
/// rejected upstream; if it does arrive here it is treated as the full day
/// so the primitive stays total.
fn spans(start: TimeOfDay, end: TimeOfDay) -> [(u16, u16); 2] {
    let (s, e) = (start.minutes(), end.minutes());
    if s < e {
        [(s, e), (0, 0)]
    } else if s == e {
        [(0, MINUTES_PER_DAY), (0, 0)]
    } else {
        [(s, MINUTES_PER_DAY), (0, e)]
    }
}

/// Half-open intersection test; an empty span intersects nothing.
fn intersects(a: (u16, u16), b: (u16, u16)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// Whether two daily intervals overlap, wraparound aware. One interval
/// ending exactly where another starts is not overlap.
pub fn overlaps(s1: TimeOfDay, e1: TimeOfDay, s2: TimeOfDay, e2: TimeOfDay) -> bool {
    spans(s1, e1)
        .iter()
        .any(|a| spans(s2, e2).iter().any(|b| intersects(*a, *b)))
}

/// Whether `instant` falls inside `[start, end)`, wraparound aware.
pub fn contains(instant: TimeOfDay, start: TimeOfDay, end: TimeOfDay) -> bool {
    if start == end {
        return true;
    }
    if start < end {
        instant >= start && instant < end
    } else {
        instant >= start || instant < end
    }
}
