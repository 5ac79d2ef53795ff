//! Scoring-window overlap analysis and ordering helpers.

use chirpline_spec::GameEvent;

/// Returns true if the two events' scoring windows intersect as open intervals.
///
/// Windows that only share an endpoint do not overlap.
pub fn windows_overlap(a: &GameEvent, b: &GameEvent) -> bool {
    a.scoring_window_start_ms < b.scoring_window_end_ms
        && a.scoring_window_end_ms > b.scoring_window_start_ms
}

/// Returns the index pairs `(i, j)`, `i < j`, of overlapping events.
pub fn overlap_pairs(events: &[GameEvent]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..events.len() {
        for j in (i + 1)..events.len() {
            if windows_overlap(&events[i], &events[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Counts overlapping event pairs.
pub fn count_overlaps(events: &[GameEvent]) -> usize {
    let mut count = 0;
    for i in 0..events.len() {
        for j in (i + 1)..events.len() {
            if windows_overlap(&events[i], &events[j]) {
                count += 1;
            }
        }
    }
    count
}

/// Returns true if any two events overlap.
pub fn has_overlaps(events: &[GameEvent]) -> bool {
    events
        .iter()
        .enumerate()
        .any(|(i, a)| events[i + 1..].iter().any(|b| windows_overlap(a, b)))
}

/// Sorts events by scheduled time, ties broken by event id.
///
/// Secondary events can land before the primary that spawned them, so callers
/// that need strict chronological order sort the combined output with this.
pub fn sort_chronological(events: &mut [GameEvent]) {
    events.sort_by(|a, b| {
        a.scheduled_time_ms
            .cmp(&b.scheduled_time_ms)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });
}
