//! Room availability and pricing for hotel stays.
//!
//! Stays are half-open intervals `[start, end)`: a guest checking out at
//! 10:00 frees the room for a guest checking in at 10:00.

use std::ops::Range;

use chrono::NaiveDateTime;

const SECONDS_PER_NIGHT: i64 = 24 * 60 * 60;

pub fn overlaps(a: &Range<NaiveDateTime>, b: &Range<NaiveDateTime>) -> bool {
    a.end > b.start && a.start < b.end
}

/// Whether `stay` is active somewhere in `window`. A zero-length window is the
/// single instant `window.start`.
pub fn occupies(stay: &Range<NaiveDateTime>, window: &Range<NaiveDateTime>) -> bool {
    if window.start == window.end {
        stay.start <= window.start && window.start < stay.end
    } else {
        overlaps(stay, window)
    }
}

/// Highest number of `stays` active at the same instant inside `window`.
pub fn peak_occupancy<I>(stays: I, window: &Range<NaiveDateTime>) -> usize
where
    I: IntoIterator<Item = Range<NaiveDateTime>>,
{
    let active = stays.into_iter().filter(|stay| occupies(stay, window));
    if window.start == window.end {
        return active.count();
    }

    peak(active.map(|stay| stay.start.max(window.start)..stay.end.min(window.end)))
}

/// Highest number of `stays` active at the same instant, over all time.
pub fn peak_concurrency<I>(stays: I) -> usize
where
    I: IntoIterator<Item = Range<NaiveDateTime>>,
{
    peak(stays.into_iter().filter(|stay| stay.start < stay.end))
}

fn peak(stays: impl Iterator<Item = Range<NaiveDateTime>>) -> usize {
    // (instant, delta); releases sort before arrivals at the same instant
    let mut events: Vec<(NaiveDateTime, i32)> = Vec::new();
    for stay in stays {
        events.push((stay.start, 1));
        events.push((stay.end, -1));
    }
    events.sort();

    let mut current = 0i32;
    let mut peak = 0i32;
    for (_, delta) in events {
        current += delta;
        peak = peak.max(current);
    }

    peak as usize
}

/// Whether one more stay over `requested` fits in a hotel with `room_amount` rooms.
pub fn is_available<I>(room_amount: i32, stays: I, requested: &Range<NaiveDateTime>) -> bool
where
    I: IntoIterator<Item = Range<NaiveDateTime>>,
{
    if room_amount <= 0 {
        return false;
    }
    let capacity = room_amount as usize;

    let occupying: Vec<Range<NaiveDateTime>> = stays
        .into_iter()
        .filter(|stay| occupies(stay, requested))
        .collect();

    if occupying.len() < capacity {
        return true;
    }

    peak_occupancy(occupying, requested) < capacity
}

/// Nights billed for a stay. Any started day counts as a full night.
pub fn nights(stay: &Range<NaiveDateTime>) -> i64 {
    let seconds = (stay.end - stay.start).num_seconds().max(0);
    (seconds + SECONDS_PER_NIGHT - 1) / SECONDS_PER_NIGHT
}

pub fn amount(rate: f64, stay: &Range<NaiveDateTime>) -> f64 {
    rate * nights(stay) as f64
}
