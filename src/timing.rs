//! Pure timing statistics over capture timestamps.
//!
//! Both functions sort a defensive copy of their input and never mutate it.
//! They exist to feed external visualization/statistics tooling; the core
//! guarantees only their correctness and purity.

use chrono::{Duration, NaiveDateTime};

/// Durations between consecutive captures, ascending-time order.
///
/// Returns `max(n - 1, 0)` non-negative durations.
pub fn inter_arrival_times(times: &[NaiveDateTime]) -> Vec<Duration> {
    let mut sorted = times.to_vec();
    sorted.sort();
    sorted.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

/// Offset of every capture (ascending-time order) from `reference`.
///
/// When `reference` is omitted it defaults to the earliest timestamp, making
/// the first element the zero duration.
pub fn delay_from_first(
    times: &[NaiveDateTime],
    reference: Option<NaiveDateTime>,
) -> Vec<Duration> {
    let mut sorted = times.to_vec();
    sorted.sort();
    let Some(first) = reference.or_else(|| sorted.first().copied()) else {
        return Vec::new();
    };
    sorted.into_iter().map(|t| t - first).collect()
}

/// Duration as fractional milliseconds.
pub fn duration_to_ms(d: Duration) -> f64 {
    match d.num_microseconds() {
        Some(us) => us as f64 / 1_000.0,
        None => d.num_milliseconds() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filename::parse_timestamp;

    fn t(s: &str) -> NaiveDateTime {
        parse_timestamp(s).expect("test timestamp")
    }

    #[test]
    fn inter_arrival_length_and_values() {
        let times = vec![
            t("2023-05-30_21-34-29.000000"),
            t("2023-05-30_21-34-27.000000"),
            t("2023-05-30_21-34-28.500000"),
        ];
        let deltas = inter_arrival_times(&times);
        assert_eq!(deltas.len(), times.len() - 1);
        assert_eq!(deltas[0], Duration::microseconds(1_500_000));
        assert_eq!(deltas[1], Duration::microseconds(500_000));
        assert!(deltas.iter().all(|d| *d >= Duration::zero()));
        // Input untouched.
        assert_eq!(times[0], t("2023-05-30_21-34-29.000000"));
    }

    #[test]
    fn inter_arrival_of_few_samples_is_empty() {
        assert!(inter_arrival_times(&[]).is_empty());
        assert!(inter_arrival_times(&[t("2023-05-30_21-34-27.000000")]).is_empty());
    }

    #[test]
    fn delay_from_first_defaults_to_zero_origin() {
        let times = vec![
            t("2023-05-30_21-34-28.000000"),
            t("2023-05-30_21-34-27.000000"),
            t("2023-05-30_21-34-30.250000"),
        ];
        let offsets = delay_from_first(&times, None);
        assert_eq!(offsets.len(), 3);
        assert_eq!(offsets[0], Duration::zero());
        assert_eq!(offsets[1], Duration::seconds(1));
        assert_eq!(offsets[2], Duration::microseconds(3_250_000));
    }

    #[test]
    fn delay_from_explicit_reference() {
        let times = vec![t("2023-05-30_21-34-28.000000")];
        let offsets = delay_from_first(&times, Some(t("2023-05-30_21-34-27.000000")));
        assert_eq!(offsets, vec![Duration::seconds(1)]);
    }

    #[test]
    fn delay_from_first_of_empty_is_empty() {
        assert!(delay_from_first(&[], None).is_empty());
    }

    #[test]
    fn duration_to_ms_keeps_microseconds() {
        assert_eq!(duration_to_ms(Duration::microseconds(1_500)), 1.5);
        assert_eq!(duration_to_ms(Duration::milliseconds(-20)), -20.0);
    }
}
