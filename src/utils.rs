use chrono::{DateTime, DurationRound, TimeDelta, Utc};

/// Grid that finished shifts are snapped to, in minutes.
pub const ROUND_TO_MINUTES: i64 = 5;

/// Round a timestamp to the nearest 5-minute boundary.
///
/// Everything below the minute counts toward the distance, and a timestamp
/// exactly halfway between two grid points is rounded up.
pub fn round_time(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    let grid = TimeDelta::minutes(ROUND_TO_MINUTES);
    // duration_round only fails for spans larger than the timestamp itself
    timestamp.duration_round(grid).unwrap_or(timestamp)
}

/// Split a span into whole seconds and the signed microsecond remainder.
pub fn split_micros(span: TimeDelta) -> (i64, i64) {
    let seconds = span.num_seconds();
    let remainder = span - TimeDelta::seconds(seconds);
    (seconds, remainder.num_microseconds().unwrap_or(0))
}

/// Serialize spans as whole seconds.
pub mod serde_seconds {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(span: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(span.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        from_seconds(seconds)
    }

    fn from_seconds<E: serde::de::Error>(seconds: i64) -> Result<TimeDelta, E> {
        TimeDelta::try_seconds(seconds)
            .ok_or_else(|| E::custom(format!("{} seconds is out of range", seconds)))
    }

    pub mod option {
        use chrono::TimeDelta;
        use serde::{Deserialize, Deserializer, Serializer};

        use super::from_seconds;

        pub fn serialize<S: Serializer>(
            span: &Option<TimeDelta>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match span {
                Some(span) => serializer.serialize_some(&span.num_seconds()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<TimeDelta>, D::Error> {
            let seconds = Option::<i64>::deserialize(deserializer)?;
            seconds.map(from_seconds::<D::Error>).transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, h, m, s).unwrap()
    }

    #[test]
    fn rounds_to_nearest_grid_point() {
        assert_eq!(round_time(at(9, 2, 0)), at(9, 0, 0));
        assert_eq!(round_time(at(9, 3, 0)), at(9, 5, 0));
        assert_eq!(round_time(at(9, 4, 0)), at(9, 5, 0));
        assert_eq!(round_time(at(17, 3, 0)), at(17, 5, 0));
        assert_eq!(round_time(at(12, 0, 0)), at(12, 0, 0));
    }

    #[test]
    fn halfway_rounds_up() {
        assert_eq!(round_time(at(9, 2, 30)), at(9, 5, 0));
        assert_eq!(round_time(at(9, 2, 29)), at(9, 0, 0));
    }

    #[test]
    fn rounding_can_cross_midnight() {
        let late = Utc.with_ymd_and_hms(2024, 3, 4, 23, 58, 0).unwrap();
        let next = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(round_time(late), next);
    }

    #[derive(Debug, serde::Deserialize)]
    struct Spans {
        #[serde(with = "serde_seconds")]
        pause: TimeDelta,
        #[serde(with = "serde_seconds::option")]
        duration: Option<TimeDelta>,
    }

    #[test]
    fn seconds_deserialize_into_spans() {
        let spans: Spans = serde_json::from_str(r#"{"pause": 90, "duration": null}"#).unwrap();
        assert_eq!(spans.pause, TimeDelta::seconds(90));
        assert_eq!(spans.duration, None);
    }

    #[test]
    fn out_of_range_seconds_are_rejected() {
        let huge = format!(r#"{{"pause": {}, "duration": 60}}"#, i64::MAX);
        assert!(serde_json::from_str::<Spans>(&huge).is_err());

        let huge = format!(r#"{{"pause": 0, "duration": {}}}"#, i64::MIN);
        assert!(serde_json::from_str::<Spans>(&huge).is_err());
    }

    #[test]
    fn split_micros_keeps_sign() {
        let span = TimeDelta::milliseconds(2_500);
        assert_eq!(split_micros(span), (2, 500_000));

        let negative = TimeDelta::milliseconds(-2_500);
        assert_eq!(split_micros(negative), (-2, -500_000));
    }
}
