//! Radar datagram parsing.
//!
//! A radar reports one observation per datagram as a comma-separated
//! ASCII line:
//!
//! ```text
//! <sourceTag>,<sequence>,<lane>,<speed>[,<observedAt>][,...]
//! ```
//!
//! Only the lane (field 2), the speed (field 3) and the optional
//! observation timestamp (field 4) are consumed. The source tag, the
//! radar-side sequence number and any trailing fields are ignored.

use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

/// Leading fields a datagram must carry: tag, sequence, lane, speed.
const MIN_FIELDS: usize = 4;

/// One radar speed observation, decoded from a datagram line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Lane identifier as reported by the radar.
    pub lane: String,
    /// Measured speed in km/h.
    pub speed_kmh: u32,
    /// Observation timestamp supplied by the radar, if any.
    ///
    /// `None` when the field is missing or empty; the receiver
    /// substitutes its own receipt time downstream.
    pub observed_at: Option<String>,
}

impl Reading {
    /// Parse one datagram line.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::TooFewFields`] for lines with fewer than
    /// four comma-separated fields, and [`ProtocolError::InvalidSpeed`]
    /// when the speed field does not parse as a non-negative integer.
    pub fn parse(raw: &str) -> Result<Self> {
        let fields: Vec<&str> = raw.split(',').collect();
        if fields.len() < MIN_FIELDS {
            return Err(ProtocolError::TooFewFields { got: fields.len() });
        }

        let lane = fields[2].trim().to_string();
        let speed_field = fields[3].trim();
        let speed_kmh = speed_field
            .parse::<u32>()
            .map_err(|_| ProtocolError::InvalidSpeed { field: speed_field.to_string() })?;

        let observed_at = fields
            .get(4)
            .map(|field| field.trim())
            .filter(|field| !field.is_empty())
            .map(str::to_string);

        Ok(Self { lane, speed_kmh, observed_at })
    }

    /// Render the datagram line a radar would have sent for this reading.
    ///
    /// The manual injection path synthesizes its input with this so that
    /// manually entered readings take the exact same route as network
    /// packets.
    #[must_use]
    pub fn synthesize_line(lane: &str, speed_kmh: u32, observed_at: &str) -> String {
        format!("MZ,0,{lane},{speed_kmh},{observed_at},1,")
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_minimal_datagram() {
        let reading = Reading::parse("MZ,17,3,42").unwrap();
        assert_eq!(reading.lane, "3");
        assert_eq!(reading.speed_kmh, 42);
        assert_eq!(reading.observed_at, None);
    }

    #[test]
    fn parses_datagram_with_timestamp_and_trailing_fields() {
        let reading = Reading::parse("MZ,0,2,95,2024-01-01 10:00:00,1,").unwrap();
        assert_eq!(reading.lane, "2");
        assert_eq!(reading.speed_kmh, 95);
        assert_eq!(reading.observed_at.as_deref(), Some("2024-01-01 10:00:00"));
    }

    #[test]
    fn trims_whitespace_around_lane_and_speed() {
        let reading = Reading::parse("MZ,0, 4 , 61 ").unwrap();
        assert_eq!(reading.lane, "4");
        assert_eq!(reading.speed_kmh, 61);
    }

    #[test]
    fn rejects_short_line() {
        let err = Reading::parse("A,1").unwrap_err();
        assert_eq!(err, ProtocolError::TooFewFields { got: 2 });
    }

    #[test]
    fn rejects_empty_line() {
        // An empty string still splits into one (empty) field.
        let err = Reading::parse("").unwrap_err();
        assert_eq!(err, ProtocolError::TooFewFields { got: 1 });
    }

    #[test]
    fn rejects_non_numeric_speed() {
        let err = Reading::parse("MZ,0,1,fast").unwrap_err();
        assert_eq!(err, ProtocolError::InvalidSpeed { field: "fast".into() });
    }

    #[test]
    fn rejects_negative_speed() {
        let err = Reading::parse("MZ,0,1,-5").unwrap_err();
        assert_eq!(err, ProtocolError::InvalidSpeed { field: "-5".into() });
    }

    #[test]
    fn empty_timestamp_field_is_absent() {
        let reading = Reading::parse("MZ,0,1,30,,x").unwrap();
        assert_eq!(reading.observed_at, None);
    }

    #[test]
    fn synthesized_line_round_trips() {
        let line = Reading::synthesize_line("2", 88, "2024-06-01 08:30:00");
        let reading = Reading::parse(&line).unwrap();
        assert_eq!(reading.lane, "2");
        assert_eq!(reading.speed_kmh, 88);
        assert_eq!(reading.observed_at.as_deref(), Some("2024-06-01 08:30:00"));
    }

    proptest! {
        #[test]
        fn parse_never_panics(raw in ".*") {
            let _ = Reading::parse(&raw);
        }

        #[test]
        fn valid_synthesis_always_parses(
            lane in "[0-9]{1,3}",
            speed in 0u32..400,
        ) {
            let line = Reading::synthesize_line(&lane, speed, "2024-01-01 00:00:00");
            let reading = Reading::parse(&line).unwrap();
            prop_assert_eq!(reading.lane, lane);
            prop_assert_eq!(reading.speed_kmh, speed);
        }
    }
}
