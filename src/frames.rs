//! Telemetry frame decoding.
//!
//! The arm streams one line of text per telemetry sample. Two frame shapes
//! exist: a six-field joint-angle frame and a seven-field Cartesian pose
//! frame, both terminated by a carriage return or other whitespace. Field
//! values are extracted as raw substrings -- the arm's numeric formatting
//! (sign, precision) is display data for the consumer, and anything that
//! needs numeric semantics parses the strings itself.
//!
//! The matchers are pure and non-exclusive: a line may match neither shape
//! (command echoes, garbage from a partial read), and that is not an error
//! -- the previous snapshot simply stays current. Callers mixing command
//! echoes and telemetry on one stream pre-filter the echoes before
//! decoding.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static JOINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"J1=(.*) J2=(.*) J3=(.*) J4=(.*) J5=(.*) J6=(.*)[\r\s]")
        .expect("joint frame pattern is valid")
});

static CARTESIAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"X=(.*) Y=(.*) Z=(.*) A=(.*) B=(.*) C=(.*) D=(.*)[\r\s]")
        .expect("cartesian frame pattern is valid")
});

/// One decoded telemetry sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetryFrame {
    /// Joint angles J1..J6, as reported.
    Joint([String; 6]),
    /// Cartesian pose X, Y, Z, A, B, C plus the opaque trailing D field.
    Cartesian([String; 7]),
}

impl TelemetryFrame {
    /// Decode a raw telemetry line into whichever frame shape it matches.
    pub fn decode(line: &str) -> Option<Self> {
        if let Some(values) = match_joint_frame(line) {
            return Some(TelemetryFrame::Joint(values));
        }
        match_cartesian_frame(line).map(TelemetryFrame::Cartesian)
    }
}

/// Extract the six joint values from a joint-angle frame, in J1..J6 order.
///
/// Returns `None` when the line is not a complete joint frame (a missing
/// axis or a missing terminator both disqualify it).
pub fn match_joint_frame(line: &str) -> Option<[String; 6]> {
    let caps = JOINT_RE.captures(line)?;
    Some([
        caps[1].to_string(),
        caps[2].to_string(),
        caps[3].to_string(),
        caps[4].to_string(),
        caps[5].to_string(),
        caps[6].to_string(),
    ])
}

/// Extract the seven pose values from a Cartesian frame, in
/// X, Y, Z, A, B, C, D order.
pub fn match_cartesian_frame(line: &str) -> Option<[String; 7]> {
    let caps = CARTESIAN_RE.captures(line)?;
    Some([
        caps[1].to_string(),
        caps[2].to_string(),
        caps[3].to_string(),
        caps[4].to_string(),
        caps[5].to_string(),
        caps[6].to_string(),
        caps[7].to_string(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_frame_extracts_all_six_values() {
        let line = "pos J1=1.0 J2=2.0 J3=3.0 J4=4.0 J5=5.0 J6=6.0\r";
        let values = match_joint_frame(line).unwrap();
        assert_eq!(values, ["1.0", "2.0", "3.0", "4.0", "5.0", "6.0"]);
    }

    #[test]
    fn joint_frame_missing_axis_is_rejected() {
        let line = "pos J1=1.0 J2=2.0 J3=3.0 J4=4.0 J5=5.0\r";
        assert!(match_joint_frame(line).is_none());
    }

    #[test]
    fn joint_frame_without_terminator_is_rejected() {
        let line = "J1=1.0 J2=2.0 J3=3.0 J4=4.0 J5=5.0 J6=6.0";
        assert!(match_joint_frame(line).is_none());
    }

    #[test]
    fn cartesian_frame_extracts_all_seven_values() {
        let line = "X=10.5 Y=-2.0 Z=300 A=0.0 B=90.0 C=-45.5 D=0\r";
        let values = match_cartesian_frame(line).unwrap();
        assert_eq!(values, ["10.5", "-2.0", "300", "0.0", "90.0", "-45.5", "0"]);
    }

    #[test]
    fn cartesian_match_is_idempotent() {
        let line = "X=1 Y=2 Z=3 A=4 B=5 C=6 D=0\r";
        assert_eq!(match_cartesian_frame(line), match_cartesian_frame(line));
    }

    #[test]
    fn decode_picks_the_matching_shape() {
        let joint = "J1=0 J2=0 J3=0 J4=0 J5=0 J6=0\r";
        let cartesian = "X=1 Y=2 Z=3 A=4 B=5 C=6 D=0\r";
        assert!(matches!(
            TelemetryFrame::decode(joint),
            Some(TelemetryFrame::Joint(_))
        ));
        assert!(matches!(
            TelemetryFrame::decode(cartesian),
            Some(TelemetryFrame::Cartesian(_))
        ));
        assert_eq!(TelemetryFrame::decode("ok\r"), None);
        assert_eq!(TelemetryFrame::decode(""), None);
    }
}
