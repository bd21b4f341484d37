use serde::{Deserialize, Serialize};

/// Interpolation mode of a Cartesian move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveMode {
    /// Point-to-point motion (`G20`): each axis moves independently.
    PointToPoint,
    /// Linear motion (`G21`): the tool tip follows a straight line.
    Linear,
}

impl MoveMode {
    pub(crate) fn opcode(self) -> &'static str {
        match self {
            MoveMode::PointToPoint => "G20",
            MoveMode::Linear => "G21",
        }
    }
}

/// Direction of a single-joint jog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JogDirection {
    /// Clockwise / upward on the operator panel.
    Positive,
    /// Counter-clockwise / downward on the operator panel.
    Negative,
}

/// Which coordinate frame the arm streams in its telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Stream Cartesian pose frames (`G07 GCM=1`).
    Cartesian,
    /// Stream joint angle frames (`G07 GCM=0`).
    Joint,
}

/// The mode the arm is believed to be in, inferred purely from the last
/// control byte sent. The protocol has no mode query, so this is never a
/// device read-back; motion commands re-assert command mode regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceMode {
    /// Idle (0x10), the power-on state.
    #[default]
    Idle,
    /// Command interpreter reset (0x30).
    Reset,
    /// Command mode 14 (0x14), required for motion and parameter commands.
    Command14,
}

impl DeviceMode {
    /// Map a control byte to the mode it selects, if any.
    pub fn from_control_byte(byte: u8) -> Option<Self> {
        match byte {
            crate::constants::CTRL_IDLE => Some(DeviceMode::Idle),
            crate::constants::CTRL_RESET => Some(DeviceMode::Reset),
            crate::constants::CTRL_MODE14 => Some(DeviceMode::Command14),
            _ => None,
        }
    }
}

/// Target of a Cartesian move.
///
/// Each field holds the value to send for that axis, formatted exactly as
/// it should appear on the wire. `None` (or a blank string) omits the axis
/// from the command, leaving it to hold position. The `d` field has no
/// documented meaning; the arm expects it as `"0"` on full-pose moves and
/// it is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartesianTarget {
    pub x: Option<String>,
    pub y: Option<String>,
    pub z: Option<String>,
    pub a: Option<String>,
    pub b: Option<String>,
    pub c: Option<String>,
    pub d: Option<String>,
}

impl CartesianTarget {
    pub(crate) fn fields(&self) -> [(&'static str, Option<&str>); 7] {
        [
            ("X", self.x.as_deref()),
            ("Y", self.y.as_deref()),
            ("Z", self.z.as_deref()),
            ("A", self.a.as_deref()),
            ("B", self.b.as_deref()),
            ("C", self.c.as_deref()),
            ("D", self.d.as_deref()),
        ]
    }
}

/// Target of a multi-joint move. Same omit-if-absent rule as
/// [`CartesianTarget`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointTarget {
    pub j1: Option<String>,
    pub j2: Option<String>,
    pub j3: Option<String>,
    pub j4: Option<String>,
    pub j5: Option<String>,
    pub j6: Option<String>,
}

impl JointTarget {
    pub(crate) fn fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("J1", self.j1.as_deref()),
            ("J2", self.j2.as_deref()),
            ("J3", self.j3.as_deref()),
            ("J4", self.j4.as_deref()),
            ("J5", self.j5.as_deref()),
            ("J6", self.j6.as_deref()),
        ]
    }
}
