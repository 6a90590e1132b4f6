//! Motor command and the two-motor duty-cycle emulation behind it.
//!
//! The robots have two vibration motors.  Controllers "spin up" the motors
//! and set a duty cycle on each; only a motor that was spun up and runs at
//! its calibrated duty actually moves the robot.  After every control step
//! the driver collapses that state into one of four motion commands:
//!
//! | left | right | command     |
//! |------|-------|-------------|
//! | on   | on    | `Forward`   |
//! | off  | on    | `RotateCw`  |
//! | on   | off   | `RotateCcw` |
//! | off  | off   | `Stop`      |

/// Calibrated duty cycle for driving straight (left motor).
pub const KILO_STRAIGHT_LEFT: u8 = 50;
/// Calibrated duty cycle for driving straight (right motor).
pub const KILO_STRAIGHT_RIGHT: u8 = 50;
/// Calibrated duty cycle for turning left (left motor only).
pub const KILO_TURN_LEFT: u8 = 50;
/// Calibrated duty cycle for turning right (right motor only).
pub const KILO_TURN_RIGHT: u8 = 50;

/// Motion the engine applies this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Motor {
    #[default]
    Stop,
    Forward,
    RotateCw,
    RotateCcw,
}

impl Motor {
    /// `true` for any command that drains the battery.
    #[inline]
    pub fn is_moving(self) -> bool {
        self != Motor::Stop
    }

    /// Numeric code used in logs: 0 stop, 1 forward, 2 CW, 3 CCW.
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Motor::Stop => 0,
            Motor::Forward => 1,
            Motor::RotateCw => 2,
            Motor::RotateCcw => 3,
        }
    }
}

/// Emulated motor hardware state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorDriver {
    pub left_ready:  bool,
    pub right_ready: bool,
    pub duty_left:   u8,
    pub duty_right:  u8,
}

impl MotorDriver {
    /// Overcome static friction on both motors.
    #[inline]
    pub fn spinup(&mut self) {
        self.left_ready = true;
        self.right_ready = true;
    }

    /// Set both duty cycles.
    #[inline]
    pub fn set_motors(&mut self, left: u8, right: u8) {
        self.duty_left = left;
        self.duty_right = right;
    }

    /// Collapse the motor state into a command.  A motor that is not at its
    /// calibrated duty loses its spun-up state.
    pub fn resolve(&mut self) -> Motor {
        let right = self.right_ready && self.duty_right == KILO_TURN_RIGHT;
        if !right {
            self.right_ready = false;
        }
        let left = self.left_ready && self.duty_left == KILO_TURN_LEFT;
        if !left {
            self.left_ready = false;
        }
        match (left, right) {
            (true, true) => Motor::Forward,
            (false, true) => Motor::RotateCw,
            (true, false) => Motor::RotateCcw,
            (false, false) => Motor::Stop,
        }
    }

    /// Power both motors down.
    pub fn halt(&mut self) {
        *self = Self::default();
    }
}
