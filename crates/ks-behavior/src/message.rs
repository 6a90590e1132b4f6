//! Broadcast message and motion shorthands.

use ks_agent::motor::{KILO_STRAIGHT_LEFT, KILO_STRAIGHT_RIGHT, KILO_TURN_LEFT, KILO_TURN_RIGHT};

/// Payload size in bytes.
pub const MESSAGE_BYTES: usize = 9;

/// One broadcast message: a type byte, a fixed payload, and a checksum.
///
/// The simulator never inspects the contents; controllers use
/// [`is_valid`][Self::is_valid] to reject messages whose checksum does not
/// match, as they would on hardware.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub kind: u8,
    pub data: [u8; MESSAGE_BYTES],
    pub crc:  u16,
}

impl Message {
    /// The only message type the robots use in practice.
    pub const NORMAL: u8 = 1;

    /// A `NORMAL` message carrying `data`, checksum filled in.
    pub fn new(data: [u8; MESSAGE_BYTES]) -> Self {
        Self { kind: Self::NORMAL, data, crc: Self::checksum(Self::NORMAL, &data) }
    }

    /// Sum of the type byte and the payload bytes, modulo 256.
    pub fn checksum(kind: u8, data: &[u8; MESSAGE_BYTES]) -> u16 {
        std::iter::once(&kind).chain(data).map(|&b| b as u16).sum::<u16>() % 256
    }

    /// Recompute `crc` after editing `kind` or `data` in place.
    pub fn seal(&mut self) {
        self.crc = Self::checksum(self.kind, &self.data);
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.crc == Self::checksum(self.kind, &self.data)
    }
}

/// The four ways a controller can drive the robot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Motion {
    Stop,
    Forward,
    /// Counter-clockwise, left motor only.
    Left,
    /// Clockwise, right motor only.
    Right,
}

impl Motion {
    /// `(left, right)` duty cycles producing this motion.
    pub fn duties(self) -> (u8, u8) {
        match self {
            Motion::Stop => (0, 0),
            Motion::Forward => (KILO_STRAIGHT_LEFT, KILO_STRAIGHT_RIGHT),
            Motion::Left => (KILO_TURN_LEFT, 0),
            Motion::Right => (0, KILO_TURN_RIGHT),
        }
    }
}
