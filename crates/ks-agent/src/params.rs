//! Nominal agent parameters, before per-agent noise is applied.

use crate::battery::{BatterySpec, two_hours};

/// Nominal physical parameters shared by every agent built from them.
///
/// The defaults describe the 33 mm disk robot the simulator models.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentParams {
    /// Body radius in mm.  Every agent in one simulation must share it.
    pub radius: f64,
    /// Nominal forward speed in mm/s.
    pub forward_speed: f64,
    /// Nominal turning speed in rad/s.
    pub turn_speed: f64,
    /// Nominal communication range in mm (three body lengths).
    pub comm_range: f64,
    /// Apply clamped-Gaussian calibration noise to the speeds.
    pub calibration_noise: bool,
    pub battery: BatterySpec,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            radius:            16.0,
            forward_speed:     24.0,
            turn_speed:        0.5,
            comm_range:        6.0 * 16.0,
            calibration_noise: true,
            battery:           BatterySpec::Randomized { nominal: two_hours(32) },
        }
    }
}

impl AgentParams {
    pub fn with_battery(mut self, battery: BatterySpec) -> Self {
        self.battery = battery;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_comm_range(mut self, comm_range: f64) -> Self {
        self.comm_range = comm_range;
        self
    }

    /// Use the nominal speeds exactly (useful for scripted scenarios).
    pub fn without_noise(mut self) -> Self {
        self.calibration_noise = false;
        self
    }
}
