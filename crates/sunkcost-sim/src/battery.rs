//! Per-portrait battery economy.
//!
//! The selected portrait drains one unit per tick while it is live; every
//! other portrait (and a dead selected one) recharges one unit per tick.
//! A portrait dies at zero charge and only comes back once it has
//! recharged to 80 % of capacity, so an empty camera cannot flicker on and
//! off at the bottom of the bar.

use sunkcost_core::constants::{BATTERY_REACTIVATE_DEN, BATTERY_REACTIVATE_NUM};
use sunkcost_core::enums::BatteryTransition;

/// Charge and liveness for one portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryState {
    charge: u32,
    max: u32,
    is_active: bool,
}

impl BatteryState {
    /// A full battery. `max` is raised to 1 if zero.
    pub fn new(max: u32) -> Self {
        let max = max.max(1);
        Self {
            charge: max,
            max,
            is_active: true,
        }
    }

    /// A battery starting at `charge` (clamped to `max`). A battery that
    /// starts empty starts dead.
    pub fn with_charge(max: u32, charge: u32) -> Self {
        let max = max.max(1);
        let charge = charge.min(max);
        Self {
            charge,
            max,
            is_active: charge > 0,
        }
    }

    pub fn charge(&self) -> u32 {
        self.charge
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Charge as a fraction of capacity, for the battery bar.
    pub fn charge_fraction(&self) -> f32 {
        self.charge as f32 / self.max as f32
    }

    /// Smallest charge at which a dead battery comes back.
    pub fn reactivation_threshold(&self) -> u32 {
        let scaled = u64::from(self.max) * u64::from(BATTERY_REACTIVATE_NUM);
        // At most `max`, so it fits back into u32.
        scaled.div_ceil(u64::from(BATTERY_REACTIVATE_DEN)) as u32
    }

    /// Advance one frame. `selected` is whether this portrait is the one
    /// the Spirit is currently looking through.
    pub fn tick(&mut self, selected: bool) -> BatteryTransition {
        if selected && self.is_active {
            self.charge = self.charge.saturating_sub(1);
        } else if self.charge < self.max {
            self.charge += 1;
        }

        if self.charge == 0 {
            if self.is_active {
                self.is_active = false;
                return BatteryTransition::Died;
            }
        } else if !self.is_active
            && u64::from(self.charge) * u64::from(BATTERY_REACTIVATE_DEN)
                >= u64::from(self.max) * u64::from(BATTERY_REACTIVATE_NUM)
        {
            self.is_active = true;
            return BatteryTransition::Revived;
        }
        BatteryTransition::None
    }
}
