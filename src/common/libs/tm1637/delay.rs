use crate::constants::default_values::DefaultValues;
use hal::blocking::delay::DelayUs;

/// Portable busy-wait delay for targets without a HAL delay. Burns
/// `spins_per_us` spin-loop hints per microsecond and never yields to a
/// scheduler.
///
/// The default of 40 spins is a placeholder, not a measurement. Calibrate it
/// to the core clock so CLK stays under 250 kHz. On cores where
/// `spin_loop` emits no instruction the loop may be optimised away; prefer
/// the HAL's own delay there (`esp_idf_hal::delay::Ets` on the ESP32).
#[derive(Debug, Clone, Copy)]
pub struct SpinDelay {
    spins_per_us: u32,
}

impl SpinDelay {
    #[must_use]
    pub const fn new(spins_per_us: u32) -> Self {
        Self { spins_per_us }
    }

    #[inline]
    fn spin(&self, us: u32) {
        for _ in 0..us.saturating_mul(self.spins_per_us) {
            core::hint::spin_loop();
        }
    }
}

impl Default for SpinDelay {
    fn default() -> Self {
        Self::new(DefaultValues::TM1637_SPINS_PER_US)
    }
}

impl DelayUs<u32> for SpinDelay {
    fn delay_us(&mut self, us: u32) {
        self.spin(us);
    }
}

impl DelayUs<u16> for SpinDelay {
    fn delay_us(&mut self, us: u16) {
        self.spin(u32::from(us));
    }
}

impl DelayUs<u8> for SpinDelay {
    fn delay_us(&mut self, us: u8) {
        self.spin(u32::from(us));
    }
}

/// Zero-length delay for the simulated chip and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayUs<u16> for NoDelay {
    fn delay_us(&mut self, _us: u16) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_delay_returns() {
        let mut d = SpinDelay::new(4);
        d.delay_us(3_u16);
        d.delay_us(0_u32);
        d.delay_us(1_u8);
    }

    #[test]
    fn test_zero_spins_is_a_no_op() {
        let mut d = SpinDelay::new(0);
        d.delay_us(u32::MAX);
    }
}
