//! The GPIO capability the driver is written against.
//!
//! Pins are addressed by an abstract `(port, pin)` identity so one backend
//! can serve any number of buses. [`HalPins`] adapts a pair of
//! `embedded-hal` pins to the capability.

use crate::common::libs::tm1637::errors::GpioError;
use core::fmt;
use hal::digital::v2::{InputPin, OutputPin};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PinId {
    pub port: u8,
    pub pin: u16,
}

impl PinId {
    #[must_use]
    pub const fn new(port: u8, pin: u16) -> Self {
        Self { port, pin }
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}.{}", self.port, self.pin)
    }
}

/// Clock and data pin of one display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PinAssignment {
    pub clk: PinId,
    pub dio: PinId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioPinValue {
    /// Low.
    Low,
    /// High.
    High,
}

impl From<u8> for GpioPinValue {
    fn from(x: u8) -> Self {
        if x == 0 {
            Self::Low
        } else {
            Self::High
        }
    }
}

impl From<bool> for GpioPinValue {
    fn from(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    OutputOpenDrainPullUp,
    InputPullUp,
}

pub trait GpioCapability {
    type Error;

    fn set_level(&mut self, pin: PinId, value: GpioPinValue) -> Result<(), Self::Error>;

    fn read_level(&mut self, pin: PinId) -> Result<GpioPinValue, Self::Error>;

    /// Reconfigures the direction of `pin`.
    fn set_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), Self::Error>;
}

impl<T: GpioCapability + ?Sized> GpioCapability for &mut T {
    type Error = T::Error;

    fn set_level(&mut self, pin: PinId, value: GpioPinValue) -> Result<(), Self::Error> {
        (**self).set_level(pin, value)
    }

    fn read_level(&mut self, pin: PinId) -> Result<GpioPinValue, Self::Error> {
        (**self).read_level(pin)
    }

    fn set_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), Self::Error> {
        (**self).set_mode(pin, mode)
    }
}

/// Adapts an `embedded-hal` clock pin and an open-drain data pin.
///
/// The data pin must already be configured as open-drain with a pull-up.
/// Input mode releases the line (latch high) so the chip can pull it low;
/// output mode hands the latch back to the driver.
pub struct HalPins<CLK, DIO> {
    clk: CLK,
    dio: DIO,
    pins: PinAssignment,
}

impl<CLK, DIO, E> HalPins<CLK, DIO>
where
    CLK: OutputPin<Error = E>,
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
{
    pub fn new(clk: CLK, dio: DIO, pins: PinAssignment) -> Self {
        Self { clk, dio, pins }
    }

    pub fn release(self) -> (CLK, DIO) {
        (self.clk, self.dio)
    }
}

impl<CLK, DIO, E> GpioCapability for HalPins<CLK, DIO>
where
    CLK: OutputPin<Error = E>,
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
{
    type Error = GpioError<E>;

    fn set_level(&mut self, pin: PinId, value: GpioPinValue) -> Result<(), Self::Error> {
        let res = if pin == self.pins.clk {
            match value {
                GpioPinValue::High => self.clk.set_high(),
                GpioPinValue::Low => self.clk.set_low(),
            }
        } else if pin == self.pins.dio {
            match value {
                GpioPinValue::High => self.dio.set_high(),
                GpioPinValue::Low => self.dio.set_low(),
            }
        } else {
            return Err(GpioError::UnknownPin(pin));
        };

        res.map_err(GpioError::Backend)
    }

    fn read_level(&mut self, pin: PinId) -> Result<GpioPinValue, Self::Error> {
        if pin == self.pins.dio {
            let is_high = self.dio.is_high().map_err(GpioError::Backend)?;

            Ok(GpioPinValue::from(is_high))
        } else if pin == self.pins.clk {
            Err(GpioError::Unsupported(pin, "read_level"))
        } else {
            Err(GpioError::UnknownPin(pin))
        }
    }

    fn set_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), Self::Error> {
        if pin == self.pins.dio {
            match mode {
                PinMode::InputPullUp => self.dio.set_high().map_err(GpioError::Backend),
                PinMode::OutputOpenDrainPullUp => Ok(()),
            }
        } else if pin == self.pins.clk {
            match mode {
                PinMode::OutputOpenDrainPullUp => Ok(()),
                PinMode::InputPullUp => Err(GpioError::Unsupported(pin, "input mode")),
            }
        } else {
            Err(GpioError::UnknownPin(pin))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::pin::{Mock as PinMock, State, Transaction};

    const PINS: PinAssignment = PinAssignment {
        clk: PinId::new(0, 27),
        dio: PinId::new(0, 13),
    };

    #[test]
    fn test_levels_are_routed_by_pin_id() {
        let mut clk = PinMock::new(&[Transaction::set(State::High)]);
        let mut dio = PinMock::new(&[
            Transaction::set(State::Low),
            Transaction::get(State::Low),
        ]);

        let mut pins = HalPins::new(clk.clone(), dio.clone(), PINS);
        pins.set_level(PINS.clk, GpioPinValue::High).unwrap();
        pins.set_level(PINS.dio, GpioPinValue::Low).unwrap();
        assert_eq!(pins.read_level(PINS.dio).unwrap(), GpioPinValue::Low);

        clk.done();
        dio.done();
    }

    #[test]
    fn test_input_mode_releases_the_data_line() {
        let mut clk = PinMock::new(&[]);
        let mut dio = PinMock::new(&[Transaction::set(State::High)]);

        let mut pins = HalPins::new(clk.clone(), dio.clone(), PINS);
        pins.set_mode(PINS.dio, PinMode::InputPullUp).unwrap();
        pins.set_mode(PINS.dio, PinMode::OutputOpenDrainPullUp).unwrap();

        clk.done();
        dio.done();
    }

    #[test]
    fn test_foreign_and_unsupported_pins() {
        let mut clk = PinMock::new(&[]);
        let mut dio = PinMock::new(&[]);
        let stranger = PinId::new(1, 2);

        let mut pins = HalPins::new(clk.clone(), dio.clone(), PINS);
        assert!(matches!(
            pins.set_level(stranger, GpioPinValue::High),
            Err(GpioError::UnknownPin(p)) if p == stranger
        ));
        assert!(matches!(
            pins.read_level(PINS.clk),
            Err(GpioError::Unsupported(_, _))
        ));
        assert!(matches!(
            pins.set_mode(PINS.clk, PinMode::InputPullUp),
            Err(GpioError::Unsupported(_, _))
        ));

        clk.done();
        dio.done();
    }

    #[test]
    fn test_pin_display() {
        assert_eq!(PinId::new(2, 5).to_string(), "P2.5");
    }
}
