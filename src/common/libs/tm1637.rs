// ref: https://github.com/phip1611/generic-tm1637-gpio-driver-rust/blob/main/src/lib.rs
// ref: https://github.com/igelbox/tm1637-rs/blob/master/examples/main.rs
// ref: https://github.com/rustrum/tmledkey-hal-drv/blob/b5e0759c41442d4e28c0ae26ad2bc393c43f814c/src/lib.rs

pub mod config;
pub mod delay;
pub mod encoding;
pub mod errors;
pub mod gpio;
pub mod mappings;
pub mod sim;

use crate::common::libs::tm1637::config::{AckPolicy, Tm1637Config};
use crate::common::libs::tm1637::encoding::{encode_decimal, encode_text, Frame};
use crate::common::libs::tm1637::errors::TmError;
use crate::common::libs::tm1637::gpio::{GpioCapability, GpioPinValue, PinAssignment, PinMode};
use crate::common::libs::tm1637::mappings::{
    Brightness, DisplayState, ADDRESS_COMMAND_MASK, BLANK, BRIGHTNESS_MASK, DIGIT_COUNT, ISA,
};
use hal::blocking::delay::DelayUs;
use log::{debug, trace, warn};

type Res<E> = Result<(), TmError<E>>;

/// One display on its own CLK/DIO pair.
///
/// The driver keeps no copy of what is shown or of the brightness; every
/// call re-sends the full state. Transactions must not be interleaved with
/// other users of the same pins.
pub struct Tm1637<G, D> {
    gpio: G,
    pins: PinAssignment,
    delay_fn: D,
    delay_us: u16,
    ack_policy: AckPolicy,
}

impl<G, D, E> Tm1637<G, D>
where
    G: GpioCapability<Error = E>,
    D: DelayUs<u16>,
{
    /// Builds the handle without touching the wire.
    pub fn new(gpio: G, pins: PinAssignment, delay_fn: D, config: &Tm1637Config) -> Self {
        Self {
            gpio,
            pins,
            delay_fn,
            delay_us: config.delay_us,
            ack_policy: config.ack_policy,
        }
    }

    /// Builds the handle, blanks all four digits and turns the display on at
    /// full brightness. Nothing checks that a chip is actually attached.
    pub fn init(
        gpio: G,
        pins: PinAssignment,
        delay_fn: D,
        config: &Tm1637Config,
    ) -> Result<Self, TmError<E>> {
        let mut tm = Self::new(gpio, pins, delay_fn, config);

        debug!("[Tm1637] init on clk {} / dio {}", pins.clk, pins.dio);
        tm.write_display_data(&[BLANK; DIGIT_COUNT], 0)?;
        tm.set_brightness(Brightness::L7 as u8)?;

        Ok(tm)
    }

    pub fn pins(&self) -> PinAssignment {
        self.pins
    }

    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    pub fn release(self) -> (G, D) {
        (self.gpio, self.delay_fn)
    }

    /// Shows `value` right aligned with leading zeros blanked.
    /// Only the last four decimal digits of `value` are shown.
    /// `show_dot` lights the dot bit of the third digit.
    pub fn display_dec(&mut self, value: u16, show_dot: bool) -> Res<E> {
        debug!("[Tm1637] display_dec {} (dot: {})", value, show_dot);

        let frame = encode_decimal(value, show_dot);
        self.write_display_data(&frame, 0)
    }

    /// Shows up to four characters, right aligned. Unknown chars become `?`.
    pub fn print_str(&mut self, text: &str, show_colon: bool) -> Res<E> {
        debug!("[Tm1637] print_str `{}` (colon: {})", text, show_colon);

        let frame = encode_text(text, show_colon);
        self.write_display_data(&frame, 0)
    }

    pub fn clear(&mut self) -> Res<E> {
        self.write_display_data(&[BLANK; DIGIT_COUNT], 0)
    }

    /// Turns the display on with `level` (0-7). Larger values are clamped to 7.
    pub fn set_brightness(&mut self, level: u8) -> Res<E> {
        self.write_command(display_control_byte(level))
    }

    /// Blanks the display without touching the digit registers.
    pub fn display_off(&mut self) -> Res<E> {
        self.write_command(ISA::DisplayControlOff as u8 | DisplayState::Off as u8)
    }

    /// Sends one raw command byte in its own transaction.
    pub fn write_command(&mut self, command: u8) -> Res<E> {
        debug!("[Tm1637] command {:#04x}", command);

        self.start()?;
        self.send_checked(command)?;
        self.stop()
    }

    /// Writes a full frame starting at digit register `start_addr` (0-3).
    pub fn write_display_data(&mut self, frame: &Frame, start_addr: u8) -> Res<E> {
        self.write_auto_increment(frame, start_addr)
    }

    /// Writes 1 to 4 raw segment bytes beginning at `position`.
    /// Bytes that would land past the fourth digit are dropped.
    pub fn write_segments_raw(&mut self, segments: &[u8], position: u8) -> Res<E> {
        let position = position & ADDRESS_COMMAND_MASK;
        let room = DIGIT_COUNT - position as usize;
        let n = segments.len().min(room);

        // nothing to do
        if n == 0 {
            return Ok(());
        }

        self.write_auto_increment(&segments[..n], position)
    }

    /// Writes a single digit register using fixed address mode.
    pub fn write_segment_raw(&mut self, segments: u8, position: u8) -> Res<E> {
        let position = position & ADDRESS_COMMAND_MASK;

        self.start()?;
        self.send_checked(ISA::DataCommandFixedAddress as u8)?;
        self.stop()?;

        self.start()?;
        self.send_checked(ISA::AddressCommandD0 as u8 | position)?;
        self.send_checked(segments)?;
        self.stop()
    }

    fn write_auto_increment(&mut self, segments: &[u8], start_addr: u8) -> Res<E> {
        // address mode has to go in its own transaction
        self.start()?;
        self.send_checked(ISA::DataCommandAutoIncrement as u8)?;
        self.stop()?;

        self.start()?;
        self.send_checked(ISA::AddressCommandD0 as u8 | (start_addr & ADDRESS_COMMAND_MASK))?;
        for segment in segments {
            self.send_checked(*segment)?;
        }
        self.stop()
    }

    /// Sends a byte and applies the ack policy to the result.
    fn send_checked(&mut self, byte: u8) -> Res<E> {
        if self.send_byte(byte)? {
            return Ok(());
        }

        match self.ack_policy {
            AckPolicy::Ignore => {
                warn!("[Tm1637] no ack for {:#04x}", byte);
                Ok(())
            }
            AckPolicy::Strict => {
                self.stop()?;
                Err(TmError::Ack(byte))
            }
        }
    }

    /// Clocks out `byte` LSB first and samples the ack on the 9th clock.
    /// Returns true when the chip pulled DIO low.
    pub fn send_byte(&mut self, byte: u8) -> Result<bool, TmError<E>> {
        let mut data = byte;

        // DIO may only change while CLK is low
        for _ in 0_u8..8_u8 {
            self.clk(GpioPinValue::Low)?;
            self.bit_delay();

            self.dio(GpioPinValue::from(data & 0x01))?;
            self.bit_delay();

            self.clk(GpioPinValue::High)?;
            self.bit_delay();

            data >>= 1;
        }

        self.clk(GpioPinValue::Low)?;
        self.bit_delay();

        self.gpio.set_mode(self.pins.dio, PinMode::InputPullUp)?;
        self.bit_delay();

        // the chip holds DIO low through this clock to acknowledge
        self.clk(GpioPinValue::High)?;
        self.bit_delay();

        let ack = self.gpio.read_level(self.pins.dio)? == GpioPinValue::Low;

        self.clk(GpioPinValue::Low)?;
        self.bit_delay();

        self.gpio.set_mode(self.pins.dio, PinMode::OutputOpenDrainPullUp)?;

        trace!("[Tm1637] sent {:#04x}, ack: {}", byte, ack);

        Ok(ack)
    }

    /// DIO falls while CLK is high.
    pub fn start(&mut self) -> Res<E> {
        self.gpio.set_mode(self.pins.dio, PinMode::OutputOpenDrainPullUp)?;
        self.clk(GpioPinValue::High)?;
        self.dio(GpioPinValue::High)?;
        self.bit_delay();

        self.dio(GpioPinValue::Low)?;
        self.bit_delay();

        self.clk(GpioPinValue::Low)?;
        self.bit_delay();

        Ok(())
    }

    /// DIO rises while CLK is high.
    pub fn stop(&mut self) -> Res<E> {
        self.gpio.set_mode(self.pins.dio, PinMode::OutputOpenDrainPullUp)?;
        self.clk(GpioPinValue::Low)?;
        self.dio(GpioPinValue::Low)?;
        self.bit_delay();

        self.clk(GpioPinValue::High)?;
        self.bit_delay();

        self.dio(GpioPinValue::High)?;
        self.bit_delay();

        Ok(())
    }

    #[inline]
    fn clk(&mut self, value: GpioPinValue) -> Result<(), E> {
        self.gpio.set_level(self.pins.clk, value)
    }

    #[inline]
    fn dio(&mut self, value: GpioPinValue) -> Result<(), E> {
        self.gpio.set_level(self.pins.dio, value)
    }

    #[inline]
    fn bit_delay(&mut self) {
        self.delay_fn.delay_us(self.delay_us);
    }
}

/// "Display on" control byte for `level`, clamped to 0-7.
#[must_use]
pub fn display_control_byte(level: u8) -> u8 {
    ISA::DisplayControlOff as u8 | DisplayState::On as u8 | level.min(BRIGHTNESS_MASK)
}
