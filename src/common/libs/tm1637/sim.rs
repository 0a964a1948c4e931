//! A TM1637 modelled at the wire level.
//!
//! [`SimulatedTm1637`] implements [`GpioCapability`] for one pin pair and
//! decodes whatever the driver toggles the way the chip would: START/STOP
//! from data edges while CLK is high, bits LSB first on CLK rising edges and
//! an ACK pulled low from the 8th falling edge to the 9th falling edge.

use crate::common::libs::tm1637::errors::GpioError;
use crate::common::libs::tm1637::gpio::{
    GpioCapability, GpioPinValue, PinAssignment, PinId, PinMode,
};
use crate::common::libs::tm1637::mappings::{
    Brightness, DisplayState, DIGIT_COUNT, DISPLAY_REGISTERS_COUNT, ISA,
};
use core::convert::Infallible;
use log::trace;

const COMMAND_KIND_MASK: u8 = 0b1100_0000;
const DATA_COMMAND_KIND: u8 = 0b0100_0000;
const ADDRESS_COMMAND_KIND: u8 = 0b1100_0000;
const DISPLAY_CONTROL_KIND: u8 = 0b1000_0000;
const FIXED_ADDRESS_BIT: u8 =
    ISA::DataCommandFixedAddress as u8 & !(ISA::DataCommandAutoIncrement as u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Shifting in bit `n` of the current byte.
    Bits(u8),
    /// 8 bits in, waiting for the falling edge that starts the ACK.
    ByteDone,
    /// 9th clock. DIO is pulled low until it falls when `pulling`.
    Acking { clocked: bool, pulling: bool },
}

pub struct SimulatedTm1637 {
    pins: PinAssignment,

    /// When false the chip never acknowledges.
    pub responsive: bool,

    clk: GpioPinValue,
    dio_latch: GpioPinValue,
    dio_mode: PinMode,

    phase: Phase,
    shift: u8,
    current: Vec<u8>,

    auto_increment: bool,
    address: Option<u8>,
    registers: [u8; DISPLAY_REGISTERS_COUNT],
    display_state: DisplayState,
    brightness: u8,

    sampled_bits: Vec<bool>,
    acks_given: usize,
    transactions: Vec<Vec<u8>>,
    direction_changes_with_clock_high: usize,
    dio_reads: usize,
    dio_reads_with_clock_low: usize,
}

impl SimulatedTm1637 {
    /// Both lines idle high, DIO configured as output.
    #[must_use]
    pub const fn new(pins: PinAssignment) -> Self {
        Self {
            pins,
            responsive: true,
            clk: GpioPinValue::High,
            dio_latch: GpioPinValue::High,
            dio_mode: PinMode::OutputOpenDrainPullUp,
            phase: Phase::Idle,
            shift: 0,
            current: Vec::new(),
            auto_increment: true,
            address: None,
            registers: [0; DISPLAY_REGISTERS_COUNT],
            display_state: DisplayState::Off,
            brightness: 0,
            sampled_bits: Vec::new(),
            acks_given: 0,
            transactions: Vec::new(),
            direction_changes_with_clock_high: 0,
            dio_reads: 0,
            dio_reads_with_clock_low: 0,
        }
    }

    #[must_use]
    pub fn unresponsive(pins: PinAssignment) -> Self {
        let mut chip = Self::new(pins);
        chip.responsive = false;

        chip
    }

    #[must_use]
    pub const fn registers(&self) -> &[u8; DISPLAY_REGISTERS_COUNT] {
        &self.registers
    }

    /// The four wired digits.
    #[must_use]
    pub fn digits(&self) -> [u8; DIGIT_COUNT] {
        let mut frame = [0; DIGIT_COUNT];
        frame.copy_from_slice(&self.registers[..DIGIT_COUNT]);

        frame
    }

    #[must_use]
    pub fn is_display_on(&self) -> bool {
        self.display_state == DisplayState::On
    }

    #[must_use]
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Every data bit sampled on a CLK rising edge, in wire order.
    #[must_use]
    pub fn sampled_bits(&self) -> &[bool] {
        &self.sampled_bits
    }

    #[must_use]
    pub const fn acks_given(&self) -> usize {
        self.acks_given
    }

    /// Byte sequences of every START..STOP seen so far.
    #[must_use]
    pub fn transactions(&self) -> &[Vec<u8>] {
        &self.transactions
    }

    #[must_use]
    pub const fn direction_changes_with_clock_high(&self) -> usize {
        self.direction_changes_with_clock_high
    }

    /// Number of times DIO was read back.
    #[must_use]
    pub const fn dio_reads(&self) -> usize {
        self.dio_reads
    }

    /// DIO reads made while CLK was low. The ack is only valid while the
    /// 9th clock is high.
    #[must_use]
    pub const fn dio_reads_with_clock_low(&self) -> usize {
        self.dio_reads_with_clock_low
    }

    pub fn clear_log(&mut self) {
        self.sampled_bits.clear();
        self.transactions.clear();
        self.acks_given = 0;
        self.direction_changes_with_clock_high = 0;
        self.dio_reads = 0;
        self.dio_reads_with_clock_low = 0;
    }

    /// Level actually present on the DIO wire (wired-AND of both ends).
    fn dio_line(&self) -> GpioPinValue {
        let driver_low =
            self.dio_mode == PinMode::OutputOpenDrainPullUp && self.dio_latch == GpioPinValue::Low;
        let chip_low = matches!(self.phase, Phase::Acking { pulling: true, .. });

        if driver_low || chip_low {
            GpioPinValue::Low
        } else {
            GpioPinValue::High
        }
    }

    fn on_dio_edge(&mut self, before: GpioPinValue, after: GpioPinValue) {
        if before == after || self.clk == GpioPinValue::Low {
            return;
        }

        if after == GpioPinValue::Low {
            self.on_start();
        } else {
            self.on_stop();
        }
    }

    fn on_start(&mut self) {
        trace!("[sim] START");
        self.phase = Phase::Bits(0);
        self.shift = 0;
        self.current.clear();
        self.address = None;
    }

    fn on_stop(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        // the clock pulse that frames STOP is not part of a byte
        if let Phase::Bits(n) = self.phase {
            let complete = self.sampled_bits.len().saturating_sub(n as usize);
            self.sampled_bits.truncate(complete);
        }
        trace!("[sim] STOP after {:02x?}", self.current);
        self.phase = Phase::Idle;
        self.transactions.push(core::mem::take(&mut self.current));
    }

    fn on_clk_rising(&mut self) {
        match self.phase {
            Phase::Bits(n) => {
                let bit = self.dio_line() == GpioPinValue::High;
                self.sampled_bits.push(bit);
                if bit {
                    self.shift |= 1 << n;
                }

                if n == 7 {
                    let byte = self.shift;
                    self.shift = 0;
                    self.phase = Phase::ByteDone;
                    self.on_byte(byte);
                } else {
                    self.phase = Phase::Bits(n + 1);
                }
            }
            Phase::Acking { pulling, .. } => {
                self.phase = Phase::Acking {
                    clocked: true,
                    pulling,
                };
            }
            Phase::Idle | Phase::ByteDone => {}
        }
    }

    fn on_clk_falling(&mut self) {
        match self.phase {
            Phase::ByteDone => {
                if self.responsive {
                    self.acks_given += 1;
                }
                self.phase = Phase::Acking {
                    clocked: false,
                    pulling: self.responsive,
                };
            }
            Phase::Acking { clocked: true, .. } => {
                self.phase = Phase::Bits(0);
            }
            _ => {}
        }
    }

    fn on_byte(&mut self, byte: u8) {
        let is_command = self.current.is_empty();
        self.current.push(byte);

        if !is_command {
            if let Some(addr) = self.address {
                if (addr as usize) < DISPLAY_REGISTERS_COUNT {
                    self.registers[addr as usize] = byte;
                }
                if self.auto_increment {
                    self.address = Some(addr.saturating_add(1));
                }
            }
            return;
        }

        match byte & COMMAND_KIND_MASK {
            DATA_COMMAND_KIND => {
                self.auto_increment = byte & FIXED_ADDRESS_BIT == 0;
            }
            ADDRESS_COMMAND_KIND => {
                self.address = Some(byte & 0b0000_0111);
            }
            DISPLAY_CONTROL_KIND => {
                self.display_state = if byte & DisplayState::On as u8 == 0 {
                    DisplayState::Off
                } else {
                    DisplayState::On
                };
                self.brightness = byte & Brightness::L7 as u8;
            }
            _ => {}
        }
    }

    fn check_pin(&self, pin: PinId) -> Result<(), GpioError<Infallible>> {
        if pin == self.pins.clk || pin == self.pins.dio {
            Ok(())
        } else {
            Err(GpioError::UnknownPin(pin))
        }
    }
}

impl GpioCapability for SimulatedTm1637 {
    type Error = GpioError<Infallible>;

    fn set_level(&mut self, pin: PinId, value: GpioPinValue) -> Result<(), Self::Error> {
        self.check_pin(pin)?;

        if pin == self.pins.clk {
            let before = self.clk;
            self.clk = value;
            match (before, value) {
                (GpioPinValue::Low, GpioPinValue::High) => self.on_clk_rising(),
                (GpioPinValue::High, GpioPinValue::Low) => self.on_clk_falling(),
                _ => {}
            }
        } else {
            let before = self.dio_line();
            self.dio_latch = value;
            self.on_dio_edge(before, self.dio_line());
        }

        Ok(())
    }

    fn read_level(&mut self, pin: PinId) -> Result<GpioPinValue, Self::Error> {
        self.check_pin(pin)?;

        if pin == self.pins.clk {
            return Ok(self.clk);
        }

        self.dio_reads += 1;
        if self.clk == GpioPinValue::Low {
            self.dio_reads_with_clock_low += 1;
        }

        Ok(self.dio_line())
    }

    fn set_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), Self::Error> {
        self.check_pin(pin)?;

        if pin == self.pins.clk {
            return match mode {
                PinMode::OutputOpenDrainPullUp => Ok(()),
                PinMode::InputPullUp => Err(GpioError::Unsupported(pin, "input mode")),
            };
        }

        if mode != self.dio_mode && self.clk == GpioPinValue::High {
            self.direction_changes_with_clock_high += 1;
        }

        let before = self.dio_line();
        self.dio_mode = mode;
        self.on_dio_edge(before, self.dio_line());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::libs::tm1637::encoding::Frame;

    const PINS: PinAssignment = PinAssignment {
        clk: PinId::new(0, 1),
        dio: PinId::new(0, 2),
    };

    fn clock_bit(chip: &mut SimulatedTm1637, bit: bool) {
        chip.set_level(PINS.clk, GpioPinValue::Low).unwrap();
        chip.set_level(PINS.dio, GpioPinValue::from(bit)).unwrap();
        chip.set_level(PINS.clk, GpioPinValue::High).unwrap();
    }

    #[test]
    fn test_decodes_hand_driven_byte() {
        let mut chip = SimulatedTm1637::new(PINS);

        // START
        chip.set_level(PINS.dio, GpioPinValue::Low).unwrap();
        // 0x8C, LSB first
        for i in 0..8 {
            clock_bit(&mut chip, 0x8C_u8 >> i & 1 == 1);
        }
        chip.set_level(PINS.clk, GpioPinValue::Low).unwrap();
        chip.set_mode(PINS.dio, PinMode::InputPullUp).unwrap();
        assert_eq!(chip.read_level(PINS.dio).unwrap(), GpioPinValue::Low);
        chip.set_level(PINS.clk, GpioPinValue::High).unwrap();
        assert_eq!(chip.read_level(PINS.dio).unwrap(), GpioPinValue::Low);
        chip.set_level(PINS.clk, GpioPinValue::Low).unwrap();
        // released after the 9th clock
        assert_eq!(chip.read_level(PINS.dio).unwrap(), GpioPinValue::High);

        // STOP
        chip.set_mode(PINS.dio, PinMode::OutputOpenDrainPullUp).unwrap();
        chip.set_level(PINS.dio, GpioPinValue::Low).unwrap();
        chip.set_level(PINS.clk, GpioPinValue::High).unwrap();
        chip.set_level(PINS.dio, GpioPinValue::High).unwrap();

        assert_eq!(chip.transactions(), &[vec![0x8C_u8]]);
        assert!(chip.is_display_on());
        assert_eq!(chip.brightness(), 4);
        assert_eq!(chip.direction_changes_with_clock_high(), 0);
        assert_eq!(chip.dio_reads(), 3);
        assert_eq!(chip.dio_reads_with_clock_low(), 2);
    }

    #[test]
    fn test_counts_direction_change_with_clock_high() {
        let mut chip = SimulatedTm1637::new(PINS);
        chip.set_mode(PINS.dio, PinMode::InputPullUp).unwrap();
        assert_eq!(chip.direction_changes_with_clock_high(), 1);

        chip.clear_log();
        assert_eq!(chip.direction_changes_with_clock_high(), 0);
    }

    #[test]
    fn test_digits_are_a_frame() {
        let mut chip = SimulatedTm1637::new(PINS);
        chip.registers[..].copy_from_slice(&[1, 2, 3, 4, 5, 6]);

        let frame: Frame = chip.digits();
        assert_eq!(frame, [1, 2, 3, 4]);
        assert_eq!(&frame[..], &chip.registers()[..DIGIT_COUNT]);
    }

    #[test]
    fn test_rejects_foreign_pins() {
        let mut chip = SimulatedTm1637::new(PINS);
        let stranger = PinId::new(3, 3);

        assert!(matches!(
            chip.set_level(stranger, GpioPinValue::Low),
            Err(GpioError::UnknownPin(_))
        ));
        assert!(matches!(
            chip.set_mode(PINS.clk, PinMode::InputPullUp),
            Err(GpioError::Unsupported(_, _))
        ));
    }
}
