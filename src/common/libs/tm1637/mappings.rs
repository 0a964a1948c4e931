use strum_macros::EnumIter;

/// Number of digit positions wired on the module.
pub const DIGIT_COUNT: usize = 4;

/// Number of display registers inside the chip (C0H..C5H).
pub const DISPLAY_REGISTERS_COUNT: usize = 6;

/// Index of the blank entry in [`SEGMENT_CODES`].
pub const BLANK_INDEX: usize = 10;

/// Segment code of a blank digit.
pub const BLANK: u8 = SEGMENT_CODES[BLANK_INDEX];

/// Shows which segment has which bit.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentBits {
    SegA = 0b0000_0001,
    SegB = 0b0000_0010,
    SegC = 0b0000_0100,
    SegD = 0b0000_1000,
    SegE = 0b0001_0000,
    SegF = 0b0010_0000,
    SegG = 0b0100_0000,

    // double point on the 4-digit modules, decimal point on the others
    SegColonOrDot = 0b1000_0000,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberCharBits {
    Zero = 0b0011_1111,
    One = 0b0000_0110,
    Two = 0b0101_1011,
    Three = 0b0100_1111,
    Four = 0b0110_0110,
    Five = 0b0110_1101,
    Six = 0b0111_1101,
    Seven = 0b0000_0111,
    Eight = 0b0111_1111,
    Nine = 0b0110_1111,
}

/// Digits 0-9 followed by the blank code (common cathode wiring).
pub const SEGMENT_CODES: [u8; 11] = [
    NumberCharBits::Zero as u8,
    NumberCharBits::One as u8,
    NumberCharBits::Two as u8,
    NumberCharBits::Three as u8,
    NumberCharBits::Four as u8,
    NumberCharBits::Five as u8,
    NumberCharBits::Six as u8,
    NumberCharBits::Seven as u8,
    NumberCharBits::Eight as u8,
    NumberCharBits::Nine as u8,
    0x00,
];

/// Looks up the segment code of a decimal digit.
/// Anything outside 0-9 maps to [`BLANK`].
#[must_use]
pub const fn segment_code(digit: u8) -> u8 {
    if (digit as usize) < BLANK_INDEX {
        SEGMENT_CODES[digit as usize]
    } else {
        BLANK
    }
}

/// The "ISA"/Commands of the TM1637. See data sheet for more information.
/// Bits 6 & 7 mark the kind of command, the low bits carry its argument.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ISA {
    /// "write data to display register", address auto increment.
    DataCommandAutoIncrement = 0b0100_0000,

    /// "write data to display register", fixed address.
    DataCommandFixedAddress = 0b0100_0100,

    /// Address command for display register zero; bits 0-2 select the register.
    AddressCommandD0 = 0b1100_0000,

    /// Display control base. Bit 3 is display on/off, bits 0-2 the brightness.
    DisplayControlOff = 0b1000_0000,
}

pub const ADDRESS_COMMAND_MASK: u8 = 0b0000_0011;

pub const BRIGHTNESS_MASK: u8 = 0b0000_0111;

/// The level of brightness.
/// The "display control" command transports the brightness in bits 0 to 2.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Brightness {
    /// Lowest brightness, the display is still on.
    L0 = 0b000,
    L1 = 0b001,
    L2 = 0b010,
    L3 = 0b011,
    L4 = 0b100,
    L5 = 0b101,
    L6 = 0b110,
    /// Highest brightness.
    L7 = 0b111,
}

impl From<Brightness> for u8 {
    fn from(b: Brightness) -> Self {
        b as Self
    }
}

/// Whether the display is on or off.
/// The "display control" command transports this in bit 3.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Off = 0b0000,
    On = 0b1000,
}

const A: u8 = SegmentBits::SegA as u8;
const B: u8 = SegmentBits::SegB as u8;
const C: u8 = SegmentBits::SegC as u8;
const D: u8 = SegmentBits::SegD as u8;
const E: u8 = SegmentBits::SegE as u8;
const F: u8 = SegmentBits::SegF as u8;
const G: u8 = SegmentBits::SegG as u8;

pub const QUESTION_MARK: u8 = A | B | G | E;

/// Maps a character to its closest possible representation on a 7-segment display.
pub const fn char_to_segments(chr: char) -> u8 {
    match chr {
        '0'..='9' => segment_code(chr as u8 - b'0'),

        'A' => A | B | C | E | F | G,
        'C' => A | D | E | F,
        'E' => A | D | E | F | G,
        'F' | 'f' => A | E | F | G,
        'G' | 'g' => A | C | D | E | F,
        'H' => B | C | E | F | G,
        'I' => B | C,
        'J' | 'j' => B | C | D | E,
        'L' => D | E | F,
        'N' => A | B | C | E | F,
        'O' => A | B | C | D | E | F,
        'P' | 'p' => A | B | E | F | G,
        'R' => A | E | F,
        'S' | 's' => A | C | D | F | G,
        'U' => B | C | D | E | F,

        'a' => A | B | C | D | E | G,
        'b' | 'B' => C | D | E | F | G,
        'c' => D | E | G,
        'd' | 'D' => B | C | D | E | G,
        'e' => A | B | D | E | F | G,
        'h' => C | E | F | G,
        'i' => C,
        'l' => D | E,
        'n' => C | E | G,
        'o' => C | D | E | G,
        'q' | 'Q' => A | B | C | F | G,
        'r' => E | G,
        't' | 'T' => D | E | F | G,
        'u' => C | D | E,
        'y' | 'Y' => B | C | D | F | G,

        ' ' => BLANK,
        '-' => G,
        '_' => D,
        '=' => G | D,
        '[' => A | D | E | F,
        ']' => A | B | C | D,

        // unknown chars
        _ => QUESTION_MARK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_digit_codes() {
        let expected = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];
        for (digit, code) in expected.iter().enumerate() {
            assert_eq!(segment_code(digit as u8), *code);
        }
        assert_eq!(SEGMENT_CODES[BLANK_INDEX], 0x00);
        assert_eq!(segment_code(10), BLANK);
        assert_eq!(segment_code(200), BLANK);
    }

    #[test]
    fn test_digit_codes_leave_dot_bit_free() {
        for code in SEGMENT_CODES.iter() {
            assert_eq!(code & SegmentBits::SegColonOrDot as u8, 0);
        }
    }

    #[test]
    fn test_command_opcodes() {
        assert_eq!(ISA::DataCommandAutoIncrement as u8, 0x40);
        assert_eq!(ISA::DataCommandFixedAddress as u8, 0x44);
        assert_eq!(ISA::AddressCommandD0 as u8, 0xC0);
        assert_eq!(ISA::DisplayControlOff as u8 | DisplayState::On as u8, 0x88);
    }

    #[test]
    fn test_brightness_levels_fit_mask() {
        let levels: Vec<u8> = Brightness::iter().map(u8::from).collect();
        assert_eq!(levels, (0..=7).collect::<Vec<u8>>());
        assert!(levels.iter().all(|l| l & !BRIGHTNESS_MASK == 0));
    }

    #[test]
    fn test_chars() {
        assert_eq!(char_to_segments('8'), 0x7F);
        assert_eq!(char_to_segments(' '), BLANK);
        assert_eq!(char_to_segments('-'), 0x40);
        assert_eq!(char_to_segments('A'), 0x77);
        assert_eq!(char_to_segments('~'), QUESTION_MARK);
    }
}
