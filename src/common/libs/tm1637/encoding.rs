use crate::common::libs::tm1637::mappings::{
    char_to_segments, segment_code, SegmentBits, BLANK, DIGIT_COUNT,
};

/// Segment bytes for the four digits, leftmost first.
pub type Frame = [u8; DIGIT_COUNT];

/// Frame position carrying the colon (the dot bit of the second digit).
pub const COLON_POSITION: usize = 1;

/// Frame position whose dot bit is set by the decimal renderer.
pub const DECIMAL_DOT_POSITION: usize = 2;

/// Right-aligned decimal with leading zeros blanked.
/// Values above 9999 keep only their last four digits.
#[must_use]
pub fn encode_decimal(value: u16, show_dot: bool) -> Frame {
    // digits[0] is the units digit
    let mut digits = [0_u8; DIGIT_COUNT];
    let mut rest = value;
    for d in digits.iter_mut() {
        *d = (rest % 10) as u8;
        rest /= 10;
    }

    let mut frame = [BLANK; DIGIT_COUNT];
    let mut suppressing = true;
    for (i, digit) in digits.iter().enumerate().rev() {
        if suppressing && *digit == 0 && i > 0 {
            continue;
        }
        suppressing = false;
        frame[DIGIT_COUNT - 1 - i] = segment_code(*digit);
    }

    if show_dot {
        frame[DECIMAL_DOT_POSITION] |= SegmentBits::SegColonOrDot as u8;
    }

    frame
}

/// Right-aligned text; only the first four chars are kept.
#[must_use]
pub fn encode_text(text: &str, show_colon: bool) -> Frame {
    let glyphs: Vec<u8> = text.chars().take(DIGIT_COUNT).map(char_to_segments).collect();

    let mut frame = [BLANK; DIGIT_COUNT];
    frame[DIGIT_COUNT - glyphs.len()..].copy_from_slice(&glyphs);

    if show_colon {
        frame[COLON_POSITION] |= SegmentBits::SegColonOrDot as u8;
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::libs::tm1637::mappings::{SEGMENT_CODES, BLANK_INDEX};
    use proptest::prelude::*;

    const DOT: u8 = SegmentBits::SegColonOrDot as u8;

    fn decode(code: u8) -> Option<u8> {
        SEGMENT_CODES[..BLANK_INDEX]
            .iter()
            .position(|c| *c == code & !DOT)
            .map(|d| d as u8)
    }

    #[test]
    fn test_leading_zeros_are_blank() {
        assert_eq!(encode_decimal(5, false), [BLANK, BLANK, BLANK, 0x6D]);
        assert_eq!(encode_decimal(105, false), [BLANK, 0x06, 0x3F, 0x6D]);
        assert_eq!(encode_decimal(0, false), [BLANK, BLANK, BLANK, 0x3F]);
        assert_eq!(encode_decimal(1000, false), [0x06, 0x3F, 0x3F, 0x3F]);
    }

    #[test]
    fn test_dot_lands_on_third_byte() {
        assert_eq!(encode_decimal(1234, true), [0x06, 0x5B, 0x4F | DOT, 0x66]);
        // the dot is applied even over a blanked digit
        assert_eq!(encode_decimal(7, true), [BLANK, BLANK, DOT, 0x07]);
    }

    #[test]
    fn test_values_wrap_to_four_digits() {
        assert_eq!(encode_decimal(10_000, false), encode_decimal(0, false));
        assert_eq!(encode_decimal(12_345, false), encode_decimal(2_345, false));
        assert_eq!(encode_decimal(u16::MAX, false), encode_decimal(5_535, false));
    }

    #[test]
    fn test_text_is_right_aligned() {
        assert_eq!(encode_text("Err", false), [BLANK, 0x79, 0x50, 0x50]);
        assert_eq!(encode_text("", true), [BLANK, DOT, BLANK, BLANK]);
        assert_eq!(encode_text("12345", false), encode_decimal(1234, false));
    }

    proptest! {
        #[test]
        fn prop_decimal_frame_decodes_back(value in 0_u16..=9999, show_dot in any::<bool>()) {
            let frame = encode_decimal(value, show_dot);

            let shown: String = frame
                .iter()
                .map(|c| decode(*c).map_or(' ', |d| char::from(b'0' + d)))
                .collect();
            prop_assert_eq!(shown, format!("{:>4}", value));

            prop_assert_eq!(frame[DECIMAL_DOT_POSITION] & DOT != 0, show_dot);
            for (i, c) in frame.iter().enumerate() {
                if i != DECIMAL_DOT_POSITION {
                    prop_assert_eq!(c & DOT, 0);
                }
            }
        }
    }
}
