//! Wire codec for cached color values.
//!
//! The default format packs up to three colors into a fixed-width string:
//! three comma-joined 11-character slots, each a 7-character `#rrggbb` hex
//! code followed by a 4-digit zero-padded pixel count. Unused slots carry the
//! placeholder color `XXXXXXX` with count `0000`, so every stored value is
//! exactly 35 characters.

use crate::color::Color;
use thiserror::Error;

/// Number of color slots in an encoded value.
pub const VALUE_SLOTS: usize = 3;

/// Placeholder hex code marking an unused slot.
pub const EMPTY_COLOR_SLOT: &str = "XXXXXXX";

/// Largest pixel count the 4-digit slot field can carry.
const MAX_SLOT_COUNT: u32 = 9999;

/// Errors encoding or decoding a cached color value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Hex code is not the expected `#rrggbb` width.
    #[error("hex code {0:?} is not 7 characters")]
    BadHexWidth(String),

    /// Pixel count does not fit the 4-digit slot field.
    #[error("pixel count {0} exceeds the 4-digit slot limit")]
    CountOverflow(u32),

    /// Stored value does not split into the expected slot count.
    #[error("value {0:?} does not have exactly {VALUE_SLOTS} slots")]
    BadSlotCount(String),

    /// Slot is too short to hold a hex code and count.
    #[error("slot {0:?} is shorter than a hex code")]
    TruncatedSlot(String),

    /// Slot count field is not a number.
    #[error("slot count field {0:?} is not numeric")]
    BadCount(String),

    /// Slot hex field is not a parseable color.
    #[error(transparent)]
    BadColor(#[from] crate::color::ColorParseError),
}

/// Serializer for cached color values.
///
/// Store implementations only see opaque strings; the codec owns the wire
/// format on both sides.
pub trait ValueCodec: Send + Sync {
    /// Encodes up to [`VALUE_SLOTS`] colors into a stored value.
    fn encode(&self, colors: &[Color]) -> Result<String, CodecError>;

    /// Decodes a stored value back into colors, dropping placeholder and
    /// zero-count slots.
    fn decode(&self, value: &str) -> Result<Vec<Color>, CodecError>;
}

/// The fixed-width slot format described in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotCodec;

impl SlotCodec {
    pub fn new() -> Self {
        SlotCodec
    }
}

impl ValueCodec for SlotCodec {
    fn encode(&self, colors: &[Color]) -> Result<String, CodecError> {
        let mut slots = Vec::with_capacity(VALUE_SLOTS);

        for color in colors.iter().take(VALUE_SLOTS) {
            if color.hex.len() != 7 {
                return Err(CodecError::BadHexWidth(color.hex.clone()));
            }
            if color.count > MAX_SLOT_COUNT {
                return Err(CodecError::CountOverflow(color.count));
            }
            slots.push(format!("{}{:04}", color.hex, color.count));
        }

        while slots.len() < VALUE_SLOTS {
            slots.push(format!("{EMPTY_COLOR_SLOT}0000"));
        }

        Ok(slots.join(","))
    }

    fn decode(&self, value: &str) -> Result<Vec<Color>, CodecError> {
        let slots: Vec<&str> = value.split(',').collect();
        if slots.len() != VALUE_SLOTS {
            return Err(CodecError::BadSlotCount(value.to_string()));
        }

        let mut colors = Vec::with_capacity(VALUE_SLOTS);
        for slot in slots {
            if slot.len() < 7 {
                return Err(CodecError::TruncatedSlot(slot.to_string()));
            }
            let (hex, count_field) = slot.split_at(7);
            if hex == EMPTY_COLOR_SLOT {
                continue;
            }

            let count: u32 = count_field
                .parse()
                .map_err(|_| CodecError::BadCount(count_field.to_string()))?;
            if count == 0 {
                continue;
            }

            colors.push(Color::from_hex(hex, count)?);
        }

        Ok(colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(hex: &str, count: u32) -> Color {
        Color::from_hex(hex, count).unwrap()
    }

    #[test]
    fn test_encode_three_colors() {
        let colors = vec![color("#3264c8", 4200), color("#c83232", 310), color("#111111", 8)];
        let codec = SlotCodec::new();
        assert_eq!(
            codec.encode(&colors).unwrap(),
            "#3264c84200,#c832320310,#1111110008"
        );
    }

    #[test]
    fn test_encode_pads_missing_slots() {
        let codec = SlotCodec::new();
        assert_eq!(
            codec.encode(&[color("#ff0000", 12)]).unwrap(),
            "#ff00000012,XXXXXXX0000,XXXXXXX0000"
        );
        assert_eq!(codec.encode(&[]).unwrap(), "XXXXXXX0000,XXXXXXX0000,XXXXXXX0000");
    }

    #[test]
    fn test_encode_rejects_oversized_count() {
        let codec = SlotCodec::new();
        let err = codec.encode(&[color("#ff0000", 10_000)]).unwrap_err();
        assert_eq!(err, CodecError::CountOverflow(10_000));
    }

    #[test]
    fn test_decode_round_trip() {
        let codec = SlotCodec::new();
        let colors = vec![color("#3264c8", 4200), color("#c83232", 310)];
        let decoded = codec.decode(&codec.encode(&colors).unwrap()).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].hex, "#3264c8");
        assert_eq!(decoded[0].count, 4200);
        assert_eq!(decoded[1].hex, "#c83232");
        assert_eq!(decoded[1].count, 310);
    }

    #[test]
    fn test_decode_skips_placeholder_and_zero_count_slots() {
        let codec = SlotCodec::new();
        let decoded = codec
            .decode("#ff00000012,XXXXXXX0000,#00ff000000")
            .unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].hex, "#ff0000");
    }

    #[test]
    fn test_decode_rejects_wrong_slot_count() {
        let codec = SlotCodec::new();
        assert!(matches!(
            codec.decode("#ff00000012,XXXXXXX0000"),
            Err(CodecError::BadSlotCount(_))
        ));
        assert!(matches!(codec.decode(""), Err(CodecError::BadSlotCount(_))));
    }

    #[test]
    fn test_decode_rejects_garbage_count() {
        let codec = SlotCodec::new();
        assert!(matches!(
            codec.decode("#ff0000abcd,XXXXXXX0000,XXXXXXX0000"),
            Err(CodecError::BadCount(_))
        ));
    }
}
