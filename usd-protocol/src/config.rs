//! Decoder configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What to do with bytes after the declared payload inside a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TrailingData {
    /// Drop them silently
    #[default]
    Ignore,
    /// Reject the frame
    Reject,
}

/// Frame decoding options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderConfig {
    pub trailing_data: TrailingData,
}

impl DecoderConfig {
    /// Lenient configuration: trailing bytes are ignored
    pub const fn new() -> Self {
        Self {
            trailing_data: TrailingData::Ignore,
        }
    }

    /// Strict configuration: trailing bytes fail the frame
    pub const fn strict() -> Self {
        Self {
            trailing_data: TrailingData::Reject,
        }
    }

    pub const fn with_trailing_data(mut self, trailing_data: TrailingData) -> Self {
        self.trailing_data = trailing_data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lenient() {
        assert_eq!(DecoderConfig::default().trailing_data, TrailingData::Ignore);
        assert_eq!(DecoderConfig::default(), DecoderConfig::new());
    }

    #[test]
    fn test_with_trailing_data() {
        let config = DecoderConfig::new().with_trailing_data(TrailingData::Reject);
        assert_eq!(config, DecoderConfig::strict());
    }
}
