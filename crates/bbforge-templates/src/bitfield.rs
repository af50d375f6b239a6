//! Activated-directive bitfields.
//!
//! Styles store the set of directives they override as a base64-encoded
//! bitfield. Bit `n` lives in byte `n / 8`, most significant bit first.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::catalog::{self, Activation};

/// Standard alphabet, padding optional on decode.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Error decoding a stored bitfield.
#[derive(Debug, thiserror::Error)]
#[error("invalid bitfield {value:?}: {source}")]
pub struct BitfieldError {
    value: String,
    #[source]
    source: base64::DecodeError,
}

/// Set of activated directive bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveBitfield {
    data: Vec<u8>,
}

impl DirectiveBitfield {
    /// Create an empty bitfield.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a base64 bitfield. An empty string is an empty bitfield.
    pub fn from_base64(value: &str) -> Result<Self, BitfieldError> {
        let data = ENGINE
            .decode(value.trim())
            .map_err(|source| BitfieldError {
                value: value.to_owned(),
                source,
            })?;
        Ok(Self { data })
    }

    /// Build a bitfield activating the named catalog directives.
    ///
    /// Names that are not in the catalog, or that follow another directive,
    /// set no bit.
    #[must_use]
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut bitfield = Self::new();
        for name in names {
            if let Some(def) = catalog::lookup(name)
                && let Activation::Bit(bit) = def.activation
            {
                bitfield.set(bit);
            }
        }
        bitfield
    }

    /// Encode as base64, without trailing zero bytes.
    #[must_use]
    pub fn to_base64(&self) -> String {
        let len = self.data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        ENGINE.encode(&self.data[..len])
    }

    /// Whether bit `n` is set.
    #[must_use]
    pub fn get(&self, n: usize) -> bool {
        self.data
            .get(n / 8)
            .is_some_and(|byte| byte & mask(n) != 0)
    }

    /// Set bit `n`, growing the field as needed.
    pub fn set(&mut self, n: usize) {
        let byte = n / 8;
        if self.data.len() <= byte {
            self.data.resize(byte + 1, 0);
        }
        self.data[byte] |= mask(n);
    }

    /// Whether the style activates the catalog directive `name`.
    ///
    /// Unknown directives are never active.
    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        match catalog::lookup(name).map(|def| def.activation) {
            Some(Activation::Bit(bit)) => self.get(bit),
            Some(Activation::Follows(leader)) => self.is_active(leader),
            None => false,
        }
    }

    /// Names of the activated catalog directives, in catalog order.
    #[must_use]
    pub fn active_names(&self) -> Vec<&'static str> {
        catalog::CATALOG
            .iter()
            .map(|def| def.name)
            .filter(|name| self.is_active(name))
            .collect()
    }
}

fn mask(n: usize) -> u8 {
    1 << (7 - (n % 8))
}
