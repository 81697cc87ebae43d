use core::fmt;

use crate::FlakeId;

/// Length of the Crockford base32 form of a `u64`: ceil(64 / 5) characters.
pub const BASE32_LEN: usize = 13;

const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const NO_VALUE: u8 = 255;

/// Lookup table for Crockford base32 decoding.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    // Main alphabet, allow lower-case
    while i < 32 {
        let c = ALPHABET[i as usize];
        lut[c as usize] = i;
        if c.is_ascii_uppercase() {
            lut[(c + 32) as usize] = i; // lowercase letter
        }
        i += 1;
    }
    // Crockford-specific aliases
    lut[b'O' as usize] = 0;
    lut[b'o' as usize] = 0;
    lut[b'I' as usize] = 1;
    lut[b'i' as usize] = 1;
    lut[b'L' as usize] = 1;
    lut[b'l' as usize] = 1;
    lut
};

/// Errors from decoding a Crockford base32 string.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Base32Error {
    /// The input is not exactly [`BASE32_LEN`] characters.
    InvalidLength {
        /// Observed input length in bytes.
        len: usize,
    },
    /// The input contains a byte outside the Crockford alphabet.
    InvalidAscii {
        /// The offending byte.
        byte: u8,
        /// Its position in the input.
        index: usize,
    },
    /// The input decodes to more than 64 bits.
    Overflow {
        /// The leading byte carrying the excess bits.
        byte: u8,
    },
}

impl fmt::Display for Base32Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { len } => {
                write!(f, "invalid length: {len} (expected {BASE32_LEN})")
            }
            Self::InvalidAscii { byte, index } => {
                write!(f, "invalid ascii byte {byte} at index {index}")
            }
            Self::Overflow { byte } => write!(f, "leading byte {byte} overflows 64 bits"),
        }
    }
}

impl core::error::Error for Base32Error {}

impl FlakeId {
    /// Encodes the raw value as a fixed-length Crockford base32 string.
    ///
    /// Thirteen characters, zero-padded, lexicographically ordered the same
    /// way as the raw integers. Round-trips exactly through
    /// [`decode_base32`].
    ///
    /// # Example
    ///
    /// ```
    /// use centiflake::FlakeId;
    ///
    /// let id = FlakeId::from_raw(475_370_495_148_032);
    /// let text = id.encode_base32();
    /// assert_eq!(text.len(), 13);
    /// assert_eq!(FlakeId::decode_base32(&text), Ok(id));
    /// ```
    ///
    /// [`decode_base32`]: Self::decode_base32
    #[must_use]
    pub fn encode_base32(&self) -> String {
        let raw = self.to_raw();
        let mut out = String::with_capacity(BASE32_LEN);
        for i in 0..BASE32_LEN {
            // 13 chars hold 65 bits; the leading char carries only the top
            // 4 bits of the value.
            let shift = 60 - 5 * i;
            out.push(ALPHABET[((raw >> shift) & 0x1F) as usize] as char);
        }
        out
    }

    /// Decodes a fixed-length Crockford base32 string back into an ID.
    ///
    /// Accepts lower-case input and the Crockford aliases (`O`/`o` as 0,
    /// `I`/`i`/`L`/`l` as 1).
    ///
    /// # Errors
    ///
    /// - [`Base32Error::InvalidLength`] if the input is not 13 bytes
    /// - [`Base32Error::InvalidAscii`] on bytes outside the alphabet
    /// - [`Base32Error::Overflow`] if the leading character encodes bits
    ///   beyond the 64-bit range
    pub fn decode_base32(encoded: &str) -> Result<Self, Base32Error> {
        let bytes = encoded.as_bytes();
        if bytes.len() != BASE32_LEN {
            return Err(Base32Error::InvalidLength { len: bytes.len() });
        }

        let mut acc = 0_u64;
        for (index, &byte) in bytes.iter().enumerate() {
            let value = LOOKUP[byte as usize];
            if value == NO_VALUE {
                return Err(Base32Error::InvalidAscii { byte, index });
            }
            if index == 0 && value > 0xF {
                return Err(Base32Error::Overflow { byte });
            }
            acc = (acc << 5) | u64::from(value);
        }
        Ok(Self::from_raw(acc))
    }
}
