//! Decoding of the fixed 160 byte verification input.
//!
//! The input is encoded as follows:
//!
//! | signed message hash |  r  |  s  | public key x | public key y |
//! | :-----------------: | :-: | :-: | :----------: | :----------: |
//! |          32         | 32  | 32  |     32       |      32      |
//!
//! All integers are big-endian. The message hash is consumed as-is.
use crate::VerifyError;
use bytemuck::{Pod, Zeroable};

/// Length of the message hash.
pub const MESSAGE_HASH_LENGTH: usize = 32;

/// Length of a single scalar or coordinate.
pub const SCALAR_LENGTH: usize = 32;

/// Length of the signature (r || s).
pub const SIGNATURE_LENGTH: usize = 2 * SCALAR_LENGTH;

/// Length of the raw public key (x || y).
pub const PUBKEY_LENGTH: usize = 2 * SCALAR_LENGTH;

/// Length of the uncompressed SEC1 public key (0x04 || x || y).
pub const UNCOMPRESSED_PUBKEY_LENGTH: usize = PUBKEY_LENGTH + 1;

/// Total input length.
pub const INPUT_LENGTH: usize = MESSAGE_HASH_LENGTH + SIGNATURE_LENGTH + PUBKEY_LENGTH;

/// Borrowed view over a verification input.
///
/// The struct has alignment 1 and no padding, so a `&[u8; INPUT_LENGTH]` can be
/// reinterpreted as `&VerifyInput` without copying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct VerifyInput {
    digest: [u8; MESSAGE_HASH_LENGTH],
    signature: [u8; SIGNATURE_LENGTH],
    public_key: [u8; PUBKEY_LENGTH],
}

const _: () = assert!(core::mem::size_of::<VerifyInput>() == INPUT_LENGTH);
const _: () = assert!(core::mem::align_of::<VerifyInput>() == 1);

impl VerifyInput {
    /// Decodes the input, failing if it is not exactly [`INPUT_LENGTH`] bytes.
    ///
    /// The returned view borrows `input`; no bytes are copied.
    #[inline]
    pub fn decode(input: &[u8]) -> Result<&Self, VerifyError> {
        bytemuck::try_from_bytes(input).map_err(|_| VerifyError::invalid_length(input.len()))
    }

    /// Builds an input from its parts.
    pub fn new(
        digest: [u8; MESSAGE_HASH_LENGTH],
        signature: [u8; SIGNATURE_LENGTH],
        public_key: [u8; PUBKEY_LENGTH],
    ) -> Self {
        Self {
            digest,
            signature,
            public_key,
        }
    }

    /// Returns the raw encoding of the input.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; INPUT_LENGTH] {
        bytemuck::cast_ref(self)
    }

    /// Signed message hash.
    #[inline]
    pub fn digest(&self) -> &[u8; MESSAGE_HASH_LENGTH] {
        &self.digest
    }

    /// Signature as `r || s`.
    #[inline]
    pub fn signature(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.signature
    }

    /// Public key as `x || y`.
    #[inline]
    pub fn public_key(&self) -> &[u8; PUBKEY_LENGTH] {
        &self.public_key
    }

    /// Signature component `r`.
    #[inline]
    pub fn r(&self) -> &[u8; SCALAR_LENGTH] {
        split_pair(&self.signature).0
    }

    /// Signature component `s`.
    #[inline]
    pub fn s(&self) -> &[u8; SCALAR_LENGTH] {
        split_pair(&self.signature).1
    }

    /// Public key `x` coordinate.
    #[inline]
    pub fn x(&self) -> &[u8; SCALAR_LENGTH] {
        split_pair(&self.public_key).0
    }

    /// Public key `y` coordinate.
    #[inline]
    pub fn y(&self) -> &[u8; SCALAR_LENGTH] {
        split_pair(&self.public_key).1
    }
}

/// Splits a 64 byte array into its two 32 byte halves.
#[inline]
fn split_pair(pair: &[u8; 2 * SCALAR_LENGTH]) -> (&[u8; SCALAR_LENGTH], &[u8; SCALAR_LENGTH]) {
    let halves: &[[u8; SCALAR_LENGTH]; 2] = bytemuck::cast_ref(pair);
    (&halves[0], &halves[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential_input() -> [u8; INPUT_LENGTH] {
        core::array::from_fn(|i| i as u8)
    }

    #[test]
    fn decode_partitions_fields() {
        let raw = sequential_input();
        let input = VerifyInput::decode(&raw).unwrap();

        assert_eq!(input.digest()[..], raw[..32]);
        assert_eq!(input.r()[..], raw[32..64]);
        assert_eq!(input.s()[..], raw[64..96]);
        assert_eq!(input.x()[..], raw[96..128]);
        assert_eq!(input.y()[..], raw[128..160]);
        assert_eq!(input.signature()[..], raw[32..96]);
        assert_eq!(input.public_key()[..], raw[96..160]);
    }

    #[test]
    fn decode_borrows_input() {
        let raw = sequential_input();
        let input = VerifyInput::decode(&raw).unwrap();
        assert!(core::ptr::eq(input.as_bytes(), &raw));
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let raw = [0u8; INPUT_LENGTH + 1];
        for len in [0, 1, 32, 159, 161] {
            assert_eq!(
                VerifyInput::decode(&raw[..len]),
                Err(VerifyError::InvalidInputLength {
                    expected: INPUT_LENGTH,
                    actual: len,
                })
            );
        }
    }

    #[test]
    fn decode_at_any_alignment() {
        let raw = [7u8; INPUT_LENGTH + 3];
        for offset in 0..3 {
            let input = VerifyInput::decode(&raw[offset..offset + INPUT_LENGTH]).unwrap();
            assert_eq!(input.y(), &[7u8; 32]);
        }
    }

    #[test]
    fn new_round_trips_through_bytes() {
        let input = VerifyInput::new([1; 32], [2; 64], [3; 64]);
        assert_eq!(VerifyInput::decode(input.as_bytes()), Ok(&input));
        assert_eq!(input.s(), &[2; 32]);
        assert_eq!(input.x(), &[3; 32]);
    }
}
