//! # secp256r1 signature verification
//!
//! Verifies ECDSA signatures over the secp256r1, or P256, elliptic curve. The message hash is
//! taken as a prehash and is never hashed again, matching
//! [EIP-7212](https://eips.ethereum.org/EIPS/eip-7212).
//!
//! See [`crate::input`] for the input layout.
use crate::{
    crypto,
    input::{
        VerifyInput, MESSAGE_HASH_LENGTH, PUBKEY_LENGTH, SIGNATURE_LENGTH,
        UNCOMPRESSED_PUBKEY_LENGTH,
    },
    VerifyError, VerifyResult,
};
use p256::ecdsa::{signature::hazmat::PrehashVerifier, Signature, VerifyingKey};

/// SEC1 tag of an uncompressed point.
const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

/// Decodes `input` and verifies the signature it carries with the installed
/// [`Crypto`](crate::Crypto) provider.
pub fn verify(input: &[u8]) -> VerifyResult {
    let input = VerifyInput::decode(input)?;
    crypto().secp256r1_verify_signature(input.digest(), input.signature(), input.public_key())
}

/// Returns `true` if the signature included in the input byte slice is valid.
#[inline]
pub fn verify_impl(input: &[u8]) -> bool {
    verify(input).is_ok()
}

/// Verify a secp256r1 signature.
///
/// # Arguments
/// * `msg` - The message hash (32 bytes)
/// * `sig` - The signature (64 bytes: r || s)
/// * `pk` - The public key (64 bytes: x || y)
pub fn verify_signature(
    msg: &[u8; MESSAGE_HASH_LENGTH],
    sig: &[u8; SIGNATURE_LENGTH],
    pk: &[u8; PUBKEY_LENGTH],
) -> VerifyResult {
    // Fails if r or s is zero or not below the curve order.
    let signature = Signature::from_slice(sig).map_err(|_| VerifyError::InvalidSignature)?;

    // prepend 0x04 to the public key: uncompressed form
    let mut uncompressed_pk = [0u8; UNCOMPRESSED_PUBKEY_LENGTH];
    uncompressed_pk[0] = SEC1_UNCOMPRESSED_TAG;
    uncompressed_pk[1..].copy_from_slice(pk);

    // Fails if a coordinate is not below the field modulus or the point is not on the curve.
    let public_key =
        VerifyingKey::from_sec1_bytes(&uncompressed_pk).map_err(|_| VerifyError::InvalidPublicKey)?;

    public_key
        .verify_prehash(msg, &signature)
        .map_err(|_| VerifyError::VerificationFailed)
}
