//! Crypto provider interface for the verifier
//!
//! The wire format and input checks live in [`crate::input`] and [`crate::secp256r1`]; the
//! curve arithmetic sits behind the [`Crypto`] trait so a host can swap the backend
//! (for example for a hardware or zkVM accelerated implementation).

use crate::{
    input::{MESSAGE_HASH_LENGTH, PUBKEY_LENGTH, SIGNATURE_LENGTH},
    secp256r1, VerifyResult,
};
use core::fmt::Debug;
use once_cell::race::OnceBox;
use std::boxed::Box;

/// Crypto operations used by the verifier.
pub trait Crypto: Send + Sync + Debug + 'static {
    /// secp256r1 (P-256) signature verification.
    ///
    /// # Arguments
    /// * `msg` - The message hash (32 bytes), used as a prehash
    /// * `sig` - The signature (64 bytes: r || s)
    /// * `pk` - The public key (64 bytes: x || y)
    fn secp256r1_verify_signature(
        &self,
        msg: &[u8; MESSAGE_HASH_LENGTH],
        sig: &[u8; SIGNATURE_LENGTH],
        pk: &[u8; PUBKEY_LENGTH],
    ) -> VerifyResult;
}

/// Default crypto provider backed by the `p256` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCrypto;

impl Crypto for DefaultCrypto {
    #[inline]
    fn secp256r1_verify_signature(
        &self,
        msg: &[u8; MESSAGE_HASH_LENGTH],
        sig: &[u8; SIGNATURE_LENGTH],
        pk: &[u8; PUBKEY_LENGTH],
    ) -> VerifyResult {
        secp256r1::verify_signature(msg, sig, pk)
    }
}

/// Global crypto provider instance
static CRYPTO: OnceBox<Box<dyn Crypto>> = OnceBox::new();

/// Install a custom crypto provider globally.
///
/// Returns `true` if the provider was installed, `false` if a provider was already
/// installed or the default one was already in use.
pub fn install_crypto<C: Crypto>(crypto: C) -> bool {
    CRYPTO.set(Box::new(Box::new(crypto))).is_ok()
}

/// Get the installed crypto provider, or the default if none is installed.
pub fn crypto() -> &'static dyn Crypto {
    CRYPTO.get_or_init(|| Box::new(Box::new(DefaultCrypto))).as_ref()
}
