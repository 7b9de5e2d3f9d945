//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use p256::ecdsa::{signature::hazmat::PrehashSigner, Signature, SigningKey};

/// Input length expected by the exported functions.
pub(crate) const INPUT_LENGTH: usize = 160;

/// Installs a test logger once; later calls are no-ops.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Signs `digest` with a fresh key and packs `digest || r || s || x || y`.
pub(crate) fn signed_input(digest: [u8; 32]) -> [u8; INPUT_LENGTH] {
    let key = SigningKey::random(&mut rand::thread_rng());
    pack(&key, digest)
}

/// Signs `digest` with `key` and packs `digest || r || s || x || y`.
pub(crate) fn pack(key: &SigningKey, digest: [u8; 32]) -> [u8; INPUT_LENGTH] {
    let signature: Signature = key.sign_prehash(&digest).unwrap();
    let point = key.verifying_key().to_encoded_point(false);

    let mut input = [0u8; INPUT_LENGTH];
    input[..32].copy_from_slice(&digest);
    input[32..96].copy_from_slice(&signature.to_bytes());
    input[96..128].copy_from_slice(point.x().unwrap());
    input[128..].copy_from_slice(point.y().unwrap());
    input
}
