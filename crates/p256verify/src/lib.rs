//! # p256verify
//!
//! ECDSA signature verification over the P-256 (secp256r1) curve for a fixed
//! 160 byte input, as consumed by the `p256verify` opcode of an EVM host.
//!
//! The crate is split the same way the call is:
//! * [`input`] decodes and partitions the borrowed input buffer,
//! * [`secp256r1`] checks the signature against the decoded fields,
//! * [`crypto`] holds the pluggable backend the verifier calls into.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub mod crypto;
pub mod input;
pub mod interface;
pub mod secp256r1;

pub use crypto::{crypto, install_crypto, Crypto, DefaultCrypto};
pub use input::{VerifyInput, INPUT_LENGTH};
pub use interface::{P256Status, VerifyError, VerifyResult};
pub use secp256r1::{verify, verify_impl, verify_signature};
