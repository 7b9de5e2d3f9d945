//! # p256verify-ffi
//!
//! Foreign-call surface of [`p256verify`]. A managed host hands over a borrowed buffer and
//! gets back a single status value; no fault is allowed to unwind across the boundary.
//!
//! Exported symbols:
//! * `VerifyBytes(ptr, len) -> u8` - `1` for a valid signature, `0` for anything else.
//! * `VerifyBuffer(ByteBuffer) -> u8` - same contract, length-carrying handle.
//! * `VerifyArray(const uint8_t (*)[160]) -> u8` - same contract, fixed size reference.
//! * `VerifyBytesStatus(ptr, len) -> P256Status` - detailed status.
//! * `p256_verify(msg, msg_len, sig, pk) -> P256Status` - split buffers.
//! * `ForceGC()` and `ReportGC(*mut MemoryReport)` - see [`diagnostics`].
//!
//! C declarations are in `include/p256verify.h`.

pub mod diagnostics;

pub use diagnostics::{MemoryReport, MemoryStats};
pub use p256verify::{P256Status, INPUT_LENGTH};

use core::{ptr, slice};
use p256verify::{
    crypto,
    input::{MESSAGE_HASH_LENGTH, PUBKEY_LENGTH, SIGNATURE_LENGTH},
    VerifyError, VerifyResult,
};
use std::panic::{self, AssertUnwindSafe};

/// Length-carrying view of a caller owned buffer.
///
/// The caller keeps ownership; the buffer is only read for the duration of the call.
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct ByteBuffer {
    /// Start of the buffer.
    pub ptr: *const u8,
    /// Length of the buffer in bytes.
    pub len: usize,
}

impl ByteBuffer {
    /// Creates a handle over `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            ptr: bytes.as_ptr(),
            len: bytes.len(),
        }
    }

    /// Borrows the buffer if it is exactly [`INPUT_LENGTH`] bytes long.
    ///
    /// # Safety
    ///
    /// If `len` equals [`INPUT_LENGTH`] and `ptr` is non-null, `ptr` must be valid for
    /// reads of `len` bytes for `'a` and the memory must not be mutated during `'a`.
    unsafe fn as_input<'a>(&self) -> Result<&'a [u8], VerifyError> {
        // Length is checked before the pointer is touched.
        if self.len != INPUT_LENGTH {
            return Err(VerifyError::invalid_length(self.len));
        }
        if self.ptr.is_null() {
            return Err(VerifyError::NullInput);
        }
        Ok(unsafe { slice::from_raw_parts(self.ptr, self.len) })
    }
}

/// Runs `f`, converting a panic into [`P256Status::InvalidInput`].
fn catch_ffi<F: FnOnce() -> VerifyResult>(f: F) -> P256Status {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => {
            if let Err(err) = result {
                log::log!(rejection_level(&err), "p256verify: rejected: {err}");
            }
            result.into()
        }
        Err(_) => {
            log::error!("p256verify: verification panicked");
            P256Status::InvalidInput
        }
    }
}

/// Malformed input points at the caller and is logged at `debug`; a signature that simply
/// fails to verify is routine and only logged at `trace`.
fn rejection_level(err: &VerifyError) -> log::Level {
    if err.is_malformed_input() {
        log::Level::Debug
    } else {
        log::Level::Trace
    }
}

/// Verifies the buffer described by `buffer`.
///
/// # Safety
///
/// See [`ByteBuffer::as_input`].
unsafe fn verify_buffer_status(buffer: ByteBuffer) -> P256Status {
    log::trace!("p256verify: data={:p} length={}", buffer.ptr, buffer.len);
    catch_ffi(|| p256verify::verify(unsafe { buffer.as_input() }?))
}

/// Verifies a 160 byte `digest || r || s || x || y` input.
///
/// Returns `1` if the signature is valid and `0` if it is not or the input is malformed.
///
/// # Safety
///
/// When `input_len` is 160 and `input_ptr` is non-null, `input_ptr` must be valid for
/// reads of 160 bytes for the duration of the call. Any other length is rejected without
/// reading through the pointer.
#[export_name = "VerifyBytes"]
pub unsafe extern "C" fn verify_bytes(input_ptr: *const u8, input_len: usize) -> u8 {
    unsafe { verify_buffer_status(ByteBuffer { ptr: input_ptr, len: input_len }) }.as_byte()
}

/// [`verify_bytes`] over a [`ByteBuffer`] handle.
///
/// # Safety
///
/// Same requirements as [`verify_bytes`] for `buffer.ptr` and `buffer.len`.
#[export_name = "VerifyBuffer"]
pub unsafe extern "C" fn verify_buffer(buffer: ByteBuffer) -> u8 {
    unsafe { verify_buffer_status(buffer) }.as_byte()
}

/// [`verify_bytes`] over a reference to exactly 160 bytes; a null pointer is rejected.
#[export_name = "VerifyArray"]
pub extern "C" fn verify_array(input: Option<&[u8; INPUT_LENGTH]>) -> u8 {
    catch_ffi(|| p256verify::verify(input.ok_or(VerifyError::NullInput)?)).as_byte()
}

/// [`verify_bytes`] returning the detailed [`P256Status`] instead of a byte.
///
/// # Safety
///
/// Same requirements as [`verify_bytes`].
#[export_name = "VerifyBytesStatus"]
pub unsafe extern "C" fn verify_bytes_status(input_ptr: *const u8, input_len: usize) -> P256Status {
    unsafe { verify_buffer_status(ByteBuffer { ptr: input_ptr, len: input_len }) }
}

/// Verifies a signature passed as separate buffers.
///
/// * `msg` - message hash, `msg_len` must be 32
/// * `sig` - 64 bytes, `r || s`
/// * `pk` - 64 bytes, `x || y`
///
/// # Safety
///
/// When `msg_len` is 32, every non-null pointer must be valid for reads of its buffer's
/// length for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn p256_verify(
    msg: *const u8,
    msg_len: usize,
    sig: *const u8,
    pk: *const u8,
) -> P256Status {
    log::trace!("p256_verify: msg={msg:p} msg_len={msg_len} sig={sig:p} pk={pk:p}");
    catch_ffi(|| {
        if msg_len != MESSAGE_HASH_LENGTH {
            return Err(VerifyError::InvalidInputLength {
                expected: MESSAGE_HASH_LENGTH,
                actual: msg_len,
            });
        }
        let msg = unsafe { borrow_array::<MESSAGE_HASH_LENGTH>(msg) }?;
        let sig = unsafe { borrow_array::<SIGNATURE_LENGTH>(sig) }?;
        let pk = unsafe { borrow_array::<PUBKEY_LENGTH>(pk) }?;
        crypto().secp256r1_verify_signature(msg, sig, pk)
    })
}

/// Borrows `N` bytes at `ptr`.
///
/// # Safety
///
/// A non-null `ptr` must be valid for reads of `N` bytes for `'a`.
unsafe fn borrow_array<'a, const N: usize>(ptr: *const u8) -> Result<&'a [u8; N], VerifyError> {
    if ptr.is_null() {
        return Err(VerifyError::NullInput);
    }
    // `[u8; N]` has alignment 1, so any non-null pointer is suitably aligned.
    Ok(unsafe { &*ptr.cast::<[u8; N]>() })
}

/// Requests a reclamation pass. Never called from the verification path.
#[export_name = "ForceGC"]
pub extern "C" fn force_gc() {
    let _ = catch_diagnostics(diagnostics::reclaim);
}

/// Runs a reclamation pass and writes statistics from before and after it to `out`.
///
/// A null `out` only logs the report.
///
/// # Safety
///
/// A non-null `out` must be valid for a write of one [`MemoryReport`].
#[export_name = "ReportGC"]
pub unsafe extern "C" fn report_gc(out: *mut MemoryReport) {
    if let Some(report) = catch_diagnostics(diagnostics::report) {
        if !out.is_null() {
            unsafe { ptr::write(out, report) };
        }
    }
}

/// Runs `f`, swallowing a panic.
fn catch_diagnostics<T, F: FnOnce() -> T>(f: F) -> Option<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|_| log::error!("p256verify: diagnostics panicked"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_length_does_not_touch_pointer() {
        // A dangling pointer is fine as long as the length is rejected first.
        let dangling = ptr::NonNull::<u8>::dangling().as_ptr();
        for len in [0, 1, INPUT_LENGTH - 1, INPUT_LENGTH + 1, usize::MAX] {
            let buffer = ByteBuffer { ptr: dangling, len };
            assert_eq!(
                unsafe { buffer.as_input() },
                Err(VerifyError::invalid_length(len))
            );
        }
    }

    #[test]
    fn test_null_pointer_with_valid_length_is_rejected() {
        let buffer = ByteBuffer {
            ptr: ptr::null(),
            len: INPUT_LENGTH,
        };
        assert_eq!(unsafe { buffer.as_input() }, Err(VerifyError::NullInput));
        assert_eq!(unsafe { verify_buffer(buffer) }, 0);
    }

    #[test]
    fn test_panic_is_mapped_to_failure() {
        let status = catch_ffi(|| panic!("boom"));
        assert_eq!(status, P256Status::InvalidInput);
        assert_eq!(status.as_byte(), 0);
    }

    #[test]
    fn test_rejection_level() {
        for err in [
            VerifyError::invalid_length(0),
            VerifyError::NullInput,
            VerifyError::InvalidPublicKey,
        ] {
            assert_eq!(rejection_level(&err), log::Level::Debug, "{err}");
        }
        for err in [VerifyError::InvalidSignature, VerifyError::VerificationFailed] {
            assert_eq!(rejection_level(&err), log::Level::Trace, "{err}");
        }
    }

    #[test]
    fn test_borrow_array_rejects_null() {
        assert_eq!(
            unsafe { borrow_array::<SIGNATURE_LENGTH>(ptr::null()) },
            Err(VerifyError::NullInput)
        );
    }
}
