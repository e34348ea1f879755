//! Unit tests for the additive checksum codec.
use super::{compute, verify};

#[test]
/// Plain sum of the payload bytes.
fn test_compute_sums_bytes() {
    assert_eq!(compute(&[0x24, 0x02, 0x48]), 0x6E);
}

#[test]
/// The sum wraps around modulo 256.
fn test_compute_wraps_modulo_256() {
    assert_eq!(compute(&[0xFF, 0xFF, 0x04]), 0x02);
}

#[test]
fn test_compute_empty_payload_is_zero() {
    assert_eq!(compute(&[]), 0);
}

#[test]
/// A real engine-speed frame as seen on the bus.
fn test_verify_accepts_matching_trailer() {
    assert!(verify(&[0xE4, 0x02, 0x54, 0x3A]));
}

#[test]
fn test_verify_rejects_corrupted_trailer() {
    assert!(!verify(&[0xE4, 0x02, 0x54, 0x3B]));
}

#[test]
/// Single-byte frames are never checksum-processed.
fn test_verify_passes_one_byte_frame() {
    assert!(verify(&[0x25]));
    assert!(verify(&[]));
}

#[test]
/// Minimum checksummed frame: one payload byte plus its own value.
fn test_verify_two_byte_frame() {
    assert!(verify(&[0x42, 0x42]));
    assert!(!verify(&[0x42, 0x43]));
}
