//! Additive checksum trailing every CCD-bus message longer than one byte.
//! The last byte of a frame is the sum modulo 256 of all preceding bytes.

/// Sum the payload bytes modulo 256. Callers pass the bytes preceding the
/// checksum position.
pub fn compute(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, byte| acc.wrapping_add(*byte))
}

/// Check a complete frame against its trailing checksum byte.
/// Frames shorter than two bytes carry no checksum and always pass.
pub fn verify(frame: &[u8]) -> bool {
    match frame.split_last() {
        Some((claimed, payload)) if !payload.is_empty() => compute(payload) == *claimed,
        _ => true,
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
