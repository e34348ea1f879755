//! First-byte bus arbitration by direct line manipulation.
//!
//! The CCD-bus resolves simultaneous transmitters during the first (ID)
//! byte of a frame: every node compares each bit it drives with the level
//! actually present on the wire and backs off as soon as the two disagree.
//! On the wired-level-dominant medium the node sending the lowest ID byte
//! keeps the bus; losers must detect it within the same byte window to
//! avoid corrupting the winner's frame. The comparison works purely on
//! driven-vs-sensed disagreement, without assuming which polarity wins.
use crate::core::HALF_BIT_US;
use crate::protocol::hal::CcdHal;

/// Result of one bit-banged ID-byte exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Exchange {
    /// ID byte reconstructed from the wire, bit by bit. Meaningful whether
    /// the exchange was won or lost: some node's ID byte went over the bus
    /// either way and opens the frame now in progress.
    pub observed_id: u8,
    /// `true` when no mismatch occurred and the observed byte equals the
    /// intended one.
    pub won: bool,
}

/// Drive the ID byte onto the bus while sampling it back, one half bit
/// period (64 µs) at a time. The caller must have suspended the
/// byte-oriented serial hardware beforehand and is responsible for
/// restoring it afterwards. The exchange cannot be cancelled once started;
/// it runs for at most ten bit periods (~1.3 ms).
pub fn contend<H: CcdHal>(hal: &H, id_byte: u8) -> Exchange {
    // The line must be recessive before our start bit. A low level here
    // means another node has already opened its start bit: arbitration is
    // lost before it began and no candidate ID was sampled.
    if !hal.line_read() {
        return Exchange {
            observed_id: 0,
            won: false,
        };
    }

    let mut observed: u8 = 0;
    let mut lost = false;

    // Start bit, dominant for one bit period, sampled at mid-bit.
    hal.line_write(false);
    hal.delay_us(HALF_BIT_US);
    if hal.line_read() {
        // Supposed to read back low; someone is further ahead. Keep
        // sampling the rest of the byte for consistency.
        lost = true;
    }
    hal.delay_us(HALF_BIT_US);

    // Eight data bits, least significant first. Once arbitration is lost
    // the line is left alone and only listened to.
    for i in 0..8 {
        let intended = id_byte & (1 << i) != 0;
        if !lost {
            hal.line_write(intended);
        }
        hal.delay_us(HALF_BIT_US);
        let sampled = hal.line_read();
        if sampled {
            observed |= 1 << i;
        }
        if sampled != intended {
            lost = true;
        }
        hal.delay_us(HALF_BIT_US);
    }

    // Stop bit, recessive. Sampled even when we stopped driving so a
    // malformed stop condition is still caught.
    if !lost {
        hal.line_write(true);
    }
    hal.delay_us(HALF_BIT_US);
    if !hal.line_read() {
        lost = true;
    }
    hal.delay_us(HALF_BIT_US);

    Exchange {
        observed_id: observed,
        won: !lost && observed == id_byte,
    }
}
