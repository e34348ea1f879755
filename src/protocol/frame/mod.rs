//! Fixed-capacity frame buffers and the single-message inbox slot.
//! No allocation: every container is a 16-byte array plus a cursor.
use crate::core::MAX_FRAME_LENGTH;
use crate::infra::checksum;

//==================================================================================Receive side

/// Accumulates incoming bytes until the next frame boundary (idle
/// transition). Owned exclusively by the receive path.
#[derive(Debug)]
pub struct ReceiveBuffer {
    bytes: [u8; MAX_FRAME_LENGTH],
    pos: usize,
}

impl ReceiveBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; MAX_FRAME_LENGTH],
            pos: 0,
        }
    }

    /// Append one byte. Returns `false` when the buffer is already full:
    /// the byte is dropped and the cursor stays frozen at capacity.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.pos < MAX_FRAME_LENGTH {
            self.bytes[self.pos] = byte;
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Restart the buffer with the ID byte observed during arbitration.
    /// Whether arbitration was won or lost, some node's ID byte is now on
    /// the bus and opens the frame being received.
    pub fn seed(&mut self, id_byte: u8) {
        self.bytes[0] = id_byte;
        self.pos = 1;
    }

    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    /// Bytes accumulated so far, in reception order.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.pos]
    }

    /// Discard the accumulated bytes. Called only at a frame boundary.
    pub fn reset(&mut self) {
        self.pos = 0;
    }
}

impl Default for ReceiveBuffer {
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================Transmit side

/// Outgoing frame, owned by the arbitration engine for the duration of one
/// `write` call. Cleared on completion, abort, or collision.
#[derive(Debug)]
pub struct TransmitBuffer {
    bytes: [u8; MAX_FRAME_LENGTH],
    len: usize,
    pos: usize,
}

impl TransmitBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; MAX_FRAME_LENGTH],
            len: 0,
            pos: 0,
        }
    }

    /// Load a message, optionally overwriting its last byte with the
    /// computed checksum. Single-byte messages never carry one.
    /// `message` must fit the frame capacity; `write` validates that.
    pub fn load(&mut self, message: &[u8], with_checksum: bool) {
        self.bytes[..message.len()].copy_from_slice(message);
        self.len = message.len();
        self.pos = 0;
        if with_checksum && self.len > 1 {
            self.bytes[self.len - 1] = checksum::compute(&self.bytes[..self.len - 1]);
        }
    }

    /// The ID byte, contended for during arbitration.
    pub fn id_byte(&self) -> u8 {
        self.bytes[0]
    }

    /// Next byte to stream out, advancing the read cursor.
    pub fn next_byte(&mut self) -> Option<u8> {
        if self.pos < self.len {
            let byte = self.bytes[self.pos];
            self.pos += 1;
            Some(byte)
        } else {
            None
        }
    }

    /// Resume automatic transmission after a won arbitration exchange:
    /// the ID byte is already on the bus.
    pub fn skip_id_byte(&mut self) {
        self.pos = 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Abandon the frame (collision, timeout) or finish it.
    pub fn reset(&mut self) {
        self.len = 0;
        self.pos = 0;
    }
}

impl Default for TransmitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================Inbox slot

/// Most recent completed, validated message plus its unread flag. Holds at
/// most one message: a second completion before the first is read
/// overwrites it wholesale (last-write-wins, documented limitation).
#[derive(Debug)]
pub struct MessageSlot {
    bytes: [u8; MAX_FRAME_LENGTH],
    len: usize,
    unread: bool,
}

impl MessageSlot {
    pub const fn new() -> Self {
        Self {
            bytes: [0; MAX_FRAME_LENGTH],
            len: 0,
            unread: false,
        }
    }

    /// Validation step run at every frame boundary. When `verify_checksum`
    /// is set and the frame is longer than one byte, a mismatching trailer
    /// rejects the frame: the slot and its unread flag are left untouched,
    /// so a still-unread earlier message is never clobbered by garbage.
    pub fn finalize(&mut self, frame: &[u8], verify_checksum: bool) -> bool {
        if verify_checksum && frame.len() > 1 && !checksum::verify(frame) {
            return false;
        }
        self.bytes[..frame.len()].copy_from_slice(frame);
        self.len = frame.len();
        self.unread = true;
        true
    }

    /// `true` when a completed message has not been read yet.
    pub fn unread(&self) -> bool {
        self.unread
    }

    /// Copy the held message into `target`, clear the unread flag, and
    /// return the number of bytes copied. The message stays in place: a
    /// second call hands out the same bytes again.
    pub fn read_into(&mut self, target: &mut [u8]) -> usize {
        let count = self.len.min(target.len());
        target[..count].copy_from_slice(&self.bytes[..count]);
        self.unread = false;
        count
    }
}

impl Default for MessageSlot {
    fn default() -> Self {
        Self::new()
    }
}
