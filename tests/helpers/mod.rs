//! Test doubles simulating the CCD-bus hardware during integration tests.
use ccd_bus::core::HALF_BIT_US;
use ccd_bus::protocol::driver::Ccd;
use ccd_bus::protocol::hal::CcdHal;
use std::cell::{Cell, RefCell};

/// Simulated platform for one bus node. Serial activity is recorded, and
/// the raw line is modeled as the wired-AND of the node's own driven level
/// and an optional peer transmitting its ID byte in the same bit window
/// (start bit, eight data bits LSB-first, stop bit, then idle).
pub struct SimHal {
    clock_ms: Cell<u32>,
    sent: RefCell<Vec<u8>>,
    tx_irq: Cell<bool>,
    timer_armed: Cell<bool>,
    driven: Cell<bool>,
    half_bits: Cell<u32>,
    peer_id: Cell<Option<u8>>,
}

#[allow(dead_code)]
impl SimHal {
    pub fn new() -> Self {
        Self {
            clock_ms: Cell::new(0),
            sent: RefCell::new(Vec::new()),
            tx_irq: Cell::new(false),
            timer_armed: Cell::new(false),
            driven: Cell::new(true),
            half_bits: Cell::new(0),
            peer_id: Cell::new(None),
        }
    }

    /// Script a contending node for the next arbitration exchange.
    pub fn set_peer(&self, peer_id: u8) {
        self.peer_id.set(Some(peer_id));
    }

    /// Bytes the node pushed into its serial output register so far.
    pub fn sent(&self) -> Vec<u8> {
        self.sent.borrow().clone()
    }

    pub fn tx_irq_enabled(&self) -> bool {
        self.tx_irq.get()
    }

    fn peer_level(&self, half_bit: u32) -> bool {
        let Some(id) = self.peer_id.get() else {
            return true;
        };
        match half_bit {
            0 => true,
            1..=2 => false,
            3..=18 => id & (1 << ((half_bit - 3) / 2)) != 0,
            _ => true,
        }
    }
}

impl Default for SimHal {
    fn default() -> Self {
        Self::new()
    }
}

impl CcdHal for &SimHal {
    fn millis(&self) -> u32 {
        // Every observation advances time by one millisecond, so bounded
        // waits terminate deterministically.
        let now = self.clock_ms.get() + 1;
        self.clock_ms.set(now);
        now
    }

    fn delay_us(&self, us: u32) {
        self.half_bits.set(self.half_bits.get() + us / HALF_BIT_US);
    }

    fn serial_init(&self) {}
    fn serial_suspend(&self) {}
    fn serial_resume(&self) {}

    fn serial_write(&self, byte: u8) {
        self.sent.borrow_mut().push(byte);
    }

    fn set_tx_ready_irq(&self, enabled: bool) {
        self.tx_irq.set(enabled);
    }

    fn line_read(&self) -> bool {
        self.driven.get() && self.peer_level(self.half_bits.get())
    }

    fn line_write(&self, level: bool) {
        self.driven.set(level);
    }

    fn idle_timer_configure(&self, _threshold_bits: u8) {}

    fn idle_timer_arm(&self) {
        self.timer_armed.set(true);
    }

    fn idle_timer_disarm(&self) {
        self.timer_armed.set(false);
    }

    fn transceiver_clock_enable(&self) {}
    fn transceiver_clock_disable(&self) {}
    fn edge_interrupts_attach(&self) {}
    fn edge_interrupts_detach(&self) {}
}

/// Stream the queued frame the way the byte-output-ready interrupt would,
/// returning the bytes emitted during this transmission.
#[allow(dead_code)]
pub fn pump_tx(hal: &SimHal, driver: &Ccd<&SimHal>) -> Vec<u8> {
    let before = hal.sent.borrow().len();
    while hal.tx_irq.get() {
        driver.on_tx_ready();
    }
    hal.sent.borrow()[before..].to_vec()
}

/// Deliver raw bytes to a node's receive path and close the frame with an
/// idle-timer expiry, as silence on the wire would.
#[allow(dead_code)]
pub fn deliver_and_idle(driver: &Ccd<&SimHal>, bytes: &[u8]) {
    for byte in bytes {
        driver.on_byte_received(*byte, ccd_bus::core::SerialError::NONE);
    }
    driver.on_idle_timer_expired();
}
