//! Bus-idle tracking shared between the foreground transmit path and the
//! hardware-event entry points.
//!
//! Two interchangeable strategies feed this detector. In hardware-assisted
//! mode an external transceiver measures silence at bit level and reports
//! idle / active-byte edges. In software-timed mode every received byte
//! rearms a one-shot timer of `idle_threshold_bits` bit periods and the
//! timer expiry is the sole idle signal. Either way, a transition to idle
//! is the only event that delimits a frame.
use crate::core::{BusMode, BusState};
use core::sync::atomic::{AtomicBool, Ordering};

/// Single source of truth for the bus state. The flag is a lone atomic so
/// interrupt handlers can flip it without taking a critical section.
#[derive(Debug)]
pub struct IdleDetector {
    idle: AtomicBool,
}

impl IdleDetector {
    /// Initial state depends on the strategy: a transceiver reports idle
    /// from power-up, while the software timer has not measured anything
    /// yet and must assume the bus is busy until its first expiry.
    pub const fn new(mode: BusMode) -> Self {
        Self {
            idle: AtomicBool::new(matches!(mode, BusMode::HardwareAssisted)),
        }
    }

    /// Current bus state.
    pub fn state(&self) -> BusState {
        if self.is_idle() {
            BusState::Idle
        } else {
            BusState::Busy
        }
    }

    pub fn is_idle(&self) -> bool {
        self.idle.load(Ordering::Acquire)
    }

    /// Record a transition to idle (hardware idle edge or timer expiry).
    pub fn mark_idle(&self) {
        self.idle.store(true, Ordering::Release);
    }

    /// Record bus activity (active-byte edge, received byte, or our own
    /// claim of the bus before transmitting).
    pub fn mark_busy(&self) {
        self.idle.store(false, Ordering::Release);
    }
}
