//! Driver facade tying the idle detector, frame buffers and arbitration
//! engine together behind the public inbox/outbox surface.
//!
//! Concurrency contract: the `on_*` entry points are designed to be called
//! from interrupt context while the foreground sits in `available`, `read`
//! or `write`. Every multi-step state update therefore runs inside a
//! critical-section-backed mutex, acquired immediately before the update
//! and released right after; the lock is never held across the bus-idle
//! wait or a bit-bang hold. The bus state itself is a lone atomic flag.
use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::core::{BusMode, BusState, Config, SerialError, MAX_FRAME_LENGTH, WRITE_TIMEOUT_MS};
use crate::error::WriteError;
use crate::protocol::arbitration;
use crate::protocol::frame::{MessageSlot, ReceiveBuffer, TransmitBuffer};
use crate::protocol::hal::CcdHal;
use crate::protocol::idle::IdleDetector;

/// Mutable driver state shared between foreground calls and the
/// hardware-event entry points.
struct Shared {
    rx: ReceiveBuffer,
    tx: TransmitBuffer,
    inbox: MessageSlot,
    last_error: SerialError,
}

/// CCD-bus driver. One instance per bus; every method takes `&self` so the
/// instance can be placed in a `static` and reached from interrupt
/// handlers and foreground code alike.
pub struct Ccd<H: CcdHal> {
    hal: H,
    config: Config,
    detector: IdleDetector,
    shared: Mutex<CriticalSectionRawMutex, RefCell<Shared>>,
}

impl<H: CcdHal> Ccd<H> {
    /// Initialize the serial hardware and arm the idle-detection strategy
    /// selected by `config`. One-time setup; the configuration is fixed for
    /// the driver's lifetime.
    pub fn new(hal: H, config: Config) -> Self {
        hal.serial_init();
        match config.mode {
            BusMode::HardwareAssisted => {
                hal.transceiver_clock_enable();
                hal.edge_interrupts_attach();
            }
            BusMode::SoftwareTimed => {
                hal.transceiver_clock_disable();
                hal.edge_interrupts_detach();
                hal.idle_timer_configure(config.idle_threshold_bits);
                hal.idle_timer_arm();
            }
        }
        Self {
            detector: IdleDetector::new(config.mode),
            shared: Mutex::new(RefCell::new(Shared {
                rx: ReceiveBuffer::new(),
                tx: TransmitBuffer::new(),
                inbox: MessageSlot::new(),
                last_error: SerialError::NONE,
            })),
            hal,
            config,
        }
    }

    //==================================================================================Public surface

    /// `true` when a completed, validated message is waiting to be read.
    pub fn available(&self) -> bool {
        self.shared.lock(|cell| cell.borrow().inbox.unread())
    }

    /// Copy the held message into `target`, clear the unread flag and
    /// return the message length. The message stays in place: calling
    /// `read` again before the next completed frame hands out the same
    /// bytes again.
    pub fn read(&self, target: &mut [u8]) -> usize {
        self.shared.lock(|cell| cell.borrow_mut().inbox.read_into(target))
    }

    /// Freshest serial error flags sampled by the receive path.
    pub fn last_serial_error(&self) -> SerialError {
        self.shared.lock(|cell| cell.borrow().last_error)
    }

    /// Current bus state as seen by the idle detector.
    pub fn bus_state(&self) -> BusState {
        self.detector.state()
    }

    /// Queue `message` and transmit it as one frame.
    ///
    /// When checksum calculation is enabled and the message is longer than
    /// one byte, its last byte is overwritten with the computed checksum.
    /// Blocks until the bus goes idle (1-second budget), then claims the
    /// bus and transmits according to the configured strategy. On
    /// [`WriteError::Collision`] the remainder of the message is discarded
    /// and the winner's frame is captured through the ordinary receive
    /// path; there is no automatic retry.
    pub fn write(&self, message: &[u8]) -> Result<(), WriteError> {
        if message.is_empty() || message.len() > MAX_FRAME_LENGTH {
            return Err(WriteError::InvalidArgument);
        }

        self.shared.lock(|cell| {
            cell.borrow_mut()
                .tx
                .load(message, self.config.calculate_tx_checksum)
        });

        // Bounded wait for the bus to fall silent. The lock is not held
        // here: idle is declared by an interrupt-context entry point.
        let wait_start = self.hal.millis();
        while !self.detector.is_idle() {
            if self.hal.millis().wrapping_sub(wait_start) > WRITE_TIMEOUT_MS {
                self.shared.lock(|cell| cell.borrow_mut().tx.reset());
                #[cfg(feature = "defmt")]
                defmt::warn!("write: bus never went idle, giving up");
                return Err(WriteError::Timeout);
            }
        }

        // Claim the bus.
        self.detector.mark_busy();

        match self.config.mode {
            BusMode::HardwareAssisted => {
                // The transceiver arbitrates internally and silently mutes
                // its transmitter on collision; nothing is observable from
                // software, so the frame is armed and reported as sent.
                self.hal.set_tx_ready_irq(true);
                Ok(())
            }
            BusMode::SoftwareTimed => self.contend_and_stream(),
        }
    }

    //==================================================================================Transmit path

    /// Software arbitration: bit-bang the ID byte while comparing driven
    /// and sensed levels, then either resume automatic transmission of the
    /// remaining bytes or yield the bus to the winner.
    fn contend_and_stream(&self) -> Result<(), WriteError> {
        let id_byte = self.shared.lock(|cell| cell.borrow().tx.id_byte());

        // The idle timer must not fire off our own bit timing.
        self.hal.idle_timer_disarm();
        self.hal.serial_suspend();

        let exchange = arbitration::contend(&self.hal, id_byte);

        // The bus is live again: restart idle timing right away.
        self.hal.idle_timer_arm();

        if exchange.won {
            self.shared.lock(|cell| {
                let mut shared = cell.borrow_mut();
                // The observed ID byte opens the frame on the receive side.
                shared.rx.seed(exchange.observed_id);
                shared.tx.skip_id_byte();
            });
            self.hal.serial_resume();
            self.hal.set_tx_ready_irq(true);
            Ok(())
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "arbitration lost, winning ID byte: {=u8:x}",
                exchange.observed_id
            );
            self.shared.lock(|cell| {
                let mut shared = cell.borrow_mut();
                shared.rx.seed(exchange.observed_id);
                shared.tx.reset();
            });
            // Receive hardware comes back so the winner's message is
            // captured through the ordinary receive path.
            self.hal.serial_resume();
            Err(WriteError::Collision)
        }
    }

    /// Entry point for the byte-output-ready notification: stream the next
    /// queued byte or finish the transmission. Uniform after either
    /// strategy once past the first byte.
    pub fn on_tx_ready(&self) {
        self.shared.lock(|cell| {
            let mut shared = cell.borrow_mut();
            match shared.tx.next_byte() {
                Some(byte) => self.hal.serial_write(byte),
                None => {
                    self.hal.set_tx_ready_irq(false);
                    shared.tx.reset();
                }
            }
        });
    }

    //==================================================================================Receive path

    /// Entry point for every received byte together with the serial error
    /// bits sampled from the hardware. Bytes beyond the frame capacity are
    /// dropped with the overflow flag raised, cursor frozen at capacity.
    pub fn on_byte_received(&self, byte: u8, error: SerialError) {
        if self.config.mode == BusMode::SoftwareTimed {
            // Idle timing restarts at the stop bit of every byte.
            self.hal.idle_timer_arm();
        }
        self.detector.mark_busy();

        self.shared.lock(|cell| {
            let mut shared = cell.borrow_mut();
            let mut flags = error;
            if !shared.rx.push(byte) {
                flags.overflow = true;
                #[cfg(feature = "defmt")]
                defmt::warn!("receive buffer full, byte dropped");
            }
            shared.last_error = flags;
        });
    }

    /// Entry point for the transceiver's bus-idle falling edge
    /// (hardware-assisted mode).
    pub fn on_bus_idle(&self) {
        self.detector.mark_idle();
        self.finalize_frame();
    }

    /// Entry point for the transceiver's active-byte falling edge: a byte
    /// transfer has started somewhere on the bus.
    pub fn on_active_byte(&self) {
        self.detector.mark_busy();
    }

    /// Entry point for the one-shot idle timer (software-timed mode): the
    /// configured number of silent bit periods elapsed.
    pub fn on_idle_timer_expired(&self) {
        self.hal.idle_timer_disarm();
        self.detector.mark_idle();
        self.finalize_frame();
    }

    /// Hand the accumulated frame to validation and reset the buffer, the
    /// only reset point after accumulation. Runs inside one critical
    /// section so a byte arriving mid-finalization can neither land in the
    /// frame being closed nor get lost from the next one. An empty buffer
    /// produces no frame.
    fn finalize_frame(&self) {
        self.shared.lock(|cell| {
            let shared = &mut *cell.borrow_mut();
            if shared.rx.is_empty() {
                return;
            }
            let accepted = shared
                .inbox
                .finalize(shared.rx.as_slice(), self.config.verify_rx_checksum);
            if !accepted {
                #[cfg(feature = "defmt")]
                defmt::debug!("frame dropped: checksum mismatch");
            }
            shared.rx.reset();
        });
    }
}
