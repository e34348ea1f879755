//! Core data types and constants of the CCD-bus: frame geometry, bit
//! timing, the idle/busy bus states, serial error flags, and the driver
//! configuration fixed at initialization.

//==================================================================================Constants

/// Fixed capacity of every frame buffer. CCD-bus messages never exceed 16 bytes.
pub const MAX_FRAME_LENGTH: usize = 16;

/// Duration of one bus bit in microseconds (1 / 7812.5 s).
pub const BIT_PERIOD_US: u32 = 128;

/// Half of one bit period, the hold time used while bit-banging the ID byte.
pub const HALF_BIT_US: u32 = 64;

/// Budget for the bus-idle wait inside `write`, in milliseconds.
pub const WRITE_TIMEOUT_MS: u32 = 1000;

/// Default number of consecutive silent bit periods declaring the bus idle,
/// per the CDP68HC68S1 transceiver datasheet (includes the stop bit of the
/// last message byte).
pub const IDLE_BITS_10: u8 = 10;
/// Relaxed idle thresholds for buses where messages arrive back to back.
pub const IDLE_BITS_11: u8 = 11;
pub const IDLE_BITS_12: u8 = 12;
pub const IDLE_BITS_13: u8 = 13;
pub const IDLE_BITS_14: u8 = 14;

//==================================================================================Enums and Structs

/// Idle-detection and arbitration strategy, selected once at
/// initialization and fixed for the driver's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusMode {
    /// An external transceiver (e.g. the CDP68HC68S1) senses bus-idle and
    /// arbitration at bit level and reports them as two edge interrupts.
    HardwareAssisted,
    /// The driver measures idle time with a one-shot timer and arbitrates
    /// the first byte by direct line sampling.
    SoftwareTimed,
}

/// Instantaneous state of the shared bus line. Transitions of this state
/// are the single source of truth for frame boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    /// No node is signaling; the line has been recessive for the
    /// configured number of consecutive bit periods.
    Idle,
    /// A start condition or an active transmission is in progress.
    Busy,
}

/// Serial-level fault flags sampled together with each received byte.
/// Overwritten on every reception; diagnostic only, never propagated as
/// a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialError {
    /// Stop bit missing on the received byte.
    pub framing: bool,
    /// A byte arrived before the previous one was taken from the data register.
    pub overrun: bool,
    /// The receive buffer was full and the byte was dropped.
    pub overflow: bool,
}

impl SerialError {
    /// No fault recorded.
    pub const NONE: Self = Self {
        framing: false,
        overrun: false,
        overflow: false,
    };

    /// `true` when at least one fault flag is raised.
    pub fn any(&self) -> bool {
        self.framing || self.overrun || self.overflow
    }
}

/// Driver configuration, immutable after initialization.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Idle-detection and arbitration strategy.
    pub mode: BusMode,
    /// Consecutive silent bit periods sensed as the bus-idle condition.
    pub idle_threshold_bits: u8,
    /// Verify received frames against their trailing checksum byte and
    /// drop them silently when broken.
    pub verify_rx_checksum: bool,
    /// Overwrite the last byte of outgoing frames with the computed checksum.
    pub calculate_tx_checksum: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: BusMode::SoftwareTimed,
            idle_threshold_bits: IDLE_BITS_10,
            verify_rx_checksum: true,
            calculate_tx_checksum: true,
        }
    }
}
