//! Hardware abstraction contract for the CCD-bus driver. Allows the core
//! state machine to run unchanged on different boards and inside host
//! tests with simulated hardware.

/// Capability set the driver requires from the platform.
///
/// All methods take `&self`: implementations typically wrap memory-mapped
/// peripherals and are reached from both foreground code and interrupt
/// handlers. The serial frame format is fixed by the bus: 7812.5 baud,
/// 8 data bits, no parity, 1 stop bit.
pub trait CcdHal {
    /// Monotonic millisecond clock backing the bus-idle wait budget.
    fn millis(&self) -> u32;

    /// Block for `us` microseconds. Arbitration timing accuracy depends on it.
    fn delay_us(&self, us: u32);

    /// Configure the byte-oriented serial hardware for the bus frame format
    /// and enable the receiver, transmitter and receive notification.
    fn serial_init(&self);

    /// Disable byte-oriented receive/transmit and hand the RX/TX lines over
    /// to direct pin control (RX input with pull-up, TX output idling high).
    fn serial_suspend(&self);

    /// Re-enable the receiver, transmitter and receive notification after a
    /// bit-banged exchange.
    fn serial_resume(&self);

    /// Load one byte into the serial output register.
    fn serial_write(&self, byte: u8);

    /// Enable or disable the byte-output-ready notification that drives
    /// automatic transmission of the queued frame.
    fn set_tx_ready_irq(&self, enabled: bool);

    /// Sample the receive line level. `true` is the recessive (idle) state.
    fn line_read(&self) -> bool;

    /// Drive the transmit line to the given level.
    fn line_write(&self, level: bool);

    /// Set the one-shot idle timer duration to `threshold_bits` bit periods.
    fn idle_timer_configure(&self, threshold_bits: u8);

    /// (Re)start the one-shot idle timer from zero.
    fn idle_timer_arm(&self);

    /// Stop the idle timer without letting it fire.
    fn idle_timer_disarm(&self);

    /// Start the clock feeding the external transceiver (hardware-assisted
    /// mode only).
    fn transceiver_clock_enable(&self);

    /// Stop the transceiver clock.
    fn transceiver_clock_disable(&self);

    /// Register the falling-edge notifications for the transceiver's idle
    /// and active-byte lines.
    fn edge_interrupts_attach(&self);

    /// Detach both edge notifications.
    fn edge_interrupts_detach(&self);
}
