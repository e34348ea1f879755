//! CCD-bus protocol implementation: the hardware abstraction contract,
//! bus-idle detection, frame buffers, first-byte arbitration, and the
//! driver facade tying them together.
pub mod arbitration;
pub mod driver;
pub mod frame;
pub mod hal;
pub mod idle;
