//! `ccd-bus` library: driver for the Chrysler CCD-bus, a single-wire,
//! half-duplex, multi-drop automotive network running at 7812.5 bit/s.
//! The crate frames incoming and outgoing byte sequences, detects the
//! bus-idle condition, performs bit-level transmit arbitration on the
//! first byte of every frame, and exposes a small inbox/outbox surface
//! to application code, all in a `no_std` environment behind a narrow
//! hardware abstraction contract.
#![no_std]
//==================================================================================
/// Core data types and bus constants shared across the driver.
pub mod core;
/// Driver errors surfaced by the transmit path.
pub mod error;
/// Low-level infrastructure: the additive checksum codec.
pub mod infra;
/// CCD-bus protocol implementation: HAL contract, idle detection,
/// frame assembly, first-byte arbitration, and the driver facade.
pub mod protocol;
//==================================================================================
