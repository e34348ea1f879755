//! Arbitration scenarios: two nodes start a transmission within the same
//! bit window and the lower ID byte keeps the bus.
mod helpers;

use ccd_bus::core::{BusMode, Config, MAX_FRAME_LENGTH};
use ccd_bus::error::WriteError;
use ccd_bus::protocol::driver::Ccd;
use helpers::{deliver_and_idle, pump_tx, SimHal};

fn software_config() -> Config {
    Config {
        mode: BusMode::SoftwareTimed,
        ..Config::default()
    }
}

#[test]
/// Both nodes contend in the same bit window: the node driving 0x20 wins
/// and completes its frame, the node driving 0x30 backs off, observes the
/// winner's ID byte, and captures the winner's message intact.
fn lower_id_byte_wins_the_bus() {
    let winner_hal = SimHal::new();
    let winner = Ccd::new(&winner_hal, software_config());
    let loser_hal = SimHal::new();
    let loser = Ccd::new(&loser_hal, software_config());

    winner.on_idle_timer_expired();
    loser.on_idle_timer_expired();

    // Each node sees the other transmitting during its own exchange.
    winner_hal.set_peer(0x30);
    loser_hal.set_peer(0x20);

    assert_eq!(winner.write(&[0x20, 0x22, 0x00]), Ok(()));
    assert_eq!(
        loser.write(&[0x30, 0x01, 0x00]),
        Err(WriteError::Collision)
    );

    // The winner finishes its frame over the serial path; the loser has
    // nothing left to send.
    let streamed = pump_tx(&winner_hal, &winner);
    assert_eq!(streamed, vec![0x22, 0x42]);
    assert!(pump_tx(&loser_hal, &loser).is_empty());

    // The loser's receive buffer already opens with the winning ID byte;
    // the rest of the winner's frame arrives byte by byte.
    deliver_and_idle(&loser, &streamed);
    assert!(loser.available());

    let mut target = [0u8; MAX_FRAME_LENGTH];
    let len = loser.read(&mut target);
    assert_eq!(&target[..len], &[0x20, 0x22, 0x42]);
}

#[test]
/// Symmetric check: a node sending the higher ID never reports success.
fn higher_id_byte_always_loses() {
    let hal = SimHal::new();
    let driver = Ccd::new(&hal, software_config());
    driver.on_idle_timer_expired();
    hal.set_peer(0x20);

    assert_eq!(
        driver.write(&[0x30, 0x01, 0x02]),
        Err(WriteError::Collision)
    );
    assert!(hal.sent().is_empty());
}

#[test]
/// Losing arbitration leaves the driver fully operational: once the bus
/// quiets down, the same message goes through on retry.
fn retry_after_collision_succeeds() {
    let hal = SimHal::new();
    let driver = Ccd::new(&hal, software_config());
    driver.on_idle_timer_expired();

    hal.set_peer(0x20);
    assert_eq!(driver.write(&[0x30, 0x01, 0x00]), Err(WriteError::Collision));

    // Winner's frame plays out and the bus goes idle again.
    deliver_and_idle(&driver, &[0x22, 0x42]);

    // Nobody contends this time.
    let winner_message = {
        let mut target = [0u8; MAX_FRAME_LENGTH];
        let len = driver.read(&mut target);
        target[..len].to_vec()
    };
    assert_eq!(winner_message, vec![0x20, 0x22, 0x42]);

    assert_eq!(driver.write(&[0x30, 0x01, 0x00]), Ok(()));
    assert_eq!(pump_tx(&hal, &driver), vec![0x01, 0x31]);
}
