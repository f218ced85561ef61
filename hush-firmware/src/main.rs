//! Hush - Soothing Cradle Decision Node
//!
//! Firmware for the RP2040 node that closes the loop between the heart
//! rate and crying sensor nodes and the cradle motor node. Two switches
//! pick the run mode at boot:
//!
//! - switch 0: manual vitals demo
//! - switch 1: link monitor, then the decision loop once switched off
//! - neither: decision loop

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::Peri;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hush_core::modes::RunMode;
use hush_hal_rp2040::{BusUart, EmbassyClock, RpInput};
use hush_protocol::{Address, Link};

use crate::run::Panel;

mod config;
mod run;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Hush decision node starting...");

    let p = embassy_rp::init(Default::default());
    let config = config::load();

    // Bus on UART0 (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.bus.baudrate;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    info!("Bus UART at {} baud", config.bus.baudrate);

    let mut link = Link::new(BusUart::new(uart), EmbassyClock, Address::Master, config.link);

    // Switches on GPIO2/3 (active-high), buttons on GPIO6-9 to ground
    let panel = Panel {
        switches: [input(p.PIN_2.into(), Pull::Down), input(p.PIN_3.into(), Pull::Down)],
        buttons: [
            input(p.PIN_6.into(), Pull::Up),
            input(p.PIN_7.into(), Pull::Up),
            input(p.PIN_8.into(), Pull::Up),
            input(p.PIN_9.into(), Pull::Up),
        ],
    };

    let mode = RunMode::select(panel.manual_switch(), panel.monitor_switch());
    info!("Run mode: {}", mode);

    match mode {
        RunMode::ManualDemo => run::manual_demo(&mut link, &config, &panel),
        RunMode::LinkMonitor => {
            run::link_monitor(&mut link, &config, &panel);
            run::decision_loop(&mut link, &config, &panel)
        }
        RunMode::Decision => run::decision_loop(&mut link, &config, &panel),
    }
}

fn input(pin: Peri<'static, AnyPin>, pull: Pull) -> RpInput<'static> {
    RpInput::new(Input::new(pin, pull), pull)
}
