//! Blocking mode loops
//!
//! Each loop owns the bus for as long as its mode is selected. Nothing
//! here yields to the executor.

use defmt::*;
use hush_core::config::NodeConfig;
use hush_core::modes::{
    LinkMonitor, ManualButtons, ManualDemo, MonitorAction, MonitorButtons, MONITOR_POLL_MS,
};
use hush_core::report::StatusReport;
use hush_core::scheduler::DecisionLoop;
use hush_core::Step;
use hush_hal::{Clock, InputPin, Uart};
use hush_hal_rp2040::reset;
use hush_protocol::{Link, NodeLiveness};

/// Mode switches and operator buttons
pub struct Panel<P> {
    pub switches: [P; 2],
    pub buttons: [P; 4],
}

impl<P: InputPin> Panel<P> {
    pub fn manual_switch(&self) -> bool {
        self.switches[0].is_high()
    }

    pub fn monitor_switch(&self) -> bool {
        self.switches[1].is_high()
    }

    fn button(&self, index: usize) -> bool {
        self.buttons[index].is_high()
    }
}

/// Controller on button-adjusted vitals; restarts the node when the
/// switch is turned off
pub fn manual_demo<U: Uart, C: Clock, P: InputPin>(
    link: &mut Link<U, C>,
    config: &NodeConfig,
    panel: &Panel<P>,
) -> ! {
    info!("Manual vitals demo");
    let mut demo = ManualDemo::new(config.controller, config.schedule, link.clock().now_ms());
    demo.start(link);

    while panel.manual_switch() {
        let buttons = ManualButtons {
            bpm_down: panel.button(0),
            bpm_up: panel.button(1),
            cry_down: panel.button(2),
            cry_up: panel.button(3),
        };
        let step = demo.step(link, buttons);
        log_step(&step);
        log_report(&demo.report(link.clock().now_ms()));

        let delay = demo.next_delay_ms();
        link.clock_mut().delay_ms(delay);
    }

    info!("Manual demo switched off, restarting");
    reset()
}

/// Poll the nodes and send preset motor commands until the switch is
/// turned off
pub fn link_monitor<U: Uart, C: Clock, P: InputPin>(
    link: &mut Link<U, C>,
    config: &NodeConfig,
    panel: &Panel<P>,
) {
    info!("Link monitor");
    let mut monitor = LinkMonitor::new(&config.link);
    log_liveness(monitor.start(link));

    while panel.monitor_switch() {
        let buttons = MonitorButtons {
            preset_a: panel.button(0),
            preset_b: panel.button(1),
            restart: panel.button(3),
        };
        let poll = monitor.poll(link, buttons);
        debug!("hb={} cry={}", poll.heartbeat, poll.crying);

        match poll.action {
            MonitorAction::None => {}
            MonitorAction::Motor(amp, freq) => info!("MOTOR sent A:{}% F:{}%", amp, freq),
            MonitorAction::Restart => {
                info!("Restart requested");
                reset()
            }
        }

        link.clock_mut().delay_ms(MONITOR_POLL_MS);
    }

    info!("Link monitor switched off");
}

/// Closed-loop control on live readings
pub fn decision_loop<U: Uart, C: Clock, P: InputPin>(
    link: &mut Link<U, C>,
    config: &NodeConfig,
    panel: &Panel<P>,
) -> ! {
    info!("Decision loop: pinging nodes");
    let mut decision = DecisionLoop::new(*config, link.clock().now_ms());
    log_liveness(decision.boot(link));

    if decision.warm_up(link) {
        info!("First reading: {}", decision.vitals());
    } else {
        warn!("No reading during warm-up");
    }

    loop {
        if panel.button(3) {
            info!("Restart requested");
            reset()
        }

        let tick = decision.tick(link);
        if let Some(step) = &tick.step {
            log_step(step);
            log_report(&decision.report(tick.now_ms));
        }

        decision.pause(link);
    }
}

fn log_liveness(liveness: NodeLiveness) {
    info!(
        "HB @1: {}, CRY @2: {}, MTR @3: {}",
        liveness.heartbeat, liveness.crying, liveness.motor
    );
    if !liveness.motor.is_alive() {
        warn!("Motor missing, controller will not run");
    }
}

fn log_step(step: &Step) {
    for trace in &step.traces {
        info!("{}", Display2Format(trace));
    }
    if let Some(cell) = step.command {
        debug!("command {}", Display2Format(&cell));
    }
}

fn log_report(report: &StatusReport) {
    debug!("{}", Display2Format(report));
}
