//! Decision loop
//!
//! Ties the bus proxies to the controller: boot pings, a bounded warm-up
//! that waits for a first reading, then one tick per poll interval. Each
//! tick polls the sensors, steps the controller if it is due and forwards
//! the decision to the motor.

use hush_hal::{Clock, Uart};
use hush_protocol::{Link, MotorNode, NodeLiveness, SensorNode};

use super::cadence::Cadence;
use crate::config::NodeConfig;
use crate::controller::{Controller, Step};
use crate::report::StatusReport;
use crate::vitals::{Vitals, VitalsCache};

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    /// Clock reading at the start of the tick
    pub now_ms: u32,
    /// Vitals fed to (or available to) the controller
    pub vitals: Vitals,
    /// Controller step, if one was due and the motor is reachable
    pub step: Option<Step>,
}

/// The decision node's main loop state
#[derive(Debug, Clone)]
pub struct DecisionLoop {
    config: NodeConfig,
    controller: Controller,
    cadence: Cadence,
    vitals: VitalsCache,
    liveness: NodeLiveness,
    heartbeat: SensorNode,
    crying: SensorNode,
    motor: MotorNode,
}

impl DecisionLoop {
    pub fn new(config: NodeConfig, now_ms: u32) -> Self {
        Self {
            controller: Controller::new(config.controller, now_ms),
            cadence: Cadence::new(config.schedule),
            vitals: VitalsCache::new(),
            liveness: NodeLiveness::all_alive(),
            heartbeat: SensorNode::heartbeat(&config.link),
            crying: SensorNode::crying(&config.link),
            motor: MotorNode::new(),
            config,
        }
    }

    /// Ping every node, then start the run clock
    pub fn boot<U: Uart, C: Clock>(&mut self, link: &mut Link<U, C>) -> NodeLiveness {
        self.liveness = NodeLiveness::probe(link);
        self.controller.reset(link.clock().now_ms());
        self.cadence.restart();
        self.liveness
    }

    /// Poll until either sensor reports a non-zero value
    ///
    /// Gives up after the configured number of polls. Returns whether a
    /// reading was obtained.
    pub fn warm_up<U: Uart, C: Clock>(&mut self, link: &mut Link<U, C>) -> bool {
        for _ in 0..self.config.schedule.warmup_polls {
            self.poll_heartbeat(link);
            self.poll_crying(link);
            if self.vitals.has_reading() {
                return true;
            }
            link.clock_mut()
                .delay_ms(self.config.schedule.warmup_interval_ms);
        }
        self.vitals.has_reading()
    }

    /// One pass of the main loop
    pub fn tick<U: Uart, C: Clock>(&mut self, link: &mut Link<U, C>) -> Tick {
        let now_ms = link.clock().now_ms();

        self.poll_heartbeat(link);
        if self.config.schedule.crying_feedback {
            self.poll_crying(link);
        } else {
            self.vitals.force_cry(0);
        }

        let vitals = self.vitals.current();
        let mut tick = Tick {
            now_ms,
            vitals,
            step: None,
        };

        if self.cadence.poll_due(now_ms) && self.liveness.motor.is_alive() {
            let step = self.controller.step(vitals, now_ms);
            self.cadence.observe(&step);
            if let Some(cell) = step.command {
                self.motor.command(link, cell.amp(), cell.freq());
            }
            tick.step = Some(step);
        }

        tick
    }

    /// Sleep until the next poll
    pub fn pause<U: Uart, C: Clock>(&self, link: &mut Link<U, C>) {
        link.clock_mut()
            .delay_ms(self.config.schedule.poll_interval_ms);
    }

    /// Status snapshot for the log
    pub fn report(&self, now_ms: u32) -> StatusReport {
        StatusReport::capture(
            &self.controller,
            self.vitals.current(),
            self.motor.last_sent(),
            now_ms,
        )
    }

    pub fn liveness(&self) -> NodeLiveness {
        self.liveness
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn vitals(&self) -> Vitals {
        self.vitals.current()
    }

    fn poll_heartbeat<U: Uart, C: Clock>(&mut self, link: &mut Link<U, C>) {
        if self.liveness.heartbeat.is_alive() {
            self.vitals.update_bpm(self.heartbeat.request(link));
        }
    }

    fn poll_crying<U: Uart, C: Clock>(&mut self, link: &mut Link<U, C>) {
        if self.liveness.crying.is_alive() {
            self.vitals.update_cry(self.crying.request(link));
        }
    }
}
