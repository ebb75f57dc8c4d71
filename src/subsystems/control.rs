//! Top-level control loop
//!
//! Single cooperative thread, fixed ~100 ms tick. Each tick services the
//! heartbeat, drains the GPS transport and answers at most one inbound
//! query, in that order. Answering a query stalls the tick for the sum
//! of its settle delays; GPS bytes arriving meanwhile stay in the
//! transport buffer until the next tick, so the buffer must be sized to
//! absorb one full SMS exchange.

use crate::config::{
    DESTINATION_PHONE, HEARTBEAT_INTERVAL_MS, POLL_TICK_MS, REGISTRATION_RETRY_MS,
    SMS_CLEANUP_DELAY_MS,
};
use crate::devices::fuel_gauge::FuelGauge;
use crate::devices::gps::GpsReceiver;
use crate::devices::modem::SendResult;
use crate::platform::traits::{GpioInterface, I2cInterface, TimerInterface, UartInterface};
use crate::subsystems::fix_store::FixStore;
use crate::subsystems::reporter::{LocationReport, LocationReporter, NOTE_CURRENT, NOTE_LAST_KNOWN};

/// Network registration retry policy
///
/// Unbounded by default: the device must not pretend to be online before
/// the network accepts it, and a watchdog is expected to cover the case
/// where the network never does. A maintainer can bound it for bench
/// bring-up without touching the loop itself.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Give up after this many failed attempts; `None` retries forever
    pub max_attempts: Option<u32>,
    /// Wait between attempts
    pub interval_ms: u32,
}

impl RetryPolicy {
    /// Retry forever with a fixed interval
    pub const fn unbounded(interval_ms: u32) -> Self {
        Self {
            max_attempts: None,
            interval_ms,
        }
    }

    /// Retry at most `max_attempts` times with a fixed interval
    pub const fn limited(max_attempts: u32, interval_ms: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            interval_ms,
        }
    }
}

/// Indicator outputs, one binary output per signal
pub struct Indicators<G: GpioInterface> {
    /// Lit while startup registration is in progress
    pub status: G,
    /// Flips every 500 ms in steady state; dark while a query is handled
    pub heartbeat: G,
    /// Lit while an undelivered fix is retained
    pub fix: G,
}

/// The locator's scheduler: startup gate plus the steady-state tick
pub struct ControlLoop<U, M, I, G, T>
where
    U: UartInterface,
    M: UartInterface,
    I: I2cInterface,
    G: GpioInterface,
    T: TimerInterface,
{
    gps: GpsReceiver<U>,
    reporter: LocationReporter<M, G, T>,
    gauge: FuelGauge<I, T>,
    fixes: FixStore,
    indicators: Indicators<G>,
    timer: T,
    registration: RetryPolicy,
    last_heartbeat_ms: u64,
}

impl<U, M, I, G, T> ControlLoop<U, M, I, G, T>
where
    U: UartInterface,
    M: UartInterface,
    I: I2cInterface,
    G: GpioInterface,
    T: TimerInterface,
{
    /// Assemble the loop from its peripherals
    pub fn new(
        gps: GpsReceiver<U>,
        reporter: LocationReporter<M, G, T>,
        gauge: FuelGauge<I, T>,
        indicators: Indicators<G>,
        timer: T,
    ) -> Self {
        let last_heartbeat_ms = timer.now_ms();
        Self {
            gps,
            reporter,
            gauge,
            fixes: FixStore::new(),
            indicators,
            timer,
            registration: RetryPolicy::unbounded(REGISTRATION_RETRY_MS),
            last_heartbeat_ms,
        }
    }

    /// Override the registration retry policy
    pub fn with_registration_policy(mut self, policy: RetryPolicy) -> Self {
        self.registration = policy;
        self
    }

    /// Startup gate
    ///
    /// Blocks until the modem confirms network registration, then cleans
    /// out the SIM message store so stale queries cannot fire. Returns
    /// `false` only when a bounded policy ran out of attempts.
    pub fn startup(&mut self) -> bool {
        let _ = self.indicators.status.set_high();

        let mut attempts: u32 = 0;
        let registered = loop {
            if self.reporter.modem_mut().check_registration() {
                break true;
            }
            attempts += 1;
            if let Some(max) = self.registration.max_attempts {
                if attempts >= max {
                    break false;
                }
            }
            crate::log_info!("network registration pending, retry {}", attempts);
            let _ = self.timer.delay_ms(self.registration.interval_ms);
        };

        if registered {
            crate::log_info!("modem registered after {} failed attempts", attempts);
            let modem = self.reporter.modem_mut();
            modem.clear_stored_messages();
            modem.query_memory_status();
        } else {
            crate::log_error!("registration attempts exhausted");
        }

        let _ = self.indicators.status.set_low();
        registered
    }

    /// Run forever: startup gate, then the fixed-tick steady state
    pub fn run(&mut self) -> ! {
        if !self.startup() {
            crate::log_error!("entering steady state without network registration");
        }
        loop {
            self.tick();
            let _ = self.timer.delay_ms(POLL_TICK_MS);
        }
    }

    /// One scheduler pass: heartbeat, GPS drain, inbound query
    ///
    /// The order is fixed. An inbound query is only noticed after the
    /// GPS transport has been drained for this tick, and handling it is
    /// never interrupted by newly arriving GPS bytes.
    pub fn tick(&mut self) {
        self.service_heartbeat();
        self.service_gps();
        if self.reporter.modem_mut().has_pending() {
            self.handle_inbound_message();
        }
    }

    fn service_heartbeat(&mut self) {
        let now = self.timer.now_ms();
        if now.wrapping_sub(self.last_heartbeat_ms) >= HEARTBEAT_INTERVAL_MS {
            let _ = self.indicators.heartbeat.toggle();
            self.last_heartbeat_ms = now;
        }
    }

    /// Drain buffered GPS bytes into the fix store
    ///
    /// Returns `true` when a new pair was committed by this drain.
    fn service_gps(&mut self) -> bool {
        match self.gps.poll() {
            Ok(Some((latitude, longitude))) => {
                if self.fixes.update(&latitude, &longitude) {
                    let _ = self.indicators.fix.set_high();
                    true
                } else {
                    false
                }
            }
            Ok(None) => false,
            Err(e) => {
                crate::log_warn!("gps transport fault: {:?}", e);
                false
            }
        }
    }

    /// Answer one inbound query with a location report
    fn handle_inbound_message(&mut self) {
        let _ = self.indicators.heartbeat.set_low();
        self.reporter.modem_mut().discard_pending();

        let battery = self.gauge.snapshot();
        // one extra drain decides between "current" and "last known"
        let fresh = self.service_gps();
        let fix = self.fixes.snapshot();
        let note = if fresh { NOTE_CURRENT } else { NOTE_LAST_KNOWN };

        let report = LocationReport { note, fix, battery };
        match self.reporter.deliver(DESTINATION_PHONE, &report) {
            SendResult::Sent => {
                if fix.is_some() {
                    self.fixes.clear();
                    let _ = self.indicators.fix.set_low();
                }
            }
            SendResult::Failed(_) => {
                crate::log_warn!("report delivery failed, fix retained");
            }
        }

        let _ = self.timer.delay_ms(SMS_CLEANUP_DELAY_MS);
        let modem = self.reporter.modem_mut();
        modem.clear_stored_messages();
        modem.query_memory_status();
    }
}
