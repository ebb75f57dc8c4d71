//! Location report composition and delivery
//!
//! Builds the human-readable SMS payload and pushes it through the
//! modem. The payload layout is wire-visible — receivers parse it — so
//! field order and labels must stay stable.

use crate::devices::fuel_gauge::BatteryReading;
use crate::devices::modem::{SendResult, Sim800};
use crate::platform::traits::{GpioInterface, TimerInterface, UartInterface};
use crate::subsystems::fix_store::Fix;
use core::fmt::Write;
use heapless::String;

/// Upper bound for one composed report
pub const MESSAGE_CAPACITY: usize = 320;

/// Note line for a fix acquired while the query was being handled
pub const NOTE_CURRENT: &str = "This is the current location.";
/// Note line for a fix retained from an earlier cycle
pub const NOTE_LAST_KNOWN: &str = "This is the last known location.";

/// On/off time of each acknowledgment blink
const BLINK_MS: u32 = 1_000;

/// Everything one report is built from; immutable snapshot
#[derive(Debug, Clone, Copy)]
pub struct LocationReport<'a> {
    /// Freshness note, shown as the first line when a fix is present
    pub note: &'a str,
    /// Position snapshot, absent when no fix was ever acquired
    pub fix: Option<Fix>,
    /// Battery telemetry snapshot
    pub battery: BatteryReading,
}

/// Compose the outbound SMS payload
///
/// With a fix: note, coordinates, map link, battery lines. Without one:
/// an explicit "coordinates unavailable" notice plus the battery lines.
pub fn compose(report: &LocationReport<'_>) -> String<MESSAGE_CAPACITY> {
    let mut message: String<MESSAGE_CAPACITY> = String::new();

    match report.fix {
        Some(fix) => {
            let _ = write!(
                message,
                "{}\nLatitude: {:.6}\nLongitude: {:.6}\nLocation Link: https://www.google.com/maps/place/{:.6},{:.6}\n",
                report.note, fix.latitude, fix.longitude, fix.latitude, fix.longitude
            );
        }
        None => {
            let _ = message.push_str("GPS coordinates unavailable.\n");
        }
    }

    let _ = message.push_str("Battery Voltage: ");
    match report.battery.voltage {
        Some(voltage) => {
            let _ = write!(message, "{}", voltage);
        }
        None => {
            let _ = message.push_str("unknown");
        }
    }
    let _ = message.push_str("V\nBattery SOC: ");
    match report.battery.state_of_charge {
        Some(percent) => {
            let _ = write!(message, "{}", percent);
        }
        None => {
            let _ = message.push_str("unknown");
        }
    }
    let _ = message.push_str("%");

    message
}

/// Report delivery: acknowledgment blinks, composition, modem hand-off
pub struct LocationReporter<M, G, T>
where
    M: UartInterface,
    G: GpioInterface,
    T: TimerInterface,
{
    modem: Sim800<M, T>,
    activity: G,
    timer: T,
}

impl<M, G, T> LocationReporter<M, G, T>
where
    M: UartInterface,
    G: GpioInterface,
    T: TimerInterface,
{
    /// Create a new reporter
    ///
    /// # Arguments
    ///
    /// * `modem` - Modem session used for delivery
    /// * `activity` - Indicator blinked as the "attempt started" signal
    /// * `timer` - Delay source for the blink pattern
    pub fn new(modem: Sim800<M, T>, activity: G, timer: T) -> Self {
        Self {
            modem,
            activity,
            timer,
        }
    }

    /// Direct modem access for session management around delivery
    pub fn modem_mut(&mut self) -> &mut Sim800<M, T> {
        &mut self.modem
    }

    /// Compose and transmit one report
    ///
    /// The two-blink pattern signals that an attempt started, not that
    /// it succeeded; it runs before transmission regardless of outcome.
    pub fn deliver(&mut self, destination: &str, report: &LocationReport<'_>) -> SendResult {
        self.blink_acknowledgment();
        let message = compose(report);
        self.modem.send_sms(destination, &message)
    }

    fn blink_acknowledgment(&mut self) {
        for _ in 0..2 {
            let _ = self.activity.set_high();
            let _ = self.timer.delay_ms(BLINK_MS);
            let _ = self.activity.set_low();
            let _ = self.timer.delay_ms(BLINK_MS);
        }
    }
}
