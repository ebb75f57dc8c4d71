//! SIM800 cellular modem driver (AT command session)
//!
//! Drives a half-duplex AT session over an unbuffered text transport
//! that gives no echo or delivery guarantee. Every exchange is a write,
//! a fixed settle delay sized for the command, and a single read of
//! whatever arrived in that window. The read never waits for a response
//! terminator: an incomplete classification is an accepted trade for a
//! bounded worst-case stall, which the scheduler depends on.

use crate::config::{
    COMMAND_SETTLE_MS, SMS_CLEANUP_DELAY_MS, SMS_FINAL_SETTLE_MS, SMS_STEP_SETTLE_MS,
};
use crate::platform::{
    traits::{TimerInterface, UartInterface},
    Result,
};
use core::fmt::Write;
use heapless::{String, Vec};

/// Largest response fragment kept from a single read
pub const RESPONSE_CAPACITY: usize = 256;

/// Byte that terminates an SMS body and triggers transmission (Ctrl+Z)
const SMS_TERMINATOR: u8 = 0x1A;

/// Classification of the bytes read back after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseClass {
    /// Response contained the `OK` token
    Ok,
    /// Response contained the `> ` body prompt
    Prompt,
    /// Nothing arrived within the settle window
    Empty,
    /// Bytes arrived but matched no known token
    Other,
}

/// Outcome of one SMS delivery attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// The modem acknowledged the message
    Sent,
    /// Delivery was not acknowledged; carries the raw response bytes
    Failed(Vec<u8, RESPONSE_CAPACITY>),
}

/// SIM800 modem driver
///
/// Generic over any UART implementation plus a delay source for the
/// settle windows.
pub struct Sim800<U: UartInterface, T: TimerInterface> {
    uart: U,
    timer: T,
}

impl<U: UartInterface, T: TimerInterface> Sim800<U, T> {
    /// Create a new modem driver
    pub fn new(uart: U, timer: T) -> Self {
        Self { uart, timer }
    }

    /// Get mutable reference to the UART interface
    ///
    /// Used for direct transport access, primarily for bench diagnostics.
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// True if unsolicited bytes (an inbound SMS notification) are waiting
    pub fn has_pending(&self) -> bool {
        self.uart.available()
    }

    /// Read and discard whatever the modem pushed unsolicited
    ///
    /// Called once at the start of inbound handling so the notification
    /// is consumed exactly once and cannot retrigger on the next poll.
    pub fn discard_pending(&mut self) {
        match self.read_response() {
            Ok(bytes) if !bytes.is_empty() => {
                crate::log_debug!("discarded {} unsolicited bytes", bytes.len());
            }
            Ok(_) => {}
            Err(e) => crate::log_warn!("modem read failed: {:?}", e),
        }
    }

    /// Send one command and classify whatever comes back
    ///
    /// Transport faults are never fatal here; they classify as
    /// [`ResponseClass::Empty`] and are logged.
    pub fn send_command(&mut self, command: &str, settle_ms: u32) -> ResponseClass {
        match self.exchange(command, settle_ms) {
            Ok(class) => class,
            Err(e) => {
                crate::log_warn!("command {:?} failed on transport: {:?}", command, e);
                ResponseClass::Empty
            }
        }
    }

    /// Query network registration status
    ///
    /// Any response at all counts as "modem alive and talking"; only
    /// silence is failure. SMS delivery applies the stricter token check
    /// instead.
    pub fn check_registration(&mut self) -> bool {
        !matches!(
            self.send_command("AT+CREG?", COMMAND_SETTLE_MS),
            ResponseClass::Empty
        )
    }

    /// Send a text message
    ///
    /// Four writes with per-step settle delays: text mode, recipient,
    /// body, terminator. The final window is longer because transmission
    /// happens there. Only the final read is classified; `OK` or the
    /// body prompt count as acknowledgment. A successful send is
    /// followed by a cool-down and stored-message cleanup.
    pub fn send_sms(&mut self, number: &str, body: &str) -> SendResult {
        let response = match self.transmit_sms(number, body) {
            Ok(response) => response,
            Err(e) => {
                crate::log_error!("sms transmit aborted: {:?}", e);
                return SendResult::Failed(Vec::new());
            }
        };

        match classify(&response) {
            ResponseClass::Ok | ResponseClass::Prompt => {
                crate::log_info!("sms sent");
                let _ = self.timer.delay_ms(SMS_CLEANUP_DELAY_MS);
                self.clear_stored_messages();
                SendResult::Sent
            }
            class => {
                crate::log_warn!("sms not acknowledged ({:?})", class);
                SendResult::Failed(response)
            }
        }
    }

    fn transmit_sms(&mut self, number: &str, body: &str) -> Result<Vec<u8, RESPONSE_CAPACITY>> {
        let mut recipient: String<64> = String::new();
        let _ = write!(recipient, "AT+CMGS=\"{}\"", number);

        self.write_line("AT+CMGF=1")?;
        self.timer.delay_ms(SMS_STEP_SETTLE_MS)?;
        self.write_line(&recipient)?;
        self.timer.delay_ms(SMS_STEP_SETTLE_MS)?;
        self.write_line(body)?;
        self.timer.delay_ms(SMS_STEP_SETTLE_MS)?;
        self.uart.write(&[SMS_TERMINATOR])?;
        self.timer.delay_ms(SMS_FINAL_SETTLE_MS)?;
        self.read_response()
    }

    /// Delete all stored messages (best-effort housekeeping)
    ///
    /// The outcome is logged and otherwise ignored; no control decision
    /// hangs on it and repeating it is harmless.
    pub fn clear_stored_messages(&mut self) {
        match self.send_command("AT+CMGD=1,4", COMMAND_SETTLE_MS) {
            ResponseClass::Empty => crate::log_debug!("no response to stored-message delete"),
            class => crate::log_debug!("stored-message delete answered {:?}", class),
        }
    }

    /// Log the SIM message-memory status (best-effort, informational)
    pub fn query_memory_status(&mut self) {
        match self.send_command("AT+CPMS?", COMMAND_SETTLE_MS) {
            ResponseClass::Empty => crate::log_debug!("no response to memory-status query"),
            class => crate::log_debug!("memory status answered {:?}", class),
        }
    }

    fn exchange(&mut self, command: &str, settle_ms: u32) -> Result<ResponseClass> {
        self.write_line(command)?;
        self.timer.delay_ms(settle_ms)?;
        let response = self.read_response()?;
        Ok(classify(&response))
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        self.uart.write(text.as_bytes())?;
        self.uart.write(b"\r")?;
        Ok(())
    }

    fn read_response(&mut self) -> Result<Vec<u8, RESPONSE_CAPACITY>> {
        let mut buf = [0u8; RESPONSE_CAPACITY];
        let count = self.uart.read(&mut buf)?;
        let mut response = Vec::new();
        // count is bounded by the read buffer, which matches the capacity
        let _ = response.extend_from_slice(&buf[..count]);
        Ok(response)
    }
}

/// Classify a raw response fragment by token search
fn classify(response: &[u8]) -> ResponseClass {
    if response.is_empty() {
        ResponseClass::Empty
    } else if contains(response, b"OK") {
        ResponseClass::Ok
    } else if contains(response, b"> ") {
        ResponseClass::Prompt
    } else {
        ResponseClass::Other
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockTimer, MockUart};
    use crate::platform::traits::TimerInterface;

    fn modem() -> Sim800<MockUart, MockTimer> {
        Sim800::new(MockUart::new(), MockTimer::new())
    }

    fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|window| *window == needle)
            .count()
    }

    #[test]
    fn test_classify_tokens() {
        assert_eq!(classify(b"\r\nOK\r\n"), ResponseClass::Ok);
        assert_eq!(classify(b"+CREG: 0,1\r\nOK\r\n"), ResponseClass::Ok);
        assert_eq!(classify(b"> "), ResponseClass::Prompt);
        assert_eq!(classify(b"\r\n> "), ResponseClass::Prompt);
        assert_eq!(classify(b""), ResponseClass::Empty);
        assert_eq!(classify(b"ERROR"), ResponseClass::Other);
        assert_eq!(classify(b">"), ResponseClass::Other); // prompt needs the trailing space
    }

    #[test]
    fn test_send_command_terminates_with_carriage_return() {
        let mut modem = modem();
        modem.uart_mut().inject_rx_data(b"OK");

        let class = modem.send_command("AT", 100);
        assert_eq!(class, ResponseClass::Ok);
        assert_eq!(modem.uart.tx_buffer(), b"AT\r");
        assert_eq!(modem.timer.now_ms(), 100);
    }

    #[test]
    fn test_check_registration_silence_is_failure() {
        let mut modem = modem();
        assert!(!modem.check_registration());
        assert_eq!(modem.uart.tx_buffer(), b"AT+CREG?\r");
        assert_eq!(modem.timer.now_ms(), 5_000);
    }

    #[test]
    fn test_check_registration_any_bytes_count_as_alive() {
        let mut modem = modem();
        modem.uart_mut().inject_rx_data(b"ERROR");
        assert!(modem.check_registration());

        modem.uart_mut().inject_rx_data(b"+CREG: 0,1\r\nOK\r\n");
        assert!(modem.check_registration());
    }

    #[test]
    fn test_send_sms_sequence_and_timing() {
        let mut modem = modem();
        modem.uart_mut().inject_rx_data(b"\r\nOK\r\n");

        let result = modem.send_sms("+385919738960", "hello");
        assert_eq!(result, SendResult::Sent);

        let tx = modem.uart.tx_buffer();
        let mut expected = b"AT+CMGF=1\rAT+CMGS=\"+385919738960\"\rhello\r\x1a".to_vec();
        expected.extend_from_slice(b"AT+CMGD=1,4\r"); // post-send cleanup
        assert_eq!(tx, expected);

        // 3 x 1 s steps + 3 s transmit window + 5 s cool-down + 5 s cleanup settle
        assert_eq!(modem.timer.now_ms(), 16_000);
    }

    #[test]
    fn test_send_sms_prompt_counts_as_acknowledgment() {
        let mut modem = modem();
        modem.uart_mut().inject_rx_data(b"> ");

        assert_eq!(modem.send_sms("+385919738960", "hi"), SendResult::Sent);
    }

    #[test]
    fn test_send_sms_rejects_unknown_response() {
        let mut modem = modem();
        modem.uart_mut().inject_rx_data(b"+CMS ERROR: 500");

        match modem.send_sms("+385919738960", "hi") {
            SendResult::Failed(raw) => assert_eq!(&raw[..], b"+CMS ERROR: 500"),
            other => panic!("expected failure, got {:?}", other),
        }
        // no cleanup after a failed send
        assert_eq!(count_occurrences(&modem.uart.tx_buffer(), b"AT+CMGD"), 0);
    }

    #[test]
    fn test_send_sms_rejects_silence() {
        let mut modem = modem();

        match modem.send_sms("+385919738960", "hi") {
            SendResult::Failed(raw) => assert!(raw.is_empty()),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_clear_stored_messages_is_repeatable() {
        let mut modem = modem();

        modem.clear_stored_messages();
        let after_first = modem.uart.tx_buffer();
        modem.clear_stored_messages();
        let after_second = modem.uart.tx_buffer();

        assert_eq!(after_first, b"AT+CMGD=1,4\r");
        assert_eq!(&after_second[after_first.len()..], b"AT+CMGD=1,4\r");
        assert_eq!(count_occurrences(&after_second, b"AT+CMGD=1,4\r"), 2);
    }

    #[test]
    fn test_discard_pending_consumes_notification() {
        let mut modem = modem();
        modem.uart_mut().inject_rx_data(b"+CMTI: \"SM\",1\r\n");

        assert!(modem.has_pending());
        modem.discard_pending();
        assert!(!modem.has_pending());
    }

    #[test]
    fn test_query_memory_status_command() {
        let mut modem = modem();
        modem.uart_mut().inject_rx_data(b"+CPMS: \"SM\",0,30\r\nOK\r\n");

        modem.query_memory_status();
        assert_eq!(modem.uart.tx_buffer(), b"AT+CPMS?\r");
    }
}
