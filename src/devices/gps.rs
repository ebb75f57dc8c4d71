//! GPS receiver driver (NMEA protocol)
//!
//! Feeds raw UART bytes through an NMEA sentence parser and surfaces the
//! decoded position as raw degree/minute/hemisphere triples. Coordinate
//! conversion and retention policy live in
//! [`crate::subsystems::fix_store`]; this driver only tokenizes the
//! stream.

use crate::platform::{traits::UartInterface, Result};
use nmea0183::{ParseResult, Parser};

/// Hemisphere of one coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Hemispheres on the negative side of the signed decimal-degree axis
    pub fn is_negative(self) -> bool {
        matches!(self, Hemisphere::South | Hemisphere::West)
    }
}

/// One coordinate axis as it comes off the sentence decoder
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawCoordinate {
    /// Whole degrees, always non-negative
    pub degrees: u16,
    /// Decimal minutes within the degree
    pub minutes: f64,
    /// N/S for latitude, E/W for longitude
    pub hemisphere: Hemisphere,
}

/// GPS receiver driver
///
/// Generic over any type implementing `UartInterface`. Position is taken
/// from GGA sentences; other sentence types and malformed input are
/// skipped without comment, matching a receiver that free-runs on its own
/// schedule.
pub struct GpsReceiver<U: UartInterface> {
    uart: U,
    parser: Parser,
}

impl<U: UartInterface> GpsReceiver<U> {
    /// Create a new GPS receiver driver
    ///
    /// # Arguments
    ///
    /// * `uart` - UART interface the receiver streams into
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            parser: Parser::new(),
        }
    }

    /// True if the transport has unread bytes buffered
    pub fn available(&self) -> bool {
        self.uart.available()
    }

    /// Get mutable reference to the UART interface
    ///
    /// Used for direct transport access, primarily for vendor-specific
    /// configuration commands and bench diagnostics.
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Drain all buffered bytes through the sentence parser
    ///
    /// Returns the last complete coordinate pair decoded during this
    /// drain, or `None` if no complete position sentence arrived. The
    /// pair is raw decoder output; it may still fail conversion (an
    /// unacquired receiver reports zero-degree fields).
    ///
    /// # Errors
    ///
    /// Returns an error if UART communication fails.
    pub fn poll(&mut self) -> Result<Option<(RawCoordinate, RawCoordinate)>> {
        let mut latest = None;

        while self.uart.available() {
            let mut buf = [0u8; 64];
            let count = self.uart.read(&mut buf)?;
            if count == 0 {
                break;
            }

            for &byte in buf.iter().take(count) {
                if let Some(result) = self.parser.parse_from_byte(byte) {
                    match result {
                        Ok(ParseResult::GGA(Some(gga))) => {
                            latest = Some((
                                split_decimal(
                                    gga.latitude.as_f64(),
                                    Hemisphere::North,
                                    Hemisphere::South,
                                ),
                                split_decimal(
                                    gga.longitude.as_f64(),
                                    Hemisphere::East,
                                    Hemisphere::West,
                                ),
                            ));
                        }
                        // other sentence types and parse errors carry no position
                        _ => {}
                    }
                }
            }
        }

        Ok(latest)
    }
}

/// Decompose signed decimal degrees into degree/minute/hemisphere form
fn split_decimal(value: f64, positive: Hemisphere, negative: Hemisphere) -> RawCoordinate {
    let magnitude = if value < 0.0 { -value } else { value };
    let degrees = magnitude as u16;
    RawCoordinate {
        degrees,
        minutes: (magnitude - degrees as f64) * 60.0,
        hemisphere: if value < 0.0 { negative } else { positive },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockUart;

    #[test]
    fn test_gps_no_data() {
        let uart = MockUart::new();
        let mut gps = GpsReceiver::new(uart);

        let position = gps.poll().unwrap();
        assert!(position.is_none());
    }

    #[test]
    fn test_gps_parse_gpgga() {
        let uart = MockUart::new();
        let mut gps = GpsReceiver::new(uart);

        let nmea = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";
        gps.uart_mut().inject_rx_data(nmea);

        let (latitude, longitude) = gps.poll().unwrap().expect("expected position");
        assert_eq!(latitude.degrees, 48);
        assert!((latitude.minutes - 7.038).abs() < 1e-6);
        assert_eq!(latitude.hemisphere, Hemisphere::North);
        assert_eq!(longitude.degrees, 11);
        assert!((longitude.minutes - 31.0).abs() < 1e-6);
        assert_eq!(longitude.hemisphere, Hemisphere::East);
    }

    #[test]
    fn test_gps_southern_and_eastern_hemisphere() {
        let uart = MockUart::new();
        let mut gps = GpsReceiver::new(uart);

        let nmea = b"$GPGGA,015540.000,3351.6500,S,15112.1000,E,1,08,1.0,5.0,M,0.0,M,,*78\r\n";
        gps.uart_mut().inject_rx_data(nmea);

        let (latitude, longitude) = gps.poll().unwrap().expect("expected position");
        assert_eq!(latitude.degrees, 33);
        assert!((latitude.minutes - 51.65).abs() < 1e-6);
        assert_eq!(latitude.hemisphere, Hemisphere::South);
        assert_eq!(longitude.degrees, 151);
        assert!((longitude.minutes - 12.1).abs() < 1e-6);
        assert_eq!(longitude.hemisphere, Hemisphere::East);
    }

    #[test]
    fn test_gps_western_longitude() {
        let uart = MockUart::new();
        let mut gps = GpsReceiver::new(uart);

        let nmea = b"$GPGGA,123519,4041.2000,N,07402.6000,W,1,07,1.2,10.0,M,0.0,M,,*5C\r\n";
        gps.uart_mut().inject_rx_data(nmea);

        let (_, longitude) = gps.poll().unwrap().expect("expected position");
        assert_eq!(longitude.degrees, 74);
        assert!((longitude.minutes - 2.6).abs() < 1e-6);
        assert_eq!(longitude.hemisphere, Hemisphere::West);
    }

    #[test]
    fn test_gps_invalid_sentence() {
        let uart = MockUart::new();
        let mut gps = GpsReceiver::new(uart);

        gps.uart_mut().inject_rx_data(b"INVALID DATA\r\n");

        let position = gps.poll().unwrap();
        assert!(position.is_none());
    }

    #[test]
    fn test_gps_last_pair_of_drain_wins() {
        let uart = MockUart::new();
        let mut gps = GpsReceiver::new(uart);

        gps.uart_mut()
            .inject_rx_data(b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n");
        gps.uart_mut()
            .inject_rx_data(b"$GPGGA,015540.000,3351.6500,S,15112.1000,E,1,08,1.0,5.0,M,0.0,M,,*78\r\n");

        let (latitude, _) = gps.poll().unwrap().expect("expected position");
        assert_eq!(latitude.degrees, 33);
        assert_eq!(latitude.hemisphere, Hemisphere::South);
    }

    #[test]
    fn test_split_decimal_negative_axis() {
        let raw = split_decimal(-33.860833, Hemisphere::North, Hemisphere::South);
        assert_eq!(raw.degrees, 33);
        assert_eq!(raw.hemisphere, Hemisphere::South);
        assert!((raw.minutes - 51.65).abs() < 1e-3);
    }
}
