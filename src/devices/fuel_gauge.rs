//! BQ27441 battery fuel gauge driver
//!
//! Telemetry is informational only: every failure is logged and surfaced
//! as an absent value, so a dead gauge can never block location
//! reporting.

use crate::platform::{
    traits::{I2cInterface, TimerInterface},
    Result,
};

/// BQ27441 I2C address
pub const BQ27441_ADDR: u8 = 0x55;

/// Standard command registers, 16-bit little-endian payloads
pub const REG_CONTROL: u8 = 0x00;
pub const REG_TEMPERATURE: u8 = 0x02;
pub const REG_VOLTAGE: u8 = 0x04;
pub const REG_STATE_OF_CHARGE: u8 = 0x1C;

/// Settle time between addressing a register and reading it back
const REGISTER_SETTLE_MS: u32 = 10;

/// One battery telemetry snapshot
///
/// Each channel fails independently; an absent field means the gauge did
/// not answer for that register.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryReading {
    /// Pack voltage in volts
    pub voltage: Option<f32>,
    /// Remaining capacity estimate in percent
    pub state_of_charge: Option<u16>,
}

/// BQ27441 fuel gauge driver
pub struct FuelGauge<I: I2cInterface, T: TimerInterface> {
    i2c: I,
    timer: T,
}

impl<I: I2cInterface, T: TimerInterface> FuelGauge<I, T> {
    /// Create a new fuel gauge driver
    ///
    /// # Arguments
    ///
    /// * `i2c` - I2C bus the gauge is attached to
    /// * `timer` - Delay source for the register settle time
    pub fn new(i2c: I, timer: T) -> Self {
        Self { i2c, timer }
    }

    /// Read one 16-bit register: address it, settle, read back two bytes
    fn read_register(&mut self, register: u8) -> Result<u16> {
        self.i2c.write(BQ27441_ADDR, &[register])?;
        self.timer.delay_ms(REGISTER_SETTLE_MS)?;
        let mut raw = [0u8; 2];
        self.i2c.read(BQ27441_ADDR, &mut raw)?;
        Ok(u16::from_le_bytes(raw))
    }

    /// Battery voltage in volts, or `None` if the gauge did not answer
    pub fn voltage(&mut self) -> Option<f32> {
        match self.read_register(REG_VOLTAGE) {
            Ok(millivolts) => Some(millivolts as f32 / 1000.0),
            Err(e) => {
                crate::log_warn!("fuel gauge voltage read failed: {:?}", e);
                None
            }
        }
    }

    /// State of charge in percent, or `None` if the gauge did not answer
    pub fn state_of_charge(&mut self) -> Option<u16> {
        match self.read_register(REG_STATE_OF_CHARGE) {
            Ok(percent) => Some(percent),
            Err(e) => {
                crate::log_warn!("fuel gauge charge read failed: {:?}", e);
                None
            }
        }
    }

    /// Read both telemetry channels into one snapshot
    pub fn snapshot(&mut self) -> BatteryReading {
        BatteryReading {
            voltage: self.voltage(),
            state_of_charge: self.state_of_charge(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{I2cTransaction, MockI2c, MockTimer};
    use crate::platform::traits::TimerInterface;

    #[test]
    fn test_voltage_conversion_and_transaction_shape() {
        let mut i2c = MockI2c::new();
        i2c.set_read_data(&3692u16.to_le_bytes());
        let mut gauge = FuelGauge::new(i2c, MockTimer::new());

        assert_eq!(gauge.voltage(), Some(3.692));

        let transactions = gauge.i2c.transactions();
        assert_eq!(
            transactions,
            vec![
                I2cTransaction::Write {
                    addr: BQ27441_ADDR,
                    data: vec![REG_VOLTAGE]
                },
                I2cTransaction::Read {
                    addr: BQ27441_ADDR,
                    len: 2
                },
            ]
        );
        // the settle window between addressing and reading
        assert_eq!(gauge.timer.now_ms(), 10);
    }

    #[test]
    fn test_state_of_charge_register() {
        let mut i2c = MockI2c::new();
        i2c.set_read_data(&82u16.to_le_bytes());
        let mut gauge = FuelGauge::new(i2c, MockTimer::new());

        assert_eq!(gauge.state_of_charge(), Some(82));

        let transactions = gauge.i2c.transactions();
        assert_eq!(
            transactions[0],
            I2cTransaction::Write {
                addr: BQ27441_ADDR,
                data: vec![REG_STATE_OF_CHARGE]
            }
        );
    }

    #[test]
    fn test_unresponsive_gauge_reports_absent_values() {
        let mut i2c = MockI2c::new();
        i2c.set_nack(true);
        let mut gauge = FuelGauge::new(i2c, MockTimer::new());

        let reading = gauge.snapshot();
        assert_eq!(reading.voltage, None);
        assert_eq!(reading.state_of_charge, None);
    }

    #[test]
    fn test_snapshot_reads_voltage_then_charge() {
        let mut i2c = MockI2c::new();
        let mut data = 4100u16.to_le_bytes().to_vec();
        data.extend_from_slice(&95u16.to_le_bytes());
        i2c.set_read_data(&data);
        let mut gauge = FuelGauge::new(i2c, MockTimer::new());

        let reading = gauge.snapshot();
        assert_eq!(reading.voltage, Some(4.1));
        assert_eq!(reading.state_of_charge, Some(95));
    }
}
