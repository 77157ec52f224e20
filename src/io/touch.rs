use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, Operation},
};

use crate::error::TouchError;

/// Default I2C address of the CAP1188 with the ADDR pin floating.
pub const CAP1188_ADDR: u8 = 0x29;

const REG_MAIN: u8 = 0x00;
const REG_SENSOR_INPUT_STATUS: u8 = 0x03;
const REG_MULTI_TOUCH_CFG: u8 = 0x2A;
const REG_STANDBY_CFG: u8 = 0x41;
const REG_LED_LINK: u8 = 0x72;
const REG_LED_POLARITY: u8 = 0x73;
const REG_PRODUCT_ID: u8 = 0xFD;
const REG_MANUFACTURER_ID: u8 = 0xFE;
const REG_REVISION: u8 = 0xFF;

const MAIN_INT: u8 = 0x01;

const PRODUCT_ID: u8 = 0x50;
const MANUFACTURER_ID: u8 = 0x5D;
const REVISION: u8 = 0x83;

/// Driver for the CAP1188 8-channel capacitive touch controller.
pub struct Cap1188<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Cap1188<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, CAP1188_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Check the identity registers, then enable multi-touch, link the
    /// LEDs to their inputs and speed up the standby cycle.
    pub fn begin(&mut self) -> Result<(), TouchError<I2C::Error>> {
        let product = self.read_register(REG_PRODUCT_ID).map_err(TouchError::Bus)?;
        let manufacturer = self.read_register(REG_MANUFACTURER_ID).map_err(TouchError::Bus)?;
        let revision = self.read_register(REG_REVISION).map_err(TouchError::Bus)?;

        if (product, manufacturer, revision) != (PRODUCT_ID, MANUFACTURER_ID, REVISION) {
            return Err(TouchError::WrongDevice {
                product,
                manufacturer,
                revision,
            });
        }

        self.write_register(REG_MULTI_TOUCH_CFG, 0x00).map_err(TouchError::Bus)?;
        self.write_register(REG_LED_LINK, 0xFF).map_err(TouchError::Bus)?;
        self.write_register(REG_STANDBY_CFG, 0x30).map_err(TouchError::Bus)?;
        Ok(())
    }

    /// Retry [`begin`](Self::begin) up to `attempts` times, `retry_ms` apart.
    pub fn begin_with_retries(
        &mut self,
        delay: &mut impl DelayNs,
        attempts: u32,
        retry_ms: u32,
    ) -> Result<(), TouchError<I2C::Error>> {
        for attempt in 1..=attempts {
            match self.begin() {
                Ok(()) => {
                    log::info!("CAP1188 at 0x{:02X} ready after {attempt} attempt(s)", self.address);
                    return Ok(());
                }
                Err(err) => {
                    log::warn!("CAP1188 init attempt {attempt}/{attempts} failed: {err}");
                    if attempt < attempts {
                        delay.delay_ms(retry_ms);
                    }
                }
            }
        }
        log::error!("CAP1188 at 0x{:02X} never came up", self.address);
        Err(TouchError::InitTimeout { attempts })
    }

    /// Bitmask of touched inputs, bit `n` = input `n`. Clears the
    /// interrupt flag whenever something is touched so the status refreshes.
    pub fn touched(&mut self) -> Result<u8, I2C::Error> {
        let status = self.read_register(REG_SENSOR_INPUT_STATUS)?;
        if status != 0 {
            let main = self.read_register(REG_MAIN)?;
            self.write_register(REG_MAIN, main & !MAIN_INT)?;
        }
        Ok(status)
    }

    /// Inverted polarity drives the LEDs low when active.
    pub fn led_polarity(&mut self, inverted_mask: u8) -> Result<(), I2C::Error> {
        self.write_register(REG_LED_POLARITY, inverted_mask)
    }

    pub fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut buffer = [0u8];
        self.i2c.transaction(
            self.address,
            &mut [Operation::Write(&[register]), Operation::Read(&mut buffer)],
        )?;
        Ok(buffer[0])
    }

    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c
            .transaction(self.address, &mut [Operation::Write(&[register, value])])
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Expand a touch bitmask into one flag per input.
pub fn touch_mask_to_inputs<const M: usize>(mask: u8) -> [bool; M] {
    std::array::from_fn(|i| i < 8 && mask & (1 << i) != 0)
}
