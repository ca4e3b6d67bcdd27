//! [`Platform`] on top of the blocking `embedded-hal` traits.

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use crate::traits::Platform;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError<SpiError, PinError> {
    Spi(SpiError),
    /// Driving the chip select pin failed during the previous transaction.
    ChipSelect(PinError),
}

/// An SPI bus, an active low chip select pin and a delay source.
///
/// The bus must not be shared with other devices while a [`Driver`](crate::Driver)
/// uses it. The clock should not exceed
/// [`CLOCK_FREQ_MAX_HZ`](crate::config::CLOCK_FREQ_MAX_HZ).
pub struct HalPlatform<Spi, Cs, Delay>
where
    Spi: SpiBus,
    Cs: OutputPin,
    Delay: DelayNs,
{
    spi: Spi,
    cs: Cs,
    delay: Delay,
    cs_error: Option<Cs::Error>,
}

impl<Spi, Cs, Delay> HalPlatform<Spi, Cs, Delay>
where
    Spi: SpiBus,
    Cs: OutputPin,
    Delay: DelayNs,
{
    pub const fn new(spi: Spi, cs: Cs, delay: Delay) -> Self {
        Self {
            spi,
            cs,
            delay,
            cs_error: None,
        }
    }

    pub fn release(self) -> (Spi, Cs, Delay) {
        (self.spi, self.cs, self.delay)
    }

    /// Report a latched chip select failure, or run `transfer` and flush the bus.
    fn transfer<F>(&mut self, transfer: F) -> Result<(), HalError<Spi::Error, Cs::Error>>
    where
        F: FnOnce(&mut Spi) -> Result<(), Spi::Error>,
    {
        if let Some(error) = self.cs_error.take() {
            return Err(HalError::ChipSelect(error));
        }

        transfer(&mut self.spi).map_err(HalError::Spi)?;
        self.spi.flush().map_err(HalError::Spi)
    }
}

impl<Spi, Cs, Delay> Platform for HalPlatform<Spi, Cs, Delay>
where
    Spi: SpiBus,
    Cs: OutputPin,
    Delay: DelayNs,
{
    type Error = HalError<Spi::Error, Cs::Error>;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.transfer(|spi| spi.write(data))
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.transfer(|spi| spi.read(buffer))
    }

    fn write_then_write(&mut self, header: &[u8], payload: &[u8]) -> Result<(), Self::Error> {
        self.transfer(|spi| {
            spi.write(header)?;
            spi.write(payload)
        })
    }

    fn write_then_read(
        &mut self,
        header: &[u8],
        response: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.transfer(|spi| {
            spi.write(header)?;
            spi.read(response)
        })
    }

    fn chip_select(&mut self, asserted: bool) {
        let result = if asserted {
            self.cs.set_low()
        } else {
            self.cs.set_high()
        };

        if let Err(error) = result {
            self.cs_error.get_or_insert(error);
        }
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
