use core::fmt::Debug;

#[cfg(test)]
use mockall::automock;

/// The transport a [`Driver`](crate::Driver) talks to the flash through.
///
/// The bus must run in SPI mode 0 or 3, MSB first. Each transport call is
/// issued between a `chip_select(true)` and a `chip_select(false)`.
#[cfg_attr(test, automock(type Error = i32;))]
pub trait Platform {
    type Error: Debug;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;
    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `header` and then `payload` without releasing chip select.
    fn write_then_write(&mut self, header: &[u8], payload: &[u8]) -> Result<(), Self::Error>;

    /// Write `header` and then clock in `response` without releasing chip select.
    fn write_then_read(&mut self, header: &[u8], response: &mut [u8])
        -> Result<(), Self::Error>;

    fn chip_select(&mut self, asserted: bool);
    fn delay_us(&mut self, us: u32);
}

impl<P: Platform + ?Sized> Platform for &mut P {
    type Error = P::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(data)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(buffer)
    }

    fn write_then_write(&mut self, header: &[u8], payload: &[u8]) -> Result<(), Self::Error> {
        (**self).write_then_write(header, payload)
    }

    fn write_then_read(
        &mut self,
        header: &[u8],
        response: &mut [u8],
    ) -> Result<(), Self::Error> {
        (**self).write_then_read(header, response)
    }

    fn chip_select(&mut self, asserted: bool) {
        (**self).chip_select(asserted)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}
