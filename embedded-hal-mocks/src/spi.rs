use embedded_hal::spi;
use mockall::{mock, Sequence};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiError;

impl spi::Error for SpiError {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

mock! {
    #[derive(Debug)]
    pub SpiBus {}

    impl spi::ErrorType for SpiBus {
        type Error = SpiError;
    }

    impl spi::SpiBus for SpiBus {
        fn read(&mut self, words: &mut [u8]) -> Result<(), SpiError>;
        fn write(&mut self, words: &[u8]) -> Result<(), SpiError>;
        fn transfer<'a>(&mut self, read: &mut [u8], write: &'a [u8]) -> Result<(), SpiError>;
        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), SpiError>;
        fn flush(&mut self) -> Result<(), SpiError>;
    }
}

impl MockSpiBus {
    /// Expect a single `write` of exactly `expected`.
    pub fn expect_write_bytes(&mut self, seq: &mut Sequence, expected: &'static [u8]) {
        self.expect_write()
            .withf(move |words| words == expected)
            .times(1)
            .in_sequence(seq)
            .return_const(Ok(()));
    }

    /// Expect a single `read` of `response.len()` bytes and answer with `response`.
    pub fn expect_read_bytes(&mut self, seq: &mut Sequence, response: &'static [u8]) {
        self.expect_read()
            .withf(move |words| words.len() == response.len())
            .times(1)
            .in_sequence(seq)
            .returning(move |words| {
                words.copy_from_slice(response);
                Ok(())
            });
    }
}
