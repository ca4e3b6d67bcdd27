use crate::{config::POLL_INTERVAL_US, traits, BlockSize, ChunkReport, Driver, Error};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum EraseUnit {
    Sector,
    Block,
}

impl ChunkReport {
    fn record(&mut self, ok: bool) {
        self.granules += 1;
        if !ok {
            self.failed += 1;
        }
    }
}

impl<Platform: traits::Platform> Driver<Platform> {
    /// Poll the busy flag every 500us until it clears.
    ///
    /// At most `2 * timeout_ms` polls are made. A failing status read ends
    /// the wait immediately.
    pub fn wait_until_ready(&mut self, timeout_ms: u32) -> Result<(), Error<Platform::Error>> {
        let polls = timeout_ms.saturating_mul(2);
        for poll in 0..polls {
            let sr = self.read_status_register1()?;
            if !sr.busy() {
                trace!("ready after {} polls", poll + 1);
                return Ok(());
            }

            self.platform.delay_us(POLL_INTERVAL_US);
        }

        warn!("flash still busy after {} ms", timeout_ms);
        Err(Error::Timeout)
    }

    /// Read `buffer.len()` bytes from `address` once the device is ready.
    pub fn read(
        &mut self,
        address: u32,
        buffer: &mut [u8],
        timeout_ms: u32,
    ) -> Result<(), Error<Platform::Error>> {
        debug!("reading {} bytes at {:#x}", buffer.len(), address);

        self.wait_until_ready(timeout_ms)?;
        self.fast_read(address, buffer)
    }

    /// Program `data` page by page, starting at the page aligned `address`.
    ///
    /// A failing page does not stop the remaining pages from being
    /// programmed, the failures are counted in the returned report.
    /// `timeout_ms` applies to each ready wait separately.
    pub fn write(
        &mut self,
        address: u32,
        data: &[u8],
        timeout_ms: u32,
    ) -> Result<(), Error<Platform::Error>> {
        let page_size = self.geometry.page_size();
        if address % page_size != 0 {
            warn!("write address {:#x} is not page aligned", address);
            return Err(Error::Alignment);
        }

        debug!("writing {} bytes at {:#x}", data.len(), address);

        self.wait_until_ready(timeout_ms)?;
        self.set_write_enable(true)?;

        let mut report = ChunkReport::default();
        let mut page_address = address;
        for page in data.chunks(page_size as usize) {
            let programmed = self.page_program(page_address, page).is_ok();
            let ready = self.wait_until_ready(timeout_ms).is_ok();
            if !(programmed && ready) {
                warn!("page program at {:#x} failed", page_address);
            }
            report.record(programmed && ready);

            page_address = page_address.wrapping_add(page.len() as u32);
        }

        self.finish(report)
    }

    /// Erase `length` bytes from `address`.
    ///
    /// Ranges shorter than a block are erased sector by sector, longer ones
    /// block by block using the 64 KiB block erase. Address and length must
    /// be multiples of the chosen unit. A misaligned range is still erased
    /// unit by unit but reported as failed.
    pub fn erase(
        &mut self,
        address: u32,
        length: u32,
        timeout_ms: u32,
    ) -> Result<(), Error<Platform::Error>> {
        self.wait_until_ready(timeout_ms)?;
        self.set_write_enable(true)?;

        let (unit, unit_size) = if length < self.geometry.block_size() {
            (EraseUnit::Sector, self.geometry.sector_size())
        } else {
            (EraseUnit::Block, self.geometry.block_size())
        };

        debug!(
            "erasing {} bytes at {:#x} by {:?}",
            length, address, unit
        );

        let mut report = ChunkReport {
            misaligned: address % unit_size != 0 || length % unit_size != 0,
            ..ChunkReport::default()
        };
        if report.misaligned {
            warn!(
                "erase range {:#x}+{} is not {:?} aligned",
                address, length, unit
            );
        }

        let end = address as u64 + length as u64;
        let mut unit_address = address as u64;
        while unit_address < end {
            let erase_address = unit_address as u32;
            let erased = match unit {
                EraseUnit::Sector => self.sector_erase(erase_address),
                EraseUnit::Block => self.block_erase(erase_address, BlockSize::Kib64),
            }
            .is_ok();
            let ready = self.wait_until_ready(timeout_ms).is_ok();
            if !(erased && ready) {
                warn!("{:?} erase at {:#x} failed", unit, erase_address);
            }
            report.record(erased && ready);

            unit_address += unit_size as u64;
        }

        self.finish(report)
    }

    /// Erase the whole device.
    /// See [`CHIP_ERASE_TIME_MS_MAX`](crate::config::CHIP_ERASE_TIME_MS_MAX) for a suitable timeout.
    pub fn erase_chip(&mut self, timeout_ms: u32) -> Result<(), Error<Platform::Error>> {
        debug!("erasing chip");

        self.wait_until_ready(timeout_ms)?;
        self.set_write_enable(true)?;

        let mut report = ChunkReport::default();
        let erased = self.chip_erase().is_ok();
        let ready = self.wait_until_ready(timeout_ms).is_ok();
        report.record(erased && ready);

        self.finish(report)
    }

    /// Clear the write enable latch and turn the loop outcome into the result.
    fn finish(&mut self, report: ChunkReport) -> Result<(), Error<Platform::Error>> {
        match self.set_write_enable(false) {
            Err(Error::Transport(source)) => Err(Error::WriteDisable { source, report }),
            Err(error) => Err(error),
            Ok(()) if report.is_clean() => Ok(()),
            Ok(()) => Err(Error::Incomplete(report)),
        }
    }
}
