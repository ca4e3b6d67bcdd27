use crate::{
    config::{
        Geometry, ENABLE_RESET_SETTLE_US, POWER_DOWN_SETTLE_US, RESET_SETTLE_US,
    },
    ident::UniqueId,
    opcode::{Opcode, StatusRegisterId, OPCODE_MAX},
    status::{StatusRegister1, StatusRegister2, StatusRegister3},
    traits, Error,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlockSize {
    Kib32,
    Kib64,
}

/// SPI NOR flash driver.
///
/// Every command is one transaction: chip select is asserted, a single
/// transport call is made and chip select is released again. Nothing is
/// retried here, the bulk operations in this crate build on top.
///
/// To borrow a platform instead of handing it over, create the driver with
/// `Driver::new(&mut platform)` and drop it when done.
pub struct Driver<Platform: traits::Platform> {
    pub(crate) platform: Platform,
    pub(crate) geometry: Geometry,
}

impl<Platform: traits::Platform> Driver<Platform> {
    pub fn new(platform: Platform) -> Self {
        Self::with_geometry(platform, Geometry::W25Q)
    }

    pub const fn with_geometry(platform: Platform, geometry: Geometry) -> Self {
        Self { platform, geometry }
    }

    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn platform_mut(&mut self) -> &mut Platform {
        &mut self.platform
    }

    /// Give back the platform.
    pub fn release(self) -> Platform {
        self.platform
    }

    /// Set or reset the write enable latch.
    pub fn set_write_enable(&mut self, enable: bool) -> Result<(), Error<Platform::Error>> {
        self.command(if enable {
            Opcode::WriteEnable
        } else {
            Opcode::WriteDisable
        })
    }

    /// Enter or leave deep power-down.
    pub fn set_power_down(&mut self, power_down: bool) -> Result<(), Error<Platform::Error>> {
        let result = self.command(if power_down {
            Opcode::PowerDown
        } else {
            Opcode::ReleasePowerDown
        });
        self.platform.delay_us(POWER_DOWN_SETTLE_US);
        result
    }

    /// Read the (manufacturer, device) id pair.
    pub fn read_manufacturer_device_id(&mut self) -> Result<(u8, u8), Error<Platform::Error>> {
        let mut response = [0; 2];
        self.command_read(Opcode::ManufacturerDeviceId, &mut response)?;
        Ok((response[0], response[1]))
    }

    pub fn read_unique_id(&mut self) -> Result<UniqueId, Error<Platform::Error>> {
        let mut response = [0; 8];
        self.command_read(Opcode::UniqueId, &mut response)?;
        Ok(UniqueId(response))
    }

    /// Read `buffer.len()` bytes starting at `address`.
    pub fn read_data(
        &mut self,
        address: u32,
        buffer: &mut [u8],
    ) -> Result<(), Error<Platform::Error>> {
        self.command_read(Opcode::ReadData(address), buffer)
    }

    /// Read `buffer.len()` bytes starting at `address` using the fast read instruction.
    pub fn fast_read(
        &mut self,
        address: u32,
        buffer: &mut [u8],
    ) -> Result<(), Error<Platform::Error>> {
        self.command_read(Opcode::FastRead(address), buffer)
    }

    /// Program up to one page. `data` must not cross a page boundary,
    /// the device wraps around within the page if it does.
    pub fn page_program(&mut self, address: u32, data: &[u8]) -> Result<(), Error<Platform::Error>> {
        self.command_write(Opcode::PageProgram(address), data)
    }

    pub fn sector_erase(&mut self, address: u32) -> Result<(), Error<Platform::Error>> {
        self.command(Opcode::SectorErase(address))
    }

    pub fn block_erase(
        &mut self,
        address: u32,
        size: BlockSize,
    ) -> Result<(), Error<Platform::Error>> {
        self.command(match size {
            BlockSize::Kib32 => Opcode::BlockErase32K(address),
            BlockSize::Kib64 => Opcode::BlockErase64K(address),
        })
    }

    pub fn chip_erase(&mut self) -> Result<(), Error<Platform::Error>> {
        self.command(Opcode::ChipErase)
    }

    pub fn read_status_register1(&mut self) -> Result<StatusRegister1, Error<Platform::Error>> {
        let bits = self.read_status(StatusRegisterId::Sr1)?;
        Ok(StatusRegister1::from_bits(bits))
    }

    pub fn write_status_register1(
        &mut self,
        sr: StatusRegister1,
    ) -> Result<(), Error<Platform::Error>> {
        self.command(Opcode::WriteStatus(StatusRegisterId::Sr1, sr.bits()))
    }

    pub fn read_status_register2(&mut self) -> Result<StatusRegister2, Error<Platform::Error>> {
        let bits = self.read_status(StatusRegisterId::Sr2)?;
        Ok(StatusRegister2::from_bits(bits))
    }

    pub fn write_status_register2(
        &mut self,
        sr: StatusRegister2,
    ) -> Result<(), Error<Platform::Error>> {
        self.command(Opcode::WriteStatus(StatusRegisterId::Sr2, sr.bits()))
    }

    pub fn read_status_register3(&mut self) -> Result<StatusRegister3, Error<Platform::Error>> {
        let bits = self.read_status(StatusRegisterId::Sr3)?;
        Ok(StatusRegister3::from_bits(bits))
    }

    pub fn write_status_register3(
        &mut self,
        sr: StatusRegister3,
    ) -> Result<(), Error<Platform::Error>> {
        self.command(Opcode::WriteStatus(StatusRegisterId::Sr3, sr.bits()))
    }

    pub fn global_block_lock(&mut self) -> Result<(), Error<Platform::Error>> {
        self.command(Opcode::GlobalBlockLock)
    }

    pub fn global_block_unlock(&mut self) -> Result<(), Error<Platform::Error>> {
        self.command(Opcode::GlobalBlockUnlock)
    }

    /// Lock the sector or block containing `address`.
    /// Only effective when SR3 selects individual block protection.
    pub fn individual_block_lock(&mut self, address: u32) -> Result<(), Error<Platform::Error>> {
        self.command(Opcode::IndividualBlockLock(address))
    }

    pub fn individual_block_unlock(
        &mut self,
        address: u32,
    ) -> Result<(), Error<Platform::Error>> {
        self.command(Opcode::IndividualBlockUnlock(address))
    }

    /// Software reset. Both instructions are always sent.
    pub fn reset(&mut self) -> Result<(), Error<Platform::Error>> {
        let enable = self.command(Opcode::EnableReset);
        self.platform.delay_us(ENABLE_RESET_SETTLE_US);

        let reset = self.command(Opcode::Reset);
        self.platform.delay_us(RESET_SETTLE_US);

        enable.and(reset)
    }

    fn read_status(&mut self, register: StatusRegisterId) -> Result<u8, Error<Platform::Error>> {
        let mut response = [0; 1];
        self.command_read(Opcode::ReadStatus(register), &mut response)?;
        Ok(response[0])
    }

    fn command(&mut self, opcode: Opcode) -> Result<(), Error<Platform::Error>> {
        let mut tx_buffer = [0; OPCODE_MAX];
        let len = opcode.assign(&mut tx_buffer);

        self.platform.chip_select(true);
        let result = self.platform.write(&tx_buffer[..len]);
        self.platform.chip_select(false);

        result.map_err(Error::Transport)
    }

    fn command_read(
        &mut self,
        opcode: Opcode,
        response: &mut [u8],
    ) -> Result<(), Error<Platform::Error>> {
        let mut tx_buffer = [0; OPCODE_MAX];
        let len = opcode.assign(&mut tx_buffer);

        self.platform.chip_select(true);
        let result = self.platform.write_then_read(&tx_buffer[..len], response);
        self.platform.chip_select(false);

        result.map_err(Error::Transport)
    }

    fn command_write(&mut self, opcode: Opcode, payload: &[u8]) -> Result<(), Error<Platform::Error>> {
        let mut tx_buffer = [0; OPCODE_MAX];
        let len = opcode.assign(&mut tx_buffer);

        self.platform.chip_select(true);
        let result = self.platform.write_then_write(&tx_buffer[..len], payload);
        self.platform.chip_select(false);

        result.map_err(Error::Transport)
    }
}
