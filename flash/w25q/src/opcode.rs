/// Longest instruction header: opcode, three address bytes and a dummy byte.
pub const OPCODE_MAX: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StatusRegisterId {
    Sr1,
    Sr2,
    Sr3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Opcode {
    /// Set write enable latch
    WriteEnable,
    /// Reset write enable latch
    WriteDisable,
    PowerDown,
    ReleasePowerDown,
    /// Manufacturer and device id, followed by three dummy bytes
    ManufacturerDeviceId,
    /// 64-bit unique id, followed by four dummy bytes
    UniqueId,
    ReadData(u32),
    /// Read at higher clock, followed by one dummy byte
    FastRead(u32),
    PageProgram(u32),
    SectorErase(u32),
    BlockErase32K(u32),
    BlockErase64K(u32),
    ChipErase,
    ReadStatus(StatusRegisterId),
    /// Write a status register, the encoded value follows the opcode
    WriteStatus(StatusRegisterId, u8),
    GlobalBlockLock,
    GlobalBlockUnlock,
    IndividualBlockLock(u32),
    IndividualBlockUnlock(u32),
    EnableReset,
    Reset,
}

impl Opcode {
    /// Write the complete instruction header into `buffer` and return its length.
    pub fn assign(&self, buffer: &mut [u8]) -> usize {
        buffer[0] = self.as_u8();

        match *self {
            Opcode::ReadData(address)
            | Opcode::PageProgram(address)
            | Opcode::SectorErase(address)
            | Opcode::BlockErase32K(address)
            | Opcode::BlockErase64K(address)
            | Opcode::IndividualBlockLock(address)
            | Opcode::IndividualBlockUnlock(address) => {
                assign_address(&mut buffer[1..4], address);
                4
            }
            Opcode::FastRead(address) => {
                assign_address(&mut buffer[1..4], address);
                buffer[4] = 0x00;
                5
            }
            Opcode::ManufacturerDeviceId => {
                buffer[1..4].fill(0x00);
                4
            }
            Opcode::UniqueId => {
                buffer[1..5].fill(0x00);
                5
            }
            Opcode::WriteStatus(_, value) => {
                buffer[1] = value;
                2
            }
            _ => 1,
        }
    }

    pub const fn as_u8(&self) -> u8 {
        match *self {
            Opcode::WriteEnable => 0x06,
            Opcode::WriteDisable => 0x04,
            Opcode::PowerDown => 0xB9,
            Opcode::ReleasePowerDown => 0xAB,
            Opcode::ManufacturerDeviceId => 0x90,
            Opcode::UniqueId => 0x4B,
            Opcode::ReadData(_) => 0x03,
            Opcode::FastRead(_) => 0x0B,
            Opcode::PageProgram(_) => 0x02,
            Opcode::SectorErase(_) => 0x20,
            Opcode::BlockErase32K(_) => 0x52,
            Opcode::BlockErase64K(_) => 0xD8,
            // 0x60 is accepted as well
            Opcode::ChipErase => 0xC7,
            Opcode::ReadStatus(StatusRegisterId::Sr1) => 0x05,
            Opcode::ReadStatus(StatusRegisterId::Sr2) => 0x35,
            Opcode::ReadStatus(StatusRegisterId::Sr3) => 0x15,
            Opcode::WriteStatus(StatusRegisterId::Sr1, _) => 0x01,
            Opcode::WriteStatus(StatusRegisterId::Sr2, _) => 0x31,
            Opcode::WriteStatus(StatusRegisterId::Sr3, _) => 0x11,
            Opcode::GlobalBlockLock => 0x7E,
            Opcode::GlobalBlockUnlock => 0x98,
            Opcode::IndividualBlockLock(_) => 0x36,
            Opcode::IndividualBlockUnlock(_) => 0x39,
            Opcode::EnableReset => 0x66,
            Opcode::Reset => 0x99,
        }
    }
}

/// 24-bit address, most significant byte first.
fn assign_address(buffer: &mut [u8], address: u32) {
    buffer[0] = (address >> 16) as u8;
    buffer[1] = (address >> 8) as u8;
    buffer[2] = address as u8;
}
