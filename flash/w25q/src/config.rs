/// Maximum SPI clock for the standard (non fast read) instructions.
pub const CLOCK_FREQ_MAX_HZ: u32 = 50_000_000;

pub const PAGE_PROGRAM_TIME_MS_MAX: u32 = 3;
pub const SECTOR_ERASE_TIME_MS_MAX: u32 = 400;
pub const BLOCK32K_ERASE_TIME_MS_MAX: u32 = 1_600;
pub const BLOCK64K_ERASE_TIME_MS_MAX: u32 = 2_000;
pub const CHIP_ERASE_TIME_MS_MAX: u32 = 50_000;

/// Interval between two busy polls. A timeout of `n` ms allows `2 * n` polls.
pub(crate) const POLL_INTERVAL_US: u32 = 500;
pub(crate) const POWER_DOWN_SETTLE_US: u32 = 3;
pub(crate) const ENABLE_RESET_SETTLE_US: u32 = 10;
pub(crate) const RESET_SETTLE_US: u32 = 30;

/// Program and erase granularity of a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    page_size: u32,
    sector_size: u32,
    block_size: u32,
}

impl Geometry {
    /// 256 byte pages, 4 KiB sectors and 64 KiB blocks.
    pub const W25Q: Geometry = Geometry {
        page_size: 256,
        sector_size: 4 * 1024,
        block_size: 64 * 1024,
    };

    /// Returns `None` unless all sizes are powers of two and
    /// `page_size < sector_size < block_size`.
    pub const fn new(page_size: u32, sector_size: u32, block_size: u32) -> Option<Self> {
        if !page_size.is_power_of_two()
            || !sector_size.is_power_of_two()
            || !block_size.is_power_of_two()
        {
            return None;
        }

        if page_size >= sector_size || sector_size >= block_size {
            return None;
        }

        Some(Self {
            page_size,
            sector_size,
            block_size,
        })
    }

    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    pub const fn sector_size(&self) -> u32 {
        self.sector_size
    }

    pub const fn block_size(&self) -> u32 {
        self.block_size
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::W25Q
    }
}
