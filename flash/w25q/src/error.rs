use core::fmt;

/// Outcome of the page or erase unit loop inside a bulk operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChunkReport {
    /// Number of pages or erase units that were attempted.
    pub granules: u32,
    /// Number of those where the command or the following ready wait failed.
    pub failed: u32,
    /// The erase range was not aligned to the erase unit.
    pub misaligned: bool,
}

impl ChunkReport {
    pub const fn is_clean(&self) -> bool {
        self.failed == 0 && !self.misaligned
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The platform reported a failed transfer.
    Transport(E),
    /// The device stayed busy for the whole timeout.
    Timeout,
    /// Address or length is not a multiple of the required unit.
    Alignment,
    /// The identification codes are not in the device tables.
    UnrecognizedDevice { manufacturer: u8, device: u8 },
    /// Some pages or erase units failed, the rest were still attempted.
    Incomplete(ChunkReport),
    /// Clearing the write enable latch after a bulk operation failed.
    /// `report` tells how the operation itself went.
    WriteDisable { source: E, report: ChunkReport },
}

impl fmt::Display for ChunkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} units failed", self.failed, self.granules)?;
        if self.misaligned {
            write!(f, ", range misaligned")?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(source) => write!(f, "SPI transfer failed: {:?}", source),
            Self::Timeout => write!(f, "flash stayed busy until timeout"),
            Self::Alignment => write!(f, "invalid alignment"),
            Self::UnrecognizedDevice {
                manufacturer,
                device,
            } => write!(
                f,
                "unrecognized device: manufacturer 0x{:02X}, device 0x{:02X}",
                manufacturer, device
            ),
            Self::Incomplete(report) => write!(f, "operation incomplete: {}", report),
            Self::WriteDisable { source, report } => write!(
                f,
                "write disable failed: {:?} (operation: {})",
                source, report
            ),
        }
    }
}
