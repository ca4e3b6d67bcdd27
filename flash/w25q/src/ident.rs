//! Known manufacturer and device codes.
//!
//! Supporting another part only requires a new table entry.

use core::fmt::{self, Write};

use crate::{traits, Driver, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Manufacturer {
    pub id: u8,
    pub name: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Device {
    pub id: u8,
    pub name: &'static str,
    pub capacity_mib: u32,
}

pub static MANUFACTURERS: &[Manufacturer] = &[
    Manufacturer {
        id: 0x50,
        name: "ZBIT",
    },
    Manufacturer {
        id: 0xEF,
        name: "Winbond",
    },
];

pub static DEVICES: &[Device] = &[
    Device {
        id: 0x13,
        name: "Q80",
        capacity_mib: 1,
    },
    Device {
        id: 0x14,
        name: "Q16",
        capacity_mib: 2,
    },
    Device {
        id: 0x15,
        name: "Q32",
        capacity_mib: 4,
    },
    Device {
        id: 0x16,
        name: "Q64",
        capacity_mib: 8,
    },
    Device {
        id: 0x17,
        name: "Q128",
        capacity_mib: 16,
    },
];

impl Manufacturer {
    pub fn lookup(id: u8) -> Option<&'static Manufacturer> {
        MANUFACTURERS.iter().find(|m| m.id == id)
    }
}

impl Device {
    pub fn lookup(id: u8) -> Option<&'static Device> {
        DEVICES.iter().find(|d| d.id == id)
    }

    /// Capacity in bytes.
    pub const fn capacity(&self) -> u32 {
        self.capacity_mib * 1024 * 1024
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} MB)", self.name, self.capacity_mib)
    }
}

/// Length of `AA:BB:CC:DD:EE:FF:00:11`.
pub const UNIQUE_ID_TEXT_LEN: usize = 23;

/// The factory programmed 64-bit unique id, as sent by the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UniqueId(pub [u8; 8]);

impl UniqueId {
    pub const fn as_u64(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }

    pub fn to_text(&self) -> Result<heapless::String<UNIQUE_ID_TEXT_LEN>, fmt::Error> {
        let mut text = heapless::String::new();
        write!(text, "{}", self)?;
        Ok(text)
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(':')?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identification {
    pub manufacturer: &'static Manufacturer,
    pub device: &'static Device,
    pub unique_id: Option<UniqueId>,
}

impl fmt::Display for Identification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.manufacturer.name, self.device)?;
        if let Some(unique_id) = &self.unique_id {
            write!(f, " [{}]", unique_id)?;
        }
        Ok(())
    }
}

impl<Platform: traits::Platform> Driver<Platform> {
    /// Identify the device by name.
    ///
    /// Fails with [`Error::UnrecognizedDevice`] before the unique id is read
    /// if either code is unknown.
    pub fn read_ids_as_text(
        &mut self,
        with_unique_id: bool,
    ) -> Result<Identification, Error<Platform::Error>> {
        let (manufacturer_id, device_id) = self.read_manufacturer_device_id()?;

        let unrecognized = || Error::UnrecognizedDevice {
            manufacturer: manufacturer_id,
            device: device_id,
        };
        let manufacturer = Manufacturer::lookup(manufacturer_id).ok_or_else(unrecognized)?;
        let device = Device::lookup(device_id).ok_or_else(unrecognized)?;

        let unique_id = if with_unique_id {
            Some(self.read_unique_id()?)
        } else {
            None
        };

        Ok(Identification {
            manufacturer,
            device,
            unique_id,
        })
    }
}
