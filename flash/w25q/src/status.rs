//! The three device status registers.
//!
//! Each register is a plain byte with accessors for its fields. Decoding
//! with `from_bits` drops the reserved bits, so `bits()` always encodes them
//! as zero.

use bitfield::bitfield;

bitfield! {
    /// Status register 1 (SR1).
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct StatusRegister1(u8);
    impl Debug;
    /// Status register protect 0
    pub srp0, set_srp0: 7;
    /// Sector/block protect
    pub sec, set_sec: 6;
    /// Top/bottom protect
    pub tb, set_tb: 5;
    /// Block protect bits BP0..BP2
    pub u8, bp, set_bp: 4, 2;
    /// Write enable latch, read only
    pub wel, set_wel: 1;
    /// Embedded operation in progress, read only
    pub busy, set_busy: 0;
}

bitfield! {
    /// Status register 2 (SR2).
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct StatusRegister2(u8);
    impl Debug;
    /// Erase/program suspend status, read only
    pub sus, set_sus: 7;
    /// Complement protect
    pub cmp, set_cmp: 6;
    /// Security register lock bits LB1..LB3, one time programmable
    pub u8, lb, set_lb: 5, 3;
    /// Quad enable.
    /// Must stay clear when WP# or HOLD#/RESET# are tied to a supply rail.
    pub qe, set_qe: 1;
    /// Status register protect 1
    pub srp1, set_srp1: 0;
}

bitfield! {
    /// Status register 3 (SR3).
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct StatusRegister3(u8);
    impl Debug;
    /// HOLD# or RESET# pin function
    pub hold_rst, set_hold_rst: 7;
    /// Output drive strength
    pub u8, from into DriveStrength, drv, set_drv: 6, 5;
    /// High frequency mode
    pub hfm, set_hfm: 4;
    /// Write protect selection
    pub wps, set_wps: 2;
}

impl StatusRegister1 {
    pub const MASK: u8 = 0b1111_1111;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub fn protect_unit(&self) -> ProtectUnit {
        if self.sec() {
            ProtectUnit::Sectors4K
        } else {
            ProtectUnit::Blocks64K
        }
    }

    pub fn set_protect_unit(&mut self, unit: ProtectUnit) {
        self.set_sec(unit == ProtectUnit::Sectors4K);
    }

    pub fn protect_from(&self) -> ProtectFrom {
        if self.tb() {
            ProtectFrom::Bottom
        } else {
            ProtectFrom::Top
        }
    }

    pub fn set_protect_from(&mut self, from: ProtectFrom) {
        self.set_tb(from == ProtectFrom::Bottom);
    }
}

impl StatusRegister2 {
    pub const MASK: u8 = 0b1111_1011;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }
}

impl StatusRegister3 {
    pub const MASK: u8 = 0b1111_0100;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub fn hold_reset_function(&self) -> HoldResetFunction {
        if self.hold_rst() {
            HoldResetFunction::Reset
        } else {
            HoldResetFunction::Hold
        }
    }

    pub fn set_hold_reset_function(&mut self, function: HoldResetFunction) {
        self.set_hold_rst(function == HoldResetFunction::Reset);
    }

    pub fn write_protect_scheme(&self) -> WriteProtectScheme {
        if self.wps() {
            WriteProtectScheme::IndividualBlocks
        } else {
            WriteProtectScheme::StatusBits
        }
    }

    pub fn set_write_protect_scheme(&mut self, scheme: WriteProtectScheme) {
        self.set_wps(scheme == WriteProtectScheme::IndividualBlocks);
    }
}

/// Granularity the BP bits protect (SEC).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtectUnit {
    Blocks64K,
    Sectors4K,
}

/// End of the array the BP bits protect from (TB).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtectFrom {
    Top,
    Bottom,
}

/// Function of the HOLD#/RESET# pin (HOLD/RST).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldResetFunction {
    Hold,
    Reset,
}

/// Which protection scheme is in effect (WPS).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteProtectScheme {
    /// CMP, SEC, TB and BP bits
    StatusBits,
    /// Individual block locks
    IndividualBlocks,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveStrength {
    Percent100 = 0b00,
    Percent75 = 0b01,
    Percent50 = 0b10,
    Percent25 = 0b11,
}

impl From<u8> for DriveStrength {
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0b00 => DriveStrength::Percent100,
            0b01 => DriveStrength::Percent75,
            0b10 => DriveStrength::Percent50,
            _ => DriveStrength::Percent25,
        }
    }
}

impl From<DriveStrength> for u8 {
    fn from(value: DriveStrength) -> Self {
        value as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sr1_field_positions() {
        // Given
        let sr = StatusRegister1::from_bits(0b1_0_1_011_1_0);

        // Then
        assert!(sr.srp0());
        assert!(!sr.sec());
        assert!(sr.tb());
        assert_eq!(0b011, sr.bp());
        assert!(sr.wel());
        assert!(!sr.busy());
        assert_eq!(ProtectFrom::Bottom, sr.protect_from());
        assert_eq!(ProtectUnit::Blocks64K, sr.protect_unit());
    }

    #[test]
    fn sr1_encode() {
        // Given
        let mut sr = StatusRegister1::default();

        // When
        sr.set_bp(0b101);
        sr.set_protect_unit(ProtectUnit::Sectors4K);
        sr.set_srp0(true);

        // Then
        assert_eq!(0b1100_0000 | 0b101 << 2, sr.bits());
    }

    #[test]
    fn sr2_field_positions() {
        // Given
        let sr = StatusRegister2::from_bits(0b0_1_101_0_1_0);

        // Then
        assert!(!sr.sus());
        assert!(sr.cmp());
        assert_eq!(0b101, sr.lb());
        assert!(sr.qe());
        assert!(!sr.srp1());
    }

    #[test]
    fn sr2_reserved_bit_is_dropped() {
        assert_eq!(0x00, StatusRegister2::from_bits(0b0000_0100).bits());
        assert_eq!(0xFB, StatusRegister2::from_bits(0xFF).bits());
    }

    #[test]
    fn sr3_field_positions() {
        // Given
        let sr = StatusRegister3::from_bits(0b1_10_1_0_1_00);

        // Then
        assert_eq!(HoldResetFunction::Reset, sr.hold_reset_function());
        assert_eq!(DriveStrength::Percent50, sr.drv());
        assert!(sr.hfm());
        assert_eq!(WriteProtectScheme::IndividualBlocks, sr.write_protect_scheme());
    }

    #[test]
    fn sr3_reserved_bits_are_dropped() {
        assert_eq!(0x00, StatusRegister3::from_bits(0b0000_1011).bits());
        assert_eq!(0xF4, StatusRegister3::from_bits(0xFF).bits());
    }

    #[test]
    fn sr3_encode_drive_strength() {
        // Given
        let mut sr = StatusRegister3::default();

        // When
        sr.set_drv(DriveStrength::Percent25);

        // Then
        assert_eq!(0b0110_0000, sr.bits());
        assert_eq!(DriveStrength::Percent25, sr.drv());
    }

    #[test]
    fn decode_encode_is_identity_on_defined_bits() {
        for bits in 0..=u8::MAX {
            assert_eq!(bits, StatusRegister1::from_bits(bits).bits());
            assert_eq!(bits & 0xFB, StatusRegister2::from_bits(bits).bits());
            assert_eq!(bits & 0xF4, StatusRegister3::from_bits(bits).bits());
        }
    }

    #[test]
    fn fields_survive_encode_and_decode() {
        // Given
        let mut sr3 = StatusRegister3::default();
        sr3.set_hold_reset_function(HoldResetFunction::Reset);
        sr3.set_drv(DriveStrength::Percent75);
        sr3.set_write_protect_scheme(WriteProtectScheme::IndividualBlocks);

        // When
        let decoded = StatusRegister3::from_bits(sr3.bits());

        // Then
        assert_eq!(sr3, decoded);
        assert_eq!(HoldResetFunction::Reset, decoded.hold_reset_function());
        assert_eq!(DriveStrength::Percent75, decoded.drv());
        assert!(!decoded.hfm());
        assert_eq!(WriteProtectScheme::IndividualBlocks, decoded.write_protect_scheme());
    }
}
