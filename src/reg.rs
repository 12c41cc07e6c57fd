#![allow(non_upper_case_globals)]

use cast::{f32, i16, u16};
#[cfg(feature = "defmt-03")]
use defmt::Format;
use num_derive::FromPrimitive;
use num_traits::float::FloatCore;

/// I2C slave address with `SA0` low
pub const I2C_SAD: u8 = 0b001_1100;

/// `SA0` bit of the slave address
pub const SA0: u8 = 0b0000_0001;

/// Register mapping
#[allow(dead_code)]
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(Format))]
pub enum Register {
    /// Data status
    STATUS = 0x00,
    /// X-axis sample, bits 11..4
    OUT_X_MSB = 0x01,
    /// X-axis sample, bits 3..0 left-justified
    OUT_X_LSB = 0x02,
    /// Y-axis sample, bits 11..4
    OUT_Y_MSB = 0x03,
    /// Y-axis sample, bits 3..0 left-justified
    OUT_Y_LSB = 0x04,
    /// Z-axis sample, bits 11..4
    OUT_Z_MSB = 0x05,
    /// Z-axis sample, bits 3..0 left-justified
    OUT_Z_LSB = 0x06,
    /// System mode
    SYSMOD = 0x0B,
    /// Device identification
    WHO_AM_I = 0x0D,
    /// Full-scale and high-pass output configuration
    XYZ_DATA_CFG = 0x0E,
    /// Data rates, fast-read, active
    CTRL_REG1 = 0x2A,
    /// Oversampling modes, auto-sleep
    CTRL_REG2 = 0x2B,
}

impl Register {
    /// Get register address
    pub fn addr(self) -> u8 {
        self as u8
    }
}

// === STATUS (00h) ===

pub const ZYXOW: u8 = 0b1000_0000;
pub const ZOW: u8 = 0b0100_0000;
pub const YOW: u8 = 0b0010_0000;
pub const XOW: u8 = 0b0001_0000;
pub const ZYXDR: u8 = 0b0000_1000;
pub const ZDR: u8 = 0b0000_0100;
pub const YDR: u8 = 0b0000_0010;
pub const XDR: u8 = 0b0000_0001;

// === SYSMOD (0Bh) ===

pub const SYSMOD_MASK: u8 = 0b0000_0011;

/// Operating mode reported by the device
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(Format))]
pub enum SysMode {
    /// Standby, configuration registers are writable
    Standby = 0b00,
    /// Wake, sampling at the normal data rate
    Wake = 0b01,
    /// Sleep, sampling at the auto-sleep data rate
    Sleep = 0b10,
}

// === WHO_AM_I (0Dh) ===

/// WHO_AM_I device identification register
pub const DEVICE_ID: u8 = 0x2A;

// === XYZ_DATA_CFG (0Eh) ===

pub const HPF_OUT: u8 = 0b0001_0000;

pub const FS_MASK: u8 = 0b0000_0011;

/// Full-scale selection
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(Format))]
pub enum FullScale {
    /// ±2 g
    G2 = 0b00,
    /// ±4 g
    G4 = 0b01,
    /// ±8 g
    G8 = 0b10,
}

impl Default for FullScale {
    fn default() -> Self {
        Self::G8
    }
}

impl FullScale {
    /// Full-scale range in g
    pub fn g(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
        }
    }

    /// Full-scale from a range in g (2, 4 or 8)
    pub fn from_g(g: u8) -> Option<Self> {
        match g {
            2 => Some(Self::G2),
            4 => Some(Self::G4),
            8 => Some(Self::G8),
            _ => None,
        }
    }

    /// Counts per g for the given read resolution
    pub(crate) fn factor(self, fast_read: bool) -> f32 {
        let counts: f32 = if fast_read { 128.0 } else { 2048.0 };
        counts / f32(self.g())
    }

    /// Convert a sign-corrected sample to g, rounded to two decimals
    pub(crate) fn convert_out_i16tof32(self, val: i16, fast_read: bool) -> f32 {
        let g = f32(val) / self.factor(fast_read);
        round_half_even(g * 100.0) / 100.0
    }
}

// === CTRL_REG1 (2Ah) ===

pub const ASLP_RATE_MASK: u8 = 0b1100_0000;
pub const ASLP_RATE_SHIFT: u8 = 6;

/// Auto-sleep output data rate, used while in `Sleep`
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(Format))]
pub enum AslpRate {
    /// 50 Hz
    Hz50 = 0b00,
    /// 12.5 Hz
    Hz12_5 = 0b01,
    /// 6.25 Hz
    Hz6_25 = 0b10,
    /// 1.56 Hz
    Hz1_56 = 0b11,
}

impl AslpRate {
    /// Rate in Hz
    pub fn hz(self) -> f32 {
        match self {
            Self::Hz50 => 50.0,
            Self::Hz12_5 => 12.5,
            Self::Hz6_25 => 6.25,
            Self::Hz1_56 => 1.56,
        }
    }
}

pub const DR_MASK: u8 = 0b0011_1000;
pub const DR_SHIFT: u8 = 3;

/// Output Data Rate
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(Format))]
pub enum Odr {
    /// 800 Hz
    Hz800 = 0b000,
    /// 400 Hz
    Hz400 = 0b001,
    /// 200 Hz
    Hz200 = 0b010,
    /// 100 Hz
    Hz100 = 0b011,
    /// 50 Hz
    Hz50 = 0b100,
    /// 12.5 Hz
    Hz12_5 = 0b101,
    /// 6.25 Hz
    Hz6_25 = 0b110,
    /// 1.56 Hz
    Hz1_56 = 0b111,
}

impl Default for Odr {
    fn default() -> Self {
        Self::Hz400
    }
}

impl Odr {
    /// Rate in Hz
    pub fn hz(self) -> f32 {
        match self {
            Self::Hz800 => 800.0,
            Self::Hz400 => 400.0,
            Self::Hz200 => 200.0,
            Self::Hz100 => 100.0,
            Self::Hz50 => 50.0,
            Self::Hz12_5 => 12.5,
            Self::Hz6_25 => 6.25,
            Self::Hz1_56 => 1.56,
        }
    }
}

pub const F_READ: u8 = 0b0000_0010;
pub const ACTIVE: u8 = 0b0000_0001;

// === CTRL_REG2 (2Bh) ===

pub const SMODS_MASK: u8 = 0b0001_1000;
pub const SMODS_SHIFT: u8 = 3;
pub const SLPE: u8 = 0b0000_0100;
pub const MODS_MASK: u8 = 0b0000_0011;
pub const MODS_SHIFT: u8 = 0;

/// Oversampling mode, `MODS` for wake and `SMODS` for sleep
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(Format))]
pub enum Oversampling {
    /// Normal
    Normal = 0b00,
    /// Low noise, low power
    LowNoiseLowPower = 0b01,
    /// High resolution
    HighResolution = 0b10,
    /// Low power
    LowPower = 0b11,
}

/// Round to the nearest integer, exact ties to the even neighbour.
///
/// Every factor is a power of two, so `g * 100` is exact and ties are
/// common (raw 128 at 2 g is 12.5 hundredths).
#[inline]
fn round_half_even(v: f32) -> f32 {
    if FloatCore::abs(v - FloatCore::trunc(v)) == 0.5 {
        2.0 * FloatCore::round(v / 2.0)
    } else {
        FloatCore::round(v)
    }
}

/// Left-justified 12-bit sample to signed value
#[inline]
pub(crate) fn sign_extend_12(msb: u8, lsb: u8) -> i16 {
    ((u16(msb) << 8) | u16(lsb)) as i16 >> 4
}

/// Fast-read 8-bit sample to signed value
#[inline]
pub(crate) fn sign_extend_8(msb: u8) -> i16 {
    i16(msb as i8)
}
