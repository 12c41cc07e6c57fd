//! Platform-agnostic MMA8452Q accelerometer driver which uses I2C via
//! [embedded-hal] and implements the [`Accelerometer` trait][trait]
//! from the `accelerometer` crate.
//!
//! The device only accepts configuration while it is in standby. Every
//! setter here re-reads `SYSMOD` first and fails with [`ErrorKind::Mode`]
//! instead of writing when the device is awake or asleep:
//!
//! | failure                                | `ErrorKind`            |
//! |----------------------------------------|------------------------|
//! | bus transaction failed                 | [`ErrorKind::Bus`]     |
//! | `WHO_AM_I` mismatch, reserved encoding | [`ErrorKind::Device`]  |
//! | configuration write outside standby    | [`ErrorKind::Mode`]    |
//!
//! Register writes are not acknowledged by the device. A successful write
//! only means the bus transaction completed; callers that need certainty
//! can read the register back with [`Mma8452q::read_reg`] and compare.
//!
//! The handle is single-owner and does no locking. Share it between
//! contexts only behind external mutual exclusion.
//!
//! [embedded-hal]: https://docs.rs/embedded-hal
//! [trait]: https://docs.rs/accelerometer/latest/accelerometer/trait.Accelerometer.html
//!

#![deny(missing_docs)]
#![deny(warnings)]
#![no_std]
#![forbid(unsafe_code)]

mod reg;

use core::fmt::Debug;

pub use accelerometer::vector::{F32x3, I16x3};
pub use accelerometer::{Accelerometer, Error, ErrorKind, RawAccelerometer};
#[cfg(feature = "defmt-03")]
use defmt::Format;
use embedded_hal as hal;
use hal::i2c::I2c;
use num_traits::FromPrimitive;

use crate::reg::*;
pub use crate::reg::{AslpRate, FullScale, Odr, Oversampling, Register, SysMode};

/// Possible slave addresses
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt-03", derive(Format))]
pub enum SlaveAddr {
    /// Default slave address, `SA0` pulled high (0x1D)
    Default,
    /// Alternative slave address providing bit value for `SA0`
    Alternative(bool),
}

impl SlaveAddr {
    fn addr(self) -> u8 {
        match self {
            SlaveAddr::Default => I2C_SAD | SA0,
            SlaveAddr::Alternative(sa0) => I2C_SAD | sa0 as u8,
        }
    }
}

/// Data status structure,
/// decoded from STATUS register
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(Format))]
pub struct DataStatus {
    /// ZYXOW bit
    pub zyxow: bool,
    /// (XOW, YOW, ZOW) bits
    pub xyzow: (bool, bool, bool),
    /// ZYXDR bit
    pub zyxdr: bool,
    /// (XDR, YDR, ZDR) bits
    pub xyzdr: (bool, bool, bool),
}

/// One acceleration sample
#[derive(Copy, Clone, Debug)]
pub struct Sample {
    /// Sign-corrected register values,
    /// `[-2048, 2047]` in normal mode, `[-128, 127]` in fast-read mode
    pub raw: I16x3,
    /// Acceleration in g, rounded to two decimals
    pub g: F32x3,
}

#[cfg(feature = "defmt-03")]
impl Format for Sample {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Sample {{ raw: ({=i16}, {=i16}, {=i16}), g: ({=f32}, {=f32}, {=f32}) }}",
            self.raw.x,
            self.raw.y,
            self.raw.z,
            self.g.x,
            self.g.y,
            self.g.z
        )
    }
}

/// `MMA8452Q` driver
pub struct Mma8452q<I2C> {
    /// The concrete I²C device implementation
    i2c: I2C,
    /// The I²C device slave address
    addr: u8,
    /// Current full-scale
    fs: FullScale,
    /// 8-bit fast-read output enabled
    fast_read: bool,
}

impl<I2C, E> Mma8452q<I2C>
where
    I2C: I2c<Error = E>,
    E: Debug,
{
    /// Create a new `MMA8452Q` driver from the given `I2C` peripheral.
    /// No bus traffic happens until [`init`](Self::init) or another call.
    pub fn new(i2c: I2C, addr: SlaveAddr) -> Self {
        Self {
            i2c,
            addr: addr.addr(),
            fs: FullScale::G2,
            fast_read: false,
        }
    }

    /// Destroy driver instance, return `I2C` bus instance
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Check the device identity, then configure full-scale and data rate
    /// and start sampling.
    ///
    /// On a `WHO_AM_I` mismatch this fails with [`ErrorKind::Device`]
    /// before any register is written.
    pub fn init(&mut self, fs: FullScale, odr: Odr) -> Result<(), Error<E>> {
        // Ensure we have the correct device ID
        if self.get_device_id()? != DEVICE_ID {
            ErrorKind::Device.err()?;
        }

        self.enter_standby()?;
        self.set_fs(fs)?;
        self.set_odr(odr)?;
        self.enter_active()
    }

    /// `WHO_AM_I` register
    pub fn get_device_id(&mut self) -> Result<u8, Error<E>> {
        self.read_reg(Register::WHO_AM_I)
    }

    // --- operating mode ---

    /// Current operating mode,
    /// `SYSMOD`: `SYSMOD[1:0]`
    pub fn get_system_mode(&mut self) -> Result<SysMode, Error<E>> {
        let reg = self.read_reg(Register::SYSMOD)?;
        decode(SysMode::from_u8(reg & SYSMOD_MASK))
    }

    /// Request standby,
    /// `CTRL_REG1`: clear `ACTIVE`.
    ///
    /// The transition is not confirmed; gated operations query
    /// [`get_system_mode`](Self::get_system_mode) themselves.
    pub fn enter_standby(&mut self) -> Result<(), Error<E>> {
        self.reg_reset_bits(Register::CTRL_REG1, ACTIVE)
    }

    /// Request active sampling,
    /// `CTRL_REG1`: set `ACTIVE`
    pub fn enter_active(&mut self) -> Result<(), Error<E>> {
        self.reg_set_bits(Register::CTRL_REG1, ACTIVE)
    }

    // --- configuration, standby only ---

    /// Full-scale selection,
    /// `XYZ_DATA_CFG`: `FS`
    pub fn set_fs(&mut self, fs: FullScale) -> Result<(), Error<E>> {
        self.ensure_standby()?;
        self.modify_field(Register::XYZ_DATA_CFG, FS_MASK, 0, fs as u8)?;
        self.fs = fs;
        Ok(())
    }

    /// Full-scale selection,
    /// `XYZ_DATA_CFG`: `FS`
    pub fn get_fs(&mut self) -> Result<FullScale, Error<E>> {
        let v = self.read_field(Register::XYZ_DATA_CFG, FS_MASK, 0)?;
        decode(FullScale::from_u8(v))
    }

    /// Data rate selection,
    /// `CTRL_REG1`: `DR`
    pub fn set_odr(&mut self, odr: Odr) -> Result<(), Error<E>> {
        self.ensure_standby()?;
        self.modify_field(Register::CTRL_REG1, DR_MASK, DR_SHIFT, odr as u8)
    }

    /// Data rate selection,
    /// `CTRL_REG1`: `DR`
    pub fn get_odr(&mut self) -> Result<Odr, Error<E>> {
        let v = self.read_field(Register::CTRL_REG1, DR_MASK, DR_SHIFT)?;
        decode(Odr::from_u8(v))
    }

    /// Auto-sleep data rate selection,
    /// `CTRL_REG1`: `ASLP_RATE`
    pub fn set_aslp_rate(&mut self, rate: AslpRate) -> Result<(), Error<E>> {
        self.ensure_standby()?;
        self.modify_field(Register::CTRL_REG1, ASLP_RATE_MASK, ASLP_RATE_SHIFT, rate as u8)
    }

    /// Auto-sleep data rate selection,
    /// `CTRL_REG1`: `ASLP_RATE`
    pub fn get_aslp_rate(&mut self) -> Result<AslpRate, Error<E>> {
        let v = self.read_field(Register::CTRL_REG1, ASLP_RATE_MASK, ASLP_RATE_SHIFT)?;
        decode(AslpRate::from_u8(v))
    }

    /// Oversampling mode while awake,
    /// `CTRL_REG2`: `MODS`
    pub fn set_oversampling(&mut self, mode: Oversampling) -> Result<(), Error<E>> {
        self.ensure_standby()?;
        self.modify_field(Register::CTRL_REG2, MODS_MASK, MODS_SHIFT, mode as u8)
    }

    /// Oversampling mode while awake,
    /// `CTRL_REG2`: `MODS`
    pub fn get_oversampling(&mut self) -> Result<Oversampling, Error<E>> {
        let v = self.read_field(Register::CTRL_REG2, MODS_MASK, MODS_SHIFT)?;
        decode(Oversampling::from_u8(v))
    }

    /// Oversampling mode while asleep,
    /// `CTRL_REG2`: `SMODS`
    pub fn set_sleep_oversampling(&mut self, mode: Oversampling) -> Result<(), Error<E>> {
        self.ensure_standby()?;
        self.modify_field(Register::CTRL_REG2, SMODS_MASK, SMODS_SHIFT, mode as u8)
    }

    /// Oversampling mode while asleep,
    /// `CTRL_REG2`: `SMODS`
    pub fn get_sleep_oversampling(&mut self) -> Result<Oversampling, Error<E>> {
        let v = self.read_field(Register::CTRL_REG2, SMODS_MASK, SMODS_SHIFT)?;
        decode(Oversampling::from_u8(v))
    }

    /// Auto-sleep enable,
    /// `CTRL_REG2`: `SLPE`
    pub fn enable_auto_sleep(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.ensure_standby()?;
        self.reg_xset_bits(Register::CTRL_REG2, SLPE, enable)
    }

    /// Auto-sleep enable,
    /// `CTRL_REG2`: `SLPE`
    pub fn is_auto_sleep_enabled(&mut self) -> Result<bool, Error<E>> {
        let reg = self.read_reg(Register::CTRL_REG2)?;
        Ok((reg & SLPE) != 0)
    }

    /// 8-bit fast-read output,
    /// `CTRL_REG1`: `F_READ`.
    ///
    /// Subsequent samples are read as 3 bytes instead of 6.
    pub fn set_fast_read(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.ensure_standby()?;
        self.reg_xset_bits(Register::CTRL_REG1, F_READ, enable)?;
        self.fast_read = enable;
        Ok(())
    }

    /// 8-bit fast-read output,
    /// `CTRL_REG1`: `F_READ`
    pub fn get_fast_read(&mut self) -> Result<bool, Error<E>> {
        let reg = self.read_reg(Register::CTRL_REG1)?;
        Ok((reg & F_READ) != 0)
    }

    /// High-pass filtered output data,
    /// `XYZ_DATA_CFG`: `HPF_OUT`
    pub fn set_hpf_out(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.ensure_standby()?;
        self.reg_xset_bits(Register::XYZ_DATA_CFG, HPF_OUT, enable)
    }

    /// High-pass filtered output data,
    /// `XYZ_DATA_CFG`: `HPF_OUT`
    pub fn get_hpf_out(&mut self) -> Result<bool, Error<E>> {
        let reg = self.read_reg(Register::XYZ_DATA_CFG)?;
        Ok((reg & HPF_OUT) != 0)
    }

    // --- data ---

    /// New X, Y and Z data available,
    /// `STATUS`: `ZYXDR`
    pub fn is_data_available(&mut self) -> Result<bool, Error<E>> {
        let reg = self.read_reg(Register::STATUS)?;
        Ok((reg & ZYXDR) != 0)
    }

    /// Data status,
    /// `STATUS`: as
    /// DataStatus {zyxow: `ZYXOW`, xyzow: (`XOW`, `YOW`, `ZOW`), zyxdr: `ZYXDR`, xyzdr: (`XDR`, `YDR`, `ZDR`)}
    pub fn get_status(&mut self) -> Result<DataStatus, Error<E>> {
        let reg = self.read_reg(Register::STATUS)?;
        Ok(DataStatus {
            zyxow: (reg & ZYXOW) != 0,
            xyzow: ((reg & XOW) != 0, (reg & YOW) != 0, (reg & ZOW) != 0),
            zyxdr: (reg & ZYXDR) != 0,
            xyzdr: ((reg & XDR) != 0, (reg & YDR) != 0, (reg & ZDR) != 0),
        })
    }

    /// Read one sample and convert it using the full-scale and read mode
    /// last set through this handle
    pub fn read_sample(&mut self) -> Result<Sample, Error<E>> {
        let raw = self.read_raw()?;
        let fs = self.fs;
        let fast_read = self.fast_read;
        Ok(Sample {
            raw,
            g: F32x3::new(
                fs.convert_out_i16tof32(raw.x, fast_read),
                fs.convert_out_i16tof32(raw.y, fast_read),
                fs.convert_out_i16tof32(raw.z, fast_read),
            ),
        })
    }

    fn read_raw(&mut self) -> Result<I16x3, Error<E>> {
        if self.fast_read {
            // auto-increment skips the LSB registers
            let mut buf = [0u8; 3];
            self.read_regs(Register::OUT_X_MSB, &mut buf)?;
            Ok(I16x3::new(
                sign_extend_8(buf[0]),
                sign_extend_8(buf[1]),
                sign_extend_8(buf[2]),
            ))
        } else {
            let mut buf = [0u8; 6];
            self.read_regs(Register::OUT_X_MSB, &mut buf)?;
            Ok(I16x3::new(
                sign_extend_12(buf[0], buf[1]),
                sign_extend_12(buf[2], buf[3]),
                sign_extend_12(buf[4], buf[5]),
            ))
        }
    }

    /// Dump registers
    #[cfg(debug_assertions)]
    pub fn dump_regs<W>(&mut self, w: &mut W) -> Result<(), Error<E>>
    where
        W: core::fmt::Write,
    {
        for reg in [
            Register::SYSMOD,
            Register::XYZ_DATA_CFG,
            Register::CTRL_REG1,
            Register::CTRL_REG2,
        ]
        .iter()
        {
            let v = self.read_reg(*reg)?;
            // formatter errors are the writer's concern
            let _ = writeln!(w, "{:?} ({:02X}h) = {:#010b}", reg, reg.addr(), v);
        }
        Ok(())
    }

    // --- register access ---

    /// Read a single register
    pub fn read_reg(&mut self, reg: Register) -> Result<u8, Error<E>> {
        let mut buf = [0u8];
        self.i2c.write_read(self.addr, &[reg.addr()], &mut buf)?;
        Ok(buf[0])
    }

    /// Read `buffer.len()` contiguous registers starting at `reg`
    pub fn read_regs(&mut self, reg: Register, buffer: &mut [u8]) -> Result<(), Error<E>> {
        self.i2c.write_read(self.addr, &[reg.addr()], buffer)?;
        Ok(())
    }

    /// Write a single register.
    ///
    /// `Ok` means the transaction completed, not that the value was taken.
    pub fn write_reg(&mut self, reg: Register, val: u8) -> Result<(), Error<E>> {
        self.i2c.write(self.addr, &[reg.addr(), val])?;
        Ok(())
    }

    #[inline]
    fn ensure_standby(&mut self) -> Result<(), Error<E>> {
        if self.get_system_mode()? != SysMode::Standby {
            ErrorKind::Mode.err()?;
        }
        Ok(())
    }

    #[inline]
    fn modify_reg<F>(&mut self, reg: Register, f: F) -> Result<(), Error<E>>
    where
        F: FnOnce(u8) -> u8,
    {
        let r = self.read_reg(reg)?;
        self.write_reg(reg, f(r))
    }

    #[inline]
    fn modify_field(&mut self, reg: Register, mask: u8, shift: u8, val: u8) -> Result<(), Error<E>> {
        self.modify_reg(reg, |v| (v & !mask) | ((val << shift) & mask))
    }

    #[inline]
    fn read_field(&mut self, reg: Register, mask: u8, shift: u8) -> Result<u8, Error<E>> {
        let v = self.read_reg(reg)?;
        Ok((v & mask) >> shift)
    }

    #[inline]
    fn reg_set_bits(&mut self, reg: Register, bits: u8) -> Result<(), Error<E>> {
        self.modify_reg(reg, |v| v | bits)
    }

    #[inline]
    fn reg_reset_bits(&mut self, reg: Register, bits: u8) -> Result<(), Error<E>> {
        self.modify_reg(reg, |v| v & !bits)
    }

    #[inline]
    fn reg_xset_bits(&mut self, reg: Register, bits: u8, set: bool) -> Result<(), Error<E>> {
        if set {
            self.reg_set_bits(reg, bits)
        } else {
            self.reg_reset_bits(reg, bits)
        }
    }
}

/// Reserved field encodings are reported as a device error
fn decode<T, E: Debug>(v: Option<T>) -> Result<T, Error<E>> {
    v.ok_or_else(|| Error::new(ErrorKind::Device))
}

impl<I2C, E> RawAccelerometer<I16x3> for Mma8452q<I2C>
where
    I2C: I2c<Error = E>,
    E: Debug,
{
    type Error = E;

    /// Get sign-corrected acceleration reading from the accelerometer
    fn accel_raw(&mut self) -> Result<I16x3, Error<E>> {
        self.read_raw()
    }
}

impl<I2C, E> Accelerometer for Mma8452q<I2C>
where
    I2C: I2c<Error = E>,
    E: Debug,
{
    type Error = E;

    /// Get normalized ±g reading from the accelerometer
    fn accel_norm(&mut self) -> Result<F32x3, Error<E>> {
        Ok(self.read_sample()?.g)
    }

    /// Get sample rate of accelerometer in Hz
    fn sample_rate(&mut self) -> Result<f32, Error<Self::Error>> {
        Ok(self.get_odr()?.hz())
    }
}
