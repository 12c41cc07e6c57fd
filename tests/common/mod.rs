#![allow(dead_code)]

pub use mma8452q::{ErrorKind, FullScale, Mma8452q, Odr, SlaveAddr};

use embedded_hal_mock as hal;
pub use hal::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

pub const DEV_ADDR: u8 = 0x1D;

pub const STATUS: u8 = 0x00;
pub const OUT_X_MSB: u8 = 0x01;
pub const SYSMOD: u8 = 0x0B;
pub const WHO_AM_I: u8 = 0x0D;
pub const XYZ_DATA_CFG: u8 = 0x0E;
pub const CTRL_REG1: u8 = 0x2A;
pub const CTRL_REG2: u8 = 0x2B;

pub fn trans_who_am_i() -> I2cTrans {
    I2cTrans::write_read(DEV_ADDR, vec![WHO_AM_I], vec![0x2A])
}

pub fn trans_sysmod(mode: u8) -> I2cTrans {
    I2cTrans::write_read(DEV_ADDR, vec![SYSMOD], vec![mode])
}

pub fn trans_standby() -> I2cTrans {
    trans_sysmod(0b00)
}

pub fn trans_read(reg: u8, val: u8) -> I2cTrans {
    I2cTrans::write_read(DEV_ADDR, vec![reg], vec![val])
}

pub fn trans_write(reg: u8, val: u8) -> I2cTrans {
    I2cTrans::write(DEV_ADDR, vec![reg, val])
}
