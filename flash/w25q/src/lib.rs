#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

mod bulk;
pub mod config;
mod driver;
mod error;
pub mod hal;
pub mod ident;
mod opcode;
pub mod status;
pub mod traits;

#[cfg(test)]
mod testing;

pub use self::{
    config::Geometry,
    driver::{BlockSize, Driver},
    error::{ChunkReport, Error},
    ident::{Device, Identification, Manufacturer, UniqueId},
    status::{StatusRegister1, StatusRegister2, StatusRegister3},
    traits::Platform,
};
