//! Post-processing core of the Allwinner display engine (DE).
//!
//! Each display pipe owns a [`Backend`] holding the optional picture-quality
//! modules of its silicon revision (CRC, gamma, color matrix, deband, smart
//! backlight, dither) and a [`BldHandle`] compositing the overlay pipes.
//! Modules never touch the hardware directly: they write shadow
//! [`registers::RegBlock`]s and mark them dirty, and the caller flushes dirty
//! blocks at commit time. The only live accesses, status words and the SMBL
//! histogram, go through the [`DeIo`] seam.

#![no_std]

extern crate alloc;
#[macro_use]
extern crate log;

mod backend;
mod bld;
mod config;
mod crc;
mod csc;
mod deband;
mod disp;
mod dither;
mod err;
mod gamma;
mod osal;
pub mod registers;
mod smbl;

pub use backend::*;
pub use bld::*;
pub use config::*;
pub use crc::*;
pub use csc::*;
pub use deband::*;
pub use disp::*;
pub use dither::*;
pub use err::*;
pub use gamma::*;
pub use osal::*;
pub use smbl::*;
