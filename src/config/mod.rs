//! Display engine revisions, creation info and capability descriptor tables.
//!
//! Each leaf module selects an immutable descriptor at create time, keyed by
//! `(DeVersion, id)`. A missing descriptor means the silicon has no such
//! block on that display, which is not an error.

use alloc::sync::Arc;
use core::fmt;

use crate::osal::DeIo;

mod bld;
mod crc;
mod dither;
mod pq;
mod smbl;

pub use bld::*;
pub use crc::*;
pub use dither::*;
pub use pq::*;
pub use smbl::*;

/// Display engine IP revision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeVersion {
    De201,
    De350,
    De352,
    De355,
}

impl DeVersion {
    /// Revision number as reported by the hardware version register.
    pub const fn ip_version(self) -> u32 {
        match self {
            DeVersion::De201 => 0x201,
            DeVersion::De350 => 0x350,
            DeVersion::De352 => 0x352,
            DeVersion::De355 => 0x355,
        }
    }

    pub fn from_ip_version(raw: u32) -> Option<Self> {
        match raw {
            0x201 => Some(DeVersion::De201),
            0x350 => Some(DeVersion::De350),
            0x352 => Some(DeVersion::De352),
            0x355 => Some(DeVersion::De355),
            _ => None,
        }
    }
}

/// Arguments shared by every leaf module `create()`.
#[derive(Clone)]
pub struct ModuleCreateInfo {
    pub version: DeVersion,
    /// Display (pipe) index inside the DE instance.
    pub id: u32,
    /// Byte offset of this display's post-processing block in DE space.
    pub reg_base: usize,
    pub io: Arc<dyn DeIo>,
}

impl fmt::Debug for ModuleCreateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleCreateInfo")
            .field("version", &self.version)
            .field("id", &self.id)
            .field("reg_base", &format_args!("0x{:x}", self.reg_base))
            .finish()
    }
}

/// Pixel encoding of the pipe output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FormatSpace {
    #[default]
    Rgb,
    Yuv444,
    Yuv422,
    Yuv420,
}

impl FormatSpace {
    pub const ALL: [FormatSpace; 4] = [
        FormatSpace::Rgb,
        FormatSpace::Yuv444,
        FormatSpace::Yuv422,
        FormatSpace::Yuv420,
    ];

    pub fn is_yuv(self) -> bool {
        self != FormatSpace::Rgb
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    #[default]
    Bt601,
    Bt709,
    Bt2020Nc,
    Bt2020C,
}

impl ColorSpace {
    pub const ALL: [ColorSpace; 4] = [
        ColorSpace::Bt601,
        ColorSpace::Bt709,
        ColorSpace::Bt2020Nc,
        ColorSpace::Bt2020C,
    ];

    pub fn is_bt2020(self) -> bool {
        matches!(self, ColorSpace::Bt2020Nc | ColorSpace::Bt2020C)
    }
}
