//! Blender: composites the routed overlay pipes into one output surface.

use core::fmt;

use tock_registers::{
    fields::Field,
    interfaces::{ReadWriteable, Readable, Writeable},
};

use crate::{
    config::{BldDesc, ChnId, ChnKind, FormatSpace, ModuleCreateInfo, bld_desc},
    err::DeError,
    osal::RegAllocator,
    registers::{
        RegBlock, Regs,
        bld::{
            BLD_MODE, BLD_OFFSET, BLD_OUT_CTL, BLD_PIPE_CTL, BLD_PORT_MAX, BLD_PREMUL, BLD_ROUTE,
            BLD_SIZE, BldRegs,
        },
    },
};

/// Porter-Duff mode packed as color/alpha factor nibbles for source and
/// destination.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlendMode(pub u32);

impl BlendMode {
    pub const CLEAR: Self = Self(0x0000_0000);
    pub const SRC: Self = Self(0x0001_0001);
    pub const DST: Self = Self(0x0100_0100);
    pub const SRC_OVER: Self = Self(0x0301_0301);
    pub const DST_OVER: Self = Self(0x0105_0105);
    pub const SRC_IN: Self = Self(0x0004_0004);
    pub const DST_IN: Self = Self(0x0200_0200);
    pub const SRC_OUT: Self = Self(0x0005_0005);
    pub const DST_OUT: Self = Self(0x0300_0300);
    pub const SRC_ATOP: Self = Self(0x0304_0304);
    pub const DST_ATOP: Self = Self(0x0205_0205);
    pub const XOR: Self = Self(0x0305_0305);
}

/// Background used for RGB output.
pub const BK_COLOR_RGB: u32 = 0x0000_0000;
/// Background used for YUV output: black in limited-range YCbCr.
pub const BK_COLOR_YUV: u32 = 0x0010_8080;
const ALPHA_OPAQUE: u32 = 0xff00_0000;

const ROUTE_FIELDS: [Field<u32, BLD_ROUTE::Register>; BLD_PORT_MAX] = [
    BLD_ROUTE::P0,
    BLD_ROUTE::P1,
    BLD_ROUTE::P2,
    BLD_ROUTE::P3,
    BLD_ROUTE::P4,
    BLD_ROUTE::P5,
];

/// Who is asking to tear a pipe down.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PipeOwner {
    /// Reset only while the pipe is still routed from this port.
    Port(u32),
    /// Reset whatever is routed.
    Any,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BldRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

pub struct BldHandle {
    info: ModuleCreateInfo,
    dsc: &'static BldDesc,
    regs: Regs<BldRegs>,
}

impl BldHandle {
    pub fn create(
        info: &ModuleCreateInfo,
        alloc: &dyn RegAllocator,
    ) -> Result<Option<Self>, DeError> {
        let Some(dsc) = bld_desc(info.version, info.id) else {
            return Ok(None);
        };
        let [block] = RegBlock::alloc_group(alloc, [Regs::<BldRegs>::SIZE], true)?;

        Ok(Some(Self {
            info: info.clone(),
            dsc,
            regs: Regs::new(block),
        }))
    }

    pub fn port_cnt(&self) -> u32 {
        self.dsc.port_cnt
    }

    pub fn reg_blocks(&self) -> impl Iterator<Item = &RegBlock> {
        core::iter::once(self.regs.block())
    }

    fn check_pipe(&self, pipe: u32) -> Result<usize, DeError> {
        if pipe >= self.dsc.port_cnt {
            error!(
                "bld{}: pipe {} out of range ({} pipes)",
                self.info.id, pipe, self.dsc.port_cnt
            );
            return Err(DeError::InvalidArgument);
        }
        Ok(pipe as usize)
    }

    /// Sets output geometry and format.
    ///
    /// The background and the pipe 0 fixed color follow the output format
    /// space: opaque black for RGB, opaque limited-range black for YUV.
    pub fn output_set_attr(&mut self, width: u32, height: u32, fmt: FormatSpace, interlaced: bool) {
        let bk = if fmt.is_yuv() {
            BK_COLOR_YUV
        } else {
            BK_COLOR_RGB
        };
        let r = &self.regs;
        r.out_size.write(
            BLD_SIZE::WIDTH.val(width.saturating_sub(1))
                + BLD_SIZE::HEIGHT.val(height.saturating_sub(1)),
        );
        r.out_ctl.write(
            BLD_OUT_CTL::INTERLACE.val(interlaced as u32) + BLD_OUT_CTL::YUV.val(fmt.is_yuv() as u32),
        );
        r.bk_color.set(bk);
        r.fcolor[0].set(ALPHA_OPAQUE | bk);
        let fc = r.pipe_ctl.read(BLD_PIPE_CTL::FC_EN);
        r.pipe_ctl.modify(BLD_PIPE_CTL::FC_EN.val(fc | 1));
        r.mark_dirty();
    }

    /// Checks that `port` may be routed onto `pipe` without touching the
    /// registers.
    pub fn check_route(&self, pipe: u32, port: u32) -> Result<usize, DeError> {
        let p = self.check_pipe(pipe)?;
        if port >= self.dsc.port_cnt {
            error!("bld{}: mux port {} out of range", self.info.id, port);
            return Err(DeError::InvalidArgument);
        }
        Ok(p)
    }

    /// Routes `port` onto `pipe` and enables it with SRC_OVER blending.
    pub fn pipe_set_attr(
        &mut self,
        pipe: u32,
        port: u32,
        rect: &BldRect,
        premultiplied: bool,
    ) -> Result<(), DeError> {
        let p = self.check_route(pipe, port)?;

        let r = &self.regs;
        r.route.modify(ROUTE_FIELDS[p].val(port));
        let premul = r.premul.read(BLD_PREMUL::EN) & !(1 << p);
        r.premul
            .modify(BLD_PREMUL::EN.val(premul | ((premultiplied as u32) << p)));
        let en = r.pipe_ctl.read(BLD_PIPE_CTL::P_EN);
        r.pipe_ctl.modify(BLD_PIPE_CTL::P_EN.val(en | 1 << p));
        r.mode[p].set(BlendMode::SRC_OVER.0);
        r.insize[p].write(
            BLD_SIZE::WIDTH.val(rect.width.saturating_sub(1))
                + BLD_SIZE::HEIGHT.val(rect.height.saturating_sub(1)),
        );
        r.offset[p].write(BLD_OFFSET::X.val(rect.x) + BLD_OFFSET::Y.val(rect.y));
        r.mark_dirty();
        Ok(())
    }

    /// Disables and unroutes `pipe` if `owner` still owns it.
    ///
    /// Returns whether the pipe was reset; an ownership mismatch is not an
    /// error.
    pub fn pipe_reset(&mut self, pipe: u32, owner: PipeOwner) -> Result<bool, DeError> {
        let p = self.check_pipe(pipe)?;
        let r = &self.regs;
        if let PipeOwner::Port(port) = owner {
            if r.route.read(ROUTE_FIELDS[p]) != port {
                return Ok(false);
            }
        }

        let en = r.pipe_ctl.read(BLD_PIPE_CTL::P_EN) & !(1 << p);
        r.pipe_ctl.modify(BLD_PIPE_CTL::P_EN.val(en));
        let premul = r.premul.read(BLD_PREMUL::EN) & !(1 << p);
        r.premul.modify(BLD_PREMUL::EN.val(premul));
        r.route.modify(ROUTE_FIELDS[p].val(0));
        r.mode[p].set(BlendMode::CLEAR.0);
        r.insize[p].set(0);
        r.offset[p].set(0);
        r.mark_dirty();
        Ok(true)
    }

    /// Mux port carrying channel `(is_video, type_id)` in channel mode
    /// `mode`, or `None` when the channel is not routable in that mode.
    pub fn get_chn_mux_port(&self, mode: u8, is_video: bool, type_id: u32) -> Option<u32> {
        let chn = ChnId {
            kind: if is_video { ChnKind::Video } else { ChnKind::Ui },
            index: type_id,
        };
        self.dsc.mux_port(mode, chn)
    }

    pub fn background(&self) -> u32 {
        self.regs.bk_color.get()
    }

    /// Fixed color of `pipe`, if its fixed-color fill is enabled.
    pub fn fixed_color(&self, pipe: u32) -> Option<u32> {
        let p = pipe as usize;
        (p < BLD_PORT_MAX && self.regs.pipe_ctl.read(BLD_PIPE_CTL::FC_EN) & (1 << p) != 0)
            .then(|| self.regs.fcolor[p].get())
    }

    /// Port routed onto `pipe`, if the pipe is enabled.
    pub fn pipe_route(&self, pipe: u32) -> Option<u32> {
        let p = pipe as usize;
        (p < BLD_PORT_MAX && self.regs.pipe_ctl.read(BLD_PIPE_CTL::P_EN) & (1 << p) != 0)
            .then(|| self.regs.route.read(ROUTE_FIELDS[p]))
    }

    pub fn blend_mode(&self, pipe: u32) -> Option<BlendMode> {
        self.regs
            .mode
            .get(pipe as usize)
            .map(|m| BlendMode(m.get()))
    }

    pub fn is_premultiplied(&self, pipe: u32) -> bool {
        pipe < BLD_PORT_MAX as u32 && self.regs.premul.read(BLD_PREMUL::EN) & (1 << pipe) != 0
    }

    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let r = &self.regs;
        writeln!(
            out,
            "  bld{}: out {}x{} yuv {} bk {:#08x} pipes {:#04x}",
            self.info.id,
            r.out_size.read(BLD_SIZE::WIDTH) + 1,
            r.out_size.read(BLD_SIZE::HEIGHT) + 1,
            r.out_ctl.read(BLD_OUT_CTL::YUV),
            r.bk_color.get(),
            r.pipe_ctl.read(BLD_PIPE_CTL::P_EN),
        )?;
        for pipe in 0..self.dsc.port_cnt {
            if let Some(port) = self.pipe_route(pipe) {
                let p = pipe as usize;
                writeln!(
                    out,
                    "    pipe{} <- port{} mode {:#010x} pfs {} {}x{}+{}+{}",
                    pipe,
                    port,
                    r.mode[p].get(),
                    r.mode[p].read(BLD_MODE::PFS),
                    r.insize[p].read(BLD_SIZE::WIDTH) + 1,
                    r.insize[p].read(BLD_SIZE::HEIGHT) + 1,
                    r.offset[p].read(BLD_OFFSET::X),
                    r.offset[p].read(BLD_OFFSET::Y),
                )?;
            }
        }
        Ok(())
    }
}
