//! Per-display facade tying the blender to the post-processing backend.

use core::fmt;

use crate::{
    backend::{Backend, BackendApplyCfg, BackendData, TaskletState},
    bld::{BldHandle, BldRect, PipeOwner},
    config::ModuleCreateInfo,
    crc::CrcRegionCfg,
    err::DeError,
    osal::RegAllocator,
    registers::{RegBlock, bld::BLD_PORT_MAX},
};

/// One overlay routed onto a blender pipe for this commit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerRoute {
    pub pipe: u32,
    pub port: u32,
    pub rect: BldRect,
    pub premultiplied: bool,
}

/// Everything a display commit carries besides the PQ payload.
#[derive(Copy, Clone, Debug, Default)]
pub struct DispApply<'a> {
    pub cfg: BackendApplyCfg,
    pub interlaced: bool,
    pub layers: &'a [LayerRoute],
}

pub struct DePipe {
    id: u32,
    backend: Backend,
    bld: Option<BldHandle>,
    /// Port routed onto each pipe by the previous commit.
    routes: [Option<u32>; BLD_PORT_MAX],
}

impl DePipe {
    pub fn create(info: &ModuleCreateInfo, alloc: &dyn RegAllocator) -> Result<Self, DeError> {
        let backend = Backend::create(info, alloc)?;
        let bld = BldHandle::create(info, alloc)?;
        if bld.is_none() {
            warn!("disp{}: no blender on {:?}", info.id, info.version);
        }
        Ok(Self {
            id: info.id,
            backend,
            bld,
            routes: [None; BLD_PORT_MAX],
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut Backend {
        &mut self.backend
    }

    pub fn blender(&self) -> Option<&BldHandle> {
        self.bld.as_ref()
    }

    /// Mux port of a channel in the given channel mode.
    pub fn chn_mux_port(&self, mode: u8, is_video: bool, type_id: u32) -> Option<u32> {
        self.bld
            .as_ref()?
            .get_chn_mux_port(mode, is_video, type_id)
    }

    /// Commits one frame: blender output, layer routes, release of pipes
    /// no longer used, then the backend.
    pub fn apply(
        &mut self,
        commit: &DispApply<'_>,
        data: Option<&mut BackendData>,
    ) -> Result<(), DeError> {
        let cfg = &commit.cfg;
        if let Some(bld) = self.bld.as_mut() {
            // Nothing is written until every layer checks out.
            let mut routes = [None; BLD_PORT_MAX];
            for layer in commit.layers {
                let slot = &mut routes[bld.check_route(layer.pipe, layer.port)?];
                if slot.is_some() {
                    error!("disp{}: pipe {} routed twice", self.id, layer.pipe);
                    return Err(DeError::InvalidArgument);
                }
                *slot = Some(layer.port);
            }

            bld.output_set_attr(cfg.width, cfg.height, cfg.format, commit.interlaced);
            for layer in commit.layers {
                bld.pipe_set_attr(layer.pipe, layer.port, &layer.rect, layer.premultiplied)?;
            }
            for (pipe, (old, new)) in self.routes.iter().zip(routes.iter()).enumerate() {
                if let (Some(port), None) = (old, new) {
                    bld.pipe_reset(pipe as u32, PipeOwner::Port(*port))?;
                }
            }
            self.routes = routes;
        }
        self.backend.apply(data, cfg)
    }

    pub fn crc_region_config(&mut self, cfg: &CrcRegionCfg) -> Result<(), DeError> {
        self.backend.crc_region_config(cfg)
    }

    pub fn check_crc_status_with_clear(&self, region_mask: u32) -> u32 {
        self.backend.check_crc_status_with_clear(region_mask)
    }

    /// Vblank tasklet body.
    pub fn tasklet(&self, state: &mut TaskletState) {
        if self.backend.is_need_update_work() {
            self.backend.process_late(state);
        }
        if self.backend.is_need_vblank_work() {
            self.backend.vblank_work(state);
        }
    }

    pub fn reg_blocks(&self) -> impl Iterator<Item = &RegBlock> + '_ {
        self.backend
            .reg_blocks()
            .chain(self.bld.iter().flat_map(|b| b.reg_blocks()))
    }

    pub fn flush(&self, sink: &mut dyn FnMut(&RegBlock)) -> usize {
        let mut n = self.backend.flush(sink);
        for block in self.bld.iter().flat_map(|b| b.reg_blocks()) {
            if block.take_dirty() {
                sink(block);
                n += 1;
            }
        }
        n
    }

    pub fn disable(&mut self) {
        self.backend.disable();
        if let Some(bld) = self.bld.as_mut() {
            for pipe in 0..bld.port_cnt() {
                // pipe < port_cnt, cannot fail
                let _ = bld.pipe_reset(pipe, PipeOwner::Any);
            }
        }
        self.routes = [None; BLD_PORT_MAX];
    }

    pub fn dump_state(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "disp{}:", self.id)?;
        if let Some(bld) = &self.bld {
            bld.dump(out)?;
        }
        self.backend.dump_state(out)
    }
}
