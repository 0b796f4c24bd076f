use super::DeVersion;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChnKind {
    Video,
    Ui,
}

/// Identity of an overlay channel feeding the channel mux.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChnId {
    pub kind: ChnKind,
    pub index: u32,
}

const fn v(index: u32) -> ChnId {
    ChnId {
        kind: ChnKind::Video,
        index,
    }
}

const fn u(index: u32) -> ChnId {
    ChnId {
        kind: ChnKind::Ui,
        index,
    }
}

/// Channel-configuration mode of a DE instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChnMuxMode {
    /// Routing that holds in every mode.
    Fixed,
    Mode(u8),
}

/// Mux ports in index order for one channel mode.
#[derive(Copy, Clone, Debug)]
pub struct BldMuxEntry {
    pub mode: ChnMuxMode,
    pub ports: &'static [ChnId],
}

#[derive(Copy, Clone, Debug)]
pub struct BldDesc {
    pub port_cnt: u32,
    pub modes: &'static [BldMuxEntry],
}

impl BldDesc {
    /// Mux port of `chn` in channel mode `mode`. Fixed entries apply to
    /// every mode and are searched alongside the mode-specific ones.
    pub fn mux_port(&self, mode: u8, chn: ChnId) -> Option<u32> {
        self.modes
            .iter()
            .filter(|e| e.mode == ChnMuxMode::Fixed || e.mode == ChnMuxMode::Mode(mode))
            .find_map(|e| e.ports.iter().position(|&c| c == chn))
            .map(|i| i as u32)
    }
}

static DE201_BLD: [BldDesc; 2] = [
    BldDesc {
        port_cnt: 4,
        modes: &[BldMuxEntry {
            mode: ChnMuxMode::Fixed,
            ports: &[v(0), u(0), u(1), u(2)],
        }],
    },
    BldDesc {
        port_cnt: 2,
        modes: &[BldMuxEntry {
            mode: ChnMuxMode::Fixed,
            ports: &[v(0), u(0)],
        }],
    },
];

static DE35X_BLD: [BldDesc; 2] = [
    BldDesc {
        port_cnt: 6,
        modes: &[
            BldMuxEntry {
                mode: ChnMuxMode::Mode(0),
                ports: &[v(0), v(1), v(2), u(0), u(1), u(2)],
            },
            BldMuxEntry {
                mode: ChnMuxMode::Mode(1),
                ports: &[v(0), v(1), u(0), u(1)],
            },
        ],
    },
    BldDesc {
        port_cnt: 4,
        modes: &[
            BldMuxEntry {
                mode: ChnMuxMode::Mode(0),
                ports: &[v(3), u(3)],
            },
            BldMuxEntry {
                mode: ChnMuxMode::Mode(1),
                ports: &[v(2), v(3), u(2), u(3)],
            },
        ],
    },
];

pub fn bld_desc(version: DeVersion, id: u32) -> Option<&'static BldDesc> {
    let table: &[BldDesc] = match version {
        DeVersion::De201 => &DE201_BLD,
        DeVersion::De350 | DeVersion::De352 | DeVersion::De355 => &DE35X_BLD,
    };
    table.get(id as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_and_mode_entries_are_both_searched() {
        let dsc = const {
            BldDesc {
                port_cnt: 4,
                modes: &[
                    BldMuxEntry {
                        mode: ChnMuxMode::Fixed,
                        ports: &[v(0)],
                    },
                    BldMuxEntry {
                        mode: ChnMuxMode::Mode(1),
                        ports: &[v(0), v(1), u(0)],
                    },
                ],
            }
        };
        assert_eq!(dsc.mux_port(1, v(0)), Some(0));
        assert_eq!(dsc.mux_port(1, u(0)), Some(2));
        assert_eq!(dsc.mux_port(0, u(0)), None);
        assert_eq!(dsc.mux_port(0, v(0)), Some(0));
    }
}
