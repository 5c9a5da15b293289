//! Layout modes and the map surface they produce.

use std::fmt;

use serde::Serialize;

/// Screen layout, chosen from viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Desktop,
    Mobile,
}

impl LayoutMode {
    /// Widths strictly below `breakpoint_px` are mobile.
    pub fn for_width(width_px: u32, breakpoint_px: u32) -> Self {
        if width_px < breakpoint_px {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Desktop => write!(f, "desktop"),
            Self::Mobile => write!(f, "mobile"),
        }
    }
}

/// Which panel the mobile layout shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MobilePanel {
    #[default]
    List,
    Map,
}

impl MobilePanel {
    pub fn toggled(self) -> Self {
        match self {
            Self::List => Self::Map,
            Self::Map => Self::List,
        }
    }
}

/// Sub-state of the vehicle list the map sits beside.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListState {
    #[default]
    Loading,
    Failed(String),
    Ready,
}

/// The map surface to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum MapSurface {
    /// Side panel map, always shown.
    DesktopPanel,

    /// Mobile map. Mounted even when hidden; `map_key` changes on every
    /// list/map transition.
    Mobile {
        panel: MobilePanel,
        map_visible: bool,
        map_key: u64,
    },
}

impl MapSurface {
    pub fn is_map_visible(&self) -> bool {
        match self {
            Self::DesktopPanel => true,
            Self::Mobile { map_visible, .. } => *map_visible,
        }
    }
}
