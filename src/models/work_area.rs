//! Surface categories and workflow phases.
//!
//! A [`WorkArea`] is the coarse surface/material bucket consulted by the
//! drying rules. A [`WorkflowPhase`] is the coarse ordering bucket used to
//! sequence work inside a room; its rank comes from
//! [`PHASE_ORDER`](crate::policy::PHASE_ORDER).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::policy::PHASE_ORDER;

/// Surface or material category of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkArea {
    /// Wall surfaces.
    Wall,
    /// Ceiling surfaces.
    Ceiling,
    /// Floor surfaces (a curing floor makes the whole room unusable).
    Floor,
    /// Window frames and sashes.
    Window,
    /// Doors and door frames.
    Door,
    /// Lacquer / enamel coats.
    PaintCoat,
    /// Spackle, filler and other substrate fills.
    SubstrateFill,
    /// Primer coats.
    Primer,
    /// Wallpapering.
    Wallpaper,
    /// Coating work that could not be attributed to a specific surface.
    GenericCoat,
}

/// Keyword table for deriving a work area from a service name.
///
/// Checked top to bottom; the first matching row wins, so compound names
/// such as "Türlack" resolve to the treatment before the surface.
const AREA_KEYWORDS: &[(WorkArea, &[&str])] = &[
    (WorkArea::SubstrateFill, &["spachtel", "spackle", "filler", "joint compound"]),
    (WorkArea::Primer, &["grundier", "tiefgrund", "primer"]),
    (WorkArea::Wallpaper, &["tapete", "tapezier", "wallpaper"]),
    (WorkArea::PaintCoat, &["lack", "lacquer", "varnish", "enamel"]),
    (WorkArea::Floor, &["boden", "floor"]),
    (WorkArea::Window, &["fenster", "window"]),
    (WorkArea::Door, &["tür", "tuer", "door"]),
    (WorkArea::Ceiling, &["decke", "ceiling"]),
    (WorkArea::Wall, &["wand", "wände", "wall"]),
];

impl WorkArea {
    /// Stable kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkArea::Wall => "wall",
            WorkArea::Ceiling => "ceiling",
            WorkArea::Floor => "floor",
            WorkArea::Window => "window",
            WorkArea::Door => "door",
            WorkArea::PaintCoat => "paint-coat",
            WorkArea::SubstrateFill => "substrate-fill",
            WorkArea::Primer => "primer",
            WorkArea::Wallpaper => "wallpaper",
            WorkArea::GenericCoat => "generic-coat",
        }
    }

    /// Derives the work area from a service name, if any keyword matches.
    pub fn from_service_name(name: &str) -> Option<Self> {
        let lowered = name.to_lowercase();
        AREA_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(area, _)| *area)
    }

    /// Whether work on this area counts as a room-surface coating.
    pub fn is_room_surface(&self) -> bool {
        matches!(
            self,
            WorkArea::Wall | WorkArea::Ceiling | WorkArea::GenericCoat
        )
    }
}

impl fmt::Display for WorkArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse ordering bucket for work inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowPhase {
    Setup,
    Prep,
    Demolition,
    Substrate,
    Primer,
    Wallpapering,
    #[default]
    Coating,
    FinishPainting,
    Cleanup,
}

impl WorkflowPhase {
    /// Rank in the phase order (lower runs first).
    pub fn priority(&self) -> u8 {
        PHASE_ORDER
            .iter()
            .position(|p| p == self)
            .map(|i| i as u8)
            .unwrap_or(u8::MAX)
    }

    /// Whether this phase runs after the substrate phase.
    pub fn is_after_substrate(&self) -> bool {
        self.priority() > WorkflowPhase::Substrate.priority()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowPhase::Setup => "setup",
            WorkflowPhase::Prep => "prep",
            WorkflowPhase::Demolition => "demolition",
            WorkflowPhase::Substrate => "substrate",
            WorkflowPhase::Primer => "primer",
            WorkflowPhase::Wallpapering => "wallpapering",
            WorkflowPhase::Coating => "coating",
            WorkflowPhase::FinishPainting => "finish-painting",
            WorkflowPhase::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
