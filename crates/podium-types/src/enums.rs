//! Enumeration types for the competition document.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Apparatus
// ---------------------------------------------------------------------------

/// A piece of gymnastics apparatus that can be configured on a stage.
///
/// The set is closed. The order of apparatus within a stage is not given
/// by this enum but by the stage configuration (see `Stage::apparatuses`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Apparatus {
    /// Floor exercise.
    Floor,
    /// Pommel horse.
    PommelHorse,
    /// Still rings.
    Rings,
    /// Vault table.
    Vault,
    /// Parallel bars.
    ParallelBars,
    /// Horizontal bar.
    HighBar,
    /// Uneven bars.
    UnevenBars,
    /// Balance beam.
    Beam,
    /// Mini trampoline.
    MiniTrampoline,
    /// Rest slot: teams sit out one rotation here.
    Rest,
}

impl Apparatus {
    /// Every apparatus variant, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Floor,
        Self::PommelHorse,
        Self::Rings,
        Self::Vault,
        Self::ParallelBars,
        Self::HighBar,
        Self::UnevenBars,
        Self::Beam,
        Self::MiniTrampoline,
        Self::Rest,
    ];

    /// Whether this apparatus only takes part in a rotation when the
    /// rotation explicitly lists it.
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::Rest)
    }

    /// Human-readable name in the given display language.
    pub const fn label(self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                Self::Floor => "Floor",
                Self::PommelHorse => "Pommel horse",
                Self::Rings => "Rings",
                Self::Vault => "Vault",
                Self::ParallelBars => "Parallel bars",
                Self::HighBar => "High bar",
                Self::UnevenBars => "Uneven bars",
                Self::Beam => "Beam",
                Self::MiniTrampoline => "Mini trampoline",
                Self::Rest => "Rest",
            },
            Locale::De => match self {
                Self::Floor => "Boden",
                Self::PommelHorse => "Pauschenpferd",
                Self::Rings => "Ringe",
                Self::Vault => "Sprung",
                Self::ParallelBars => "Barren",
                Self::HighBar => "Reck",
                Self::UnevenBars => "Stufenbarren",
                Self::Beam => "Balken",
                Self::MiniTrampoline => "Minitrampolin",
                Self::Rest => "Pause",
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Display language for labels and status texts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// German.
    De,
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Gender recorded at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Gender {
    /// Female.
    Female,
    /// Male.
    Male,
    /// Diverse.
    Diverse,
}

// ---------------------------------------------------------------------------
// Bar menu
// ---------------------------------------------------------------------------

/// Grouping of bar menu items on the menu screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MenuSection {
    /// Cold and hot drinks.
    Drinks,
    /// Warm food.
    Food,
    /// Snacks.
    Snacks,
    /// Cakes and sweets.
    Sweets,
}
