use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};

/// Named cost components reported in a breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Component {
    Harmonic,
    SameArtist,
    SameAlbum,
    Energy,
    Tempo,
    Genre,
    PositionBias,
}

/// Weighted, normalized cost of an ordering (or a range of one), per component.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: f64,

    // Transition components
    pub harmonic: f64,
    pub same_artist: f64,
    pub same_album: f64,
    pub energy: f64,
    pub tempo: f64,
    pub genre: f64,

    // Opening bias (not a transition)
    pub position_bias: f64,
}

impl ScoreBreakdown {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::Harmonic => self.harmonic,
            Component::SameArtist => self.same_artist,
            Component::SameAlbum => self.same_album,
            Component::Energy => self.energy,
            Component::Tempo => self.tempo,
            Component::Genre => self.genre,
            Component::PositionBias => self.position_bias,
        }
    }

    /// `(component, value)` pairs in declaration order.
    pub fn components(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
        Component::iter().map(move |c| (c, self.get(c)))
    }

    /// Sum of the components; equal to `total` up to rounding.
    pub fn component_sum(&self) -> f64 {
        self.components().map(|(_, v)| v).sum()
    }
}
