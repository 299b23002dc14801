use crate::four_vector::FourVector;

use noisy_float::prelude::*;
use particle_id::ParticleID;
use serde::{Deserialize, Serialize};

/// A single sampled flux neutrino
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Serialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
)]
pub struct FluxEvent {
    /// Position in the generated sample, assigned by the generation loop
    pub id: usize,
    /// PDG Monte Carlo code of the neutrino
    pub pid: ParticleID,
    /// Event weight
    pub weight: N64,
    /// Four-momentum
    pub p: FourVector,
    /// Starting four-position
    pub x: FourVector,
}

impl FluxEvent {
    /// The neutrino energy
    pub fn energy(&self) -> N64 {
        self.p[0]
    }
}
