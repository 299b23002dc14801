use particle_id::{
    sm_elementary_particles::{electron_neutrino, muon_neutrino},
    ParticleID,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The neutrino species with tabulated atmospheric fluxes
#[derive(
    Copy,
    Clone,
    Debug,
    Deserialize,
    Display,
    EnumString,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum Species {
    NuMu,
    NuMuBar,
    NuE,
    NuEBar,
}

impl Species {
    /// All species, in the order used for table bookkeeping
    pub const ALL: [Species; 4] =
        [Self::NuMu, Self::NuMuBar, Self::NuE, Self::NuEBar];

    /// The PDG Monte Carlo code
    pub fn pdg_id(self) -> ParticleID {
        match self {
            Self::NuMu => muon_neutrino,
            Self::NuMuBar => ParticleID::new(-muon_neutrino.id()),
            Self::NuE => electron_neutrino,
            Self::NuEBar => ParticleID::new(-electron_neutrino.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdg_codes() {
        assert_eq!(Species::NuE.pdg_id().id(), 12);
        assert_eq!(Species::NuEBar.pdg_id().id(), -12);
        assert_eq!(Species::NuMu.pdg_id().id(), 14);
        assert_eq!(Species::NuMuBar.pdg_id().id(), -14);
        for species in Species::ALL {
            assert!(species.pdg_id().abs().is_neutrino());
        }
    }

    #[test]
    fn names() {
        assert_eq!(Species::NuMuBar.to_string(), "numubar");
        assert_eq!("nuebar".parse(), Ok(Species::NuEBar));
    }
}
