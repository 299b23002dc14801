use std::convert::Infallible;

use log::debug;
use noisy_float::prelude::*;
use particle_id::ParticleID;
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};
use thiserror::Error;

use crate::event::FluxEvent;
use crate::four_vector::FourVector;
use crate::three_vector::ThreeVector;
use crate::traits::GenerateFlux;

/// A trivial flux driver for mono-energetic neutrinos along the z
/// direction
///
/// Can handle a mix of species with relative weights, so that single
/// energy neutrinos can be used with generators that expect a flux
/// driver.
#[derive(Clone, Debug)]
pub struct MonoFlux<R> {
    energy: N64,
    // cumulative weights, in the order the species were given
    cumulative: Vec<(ParticleID, f64)>,
    total: f64,
    rng: R,
}

impl<R: Rng> MonoFlux<R> {
    /// A flux of several species with the given relative weights
    pub fn new(
        energy: f64,
        spectrum: &[(ParticleID, f64)],
        rng: R,
    ) -> Result<Self, MonoFluxError> {
        if !(energy > 0.) {
            return Err(MonoFluxError::BadEnergy(energy));
        }
        if spectrum.is_empty() {
            return Err(MonoFluxError::EmptySpectrum);
        }
        let mut total = 0.;
        let mut cumulative = Vec::with_capacity(spectrum.len());
        for &(pid, weight) in spectrum {
            if !(weight > 0.) {
                return Err(MonoFluxError::BadWeight { pid, weight });
            }
            total += weight;
            cumulative.push((pid, total));
        }
        debug!("Mono-energetic flux at E = {energy} with {} species", cumulative.len());
        Ok(Self {
            energy: n64(energy),
            cumulative,
            total,
            rng,
        })
    }

    /// A single-species flux
    pub fn single(
        energy: f64,
        pid: ParticleID,
        rng: R,
    ) -> Result<Self, MonoFluxError> {
        Self::new(energy, &[(pid, 1.)], rng)
    }
}

impl<R: Rng> GenerateFlux for MonoFlux<R> {
    type Error = Infallible;

    fn particles(&self) -> Vec<ParticleID> {
        self.cumulative.iter().map(|(pid, _)| *pid).collect()
    }

    fn max_energy(&self) -> N64 {
        self.energy
    }

    fn generate(&mut self) -> Result<FluxEvent, Self::Error> {
        let pid = if self.cumulative.len() == 1 {
            self.cumulative[0].0
        } else {
            let r = Uniform::new(0., self.total).sample(&mut self.rng);
            self.cumulative
                .iter()
                .find(|(_, acc)| r < *acc)
                .map(|(pid, _)| *pid)
                // r < total is guaranteed by the sampling range
                .unwrap_or(self.cumulative[self.cumulative.len() - 1].0)
        };
        let p = ThreeVector::new(n64(0.), n64(0.), self.energy);
        Ok(FluxEvent {
            id: 0,
            pid,
            weight: n64(1.),
            p: FourVector::from_spatial(self.energy, p),
            x: FourVector::new(),
        })
    }
}

#[derive(Debug, Error)]
pub enum MonoFluxError {
    #[error("Non-positive flux energy: {0}")]
    BadEnergy(f64),
    #[error("No species in mono-energetic flux")]
    EmptySpectrum,
    #[error("Non-positive weight {weight} for species {}", .pid.id())]
    BadWeight { pid: ParticleID, weight: f64 },
}
