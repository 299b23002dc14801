use crate::event::FluxEvent;

use noisy_float::prelude::*;
use particle_id::ParticleID;

/// A source of flux events
///
/// This is the seam between concrete flux drivers, like
/// [AtmoFlux](crate::atmo::AtmoFlux), and the event generation loop in
/// [generate](crate::generate).
pub trait GenerateFlux {
    type Error;

    /// The neutrino species this flux can produce
    fn particles(&self) -> Vec<ParticleID>;

    /// Upper end of the generated energy spectrum
    fn max_energy(&self) -> N64;

    /// Sample the next flux event
    fn generate(&mut self) -> Result<FluxEvent, Self::Error>;
}

/// A sink for flux events
pub trait WriteEvent {
    type Error;

    fn write(&mut self, event: &FluxEvent) -> Result<(), Self::Error>;

    /// Flush any buffered output
    fn finish(&mut self) -> Result<(), Self::Error>;
}

pub trait Progress {
    fn inc(&self, i: u64);
    fn finish(&self);
}
