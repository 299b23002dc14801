use std::f64::consts::PI;
use std::path::PathBuf;

use derive_builder::Builder;
use log::{debug, info};
use noisy_float::prelude::*;
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};
use thiserror::Error;

use crate::event::FluxEvent;
use crate::four_vector::FourVector;
use crate::histogram::{
    DistributionError, Histogram2D, HistogramDistribution,
};
use crate::species::Species;
use crate::table::{load_flux_table, Grid, TableError};
use crate::three_vector::ThreeVector;
use crate::traits::GenerateFlux;

const DEFAULT_R_LONGITUDINAL: f64 = 1e3;
const DEFAULT_R_TRANSVERSE: f64 = 1e2;

/// Configuration for the atmospheric flux driver
///
/// Species without a flux table contribute zero flux, but at least one
/// table has to be given. [load](Self::load) reads the tables and
/// returns the driver itself.
#[derive(Clone, Debug, Builder)]
pub struct AtmoFluxSetup {
    /// ν_µ flux table file
    #[builder(default, setter(into, strip_option))]
    numu: Option<PathBuf>,
    /// ν̄_µ flux table file
    #[builder(default, setter(into, strip_option))]
    numubar: Option<PathBuf>,
    /// ν_e flux table file
    #[builder(default, setter(into, strip_option))]
    nue: Option<PathBuf>,
    /// ν̄_e flux table file
    #[builder(default, setter(into, strip_option))]
    nuebar: Option<PathBuf>,
    /// Radius of the generation sphere
    #[builder(default = "DEFAULT_R_LONGITUDINAL")]
    r_longitudinal: f64,
    /// Radius of the transverse displacement disk
    #[builder(default = "DEFAULT_R_TRANSVERSE")]
    r_transverse: f64,
    /// Binning of the flux tables
    #[builder(default)]
    grid: Grid,
}

impl AtmoFluxSetup {
    fn file(&self, species: Species) -> Option<&PathBuf> {
        match species {
            Species::NuMu => self.numu.as_ref(),
            Species::NuMuBar => self.numubar.as_ref(),
            Species::NuE => self.nue.as_ref(),
            Species::NuEBar => self.nuebar.as_ref(),
        }
    }

    /// Load the flux tables and construct the driver
    pub fn load<R: Rng>(&self, rng: R) -> Result<AtmoFlux<R>, LoadError> {
        let mut fluxes = Vec::with_capacity(Species::ALL.len());
        let mut ntables = 0_usize;
        for species in Species::ALL {
            let flux = match self.file(species) {
                Some(path) => {
                    info!("Loading {species} flux table from {path:?}");
                    ntables += 1;
                    load_flux_table(path, &self.grid).map_err(|source| {
                        LoadError::Table { species, source }
                    })?
                }
                None => {
                    debug!("No {species} flux table, component is zero");
                    self.grid.histogram()
                }
            };
            fluxes.push(flux);
        }
        if ntables == 0 {
            return Err(LoadError::NoTables);
        }
        let mut sum = self.grid.histogram();
        for flux in &fluxes {
            sum += flux;
        }
        info!("Combined flux table weight: {:e}", f64::from(sum.total()));
        let distribution = sum.distribution()?;
        Ok(AtmoFlux {
            fluxes,
            sum,
            distribution,
            r_longitudinal: self.r_longitudinal,
            r_transverse: self.r_transverse,
            rng,
        })
    }
}

/// Flux driver sampling from tabulated atmospheric fluxes
///
/// Energy and zenith angle are drawn jointly from the summed flux
/// table, the azimuth is uniform, and the species follows the flux
/// fractions in the selected bin. Sampled neutrinos start on a sphere
/// of radius `r_longitudinal` and point towards its centre; the
/// starting position is displaced within the transverse disk of radius
/// `r_transverse` so that the generated flux covers an extended
/// detector instead of converging on a single point.
#[derive(Clone, Debug)]
pub struct AtmoFlux<R> {
    fluxes: Vec<Histogram2D>,
    sum: Histogram2D,
    distribution: HistogramDistribution,
    r_longitudinal: f64,
    r_transverse: f64,
    rng: R,
}

impl<R: Rng> AtmoFlux<R> {
    /// The summed flux table over all species
    pub fn summed_flux(&self) -> &Histogram2D {
        &self.sum
    }

    /// The flux table for the given species
    pub fn flux(&self, species: Species) -> &Histogram2D {
        &self.fluxes[species as usize]
    }

    fn select_species(
        &mut self,
        energy: N64,
        cos_theta: N64,
    ) -> Result<Species, AtmoFluxError> {
        let mut cumulative = [n64(0.); 4];
        let mut sum = n64(0.);
        for (acc, flux) in cumulative.iter_mut().zip(&self.fluxes) {
            sum += flux.value_at(energy, cos_theta);
            *acc = sum;
        }
        if !(sum > 0.) {
            return Err(AtmoFluxError::ZeroFlux { energy, cos_theta });
        }
        let r =
            n64(Uniform::new(0., f64::from(sum)).sample(&mut self.rng));
        for (species, acc) in Species::ALL.into_iter().zip(cumulative) {
            if r < acc {
                return Ok(species);
            }
        }
        Err(AtmoFluxError::ZeroFlux { energy, cos_theta })
    }
}

impl<R: Rng> GenerateFlux for AtmoFlux<R> {
    type Error = AtmoFluxError;

    fn particles(&self) -> Vec<particle_id::ParticleID> {
        Species::ALL
            .iter()
            .zip(&self.fluxes)
            .filter(|(_, flux)| flux.total() > 0.)
            .map(|(species, _)| species.pdg_id())
            .collect()
    }

    fn max_energy(&self) -> N64 {
        self.sum.x_max()
    }

    fn generate(&mut self) -> Result<FluxEvent, Self::Error> {
        // energy and zenith angle from the combined flux table,
        // azimuth uniform over [0, 2π)
        let (energy, cos_theta) =
            self.distribution.sample(&mut self.rng);
        let phi = Uniform::new(0., 2. * PI).sample(&mut self.rng);

        let species = self.select_species(energy, cos_theta)?;

        let ev = f64::from(energy);
        let cos8 = f64::from(cos_theta);
        let sin8 = (1. - cos8 * cos8).max(0.).sqrt();
        let (sin_phi, cos_phi) = phi.sin_cos();

        // the momentum is directed towards the centre of the sphere
        let p = ThreeVector::new(
            n64(-ev * sin8 * sin_phi),
            n64(-ev * sin8 * cos_phi),
            n64(-ev * cos8),
        );

        // position on the surface of the generation sphere
        let rl = self.r_longitudinal;
        let pos = ThreeVector::new(
            n64(rl * sin8 * sin_phi),
            n64(rl * sin8 * cos_phi),
            n64(rl * cos8),
        );

        // Left as is, all generated neutrinos would point towards the
        // origin. Displace the position within the disk perpendicular
        // to it: rotate an orthogonal vector by a random angle around
        // the position and rescale it to a random transverse radius.
        let psi = Uniform::new(0., 2. * PI).sample(&mut self.rng);
        let rt = if self.r_transverse > 0. {
            Uniform::new(0., self.r_transverse).sample(&mut self.rng)
        } else {
            0.
        };
        let shift = pos
            .orthogonal()
            .rotated_around(&pos, psi)
            .with_norm(n64(rt));
        let x = pos + shift;

        let event = FluxEvent {
            id: 0,
            pid: species.pdg_id(),
            weight: n64(1.),
            p: FourVector::from_spatial(energy, p),
            x: FourVector::from_spatial(n64(0.), x),
        };
        debug!(
            "Generated {species} with E = {energy}, cos θ = {cos_theta}"
        );
        Ok(event)
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load {species} flux table: {source}")]
    Table {
        species: Species,
        source: TableError,
    },
    #[error("No flux table given for any neutrino species")]
    NoTables,
    #[error("Failed to build flux distribution: {0}")]
    Distribution(#[from] DistributionError),
}

#[derive(Debug, Error)]
pub enum AtmoFluxError {
    #[error("Vanishing flux for all species at E = {energy}, cos θ = {cos_theta}")]
    ZeroFlux { energy: N64, cos_theta: N64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;
    use tempfile::NamedTempFile;

    use crate::histogram::{linear_edges, log_edges};

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_grid() -> Grid {
        Grid::new(log_edges(0.1, 10., 4), linear_edges(-1., 1., 4))
    }

    fn write_table(flux: f64) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# E costheta flux err err").unwrap();
        for &energy in &[0.2, 0.7, 2., 7.] {
            for &cos_theta in &[-0.75, -0.25, 0.25, 0.75] {
                writeln!(
                    file,
                    "{energy} {cos_theta} {flux} 0. 0."
                )
                .unwrap();
            }
        }
        file
    }

    #[test]
    fn no_tables() {
        log_init();

        let setup = AtmoFluxSetupBuilder::default().build().unwrap();
        let rng = Xoshiro256Plus::seed_from_u64(0);
        assert!(matches!(setup.load(rng), Err(LoadError::NoTables)));
    }

    #[test]
    fn generate() {
        log_init();

        let numu = write_table(1.);
        let nuebar = write_table(3.);
        let setup = AtmoFluxSetupBuilder::default()
            .numu(numu.path())
            .nuebar(nuebar.path())
            .r_longitudinal(100.)
            .r_transverse(10.)
            .grid(test_grid())
            .build()
            .unwrap();
        let rng = Xoshiro256Plus::seed_from_u64(42);
        let mut flux = setup.load(rng).unwrap();

        assert!((f64::from(flux.max_energy()) - 10.).abs() < 1e-10);
        let particles = flux.particles();
        assert_eq!(particles.len(), 2);

        let mut nnumu = 0_u32;
        const N: u32 = 10000;
        for _ in 0..N {
            let event = flux.generate().unwrap();
            assert_eq!(event.weight, n64(1.));
            assert!(particles.contains(&event.pid));
            if event.pid == Species::NuMu.pdg_id() {
                nnumu += 1;
            }

            // within the tabulated ranges
            let energy = event.energy();
            assert!(energy > 0.09 && energy < 10.5);

            // massless and inward
            let p = event.p;
            let m2 = f64::from(p.m_sq());
            assert!(m2.abs() < 1e-10 * f64::from(energy * energy));
            let x = event.x.spatial();
            assert!(p.spatial().dot(&x) < 0.);

            // on the sphere up to a transverse shift
            let r = f64::from(x.norm());
            assert!(r >= 100. - 1e-6);
            assert!(r * r <= 100. * 100. + 10. * 10. + 1e-6);

            // the shift is perpendicular to the sphere point, which
            // lies opposite to the momentum
            let pos = (-p.spatial()).with_norm(n64(100.));
            let shift = x - pos;
            assert!(f64::from(shift.dot(&pos)).abs() < 1e-8);
            assert!(shift.norm() <= 10. + 1e-6);
        }
        // ν_µ carries a quarter of the total flux
        assert!(nnumu > N / 5);
        assert!(nnumu < N / 3);
    }

    #[test]
    fn species_fractions_follow_the_bin() {
        log_init();

        let numu = write_table(1.);
        let setup = AtmoFluxSetupBuilder::default()
            .numu(numu.path())
            .grid(test_grid())
            .build()
            .unwrap();
        let rng = Xoshiro256Plus::seed_from_u64(1);
        let mut flux = setup.load(rng).unwrap();

        // only one species is loaded, so it is always selected
        for _ in 0..100 {
            let species =
                flux.select_species(n64(0.5), n64(0.5)).unwrap();
            assert_eq!(species, Species::NuMu);
        }
        // outside the table the flux vanishes
        assert!(flux.select_species(n64(100.), n64(0.)).is_err());
    }
}
