use std::path::PathBuf;
use std::str::FromStr;

use atmoflux::compression::{Compression, ParseCompressionErr};
use atmoflux::species::Species;
use atmoflux::writer::OutputFormat;

use clap::{Parser, ValueEnum};
use thiserror::Error;

pub(crate) fn parse_compr(
    s: &str,
) -> Result<Compression, ParseCompressionErr> {
    s.parse()
}

#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, ValueEnum,
)]
pub(crate) enum FileFormat {
    #[default]
    Text,
    Yaml,
}

impl From<FileFormat> for OutputFormat {
    fn from(source: FileFormat) -> Self {
        match source {
            FileFormat::Text => OutputFormat::Text,
            FileFormat::Yaml => OutputFormat::Yaml,
        }
    }
}

/// A species with a relative weight, given as `species=weight`
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub(crate) struct SpeciesWeight {
    pub(crate) species: Species,
    pub(crate) weight: f64,
}

impl FromStr for SpeciesWeight {
    type Err = ParseSpeciesWeightErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ParseSpeciesWeightErr::*;
        let (species, weight) = match s.split_once('=') {
            Some((species, weight)) => {
                let weight = weight
                    .parse()
                    .map_err(|_| BadWeight(weight.to_owned()))?;
                (species, weight)
            }
            None => (s, 1.),
        };
        let species = species
            .parse()
            .map_err(|_| UnknownSpecies(species.to_owned()))?;
        Ok(SpeciesWeight { species, weight })
    }
}

#[derive(Debug, Clone, Error)]
pub(crate) enum ParseSpeciesWeightErr {
    #[error("Unknown neutrino species: {0}")]
    UnknownSpecies(String),
    #[error("Failed to parse weight: {0}")]
    BadWeight(String),
}

#[derive(Debug, Copy, Clone, Parser)]
pub(crate) struct SphereOpt {
    /// Radius of the generation sphere.
    ///
    /// Sampled neutrinos start on the surface of a sphere with this
    /// radius and point towards its centre.
    #[clap(long, default_value = "1000.")]
    pub(crate) r_longitudinal: f64,

    /// Radius of the transverse displacement disk.
    ///
    /// Starting positions are smeared within a disk of this radius
    /// perpendicular to the flight direction.
    #[clap(long, default_value = "100.")]
    pub(crate) r_transverse: f64,
}

#[derive(Debug, Copy, Clone, Parser)]
pub(crate) struct MonoOpt {
    /// Generate a mono-energetic flux with this energy instead of
    /// sampling flux tables.
    #[clap(long)]
    pub(crate) mono_energy: Option<f64>,
}

#[derive(Debug, Clone, Parser)]
#[clap(about, author, version)]
pub(crate) struct Opt {
    /// Output file
    #[clap(long, short, value_parser)]
    pub(crate) outfile: PathBuf,

    /// ν_µ flux table
    #[clap(long, value_parser)]
    pub(crate) numu: Option<PathBuf>,

    /// ν̄_µ flux table
    #[clap(long, value_parser)]
    pub(crate) numubar: Option<PathBuf>,

    /// ν_e flux table
    #[clap(long, value_parser)]
    pub(crate) nue: Option<PathBuf>,

    /// ν̄_e flux table
    #[clap(long, value_parser)]
    pub(crate) nuebar: Option<PathBuf>,

    #[clap(flatten)]
    pub(crate) sphere: SphereOpt,

    #[clap(flatten)]
    pub(crate) mono: MonoOpt,

    /// Species mix for the mono-energetic flux.
    ///
    /// Comma-separated list of `species` or `species=weight` entries,
    /// e.g. 'numu=2,nuebar'. Species are selected with probabilities
    /// proportional to their weights.
    #[clap(long, value_delimiter = ',', default_value = "numu")]
    pub(crate) mono_spectrum: Vec<SpeciesWeight>,

    /// Number of events to generate
    #[clap(short = 'n', long, default_value = "10000")]
    pub(crate) events: u64,

    /// Random number generator seed
    #[clap(short, long, default_value = "0")]
    pub(crate) seed: u64,

    /// Output format
    #[clap(value_enum, short, long, default_value = "text")]
    pub(crate) format: FileFormat,

    #[clap(long, value_parser = parse_compr,
           help = "Compress output file.
Possible settings are 'bzip2', 'gzip', 'zstd', 'lz4'.
Compression levels can be set with algorithm_level e.g. 'zstd_5'.
Maximum levels are 'gzip_9', 'zstd_19', 'lz4_16'.")]
    pub(crate) compression: Option<Compression>,

    /// Verbosity level
    #[clap(
        short,
        long,
        default_value = "Info",
        help = "Verbosity level.
Possible values with increasing amount of output are
'off', 'error', 'warn', 'info', 'debug', 'trace'.\n"
    )]
    pub(crate) loglevel: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn species_weights() {
        let sw: SpeciesWeight = "numu=2.5".parse().unwrap();
        assert_eq!(sw.species, Species::NuMu);
        assert_eq!(sw.weight, 2.5);

        let sw: SpeciesWeight = "nuebar".parse().unwrap();
        assert_eq!(sw.species, Species::NuEBar);
        assert_eq!(sw.weight, 1.);

        assert!("nutau".parse::<SpeciesWeight>().is_err());
        assert!("numu=heavy".parse::<SpeciesWeight>().is_err());
    }
}
