pub use crate::{
    atmo::{AtmoFlux, AtmoFluxSetup, AtmoFluxSetupBuilder},
    generate::{Generator, GeneratorBuilder},
    mono::MonoFlux,
    species::Species,
    traits::{GenerateFlux, WriteEvent},
    writer::FileWriter,
};
