//! `atmoflux` samples neutrino energies, directions and starting
//! positions from tabulated atmospheric flux predictions, for use as
//! the primary-flux stage of a neutrino event generator.
//!
//! # How to use
//!
//! Probably the best way to get started is to look at the examples,
//! starting with `demos/minimal.rs`.
//!
//! ## Most relevant modules
//!
//! - [prelude] exports a list of the most relevant classes and objects
//! - [atmo] contains the atmospheric flux driver
//! - [mono] contains a trivial mono-energetic flux driver
//! - [table] reads tabulated fluxes from (possibly compressed) text files
//! - [histogram] defines the binned flux tables and how they are sampled
//! - [generate] runs a flux driver and writes the sampled events
//!

/// The atmospheric flux driver
pub mod atmo;
/// Output compression
pub mod compression;
/// Sampled flux event record
pub mod event;
/// Four-vector class
pub mod four_vector;
/// Event generation loop
pub mod generate;
/// Binned 2-D flux tables
pub mod histogram;
/// Mono-energetic flux driver
pub mod mono;
/// Most important exports
pub mod prelude;
/// Progress bar
pub mod progress_bar;
/// Neutrino species bookkeeping
pub mod species;
/// Flux table files
pub mod table;
/// Three-vector class
pub mod three_vector;
/// Common traits
pub mod traits;
/// Event writer
pub mod writer;

use lazy_static::lazy_static;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
lazy_static! {
    pub static ref VERSION_MAJOR: u32 =
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap();
    pub static ref VERSION_MINOR: u32 =
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap();
    pub static ref VERSION_PATCH: u32 =
        env!("CARGO_PKG_VERSION_PATCH").parse().unwrap();
}
pub const GIT_REV: Option<&str> = option_env!("VERGEN_GIT_SHA");
pub const GIT_BRANCH: Option<&str> = option_env!("VERGEN_GIT_BRANCH");
