mod opt;

use crate::opt::Opt;

use anyhow::{bail, Context, Result};
use atmoflux::prelude::*;
use atmoflux::{GIT_BRANCH, GIT_REV, VERSION};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn main() -> Result<()> {
    let args = argfile::expand_args_from(
        std::env::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    )
    .with_context(|| "Failed to read argument file")?;
    let opt = Opt::parse_from(args);

    let env = Env::default().filter_or("ATMOFLUX_LOG", &opt.loglevel);
    env_logger::init_from_env(env);

    if let (Some(rev), Some(branch)) = (GIT_REV, GIT_BRANCH) {
        info!("atmoflux {VERSION} rev {rev} ({branch})");
    } else {
        info!("atmoflux {VERSION}");
    }

    debug!("settings: {:#?}", opt);

    let rng = Xoshiro256Plus::seed_from_u64(opt.seed);

    let writer = FileWriter::builder()
        .filename(opt.outfile.clone())
        .format(opt.format.into())
        .compression(opt.compression)
        .build();

    if let Some(energy) = opt.mono.mono_energy {
        let spectrum: Vec<_> = opt
            .mono_spectrum
            .iter()
            .map(|sw| (sw.species.pdg_id(), sw.weight))
            .collect();
        let flux = MonoFlux::new(energy, &spectrum, rng)?;
        run(flux, writer, opt.events)
    } else {
        let mut setup = AtmoFluxSetupBuilder::default();
        setup
            .r_longitudinal(opt.sphere.r_longitudinal)
            .r_transverse(opt.sphere.r_transverse);
        if let Some(file) = opt.numu.clone() {
            setup.numu(file);
        }
        if let Some(file) = opt.numubar.clone() {
            setup.numubar(file);
        }
        if let Some(file) = opt.nue.clone() {
            setup.nue(file);
        }
        if let Some(file) = opt.nuebar.clone() {
            setup.nuebar(file);
        }
        let setup = setup.build()?;
        let flux = match setup.load(rng) {
            Ok(flux) => flux,
            Err(atmoflux::atmo::LoadError::NoTables) => bail!(
                "Give at least one flux table (--numu, --numubar, --nue, --nuebar) or use --mono-energy"
            ),
            Err(err) => return Err(err.into()),
        };
        run(flux, writer, opt.events)
    }
}

fn run<F>(flux: F, writer: FileWriter, events: u64) -> Result<()>
where
    F: GenerateFlux,
    F::Error: std::error::Error + Send + Sync + 'static,
{
    let mut generator = GeneratorBuilder {
        flux,
        writer,
        events,
    }
    .build();
    generator.run()?;
    info!("done");
    Ok(())
}
