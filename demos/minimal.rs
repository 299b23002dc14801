// minimal example for atmospheric flux sampling
// run with `cargo run --release --example minimal -- NUMU_TABLE OUT.dat`
// set the environment variable `RUST_LOG=info` for command-line output
use std::error::Error;

use atmoflux::prelude::*;
use atmoflux::writer::FileWriter;

use env_logger;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn main() -> Result<(), Box<dyn Error>> {
    // initialise logging from the RUST_LOG environment variable
    env_logger::init();

    // access command line arguments, ignoring the program name
    let mut args = std::env::args().skip(1);
    let table = args.next().unwrap();
    let outfile = args.next().unwrap();

    // Which flux tables to sample from
    let setup = AtmoFluxSetupBuilder::default().numu(table).build()?;

    // Load the tables; the driver owns its random number generator
    let flux = setup.load(Xoshiro256Plus::seed_from_u64(0))?;

    // Where to write the output
    let writer = FileWriter::builder().filename(outfile.into()).build();

    let mut generator = GeneratorBuilder {
        flux,
        writer,
        events: 1000,
    }
    .build();
    // Sample the events
    generator.run()?;
    Ok(())
}
