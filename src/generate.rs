use log::info;
use thiserror::Error;

use crate::progress_bar::{Progress, ProgressBar};
use crate::traits::{GenerateFlux, WriteEvent};

/// Builder for the event generation loop
///
/// `flux` decides what is sampled, `writer` where it ends up.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct GeneratorBuilder<F, W> {
    pub flux: F,
    pub writer: W,
    pub events: u64,
}

impl<F, W> GeneratorBuilder<F, W> {
    pub fn build(self) -> Generator<F, W> {
        Generator {
            flux: self.flux,
            writer: self.writer,
            events: self.events,
        }
    }
}

impl<F, W> From<Generator<F, W>> for GeneratorBuilder<F, W> {
    fn from(g: Generator<F, W>) -> Self {
        GeneratorBuilder {
            flux: g.flux,
            writer: g.writer,
            events: g.events,
        }
    }
}

/// The event generation loop
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Generator<F, W> {
    flux: F,
    writer: W,
    events: u64,
}

impl<F, W> From<GeneratorBuilder<F, W>> for Generator<F, W> {
    fn from(b: GeneratorBuilder<F, W>) -> Self {
        b.build()
    }
}

#[derive(Debug, Error)]
pub enum GenerateError<E1, E2> {
    #[error("Failed to generate flux event: {0}")]
    FluxErr(E1),
    #[error("Failed to write event: {0}")]
    WriteErr(E2),
}

impl<F, W> Generator<F, W>
where
    F: GenerateFlux,
    W: WriteEvent,
{
    /// Sample the configured number of events and write them out
    pub fn run(
        &mut self,
    ) -> Result<(), GenerateError<F::Error, W::Error>> {
        use GenerateError::*;

        info!("Generating {} flux events", self.events);

        let progress = ProgressBar::new(self.events, "events generated:");
        for id in 0..self.events {
            let mut event =
                self.flux.generate().map_err(FluxErr)?;
            event.id = id as usize;
            self.writer.write(&event).map_err(WriteErr)?;
            progress.inc(1);
        }
        progress.finish();

        self.writer.finish().map_err(WriteErr)?;
        info!("Generated {} events", self.events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use particle_id::sm_elementary_particles::muon_neutrino;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    use crate::event::FluxEvent;
    use crate::mono::MonoFlux;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[derive(Default)]
    struct CollectEvents {
        events: Vec<FluxEvent>,
        finished: bool,
    }

    impl WriteEvent for CollectEvents {
        type Error = std::convert::Infallible;

        fn write(&mut self, event: &FluxEvent) -> Result<(), Self::Error> {
            self.events.push(*event);
            Ok(())
        }

        fn finish(&mut self) -> Result<(), Self::Error> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn run() {
        log_init();

        let rng = Xoshiro256Plus::seed_from_u64(0);
        let flux = MonoFlux::single(1., muon_neutrino, rng).unwrap();
        let mut generator = GeneratorBuilder {
            flux,
            writer: CollectEvents::default(),
            events: 10,
        }
        .build();
        generator.run().unwrap();

        let writer = &generator.writer;
        assert!(writer.finished);
        assert_eq!(writer.events.len(), 10);
        // ids follow the generation order
        for (id, event) in writer.events.iter().enumerate() {
            assert_eq!(event.id, id);
        }
    }
}
