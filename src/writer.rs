use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use strum::Display;
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::compression::{compress_writer, Compression};
use crate::event::FluxEvent;
use crate::traits::WriteEvent;

/// Supported output formats
#[derive(
    Copy, Clone, Debug, Default, Display, Eq, PartialEq, Ord, PartialOrd, Hash,
)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Whitespace-separated columns with a single `#` header line
    #[default]
    Text,
    /// A YAML document per event
    Yaml,
}

const TEXT_HEADER: &str = "# id pdg weight e px py pz t x y z";

/// Writer of sampled flux events to a file
///
/// The output file is created on the first write.
#[derive(TypedBuilder)]
pub struct FileWriter {
    filename: PathBuf,
    #[builder(default)]
    format: OutputFormat,
    #[builder(default)]
    compression: Option<Compression>,
    #[builder(default, setter(skip))]
    sink: Option<Box<dyn Write>>,
}

impl FileWriter {
    fn open(&mut self) -> Result<(), WriteError> {
        let file = File::create(&self.filename)
            .map_err(WriteError::CreateErr)?;
        let mut sink = compress_writer(
            BufWriter::new(file),
            self.compression,
        )
        .map_err(WriteError::CreateErr)?;
        if self.format == OutputFormat::Text {
            writeln!(sink, "{TEXT_HEADER}")?;
        }
        self.sink = Some(sink);
        Ok(())
    }

    fn write_text(
        sink: &mut impl Write,
        event: &FluxEvent,
    ) -> Result<(), WriteError> {
        let p = &event.p;
        let x = &event.x;
        writeln!(
            sink,
            "{} {} {:e} {:e} {:e} {:e} {:e} {:e} {:e} {:e} {:e}",
            event.id,
            event.pid.id(),
            f64::from(event.weight),
            f64::from(p[0]),
            f64::from(p[1]),
            f64::from(p[2]),
            f64::from(p[3]),
            f64::from(x[0]),
            f64::from(x[1]),
            f64::from(x[2]),
            f64::from(x[3]),
        )?;
        Ok(())
    }
}

impl WriteEvent for FileWriter {
    type Error = WriteError;

    fn write(&mut self, event: &FluxEvent) -> Result<(), Self::Error> {
        if self.sink.is_none() {
            self.open()?;
        }
        // the sink is always initialized here
        let Some(sink) = self.sink.as_mut() else {
            unreachable!()
        };
        match self.format {
            OutputFormat::Text => Self::write_text(sink, event),
            OutputFormat::Yaml => {
                writeln!(sink, "---")?;
                serde_yaml::to_writer(sink, event)?;
                Ok(())
            }
        }
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        if let Some(sink) = self.sink.as_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create output file: {0}")]
    CreateErr(std::io::Error),
    #[error("IO error: {0}")]
    IoErr(#[from] std::io::Error),
    #[error("Failed to write YAML record: {0}")]
    YamlErr(#[from] serde_yaml::Error),
}
