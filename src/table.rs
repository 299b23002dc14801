use std::io::{BufRead, BufReader};
use std::path::Path;

use audec::auto_decompress;
use log::{debug, trace};
use nom::{
    character::complete::{space0, space1},
    number::complete::double,
    sequence::preceded,
    IResult,
};
use noisy_float::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::histogram::{linear_edges, log_edges, Histogram2D};

/// Binning of the tabulated fluxes
///
/// The first axis is the neutrino energy, the second the cosine of the
/// zenith angle.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Grid {
    energy_edges: Vec<N64>,
    cos_theta_edges: Vec<N64>,
}

impl Default for Grid {
    /// The grid of the Bartol 3-D flux release: ten energy bins per
    /// decade between 0.1 GeV and 10 TeV, cos θ bins of width 0.1
    fn default() -> Self {
        Self::new(log_edges(1e-1, 1e4, 50), linear_edges(-1., 1., 20))
    }
}

impl Grid {
    /// Construct a grid with the given bin edges
    ///
    /// Edges have to be strictly ascending, with at least two per axis.
    pub fn new(energy_edges: Vec<N64>, cos_theta_edges: Vec<N64>) -> Self {
        let grid = Self {
            energy_edges,
            cos_theta_edges,
        };
        // the histogram constructor checks the edges
        grid.histogram();
        grid
    }

    /// An empty flux table with this binning
    pub fn histogram(&self) -> Histogram2D {
        Histogram2D::new(
            self.energy_edges.clone(),
            self.cos_theta_edges.clone(),
        )
    }

    /// The upper end of the energy grid
    pub fn max_energy(&self) -> N64 {
        self.energy_edges[self.energy_edges.len() - 1]
    }
}

/// Read a flux table in the Bartol column format
///
/// The first line is a header and is ignored. Each following non-empty
/// line has five whitespace-separated columns: energy, cos θ, flux and
/// two error estimates, which are discarded. Fluxes are tabulated per
/// unit log-energy, so each value is divided by its energy before it is
/// stored.
pub fn read_flux_table<R: BufRead>(
    input: R,
    grid: &Grid,
) -> Result<Histogram2D, TableError> {
    let mut hist = grid.histogram();
    let mut entries = 0_usize;
    for (num, line) in input.lines().enumerate() {
        let line = line?;
        if num == 0 || line.trim().is_empty() {
            continue;
        }
        let Some((energy, cos_theta, flux)) =
            flux_entry(&line).ok().map(|(_rest, entry)| entry)
        else {
            return Err(TableError::ParseErr {
                line: num + 1,
                content: line,
            });
        };
        // `double` accepts nan and inf, which must not reach the n64
        // conversions below
        if ![energy, cos_theta, flux].iter().all(|v| v.is_finite()) {
            return Err(TableError::ParseErr {
                line: num + 1,
                content: line,
            });
        }
        if energy <= 0. {
            return Err(TableError::BadEnergy {
                line: num + 1,
                energy,
            });
        }
        // compensate for logarithmic units - dlogE = dE/E
        let flux = flux / energy;
        trace!("flux[E = {energy}, cos θ = {cos_theta}] = {flux}");
        hist.fill(n64(energy), n64(cos_theta), n64(flux));
        entries += 1;
    }
    if entries == 0 {
        return Err(TableError::Empty);
    }
    debug!("read {entries} flux table entries");
    Ok(hist)
}

/// Read a flux table from the (possibly compressed) file at `path`
pub fn load_flux_table<P: AsRef<Path>>(
    path: P,
    grid: &Grid,
) -> Result<Histogram2D, TableError> {
    let path = path.as_ref();
    debug!("loading flux table from {path:?}");
    let file = std::fs::File::open(path)?;
    let input = auto_decompress(BufReader::new(file));
    read_flux_table(input, grid)
}

fn flux_entry(line: &str) -> IResult<&str, (f64, f64, f64)> {
    let (rest, energy) = preceded(space0, double)(line)?;
    let (rest, cos_theta) = double_entry(rest)?;
    let (rest, flux) = double_entry(rest)?;
    // trailing error estimates
    let (rest, _) = double_entry(rest)?;
    let (rest, _) = double_entry(rest)?;
    Ok((rest, (energy, cos_theta, flux)))
}

fn double_entry(line: &str) -> IResult<&str, f64> {
    preceded(space1, double)(line)
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    IoErr(#[from] std::io::Error),
    #[error("Failed to parse flux table line {line}: {content:?}")]
    ParseErr { line: usize, content: String },
    #[error("Non-positive energy {energy} in flux table line {line}")]
    BadEnergy { line: usize, energy: f64 },
    #[error("Flux table contains no entries")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_grid() -> Grid {
        Grid::new(log_edges(0.1, 10., 2), linear_edges(-1., 1., 2))
    }

    const TABLE: &str = "\
# E costheta flux err err
0.5  -0.5  1.0  0.1  0.1
0.5   0.5  2.0  0.1  0.1

5.0  -0.5  10.  0.1  0.1
";

    #[test]
    fn read() {
        log_init();

        let hist = read_flux_table(TABLE.as_bytes(), &test_grid()).unwrap();
        // fluxes are divided by the energy
        assert_eq!(hist.value_at(n64(0.5), n64(-0.5)), n64(2.));
        assert_eq!(hist.value_at(n64(0.5), n64(0.5)), n64(4.));
        assert_eq!(hist.value_at(n64(5.), n64(-0.5)), n64(2.));
        assert_eq!(hist.value_at(n64(5.), n64(0.5)), n64(0.));
    }

    #[test]
    fn malformed() {
        log_init();

        let table = "# header\n0.5 -0.5 not_a_number 0. 0.\n";
        let err = read_flux_table(table.as_bytes(), &test_grid())
            .unwrap_err();
        match err {
            TableError::ParseErr { line, .. } => assert_eq!(line, 2),
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn non_finite() {
        log_init();

        for bad in
            ["0.5 -0.5 nan 0. 0.", "inf 0.5 1. 0. 0.", "0.5 nan 1. 0. 0."]
        {
            let table = format!("# header\n{bad}\n");
            let err = read_flux_table(table.as_bytes(), &test_grid())
                .unwrap_err();
            assert!(
                matches!(err, TableError::ParseErr { line: 2, .. }),
                "unexpected error: {err}"
            );
        }
    }

    #[test]
    fn empty() {
        log_init();

        let table = "# header only\n";
        let err = read_flux_table(table.as_bytes(), &test_grid())
            .unwrap_err();
        assert!(matches!(err, TableError::Empty));
    }

    #[test]
    fn load_from_file() {
        log_init();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();
        let hist = load_flux_table(file.path(), &test_grid()).unwrap();
        assert_eq!(hist.value_at(n64(0.5), n64(0.5)), n64(4.));
    }
}
