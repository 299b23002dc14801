use itertools::Itertools;
use log::trace;
use noisy_float::prelude::*;
use rand::{
    distributions::{Distribution, Uniform, WeightedError, WeightedIndex},
    Rng,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 2-D weight table with non-uniform binning
///
/// Bins on each axis are half-open intervals `[lo, hi)` between
/// consecutive edges. There are no overflow bins, entries outside the
/// edges are dropped.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Histogram2D {
    x_edges: Vec<N64>,
    y_edges: Vec<N64>,
    bins: Vec<N64>,
}

impl Histogram2D {
    /// Construct an empty histogram with the given bin edges
    ///
    /// Each axis needs at least two edges in strictly ascending order.
    pub fn new(x_edges: Vec<N64>, y_edges: Vec<N64>) -> Self {
        assert!(x_edges.len() > 1 && y_edges.len() > 1);
        assert!(x_edges.iter().tuple_windows().all(|(a, b)| a < b));
        assert!(y_edges.iter().tuple_windows().all(|(a, b)| a < b));
        let nbins = (x_edges.len() - 1) * (y_edges.len() - 1);
        Self {
            x_edges,
            y_edges,
            bins: vec![n64(0.); nbins],
        }
    }

    /// Number of bins along the first axis
    pub fn nx(&self) -> usize {
        self.x_edges.len() - 1
    }

    /// Number of bins along the second axis
    pub fn ny(&self) -> usize {
        self.y_edges.len() - 1
    }

    pub fn x_min(&self) -> N64 {
        self.x_edges[0]
    }

    pub fn x_max(&self) -> N64 {
        self.x_edges[self.x_edges.len() - 1]
    }

    pub fn y_min(&self) -> N64 {
        self.y_edges[0]
    }

    pub fn y_max(&self) -> N64 {
        self.y_edges[self.y_edges.len() - 1]
    }

    /// The bin containing the point (x, y), if any
    pub fn bin_index(&self, x: N64, y: N64) -> Option<(usize, usize)> {
        let ix = bin_of(&self.x_edges, x)?;
        let iy = bin_of(&self.y_edges, y)?;
        Some((ix, iy))
    }

    /// The weight stored in the bin containing (x, y), zero outside
    pub fn value_at(&self, x: N64, y: N64) -> N64 {
        match self.bin_index(x, y) {
            Some((ix, iy)) => self.bins[ix * self.ny() + iy],
            None => n64(0.),
        }
    }

    /// Add `weight` to the bin containing (x, y)
    pub fn fill(&mut self, x: N64, y: N64, weight: N64) {
        match self.bin_index(x, y) {
            Some((ix, iy)) => {
                let ny = self.ny();
                self.bins[ix * ny + iy] += weight;
            }
            None => trace!("dropping out-of-range entry at ({x}, {y})"),
        }
    }

    /// The sum of all bin weights
    pub fn total(&self) -> N64 {
        self.bins.iter().copied().sum()
    }

    /// A sampling distribution over the histogram
    ///
    /// Points are drawn by first choosing a bin with probability
    /// proportional to its weight and then smearing uniformly within
    /// the bin, like ROOT's `GetRandom2`. Fails if any weight is
    /// negative or all weights vanish.
    pub fn distribution(
        &self,
    ) -> Result<HistogramDistribution, DistributionError> {
        let index =
            WeightedIndex::new(self.bins.iter().map(|w| f64::from(*w)))?;
        Ok(HistogramDistribution {
            index,
            x_edges: self.x_edges.clone(),
            y_edges: self.y_edges.clone(),
        })
    }
}

fn bin_of(edges: &[N64], x: N64) -> Option<usize> {
    let idx = edges.partition_point(|e| *e <= x);
    if idx == 0 || idx == edges.len() {
        None
    } else {
        Some(idx - 1)
    }
}

impl std::ops::AddAssign<&Histogram2D> for Histogram2D {
    fn add_assign(&mut self, rhs: &Histogram2D) {
        assert_eq!(self.x_edges, rhs.x_edges);
        assert_eq!(self.y_edges, rhs.y_edges);
        for (bin, w) in self.bins.iter_mut().zip_eq(&rhs.bins) {
            *bin += *w;
        }
    }
}

/// Distribution over the bins of a [Histogram2D]
///
/// Samples are (x, y) pairs inside the histogram ranges.
#[derive(Clone, Debug)]
pub struct HistogramDistribution {
    index: WeightedIndex<f64>,
    x_edges: Vec<N64>,
    y_edges: Vec<N64>,
}

impl Distribution<(N64, N64)> for HistogramDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (N64, N64) {
        let ny = self.y_edges.len() - 1;
        let bin = self.index.sample(rng);
        let (ix, iy) = (bin / ny, bin % ny);
        let x = Uniform::new(
            f64::from(self.x_edges[ix]),
            f64::from(self.x_edges[ix + 1]),
        )
        .sample(rng);
        let y = Uniform::new(
            f64::from(self.y_edges[iy]),
            f64::from(self.y_edges[iy + 1]),
        )
        .sample(rng);
        (n64(x), n64(y))
    }
}

#[derive(Debug, Error)]
pub enum DistributionError {
    #[error("Failed to build distribution over histogram bins: {0}")]
    BadWeights(#[from] WeightedError),
}

/// `nbins + 1` logarithmically spaced edges between `min` and `max`
pub fn log_edges(min: f64, max: f64, nbins: usize) -> Vec<N64> {
    let lmin = min.log10();
    let step = (max.log10() - lmin) / nbins as f64;
    (0..=nbins)
        .map(|i| n64(10f64.powf(lmin + step * i as f64)))
        .collect()
}

/// `nbins + 1` linearly spaced edges between `min` and `max`
pub fn linear_edges(min: f64, max: f64, nbins: usize) -> Vec<N64> {
    let step = (max - min) / nbins as f64;
    (0..=nbins).map(|i| n64(min + step * i as f64)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use log::debug;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_histogram() -> Histogram2D {
        Histogram2D::new(log_edges(0.1, 10., 2), linear_edges(-1., 1., 2))
    }

    #[test]
    fn fill_and_look_up() {
        log_init();

        let mut hist = test_histogram();
        assert_eq!(hist.nx(), 2);
        assert_eq!(hist.ny(), 2);

        hist.fill(n64(0.5), n64(-0.5), n64(2.));
        hist.fill(n64(0.5), n64(-0.5), n64(1.));
        hist.fill(n64(5.), n64(0.5), n64(4.));
        // outside the edges, dropped
        hist.fill(n64(100.), n64(0.), n64(1000.));
        hist.fill(n64(1.), n64(1.5), n64(1000.));

        assert_eq!(hist.value_at(n64(0.5), n64(-0.5)), n64(3.));
        assert_eq!(hist.value_at(n64(5.), n64(0.5)), n64(4.));
        assert_eq!(hist.value_at(n64(5.), n64(-0.5)), n64(0.));
        assert_eq!(hist.value_at(n64(100.), n64(0.)), n64(0.));
        assert_eq!(hist.total(), n64(7.));

        // lower edges are included, upper edges are not
        let hist = Histogram2D::new(
            linear_edges(0., 1., 2),
            linear_edges(-1., 1., 2),
        );
        assert_eq!(hist.bin_index(n64(0.), n64(-1.)), Some((0, 0)));
        assert_eq!(hist.bin_index(n64(1.), n64(0.)), None);
        assert_eq!(hist.bin_index(n64(0.5), n64(0.)), Some((1, 1)));
    }

    #[test]
    fn add() {
        log_init();

        let mut h1 = test_histogram();
        h1.fill(n64(0.5), n64(-0.5), n64(1.));
        let mut h2 = test_histogram();
        h2.fill(n64(0.5), n64(-0.5), n64(2.));
        h2.fill(n64(5.), n64(0.5), n64(1.));
        h1 += &h2;
        assert_eq!(h1.value_at(n64(0.5), n64(-0.5)), n64(3.));
        assert_eq!(h1.total(), n64(4.));
    }

    #[test]
    fn sample() {
        log_init();

        let mut hist = test_histogram();
        hist.fill(n64(0.5), n64(-0.5), n64(1.));
        hist.fill(n64(5.), n64(0.5), n64(3.));
        let distr = hist.distribution().unwrap();

        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let mut nlow = 0_u32;
        const N: u32 = 10000;
        for _ in 0..N {
            let (x, y) = distr.sample(&mut rng);
            debug!("sampled ({x}, {y})");
            // only filled bins can be drawn
            assert!(hist.value_at(x, y) > 0.);
            // the lighter of the two filled bins has y < 0
            if y < 0. {
                nlow += 1;
            }
        }
        // a quarter of the draws should land in the lighter bin
        assert!(nlow > N / 5);
        assert!(nlow < N / 3);
    }

    #[test]
    fn empty_distribution() {
        log_init();

        let hist = test_histogram();
        assert!(hist.distribution().is_err());
    }

    #[test]
    fn negative_weight_distribution() {
        log_init();

        let mut hist = test_histogram();
        hist.fill(n64(0.5), n64(-0.5), n64(-1.));
        hist.fill(n64(5.), n64(0.5), n64(3.));
        assert!(matches!(
            hist.distribution(),
            Err(DistributionError::BadWeights(_))
        ));
    }
}
