//! # IV Surface Builder Module
//!
//! Moneyness x tenor implied-volatility grid construction.
//!
//! ## Description
//! Samples up to six expirations evenly across the chain, assigns each
//! contract's IV to the nearest of 21 fixed moneyness buckets spanning
//! 0.8-1.2, averages within buckets (calls and puts both eligible), and
//! fills interior gaps by linear interpolation with flat edge extension.
//! Expirations with fewer than two populated buckets are excluded from the
//! surface and reported, never fatal.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use volterm_core::{AnalyticsConfig, DataError};
use volterm_models::OptionChain;

/// One cell of the surface grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IvSurfacePoint {
    pub expiration: NaiveDate,
    pub dte: i64,
    pub moneyness: f64,
    pub iv: f64,
}

/// A complete tenor x moneyness grid, chart-ready.
///
/// `points` is row-major: one row of `grid.len()` cells per entry in
/// `expiries`, in the same order.
#[derive(Debug, Clone, Serialize)]
pub struct IvSurface {
    pub spot: f64,
    /// Moneyness bucket centers, ascending.
    pub grid: Vec<f64>,
    /// (expiration, dte) rows retained, nearest first.
    pub expiries: Vec<(NaiveDate, i64)>,
    pub points: Vec<IvSurfacePoint>,
    /// Expirations excluded for insufficient data.
    pub excluded: Vec<DataError>,
}

impl IvSurface {
    /// Bilinear IV lookup at an arbitrary (moneyness, dte) coordinate.
    ///
    /// Coordinates outside the grid clamp to the nearest edge. Returns
    /// `None` when the surface has no rows.
    pub fn iv_at(&self, moneyness: f64, dte: f64) -> Option<f64> {
        if self.expiries.is_empty() || self.grid.is_empty() {
            return None;
        }

        let row_iv = |row: usize, m: f64| -> f64 {
            let cells = &self.points[row * self.grid.len()..(row + 1) * self.grid.len()];
            let m = m.clamp(self.grid[0], *self.grid.last().unwrap());
            match self.grid.iter().position(|g| *g >= m) {
                Some(0) | None => cells[0].iv,
                Some(i) => {
                    let (g0, g1) = (self.grid[i - 1], self.grid[i]);
                    let w = (m - g0) / (g1 - g0);
                    cells[i - 1].iv * (1.0 - w) + cells[i].iv * w
                }
            }
        };

        let last = self.expiries.len() - 1;
        let hi = self
            .expiries
            .iter()
            .position(|(_, d)| *d as f64 >= dte)
            .unwrap_or(last);
        if hi == 0 || self.expiries[hi].1 as f64 <= dte {
            return Some(row_iv(hi, moneyness));
        }
        let lo = hi - 1;
        let (d0, d1) = (self.expiries[lo].1 as f64, self.expiries[hi].1 as f64);
        let w = (dte - d0) / (d1 - d0);
        Some(row_iv(lo, moneyness) * (1.0 - w) + row_iv(hi, moneyness) * w)
    }
}

/// Builds [`IvSurface`] grids from normalized chains.
#[derive(Debug, Clone)]
pub struct IvSurfaceBuilder {
    moneyness_min: f64,
    moneyness_max: f64,
    buckets: usize,
    max_expiries: usize,
}

impl IvSurfaceBuilder {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            moneyness_min: config.moneyness_min,
            moneyness_max: config.moneyness_max,
            buckets: config.moneyness_buckets,
            max_expiries: config.surface_expiries,
        }
    }

    /// Builds the surface. Always renderable: expirations without enough
    /// populated buckets are dropped into `excluded` rather than failing.
    pub fn build(&self, chain: &OptionChain) -> IvSurface {
        let step = (self.moneyness_max - self.moneyness_min) / (self.buckets as f64 - 1.0);
        let grid: Vec<f64> = (0..self.buckets)
            .map(|i| self.moneyness_min + step * i as f64)
            .collect();

        let mut surface = IvSurface {
            spot: chain.spot,
            grid: grid.clone(),
            expiries: Vec::new(),
            points: Vec::new(),
            excluded: Vec::new(),
        };

        for slice in sample_evenly(&chain.expirations, self.max_expiries) {
            let mut sums = vec![0.0_f64; self.buckets];
            let mut counts = vec![0_u32; self.buckets];

            for contract in &slice.contracts {
                let moneyness = contract.strike / chain.spot;
                // Half a step of slack so edge strikes land in edge buckets.
                if moneyness < self.moneyness_min - step / 2.0
                    || moneyness > self.moneyness_max + step / 2.0
                {
                    continue;
                }
                let idx = (((moneyness - self.moneyness_min) / step).round() as isize)
                    .clamp(0, self.buckets as isize - 1) as usize;
                sums[idx] += contract.implied_volatility;
                counts[idx] += 1;
            }

            let populated = counts.iter().filter(|c| **c > 0).count();
            if populated < 2 {
                debug!(
                    "excluding expiration {}: {} populated buckets",
                    slice.expiration, populated
                );
                surface.excluded.push(DataError::InterpolationGap {
                    expiration: slice.expiration,
                });
                continue;
            }

            let row = interpolate_row(&sums, &counts);
            surface.expiries.push((slice.expiration, slice.dte));
            surface
                .points
                .extend(row.into_iter().zip(grid.iter()).map(|(iv, m)| IvSurfacePoint {
                    expiration: slice.expiration,
                    dte: slice.dte,
                    moneyness: *m,
                    iv,
                }));
        }

        surface
    }
}

/// Picks up to `max` elements evenly spaced across `slices`, endpoints
/// included, preserving order.
fn sample_evenly<T>(slices: &[T], max: usize) -> Vec<&T> {
    if slices.len() <= max {
        return slices.iter().collect();
    }
    let mut picked = Vec::with_capacity(max);
    let span = (slices.len() - 1) as f64;
    let mut last_idx = usize::MAX;
    for i in 0..max {
        let idx = (span * i as f64 / (max as f64 - 1.0)).round() as usize;
        if idx != last_idx {
            picked.push(&slices[idx]);
            last_idx = idx;
        }
    }
    picked
}

/// Averages populated buckets, linearly interpolates interior gaps, and
/// extends the first/last populated value flat to the edges.
fn interpolate_row(sums: &[f64], counts: &[u32]) -> Vec<f64> {
    let n = sums.len();
    let mut row = vec![f64::NAN; n];
    let populated: Vec<usize> = (0..n).filter(|i| counts[*i] > 0).collect();
    for &i in &populated {
        row[i] = sums[i] / counts[i] as f64;
    }

    let first = populated[0];
    let last = *populated.last().expect("at least two populated buckets");
    for i in 0..first {
        row[i] = row[first];
    }
    for i in last + 1..n {
        row[i] = row[last];
    }
    for pair in populated.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        for i in lo + 1..hi {
            let w = (i - lo) as f64 / (hi - lo) as f64;
            row[i] = row[lo] * (1.0 - w) + row[hi] * w;
        }
    }
    row
}
