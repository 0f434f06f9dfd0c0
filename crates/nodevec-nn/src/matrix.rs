//! Shared parameter matrix for Hogwild SGD.
//!
//! Cells are `AtomicU32` holding `f32` bits. Reads and writes are relaxed
//! and an "add" is a load followed by a store, not a compare-and-swap: two
//! workers touching the same cell at once may lose one update (Hogwild,
//! Recht et al., 2011). There are no data races on the cells themselves.

use std::sync::atomic::{AtomicU32, Ordering};

/// A `rows × dim` matrix of `f32` that many threads may update at once.
pub struct SharedMatrix {
    cells: Vec<AtomicU32>,
    dim: usize,
}

impl SharedMatrix {
    /// A matrix with every cell set to `value`.
    pub fn filled(rows: usize, dim: usize, value: f32) -> Self {
        let bits = value.to_bits();
        Self {
            cells: (0..rows * dim).map(|_| AtomicU32::new(bits)).collect(),
            dim,
        }
    }

    /// A matrix from row-major values.
    pub fn from_values(values: Vec<f32>, dim: usize) -> Self {
        debug_assert!(dim > 0 && values.len() % dim == 0);
        Self {
            cells: values.into_iter().map(|v| AtomicU32::new(v.to_bits())).collect(),
            dim,
        }
    }

    /// Row width.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.cells.len() / self.dim
    }

    #[inline]
    fn row(&self, row: usize) -> &[AtomicU32] {
        &self.cells[row * self.dim..(row + 1) * self.dim]
    }

    /// Copy a row out.
    #[inline]
    pub fn read_row(&self, row: usize, out: &mut [f32]) {
        for (o, cell) in out.iter_mut().zip(self.row(row)) {
            *o = f32::from_bits(cell.load(Ordering::Relaxed));
        }
    }

    /// Dot product of a row with `v`.
    #[inline]
    pub fn dot(&self, row: usize, v: &[f32]) -> f32 {
        self.row(row)
            .iter()
            .zip(v)
            .map(|(cell, x)| f32::from_bits(cell.load(Ordering::Relaxed)) * x)
            .sum()
    }

    /// `row += scale * v`.
    #[inline]
    pub fn add_scaled(&self, row: usize, scale: f32, v: &[f32]) {
        for (cell, x) in self.row(row).iter().zip(v) {
            let cur = f32::from_bits(cell.load(Ordering::Relaxed));
            cell.store((cur + scale * x).to_bits(), Ordering::Relaxed);
        }
    }

    /// `row += v`.
    #[inline]
    pub fn add(&self, row: usize, v: &[f32]) {
        self.add_scaled(row, 1.0, v);
    }

    /// Freeze into row-major values.
    pub fn into_values(self) -> Vec<f32> {
        self.cells
            .into_iter()
            .map(|cell| f32::from_bits(cell.into_inner()))
            .collect()
    }
}
