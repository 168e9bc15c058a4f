use crate::error::{Error, Result};

/// Something that can report the ground elevation at a point, in the same
/// CRS as the network.
pub trait ElevationSurface {
    /// Elevation at `(x, y)`, or `None` where the surface has no data.
    fn value_at(&self, x: f64, y: f64) -> Option<f64>;
}

/// An in-memory, north-up elevation raster.
///
/// Cell `(row, col)` covers the square whose top-left corner is
/// `(origin_x + col * cell_size, origin_y - row * cell_size)`; its value is
/// taken to lie at the cell center.
#[derive(Debug, Clone)]
pub struct GridSurface {
    origin_x: f64,
    origin_y: f64,
    cell_size: f64,
    width: usize,
    height: usize,
    values: Vec<f64>,
    nodata: Option<f64>,
}

impl GridSurface {
    /// Build a grid from row-major `values`, top row first.
    pub fn new(origin_x: f64, origin_y: f64, cell_size: f64, width: usize, values: Vec<f64>) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::InvalidConfig(format!("cell size must be positive, got {cell_size}")));
        }
        if width == 0 || values.is_empty() || values.len() % width != 0 {
            return Err(Error::InvalidConfig(format!("{} values do not fill rows of width {width}", values.len())));
        }
        let height = values.len() / width;
        Ok(Self { origin_x, origin_y, cell_size, width, height, values, nodata: None })
    }

    /// Treat cells holding `nodata` as missing.
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    #[inline]
    fn cell(&self, row: usize, col: usize) -> Option<f64> {
        let value = self.values[row * self.width + col];
        if value.is_nan() || self.nodata == Some(value) { None } else { Some(value) }
    }
}

/// Lower index of the 2-cell window around fractional index `f`, and the
/// weight of the upper cell.
#[inline]
fn window(f: f64, n: usize) -> (usize, f64) {
    if n < 2 { return (0, 0.0) }
    let f = f.clamp(0.0, (n - 1) as f64);
    let lower = (f.floor() as usize).min(n - 2);
    (lower, f - lower as f64)
}

impl ElevationSurface for GridSurface {
    /// Bilinear interpolation between the four cell centers around the point.
    fn value_at(&self, x: f64, y: f64) -> Option<f64> {
        let col = (x - self.origin_x) / self.cell_size;
        let row = (self.origin_y - y) / self.cell_size;
        if !(0.0..=self.width as f64).contains(&col) || !(0.0..=self.height as f64).contains(&row) {
            return None;
        }

        let (c0, dx) = window(col - 0.5, self.width);
        let (r0, dy) = window(row - 0.5, self.height);
        let (c1, r1) = ((c0 + 1).min(self.width - 1), (r0 + 1).min(self.height - 1));

        // Cells with no weight may be missing.
        let mut z = 0.0;
        for (weight, r, c) in [
            ((1.0 - dx) * (1.0 - dy), r0, c0),
            (dx * (1.0 - dy), r0, c1),
            ((1.0 - dx) * dy, r1, c0),
            (dx * dy, r1, c1),
        ] {
            if weight > 0.0 { z += weight * self.cell(r, c)? }
        }
        Some(z)
    }
}
