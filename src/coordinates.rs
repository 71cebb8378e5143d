//!
//! # Pixel coordinates
//!
//! Paraxial pixel grids shared by the wavefronts and the spiders.
//! Grids follow the `xy` meshgrid convention: the `x` coordinate varies along
//! the columns and the `y` coordinate along the rows of the matrices.

use nalgebra::{DMatrix, Rotation2, Vector2};

/// Paraxial pixel indices `0..n` shifted so that the array centre is at 0
///
/// The centre is at `(n-1)/2`, i.e. between the 2 middle pixels for an even `n`
pub fn pixel_coordinates(n: usize) -> Vec<f64> {
    let centre = (n as f64 - 1.) * 0.5;
    (0..n).map(|i| i as f64 - centre).collect()
}

/// Pixel grid of `n`x`n` pixels offset by `[cx,cy]` pixels
///
/// The pixel at index 0 is at `-(n-1)/2 - cx` along x and `-(n-1)/2 - cy` along y
pub fn pixel_positions(n: usize, centre: [f64; 2]) -> Grid {
    let p = pixel_coordinates(n);
    let [cx, cy] = centre;
    Grid {
        x: DMatrix::from_fn(n, n, |_, j| p[j] - cx),
        y: DMatrix::from_fn(n, n, |i, _| p[i] - cy),
    }
}

/// A pair of `x` and `y` coordinate matrices
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub x: DMatrix<f64>,
    pub y: DMatrix<f64>,
}
impl Grid {
    /// Returns the grid shape
    pub fn shape(&self) -> (usize, usize) {
        self.x.shape()
    }
    /// Multiplies both coordinates by `scale`
    pub fn scale(self, scale: f64) -> Self {
        Self {
            x: self.x * scale,
            y: self.y * scale,
        }
    }
    /// Rotates every coordinate pair by `angle` radians (counter-clockwise)
    pub fn rotate(&self, angle: f64) -> Self {
        let rotation = Rotation2::new(angle);
        let (x, y): (Vec<f64>, Vec<f64>) = self
            .x
            .iter()
            .zip(self.y.iter())
            .map(|(&x, &y)| {
                let v = rotation * Vector2::new(x, y);
                (v.x, v.y)
            })
            .unzip();
        let (nrows, ncols) = self.shape();
        Self {
            x: DMatrix::from_vec(nrows, ncols, x),
            y: DMatrix::from_vec(nrows, ncols, y),
        }
    }
    /// Returns the radial distance `sqrt(x^2+y^2)`
    pub fn hypot(&self) -> DMatrix<f64> {
        self.x.zip_map(&self.y, |x, y| x.hypot(y))
    }
    /// Returns the squared radial distance `x^2+y^2`
    pub fn norm_squared(&self) -> DMatrix<f64> {
        self.x.zip_map(&self.y, |x, y| x * x + y * y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_coordinates() {
        assert_eq!(pixel_coordinates(5), vec![-2., -1., 0., 1., 2.]);
    }

    #[test]
    fn even_coordinates() {
        assert_eq!(pixel_coordinates(4), vec![-1.5, -0.5, 0.5, 1.5]);
    }

    #[test]
    fn offset_grid() {
        let grid = pixel_positions(3, [0.5, -1.]);
        assert_eq!(grid.x[(0, 0)], -1.5);
        assert_eq!(grid.x[(2, 2)], 0.5);
        assert_eq!(grid.y[(0, 2)], 0.);
        assert_eq!(grid.y[(2, 0)], 2.);
    }

    #[test]
    fn quarter_turn() {
        let grid = pixel_positions(3, [0., 0.]).rotate(std::f64::consts::FRAC_PI_2);
        // (1,0) -> (0,1)
        assert!(grid.x[(1, 2)].abs() < 1e-12);
        assert!((grid.y[(1, 2)] - 1.).abs() < 1e-12);
    }
}
