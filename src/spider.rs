//!
//! # Spiders
//!
//! Soft-edged masks of the struts holding the secondary mirror of a telescope.
//!
//! A spider is rasterized on a `number_of_pixels` wide square grid spanning
//! `width_of_image` meters. Mask values are close to 0 on the struts and close
//! to 1 in between. The edges follow a `tanh` profile whose steepness is the
//! number of pixels, so the masks stay smooth functions of the geometric
//! parameters.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::{
    coordinates::{self, Grid},
    wavefront::Operand,
    Result, Wavefront,
};

mod builder;
mod uniform;

pub use builder::UniformSpiderBuilder;
pub use uniform::UniformSpider;

/// Raster and placement of a spider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpiderGeometry {
    /// Width of the image in meters
    pub width_of_image: f64,
    /// Number of pixels along one side of the image
    pub number_of_pixels: usize,
    /// Radius of the disk the spider is embedded in, in meters
    pub radius_of_spider: f64,
    /// `[x,y]` centre of the spider relative to the image centre, in meters
    pub centre_of_spider: [f64; 2],
}
impl SpiderGeometry {
    /// Size of a pixel in meters
    pub fn pixel_scale(&self) -> f64 {
        self.width_of_image / self.number_of_pixels as f64
    }
}

/// Spider rasterization
pub trait Spider {
    fn geometry(&self) -> &SpiderGeometry;
    /// Returns the `number_of_pixels`x`number_of_pixels` mask of the spider
    fn spider(&self) -> DMatrix<f64>;
    /// Pixel coordinates in meters relative to the centre of the spider
    fn coordinates(&self) -> Grid {
        let geometry = self.geometry();
        let pixel_scale = geometry.pixel_scale();
        let [x, y] = geometry.centre_of_spider;
        coordinates::pixel_positions(
            geometry.number_of_pixels,
            [x / pixel_scale, y / pixel_scale],
        )
        .scale(pixel_scale)
    }
    /// Rotates the coordinates by `angle` radians
    fn rotate(&self, coordinates: &Grid, angle: f64) -> Grid {
        coordinates.rotate(angle)
    }
    /// Single strut pointing at `angle` radians from the x-axis
    ///
    /// The distance to the strut axis is infinite behind the spider centre so
    /// the strut only extends on one side.
    fn strut(&self, angle: f64, width: f64) -> DMatrix<f64> {
        let Grid { x, y } = self.rotate(&self.coordinates(), -angle);
        let distance = x.zip_map(&y, |x, y| if x > 0. { y.abs() } else { f64::INFINITY });
        self.sigmoid(&distance, width)
    }
    /// Soft step from 0 to 1 as `distance` crosses `width`
    ///
    /// Not a sigmoid but a `tanh` step: `(tanh(n (d - w)) + 1) / 2` with `n`
    /// the number of pixels; infinite distances map exactly to 1.
    fn sigmoid(&self, distance: &DMatrix<f64>, width: f64) -> DMatrix<f64> {
        let steepness = self.geometry().number_of_pixels as f64;
        distance.map(|d| ((steepness * (d - width)).tanh() + 1.) * 0.5)
    }
    /// Multiplies both the amplitude and the phase of the wavefront by the mask
    fn obstruct(&self, wavefront: Wavefront) -> Result<Wavefront> {
        let mask = self.spider();
        let amplitude = Operand::from(&mask).apply(wavefront.get_amplitude()?, |a, m| a * m)?;
        let phase = Operand::from(mask).apply(wavefront.get_phase()?, |p, m| p * m)?;
        wavefront.update_phasor(amplitude, phase)
    }
}
