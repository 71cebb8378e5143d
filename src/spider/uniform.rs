use nalgebra::DMatrix;
use rayon::prelude::*;
use std::f64::consts::PI;

use super::{Spider, SpiderGeometry, UniformSpiderBuilder};
use crate::{FromBuilder, Layer, Result, Wavefront};

/// Spider with equally spaced struts of the same width
///
/// Struts point at `2 pi k / n + rotation`, `k=0,...,n-1`. The mask is 0
/// outside the disk of radius `radius_of_spider`.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformSpider {
    pub(super) geometry: SpiderGeometry,
    pub(super) number_of_struts: usize,
    pub(super) width_of_struts: f64,
    pub(super) rotation: f64,
}
impl FromBuilder for UniformSpider {
    type ComponentBuilder = UniformSpiderBuilder;
}
impl UniformSpider {
    pub fn number_of_struts(&self) -> usize {
        self.number_of_struts
    }
    /// Width of the struts in meters
    pub fn width_of_struts(&self) -> f64 {
        self.width_of_struts
    }
    /// Global rotation in radians
    pub fn rotation(&self) -> f64 {
        self.rotation
    }
    /// Strut angles in radians
    pub fn angles(&self) -> Vec<f64> {
        let n = self.number_of_struts as f64;
        (0..self.number_of_struts)
            .map(|k| 2. * PI * k as f64 / n + self.rotation)
            .collect()
    }
}
impl Spider for UniformSpider {
    fn geometry(&self) -> &SpiderGeometry {
        &self.geometry
    }
    fn spider(&self) -> DMatrix<f64> {
        let n_px = self.geometry.number_of_pixels;
        let struts: Vec<_> = self
            .angles()
            .into_par_iter()
            .map(|angle| self.strut(angle, self.width_of_struts))
            .collect();
        let spider = struts
            .iter()
            .fold(DMatrix::from_element(n_px, n_px, 1f64), |mask, strut| {
                mask.component_mul(strut)
            });

        let radius = self.geometry.radius_of_spider;
        let radial_distance = self.coordinates().hypot().map(|r| {
            if r > radius {
                f64::NEG_INFINITY
            } else {
                (r - radius).abs()
            }
        });
        let radial_soft_edge = self.sigmoid(&radial_distance, self.geometry.pixel_scale());

        let mask = radial_soft_edge.component_mul(&spider);
        log::debug!(
            "{} struts spider mask: {}x{}px, mean transmission: {:.3}",
            self.number_of_struts,
            n_px,
            n_px,
            mask.mean()
        );
        mask
    }
}
impl Layer for UniformSpider {
    fn propagate(&self, wavefront: Wavefront) -> Result<Wavefront> {
        self.obstruct(wavefront)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Builder, OptiwaveError};

    fn spider(rotation: f64, width_of_struts: f64) -> UniformSpider {
        UniformSpider::builder()
            .width_of_image(2.)
            .number_of_pixels(128)
            .radius_of_spider(1.)
            .centre_of_spider([0., 0.])
            .number_of_struts(4)
            .width_of_struts(width_of_struts)
            .rotation(rotation)
            .build()
            .unwrap()
    }

    // pixel index of the coordinate x for a 128px wide 2m image
    fn index(x: f64) -> usize {
        (x * 64. + 63.5).round() as usize
    }

    #[test]
    fn four_struts() {
        let mask = spider(0., 0.05).spider();
        assert_eq!(mask.shape(), (128, 128));
        assert!(mask.iter().all(|m| (0f64..=1.).contains(m)));
        for i in 63..=64 {
            for j in 63..=64 {
                assert!(mask[(i, j)] < 1e-3, "centre: {}", mask[(i, j)]);
            }
        }
        let (i, j) = (index(0.5), index(0.5));
        assert!(mask[(i, j)] > 0.999, "clear aperture: {}", mask[(i, j)]);
        // on the strut pointing toward +y, away from the centre
        let (i, j) = (index(0.5), 63);
        assert!(mask[(i, j)] < 1e-3, "strut: {}", mask[(i, j)]);
        // outside the disk
        let (i, j) = (index(0.9), index(0.9));
        assert!(mask[(i, j)] < 1e-6, "outside: {}", mask[(i, j)]);
    }

    #[test]
    fn thin_struts() {
        let s = spider(0., 1e-9);
        let mask = s.spider();
        let coordinates = s.coordinates();
        mask.iter()
            .zip(coordinates.x.iter().zip(coordinates.y.iter()))
            .for_each(|(&m, (&x, &y))| {
                let r = x.hypot(y);
                if r < 0.9 && x.abs() > 0.1 && y.abs() > 0.1 {
                    assert!(m > 0.999, "({x},{y}): {m}");
                }
                if r > 1. {
                    assert!(m < 1e-9, "({x},{y}): {m}");
                }
            });
    }

    #[test]
    fn rotation_by_one_strut() {
        let mask = spider(0.1, 0.05).spider();
        let rotated = spider(0.1 + 2. * PI / 4., 0.05).spider();
        assert!((mask - rotated).amax() < 1e-9);
    }

    #[test]
    fn single_strut() {
        let s = UniformSpider::builder()
            .width_of_image(2.)
            .number_of_pixels(64)
            .radius_of_spider(1.)
            .number_of_struts(1)
            .width_of_struts(0.1)
            .build()
            .unwrap();
        let mask = s.spider();
        // strut along +x only
        assert!(mask[(31, 48)] < 1e-3);
        assert!(mask[(31, 15)] > 0.99);
    }

    #[test]
    fn shifted_centre() {
        let s = UniformSpider::builder()
            .width_of_image(2.)
            .number_of_pixels(64)
            .radius_of_spider(0.5)
            .centre_of_spider([0.25, 0.])
            .number_of_struts(3)
            .width_of_struts(0.05)
            .build()
            .unwrap();
        let coordinates = s.coordinates();
        // the spider centre sits at x=0.25m, i.e. between columns 39 and 40
        assert!((coordinates.x[(0, 40)] - 0.015625).abs() < 1e-12);
        let mask = s.spider();
        // outside the 0.5m disk around the spider centre
        assert!(mask[(31, 8)] < 1e-6);
    }

    #[test]
    fn obstructs_wavefront() {
        let s = spider(0., 0.05);
        let wavefront = Wavefront::builder()
            .wavelength(1e-6)
            .amplitude(DMatrix::from_element(128, 128, 2.))
            .phase(DMatrix::from_element(128, 128, 0.5))
            .pixel_scale(2. / 128.)
            .build()
            .unwrap();
        let mask = s.spider();
        let wavefront = wavefront.through(&s).unwrap();
        assert_eq!(wavefront.get_amplitude().unwrap(), &(mask.clone() * 2.));
        assert_eq!(wavefront.get_phase().unwrap(), &(mask * 0.5));
    }

    #[test]
    fn wrong_raster() {
        let wavefront = Wavefront::builder()
            .amplitude(DMatrix::from_element(64, 64, 1.))
            .phase(DMatrix::zeros(64, 64))
            .build()
            .unwrap();
        assert!(matches!(
            spider(0., 0.05).propagate(wavefront),
            Err(OptiwaveError::ShapeMismatch { .. })
        ));
    }
}
