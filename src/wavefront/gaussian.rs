//! Gaussian beam state and Fresnel propagation primitives
//!
//! The beam is described by its 1/e^2 radius, its phase radius and the axial
//! position reached from the reference plane. A planar beam has an infinite
//! phase radius.

use nalgebra::{Complex, DMatrix};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{Kind, Wavefront};
use crate::{OptiwaveError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianBeam {
    /// Axial distance from the reference plane in meters
    pub position: Option<f64>,
    /// 1/e^2 beam radius in meters
    pub beam_radius: Option<f64>,
    pub phase_radius: f64,
}
impl Default for GaussianBeam {
    fn default() -> Self {
        Self {
            position: None,
            beam_radius: None,
            phase_radius: f64::INFINITY,
        }
    }
}

/// ## Gaussian wavefront
///
/// These methods return [`OptiwaveError::KindMismatch`] for physical and
/// angular wavefronts.
impl Wavefront {
    fn beam(&self) -> Result<&GaussianBeam> {
        match &self.kind {
            Kind::Gaussian(beam) => Ok(beam),
            kind => Err(OptiwaveError::KindMismatch {
                expected: "Gaussian",
                found: kind.name(),
            }),
        }
    }
    fn map_beam<F: FnOnce(GaussianBeam) -> GaussianBeam>(self, f: F) -> Result<Self> {
        match self.kind {
            Kind::Gaussian(beam) => Ok(Self {
                kind: Kind::Gaussian(f(beam)),
                ..self
            }),
            kind => Err(OptiwaveError::KindMismatch {
                expected: "Gaussian",
                found: kind.name(),
            }),
        }
    }
    pub fn get_position(&self) -> Result<f64> {
        self.beam()?
            .position
            .ok_or(OptiwaveError::UninitializedState { field: "position" })
    }
    pub fn set_position(self, position: f64) -> Result<Self> {
        self.map_beam(|beam| GaussianBeam {
            position: Some(position),
            ..beam
        })
    }
    pub fn get_beam_radius(&self) -> Result<f64> {
        self.beam()?
            .beam_radius
            .ok_or(OptiwaveError::UninitializedState {
                field: "beam_radius",
            })
    }
    pub fn set_beam_radius(self, beam_radius: f64) -> Result<Self> {
        self.map_beam(|beam| GaussianBeam {
            beam_radius: Some(beam_radius),
            ..beam
        })
    }
    pub fn get_phase_radius(&self) -> Result<f64> {
        Ok(self.beam()?.phase_radius)
    }
    pub fn set_phase_radius(self, phase_radius: f64) -> Result<Self> {
        self.map_beam(|beam| GaussianBeam {
            phase_radius,
            ..beam
        })
    }

    /// Rayleigh distance: `pi w^2 / lambda`
    pub fn rayleigh_distance(&self) -> Result<f64> {
        let beam_radius = self.get_beam_radius()?;
        Ok(PI * beam_radius * beam_radius / self.get_wavelength())
    }
    /// Location of the beam waist relative to the current position
    ///
    /// A planar beam (infinite phase radius) is at its waist
    pub fn location_of_waist(&self) -> Result<f64> {
        let phase_radius = self.get_phase_radius()?;
        let rayleigh_distance = self.rayleigh_distance()?;
        if phase_radius.is_infinite() {
            return Ok(0.);
        }
        Ok(-phase_radius / (1. + (phase_radius / rayleigh_distance).powi(2)))
    }
    pub fn waist_radius(&self) -> Result<f64> {
        let beam_radius = self.get_beam_radius()?;
        Ok(beam_radius / (1. + (self.rayleigh_distance()? / beam_radius).powi(2)).sqrt())
    }
    /// Checks if propagating by `distance` keeps the beam within a Rayleigh
    /// distance of its waist
    pub fn is_inside(&self, distance: f64) -> Result<bool> {
        Ok(
            (self.get_position()? + distance - self.location_of_waist()?).abs()
                <= self.rayleigh_distance()?,
        )
    }
    /// Angular spectrum transfer function `exp(i pi lambda z (xi^2+eta^2))`
    ///
    /// The direction cosines `xi` and `eta` are the pixel positions normalised
    /// by their radius and the wavelength; they are set to 0 on axis.
    pub fn transfer_function(&self, distance: f64) -> Result<DMatrix<Complex<f64>>> {
        self.beam()?;
        let wavelength = self.get_wavelength();
        let coordinates = self.get_pixel_positions()?;
        Ok(coordinates.x.zip_map(&coordinates.y, |x, y| {
            let radius = x.hypot(y);
            let (xi, eta) = if radius > 0. {
                (x / radius / wavelength, y / radius / wavelength)
            } else {
                (0., 0.)
            };
            Complex::new(0., PI * wavelength * distance * (xi * xi + eta * eta)).exp()
        }))
    }
    /// Fresnel quadratic phase factor `exp(i pi (x^2+y^2) / (lambda z))`
    pub fn quadratic_phase_factor(&self, distance: f64) -> Result<DMatrix<Complex<f64>>> {
        self.beam()?;
        let wavelength = self.get_wavelength();
        Ok(self
            .get_pixel_positions()?
            .norm_squared()
            .map(|r2| Complex::new(0., PI * r2 / wavelength / distance).exp()))
    }
    /// Far field pixel scale at `position`: `lambda |z| / (N dx)`
    pub fn calculate_pixel_scale(&self, position: f64) -> Result<f64> {
        self.beam()?;
        let number_of_pixels = self.number_of_pixels()? as f64;
        Ok(self.get_wavelength() * position.abs() / number_of_pixels / self.get_pixel_scale()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Builder, FromBuilder};

    fn beam(n: usize) -> Wavefront {
        Wavefront::builder()
            .wavelength(1e-6)
            .amplitude(DMatrix::from_element(n, n, 1.))
            .phase(DMatrix::zeros(n, n))
            .pixel_scale(1e-3)
            .beam_radius(1e-2)
            .position(0.)
            .build()
            .unwrap()
    }

    #[test]
    fn rayleigh() {
        let wavefront = beam(8);
        let z_r = wavefront.rayleigh_distance().unwrap();
        assert!((z_r - PI * 1e-4 / 1e-6).abs() < 1e-9);
        assert_eq!(wavefront.location_of_waist().unwrap(), 0.);
        assert!(wavefront.is_inside(0.5 * z_r).unwrap());
        assert!(wavefront.is_inside(-z_r).unwrap());
        assert!(!wavefront.is_inside(1.01 * z_r).unwrap());
    }

    #[test]
    fn curved_waist() {
        let wavefront = beam(8);
        let z_r = wavefront.rayleigh_distance().unwrap();
        let wavefront = wavefront.set_phase_radius(z_r).unwrap();
        assert!((wavefront.location_of_waist().unwrap() + 0.5 * z_r).abs() < 1e-9);
    }

    #[test]
    fn waist() {
        let wavefront = beam(8);
        let w = 1e-2;
        let z_r = wavefront.rayleigh_distance().unwrap();
        let expected = w / (1. + (z_r / w).powi(2)).sqrt();
        assert!((wavefront.waist_radius().unwrap() - expected).abs() < 1e-15);
    }

    #[test]
    fn uninitialized_beam() {
        let wavefront = Wavefront::gaussian(1e-6, [0.; 2]);
        assert!(matches!(
            wavefront.rayleigh_distance(),
            Err(OptiwaveError::UninitializedState {
                field: "beam_radius"
            })
        ));
        let wavefront = wavefront.set_beam_radius(1e-2).unwrap();
        assert!(matches!(
            wavefront.is_inside(1.),
            Err(OptiwaveError::UninitializedState { field: "position" })
        ));
        assert_eq!(wavefront.get_phase_radius().unwrap(), f64::INFINITY);
    }

    #[test]
    fn not_gaussian() {
        let wavefront = Wavefront::physical(1e-6, [0.; 2]);
        assert!(matches!(
            wavefront.rayleigh_distance(),
            Err(OptiwaveError::KindMismatch { .. })
        ));
        assert!(wavefront.set_position(1.).is_err());
    }

    #[test]
    fn kernels() {
        let wavefront = beam(5);
        let qpf = wavefront.quadratic_phase_factor(2.).unwrap();
        assert!((qpf[(2, 2)] - Complex::new(1., 0.)).norm() < 1e-12);
        let (x, y) = (1e-3, 2e-3);
        let expected = Complex::new(0., PI * (x * x + y * y) / 1e-6 / 2.).exp();
        assert!((qpf[(4, 3)] - expected).norm() < 1e-9);
        assert!(qpf.iter().all(|z| (z.norm() - 1.).abs() < 1e-12));
        let tf = wavefront.transfer_function(2.).unwrap();
        assert_eq!(tf[(2, 2)], Complex::new(1., 0.));
        let expected = Complex::new(0., PI * 2. / 1e-6).exp();
        assert!((tf[(0, 1)] - expected).norm() < 1e-6);
    }

    #[test]
    fn far_field_pixel_scale() {
        let wavefront = beam(64);
        let dx = wavefront.calculate_pixel_scale(-10.).unwrap();
        assert!((dx - 1e-6 * 10. / 64. / 1e-3).abs() < 1e-15);
    }
}
