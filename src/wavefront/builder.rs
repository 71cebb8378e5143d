use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use skyangle::Conversion;

use super::{GaussianBeam, Kind, PlaneType, Wavefront};
use crate::{Builder, OptiwaveError, TomlConfig};

/// `Wavefront` builder
///
/// Default properties:
///  - wavelength  : 550nm
///  - offset      : [0,0]
///  - plane type  : pupil
///  - kind        : physical
///  - amplitude, phase and pixel scale : unset
///
/// The amplitude and the phase are not saved into the toml configuration files.
///
/// # Examples
///
/// - 1 micron Gaussian beam with a 1cm radius
///
/// ```
/// use optiwave::{Builder, FromBuilder, Wavefront};
/// let wavefront = Wavefront::builder()
///     .wavelength(1e-6)
///     .beam_radius(1e-2)
///     .position(0.)
///     .build()?;
/// # Ok::<(), optiwave::OptiwaveError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavefrontBuilder {
    pub wavelength: f64,
    pub offset: [f64; 2],
    pub plane_type: PlaneType,
    pub pixel_scale: Option<f64>,
    #[serde(skip)]
    pub amplitude: Option<DMatrix<f64>>,
    #[serde(skip)]
    pub phase: Option<DMatrix<f64>>,
    pub kind: Kind,
}
impl Default for WavefrontBuilder {
    fn default() -> Self {
        Self {
            wavelength: 550e-9,
            offset: [0.; 2],
            plane_type: PlaneType::Pupil,
            pixel_scale: None,
            amplitude: None,
            phase: None,
            kind: Kind::Physical,
        }
    }
}
impl TomlConfig for WavefrontBuilder {
    const NAME: &'static str = "WavefrontBuilder";
}
impl WavefrontBuilder {
    /// Sets the wavelength in meters
    pub fn wavelength(self, wavelength: f64) -> Self {
        Self { wavelength, ..self }
    }
    /// Sets the x and y angles of incidence
    pub fn offset(self, offset: [f64; 2]) -> Self {
        Self { offset, ..self }
    }
    /// Sets the x and y angles of incidence in arcseconds
    pub fn offset_arcsec(self, offset: [f64; 2]) -> Self {
        let [x, y]: [f64; 2] = offset;
        Self {
            offset: [x.from_arcsec(), y.from_arcsec()],
            ..self
        }
    }
    pub fn plane_type(self, plane_type: PlaneType) -> Self {
        Self { plane_type, ..self }
    }
    /// Sets the pixel scale in meters (physical, Gaussian) or radians (angular)
    pub fn pixel_scale(self, pixel_scale: f64) -> Self {
        Self {
            pixel_scale: Some(pixel_scale),
            ..self
        }
    }
    pub fn amplitude(self, amplitude: DMatrix<f64>) -> Self {
        Self {
            amplitude: Some(amplitude),
            ..self
        }
    }
    pub fn phase(self, phase: DMatrix<f64>) -> Self {
        Self {
            phase: Some(phase),
            ..self
        }
    }
    pub fn physical(self) -> Self {
        Self {
            kind: Kind::Physical,
            ..self
        }
    }
    pub fn angular(self) -> Self {
        Self {
            kind: Kind::Angular,
            ..self
        }
    }
    /// Turns the wavefront into a planar Gaussian beam, keeping any beam parameter already set
    pub fn gaussian(self) -> Self {
        match self.kind {
            Kind::Gaussian(_) => self,
            _ => Self {
                kind: Kind::Gaussian(GaussianBeam::default()),
                ..self
            },
        }
    }
    fn beam(self, f: impl FnOnce(GaussianBeam) -> GaussianBeam) -> Self {
        let this = self.gaussian();
        match this.kind {
            Kind::Gaussian(beam) => Self {
                kind: Kind::Gaussian(f(beam)),
                ..this
            },
            _ => this,
        }
    }
    /// Sets the Gaussian beam radius in meters
    pub fn beam_radius(self, beam_radius: f64) -> Self {
        self.beam(|beam| GaussianBeam {
            beam_radius: Some(beam_radius),
            ..beam
        })
    }
    /// Sets the Gaussian beam position in meters
    pub fn position(self, position: f64) -> Self {
        self.beam(|beam| GaussianBeam {
            position: Some(position),
            ..beam
        })
    }
    /// Sets the Gaussian beam phase radius
    pub fn phase_radius(self, phase_radius: f64) -> Self {
        self.beam(|beam| GaussianBeam {
            phase_radius,
            ..beam
        })
    }
}
impl Builder for WavefrontBuilder {
    type Component = Wavefront;
    /// Builds the `Wavefront`
    fn build(self) -> crate::Result<Self::Component> {
        if !(self.wavelength.is_finite() && self.wavelength > 0.) {
            return Err(OptiwaveError::InvalidGeometry(format!(
                "the wavelength must be strictly positive, found {}",
                self.wavelength
            )));
        }
        if let Kind::Gaussian(GaussianBeam {
            beam_radius: Some(beam_radius),
            ..
        }) = &self.kind
        {
            if *beam_radius <= 0. {
                return Err(OptiwaveError::InvalidGeometry(format!(
                    "the beam radius must be strictly positive, found {}",
                    beam_radius
                )));
            }
        }
        let mut wavefront = Wavefront::new(self.wavelength, self.offset, self.kind)
            .set_plane_type(self.plane_type);
        if let Some(pixel_scale) = self.pixel_scale {
            wavefront = wavefront.set_pixel_scale(pixel_scale);
        }
        wavefront = match (self.amplitude, self.phase) {
            (Some(amplitude), Some(phase)) => wavefront.update_phasor(amplitude, phase)?,
            (Some(amplitude), None) => wavefront.set_amplitude(amplitude)?,
            (None, Some(phase)) => wavefront.set_phase(phase)?,
            (None, None) => wavefront,
        };
        log::debug!("{}", wavefront);
        Ok(wavefront)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FromBuilder;

    #[test]
    fn defaults() {
        let wavefront = Wavefront::builder().build().unwrap();
        assert_eq!(wavefront.get_wavelength(), 550e-9);
        assert_eq!(wavefront.get_plane_type(), PlaneType::Pupil);
        assert_eq!(wavefront.get_kind(), &Kind::Physical);
        assert!(wavefront.get_amplitude().is_err());
    }

    #[test]
    fn bad_wavelength() {
        assert!(matches!(
            Wavefront::builder().wavelength(0.).build(),
            Err(OptiwaveError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn gaussian_parameters() {
        let wavefront = Wavefront::builder()
            .position(2.)
            .phase_radius(10.)
            .beam_radius(1e-3)
            .build()
            .unwrap();
        assert_eq!(wavefront.get_position().unwrap(), 2.);
        assert_eq!(wavefront.get_phase_radius().unwrap(), 10.);
        assert_eq!(wavefront.get_beam_radius().unwrap(), 1e-3);
    }

    #[test]
    fn arcsec_offset() {
        let wavefront = Wavefront::builder()
            .angular()
            .offset_arcsec([1., 0.])
            .build()
            .unwrap();
        let [x, y] = wavefront.get_offset();
        assert!((x - 1f64.to_radians() / 3600.).abs() < 1e-15);
        assert_eq!(y, 0.);
    }

    #[test]
    fn mismatched_arrays() {
        assert!(matches!(
            Wavefront::builder()
                .amplitude(DMatrix::zeros(4, 4))
                .phase(DMatrix::zeros(5, 5))
                .build(),
            Err(OptiwaveError::ShapeMismatch { .. })
        ));
    }
}
