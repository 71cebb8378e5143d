//!
//! # Wavefront
//!
//! A monochromatic optical disturbance sampled on a square grid as a pair of
//! amplitude and phase arrays.
//!
//! A wavefront is a value: every `set_*` and every transform consumes the
//! wavefront and returns a new one, leaving no shared state behind.
//! The amplitude, the phase and the pixel scale are populated by the source
//! generation step (see [`WavefrontBuilder`]); reading them before hand returns
//! [`OptiwaveError::UninitializedState`].
//!
//! The [`Kind`] of a wavefront attaches the unit semantics:
//!  - [`Kind::Physical`]: pixel scale in meters
//!  - [`Kind::Angular`]: pixel scale in radians
//!  - [`Kind::Gaussian`]: pixel scale in meters plus the Gaussian beam state
//!    used by the Fresnel propagation primitives

use nalgebra::{Complex, DMatrix};
use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, fmt};

use crate::{
    coordinates::{self, Grid},
    FromBuilder, Layer, OptiwaveError, Result,
};

mod builder;
mod gaussian;
mod operand;

pub use builder::WavefrontBuilder;
pub use gaussian::GaussianBeam;
pub use operand::Operand;

/// Optical plane the wavefront is sampled at, for bookkeeping only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaneType {
    #[default]
    Pupil,
    Focal,
    Intermediate,
}

/// Wavefront variants
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Kind {
    #[default]
    Physical,
    Angular,
    Gaussian(GaussianBeam),
}
impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Physical => "physical",
            Kind::Angular => "angular",
            Kind::Gaussian(_) => "Gaussian",
        }
    }
    /// Unit of the pixel scale and of the offset
    pub fn unit(&self) -> &'static str {
        match self {
            Kind::Angular => "rd",
            _ => "m",
        }
    }
}
impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wavefront {
    wavelength: f64,
    offset: [f64; 2],
    plane_type: PlaneType,
    amplitude: Option<DMatrix<f64>>,
    phase: Option<DMatrix<f64>>,
    pixel_scale: Option<f64>,
    pub(crate) kind: Kind,
}
impl FromBuilder for Wavefront {
    type ComponentBuilder = WavefrontBuilder;
}
impl fmt::Display for Wavefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} wavefront @ {:.1}nm",
            self.kind,
            self.wavelength * 1e9
        )?;
        if let Some(amplitude) = &self.amplitude {
            write!(f, ", {}x{}px", amplitude.nrows(), amplitude.ncols())?;
        }
        if let Some(pixel_scale) = self.pixel_scale {
            write!(f, ", {:.3e}{}/px", pixel_scale, self.kind.unit())?;
        }
        Ok(())
    }
}

fn square(array: &DMatrix<f64>) -> Result<()> {
    let (n, m) = array.shape();
    if n == m {
        Ok(())
    } else {
        Err(OptiwaveError::ShapeMismatch {
            expected: (n, n),
            found: (n, m),
        })
    }
}

fn same_shape(lhs: &DMatrix<f64>, rhs: &DMatrix<f64>) -> Result<()> {
    if lhs.shape() == rhs.shape() {
        Ok(())
    } else {
        Err(OptiwaveError::ShapeMismatch {
            expected: lhs.shape(),
            found: rhs.shape(),
        })
    }
}

/// Bilinear interpolation of `data` at the fractional (row `y`, column `x`) indices
///
/// Corners falling outside the array contribute 0 to the interpolant
/// (constant extension with a zero fill value); non-finite indices return 0.
fn map_coordinates(data: &DMatrix<f64>, coordinates: &Grid) -> DMatrix<f64> {
    let (nrows, ncols) = data.shape();
    let at = |i: f64, j: f64| -> f64 {
        if i < 0. || j < 0. || i > (nrows as f64 - 1.) || j > (ncols as f64 - 1.) {
            0.
        } else {
            data[(i as usize, j as usize)]
        }
    };
    coordinates.y.zip_map(&coordinates.x, |i, j| {
        if !(i.is_finite() && j.is_finite()) {
            return 0.;
        }
        let (i0, j0) = (i.floor(), j.floor());
        let (di, dj) = (i - i0, j - j0);
        at(i0, j0) * (1. - di) * (1. - dj)
            + at(i0 + 1., j0) * di * (1. - dj)
            + at(i0, j0 + 1.) * (1. - di) * dj
            + at(i0 + 1., j0 + 1.) * di * dj
    })
}

fn reverse_columns(array: &DMatrix<f64>) -> DMatrix<f64> {
    let (n, m) = array.shape();
    DMatrix::from_fn(n, m, |i, j| array[(i, m - 1 - j)])
}

fn reverse_rows(array: &DMatrix<f64>) -> DMatrix<f64> {
    let (n, m) = array.shape();
    DMatrix::from_fn(n, m, |i, j| array[(n - 1 - i, j)])
}

impl Wavefront {
    fn new(wavelength: f64, offset: [f64; 2], kind: Kind) -> Self {
        Self {
            wavelength,
            offset,
            plane_type: PlaneType::default(),
            amplitude: None,
            phase: None,
            pixel_scale: None,
            kind,
        }
    }
    /// Creates a physical wavefront, amplitude, phase and pixel scale are left unset
    pub fn physical(wavelength: f64, offset: [f64; 2]) -> Self {
        Self::new(wavelength, offset, Kind::Physical)
    }
    /// Creates an angular wavefront, amplitude, phase and pixel scale are left unset
    pub fn angular(wavelength: f64, offset: [f64; 2]) -> Self {
        Self::new(wavelength, offset, Kind::Angular)
    }
    /// Creates a planar Gaussian wavefront, the beam radius and the position are left unset
    pub fn gaussian(wavelength: f64, offset: [f64; 2]) -> Self {
        Self::new(wavelength, offset, Kind::Gaussian(GaussianBeam::default()))
    }
    /// Passes the wavefront through an optical element
    pub fn through<L: Layer + ?Sized>(self, layer: &L) -> Result<Self> {
        layer.propagate(self)
    }

    pub fn get_kind(&self) -> &Kind {
        &self.kind
    }
    /// Wavelength in meters
    pub fn get_wavelength(&self) -> f64 {
        self.wavelength
    }
    pub fn set_wavelength(self, wavelength: f64) -> Self {
        Self { wavelength, ..self }
    }
    /// The x and y angles of incidence
    pub fn get_offset(&self) -> [f64; 2] {
        self.offset
    }
    pub fn set_offset(self, offset: [f64; 2]) -> Self {
        Self { offset, ..self }
    }
    pub fn get_plane_type(&self) -> PlaneType {
        self.plane_type
    }
    pub fn set_plane_type(self, plane_type: PlaneType) -> Self {
        Self { plane_type, ..self }
    }
    pub fn get_amplitude(&self) -> Result<&DMatrix<f64>> {
        self.amplitude
            .as_ref()
            .ok_or(OptiwaveError::UninitializedState { field: "amplitude" })
    }
    pub fn get_phase(&self) -> Result<&DMatrix<f64>> {
        self.phase
            .as_ref()
            .ok_or(OptiwaveError::UninitializedState { field: "phase" })
    }
    pub fn get_pixel_scale(&self) -> Result<f64> {
        self.pixel_scale
            .ok_or(OptiwaveError::UninitializedState {
                field: "pixel_scale",
            })
    }
    pub fn set_pixel_scale(self, pixel_scale: f64) -> Self {
        Self {
            pixel_scale: Some(pixel_scale),
            ..self
        }
    }
    /// Sets the amplitude
    ///
    /// The amplitude must be square and, if the phase is set, of the same shape
    pub fn set_amplitude(self, amplitude: DMatrix<f64>) -> Result<Self> {
        square(&amplitude)?;
        if let Some(phase) = &self.phase {
            same_shape(phase, &amplitude)?;
        }
        Ok(Self {
            amplitude: Some(amplitude),
            ..self
        })
    }
    /// Sets the phase
    ///
    /// The phase must be square and, if the amplitude is set, of the same shape
    pub fn set_phase(self, phase: DMatrix<f64>) -> Result<Self> {
        square(&phase)?;
        if let Some(amplitude) = &self.amplitude {
            same_shape(amplitude, &phase)?;
        }
        Ok(Self {
            phase: Some(phase),
            ..self
        })
    }
    /// Replaces both amplitude and phase at once
    ///
    /// The new arrays must match each other but not the previous ones
    pub fn update_phasor(self, amplitude: DMatrix<f64>, phase: DMatrix<f64>) -> Result<Self> {
        square(&amplitude)?;
        same_shape(&amplitude, &phase)?;
        Ok(Self {
            amplitude: Some(amplitude),
            phase: Some(phase),
            ..self
        })
    }
    /// Number of pixels along one side of the wavefront
    pub fn number_of_pixels(&self) -> Result<usize> {
        Ok(self.get_amplitude()?.nrows())
    }

    /// Real part of the phasor: `amplitude * cos(phase)`
    pub fn get_real(&self) -> Result<DMatrix<f64>> {
        Ok(self
            .get_amplitude()?
            .zip_map(self.get_phase()?, |a, p| a * p.cos()))
    }
    /// Imaginary part of the phasor: `amplitude * sin(phase)`
    pub fn get_imaginary(&self) -> Result<DMatrix<f64>> {
        Ok(self
            .get_amplitude()?
            .zip_map(self.get_phase()?, |a, p| a * p.sin()))
    }
    /// Complex phasor: `amplitude * exp(i*phase)`
    pub fn get_phasor(&self) -> Result<DMatrix<Complex<f64>>> {
        Ok(self
            .get_amplitude()?
            .zip_map(self.get_phase()?, |a, p| Complex::from_polar(a, p)))
    }
    /// Multiplies the amplitude by a scalar or by an array of the same shape
    pub fn multiply_amplitude<T: Into<Operand>>(self, factor: T) -> Result<Self> {
        let amplitude = factor.into().apply(self.get_amplitude()?, |a, f| a * f)?;
        self.set_amplitude(amplitude)
    }
    /// Adds a scalar or an array of the same shape to the phase
    pub fn add_phase<T: Into<Operand>>(self, delta: T) -> Result<Self> {
        let phase = delta.into().apply(self.get_phase()?, |p, d| p + d)?;
        self.set_phase(phase)
    }
    /// Power of the wavefront: `amplitude^2`
    pub fn wavefront_to_psf(&self) -> Result<DMatrix<f64>> {
        Ok(self.get_amplitude()?.map(|a| a * a))
    }
    /// Adds an optical path difference in meters, converted into phase
    pub fn add_opd<T: Into<Operand>>(self, path_difference: T) -> Result<Self> {
        let k = 2. * PI / self.wavelength;
        let phase_difference = path_difference.into().map(|opd| k * opd);
        self.add_phase(phase_difference)
    }
    /// Normalises the amplitude to a unit Frobenius norm
    pub fn normalise(self) -> Result<Self> {
        let norm = self.get_amplitude()?.norm();
        if norm == 0. {
            log::warn!("normalising a wavefront with a zero amplitude");
        }
        self.multiply_amplitude(norm.recip())
    }

    /// Paraxial pixel indices centred at `(n-1)/2`
    pub fn get_pixel_coordinates(&self, number_of_pixels: usize) -> Vec<f64> {
        coordinates::pixel_coordinates(number_of_pixels)
    }
    /// Paraxial pixel index grid of the wavefront
    pub fn get_pixel_grid(&self) -> Result<Grid> {
        Ok(coordinates::pixel_positions(
            self.number_of_pixels()?,
            [0.; 2],
        ))
    }
    /// Pixel grid in the units of the pixel scale
    pub fn get_pixel_positions(&self) -> Result<Grid> {
        let pixel_scale = self.get_pixel_scale()?;
        Ok(self.get_pixel_grid()?.scale(pixel_scale))
    }

    /// Flips the wavefront left to right
    pub fn invert_x(self) -> Result<Self> {
        let amplitude = reverse_columns(self.get_amplitude()?);
        let phase = reverse_columns(self.get_phase()?);
        self.update_phasor(amplitude, phase)
    }
    /// Flips the wavefront upside down
    pub fn invert_y(self) -> Result<Self> {
        let amplitude = reverse_rows(self.get_amplitude()?);
        let phase = reverse_rows(self.get_phase()?);
        self.update_phasor(amplitude, phase)
    }
    pub fn invert_x_and_y(self) -> Result<Self> {
        self.invert_x()?.invert_y()
    }

    /// Linear interpolation of the wavefront at fractional pixel indices
    ///
    /// The row indices are given by `coordinates.y` and the column indices by
    /// `coordinates.x`. Samples are bilinear combinations of the 4 nearest
    /// pixels where pixels outside the array count as 0: a coordinate half a
    /// pixel outside the edge returns half the edge value and a coordinate one
    /// pixel or more outside returns 0.
    ///
    /// If `real_imaginary` is true, the real and imaginary parts are interpolated
    /// and converted back into amplitude and phase, otherwise the amplitude and
    /// the phase are interpolated directly.
    ///
    /// Returns the interpolated `(amplitude, phase)`
    pub fn interpolate(
        &self,
        coordinates: &Grid,
        real_imaginary: bool,
    ) -> Result<(DMatrix<f64>, DMatrix<f64>)> {
        if real_imaginary {
            let real = map_coordinates(&self.get_real()?, coordinates);
            let imaginary = map_coordinates(&self.get_imaginary()?, coordinates);
            Ok((
                real.zip_map(&imaginary, |re, im| re.hypot(im)),
                imaginary.zip_map(&real, |im, re| im.atan2(re)),
            ))
        } else {
            Ok((
                map_coordinates(self.get_amplitude()?, coordinates),
                map_coordinates(self.get_phase()?, coordinates),
            ))
        }
    }
    /// Resamples the wavefront on a `number_of_pixels_out` wide grid with a
    /// `pixel_scale_out` pitch, keeping the grid centred on the optical axis
    ///
    /// The amplitude is scaled by the ratio of the pixel scales to conserve energy
    pub fn paraxial_interpolate(
        self,
        pixel_scale_out: f64,
        number_of_pixels_out: usize,
        real_imaginary: bool,
    ) -> Result<Self> {
        let number_of_pixels_in = self.number_of_pixels()?;
        let ratio = pixel_scale_out / self.get_pixel_scale()?;
        log::debug!(
            "paraxial interpolation: {0}x{0}px @ {1:.3e}{3} -> {2}x{2}px @ {4:.3e}{3}",
            number_of_pixels_in,
            self.get_pixel_scale()?,
            number_of_pixels_out,
            self.kind.unit(),
            pixel_scale_out
        );
        let centre = (number_of_pixels_in as f64 - 1.) * 0.5;
        let Grid { x, y } =
            coordinates::pixel_positions(number_of_pixels_out, [0.; 2]).scale(ratio);
        let coordinates = Grid {
            x: x.add_scalar(centre),
            y: y.add_scalar(centre),
        };
        let (amplitude, phase) = self.interpolate(&coordinates, real_imaginary)?;
        Ok(self
            .update_phasor(amplitude, phase)?
            .multiply_amplitude(ratio)?
            .set_pixel_scale(pixel_scale_out))
    }
    /// Zero pads the wavefront to `number_of_pixels_out` pixels
    ///
    /// The padding keeps the central pixel (or the 2x2 central block) at the centre
    pub fn pad_to(self, number_of_pixels_out: usize) -> Result<Self> {
        let number_of_pixels_in = self.number_of_pixels()?;
        if number_of_pixels_in % 2 != number_of_pixels_out % 2 {
            return Err(OptiwaveError::ParityMismatch {
                from: number_of_pixels_in,
                to: number_of_pixels_out,
            });
        }
        if number_of_pixels_out < number_of_pixels_in {
            return Err(OptiwaveError::InvalidSize {
                operation: "pad",
                from: number_of_pixels_in,
                to: number_of_pixels_out,
            });
        }
        let start = number_of_pixels_out / 2 - number_of_pixels_in / 2;
        let pad = |array: &DMatrix<f64>| {
            let mut padded: DMatrix<f64> =
                DMatrix::zeros(number_of_pixels_out, number_of_pixels_out);
            padded
                .view_mut(
                    (start, start),
                    (number_of_pixels_in, number_of_pixels_in),
                )
                .copy_from(array);
            padded
        };
        let amplitude = pad(self.get_amplitude()?);
        let phase = pad(self.get_phase()?);
        self.update_phasor(amplitude, phase)
    }
    /// Crops the wavefront to the `number_of_pixels_out` central pixels
    pub fn crop_to(self, number_of_pixels_out: usize) -> Result<Self> {
        let number_of_pixels_in = self.number_of_pixels()?;
        if number_of_pixels_in % 2 != number_of_pixels_out % 2 {
            return Err(OptiwaveError::ParityMismatch {
                from: number_of_pixels_in,
                to: number_of_pixels_out,
            });
        }
        if number_of_pixels_out > number_of_pixels_in {
            return Err(OptiwaveError::InvalidSize {
                operation: "crop",
                from: number_of_pixels_in,
                to: number_of_pixels_out,
            });
        }
        let start = number_of_pixels_in / 2 - number_of_pixels_out / 2;
        let crop = |array: &DMatrix<f64>| {
            array
                .view(
                    (start, start),
                    (number_of_pixels_out, number_of_pixels_out),
                )
                .into_owned()
        };
        let amplitude = crop(self.get_amplitude()?);
        let phase = crop(self.get_phase()?);
        self.update_phasor(amplitude, phase)
    }
}
