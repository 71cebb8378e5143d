//!
//! # Optiwave
//!
//! Wavefront propagation primitives and soft-edged spider masks for telescope
//! optics simulations.
//!
//! Every transform is a pure function of its inputs: wavefronts are values that
//! are consumed and returned, never mutated behind the caller's back.
//! Optical elements implement the [`Layer`] trait and are chained either
//! directly on a [`Wavefront`] or through a [`Parameters`] bag.
//!
//! Elements are created with the builder associated to each of them:
//! ```
//! use optiwave::{Builder, DMatrix, FromBuilder, UniformSpider, Wavefront};
//!
//! let wavefront = Wavefront::builder()
//!     .wavelength(1e-6)
//!     .amplitude(DMatrix::from_element(64, 64, 1f64))
//!     .phase(DMatrix::zeros(64, 64))
//!     .pixel_scale(25.5 / 64.)
//!     .build()?;
//! let spider = UniformSpider::builder()
//!     .number_of_pixels(64)
//!     .width_of_image(25.5)
//!     .build()?;
//! let wavefront = wavefront.through(&spider)?;
//! println!("Throughput: {:.3}", wavefront.wavefront_to_psf()?.sum() / (64. * 64.));
//! # Ok::<(), optiwave::OptiwaveError>(())
//! ```

pub mod builders;
pub mod coordinates;
pub mod error;
pub mod layer;
pub mod spider;
pub mod wavefront;

#[doc(inline)]
pub use self::builders::{TomlConfig, UniformSpiderBuilder, WavefrontBuilder};
#[doc(inline)]
pub use self::coordinates::Grid;
#[doc(inline)]
pub use self::error::{ConfigError, OptiwaveError};
#[doc(inline)]
pub use self::layer::{Layer, Parameter, Parameters};
#[doc(inline)]
pub use self::spider::{Spider, SpiderGeometry, UniformSpider};
#[doc(inline)]
pub use self::wavefront::{GaussianBeam, Kind, Operand, PlaneType, Wavefront};
#[doc(hidden)]
pub use nalgebra::{Complex, DMatrix};

pub type Result<T> = std::result::Result<T, OptiwaveError>;

/// Component builder trait
pub trait Builder: Default {
    type Component;
    fn new() -> Self {
        Default::default()
    }
    fn build(self) -> Result<Self::Component>;
}

/// Gives access to the builder of a component
pub trait FromBuilder: Sized {
    type ComponentBuilder: Builder<Component = Self>;
    fn builder() -> Self::ComponentBuilder {
        Self::ComponentBuilder::new()
    }
}
