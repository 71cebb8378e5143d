//!
//! # Optical layers
//!
//! An optical element transforms a [`Wavefront`] into a new one.
//! Elements are chained by an optical system driver that keeps the current
//! wavefront in a [`Parameters`] bag under the `"Wavefront"` key.

use nalgebra::DMatrix;
use std::collections::BTreeMap;

use crate::{OptiwaveError, Result, Wavefront};

/// Key of the wavefront entry in [`Parameters`]
pub const WAVEFRONT: &str = "Wavefront";

/// A value stored in the parameter bag
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Wavefront(Wavefront),
    Scalar(f64),
    Array(DMatrix<f64>),
    Text(String),
}
impl From<Wavefront> for Parameter {
    fn from(wavefront: Wavefront) -> Self {
        Parameter::Wavefront(wavefront)
    }
}
impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Parameter::Scalar(value)
    }
}
impl From<DMatrix<f64>> for Parameter {
    fn from(value: DMatrix<f64>) -> Self {
        Parameter::Array(value)
    }
}
impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Parameter::Text(value.to_owned())
    }
}

/// Parameter bag shared by the optical elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(BTreeMap<String, Parameter>);
impl Parameters {
    pub fn new() -> Self {
        Default::default()
    }
    /// Creates a parameter bag holding `wavefront`
    pub fn with_wavefront(wavefront: Wavefront) -> Self {
        Self::new().insert(WAVEFRONT, wavefront)
    }
    /// Inserts or replaces the entry `key`
    pub fn insert<K: Into<String>, P: Into<Parameter>>(mut self, key: K, value: P) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.0.get(key)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Returns the current wavefront
    pub fn wavefront(&self) -> Result<&Wavefront> {
        match self.0.get(WAVEFRONT) {
            Some(Parameter::Wavefront(wavefront)) => Ok(wavefront),
            Some(_) => Err(OptiwaveError::MissingParameter(format!(
                "`{WAVEFRONT}` is not a wavefront"
            ))),
            None => Err(OptiwaveError::MissingParameter(WAVEFRONT.into())),
        }
    }
    /// Removes the current wavefront from the bag and returns it with the bag
    pub fn take_wavefront(mut self) -> Result<(Wavefront, Self)> {
        match self.0.remove(WAVEFRONT) {
            Some(Parameter::Wavefront(wavefront)) => Ok((wavefront, self)),
            Some(_) => Err(OptiwaveError::MissingParameter(format!(
                "`{WAVEFRONT}` is not a wavefront"
            ))),
            None => Err(OptiwaveError::MissingParameter(WAVEFRONT.into())),
        }
    }
    /// Sets the current wavefront
    pub fn insert_wavefront(self, wavefront: Wavefront) -> Self {
        self.insert(WAVEFRONT, wavefront)
    }
}

/// An optical element that mutates a [`Wavefront`] should implement the `Layer` trait
pub trait Layer {
    /// Returns the wavefront transformed by the element
    fn propagate(&self, wavefront: Wavefront) -> Result<Wavefront>;
    /// Transforms the `"Wavefront"` entry of the parameter bag
    ///
    /// The other entries are passed through unchanged
    fn apply(&self, parameters: Parameters) -> Result<Parameters> {
        let (wavefront, parameters) = parameters.take_wavefront()?;
        Ok(parameters.insert_wavefront(self.propagate(wavefront)?))
    }
}
