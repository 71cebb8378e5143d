use nalgebra::DMatrix;

use crate::{OptiwaveError, Result};

/// Right-hand side of an elementwise wavefront operation
///
/// Either a scalar broadcast to the whole array or an array of the same shape
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(f64),
    Array(DMatrix<f64>),
}
impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}
impl From<DMatrix<f64>> for Operand {
    fn from(value: DMatrix<f64>) -> Self {
        Operand::Array(value)
    }
}
impl From<&DMatrix<f64>> for Operand {
    fn from(value: &DMatrix<f64>) -> Self {
        Operand::Array(value.clone())
    }
}
impl Operand {
    /// Applies `f` to the scalar or to every array element
    pub fn map<F: Fn(f64) -> f64>(self, f: F) -> Self {
        match self {
            Operand::Scalar(value) => Operand::Scalar(f(value)),
            Operand::Array(array) => Operand::Array(array.map(f)),
        }
    }
    /// Combines `lhs` elementwise with the operand
    pub(crate) fn apply<F: Fn(f64, f64) -> f64>(
        self,
        lhs: &DMatrix<f64>,
        f: F,
    ) -> Result<DMatrix<f64>> {
        match self {
            Operand::Scalar(value) => Ok(lhs.map(|x| f(x, value))),
            Operand::Array(array) if array.shape() == lhs.shape() => {
                Ok(lhs.zip_map(&array, f))
            }
            Operand::Array(array) => Err(OptiwaveError::ShapeMismatch {
                expected: lhs.shape(),
                found: array.shape(),
            }),
        }
    }
}
