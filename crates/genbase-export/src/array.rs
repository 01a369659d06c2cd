//! Fixed-size numeric arrays.

use ndarray::{Array1, ArrayD, ArrayViewD, IxDyn};
use thiserror::Error;

use crate::node::Node;
use crate::value::unsigned_node;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArrayError {
    #[error("shape {shape:?} needs {expected} elements, got {actual}")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("shape {shape:?} has more elements than fit in memory")]
    ShapeOverflow { shape: Vec<usize> },
}

/// An n-dimensional numeric array (the `numpy.ndarray` analogue).
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    Int(ArrayD<i64>),
    UInt(ArrayD<u64>),
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
    Bool(ArrayD<bool>),
}

fn shaped<T>(shape: &[usize], data: Vec<T>) -> Result<ArrayD<T>, ArrayError> {
    let expected = shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| ArrayError::ShapeOverflow {
            shape: shape.to_vec(),
        })?;
    let actual = data.len();
    let mismatch = || ArrayError::ShapeMismatch {
        shape: shape.to_vec(),
        expected,
        actual,
    };
    if expected != actual {
        return Err(mismatch());
    }
    ArrayD::from_shape_vec(IxDyn(shape), data).map_err(|_| mismatch())
}

/// Row-major nesting, equivalent to `ndarray.tolist()`. A zero-dimensional
/// array yields its single element.
fn nest<T: Copy, F: Fn(T) -> Node>(view: ArrayViewD<'_, T>, leaf: &F) -> Node {
    if view.ndim() == 0 {
        return view.iter().next().map_or(Node::Null, |v| leaf(*v));
    }
    Node::Seq(view.outer_iter().map(|sub| nest(sub, leaf)).collect())
}

impl NumericArray {
    pub fn ints(shape: &[usize], data: Vec<i64>) -> Result<Self, ArrayError> {
        shaped(shape, data).map(NumericArray::Int)
    }

    pub fn uints(shape: &[usize], data: Vec<u64>) -> Result<Self, ArrayError> {
        shaped(shape, data).map(NumericArray::UInt)
    }

    pub fn floats32(shape: &[usize], data: Vec<f32>) -> Result<Self, ArrayError> {
        shaped(shape, data).map(NumericArray::Float32)
    }

    pub fn floats(shape: &[usize], data: Vec<f64>) -> Result<Self, ArrayError> {
        shaped(shape, data).map(NumericArray::Float64)
    }

    pub fn bools(shape: &[usize], data: Vec<bool>) -> Result<Self, ArrayError> {
        shaped(shape, data).map(NumericArray::Bool)
    }

    /// One-dimensional float vector.
    pub fn vector(data: Vec<f64>) -> Self {
        NumericArray::Float64(Array1::from(data).into_dyn())
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            NumericArray::Int(a) => a.shape(),
            NumericArray::UInt(a) => a.shape(),
            NumericArray::Float32(a) => a.shape(),
            NumericArray::Float64(a) => a.shape(),
            NumericArray::Bool(a) => a.shape(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NumericArray::Int(a) => a.len(),
            NumericArray::UInt(a) => a.len(),
            NumericArray::Float32(a) => a.len(),
            NumericArray::Float64(a) => a.len(),
            NumericArray::Bool(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> &'static str {
        match self {
            NumericArray::Int(_) => "int64",
            NumericArray::UInt(_) => "uint64",
            NumericArray::Float32(_) => "float32",
            NumericArray::Float64(_) => "float64",
            NumericArray::Bool(_) => "bool",
        }
    }

    /// Nested sequences of plain numbers, one nesting level per axis.
    pub fn to_node(&self) -> Node {
        match self {
            NumericArray::Int(a) => nest(a.view(), &Node::Int),
            NumericArray::UInt(a) => nest(a.view(), &unsigned_node),
            NumericArray::Float32(a) => nest(a.view(), &|v: f32| Node::Float(v.into())),
            NumericArray::Float64(a) => nest(a.view(), &Node::Float),
            NumericArray::Bool(a) => nest(a.view(), &Node::Bool),
        }
    }
}

impl From<ArrayD<i64>> for NumericArray {
    fn from(a: ArrayD<i64>) -> Self {
        NumericArray::Int(a)
    }
}

impl From<ArrayD<u64>> for NumericArray {
    fn from(a: ArrayD<u64>) -> Self {
        NumericArray::UInt(a)
    }
}

impl From<ArrayD<f32>> for NumericArray {
    fn from(a: ArrayD<f32>) -> Self {
        NumericArray::Float32(a)
    }
}

impl From<ArrayD<f64>> for NumericArray {
    fn from(a: ArrayD<f64>) -> Self {
        NumericArray::Float64(a)
    }
}

impl From<ArrayD<bool>> for NumericArray {
    fn from(a: ArrayD<bool>) -> Self {
        NumericArray::Bool(a)
    }
}
