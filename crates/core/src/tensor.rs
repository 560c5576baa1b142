//! Minimal N-d tensor: a flat row-major buffer, a shape, and an element type.

use crate::dtype::DType;
use crate::element::Element;
use num_traits::Float;

/// An N-dimensional row-major tensor.
///
/// Values live in a working buffer of `T` (`f32` by default, `f64` for F64
/// data). The [`DType`] records the element type the tensor was loaded as
/// (and will be written back as); values are already rounded to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T: Element = f32> {
    data: Vec<T>,
    shape: Vec<usize>,
    dtype: DType,
}

/// Number of elements described by a shape. A rank-0 shape holds one scalar.
///
/// Saturates at `usize::MAX`; use [`checked_numel`] for untrusted shapes.
pub fn numel(shape: &[usize]) -> usize {
    checked_numel(shape).unwrap_or(usize::MAX)
}

/// Number of elements described by a shape, or `None` if it overflows `usize`.
pub fn checked_numel(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

impl Tensor<f32> {
    /// Create an F32 tensor of zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: vec![0.0; numel(shape)],
            shape: shape.to_vec(),
            dtype: DType::F32,
        }
    }

    /// Create an F32 tensor from a flat slice.
    pub fn from_slice(data: &[f32], shape: &[usize]) -> Self {
        Self::from_vec(data.to_vec(), shape.to_vec(), DType::F32)
    }

    /// Create a tensor from an owned `f32` buffer.
    ///
    /// Values are rounded to `dtype`.
    pub fn from_vec(data: Vec<f32>, shape: Vec<usize>, dtype: DType) -> Self {
        Self::from_parts(data, shape, dtype)
    }

    /// Re-tag the tensor with another element type, rounding values to it.
    pub fn with_dtype(self, dtype: DType) -> Self {
        Self::from_parts(self.data, self.shape, dtype)
    }
}

impl Tensor<f64> {
    /// Create an F64 tensor from an owned buffer.
    pub fn from_f64_vec(data: Vec<f64>, shape: Vec<usize>) -> Self {
        Self::from_parts(data, shape, DType::F64)
    }
}

impl<T: Element> Tensor<T> {
    /// Create a tensor from a buffer of any working type.
    ///
    /// Values are rounded to `dtype`.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not match the shape.
    pub fn from_parts(mut data: Vec<T>, shape: Vec<usize>, dtype: DType) -> Self {
        assert_eq!(data.len(), numel(&shape), "data length mismatch");
        for v in data.iter_mut() {
            *v = v.round_to(dtype);
        }
        Self { data, shape, dtype }
    }

    /// Flat row-major view of the values.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consume the tensor and return its buffer.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Dimensions, outermost first.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Element type.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Whether every element is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Dot product over all elements, accumulated in f64.
    pub fn dot(&self, other: &Tensor<T>) -> f64 {
        assert_eq!(self.shape, other.shape, "dot shape mismatch");
        crate::stats::dot(&self.data, &other.data)
    }

    /// Largest absolute element-wise difference.
    pub fn max_abs_diff(&self, other: &Tensor<T>) -> T {
        assert_eq!(self.shape, other.shape, "max_abs_diff shape mismatch");
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| (a - b).abs())
            .fold(T::zero(), T::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let t = Tensor::zeros(&[2, 3]);
        assert_eq!(t.data(), &[0.0; 6]);
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.dtype(), DType::F32);
    }

    #[test]
    fn test_scalar_shape_holds_one_element() {
        let t = Tensor::from_slice(&[4.0], &[]);
        assert_eq!(t.numel(), 1);
        assert!(t.shape().is_empty());
    }

    #[test]
    fn test_checked_numel() {
        assert_eq!(checked_numel(&[]), Some(1));
        assert_eq!(checked_numel(&[2, 3, 4]), Some(24));
        assert_eq!(checked_numel(&[0, usize::MAX]), Some(0));
        assert_eq!(checked_numel(&[1 << 32, 1 << 32, 16]), None);
    }

    #[test]
    #[should_panic(expected = "data length mismatch")]
    fn test_from_slice_length_mismatch() {
        Tensor::from_slice(&[1.0, 2.0, 3.0], &[2, 2]);
    }

    #[test]
    fn test_from_vec_rounds_to_dtype() {
        let t = Tensor::from_vec(vec![0.1, 1.0e6], vec![2], DType::F16);
        assert_eq!(t.data()[0], half::f16::from_f32(0.1).to_f32());
        assert!(t.data()[1].is_infinite());
        assert!(!t.is_finite());
    }

    #[test]
    fn test_f64_tensor_keeps_full_precision() {
        let values = vec![0.1, -0.3, 1.0 / 3.0, 1.0e300];
        let t = Tensor::from_f64_vec(values.clone(), vec![2, 2]);
        assert_eq!(t.dtype(), DType::F64);
        assert_eq!(t.data(), values.as_slice());
        assert!(t.is_finite());
    }

    #[test]
    fn test_with_dtype_keeps_shape() {
        let t = Tensor::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]).with_dtype(DType::BF16);
        assert_eq!(t.shape(), &[3, 2]);
        assert_eq!(t.dtype(), DType::BF16);
        assert_eq!(t.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_dot() {
        let a = Tensor::from_slice(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
        let b = Tensor::from_slice(&[10.0, 20.0, 30.0, 40.0], &[2, 2]);
        assert_eq!(a.dot(&b), 300.0);
    }

    #[test]
    #[should_panic(expected = "dot shape mismatch")]
    fn test_dot_shape_mismatch() {
        let a = Tensor::from_slice(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
        let b = Tensor::from_slice(&[1.0, 2.0, 3.0, 4.0], &[4]);
        a.dot(&b);
    }

    #[test]
    fn test_max_abs_diff() {
        let a = Tensor::from_slice(&[1.0, 2.0, 3.0], &[3]);
        let b = Tensor::from_slice(&[1.5, 2.0, 1.0], &[3]);
        assert_eq!(a.max_abs_diff(&b), 2.0);
    }
}
