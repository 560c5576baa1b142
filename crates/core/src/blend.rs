//! The orthogonal residual blend.
//!
//! `B` is decomposed relative to `A` into a parallel part (`coef * A`) and an
//! orthogonal remainder. The two parts are weighted independently, the result
//! is held inside a trust region around `A` sized by `A`'s median absolute
//! deviation, and non-finite elements fall back to `A`.

use crate::dtype::DType;
use crate::element::Element;
use crate::params::BlendParams;
use crate::stats;
use crate::tensor::Tensor;
use serde::Serialize;

/// What happened during one blend call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BlendReport {
    /// `<B,A> / max(<A,A>, eps)` before clipping
    pub raw_coef: f64,
    /// Coefficient actually used for `B_par`, at working precision
    pub coef: f64,
    /// Whether `coef_clip` changed the coefficient
    pub coef_clipped: bool,
    /// `max(MAD(A), eps)`
    pub scale: f64,
    /// `trust_k * scale`
    pub radius: f64,
    /// Elements pulled back into the trust region
    pub clamped: usize,
    /// Elements replaced by `A` because they were not finite
    pub fallbacks: usize,
    /// Elements in the tensor
    pub numel: usize,
}

/// Blend `b` into `a`.
///
/// The result has `a`'s shape and element type. Neither input is modified.
///
/// # Panics
///
/// Panics if `a` and `b` differ in shape.
pub fn blend<T: Element>(a: &Tensor<T>, b: &Tensor<T>, params: &BlendParams) -> Tensor<T> {
    blend_with_report(a, b, params).0
}

/// [`blend`], also returning a [`BlendReport`].
pub fn blend_with_report<T: Element>(
    a: &Tensor<T>,
    b: &Tensor<T>,
    params: &BlendParams,
) -> (Tensor<T>, BlendReport) {
    assert_eq!(a.shape(), b.shape(), "blend shape mismatch");
    let (data, report) = blend_buffers(a.data(), b.data(), params, a.dtype());
    (
        Tensor::from_parts(data, a.shape().to_vec(), a.dtype()),
        report,
    )
}

/// Blend two flat buffers of equal length, at the buffer's own precision.
///
/// # Panics
///
/// Panics if the buffers differ in length.
pub fn blend_slices<T: Element>(a: &[T], b: &[T], params: &BlendParams) -> (Vec<T>, BlendReport) {
    assert_eq!(a.len(), b.len(), "blend length mismatch");
    blend_buffers(a, b, params, T::DTYPE)
}

fn blend_buffers<T: Element>(
    a: &[T],
    b: &[T],
    params: &BlendParams,
    dtype: DType,
) -> (Vec<T>, BlendReport) {
    let eps = T::narrow(params.eps as f64);

    // Projection of B onto A's direction
    let denom = stats::floor_at(stats::dot(a, a), params.eps as f64);
    let raw_coef = stats::dot(b, a) / denom;
    let coef = clip_coef(raw_coef, params.coef_clip);
    let coef_clipped = !raw_coef.is_nan() && coef != raw_coef;
    let coef = T::narrow(coef);

    let w_par = T::narrow(params.alpha_par as f64);
    let w_orth = T::narrow(params.alpha_orth as f64);
    let mut y: Vec<T> = a
        .iter()
        .zip(b.iter())
        .map(|(&a_i, &b_i)| {
            let b_par = coef * a_i;
            let b_orth = b_i - b_par;
            a_i + w_par * (b_par - a_i) + w_orth * b_orth
        })
        .collect();

    let scale = stats::robust_scale(a, eps);
    let radius = T::narrow(params.trust_k as f64) * scale;
    let clamped = stats::trust_clamp(a, &mut y, radius);

    // Judge finiteness in the output's own precision.
    for v in y.iter_mut() {
        *v = v.round_to(dtype);
    }
    let fallbacks = stats::finite_or(a, &mut y);

    let report = BlendReport {
        raw_coef,
        coef: coef.widen(),
        coef_clipped,
        scale: scale.widen(),
        radius: radius.widen(),
        clamped,
        fallbacks,
        numel: a.len(),
    };
    (y, report)
}

fn clip_coef(coef: f64, coef_clip: f32) -> f64 {
    if coef_clip > 0.0 {
        let bound = coef_clip as f64;
        if coef.is_nan() {
            return coef;
        }
        coef.max(-bound).min(bound)
    } else {
        coef
    }
}
