//! Robust statistics over flat buffers.
//!
//! These helpers know nothing about [`Tensor`](crate::Tensor); they take plain
//! slices of any [`Element`] so the blend can run over any contiguous buffer.
//!
//! Floors and clamps here propagate NaN instead of absorbing it. A NaN that
//! reaches [`finite_or`] is replaced by the anchor value there, which is the
//! only place non-finite values are resolved.

use crate::element::Element;
use num_traits::Float;
use std::cmp::Ordering;

/// Dot product accumulated in f64.
pub fn dot<T: Element>(a: &[T], b: &[T]) -> f64 {
    assert_eq!(a.len(), b.len(), "dot length mismatch");
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| x.widen() * y.widen())
        .sum()
}

/// `max(x, floor)` that keeps NaN.
pub fn floor_at(x: f64, floor: f64) -> f64 {
    if x < floor {
        floor
    } else {
        x
    }
}

/// Clamp to `[-radius, radius]`, keeping NaN.
///
/// A negative radius pins every value to `radius`, matching the usual
/// `min(max(x, lo), hi)` clamp rather than panicking like [`f32::clamp`].
pub fn clamp_symmetric<T: Element>(x: T, radius: T) -> T {
    if x.is_nan() || radius.is_nan() {
        return T::nan();
    }
    x.max(-radius).min(radius)
}

/// Median of a slice.
///
/// For an even count this is the midpoint of the two middle order statistics.
/// Returns NaN for an empty slice.
pub fn median<T: Element>(xs: &[T]) -> T {
    let mut buf = xs.to_vec();
    median_in_place(&mut buf)
}

fn median_in_place<T: Element>(buf: &mut [T]) -> T {
    let n = buf.len();
    if n == 0 {
        return T::nan();
    }

    let mid = n / 2;
    let (lower, upper, _) = buf.select_nth_unstable_by(mid, T::order);
    let upper = *upper;
    if n % 2 == 1 {
        return upper;
    }

    // Largest element of the lower partition is the other middle value.
    let lower = lower.iter().copied().fold(T::neg_infinity(), |acc, v| {
        if v.order(&acc) == Ordering::Greater {
            v
        } else {
            acc
        }
    });
    lower + (upper - lower) * T::narrow(0.5)
}

/// Median absolute deviation: the median of `|x - median(xs)|`.
pub fn mad<T: Element>(xs: &[T]) -> T {
    let center = median(xs);
    let mut deviations: Vec<T> = xs.iter().map(|&x| (x - center).abs()).collect();
    median_in_place(&mut deviations)
}

/// Robust spread of `xs`: `max(MAD(xs), eps)`.
pub fn robust_scale<T: Element>(xs: &[T], eps: T) -> T {
    T::narrow(floor_at(mad(xs).widen(), eps.widen()))
}

/// Pull every element of `y` back to within `radius` of the matching `anchor`
/// element: `y = anchor + clamp(y - anchor, -radius, radius)`.
///
/// Returns how many elements were moved.
pub fn trust_clamp<T: Element>(anchor: &[T], y: &mut [T], radius: T) -> usize {
    assert_eq!(anchor.len(), y.len(), "trust_clamp length mismatch");
    let mut moved = 0;
    for (yi, &ai) in y.iter_mut().zip(anchor.iter()) {
        let delta = *yi - ai;
        let bounded = clamp_symmetric(delta, radius);
        if bounded != delta && !delta.is_nan() {
            moved += 1;
        }
        *yi = ai + bounded;
    }
    moved
}

/// Replace every non-finite element of `y` with the matching `anchor` element.
///
/// Returns how many elements were replaced.
pub fn finite_or<T: Element>(anchor: &[T], y: &mut [T]) -> usize {
    assert_eq!(anchor.len(), y.len(), "finite_or length mismatch");
    let mut replaced = 0;
    for (yi, &ai) in y.iter_mut().zip(anchor.iter()) {
        if !yi.is_finite() {
            *yi = ai;
            replaced += 1;
        }
    }
    replaced
}
