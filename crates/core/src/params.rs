//! Blend parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default weight of the step from `A` toward `B`'s projection onto `A`.
pub const DEFAULT_ALPHA_PAR: f32 = 0.20;
/// Default weight of `B`'s component orthogonal to `A`.
pub const DEFAULT_ALPHA_ORTH: f32 = 0.60;
/// Default trust radius, in units of `A`'s robust scale.
pub const DEFAULT_TRUST_K: f32 = 3.0;
/// Default numerical floor.
pub const DEFAULT_EPS: f32 = 1e-8;
/// Default bound on the projection coefficient.
pub const DEFAULT_COEF_CLIP: f32 = 8.0;

/// The five scalars that configure a blend.
///
/// Use the builder methods to override individual values:
///
/// ```
/// use orbit_core::BlendParams;
///
/// let params = BlendParams::default().with_alpha_par(0.25).with_alpha_orth(0.5);
/// assert_eq!(params.trust_k, 3.0);
/// ```
///
/// Deserializing fills missing fields from [`BlendParams::default`], so a
/// config file only needs the values it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendParams {
    /// Weight of the move from `A` toward `B`'s parallel component.
    pub alpha_par: f32,
    /// Weight of `B`'s orthogonal component added to `A`.
    pub alpha_orth: f32,
    /// Trust radius multiplier.
    pub trust_k: f32,
    /// Floor for `<A,A>` and for the robust scale.
    pub eps: f32,
    /// Bound on `|coef|`; zero or negative disables clipping.
    pub coef_clip: f32,
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            alpha_par: DEFAULT_ALPHA_PAR,
            alpha_orth: DEFAULT_ALPHA_ORTH,
            trust_k: DEFAULT_TRUST_K,
            eps: DEFAULT_EPS,
            coef_clip: DEFAULT_COEF_CLIP,
        }
    }
}

impl BlendParams {
    /// Parameters with every default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `alpha_par`.
    pub fn with_alpha_par(mut self, alpha_par: f32) -> Self {
        self.alpha_par = alpha_par;
        self
    }

    /// Set `alpha_orth`.
    pub fn with_alpha_orth(mut self, alpha_orth: f32) -> Self {
        self.alpha_orth = alpha_orth;
        self
    }

    /// Set `trust_k`.
    pub fn with_trust_k(mut self, trust_k: f32) -> Self {
        self.trust_k = trust_k;
        self
    }

    /// Set `eps`.
    pub fn with_eps(mut self, eps: f32) -> Self {
        self.eps = eps;
        self
    }

    /// Set `coef_clip`. Pass `0.0` to disable clipping.
    pub fn with_coef_clip(mut self, coef_clip: f32) -> Self {
        self.coef_clip = coef_clip;
        self
    }

    /// Whether the projection coefficient is clipped.
    pub fn clips_coef(&self) -> bool {
        self.coef_clip > 0.0
    }

    /// Check the parameters a caller is expected to guarantee.
    ///
    /// The blend itself never calls this; it stays total over any input and
    /// absorbs degenerate values through its fallback.
    pub fn validate(&self) -> Result<(), ParamError> {
        let named = [
            ("alpha_par", self.alpha_par),
            ("alpha_orth", self.alpha_orth),
            ("trust_k", self.trust_k),
            ("eps", self.eps),
            ("coef_clip", self.coef_clip),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(ParamError::NonFinite { name, value });
            }
        }
        if self.eps <= 0.0 {
            return Err(ParamError::NonPositiveEps(self.eps));
        }
        if self.trust_k < 0.0 {
            return Err(ParamError::NegativeTrustRadius(self.trust_k));
        }
        Ok(())
    }
}

/// Invalid blend parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// A parameter is NaN or infinite.
    #[error("parameter {name} must be finite, got {value}")]
    NonFinite {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// `eps` must be strictly positive.
    #[error("eps must be > 0, got {0}")]
    NonPositiveEps(f32),

    /// `trust_k` must not be negative.
    #[error("trust_k must be >= 0, got {0}")]
    NegativeTrustRadius(f32),
}
