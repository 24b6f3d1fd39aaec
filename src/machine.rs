//! Machine constants and the `KtFloat` trait.
//!
//! Everything in this crate that is independent of the physical setup (the
//! Legendre roots, the rational-integral antiderivatives, the complex
//! helpers) is generic over `KtFloat`.

use num_traits::{Float, FloatConst};

/// Floating-point trait for triangle-amplitude kernels.
///
/// Implemented for `f64` and `f32`. Provides the size of the `−iε`
/// offset used to pick the physical Riemann sheet and the tolerance
/// of the Newton iteration that locates Legendre roots.
pub trait KtFloat: Float + FloatConst + core::fmt::Debug + 'static {
    /// Magnitude of the infinitesimal `ε` in `−iε` prescriptions.
    ///
    /// This is also the distance by which dispersive integrals are kept
    /// above their thresholds.
    const IEPS: Self;
    /// Convergence tolerance for Newton refinement of Legendre roots.
    const ROOT_TOL: Self;

    /// Infallible conversion from f64.
    ///
    /// For f64 this is the identity; for f32 it truncates via `as f32`.
    fn from_f64(x: f64) -> Self;

    /// Infallible conversion from a node index or order.
    #[inline]
    fn from_usize(n: usize) -> Self {
        Self::from_f64(n as f64)
    }
}

impl KtFloat for f64 {
    const IEPS: f64 = 1.0e-6;
    const ROOT_TOL: f64 = 3.0e-14;

    #[inline]
    fn from_f64(x: f64) -> f64 {
        x
    }
}

impl KtFloat for f32 {
    // Below ~1e-6 relative to GeV² scales the offset is lost in rounding.
    const IEPS: f32 = 1.0e-4;
    const ROOT_TOL: f32 = 1.0e-6;

    #[inline]
    fn from_f64(x: f64) -> f32 {
        x as f32
    }
}
