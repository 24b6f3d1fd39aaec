//! Complex helpers with explicit branch-cut control.
//!
//! The triangle kernels are only correct on one Riemann sheet, so every
//! multivalued function used by them is written in terms of the principal
//! `ln`/`sqrt` of `num_complex` with arguments constructed so that the sign
//! of a vanishing imaginary part is known.

use num_complex::Complex;

use crate::machine::KtFloat;

/// Multiply a complex number by i: (a+bi)·i = -b+ai.
#[inline]
pub(crate) fn mul_i<T: KtFloat>(c: Complex<T>) -> Complex<T> {
    Complex::new(-c.im, c.re)
}

/// The offset `iε`.
#[inline]
pub(crate) fn ieps<T: KtFloat>() -> Complex<T> {
    Complex::new(T::zero(), T::IEPS)
}

/// Real number promoted to the complex plane with a `+0` imaginary part.
///
/// Logarithms and square roots of negative reals promoted this way land on
/// the upper lip of the cut (`+iπ`, `+i√|x|`).
#[inline]
pub(crate) fn re<T: KtFloat>(x: T) -> Complex<T> {
    Complex::new(x, T::zero())
}

/// Real number shifted by `−iε`.
#[inline]
pub(crate) fn minus_ieps<T: KtFloat>(x: T) -> Complex<T> {
    Complex::new(x, -T::IEPS)
}

/// Square root of a real number, continued to `+i√|x|` for `x < 0`.
#[inline]
pub(crate) fn csqrt<T: KtFloat>(x: T) -> Complex<T> {
    re(x).sqrt()
}

/// Källén triangle function `λ(x,y,z) = x²+y²+z²−2(xy+yz+zx)`.
#[inline]
pub(crate) fn kallen<T: KtFloat>(x: T, y: T, z: T) -> T {
    let two = T::from_f64(2.0);
    x * x + y * y + z * z - two * (x * z + y * z + x * y)
}

/// Complex arctangent through its logarithmic form.
///
/// `atan(z) = log((z+i)/(z−i)) / (−2i)`.
///
/// This differs from the principal `atan` by a constant (`−π/2` for
/// `Re z > 0`) and puts the cut on the imaginary segment between `−i` and
/// `i`. Antiderivatives built from it are only used as differences between
/// endpoints on the same side of that cut, where the constant drops out.
#[inline]
pub(crate) fn c_atan<T: KtFloat>(z: Complex<T>) -> Complex<T> {
    let i = Complex::new(T::zero(), T::one());
    let half = T::from_f64(0.5);
    // 1/(−2i) = i/2
    mul_i(((z + i) / (z - i)).ln()) * half
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    // ── mul_i tests ──

    #[test]
    fn mul_i_rotates() {
        let z = Complex64::new(3.0, 4.0);
        assert_eq!(mul_i(z), Complex64::new(-4.0, 3.0));
        assert_eq!(mul_i(mul_i(z)), -z);
    }

    // ── csqrt tests ──

    #[test]
    fn csqrt_negative_upper_lip() {
        let r = csqrt(-4.0_f64);
        assert_eq!(r.re, 0.0);
        assert!((r.im - 2.0).abs() < 1e-15);
    }

    #[test]
    fn csqrt_positive_real() {
        let r = csqrt(9.0_f64);
        assert!((r.re - 3.0).abs() < 1e-15);
        assert_eq!(r.im, 0.0);
    }

    #[test]
    fn re_log_negative_is_plus_i_pi() {
        let l = re(-1.0_f64).ln();
        assert!(l.re.abs() < 1e-15);
        assert!((l.im - core::f64::consts::PI).abs() < 1e-15);
    }

    #[test]
    fn minus_ieps_log_negative_is_minus_i_pi() {
        let l = minus_ieps(-1.0_f64).ln();
        assert!((l.im + core::f64::consts::PI).abs() < 1e-5);
    }

    // ── kallen tests ──

    #[test]
    fn kallen_vanishes_at_threshold() {
        let m = 0.13957061_f64;
        let s = (2.0 * m) * (2.0 * m);
        assert!(kallen(s, m * m, m * m).abs() < 1e-15);
    }

    #[test]
    fn kallen_symmetric() {
        let (x, y, z) = (1.3_f64, 0.2, 0.7);
        let a = kallen(x, y, z);
        assert!((a - kallen(y, z, x)).abs() < 1e-14);
        assert!((a - kallen(z, x, y)).abs() < 1e-14);
    }

    #[test]
    fn kallen_equal_masses() {
        // λ(s, m², m²) = s(s − 4m²)
        let (s, m2) = (0.5_f64, 0.02);
        assert!((kallen(s, m2, m2) - s * (s - 4.0 * m2)).abs() < 1e-15);
    }

    // ── c_atan tests ──

    #[test]
    fn c_atan_offset_from_principal_real() {
        let c = c_atan(Complex64::new(0.5, 0.0));
        let expected = 0.5_f64.atan() - core::f64::consts::FRAC_PI_2;
        assert!((c.re - expected).abs() < 1e-14);
        assert!(c.im.abs() < 1e-14);
    }

    #[test]
    fn c_atan_offset_from_principal_complex() {
        let z = Complex64::new(1.0, 2.0);
        let diff = z.atan() - c_atan(z);
        assert!((diff.re - core::f64::consts::FRAC_PI_2).abs() < 1e-14);
        assert!(diff.im.abs() < 1e-14);
    }

    #[test]
    fn c_atan_derivative() {
        // d/dz atan(z) = 1/(1+z²) away from the cut
        let z = Complex64::new(0.7, -0.3);
        let h = 1e-6;
        let dz = Complex64::new(h, 0.0);
        let num = (c_atan(z + dz) - c_atan(z - dz)) / (2.0 * h);
        let exact = Complex64::new(1.0, 0.0) / (z * z + 1.0);
        assert!((num - exact).norm() < 1e-8);
    }

    #[test]
    fn c_atan_f32() {
        use num_complex::Complex32;
        let c = c_atan(Complex32::new(0.5, 0.0));
        let expected = 0.5_f32.atan() - core::f32::consts::FRAC_PI_2;
        assert!((c.re - expected).abs() < 1e-5);
    }
}
