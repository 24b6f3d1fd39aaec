//! Closed-form antiderivatives over a quadratic denominator.
//!
//! With `q(y) = a y² + b y + c` and complex coefficients:
//!
//! | Function | Integrand |
//! |----------|-----------|
//! | [`ri_poly1`] | `1 / q(y)` |
//! | [`ri_poly2`] | `(e y² + f y + g) / q(y)` |
//! | [`ri_log1`]  | `log(1 / q(y))` |
//!
//! Each returns the antiderivative at one endpoint; callers take the
//! difference between two endpoints. The arctangent is [`c_atan`], whose cut
//! is known, so the difference is correct as long as the segment
//! `(2ay + b)/√(4ac − b²)` traced between the endpoints does not cross the
//! imaginary axis between `−i` and `i`. Callers keep the path off that cut by
//! giving `b` or `c` a `−iε` imaginary part; nothing here checks it.
//!
//! All three are singular at `b² = 4ac`.

use num_complex::Complex;

use crate::machine::KtFloat;
use crate::utils::c_atan;

/// Antiderivative of `1/(a y² + b y + c)`.
#[inline]
pub(crate) fn ri_poly1<T: KtFloat>(
    y: T,
    a: Complex<T>,
    b: Complex<T>,
    c: Complex<T>,
) -> Complex<T> {
    let two = T::from_f64(2.0);
    let d = a * c * T::from_f64(4.0) - b * b;
    let sd = d.sqrt();
    c_atan((a * (two * y) + b) / sd) * two / sd
}

/// Antiderivative of `(e y² + f y + g)/(a y² + b y + c)`.
///
/// Polynomial division leaves `e/a` plus a linear remainder over `q`,
/// giving an arctangent, a logarithm and a linear term.
#[allow(clippy::too_many_arguments)]
pub(crate) fn ri_poly2<T: KtFloat>(
    y: T,
    a: Complex<T>,
    b: Complex<T>,
    c: Complex<T>,
    e: Complex<T>,
    f: Complex<T>,
    g: Complex<T>,
) -> Complex<T> {
    let two = T::from_f64(2.0);
    let d = b * b - a * c * T::from_f64(4.0);
    let smd = (-d).sqrt();
    let q = a * (y * y) + b * y + c;

    let t1 = c_atan((a * (two * y) + b) / smd)
        * (b * b * e - a * f * b + a * (a * g - c * e) * two)
        / (a * a * smd);
    let t2 = q.ln() * (a * f - b * e) / (a * a * two);
    let t3 = e * y / a;
    t1 + t2 + t3
}

/// Antiderivative of `log(1/(a y² + b y + c))`.
pub(crate) fn ri_log1<T: KtFloat>(y: T, a: Complex<T>, b: Complex<T>, c: Complex<T>) -> Complex<T> {
    let two = T::from_f64(2.0);
    let d = b * b - a * c * T::from_f64(4.0);
    let smd = (-d).sqrt();
    let q = a * (y * y) + b * y + c;

    let t1 = -c_atan((a * (two * y) + b) / smd) * smd / a;
    let t2 = q.inv().ln() * y;
    let t3 = q.ln() * (-b / (a * two));
    let t4 = Complex::new(two * y, T::zero());
    t1 + t2 + t3 + t4
}
