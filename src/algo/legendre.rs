//! Gauss–Legendre nodes and weights.
//!
//! Roots of `P_N` are located by Newton iteration from the asymptotic
//! estimate `cos(π(i − 1/4)/(N + 1/2))`, with `P_N` and `P_N'` evaluated by
//! the three-term recurrence. Roots are symmetric about the interval
//! midpoint so only half of them are refined.

use crate::machine::KtFloat;

/// Iteration cap for the Newton refinement of one root.
const MAX_NEWTON: usize = 100;

/// Compute the `n`-point Gauss–Legendre rule on `[x1, x2]`.
///
/// Returns `(abscissas, weights)`, abscissas in increasing order.
/// The rule integrates polynomials of degree `2n − 1` exactly.
pub(crate) fn gauleg<T: KtFloat>(x1: T, x2: T, n: usize) -> (Vec<T>, Vec<T>) {
    let mut x = vec![T::zero(); n];
    let mut w = vec![T::zero(); n];

    let one = T::one();
    let two = T::from_f64(2.0);
    let half = T::from_f64(0.5);
    let nf = T::from_usize(n);

    let m = n.div_ceil(2);
    let xm = half * (x2 + x1);
    let xl = half * (x2 - x1);

    for i in 0..m {
        // Asymptotic estimate of the i-th root (descending from +1)
        let mut z = (T::PI() * (T::from_usize(i) + T::from_f64(0.75)) / (nf + half)).cos();

        for _ in 0..MAX_NEWTON {
            let (p1, p2) = legendre_pair(z, n);
            // P_n'(z) from P_n and P_{n-1}
            let pp = nf * (z * p1 - p2) / (z * z - one);
            let z1 = z;
            z = z1 - p1 / pp;
            if (z - z1).abs() <= T::ROOT_TOL {
                break;
            }
        }

        // Derivative at the converged root for the weight
        let (p1, p2) = legendre_pair(z, n);
        let pp = nf * (z * p1 - p2) / (z * z - one);

        x[i] = xm - xl * z;
        x[n - 1 - i] = xm + xl * z;
        w[i] = two * xl / ((one - z * z) * pp * pp);
        w[n - 1 - i] = w[i];
    }

    (x, w)
}

/// `(P_n(z), P_{n−1}(z))` by upward recurrence.
#[inline]
fn legendre_pair<T: KtFloat>(z: T, n: usize) -> (T, T) {
    let mut p1 = T::one();
    let mut p2 = T::zero();
    for j in 0..n {
        let jf = T::from_usize(j);
        let p3 = p2;
        p2 = p1;
        p1 = ((T::from_f64(2.0) * jf + T::one()) * z * p2 - jf * p3) / (jf + T::one());
    }
    (p1, p2)
}
