//! Triangle rescattering amplitudes in two representations.
//!
//! A three-body decay in which two final-state particles rescatter through
//! an exchange in the crossed channel gives rise to a triangle diagram. This
//! crate evaluates it
//!
//! - perturbatively, from the Feynman-parameter integral
//!   ([`Triangle::eval_feynman`], [`PartialWaveTriangle::eval_feynman`]), and
//! - dispersively, by projecting the left-hand-cut discontinuity onto
//!   s-channel partial waves and solving the Khuri–Treiman style dispersion
//!   relation ([`Triangle::eval_dispersive`],
//!   [`PartialWaveTriangle::eval_dispersive`]).
//!
//! Both use one cached fixed-order Gauss–Legendre table ([`GaussLegendre`])
//! for every integral, mapping semi-infinite ranges with `t = a + tan(πu/2)`.
//!
//! Branch cuts are handled by explicit `−iε` offsets rather than by the
//! principal branches of library functions, so every log and square root
//! lands on the physical sheet. Results on the wrong sheet are not detected
//! at run time; the unit tests pin reference values instead.
//!
//! # Example
//!
//! ```
//! use kt_triangle::{BreitWigner, PartialWaveTriangle, QuantumNumbers};
//! use kt_triangle::masses::M_PION;
//!
//! // S-wave, scalar exchange, no subtraction
//! let qns = QuantumNumbers::new(0, 0, 0, 0)?;
//! let rho = BreitWigner::new(0.770, 0.145)?;
//! let mut pw = PartialWaveTriangle::new(qns, 0.780, M_PION, rho)?;
//!
//! let f = pw.eval_feynman(0.3)?;
//! assert!(f.re.is_finite() && f.im.is_finite());
//! # Ok::<(), kt_triangle::Error>(())
//! ```

pub mod discontinuity;
pub mod feynman;
pub mod machine;
pub mod masses;
pub mod partial_wave;
pub mod projection;
pub mod quadrature;
pub mod triangle;
pub mod types;

pub(crate) mod algo;
pub(crate) mod utils;

pub use discontinuity::{BreitWigner, Discontinuity};
pub use feynman::{FeynmanIntegrand, FeynmanKernel};
pub use machine::KtFloat;
pub use partial_wave::PartialWaveTriangle;
pub use projection::ProjectionFunction;
pub use quadrature::{GaussLegendre, Rule};
pub use triangle::Triangle;
pub use types::{Channel, Error, KernelOrder, QuantumNumbers, Settings, Subtractions};
