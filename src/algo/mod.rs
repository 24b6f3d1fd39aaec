//! Internal numerical routines.
//!
//! Everything here is `pub(crate)`. The public evaluators in the crate root
//! bind masses and quantum numbers, then call into these modules with
//! closures over that configuration.

pub(crate) mod constants;

// Quadrature nodes
pub(crate) mod legendre;

// Closed-form y-integrals
pub(crate) mod rational;

// s-channel dispersion integral with pole subtraction
pub(crate) mod dispersion;
