//! Hadron masses and two-body thresholds, in GeV and GeV².

/// Charged pion.
pub const M_PION: f64 = 0.13957061;
/// Charged kaon.
pub const M_KAON: f64 = 0.496;
pub const M_ETA: f64 = 0.54753;
pub const M_RHO: f64 = 0.77545;
/// f2(1270).
pub const M_F2: f64 = 1.2754;

/// ππ threshold `4m_π²`.
pub const S_TH_PION: f64 = 4.0 * M_PION * M_PION;
/// KK̄ threshold `4m_K²`.
pub const S_TH_KAON: f64 = 4.0 * M_KAON * M_KAON;
/// ηη threshold `4m_η²`.
pub const S_TH_ETA: f64 = 4.0 * M_ETA * M_ETA;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_ordered() {
        assert!(S_TH_PION < S_TH_KAON && S_TH_KAON < S_TH_ETA);
        assert!((S_TH_PION.sqrt() - 2.0 * M_PION).abs() < 1e-15);
    }
}
