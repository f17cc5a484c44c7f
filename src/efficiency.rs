//src/efficiency.rs

use log::warn;

use crate::types::{EfficiencyMetrics, LigandDescriptors};

/// Gas constant in kcal/(mol·K).
pub const GAS_CONSTANT: f64 = 1.987204259e-3;
/// Standard temperature in K.
pub const TEMPERATURE: f64 = 298.15;
/// Exponent of heavy-atom count in SILE_N.
pub const SILE_EXPONENT: f64 = 0.3;

const MIN_SASA: f64 = 1e-6;

/// Converts a binding free energy (kcal/mol) to pKi via Ki = exp(ΔG/RT).
pub fn pki(affinity: f64) -> Option<f64> {
    let ki = (affinity / (GAS_CONSTANT * TEMPERATURE)).exp();
    if ki <= 0.0 || !ki.is_finite() {
        warn!(
            "Calculated Ki is not a positive finite number ({}) from affinity {}, cannot calculate pKi.",
            ki, affinity
        );
        return None;
    }
    let value = 0.0 - ki.log10();
    value.is_finite().then_some(value)
}

/// LE, LLE, SILE_N and SILE_SASA for one docked ligand.
///
/// Each ratio is left out when one of its inputs is missing; heavy-atom
/// ratios also need at least one heavy atom.
pub fn efficiency_metrics(affinity: f64, pki: Option<f64>, descriptors: &LigandDescriptors) -> EfficiencyMetrics {
    let neg_affinity = -affinity;
    let nha = descriptors.nha.filter(|&n| n > 0).map(f64::from);

    let le = nha.map(|n| neg_affinity / n);
    let sile_n = nha.map(|n| neg_affinity / n.powf(SILE_EXPONENT));
    let lle = pki.zip(descriptors.logp).map(|(p, logp)| p - logp);

    let sile_sasa = match (pki, descriptors.sasa) {
        (Some(p), Some(sasa)) if sasa > MIN_SASA => Some(p / sasa),
        (_, Some(sasa)) if sasa <= MIN_SASA => {
            warn!("SASA is near zero ({}), cannot calculate SILE_SASA.", sasa);
            None
        }
        _ => None,
    };

    EfficiencyMetrics {
        le,
        lle,
        sile_n,
        sile_sasa,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors(nha: u32, logp: f64, sasa: Option<f64>) -> LigandDescriptors {
        LigandDescriptors {
            nha: Some(nha),
            logp: Some(logp),
            sasa,
            ..Default::default()
        }
    }

    #[test]
    fn pki_of_typical_affinity() {
        // -8.5 kcal/mol / (RT ln 10)
        let value = pki(-8.5).unwrap();
        assert!((value - 6.2305).abs() < 1e-3, "{}", value);
        assert_eq!(pki(0.0), Some(0.0));
    }

    #[test]
    fn pki_of_absurd_affinity_is_absent() {
        assert_eq!(pki(1.0e6), None);
        assert_eq!(pki(-1.0e6), None);
    }

    #[test]
    fn ratios() {
        let d = descriptors(20, 2.0, Some(400.0));
        let p = pki(-8.5);
        let m = efficiency_metrics(-8.5, p, &d);
        assert!((m.le.unwrap() - 0.425).abs() < 1e-12);
        assert!((m.sile_n.unwrap() - 8.5 / 20f64.powf(0.3)).abs() < 1e-12);
        assert!((m.lle.unwrap() - (p.unwrap() - 2.0)).abs() < 1e-12);
        assert!((m.sile_sasa.unwrap() - p.unwrap() / 400.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs_leave_gaps() {
        let zero_atoms = efficiency_metrics(-7.0, Some(5.0), &descriptors(0, 1.0, Some(0.0)));
        assert_eq!(zero_atoms.le, None);
        assert_eq!(zero_atoms.sile_n, None);
        assert_eq!(zero_atoms.sile_sasa, None);
        assert_eq!(zero_atoms.lle, Some(4.0));

        let nothing = efficiency_metrics(-7.0, None, &LigandDescriptors::default());
        assert_eq!(nothing, EfficiencyMetrics::default());
    }
}
