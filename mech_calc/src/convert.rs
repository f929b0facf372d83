//! Unit conversions between SI and gravitational force/torque units.
//!
//! Servo datasheets quote stall torque in kgf*cm while the solvers work in
//! newtons and newton-metres, so both units appear on every output record.

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Conversion factor from newtons to kilograms-force.
pub const NEWTON_TO_KGF: f64 = 0.101971621;

/// Conversion factor from kilogram-force-centimetres to newton-metres.
pub const KGFCM_TO_NM: f64 = 0.0980665;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a torque in newton-metres into kilogram-force-centimetres.
pub fn nm_to_kgfcm(torque_nm: f64) -> f64 {
    torque_nm / KGFCM_TO_NM
}

/// Convert a torque in kilogram-force-centimetres into newton-metres.
pub fn kgfcm_to_nm(torque_kgfcm: f64) -> f64 {
    torque_kgfcm * KGFCM_TO_NM
}

/// Convert a force in newtons into kilograms-force.
pub fn newton_to_kgf(force_n: f64) -> f64 {
    force_n * NEWTON_TO_KGF
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_torque_conversion() {
        assert!((nm_to_kgfcm(1.0) - 10.1971621).abs() < 1e-6);
        assert!((kgfcm_to_nm(nm_to_kgfcm(0.25)) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_force_conversion() {
        assert!((newton_to_kgf(9.80665) - 1.0).abs() < 1e-9);
    }
}
