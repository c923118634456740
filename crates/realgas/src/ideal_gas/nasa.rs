//! Seven coefficient NASA polynomials for ideal gas heat capacity,
//! enthalpy and entropy.
use serde::{Deserialize, Serialize};

/// Coefficients of a two-range NASA-7 polynomial.
///
/// `cp/R = a0 + a1 T + a2 T² + a3 T³ + a4 T⁴`, `a5` and `a6` are the
/// integration constants of enthalpy and entropy.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Nasa7Record {
    /// temperature in K that separates the two ranges
    pub t_mid: f64,
    pub low: [f64; 7],
    pub high: [f64; 7],
}

impl Nasa7Record {
    pub const fn new(t_mid: f64, low: [f64; 7], high: [f64; 7]) -> Self {
        Self { t_mid, low, high }
    }

    fn coefficients(&self, t: f64) -> &[f64; 7] {
        if t < self.t_mid {
            &self.low
        } else {
            &self.high
        }
    }

    /// Dimensionless isobaric heat capacity `cp/R`.
    pub fn cp(&self, t: f64) -> f64 {
        let a = self.coefficients(t);
        a[0] + t * (a[1] + t * (a[2] + t * (a[3] + t * a[4])))
    }

    /// Dimensionless enthalpy `h/(RT)` including the enthalpy of formation.
    pub fn h(&self, t: f64) -> f64 {
        let a = self.coefficients(t);
        a[0] + t * (a[1] / 2.0 + t * (a[2] / 3.0 + t * (a[3] / 4.0 + t * a[4] / 5.0))) + a[5] / t
    }

    /// Dimensionless entropy `s/R` at the reference pressure.
    pub fn s(&self, t: f64) -> f64 {
        let a = self.coefficients(t);
        a[0] * t.ln() + t * (a[1] + t * (a[2] / 2.0 + t * (a[3] / 3.0 + t * a[4] / 4.0))) + a[6]
    }

    /// Dimensionless Gibbs energy `g/(RT) = h/(RT) - s/R` at the reference pressure.
    pub fn g(&self, t: f64) -> f64 {
        self.h(t) - self.s(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WATER: Nasa7Record = Nasa7Record::new(
        1000.0,
        [
            4.19864056,
            -2.03643410e-3,
            6.52040211e-6,
            -5.48797062e-9,
            1.77197817e-12,
            -30293.7267,
            -0.849032208,
        ],
        [
            3.03399249,
            2.17691804e-3,
            -1.64072518e-7,
            -9.70419870e-11,
            1.68200992e-14,
            -30004.2971,
            4.96677010,
        ],
    );

    #[test]
    fn standard_state_of_water() {
        let t = 298.15;
        // enthalpy of formation -241.8 kJ/mol, entropy 188.8 J/(mol K)
        assert_relative_eq!(WATER.h(t) * t * 8.314462618, -241826.0, max_relative = 1e-3);
        assert_relative_eq!(WATER.s(t) * 8.314462618, 188.83, max_relative = 1e-3);
        assert_relative_eq!(WATER.cp(t) * 8.314462618, 33.59, max_relative = 1e-2);
    }

    #[test]
    fn ranges_join_continuously() {
        let (lo, hi) = (999.999999, 1000.0);
        assert_relative_eq!(WATER.cp(lo), WATER.cp(hi), max_relative = 1e-4);
        assert_relative_eq!(WATER.h(lo), WATER.h(hi), max_relative = 1e-4);
        assert_relative_eq!(WATER.s(lo), WATER.s(hi), max_relative = 1e-4);
    }
}
