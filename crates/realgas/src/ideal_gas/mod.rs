//! Ideal gas properties of species and their mixtures.
use nalgebra::DVector;
use realgas_core::{P_REF, RGAS};

mod nasa;
pub use nasa::Nasa7Record;

/// Ideal gas mixture of species described by NASA-7 polynomials.
///
/// All quantities are molar, mixture values are mole fraction weighted
/// superpositions of the species values.
#[derive(Clone, Debug)]
pub struct IdealGasMixture {
    records: Vec<Nasa7Record>,
}

impl IdealGasMixture {
    pub fn new(records: Vec<Nasa7Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Nasa7Record] {
        &self.records
    }

    /// Molar isobaric heat capacity in J/(mol K).
    pub fn molar_cp(&self, t: f64, molefracs: &DVector<f64>) -> f64 {
        self.weighted(molefracs, |r| r.cp(t)) * RGAS
    }

    /// Molar enthalpy in J/mol, including enthalpies of formation.
    pub fn molar_enthalpy(&self, t: f64, molefracs: &DVector<f64>) -> f64 {
        self.weighted(molefracs, |r| r.h(t)) * RGAS * t
    }

    /// Molar entropy in J/(mol K) including the entropy of mixing.
    pub fn molar_entropy(&self, t: f64, p: f64, molefracs: &DVector<f64>) -> f64 {
        let s = self.weighted(molefracs, |r| r.s(t));
        let mixing: f64 = molefracs
            .iter()
            .filter(|&&x| x > 0.0)
            .map(|&x| x * (x * p / P_REF).ln())
            .sum();
        RGAS * (s - mixing)
    }

    /// Chemical potentials of the species in the standard state, divided by RT.
    pub fn standard_chemical_potentials(&self, t: f64) -> DVector<f64> {
        DVector::from_iterator(self.records.len(), self.records.iter().map(|r| r.g(t)))
    }

    /// Molar enthalpy of formation at `T_REF` in J/mol.
    pub fn enthalpy_of_formation(&self, molefracs: &DVector<f64>) -> f64 {
        let t = realgas_core::T_REF;
        self.molar_enthalpy(t, molefracs)
    }

    fn weighted<F: Fn(&Nasa7Record) -> f64>(&self, molefracs: &DVector<f64>, f: F) -> f64 {
        self.records
            .iter()
            .zip(molefracs.iter())
            .filter(|(_, &x)| x > 0.0)
            .map(|(r, x)| x * f(r))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::dvector;

    const ARGON: Nasa7Record = Nasa7Record::new(
        1000.0,
        [2.5, 0.0, 0.0, 0.0, 0.0, -745.375, 4.366],
        [2.5, 0.0, 0.0, 0.0, 0.0, -745.375, 4.366],
    );

    #[test]
    fn monatomic_gas() {
        let ig = IdealGasMixture::new(vec![ARGON]);
        let x = dvector![1.0];
        assert_relative_eq!(ig.molar_cp(500.0, &x), 2.5 * RGAS);
        let dh = ig.molar_enthalpy(600.0, &x) - ig.molar_enthalpy(500.0, &x);
        assert_relative_eq!(dh, 2.5 * RGAS * 100.0, max_relative = 1e-12);
    }

    #[test]
    fn entropy_of_mixing() {
        let ig = IdealGasMixture::new(vec![ARGON, ARGON]);
        let pure = ig.molar_entropy(400.0, P_REF, &dvector![1.0, 0.0]);
        let mix = ig.molar_entropy(400.0, P_REF, &dvector![0.5, 0.5]);
        assert_relative_eq!(mix - pure, RGAS * 2f64.ln(), max_relative = 1e-12);
    }
}
