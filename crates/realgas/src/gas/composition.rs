use nalgebra::DVector;
use realgas_core::{GasError, GasResult};

/// Mole and mass fractions of a mixture.
///
/// Both views are normalized and kept consistent on every change.
#[derive(Clone, Debug)]
pub struct Composition {
    molar_weights: DVector<f64>,
    molefracs: DVector<f64>,
    massfracs: DVector<f64>,
    molar_weight: f64,
}

impl Composition {
    /// `molar_weights` in kg/mol.
    pub fn new(molar_weights: DVector<f64>, molefracs: &[f64]) -> GasResult<Self> {
        let n = molar_weights.len();
        let mut composition = Self {
            molar_weights,
            molefracs: DVector::zeros(n),
            massfracs: DVector::zeros(n),
            molar_weight: 0.0,
        };
        composition.remix(molefracs)?;
        Ok(composition)
    }

    fn normalize(&self, values: &[f64], name: &str) -> GasResult<DVector<f64>> {
        if values.len() != self.molar_weights.len() {
            return Err(GasError::IncompatibleComponents(
                self.molar_weights.len(),
                values.len(),
            ));
        }
        if let Some(&x) = values.iter().find(|x| !x.is_finite() || **x < 0.0) {
            return Err(GasError::InvalidState(
                "composition".to_owned(),
                name.to_owned(),
                x,
            ));
        }
        let sum: f64 = values.iter().sum();
        if sum <= 0.0 {
            return Err(GasError::InvalidState(
                "composition".to_owned(),
                format!("sum of {name}"),
                sum,
            ));
        }
        Ok(DVector::from_iterator(
            values.len(),
            values.iter().map(|x| x / sum),
        ))
    }

    /// Set the mole fractions; they are normalized to one.
    pub fn remix(&mut self, molefracs: &[f64]) -> GasResult<()> {
        let x = self.normalize(molefracs, "mole fraction")?;
        self.molar_weight = x.dot(&self.molar_weights);
        self.massfracs = x.component_mul(&self.molar_weights) / self.molar_weight;
        self.molefracs = x;
        Ok(())
    }

    /// Set the mass fractions; they are normalized to one.
    pub fn remix_mass(&mut self, massfracs: &[f64]) -> GasResult<()> {
        let y = self.normalize(massfracs, "mass fraction")?;
        let moles = y.component_div(&self.molar_weights);
        let total = moles.sum();
        self.molefracs = moles / total;
        self.molar_weight = total.recip();
        self.massfracs = y;
        Ok(())
    }

    pub fn components(&self) -> usize {
        self.molar_weights.len()
    }

    pub fn molefracs(&self) -> &DVector<f64> {
        &self.molefracs
    }

    pub fn massfracs(&self) -> &DVector<f64> {
        &self.massfracs
    }

    /// Molar weights of the species in kg/mol.
    pub fn molar_weights(&self) -> &DVector<f64> {
        &self.molar_weights
    }

    /// Molar weight of the mixture in kg/mol.
    pub fn molar_weight(&self) -> f64 {
        self.molar_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::dvector;

    fn air() -> GasResult<Composition> {
        Composition::new(dvector![0.0280134, 0.0319988, 0.039948], &[78.0, 21.0, 1.0])
    }

    #[test]
    fn fractions_sum_to_one() -> GasResult<()> {
        let mut c = air()?;
        assert_relative_eq!(c.molefracs().sum(), 1.0, max_relative = 1e-14);
        assert_relative_eq!(c.massfracs().sum(), 1.0, max_relative = 1e-14);
        assert_relative_eq!(c.molar_weight(), 0.028969, max_relative = 1e-4);
        c.remix_mass(&[0.5, 0.5, 0.0])?;
        assert_relative_eq!(c.molefracs().sum(), 1.0, max_relative = 1e-14);
        assert_relative_eq!(c.massfracs().sum(), 1.0, max_relative = 1e-14);
        Ok(())
    }

    #[test]
    fn mass_and_mole_views_agree() -> GasResult<()> {
        let mut c = air()?;
        let y = c.massfracs().clone();
        let x = c.molefracs().clone();
        c.remix_mass(y.as_slice())?;
        for (a, b) in c.molefracs().iter().zip(x.iter()) {
            assert_relative_eq!(a, b, max_relative = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn invalid_compositions() -> GasResult<()> {
        let mut c = air()?;
        assert!(matches!(
            c.remix(&[1.0, 0.0]),
            Err(GasError::IncompatibleComponents(3, 2))
        ));
        assert!(c.remix(&[0.0, 0.0, 0.0]).is_err());
        assert!(c.remix(&[1.0, -0.1, 0.1]).is_err());
        assert!(c.remix_mass(&[f64::NAN, 0.5, 0.5]).is_err());
        Ok(())
    }
}
