use super::{Gas, GasProperty, RealGas, StateProperty};
use crate::multiparameter::HelmholtzFluid;
use crate::transport::{
    eucken_conductivity, interaction_matrix, mixture_conductivity, mixture_viscosity,
    TransportProperties,
};
use nalgebra::{DMatrix, DVector};
use realgas_core::{check_positive, GasError, GasResult, RGAS};

/// Mass specific properties.
///
/// Temperatures are in K, pressures in Pa and specific volumes in m³/kg.
/// Every property is computed for the current composition and cached
/// until the state or the composition changes.
impl Gas {
    fn update_tp(&mut self, t: f64, p: f64) -> GasResult<()> {
        check_positive("Gas", "temperature", t)?;
        check_positive("Gas", "pressure", p)?;
        self.tp_cache.update(t, p);
        Ok(())
    }

    fn update_tv(&mut self, t: f64, v: f64) -> GasResult<()> {
        check_positive("Gas", "temperature", t)?;
        check_positive("Gas", "volume", v)?;
        self.tv_cache.update(t, v);
        Ok(())
    }

    /// Specific volume in m³/kg.
    pub fn v(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.update_tp(t, p)?;
        let id = GasProperty::Volume;
        if !self.tp_cache.test(id) {
            let v = match &mut self.eos {
                RealGas::Ideal => RGAS / self.composition.molar_weight() * t / p,
                RealGas::Cubic(eos) => eos.v(t, p)?,
                RealGas::Helmholtz(eos) => eos.v(t, p)?,
            };
            self.tp_cache.set(id, v);
        }
        Ok(self.tp_cache.get(id))
    }

    /// Density in kg/m³.
    pub fn rho(&mut self, t: f64, p: f64) -> GasResult<f64> {
        Ok(self.v(t, p)?.recip())
    }

    /// Pressure in Pa.
    pub fn p(&mut self, t: f64, v: f64) -> GasResult<f64> {
        self.volumetric(t, v, StateProperty::Pressure)
    }

    pub fn dpdv(&mut self, t: f64, v: f64) -> GasResult<f64> {
        self.volumetric(t, v, StateProperty::DpDv)
    }

    pub fn dpdt(&mut self, t: f64, v: f64) -> GasResult<f64> {
        self.volumetric(t, v, StateProperty::DpDt)
    }

    pub fn dvdt(&mut self, t: f64, v: f64) -> GasResult<f64> {
        Ok(-self.dpdt(t, v)? / self.dpdv(t, v)?)
    }

    fn volumetric(&mut self, t: f64, v: f64, id: StateProperty) -> GasResult<f64> {
        self.update_tv(t, v)?;
        if !self.tv_cache.test(id) {
            let r = RGAS / self.composition.molar_weight();
            let value = match (&mut self.eos, id) {
                (RealGas::Ideal, StateProperty::Pressure) => r * t / v,
                (RealGas::Ideal, StateProperty::DpDv) => -r * t / (v * v),
                (RealGas::Ideal, StateProperty::DpDt) => r / v,
                (RealGas::Cubic(eos), StateProperty::Pressure) => eos.p(t, v)?,
                (RealGas::Cubic(eos), StateProperty::DpDv) => eos.dpdv(t, v)?,
                (RealGas::Cubic(eos), StateProperty::DpDt) => eos.dpdt(t, v)?,
                (RealGas::Helmholtz(eos), StateProperty::Pressure) => eos.p(t, v)?,
                (RealGas::Helmholtz(eos), StateProperty::DpDv) => eos.dpdv(t, v)?,
                (RealGas::Helmholtz(eos), StateProperty::DpDt) => eos.dpdt(t, v)?,
            };
            self.tv_cache.set(id, value);
        }
        Ok(self.tv_cache.get(id))
    }

    /// Temperature in K at pressure `p` and specific volume `v`.
    pub fn t(&mut self, p: f64, v: f64) -> GasResult<f64> {
        check_positive("Gas", "pressure", p)?;
        check_positive("Gas", "volume", v)?;
        match &mut self.eos {
            RealGas::Ideal => Ok(p * v * self.composition.molar_weight() / RGAS),
            RealGas::Cubic(eos) => eos.t(p, v),
            RealGas::Helmholtz(eos) => eos.t(p, v),
        }
    }

    /// Computes and caches cp, cv, h and s together.
    fn caloric(&mut self, t: f64, p: f64, id: GasProperty) -> GasResult<f64> {
        self.update_tp(t, p)?;
        if !self.tp_cache.test(id) {
            let x = self.composition.molefracs();
            let m = self.composition.molar_weight();
            let ig = &self.ideal_gas;
            let ideal = || {
                (
                    ig.molar_cp(t, x) / m,
                    ig.molar_enthalpy(t, x) / m,
                    ig.molar_entropy(t, p, x) / m,
                )
            };
            let (cp, cv, h, s) = match &mut self.eos {
                RealGas::Ideal => {
                    let (cp, h, s) = ideal();
                    (cp, cp - RGAS / m, h, s)
                }
                RealGas::Cubic(eos) => {
                    let (cp, h, s) = ideal();
                    let d = eos.departures(t, p)?;
                    (cp + d.cp, cp - RGAS / m + d.cv, h + d.h, s + d.s)
                }
                RealGas::Helmholtz(eos) => (eos.cp(t, p)?, eos.cv(t, p)?, eos.h(t, p)?, eos.s(t, p)?),
            };
            self.tp_cache.set(GasProperty::Cp, cp);
            self.tp_cache.set(GasProperty::Cv, cv);
            self.tp_cache.set(GasProperty::Enthalpy, h);
            self.tp_cache.set(GasProperty::Entropy, s);
        }
        Ok(self.tp_cache.get(id))
    }

    /// Isobaric heat capacity in J/(kg K).
    pub fn cp(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.caloric(t, p, GasProperty::Cp)
    }

    /// Isochoric heat capacity in J/(kg K).
    pub fn cv(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.caloric(t, p, GasProperty::Cv)
    }

    pub fn gamma(&mut self, t: f64, p: f64) -> GasResult<f64> {
        Ok(self.cp(t, p)? / self.cv(t, p)?)
    }

    /// Enthalpy in J/kg including the enthalpies of formation.
    pub fn h(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.caloric(t, p, GasProperty::Enthalpy)
    }

    /// Internal energy in J/kg.
    pub fn u(&mut self, t: f64, p: f64) -> GasResult<f64> {
        Ok(self.h(t, p)? - p * self.v(t, p)?)
    }

    /// Entropy in J/(kg K).
    pub fn s(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.caloric(t, p, GasProperty::Entropy)
    }

    /// Gibbs energy in J/kg.
    pub fn gibbs(&mut self, t: f64, p: f64) -> GasResult<f64> {
        Ok(self.h(t, p)? - t * self.s(t, p)?)
    }

    pub fn dsdt(&mut self, t: f64, p: f64) -> GasResult<f64> {
        Ok(self.cp(t, p)? / t)
    }

    pub fn dsdp(&mut self, t: f64, p: f64) -> GasResult<f64> {
        let v = self.v(t, p)?;
        Ok(-self.dvdt(t, v)?)
    }

    /// Speed of sound in m/s.
    pub fn c(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.update_tp(t, p)?;
        let id = GasProperty::SpeedOfSound;
        if !self.tp_cache.test(id) {
            let c = if let RealGas::Helmholtz(eos) = &mut self.eos {
                eos.w(t, p)?
            } else {
                let v = self.v(t, p)?;
                (-v * v * self.gamma(t, p)? * self.dpdv(t, v)?).sqrt()
            };
            self.tp_cache.set(id, c);
        }
        Ok(self.tp_cache.get(id))
    }

    /// Isobaric expansion coefficient in 1/K.
    pub fn alpha(&mut self, t: f64, p: f64) -> GasResult<f64> {
        let v = self.v(t, p)?;
        Ok(self.dvdt(t, v)? / v)
    }

    /// Relative pressure coefficient in 1/K.
    pub fn beta(&mut self, t: f64, p: f64) -> GasResult<f64> {
        let v = self.v(t, p)?;
        Ok(self.dpdt(t, v)? / p)
    }

    /// Isothermal compressibility in 1/Pa.
    pub fn kappa(&mut self, t: f64, p: f64) -> GasResult<f64> {
        let v = self.v(t, p)?;
        Ok(-1.0 / (v * self.dpdv(t, v)?))
    }

    /// Enthalpy of formation of the mixture at 298.15 K in J/kg.
    pub fn hf(&self) -> f64 {
        self.ideal_gas
            .enthalpy_of_formation(self.composition.molefracs())
            / self.composition.molar_weight()
    }

    /// Dynamic viscosity in Pa s.
    ///
    /// Only oxygen has a correlation that covers dense states. Every other
    /// model uses kinetic theory of the dilute gas, which is not applied to
    /// liquid states of the multiparameter fluids.
    pub fn mu(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.transport(t, p, GasProperty::Viscosity)
    }

    /// Thermal conductivity in W/(m K), with the same range as [Gas::mu].
    pub fn lambda(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.transport(t, p, GasProperty::Conductivity)
    }

    /// Prandtl number.
    pub fn pr(&mut self, t: f64, p: f64) -> GasResult<f64> {
        Ok(self.mu(t, p)? * self.cp(t, p)? / self.lambda(t, p)?)
    }

    fn transport(&mut self, t: f64, p: f64, id: GasProperty) -> GasResult<f64> {
        self.update_tp(t, p)?;
        if !self.tp_cache.test(id) {
            let (mu, lambda) = match &mut self.eos {
                RealGas::Helmholtz(HelmholtzFluid::Oxygen(eos)) => {
                    (eos.viscosity(t, p)?, eos.thermal_conductivity(t, p)?)
                }
                RealGas::Helmholtz(eos) => {
                    if eos.is_liquid(t, p)? {
                        return Err(GasError::OutOfRange {
                            property: "pressure".to_owned(),
                            value: p,
                            min: 0.0,
                            max: eos.p_vap(t)?,
                        });
                    }
                    self.dilute_transport(t)?
                }
                _ => self.dilute_transport(t)?,
            };
            self.tp_cache.set(GasProperty::Viscosity, mu);
            self.tp_cache.set(GasProperty::Conductivity, lambda);
        }
        Ok(self.tp_cache.get(id))
    }

    /// Kinetic theory viscosity and conductivity of the dilute mixture.
    fn dilute_transport(&self, t: f64) -> GasResult<(f64, f64)> {
        let n = self.components();
        let m = self.composition.molar_weights();
        let mut mu = DVector::zeros(n);
        let mut lambda = DVector::zeros(n);
        for (i, record) in self.parameters.pure.iter().enumerate() {
            let lj = record.lennard_jones.ok_or_else(|| {
                GasError::IncompatibleParameters(format!(
                    "no Lennard-Jones parameters for {}",
                    self.parameters.identifiers[i]
                ))
            })?;
            let r = RGAS / m[i];
            mu[i] = lj.viscosity(m[i] * 1e3, t);
            lambda[i] = eucken_conductivity(mu[i], record.nasa7.cp(t) * r, r);
        }
        let phi: DMatrix<f64> = interaction_matrix(&mu, m, |i, j| {
            self.parameters
                .binary
                .iter()
                .find(|b| (b.id1, b.id2) == (i, j))
                .and_then(|b| b.model_record.viscosity)
                .map(|phi| phi.phi(t))
        });
        let x = self.composition.molefracs();
        Ok((
            mixture_viscosity(x, &mu, &phi),
            mixture_conductivity(x, &lambda, &phi),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{species_parameters, GasModel};
    use super::*;
    use crate::multiparameter::Fluid;
    use approx::assert_relative_eq;
    use realgas_core::cubic::CubicKind;
    use realgas_core::T_REF;

    #[test]
    fn ideal_gas_air() -> GasResult<()> {
        let mut air = Gas::new(GasModel::Ideal, &["N2", "O2", "AR"], &[0.7809, 0.2095, 0.0096])?;
        let (t, p) = (300.0, 1e5);
        assert_relative_eq!(air.molar_weight(), 28.96e-3, max_relative = 1e-3);
        assert_relative_eq!(air.rho(t, p)?, 1.161, max_relative = 2e-3);
        assert_relative_eq!(air.cp(t, p)?, 1005.0, max_relative = 5e-3);
        assert_relative_eq!(air.gamma(t, p)?, 1.4, max_relative = 5e-3);
        assert_relative_eq!(air.c(t, p)?, 347.2, max_relative = 5e-3);
        assert_relative_eq!(air.mu(t, p)?, 18.5e-6, max_relative = 0.05);
        assert_relative_eq!(air.lambda(t, p)?, 26.3e-3, max_relative = 0.1);
        // elements in their reference state
        assert_relative_eq!(air.hf(), 0.0, epsilon = 100.0);
        let steam = Gas::pure(GasModel::Ideal, "H2O")?;
        assert_relative_eq!(steam.hf(), -241.826e3 / 18.01528e-3, max_relative = 1e-3);
        Ok(())
    }

    #[test]
    fn ideal_gas_identities() -> GasResult<()> {
        let mut gas = Gas::new(GasModel::Ideal, &["H2O", "CO2"], &[0.3, 0.7])?;
        let (t, p) = (800.0, 2e5);
        let v = gas.v(t, p)?;
        assert_relative_eq!(gas.p(t, v)?, p, max_relative = 1e-12);
        assert_relative_eq!(gas.t(p, v)?, t, max_relative = 1e-12);
        assert_relative_eq!(gas.alpha(t, p)?, 1.0 / t, max_relative = 1e-12);
        assert_relative_eq!(gas.beta(t, p)?, 1.0 / t, max_relative = 1e-12);
        assert_relative_eq!(gas.kappa(t, p)?, 1.0 / p, max_relative = 1e-12);
        assert_relative_eq!(
            gas.cp(t, p)? - gas.cv(t, p)?,
            gas.gas_constant(),
            max_relative = 1e-12
        );
        assert_relative_eq!(gas.u(t, p)?, gas.h(t, p)? - gas.gas_constant() * t, max_relative = 1e-10);
        Ok(())
    }

    #[test]
    fn entropy_derivatives() -> GasResult<()> {
        for model in [
            GasModel::Ideal,
            GasModel::Cubic(CubicKind::PengRobinson),
            GasModel::Helmholtz(Fluid::Methane),
        ] {
            let mut gas = Gas::pure(model, "CH4")?;
            let (t, p) = (250.0, 3e6);
            let (dt, dp) = (1e-3, 10.0);
            let dsdt = (gas.s(t + dt, p)? - gas.s(t - dt, p)?) / (2.0 * dt);
            let dsdp = (gas.s(t, p + dp)? - gas.s(t, p - dp)?) / (2.0 * dp);
            assert_relative_eq!(gas.dsdt(t, p)?, dsdt, max_relative = 1e-5);
            assert_relative_eq!(gas.dsdp(t, p)?, dsdp, max_relative = 1e-4);
            let dhdt = (gas.h(t + dt, p)? - gas.h(t - dt, p)?) / (2.0 * dt);
            assert_relative_eq!(gas.cp(t, p)?, dhdt, max_relative = 1e-5);
        }
        Ok(())
    }

    #[test]
    fn cache_follows_composition() -> GasResult<()> {
        let mut gas = Gas::new(GasModel::Cubic(CubicKind::PengRobinson), &["CH4", "N2"], &[0.5, 0.5])?;
        let (t, p) = (200.0, 5e6);
        let rho_mix = gas.rho(t, p)?;
        gas.remix(&[1.0, 0.0])?;
        let rho_ch4 = gas.rho(t, p)?;
        assert!((rho_mix - rho_ch4).abs() > 1.0);
        let mut pure = Gas::pure(GasModel::Cubic(CubicKind::PengRobinson), "CH4")?;
        assert_relative_eq!(rho_ch4, pure.rho(t, p)?, max_relative = 1e-10);
        Ok(())
    }

    #[test]
    fn missing_transport_data() -> GasResult<()> {
        let mut parameters = species_parameters(&["N2", "AR"])?;
        parameters.pure[1].lennard_jones = None;
        let mut gas = Gas::from_parameters(GasModel::Ideal, parameters, &[0.5, 0.5])?;
        assert!(gas.cp(300.0, 1e5).is_ok());
        assert!(matches!(
            gas.mu(300.0, 1e5),
            Err(GasError::IncompatibleParameters(_))
        ));
        Ok(())
    }

    #[test]
    fn oxygen_uses_dense_fluid_correlation() -> GasResult<()> {
        let mut dense = Gas::helmholtz(Fluid::Oxygen)?;
        let mut dilute = Gas::pure(GasModel::Ideal, "O2")?;
        let (t, p) = (300.0, 1e5);
        assert_relative_eq!(dense.mu(t, p)?, 20.652e-6, max_relative = 1e-3);
        assert_relative_eq!(dilute.mu(t, p)?, dense.mu(t, p)?, max_relative = 0.05);
        // liquid oxygen
        assert!(dense.mu(90.0, 1e6)? > 1e-4);
        Ok(())
    }

    #[test]
    fn dilute_transport_is_not_used_for_liquids() -> GasResult<()> {
        let mut hydrogen = Gas::helmholtz(Fluid::Hydrogen)?;
        assert!(hydrogen.mu(300.0, 1e5)? > 0.0);
        assert!(hydrogen.rho(20.0, 1e6)? > 60.0);
        assert!(matches!(
            hydrogen.mu(20.0, 1e6),
            Err(GasError::OutOfRange { .. })
        ));
        assert!(matches!(
            hydrogen.lambda(20.0, 1e6),
            Err(GasError::OutOfRange { .. })
        ));
        Ok(())
    }

    #[test]
    fn helmholtz_shares_database_reference_state() -> GasResult<()> {
        let p = 1e3;
        for fluid in [
            Fluid::Hydrogen,
            Fluid::ParaHydrogen,
            Fluid::Oxygen,
            Fluid::Methane,
        ] {
            let mut real = Gas::helmholtz(fluid)?;
            let mut ideal = Gas::pure(GasModel::Ideal, fluid.formula())?;
            let t = T_REF;
            assert_relative_eq!(real.h(t, p)?, ideal.h(t, p)?, max_relative = 1e-6, epsilon = 30.0);
            assert_relative_eq!(real.s(t, p)?, ideal.s(t, p)?, epsilon = 0.1);
            assert_relative_eq!(
                real.gibbs(t, p)?,
                ideal.gibbs(t, p)?,
                max_relative = 1e-6,
                epsilon = 60.0
            );
        }
        // methane with formation enthalpy of -74.6 kJ/mol
        let mut real = Gas::helmholtz(Fluid::Methane)?;
        let mut ideal = Gas::pure(GasModel::Ideal, "CH4")?;
        assert_relative_eq!(real.h(400.0, p)?, ideal.h(400.0, p)?, max_relative = 1e-3);
        assert!(real.h(400.0, p)? < -4e6);
        Ok(())
    }

    #[test]
    fn invalid_state() -> GasResult<()> {
        let mut gas = Gas::pure(GasModel::Ideal, "N2")?;
        assert!(matches!(gas.cp(-1.0, 1e5), Err(GasError::InvalidState(..))));
        assert!(matches!(gas.v(300.0, f64::NAN), Err(GasError::InvalidState(..))));
        Ok(())
    }
}
