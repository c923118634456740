//! Multiparameter Helmholtz energy equations of state of pure fluids.
//!
//! A fluid is described by an implementation of [HelmholtzSurface], which
//! supplies the reduced ideal gas and residual Helmholtz energies and
//! their partial derivatives. [HelmholtzEos] turns these into
//! thermodynamic properties and performs the inversions from pressure to
//! volume and from pressure and volume to temperature.
use crate::cache::{CacheIndex, PropertyCache};
use crate::errors::{check_positive, check_range, GasResult};
use crate::{DampedNewton, SolverOptions};

mod saturation;
pub mod terms;
mod vapor;
pub use saturation::Saturation;
pub use vapor::VaporPressureCurve;

const MAX_ITER_DENSITY: usize = 100;
const TOL_DENSITY: f64 = 1e-12;
const MAX_ITER_TEMPERATURE: usize = 100;
const TOL_TEMPERATURE: f64 = 1e-12;

/// Partial derivatives of a reduced Helmholtz energy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Partial {
    Value,
    Delta,
    DeltaDelta,
    Tau,
    TauTau,
    DeltaTau,
}

impl Partial {
    pub const ALL: [Partial; 6] = [
        Self::Value,
        Self::Delta,
        Self::DeltaDelta,
        Self::Tau,
        Self::TauTau,
        Self::DeltaTau,
    ];

    /// Order of the derivative with respect to delta and tau.
    pub fn orders(self) -> (usize, usize) {
        match self {
            Self::Value => (0, 0),
            Self::Delta => (1, 0),
            Self::DeltaDelta => (2, 0),
            Self::Tau => (0, 1),
            Self::TauTau => (0, 2),
            Self::DeltaTau => (1, 1),
        }
    }
}

/// Constants and range of validity of a fluid.
#[derive(Clone, Copy, Debug)]
pub struct FluidConstants {
    pub name: &'static str,
    /// molar mass in kg/mol
    pub molar_weight: f64,
    /// molar gas constant used in the correlation in J/(mol K)
    pub gas_constant: f64,
    /// critical temperature in K
    pub t_crit: f64,
    /// critical density in kg/m³
    pub rho_crit: f64,
    /// critical pressure in Pa
    pub p_crit: f64,
    /// triple point temperature in K
    pub t_triple: f64,
    pub t_min: f64,
    pub t_max: f64,
    pub p_max: f64,
    /// upper bound of the density iteration in kg/m³
    pub rho_max: f64,
}

impl FluidConstants {
    /// Specific gas constant in J/(kg K).
    pub fn specific_gas_constant(&self) -> f64 {
        self.gas_constant / self.molar_weight
    }
}

/// Reduced Helmholtz energy `phi(tau, delta) = phi0 + phir` of a fluid.
///
/// Implementors may memoize intermediate results, which is why evaluation
/// takes `&mut self`.
pub trait HelmholtzSurface {
    fn constants(&self) -> &FluidConstants;

    /// Coefficients `(n, k)` of the vapor pressure ancillary
    /// `ln(p/pc) = Tc/T sum(n theta^k)`.
    fn vapor_pressure_coefficients(&self) -> &'static [(f64, f64)];

    /// Ideal gas part and its partial derivatives.
    fn phi0(&mut self, tau: f64, delta: f64, partial: Partial) -> f64;

    /// Residual part and its partial derivatives.
    fn phir(&mut self, tau: f64, delta: f64, partial: Partial) -> f64;
}

#[derive(Clone, Copy)]
enum Property {
    Phi0,
    Phi0T,
    Phi0TT,
    Phi0D,
    Phi0DD,
    Phir,
    PhirT,
    PhirTT,
    PhirD,
    PhirDD,
    PhirDT,
    Pressure,
    DpDv,
    DpDt,
    Cv,
    Cp,
    Entropy,
    Enthalpy,
    InternalEnergy,
    SpeedOfSound,
}

impl CacheIndex for Property {
    const COUNT: usize = 20;

    fn index(self) -> usize {
        self as usize
    }
}

/// Thermodynamic properties of a pure fluid from its Helmholtz energy.
///
/// All properties are specific (per unit mass) and in SI units. The
/// object holds a single current state `(T, v)`; every accessor first sets
/// the state and then returns cached values where possible.
#[derive(Clone, Debug)]
pub struct HelmholtzEos<S> {
    surface: S,
    constants: FluidConstants,
    vapor: VaporPressureCurve,
    r: f64,
    cache: PropertyCache<Property>,
    tau: f64,
    delta: f64,
    last_tp: Option<(f64, f64, f64)>,
    h_offset: f64,
    s_offset: f64,
    options: SolverOptions,
}

impl<S: HelmholtzSurface> HelmholtzEos<S> {
    pub fn new(surface: S) -> Self {
        let constants = *surface.constants();
        let vapor = VaporPressureCurve::new(
            constants.t_crit,
            constants.p_crit,
            constants.t_triple,
            surface.vapor_pressure_coefficients(),
        );
        Self {
            surface,
            r: constants.specific_gas_constant(),
            constants,
            vapor,
            cache: PropertyCache::new(),
            tau: f64::NAN,
            delta: f64::NAN,
            last_tp: None,
            h_offset: 0.0,
            s_offset: 0.0,
            options: SolverOptions::default(),
        }
    }

    /// Options for all inversions of this object.
    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn constants(&self) -> &FluidConstants {
        &self.constants
    }

    pub fn vapor_pressure_curve(&self) -> &VaporPressureCurve {
        &self.vapor
    }

    /// Specific gas constant in J/(kg K).
    pub fn gas_constant(&self) -> f64 {
        self.r
    }

    /// Temperature and specific volume of the current state.
    pub fn state(&self) -> (f64, f64) {
        self.cache.state()
    }

    fn check_temperature(&self, t: f64) -> GasResult<()> {
        check_positive("Helmholtz equation of state", "temperature", t)?;
        check_range("temperature", t, self.constants.t_min, self.constants.t_max)
    }

    fn check_pressure(&self, p: f64) -> GasResult<()> {
        check_positive("Helmholtz equation of state", "pressure", p)?;
        check_range("pressure", p, 0.0, self.constants.p_max)
    }

    pub fn update_tv(&mut self, t: f64, v: f64) -> GasResult<()> {
        self.check_temperature(t)?;
        check_positive("Helmholtz equation of state", "volume", v)?;
        if self.cache.update(t, v) {
            self.tau = self.constants.t_crit / t;
            self.delta = 1.0 / (v * self.constants.rho_crit);
        }
        Ok(())
    }

    pub fn update_tp(&mut self, t: f64, p: f64) -> GasResult<()> {
        let v = match self.last_tp {
            Some((t0, p0, v0)) if t0 == t && p0 == p => v0,
            _ => {
                self.check_temperature(t)?;
                self.check_pressure(p)?;
                let liquid = self.is_liquid(t, p)?;
                let delta = self.density_iteration(t, p, liquid)?;
                let v = 1.0 / (delta * self.constants.rho_crit);
                self.last_tp = Some((t, p, v));
                v
            }
        };
        self.update_tv(t, v)
    }

    // reduced Helmholtz energies of the current state

    pub fn phi0(&mut self) -> f64 {
        self.ideal(Property::Phi0, Partial::Value)
    }

    pub fn phi0_t(&mut self) -> f64 {
        self.ideal(Property::Phi0T, Partial::Tau)
    }

    pub fn phi0_tt(&mut self) -> f64 {
        self.ideal(Property::Phi0TT, Partial::TauTau)
    }

    pub fn phi0_d(&mut self) -> f64 {
        self.ideal(Property::Phi0D, Partial::Delta)
    }

    pub fn phi0_dd(&mut self) -> f64 {
        self.ideal(Property::Phi0DD, Partial::DeltaDelta)
    }

    pub fn phir(&mut self) -> f64 {
        self.residual(Property::Phir, Partial::Value)
    }

    pub fn phir_t(&mut self) -> f64 {
        self.residual(Property::PhirT, Partial::Tau)
    }

    pub fn phir_tt(&mut self) -> f64 {
        self.residual(Property::PhirTT, Partial::TauTau)
    }

    pub fn phir_d(&mut self) -> f64 {
        self.residual(Property::PhirD, Partial::Delta)
    }

    pub fn phir_dd(&mut self) -> f64 {
        self.residual(Property::PhirDD, Partial::DeltaDelta)
    }

    pub fn phir_dt(&mut self) -> f64 {
        self.residual(Property::PhirDT, Partial::DeltaTau)
    }

    fn ideal(&mut self, id: Property, partial: Partial) -> f64 {
        let (tau, delta) = (self.tau, self.delta);
        let surface = &mut self.surface;
        self.cache
            .get_or_insert_with(id, || surface.phi0(tau, delta, partial))
    }

    fn residual(&mut self, id: Property, partial: Partial) -> f64 {
        let (tau, delta) = (self.tau, self.delta);
        let surface = &mut self.surface;
        self.cache
            .get_or_insert_with(id, || surface.phir(tau, delta, partial))
    }

    // properties of the current state

    fn pressure_state(&mut self) -> f64 {
        if !self.cache.test(Property::Pressure) {
            let (t, v) = self.state();
            let p = self.r * t / v * (1.0 + self.delta * self.phir_d());
            self.cache.set(Property::Pressure, p);
        }
        self.cache.get(Property::Pressure)
    }

    fn dpdv_state(&mut self) -> f64 {
        if !self.cache.test(Property::DpDv) {
            let (t, v) = self.state();
            let d = self.delta;
            let dpdrho = self.r * t * (1.0 + 2.0 * d * self.phir_d() + d * d * self.phir_dd());
            self.cache.set(Property::DpDv, -dpdrho / (v * v));
        }
        self.cache.get(Property::DpDv)
    }

    fn dpdt_state(&mut self) -> f64 {
        if !self.cache.test(Property::DpDt) {
            let (_, v) = self.state();
            let x = 1.0 + self.delta * self.phir_d() - self.delta * self.tau * self.phir_dt();
            self.cache.set(Property::DpDt, self.r / v * x);
        }
        self.cache.get(Property::DpDt)
    }

    fn cv_state(&mut self) -> f64 {
        if !self.cache.test(Property::Cv) {
            let cv = -self.r * self.tau * self.tau * (self.phi0_tt() + self.phir_tt());
            self.cache.set(Property::Cv, cv);
        }
        self.cache.get(Property::Cv)
    }

    fn cp_state(&mut self) -> f64 {
        if !self.cache.test(Property::Cp) {
            let (d, tau) = (self.delta, self.tau);
            let num = 1.0 + d * self.phir_d() - d * tau * self.phir_dt();
            let den = 1.0 + 2.0 * d * self.phir_d() + d * d * self.phir_dd();
            let cp = self.cv_state() + self.r * num * num / den;
            self.cache.set(Property::Cp, cp);
        }
        self.cache.get(Property::Cp)
    }

    fn entropy_state(&mut self) -> f64 {
        if !self.cache.test(Property::Entropy) {
            let s = self.tau * (self.phi0_t() + self.phir_t()) - self.phi0() - self.phir();
            self.cache.set(Property::Entropy, self.r * s + self.s_offset);
        }
        self.cache.get(Property::Entropy)
    }

    fn enthalpy_state(&mut self) -> f64 {
        if !self.cache.test(Property::Enthalpy) {
            let (t, _) = self.state();
            let h = self.tau * (self.phi0_t() + self.phir_t()) + self.delta * self.phir_d() + 1.0;
            self.cache.set(Property::Enthalpy, self.r * t * h + self.h_offset);
        }
        self.cache.get(Property::Enthalpy)
    }

    fn internal_energy_state(&mut self) -> f64 {
        if !self.cache.test(Property::InternalEnergy) {
            let (t, _) = self.state();
            let u = self.tau * (self.phi0_t() + self.phir_t());
            self.cache.set(Property::InternalEnergy, self.r * t * u + self.h_offset);
        }
        self.cache.get(Property::InternalEnergy)
    }

    fn speed_of_sound_state(&mut self) -> f64 {
        if !self.cache.test(Property::SpeedOfSound) {
            let (t, _) = self.state();
            let (d, tau) = (self.delta, self.tau);
            let num = 1.0 + d * self.phir_d() - d * tau * self.phir_dt();
            let w2 = 1.0 + 2.0 * d * self.phir_d() + d * d * self.phir_dd()
                - num * num / (tau * tau * (self.phi0_tt() + self.phir_tt()));
            self.cache.set(Property::SpeedOfSound, (self.r * t * w2).sqrt());
        }
        self.cache.get(Property::SpeedOfSound)
    }

    // state functions

    /// Pressure in Pa.
    pub fn p(&mut self, t: f64, v: f64) -> GasResult<f64> {
        self.update_tv(t, v)?;
        Ok(self.pressure_state())
    }

    /// Specific volume in m³/kg. The phase is chosen from the vapor
    /// pressure curve below the critical temperature.
    pub fn v(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.update_tp(t, p)?;
        Ok(self.state().1)
    }

    /// Density in kg/m³.
    pub fn rho(&mut self, t: f64, p: f64) -> GasResult<f64> {
        Ok(1.0 / self.v(t, p)?)
    }

    /// Temperature in K at given pressure and specific volume.
    pub fn t(&mut self, p: f64, v: f64) -> GasResult<f64> {
        check_positive("Helmholtz equation of state", "pressure", p)?;
        check_positive("Helmholtz equation of state", "volume", v)?;
        let FluidConstants {
            t_crit,
            rho_crit,
            t_min,
            t_max,
            ..
        } = self.constants;
        let delta = 1.0 / (v * rho_crit);
        let r = self.r;
        let tau0 = t_crit * r / (p * v);
        let surface = &mut self.surface;
        let newton = DampedNewton::new(
            "HelmholtzEos::t",
            self.options,
            MAX_ITER_TEMPERATURE,
            TOL_TEMPERATURE,
        )
        .bounds(t_crit / t_max, t_crit / t_min)
        .max_step(0.25)
        .step_tolerance(TOL_TEMPERATURE);
        let res = newton.solve(tau0, |tau| {
            let t = t_crit / tau;
            let phir_d = surface.phir(tau, delta, Partial::Delta);
            let phir_dt = surface.phir(tau, delta, Partial::DeltaTau);
            let pressure = r * t / v * (1.0 + delta * phir_d);
            let dpdt = r / v * (1.0 + delta * phir_d - delta * tau * phir_dt);
            Ok(((pressure - p) / p, -dpdt * t / tau / p))
        })?;
        let t = t_crit / res.x;
        self.update_tv(t, v)?;
        Ok(t)
    }

    /// `(dp/dv)_T` in Pa kg/m³.
    pub fn dpdv(&mut self, t: f64, v: f64) -> GasResult<f64> {
        self.update_tv(t, v)?;
        Ok(self.dpdv_state())
    }

    /// `(dp/dT)_v` in Pa/K.
    pub fn dpdt(&mut self, t: f64, v: f64) -> GasResult<f64> {
        self.update_tv(t, v)?;
        Ok(self.dpdt_state())
    }

    /// `(dv/dT)_p` in m³/(kg K).
    pub fn dvdt(&mut self, t: f64, v: f64) -> GasResult<f64> {
        self.update_tv(t, v)?;
        Ok(-self.dpdt_state() / self.dpdv_state())
    }

    // caloric properties at (T, p)

    pub fn cv(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.update_tp(t, p)?;
        Ok(self.cv_state())
    }

    pub fn cp(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.update_tp(t, p)?;
        Ok(self.cp_state())
    }

    pub fn gamma(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.update_tp(t, p)?;
        Ok(self.cp_state() / self.cv_state())
    }

    pub fn s(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.update_tp(t, p)?;
        Ok(self.entropy_state())
    }

    pub fn h(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.update_tp(t, p)?;
        Ok(self.enthalpy_state())
    }

    pub fn u(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.update_tp(t, p)?;
        Ok(self.internal_energy_state())
    }

    /// Speed of sound in m/s.
    pub fn w(&mut self, t: f64, p: f64) -> GasResult<f64> {
        self.update_tp(t, p)?;
        Ok(self.speed_of_sound_state())
    }

    /// Isobaric heat capacity of the ideal gas in J/(kg K).
    pub fn ideal_cp(&mut self, t: f64) -> GasResult<f64> {
        self.check_temperature(t)?;
        let tau = self.constants.t_crit / t;
        Ok(self.r * (1.0 - tau * tau * self.surface.phi0(tau, 1.0, Partial::TauTau)))
    }

    /// Enthalpy in J/kg and entropy in J/(kg K) of the ideal gas at `(T, p)`.
    pub fn ideal_gas_hs(&mut self, t: f64, p: f64) -> GasResult<(f64, f64)> {
        self.check_temperature(t)?;
        check_positive("Helmholtz equation of state", "pressure", p)?;
        let tau = self.constants.t_crit / t;
        let delta = p / (self.r * t * self.constants.rho_crit);
        let phi0 = self.surface.phi0(tau, delta, Partial::Value);
        let phi0_t = self.surface.phi0(tau, delta, Partial::Tau);
        Ok((
            self.r * t * (1.0 + tau * phi0_t) + self.h_offset,
            self.r * (tau * phi0_t - phi0) + self.s_offset,
        ))
    }

    /// Shift the zero points of enthalpy and entropy so that the ideal gas
    /// at `(T, p)` has the enthalpy `h` and the entropy `s`.
    pub fn set_reference_state(&mut self, t: f64, p: f64, h: f64, s: f64) -> GasResult<()> {
        self.h_offset = 0.0;
        self.s_offset = 0.0;
        let (h0, s0) = self.ideal_gas_hs(t, p)?;
        self.h_offset = h - h0;
        self.s_offset = s - s0;
        self.cache.invalidate();
        Ok(())
    }

    // vapor pressure curve

    /// Vapor pressure from the ancillary equation.
    pub fn p_vap(&self, t: f64) -> GasResult<f64> {
        self.vapor.pressure(t)
    }

    /// Saturation temperature from the ancillary equation.
    pub fn t_vap(&self, p: f64) -> GasResult<f64> {
        self.vapor.temperature(p, self.options)
    }

    /// Returns `true` if the state `(T, p)` lies on the liquid side of the
    /// vapor pressure curve.
    pub fn is_liquid(&self, t: f64, p: f64) -> GasResult<bool> {
        if t >= self.constants.t_crit {
            return Ok(false);
        }
        Ok(p > self.p_vap(t)?)
    }

    /// Enthalpy of vaporization at `(T, p_vap(T))` in J/kg.
    pub fn hvap(&mut self, t: f64) -> GasResult<f64> {
        self.check_temperature(t)?;
        let p = self.p_vap(t)?;
        let tau = self.constants.t_crit / t;
        let delta_v = self.density_iteration(t, p, false)?;
        let delta_l = self.density_iteration(t, p, true)?;
        Ok(self.enthalpy_at(tau, delta_v) - self.enthalpy_at(tau, delta_l))
    }

    fn enthalpy_at(&mut self, tau: f64, delta: f64) -> f64 {
        let t = self.constants.t_crit / tau;
        let s = &mut self.surface;
        let h = tau * (s.phi0(tau, delta, Partial::Tau) + s.phir(tau, delta, Partial::Tau))
            + delta * s.phir(tau, delta, Partial::Delta)
            + 1.0;
        self.r * t * h
    }

    /// Pressure and its derivative with respect to density at `(tau, delta)`
    /// without touching the cache.
    fn p_dpdrho(&mut self, tau: f64, delta: f64) -> (f64, f64) {
        let FluidConstants {
            t_crit, rho_crit, ..
        } = self.constants;
        let rt = self.r * t_crit / tau;
        let phir_d = self.surface.phir(tau, delta, Partial::Delta);
        let phir_dd = self.surface.phir(tau, delta, Partial::DeltaDelta);
        (
            rho_crit * delta * rt * (1.0 + delta * phir_d),
            rt * (1.0 + 2.0 * delta * phir_d + delta * delta * phir_dd),
        )
    }

    /// Reduced density at `(T, p)` on the liquid or the vapor side.
    ///
    /// On the liquid side the pressure is a small difference of large
    /// terms, so the iteration also stops on the relative density step.
    fn density_iteration(&mut self, t: f64, p: f64, liquid: bool) -> GasResult<f64> {
        let FluidConstants {
            t_crit,
            rho_crit,
            rho_max,
            ..
        } = self.constants;
        let tau = t_crit / t;
        let delta_max = rho_max / rho_crit;
        let delta0 = if liquid {
            delta_max
        } else {
            p / (self.r * t * rho_crit)
        };
        let newton = DampedNewton::new(
            "HelmholtzEos::v",
            self.options,
            MAX_ITER_DENSITY,
            TOL_DENSITY,
        )
        .bounds(0.0, delta_max)
        .max_step(0.075 * delta_max)
        .step_tolerance(TOL_DENSITY);
        let res = newton.solve(delta0, |delta| {
            let (pressure, dpdrho) = self.p_dpdrho(tau, delta);
            Ok(((pressure - p) / p, dpdrho * rho_crit / p))
        })?;
        Ok(res.x)
    }
}
