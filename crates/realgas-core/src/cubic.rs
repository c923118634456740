//! Cubic equations of state of mixtures.
//!
//! Peng-Robinson and Soave-Redlich-Kwong are written in the common form
//! `p = RT/(v - b) - a(T)/(v² + u b v + w b²)` with van der Waals one-fluid
//! mixing rules. Temperature derivatives of `a(T)` are evaluated with
//! dual numbers.
use crate::cache::{CacheIndex, PropertyCache};
use crate::errors::{check_positive, GasError, GasResult};
use crate::{DampedNewton, SolverOptions, RGAS};
use nalgebra::{DMatrix, DVector};
use num_dual::{second_derivative, DualNum};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const MAX_ITER_TEMPERATURE: usize = 100;
const TOL_TEMPERATURE: f64 = 1e-12;

/// Critical data of a single substance.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CriticalRecord {
    /// critical temperature in Kelvin
    pub tc: f64,
    /// critical pressure in Pascal
    pub pc: f64,
    /// acentric factor
    pub acentric_factor: f64,
}

impl CriticalRecord {
    pub fn new(tc: f64, pc: f64, acentric_factor: f64) -> Self {
        Self {
            tc,
            pc,
            acentric_factor,
        }
    }
}

/// Cubic binary interaction parameter.
#[derive(Serialize, Deserialize, Clone, Copy, Default, Debug, PartialEq)]
pub struct CubicBinaryRecord {
    pub k_ij: f64,
}

/// The cubic equation of state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CubicKind {
    PengRobinson,
    SoaveRedlichKwong,
}

impl CubicKind {
    /// Coefficients `(u, w)` of the attractive denominator.
    pub fn uw(self) -> (f64, f64) {
        match self {
            Self::PengRobinson => (2.0, -1.0),
            Self::SoaveRedlichKwong => (1.0, 0.0),
        }
    }

    fn omega(self) -> (f64, f64) {
        match self {
            Self::PengRobinson => (0.45724, 0.07780),
            Self::SoaveRedlichKwong => (0.42748, 0.08664),
        }
    }

    fn kappa(self, acentric_factor: f64) -> f64 {
        let w = acentric_factor;
        match self {
            Self::PengRobinson => 0.37464 + (1.54226 - 0.26992 * w) * w,
            Self::SoaveRedlichKwong => 0.480 + (1.574 - 0.176 * w) * w,
        }
    }
}

/// Real roots of `z³ + c2 z² + c1 z + c0` in ascending order.
pub fn real_roots(c2: f64, c1: f64, c0: f64) -> Vec<f64> {
    let p = c1 - c2 * c2 / 3.0;
    let q = 2.0 * c2.powi(3) / 27.0 - c2 * c1 / 3.0 + c0;
    let disc = 0.25 * q * q + p.powi(3) / 27.0;
    let shift = -c2 / 3.0;
    let mut roots = if disc > 0.0 {
        let s = disc.sqrt();
        vec![(-0.5 * q + s).cbrt() + (-0.5 * q - s).cbrt() + shift]
    } else if p == 0.0 {
        vec![shift]
    } else {
        let m = 2.0 * (-p / 3.0).sqrt();
        let arg = (3.0 * q / (p * m)).clamp(-1.0, 1.0);
        let phi = arg.acos() / 3.0;
        (0..3)
            .map(|k| m * (phi - 2.0 * PI * k as f64 / 3.0).cos() + shift)
            .collect()
    };
    // polish
    for z in roots.iter_mut() {
        let f = ((*z + c2) * *z + c1) * *z + c0;
        let df = (3.0 * *z + 2.0 * c2) * *z + c1;
        if df != 0.0 {
            *z -= f / df;
        }
    }
    roots.sort_by(|a, b| a.total_cmp(b));
    roots
}

/// Departure functions `real - ideal gas` at equal temperature and pressure.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Departures {
    /// enthalpy in J/kg
    pub h: f64,
    /// entropy in J/(kg K)
    pub s: f64,
    /// isobaric heat capacity in J/(kg K)
    pub cp: f64,
    /// isochoric heat capacity in J/(kg K)
    pub cv: f64,
}

#[derive(Clone, Copy)]
enum CubicProperty {
    A,
    DaDt,
    D2aDt2,
}

impl CacheIndex for CubicProperty {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        self as usize
    }
}

/// Cubic equation of state of a mixture.
///
/// Specific quantities refer to the mixture molar mass given with the
/// composition. Substances without critical data do not contribute to
/// `a` and `b`.
#[derive(Clone, Debug)]
pub struct CubicEos {
    kind: CubicKind,
    records: Vec<Option<CriticalRecord>>,
    k_ij: DMatrix<f64>,
    molefracs: DVector<f64>,
    molar_weight: f64,
    b: f64,
    cache: PropertyCache<CubicProperty>,
    options: SolverOptions,
}

impl CubicEos {
    /// Create the equation of state for a composition `molefracs` with
    /// molar mass `molar_weight` in kg/mol.
    pub fn new(
        kind: CubicKind,
        records: Vec<Option<CriticalRecord>>,
        k_ij: Option<DMatrix<f64>>,
        molefracs: &DVector<f64>,
        molar_weight: f64,
    ) -> GasResult<Self> {
        let n = records.len();
        let k_ij = k_ij.unwrap_or_else(|| DMatrix::zeros(n, n));
        if k_ij.nrows() != n || k_ij.ncols() != n {
            return Err(GasError::IncompatibleComponents(n, k_ij.nrows()));
        }
        let mut eos = Self {
            kind,
            records,
            k_ij,
            molefracs: DVector::zeros(n),
            molar_weight: 1.0,
            b: 0.0,
            cache: PropertyCache::new(),
            options: SolverOptions::default(),
        };
        eos.set_molefracs(molefracs, molar_weight)?;
        Ok(eos)
    }

    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn kind(&self) -> CubicKind {
        self.kind
    }

    /// Change the composition.
    pub fn set_molefracs(&mut self, molefracs: &DVector<f64>, molar_weight: f64) -> GasResult<()> {
        if molefracs.len() != self.records.len() {
            return Err(GasError::IncompatibleComponents(
                self.records.len(),
                molefracs.len(),
            ));
        }
        check_positive("cubic equation of state", "molar weight", molar_weight)?;
        self.molefracs = molefracs.clone();
        self.molar_weight = molar_weight;
        let (_, omega_b) = self.kind.omega();
        self.b = self
            .records
            .iter()
            .zip(molefracs.iter())
            .filter_map(|(r, &x)| r.map(|r| x * omega_b * RGAS * r.tc / r.pc))
            .sum();
        self.cache.invalidate();
        Ok(())
    }

    /// Mixture covolume in m³/mol.
    pub fn covolume(&self) -> f64 {
        self.b
    }

    /// Mixture attraction parameter in Pa m⁶/mol².
    pub fn attraction<D: DualNum<f64> + Copy>(&self, temperature: D) -> D {
        let (omega_a, _) = self.kind.omega();
        let a: Vec<Option<D>> = self
            .records
            .iter()
            .map(|r| {
                r.map(|r| {
                    let kappa = self.kind.kappa(r.acentric_factor);
                    let alpha = (-(temperature / r.tc).sqrt() + 1.0) * kappa + 1.0;
                    alpha * alpha * (omega_a * (RGAS * r.tc).powi(2) / r.pc)
                })
            })
            .collect();
        let mut res = D::zero();
        for (i, ai) in a.iter().enumerate() {
            for (j, aj) in a.iter().enumerate() {
                if let (Some(ai), Some(aj)) = (ai, aj) {
                    res += (*ai * *aj).sqrt()
                        * (self.molefracs[i] * self.molefracs[j] * (1.0 - self.k_ij[(i, j)]));
                }
            }
        }
        res
    }

    fn update(&mut self, t: f64, v: f64) -> GasResult<()> {
        check_positive("cubic equation of state", "temperature", t)?;
        check_positive("cubic equation of state", "volume", v)?;
        self.cache.update(t, v);
        Ok(())
    }

    /// `a`, `da/dT` and `d²a/dT²` at the current temperature.
    fn attraction_derivatives(&mut self) -> (f64, f64, f64) {
        if !self.cache.test(CubicProperty::A) {
            let (t, _) = self.cache.state();
            let (a, da, d2a) = second_derivative(|t| self.attraction(t), t);
            self.cache.set(CubicProperty::A, a);
            self.cache.set(CubicProperty::DaDt, da);
            self.cache.set(CubicProperty::D2aDt2, d2a);
        }
        (
            self.cache.get(CubicProperty::A),
            self.cache.get(CubicProperty::DaDt),
            self.cache.get(CubicProperty::D2aDt2),
        )
    }

    fn denominator(&self, v: f64) -> f64 {
        let (u, w) = self.kind.uw();
        v * v + u * self.b * v + w * self.b * self.b
    }

    /// `int_v^inf dv / (v² + u b v + w b²)`
    fn log_term(&self, v: f64) -> f64 {
        let (u, w) = self.kind.uw();
        let b = self.b;
        if b == 0.0 {
            return v.recip();
        }
        let sq = (u * u - 4.0 * w).sqrt();
        ((2.0 * v + b * (u + sq)) / (2.0 * v + b * (u - sq))).ln() / (b * sq)
    }

    /// Pressure in Pa at temperature `t` and specific volume `v`.
    pub fn p(&mut self, t: f64, v: f64) -> GasResult<f64> {
        self.update(t, v)?;
        let (a, _, _) = self.attraction_derivatives();
        let vm = v * self.molar_weight;
        Ok(RGAS * t / (vm - self.b) - a / self.denominator(vm))
    }

    /// `(dp/dv)_T` in Pa kg/m³.
    pub fn dpdv(&mut self, t: f64, v: f64) -> GasResult<f64> {
        self.update(t, v)?;
        let (a, _, _) = self.attraction_derivatives();
        let (u, _) = self.kind.uw();
        let vm = v * self.molar_weight;
        let den = self.denominator(vm);
        let dpdvm = -RGAS * t / (vm - self.b).powi(2) + a * (2.0 * vm + u * self.b) / (den * den);
        Ok(dpdvm * self.molar_weight)
    }

    /// `(dp/dT)_v` in Pa/K.
    pub fn dpdt(&mut self, t: f64, v: f64) -> GasResult<f64> {
        self.update(t, v)?;
        let (_, da, _) = self.attraction_derivatives();
        let vm = v * self.molar_weight;
        Ok(RGAS / (vm - self.b) - da / self.denominator(vm))
    }

    /// Compressibility factor of the stable root at `(T, p)`.
    pub fn compressibility(&mut self, t: f64, p: f64) -> GasResult<f64> {
        check_positive("cubic equation of state", "temperature", t)?;
        check_positive("cubic equation of state", "pressure", p)?;
        if self.b == 0.0 {
            return Ok(1.0);
        }
        let (u, w) = self.kind.uw();
        let rt = RGAS * t;
        let a = self.attraction(t);
        let aa = a * p / (rt * rt);
        let bb = self.b * p / rt;
        let c2 = -(1.0 + bb - u * bb);
        let c1 = aa + w * bb * bb - u * bb - u * bb * bb;
        let c0 = -(aa * bb + w * bb * bb + w * bb.powi(3));
        let candidates: Vec<f64> = real_roots(c2, c1, c0)
            .into_iter()
            .filter(|&z| z > bb)
            .collect();
        match candidates.as_slice() {
            [] => Err(GasError::IterationFailed("CubicEos::v".to_owned())),
            [z] => Ok(*z),
            _ => {
                let sq = (u * u - 4.0 * w).sqrt();
                let g = |z: f64| {
                    z - 1.0
                        - (z - bb).ln()
                        - aa / (bb * sq)
                            * ((2.0 * z + bb * (u + sq)) / (2.0 * z + bb * (u - sq))).ln()
                };
                Ok(candidates
                    .into_iter()
                    .min_by(|&z1, &z2| g(z1).total_cmp(&g(z2)))
                    .unwrap_or(1.0))
            }
        }
    }

    /// Specific volume in m³/kg of the phase with the lowest Gibbs energy.
    pub fn v(&mut self, t: f64, p: f64) -> GasResult<f64> {
        let z = self.compressibility(t, p)?;
        Ok(z * RGAS * t / (p * self.molar_weight))
    }

    /// Temperature in K at pressure `p` and specific volume `v`.
    pub fn t(&mut self, p: f64, v: f64) -> GasResult<f64> {
        check_positive("cubic equation of state", "pressure", p)?;
        check_positive("cubic equation of state", "volume", v)?;
        let t0 = p * v * self.molar_weight / RGAS;
        let newton = DampedNewton::new(
            "CubicEos::t",
            self.options,
            MAX_ITER_TEMPERATURE,
            TOL_TEMPERATURE,
        )
        .bounds(1e-3, f64::INFINITY)
        .max_step(0.5 * t0)
        .step_tolerance(TOL_TEMPERATURE);
        let res = newton.solve(t0, |t| {
            let pressure = self.p(t, v)?;
            let dpdt = self.dpdt(t, v)?;
            Ok(((pressure - p) / p, dpdt / p))
        })?;
        Ok(res.x)
    }

    /// Departure functions at `(T, p)`.
    pub fn departures(&mut self, t: f64, p: f64) -> GasResult<Departures> {
        let v = self.v(t, p)?;
        self.update(t, v)?;
        let (a, da, d2a) = self.attraction_derivatives();
        let m = self.molar_weight;
        let vm = v * m;
        let rt = RGAS * t;
        let z = p * vm / rt;
        let l = self.log_term(vm);
        let h = (t * da - a) * l + rt * (z - 1.0);
        let s = RGAS * (z * (vm - self.b) / vm).ln() + da * l;
        let cv = t * d2a * l;
        let dpdt = self.dpdt(t, v)?;
        let dpdv = self.dpdv(t, v)? / m;
        let cp = cv - t * dpdt * dpdt / dpdv - RGAS;
        Ok(Departures {
            h: h / m,
            s: s / m,
            cp: cp / m,
            cv: cv / m,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::dvector;

    fn propane(kind: CubicKind) -> CubicEos {
        let record: CriticalRecord = serde_json::from_str(
            r#"{
                "tc": 369.96,
                "pc": 4250000.0,
                "acentric_factor": 0.153
            }"#,
        )
        .expect("Unable to parse json.");
        CubicEos::new(kind, vec![Some(record)], None, &dvector![1.0], 0.0440962)
            .expect("valid composition")
    }

    #[test]
    fn cubic_roots() {
        let roots = real_roots(-6.0, 11.0, -6.0);
        assert_eq!(roots.len(), 3);
        for (r, e) in roots.iter().zip([1.0, 2.0, 3.0]) {
            assert_relative_eq!(*r, e, max_relative = 1e-12);
        }
        let roots = real_roots(0.0, 1.0, 10.0);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], -2.0, max_relative = 1e-12);
    }

    #[test]
    fn root_selection() -> GasResult<()> {
        for kind in [CubicKind::PengRobinson, CubicKind::SoaveRedlichKwong] {
            let mut eos = propane(kind);
            assert!(eos.compressibility(300.0, 1e5)? > 0.9);
            assert!(eos.compressibility(300.0, 2e6)? < 0.1);
            assert!(eos.compressibility(500.0, 5e6)? > 0.5);
        }
        Ok(())
    }

    #[test]
    fn state_round_trip() -> GasResult<()> {
        let mut eos = propane(CubicKind::PengRobinson);
        for (t, p) in [(300.0, 1e5), (300.0, 2e6), (450.0, 3e6)] {
            let v = eos.v(t, p)?;
            assert_relative_eq!(eos.p(t, v)?, p, max_relative = 1e-9);
            assert_relative_eq!(eos.t(p, v)?, t, max_relative = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn pressure_derivatives() -> GasResult<()> {
        let mut eos = propane(CubicKind::SoaveRedlichKwong);
        let (t, v) = (350.0, 0.02);
        let h = 1e-6;
        let dpdv = (eos.p(t, v + h * v)? - eos.p(t, v - h * v)?) / (2.0 * h * v);
        let dpdt = (eos.p(t + h * t, v)? - eos.p(t - h * t, v)?) / (2.0 * h * t);
        assert_relative_eq!(eos.dpdv(t, v)?, dpdv, max_relative = 1e-6);
        assert_relative_eq!(eos.dpdt(t, v)?, dpdt, max_relative = 1e-6);
        Ok(())
    }

    #[test]
    fn caloric_departures() -> GasResult<()> {
        let mut eos = propane(CubicKind::PengRobinson);
        let (t, p, h) = (400.0, 2e6, 1e-3);
        let dep = eos.departures(t, p)?;
        let plus = eos.departures(t + h, p)?;
        let minus = eos.departures(t - h, p)?;
        assert!(dep.h < 0.0);
        assert!(dep.s < 0.0);
        assert_relative_eq!(dep.cp, (plus.h - minus.h) / (2.0 * h), max_relative = 1e-5);
        assert_relative_eq!(dep.cp / t, (plus.s - minus.s) / (2.0 * h), max_relative = 1e-5);
        Ok(())
    }

    #[test]
    fn species_without_critical_data() -> GasResult<()> {
        let records = vec![Some(CriticalRecord::new(154.581, 5.043e6, 0.0222)), None];
        let x = dvector![0.0, 1.0];
        let mut eos = CubicEos::new(CubicKind::PengRobinson, records, None, &x, 0.0170073)?;
        let (t, p) = (1500.0, 1e6);
        assert_relative_eq!(eos.v(t, p)?, RGAS * t / (p * 0.0170073), max_relative = 1e-12);
        let dep = eos.departures(t, p)?;
        assert!(dep.h.abs() < 1e-9 && dep.s.abs() < 1e-9 && dep.cp.abs() < 1e-9);
        Ok(())
    }
}
