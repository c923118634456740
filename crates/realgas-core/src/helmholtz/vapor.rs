use crate::errors::{check_positive, check_range, GasResult};
use crate::{DampedNewton, SolverOptions};
use nalgebra::{Matrix4, Vector4};

const MAX_ITER_VAPOR: usize = 50;
const TOL_VAPOR: f64 = 1e-12;
const FIT_POINTS: usize = 60;

/// Ancillary equation for the vapor pressure of a pure fluid.
///
/// `ln(p/pc) = Tc/T sum(n_i theta^k_i)` with `theta = 1 - T/Tc`.
///
/// The inverse is solved by Newton's method starting from a cubic
/// polynomial `Tc/T = f(ln(p/pc))` that is fitted to the ancillary
/// equation when the curve is created.
#[derive(Clone, Debug)]
pub struct VaporPressureCurve {
    t_crit: f64,
    p_crit: f64,
    t_triple: f64,
    coefficients: &'static [(f64, f64)],
    guess: [f64; 4],
}

impl VaporPressureCurve {
    pub fn new(
        t_crit: f64,
        p_crit: f64,
        t_triple: f64,
        coefficients: &'static [(f64, f64)],
    ) -> Self {
        let mut curve = Self {
            t_crit,
            p_crit,
            t_triple,
            coefficients,
            guess: [1.0, -1.0 / 6.0, 0.0, 0.0],
        };
        curve.guess = curve.fit_initial_guess();
        curve
    }

    /// Least squares fit of `Tc/T` as a cubic in `ln(p/pc)`.
    fn fit_initial_guess(&self) -> [f64; 4] {
        let mut a = Matrix4::zeros();
        let mut b = Vector4::zeros();
        for i in 0..FIT_POINTS {
            let t = self.t_triple + (self.t_crit - self.t_triple) * i as f64 / FIT_POINTS as f64;
            let x = self.ln_reduced_pressure(t).0;
            let row = Vector4::new(1.0, x, x * x, x * x * x);
            a += row * row.transpose();
            b += row * (self.t_crit / t);
        }
        a.lu()
            .solve(&b)
            .map_or(self.guess, |c| [c[0], c[1], c[2], c[3]])
    }

    /// `ln(p_vap/pc)` and its derivative with respect to temperature.
    fn ln_reduced_pressure(&self, t: f64) -> (f64, f64) {
        let theta = 1.0 - t / self.t_crit;
        let (pi, dpi) = self
            .coefficients
            .iter()
            .fold((0.0, 0.0), |(pi, dpi), &(n, k)| {
                (
                    pi + n * theta.powf(k),
                    dpi + n * k * theta.powf(k - 1.0),
                )
            });
        let tr = self.t_crit / t;
        (tr * pi, -tr / t * pi - dpi / t)
    }

    /// Vapor pressure in Pa.
    pub fn pressure(&self, t: f64) -> GasResult<f64> {
        check_positive("vapor pressure", "temperature", t)?;
        check_range("temperature", t, self.t_triple, self.t_crit)?;
        Ok(self.p_crit * self.ln_reduced_pressure(t).0.exp())
    }

    /// Slope of the vapor pressure curve in Pa/K.
    pub fn dpdt(&self, t: f64) -> GasResult<f64> {
        let p = self.pressure(t)?;
        Ok(p * self.ln_reduced_pressure(t).1)
    }

    fn initial_temperature(&self, p: f64) -> f64 {
        let x = (p / self.p_crit).ln();
        let [c0, c1, c2, c3] = self.guess;
        let t = self.t_crit / (c0 + x * (c1 + x * (c2 + x * c3)));
        t.clamp(self.t_triple, self.t_crit)
    }

    /// Saturation temperature in K.
    pub fn temperature(&self, p: f64, options: SolverOptions) -> GasResult<f64> {
        check_positive("vapor pressure", "pressure", p)?;
        let p_triple = self.pressure(self.t_triple)?;
        check_range("pressure", p, p_triple, self.p_crit)?;
        let ln_p = (p / self.p_crit).ln();
        let newton = DampedNewton::new(
            "VaporPressureCurve::temperature",
            options,
            MAX_ITER_VAPOR,
            TOL_VAPOR,
        )
        .bounds(self.t_triple, self.t_crit)
        .max_step(0.1 * (self.t_crit - self.t_triple));
        let res = newton.solve(self.initial_temperature(p), |t| {
            let (f, df) = self.ln_reduced_pressure(t);
            Ok((f - ln_p, df))
        })?;
        Ok(res.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const METHANE: [(f64, f64); 4] = [
        (-6.036219, 1.0),
        (1.409353, 1.5),
        (-0.4945199, 2.0),
        (-1.443048, 4.5),
    ];

    fn methane() -> VaporPressureCurve {
        VaporPressureCurve::new(190.564, 4.5992e6, 90.6941, &METHANE)
    }

    #[test]
    fn normal_boiling_point() -> GasResult<()> {
        let curve = methane();
        assert_relative_eq!(curve.pressure(111.667)?, 101323.0, max_relative = 1e-3);
        assert_relative_eq!(
            curve.temperature(101325.0, SolverOptions::default())?,
            111.667,
            epsilon = 0.02
        );
        Ok(())
    }

    #[test]
    fn monotonic() -> GasResult<()> {
        let curve = methane();
        let mut p_old = 0.0;
        for i in 0..=100 {
            let t = 90.6941 + (190.564 - 90.6941) * i as f64 / 100.0;
            let p = curve.pressure(t)?;
            assert!(p > p_old);
            assert!(curve.dpdt(t)? > 0.0);
            p_old = p;
        }
        Ok(())
    }

    #[test]
    fn slope() -> GasResult<()> {
        let curve = methane();
        let (t, h) = (150.0, 1e-4);
        let fd = (curve.pressure(t + h)? - curve.pressure(t - h)?) / (2.0 * h);
        assert_relative_eq!(curve.dpdt(t)?, fd, max_relative = 1e-7);
        Ok(())
    }

    #[test]
    fn initial_guess_is_close() -> GasResult<()> {
        let curve = methane();
        for t in [91.0, 120.0, 160.0, 189.0] {
            let p = curve.pressure(t)?;
            assert!((curve.initial_temperature(p) - t).abs() < 1.0);
        }
        Ok(())
    }

    #[test]
    fn out_of_range() {
        let curve = methane();
        assert!(curve.pressure(80.0).is_err());
        assert!(curve.pressure(200.0).is_err());
        assert!(curve.temperature(1e7, SolverOptions::default()).is_err());
    }
}
