//! Building blocks of multiparameter Helmholtz energy surfaces.
//!
//! Every residual term factorizes into a function of delta and a function
//! of tau. [ResidualTerms] stores both factors together with their first
//! two derivatives and recomputes a factor only if its variable changed.
use super::Partial;
use num_dual::DualNum;

/// A single term of the residual Helmholtz energy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResidualTerm {
    /// `n delta^d tau^t`
    Power { n: f64, t: f64, d: i32 },
    /// `n delta^d tau^t exp(-g delta^l)`
    Exponential { n: f64, t: f64, d: i32, l: i32, g: f64 },
    /// `n delta^d tau^t exp(-eta (delta - epsilon)^2 - beta (tau - gamma)^2)`
    Gaussian {
        n: f64,
        t: f64,
        d: i32,
        eta: f64,
        epsilon: f64,
        beta: f64,
        gamma: f64,
    },
}

impl ResidualTerm {
    pub const fn power(n: f64, t: f64, d: i32) -> Self {
        Self::Power { n, t, d }
    }

    pub const fn exponential(n: f64, t: f64, d: i32, l: i32) -> Self {
        Self::Exponential { n, t, d, l, g: 1.0 }
    }

    pub fn coefficient(&self) -> f64 {
        match *self {
            Self::Power { n, .. } | Self::Exponential { n, .. } | Self::Gaussian { n, .. } => n,
        }
    }

    /// Evaluate the term for arbitrary (dual) numbers.
    pub fn evaluate<D: DualNum<f64> + Copy>(&self, delta: D, tau: D) -> D {
        match *self {
            Self::Power { n, t, d } => delta.powi(d) * tau.powf(t) * n,
            Self::Exponential { n, t, d, l, g } => {
                delta.powi(d) * tau.powf(t) * n * (-delta.powi(l) * g).exp()
            }
            Self::Gaussian {
                n,
                t,
                d,
                eta,
                epsilon,
                beta,
                gamma,
            } => {
                (delta.powi(d) * tau.powf(t) * n)
                    * (-(delta - epsilon).powi(2) * eta - (tau - gamma).powi(2) * beta).exp()
            }
        }
    }

    /// Delta factor and its first two derivatives.
    fn delta_factor(&self, delta: f64) -> [f64; 3] {
        let (d, g) = match *self {
            Self::Power { d, .. } => (d, [1.0, 0.0, 0.0]),
            Self::Exponential { d, l, g, .. } => {
                let e = (-g * delta.powi(l)).exp();
                let a = -g * l as f64 * delta.powi(l - 1);
                let da = -g * (l * (l - 1)) as f64 * delta.powi(l - 2);
                (d, [e, a * e, (a * a + da) * e])
            }
            Self::Gaussian { d, eta, epsilon, .. } => {
                let x = delta - epsilon;
                let e = (-eta * x * x).exp();
                (
                    d,
                    [e, -2.0 * eta * x * e, (4.0 * eta * eta * x * x - 2.0 * eta) * e],
                )
            }
        };
        let df = d as f64;
        let p = [
            delta.powi(d),
            df * delta.powi(d - 1),
            df * (df - 1.0) * delta.powi(d - 2),
        ];
        [
            p[0] * g[0],
            p[1] * g[0] + p[0] * g[1],
            p[2] * g[0] + 2.0 * p[1] * g[1] + p[0] * g[2],
        ]
    }

    /// Tau factor and its first two derivatives.
    fn tau_factor(&self, tau: f64) -> [f64; 3] {
        let (t, h) = match *self {
            Self::Power { t, .. } | Self::Exponential { t, .. } => (t, [1.0, 0.0, 0.0]),
            Self::Gaussian { t, beta, gamma, .. } => {
                let y = tau - gamma;
                let e = (-beta * y * y).exp();
                (
                    t,
                    [e, -2.0 * beta * y * e, (4.0 * beta * beta * y * y - 2.0 * beta) * e],
                )
            }
        };
        let q = [
            tau.powf(t),
            t * tau.powf(t - 1.0),
            t * (t - 1.0) * tau.powf(t - 2.0),
        ];
        [
            q[0] * h[0],
            q[1] * h[0] + q[0] * h[1],
            q[2] * h[0] + 2.0 * q[1] * h[1] + q[0] * h[2],
        ]
    }
}

/// Sum of residual terms with memoized factors.
#[derive(Clone, Debug)]
pub struct ResidualTerms {
    terms: Vec<ResidualTerm>,
    delta: f64,
    tau: f64,
    delta_factors: Vec<[f64; 3]>,
    tau_factors: Vec<[f64; 3]>,
}

impl ResidualTerms {
    pub fn new(terms: Vec<ResidualTerm>) -> Self {
        let n = terms.len();
        Self {
            terms,
            delta: f64::NAN,
            tau: f64::NAN,
            delta_factors: vec![[0.0; 3]; n],
            tau_factors: vec![[0.0; 3]; n],
        }
    }

    pub fn terms(&self) -> &[ResidualTerm] {
        &self.terms
    }

    fn refresh(&mut self, tau: f64, delta: f64) {
        if delta != self.delta {
            self.delta = delta;
            for (f, term) in self.delta_factors.iter_mut().zip(&self.terms) {
                *f = term.delta_factor(delta);
            }
        }
        if tau != self.tau {
            self.tau = tau;
            for (f, term) in self.tau_factors.iter_mut().zip(&self.terms) {
                *f = term.tau_factor(tau);
            }
        }
    }

    /// Partial derivative of the sum of all terms.
    pub fn partial(&mut self, tau: f64, delta: f64, partial: Partial) -> f64 {
        self.refresh(tau, delta);
        let (i, j) = partial.orders();
        self.terms
            .iter()
            .zip(self.delta_factors.iter().zip(&self.tau_factors))
            .map(|(term, (fd, ft))| term.coefficient() * fd[i] * ft[j])
            .sum()
    }

    pub fn evaluate<D: DualNum<f64> + Copy>(&self, delta: D, tau: D) -> D {
        self.terms
            .iter()
            .fold(D::zero(), |acc, term| acc + term.evaluate(delta, tau))
    }
}

/// A single term of the ideal gas Helmholtz energy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IdealTerm {
    /// `ln(delta) + a1 + a2 tau`
    Lead { a1: f64, a2: f64 },
    /// `a ln(tau)`
    LogTau { a: f64 },
    /// `n ln(1 - exp(-t tau))`
    PlanckEinstein { n: f64, t: f64 },
}

impl IdealTerm {
    pub fn evaluate<D: DualNum<f64> + Copy>(&self, delta: D, tau: D) -> D {
        match *self {
            Self::Lead { a1, a2 } => delta.ln() + a1 + tau * a2,
            Self::LogTau { a } => tau.ln() * a,
            Self::PlanckEinstein { n, t } => (-(-tau * t).exp()).ln_1p() * n,
        }
    }

    pub fn partial(&self, tau: f64, delta: f64, partial: Partial) -> f64 {
        match (*self, partial) {
            (Self::Lead { a1, a2 }, Partial::Value) => delta.ln() + a1 + a2 * tau,
            (Self::Lead { .. }, Partial::Delta) => delta.recip(),
            (Self::Lead { .. }, Partial::DeltaDelta) => -delta.powi(-2),
            (Self::Lead { a2, .. }, Partial::Tau) => a2,
            (Self::LogTau { a }, Partial::Value) => a * tau.ln(),
            (Self::LogTau { a }, Partial::Tau) => a / tau,
            (Self::LogTau { a }, Partial::TauTau) => -a / (tau * tau),
            (Self::PlanckEinstein { n, t }, Partial::Value) => n * (-(-t * tau).exp()).ln_1p(),
            (Self::PlanckEinstein { n, t }, Partial::Tau) => n * t / (t * tau).exp_m1(),
            (Self::PlanckEinstein { n, t }, Partial::TauTau) => {
                let e = (t * tau).exp();
                -n * t * t * e / (e - 1.0).powi(2)
            }
            _ => 0.0,
        }
    }
}

/// Sum of ideal gas terms.
#[derive(Clone, Debug)]
pub struct IdealTerms(Vec<IdealTerm>);

impl IdealTerms {
    pub fn new(terms: Vec<IdealTerm>) -> Self {
        Self(terms)
    }

    pub fn partial(&self, tau: f64, delta: f64, partial: Partial) -> f64 {
        self.0.iter().map(|t| t.partial(tau, delta, partial)).sum()
    }

    pub fn evaluate<D: DualNum<f64> + Copy>(&self, delta: D, tau: D) -> D {
        self.0
            .iter()
            .fold(D::zero(), |acc, term| acc + term.evaluate(delta, tau))
    }
}
