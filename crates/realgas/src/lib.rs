//! Real-gas thermodynamic and transport properties of pure fluids and
//! reacting gas mixtures.
//!
//! # Example: dissociation of water vapor
//!
//! ```
//! # use realgas::GasError;
//! use realgas::{Gas, GasModel};
//!
//! // stoichiometric hydrogen/oxygen mixture
//! let mut gas = Gas::new(
//!     GasModel::Ideal,
//!     &["H2", "O2", "H2O", "OH", "H", "O"],
//!     &[2.0, 1.0, 0.0, 0.0, 0.0, 0.0],
//! )?;
//! let equilibrium = gas.compute_equilibrium(3000.0, 1e5)?;
//! assert!(equilibrium.molefracs[2] > 0.6);
//!
//! // properties of the equilibrium mixture
//! let cp = gas.cp(3000.0, 1e5)?;
//! let mu = gas.mu(3000.0, 1e5)?;
//! println!("cp = {cp} J/(kg K), mu = {mu} Pa s");
//! # Ok::<(), GasError>(())
//! ```
//!
//! # Example: liquid oxygen
//!
//! ```
//! # use realgas::GasError;
//! use realgas::{Fluid, Gas};
//!
//! let mut oxygen = Gas::helmholtz(Fluid::Oxygen)?;
//! let rho = oxygen.rho(55.0, 1e6)?;
//! assert!((rho - 1304.6).abs() < 0.1);
//! # Ok::<(), GasError>(())
//! ```
#![warn(clippy::all)]

pub mod gas;
pub mod ideal_gas;
pub mod multiparameter;
pub mod transport;

pub use gas::{EquilibriumSolution, Gas, GasModel};
pub use multiparameter::{Fluid, HelmholtzFluid};
pub use realgas_core::cubic::CubicKind;
pub use realgas_core::{GasError, GasResult, SolverOptions, Verbosity};
