//! Viscosity and thermal conductivity.
//!
//! Oxygen has a dedicated correlation that includes dense fluid
//! contributions. All other species fall back to kinetic theory of dilute
//! gases, mixtures are combined with Wilke's rule.
use realgas_core::GasResult;

mod collision;
pub mod oxygen;
mod wilke;
pub use collision::{collision_integral_22, eucken_conductivity, LennardJonesRecord};
pub use wilke::{
    interaction_matrix, mixture_conductivity, mixture_viscosity, wilke_phi,
    ViscosityInteractionRecord,
};

/// Transport properties of a fluid at temperature and pressure.
pub trait TransportProperties {
    /// Dynamic viscosity in Pa s.
    fn viscosity(&mut self, t: f64, p: f64) -> GasResult<f64>;

    /// Thermal conductivity in W/(m K).
    fn thermal_conductivity(&mut self, t: f64, p: f64) -> GasResult<f64>;
}
