//! Computer-controlled paddle for Ping.
//!
//! [`PaddleAi::move_paddle`] is called once per simulation tick and returns
//! the paddle's next top-edge Y. Internally it chains a fail-safe
//! supervisor, multi-ball threat selection, portal-aware trajectory
//! prediction, spike planning and a human-factor model.

pub mod arena;
pub mod ball;
pub mod config;
pub mod controller;
pub mod error;
pub mod human;
pub mod offense;
pub mod params;
pub mod predictor;
pub mod simulation;
pub mod supervisor;
pub mod threat;

pub use arena::*;
pub use ball::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use human::*;
pub use offense::*;
pub use params::*;
pub use predictor::*;
pub use simulation::*;
pub use supervisor::*;
pub use threat::*;
