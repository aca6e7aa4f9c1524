pub mod alerts;
pub mod rotation;

pub use alerts::{AnomalyNotifier, EmailAlertService};
pub use rotation::RotationService;
