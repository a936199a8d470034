pub mod eject_workflow;

pub use eject_workflow::{EjectReport, LogoutGuard, run_eject, select_eject_method};
