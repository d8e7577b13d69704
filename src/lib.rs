pub mod academy;
pub mod channel;
pub mod config;
pub mod telemetry;

#[cfg(feature = "python")]
mod python;

pub use academy::{
    Academy, AcademyError, AcademyReport, CurriculumParameterStore, HostEvent, LifecycleHooks,
    TrainerLink,
};
pub use channel::{ChannelError, FloatPropertiesChannel, SideChannel, SideChannelManager};
pub use config::AcademyConfig;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The Python module. Its name must match `lib.name` in Cargo.toml.
#[cfg(feature = "python")]
#[pymodule]
fn penguin_academy(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyPenguinAcademy>()?;
    Ok(())
}
