use std::borrow::Cow;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::academy::{Academy, AcademyError, CurriculumParameterStore, HostEvent};
use crate::config::AcademyConfig;

impl From<AcademyError> for PyErr {
    fn from(err: AcademyError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Environment-side academy with the penguin curriculum already bound.
#[pyclass(name = "PenguinAcademy", unsendable)]
pub struct PyPenguinAcademy {
    academy: Academy,
    store: CurriculumParameterStore,
}

#[pymethods]
impl PyPenguinAcademy {
    #[new]
    #[pyo3(signature = (max_steps=None))]
    fn new(max_steps: Option<u64>) -> PyResult<Self> {
        let config = AcademyConfig {
            max_steps,
            ..AcademyConfig::default()
        };
        let mut academy = Academy::new(config)?;
        let store = CurriculumParameterStore::initialize(&mut academy)?;
        Ok(Self { academy, store })
    }

    fn set_property(&mut self, key: String, value: f32) -> PyResult<()> {
        self.academy
            .handle_event(HostEvent::SetProperty { key, value })?;
        Ok(())
    }

    fn process_side_channel_data(&mut self, data: &[u8]) -> PyResult<usize> {
        Ok(self.academy.process_side_channel_data(data)?)
    }

    /// Queued messages for the trainer, framed as `bytes`.
    fn generate_side_channel_data(&mut self) -> PyResult<Cow<'static, [u8]>> {
        let data = self
            .academy
            .side_channels_mut()
            .generate_side_channel_data()
            .map_err(AcademyError::from)?;
        Ok(Cow::Owned(data))
    }

    fn step(&mut self) {
        self.academy.step();
    }

    #[getter]
    fn fish_speed(&self) -> f32 {
        self.store.fish_speed()
    }

    #[getter]
    fn feed_radius(&self) -> f32 {
        self.store.feed_radius()
    }

    #[getter]
    fn step_count(&self) -> u64 {
        self.academy.step_count()
    }
}
