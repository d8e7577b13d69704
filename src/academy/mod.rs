mod errors;
mod host;
mod store;
mod traits;

pub use errors::AcademyError;
pub use host::{Academy, AcademyReport, HostEvent, TrainerLink};
pub use store::{CurriculumParameterStore, FEED_RADIUS, FISH_SPEED};
pub use traits::LifecycleHooks;
