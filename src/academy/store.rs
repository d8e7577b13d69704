use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{debug, info};

use super::errors::AcademyError;
use super::host::Academy;
use super::traits::{LifecycleHooks, ParameterSink};

pub const FISH_SPEED: &str = "fish_speed";
pub const FEED_RADIUS: &str = "feed_radius";

const KEYS: &[&str] = &[FISH_SPEED, FEED_RADIUS];

/// An `f32` that can be written by the dispatching thread and read anywhere.
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn zero() -> Self {
        Self(AtomicU32::new(0.0f32.to_bits()))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

/// Backing fields, captured only by the callbacks bound in `initialize`.
struct Params {
    fish_speed: AtomicF32,
    feed_radius: AtomicF32,
}

impl ParameterSink for Params {
    fn keys(&self) -> &'static [&'static str] {
        KEYS
    }

    fn on_value_changed(&self, name: &str, value: f32) -> bool {
        let field = match name {
            FISH_SPEED => &self.fish_speed,
            FEED_RADIUS => &self.feed_radius,
            _ => return false,
        };
        field.store(value);
        debug!(name, value, "curriculum parameter updated");
        true
    }
}

impl LifecycleHooks for Params {}

/// Curriculum knobs for the penguin feeding task.
///
/// The trainer raises `fish_speed` and shrinks `feed_radius` as lessons
/// progress. This is a read-only handle: values only change through the
/// callbacks bound by [`initialize`](Self::initialize).
///
/// ```compile_fail
/// use penguin_academy::{Academy, AcademyConfig, CurriculumParameterStore};
///
/// let mut academy = Academy::new(AcademyConfig::default()).unwrap();
/// let store = CurriculumParameterStore::initialize(&mut academy).unwrap();
/// store.on_value_changed("fish_speed", 7.0);
/// ```
#[derive(Clone)]
pub struct CurriculumParameterStore {
    params: Arc<Params>,
}

impl CurriculumParameterStore {
    /// Create a store and bind its callbacks on `academy`.
    ///
    /// Fails with [`AcademyError::Configuration`] if the academy has no float
    /// properties channel, and with [`AcademyError::DuplicateRegistration`] if
    /// either key is already bound. Nothing is registered on failure.
    pub fn initialize(academy: &mut Academy) -> Result<Self, AcademyError> {
        let registry = academy.float_properties_mut().ok_or_else(|| {
            AcademyError::Configuration("academy has no float properties channel".to_string())
        })?;

        if let Some(key) = KEYS.iter().find(|key| registry.has_callback(key)) {
            return Err(AcademyError::DuplicateRegistration {
                key: key.to_string(),
            });
        }

        let params = Arc::new(Params {
            fish_speed: AtomicF32::zero(),
            feed_radius: AtomicF32::zero(),
        });

        for &key in params.keys() {
            let sink = Arc::clone(&params);
            registry.register_callback(key, move |value| {
                sink.on_value_changed(key, value);
            })?;
        }

        academy.add_hooks(params.clone());
        info!(keys = ?KEYS, "curriculum parameters bound");
        Ok(Self { params })
    }

    pub fn fish_speed(&self) -> f32 {
        self.params.fish_speed.load()
    }

    pub fn feed_radius(&self) -> f32 {
        self.params.feed_radius.load()
    }
}

impl fmt::Debug for CurriculumParameterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurriculumParameterStore")
            .field("fish_speed", &self.fish_speed())
            .field("feed_radius", &self.feed_radius())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AcademyConfig;

    fn academy() -> Academy {
        Academy::new(AcademyConfig::default()).unwrap()
    }

    fn set(academy: &mut Academy, key: &str, value: f32) {
        academy
            .float_properties_mut()
            .unwrap()
            .set_property(key, value)
            .unwrap();
    }

    #[test]
    fn defaults_to_zero() {
        let mut academy = academy();
        let store = CurriculumParameterStore::initialize(&mut academy).unwrap();
        assert_eq!(store.fish_speed(), 0.0);
        assert_eq!(store.feed_radius(), 0.0);
    }

    #[test]
    fn each_key_updates_only_its_field() {
        let mut academy = academy();
        let store = CurriculumParameterStore::initialize(&mut academy).unwrap();

        set(&mut academy, FISH_SPEED, 1.5);
        assert_eq!(store.fish_speed(), 1.5);
        assert_eq!(store.feed_radius(), 0.0);

        set(&mut academy, FEED_RADIUS, -0.25);
        assert_eq!(store.fish_speed(), 1.5);
        assert_eq!(store.feed_radius(), -0.25);
    }

    #[test]
    fn stores_values_exactly() {
        let mut academy = academy();
        let store = CurriculumParameterStore::initialize(&mut academy).unwrap();

        for value in [f32::MIN_POSITIVE, f32::MAX, -0.0, 1e-30, f32::INFINITY] {
            set(&mut academy, FISH_SPEED, value);
            assert_eq!(store.fish_speed().to_bits(), value.to_bits());
        }

        set(&mut academy, FEED_RADIUS, f32::NAN);
        assert!(store.feed_radius().is_nan());
    }

    #[test]
    fn last_write_wins() {
        let mut academy = academy();
        let store = CurriculumParameterStore::initialize(&mut academy).unwrap();

        set(&mut academy, FEED_RADIUS, 1.0);
        set(&mut academy, FEED_RADIUS, 0.75);
        assert_eq!(store.feed_radius(), 0.75);
    }

    #[test]
    fn curriculum_scenario() {
        let mut academy = academy();
        let store = CurriculumParameterStore::initialize(&mut academy).unwrap();

        set(&mut academy, FISH_SPEED, 3.5);
        set(&mut academy, FEED_RADIUS, 0.2);
        set(&mut academy, FISH_SPEED, 4.0);

        assert_eq!(store.fish_speed(), 4.0);
        assert_eq!(store.feed_radius(), 0.2);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut academy = academy();
        let store = CurriculumParameterStore::initialize(&mut academy).unwrap();

        set(&mut academy, "gravity", 9.8);
        assert!(!store.params.on_value_changed("gravity", 9.8));
        assert_eq!(store.fish_speed(), 0.0);
        assert_eq!(store.feed_radius(), 0.0);
    }

    #[test]
    fn store_mirrors_registry() {
        let mut academy = academy();
        let store = CurriculumParameterStore::initialize(&mut academy).unwrap();
        let reader = store.clone();

        set(&mut academy, FISH_SPEED, 6.5);
        set(&mut academy, FEED_RADIUS, 0.1);

        let registry = academy.float_properties_mut().unwrap();
        assert_eq!(registry.get_property(FISH_SPEED), Some(reader.fish_speed()));
        assert_eq!(registry.get_property(FEED_RADIUS), Some(reader.feed_radius()));
        assert_eq!(Arc::strong_count(&store.params), 5);
    }

    #[test]
    fn missing_registry_is_a_configuration_error() {
        let config = AcademyConfig {
            float_properties: false,
            ..AcademyConfig::default()
        };
        let mut academy = Academy::new(config).unwrap();
        let err = CurriculumParameterStore::initialize(&mut academy).unwrap_err();
        assert!(matches!(err, AcademyError::Configuration(_)));
    }

    #[test]
    fn second_store_on_same_academy_is_rejected() {
        let mut academy = academy();
        let first = CurriculumParameterStore::initialize(&mut academy).unwrap();

        let err = CurriculumParameterStore::initialize(&mut academy).unwrap_err();
        assert_eq!(
            err,
            AcademyError::DuplicateRegistration {
                key: FISH_SPEED.to_string()
            }
        );

        set(&mut academy, FISH_SPEED, 2.0);
        assert_eq!(first.fish_speed(), 2.0);
        assert_eq!(academy.hook_count(), 1);
    }

    #[test]
    fn partially_bound_registry_registers_nothing() {
        let mut academy = academy();
        academy
            .float_properties_mut()
            .unwrap()
            .register_callback(FEED_RADIUS, |_| {})
            .unwrap();

        let err = CurriculumParameterStore::initialize(&mut academy).unwrap_err();
        assert_eq!(
            err,
            AcademyError::DuplicateRegistration {
                key: FEED_RADIUS.to_string()
            }
        );
        assert!(!academy.float_properties_mut().unwrap().has_callback(FISH_SPEED));
        assert_eq!(academy.hook_count(), 0);
    }
}
