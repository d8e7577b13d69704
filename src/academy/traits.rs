/// Receives named float updates pushed by the trainer.
///
/// Only callbacks registered with the float properties channel write through
/// this, so it stays private to the crate.
pub(crate) trait ParameterSink: Send + Sync {
    /// Names this sink accepts, in registration order.
    fn keys(&self) -> &'static [&'static str];

    /// Apply `value` to the parameter called `name`. Returns `false` when the
    /// name is not one of [`keys`](Self::keys).
    fn on_value_changed(&self, name: &str, value: f32) -> bool;
}

/// Host lifecycle extension points. Both hooks default to doing nothing.
pub trait LifecycleHooks: Send + Sync {
    /// Called once, before the first `on_update`.
    fn on_start(&self) {}

    /// Called once per simulation tick.
    fn on_update(&self) {}
}
