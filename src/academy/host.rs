use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use super::errors::AcademyError;
use super::traits::LifecycleHooks;
use crate::channel::{FLOAT_PROPERTIES_CHANNEL_ID, FloatPropertiesChannel, SideChannelManager};
use crate::config::AcademyConfig;

/// Something the trainer asks the academy to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Raw framed side-channel payload, as received from the trainer.
    SideChannel { data: Vec<u8> },
    /// Shortcut for a single float property change.
    SetProperty { key: String, value: f32 },
    /// Advance the simulation by one tick.
    Step,
    Shutdown,
}

/// Source of trainer events for [`Academy::run`].
#[async_trait]
pub trait TrainerLink: Send {
    /// Next event, or `None` once the trainer has gone away.
    async fn recv(&mut self) -> Option<HostEvent>;
}

#[async_trait]
impl TrainerLink for mpsc::Receiver<HostEvent> {
    async fn recv(&mut self) -> Option<HostEvent> {
        mpsc::Receiver::recv(self).await
    }
}

#[async_trait]
impl TrainerLink for mpsc::UnboundedReceiver<HostEvent> {
    async fn recv(&mut self) -> Option<HostEvent> {
        mpsc::UnboundedReceiver::recv(self).await
    }
}

// Replays a fixed script, handy for demos and tests.
#[async_trait]
impl TrainerLink for VecDeque<HostEvent> {
    async fn recv(&mut self) -> Option<HostEvent> {
        self.pop_front()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademyReport {
    pub steps: u64,
    pub messages: u64,
}

/// Drives the environment side of a training run.
///
/// Owns the side channels the trainer talks to and the lifecycle hooks of
/// every component that plugged into it. Side-channel dispatch and ticks are
/// handled one event at a time, so callbacks never run concurrently with
/// `on_update`.
pub struct Academy {
    config: AcademyConfig,
    channels: SideChannelManager,
    hooks: Vec<Arc<dyn LifecycleHooks>>,
    started: bool,
    steps: u64,
    messages: u64,
}

impl Academy {
    pub fn new(config: AcademyConfig) -> Result<Self, AcademyError> {
        let mut channels = SideChannelManager::new();
        if config.float_properties {
            channels.register(Box::new(FloatPropertiesChannel::new()))?;
        }
        debug!(?config, "academy created");

        Ok(Self {
            config,
            channels,
            hooks: Vec::new(),
            started: false,
            steps: 0,
            messages: 0,
        })
    }

    pub fn config(&self) -> &AcademyConfig {
        &self.config
    }

    pub fn float_properties_mut(&mut self) -> Option<&mut FloatPropertiesChannel> {
        self.channels.get_mut(&FLOAT_PROPERTIES_CHANNEL_ID)
    }

    pub fn side_channels_mut(&mut self) -> &mut SideChannelManager {
        &mut self.channels
    }

    pub fn add_hooks(&mut self, hooks: Arc<dyn LifecycleHooks>) {
        self.hooks.push(hooks);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn is_done(&self) -> bool {
        self.config
            .max_steps
            .is_some_and(|max_steps| self.steps >= max_steps)
    }

    /// Run every `on_start` hook. Later calls do nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!(hooks = self.hooks.len(), "academy started");
        for hooks in &self.hooks {
            hooks.on_start();
        }
    }

    /// Advance one tick, starting the academy first if needed.
    pub fn step(&mut self) {
        self.start();
        for hooks in &self.hooks {
            hooks.on_update();
        }
        self.steps += 1;
    }

    pub fn process_side_channel_data(&mut self, data: &[u8]) -> Result<usize, AcademyError> {
        let delivered = self.channels.process_side_channel_data(data)?;
        self.messages += delivered as u64;
        Ok(delivered)
    }

    /// Apply one trainer event. Returns `false` when the run should stop.
    pub fn handle_event(&mut self, event: HostEvent) -> Result<bool, AcademyError> {
        match event {
            HostEvent::SideChannel { data } => {
                self.process_side_channel_data(&data)?;
            }
            HostEvent::SetProperty { key, value } => {
                let properties = self.float_properties_mut().ok_or_else(|| {
                    AcademyError::Configuration(
                        "academy has no float properties channel".to_string(),
                    )
                })?;
                properties.set_property(&key, value)?;
                self.messages += 1;
            }
            HostEvent::Step => self.step(),
            HostEvent::Shutdown => return Ok(false),
        }
        Ok(!self.is_done())
    }

    /// Consume events from `link` until shutdown, disconnect, or `max_steps`.
    #[instrument(skip_all)]
    pub async fn run<L: TrainerLink>(&mut self, link: &mut L) -> Result<AcademyReport, AcademyError> {
        self.start();
        while !self.is_done() {
            let Some(event) = link.recv().await else {
                info!("trainer link closed");
                break;
            };
            if !self.handle_event(event)? {
                break;
            }
        }

        let report = self.report();
        info!(steps = report.steps, messages = report.messages, "academy run finished");
        Ok(report)
    }

    pub fn report(&self) -> AcademyReport {
        AcademyReport {
            steps: self.steps,
            messages: self.messages,
        }
    }
}

impl std::fmt::Debug for Academy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Academy")
            .field("config", &self.config)
            .field("channels", &self.channels.len())
            .field("hooks", &self.hooks.len())
            .field("started", &self.started)
            .field("steps", &self.steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        starts: AtomicUsize,
        updates: AtomicUsize,
    }

    impl LifecycleHooks for Counter {
        fn on_start(&self) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_update(&self) {
            self.updates.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn start_runs_once_before_updates() {
        let mut academy = Academy::new(AcademyConfig::default()).unwrap();
        let counter = Arc::new(Counter::default());
        academy.add_hooks(counter.clone());

        academy.step();
        academy.start();
        academy.step();

        assert_eq!(counter.starts.load(Ordering::SeqCst), 1);
        assert_eq!(counter.updates.load(Ordering::SeqCst), 2);
        assert_eq!(academy.step_count(), 2);
    }

    #[test]
    fn max_steps_marks_done() {
        let config = AcademyConfig {
            max_steps: Some(2),
            ..AcademyConfig::default()
        };
        let mut academy = Academy::new(config).unwrap();
        assert_eq!(academy.config().max_steps, Some(2));

        assert!(academy.handle_event(HostEvent::Step).unwrap());
        assert!(!academy.handle_event(HostEvent::Step).unwrap());
        assert!(academy.is_done());
    }

    #[test]
    fn set_property_without_channel_fails() {
        let config = AcademyConfig {
            float_properties: false,
            ..AcademyConfig::default()
        };
        let mut academy = Academy::new(config).unwrap();
        let err = academy
            .handle_event(HostEvent::SetProperty {
                key: "fish_speed".to_string(),
                value: 1.0,
            })
            .unwrap_err();
        assert!(matches!(err, AcademyError::Configuration(_)));
    }

    #[test]
    fn host_events_use_tagged_json() {
        let json = r#"[
            {"type": "set_property", "key": "fish_speed", "value": 1.5},
            {"type": "step"},
            {"type": "shutdown"}
        ]"#;
        let events: Vec<HostEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(
            events,
            vec![
                HostEvent::SetProperty {
                    key: "fish_speed".to_string(),
                    value: 1.5
                },
                HostEvent::Step,
                HostEvent::Shutdown,
            ]
        );
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let mut academy = Academy::new(AcademyConfig::default()).unwrap();
        let mut script: VecDeque<HostEvent> = [
            HostEvent::Step,
            HostEvent::Step,
            HostEvent::Shutdown,
            HostEvent::Step,
        ]
        .into_iter()
        .collect();

        let report = academy.run(&mut script).await.unwrap();

        assert_eq!(report, AcademyReport { steps: 2, messages: 0 });
        assert_eq!(script.len(), 1);
    }
}
