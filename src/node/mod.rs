//! Managed node that owns the spoofer configuration and republishes its trajectory
pub mod publisher;

pub use self::publisher::{JsonLinesPublisher, TrajectoryMessage, TrajectoryPublisher};

use crate::control::{
    Trajectory, TrajectoryConfiguration, TrajectoryGenerator, TrajectoryParameters,
};
use crate::error::Result;
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State, Transition};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Default republish period in milliseconds (10 Hz)
pub const DEFAULT_PUBLISH_PERIOD_MS: u64 = 100;

/// Default republish period (10 Hz)
pub const DEFAULT_PUBLISH_PERIOD: Duration = Duration::from_millis(DEFAULT_PUBLISH_PERIOD_MS);

/// Validated configuration together with the trajectory generated from it
#[derive(Debug, Clone)]
struct Loaded {
    configuration: TrajectoryConfiguration,
    trajectory: Arc<Trajectory>,
}

/// Lifecycle-managed trajectory spoofer.
///
/// The trajectory is generated once on configure and handed out unchanged on
/// every publish until a successful [`reconfigure`](Self::reconfigure).
#[derive(Debug)]
pub struct TrajectorySpooferNode {
    base: Mutex<LifecycleNodeBase>,
    frame_id: String,
    generator: TrajectoryGenerator,
    parameters: RwLock<TrajectoryParameters>,
    loaded: RwLock<Option<Loaded>>,
    sequence: AtomicU64,
}

impl TrajectorySpooferNode {
    /// Create an unconfigured node
    pub fn new(name: &str, frame_id: &str, parameters: TrajectoryParameters) -> Self {
        TrajectorySpooferNode {
            base: Mutex::new(LifecycleNodeBase::new(name)),
            frame_id: frame_id.to_string(),
            generator: TrajectoryGenerator::new(),
            parameters: RwLock::new(parameters),
            loaded: RwLock::new(None),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> String {
        self.base().name.clone()
    }

    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    pub fn parameters(&self) -> TrajectoryParameters {
        self.parameters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Configuration in use, once configured
    pub fn configuration(&self) -> Option<TrajectoryConfiguration> {
        self.loaded().map(|loaded| loaded.configuration)
    }

    /// Trajectory in use, once configured
    pub fn trajectory(&self) -> Option<Arc<Trajectory>> {
        self.loaded().map(|loaded| loaded.trajectory)
    }

    /// Replace the parameters at runtime.
    ///
    /// Invalid parameters are rejected and the previous trajectory stays in
    /// use. A configured node regenerates immediately; an unconfigured one
    /// picks the new parameters up on its next configure.
    pub fn reconfigure(&self, parameters: TrajectoryParameters) -> Result<()> {
        // lock order: base, parameters, loaded
        let base = self.base();
        let loaded = match self.load(&parameters) {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(
                    node = %base.name,
                    error = %err,
                    "Rejected parameter update, keeping previous trajectory"
                );
                return Err(err);
            }
        };

        *self
            .parameters
            .write()
            .unwrap_or_else(PoisonError::into_inner) = parameters;

        let points = loaded.trajectory.len();
        let mut current = self.loaded.write().unwrap_or_else(PoisonError::into_inner);
        if current.is_some() {
            *current = Some(loaded);
            drop(current);
            info!(node = %base.name, points, "Reconfigured trajectory");
        }
        Ok(())
    }

    /// Next message to publish, `None` unless the node is active
    pub fn next_message(&self) -> Option<TrajectoryMessage> {
        if self.state() != State::Active {
            return None;
        }
        let loaded = self.loaded()?;
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Some(TrajectoryMessage {
            frame_id: self.frame_id.clone(),
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
            stamp,
            trajectory: (*loaded.trajectory).clone(),
        })
    }

    /// Publish one message if active; returns whether anything was sent
    pub fn publish_once(&self, publisher: &dyn TrajectoryPublisher) -> Result<bool> {
        match self.next_message() {
            Some(message) => {
                publisher.publish(&message)?;
                debug!(
                    node = %self.name(),
                    sequence = message.sequence,
                    points = message.trajectory.len(),
                    "Published trajectory"
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Republish every `period` until `shutdown` turns true or its sender drops.
    ///
    /// Publish failures are logged and the loop carries on. Returns the number
    /// of messages published.
    pub async fn spin(
        self: Arc<Self>,
        publisher: Arc<dyn TrajectoryPublisher>,
        period: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> u64 {
        let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut published = 0;

        let period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        info!(node = %self.name(), period_ms, "Spinning");

        while !*shutdown.borrow() {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.publish_once(publisher.as_ref()) {
                        Ok(true) => published += 1,
                        Ok(false) => {}
                        Err(err) => warn!(
                            node = %self.name(),
                            error = %err,
                            "Failed to publish trajectory"
                        ),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!(node = %self.name(), published, "Stopped spinning");
        published
    }

    fn base(&self) -> MutexGuard<'_, LifecycleNodeBase> {
        self.base.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn loaded(&self) -> Option<Loaded> {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn load(&self, parameters: &TrajectoryParameters) -> Result<Loaded> {
        let configuration = TrajectoryConfiguration::try_from(parameters)?;
        let trajectory = self.generator.generate(&configuration)?;
        Ok(Loaded {
            configuration,
            trajectory: Arc::new(trajectory),
        })
    }

    fn set_loaded(&self, loaded: Option<Loaded>) {
        *self.loaded.write().unwrap_or_else(PoisonError::into_inner) = loaded;
    }
}

impl LifecycleNode for TrajectorySpooferNode {
    fn on_configure(&self) -> Result<()> {
        let mut base = self.base();
        base.check(Transition::Configure)?;

        let loaded = self.load(&self.parameters())?;
        info!(
            node = %base.name,
            trajectory_type = %loaded.configuration.trajectory_type,
            points = loaded.trajectory.len(),
            target_speed = loaded.configuration.target_speed,
            speed_ramp_on = loaded.configuration.speed_ramp_on,
            "Configuring trajectory spoofer"
        );
        self.set_loaded(Some(loaded));
        base.transition(Transition::Configure)?;
        Ok(())
    }

    fn on_activate(&self) -> Result<()> {
        let mut base = self.base();
        base.transition(Transition::Activate)?;
        info!(node = %base.name, frame_id = %self.frame_id, "Activating trajectory spoofer");
        Ok(())
    }

    fn on_deactivate(&self) -> Result<()> {
        let mut base = self.base();
        base.transition(Transition::Deactivate)?;
        info!(node = %base.name, "Deactivating trajectory spoofer");
        Ok(())
    }

    fn on_cleanup(&self) -> Result<()> {
        let mut base = self.base();
        base.transition(Transition::Cleanup)?;
        self.set_loaded(None);
        self.sequence.store(0, Ordering::Relaxed);
        info!(node = %base.name, "Cleaning up trajectory spoofer");
        Ok(())
    }

    fn on_shutdown(&self) -> Result<()> {
        let mut base = self.base();
        base.transition(Transition::Shutdown)?;
        self.set_loaded(None);
        info!(node = %base.name, "Shutting down trajectory spoofer");
        Ok(())
    }

    fn state(&self) -> State {
        self.base().get_state()
    }
}
