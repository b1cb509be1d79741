//! Outbound side of the spoofer node

use crate::control::Trajectory;
use crate::error::Result;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// One published trajectory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryMessage {
    pub frame_id: String,
    /// Increments on every message a node hands out
    pub sequence: u64,
    /// Wall-clock time since the UNIX epoch
    pub stamp: Duration,
    pub trajectory: Trajectory,
}

/// Sink for trajectory messages, e.g. a message-bus topic
pub trait TrajectoryPublisher: Send + Sync {
    fn publish(&self, message: &TrajectoryMessage) -> Result<()>;
}

/// Writes each message as one line of JSON
#[derive(Debug)]
pub struct JsonLinesPublisher<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesPublisher<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesPublisher {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JsonLinesPublisher<io::Stdout> {
    pub fn stdout() -> Self {
        JsonLinesPublisher::new(io::stdout())
    }
}

impl<W: Write + Send> TrajectoryPublisher for JsonLinesPublisher<W> {
    fn publish(&self, message: &TrajectoryMessage) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *writer, message)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
