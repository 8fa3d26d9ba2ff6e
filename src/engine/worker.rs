//! Acquisition worker loop
//!
//! Runs the engine against a [`SampleSource`] on its own thread and applies
//! configuration changes strictly *between* acquisition passes: commands
//! queued while a pass is in flight take effect starting with the next
//! pass, never partially within one. This is the crate's whole concurrency
//! story; the engine itself stays single-threaded and lock-free.
//!
//! # Channels
//!
//! The embedding application holds a [`ScopeBridge`] and talks to the
//! worker over crossbeam channels:
//!
//! - [`ScopeCommand`] - configuration mutations and shutdown
//! - [`PassMessage`] - per-pass summaries and surfaced errors
//!
//! # Shutdown
//!
//! The worker stops when it receives [`ScopeCommand::Shutdown`], when the
//! command channel disconnects, or when the shared running flag clears.

use crate::acquisition::SampleSource;
use crate::engine::{AfeSelector, PassSummary, ScopeEngine};
use crate::error::Result;
use crate::trigger::TriggerSlope;
use crate::types::AdcCount;
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Commands applied between acquisition passes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScopeCommand {
    /// Select a timebase entry
    SelectTimebase { index: usize },
    /// Select a volts/div entry for a channel
    SelectVoltage { channel: usize, index: usize },
    /// Show or hide a channel
    SetShown { channel: usize, shown: bool },
    /// Move a channel's zero-volt line
    SetYOffset { channel: usize, y_offset: i32 },
    /// Reconfigure the trigger
    SetTrigger {
        channel: usize,
        slope: TriggerSlope,
        level: f64,
    },
    /// Stop the worker loop
    Shutdown,
}

/// Messages published by the worker after each pass
#[derive(Debug, Clone)]
pub enum PassMessage {
    /// One acquisition pass completed
    Summary(PassSummary),
    /// A command or acquisition step failed; the loop keeps running
    Error(String),
}

/// Application-side handle to a running worker
#[derive(Debug, Clone)]
pub struct ScopeBridge {
    command_tx: Sender<ScopeCommand>,
    message_rx: Receiver<PassMessage>,
    running: Arc<AtomicBool>,
}

impl ScopeBridge {
    pub fn select_timebase(&self, index: usize) {
        let _ = self.command_tx.send(ScopeCommand::SelectTimebase { index });
    }

    pub fn select_voltage(&self, channel: usize, index: usize) {
        let _ = self
            .command_tx
            .send(ScopeCommand::SelectVoltage { channel, index });
    }

    pub fn set_channel_shown(&self, channel: usize, shown: bool) {
        let _ = self.command_tx.send(ScopeCommand::SetShown { channel, shown });
    }

    pub fn set_y_offset(&self, channel: usize, y_offset: i32) {
        let _ = self
            .command_tx
            .send(ScopeCommand::SetYOffset { channel, y_offset });
    }

    pub fn set_trigger(&self, channel: usize, slope: TriggerSlope, level: f64) {
        let _ = self.command_tx.send(ScopeCommand::SetTrigger {
            channel,
            slope,
            level,
        });
    }

    /// Ask the worker to stop after the pass in flight
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.command_tx.send(ScopeCommand::Shutdown);
    }

    /// Collect every message published since the last drain
    pub fn drain(&self) -> Vec<PassMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.message_rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Whether the worker loop is still running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Owns the engine and a sample source; runs acquisition passes in a loop
pub struct ScopeWorker<S: AfeSelector, A: SampleSource> {
    engine: ScopeEngine<S>,
    source: A,
    command_rx: Receiver<ScopeCommand>,
    message_tx: Sender<PassMessage>,
    running: Arc<AtomicBool>,
    buffers: Vec<Vec<AdcCount>>,
}

impl<S: AfeSelector, A: SampleSource> ScopeWorker<S, A> {
    /// Wire up a worker and the bridge the application keeps
    pub fn new(engine: ScopeEngine<S>, source: A) -> (Self, ScopeBridge) {
        let (command_tx, command_rx) = unbounded();
        let (message_tx, message_rx) = unbounded();
        let running = Arc::new(AtomicBool::new(true));

        let channel_count = engine.channels().len();
        let worker = Self {
            engine,
            source,
            command_rx,
            message_tx,
            running: running.clone(),
            buffers: vec![Vec::new(); channel_count],
        };
        let bridge = ScopeBridge {
            command_tx,
            message_rx,
            running,
        };
        (worker, bridge)
    }

    /// Run passes until shutdown
    ///
    /// Commands are drained before each pass; a pass in flight always
    /// completes with the parameters it started with.
    pub fn run(mut self) {
        tracing::info!("Scope worker started");
        while self.running.load(Ordering::SeqCst) {
            if !self.apply_pending_commands() {
                break;
            }
            match self.acquire_and_process() {
                Ok(summary) => {
                    let _ = self.message_tx.send(PassMessage::Summary(summary));
                }
                Err(e) => {
                    tracing::warn!("Acquisition pass failed: {}", e);
                    let _ = self.message_tx.send(PassMessage::Error(e.to_string()));
                }
            }
        }
        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Scope worker stopped");
    }

    /// Direct access to the engine, for embedders driving passes manually
    pub fn engine_mut(&mut self) -> &mut ScopeEngine<S> {
        &mut self.engine
    }

    // Returns false when the loop should stop.
    fn apply_pending_commands(&mut self) -> bool {
        loop {
            match self.command_rx.try_recv() {
                Ok(ScopeCommand::Shutdown) => return false,
                Ok(command) => {
                    if let Err(e) = self.apply_command(command) {
                        tracing::warn!("Command {:?} rejected: {}", command, e);
                        let _ = self.message_tx.send(PassMessage::Error(e.to_string()));
                    }
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn apply_command(&mut self, command: ScopeCommand) -> Result<()> {
        match command {
            ScopeCommand::SelectTimebase { index } => self.engine.select_timebase(index),
            ScopeCommand::SelectVoltage { channel, index } => {
                self.engine.select_voltage(channel, index)
            }
            ScopeCommand::SetShown { channel, shown } => {
                self.engine.set_channel_shown(channel, shown)
            }
            ScopeCommand::SetYOffset { channel, y_offset } => {
                self.engine.set_y_offset(channel, y_offset)
            }
            ScopeCommand::SetTrigger {
                channel,
                slope,
                level,
            } => self.engine.set_trigger(channel, slope, level),
            ScopeCommand::Shutdown => Ok(()),
        }
    }

    fn acquire_and_process(&mut self) -> Result<PassSummary> {
        let samples = self.engine.samples_per_pass();
        let sample_rate = self.engine.timebase_entry().sample_rate;
        for (channel, buffer) in self.buffers.iter_mut().enumerate() {
            buffer.resize(samples, 0);
            self.source.fill(channel, sample_rate, buffer)?;
        }
        self.engine.process_pass(&self.buffers)
    }
}
