use serde::Serialize;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use warren_core::Frame;

// --- Error Type ---
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to serialize frame: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write frame: {0}")]
    Io(#[from] io::Error),
}

// --- Traits ---
/// Turns one frame into one output line (without the trailing newline).
pub trait Serializer: Send + Sync {
    fn serialize(&self, frame: &Frame) -> Result<String, TransportError>;
}

/// Sends serialized lines to a destination.
pub trait Sender: Send {
    fn send(&mut self, line: &str) -> Result<(), TransportError>;
}

// --- Serializers ---

/// `"<Label> Rabbit Position: (<x>, <y>)"`, the plain report line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSerializer;

impl Serializer for TextSerializer {
    fn serialize(&self, frame: &Frame) -> Result<String, TransportError> {
        Ok(frame.report.to_string())
    }
}

#[derive(Serialize, Debug)]
struct FrameLine {
    tick: u64,
    elapsed: f64,
    rabbit: &'static str,
    x: f64,
    y: f64,
}

/// One JSON object per frame, flattened for line-oriented consumers.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, frame: &Frame) -> Result<String, TransportError> {
        let line = FrameLine {
            tick: frame.tick,
            elapsed: frame.elapsed,
            rabbit: frame.report.kind.label(),
            x: frame.report.position.x,
            y: frame.report.position.y,
        };
        Ok(serde_json::to_string(&line)?)
    }
}

// --- Senders ---

/// Writes each line to standard output.
pub struct StdioSender {
    stdout: io::Stdout,
}

impl StdioSender {
    pub fn new() -> Self {
        StdioSender { stdout: io::stdout() }
    }
}

impl Sender for StdioSender {
    fn send(&mut self, line: &str) -> Result<(), TransportError> {
        let mut out = self.stdout.lock();
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

impl Default for StdioSender {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps every line in memory. Clones share the same buffer, so a caller can
/// hand one clone to a [`Transport`] and read the lines back from another.
#[derive(Debug, Default, Clone)]
pub struct MemorySender {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Sender for MemorySender {
    fn send(&mut self, line: &str) -> Result<(), TransportError> {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.to_owned());
        Ok(())
    }
}

// --- Pipeline ---

/// Serializer and sender pair the drivers publish frames through.
pub struct Transport {
    serializer: Box<dyn Serializer>,
    sender: Box<dyn Sender>,
    published: u64,
}

impl Transport {
    pub fn new(serializer: Box<dyn Serializer>, sender: Box<dyn Sender>) -> Self {
        Self {
            serializer,
            sender,
            published: 0,
        }
    }

    pub fn publish(&mut self, frame: &Frame) -> Result<(), TransportError> {
        let line = self.serializer.serialize(frame)?;
        self.sender.send(&line)?;
        self.published += 1;
        Ok(())
    }

    /// Number of frames successfully published so far.
    pub fn published(&self) -> u64 {
        self.published
    }
}
