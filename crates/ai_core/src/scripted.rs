//! Deterministic collaborators for tests and non-interactive runs

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::error::InvocationError;
use crate::ports::{ImageSink, InputSource};

/// Input source that replays canned answers in order
///
/// Once the script runs out every further question is answered with an
/// empty string, which selects the default.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInputSource {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedInputSource {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Source that accepts every default
    #[must_use]
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Labels asked so far, in order
    #[must_use]
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputSource for ScriptedInputSource {
    fn get(&mut self, label: &str, _default: &str) -> Result<String, InvocationError> {
        self.asked.push(label.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

/// Image sink that keeps written images in memory
#[derive(Debug, Default)]
pub struct MemoryImageSink {
    written: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryImageSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Written `(name, bytes)` pairs, in write order
    #[must_use]
    pub fn written(&self) -> Vec<(String, Vec<u8>)> {
        self.written.lock().clone()
    }
}

impl ImageSink for MemoryImageSink {
    fn write(&self, bytes: &[u8], suggested_name: &str) -> Result<(), InvocationError> {
        self.written
            .lock()
            .push((suggested_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_answers_then_defaults() {
        let mut source = ScriptedInputSource::new(["a", "b"]);
        assert_eq!(source.get("one", "x").unwrap(), "a");
        assert_eq!(source.get("two", "y").unwrap(), "b");
        assert_eq!(source.get("three", "z").unwrap(), "");
        assert_eq!(source.asked(), ["one", "two", "three"]);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn defaults_source_answers_empty() {
        let mut source = ScriptedInputSource::defaults();
        assert_eq!(source.get("temperature", "0.9").unwrap(), "");
    }

    #[test]
    fn memory_sink_records_writes() {
        let sink = MemoryImageSink::new();
        sink.write(&[1, 2], "generated_image-1.png").unwrap();
        sink.write(&[3], "generated_image-2.png").unwrap();

        let written = sink.written();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].0, "generated_image-1.png");
        assert_eq!(written[1].1, vec![3]);
    }
}
