// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::cell::RefCell;

/// Receives one message per failure reported by the graphics layer.
pub trait DiagnosticsSink {
    /// Records a diagnostic.
    fn message(&self, text: &str);
}

/// Forwards diagnostics to the `log` facade at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn message(&self, text: &str) {
        log::warn!("{text}");
    }
}

/// Keeps every diagnostic in memory so tests can assert on them.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: RefCell<Vec<String>>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every message received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Number of messages received.
    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    /// Whether no message was received.
    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    /// Forgets all messages.
    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl DiagnosticsSink for MemorySink {
    fn message(&self, text: &str) {
        log::debug!("{text}");
        self.messages.borrow_mut().push(text.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        // ARRANGE
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        // ACT
        sink.message("first");
        sink.message("second");

        // ASSERT
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.messages(), vec!["first", "second"]);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sinks_are_object_safe() {
        let sinks: Vec<Box<dyn DiagnosticsSink>> =
            vec![Box::new(LogSink), Box::new(MemorySink::new())];
        for sink in &sinks {
            sink.message("hello");
        }
    }
}
