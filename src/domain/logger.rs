//! Logger whose decorators rewrite each message before it is written.

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Message rewriter applied by [`Logger`].
pub trait LogDecorator {
    fn decorate(&self, severity: Severity, message: String) -> String;
}

/// Upper-cases error messages, leaves warnings untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmphasisDecorator;

impl LogDecorator for EmphasisDecorator {
    fn decorate(&self, severity: Severity, message: String) -> String {
        match severity {
            Severity::Error => message.to_uppercase(),
            Severity::Warning => message,
        }
    }
}

/// Prefixes `"<unix seconds>: "` to every message.
pub struct TimestampDecorator {
    clock: Box<dyn Fn() -> i64>,
}

impl Default for TimestampDecorator {
    fn default() -> Self {
        Self::with_clock(|| chrono::Utc::now().timestamp())
    }
}

impl TimestampDecorator {
    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> i64 + 'static,
    {
        Self {
            clock: Box::new(clock),
        }
    }
}

impl LogDecorator for TimestampDecorator {
    fn decorate(&self, _severity: Severity, message: String) -> String {
        format!("{}: {}", (self.clock)(), message)
    }
}

/// Named decorator kinds, used by settings and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoratorKind {
    Emphasis,
    Timestamp,
}

impl DecoratorKind {
    pub fn build(self) -> Box<dyn LogDecorator> {
        match self {
            DecoratorKind::Emphasis => Box::new(EmphasisDecorator),
            DecoratorKind::Timestamp => Box::new(TimestampDecorator::default()),
        }
    }
}

/// Handle returned by [`Logger::add`], used to remove the decorator again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecoratorId(u64);

/// Writes one line per message to `sink` after running the decorators in
/// insertion order.
pub struct Logger<W: Write> {
    sink: W,
    decorators: Vec<(DecoratorId, Box<dyn LogDecorator>)>,
    next_id: u64,
}

impl Logger<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Logger<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            decorators: Vec::new(),
            next_id: 0,
        }
    }

    pub fn add(&mut self, decorator: Box<dyn LogDecorator>) -> DecoratorId {
        let id = DecoratorId(self.next_id);
        self.next_id += 1;
        self.decorators.push((id, decorator));
        id
    }

    /// Remove a decorator; false if it was not registered.
    pub fn remove(&mut self, id: DecoratorId) -> bool {
        let before = self.decorators.len();
        self.decorators.retain(|(d, _)| *d != id);
        self.decorators.len() != before
    }

    pub fn decorator_count(&self) -> usize {
        self.decorators.len()
    }

    pub fn log(&mut self, severity: Severity, message: &str) -> io::Result<()> {
        let line = self
            .decorators
            .iter()
            .fold(message.to_string(), |msg, (_, d)| d.decorate(severity, msg));
        trace!(%severity, "log: {}", line);
        writeln!(self.sink, "{}", line)
    }

    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        self.log(Severity::Warning, message)
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        self.log(Severity::Error, message)
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_emphasis_when_decorating_then_only_errors_change() {
        let d = EmphasisDecorator;
        assert_eq!(d.decorate(Severity::Error, "disk full".into()), "DISK FULL");
        assert_eq!(d.decorate(Severity::Warning, "disk low".into()), "disk low");
    }

    #[test]
    fn given_fixed_clock_when_decorating_then_prefixes_seconds() {
        let d = TimestampDecorator::with_clock(|| 1_700_000_000);
        assert_eq!(
            d.decorate(Severity::Warning, "hi".into()),
            "1700000000: hi"
        );
    }

    #[test]
    fn given_unknown_id_when_removing_then_returns_false() {
        let mut logger = Logger::new(Vec::new());
        let id = logger.add(Box::new(EmphasisDecorator));
        assert!(logger.remove(id));
        assert!(!logger.remove(id));
        assert_eq!(logger.decorator_count(), 0);
    }
}
