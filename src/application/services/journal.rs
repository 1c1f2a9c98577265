//! Journal service
//!
//! Writes warnings and errors through a decorated [`Logger`].

use std::io::Write;

use tracing::debug;

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{DecoratorKind, Logger, Severity};

/// Owns a logger configured with a list of decorator kinds.
pub struct JournalService<W: Write> {
    logger: Logger<W>,
}

impl<W: Write> JournalService<W> {
    pub fn new(sink: W, decorators: &[DecoratorKind]) -> Self {
        let mut logger = Logger::new(sink);
        for kind in decorators {
            logger.add(kind.build());
        }
        debug!("journal: {} decorators", logger.decorator_count());
        Self { logger }
    }

    pub fn write(&mut self, severity: Severity, message: &str) -> ApplicationResult<()> {
        self.logger
            .log(severity, message)
            .with_context("write log message")
    }

    pub fn into_sink(self) -> W {
        self.logger.into_sink()
    }
}
