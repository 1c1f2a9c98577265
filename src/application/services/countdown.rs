//! Countdown service
//!
//! Runs a timer that prints a start banner, one dot per tick and a finish banner.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use tracing::{instrument, warn};

use crate::application::ApplicationResult;
use crate::config::TimerSettings;
use crate::domain::{stop_after, Timer};

/// Drives a [`Timer`] for a fixed number of ticks.
#[derive(Debug, Clone)]
pub struct CountdownService {
    interval: Duration,
    ticks: u64,
}

impl CountdownService {
    pub fn new(interval: Duration, ticks: u64) -> Self {
        Self { interval, ticks }
    }

    pub fn from_settings(settings: &TimerSettings) -> Self {
        Self::new(Duration::from_millis(settings.interval_ms), settings.ticks)
    }

    /// Build the timer with its subscribers wired to `out`.
    pub fn timer<W: Write + 'static>(&self, out: Rc<RefCell<W>>) -> Timer {
        let mut timer = Timer::new(self.interval);

        let start_out = Rc::clone(&out);
        timer.start_event.subscribe(move |_| {
            write_or_warn(&start_out, "Timer started\n");
        });

        timer.tick_event.subscribe(stop_after(self.ticks));
        let tick_out = Rc::clone(&out);
        timer.tick_event.subscribe(move |_| {
            write_or_warn(&tick_out, ".");
        });

        timer.stop_event.subscribe(move |_| {
            write_or_warn(&out, "\nTimer finished\n");
        });
        timer
    }

    /// Run the countdown to completion. Returns the number of ticks emitted.
    #[instrument(level = "debug", skip(self, out), fields(ticks = self.ticks))]
    pub fn run<W: Write + 'static>(&self, out: Rc<RefCell<W>>) -> ApplicationResult<u64> {
        let mut timer = self.timer(out);
        Ok(timer.run()?)
    }
}

// Event callbacks cannot return errors
fn write_or_warn<W: Write>(out: &Rc<RefCell<W>>, text: &str) {
    let mut out = out.borrow_mut();
    if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
        warn!("countdown output failed: {}", e);
    }
}
