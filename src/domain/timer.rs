//! Event timer: publishes start, tick and stop events to subscribers.

use std::fmt;
use std::thread;
use std::time::Duration;

use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Ordered list of callbacks for one event.
pub struct Delegate<A> {
    callbacks: Vec<Box<dyn FnMut(&mut A)>>,
}

impl<A> Default for Delegate<A> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }
}

impl<A> fmt::Debug for Delegate<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl<A> Delegate<A> {
    /// Register a callback; callbacks run in subscription order.
    pub fn subscribe<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut(&mut A) + 'static,
    {
        self.callbacks.push(Box::new(callback));
        self
    }

    /// Invoke all registered callbacks with `arg`.
    pub fn emit(&mut self, arg: &mut A) {
        for callback in &mut self.callbacks {
            callback(arg);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

/// Lifecycle of a timer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    /// Stop requested, the loop exits after the current tick.
    Stopping,
    Finished,
}

/// Handle passed to every event callback.
#[derive(Debug)]
pub struct TimerControl {
    state: TimerState,
    ticks: u64,
}

impl TimerControl {
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Ticks emitted so far in this run.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Request the loop to end. Only valid while running.
    pub fn stop(&mut self) -> DomainResult<()> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Stopping;
                Ok(())
            }
            state => Err(DomainError::InvalidTransition {
                state,
                action: "stop",
            }),
        }
    }
}

/// Timer running these stages on the caller's thread:
/// 1. emits the start event once
/// 2. sleeps `interval`, then emits the tick event, until a callback stops it
/// 3. emits the stop event once
#[derive(Debug)]
pub struct Timer {
    pub start_event: Delegate<TimerControl>,
    pub tick_event: Delegate<TimerControl>,
    pub stop_event: Delegate<TimerControl>,
    interval: Duration,
    state: TimerState,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Timer {
    pub fn new(interval: Duration) -> Self {
        Self {
            start_event: Delegate::default(),
            tick_event: Delegate::default(),
            stop_event: Delegate::default(),
            interval,
            state: TimerState::Idle,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Run until a tick callback calls [`TimerControl::stop`].
    ///
    /// Returns the number of ticks emitted. Blocks the calling thread.
    #[instrument(level = "debug", skip(self), fields(interval_ms = self.interval.as_millis() as u64))]
    pub fn run(&mut self) -> DomainResult<u64> {
        match self.state {
            TimerState::Idle | TimerState::Finished => {}
            state => {
                return Err(DomainError::InvalidTransition {
                    state,
                    action: "run",
                })
            }
        }

        self.state = TimerState::Running;
        let mut control = TimerControl {
            state: TimerState::Running,
            ticks: 0,
        };

        self.start_event.emit(&mut control);
        while control.state == TimerState::Running {
            thread::sleep(self.interval);
            control.ticks += 1;
            trace!("tick {}", control.ticks);
            self.tick_event.emit(&mut control);
        }

        control.state = TimerState::Finished;
        self.state = TimerState::Finished;
        self.stop_event.emit(&mut control);
        debug!("timer finished after {} ticks", control.ticks);
        Ok(control.ticks)
    }
}

/// Callback that stops the timer once it has already seen `ticks` invocations.
///
/// With `stop_after(5)` the timer stops on the sixth tick.
pub fn stop_after(ticks: u64) -> impl FnMut(&mut TimerControl) {
    let mut remaining = ticks;
    move |control: &mut TimerControl| {
        if remaining == 0 {
            if let Err(e) = control.stop() {
                debug!("stop_after: {}", e);
            }
        } else {
            remaining -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn given_stop_requested_twice_when_stopping_then_second_is_invalid() {
        let mut control = TimerControl {
            state: TimerState::Running,
            ticks: 0,
        };
        assert!(control.stop().is_ok());
        assert_eq!(
            control.stop(),
            Err(DomainError::InvalidTransition {
                state: TimerState::Stopping,
                action: "stop",
            })
        );
    }

    #[test]
    fn given_delegate_when_emitting_then_runs_callbacks_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut delegate: Delegate<u32> = Delegate::default();
        let (a, b) = (Rc::clone(&seen), Rc::clone(&seen));
        assert!(delegate.is_empty());
        delegate
            .subscribe(move |v| a.borrow_mut().push(("first", *v)))
            .subscribe(move |v| b.borrow_mut().push(("second", *v)));

        assert_eq!(delegate.len(), 2);

        delegate.emit(&mut 7);
        assert_eq!(*seen.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn given_new_timer_when_inspecting_then_idle_with_requested_interval() {
        let timer = Timer::new(Duration::from_millis(250));
        assert_eq!(timer.interval(), Duration::from_millis(250));
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(timer.tick_event.is_empty());
        assert_eq!(Timer::default().interval(), Duration::from_secs(1));
    }
}
