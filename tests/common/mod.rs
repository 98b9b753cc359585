#![allow(dead_code)]

use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc, Mutex,
    },
    thread,
    time::{Duration, Instant},
};

pub const BOUND: Duration = Duration::from_secs(5);

/// How long a nested acquire gets to show it is stuck.
pub const STALL: Duration = Duration::from_millis(250);

/// Runs `f` on a fresh thread and reports whether it finished within `BOUND`.
pub fn finishes_in_time<F>(f: F) -> bool
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        f();
        let _ = tx.send(());
    });
    rx.recv_timeout(BOUND).is_ok()
}

/// Runs `f` on a fresh thread and reports whether it failed to return
/// normally: it either panicked or was still blocked after `STALL`.
///
/// A blocked thread is left behind, holding whatever it holds.
pub fn never_returns<F>(f: F) -> bool
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let returned = catch_unwind(AssertUnwindSafe(f)).is_ok();
        let _ = tx.send(returned);
    });
    match rx.recv_timeout(STALL) {
        Ok(returned) => !returned,
        Err(_) => true,
    }
}

/// Spins until `counter` reaches `target` or `BOUND` elapses.
pub fn wait_for(counter: &AtomicUsize, target: usize) -> bool {
    let deadline = Instant::now() + BOUND;
    while counter.load(Ordering::SeqCst) < target {
        if Instant::now() >= deadline {
            return false;
        }
        thread::yield_now();
    }
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy)]
pub struct Interval {
    pub kind: Kind,
    pub enter: usize,
    pub exit: usize,
}

impl Interval {
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.enter < other.exit && other.enter < self.exit
    }
}

/// Records enter/exit ticks from a shared logical clock.
#[derive(Default)]
pub struct Recorder {
    clock: AtomicUsize,
    intervals: Mutex<Vec<Interval>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record(&self, kind: Kind, work: impl FnOnce()) {
        let enter = self.clock.fetch_add(1, Ordering::SeqCst);
        work();
        let exit = self.clock.fetch_add(1, Ordering::SeqCst);
        self.intervals
            .lock()
            .unwrap()
            .push(Interval { kind, enter, exit });
    }

    pub fn intervals(&self) -> Vec<Interval> {
        self.intervals.lock().unwrap().clone()
    }

    /// Pairs of intervals that overlap while at least one of them is a write.
    pub fn write_overlaps(&self) -> Vec<(Interval, Interval)> {
        let intervals = self.intervals();
        let mut bad = Vec::new();
        for (i, a) in intervals.iter().enumerate() {
            for b in &intervals[i + 1..] {
                let has_writer = a.kind == Kind::Write || b.kind == Kind::Write;
                if has_writer && a.overlaps(b) {
                    bad.push((*a, *b));
                }
            }
        }
        bad
    }
}
