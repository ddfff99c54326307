//! Integration tests for `action_clock` against the real platform.
//!
//! These tests sleep for known durations and verify that the recorded totals
//! reflect at least that much wall-clock time.

#![allow(clippy::indexing_slicing, reason = "panic is fine in tests")]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use action_clock::Session;

/// Writer that keeps everything written to it for later inspection.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.borrow().clone())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn session_with_buffer() -> (Session, SharedBuffer) {
    let session = Session::new();
    let buffer = SharedBuffer::default();
    session.set_output(buffer.clone());
    (session, buffer)
}

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot use the real operating system APIs.
fn sleep_is_measured() {
    let (session, _) = session_with_buffer();
    let _keep_alive = session.registry("");

    let mut registry = session.registry("sleep");
    thread::sleep(Duration::from_millis(20));
    registry.log("sleep");

    let total = session.total_millis("sleep").unwrap();
    assert!(total >= 20.0, "expected at least 20 ms, got {total}");
    assert!(total < 20_000.0, "expected a sane duration, got {total}");
}

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot use the real operating system APIs.
fn outer_action_encloses_inner_actions() {
    let (session, _) = session_with_buffer();
    let _keep_alive = session.registry("");

    let mut registry = session.registry("outer");
    for _ in 0..3 {
        let _inner = registry.scope("inner");
        thread::sleep(Duration::from_millis(5));
    }
    registry.log("outer");

    let outer = session.total_millis("outer").unwrap();
    let inner = session.total_millis("inner").unwrap();

    assert!(inner >= 15.0, "expected at least 15 ms, got {inner}");
    assert!(outer >= inner, "outer {outer} should enclose inner {inner}");

    let report = session.to_report();
    assert_eq!(report.actions().next().unwrap().name(), "outer");
    assert!(report.sum_millis() - report.longest_millis().unwrap() <= outer);
}

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot use the real operating system APIs.
fn last_registry_writes_report_and_resets() {
    let (session, buffer) = session_with_buffer();

    {
        let mut registry = session.registry("phase");
        registry.start("step");
        thread::sleep(Duration::from_millis(2));
        // "step" and "phase" are both force-closed on drop.
    }

    let lines = buffer.lines();
    let report_start = lines
        .iter()
        .position(|line| line.starts_with(" ### action time totals"))
        .expect("report header is written when the last registry is dropped");

    assert!(lines[report_start + 1].ends_with("[ms]  phase"));
    assert!(lines[report_start + 2].ends_with("[ms]  step"));
    assert!(lines[report_start + 3].starts_with(" ### sum of subtimes/longest time: "));
    assert_eq!(
        lines
            .iter()
            .filter(|line| line.contains("forcing close"))
            .count(),
        2
    );

    assert!(session.is_empty());
    assert_eq!(session.live_registries(), 0);
}

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot use the real operating system APIs.
fn output_file_receives_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timings.txt");

    let session = Session::new();
    session.set_output_file(&path).unwrap();

    {
        let mut registry = session.registry("write");
        registry.log("write");
    }

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[ms]  write"));
}

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot use the real operating system APIs.
fn calibration_produces_plausible_rate() {
    let session = Session::new();

    let rate = session.calibrate_cycle_rate(Duration::from_millis(20));

    // Anything from 1 MHz to 100 GHz is a counter we can work with.
    let per_second = rate.cycles_per_second().get();
    assert!(per_second > 1_000_000, "rate too low: {rate}");
    assert!(per_second < 100_000_000_000, "rate too high: {rate}");
}

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot use the real operating system APIs.
fn detailed_output_writes_start_and_close_lines() {
    let (session, buffer) = session_with_buffer();
    let _keep_alive = session.registry("");

    let mut registry = session.registry_builder().detailed_output(true).build();
    registry.start("traced");
    registry.log("traced");

    let lines = buffer.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].trim_start().ends_with("traced"));
    assert!(lines[1].contains("traced # ms/ms(cycles)/Mcycles: "));
}
