//! Structured logging emitted by the allocators and collections
//!
//! Each test installs a thread-local `tracing_subscriber::fmt` subscriber that
//! writes into a shared buffer, drives one logged path and checks the output.

#![cfg(feature = "logging")]

use std::io;
use std::sync::{Arc, Mutex};

use memkit::allocator::{Allocator, Arena, FixedArena};
use memkit::collections::AllocString;
use memkit::core::{ArenaConfig, Resettable};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn logs_of(f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let _guard = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("memkit=trace"))
        .with_writer(move || writer.clone())
        .without_time()
        .finish()
        .set_default();

    f();
    captured.text()
}

#[test]
fn test_arena_logs_region_append_and_destroy() {
    let logs = logs_of(|| {
        let mut arena = Arena::with_config(ArenaConfig::new().with_region_words(4)).unwrap();
        arena.allocate(64).unwrap();
        arena.destroy();
    });

    assert!(logs.contains("appending arena region"), "{logs}");
    assert!(logs.contains("requested=8"), "{logs}");
    assert!(logs.contains("destroying arena"), "{logs}");
}

#[test]
fn test_fixed_reset_is_logged() {
    let logs = logs_of(|| {
        let mut fixed = FixedArena::new(16).unwrap();
        fixed.allocate(3 * memkit::utils::WORD_SIZE).unwrap();
        fixed.reset();
    });

    assert!(logs.contains("resetting fixed arena"), "{logs}");
    assert!(logs.contains("used_words=3"), "{logs}");
}

#[test]
fn test_sentinel_fallback_logs_failure_once() {
    let logs = logs_of(|| {
        let fixed = FixedArena::new(1).unwrap();
        let s = AllocString::new(&fixed, "does not fit in one word");
        assert!(s.is_null());
    });

    assert_eq!(logs.matches("arena exhausted").count(), 1, "{logs}");
    assert!(logs.contains("returning empty string sentinel"), "{logs}");
    assert!(logs.contains("MEM:ARENA:EXHAUSTED"), "{logs}");
}
