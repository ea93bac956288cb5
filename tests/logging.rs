//! Chains emitted as `tracing` events.

use std::{
    io,
    sync::{Arc, Mutex},
};

use errtrail::{Chain, Code, Metadata, Registry};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
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

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture(level: Level, f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_max_level(level)
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    captured.contents()
}

#[test]
fn test_emit_carries_code_status_and_trace() {
    let registry = Registry::new().register(
        Code::new(310),
        Metadata::new("Try again later", "database unavailable").with_http_status(503),
    );
    let chain = Chain::coded(Code::new(310), "pool exhausted").wrap(Code::new(310), "query failed");

    let output = capture(Level::TRACE, || chain.emit_in(Level::WARN, &registry));

    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("database unavailable"), "{output}");
    assert!(output.contains("code=310"), "{output}");
    assert!(output.contains("http_status=503"), "{output}");
    assert!(output.contains("len=2"), "{output}");
    assert!(output.contains("query failed"), "{output}");
    assert!(output.contains("pool exhausted"), "{output}");
}

#[test]
fn test_emit_respects_the_level_filter() {
    let chain = Chain::new("noisy");
    let output = capture(Level::INFO, || {
        chain.emit(Level::DEBUG);
        chain.emit(Level::TRACE);
    });
    assert!(output.is_empty(), "{output}");

    let output = capture(Level::INFO, || chain.emit(Level::ERROR));
    assert!(output.contains("ERROR"), "{output}");
    assert!(output.contains("unknown error"), "{output}");
}

#[test]
fn test_registry_overwrites_are_logged() {
    let output = capture(Level::DEBUG, || {
        let _registry = Registry::new()
            .register(Code::new(300), Metadata::new("first", "first internal"))
            .register(Code::new(300), Metadata::new("second", "second internal"));
    });
    assert!(output.contains("replaced error code metadata"), "{output}");
    assert!(output.contains("code=300"), "{output}");
    assert!(output.contains("first internal"), "{output}");
}
