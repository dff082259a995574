//! Logging utilities and the lesson error reporter

use std::fmt::Display;
use std::io::Write;

pub use log::{debug, info, warn, error, trace};
pub use log::LevelFilter;

/// Initialize the logging system with `Info` as the default level
pub fn init() {
    init_with_level(LevelFilter::Info);
}

/// Initialize the logging system with a default level that `RUST_LOG` overrides
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

/// Write `"{label} error: {error}"` plus a newline to `sink`.
///
/// The same text also goes to the `log` facade at error level. Failures to
/// write to `sink` are ignored: reporting never fails.
pub fn report_error(sink: &mut dyn Write, label: &str, error: &dyn Display) {
    log::error!("{} error: {}", label, error);
    let _ = writeln!(sink, "{} error: {}", label, error);
    let _ = sink.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_report_format() {
        let mut out = Vec::new();
        report_error(&mut out, "CreateWindow", &"no display available");
        assert_eq!(String::from_utf8(out).unwrap(), "CreateWindow error: no display available\n");
    }

    #[test]
    fn test_report_appends() {
        let mut out = b"earlier line\n".to_vec();
        report_error(&mut out, "LoadTexture", &"missing.png: not found");
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("LoadTexture error: missing.png: not found\n"));
    }

    #[test]
    fn test_report_to_broken_sink_does_not_panic() {
        report_error(&mut BrokenSink, "Init", &"whatever");
    }
}
