//! Startup and shutdown shared by the lesson binaries

use lesson_engine::core::LessonConfig;
use lesson_engine::foundation::logging;
use lesson_engine::LessonError;
use std::io::{self, Write};
use std::process::ExitCode;

/// Print panics with their location before the process dies
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred: {:?}", panic_info);

        if let Some(location) = panic_info.location() {
            eprintln!("Panic location: {}:{}:{}", location.file(), location.line(), location.column());
        }

        if let Some(payload) = panic_info.payload().downcast_ref::<&str>() {
            eprintln!("Panic message: {}", payload);
        } else if let Some(payload) = panic_info.payload().downcast_ref::<String>() {
            eprintln!("Panic message: {}", payload);
        }
    }));
}

/// Run one lesson and turn its outcome into the process exit status
///
/// The first command-line argument, when present, names a `.toml` or `.ron` config
/// file whose keys override `defaults`. Failures are reported on stdout as
/// `"{label} error: {message}"`.
pub fn run<T>(
    defaults: fn() -> LessonConfig,
    lesson: impl FnOnce(&LessonConfig, &mut dyn Write) -> Result<T, LessonError>,
) -> ExitCode {
    logging::init();
    install_panic_hook();

    let mut stdout = io::stdout().lock();
    let outcome = LessonConfig::from_args_or(std::env::args(), defaults)
        .map_err(LessonError::from)
        .and_then(|config| {
            log::info!("Starting \"{}\"", config.window.title);
            lesson(&config, &mut stdout)
        });

    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            error.report(&mut stdout);
            ExitCode::from(&error)
        }
    }
}
