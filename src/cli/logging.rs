use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Set the log level for the application
pub fn set_log_level(level: LevelFilter) {
    log::set_max_level(level);
}

/// Initialize logging with the specified level.
///
/// The backend accepts everything down to debug so `set_log_level` can raise
/// the level later; the global filter starts at the requested one.
pub fn init_logging(debug: bool) -> LevelFilter {
    let log_level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Err(e) = SimpleLogger::new()
        .with_level(LevelFilter::Debug)
        .with_module_level("notify", LevelFilter::Warn)
        .init()
    {
        eprintln!("Failed to initialize logging: {}", e);
    }
    set_log_level(log_level);

    log_level
}

/// Configure backtrace if trace is enabled
pub fn configure_backtrace(trace: bool) {
    if trace {
        std::env::set_var("RUST_BACKTRACE", "1");
    }
}
