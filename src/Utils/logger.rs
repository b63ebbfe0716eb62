use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;

/// Installs the global logger: terminal output, plus a log file when `file` is given.
///
/// A second call fails with `SetLoggerError` and leaves the first logger in place, so
/// callers that may run twice (tests, repeated examples) can ignore the error.
pub fn init_logger(
    level: LevelFilter,
    file: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = file {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::info;
    use tempfile::NamedTempFile;

    #[test]
    fn second_init_is_rejected_but_harmless() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let first = init_logger(LevelFilter::Info, Some(&path));
        let second = init_logger(LevelFilter::Info, None);
        // other tests may have installed a logger already
        assert!(first.is_err() || second.is_err());
        info!("logger test line");
    }
}
