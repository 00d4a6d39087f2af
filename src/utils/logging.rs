use log::{info, LevelFilter, SetLoggerError};
use simple_logger::SimpleLogger;

/// Installs the process logger. Fails if a logger is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    SimpleLogger::new().with_level(level).init()?;
    info!("Logger initialized at {}", level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Another test may already have installed a logger; either way the
        // second call in this test must report the conflict.
        let _ = init(LevelFilter::Warn);
        assert!(init(LevelFilter::Warn).is_err());
    }
}
