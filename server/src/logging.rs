use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    init_config, Config,
};

/// The pattern to use when logging
const LOGGING_PATTERN: &str = "[{d} {h({l})} {M}] {m}{n}";
/// The modules to enable logging for
const LOGGING_MODULES: [&str; 2] = ["memory_ranking_server", "ntex"];

/// Sets up console logging for this crate and the web framework.
/// Logging setup failures are reported on stderr and otherwise ignored.
pub fn setup(level: LevelFilter) {
    if level == LevelFilter::Off {
        return;
    }

    let pattern = Box::new(PatternEncoder::new(LOGGING_PATTERN));
    let stdout_appender = ConsoleAppender::builder().encoder(pattern).build();

    let mut builder = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)));
    for module in LOGGING_MODULES {
        builder = builder.logger(
            Logger::builder()
                .appender("stdout")
                .additive(false)
                .build(module, level),
        );
    }

    let config = match builder.build(Root::builder().appender("stdout").build(LevelFilter::Warn)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to build logging config: {}", err);
            return;
        }
    };

    if let Err(err) = init_config(config) {
        eprintln!("Failed to initialize logging: {}", err);
    }
}
