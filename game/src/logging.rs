use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    init_config, Config,
};

const LOGGING_PATTERN: &str = "[{d} {h({l})} {M}] {m}{n}";

/// Sends log output to stderr so it stays apart from the game screen
pub fn setup(level: LevelFilter) {
    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .build(Root::builder().appender("stderr").build(level));

    match config {
        Ok(config) => {
            if let Err(err) = init_config(config) {
                eprintln!("Failed to initialize logging: {}", err);
            }
        }
        Err(err) => eprintln!("Failed to build logging config: {}", err),
    }
}
