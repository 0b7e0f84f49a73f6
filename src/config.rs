use std::sync::OnceLock;

use crate::logging::init_log;

pub struct Config {
    pub log_config: LogConfig,
    /// Size of the rayon pool the diff engine runs field tasks on, 0 for
    /// rayon's default.
    pub threads: usize,
}

pub enum LogConfig {
    /// `-v` count from the command line.
    Verbose(u8),
    NoLog,
}

static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn init_config(config: Config) {
    CONFIG.set(config).unwrap_or_else(|_| {
        panic!("cannot init config again after init");
    });
    let config = get_config();
    init_log(&config.log_config);
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build_global()
    {
        log::warn!("cannot size the global thread pool: {}", e);
    }
}

pub fn get_config() -> &'static Config {
    CONFIG.get().expect("cannot get config before init")
}
