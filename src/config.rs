use lazy_static::lazy_static;
use log::debug;

/// Environment variable overriding the parallel threshold, in cells.
pub const PARALLEL_THRESHOLD_ENV: &str = "UNITMATRIX_PARALLEL_THRESHOLD";

const DEFAULT_CELLS_PER_CPU: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Dense cell loops over at least this many cells run on the rayon pool.
    pub parallel_threshold: usize,
}

impl Config {
    fn from_env() -> Config {
        let parallel_threshold = match std::env::var(PARALLEL_THRESHOLD_ENV) {
            Ok(v) => match v.trim().parse::<usize>() {
                Ok(n) => n,
                Err(_) => {
                    debug!("ignoring unparsable {}={:?}", PARALLEL_THRESHOLD_ENV, v);
                    default_threshold(num_cpus::get())
                }
            },
            Err(_) => default_threshold(num_cpus::get()),
        };
        debug!("parallel threshold resolved to {} cells", parallel_threshold);
        Config { parallel_threshold }
    }
}

fn default_threshold(cpus: usize) -> usize {
    if cpus <= 1 {
        usize::MAX
    } else {
        DEFAULT_CELLS_PER_CPU * cpus
    }
}

lazy_static! {
    static ref CONFIG: Config = Config::from_env();
}

pub fn config() -> &'static Config {
    &CONFIG
}

#[inline]
pub(crate) fn use_parallel(cells: usize) -> bool {
    cells >= config().parallel_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(default_threshold(1), usize::MAX);
        assert_eq!(default_threshold(0), usize::MAX);
        assert_eq!(default_threshold(8), 8 * DEFAULT_CELLS_PER_CPU);
    }

    #[test]
    fn test_config_resolves_once() {
        let a = config() as *const Config;
        let b = config() as *const Config;
        assert_eq!(a, b);
        assert!(config().parallel_threshold > 0);
    }
}
