//! Tunables read once from environment variables.
//!
//! They are not worth a command line flag but may be adjusted when
//! experimenting, e.g. `COLORING_CLIQUE_NODE_LIMIT=2000 mzn-coloring gc_1000`.

use std::str::FromStr;
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Graphs with more nodes than this skip the clique lower bound.
pub static CLIQUE_NODE_LIMIT: EnvParam<usize> =
    EnvParam::new("COLORING_CLIQUE_NODE_LIMIT", "500");

/// Delay between two checks of a running solver process, in milliseconds.
pub static POLL_INTERVAL_MS: EnvParam<u64> =
    EnvParam::new("COLORING_POLL_INTERVAL_MS", "10");

/// Return the polling delay for the solver process.
pub fn poll_interval() -> Duration {
    Duration::from_millis(POLL_INTERVAL_MS.get().max(1))
}

/// A parameter initialized from the environment variable `env` on first
/// access, or from `default` if the variable is absent or unparsable.
pub struct EnvParam<T> {
    value: OnceCell<T>,
    env: &'static str,
    default: &'static str,
}

impl<T> EnvParam<T> {
    pub const fn new(env: &'static str, default: &'static str) -> Self {
        Self {
            value: OnceCell::new(),
            env,
            default,
        }
    }

    /// Name of the environment variable backing this parameter.
    pub fn env(&self) -> &'static str {
        self.env
    }
}

impl<T: FromStr> EnvParam<T> {
    fn parse_default(&self) -> T {
        match T::from_str(self.default) {
            Ok(value) => value,
            Err(_) => panic!(
                "{}: invalid default value \"{}\"",
                self.env, self.default
            ),
        }
    }

    fn read(&self) -> T {
        match std::env::var(self.env) {
            Ok(raw) => T::from_str(&raw).unwrap_or_else(|_| {
                tracing::warn!(
                    "could not parse {}=\"{}\", using default \"{}\"",
                    self.env,
                    raw,
                    self.default
                );
                self.parse_default()
            }),
            Err(std::env::VarError::NotPresent) => self.parse_default(),
            Err(err) => {
                tracing::warn!("{}: {err}, using default", self.env);
                self.parse_default()
            }
        }
    }

    /// Return the value of the parameter, reading the environment on the
    /// first call.
    ///
    /// # Panic
    /// Panics if the default value cannot be parsed.
    pub fn get(&self) -> T
    where
        T: Copy,
    {
        *self.value.get_or_init(|| self.read())
    }

    /// Force the value of the parameter.
    ///
    /// # Panic
    /// Panics if the parameter was already initialized, e.g. by a call to
    /// [EnvParam::get].
    pub fn set(&self, value: T) {
        if self.value.set(value).is_err() {
            panic!("parameter {} is already initialized", self.env);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_value() {
        static PARAM: EnvParam<u32> =
            EnvParam::new("COLORING_TEST_UNSET_PARAM", "42");
        assert_eq!(PARAM.get(), 42);
        assert_eq!(PARAM.get(), 42);
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn set_after_get() {
        static PARAM: EnvParam<u32> =
            EnvParam::new("COLORING_TEST_READ_PARAM", "42");
        assert_eq!(PARAM.get(), 42);
        PARAM.set(3);
    }

    #[test]
    fn forced_value() {
        static PARAM: EnvParam<u64> =
            EnvParam::new("COLORING_TEST_FORCED_PARAM", "1");
        PARAM.set(7);
        assert_eq!(PARAM.get(), 7);
        assert_eq!(PARAM.env(), "COLORING_TEST_FORCED_PARAM");
    }

    #[test]
    fn builtin_defaults_parse() {
        assert!(CLIQUE_NODE_LIMIT.parse_default() > 0);
        assert!(POLL_INTERVAL_MS.parse_default() > 0);
    }
}
