use std::fmt;

use log::LevelFilter;

/// Log verbosity as written in config files (`0` = none .. `6` = verbose).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    None = 0,
    Fatal = 1,
    Error = 2,
    Warning = 3,
    Info = 4,
    Debug = 5,
    Verbose = 6,
}

impl Verbosity {
    pub const fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::None => LevelFilter::Off,
            // `log` has no separate fatal level.
            Verbosity::Fatal | Verbosity::Error => LevelFilter::Error,
            Verbosity::Warning => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Verbose => LevelFilter::Trace,
        }
    }
}

impl TryFrom<i64> for Verbosity {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, i64> {
        Ok(match value {
            0 => Verbosity::None,
            1 => Verbosity::Fatal,
            2 => Verbosity::Error,
            3 => Verbosity::Warning,
            4 => Verbosity::Info,
            5 => Verbosity::Debug,
            6 => Verbosity::Verbose,
            other => return Err(other),
        })
    }
}

impl From<Verbosity> for LevelFilter {
    fn from(v: Verbosity) -> Self {
        v.level_filter()
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_range() {
        assert_eq!(Verbosity::try_from(0), Ok(Verbosity::None));
        assert_eq!(Verbosity::try_from(6), Ok(Verbosity::Verbose));
        assert_eq!(Verbosity::try_from(7), Err(7));
        assert_eq!(Verbosity::try_from(-1), Err(-1));
    }

    #[test]
    fn level_mapping() {
        assert_eq!(Verbosity::None.level_filter(), LevelFilter::Off);
        assert_eq!(Verbosity::Fatal.level_filter(), LevelFilter::Error);
        assert_eq!(Verbosity::Warning.level_filter(), LevelFilter::Warn);
        assert_eq!(LevelFilter::from(Verbosity::Verbose), LevelFilter::Trace);
    }
}
