use std::fmt::{self, Display};
use std::str::FromStr;

use crate::Error;

/// How many workers a spawner should start.
///
/// Parsed from external input as a base 10 integer with an optional leading `+`. Negative
/// numbers, whitespace and other decoration are rejected.
///
/// # Example
///
/// ```
/// use limit_probes::WorkerCount;
///
/// let count: WorkerCount = "3".parse().unwrap();
/// assert_eq!(count.get(), 3);
///
/// assert!("abc".parse::<WorkerCount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct WorkerCount(usize);

impl WorkerCount {
    /// Creates a worker count from a known value.
    #[must_use]
    pub const fn new(count: usize) -> Self {
        Self(count)
    }

    /// The number of workers.
    #[must_use]
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Parses the worker count from an optional external argument, treating absence as an error.
    pub fn from_argument(argument: Option<&str>) -> crate::Result<Self> {
        argument
            .ok_or_else(|| Error::invalid_argument("", "the worker count argument is missing"))?
            .parse()
    }
}

impl FromStr for WorkerCount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::invalid_argument(s, "the worker count is empty"));
        }

        let digits = s.strip_prefix('+').unwrap_or(s);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid_argument(
                s,
                "the worker count must be a non-negative base 10 integer",
            ));
        }

        digits.parse::<usize>().map(Self).map_err(|e| {
            Error::invalid_argument(s, format!("the worker count is out of range: {e}"))
        })
    }
}

impl Display for WorkerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<usize> for WorkerCount {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn assert_invalid(input: &str) {
        match input.parse::<WorkerCount>() {
            Err(Error::InvalidArgument { invalid_value, .. }) => assert_eq!(invalid_value, input),
            other => panic!("expected InvalidArgument for '{input}', got {other:?}"),
        }
    }

    #[test]
    fn parses_plain_integers() {
        assert_eq!("0".parse::<WorkerCount>().unwrap().get(), 0);
        assert_eq!("3".parse::<WorkerCount>().unwrap().get(), 3);
        assert_eq!("0042".parse::<WorkerCount>().unwrap().get(), 42);
    }

    #[test]
    fn accepts_leading_plus() {
        assert_eq!("+3".parse::<WorkerCount>().unwrap().get(), 3);
        assert_eq!("+0".parse::<WorkerCount>().unwrap().get(), 0);
    }

    #[test]
    fn rejects_everything_else() {
        assert_invalid("");
        assert_invalid("abc");
        assert_invalid("-1");
        assert_invalid("+");
        assert_invalid("++1");
        assert_invalid("+-1");
        assert_invalid(" 1");
        assert_invalid("1.5");
        assert_invalid("0x10");
    }

    #[test]
    fn rejects_overflow() {
        assert_invalid("99999999999999999999999999");
    }

    #[test]
    fn missing_argument_is_invalid() {
        let error = WorkerCount::from_argument(None).unwrap_err();

        assert!(matches!(error, Error::InvalidArgument { .. }));
        assert!(error.to_string().contains("missing"));
    }

    #[test]
    fn present_argument_is_parsed() {
        assert_eq!(WorkerCount::from_argument(Some("7")).unwrap(), WorkerCount::new(7));
    }

    #[test]
    fn displays_as_number() {
        assert_eq!(WorkerCount::new(12).to_string(), "12");
    }
}
