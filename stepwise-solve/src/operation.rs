use crate::error::SolveError;
use std::{fmt, str::FromStr};

/// The calculus operation to perform on an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Derivative,
    Integral,
    Limit,
    Series,
}

impl Operation {
    /// Returns the name of the operation, as accepted by [`Operation::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Derivative => "derivative",
            Self::Integral => "integral",
            Self::Limit => "limit",
            Self::Series => "series",
        }
    }
}

impl FromStr for Operation {
    type Err = SolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "derivative" => Ok(Self::Derivative),
            "integral" => Ok(Self::Integral),
            "limit" => Ok(Self::Limit),
            "series" => Ok(Self::Series),
            _ => Err(SolveError::InvalidOperation),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn names() {
        for op in [Operation::Derivative, Operation::Integral, Operation::Limit, Operation::Series] {
            assert_eq!(op.name().parse::<Operation>(), Ok(op));
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!("Derivative".parse::<Operation>(), Err(SolveError::InvalidOperation));
        assert_eq!("bogus-op".parse::<Operation>(), Err(SolveError::InvalidOperation));
        assert_eq!("".parse::<Operation>(), Err(SolveError::InvalidOperation));
    }
}
