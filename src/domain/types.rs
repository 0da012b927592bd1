use std::{fmt, str::FromStr};

use super::error::DomainError;

/// Mutation requested through the form-driven action endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoAction {
    Put,
    Delete,
}

impl TodoAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoAction::Put => "put",
            TodoAction::Delete => "delete",
        }
    }

    /// Parse the `method` form field. Matching is exact: `PUT` is rejected.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "put" => Ok(TodoAction::Put),
            "delete" => Ok(TodoAction::Delete),
            other => Err(DomainError::validation(format!(
                "unsupported action method `{other}`"
            ))),
        }
    }
}

impl fmt::Display for TodoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the store numbers newly created records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// `current length + 1`; ids can repeat after deletions.
    #[default]
    Length,
    /// One past the highest id ever issued; never reused within a process.
    Monotonic,
}

impl IdStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdStrategy::Length => "length",
            IdStrategy::Monotonic => "monotonic",
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdStrategy {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "length" => Ok(IdStrategy::Length),
            "monotonic" => Ok(IdStrategy::Monotonic),
            other => Err(DomainError::validation(format!(
                "unknown id strategy `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_parsing_is_exact() {
        assert_eq!(TodoAction::parse("put").unwrap(), TodoAction::Put);
        assert_eq!(TodoAction::parse("delete").unwrap(), TodoAction::Delete);
        assert!(TodoAction::parse("PUT").is_err());
        assert!(TodoAction::parse("patch").is_err());
        assert!(TodoAction::parse("").is_err());
        assert_eq!(TodoAction::Delete.to_string(), "delete");
    }

    #[test]
    fn id_strategy_parses_known_names() {
        assert_eq!("length".parse::<IdStrategy>().unwrap(), IdStrategy::Length);
        assert_eq!(
            " Monotonic ".parse::<IdStrategy>().unwrap(),
            IdStrategy::Monotonic
        );
        assert!("random".parse::<IdStrategy>().is_err());
        assert_eq!(IdStrategy::default(), IdStrategy::Length);
    }
}
