//! The National Schools Partnership architectures.
//!
//! Each architecture is an independent, literal description. They overlap but
//! are deliberately not reconciled with one another.

mod current;
mod planned;
mod resilient;

pub use current::current;
pub use planned::planned;
pub use resilient::resilient;

use std::{fmt, str::FromStr};

use cloudsketch_core::{GraphError, diagram::Diagram};

/// A built-in architecture diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// What runs today.
    Current,
    /// The target VPC layout.
    Planned,
    /// The target layout spread over two availability zones.
    Resilient,
}

impl Architecture {
    pub const ALL: [Architecture; 3] = [Self::Current, Self::Planned, Self::Resilient];

    pub fn name(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Planned => "planned",
            Self::Resilient => "resilient",
        }
    }

    /// Declares the architecture's diagram.
    pub fn build(self) -> Result<Diagram, GraphError> {
        match self {
            Self::Current => current(),
            Self::Planned => planned(),
            Self::Resilient => resilient(),
        }
    }
}

impl FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|architecture| architecture.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown architecture `{s}`"))
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("current".parse(), Ok(Architecture::Current));
        assert_eq!("Planned".parse(), Ok(Architecture::Planned));
        assert_eq!("RESILIENT".parse(), Ok(Architecture::Resilient));
        assert!("legacy".parse::<Architecture>().is_err());
    }

    #[test]
    fn test_every_architecture_builds() {
        for architecture in Architecture::ALL {
            let diagram = architecture.build().unwrap();
            assert!(diagram.validate().is_ok(), "{architecture} should validate");
        }
    }
}
