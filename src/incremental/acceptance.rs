use std::fmt::Display;

/// Three-valued classification of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Acceptance {
    True,
    False,
    #[default]
    DontKnow,
}

impl Acceptance {
    pub fn from_bool(accepting: bool) -> Self {
        if accepting {
            Acceptance::True
        } else {
            Acceptance::False
        }
    }

    /// Returns the definite value, or [None] for [Acceptance::DontKnow].
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Acceptance::True => Some(true),
            Acceptance::False => Some(false),
            Acceptance::DontKnow => None,
        }
    }

    pub fn is_definite(self) -> bool {
        self != Acceptance::DontKnow
    }

    /// A definite value conflicts with the opposite boolean. [Acceptance::DontKnow]
    /// never conflicts.
    pub fn conflicts(self, accepting: bool) -> bool {
        self.to_bool().is_some_and(|value| value != accepting)
    }
}

impl From<bool> for Acceptance {
    fn from(value: bool) -> Self {
        Acceptance::from_bool(value)
    }
}

impl Display for Acceptance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Acceptance::True => write!(f, "true"),
            Acceptance::False => write!(f, "false"),
            Acceptance::DontKnow => write!(f, "?"),
        }
    }
}

#[test]
fn test_acceptance_conflicts() {
    assert!(Acceptance::True.conflicts(false));
    assert!(Acceptance::False.conflicts(true));
    assert!(!Acceptance::True.conflicts(true));
    assert!(!Acceptance::DontKnow.conflicts(true));
    assert!(!Acceptance::DontKnow.conflicts(false));
    assert_eq!(Acceptance::from(true), Acceptance::True);
    assert_eq!(Acceptance::default().to_bool(), None);
}
