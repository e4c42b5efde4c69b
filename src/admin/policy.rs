//! Which admin status changes are accepted.

use crate::model::OrderStatus;
use std::fmt::Display;
use std::str::FromStr;

/// Admin-side check applied before a status update is sent.
///
/// `Permissive` lets any status be set from any other and only logs changes that
/// leave the nominal progression. `Guarded` rejects them locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    #[default]
    Permissive,
    Guarded,
}

impl TransitionPolicy {
    /// Whether `from -> to` may be sent to the backend.
    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Guarded => from.can_transition_to(to),
        }
    }
}

impl Display for TransitionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionPolicy::Permissive => f.write_str("permissive"),
            TransitionPolicy::Guarded => f.write_str("guarded"),
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "guarded" => Ok(TransitionPolicy::Guarded),
            other => Err(format!("Unknown transition policy: {other} (expected permissive or guarded)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn permissive_allows_everything() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert!(TransitionPolicy::Permissive.allows(from, to));
            }
        }
    }

    #[test]
    fn guarded_follows_progression() {
        let guarded = TransitionPolicy::Guarded;
        assert!(guarded.allows(Pending, Processing));
        assert!(guarded.allows(Shipped, Delivered));
        assert!(guarded.allows(Processing, Cancelled));
        assert!(!guarded.allows(Delivered, Pending));
        assert!(!guarded.allows(Cancelled, Processing));
        assert!(!guarded.allows(Pending, Delivered));
    }

    #[test]
    fn parses_both_spellings() {
        assert_eq!("Guarded".parse::<TransitionPolicy>().unwrap(), TransitionPolicy::Guarded);
        assert_eq!(" permissive ".parse::<TransitionPolicy>().unwrap(), TransitionPolicy::Permissive);
        assert!("strict".parse::<TransitionPolicy>().is_err());
    }
}
