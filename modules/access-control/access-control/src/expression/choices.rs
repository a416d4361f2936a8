//! Multi-candidate argument slots.

use access_control_sdk::{AccessError, MIXED, Value};

/// Candidate values for one logical argument, resolved once the consuming
/// parameter type is known.
///
/// A request may yield several subjects (one per identity provider, for
/// example) while the called method only takes one: the parameter type
/// picks which.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentChoices {
    candidates: Vec<Value>,
}

impl ArgumentChoices {
    #[must_use]
    pub fn new(candidates: Vec<Value>) -> Self {
        Self { candidates }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[must_use]
    pub fn candidates(&self) -> &[Value] {
        &self.candidates
    }

    /// First candidate assignable to the first satisfiable type, in the
    /// order types are requested.
    ///
    /// An empty type list, or a `mixed` entry reached before any match,
    /// selects the first candidate.
    ///
    /// # Errors
    ///
    /// `Runtime` when no candidate matches any requested type.
    pub fn find(&self, types: &[String]) -> Result<Value, AccessError> {
        let first = self.candidates.first();
        if types.is_empty()
            && let Some(first) = first
        {
            return Ok(first.clone());
        }

        for requested in types {
            if requested == MIXED
                && let Some(first) = first
            {
                return Ok(first.clone());
            }
            if let Some(found) = self
                .candidates
                .iter()
                .find(|candidate| candidate.is_instance_of(requested))
            {
                return Ok(found.clone());
            }
        }

        Err(AccessError::runtime(format!(
            "Could not find value for given types '{}'",
            types.join(", ")
        )))
    }
}

impl From<Vec<Value>> for ArgumentChoices {
    fn from(candidates: Vec<Value>) -> Self {
        Self::new(candidates)
    }
}
