//! # Control Vocabulary
//!
//! The closed sets of operating states and action labels shared between the
//! action controller and the policy oracle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The manipulator's operating state.
///
/// Exactly one state is active at any time. Mutated only by the action
/// controller's transition step.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum ArmState {
    Waiting,
    Grasping,
    Rotating,
    Releasing,
    RotatingBack,
}

/// An action the policy oracle can request.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum ActionLabel {
    Wait,
    Grasp,
    Rotate,
    Release,
    RotateBack,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Default for ArmState {
    fn default() -> Self {
        ArmState::Waiting
    }
}

impl ActionLabel {
    /// Parse a raw oracle response into an action label.
    ///
    /// Oracle responses are free text, so the match is case-insensitive and
    /// whitespace is trimmed. Anything outside the closed label set yields
    /// `None`, which callers must collapse to [`ActionLabel::Wait`].
    pub fn from_oracle(response: &str) -> Option<Self> {
        match response.trim().to_uppercase().as_str() {
            "WAIT" => Some(ActionLabel::Wait),
            "GRASP" => Some(ActionLabel::Grasp),
            "ROTATE" => Some(ActionLabel::Rotate),
            "RELEASE" => Some(ActionLabel::Release),
            "ROTATE_BACK" => Some(ActionLabel::RotateBack),
            _ => None,
        }
    }

    /// The canonical wire form of this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionLabel::Wait => "WAIT",
            ActionLabel::Grasp => "GRASP",
            ActionLabel::Rotate => "ROTATE",
            ActionLabel::Release => "RELEASE",
            ActionLabel::RotateBack => "ROTATE_BACK",
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_oracle() {
        assert_eq!(ActionLabel::from_oracle("GRASP"), Some(ActionLabel::Grasp));
        assert_eq!(
            ActionLabel::from_oracle("  rotate_back \n"),
            Some(ActionLabel::RotateBack)
        );
        assert_eq!(ActionLabel::from_oracle("Wait"), Some(ActionLabel::Wait));

        // Anything outside the closed set is rejected, not guessed at
        assert_eq!(ActionLabel::from_oracle("GRASP IT NOW"), None);
        assert_eq!(ActionLabel::from_oracle(""), None);
        assert_eq!(ActionLabel::from_oracle("ROTATE."), None);
    }

    #[test]
    fn test_round_trip() {
        for label in [
            ActionLabel::Wait,
            ActionLabel::Grasp,
            ActionLabel::Rotate,
            ActionLabel::Release,
            ActionLabel::RotateBack,
        ]
        .iter()
        {
            assert_eq!(ActionLabel::from_oracle(label.as_str()), Some(*label));
        }
    }
}
