//! Order State Machine Service
//!
//! Validates explicit status transitions.

use crate::domain::order_execution::errors::OrderError;
use crate::domain::order_execution::value_objects::OrderStatus;

/// Order State Machine for validating transitions.
///
/// ```text
/// Pending --fill--> Partial --fill--> Filled
///    |                 |
///    +----cancel-------+----------> Cancelled
/// ```
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Check if a state transition is valid.
    #[must_use]
    pub const fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (
                OrderStatus::Pending,
                OrderStatus::Partial | OrderStatus::Filled | OrderStatus::Cancelled
            ) | (
                OrderStatus::Partial,
                OrderStatus::Partial | OrderStatus::Filled | OrderStatus::Cancelled
            )
        )
    }

    /// Validate a state transition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the transition is not allowed.
    pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(OrderError::InvalidStateTransition {
                from,
                to,
                reason: Self::transition_error_reason(from, to),
            })
        }
    }

    /// Get a human-readable reason for an invalid transition.
    #[must_use]
    pub fn transition_error_reason(from: OrderStatus, to: OrderStatus) -> String {
        match from {
            OrderStatus::Filled => format!("order is already filled, cannot transition to {to}"),
            OrderStatus::Cancelled => format!("order is cancelled, cannot transition to {to}"),
            _ => format!("invalid transition from {from} to {to}"),
        }
    }

    /// Get all valid next states from a given state.
    #[must_use]
    pub fn valid_next_states(from: OrderStatus) -> Vec<OrderStatus> {
        match from {
            OrderStatus::Pending | OrderStatus::Partial => vec![
                OrderStatus::Partial,
                OrderStatus::Filled,
                OrderStatus::Cancelled,
            ],
            OrderStatus::Filled | OrderStatus::Cancelled => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(OrderStatus::Pending, OrderStatus::Partial ; "pending to partial")]
    #[test_case(OrderStatus::Pending, OrderStatus::Filled ; "pending to filled")]
    #[test_case(OrderStatus::Pending, OrderStatus::Cancelled ; "pending to cancelled")]
    #[test_case(OrderStatus::Partial, OrderStatus::Partial ; "partial to partial")]
    #[test_case(OrderStatus::Partial, OrderStatus::Filled ; "partial to filled")]
    #[test_case(OrderStatus::Partial, OrderStatus::Cancelled ; "partial to cancelled")]
    fn valid_transitions(from: OrderStatus, to: OrderStatus) {
        assert!(OrderStateMachine::is_valid_transition(from, to));
        assert!(OrderStateMachine::validate_transition(from, to).is_ok());
    }

    #[test_case(OrderStatus::Pending, OrderStatus::Pending ; "pending to pending")]
    #[test_case(OrderStatus::Partial, OrderStatus::Pending ; "partial back to pending")]
    #[test_case(OrderStatus::Filled, OrderStatus::Cancelled ; "filled to cancelled")]
    #[test_case(OrderStatus::Cancelled, OrderStatus::Filled ; "cancelled to filled")]
    #[test_case(OrderStatus::Filled, OrderStatus::Partial ; "filled to partial")]
    fn invalid_transitions(from: OrderStatus, to: OrderStatus) {
        assert!(!OrderStateMachine::is_valid_transition(from, to));
        let err = OrderStateMachine::validate_transition(from, to).unwrap_err();
        assert!(matches!(err, OrderError::InvalidStateTransition { .. }));
    }

    #[test]
    fn no_transitions_from_terminal_states() {
        for terminal in [OrderStatus::Filled, OrderStatus::Cancelled] {
            assert!(OrderStateMachine::valid_next_states(terminal).is_empty());
        }
    }

    #[test]
    fn transition_error_reason_mentions_terminal_state() {
        let reason =
            OrderStateMachine::transition_error_reason(OrderStatus::Filled, OrderStatus::Pending);
        assert!(reason.contains("already filled"));
    }
}
