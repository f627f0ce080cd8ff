use crate::orders::error::OrderError;
use crate::orders::OrderStatus;

/// Order status state machine.
///
/// Valid transitions:
/// - pending → preparing, cancelled
/// - preparing → served, cancelled
/// - served → paid
/// - paid, cancelled → terminal
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (OrderStatus::Pending, OrderStatus::Preparing)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Preparing, OrderStatus::Served)
                | (OrderStatus::Preparing, OrderStatus::Cancelled)
                | (OrderStatus::Served, OrderStatus::Paid)
        )
    }

    /// Attempt to transition from one status to another
    pub fn transition(from: OrderStatus, to: OrderStatus) -> Result<OrderStatus, OrderError> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(OrderError::InvalidTransition { from, to })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Served,
        OrderStatus::Paid,
        OrderStatus::Cancelled,
    ];

    const VALID_TRANSITIONS: [(OrderStatus, OrderStatus); 5] = [
        (OrderStatus::Pending, OrderStatus::Preparing),
        (OrderStatus::Pending, OrderStatus::Cancelled),
        (OrderStatus::Preparing, OrderStatus::Served),
        (OrderStatus::Preparing, OrderStatus::Cancelled),
        (OrderStatus::Served, OrderStatus::Paid),
    ];

    #[test]
    fn test_all_listed_transitions_succeed() {
        for (from, to) in VALID_TRANSITIONS {
            assert_eq!(StatusMachine::transition(from, to).unwrap(), to);
        }
    }

    /// Every (from, to) pair outside the table is rejected.
    #[test]
    fn test_transition_table_closure() {
        for from in ALL_STATUSES {
            for to in ALL_STATUSES {
                let listed = VALID_TRANSITIONS.contains(&(from, to));
                assert_eq!(
                    StatusMachine::is_valid_transition(from, to),
                    listed,
                    "transition {} -> {} disagreement with table",
                    from,
                    to
                );
                if !listed {
                    let err = StatusMachine::transition(from, to).unwrap_err();
                    match err {
                        OrderError::InvalidTransition { from: f, to: t } => {
                            assert_eq!(f, from);
                            assert_eq!(t, to);
                        }
                        other => panic!("expected InvalidTransition, got {:?}", other),
                    }
                }
            }
        }
    }

    #[test]
    fn test_cancelled_only_from_pending_or_preparing() {
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Cancelled
        ));
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Preparing,
            OrderStatus::Cancelled
        ));
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Served,
            OrderStatus::Cancelled
        ));
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Paid,
            OrderStatus::Cancelled
        ));
    }

    #[test]
    fn test_paid_order_cannot_move_back_to_preparing() {
        let result = StatusMachine::transition(OrderStatus::Paid, OrderStatus::Preparing);
        assert!(matches!(
            result,
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Paid,
                to: OrderStatus::Preparing,
            })
        ));
    }

    #[test]
    fn test_same_status_is_not_a_transition() {
        for status in ALL_STATUSES {
            assert!(!StatusMachine::is_valid_transition(status, status));
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn order_status_strategy() -> impl Strategy<Value = OrderStatus> {
        prop_oneof![
            Just(OrderStatus::Pending),
            Just(OrderStatus::Preparing),
            Just(OrderStatus::Served),
            Just(OrderStatus::Paid),
            Just(OrderStatus::Cancelled),
        ]
    }

    /// Terminal states admit no outgoing transitions.
    #[test]
    fn prop_terminal_states_are_terminal() {
        proptest!(|(to in order_status_strategy())| {
            prop_assert!(!StatusMachine::is_valid_transition(OrderStatus::Paid, to));
            prop_assert!(!StatusMachine::is_valid_transition(OrderStatus::Cancelled, to));
        });
    }

    /// transition() and is_valid_transition() always agree.
    #[test]
    fn prop_transition_consistency() {
        proptest!(|(
            from in order_status_strategy(),
            to in order_status_strategy()
        )| {
            let is_valid = StatusMachine::is_valid_transition(from, to);
            let result = StatusMachine::transition(from, to);

            if is_valid {
                prop_assert_eq!(result.unwrap(), to);
            } else {
                prop_assert!(result.is_err());
            }
        });
    }
}
