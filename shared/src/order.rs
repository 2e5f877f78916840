//! Order lifecycle state machine
//!
//! The status graph is acyclic:
//!
//! ```text
//! PENDING → CONFIRMED → READY_FOR_PICKUP → PICKED_UP → DELIVERING
//!     → DELIVERED → COMPLETED
//! ```
//!
//! `CANCELLED` is reachable from any state before `DELIVERED`. `COMPLETED`
//! and `CANCELLED` are terminal.
//!
//! Transition authority is self-describing in the order row: "who may move
//! the order forward" reduces to comparing the caller's identity against
//! the stored customer / store-owner / courier reference, so no per-order
//! permission table is needed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    ReadyForPickup,
    PickedUp,
    Delivering,
    Delivered,
    Completed,
    Cancelled,
}

/// Who is attempting a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionActor {
    /// Owner of the store the order belongs to
    StoreOwner,
    /// The courier currently assigned to the order
    Courier,
    /// The customer who placed the order
    Customer,
    /// The assignment service itself (courier claim)
    Assignment,
}

/// Why a transition was refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("invalid transition {from} -> {to}")]
    Invalid { from: OrderStatus, to: OrderStatus },

    #[error("actor is not allowed to perform {from} -> {to}")]
    NotAuthorized { from: OrderStatus, to: OrderStatus },
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::ReadyForPickup => "READY_FOR_PICKUP",
            Self::PickedUp => "PICKED_UP",
            Self::Delivering => "DELIVERING",
            Self::Delivered => "DELIVERED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Cancellation is allowed until the order is delivered
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            Self::Pending
                | Self::Confirmed
                | Self::ReadyForPickup
                | Self::PickedUp
                | Self::Delivering
        )
    }

    /// The single forward successor, if any
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::ReadyForPickup),
            Self::ReadyForPickup => Some(Self::PickedUp),
            Self::PickedUp => Some(Self::Delivering),
            Self::Delivering => Some(Self::Delivered),
            Self::Delivered => Some(Self::Completed),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Check that `self -> to` is a lifecycle edge and that `actor` holds
    /// the authority for it.
    ///
    /// The courier-claim edge (`READY_FOR_PICKUP -> PICKED_UP`) belongs
    /// exclusively to the assignment service; regular status-advance calls
    /// must not perform it.
    pub fn authorize(&self, to: OrderStatus, actor: TransitionActor) -> Result<(), TransitionError> {
        use OrderStatus::*;
        use TransitionActor::*;

        // Cancellation: store owner or customer, any pre-delivery state
        if to == Cancelled {
            if !self.is_cancellable() {
                return Err(TransitionError::Invalid { from: *self, to });
            }
            return match actor {
                StoreOwner | Customer => Ok(()),
                _ => Err(TransitionError::NotAuthorized { from: *self, to }),
            };
        }

        if self.next() != Some(to) {
            return Err(TransitionError::Invalid { from: *self, to });
        }

        let allowed = match (*self, to) {
            (Pending, Confirmed) => matches!(actor, StoreOwner),
            (Confirmed, ReadyForPickup) => matches!(actor, StoreOwner),
            (ReadyForPickup, PickedUp) => matches!(actor, Assignment),
            (PickedUp, Delivering) => matches!(actor, Courier),
            (Delivering, Delivered) => matches!(actor, Courier),
            (Delivered, Completed) => matches!(actor, Customer),
            _ => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(TransitionError::NotAuthorized { from: *self, to })
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;
    use TransitionActor::*;

    #[test]
    fn forward_chain_is_linear() {
        let chain = [
            Pending,
            Confirmed,
            ReadyForPickup,
            PickedUp,
            Delivering,
            Delivered,
            Completed,
        ];
        for pair in chain.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
        assert_eq!(Completed.next(), None);
        assert_eq!(Cancelled.next(), None);
    }

    #[test]
    fn store_owner_prepares_the_order() {
        assert!(Pending.authorize(Confirmed, StoreOwner).is_ok());
        assert!(Confirmed.authorize(ReadyForPickup, StoreOwner).is_ok());
        assert!(Pending.authorize(Confirmed, Courier).is_err());
        assert!(Confirmed.authorize(ReadyForPickup, Customer).is_err());
    }

    #[test]
    fn claim_edge_belongs_to_the_assignment_service() {
        assert!(ReadyForPickup.authorize(PickedUp, Assignment).is_ok());
        for actor in [StoreOwner, Courier, Customer] {
            assert_eq!(
                ReadyForPickup.authorize(PickedUp, actor),
                Err(TransitionError::NotAuthorized {
                    from: ReadyForPickup,
                    to: PickedUp
                })
            );
        }
    }

    #[test]
    fn courier_drives_the_delivery_leg() {
        assert!(PickedUp.authorize(Delivering, Courier).is_ok());
        assert!(Delivering.authorize(Delivered, Courier).is_ok());
        assert!(PickedUp.authorize(Delivering, StoreOwner).is_err());
    }

    #[test]
    fn customer_completes_the_order() {
        assert!(Delivered.authorize(Completed, Customer).is_ok());
        assert!(Delivered.authorize(Completed, Courier).is_err());
    }

    #[test]
    fn no_skipping_states() {
        assert_eq!(
            Pending.authorize(ReadyForPickup, StoreOwner),
            Err(TransitionError::Invalid {
                from: Pending,
                to: ReadyForPickup
            })
        );
        assert!(ReadyForPickup.authorize(Delivered, Courier).is_err());
    }

    #[test]
    fn terminal_states_are_final() {
        assert!(Completed.authorize(Cancelled, Customer).is_err());
        assert!(Cancelled.authorize(Pending, StoreOwner).is_err());
        // Delivered is past the point of no return for cancellation
        assert_eq!(
            Delivered.authorize(Cancelled, Customer),
            Err(TransitionError::Invalid {
                from: Delivered,
                to: Cancelled
            })
        );
    }

    #[test]
    fn cancellation_before_delivery() {
        for from in [Pending, Confirmed, ReadyForPickup, PickedUp, Delivering] {
            assert!(from.authorize(Cancelled, Customer).is_ok());
            assert!(from.authorize(Cancelled, StoreOwner).is_ok());
            assert!(from.authorize(Cancelled, Courier).is_err());
        }
    }

    #[test]
    fn status_serializes_screaming_snake() {
        let s = serde_json::to_string(&ReadyForPickup).unwrap();
        assert_eq!(s, "\"READY_FOR_PICKUP\"");
        assert!(serde_json::from_str::<OrderStatus>("\"IN_LIMBO\"").is_err());
    }
}
