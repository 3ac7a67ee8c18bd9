//! Status enums and their legal transitions.
//!
//! Order and print-job statuses are finite state machines with explicit
//! transition tables. The admin layer refuses any update that is not in the
//! table, so a `completed` order can never silently move back to `pending`.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// Legal progression: `pending` → `processing` → `shipped` → `completed`.
/// `cancelled` is reachable from any non-terminal state. `completed` and
/// `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether no further transitions are allowed from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Shipped)
                | (Self::Shipped, Self::Completed)
                | (
                    Self::Pending | Self::Processing | Self::Shipped,
                    Self::Cancelled
                )
        )
    }

    /// Canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Print job status.
///
/// Legal progression: `pending` → `processing` → `printed` → `delivered`.
/// `cancelled` is reachable until the job has been printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrintJobStatus {
    #[default]
    Pending,
    Processing,
    Printed,
    Delivered,
    Cancelled,
}

impl PrintJobStatus {
    /// Whether no further transitions are allowed from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Printed)
                | (Self::Printed, Self::Delivered)
                | (Self::Pending | Self::Processing, Self::Cancelled)
        )
    }

    /// Canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Printed => "printed",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for PrintJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PrintJobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "printed" => Ok(Self::Printed),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid print job status: {s}")),
        }
    }
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Yape mobile wallet.
    Yape,
    /// Plin mobile wallet.
    Plin,
    /// Bank transfer.
    Transfer,
    /// Card payment.
    Card,
}

impl PaymentMethod {
    /// Canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yape => "yape",
            Self::Plin => "plin",
            Self::Transfer => "transfer",
            Self::Card => "card",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yape" => Ok(Self::Yape),
            "plin" => Ok(Self::Plin),
            "transfer" => Ok(Self::Transfer),
            "card" => Ok(Self::Card),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// How a customer record came to exist.
///
/// Guests check out without an account and carry no email; the uniqueness
/// constraint on emails only applies to registered customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerKind {
    Registered,
    Guest,
}

impl CustomerKind {
    /// Canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Guest => "guest",
        }
    }
}

impl std::fmt::Display for CustomerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CustomerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(Self::Registered),
            "guest" => Ok(Self::Guest),
            _ => Err(format!("invalid customer kind: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_happy_path() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn test_order_no_backwards_moves() {
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_order_terminal_states_are_dead_ends() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Completed.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_order_cancellable_until_terminal() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_print_job_happy_path() {
        assert!(PrintJobStatus::Pending.can_transition_to(PrintJobStatus::Processing));
        assert!(PrintJobStatus::Processing.can_transition_to(PrintJobStatus::Printed));
        assert!(PrintJobStatus::Printed.can_transition_to(PrintJobStatus::Delivered));
    }

    #[test]
    fn test_print_job_not_cancellable_after_printing() {
        assert!(PrintJobStatus::Pending.can_transition_to(PrintJobStatus::Cancelled));
        assert!(PrintJobStatus::Processing.can_transition_to(PrintJobStatus::Cancelled));
        assert!(!PrintJobStatus::Printed.can_transition_to(PrintJobStatus::Cancelled));
        assert!(!PrintJobStatus::Delivered.can_transition_to(PrintJobStatus::Cancelled));
    }

    #[test]
    fn test_round_trip_strings() {
        for s in ["pending", "processing", "shipped", "completed", "cancelled"] {
            let status: OrderStatus = s.parse().unwrap();
            assert_eq!(status.as_str(), s);
        }
        for s in ["yape", "plin", "transfer", "card"] {
            let method: PaymentMethod = s.parse().unwrap();
            assert_eq!(method.as_str(), s);
        }
    }

    #[test]
    fn test_unknown_strings_rejected() {
        assert!("paid".parse::<OrderStatus>().is_err());
        assert!("PENDING".parse::<OrderStatus>().is_err());
        assert!("efectivo".parse::<PaymentMethod>().is_err());
        assert!("done".parse::<PrintJobStatus>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let method: PaymentMethod = serde_json::from_str("\"yape\"").unwrap();
        assert_eq!(method, PaymentMethod::Yape);
    }
}
