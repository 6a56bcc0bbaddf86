use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Stored order. `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i32,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewOrder {
    pub total: f64,
}

/// Partial update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderPatch {
    pub total: Option<f64>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool { self.total.is_none() }
}

pub fn validate_total(total: f64) -> Result<(), ServiceError> {
    if total.is_finite() && total > 0.0 {
        Ok(())
    } else {
        Err(ServiceError::invalid("total must be positive"))
    }
}

impl From<models::order::Model> for Order {
    fn from(m: models::order::Model) -> Self {
        Self { id: m.id, total: m.total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_must_be_positive_and_finite() {
        assert!(validate_total(0.01).is_ok());
        assert!(validate_total(100.50).is_ok());
        for bad in [0.0, -0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(validate_total(bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn empty_patch() {
        assert!(OrderPatch::default().is_empty());
        assert!(!OrderPatch { total: Some(1.0) }.is_empty());
    }
}
