//! Payment gateway seam and the simulated gateway used by the storefront.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

/// Card details entered on the payment step
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub card_number: String,
    /// MM/YY
    pub expiry: String,
    pub cvv: String,
}

impl PaymentDetails {
    /// Last four digits of the card, for logs and receipts
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(char::is_ascii_digit).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card", &format_args!("**** {}", self.last_four()))
            .finish_non_exhaustive()
    }
}

/// A charge for one booking attempt
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Identifies the draft being paid for
    pub draft_id: Uuid,
    pub amount: u64,
    pub details: PaymentDetails,
}

/// Successful charge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub reference: String,
    pub amount: u64,
    pub processed_at: DateTime<Utc>,
}

/// The gateway refused the charge
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PaymentDeclined(pub String);

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge the card. Implementations may take arbitrarily long or never
    /// answer; callers bound the wait.
    async fn charge(&self, request: PaymentRequest) -> Result<PaymentReceipt, PaymentDeclined>;
}

/// Gateway that approves well-formed card details after a fixed delay
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    fn validate(details: &PaymentDetails) -> Result<(), PaymentDeclined> {
        let digits = details
            .card_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>();
        if !(12..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PaymentDeclined("card number is invalid".to_string()));
        }

        let valid_expiry = match details.expiry.trim().split_once('/') {
            Some((mm, yy)) => {
                mm.len() == 2
                    && yy.len() == 2
                    && yy.chars().all(|c| c.is_ascii_digit())
                    && mm.parse::<u8>().map_or(false, |m| (1..=12).contains(&m))
            }
            None => false,
        };
        if !valid_expiry {
            return Err(PaymentDeclined("expiry date must be MM/YY".to_string()));
        }

        let cvv = details.cvv.trim();
        if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(PaymentDeclined("CVV is invalid".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, request: PaymentRequest) -> Result<PaymentReceipt, PaymentDeclined> {
        tokio::time::sleep(self.delay).await;
        Self::validate(&request.details)?;

        let reference = format!("PAY-{}", &Uuid::new_v4().simple().to_string()[..12]);
        debug!(
            "Simulated charge {} approved for draft {} ({:?})",
            reference, request.draft_id, request.details
        );
        Ok(PaymentReceipt {
            reference,
            amount: request.amount,
            processed_at: Utc::now(),
        })
    }
}
