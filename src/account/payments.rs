use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AccountStore, UserState};
use crate::catalog::{find_plan, Plan};
use crate::config::constants::UTR_LENGTH;
use crate::error::{Result, TtsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Approved,
}

/// A UPI payment reported by a user, awaiting manual verification
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSubmission {
    pub utr: String,
    pub plan_id: String,
    pub account_id: String,
    pub submitted_at: DateTime<Utc>,
    pub status: PaymentStatus,
}

/// How to pay for a plan
#[derive(Debug, Clone, Serialize)]
pub struct PaymentInstructions {
    pub plan_id: String,
    pub plan_name: String,
    pub amount_inr: u32,
    pub payee: String,
    pub upi_link: String,
}

/// UPI deep link for a plan
pub fn payment_instructions(plan: &Plan, payee: &str, payee_name: &str) -> Result<PaymentInstructions> {
    let amount = plan.price_inr.to_string();
    let link = reqwest::Url::parse_with_params(
        "upi://pay",
        &[
            ("pa", payee),
            ("pn", payee_name),
            ("am", amount.as_str()),
            ("cu", "INR"),
        ],
    )
    .map_err(|e| TtsError::Unknown(format!("Failed to build UPI link: {}", e)))?;

    Ok(PaymentInstructions {
        plan_id: plan.id.to_string(),
        plan_name: plan.name.to_string(),
        amount_inr: plan.price_inr,
        payee: payee.to_string(),
        upi_link: link.to_string(),
    })
}

fn validate_utr(utr: &str) -> Result<()> {
    if utr.is_empty() {
        return Err(TtsError::InvalidUtr(
            "Please enter the UTR number first.".to_string(),
        ));
    }
    if utr.len() != UTR_LENGTH || !utr.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TtsError::InvalidUtr(format!(
            "UTR must be exactly {} digits.",
            UTR_LENGTH
        )));
    }
    Ok(())
}

impl AccountStore {
    /// Record a payment for verification and return the confirmation message
    pub fn submit_utr(
        &self,
        account_id: &str,
        plan_id: &str,
        utr: &str,
    ) -> Result<(PaymentSubmission, String)> {
        self.get(account_id)?;

        let utr = utr.trim();
        validate_utr(utr)?;

        let plan = find_plan(plan_id).ok_or_else(|| TtsError::PlanNotFound(plan_id.to_string()))?;

        let submission = PaymentSubmission {
            utr: utr.to_string(),
            plan_id: plan.id.to_string(),
            account_id: account_id.to_string(),
            submitted_at: Utc::now(),
            status: PaymentStatus::Pending,
        };

        match self.payments.entry(utr.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(TtsError::InvalidUtr(format!(
                    "UTR {} has already been submitted.",
                    utr
                )));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(submission.clone());
            }
        }

        tracing::info!(account = %account_id, plan = plan.id, utr = %utr, "Payment submitted for verification");

        let message = format!(
            "Payment verification for UTR {} submitted. Our team will verify and upgrade your account within 30 minutes.",
            utr
        );
        Ok((submission, message))
    }

    /// Mark a payment verified and upgrade the paying account
    pub fn approve_payment(&self, utr: &str) -> Result<(PaymentSubmission, UserState)> {
        let mut payment = self
            .payments
            .get_mut(utr.trim())
            .ok_or_else(|| TtsError::PaymentNotFound(utr.to_string()))?;

        if payment.status == PaymentStatus::Approved {
            return Err(TtsError::InvalidRequest(format!(
                "Payment for UTR {} was already approved",
                utr
            )));
        }

        let plan = find_plan(&payment.plan_id)
            .ok_or_else(|| TtsError::PlanNotFound(payment.plan_id.clone()))?;

        let state = {
            let mut record = self
                .accounts
                .get_mut(&payment.account_id)
                .ok_or_else(|| TtsError::AccountNotFound(payment.account_id.clone()))?;
            // Buying a lower plan never downgrades
            record.state.tier = record.state.tier.max(plan.tier);
            record.state.characters_remaining += plan.chars;
            record.state.clone()
        };

        payment.status = PaymentStatus::Approved;

        tracing::info!(
            account = %payment.account_id,
            plan = plan.id,
            utr = %payment.utr,
            "Payment approved, account upgraded"
        );

        Ok((payment.clone(), state))
    }

    pub fn payment(&self, utr: &str) -> Option<PaymentSubmission> {
        self.payments.get(utr).map(|p| p.clone())
    }
}
