//! In-memory account state
//!
//! Balances, tiers, referral codes, synthesis history, payment submissions
//! and feedback live here for the lifetime of the process.

pub mod feedback;
pub mod history;
pub mod payments;
pub mod referral;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use uuid::Uuid;

use crate::catalog::Tier;
use crate::config::constants::FREE_TIER_CHARACTERS;
use crate::error::{Result, TtsError};

pub use feedback::FeedbackEntry;
pub use history::AudioHistoryItem;
pub use payments::{payment_instructions, PaymentInstructions, PaymentStatus, PaymentSubmission};
pub use referral::referral_message;

/// What the front-end shows about an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserState {
    pub tier: Tier,
    pub characters_remaining: usize,
    pub referral_count: u32,
    pub referral_code: String,
    /// Referral code this account redeemed, if any
    pub referred_by: Option<String>,
}

struct AccountRecord {
    state: UserState,
    history: VecDeque<history::StoredAudio>,
}

/// Thread-safe store of every account known to the server
#[derive(Default)]
pub struct AccountStore {
    accounts: DashMap<String, AccountRecord>,
    /// referral code -> owning account id
    referral_codes: DashMap<String, String>,
    /// UTR -> submission
    payments: DashMap<String, PaymentSubmission>,
    feedback: DashMap<String, FeedbackEntry>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a free-tier account with a fresh referral code
    pub fn create(&self) -> (String, UserState) {
        let id = Uuid::new_v4().to_string();

        let referral_code = loop {
            match self.referral_codes.entry(referral::generate_code()) {
                Entry::Vacant(slot) => {
                    let code = slot.key().clone();
                    slot.insert(id.clone());
                    break code;
                }
                Entry::Occupied(_) => continue,
            }
        };

        let state = UserState {
            tier: Tier::Free,
            characters_remaining: FREE_TIER_CHARACTERS,
            referral_count: 0,
            referral_code,
            referred_by: None,
        };

        self.accounts.insert(
            id.clone(),
            AccountRecord {
                state: state.clone(),
                history: VecDeque::new(),
            },
        );

        tracing::info!(account = %id, code = %state.referral_code, "Account created");
        (id, state)
    }

    pub fn get(&self, id: &str) -> Result<UserState> {
        self.accounts
            .get(id)
            .map(|record| record.state.clone())
            .ok_or_else(|| TtsError::AccountNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Fail with `InsufficientBalance` unless `chars` fit in the balance
    pub fn check_balance(&self, id: &str, chars: usize) -> Result<()> {
        let state = self.get(id)?;
        if chars > state.characters_remaining {
            return Err(TtsError::InsufficientBalance {
                requested: chars,
                remaining: state.characters_remaining,
            });
        }
        Ok(())
    }

    /// Atomically take `chars` from the balance
    pub fn debit(&self, id: &str, chars: usize) -> Result<UserState> {
        let mut record = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| TtsError::AccountNotFound(id.to_string()))?;

        let remaining = record.state.characters_remaining;
        if chars > remaining {
            return Err(TtsError::InsufficientBalance {
                requested: chars,
                remaining,
            });
        }

        record.state.characters_remaining = remaining - chars;
        Ok(record.state.clone())
    }

    /// Debit `chars` for a synthesis in flight
    ///
    /// The characters come back when the returned [`Debit`] is dropped without
    /// being committed, including when the request future is cancelled.
    pub fn reserve(self: &Arc<Self>, id: &str, chars: usize) -> Result<Debit> {
        self.debit(id, chars)?;
        Ok(Debit {
            accounts: Arc::clone(self),
            account_id: id.to_string(),
            chars,
            committed: false,
        })
    }

    /// Give back characters taken by a synthesis that failed
    pub fn refund(&self, id: &str, chars: usize) -> Result<UserState> {
        self.credit(id, chars)
    }

    fn credit(&self, id: &str, chars: usize) -> Result<UserState> {
        let mut record = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| TtsError::AccountNotFound(id.to_string()))?;
        record.state.characters_remaining = record.state.characters_remaining.saturating_add(chars);
        Ok(record.state.clone())
    }
}

/// Characters held for one synthesis; refunded on drop unless committed
#[must_use = "dropping a Debit refunds it"]
pub struct Debit {
    accounts: Arc<AccountStore>,
    account_id: String,
    chars: usize,
    committed: bool,
}

impl Debit {
    /// Keep the characters; the audio was delivered
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Debit {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match self.accounts.refund(&self.account_id, self.chars) {
            Ok(_) => tracing::info!(
                account = %self.account_id,
                chars = self.chars,
                "Refunded characters for undelivered synthesis"
            ),
            Err(e) => tracing::warn!(account = %self.account_id, "Refund failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_defaults() {
        let store = AccountStore::new();
        let (id, state) = store.create();

        assert_eq!(state.tier, Tier::Free);
        assert_eq!(state.characters_remaining, 12_000);
        assert_eq!(state.referral_count, 0);
        assert!(state.referral_code.starts_with("VOX-"));
        assert_eq!(state.referral_code.len(), 10);
        assert_eq!(state.referred_by, None);
        assert_eq!(store.get(&id).unwrap(), state);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_referral_codes_unique() {
        let store = AccountStore::new();
        let codes: std::collections::HashSet<_> =
            (0..200).map(|_| store.create().1.referral_code).collect();
        assert_eq!(codes.len(), 200);
    }

    #[test]
    fn test_unknown_account() {
        let store = AccountStore::new();
        assert!(matches!(
            store.get("missing"),
            Err(TtsError::AccountNotFound(_))
        ));
        assert!(matches!(
            store.debit("missing", 1),
            Err(TtsError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_debit_and_refund() {
        let store = AccountStore::new();
        let (id, _) = store.create();

        let state = store.debit(&id, 2_000).unwrap();
        assert_eq!(state.characters_remaining, 10_000);

        let state = store.refund(&id, 500).unwrap();
        assert_eq!(state.characters_remaining, 10_500);
    }

    #[test]
    fn test_debit_rejects_overdraw() {
        let store = AccountStore::new();
        let (id, _) = store.create();

        assert!(store.check_balance(&id, 12_000).is_ok());
        match store.debit(&id, 12_001) {
            Err(TtsError::InsufficientBalance {
                requested,
                remaining,
            }) => {
                assert_eq!(requested, 12_001);
                assert_eq!(remaining, 12_000);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(store.check_balance(&id, 12_001).is_err());

        // Balance untouched by the failed debit
        assert_eq!(store.get(&id).unwrap().characters_remaining, 12_000);
        assert_eq!(store.debit(&id, 12_000).unwrap().characters_remaining, 0);
    }

    #[test]
    fn test_reserve_refunds_on_drop() {
        let store = Arc::new(AccountStore::new());
        let (id, _) = store.create();

        let debit = store.reserve(&id, 3_000).unwrap();
        assert_eq!(store.get(&id).unwrap().characters_remaining, 9_000);
        drop(debit);
        assert_eq!(store.get(&id).unwrap().characters_remaining, 12_000);

        store.reserve(&id, 3_000).unwrap().commit();
        assert_eq!(store.get(&id).unwrap().characters_remaining, 9_000);

        assert!(matches!(
            store.reserve(&id, 9_001),
            Err(TtsError::InsufficientBalance { .. })
        ));
        assert_eq!(store.get(&id).unwrap().characters_remaining, 9_000);
    }

    #[test]
    fn test_contains() {
        let store = AccountStore::new();
        let (id, _) = store.create();
        assert!(store.contains(&id));
        assert!(!store.contains("made-up"));
    }
}
