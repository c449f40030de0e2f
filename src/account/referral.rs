use rand::Rng;

use super::{AccountStore, UserState};
use crate::config::constants::{
    REFERRAL_BONUS_CHARACTERS, REFERRAL_CODE_LENGTH, REFERRAL_CODE_PREFIX,
};
use crate::error::{Result, TtsError};

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Random `VOX-XXXXXX` code; uniqueness is enforced by the store
pub(crate) fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..REFERRAL_CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", REFERRAL_CODE_PREFIX, suffix)
}

/// Share text for a referral code
pub fn referral_message(code: &str) -> String {
    format!(
        "Join VoxNova with code {} for {} bonus chars!",
        code, REFERRAL_BONUS_CHARACTERS
    )
}

impl AccountStore {
    /// Redeem another account's referral code
    ///
    /// Each account redeems at most once. Both sides receive the bonus and
    /// the owner's referral count goes up.
    pub fn redeem_referral(&self, id: &str, code: &str) -> Result<UserState> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(TtsError::InvalidReferral("code is empty".to_string()));
        }

        let owner = self
            .referral_codes
            .get(&code)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| TtsError::InvalidReferral(format!("{} does not exist", code)))?;

        if owner == id {
            return Err(TtsError::InvalidReferral(
                "you cannot redeem your own code".to_string(),
            ));
        }

        let redeemer_state = {
            let mut redeemer = self
                .accounts
                .get_mut(id)
                .ok_or_else(|| TtsError::AccountNotFound(id.to_string()))?;

            if let Some(previous) = &redeemer.state.referred_by {
                return Err(TtsError::InvalidReferral(format!(
                    "a referral code ({}) was already redeemed",
                    previous
                )));
            }

            redeemer.state.referred_by = Some(code.clone());
            redeemer.state.characters_remaining += REFERRAL_BONUS_CHARACTERS;
            redeemer.state.clone()
        };

        if let Some(mut owner_record) = self.accounts.get_mut(&owner) {
            owner_record.state.characters_remaining += REFERRAL_BONUS_CHARACTERS;
            owner_record.state.referral_count += 1;
        }

        tracing::info!(account = %id, code = %code, "Referral redeemed");
        Ok(redeemer_state)
    }
}
