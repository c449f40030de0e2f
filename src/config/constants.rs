/// Maximum allowed text length for a single synthesis (in characters)
///
/// Requests exceeding this limit are rejected before any balance is touched.
pub const MAX_TEXT_LENGTH: usize = 2500;

/// Character balance granted to a newly created free account
pub const FREE_TIER_CHARACTERS: usize = 12_000;

/// Characters credited to both sides when a referral code is redeemed
pub const REFERRAL_BONUS_CHARACTERS: usize = 500;

/// Prefix of generated referral codes
pub const REFERRAL_CODE_PREFIX: &str = "VOX-";

/// Number of random base-36 characters after the referral prefix
pub const REFERRAL_CODE_LENGTH: usize = 6;

/// Number of characters of the input kept in a history entry
pub const HISTORY_PREVIEW_CHARS: usize = 40;

/// History entries kept per account, newest first
pub const MAX_HISTORY_ITEMS: usize = 50;

/// Sample rate of raw PCM returned by providers
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Required length of a UPI Unique Transaction Reference
pub const UTR_LENGTH: usize = 12;

/// Accepted speed range (inclusive)
pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;

/// Accepted pitch range in semitone-like steps (inclusive)
pub const MIN_PITCH: i32 = -10;
pub const MAX_PITCH: i32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_text_length_within_free_balance() {
        assert!(MAX_TEXT_LENGTH > 0);
        assert!(MAX_TEXT_LENGTH <= FREE_TIER_CHARACTERS);
    }

    #[test]
    fn test_ranges_are_ordered() {
        assert!(MIN_SPEED < 1.0 && 1.0 < MAX_SPEED);
        assert!(MIN_PITCH < 0 && 0 < MAX_PITCH);
    }
}
