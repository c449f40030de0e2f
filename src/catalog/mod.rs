pub mod names;
pub mod plans;
pub mod voices;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use plans::{find_plan, plans, Plan};
pub use voices::{default_voice_for, find_voice, voice_catalog, voices_for, VoiceOption};

/// Languages the catalog is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
    Mr,
    Ne,
    Bho,
    Ur,
    Es,
    Fr,
    De,
    Ja,
    It,
    Pt,
    Ar,
    Zh,
    Ko,
    Ru,
    Tr,
    Nl,
    Vi,
    Th,
    Sv,
    Pl,
}

impl Language {
    /// All languages in catalog order
    pub const ALL: [Language; 22] = [
        Language::En,
        Language::Hi,
        Language::Mr,
        Language::Ne,
        Language::Bho,
        Language::Ur,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::Ja,
        Language::It,
        Language::Pt,
        Language::Ar,
        Language::Zh,
        Language::Ko,
        Language::Ru,
        Language::Tr,
        Language::Nl,
        Language::Vi,
        Language::Th,
        Language::Sv,
        Language::Pl,
    ];

    /// Short code used in voice ids (`en`, `bho`, ...)
    pub const fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Mr => "mr",
            Language::Ne => "ne",
            Language::Bho => "bho",
            Language::Ur => "ur",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Ja => "ja",
            Language::It => "it",
            Language::Pt => "pt",
            Language::Ar => "ar",
            Language::Zh => "zh",
            Language::Ko => "ko",
            Language::Ru => "ru",
            Language::Tr => "tr",
            Language::Nl => "nl",
            Language::Vi => "vi",
            Language::Th => "th",
            Language::Sv => "sv",
            Language::Pl => "pl",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Mr => "Marathi",
            Language::Ne => "Nepali",
            Language::Bho => "Bhojpuri",
            Language::Ur => "Urdu",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::De => "German",
            Language::Ja => "Japanese",
            Language::It => "Italian",
            Language::Pt => "Portuguese",
            Language::Ar => "Arabic",
            Language::Zh => "Chinese",
            Language::Ko => "Korean",
            Language::Ru => "Russian",
            Language::Tr => "Turkish",
            Language::Nl => "Dutch",
            Language::Vi => "Vietnamese",
            Language::Th => "Thai",
            Language::Sv => "Swedish",
            Language::Pl => "Polish",
        }
    }

    /// Locale tag sent to providers that expect one
    pub const fn locale(&self) -> &'static str {
        match self {
            Language::En => "en-us",
            Language::Fr => "fr-fr",
            Language::Pt => "pt-br",
            Language::Es => "es",
            Language::Bho => "hi",
            other => other.code(),
        }
    }

    /// Languages that get the extra free reader voice
    pub fn is_indic_or_english(&self) -> bool {
        matches!(
            self,
            Language::Hi | Language::Mr | Language::Ne | Language::Bho | Language::Ur | Language::En
        )
    }

    /// Languages whose adult voices sit in the elite tier instead of pro
    pub fn has_elite_adult_voices(&self) -> bool {
        matches!(self, Language::Hi | Language::Ur | Language::Mr)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.code() == needle || lang.name().to_lowercase() == needle)
            .ok_or_else(|| format!("unsupported language '{}'", s))
    }
}

/// Subscription tier, ordered from cheapest to most complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Starter,
    Elite,
    Pro,
}

impl Tier {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Starter => "starter",
            Tier::Elite => "elite",
            Tier::Pro => "pro",
        }
    }

    /// Whether an account on this tier may use a voice of `voice_tier`
    pub fn can_access(&self, voice_tier: Tier) -> bool {
        voice_tier <= *self
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "starter" => Ok(Tier::Starter),
            "elite" => Ok(Tier::Elite),
            "pro" => Ok(Tier::Pro),
            other => Err(format!("unknown tier '{}'", other)),
        }
    }
}

/// Emotion hint, honoured for pro accounts only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Cheerful,
    Sad,
    Angry,
    Excited,
    Whispering,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Emotion::Neutral,
        Emotion::Cheerful,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Excited,
        Emotion::Whispering,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Cheerful => "cheerful",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Excited => "excited",
            Emotion::Whispering => "whispering",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
