use lazy_static::lazy_static;
use serde::Serialize;

use super::names::names_for;
use super::{Language, Tier};

/// Preamble shared by every persona prompt
const STUDIO_QUALITY: &str = "CRITICAL REQUIREMENT: Output must be indistinguishable from a high-end studio recording. ABSOLUTELY NO background static, hum, room reverb, hiss, or digital artifacts. Ensure a clean, ultra-professional, and natural human-like realism with precise articulation. The voice must sound warm, vivid, and close to the listener.";

/// A selectable voice persona
#[derive(Debug, Clone, Serialize)]
pub struct VoiceOption {
    pub id: String,
    pub name: String,
    /// Provider-side voice the persona is rendered with
    pub prebuilt_voice: &'static str,
    pub description: &'static str,
    pub language: Language,
    pub persona: String,
    pub preview_text: &'static str,
    pub is_unlimited: bool,
    pub tier: Tier,
}

/// Builder-side description of one persona slot
struct Slot {
    suffix: &'static str,
    prebuilt_voice: &'static str,
    description: &'static str,
    tier: Tier,
    unlimited: bool,
    persona: &'static str,
}

impl Slot {
    const fn new(
        suffix: &'static str,
        prebuilt_voice: &'static str,
        description: &'static str,
        tier: Tier,
        persona: &'static str,
    ) -> Self {
        Self {
            suffix,
            prebuilt_voice,
            description,
            tier,
            unlimited: false,
            persona,
        }
    }

    fn unlimited(mut self) -> Self {
        self.unlimited = true;
        self
    }
}

lazy_static! {
    static ref VOICE_CATALOG: Vec<VoiceOption> = Language::ALL
        .iter()
        .flat_map(|lang| generate_language_voices(*lang))
        .collect();
}

/// Every voice of every language, in catalog order
pub fn voice_catalog() -> &'static [VoiceOption] {
    &VOICE_CATALOG
}

pub fn find_voice(id: &str) -> Option<&'static VoiceOption> {
    VOICE_CATALOG.iter().find(|v| v.id == id)
}

pub fn voices_for(language: Language) -> impl Iterator<Item = &'static VoiceOption> {
    VOICE_CATALOG.iter().filter(move |v| v.language == language)
}

/// First voice of `language` an account on `tier` may use
pub fn default_voice_for(language: Language, tier: Tier) -> Option<&'static VoiceOption> {
    voices_for(language).find(|v| tier.can_access(v.tier))
}

fn generate_language_voices(lang: Language) -> Vec<VoiceOption> {
    let code = lang.code();
    let tag = code.to_uppercase();
    let names = names_for(lang);

    let build = |slot: Slot, name: &str| -> VoiceOption {
        // Paid personas carry the language tag so they stand out in mixed lists
        let name = if slot.tier == Tier::Free {
            name.to_string()
        } else {
            format!("{} ({})", name, tag)
        };

        VoiceOption {
            id: format!("{}-{}", code, slot.suffix),
            name,
            prebuilt_voice: slot.prebuilt_voice,
            description: slot.description,
            language: lang,
            persona: format!("{} {}", STUDIO_QUALITY, slot.persona),
            preview_text: names.preview,
            is_unlimited: slot.unlimited,
            tier: slot.tier,
        }
    };

    let mut voices = vec![
        build(
            Slot::new("legacy-ai", "Charon", "Ultra-Clear Studio Neural", Tier::Free,
                "Speak with a warm, authoritative, and perfectly realistic professional tone."),
            names.legacy,
        ),
        build(
            Slot::new("neural-static", "Fenrir", "Studio Fluid / Hyper-Realistic", Tier::Free,
                "Speak in a friendly, conversational, and exceptionally clear natural human voice."),
            names.neural,
        ),
        build(
            Slot::new("simple-boy", "Puck", "Studio Youth Male", Tier::Free,
                "A bright, clear, and very realistic youthful male voice.")
            .unlimited(),
            names.boy,
        ),
        build(
            Slot::new("simple-girl", "Kore", "Studio Youth Female", Tier::Free,
                "A bright, clear, and very realistic youthful female voice.")
            .unlimited(),
            names.girl,
        ),
        build(
            Slot::new("robot", "Fenrir", "Next-Gen AI Voice", Tier::Free,
                "A crisp, futuristic, and perfectly clear premium AI interface voice with no noise."),
            names.robot,
        ),
    ];

    if lang.is_indic_or_english() {
        voices.push(build(
            Slot::new("utility-core", "Puck", "Studio Audio Reader", Tier::Free,
                "A calm, articulate, and highly realistic voice optimized for long readings."),
            names.utility,
        ));
    }

    voices.push(build(
        Slot::new("young-boy", "Puck", "High Fidelity Realistic Child", Tier::Starter,
            "Highly realistic cheerful boy voice with studio enunciation."),
        names.young_boy,
    ));
    voices.push(build(
        Slot::new("young-girl", "Zephyr", "High Fidelity Realistic Child", Tier::Starter,
            "Highly realistic cheerful girl voice with studio enunciation."),
        names.young_girl,
    ));
    voices.push(build(
        Slot::new("clear-narrator", "Charon", "Deep Studio Narrator", Tier::Starter,
            "A steady, deep, and perfectly clear narrator voice for professional usage."),
        names.narrator,
    ));

    voices.push(build(
        Slot::new("sophisticated", "Kore", "Elite Sophisticated Tone", Tier::Elite,
            "An elegant, high-class adult voice with perfect articulation."),
        names.sophisticated,
    ));

    if lang.has_elite_adult_voices() {
        voices.push(build(
            Slot::new("adult-man", "Charon", "Elite Pro Man", Tier::Elite,
                "Mature professional male voice with deep realism."),
            names.man,
        ));
        voices.push(build(
            Slot::new("adult-woman", "Kore", "Elite Pro Woman", Tier::Elite,
                "Mature professional female voice with deep realism."),
            names.woman,
        ));
    }

    voices.push(build(
        Slot::new("infinite-realism", "Zephyr", "Absolute Realism Layer", Tier::Pro,
            "Indistinguishable from human speech. Maximum realism with natural breathing and perfect tone."),
        names.infinite,
    ));

    if !lang.has_elite_adult_voices() {
        voices.push(build(
            Slot::new("adult-man", "Charon", "Infinite Pro Man", Tier::Pro,
                "Mature professional male voice."),
            names.man,
        ));
        voices.push(build(
            Slot::new("adult-woman", "Kore", "Infinite Pro Woman", Tier::Pro,
                "Mature professional female voice."),
            names.woman,
        ));
    }

    voices
}
