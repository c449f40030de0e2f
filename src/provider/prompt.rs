use crate::catalog::Emotion;

/// Fidelity instructions every styled request starts with
const FIDELITY_PROTOCOL: &str = "AUDIO FIDELITY PROTOCOL: This is a high-end studio recording. Output must be 100% pure, crystal clear, and completely silent in the background. ABSOLUTELY NO white noise, no room reverb, no hiss, no static, and no digital artifacts. The voice must sound realistic, warm, and professional with natural human-like cadence and subtle, realistic breathing patterns.";

const FAST_PACE_THRESHOLD: f32 = 1.3;
const SLOW_PACE_THRESHOLD: f32 = 0.8;
const PITCH_THRESHOLD: i32 = 3;

/// Turn delivery controls into natural-language direction for models that
/// take free-form style instructions instead of numeric parameters
pub fn build_style_prompt(
    text: &str,
    speed: f32,
    pitch: i32,
    emotion: Option<Emotion>,
    persona: &str,
) -> String {
    let mut instructions = vec![FIDELITY_PROTOCOL.to_string()];

    if speed > FAST_PACE_THRESHOLD {
        instructions.push("The speaker is talking at a fast, energetic pace.".to_string());
    } else if speed < SLOW_PACE_THRESHOLD {
        instructions.push("The speaker is talking at a slow, deliberate pace.".to_string());
    }

    if pitch > PITCH_THRESHOLD {
        instructions.push("The voice has a naturally higher resonance.".to_string());
    } else if pitch < -PITCH_THRESHOLD {
        instructions.push("The voice has a naturally deeper, resonant tone.".to_string());
    }

    if let Some(emotion) = emotion.filter(|e| *e != Emotion::Neutral) {
        instructions.push(format!(
            "The speaker is currently feeling {} - let that emotion naturally flow through the voice acting.",
            emotion
        ));
    }

    let persona = persona.trim();
    if !persona.is_empty() {
        instructions.push(persona.to_string());
    }

    format!("{} Say exactly this: {}", instructions.join(" "), text)
}
