use serde::Serialize;

use super::Tier;

/// A paid subscription plan
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Monthly price in rupees
    pub price_inr: u32,
    pub chars: usize,
    pub features: &'static [&'static str],
    pub tier: Tier,
}

const PLANS: [Plan; 3] = [
    Plan {
        id: "starter",
        name: "Starter",
        price_inr: 99,
        chars: 35_000,
        features: &["3 Premium Voices/Lang", "Realistic Tone", "Standard Fidelity"],
        tier: Tier::Starter,
    },
    Plan {
        id: "elite",
        name: "Elite",
        price_inr: 199,
        chars: 50_000,
        features: &[
            "6 Hindi Specialties",
            "4 Realistic Premiums",
            "3 Realistic/Lang",
        ],
        tier: Tier::Elite,
    },
    Plan {
        id: "pro",
        name: "Pro",
        price_inr: 249,
        chars: 70_000,
        features: &[
            "All Premium Voices",
            "Emotion Engine Unlocked",
            "Max Fidelity",
            "Infinite Realism Layer",
        ],
        tier: Tier::Pro,
    },
];

pub fn plans() -> &'static [Plan] {
    &PLANS
}

pub fn find_plan(id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id == id)
}
