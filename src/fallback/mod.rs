//! Built-in chef tips used whenever the completion API is unavailable
//!
//! The table is static data in declaration order. That order is also the
//! match priority: a dish named "beef fish stew" resolves to [`TipCategory::Fish`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// How demanding a dish is to cook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Case-insensitive parse of "easy" / "medium" / "hard"
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(label)
    }
}

/// Dish category keys of the fallback table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipCategory {
    Pasta,
    Fish,
    Beef,
    Chicken,
    Default,
}

impl TipCategory {
    /// Categories tried by [`TipCategory::for_dish`], highest priority first.
    /// `Default` is not listed; it is the result when nothing matches.
    pub const MATCH_ORDER: [TipCategory; 4] = [
        TipCategory::Pasta,
        TipCategory::Fish,
        TipCategory::Beef,
        TipCategory::Chicken,
    ];

    /// Substring looked for in the lower-cased dish name
    pub fn key(self) -> &'static str {
        match self {
            TipCategory::Pasta => "pasta",
            TipCategory::Fish => "fish",
            TipCategory::Beef => "beef",
            TipCategory::Chicken => "chicken",
            TipCategory::Default => "default",
        }
    }

    /// Pick the category for a dish name. Pure and total.
    pub fn for_dish(dish_name: &str) -> Self {
        let lower = dish_name.to_lowercase();
        Self::MATCH_ORDER
            .into_iter()
            .find(|category| lower.contains(category.key()))
            .unwrap_or(TipCategory::Default)
    }

    /// The canned tips for this category
    pub fn tips(self) -> &'static FallbackTips {
        match self {
            TipCategory::Pasta => &PASTA,
            TipCategory::Fish => &FISH,
            TipCategory::Beef => &BEEF,
            TipCategory::Chicken => &CHICKEN,
            TipCategory::Default => &DEFAULT,
        }
    }
}

/// One entry of the canned tip table
#[derive(Debug, PartialEq)]
pub struct FallbackTips {
    pub tips: &'static [&'static str],
    pub ingredients: &'static [&'static str],
    pub pairing: &'static str,
    pub difficulty: Difficulty,
}

/// Canned tips for a dish name, see [`TipCategory::for_dish`]
pub fn fallback_for(dish_name: &str) -> &'static FallbackTips {
    TipCategory::for_dish(dish_name).tips()
}

static DEFAULT: FallbackTips = FallbackTips {
    tips: &[
        "🔥 Master the heat control - use high heat for quick cooking to lock in flavors and textures",
        "🧂 Season progressively throughout cooking, not just at the end - this builds layers of flavor",
        "🌿 Always use fresh herbs at the end - they add brightness and prevent flavor from becoming dull",
        "✨ Don't overcrowd the pan - respect your ingredients by giving them space to develop proper color and flavor",
    ],
    ingredients: &[
        "Quality butter",
        "Fresh herbs",
        "Good sea salt",
        "Fresh garlic",
        "Quality olive oil",
    ],
    pairing: "A crisp white wine or light ale would complement this beautifully",
    difficulty: Difficulty::Medium,
};

static PASTA: FallbackTips = FallbackTips {
    tips: &[
        "💧 Reserve pasta water before draining - starchy water is liquid gold for finishing sauces",
        "⏱️ Cook pasta until just al dente; residual heat will continue cooking",
        "🧈 Finish pasta in the pan with sauce and a knob of butter for silky emulsification",
        "🌿 Grated fresh cheese goes on at the table, never cooked directly with pasta",
    ],
    ingredients: &[
        "Quality pasta",
        "Fresh tomatoes",
        "Good olive oil",
        "Garlic",
        "Fresh basil",
    ],
    pairing: "Italian red wine like Chianti or a crisp Vermentino",
    difficulty: Difficulty::Medium,
};

static FISH: FallbackTips = FallbackTips {
    tips: &[
        "🌡️ Bring fish to room temperature before cooking for even doneness",
        "🍳 Cook skin-side down first on high heat to create crispy skin",
        "🧂 Season only just before cooking to prevent water loss",
        "🍋 A squeeze of fresh lemon at the end brightens and completes the dish",
    ],
    ingredients: &[
        "Fresh white fish",
        "Lemon",
        "Quality butter",
        "Fresh dill",
        "Good olive oil",
    ],
    pairing: "Crisp white wine like Sauvignon Blanc or Albariño",
    difficulty: Difficulty::Medium,
};

static BEEF: FallbackTips = FallbackTips {
    tips: &[
        "🌡️ Let meat come to room temperature and pat dry for better searing",
        "🔥 Get your pan smoking hot before searing - don't move the meat around",
        "🧈 Baste with butter and aromatics during cooking for incredible flavor",
        "⏸️ Always rest the meat for 5-10 minutes to redistribute juices",
    ],
    ingredients: &[
        "Quality beef cut",
        "Sea salt",
        "Black pepper",
        "Fresh thyme",
        "Butter",
    ],
    pairing: "Bold red wine like Bordeaux or a full-bodied Cabernet Sauvignon",
    difficulty: Difficulty::Medium,
};

static CHICKEN: FallbackTips = FallbackTips {
    tips: &[
        "🌡️ Brine or salt chicken an hour before cooking for juicy results",
        "🔥 Sear skin until golden and crispy - never move it while searing",
        "🌡️ Use a meat thermometer - 165°F/74°C is perfect, not overcooked",
        "⏸️ Rest for 5 minutes minimum to keep meat moist",
    ],
    ingredients: &[
        "Quality chicken",
        "Fresh herbs",
        "Good quality salt",
        "Butter",
        "Garlic",
    ],
    pairing: "Light red wine or full-bodied white wine like Chardonnay",
    difficulty: Difficulty::Easy,
};
