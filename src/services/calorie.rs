/// Calories per 100g for common foods. Searched in order, first match wins,
/// so longer keywords that contain shorter ones ("eggplant" / "egg") come first.
pub const CALORIE_TABLE: &[(&str, u32)] = &[
    ("eggplant", 25),
    ("broccoli", 34),
    ("carrot", 41),
    ("apple", 52),
    ("banana", 89),
    ("rice", 130),
    ("chicken", 165),
    ("beef", 250),
    ("salmon", 208),
    ("potato", 77),
    ("tomato", 18),
    ("cucumber", 15),
    ("spinach", 23),
    ("lettuce", 15),
    ("orange", 47),
    ("grape", 67),
    ("bread", 265),
    ("pasta", 131),
    ("egg", 155),
    ("milk", 42),
    ("yogurt", 59),
    ("cheese", 402),
];

/// Conservative estimate used when no keyword matches
pub const DEFAULT_CALORIES: u32 = 100;

const STRIPPED_PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~', '(', ')',
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalorieEstimate {
    pub calories: u32,
    pub confidence: f64,
}

/// Confidence pair reported by one caller of the estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceProfile {
    pub matched: f64,
    pub fallback: f64,
}

impl ConfidenceProfile {
    pub const QUICK_SCAN: ConfidenceProfile = ConfidenceProfile {
        matched: 0.85,
        fallback: 0.5,
    };
}

fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect::<String>()
        .to_lowercase()
}

/// Estimate calories per 100g from a free-text food label.
pub fn estimate_calories(label: &str, profile: ConfidenceProfile) -> CalorieEstimate {
    let normalized = normalize_label(label);

    for (keyword, calories) in CALORIE_TABLE {
        if normalized.contains(keyword) {
            log::debug!("🍽️ Matched '{}' in label '{}' ({} kcal/100g)", keyword, label, calories);
            return CalorieEstimate {
                calories: *calories,
                confidence: profile.matched,
            };
        }
    }

    log::debug!("🤷 No calorie keyword in label '{}', using default", label);
    CalorieEstimate {
        calories: DEFAULT_CALORIES,
        confidence: profile.fallback,
    }
}
