//! Built-in antonym table.
//!
//! Qualifiers are grouped into polarity classes. Every affirming term of a
//! class pairs with every negating term of the same class, so an English
//! qualifier written by the hypothesis renderer ("often") opposes a Chinese
//! one typed by a user ("从不"). Terms from different classes never pair:
//! "likes" says nothing about how often something happens.

use belief_core::models::AntonymPair;

struct PolarityClass {
    affirm: &'static [&'static str],
    negate: &'static [&'static str],
}

const CLASSES: &[PolarityClass] = &[
    // Frequency.
    PolarityClass {
        affirm: &["often", "always", "habitually", "经常", "总是", "每天", "习惯"],
        negate: &["rarely", "never", "avoids", "很少", "从不"],
    },
    // Preference.
    PolarityClass {
        affirm: &["likes", "喜欢", "爱"],
        negate: &["dislikes", "讨厌", "不喜欢", "恨"],
    },
    // Trend.
    PolarityClass {
        affirm: &["increasing"],
        negate: &["decreasing"],
    },
];

/// Every affirming/negating pair within each class, affirming term first.
pub fn default_pairs() -> Vec<AntonymPair> {
    CLASSES
        .iter()
        .flat_map(|class| {
            class.affirm.iter().flat_map(move |positive| {
                class
                    .negate
                    .iter()
                    .map(move |negative| AntonymPair::new(positive, negative))
            })
        })
        .collect()
}
