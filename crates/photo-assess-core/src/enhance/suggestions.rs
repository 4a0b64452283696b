//! Keyword-driven suggestion parsing.
//!
//! Each suggestion is lowercased and tested against bilingual (English and
//! Portuguese) keyword tables, one per metric family. A family matches when
//! any of its keywords occurs as a substring; the direction is then decided
//! by the increase vocabulary first, the decrease vocabulary second.

use tracing::trace;

use super::EnhancerConfig;
use crate::domain::{AdjustmentVector, AnalysisResult};

struct Family {
    keywords: &'static [&'static str],
    increase: &'static [&'static str],
    decrease: &'static [&'static str],
}

const BRIGHTNESS: Family = Family {
    keywords: &["bright", "dark", "exposure", "illumina", "luz", "escur", "exposição"],
    increase: &["increase", "more", "brighter", "higher", "aumentar", "mais", "maior"],
    decrease: &["decrease", "less", "darker", "lower", "diminuir", "menos", "menor"],
};

const CONTRAST: Family = Family {
    keywords: &["contrast", "flat", "contraste", "plano"],
    increase: &["increase", "more", "higher", "aumentar", "mais", "maior"],
    decrease: &["decrease", "less", "lower", "diminuir", "menos", "menor"],
};

const COLOR: Family = Family {
    keywords: &[
        "saturation",
        "vibrant",
        "vivid",
        "colorful",
        "saturação",
        "vibrante",
        "colorido",
    ],
    increase: &["increase", "more", "vibrant", "colorful", "aumentar", "mais", "vibrante"],
    decrease: &["decrease", "less", "muted", "diminuir", "menos"],
};

const SHARPNESS: Family = Family {
    keywords: &["sharp", "blur", "focus", "nitid", "foco", "desfoque"],
    increase: &["increase", "more", "sharper", "aumentar", "mais", "maior"],
    decrease: &["decrease", "less", "softer", "diminuir", "menos", "menor"],
};

const WARMTH: Family = Family {
    keywords: &["warm", "cool", "temperature", "quente", "frio", "temperatura"],
    increase: &["warmer", "increase", "more", "mais quente", "aumentar"],
    decrease: &["cooler", "decrease", "less", "mais frio", "diminuir"],
};

const COMPOSITION: &[&str] = &[
    "composition",
    "rule of thirds",
    "crop",
    "composição",
    "regra dos terços",
    "cortar",
];

const RULE_OF_THIRDS: &[&str] = &["rule of thirds", "regra dos terços"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Increase,
    Decrease,
}

/// Like `f64::clamp`, but tolerates inverted bounds from user configuration.
fn bound(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

impl Family {
    /// Direction requested for this family, if the text mentions it.
    fn direction(&self, text: &str) -> Option<Direction> {
        if !contains_any(text, self.keywords) {
            return None;
        }
        if contains_any(text, self.increase) {
            Some(Direction::Increase)
        } else if contains_any(text, self.decrease) {
            Some(Direction::Decrease)
        } else {
            None
        }
    }
}

/// Builds an adjustment vector from free-text suggestions.
///
/// Later suggestions overwrite earlier ones within the same family. Text
/// that matches nothing contributes nothing, so the result is the zero
/// vector in the worst case.
pub fn parse<S: AsRef<str>>(
    suggestions: &[S],
    analysis: &AnalysisResult,
    config: &EnhancerConfig,
) -> AdjustmentVector {
    let mut adjustments = AdjustmentVector::default();

    for suggestion in suggestions {
        let text = suggestion.as_ref().to_lowercase();
        trace!(suggestion = %text, "Parsing suggestion");

        match BRIGHTNESS.direction(&text) {
            Some(Direction::Increase) => {
                adjustments.brightness_delta = bound(
                    1.0 - analysis.brightness / 255.0,
                    config.brightness_increase_min,
                    config.brightness_increase_max,
                );
            }
            Some(Direction::Decrease) => {
                adjustments.brightness_delta = bound(
                    -analysis.brightness / 255.0,
                    config.brightness_decrease_min,
                    config.brightness_decrease_max,
                );
            }
            None => {}
        }

        match CONTRAST.direction(&text) {
            Some(Direction::Increase) => {
                adjustments.contrast_delta = bound(
                    1.0 - analysis.contrast,
                    config.contrast_increase_min,
                    config.contrast_increase_max,
                );
            }
            Some(Direction::Decrease) => {
                adjustments.contrast_delta = bound(
                    -analysis.contrast,
                    config.contrast_decrease_min,
                    config.contrast_decrease_max,
                );
            }
            None => {}
        }

        match COLOR.direction(&text) {
            Some(Direction::Increase) => adjustments.color_delta = config.color_increase,
            Some(Direction::Decrease) => adjustments.color_delta = config.color_decrease,
            None => {}
        }

        match SHARPNESS.direction(&text) {
            Some(Direction::Increase) => adjustments.sharpness_delta = config.sharpness_increase,
            Some(Direction::Decrease) => adjustments.sharpness_delta = config.sharpness_decrease,
            None => {}
        }

        match WARMTH.direction(&text) {
            Some(Direction::Increase) => adjustments.warmth_delta = config.warmth_increase,
            Some(Direction::Decrease) => adjustments.warmth_delta = config.warmth_decrease,
            None => {}
        }

        if contains_any(&text, COMPOSITION)
            && contains_any(&text, RULE_OF_THIRDS)
            && analysis.rule_of_thirds < config.crop_threshold
        {
            adjustments.crop_for_rule_of_thirds = true;
        }
    }

    adjustments
}
