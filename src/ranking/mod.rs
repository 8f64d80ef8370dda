//! Ranking functions mapping a color list to comparable integer keys.
//!
//! Every function here is pure and deterministic: the same color list always
//! produces the same key. All keys are `i64` so a single comparison path
//! serves every method. The threshold and weighting constants are calibrated
//! against real poster data; changing them changes the output order, so they
//! are constants, not tunables.
//!
//! Callers select a method through [`RankMethod`], validated once at the
//! boundary rather than per comparison.

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Scale factor turning fractional hue/luminance values into stable integers.
const SCALE: f64 = 100.0;

/// Minimum vividness for the vivid-dominant-hue selection.
const VIVID_THRESHOLD: f64 = 0.25;

/// Maximum dominance ratio (`count[0] / count`) for a color to still count
/// as "frequent enough" in the vivid-dominant-hue selection.
const DOMINANCE_RATIO_LIMIT: f64 = 1.5;

/// The computed ranking keys for one entry, one field per method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortVals {
    pub hue: i64,
    pub lum: i64,
    pub vivid_hue: i64,
    pub inverse_step_8: i64,
    pub inverse_step_12: i64,
    pub inverse_step_v2_8: i64,
    pub inverse_step_v2_12: i64,
    pub brbw1: i64,
    pub brbw2: i64,
}

impl SortVals {
    /// Computes every ranking key for a non-empty color list.
    pub fn compute(colors: &[Color]) -> Self {
        Self {
            hue: hue(colors),
            lum: luminosity(colors),
            vivid_hue: vivid_dominant_hue(colors),
            inverse_step_8: inverse_step(colors, 8),
            inverse_step_12: inverse_step(colors, 12),
            inverse_step_v2_8: inverse_step_v2(colors, 8),
            inverse_step_v2_12: inverse_step_v2(colors, 12),
            brbw1: black_red_blue_white_1(colors),
            brbw2: black_red_blue_white_2(colors),
        }
    }
}

/// Ranking method selector.
///
/// Parsed from its kebab-case name at the API boundary; an unrecognized name
/// is rejected before any list mutation is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankMethod {
    Hue,
    Luminosity,
    VividHue,
    InverseStep8,
    InverseStep12,
    InverseStepV2_8,
    InverseStepV2_12,
    Brbw1,
    Brbw2,
}

/// Error for an unrecognized ranking method name.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unrecognized ranking method {0:?}")]
pub struct UnknownMethodError(pub String);

impl RankMethod {
    /// All methods, in presentation order.
    pub const ALL: [RankMethod; 9] = [
        RankMethod::Hue,
        RankMethod::Luminosity,
        RankMethod::VividHue,
        RankMethod::InverseStep8,
        RankMethod::InverseStep12,
        RankMethod::InverseStepV2_8,
        RankMethod::InverseStepV2_12,
        RankMethod::Brbw1,
        RankMethod::Brbw2,
    ];

    /// The kebab-case name of this method.
    pub fn name(&self) -> &'static str {
        match self {
            RankMethod::Hue => "hue",
            RankMethod::Luminosity => "lum",
            RankMethod::VividHue => "vivid-hue",
            RankMethod::InverseStep8 => "inverse-step-8",
            RankMethod::InverseStep12 => "inverse-step-12",
            RankMethod::InverseStepV2_8 => "inverse-step-v2-8",
            RankMethod::InverseStepV2_12 => "inverse-step-v2-12",
            RankMethod::Brbw1 => "brbw1",
            RankMethod::Brbw2 => "brbw2",
        }
    }

    /// Extracts this method's key from precomputed sort values.
    pub fn key(&self, vals: &SortVals) -> i64 {
        match self {
            RankMethod::Hue => vals.hue,
            RankMethod::Luminosity => vals.lum,
            RankMethod::VividHue => vals.vivid_hue,
            RankMethod::InverseStep8 => vals.inverse_step_8,
            RankMethod::InverseStep12 => vals.inverse_step_12,
            RankMethod::InverseStepV2_8 => vals.inverse_step_v2_8,
            RankMethod::InverseStepV2_12 => vals.inverse_step_v2_12,
            RankMethod::Brbw1 => vals.brbw1,
            RankMethod::Brbw2 => vals.brbw2,
        }
    }
}

impl FromStr for RankMethod {
    type Err = UnknownMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RankMethod::ALL
            .iter()
            .find(|m| m.name() == s)
            .copied()
            .ok_or_else(|| UnknownMethodError(s.to_string()))
    }
}

impl std::fmt::Display for RankMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Hue of the dominant color, scaled for integer comparison.
pub fn hue(colors: &[Color]) -> i64 {
    (colors[0].hue * SCALE) as i64
}

/// Luminance of the dominant color, scaled for integer comparison.
pub fn luminosity(colors: &[Color]) -> i64 {
    (colors[0].luminance * SCALE) as i64
}

/// First color in dominance order that is vivid enough and occurs often
/// enough relative to the dominant color; falls back to the dominant color.
fn dominant_vivid(colors: &[Color]) -> &Color {
    for c in colors {
        let ratio = f64::from(colors[0].count) / f64::from(c.count);
        if c.vividness() >= VIVID_THRESHOLD && ratio <= DOMINANCE_RATIO_LIMIT {
            return c;
        }
    }
    &colors[0]
}

/// Hue of the dominant vivid color, scaled for integer comparison.
pub fn vivid_dominant_hue(colors: &[Color]) -> i64 {
    (dominant_vivid(colors).hue * SCALE) as i64
}

/// Inverse-step key over the dominant color.
///
/// Hue, luminance, and value are each quantized into `reps` buckets; when the
/// hue bucket is odd the luminance and value buckets are inverted, folding
/// the quantized space into a back-and-forth traversal so adjacent buckets
/// stay visually adjacent. The multipliers keep the three bucket digits from
/// overflowing into one another, which requires `reps < 100`.
pub fn inverse_step(colors: &[Color], reps: i64) -> i64 {
    step_key(&colors[0], reps)
}

/// Inverse-step key over the dominant vivid color selection.
pub fn inverse_step_v2(colors: &[Color], reps: i64) -> i64 {
    step_key(dominant_vivid(colors), reps)
}

fn step_key(color: &Color, reps: i64) -> i64 {
    debug_assert!((1..100).contains(&reps));

    let h = ((color.hue / 360.0) * reps as f64) as i64;
    let mut l = (color.luminance * reps as f64) as i64;
    let mut v = (color.value * reps as f64) as i64;

    if h % 2 == 1 {
        l = reps - l;
        v = reps - v;
    }

    10_000 * h + 100 * l + v
}

/// Vividness gate mode for the composite black/red-blue/white keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VividMode {
    /// Gate for the most dominant color
    Primary,
    /// Weaker gate for secondary colors
    Secondary,
}

/// Saturation limit curve fitted against luminance.
///
/// A color is "vivid enough" when its saturation reaches the limit the curve
/// yields for its luminance.
fn is_vivid_enough(s: f64, l: f64, mode: VividMode) -> bool {
    let limit = match mode {
        VividMode::Primary => {
            1.37 - (17.3 * l) + (101.0 * l.powi(2)) - (303.0 * l.powi(3)) + (473.0 * l.powi(4))
                - (366.0 * l.powi(5))
                + (112.0 * l.powi(6))
        }
        VividMode::Secondary => {
            1.6 - (15.2 * l) + (93.7 * l.powi(2)) - (307.0 * l.powi(3)) + (527.0 * l.powi(4))
                - (441.0 * l.powi(5))
                + (143.0 * l.powi(6))
        }
    };
    s >= limit
}

/// Composite key: dark low-vividness items first, hue-ordered vivid items in
/// the middle band, bright low-vividness items last.
pub fn black_red_blue_white_1(colors: &[Color]) -> i64 {
    let iterations = colors.len().min(3);
    let mut score: i64 = 0;

    for (i, color) in colors.iter().take(iterations).enumerate() {
        let exp = (iterations - i) as f64;
        let h = color.hue;
        let s = color.saturation;
        let l = color.luminance;

        if i == 0 {
            if is_vivid_enough(s, l, VividMode::Primary) {
                score += ((h / 360.0) * 100f64.powf(exp)) as i64;
                break;
            } else if l > 0.5 {
                score += 1_000_000;
            } else {
                score -= 10_000;
            }
        } else if score <= -10_000 {
            if is_vivid_enough(s, l, VividMode::Primary) {
                score += ((h / 360.0) * 100f64.powf(exp)) as i64;
                break;
            }
        } else if score >= 1_000_000 && is_vivid_enough(s, l, VividMode::Primary) {
            score += (100f64.powf(exp) - (h / 360.0) * 100f64.powf(exp)) as i64;
            break;
        }
    }

    // No vivid colors at all: order within the dark/light band by luminance
    if score == -10_000 {
        score -= 100 - (SCALE * colors[0].luminance) as i64;
    }
    if score == 1_000_000 {
        score += (SCALE * colors[0].luminance) as i64;
    }

    score
}

/// Variant of [`black_red_blue_white_1`] that also considers occurrence
/// counts: a secondary color that passes the weaker vividness gate and
/// occurs at least 1500 times takes top priority.
pub fn black_red_blue_white_2(colors: &[Color]) -> i64 {
    let iterations = colors.len().min(3);
    let mut score: i64 = 0;

    for (i, color) in colors.iter().take(iterations).enumerate() {
        // Exponent fixed at 3 - i even when fewer than 3 colors are present
        let exp = (3 - i) as f64;
        let h = color.hue;
        let s = color.saturation;
        let l = color.luminance;

        if i == 0 {
            if is_vivid_enough(s, l, VividMode::Primary) {
                score += ((h / 360.0) * 100f64.powf(exp)) as i64;
                break;
            } else if l > 0.5 {
                score += 1_000_000;
            } else {
                score -= 10_000;
            }
        } else if is_vivid_enough(s, l, VividMode::Secondary) && color.count >= 1500 {
            score = ((h / 360.0) * 100f64.powi(3)) as i64;
            break;
        } else if score <= -10_000 {
            if is_vivid_enough(s, l, VividMode::Primary) {
                score += ((h / 360.0) * 100f64.powf(exp)) as i64;
                break;
            }
        } else if score >= 1_000_000 && is_vivid_enough(s, l, VividMode::Primary) {
            score += (100f64.powf(exp) - (h / 360.0) * 100f64.powf(exp)) as i64;
            break;
        }
    }

    if score == -10_000 {
        score -= 100 - (SCALE * colors[0].luminance) as i64;
    }
    if score == 1_000_000 {
        score += (SCALE * colors[0].luminance) as i64;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(code: &str, count: u32) -> Color {
        Color::from_hex(code, count).unwrap()
    }

    /// Hand-built color with exact hue/luminance/value for quantization tests.
    fn hlv(h: f64, l: f64, v: f64) -> Color {
        let mut color = hex("#808080", 100);
        color.hue = h;
        color.luminance = l;
        color.value = v;
        color
    }

    #[test]
    fn test_hue_scales_and_truncates() {
        let colors = vec![hlv(123.456, 0.5, 0.5)];
        assert_eq!(hue(&colors), 12345);
    }

    #[test]
    fn test_luminosity_scales_and_truncates() {
        let colors = vec![hlv(0.0, 0.789, 0.5)];
        assert_eq!(luminosity(&colors), 78);
    }

    #[test]
    fn test_ranking_determinism() {
        let colors = vec![hex("#3264c8", 3000), hex("#c83232", 400), hex("#222222", 100)];
        let first = SortVals::compute(&colors);
        let second = SortVals::compute(&colors);
        assert_eq!(first, second);
    }

    #[test]
    fn test_vivid_hue_prefers_frequent_vivid_color() {
        // Dominant gray (hue 0), second color vivid blue frequent enough
        // (ratio exactly 1.5)
        let colors = vec![hex("#808080", 3000), hex("#0000ff", 2000)];
        let expected = (hex("#0000ff", 1).hue * 100.0) as i64;
        assert_eq!(vivid_dominant_hue(&colors), expected);
        assert_eq!(vivid_dominant_hue(&colors), 24_000);
    }

    #[test]
    fn test_vivid_hue_falls_back_to_dominant() {
        // Second color vivid but too rare (ratio 3000/100 > 1.5)
        let colors = vec![hex("#808080", 3000), hex("#0000ff", 100)];
        assert_eq!(vivid_dominant_hue(&colors), 0);
    }

    #[test]
    fn test_inverse_step_even_bucket_unfolded() {
        // hue 10 in 8 reps -> bucket 0 (even); nothing inverted
        let colors = vec![hlv(10.0, 0.5, 0.25)];
        assert_eq!(inverse_step(&colors, 8), 100 * 4 + 2);
    }

    #[test]
    fn test_inverse_step_folding_reps_8() {
        // hue 45 is exactly the 8-rep bucket boundary; bucket 1 is odd, so
        // luminance and value buckets invert
        let colors = vec![hlv(45.0, 0.5, 0.25)];
        let expected = 10_000 * 1 + 100 * (8 - 4) + (8 - 2);
        assert_eq!(inverse_step(&colors, 8), expected);
    }

    #[test]
    fn test_inverse_step_folding_reps_12() {
        // hue 30 is exactly the 12-rep bucket boundary; bucket 1 is odd
        let colors = vec![hlv(30.0, 0.5, 0.25)];
        let expected = 10_000 * 1 + 100 * (12 - 6) + (12 - 3);
        assert_eq!(inverse_step(&colors, 12), expected);
    }

    #[test]
    fn test_inverse_step_v2_uses_vivid_selection() {
        // Dominant gray, vivid red frequent enough: v2 keys off the red
        let gray = hex("#808080", 3000);
        let red = hex("#ff0000", 2500);
        let colors = vec![gray.clone(), red.clone()];
        assert_eq!(inverse_step_v2(&colors, 8), step_key(&red, 8));
        assert_eq!(inverse_step(&colors, 8), step_key(&gray, 8));
    }

    #[test]
    fn test_brbw1_band_ordering() {
        let dark = vec![hex("#1a1a1a", 3000)];
        let vivid = vec![hex("#ff0000", 3000)];
        let light = vec![hex("#f0f0f0", 3000)];

        let dark_score = black_red_blue_white_1(&dark);
        let vivid_score = black_red_blue_white_1(&vivid);
        let light_score = black_red_blue_white_1(&light);

        assert!(dark_score < vivid_score, "dark items sort before vivid ones");
        assert!(vivid_score < light_score, "vivid items sort before light ones");
        assert!(dark_score <= -10_000);
        assert!(light_score >= 1_000_000);
    }

    #[test]
    fn test_brbw1_darker_grays_sort_first() {
        let darker = vec![hex("#101010", 3000)];
        let lighter = vec![hex("#303030", 3000)];
        assert!(black_red_blue_white_1(&darker) < black_red_blue_white_1(&lighter));
    }

    #[test]
    fn test_brbw2_promotes_frequent_secondary() {
        // Light gray dominant lands in the light band; a vivid blue secondary
        // with count >= 1500 overrides the whole score in variant 2
        let colors = vec![hex("#cccccc", 3000), hex("#0000ff", 1500)];
        let score = black_red_blue_white_2(&colors);
        assert_eq!(score, ((240.0 / 360.0) * 100f64.powi(3)) as i64);

        // Below the count threshold the dominant's light band stands
        let rare = vec![hex("#cccccc", 3000), hex("#0000ff", 1499)];
        let rare_score = black_red_blue_white_2(&rare);
        assert!(rare_score >= 1_000_000);
    }

    #[test]
    fn test_rank_method_parse_round_trip() {
        for method in RankMethod::ALL {
            let parsed: RankMethod = method.name().parse().unwrap();
            assert_eq!(parsed, method);
        }
    }

    #[test]
    fn test_rank_method_rejects_unknown_name() {
        let err = "sepia".parse::<RankMethod>().unwrap_err();
        assert_eq!(err, UnknownMethodError("sepia".to_string()));
    }

    #[test]
    fn test_rank_method_key_selects_field() {
        let vals = SortVals {
            hue: 1,
            lum: 2,
            vivid_hue: 3,
            inverse_step_8: 4,
            inverse_step_12: 5,
            inverse_step_v2_8: 6,
            inverse_step_v2_12: 7,
            brbw1: 8,
            brbw2: 9,
        };
        assert_eq!(RankMethod::Hue.key(&vals), 1);
        assert_eq!(RankMethod::InverseStep12.key(&vals), 5);
        assert_eq!(RankMethod::Brbw2.key(&vals), 9);
    }
}
