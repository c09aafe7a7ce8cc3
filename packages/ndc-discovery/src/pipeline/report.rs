//! Pattern set statistics and extraction advice.

use indexmap::IndexMap;

use crate::pipeline::classify::classify_pattern;
use crate::types::pattern::{
    CandidatePattern, PatternCategory, PatternClassification, PatternReport, PatternStatistics,
    ValueTier,
};

/// Share of NOISE patterns above which extraction is flagged as noisy.
const NOISE_RATIO_LIMIT: f32 = 0.3;

/// Classify a pattern set and advise on how to improve it.
pub fn recommend(patterns: &[CandidatePattern]) -> PatternReport {
    let classifications: Vec<_> = patterns.iter().map(classify_pattern).collect();
    report_for(&classifications)
}

/// Build a report from classifications that were already computed.
pub fn report_for(classifications: &[PatternClassification]) -> PatternReport {
    let statistics = statistics_for(classifications);
    let recommendations = recommendations_for(&statistics);
    let efficiency_score =
        (statistics.high + statistics.moderate) as f32 / statistics.total.max(1) as f32 * 100.0;

    PatternReport {
        statistics,
        recommendations,
        efficiency_score,
    }
}

fn statistics_for(classifications: &[PatternClassification]) -> PatternStatistics {
    let mut statistics = PatternStatistics {
        total: classifications.len(),
        categories: IndexMap::new(),
        ..Default::default()
    };

    for classification in classifications {
        match classification.tier {
            ValueTier::High => statistics.high += 1,
            ValueTier::Moderate => statistics.moderate += 1,
            ValueTier::Low => statistics.low += 1,
            ValueTier::Noise => statistics.noise += 1,
        }
        *statistics
            .categories
            .entry(classification.category)
            .or_insert(0) += 1;
    }

    statistics
}

fn recommendations_for(statistics: &PatternStatistics) -> Vec<String> {
    let mut recommendations = Vec::new();

    if statistics.noise as f32 > statistics.total as f32 * NOISE_RATIO_LIMIT {
        recommendations.push(
            "High noise ratio - refine extraction to focus on producer-specific patterns"
                .to_string(),
        );
    }

    if statistics.high == 0 {
        recommendations.push(
            "No high-value patterns found - focus on relationship and combination patterns"
                .to_string(),
        );
    }

    if statistics.category_count(PatternCategory::Relationship) == 0 {
        recommendations.push(
            "Missing relationship patterns - look for PaxRefID and passenger dependencies"
                .to_string(),
        );
    }

    if statistics.category_count(PatternCategory::Combination) == 0 {
        recommendations.push(
            "Missing combination patterns - analyze passenger type mixes (ADT+CHD+INF)"
                .to_string(),
        );
    }

    recommendations
}
