use crate::domain::catalog;
use crate::domain::model::{AssessmentResult, CategoryScores, LikelihoodTier, ResponseSet};

/// Scores one validated submission. Pure: the same responses always give the
/// same result.
pub fn aggregate(responses: &ResponseSet) -> AssessmentResult {
    let mut category_scores = CategoryScores::default();
    for (question, value) in responses.with_questions() {
        let current = category_scores.get(question.category);
        category_scores.set(question.category, current + value);
    }

    let total_score: u32 = responses.values().iter().sum();
    debug_assert_eq!(total_score, category_scores.total());

    let likelihood_tier = LikelihoodTier::from_total(total_score);
    let dominant_category = category_scores.dominant();

    tracing::debug!(
        total_score,
        tier = ?likelihood_tier,
        dominant = %dominant_category,
        "Aggregated {} responses",
        responses.len()
    );

    AssessmentResult {
        total_score,
        likelihood_tier,
        category_scores,
        dominant_category,
    }
}

/// Highest achievable total on the given scale.
pub fn max_total(max_per_question: u32) -> u32 {
    (catalog::question_count() as u32).saturating_mul(max_per_question)
}

/// Highest achievable subscore for one category on the given scale.
pub fn max_category(max_per_question: u32) -> u32 {
    // every category has the same number of questions
    ((catalog::question_count() / crate::domain::model::Category::ALL.len()) as u32)
        .saturating_mul(max_per_question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Category;

    fn responses(values: &[i64]) -> ResponseSet {
        ResponseSet::from_values(values, 5).unwrap()
    }

    #[test]
    fn test_end_to_end_example() {
        let result = aggregate(&responses(&[
            5, 5, 5, 5, 5, 5, 5, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ]));

        assert_eq!(result.total_score, 40);
        assert_eq!(result.likelihood_tier, LikelihoodTier::Low);
        assert_eq!(
            result.category_scores,
            CategoryScores {
                social: 20,
                behavior: 20,
                emotion: 0,
                language: 0,
                sense: 0,
            }
        );
        assert_eq!(result.dominant_category, Category::Social);
    }

    #[test]
    fn test_subscores_sum_to_total() {
        // a spread of deterministic patterns across the whole 0..=5 scale
        for seed in 0..50i64 {
            let values: Vec<i64> = (0..20).map(|i| (i * 7 + seed * 3 + i * seed) % 6).collect();
            let result = aggregate(&responses(&values));

            assert_eq!(result.total_score as i64, values.iter().sum::<i64>());
            assert_eq!(result.category_scores.total(), result.total_score);
        }
    }

    #[test]
    fn test_social_subscore_is_positionally_isolated() {
        let mut values = vec![0i64; 20];
        values[0] = 1;
        values[1] = 2;
        values[2] = 3;
        values[3] = 4;
        let base = aggregate(&responses(&values)).category_scores.social;

        for v in values.iter_mut().skip(4) {
            *v = 5;
        }
        let noisy = aggregate(&responses(&values)).category_scores.social;

        assert_eq!(base, 10);
        assert_eq!(noisy, 10);
    }

    #[test]
    fn test_each_category_reads_its_own_block() {
        let mut values = vec![0i64; 20];
        for (block, v) in values.chunks_mut(4).enumerate() {
            v.fill(block as i64 + 1);
        }
        let scores = aggregate(&responses(&values)).category_scores;

        assert_eq!(scores.social, 4);
        assert_eq!(scores.behavior, 8);
        assert_eq!(scores.emotion, 12);
        assert_eq!(scores.language, 16);
        assert_eq!(scores.sense, 20);
        assert_eq!(aggregate(&responses(&values)).dominant_category, Category::Sense);
    }

    #[test]
    fn test_tier_thresholds_through_aggregate() {
        let mut values = vec![0i64; 20];
        // 41 = 8 * 5 + 1
        for v in values.iter_mut().take(8) {
            *v = 5;
        }
        values[8] = 1;
        assert_eq!(
            aggregate(&responses(&values)).likelihood_tier,
            LikelihoodTier::Moderate
        );

        let all_max = vec![5i64; 20];
        let result = aggregate(&responses(&all_max));
        assert_eq!(result.total_score, max_total(5));
        assert_eq!(result.likelihood_tier, LikelihoodTier::High);
    }

    #[test]
    fn test_largest_scale_does_not_overflow() {
        let max = crate::domain::model::MAX_SCALE;
        let responses = ResponseSet::from_values(&[i64::from(max); 20], max).unwrap();
        let result = aggregate(&responses);

        assert_eq!(result.total_score, max_total(max));
        assert_eq!(result.category_scores.social, max_category(max));
        assert_eq!(max_total(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_scale_maxima() {
        assert_eq!(max_total(5), 100);
        assert_eq!(max_category(5), 20);
        assert_eq!(max_category(3), 12);
    }
}
