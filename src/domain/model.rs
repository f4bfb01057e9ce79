use crate::domain::catalog;
use crate::utils::error::{Result, ScreenError};
use crate::utils::validation;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Social,
    Behavior,
    Emotion,
    Language,
    Sense,
}

impl Category {
    /// Catalog declaration order. Ties on the dominant category resolve to
    /// whichever comes first here.
    pub const ALL: [Category; 5] = [
        Category::Social,
        Category::Behavior,
        Category::Emotion,
        Category::Language,
        Category::Sense,
    ];

    /// Axis order on the radar chart.
    pub const DISPLAY_ORDER: [Category; 5] = [
        Category::Social,
        Category::Behavior,
        Category::Language,
        Category::Sense,
        Category::Emotion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Social => "social",
            Category::Behavior => "behavior",
            Category::Emotion => "emotion",
            Category::Language => "language",
            Category::Sense => "sense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Social => "Social & Communication",
            Category::Behavior => "Behavioral Patterns",
            Category::Emotion => "Emotional Regulation",
            Category::Language => "Language Development",
            Category::Sense => "Sensory Sensitivity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub category: Category,
}

impl Question {
    pub const fn new(id: &'static str, prompt: &'static str, category: Category) -> Self {
        Self {
            id,
            prompt,
            category,
        }
    }
}

/// Largest accepted answer scale. Keeps every total and subscore well inside `u32`.
pub const MAX_SCALE: u32 = 1000;

pub fn check_scale(max_per_question: u32) -> Result<()> {
    validation::validate_range("max_per_question", max_per_question, 1, MAX_SCALE)
}

/// One validated answer per catalog question, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponseSet {
    values: Vec<u32>,
}

impl ResponseSet {
    pub fn from_values(values: &[i64], max_per_question: u32) -> Result<Self> {
        check_scale(max_per_question)?;
        let questions = catalog::questions();
        if values.len() != questions.len() {
            return Err(ScreenError::ResponseCountError {
                expected: questions.len(),
                actual: values.len(),
            });
        }

        let values = questions
            .iter()
            .zip(values)
            .map(|(question, &value)| check_range(question, value, max_per_question))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { values })
    }

    /// Decodes the comma separated positional form, e.g. `"1,0,3,..."`.
    pub fn parse_delimited(input: &str, max_per_question: u32) -> Result<Self> {
        check_scale(max_per_question)?;
        let questions = catalog::questions();
        let entries: Vec<&str> = if input.trim().is_empty() {
            Vec::new()
        } else {
            input.split(',').map(str::trim).collect()
        };

        if entries.len() != questions.len() {
            return Err(ScreenError::ResponseCountError {
                expected: questions.len(),
                actual: entries.len(),
            });
        }

        let values = questions
            .iter()
            .zip(entries)
            .map(|(question, raw)| parse_value(question, raw, max_per_question))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { values })
    }

    /// Decodes a question id -> raw answer mapping, as submitted by a form.
    pub fn from_answers(answers: &HashMap<String, String>, max_per_question: u32) -> Result<Self> {
        check_scale(max_per_question)?;

        let mut unknown: Vec<&str> = answers
            .keys()
            .map(String::as_str)
            .filter(|id| catalog::position_of(id).is_none())
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            return Err(ScreenError::UnknownQuestionError {
                question: unknown.join(", "),
            });
        }

        let values = catalog::questions()
            .iter()
            .map(|question| {
                let raw = answers.get(question.id).ok_or_else(|| {
                    ScreenError::MissingResponseError {
                        question: question.id.to_string(),
                    }
                })?;
                parse_value(question, raw.trim(), max_per_question)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { values })
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn get(&self, position: usize) -> Option<u32> {
        self.values.get(position).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn with_questions(&self) -> impl Iterator<Item = (&'static Question, u32)> + '_ {
        catalog::questions().iter().zip(self.values.iter().copied())
    }
}

fn parse_value(question: &Question, raw: &str, max_per_question: u32) -> Result<u32> {
    let value = raw
        .parse::<i64>()
        .map_err(|_| ScreenError::NonNumericResponseError {
            question: question.id.to_string(),
            value: raw.to_string(),
        })?;
    check_range(question, value, max_per_question)
}

fn check_range(question: &Question, value: i64, max_per_question: u32) -> Result<u32> {
    if value < 0 || value > i64::from(max_per_question) {
        return Err(ScreenError::ResponseOutOfRangeError {
            question: question.id.to_string(),
            value,
            max: max_per_question,
        });
    }
    Ok(value as u32)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryScores {
    pub social: u32,
    pub behavior: u32,
    pub emotion: u32,
    pub language: u32,
    pub sense: u32,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Social => self.social,
            Category::Behavior => self.behavior,
            Category::Emotion => self.emotion,
            Category::Language => self.language,
            Category::Sense => self.sense,
        }
    }

    pub fn set(&mut self, category: Category, score: u32) {
        match category {
            Category::Social => self.social = score,
            Category::Behavior => self.behavior = score,
            Category::Emotion => self.emotion = score,
            Category::Language => self.language = score,
            Category::Sense => self.sense = score,
        }
    }

    /// Iterates in catalog declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, score)| score).sum()
    }

    /// Highest subscore; the first category in declaration order wins ties.
    pub fn dominant(&self) -> Category {
        let mut best = Category::ALL[0];
        for category in Category::ALL {
            if self.get(category) > self.get(best) {
                best = category;
            }
        }
        best
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LikelihoodTier {
    Low,
    Moderate,
    High,
}

impl LikelihoodTier {
    pub const MODERATE_ABOVE: u32 = 40;
    pub const HIGH_ABOVE: u32 = 60;

    pub fn from_total(total_score: u32) -> Self {
        if total_score > Self::HIGH_ABOVE {
            LikelihoodTier::High
        } else if total_score > Self::MODERATE_ABOVE {
            LikelihoodTier::Moderate
        } else {
            LikelihoodTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LikelihoodTier::Low => "Low likelihood of ASD",
            LikelihoodTier::Moderate => "Moderate likelihood of ASD",
            LikelihoodTier::High => "High likelihood of ASD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentResult {
    pub total_score: u32,
    pub likelihood_tier: LikelihoodTier,
    pub category_scores: CategoryScores,
    pub dominant_category: Category,
}

pub const BAR_CHART: &str = "bar_chart.svg";
pub const RADAR_CHART: &str = "radar_chart.svg";

/// Rendered SVG documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifacts {
    pub bar: Vec<u8>,
    pub radar: Vec<u8>,
}

impl ChartArtifacts {
    pub fn named(&self) -> [(&'static str, &[u8]); 2] {
        [(BAR_CHART, &self.bar), (RADAR_CHART, &self.radar)]
    }
}

/// Everything one submission produces before it is stored.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub request_id: Uuid,
    pub max_per_question: u32,
    pub responses: ResponseSet,
    pub result: AssessmentResult,
    pub charts: ChartArtifacts,
}

/// Artifact name -> location it was written to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoredArtifacts {
    pub locations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryEntry {
    pub category: Category,
    pub label: &'static str,
    pub score: u32,
    pub max_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionEntry {
    pub id: &'static str,
    pub prompt: &'static str,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: &'static str,
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationRecord {
    pub request_id: String,
    pub generated_at: String,
    pub total_score: u32,
    pub max_score: u32,
    pub likelihood_tier: LikelihoodTier,
    pub likelihood: &'static str,
    pub categories: Vec<CategoryEntry>,
    pub dominant_category: Category,
    pub most_severe_area: &'static str,
    pub questions: Vec<QuestionEntry>,
    pub pie: Vec<PieSlice>,
    pub artifacts: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers_from(values: &[&str]) -> HashMap<String, String> {
        catalog::questions()
            .iter()
            .zip(values)
            .map(|(q, v)| (q.id.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_delimited_accepts_twenty_values() {
        let input = "5,5,5,5, 5,5,5,5, 0,0,0,0, 0,0,0,0, 0,0,0,0";
        let responses = ResponseSet::parse_delimited(input, 5).unwrap();
        assert_eq!(responses.len(), 20);
        assert_eq!(responses.get(0), Some(5));
        assert_eq!(responses.get(19), Some(0));
    }

    #[test]
    fn test_parse_delimited_rejects_wrong_count() {
        let nineteen = vec!["1"; 19].join(",");
        let twenty_one = vec!["1"; 21].join(",");

        for input in [nineteen, twenty_one] {
            match ResponseSet::parse_delimited(&input, 5) {
                Err(ScreenError::ResponseCountError { expected, .. }) => assert_eq!(expected, 20),
                other => panic!("expected count error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_delimited_empty_input_is_count_error() {
        match ResponseSet::parse_delimited("  ", 5) {
            Err(ScreenError::ResponseCountError { actual, .. }) => assert_eq!(actual, 0),
            other => panic!("expected count error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_delimited_rejects_non_numeric() {
        let mut entries = vec!["1"; 20];
        entries[3] = "x";
        match ResponseSet::parse_delimited(&entries.join(","), 5) {
            Err(ScreenError::NonNumericResponseError { question, value }) => {
                assert_eq!(question, "play_behavior");
                assert_eq!(value, "x");
            }
            other => panic!("expected non-numeric error, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let mut values = vec![0i64; 20];
        values[7] = 6;
        assert!(matches!(
            ResponseSet::from_values(&values, 5),
            Err(ScreenError::ResponseOutOfRangeError { value: 6, max: 5, .. })
        ));

        values[7] = -1;
        assert!(matches!(
            ResponseSet::from_values(&values, 5),
            Err(ScreenError::ResponseOutOfRangeError { value: -1, .. })
        ));
    }

    #[test]
    fn test_from_answers_orders_by_catalog() {
        let raw: Vec<String> = (0..20).map(|i| (i % 6).to_string()).collect();
        let refs: Vec<&str> = raw.iter().map(String::as_str).collect();
        let responses = ResponseSet::from_answers(&answers_from(&refs), 5).unwrap();
        let expected: Vec<u32> = (0..20).map(|i| i % 6).collect();
        assert_eq!(responses.values(), expected.as_slice());
    }

    #[test]
    fn test_from_answers_reports_missing_and_unknown() {
        let mut answers = answers_from(&["1"; 20]);
        answers.remove("seeks_sensory_experiences");
        assert!(matches!(
            ResponseSet::from_answers(&answers, 5),
            Err(ScreenError::MissingResponseError { question }) if question == "seeks_sensory_experiences"
        ));

        let mut answers = answers_from(&["1"; 20]);
        answers.insert("favourite_colour".to_string(), "2".to_string());
        assert!(matches!(
            ResponseSet::from_answers(&answers, 5),
            Err(ScreenError::UnknownQuestionError { .. })
        ));
    }

    #[test]
    fn test_oversized_scale_is_rejected() {
        let values = vec![4_000_000_000i64; 20];
        assert!(matches!(
            ResponseSet::from_values(&values, 4_000_000_000),
            Err(ScreenError::InvalidConfigValueError { .. })
        ));
        assert!(ResponseSet::parse_delimited(&vec!["1"; 20].join(","), MAX_SCALE + 1).is_err());
        assert!(ResponseSet::from_answers(&answers_from(&["1"; 20]), 0).is_err());
        assert!(ResponseSet::from_values(&[MAX_SCALE as i64; 20], MAX_SCALE).is_ok());
    }

    #[test]
    fn test_unknown_ids_are_reported_sorted() {
        let mut answers = answers_from(&["1"; 20]);
        for id in ["zeta_extra", "alpha_extra", "mid_extra"] {
            answers.insert(id.to_string(), "1".to_string());
        }
        for _ in 0..5 {
            match ResponseSet::from_answers(&answers, 5) {
                Err(ScreenError::UnknownQuestionError { question }) => {
                    assert_eq!(question, "alpha_extra, mid_extra, zeta_extra")
                }
                other => panic!("expected unknown question error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_dominant_prefers_first_declared_on_tie() {
        let scores = CategoryScores {
            social: 10,
            behavior: 10,
            emotion: 5,
            language: 0,
            sense: 0,
        };
        assert_eq!(scores.dominant(), Category::Social);

        let scores = CategoryScores {
            social: 0,
            behavior: 3,
            emotion: 3,
            language: 7,
            sense: 7,
        };
        assert_eq!(scores.dominant(), Category::Language);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(LikelihoodTier::from_total(0), LikelihoodTier::Low);
        assert_eq!(LikelihoodTier::from_total(40), LikelihoodTier::Low);
        assert_eq!(LikelihoodTier::from_total(41), LikelihoodTier::Moderate);
        assert_eq!(LikelihoodTier::from_total(60), LikelihoodTier::Moderate);
        assert_eq!(LikelihoodTier::from_total(61), LikelihoodTier::High);
    }

    #[test]
    fn test_tier_is_monotonic() {
        let tiers: Vec<LikelihoodTier> = (0..=100).map(LikelihoodTier::from_total).collect();
        assert!(tiers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_category_scores_serialize_as_map() {
        let json = serde_json::to_value(CategoryScores {
            social: 1,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json["social"], 1);
        assert_eq!(json["sense"], 0);
    }
}
