use crate::core::aggregator::{max_category, max_total};
use crate::domain::model::{
    Assessment, Category, CategoryEntry, PieSlice, PresentationRecord, QuestionEntry,
    StoredArtifacts,
};
use crate::utils::error::{Result, ScreenError};
use chrono::Utc;

/// Assembles the display record. No scoring happens here; everything is read
/// off the assessment.
pub fn format(
    assessment: Option<&Assessment>,
    artifacts: Option<&StoredArtifacts>,
) -> Result<PresentationRecord> {
    let assessment = assessment.ok_or_else(|| ScreenError::MissingInputError {
        what: "assessment result".to_string(),
    })?;
    let artifacts = artifacts.ok_or_else(|| ScreenError::MissingInputError {
        what: "chart artifacts".to_string(),
    })?;

    let result = &assessment.result;
    let category_max = max_category(assessment.max_per_question);

    let categories = result
        .category_scores
        .iter()
        .map(|(category, score)| CategoryEntry {
            category,
            label: category.label(),
            score,
            max_score: category_max,
        })
        .collect();

    let questions = assessment
        .responses
        .with_questions()
        .map(|(question, score)| QuestionEntry {
            id: question.id,
            prompt: question.prompt,
            score,
        })
        .collect();

    let pie = pie_slices(result.total_score, |c| result.category_scores.get(c));

    Ok(PresentationRecord {
        request_id: assessment.request_id.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        total_score: result.total_score,
        max_score: max_total(assessment.max_per_question),
        likelihood_tier: result.likelihood_tier,
        likelihood: result.likelihood_tier.label(),
        categories,
        dominant_category: result.dominant_category,
        most_severe_area: result.dominant_category.label(),
        questions,
        pie,
        artifacts: artifacts.locations.clone(),
    })
}

/// Plain-text rendering of a record for terminal output.
pub fn summary(record: &PresentationRecord) -> String {
    let mut lines = vec![
        format!("Total score: {} / {}", record.total_score, record.max_score),
        format!("Result: {}", record.likelihood),
        format!("Most affected area: {}", record.most_severe_area),
        String::from("Category scores:"),
    ];
    for entry in &record.categories {
        lines.push(format!("  {:<24} {:>3} / {}", entry.label, entry.score, entry.max_score));
    }
    for (name, location) in &record.artifacts {
        lines.push(format!("{}: {}", name, location));
    }
    lines.join("\n")
}

fn pie_slices(total: u32, score_of: impl Fn(Category) -> u32) -> Vec<PieSlice> {
    Category::DISPLAY_ORDER
        .into_iter()
        .map(|category| PieSlice {
            label: category.label(),
            share_percent: if total == 0 {
                0.0
            } else {
                f64::from(score_of(category)) * 100.0 / f64::from(total)
            },
        })
        .collect()
}
