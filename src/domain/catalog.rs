use crate::domain::model::{Category, Question};

/// The fixed screening battery. Declaration order is the positional order
/// of every `ResponseSet`.
pub static QUESTIONS: [Question; 20] = [
    Question::new("eye_contact", "Child avoids eye contact", Category::Social),
    Question::new(
        "response_to_name",
        "Does not respond when their name is called",
        Category::Social,
    ),
    Question::new("uses_gestures", "Uses gestures to communicate", Category::Social),
    Question::new("play_behavior", "Prefer to play alone", Category::Social),
    Question::new(
        "follows_direction",
        "Struggles following sequential steps",
        Category::Behavior,
    ),
    Question::new(
        "repetitive_behaviors",
        "Repetitive behaviors (rocking, spinning, hand-flapping)",
        Category::Behavior,
    ),
    Question::new(
        "routines_or_rituals",
        "Insistent on sticking to certain routines or rituals",
        Category::Behavior,
    ),
    Question::new(
        "intense_interests",
        "Has intense interests in specific subjects or activities",
        Category::Behavior,
    ),
    Question::new(
        "handles_frustration",
        "Unable to control frustration",
        Category::Emotion,
    ),
    Question::new("shows_empathy", "Lacks empathy towards others?", Category::Emotion),
    Question::new(
        "calming_strategies",
        "Unable to calm themselves down",
        Category::Emotion,
    ),
    Question::new(
        "emotional_responses",
        "Has inappropriate or exaggerated emotional responses to situations",
        Category::Emotion,
    ),
    Question::new(
        "age_started_speaking",
        "Delay or absence of typical developmental speech milestones",
        Category::Language,
    ),
    Question::new(
        "uses_language",
        "Using language not typical for their age",
        Category::Language,
    ),
    Question::new(
        "imaginative_play",
        "Engages in imaginative play?",
        Category::Language,
    ),
    Question::new(
        "unusual_speech_patterns",
        "Uses repetitive or atypical speech patterns",
        Category::Language,
    ),
    Question::new(
        "unusual_reactions",
        "Has unusual reactions to sensory experiences",
        Category::Sense,
    ),
    Question::new(
        "clothing_textures_intolerance",
        "Shows intolerance to certain clothing textures",
        Category::Sense,
    ),
    Question::new(
        "seeks_sensory_experiences",
        "Seeks sensory experiences",
        Category::Sense,
    ),
    Question::new(
        "distress_noise_light",
        "Shows distress or discomfort in response to specific noises or lights",
        Category::Sense,
    ),
];

pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

pub fn question_count() -> usize {
    QUESTIONS.len()
}

pub fn position_of(id: &str) -> Option<usize> {
    QUESTIONS.iter().position(|q| q.id == id)
}

/// Positions of the questions belonging to `category`, derived from each
/// question's own category tag.
pub fn indices_for(category: Category) -> Vec<usize> {
    QUESTIONS
        .iter()
        .enumerate()
        .filter(|(_, q)| q.category == category)
        .map(|(i, _)| i)
        .collect()
}
