//! Mental-health screening questionnaires.
//!
//! Four fixed self-assessments. Each answer option maps to a point value and
//! the stored result is the percentage of the questionnaire's maximum score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const FREQUENCY_OPTIONS: &[&str] = &[
    "Not at all",
    "Several days",
    "More than half the days",
    "Nearly every day",
];

const ADHD_OPTIONS: &[&str] = &["Never", "Rarely", "Sometimes", "Often", "Very Often"];

const INTENSITY_OPTIONS: &[&str] = &[
    "Not at all",
    "A little bit",
    "Moderately",
    "Quite a bit",
    "Extremely",
];

const DEPRESSION_QUESTIONS: &[&str] = &[
    "Little interest or pleasure in doing things?",
    "Feeling down, depressed, or hopeless?",
    "Trouble falling or staying asleep, or sleeping too much?",
    "Feeling tired or having little energy?",
    "Poor appetite or overeating?",
    "Feeling bad about yourself or that you are a failure?",
    "Trouble concentrating on things?",
    "Moving or speaking slowly, or being fidgety/restless?",
    "Thoughts that you would be better off dead or of hurting yourself?",
];

const ANXIETY_QUESTIONS: &[&str] = &[
    "Feeling nervous, anxious, or on edge?",
    "Not being able to stop or control worrying?",
    "Worrying too much about different things?",
    "Trouble relaxing?",
    "Being so restless that it's hard to sit still?",
    "Becoming easily annoyed or irritable?",
    "Feeling afraid as if something awful might happen?",
];

const ADHD_QUESTIONS: &[&str] = &[
    "How often do you have trouble wrapping up the final details of a project?",
    "How often do you have difficulty getting things in order when you have to do a task that requires organization?",
    "How often do you have problems remembering appointments or obligations?",
    "When you have a task that requires a lot of thought, how often do you avoid or delay getting started?",
    "How often do you fidget or squirm with your hands or feet when you have to sit down for a long time?",
    "How often do you feel overly active and compelled to do things, as if driven by a motor?",
    "How often do you make careless mistakes when you have to work on a boring or difficult project?",
    "How often do you have difficulty keeping your attention when you are doing boring or repetitive work?",
    "How often do you have difficulty concentrating on what people say to you, even when they are speaking to you directly?",
    "How often do you misplace or have difficulty finding things at home or at work?",
];

const PTSD_QUESTIONS: &[&str] = &[
    "Repeated, disturbing memories, thoughts, or images of a stressful experience from the past?",
    "Repeated, disturbing dreams of a stressful experience from the past?",
    "Suddenly acting or feeling as if a stressful experience was happening again?",
    "Feeling very upset when something reminded you of a stressful experience from the past?",
    "Having physical reactions when something reminded you of a stressful experience from the past?",
    "Avoiding thinking about or talking about a stressful experience from the past?",
    "Avoiding activities or situations because they reminded you of a stressful experience from the past?",
    "Trouble remembering important parts of a stressful experience from the past?",
    "Loss of interest in activities that you used to enjoy?",
    "Feeling distant or cut off from other people?",
];

/// One of the available self-assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreeningTest {
    Depression,
    Anxiety,
    Adhd,
    Ptsd,
}

impl ScreeningTest {
    pub const ALL: [Self; 4] = [Self::Depression, Self::Anxiety, Self::Adhd, Self::Ptsd];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Depression => "depression",
            Self::Anxiety => "anxiety",
            Self::Adhd => "adhd",
            Self::Ptsd => "ptsd",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "depression" => Some(Self::Depression),
            "anxiety" => Some(Self::Anxiety),
            "adhd" => Some(Self::Adhd),
            "ptsd" => Some(Self::Ptsd),
            _ => None,
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::Depression => "Depression Assessment",
            Self::Anxiety => "Anxiety Assessment",
            Self::Adhd => "ADHD Assessment",
            Self::Ptsd => "PTSD Assessment",
        }
    }

    pub const fn questions(&self) -> &'static [&'static str] {
        match self {
            Self::Depression => DEPRESSION_QUESTIONS,
            Self::Anxiety => ANXIETY_QUESTIONS,
            Self::Adhd => ADHD_QUESTIONS,
            Self::Ptsd => PTSD_QUESTIONS,
        }
    }

    pub const fn options(&self) -> &'static [&'static str] {
        match self {
            Self::Depression | Self::Anxiety => FREQUENCY_OPTIONS,
            Self::Adhd => ADHD_OPTIONS,
            Self::Ptsd => INTENSITY_OPTIONS,
        }
    }

    pub const fn max_score(&self) -> u32 {
        match self {
            Self::Depression => 27,
            Self::Anxiety => 21,
            Self::Adhd | Self::Ptsd => 40,
        }
    }

    /// Score as a percentage of the maximum. Unknown answers count as zero.
    pub fn score_percentage<'a>(&self, answers: impl IntoIterator<Item = &'a String>) -> f64 {
        let total: u32 = answers.into_iter().map(|a| answer_value(a)).sum();
        f64::from(total) / f64::from(self.max_score()) * 100.0
    }
}

impl fmt::Display for ScreeningTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point value of an answer option, shared across all questionnaires.
pub fn answer_value(answer: &str) -> u32 {
    match answer {
        "Several days" | "A little bit" | "Rarely" => 1,
        "More than half the days" | "Moderately" | "Sometimes" => 2,
        "Nearly every day" | "Quite a bit" | "Often" => 3,
        "Extremely" | "Very Often" => 4,
        _ => 0,
    }
}

/// Historical score entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: f64,
    pub date: DateTime<Utc>,
}

/// Latest result and full history for one questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    pub last_score: f64,
    pub last_taken: DateTime<Utc>,
    #[serde(default)]
    pub history: Vec<ScoreEntry>,
}

impl TestRecord {
    /// Fold a new score into an optional previous record.
    pub fn record(previous: Option<&Self>, score: f64, at: DateTime<Utc>) -> Self {
        let mut history = previous.map(|r| r.history.clone()).unwrap_or_default();
        history.push(ScoreEntry { score, date: at });
        Self {
            last_score: score,
            last_taken: at,
            history,
        }
    }
}

/// A questionnaire in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTest {
    pub test_name: ScreeningTest,
    pub current_question: usize,
    /// Keyed by the question index as a string, the shape stored documents use.
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    pub started_at: DateTime<Utc>,
}

impl CurrentTest {
    pub fn start(test: ScreeningTest, at: DateTime<Utc>) -> Self {
        Self {
            test_name: test,
            current_question: 0,
            answers: BTreeMap::new(),
            started_at: at,
        }
    }

    pub fn record_answer(&mut self, answer: &str) {
        self.answers
            .insert(self.current_question.to_string(), answer.to_string());
        self.current_question += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.current_question >= self.test_name.questions().len()
    }
}
