use rand::Rng;
use serde::{Deserialize, Serialize};

/// Preferred learning channel, as answered in the pre-diagnostic questionnaire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarkStyle {
    Visual,
    Aural,
    Read,
    Kinesthetic,
}

impl VarkStyle {
    /// Scoring order. Ties are reported in this order before the random pick.
    pub const ALL: [VarkStyle; 4] = [
        VarkStyle::Visual,
        VarkStyle::Aural,
        VarkStyle::Read,
        VarkStyle::Kinesthetic,
    ];

    pub fn message_key(self) -> &'static str {
        match self {
            VarkStyle::Visual => "vark.style.visual",
            VarkStyle::Aural => "vark.style.aural",
            VarkStyle::Read => "vark.style.read",
            VarkStyle::Kinesthetic => "vark.style.kinesthetic",
        }
    }

    pub fn label(self, locale: &str) -> String {
        t!(self.message_key(), locale = locale).into_owned()
    }

    fn index(self) -> usize {
        match self {
            VarkStyle::Visual => 0,
            VarkStyle::Aural => 1,
            VarkStyle::Read => 2,
            VarkStyle::Kinesthetic => 3,
        }
    }
}

/// A questionnaire statement. The text lives in the locale catalogs under
/// `vark.question.<id>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VarkQuestion {
    pub id: &'static str,
    pub style: VarkStyle,
}

impl VarkQuestion {
    pub fn prompt_key(&self) -> String {
        format!("vark.question.{}", self.id)
    }

    pub fn prompt(&self, locale: &str) -> String {
        let key = self.prompt_key();
        t!(key.as_str(), locale = locale).into_owned()
    }
}

pub static QUESTIONS: [VarkQuestion; 6] = [
    VarkQuestion { id: "v1", style: VarkStyle::Visual },
    VarkQuestion { id: "a1", style: VarkStyle::Aural },
    VarkQuestion { id: "r1", style: VarkStyle::Read },
    VarkQuestion { id: "k1", style: VarkStyle::Kinesthetic },
    VarkQuestion { id: "v2", style: VarkStyle::Visual },
    VarkQuestion { id: "a2", style: VarkStyle::Aural },
];

/// Likert scale: 1 strongly disagree .. 5 strongly agree.
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

pub fn scale_key(score: u8) -> Option<&'static str> {
    match score {
        1 => Some("vark.scale.strongly_disagree"),
        2 => Some("vark.scale.disagree"),
        3 => Some("vark.scale.neutral"),
        4 => Some("vark.scale.agree"),
        5 => Some("vark.scale.strongly_agree"),
        _ => None,
    }
}

pub fn scale_label(score: u8, locale: &str) -> Option<String> {
    scale_key(score).map(|key| t!(key, locale = locale).into_owned())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarkAnswer {
    pub question_id: String,
    pub score: u8,
}

/// Per-style sums in `VarkStyle::ALL` order. Scores are clamped to the
/// scale; answers to unknown questions count for nothing.
pub fn style_totals(answers: &[VarkAnswer]) -> [u32; 4] {
    let mut totals = [0u32; 4];
    for answer in answers {
        if let Some(question) = QUESTIONS.iter().find(|q| q.id == answer.question_id) {
            let score = answer.score.clamp(MIN_SCORE, MAX_SCORE);
            totals[question.style.index()] += score as u32;
        }
    }
    totals
}

/// Every style sharing the highest total. With no scored answers all four tie.
pub fn top_styles(answers: &[VarkAnswer]) -> Vec<VarkStyle> {
    let totals = style_totals(answers);
    let best = totals.iter().copied().max().unwrap_or(0);
    VarkStyle::ALL
        .into_iter()
        .filter(|style| totals[style.index()] == best)
        .collect()
}

/// Dominant style; a tie is broken uniformly at random.
pub fn dominant_style<R: Rng + ?Sized>(answers: &[VarkAnswer], rng: &mut R) -> VarkStyle {
    let tied = top_styles(answers);
    match tied.len() {
        0 => VarkStyle::Visual,
        1 => tied[0],
        n => tied[rng.gen_range(0..n)],
    }
}

/// Progress through the questionnaire, one statement at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Questionnaire {
    pub answers: Vec<VarkAnswer>,
}

impl Questionnaire {
    pub fn current_index(&self) -> usize {
        self.answers.len()
    }

    pub fn current_question(&self) -> Option<&'static VarkQuestion> {
        QUESTIONS.get(self.answers.len())
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() >= QUESTIONS.len()
    }

    /// Score the current statement. Out-of-scale scores are rejected.
    pub fn answer(&mut self, score: u8) -> bool {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        self.answers.push(VarkAnswer {
            question_id: question.id.to_string(),
            score,
        });
        true
    }

    /// Step back to the previous statement and drop its score.
    pub fn back(&mut self) {
        self.answers.pop();
    }

    pub fn result<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<VarkStyle> {
        self.is_complete()
            .then(|| dominant_style(&self.answers, rng))
    }
}
