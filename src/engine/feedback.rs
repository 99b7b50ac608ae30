use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Incorrect,
    VeryFast,
    Fast,
    OnTime,
    Slow,
    TimeUp,
}

impl Feedback {
    pub fn message_key(self) -> &'static str {
        match self {
            Feedback::Incorrect => "feedback.incorrect",
            Feedback::VeryFast => "feedback.very_fast",
            Feedback::Fast => "feedback.fast",
            Feedback::OnTime => "feedback.on_time",
            Feedback::Slow => "feedback.slow",
            Feedback::TimeUp => "feedback.time_up",
        }
    }

    pub fn message(self, locale: &str) -> String {
        t!(self.message_key(), locale = locale).into_owned()
    }

    pub fn is_positive(self) -> bool {
        !matches!(self, Feedback::Incorrect | Feedback::TimeUp)
    }
}

/// Pick the feedback category for an answered question.
///
/// `TimeUp` is never produced here; the timeout path reports it directly.
pub fn feedback(correct: bool, time_taken: f64, target_time: f64) -> Feedback {
    if !correct {
        return Feedback::Incorrect;
    }
    if time_taken < target_time * 0.5 {
        Feedback::VeryFast
    } else if time_taken < target_time * 0.8 {
        Feedback::Fast
    } else if time_taken < target_time * 1.1 {
        Feedback::OnTime
    } else {
        Feedback::Slow
    }
}
