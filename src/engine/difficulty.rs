pub const MIN_DIFFICULTY: u32 = 1;
pub const MAX_DIFFICULTY: u32 = 10;
pub const DEFAULT_DIFFICULTY: u32 = 5;

/// Answers faster than this share of the target time count as "fast".
pub const FAST_RATIO: f64 = 0.8;
/// Answers slower than this share of the target time count as "slow".
pub const SLOW_RATIO: f64 = 1.2;

/// Next difficulty after one attempt.
///
/// A fast correct answer steps up, an incorrect or slow one steps down,
/// anything else holds. Values outside `MIN_DIFFICULTY..=MAX_DIFFICULTY`
/// are not rejected; the step is bounded by min/max only.
pub fn adjust_difficulty(current: u32, correct: bool, time_taken: f64, target_time: f64) -> u32 {
    if correct && time_taken < target_time * FAST_RATIO {
        return (current + 1).min(MAX_DIFFICULTY);
    }

    if !correct || time_taken > target_time * SLOW_RATIO {
        return current.saturating_sub(1).max(MIN_DIFFICULTY);
    }

    current
}

pub fn clamp_difficulty(difficulty: u32) -> u32 {
    difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}
