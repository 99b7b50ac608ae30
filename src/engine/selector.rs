use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::Question;
use crate::engine::difficulty::{MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Read access to a question pool.
pub trait QuestionSource {
    fn questions_by_course(&self, course_id: &str) -> Vec<&Question>;
    fn questions_by_difficulty(&self, course_id: &str, difficulty: u32) -> Vec<&Question>;
}

/// Restricts practice to part of a course.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeScope {
    pub course_id: String,
    pub chapter_id: Option<String>,
    pub concept: Option<String>,
}

impl PracticeScope {
    pub fn applies_to(&self, course_id: &str) -> bool {
        self.course_id == course_id && self.chapter_id.is_some()
    }
}

/// Candidates for a chapter/concept scope.
///
/// Questions carry no chapter or concept tags, so this is the plain
/// difficulty pool. Kept as its own step so tagging can slot in here.
fn scoped_candidates<'a, S: QuestionSource + ?Sized>(
    source: &'a S,
    scope: &PracticeScope,
    difficulty: u32,
) -> Vec<&'a Question> {
    source.questions_by_difficulty(&scope.course_id, difficulty)
}

fn unseen<'a>(questions: Vec<&'a Question>, excluded: &HashSet<String>) -> Vec<&'a Question> {
    questions
        .into_iter()
        .filter(|q| !excluded.contains(&q.id))
        .collect()
}

/// Choose the next question for a course.
///
/// Looks at `difficulty` first (through `scope` when it applies), then scans
/// the other levels in ascending order and stops at the first one with an
/// unseen question. Returns `None` once every level is exhausted.
pub fn select_next<'a, S, R>(
    source: &'a S,
    course_id: &str,
    difficulty: u32,
    excluded: &HashSet<String>,
    scope: Option<&PracticeScope>,
    rng: &mut R,
) -> Option<&'a Question>
where
    S: QuestionSource + ?Sized,
    R: Rng + ?Sized,
{
    let mut candidates = match scope {
        Some(scope) if scope.applies_to(course_id) => scoped_candidates(source, scope, difficulty),
        _ => Vec::new(),
    };
    if candidates.is_empty() {
        candidates = source.questions_by_difficulty(course_id, difficulty);
    }

    let mut candidates = unseen(candidates, excluded);

    if candidates.is_empty() {
        candidates = (MIN_DIFFICULTY..=MAX_DIFFICULTY)
            .filter(|&level| level != difficulty)
            .map(|level| unseen(source.questions_by_difficulty(course_id, level), excluded))
            .find(|pool| !pool.is_empty())
            .unwrap_or_default();
    }

    if candidates.is_empty() {
        return None;
    }

    let idx = rng.gen_range(0..candidates.len());
    Some(candidates[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    struct Pool(Vec<Question>);

    impl QuestionSource for Pool {
        fn questions_by_course(&self, course_id: &str) -> Vec<&Question> {
            self.0.iter().filter(|q| q.course_id == course_id).collect()
        }

        fn questions_by_difficulty(&self, course_id: &str, difficulty: u32) -> Vec<&Question> {
            self.0
                .iter()
                .filter(|q| q.course_id == course_id && q.difficulty == difficulty)
                .collect()
        }
    }

    fn q(id: &str, course_id: &str, difficulty: u32) -> Question {
        Question {
            id: id.to_string(),
            course_id: course_id.to_string(),
            statement: String::new(),
            options: Vec::new(),
            correct_answer: "x".to_string(),
            difficulty,
            target_time: 30,
        }
    }

    fn pool() -> Pool {
        Pool(vec![
            q("a2", "math", 2),
            q("b5", "math", 5),
            q("c5", "math", 5),
            q("d7", "math", 7),
            q("e8", "math", 8),
            q("x5", "art", 5),
        ])
    }

    fn ids(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_picks_from_target_difficulty() {
        let pool = pool();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let picked = select_next(&pool, "math", 5, &HashSet::new(), None, &mut rng).unwrap();
            assert!(picked.id == "b5" || picked.id == "c5", "got {}", picked.id);
        }
    }

    #[test]
    fn test_never_returns_excluded() {
        let pool = pool();
        let mut rng = SmallRng::seed_from_u64(7);
        let excluded = ids(&["b5"]);
        for _ in 0..50 {
            let picked = select_next(&pool, "math", 5, &excluded, None, &mut rng).unwrap();
            assert_eq!(picked.id, "c5");
        }
    }

    #[test]
    fn test_fallback_takes_lowest_other_level_only() {
        let pool = pool();
        let mut rng = SmallRng::seed_from_u64(1);
        let excluded = ids(&["b5", "c5"]);
        for _ in 0..20 {
            let picked = select_next(&pool, "math", 5, &excluded, None, &mut rng).unwrap();
            assert_eq!(picked.id, "a2");
        }
    }

    #[test]
    fn test_fallback_skips_exhausted_levels() {
        let pool = pool();
        let mut rng = SmallRng::seed_from_u64(1);
        let excluded = ids(&["a2", "b5", "c5"]);
        let picked = select_next(&pool, "math", 5, &excluded, None, &mut rng).unwrap();
        assert_eq!(picked.id, "d7");
    }

    #[test]
    fn test_empty_target_level_falls_back() {
        let pool = pool();
        let mut rng = SmallRng::seed_from_u64(3);
        let picked = select_next(&pool, "math", 10, &HashSet::new(), None, &mut rng).unwrap();
        assert_eq!(picked.id, "a2");
    }

    #[test]
    fn test_none_only_when_course_exhausted() {
        let pool = pool();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut excluded = HashSet::new();
        let mut seen = Vec::new();
        while let Some(picked) = select_next(&pool, "math", 5, &excluded, None, &mut rng) {
            excluded.insert(picked.id.clone());
            seen.push(picked.id.clone());
        }
        seen.sort();
        assert_eq!(seen, vec!["a2", "b5", "c5", "d7", "e8"]);
    }

    #[test]
    fn test_other_courses_are_never_offered() {
        let pool = pool();
        let mut rng = SmallRng::seed_from_u64(5);
        let excluded = ids(&["x5"]);
        assert!(select_next(&pool, "art", 5, &excluded, None, &mut rng).is_none());
        assert!(select_next(&pool, "history", 5, &HashSet::new(), None, &mut rng).is_none());
    }

    #[test]
    fn test_scope_uses_same_pool_as_unscoped() {
        let pool = pool();
        let scope = PracticeScope {
            course_id: "math".to_string(),
            chapter_id: Some("ch1".to_string()),
            concept: None,
        };
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..20 {
            let picked =
                select_next(&pool, "math", 5, &HashSet::new(), Some(&scope), &mut rng).unwrap();
            assert_eq!(picked.difficulty, 5);
        }
    }

    #[test]
    fn test_scope_for_other_course_is_ignored() {
        let scope = PracticeScope {
            course_id: "art".to_string(),
            chapter_id: Some("ch1".to_string()),
            concept: Some("color".to_string()),
        };
        assert!(!scope.applies_to("math"));
        assert!(scope.applies_to("art"));
        let no_chapter = PracticeScope {
            course_id: "art".to_string(),
            ..Default::default()
        };
        assert!(!no_chapter.applies_to("art"));
    }

    #[test]
    fn test_same_seed_same_pick() {
        let pool = pool();
        let mut rng1 = SmallRng::seed_from_u64(99);
        let mut rng2 = SmallRng::seed_from_u64(99);
        let a = select_next(&pool, "math", 5, &HashSet::new(), None, &mut rng1).unwrap();
        let b = select_next(&pool, "math", 5, &HashSet::new(), None, &mut rng2).unwrap();
        assert_eq!(a.id, b.id);
    }
}
