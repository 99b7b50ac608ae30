use anyhow::{Context, Result};
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::difficulty::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::engine::selector::QuestionSource;

#[derive(Embed)]
#[folder = "assets/catalog/"]
struct CatalogAssets;

const BUNDLED_CATALOG: &str = "default.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub course_id: String,
    pub statement: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub correct_answer: String,
    pub difficulty: u32,
    /// Expected answer time in seconds.
    pub target_time: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub concepts: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown course `{0}`")]
    UnknownCourse(String),
    #[error("question `{id}` has difficulty {difficulty}, expected 1..=10")]
    InvalidDifficulty { id: String, difficulty: u32 },
    #[error("question `{0}` has a zero target time")]
    ZeroTargetTime(String),
    #[error("no question with id `{0}`")]
    QuestionNotFound(String),
    #[error("no course with id `{0}`")]
    CourseNotFound(String),
}

/// Courses plus their question pool. Persisted as `catalog.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// The catalog shipped inside the binary.
    pub fn bundled() -> Result<Self> {
        let file = CatalogAssets::get(BUNDLED_CATALOG)
            .with_context(|| format!("bundled catalog {BUNDLED_CATALOG} is missing"))?;
        let bank: QuestionBank = serde_json::from_slice(file.data.as_ref())
            .context("bundled catalog is not valid JSON")?;
        Ok(bank)
    }

    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn save_course(&mut self, course: Course) {
        match self.courses.iter_mut().find(|c| c.id == course.id) {
            Some(existing) => *existing = course,
            None => self.courses.push(course),
        }
    }

    /// Remove a course and every question that belongs to it.
    pub fn delete_course(&mut self, course_id: &str) -> Result<(), CatalogError> {
        let before = self.courses.len();
        self.courses.retain(|c| c.id != course_id);
        if self.courses.len() == before {
            return Err(CatalogError::CourseNotFound(course_id.to_string()));
        }
        self.questions.retain(|q| q.course_id != course_id);
        Ok(())
    }

    pub fn save_question(&mut self, question: Question) -> Result<(), CatalogError> {
        if self.course(&question.course_id).is_none() {
            return Err(CatalogError::UnknownCourse(question.course_id));
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&question.difficulty) {
            return Err(CatalogError::InvalidDifficulty {
                id: question.id,
                difficulty: question.difficulty,
            });
        }
        if question.target_time == 0 {
            return Err(CatalogError::ZeroTargetTime(question.id));
        }

        match self.questions.iter_mut().find(|q| q.id == question.id) {
            Some(existing) => *existing = question,
            None => self.questions.push(question),
        }
        Ok(())
    }

    pub fn delete_question(&mut self, question_id: &str) -> Result<(), CatalogError> {
        let before = self.questions.len();
        self.questions.retain(|q| q.id != question_id);
        if self.questions.len() == before {
            return Err(CatalogError::QuestionNotFound(question_id.to_string()));
        }
        Ok(())
    }

    pub fn question_count(&self, course_id: &str) -> usize {
        self.questions
            .iter()
            .filter(|q| q.course_id == course_id)
            .count()
    }
}

impl QuestionSource for QuestionBank {
    fn questions_by_course(&self, course_id: &str) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.course_id == course_id)
            .collect()
    }

    fn questions_by_difficulty(&self, course_id: &str, difficulty: u32) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.course_id == course_id && q.difficulty == difficulty)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, course_id: &str, difficulty: u32) -> Question {
        Question {
            id: id.to_string(),
            course_id: course_id.to_string(),
            statement: format!("statement {id}"),
            options: Vec::new(),
            correct_answer: "42".to_string(),
            difficulty,
            target_time: 30,
        }
    }

    fn course(id: &str) -> Course {
        Course {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: String::new(),
            chapters: Vec::new(),
        }
    }

    #[test]
    fn test_bundled_catalog_is_consistent() {
        let bank = QuestionBank::bundled().unwrap();
        assert!(!bank.courses.is_empty());
        assert!(!bank.questions.is_empty());
        for q in &bank.questions {
            assert!(bank.course(&q.course_id).is_some(), "orphan question {}", q.id);
            assert!((1..=10).contains(&q.difficulty), "{} difficulty", q.id);
            assert!(q.target_time > 0, "{} target time", q.id);
        }
    }

    #[test]
    fn test_bundled_question_ids_are_unique() {
        let bank = QuestionBank::bundled().unwrap();
        let mut ids: Vec<&str> = bank.questions.iter().map(|q| q.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), bank.questions.len());
    }

    #[test]
    fn test_save_question_upserts() {
        let mut bank = QuestionBank::default();
        bank.save_course(course("math"));
        bank.save_question(question("q1", "math", 3)).unwrap();
        let mut edited = question("q1", "math", 4);
        edited.correct_answer = "7".to_string();
        bank.save_question(edited).unwrap();

        assert_eq!(bank.questions.len(), 1);
        assert_eq!(bank.question("q1").unwrap().difficulty, 4);
        assert_eq!(bank.question("q1").unwrap().correct_answer, "7");
    }

    #[test]
    fn test_save_question_rejects_bad_input() {
        let mut bank = QuestionBank::default();
        bank.save_course(course("math"));

        assert_eq!(
            bank.save_question(question("q1", "physics", 3)),
            Err(CatalogError::UnknownCourse("physics".to_string()))
        );
        assert!(matches!(
            bank.save_question(question("q2", "math", 11)),
            Err(CatalogError::InvalidDifficulty { difficulty: 11, .. })
        ));
        let mut zero = question("q3", "math", 2);
        zero.target_time = 0;
        assert_eq!(
            bank.save_question(zero),
            Err(CatalogError::ZeroTargetTime("q3".to_string()))
        );
        assert!(bank.questions.is_empty());
    }

    #[test]
    fn test_delete_course_cascades_to_questions() {
        let mut bank = QuestionBank::default();
        bank.save_course(course("math"));
        bank.save_course(course("art"));
        bank.save_question(question("m1", "math", 1)).unwrap();
        bank.save_question(question("m2", "math", 2)).unwrap();
        bank.save_question(question("a1", "art", 1)).unwrap();

        bank.delete_course("math").unwrap();

        assert!(bank.course("math").is_none());
        assert_eq!(bank.question_count("math"), 0);
        assert_eq!(bank.question_count("art"), 1);
        assert_eq!(
            bank.delete_course("math"),
            Err(CatalogError::CourseNotFound("math".to_string()))
        );
    }

    #[test]
    fn test_delete_question() {
        let mut bank = QuestionBank::default();
        bank.save_course(course("math"));
        bank.save_question(question("m1", "math", 1)).unwrap();
        bank.delete_question("m1").unwrap();
        assert!(bank.question("m1").is_none());
        assert!(bank.delete_question("m1").is_err());
    }

    #[test]
    fn test_source_queries_filter_by_course_and_difficulty() {
        let mut bank = QuestionBank::default();
        bank.save_course(course("math"));
        bank.save_course(course("art"));
        bank.save_question(question("m1", "math", 3)).unwrap();
        bank.save_question(question("m2", "math", 3)).unwrap();
        bank.save_question(question("m3", "math", 5)).unwrap();
        bank.save_question(question("a1", "art", 3)).unwrap();

        assert_eq!(bank.questions_by_course("math").len(), 3);
        let at_three: Vec<&str> = bank
            .questions_by_difficulty("math", 3)
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(at_three, vec!["m1", "m2"]);
        assert!(bank.questions_by_difficulty("math", 9).is_empty());
    }

    #[test]
    fn test_catalog_json_without_optional_fields() {
        let json = r#"{"courses":[{"id":"c","name":"C","description":""}],"questions":[]}"#;
        let bank: QuestionBank = serde_json::from_str(json).unwrap();
        assert!(bank.courses[0].chapters.is_empty());
    }
}
