use std::sync::Mutex;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    core::{error::AppError, inflight::InFlight},
    model::essay_idea::{EssayIdea, NewEssayIdea},
    repository::{
        essay_idea::{create_essay_idea, get_essay_idea_by_student},
        student::get_single_student_by_user_id,
    },
};

use super::{FacadeCore, Status};

/// Saved brainstorming results of one session's student.
pub struct EssayIdeas {
    core: FacadeCore,
    ideas: Mutex<Vec<EssayIdea>>,
}

impl EssayIdeas {
    pub fn new(db: PgPool, inflight: InFlight, user_id: Option<Uuid>) -> Self {
        Self {
            core: FacadeCore::new(db, inflight, user_id),
            ideas: Mutex::new(vec![]),
        }
    }

    pub fn ideas(&self) -> Vec<EssayIdea> {
        self.ideas.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn status(&self) -> Status {
        self.core.status()
    }

    pub fn loading(&self) -> bool {
        self.core.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.core.error()
    }

    /// Newest first. Empty on failure.
    pub async fn fetch_essay_ideas(&self) -> Vec<EssayIdea> {
        match self
            .core
            .run("fetch_essay_ideas", self.try_fetch_essay_ideas())
            .await
        {
            Ok(ideas) => {
                *self.ideas.lock().unwrap_or_else(|e| e.into_inner()) = ideas.clone();
                ideas
            }
            Err(_) => vec![],
        }
    }

    async fn try_fetch_essay_ideas(&self) -> Result<Vec<EssayIdea>, AppError> {
        let user_id = self.core.user_id()?;
        let mut tx = self.core.db().begin().await?;
        let student = get_single_student_by_user_id(&mut tx, &user_id).await?;
        let ideas = get_essay_idea_by_student(&mut tx, &student.id).await?;
        tx.commit().await?;
        Ok(ideas)
    }

    pub async fn save_essay_idea(&self, idea: &NewEssayIdea) -> Result<EssayIdea, String> {
        let saved = self
            .core
            .run("save_essay_idea", self.try_save_essay_idea(idea))
            .await?;
        self.ideas
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(0, saved.clone());
        Ok(saved)
    }

    async fn try_save_essay_idea(&self, idea: &NewEssayIdea) -> Result<EssayIdea, AppError> {
        let user_id = self.core.user_id()?;
        let mut tx = self.core.db().begin().await?;
        let student = get_single_student_by_user_id(&mut tx, &user_id).await?;
        let saved = create_essay_idea(&mut tx, &student.id, idea).await?;
        tx.commit().await?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};
    use sqlx::PgPool;
    use uuid::Uuid;

    use super::*;
    use crate::core::test_utils::{insert_student, insert_user};

    fn sample_idea(title: &str) -> NewEssayIdea {
        NewEssayIdea {
            title: title.to_string(),
            description: "Write about a project that changed your plans.".to_string(),
            personal_connection: "Your rover project.".to_string(),
            key_points: vec!["The question".to_string(), "The result".to_string()],
            approach: "Narrative".to_string(),
        }
    }

    #[sqlx::test]
    async fn test_fetch_essay_ideas_unauthenticated(pool: PgPool) -> anyhow::Result<()> {
        let ideas = EssayIdeas::new(pool, InFlight::new(), None);

        let res = ideas.fetch_essay_ideas().await;

        assert!(res.is_empty());
        assert!(!ideas.loading());
        assert_eq!(ideas.error(), Some("No authenticated user".to_string()));
        Ok(())
    }

    #[sqlx::test]
    async fn test_save_essay_idea_requires_student(pool: PgPool) -> anyhow::Result<()> {
        let mut db = pool.acquire().await?;
        let user = insert_user(&mut db, "no_student", "password").await?;
        let ideas = EssayIdeas::new(pool, InFlight::new(), Some(user.id));

        let res = ideas.save_essay_idea(&sample_idea("Bridging Two Worlds")).await;

        assert!(res.unwrap_err().contains("not found"));
        assert!(ideas.ideas().is_empty());
        Ok(())
    }

    #[sqlx::test]
    async fn test_save_then_fetch_essay_ideas(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let mut db = pool.acquire().await?;
        let user = insert_user(&mut db, "student", "password").await?;
        let student = insert_student(&mut db, &user.id).await?;
        let ideas = EssayIdeas::new(pool.clone(), InFlight::new(), Some(user.id));

        // When
        let first = ideas.save_essay_idea(&sample_idea("First")).await.unwrap();
        let second = ideas.save_essay_idea(&sample_idea("Second")).await.unwrap();

        // Expect
        assert_eq!(first.student_id, student.id);
        assert_eq!(second.key_points, vec!["The question", "The result"]);
        let titles: Vec<String> = ideas.ideas().into_iter().map(|x| x.title).collect();
        assert_eq!(titles, vec!["Second", "First"]);

        // older row written directly so ordering does not depend on insert timing
        sqlx::query(
            r#"INSERT INTO public.essay_ideas (id, student_id, title, description, personal_connection, key_points, approach, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(Uuid::now_v7())
        .bind(student.id)
        .bind("Oldest")
        .bind("")
        .bind("")
        .bind(Vec::<String>::new())
        .bind("")
        .bind(Local::now().fixed_offset() - Duration::days(30))
        .execute(&pool)
        .await?;
        let fetched = ideas.fetch_essay_ideas().await;
        assert_eq!(fetched.len(), 3);
        assert_eq!(fetched[2].title, "Oldest");
        assert_eq!(ideas.ideas(), fetched);
        assert!(ideas.error().is_none());
        Ok(())
    }
}
