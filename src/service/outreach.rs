use std::sync::Mutex;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    core::{error::AppError, inflight::InFlight},
    model::{
        lab::Lab,
        outreach_log::{OutreachLog, OutreachLogDetail},
        professor::Professor,
    },
    repository::{
        lab::{get_all_lab, get_lab_by_id, get_lab_by_school},
        outreach_log::{create_outreach_log, get_outreach_log_detail_by_student},
        professor::{get_professor_by_id, get_professor_by_lab},
        student::get_single_student_by_user_id,
    },
};

use super::{FacadeCore, Status};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutreachState {
    pub outreach_logs: Vec<OutreachLogDetail>,
    pub labs: Vec<Lab>,
    pub professors: Vec<Professor>,
}

/// Research outreach data of one session: the student's outreach history and
/// the labs/professors it can target.
pub struct LabOutreach {
    core: FacadeCore,
    state: Mutex<OutreachState>,
}

impl LabOutreach {
    pub fn new(db: PgPool, inflight: InFlight, user_id: Option<Uuid>) -> Self {
        Self {
            core: FacadeCore::new(db, inflight, user_id),
            state: Mutex::new(OutreachState::default()),
        }
    }

    pub fn state(&self) -> OutreachState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
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

    /// Outreach history of the session's student, newest first. Empty on
    /// failure, with the reason left in [`LabOutreach::error`].
    pub async fn fetch_outreach_logs(&self) -> Vec<OutreachLogDetail> {
        match self
            .core
            .run("fetch_outreach_logs", self.try_fetch_outreach_logs())
            .await
        {
            Ok(logs) => {
                self.update(|state| state.outreach_logs = logs.clone());
                logs
            }
            Err(_) => vec![],
        }
    }

    async fn try_fetch_outreach_logs(&self) -> Result<Vec<OutreachLogDetail>, AppError> {
        let user_id = self.core.user_id()?;
        let mut tx = self.core.db().begin().await?;
        let student = get_single_student_by_user_id(&mut tx, &user_id).await?;
        let logs = get_outreach_log_detail_by_student(&mut tx, &student.id).await?;
        tx.commit().await?;
        Ok(logs)
    }

    /// Every lab, by name. Needs no session.
    pub async fn fetch_labs(&self) -> Vec<Lab> {
        self.load_labs("fetch_labs", None).await
    }

    /// Labs of one school, by name.
    pub async fn fetch_labs_by_school(&self, school: &str) -> Vec<Lab> {
        self.load_labs("fetch_labs_by_school", Some(school)).await
    }

    async fn load_labs(&self, operation: &str, school: Option<&str>) -> Vec<Lab> {
        let fut = async {
            let mut tx = self.core.db().begin().await?;
            let labs = match school {
                Some(school) => get_lab_by_school(&mut tx, school).await?,
                None => get_all_lab(&mut tx).await?,
            };
            tx.commit().await?;
            Ok::<_, AppError>(labs)
        };
        match self.core.run(operation, fut).await {
            Ok(labs) => {
                self.update(|state| state.labs = labs.clone());
                labs
            }
            Err(_) => vec![],
        }
    }

    /// Professors of `lab_id`, by name.
    pub async fn fetch_professors(&self, lab_id: &Uuid) -> Vec<Professor> {
        let fut = async {
            let mut tx = self.core.db().begin().await?;
            let professors = get_professor_by_lab(&mut tx, lab_id).await?;
            tx.commit().await?;
            Ok::<_, AppError>(professors)
        };
        match self.core.run("fetch_professors", fut).await {
            Ok(professors) => {
                self.update(|state| state.professors = professors.clone());
                professors
            }
            Err(_) => vec![],
        }
    }

    /// Record one contact attempt. On success the new row goes to the front
    /// of the in-memory history; on failure the history is left as it was.
    pub async fn log_outreach(
        &self,
        lab_id: &Uuid,
        professor_id: &Uuid,
        message: &str,
    ) -> Result<OutreachLog, String> {
        let detail = self
            .core
            .run(
                "log_outreach",
                self.try_log_outreach(lab_id, professor_id, message),
            )
            .await?;
        let log = detail.log.clone();
        self.update(|state| state.outreach_logs.insert(0, detail));
        Ok(log)
    }

    async fn try_log_outreach(
        &self,
        lab_id: &Uuid,
        professor_id: &Uuid,
        message: &str,
    ) -> Result<OutreachLogDetail, AppError> {
        let user_id = self.core.user_id()?;
        let mut tx = self.core.db().begin().await?;
        let student = get_single_student_by_user_id(&mut tx, &user_id).await?;
        let lab = get_lab_by_id(&mut tx, lab_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("lab {}", lab_id)))?;
        let professor = get_professor_by_id(&mut tx, professor_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("professor {}", professor_id)))?;
        if professor.lab_id != lab.id {
            return Err(AppError::InvalidInput(format!(
                "professor {} is not part of lab {}",
                professor.id, lab.id
            )));
        }
        let log = create_outreach_log(&mut tx, &student.id, lab_id, professor_id, message).await?;
        tx.commit().await?;
        Ok(OutreachLogDetail {
            log,
            lab: Some(lab),
            professor: Some(professor),
        })
    }

    fn update<F: FnOnce(&mut OutreachState)>(&self, f: F) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};
    use sqlx::PgPool;
    use uuid::Uuid;

    use super::*;
    use crate::{
        core::{
            error::ErrorKind,
            inflight::{operation_key, InFlight},
            test_utils::{insert_student, insert_user},
        },
        factory::{lab::LabFactory, professor::ProfessorFactory},
        model::{lab::Lab, professor::Professor},
    };

    #[sqlx::test]
    async fn test_fetch_outreach_logs_unauthenticated(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let outreach = LabOutreach::new(pool, InFlight::new(), None);

        // When
        let logs = outreach.fetch_outreach_logs().await;

        // Expect
        assert!(logs.is_empty());
        assert!(!outreach.loading());
        assert_eq!(outreach.error(), Some("No authenticated user".to_string()));
        Ok(())
    }

    #[sqlx::test]
    async fn test_fetch_outreach_logs_without_student(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let mut db = pool.acquire().await?;
        let user = insert_user(&mut db, "no_student", "password").await?;
        let outreach = LabOutreach::new(pool, InFlight::new(), Some(user.id));

        // When
        let logs = outreach.fetch_outreach_logs().await;

        // Expect
        assert!(logs.is_empty());
        assert!(!outreach.loading());
        assert!(outreach.error().unwrap().contains("not found"));
        Ok(())
    }

    #[sqlx::test]
    async fn test_fetch_outreach_logs_newest_first(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let mut db = pool.acquire().await?;
        let user = insert_user(&mut db, "student", "password").await?;
        let student = insert_student(&mut db, &user.id).await?;
        let lab = LabFactory::<()>::new().generate_one(&pool, ()).await?;
        let mut professor_factory = ProfessorFactory::<Uuid>::new();
        professor_factory.modified_one(|data, lab_id| Professor {
            lab_id,
            ..data.clone()
        });
        let professor = professor_factory.generate_one(&pool, lab.id).await?;
        let now = Local::now().fixed_offset();
        for (message, age) in [("older", 2), ("newest", 0), ("middle", 1)] {
            sqlx::query(
                r#"INSERT INTO public.outreach_logs (id, student_id, lab_id, professor_id, message, sent_at)
                VALUES ($1, $2, $3, $4, $5, $6)"#,
            )
            .bind(Uuid::now_v7())
            .bind(student.id)
            .bind(lab.id)
            .bind(professor.id)
            .bind(message)
            .bind(now - Duration::hours(age))
            .execute(&mut *db)
            .await?;
        }
        let outreach = LabOutreach::new(pool, InFlight::new(), Some(user.id));

        // When
        let logs = outreach.fetch_outreach_logs().await;

        // Expect
        let messages: Vec<&str> = logs.iter().map(|x| x.log.message.as_str()).collect();
        assert_eq!(messages, vec!["newest", "middle", "older"]);
        assert_eq!(logs[0].lab.as_ref().unwrap().name, lab.name);
        assert_eq!(logs[0].professor.as_ref().unwrap().email, professor.email);
        assert_eq!(outreach.state().outreach_logs, logs);
        assert!(!outreach.loading());
        assert!(outreach.error().is_none());
        Ok(())
    }

    #[sqlx::test]
    async fn test_fetch_labs_sorted_by_name(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let mut lab_factory = LabFactory::<()>::new();
        lab_factory.modified_many(|data, idx, _| Lab {
            name: ["Robotics Lab", "Biomedical Lab", "Machine Learning Lab"][idx].to_string(),
            ..data.clone()
        });
        lab_factory.generate_many(&pool, 3, ()).await?;
        let outreach = LabOutreach::new(pool, InFlight::new(), None);

        // When
        let labs = outreach.fetch_labs().await;

        // Expect
        let names: Vec<&str> = labs.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Biomedical Lab", "Machine Learning Lab", "Robotics Lab"]
        );
        assert_eq!(outreach.state().labs.len(), 3);
        Ok(())
    }

    #[sqlx::test]
    async fn test_fetch_labs_by_school(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let mut lab_factory = LabFactory::<()>::new();
        lab_factory.modified_many(|data, idx, _| Lab {
            school: if idx % 2 == 0 { "gt" } else { "mit" }.to_string(),
            ..data.clone()
        });
        lab_factory.generate_many(&pool, 4, ()).await?;
        let outreach = LabOutreach::new(pool, InFlight::new(), None);

        // When
        let labs = outreach.fetch_labs_by_school("gt").await;

        // Expect
        assert_eq!(labs.len(), 2);
        assert!(labs.iter().all(|x| x.school == "gt"));
        Ok(())
    }

    #[sqlx::test]
    async fn test_fetch_professors_scoped_and_sorted(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let mut lab_factory = LabFactory::<()>::new();
        let labs = lab_factory.generate_many(&pool, 2, ()).await?;
        let (lab1, lab2) = (labs[0].clone(), labs[1].clone());
        let mut professor_factory = ProfessorFactory::<Uuid>::new();
        professor_factory.modified_many(|data, idx, lab_id| Professor {
            lab_id,
            name: ["Z", "A"][idx].to_string(),
            ..data.clone()
        });
        professor_factory.generate_many(&pool, 2, lab2.id).await?;
        professor_factory.modified_one(|data, lab_id| Professor {
            lab_id,
            name: "M".to_string(),
            ..data.clone()
        });
        professor_factory.generate_one(&pool, lab1.id).await?;
        let outreach = LabOutreach::new(pool, InFlight::new(), None);

        // When
        let professors = outreach.fetch_professors(&lab2.id).await;

        // Expect
        let names: Vec<&str> = professors.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(names, vec!["A", "Z"]);
        assert!(professors.iter().all(|x| x.lab_id == lab2.id));
        Ok(())
    }

    #[sqlx::test]
    async fn test_log_outreach_prepends_one_record(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let mut db = pool.acquire().await?;
        let user = insert_user(&mut db, "student", "password").await?;
        insert_student(&mut db, &user.id).await?;
        let lab = LabFactory::<()>::new().generate_one(&pool, ()).await?;
        let mut professor_factory = ProfessorFactory::<Uuid>::new();
        professor_factory.modified_one(|data, lab_id| Professor {
            lab_id,
            ..data.clone()
        });
        let professor = professor_factory.generate_one(&pool, lab.id).await?;
        let outreach = LabOutreach::new(pool.clone(), InFlight::new(), Some(user.id));
        outreach.log_outreach(&lab.id, &professor.id, "first").await.unwrap();
        outreach.log_outreach(&lab.id, &professor.id, "second").await.unwrap();
        let before = outreach.state().outreach_logs;

        // When
        let res = outreach.log_outreach(&lab.id, &professor.id, "Hello").await;

        // Expect
        let log = res.unwrap();
        assert_eq!(log.lab_id, lab.id);
        assert_eq!(log.professor_id, professor.id);
        assert_eq!(log.message, "Hello");
        let after = outreach.state().outreach_logs;
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[0].log, log);
        assert_eq!(&after[1..], &before[..]);
        assert!(!outreach.loading());
        let stored: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM public.outreach_logs WHERE id = $1")
                .bind(log.id)
                .fetch_optional(&pool)
                .await?;
        assert!(stored.is_some());
        Ok(())
    }

    #[sqlx::test]
    async fn test_log_outreach_failure_keeps_state(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let mut db = pool.acquire().await?;
        let user = insert_user(&mut db, "student", "password").await?;
        insert_student(&mut db, &user.id).await?;
        let outreach = LabOutreach::new(pool, InFlight::new(), Some(user.id));
        let before = outreach.state();

        // When
        let res = outreach
            .log_outreach(&Uuid::now_v7(), &Uuid::now_v7(), "Hello")
            .await;

        // Expect
        assert!(res.is_err());
        assert_eq!(outreach.error(), Some(res.unwrap_err()));
        assert_eq!(outreach.status().error_kind, Some(ErrorKind::NotFound));
        assert_eq!(outreach.state(), before);
        assert!(!outreach.loading());
        Ok(())
    }

    #[sqlx::test]
    async fn test_log_outreach_rejects_professor_of_other_lab(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let mut db = pool.acquire().await?;
        let user = insert_user(&mut db, "student", "password").await?;
        insert_student(&mut db, &user.id).await?;
        let labs = LabFactory::<()>::new().generate_many(&pool, 2, ()).await?;
        let mut professor_factory = ProfessorFactory::<Uuid>::new();
        professor_factory.modified_one(|data, lab_id| Professor {
            lab_id,
            ..data.clone()
        });
        let professor = professor_factory.generate_one(&pool, labs[1].id).await?;
        let outreach = LabOutreach::new(pool.clone(), InFlight::new(), Some(user.id));

        // When
        let res = outreach
            .log_outreach(&labs[0].id, &professor.id, "Hello")
            .await;

        // Expect
        assert!(res.unwrap_err().contains("is not part of lab"));
        assert_eq!(outreach.status().error_kind, Some(ErrorKind::InvalidInput));
        assert!(outreach.state().outreach_logs.is_empty());
        let count: (i64,) = sqlx::query_as("SELECT count(id) FROM public.outreach_logs")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count.0, 0);
        Ok(())
    }

    #[sqlx::test]
    async fn test_log_outreach_rejected_while_in_flight(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let user_id = Uuid::now_v7();
        let inflight = InFlight::new();
        let _held = inflight
            .try_acquire(&operation_key("log_outreach", Some(&user_id)))
            .unwrap();
        let outreach = LabOutreach::new(pool, inflight, Some(user_id));

        // When
        let res = outreach
            .log_outreach(&Uuid::now_v7(), &Uuid::now_v7(), "Hello")
            .await;

        // Expect
        assert_eq!(res.unwrap_err(), "log_outreach is already in progress");
        assert!(outreach.state().outreach_logs.is_empty());
        assert!(!outreach.loading());
        Ok(())
    }
}
