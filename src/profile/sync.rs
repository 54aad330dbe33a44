//! Moves the profile between the local cache and the `students` row.
//!
//! The cache is authoritative until an explicit [`ProfileSync::publish`].
//! Nothing here runs implicitly: saving locally never touches the database and
//! the database only reaches the cache through [`ProfileSync::pull`].

use chrono::Local;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    core::{error::AppError, inflight::InFlight, utils::non_blank},
    model::student::{Student, StudentProfileUpdate},
    repository::student::{
        create_student_if_absent, get_single_student_by_user_id, update_student_profile,
    },
    service::{FacadeCore, Status},
};

use super::{cache::ProfileCache, store::KeyValueStore, ProfileData};

impl From<&ProfileData> for StudentProfileUpdate {
    fn from(profile: &ProfileData) -> Self {
        Self {
            name: non_blank(&profile.name),
            school: non_blank(&profile.school),
            major: non_blank(&profile.major),
            minor: non_blank(&profile.minor),
            gpa: non_blank(&profile.gpa),
            certifications: Some(profile.certifications.clone()),
            projects: non_blank(&profile.projects),
        }
    }
}

impl From<&Student> for ProfileData {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone().unwrap_or_default(),
            school: student.school.clone().unwrap_or_default(),
            major: student.major.clone().unwrap_or_default(),
            minor: student.minor.clone().unwrap_or_default(),
            gpa: student.gpa.clone().unwrap_or_default(),
            certifications: student.certifications.clone().unwrap_or_default(),
            projects: student.projects.clone().unwrap_or_default(),
        }
    }
}

pub struct ProfileSync<S: KeyValueStore> {
    core: FacadeCore,
    cache: ProfileCache<S>,
}

impl<S: KeyValueStore> ProfileSync<S> {
    pub fn new(db: PgPool, inflight: InFlight, user_id: Option<Uuid>, store: S) -> Self {
        Self {
            core: FacadeCore::new(db, inflight, user_id),
            cache: ProfileCache::new(store),
        }
    }

    pub fn status(&self) -> Status {
        self.core.status()
    }

    pub fn error(&self) -> Option<String> {
        self.core.error()
    }

    pub fn save_local(&self, profile: &ProfileData) {
        self.cache.save(profile);
    }

    pub fn load_local(&self) -> Option<ProfileData> {
        self.cache.load()
    }

    /// Create the student row of the session's user if it does not exist yet.
    /// Calling it again returns the existing row.
    pub async fn provision_student(&self) -> Result<Student, String> {
        self.core
            .run("provision_student", self.try_provision_student())
            .await
    }

    async fn try_provision_student(&self) -> Result<Student, AppError> {
        let user_id = self.core.user_id()?;
        let now = Local::now().fixed_offset();
        let mut tx = self.core.db().begin().await?;
        let student = create_student_if_absent(&mut tx, &user_id, &now).await?;
        tx.commit().await?;
        Ok(student)
    }

    /// Write the cached profile onto the student row. The row must already
    /// exist; see [`ProfileSync::provision_student`].
    pub async fn publish(&self) -> Result<Student, String> {
        self.core.run("publish_profile", self.try_publish()).await
    }

    async fn try_publish(&self) -> Result<Student, AppError> {
        let user_id = self.core.user_id()?;
        let profile = self
            .cache
            .load()
            .ok_or_else(|| AppError::NotFound("cached profile".to_string()))?;
        let mut tx = self.core.db().begin().await?;
        let student = get_single_student_by_user_id(&mut tx, &user_id).await?;
        let student = update_student_profile(&mut tx, &student.id, &(&profile).into()).await?;
        tx.commit().await?;
        Ok(student)
    }

    /// Replace the cached profile with the student row's values.
    pub async fn pull(&self) -> Result<ProfileData, String> {
        let profile = self.core.run("pull_profile", self.try_pull()).await?;
        self.cache.save(&profile);
        Ok(profile)
    }

    async fn try_pull(&self) -> Result<ProfileData, AppError> {
        let user_id = self.core.user_id()?;
        let mut tx = self.core.db().begin().await?;
        let student = get_single_student_by_user_id(&mut tx, &user_id).await?;
        tx.commit().await?;
        Ok(ProfileData::from(&student))
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::{core::test_utils::insert_user, profile::store::MemoryStore};

    fn sample_profile() -> ProfileData {
        ProfileData {
            name: "Alex Kim".to_string(),
            school: "Georgia Tech".to_string(),
            major: "Computer Science".to_string(),
            minor: "".to_string(),
            gpa: "3.8".to_string(),
            certifications: vec!["AWS Certified Developer".to_string(), "".to_string()],
            projects: "Built a rover".to_string(),
        }
    }

    #[test]
    fn test_profile_to_update_maps_blank_to_none() {
        let update = StudentProfileUpdate::from(&sample_profile());
        assert_eq!(update.name, Some("Alex Kim".to_string()));
        assert_eq!(update.minor, None);
        assert_eq!(
            update.certifications,
            Some(vec!["AWS Certified Developer".to_string(), "".to_string()])
        );
    }

    #[sqlx::test]
    async fn test_publish_without_student_row_is_not_found(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let mut db = pool.acquire().await?;
        let user = insert_user(&mut db, "student", "password").await?;
        let sync = ProfileSync::new(pool.clone(), InFlight::new(), Some(user.id), MemoryStore::new());
        sync.save_local(&sample_profile());

        // When
        let res = sync.publish().await;

        // Expect
        assert!(res.unwrap_err().contains("not found"));
        let count: (i64,) = sqlx::query_as("SELECT count(id) FROM public.students")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count.0, 0);
        Ok(())
    }

    #[sqlx::test]
    async fn test_publish_without_cache_is_not_found(pool: PgPool) -> anyhow::Result<()> {
        let mut db = pool.acquire().await?;
        let user = insert_user(&mut db, "student", "password").await?;
        let sync = ProfileSync::new(pool, InFlight::new(), Some(user.id), MemoryStore::new());

        let res = sync.publish().await;

        assert_eq!(res.unwrap_err(), "cached profile not found");
        Ok(())
    }

    #[sqlx::test]
    async fn test_provision_is_idempotent(pool: PgPool) -> anyhow::Result<()> {
        let mut db = pool.acquire().await?;
        let user = insert_user(&mut db, "student", "password").await?;
        let sync = ProfileSync::new(pool.clone(), InFlight::new(), Some(user.id), MemoryStore::new());

        let first = sync.provision_student().await.unwrap();
        let second = sync.provision_student().await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.user_id, user.id);
        let count: (i64,) = sqlx::query_as("SELECT count(id) FROM public.students WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&pool)
            .await?;
        assert_eq!(count.0, 1);
        Ok(())
    }

    #[sqlx::test]
    async fn test_provision_publish_pull(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let mut db = pool.acquire().await?;
        let user = insert_user(&mut db, "student", "password").await?;
        let store = MemoryStore::new();
        let sync = ProfileSync::new(pool.clone(), InFlight::new(), Some(user.id), store.clone());
        sync.save_local(&sample_profile());
        sync.provision_student().await.unwrap();

        // When
        let published = sync.publish().await.unwrap();

        // Expect
        assert_eq!(published.name, Some("Alex Kim".to_string()));
        assert_eq!(published.minor, None);
        assert_eq!(published.gpa, Some("3.8".to_string()));

        // a local edit stays local until the next publish
        let mut edited = sample_profile();
        edited.gpa = "4.0".to_string();
        sync.save_local(&edited);
        let pulled = sync.pull().await.unwrap();
        assert_eq!(pulled.gpa, "3.8");
        assert_eq!(pulled.minor, "");
        assert_eq!(sync.load_local(), Some(pulled));
        assert!(sync.error().is_none());
        Ok(())
    }

    #[sqlx::test]
    async fn test_pull_unauthenticated_leaves_cache(pool: PgPool) -> anyhow::Result<()> {
        let sync = ProfileSync::new(pool, InFlight::new(), None, MemoryStore::new());
        sync.save_local(&sample_profile());

        let res = sync.pull().await;

        assert_eq!(res.unwrap_err(), "No authenticated user");
        assert_eq!(sync.load_local(), Some(sample_profile()));
        Ok(())
    }
}
