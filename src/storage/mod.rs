//! File storage for resumes and essays.
//!
//! Objects live under `{bucket}/{owner}/{name}` and are reachable through a
//! public URL derived from that key alone, so the URL of an object is known
//! before and after the upload.

use std::path::PathBuf;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::{core::error::AppError, repository::student::update_student_resume_url};

const RESUME_FILE_NAME: &str = "resume.pdf";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bucket {
    Resumes,
    Essays,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Resumes => "resumes",
            Bucket::Essays => "essays",
        }
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` at `key`, replacing whatever was stored there.
    async fn put(&self, bucket: Bucket, key: &str, bytes: &[u8]) -> Result<(), AppError>;

    fn public_url(&self, bucket: Bucket, key: &str) -> String;
}

/// Object store on the local filesystem, rooted at `root`.
#[derive(Clone, Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn path_for(&self, bucket: Bucket, key: &str) -> PathBuf {
        let mut path = self.root.join(bucket.as_str());
        for segment in key.split('/') {
            path.push(segment);
        }
        path
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, bucket: Bucket, key: &str, bytes: &[u8]) -> Result<(), AppError> {
        let path = self.path_for(bucket, key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    fn public_url(&self, bucket: Bucket, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, bucket.as_str(), key)
    }
}

/// Trimmed `name` if it is usable as one key segment: not empty, no path
/// separator and not pointing outside the owner's folder.
fn key_segment(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(AppError::InvalidInput(format!(
            "object name '{}' is not allowed",
            name
        )));
    }
    Ok(name)
}

/// `{owner}/{name}`.
pub fn object_key(owner: &Uuid, name: &str) -> Result<String, AppError> {
    Ok(format!("{}/{}", owner, key_segment(name)?))
}

/// Path part of `public_base_url`, where the stored objects are served.
/// `None` when the base URL has no path of its own.
pub fn public_mount_path(public_base_url: &str) -> Option<String> {
    let rest = public_base_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(public_base_url);
    let path = rest.find('/').map(|idx| &rest[idx..]).unwrap_or("");
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}

pub fn get_resume_url<O: ObjectStore + ?Sized>(store: &O, user_id: &Uuid) -> Result<String, AppError> {
    let key = object_key(user_id, RESUME_FILE_NAME)?;
    Ok(store.public_url(Bucket::Resumes, &key))
}

/// Store the user's resume and point their student row at it.
///
/// The object write and the row update are not atomic: when the update fails
/// the new file stays in the bucket and the row keeps its old URL.
pub async fn upload_resume<O: ObjectStore + ?Sized>(
    store: &O,
    db: &PgPool,
    bytes: &[u8],
    user_id: &Uuid,
) -> Result<String, AppError> {
    let key = object_key(user_id, RESUME_FILE_NAME)?;
    store.put(Bucket::Resumes, &key, bytes).await?;
    let public_url = store.public_url(Bucket::Resumes, &key);

    let mut tx = db.begin().await?;
    let updated = match update_student_resume_url(&mut tx, user_id, &public_url).await {
        Ok(val) => val,
        Err(err) => {
            error!("resume stored at {} but student row not updated: {}", key, err);
            return Err(err.into());
        }
    };
    if updated == 0 {
        error!("resume stored at {} but user {} has no student row", key, user_id);
        return Err(AppError::NotFound(format!("student for user {}", user_id)));
    }
    tx.commit().await?;
    info!("resume uploaded for user {}", user_id);
    Ok(public_url)
}

/// Store an essay as `{essay_name}.pdf` in the user's essay folder.
pub async fn upload_essay<O: ObjectStore + ?Sized>(
    store: &O,
    bytes: &[u8],
    user_id: &Uuid,
    essay_name: &str,
) -> Result<String, AppError> {
    let essay_name = key_segment(essay_name)?;
    let key = object_key(user_id, &format!("{}.pdf", essay_name))?;
    store.put(Bucket::Essays, &key, bytes).await?;
    Ok(store.public_url(Bucket::Essays, &key))
}
