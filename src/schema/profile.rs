use poem_openapi::{
    payload::Json,
    types::multipart::Upload,
    ApiResponse, Multipart, Object,
};
use serde::{Deserialize, Serialize};

use crate::{
    core::utils::datetime_to_string,
    impl_failure_responses,
    model::student::Student,
    profile::ProfileData,
    schema::common::{
        BadRequestResponse, ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};

#[derive(Object, Deserialize, Serialize, Clone)]
pub struct ProfileRequest {
    #[oai(default)]
    pub name: String,
    #[oai(default)]
    pub school: String,
    #[oai(default)]
    pub major: String,
    #[oai(default)]
    pub minor: String,
    #[oai(default)]
    pub gpa: String,
    #[oai(default)]
    pub certifications: Vec<String>,
    #[oai(default)]
    pub projects: String,
}

impl From<ProfileRequest> for ProfileData {
    fn from(req: ProfileRequest) -> Self {
        Self {
            name: req.name,
            school: req.school,
            major: req.major,
            minor: req.minor,
            gpa: req.gpa,
            certifications: req.certifications,
            projects: req.projects,
        }
    }
}

#[derive(Object, Deserialize, Serialize)]
pub struct ProfileResponse {
    pub name: String,
    pub school: String,
    pub major: String,
    pub minor: String,
    pub gpa: String,
    pub certifications: Vec<String>,
    pub projects: String,
    pub has_profile_data: bool,
    pub certification_badges: Vec<String>,
}

impl From<ProfileData> for ProfileResponse {
    fn from(profile: ProfileData) -> Self {
        let has_profile_data = profile.has_profile_data();
        let certification_badges = profile
            .certification_badges()
            .into_iter()
            .map(|x| x.to_string())
            .collect();
        Self {
            name: profile.name,
            school: profile.school,
            major: profile.major,
            minor: profile.minor,
            gpa: profile.gpa,
            certifications: profile.certifications,
            projects: profile.projects,
            has_profile_data,
            certification_badges,
        }
    }
}

#[derive(ApiResponse)]
pub enum ProfileResponses {
    #[oai(status = 200)]
    Ok(Json<ProfileResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 409)]
    Conflict(Json<ConflictResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
impl_failure_responses!(ProfileResponses);

#[derive(Object, Deserialize, Serialize)]
pub struct StudentResponse {
    pub id: String,
    pub user_id: String,
    pub name: Option<String>,
    pub school: Option<String>,
    pub major: Option<String>,
    pub minor: Option<String>,
    pub gpa: Option<String>,
    pub resume_url: Option<String>,
    pub certifications: Vec<String>,
    pub projects: Option<String>,
    pub created_at: String,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id.to_string(),
            user_id: student.user_id.to_string(),
            name: student.name,
            school: student.school,
            major: student.major,
            minor: student.minor,
            gpa: student.gpa,
            resume_url: student.resume_url,
            certifications: student.certifications.unwrap_or_default(),
            projects: student.projects,
            created_at: datetime_to_string(student.created_at),
        }
    }
}

#[derive(ApiResponse)]
pub enum StudentResponses {
    #[oai(status = 200)]
    Ok(Json<StudentResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 409)]
    Conflict(Json<ConflictResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
impl_failure_responses!(StudentResponses);

#[derive(Multipart)]
pub struct ResumeUploadRequest {
    pub file: Upload,
}

#[derive(Object, Deserialize, Serialize)]
pub struct ResumeUrlResponse {
    pub resume_url: String,
}

#[derive(ApiResponse)]
pub enum ResumeUrlResponses {
    #[oai(status = 200)]
    Ok(Json<ResumeUrlResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 409)]
    Conflict(Json<ConflictResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
impl_failure_responses!(ResumeUrlResponses);
