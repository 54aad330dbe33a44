use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::{
    core::utils::datetime_to_string,
    impl_failure_responses,
    model::outreach_log::OutreachLogDetail,
    schema::{
        common::{
            BadRequestResponse, ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
            UnauthorizedResponse,
        },
        lab::{DetailLab, DetailProfessor},
    },
};

#[derive(Object, Deserialize, Serialize, Clone)]
pub struct DetailOutreachLog {
    pub id: String,
    pub student_id: String,
    pub lab_id: String,
    pub professor_id: String,
    pub message: String,
    pub sent_at: String,
    pub lab: Option<DetailLab>,
    pub professor: Option<DetailProfessor>,
}

impl From<OutreachLogDetail> for DetailOutreachLog {
    fn from(detail: OutreachLogDetail) -> Self {
        let log = detail.log;
        Self {
            id: log.id.to_string(),
            student_id: log.student_id.to_string(),
            lab_id: log.lab_id.to_string(),
            professor_id: log.professor_id.to_string(),
            message: log.message,
            sent_at: datetime_to_string(log.sent_at),
            lab: detail.lab.map(DetailLab::from),
            professor: detail.professor.map(DetailProfessor::from),
        }
    }
}

#[derive(ApiResponse)]
pub enum GetOutreachLogResponses {
    #[oai(status = 200)]
    Ok(Json<Vec<DetailOutreachLog>>),

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
impl_failure_responses!(GetOutreachLogResponses);

#[derive(Object, Deserialize, Serialize)]
pub struct CreateOutreachLogRequest {
    pub lab_id: String,
    pub professor_id: String,
    pub message: String,
}

#[derive(ApiResponse)]
pub enum CreateOutreachLogResponses {
    #[oai(status = 201)]
    Created(Json<DetailOutreachLog>),

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
impl_failure_responses!(CreateOutreachLogResponses);

#[derive(Object, Deserialize, Serialize)]
pub struct DraftEmailRequest {
    pub lab_id: String,
    pub professor_id: String,
}

#[derive(Object, Deserialize, Serialize)]
pub struct DraftEmailResponse {
    pub email: String,
}

#[derive(ApiResponse)]
pub enum DraftEmailResponses {
    #[oai(status = 200)]
    Ok(Json<DraftEmailResponse>),

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
impl_failure_responses!(DraftEmailResponses);
