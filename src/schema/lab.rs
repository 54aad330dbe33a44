use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::{
    core::utils::datetime_to_string,
    impl_failure_responses,
    model::{lab::Lab, professor::Professor},
    schema::common::{
        BadRequestResponse, ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};

#[derive(Object, Deserialize, Serialize, Clone)]
pub struct DetailLab {
    pub id: String,
    pub school: String,
    pub name: String,
    pub research_area: String,
    pub description: String,
    pub created_at: String,
}

impl From<Lab> for DetailLab {
    fn from(lab: Lab) -> Self {
        Self {
            id: lab.id.to_string(),
            school: lab.school,
            name: lab.name,
            research_area: lab.research_area,
            description: lab.description,
            created_at: datetime_to_string(lab.created_at),
        }
    }
}

#[derive(Object, Deserialize, Serialize, Clone)]
pub struct DetailProfessor {
    pub id: String,
    pub lab_id: String,
    pub name: String,
    pub email: String,
    pub title: String,
}

impl From<Professor> for DetailProfessor {
    fn from(professor: Professor) -> Self {
        Self {
            id: professor.id.to_string(),
            lab_id: professor.lab_id.to_string(),
            name: professor.name,
            email: professor.email,
            title: professor.title,
        }
    }
}

#[derive(ApiResponse)]
pub enum GetLabResponses {
    #[oai(status = 200)]
    Ok(Json<Vec<DetailLab>>),

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
impl_failure_responses!(GetLabResponses);

#[derive(ApiResponse)]
pub enum GetProfessorResponses {
    #[oai(status = 200)]
    Ok(Json<Vec<DetailProfessor>>),

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
impl_failure_responses!(GetProfessorResponses);
