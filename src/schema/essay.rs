use poem_openapi::{payload::Json, types::multipart::Upload, ApiResponse, Multipart, Object};
use serde::{Deserialize, Serialize};

use crate::{
    core::utils::datetime_to_string,
    generation::{EssayFeedback, FeedbackScore},
    impl_failure_responses,
    model::essay_idea::{EssayIdea, NewEssayIdea},
    schema::common::{
        BadRequestResponse, ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};

#[derive(Object, Deserialize, Serialize, Clone)]
pub struct EssayIdeaRequest {
    pub title: String,
    pub description: String,
    pub personal_connection: String,
    #[oai(default)]
    pub key_points: Vec<String>,
    pub approach: String,
}

impl From<EssayIdeaRequest> for NewEssayIdea {
    fn from(req: EssayIdeaRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            personal_connection: req.personal_connection,
            key_points: req.key_points,
            approach: req.approach,
        }
    }
}

impl From<NewEssayIdea> for EssayIdeaRequest {
    fn from(idea: NewEssayIdea) -> Self {
        Self {
            title: idea.title,
            description: idea.description,
            personal_connection: idea.personal_connection,
            key_points: idea.key_points,
            approach: idea.approach,
        }
    }
}

#[derive(Object, Deserialize, Serialize, Clone)]
pub struct DetailEssayIdea {
    pub id: String,
    pub student_id: String,
    pub title: String,
    pub description: String,
    pub personal_connection: String,
    pub key_points: Vec<String>,
    pub approach: String,
    pub created_at: String,
}

impl From<EssayIdea> for DetailEssayIdea {
    fn from(idea: EssayIdea) -> Self {
        Self {
            id: idea.id.to_string(),
            student_id: idea.student_id.to_string(),
            title: idea.title,
            description: idea.description,
            personal_connection: idea.personal_connection,
            key_points: idea.key_points,
            approach: idea.approach,
            created_at: datetime_to_string(idea.created_at),
        }
    }
}

#[derive(ApiResponse)]
pub enum GetEssayIdeaResponses {
    #[oai(status = 200)]
    Ok(Json<Vec<DetailEssayIdea>>),

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
impl_failure_responses!(GetEssayIdeaResponses);

#[derive(ApiResponse)]
pub enum CreateEssayIdeaResponses {
    #[oai(status = 201)]
    Created(Json<DetailEssayIdea>),

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
impl_failure_responses!(CreateEssayIdeaResponses);

#[derive(Object, Deserialize, Serialize)]
pub struct GenerateEssayIdeaRequest {
    pub prompt: String,
}

#[derive(ApiResponse)]
pub enum GenerateEssayIdeaResponses {
    #[oai(status = 200)]
    Ok(Json<Vec<EssayIdeaRequest>>),

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
impl_failure_responses!(GenerateEssayIdeaResponses);

#[derive(Multipart)]
pub struct EssayReviewRequest {
    pub file: Upload,
}

#[derive(Object, Deserialize, Serialize)]
pub struct DetailFeedbackScore {
    pub category: String,
    pub score: u8,
    pub description: String,
}

impl From<FeedbackScore> for DetailFeedbackScore {
    fn from(score: FeedbackScore) -> Self {
        Self {
            category: score.category,
            score: score.score,
            description: score.description,
        }
    }
}

#[derive(Object, Deserialize, Serialize)]
pub struct EssayFeedbackResponse {
    pub scores: Vec<DetailFeedbackScore>,
    pub suggestions: Vec<String>,
}

impl From<EssayFeedback> for EssayFeedbackResponse {
    fn from(feedback: EssayFeedback) -> Self {
        Self {
            scores: feedback
                .scores
                .into_iter()
                .map(DetailFeedbackScore::from)
                .collect(),
            suggestions: feedback.suggestions,
        }
    }
}

#[derive(ApiResponse)]
pub enum EssayReviewResponses {
    #[oai(status = 200)]
    Ok(Json<EssayFeedbackResponse>),

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
impl_failure_responses!(EssayReviewResponses);

#[derive(Multipart)]
pub struct EssayUploadRequest {
    pub essay_name: String,
    pub file: Upload,
}

#[derive(Object, Deserialize, Serialize)]
pub struct EssayUploadResponse {
    pub url: String,
}

#[derive(ApiResponse)]
pub enum EssayUploadResponses {
    #[oai(status = 200)]
    Ok(Json<EssayUploadResponse>),

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
impl_failure_responses!(EssayUploadResponses);
