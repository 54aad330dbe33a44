use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::{
    core::security::BearerAuthorization,
    generation::EssayDocument,
    model::essay_idea::NewEssayIdea,
    profile::{cache::ProfileCache, store::RedisStore},
    schema::{
        common::FailureResponses,
        essay::{
            CreateEssayIdeaResponses, DetailEssayIdea, EssayFeedbackResponse, EssayIdeaRequest,
            EssayReviewRequest, EssayReviewResponses, EssayUploadRequest, EssayUploadResponse,
            EssayUploadResponses, GenerateEssayIdeaRequest, GenerateEssayIdeaResponses,
            GetEssayIdeaResponses,
        },
    },
    service::essay_idea::EssayIdeas,
    storage::upload_essay,
    AppState,
};

use super::authenticate;

#[derive(Tags)]
enum ApiEssayTags {
    Essay,
}

pub struct ApiEssay;

#[OpenApi]
impl ApiEssay {
    /// Saved essay ideas, newest first
    #[oai(path = "/essay/idea/", method = "get", tag = "ApiEssayTags::Essay")]
    async fn get_essay_idea_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> GetEssayIdeaResponses {
        let user = match authenticate(&state, auth, "route.essay", "get_essay_idea_api").await {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        let essay_ideas = EssayIdeas::new(state.db.clone(), state.inflight.clone(), Some(user.id));
        let ideas = essay_ideas.fetch_essay_ideas().await;
        let status = essay_ideas.status();
        if let Some(message) = status.error {
            return GetEssayIdeaResponses::from_failure(
                status.error_kind,
                message,
                "route.essay",
                "get_essay_idea_api",
            );
        }
        GetEssayIdeaResponses::Ok(Json(ideas.into_iter().map(DetailEssayIdea::from).collect()))
    }

    #[oai(path = "/essay/idea/", method = "post", tag = "ApiEssayTags::Essay")]
    async fn create_essay_idea_api(
        &self,
        json: Json<EssayIdeaRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> CreateEssayIdeaResponses {
        let user = match authenticate(&state, auth, "route.essay", "create_essay_idea_api").await
        {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        let essay_ideas = EssayIdeas::new(state.db.clone(), state.inflight.clone(), Some(user.id));
        let idea = NewEssayIdea::from(json.0);
        match essay_ideas.save_essay_idea(&idea).await {
            Ok(saved) => CreateEssayIdeaResponses::Created(Json(saved.into())),
            Err(message) => CreateEssayIdeaResponses::from_failure(
                essay_ideas.status().error_kind,
                message,
                "route.essay",
                "create_essay_idea_api",
            ),
        }
    }

    /// Brainstorm ideas for a prompt. Nothing is saved.
    #[oai(
        path = "/essay/idea/generate",
        method = "post",
        tag = "ApiEssayTags::Essay"
    )]
    async fn generate_essay_idea_api(
        &self,
        json: Json<GenerateEssayIdeaRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> GenerateEssayIdeaResponses {
        let user =
            match authenticate(&state, auth, "route.essay", "generate_essay_idea_api").await {
                Ok(val) => val,
                Err(resp) => return resp,
            };
        let profile = ProfileCache::new(RedisStore::new(
            state.redis_conn.clone(),
            &user.id.to_string(),
        ))
        .load();
        match state
            .idea_generator
            .generate_ideas(&json.prompt, profile.as_ref())
            .await
        {
            Ok(ideas) => GenerateEssayIdeaResponses::Ok(Json(
                ideas.into_iter().map(EssayIdeaRequest::from).collect(),
            )),
            Err(err) => GenerateEssayIdeaResponses::from_failure(
                Some(err.kind()),
                err.to_string(),
                "route.essay",
                "generate_essay_idea_api",
            ),
        }
    }

    #[oai(path = "/essay/review", method = "post", tag = "ApiEssayTags::Essay")]
    async fn review_essay_api(
        &self,
        form: EssayReviewRequest,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> EssayReviewResponses {
        if let Err(resp) =
            authenticate::<EssayReviewResponses>(&state, auth, "route.essay", "review_essay_api")
                .await
        {
            return resp;
        }
        let file_name = form.file.file_name().unwrap_or("essay").to_string();
        let content_type = form.file.content_type().unwrap_or_default().to_string();
        let bytes = match form.file.into_vec().await {
            Ok(val) => val,
            Err(err) => {
                return EssayReviewResponses::bad_request(format!("unreadable upload: {}", err))
            }
        };
        let essay = EssayDocument {
            file_name,
            content_type,
            bytes,
        };
        match state.essay_grader.grade(&essay).await {
            Ok(feedback) => EssayReviewResponses::Ok(Json(EssayFeedbackResponse::from(feedback))),
            Err(err) => EssayReviewResponses::from_failure(
                Some(err.kind()),
                err.to_string(),
                "route.essay",
                "review_essay_api",
            ),
        }
    }

    #[oai(path = "/essay/upload", method = "post", tag = "ApiEssayTags::Essay")]
    async fn upload_essay_api(
        &self,
        form: EssayUploadRequest,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> EssayUploadResponses {
        let user = match authenticate(&state, auth, "route.essay", "upload_essay_api").await {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        let bytes = match form.file.into_vec().await {
            Ok(val) => val,
            Err(err) => {
                return EssayUploadResponses::bad_request(format!("unreadable upload: {}", err))
            }
        };
        match upload_essay(state.object_store.as_ref(), &bytes, &user.id, &form.essay_name).await
        {
            Ok(url) => EssayUploadResponses::Ok(Json(EssayUploadResponse { url })),
            Err(err) => EssayUploadResponses::from_failure(
                Some(err.kind()),
                err.to_string(),
                "route.essay",
                "upload_essay_api",
            ),
        }
    }
}
