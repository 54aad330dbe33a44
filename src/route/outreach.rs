use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::{
    core::security::BearerAuthorization,
    model::outreach_log::OutreachLogDetail,
    profile::{cache::ProfileCache, store::RedisStore},
    repository::{lab::get_lab_by_id, professor::get_professor_by_id},
    schema::{
        common::{FailureResponses, InternalServerErrorResponse},
        outreach::{
            CreateOutreachLogRequest, CreateOutreachLogResponses, DetailOutreachLog,
            DraftEmailRequest, DraftEmailResponse, DraftEmailResponses, GetOutreachLogResponses,
        },
    },
    service::outreach::LabOutreach,
    AppState,
};

use super::{authenticate, parse_id};

#[derive(Tags)]
enum ApiOutreachTags {
    Outreach,
}

pub struct ApiOutreach;

#[OpenApi]
impl ApiOutreach {
    /// Outreach history of the session's student, newest first
    #[oai(path = "/outreach/", method = "get", tag = "ApiOutreachTags::Outreach")]
    async fn get_outreach_log_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> GetOutreachLogResponses {
        let user =
            match authenticate(&state, auth, "route.outreach", "get_outreach_log_api").await {
                Ok(val) => val,
                Err(resp) => return resp,
            };
        let outreach = LabOutreach::new(state.db.clone(), state.inflight.clone(), Some(user.id));
        let logs = outreach.fetch_outreach_logs().await;
        let status = outreach.status();
        if let Some(message) = status.error {
            return GetOutreachLogResponses::from_failure(
                status.error_kind,
                message,
                "route.outreach",
                "get_outreach_log_api",
            );
        }
        GetOutreachLogResponses::Ok(Json(
            logs.into_iter().map(DetailOutreachLog::from).collect(),
        ))
    }

    #[oai(path = "/outreach/", method = "post", tag = "ApiOutreachTags::Outreach")]
    async fn create_outreach_log_api(
        &self,
        json: Json<CreateOutreachLogRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> CreateOutreachLogResponses {
        let user =
            match authenticate(&state, auth, "route.outreach", "create_outreach_log_api").await {
                Ok(val) => val,
                Err(resp) => return resp,
            };
        let lab_id = match parse_id::<CreateOutreachLogResponses>("lab_id", &json.lab_id) {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        let professor_id =
            match parse_id::<CreateOutreachLogResponses>("professor_id", &json.professor_id) {
                Ok(val) => val,
                Err(resp) => return resp,
            };
        let outreach = LabOutreach::new(state.db.clone(), state.inflight.clone(), Some(user.id));
        match outreach
            .log_outreach(&lab_id, &professor_id, &json.message)
            .await
        {
            Ok(log) => {
                // the facade keeps the enriched row at the head of its history
                let detail = outreach
                    .state()
                    .outreach_logs
                    .into_iter()
                    .next()
                    .filter(|x| x.log.id == log.id)
                    .unwrap_or_else(|| OutreachLogDetail::from(log));
                CreateOutreachLogResponses::Created(Json(detail.into()))
            }
            Err(message) => CreateOutreachLogResponses::from_failure(
                outreach.status().error_kind,
                message,
                "route.outreach",
                "create_outreach_log_api",
            ),
        }
    }

    /// Email template addressed to one professor of one lab
    #[oai(
        path = "/outreach/draft-email",
        method = "post",
        tag = "ApiOutreachTags::Outreach"
    )]
    async fn draft_email_api(
        &self,
        json: Json<DraftEmailRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> DraftEmailResponses {
        let user = match authenticate(&state, auth, "route.outreach", "draft_email_api").await {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        let lab_id = match parse_id::<DraftEmailResponses>("lab_id", &json.lab_id) {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        let professor_id =
            match parse_id::<DraftEmailResponses>("professor_id", &json.professor_id) {
                Ok(val) => val,
                Err(resp) => return resp,
            };

        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return DraftEmailResponses::internal_server_error(
                    InternalServerErrorResponse::new(
                        "route.outreach",
                        "draft_email_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                );
            }
        };
        let lab = match get_lab_by_id(&mut tx, &lab_id).await {
            Ok(Some(val)) => val,
            Ok(None) => return DraftEmailResponses::not_found("lab not found".to_string()),
            Err(err) => {
                return DraftEmailResponses::internal_server_error(
                    InternalServerErrorResponse::new(
                        "route.outreach",
                        "draft_email_api",
                        "get_lab_by_id",
                        &err.to_string(),
                    ),
                )
            }
        };
        let professor = match get_professor_by_id(&mut tx, &professor_id).await {
            Ok(Some(val)) => val,
            Ok(None) => return DraftEmailResponses::not_found("professor not found".to_string()),
            Err(err) => {
                return DraftEmailResponses::internal_server_error(
                    InternalServerErrorResponse::new(
                        "route.outreach",
                        "draft_email_api",
                        "get_professor_by_id",
                        &err.to_string(),
                    ),
                )
            }
        };
        if professor.lab_id != lab.id {
            return DraftEmailResponses::bad_request(format!(
                "professor {} is not part of lab {}",
                professor.id, lab.id
            ));
        }

        let profile = ProfileCache::new(RedisStore::new(
            state.redis_conn.clone(),
            &user.id.to_string(),
        ))
        .load();
        match state
            .email_generator
            .draft_email(&lab, &professor, profile.as_ref())
            .await
        {
            Ok(email) => DraftEmailResponses::Ok(Json(DraftEmailResponse { email })),
            Err(err) => DraftEmailResponses::from_failure(
                Some(err.kind()),
                err.to_string(),
                "route.outreach",
                "draft_email_api",
            ),
        }
    }
}
