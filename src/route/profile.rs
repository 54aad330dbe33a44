use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::{
    core::security::BearerAuthorization,
    profile::{store::RedisStore, sync::ProfileSync, ProfileData},
    schema::{
        common::{FailureResponses, NotFoundResponse},
        profile::{
            ProfileRequest, ProfileResponse, ProfileResponses, ResumeUploadRequest,
            ResumeUrlResponse, ResumeUrlResponses, StudentResponse, StudentResponses,
        },
    },
    storage::{get_resume_url, upload_resume},
    AppState,
};

use super::authenticate;

#[derive(Tags)]
enum ApiProfileTags {
    Profile,
}

pub struct ApiProfile;

fn profile_sync(state: &AppState, user_id: uuid::Uuid) -> ProfileSync<RedisStore> {
    ProfileSync::new(
        state.db.clone(),
        state.inflight.clone(),
        Some(user_id),
        RedisStore::new(state.redis_conn.clone(), &user_id.to_string()),
    )
}

#[OpenApi]
impl ApiProfile {
    /// Cached profile of the session's user
    #[oai(path = "/profile/", method = "get", tag = "ApiProfileTags::Profile")]
    async fn get_profile_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProfileResponses {
        let user = match authenticate(&state, auth, "route.profile", "get_profile_api").await {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        match profile_sync(&state, user.id).load_local() {
            Some(profile) => ProfileResponses::Ok(Json(profile.into())),
            None => ProfileResponses::NotFound(Json(NotFoundResponse {
                message: "No cached profile".to_string(),
            })),
        }
    }

    /// Overwrite the cached profile. The student row is left alone until a publish.
    #[oai(path = "/profile/", method = "put", tag = "ApiProfileTags::Profile")]
    async fn put_profile_api(
        &self,
        json: Json<ProfileRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProfileResponses {
        let user = match authenticate(&state, auth, "route.profile", "put_profile_api").await {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        let profile = ProfileData::from(json.0);
        profile_sync(&state, user.id).save_local(&profile);
        ProfileResponses::Ok(Json(ProfileResponse::from(profile)))
    }

    #[oai(
        path = "/profile/provision",
        method = "post",
        tag = "ApiProfileTags::Profile"
    )]
    async fn provision_profile_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> StudentResponses {
        let user =
            match authenticate(&state, auth, "route.profile", "provision_profile_api").await {
                Ok(val) => val,
                Err(resp) => return resp,
            };
        let sync = profile_sync(&state, user.id);
        match sync.provision_student().await {
            Ok(student) => StudentResponses::Ok(Json(StudentResponse::from(student))),
            Err(message) => StudentResponses::from_failure(
                sync.status().error_kind,
                message,
                "route.profile",
                "provision_profile_api",
            ),
        }
    }

    #[oai(
        path = "/profile/publish",
        method = "post",
        tag = "ApiProfileTags::Profile"
    )]
    async fn publish_profile_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> StudentResponses {
        let user = match authenticate(&state, auth, "route.profile", "publish_profile_api").await
        {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        let sync = profile_sync(&state, user.id);
        match sync.publish().await {
            Ok(student) => StudentResponses::Ok(Json(StudentResponse::from(student))),
            Err(message) => StudentResponses::from_failure(
                sync.status().error_kind,
                message,
                "route.profile",
                "publish_profile_api",
            ),
        }
    }

    #[oai(path = "/profile/pull", method = "post", tag = "ApiProfileTags::Profile")]
    async fn pull_profile_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProfileResponses {
        let user = match authenticate(&state, auth, "route.profile", "pull_profile_api").await {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        let sync = profile_sync(&state, user.id);
        match sync.pull().await {
            Ok(profile) => ProfileResponses::Ok(Json(profile.into())),
            Err(message) => ProfileResponses::from_failure(
                sync.status().error_kind,
                message,
                "route.profile",
                "pull_profile_api",
            ),
        }
    }

    #[oai(
        path = "/profile/resume",
        method = "post",
        tag = "ApiProfileTags::Profile"
    )]
    async fn upload_resume_api(
        &self,
        form: ResumeUploadRequest,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ResumeUrlResponses {
        let user = match authenticate(&state, auth, "route.profile", "upload_resume_api").await {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        let bytes = match form.file.into_vec().await {
            Ok(val) => val,
            Err(err) => {
                return ResumeUrlResponses::bad_request(format!("unreadable upload: {}", err))
            }
        };
        match upload_resume(state.object_store.as_ref(), &state.db, &bytes, &user.id).await {
            Ok(resume_url) => ResumeUrlResponses::Ok(Json(ResumeUrlResponse { resume_url })),
            Err(err) => ResumeUrlResponses::from_failure(
                Some(err.kind()),
                err.to_string(),
                "route.profile",
                "upload_resume_api",
            ),
        }
    }

    /// Public URL the resume of the session's user is (or would be) served from
    #[oai(path = "/profile/resume", method = "get", tag = "ApiProfileTags::Profile")]
    async fn get_resume_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ResumeUrlResponses {
        let user = match authenticate(&state, auth, "route.profile", "get_resume_api").await {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        match get_resume_url(state.object_store.as_ref(), &user.id) {
            Ok(resume_url) => ResumeUrlResponses::Ok(Json(ResumeUrlResponse { resume_url })),
            Err(err) => ResumeUrlResponses::from_failure(
                Some(err.kind()),
                err.to_string(),
                "route.profile",
                "get_resume_api",
            ),
        }
    }
}
