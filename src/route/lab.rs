use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};

use crate::{
    core::inflight::InFlight,
    schema::{
        common::FailureResponses,
        lab::{DetailLab, DetailProfessor, GetLabResponses, GetProfessorResponses},
    },
    service::outreach::LabOutreach,
    AppState,
};

use super::parse_id;

#[derive(Tags)]
enum ApiLabTags {
    Lab,
}

pub struct ApiLab;

// Lab reads are public and shared by every visitor, so each request gets its
// own guard instead of the per-user registry.
fn lab_outreach(state: &AppState) -> LabOutreach {
    LabOutreach::new(state.db.clone(), InFlight::new(), None)
}

#[OpenApi]
impl ApiLab {
    /// Labs ordered by name, optionally limited to one school
    #[oai(path = "/lab/", method = "get", tag = "ApiLabTags::Lab")]
    async fn get_lab_api(
        &self,
        Query(school): Query<Option<String>>,
        state: Data<&Arc<AppState>>,
    ) -> GetLabResponses {
        let outreach = lab_outreach(&state);
        let labs = match school.as_deref().map(str::trim) {
            Some(school) if !school.is_empty() => outreach.fetch_labs_by_school(school).await,
            _ => outreach.fetch_labs().await,
        };
        let status = outreach.status();
        if let Some(message) = status.error {
            return GetLabResponses::from_failure(
                status.error_kind,
                message,
                "route.lab",
                "get_lab_api",
            );
        }
        GetLabResponses::Ok(Json(labs.into_iter().map(DetailLab::from).collect()))
    }

    /// Professors of one lab ordered by name
    #[oai(path = "/lab/professor/", method = "get", tag = "ApiLabTags::Lab")]
    async fn get_professor_api(
        &self,
        Query(lab_id): Query<String>,
        state: Data<&Arc<AppState>>,
    ) -> GetProfessorResponses {
        let lab_id = match parse_id::<GetProfessorResponses>("lab_id", &lab_id) {
            Ok(val) => val,
            Err(resp) => return resp,
        };
        let outreach = lab_outreach(&state);
        let professors = outreach.fetch_professors(&lab_id).await;
        let status = outreach.status();
        if let Some(message) = status.error {
            return GetProfessorResponses::from_failure(
                status.error_kind,
                message,
                "route.lab",
                "get_professor_api",
            );
        }
        GetProfessorResponses::Ok(Json(
            professors.into_iter().map(DetailProfessor::from).collect(),
        ))
    }
}
