use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::core::inflight::InFlight;
use generation::{
    fixture::FixtureGenerator, EssayGrader, EssayIdeaGenerator, ResearchEmailGenerator,
};
use poem::{
    endpoint::StaticFilesEndpoint,
    middleware::{AddData, AddDataEndpoint, Cors, CorsEndpoint},
    EndpointExt, Route,
};
use poem_openapi::OpenApiService;
use r2d2::Pool as r2d2Pool;
use redis::Client;
use route::{
    auth::ApiAuth, essay::ApiEssay, lab::ApiLab, outreach::ApiOutreach, profile::ApiProfile,
};
use settings::Config;
use sqlx::{Pool, Postgres};
use storage::{public_mount_path, LocalObjectStore, ObjectStore};

pub mod cli;
pub mod core;
pub mod factory;
pub mod generation;
pub mod model;
pub mod profile;
pub mod repository;
pub mod route;
pub mod schema;
pub mod service;
pub mod settings;
pub mod storage;

pub struct AppState {
    pub db: Pool<Postgres>,
    pub redis_conn: r2d2Pool<Client>,
    pub inflight: InFlight,
    pub storage_dir: PathBuf,
    pub object_store: Arc<dyn ObjectStore>,
    pub email_generator: Arc<dyn ResearchEmailGenerator>,
    pub idea_generator: Arc<dyn EssayIdeaGenerator>,
    pub essay_grader: Arc<dyn EssayGrader>,
}

impl AppState {
    /// State with the local file store and the fixture generators from `config`.
    pub fn new(db: Pool<Postgres>, redis_conn: r2d2Pool<Client>, config: &Config) -> Self {
        let generator = Arc::new(FixtureGenerator::new(Duration::from_millis(
            config.generation_delay_ms,
        )));
        Self {
            db,
            redis_conn,
            inflight: InFlight::new(),
            storage_dir: PathBuf::from(&config.storage_dir),
            object_store: Arc::new(LocalObjectStore::new(
                &config.storage_dir,
                &config.public_base_url,
            )),
            email_generator: generator.clone(),
            idea_generator: generator.clone(),
            essay_grader: generator,
        }
    }
}

pub fn init_openapi_route(
    app_state: Arc<AppState>,
    config: &Config,
) -> CorsEndpoint<AddDataEndpoint<Route, Arc<AppState>>> {
    let prefix = config.prefix.clone().unwrap_or("/".to_string());
    let openapi_route = OpenApiService::new(
        (ApiAuth, ApiProfile, ApiLab, ApiOutreach, ApiEssay),
        "GradMate",
        "1.0",
    )
    .server(prefix.clone());
    let openapi_json_endpoint = openapi_route.spec_endpoint();
    let ui = openapi_route.swagger_ui();
    let mut route = Route::new()
        .nest(prefix, openapi_route)
        .nest("/docs", ui)
        .at("openapi.json", openapi_json_endpoint);
    // stored resumes and essays, under the path their public urls point at
    if let Some(storage_path) = public_mount_path(&config.public_base_url) {
        route = route.nest(
            storage_path,
            StaticFilesEndpoint::new(app_state.storage_dir.clone()),
        );
    }
    route
        .with(AddData::new(app_state))
        .with(Cors::new())
}
