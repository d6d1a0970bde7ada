use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};

use crate::pkg::{
    internal::jobs::{
        JobError,
        input::{JobInput, ListParams},
    },
    server::{
        response::{Envelope, JobView},
        state::AppState,
    },
};

type Result<T> = core::result::Result<T, JobError>;

fn body(payload: core::result::Result<Json<JobInput>, JsonRejection>) -> Result<JobInput> {
    payload
        .map(|Json(input)| input)
        .map_err(|rejection| JobError::invalid("body", &rejection.body_text()))
}

pub async fn list(
    State(state): State<AppState>,
    params: core::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<JobView>>>> {
    let Query(params) =
        params.map_err(|rejection| JobError::invalid("query", &rejection.body_text()))?;
    let request = params.into_request(state.listing.config())?;
    let page = state.listing.list_jobs(request).await?;
    let jobs = page.jobs.into_iter().map(JobView::from).collect();
    Ok(Json(Envelope::paginated(jobs, page.pagination)))
}

pub async fn search(
    state: State<AppState>,
    params: core::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<JobView>>>> {
    list(state, params).await
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<JobView>>> {
    let job = state.listing.get_job(&id).await?;
    Ok(Json(Envelope::data(JobView::from(job))))
}

pub async fn create(
    State(state): State<AppState>,
    payload: core::result::Result<Json<JobInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<JobView>>)> {
    let input = body(payload)?.into_new_job()?;
    let job = state.listing.create_job(input).await?;
    let message = if job.is_draft {
        "Job saved as draft"
    } else {
        "Job created successfully"
    };
    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(JobView::fresh(job)).with_message(message)),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: core::result::Result<Json<JobInput>, JsonRejection>,
) -> Result<Json<Envelope<JobView>>> {
    let patch = body(payload)?.into_patch()?;
    let job = state.listing.update_job(&id, patch).await?;
    Ok(Json(
        Envelope::data(JobView::from(job)).with_message("Job updated successfully"),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>> {
    state.listing.delete_job(&id).await?;
    Ok(Json(Envelope::message("Job deleted successfully")))
}
