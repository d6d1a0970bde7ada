use chrono::{Duration, Utc};
use standard_error::{Interpolate, StandardError};

use crate::{
    conf::Settings,
    pkg::{
        internal::jobs::{
            ListingService,
            input::{JobInput, Numeric},
        },
        server::state::job_store,
    },
    prelude::Result,
};

const BULLETS: [&str; 4] = [
    "• A user-friendly interface lets you browse stunning photos and videos",
    "• Filter destinations based on interests and travel style",
    "• Create personalized itineraries and share them with friends",
    "• Work closely with product and design on every release",
];

fn sample(
    title: &str,
    company: &str,
    location: &str,
    intro: &str,
    deadline_days: i64,
) -> JobInput {
    let deadline = (Utc::now() + Duration::days(deadline_days)).to_rfc3339();
    JobInput {
        job_title: Some(title.into()),
        company_name: Some(company.into()),
        company_logo: Some(format!("/assets/{}.png", company.to_lowercase())),
        location: Some(location.into()),
        job_type: Some("Full Time".into()),
        experience: Some("1-3 yr Exp".into()),
        salary_min: Some(Numeric::Number(1_000_000.0)),
        salary_max: Some(Numeric::Number(1_200_000.0)),
        application_deadline: Some(deadline),
        job_description: Some(format!("{}\n\n{}", intro, BULLETS.join("\n"))),
        is_draft: Some(false),
        is_active: Some(true),
        ..Default::default()
    }
}

pub fn samples() -> Vec<JobInput> {
    vec![
        sample(
            "Full Stack Developer",
            "Amazon",
            "Chennai",
            "We are looking for a talented Full Stack Developer to join our dynamic team.",
            30,
        ),
        sample(
            "Node Js Developer",
            "Tesla",
            "Bangalore",
            "Join Tesla's team as a Node.js Developer and help build the future of sustainable transport.",
            25,
        ),
        sample(
            "UX/UI Designer",
            "Swiggy",
            "Mumbai",
            "Create amazing user experiences as a UX/UI Designer at Swiggy.",
            20,
        ),
    ]
}

pub async fn apply(settings: &Settings) -> Result<()> {
    let store = job_store(settings)?;
    let removed = store
        .clear()
        .await
        .map_err(|e| StandardError::new("ERR-SEED-000").interpolate_err(e.to_string()))?;
    tracing::info!("cleared {} existing jobs", removed);

    let listing = ListingService::new(store, settings.listing());
    for input in samples() {
        let job = input
            .into_new_job()
            .map_err(|e| StandardError::new("ERR-SEED-000").interpolate_err(format!("{:?}", e)))?;
        let job = listing
            .create_job(job)
            .await
            .map_err(|e| StandardError::new("ERR-SEED-000").interpolate_err(e.to_string()))?;
        tracing::info!("{} at {} - {}", &job.job_title, &job.company_name, &job.salary);
    }
    tracing::info!("seed data inserted");
    Ok(())
}
