// Engine composition: load each configured service's sample window from the
// store and reduce it to the system view served at /api/status/.

use chrono::{DateTime, Duration, Utc};
use futures_util::future::try_join_all;
use tracing::instrument;

use crate::engine::{EngineSettings, build_service_view};
use crate::models::{ServiceDefinition, ServiceView, SystemView};
use crate::sample_repo::SampleRepo;

/// Builds the view for every configured service, in configured order.
#[instrument(skip_all, fields(services_count = services.len()))]
pub async fn build_system_view(
    repo: &SampleRepo,
    services: &[ServiceDefinition],
    settings: &EngineSettings,
    now: DateTime<Utc>,
) -> anyhow::Result<SystemView> {
    let views = try_join_all(
        services
            .iter()
            .map(|service| build_one(repo, service, settings, now)),
    )
    .await?;
    Ok(SystemView::new(views, now))
}

async fn build_one(
    repo: &SampleRepo,
    service: &ServiceDefinition,
    settings: &EngineSettings,
    now: DateTime<Utc>,
) -> anyhow::Result<ServiceView> {
    let from = settings.window_start(now);
    // Half-open range; include samples stamped exactly at `now`.
    let to = now + Duration::milliseconds(1);
    let samples = repo.samples_in_range(&service.name, from, to).await?;
    let latest = repo.latest_sample(&service.name, now).await?;
    Ok(build_service_view(service, &samples, latest, now, settings))
}
