//! # roster-worker
//!
//! Wires configuration, PostgreSQL and the Discord REST client into the
//! sync engine, and runs it.

pub mod discord;

use std::sync::Arc;

use anyhow::Context;
use chrono::Datelike;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use roster_common::AppConfig;
use roster_core::{ChannelSyncKind, ExternalResource, RoleChange, RoleSyncKind};
use roster_db::{
    create_pool, run_migrations, DatabaseConfig, PgAgeRuleRepository, PgMappingRepository,
    PgMemberRepository, PgNotificationRepository, PgOutboxRepository, PgPool, PgTeamRepository,
};
use roster_sync::{ProcessorConfig, RetryPolicy, SyncContext};

pub use discord::DiscordGateway;

/// Connect to PostgreSQL
pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!("PostgreSQL connection established");
    Ok(pool)
}

/// Build the engine's dependency container
pub fn build_context(config: &AppConfig, pool: &PgPool) -> anyhow::Result<SyncContext> {
    let gateway = DiscordGateway::new(&config.discord).context("Failed to build Discord client")?;

    let context = SyncContext::builder()
        .role_outbox(Arc::new(PgOutboxRepository::<RoleSyncKind>::new(pool.clone())))
        .channel_outbox(Arc::new(PgOutboxRepository::<ChannelSyncKind>::new(pool.clone())))
        .role_mappings(Arc::new(PgMappingRepository::new(pool.clone(), ExternalResource::Role)))
        .channel_mappings(Arc::new(PgMappingRepository::new(
            pool.clone(),
            ExternalResource::Channel,
        )))
        .team_repo(Arc::new(PgTeamRepository::new(pool.clone())))
        .age_rule_repo(Arc::new(PgAgeRuleRepository::new(pool.clone())))
        .member_repo(Arc::new(PgMemberRepository::new(pool.clone())))
        .notification_repo(Arc::new(PgNotificationRepository::new(pool.clone())))
        .gateway(Arc::new(gateway))
        .retry_policy(RetryPolicy::from(&config.sync))
        .build()
        .context("Failed to build sync context")?;

    Ok(context)
}

/// Run both processors until Ctrl-C or SIGTERM
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let pool = connect(&config).await?;
    let context = build_context(&config, &pool)?;

    let roles = context.role_processor(ProcessorConfig::for_roles(&config.sync));
    let channels = context.channel_processor(ProcessorConfig::for_channels(&config.sync));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let role_task = tokio::spawn({
        let shutdown = shutdown_rx.clone();
        async move { roles.run(shutdown).await }
    });
    let channel_task = tokio::spawn(async move { channels.run(shutdown_rx).await });

    shutdown_signal().await;
    info!("Shutting down, waiting for in-flight ticks");

    // Receivers only stop after their current tick
    let _ = shutdown_tx.send(true);
    let (role_result, channel_result) = tokio::join!(role_task, channel_task);
    role_result.context("Role processor panicked")?;
    channel_result.context("Channel processor panicked")?;

    pool.close().await;
    info!("Worker stopped");
    Ok(())
}

/// Apply pending schema migrations
pub async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    let pool = connect(&config).await?;
    run_migrations(&pool).await.context("Failed to apply migrations")?;
    info!("Migrations applied");
    Ok(())
}

/// One reconciliation run; `year` defaults to the current UTC year
pub async fn reconcile_ages(
    config: AppConfig,
    team_id: Uuid,
    year: Option<i32>,
) -> anyhow::Result<Vec<RoleChange>> {
    let reference_year = year.unwrap_or_else(|| chrono::Utc::now().year());
    let pool = connect(&config).await?;
    let context = build_context(&config, &pool)?;

    let changes = context
        .reconciliation()
        .reconcile(team_id, reference_year)
        .await
        .context("Age reconciliation failed")?;

    info!(team_id = %team_id, reference_year, changes = changes.len(), "Reconciliation finished");
    Ok(changes)
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C"),
        () = terminate => info!("Received SIGTERM"),
    }
}
