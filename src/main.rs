// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use migration::{Migrator, MigratorTrait};
use recrawl::config::settings::Settings;
use recrawl::domain::services::execution_manager::ExecutionManager;
use recrawl::domain::services::result_ingestion::ResultIngestion;
use recrawl::infrastructure::database::connection;
use recrawl::infrastructure::metrics::init_metrics;
use recrawl::infrastructure::redis_client::RedisClient;
use recrawl::infrastructure::repositories::execution_repo_impl::ExecutionRepositoryImpl;
use recrawl::infrastructure::repositories::record_repo_impl::RecordRepositoryImpl;
use recrawl::queue::dispatcher::{InFlightTracker, JobDispatcher};
use recrawl::queue::redis_queue::{RedisJobQueue, RedisResultQueue};
use recrawl::utils::telemetry;
use recrawl::workers::manager::WorkerManager;
use std::sync::Arc;
use tracing::{info, warn};

/// 主函数
///
/// 初始化存储与消息代理，恢复活跃记录的计划，并运行结果摄取工作器。
/// 爬取工作器在进程外消费Redis作业队列。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration and initialize logging
    let settings = Settings::new()?;
    telemetry::init_telemetry(settings.logging.json);
    info!("Starting recrawl...");

    if settings.metrics.enabled {
        init_metrics(&settings.metrics.listen_address)?;
    }

    // 2. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    let records = Arc::new(RecordRepositoryImpl::new(db.clone()));
    let executions = Arc::new(ExecutionRepositoryImpl::new(db.clone()));

    // 3. Initialize Redis queues
    let redis = RedisClient::new(&settings.redis.url)?;
    if let Err(e) = redis.ping().await {
        warn!("Redis is not reachable yet, dispatches will fail until it is: {}", e);
    }
    let job_queue = Arc::new(RedisJobQueue::new(
        redis.clone(),
        settings.redis.job_queue_key.clone(),
    ));
    let result_queue = Arc::new(RedisResultQueue::new(
        redis,
        settings.redis.result_queue_key.clone(),
    ));

    // 4. Scheduling core
    let in_flight = Arc::new(InFlightTracker::new(settings.scheduler.in_flight_timeout()));
    let dispatcher = Arc::new(JobDispatcher::new(
        job_queue,
        in_flight.clone(),
        settings.scheduler.overlap_policy,
    ));
    let manager = ExecutionManager::new(records.clone(), dispatcher);
    let ingestion =
        Arc::new(ResultIngestion::new(records, executions).with_in_flight(in_flight));

    // 5. Start ingestion workers
    let mut worker_manager = WorkerManager::new();
    worker_manager.start_ingestion_workers(
        settings.workers.ingestion_workers,
        result_queue,
        ingestion,
        settings.workers.idle_backoff(),
    );
    info!(
        "Started {} ingestion workers",
        settings.workers.ingestion_workers
    );

    // 6. Restore planning state
    if settings.scheduler.restore_on_startup {
        let started = manager.start_executions_for_all_active_records().await?;
        info!("Restored executions for {} active records", started);
    }

    worker_manager.wait_for_shutdown().await;
    manager.shutdown();
    info!("recrawl stopped");

    Ok(())
}
