// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化Prometheus指标导出并注册指标说明
///
/// # 参数
///
/// * `listen_address` - 导出器监听地址，例如 `0.0.0.0:9464`
pub fn init_metrics(listen_address: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = listen_address.parse()?;

    // Port clashes are tolerated in development
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}", e);
        return Ok(());
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

fn describe_metrics() {
    describe_counter!(
        "crawl_jobs_dispatched_total",
        "Total number of crawl jobs submitted to the worker pool"
    );
    describe_counter!(
        "crawl_jobs_dispatch_failed_total",
        "Total number of crawl jobs the worker pool did not accept"
    );
    describe_counter!(
        "crawl_jobs_skipped_total",
        "Total number of dispatches skipped because the record already had a job in flight"
    );
    describe_counter!(
        "crawl_results_ingested_total",
        "Total number of completed crawl results stored as executions"
    );
    describe_counter!(
        "crawl_results_failed_total",
        "Total number of failed crawls recorded"
    );
    describe_counter!(
        "crawl_results_discarded_total",
        "Total number of crawl results discarded because the record no longer exists"
    );
    describe_counter!(
        "crawl_executions_orphaned_total",
        "Total number of ingests whose superseded executions could not be deleted"
    );
    describe_gauge!("scheduled_records", "Number of records with a live periodic timer");
    describe_histogram!(
        "crawl_duration_seconds",
        "Duration of crawl jobs in seconds"
    );
}
