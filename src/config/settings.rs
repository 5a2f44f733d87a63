// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::queue::dispatcher::OverlapPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含数据库、Redis、调度、工作器、指标和日志配置
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// Redis配置
    pub redis: RedisSettings,
    /// 调度配置
    pub scheduler: SchedulerSettings,
    /// 工作器配置
    pub workers: WorkerSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// Redis配置设置
#[derive(Debug, Deserialize)]
pub struct RedisSettings {
    /// Redis连接URL
    pub url: String,
    /// 爬取作业队列键
    pub job_queue_key: String,
    /// 爬取结果队列键
    pub result_queue_key: String,
}

/// 调度配置设置
#[derive(Debug, Deserialize)]
pub struct SchedulerSettings {
    /// 同一记录的并发爬取策略
    pub overlap_policy: OverlapPolicy,
    /// 在途标记超时时间（秒）
    pub in_flight_timeout_seconds: u64,
    /// 启动时为所有活跃记录恢复计划
    pub restore_on_startup: bool,
}

impl SchedulerSettings {
    pub fn in_flight_timeout(&self) -> Duration {
        Duration::from_secs(self.in_flight_timeout_seconds)
    }
}

/// 工作器配置设置
#[derive(Debug, Deserialize)]
pub struct WorkerSettings {
    /// 结果摄取工作器数量
    pub ingestion_workers: usize,
    /// 队列为空时的等待时间（毫秒）
    pub idle_backoff_millis: u64,
}

impl WorkerSettings {
    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_millis)
    }
}

/// 指标配置设置
#[derive(Debug, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用Prometheus导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_address: String,
}

/// 日志配置设置
#[derive(Debug, Deserialize)]
pub struct LoggingSettings {
    /// 是否输出JSON格式日志
    pub json: bool,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和 `RECRAWL__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .set_default("database.url", "sqlite://recrawl.db?mode=rwc")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("redis.job_queue_key", "crawls")?
            .set_default("redis.result_queue_key", "crawl-results")?
            .set_default("scheduler.overlap_policy", "allow")?
            .set_default("scheduler.in_flight_timeout_seconds", 3600)?
            .set_default("scheduler.restore_on_startup", true)?
            .set_default("workers.ingestion_workers", 2)?
            .set_default("workers.idle_backoff_millis", 500)?
            .set_default("metrics.enabled", true)?
            .set_default("metrics.listen_address", "0.0.0.0:9464")?
            .set_default("logging.json", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("RECRAWL").separator("__"));

        builder.build()?.try_deserialize()
    }
}
