// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use futures::future::BoxFuture;
use metrics::gauge;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// 定时器触发时执行的回调
pub type TickCallback = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

struct ScheduledTimer {
    interval: Duration,
    stop: oneshot::Sender<()>,
}

/// 周期计划器
///
/// 每个记录最多持有一个重复定时器。首次触发发生在注册后一个完整周期，
/// 之后每个周期触发一次，直到被取消。
///
/// 取消只阻止后续触发：正在执行的回调会运行完成，不会被中途打断。
/// 计划器被丢弃时所有定时器随之停止。
pub struct PeriodicPlanner {
    timers: DashMap<String, ScheduledTimer>,
}

impl Default for PeriodicPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodicPlanner {
    pub fn new() -> Self {
        Self {
            timers: DashMap::new(),
        }
    }

    /// 为记录注册重复定时器
    ///
    /// 已存在的定时器会先被取消。周期为零时只取消，不注册新定时器。
    ///
    /// # 参数
    ///
    /// * `record_id` - 网站记录ID
    /// * `interval` - 触发周期
    /// * `callback` - 每次触发时执行的回调
    pub fn schedule(&self, record_id: &str, interval: Duration, callback: TickCallback) {
        if interval.is_zero() {
            self.cancel(record_id);
            return;
        }

        let start = Instant::now() + interval;
        let id = record_id.to_string();
        let (stop, mut stopped) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let mut ticker = interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // Stop is only observed between ticks
                tokio::select! {
                    biased;
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {}
                }
                debug!(record_id = %id, "Periodic timer fired");
                callback().await;
            }
            debug!(record_id = %id, "Periodic timer stopped");
        });

        if let Some(previous) = self
            .timers
            .insert(record_id.to_string(), ScheduledTimer { interval, stop })
        {
            let _ = previous.stop.send(());
        }
        gauge!("scheduled_records").set(self.timers.len() as f64);
    }

    /// 取消记录的定时器
    ///
    /// # 返回值
    ///
    /// 取消前是否存在定时器
    pub fn cancel(&self, record_id: &str) -> bool {
        match self.timers.remove(record_id) {
            Some((_, timer)) => {
                let _ = timer.stop.send(());
                gauge!("scheduled_records").set(self.timers.len() as f64);
                true
            }
            None => false,
        }
    }

    /// 记录当前的计划周期
    pub fn interval_of(&self, record_id: &str) -> Option<Duration> {
        self.timers.get(record_id).map(|timer| timer.interval)
    }

    pub fn is_scheduled(&self, record_id: &str) -> bool {
        self.timers.contains_key(record_id)
    }

    /// 当前处于计划状态的记录ID
    pub fn scheduled_ids(&self) -> Vec<String> {
        self.timers.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// 取消全部定时器
    pub fn cancel_all(&self) {
        let ids = self.scheduled_ids();
        for id in ids {
            self.cancel(&id);
        }
    }
}
