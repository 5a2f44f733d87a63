// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 按键加锁
///
/// 同一键上的操作串行执行，不同键之间互不阻塞
#[derive(Default)]
pub struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// 获取键对应的锁，守卫释放前同一键上的其他调用会等待
    ///
    /// 守卫释放时，若没有其他调用持有或等待该键，对应条目会被移除
    pub async fn lock(&self, key: &str) -> KeyedLockGuard<'_> {
        let guard = self.get_or_create(key).lock_owned().await;
        KeyedLockGuard {
            locks: self,
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    /// 移除无人持有的锁
    pub fn prune(&self, key: &str) {
        self.locks
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// [`KeyedLocks::lock`] 返回的守卫
pub struct KeyedLockGuard<'a> {
    locks: &'a KeyedLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyedLockGuard<'_> {
    fn drop(&mut self) {
        // Release the mutex first so the entry's only owner is the map
        self.guard.take();
        self.locks.prune(&self.key);
    }
}
