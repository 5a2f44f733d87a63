// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use redis::{AsyncCommands, RedisResult};

/// Redis客户端
///
/// 提供基于列表的消息收发操作，每次调用获取独立的多路复用连接，
/// 代理重启后无需重建客户端
#[derive(Clone)]
pub struct RedisClient {
    /// Redis客户端
    client: redis::Client,
}

impl RedisClient {
    /// 创建新的Redis客户端实例
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    ///
    /// # 返回值
    ///
    /// * `Ok(RedisClient)` - Redis客户端实例
    /// * `Err(RedisError)` - URL无效
    pub fn new(redis_url: &str) -> RedisResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    /// 检查代理是否可达
    pub async fn ping(&self) -> RedisResult<()> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut con).await?;
        Ok(())
    }

    /// 将消息压入列表头部
    ///
    /// # 返回值
    ///
    /// * `Ok(i64)` - 压入后的列表长度
    pub async fn push(&self, key: &str, value: &str) -> RedisResult<i64> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let len: i64 = con.lpush(key, value).await?;
        Ok(len)
    }

    /// 从列表尾部弹出一条消息
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(String))` - 弹出的消息
    /// * `Ok(None)` - 列表为空
    pub async fn pop(&self, key: &str) -> RedisResult<Option<String>> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = con.rpop(key, None).await?;
        Ok(value)
    }
}
