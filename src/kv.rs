//! Flat key-value store client.
//!
//! Every trait method maps to one atomic primitive of the backing store.
//! There are no multi-key transactions; callers composing several calls must
//! tolerate partially applied sequences.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("wrong value type at '{0}'")]
    WrongType(String),
    #[error("value at '{0}' is not an integer")]
    NotAnInteger(String),
}

pub type KvResult<T> = Result<T, KvError>;

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> KvResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> KvResult<()>;
    /// Set only if absent. Returns whether the value was written.
    async fn set_nx(&self, key: &str, value: &str) -> KvResult<bool>;
    /// Atomic increment; a missing key counts as 0.
    async fn incr(&self, key: &str) -> KvResult<i64>;
    /// All keys starting with `prefix`, in no particular order.
    async fn scan_prefix(&self, prefix: &str) -> KvResult<Vec<String>>;
    /// Push onto the front of the list at `key`. Returns the new length.
    async fn lpush(&self, key: &str, value: &str) -> KvResult<usize>;
    async fn llen(&self, key: &str) -> KvResult<usize>;
    async fn lindex(&self, key: &str, index: usize) -> KvResult<Option<String>>;
}

#[cfg(feature = "inmem-store")]
pub mod inmem {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use dashmap::mapref::entry::Entry;
    use dashmap::DashMap;

    use super::*;

    #[derive(Debug, Clone)]
    enum Value {
        Str(String),
        List(VecDeque<String>),
    }

    /// Process-local store with the same single-key atomicity as the real one.
    #[derive(Clone, Default)]
    pub struct InMemKv {
        data: Arc<DashMap<String, Value>>,
    }

    impl InMemKv {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl KvStore for InMemKv {
        async fn get(&self, key: &str) -> KvResult<Option<String>> {
            match self.data.get(key).as_deref() {
                None => Ok(None),
                Some(Value::Str(s)) => Ok(Some(s.clone())),
                Some(Value::List(_)) => Err(KvError::WrongType(key.to_string())),
            }
        }

        async fn set(&self, key: &str, value: &str) -> KvResult<()> {
            self.data.insert(key.to_string(), Value::Str(value.to_string()));
            Ok(())
        }

        async fn set_nx(&self, key: &str, value: &str) -> KvResult<bool> {
            match self.data.entry(key.to_string()) {
                Entry::Occupied(_) => Ok(false),
                Entry::Vacant(slot) => {
                    slot.insert(Value::Str(value.to_string()));
                    Ok(true)
                }
            }
        }

        async fn incr(&self, key: &str) -> KvResult<i64> {
            let mut entry = self
                .data
                .entry(key.to_string())
                .or_insert_with(|| Value::Str("0".into()));
            let Value::Str(raw) = entry.value_mut() else {
                return Err(KvError::WrongType(key.to_string()));
            };
            let next = raw
                .parse::<i64>()
                .ok()
                .and_then(|n| n.checked_add(1))
                .ok_or_else(|| KvError::NotAnInteger(key.to_string()))?;
            *raw = next.to_string();
            Ok(next)
        }

        async fn scan_prefix(&self, prefix: &str) -> KvResult<Vec<String>> {
            Ok(self
                .data
                .iter()
                .filter(|e| e.key().starts_with(prefix))
                .map(|e| e.key().clone())
                .collect())
        }

        async fn lpush(&self, key: &str, value: &str) -> KvResult<usize> {
            let mut entry = self
                .data
                .entry(key.to_string())
                .or_insert_with(|| Value::List(VecDeque::new()));
            let Value::List(list) = entry.value_mut() else {
                return Err(KvError::WrongType(key.to_string()));
            };
            list.push_front(value.to_string());
            Ok(list.len())
        }

        async fn llen(&self, key: &str) -> KvResult<usize> {
            match self.data.get(key).as_deref() {
                None => Ok(0),
                Some(Value::List(list)) => Ok(list.len()),
                Some(Value::Str(_)) => Err(KvError::WrongType(key.to_string())),
            }
        }

        async fn lindex(&self, key: &str, index: usize) -> KvResult<Option<String>> {
            match self.data.get(key).as_deref() {
                None => Ok(None),
                Some(Value::List(list)) => Ok(list.get(index).cloned()),
                Some(Value::Str(_)) => Err(KvError::WrongType(key.to_string())),
            }
        }
    }

}

#[cfg(feature = "redis-store")]
pub mod redis {
    use deadpool_redis::redis::{cmd, RedisError};
    use deadpool_redis::{Config, Connection, Pool, PoolError, Runtime};

    use super::*;

    const SCAN_BATCH: usize = 500;

    #[derive(Clone)]
    pub struct RedisKv {
        pool: Pool,
    }

    impl From<RedisError> for KvError {
        fn from(e: RedisError) -> Self {
            KvError::Unavailable(e.to_string())
        }
    }

    impl From<PoolError> for KvError {
        fn from(e: PoolError) -> Self {
            KvError::Unavailable(e.to_string())
        }
    }

    impl RedisKv {
        /// Build a lazily connecting pool; nothing is dialled until the first command.
        pub fn from_url(url: &str) -> anyhow::Result<Self> {
            let pool = Config::from_url(url).create_pool(Some(Runtime::Tokio1))?;
            Ok(Self { pool })
        }

        async fn conn(&self) -> KvResult<Connection> {
            Ok(self.pool.get().await?)
        }
    }

    /// Escape glob metacharacters so SCAN MATCH treats `prefix` literally.
    fn glob_prefix(prefix: &str) -> String {
        let mut out = String::with_capacity(prefix.len() + 1);
        for c in prefix.chars() {
            if matches!(c, '*' | '?' | '[' | ']' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('*');
        out
    }

    #[async_trait]
    impl KvStore for RedisKv {
        async fn get(&self, key: &str) -> KvResult<Option<String>> {
            let mut conn = self.conn().await?;
            let v: Option<String> = cmd("GET").arg(key).query_async(&mut conn).await?;
            Ok(v)
        }

        async fn set(&self, key: &str, value: &str) -> KvResult<()> {
            let mut conn = self.conn().await?;
            let () = cmd("SET").arg(key).arg(value).query_async(&mut conn).await?;
            Ok(())
        }

        async fn set_nx(&self, key: &str, value: &str) -> KvResult<bool> {
            let mut conn = self.conn().await?;
            // SET NX answers OK or nil
            let reply: Option<String> = cmd("SET")
                .arg(key)
                .arg(value)
                .arg("NX")
                .query_async(&mut conn)
                .await?;
            Ok(reply.is_some())
        }

        async fn incr(&self, key: &str) -> KvResult<i64> {
            let mut conn = self.conn().await?;
            let n: i64 = cmd("INCR").arg(key).query_async(&mut conn).await?;
            Ok(n)
        }

        async fn scan_prefix(&self, prefix: &str) -> KvResult<Vec<String>> {
            let mut conn = self.conn().await?;
            let pattern = glob_prefix(prefix);
            let mut keys = Vec::new();
            let mut cursor: u64 = 0;
            loop {
                let (next, batch): (u64, Vec<String>) = cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(&pattern)
                    .arg("COUNT")
                    .arg(SCAN_BATCH)
                    .query_async(&mut conn)
                    .await?;
                keys.extend(batch);
                if next == 0 {
                    break;
                }
                cursor = next;
            }
            // SCAN may return a key more than once
            keys.sort();
            keys.dedup();
            Ok(keys)
        }

        async fn lpush(&self, key: &str, value: &str) -> KvResult<usize> {
            let mut conn = self.conn().await?;
            let len: usize = cmd("LPUSH").arg(key).arg(value).query_async(&mut conn).await?;
            Ok(len)
        }

        async fn llen(&self, key: &str) -> KvResult<usize> {
            let mut conn = self.conn().await?;
            let len: usize = cmd("LLEN").arg(key).query_async(&mut conn).await?;
            Ok(len)
        }

        async fn lindex(&self, key: &str, index: usize) -> KvResult<Option<String>> {
            let mut conn = self.conn().await?;
            let v: Option<String> = cmd("LINDEX").arg(key).arg(index).query_async(&mut conn).await?;
            Ok(v)
        }
    }

}
