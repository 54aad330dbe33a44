use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use r2d2::Pool;
use redis::Client;

/// Minimal string key/value storage the profile cache writes through.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Process-local store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Redis backed store. Every key is prefixed with `namespace` so each user
/// gets their own copy of the fixed cache key.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool<Client>,
    namespace: String,
}

impl RedisStore {
    pub fn new(pool: Pool<Client>, namespace: &str) -> Self {
        Self {
            pool,
            namespace: namespace.to_string(),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut redis_conn = self.pool.get()?;
        let res: Option<String> = redis::cmd("get")
            .arg(self.namespaced(key))
            .query(&mut *redis_conn)?;
        Ok(res)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut redis_conn = self.pool.get()?;
        redis::cmd("set")
            .arg(self.namespaced(key))
            .arg(value)
            .exec(&mut *redis_conn)?;
        Ok(())
    }
}
