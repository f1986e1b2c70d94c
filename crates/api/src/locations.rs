use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info};
use url::Url;

use hayah_core::{is_valid_uf, HayahError, LocationApi, Municipality};

use crate::http::{build_client, join, parse_base, send_json};

/// Municipality lookup against the IBGE localities service.
/// Results are memoised per UF for the life of the client.
pub struct IbgeClient {
    http: reqwest::Client,
    base_url: Url,
    cache: Arc<DashMap<String, Vec<Municipality>>>,
}

impl IbgeClient {
    pub fn new(base_url: &str, request_timeout_seconds: Option<u64>) -> Result<Self, HayahError> {
        Ok(Self {
            http: build_client(request_timeout_seconds)?,
            base_url: parse_base(base_url)?,
            cache: Arc::new(DashMap::new()),
        })
    }
}

#[async_trait]
impl LocationApi for IbgeClient {
    async fn municipalities(&self, uf: &str) -> Result<Vec<Municipality>, HayahError> {
        if !is_valid_uf(uf) {
            return Err(HayahError::Validation(format!("unknown state: {}", uf)));
        }
        let uf = uf.to_uppercase();

        if let Some(cached) = self.cache.get(&uf) {
            debug!(uf = %uf, "municipalities served from memory");
            return Ok(cached.value().clone());
        }

        let url = join(&self.base_url, &format!("estados/{}/municipios", uf))?;
        let mut cities: Vec<Municipality> = send_json(self.http.get(url)).await?;
        cities.sort_by(|a, b| a.name.cmp(&b.name));

        info!(uf = %uf, count = cities.len(), "loaded municipalities");
        self.cache.insert(uf, cities.clone());
        Ok(cities)
    }
}
