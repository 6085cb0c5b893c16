//! Hosted relational backend spoken to in the PostgREST dialect.
//!
//! Every row carries a `user_id` column; reads and writes are filtered on
//! it. Upserts post with `Prefer: resolution=merge-duplicates` and an
//! `on_conflict` list naming the collection's uniqueness constraint.
//!
//! Calls block on a runtime owned by the store, so callers stay synchronous.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::{Backend, NaturalKey, Record};
use crate::error::StoreError;

pub struct RestStore {
    base: Url,
    api_key: String,
    access_token: Option<String>,
    client: Client,
    runtime: tokio::runtime::Runtime,
}

impl RestStore {
    /// `base` is the project URL, e.g. `https://xyz.supabase.co`.
    pub fn new(mut base: Url, api_key: impl Into<String>) -> Result<Self, StoreError> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self {
            base,
            api_key: api_key.into(),
            access_token: None,
            client: Client::new(),
            runtime,
        })
    }

    /// Authorize requests as a signed-in user instead of the anonymous key.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn table_url<R: Record>(&self) -> Result<Url, StoreError> {
        self.base
            .join(&format!("rest/v1/{}", R::COLLECTION.table()))
            .map_err(|e| StoreError::Transport(e.to_string()))
    }

    fn owned_url<R: Record>(&self, owner: &str, filters: &[(&str, &str)]) -> Result<Url, StoreError> {
        let mut url = self.table_url::<R>()?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("user_id", &format!("eq.{owner}"));
            for (column, value) in filters {
                query.append_pair(column, &format!("eq.{value}"));
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {bearer}"))
    }

    /// Send and turn non-success statuses into errors.
    fn send<R: Record>(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let resp = self.runtime.block_on(request.send())?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = self.runtime.block_on(resp.text()).unwrap_or_default();
        warn!(table = R::COLLECTION.table(), %status, "backend request failed");
        if status == StatusCode::CONFLICT {
            return Err(StoreError::Constraint {
                collection: R::COLLECTION.table(),
                message,
            });
        }
        Err(StoreError::Http {
            status: status.as_u16(),
            message,
        })
    }

    fn body<R: Record>(owner: &str, record: &R) -> Result<Value, StoreError> {
        let mut value = serde_json::to_value(record).map_err(|e| StoreError::Decode {
            collection: R::COLLECTION.table(),
            message: e.to_string(),
        })?;
        if let Value::Object(map) = &mut value {
            map.insert("user_id".into(), Value::String(owner.to_string()));
        }
        Ok(value)
    }
}

impl Backend for RestStore {
    fn list<R: Record>(&self, owner: &str) -> Result<Vec<R>, StoreError> {
        let url = self.owned_url::<R>(owner, &[])?;
        debug!(table = R::COLLECTION.table(), "listing");
        let resp = self.send::<R>(self.request(Method::GET, url))?;
        let rows: Vec<Value> = self.runtime.block_on(resp.json())?;
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| StoreError::Decode {
                    collection: R::COLLECTION.table(),
                    message: e.to_string(),
                })
            })
            .collect()
    }

    fn insert<R: Record>(&mut self, owner: &str, record: &R) -> Result<(), StoreError> {
        let url = self.table_url::<R>()?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=minimal")
            .json(&Self::body(owner, record)?);
        self.send::<R>(request)?;
        Ok(())
    }

    fn update<R: Record>(&mut self, owner: &str, record: &R) -> Result<(), StoreError> {
        let url = self.owned_url::<R>(owner, &[("id", record.id())])?;
        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=minimal")
            .json(&Self::body(owner, record)?);
        self.send::<R>(request)?;
        Ok(())
    }

    fn delete<R: Record>(&mut self, owner: &str, id: &str) -> Result<(), StoreError> {
        let url = self.owned_url::<R>(owner, &[("id", id)])?;
        self.send::<R>(self.request(Method::DELETE, url))?;
        Ok(())
    }

    fn upsert<R: Record>(&mut self, owner: &str, record: &R) -> Result<(), StoreError> {
        let mut url = self.table_url::<R>()?;
        if let Some(columns) = R::COLLECTION.conflict_columns() {
            url.query_pairs_mut().append_pair("on_conflict", columns);
        }
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&Self::body(owner, record)?);
        self.send::<R>(request)?;
        Ok(())
    }

    fn delete_by_key<R: Record>(
        &mut self,
        owner: &str,
        key: &NaturalKey,
    ) -> Result<(), StoreError> {
        let filters: Vec<(&str, &str)> = key
            .fields()
            .iter()
            .map(|(column, value)| (*column, value.as_str()))
            .collect();
        let url = self.owned_url::<R>(owner, &filters)?;
        self.send::<R>(self.request(Method::DELETE, url))?;
        Ok(())
    }
}
