//! Thin request layer over the Bridge REST API.
//!
//! Bridge is a Laravel application: single resources come back as
//! `{ "data": ... }` and collections as `{ "data": [...], "meta": {...} }`.

use commerce_core::Result;
use commerce_http::{FetchClient, Response};
use commerce_types::response::{PaginatedResponse, Pagination};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::wire::{Envelope, PageEnvelope};

/// Default API prefix.
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

type Query = Vec<(String, String)>;

#[derive(Debug, Clone)]
pub(crate) struct BridgeApi {
    http: FetchClient,
    prefix: String,
}

impl BridgeApi {
    pub fn new(http: FetchClient, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            http,
            prefix: format!("/{}", prefix.trim_matches('/')),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_query(path, Vec::new()).await
    }

    pub async fn get_query<T: DeserializeOwned>(&self, path: &str, query: Query) -> Result<T> {
        let envelope: Envelope<T> = self.http.get(self.url(path)).query(query).send_json().await?;
        Ok(envelope.data)
    }

    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
    ) -> Result<(Vec<T>, Pagination)> {
        let page: PageEnvelope<T> = self.http.get(self.url(path)).query(query).send_json().await?;
        let pagination = page.pagination();
        Ok((page.data, pagination))
    }

    /// Fetch a page and map every item.
    pub async fn get_page_mapped<W, T>(
        &self,
        path: &str,
        query: Query,
        map: impl FnMut(W) -> Result<T>,
    ) -> Result<PaginatedResponse<T>>
    where
        W: DeserializeOwned,
    {
        let (items, pagination) = self.get_page::<W>(path, query).await?;
        PaginatedResponse::new(items, pagination).try_map(map)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let envelope: Envelope<T> = self.http.post(self.url(path)).json(body)?.send_json().await?;
        Ok(envelope.data)
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let envelope: Envelope<T> = self.http.put(self.url(path)).json(body)?.send_json().await?;
        Ok(envelope.data)
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let envelope: Envelope<T> =
            self.http.patch(self.url(path)).json(body)?.send_json().await?;
        Ok(envelope.data)
    }

    /// DELETE returning the resource envelope.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let envelope: Envelope<T> = self.http.delete(self.url(path)).send_json().await?;
        Ok(envelope.data)
    }

    /// DELETE ignoring the body (Bridge answers 204).
    pub async fn delete_empty(&self, path: &str) -> Result<()> {
        self.http.delete(self.url(path)).send().await?.error_for_status()?;
        Ok(())
    }

    /// POST returning the raw response, whatever its status.
    pub async fn post_raw<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        Ok(self.http.post(self.url(path)).json(body)?.send().await?)
    }
}

/// Percent-encode a value for use as one path segment.
pub(crate) fn segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

pub(crate) fn query(pairs: &[(&str, String)]) -> Query {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
