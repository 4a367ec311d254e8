use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use taskhub_core::{
    Block, ChildListing, DatabaseSpec, Handle, LiveSchema, PageSpec, RemoteError, RemoteOp,
    RowPage, RowQuery, RowSpec, Schema, WorkspaceClient,
};
use url::Url;

use crate::wire::{self, BlockObject, DatabaseObject, ErrorBody, ListResponse, ObjectRef};

pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

/// Children requested per list-children call; the API maximum.
const LISTING_PAGE_SIZE: u32 = 100;

pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl NotionClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url).with_context(|| format!("Invalid API URL: {base_url}"))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    /// Sends `req` and decodes a successful body as `T`.
    ///
    /// `id` names the resource the call is about; it is reported when the API
    /// answers 404.
    async fn send<T: DeserializeOwned>(
        &self,
        op: RemoteOp,
        id: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<T, RemoteError> {
        tracing::debug!(%op, id, "Sending Notion request");
        let resp = req
            .send()
            .await
            .map_err(|e| RemoteError::connection(op, e.to_string()))?;
        handle_response(op, id, resp).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        op: RemoteOp,
        id: &str,
        method: reqwest::Method,
        path: &str,
        body: &Value,
    ) -> Result<T, RemoteError> {
        let url = self.api_url(path);
        self.send(op, id, self.request(method, &url).json(body)).await
    }
}

async fn handle_response<T: DeserializeOwned>(
    op: RemoteOp,
    id: &str,
    resp: reqwest::Response,
) -> Result<T, RemoteError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| RemoteError::connection(op, e.to_string()))?;

    if !status.is_success() {
        let error = serde_json::from_str::<ErrorBody>(&body).unwrap_or_else(|_| ErrorBody {
            code: String::new(),
            message: body.clone(),
        });
        return Err(match status.as_u16() {
            401 => RemoteError::unauthorized(op, error.message),
            404 => RemoteError::not_found(op, id),
            code => RemoteError::api(op, code, error.code, error.message),
        });
    }

    serde_json::from_str(&body).map_err(|e| RemoteError::decode(op, e.to_string()))
}

#[async_trait]
impl WorkspaceClient for NotionClient {
    async fn list_children(
        &self,
        scope: &Handle,
        cursor: Option<&str>,
    ) -> Result<ChildListing, RemoteError> {
        let op = RemoteOp::ListChildren;
        let page_size = LISTING_PAGE_SIZE.to_string();
        let mut params = vec![("page_size", page_size.as_str())];
        if let Some(cursor) = cursor {
            params.push(("start_cursor", cursor));
        }
        let url = Url::parse_with_params(
            &self.api_url(&format!("blocks/{}/children", scope.id)),
            &params,
        )
        .map_err(|e| RemoteError::connection(op, e.to_string()))?;

        let listing: ListResponse<BlockObject> = self
            .send(op, &scope.id, self.request(reqwest::Method::GET, url.as_str()))
            .await?;
        let next_cursor = listing.cursor();
        Ok(ChildListing {
            entries: listing
                .results
                .into_iter()
                .map(BlockObject::into_entry)
                .collect(),
            next_cursor,
        })
    }

    async fn retrieve_schema(&self, database: &Handle) -> Result<LiveSchema, RemoteError> {
        let url = self.api_url(&format!("databases/{}", database.id));
        let object: DatabaseObject = self
            .send(
                RemoteOp::RetrieveDatabase,
                &database.id,
                self.request(reqwest::Method::GET, &url),
            )
            .await?;
        Ok(object.live_schema())
    }

    async fn query_rows(
        &self,
        database: &Handle,
        query: &RowQuery,
    ) -> Result<RowPage, RemoteError> {
        let body = wire::query_body(query.page_size, query.start_cursor.as_deref());
        let page: ListResponse<ObjectRef> = self
            .send_json(
                RemoteOp::QueryDatabase,
                &database.id,
                reqwest::Method::POST,
                &format!("databases/{}/query", database.id),
                &body,
            )
            .await?;
        let next_cursor = page.cursor();
        Ok(RowPage {
            rows: page.results.into_iter().map(|r| Handle::row(r.id)).collect(),
            total: page.total,
            next_cursor,
        })
    }

    async fn create_page(&self, parent: &Handle, spec: &PageSpec) -> Result<Handle, RemoteError> {
        let created: ObjectRef = self
            .send_json(
                RemoteOp::CreatePage,
                &parent.id,
                reqwest::Method::POST,
                "pages",
                &wire::create_page_body(parent, spec),
            )
            .await?;
        Ok(Handle::page(created.id))
    }

    async fn create_database(
        &self,
        parent: &Handle,
        spec: &DatabaseSpec,
    ) -> Result<Handle, RemoteError> {
        let created: ObjectRef = self
            .send_json(
                RemoteOp::CreateDatabase,
                &parent.id,
                reqwest::Method::POST,
                "databases",
                &wire::create_database_body(parent, spec),
            )
            .await?;
        Ok(Handle::database(created.id))
    }

    async fn update_schema(
        &self,
        database: &Handle,
        properties: &Schema,
    ) -> Result<(), RemoteError> {
        let _: IgnoredAny = self
            .send_json(
                RemoteOp::UpdateDatabase,
                &database.id,
                reqwest::Method::PATCH,
                &format!("databases/{}", database.id),
                &wire::update_database_body(properties),
            )
            .await?;
        Ok(())
    }

    async fn create_row(&self, database: &Handle, row: &RowSpec) -> Result<Handle, RemoteError> {
        let created: ObjectRef = self
            .send_json(
                RemoteOp::CreateRow,
                &database.id,
                reqwest::Method::POST,
                "pages",
                &wire::create_row_body(database, row),
            )
            .await?;
        Ok(Handle::row(created.id))
    }

    async fn append_blocks(&self, parent: &Handle, blocks: &[Block]) -> Result<(), RemoteError> {
        let _: IgnoredAny = self
            .send_json(
                RemoteOp::AppendBlocks,
                &parent.id,
                reqwest::Method::PATCH,
                &format!("blocks/{}/children", parent.id),
                &wire::append_blocks_body(blocks),
            )
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "notion"
    }
}
