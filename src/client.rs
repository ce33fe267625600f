use std::future::Future;

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::exchange::Exchange;
use crate::schemas::{DataJson, Expense, Group, GuidJson, UpdateOutcome, UserNick};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status}: {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// The calls the front-end forms make against the groups API.
pub trait GroupsApi {
    fn create_group(&self, group_name: &str) -> impl Future<Output = Result<String>> + Send;

    fn replace_members(
        &self,
        guid: &str,
        members: &[UserNick],
    ) -> impl Future<Output = Result<UpdateOutcome>> + Send;

    fn append_expense(
        &self,
        guid: &str,
        expense: &Expense,
    ) -> impl Future<Output = Result<UpdateOutcome>> + Send;
}

#[derive(Deserialize)]
struct ErrorJson {
    error: String,
}

/// A group read answers `{}` for unknown guids.
#[derive(Deserialize)]
struct MaybeGroupJson {
    data: Option<Group>,
}

#[derive(Clone)]
pub struct HttpGroupsClient {
    http: Client,
    base_url: String,
}

impl HttpGroupsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpGroupsClient {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/groups{}", self.base_url, path)
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let message = match response.json::<ErrorJson>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_owned(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<UpdateOutcome> {
        let response = self.http.put(self.url(path)).json(body).send().await?;
        let body: DataJson<UpdateOutcome> = Self::read(response).await?;
        Ok(body.data)
    }

    pub async fn get_group(&self, guid: &str) -> Result<Option<Group>> {
        let response = self.http.get(self.url(&format!("/{}", guid))).send().await?;
        let body: MaybeGroupJson = Self::read(response).await?;
        Ok(body.data)
    }

    pub async fn exchanges(&self, guid: &str) -> Result<Vec<Exchange>> {
        let response = self
            .http
            .get(self.url(&format!("/{}/exchanges", guid)))
            .send()
            .await?;
        let body: DataJson<Vec<Exchange>> = Self::read(response).await?;
        Ok(body.data)
    }
}

impl GroupsApi for HttpGroupsClient {
    async fn create_group(&self, group_name: &str) -> Result<String> {
        let response = self
            .http
            .post(self.url(""))
            .json(&json!({ "groupName": group_name }))
            .send()
            .await?;
        let body: DataJson<GuidJson> = Self::read(response).await?;
        Ok(body.data.guid)
    }

    async fn replace_members(&self, guid: &str, members: &[UserNick]) -> Result<UpdateOutcome> {
        self.put(&format!("/{}/members", guid), &json!({ "members": members }))
            .await
    }

    async fn append_expense(&self, guid: &str, expense: &Expense) -> Result<UpdateOutcome> {
        self.put(&format!("/{}/expenses", guid), &json!({ "expense": expense }))
            .await
    }
}
