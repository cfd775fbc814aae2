//! Client for a hosted drinks table exposed over a PostgREST-style API
//! (the interface Supabase serves under `/rest/v1`).

use crate::errors::StoreError;
use crate::models::DrinkRow;
use crate::storage::{DrinkStore, StoreFuture};
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct UpsertRow {
    date: NaiveDate,
    quantity: u8,
}

#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    table_url: String,
    api_key: Option<String>,
}

impl RestStore {
    pub fn new(
        base_url: &str,
        table: &str,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, StoreError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            table_url: format!("{}/rest/v1/{table}", base_url.trim_end_matches('/')),
            api_key,
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let request = self.client.request(method, &self.table_url);
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    async fn fetch(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DrinkRow>, StoreError> {
        let response = self
            .request(Method::GET)
            .query(&[
                ("select", "id,date,quantity".to_string()),
                ("date", format!("gte.{from}")),
                ("date", format!("lte.{to}")),
                ("order", "date.asc".to_string()),
            ])
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    async fn write(&self, date: NaiveDate, quantity: u8) -> Result<(), StoreError> {
        let response = self
            .request(Method::POST)
            .query(&[("on_conflict", "date")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[UpsertRow { date, quantity }])
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(StoreError::Status {
        status: status.as_u16(),
        body: response.text().await.unwrap_or_default(),
    })
}

impl DrinkStore for RestStore {
    fn fetch_range(&self, from: NaiveDate, to: NaiveDate) -> StoreFuture<'_, Vec<DrinkRow>> {
        Box::pin(self.fetch(from, to))
    }

    fn upsert(&self, date: NaiveDate, quantity: u8) -> StoreFuture<'_, ()> {
        Box::pin(self.write(date, quantity))
    }
}
