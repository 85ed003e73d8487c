//! REST client for the hosted relational store (PostgREST-style API).
//!
//! Upserts POST with `Prefer: resolution=merge-duplicates` and an
//! `on_conflict` column list; selects use `eq.` / `gte.` / `lt.` query
//! operators. The store enforces the uniqueness constraints; its SQLSTATE
//! 23505 (or HTTP 409) maps to `Error::Conflict`, everything else to
//! `Error::Persistence`.

use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;

use kakei_core::{
    BudgetRow, Category, Error, FixedCostTemplate, MonthWindow, NewFixedCost, NewScheduleEntry,
    NewTransaction, Recurrence, ScheduleEntry, ScheduleKind, Transaction,
};

use crate::store::{BudgetStore, CategoryStore, FixedCostStore, ScheduleStore, TransactionStore};

pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    /// `base_url` points at the REST root, e.g. `https://xyz.example.co/rest/v1`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| Error::Persistence(format!("bad api key: {e}")))?;
        headers.insert("apikey", key);
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| Error::Persistence(format!("bad api key: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn check(resp: Result<reqwest::Response, reqwest::Error>) -> Result<reqwest::Response, Error> {
        let resp = resp.map_err(|e| Error::Persistence(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(classify_failure(status, &body))
    }
}

/// Map a failed store response onto the error taxonomy.
fn classify_failure(status: StatusCode, body: &str) -> Error {
    if status == StatusCode::CONFLICT || body.contains("23505") {
        Error::Conflict(format!("store rejected duplicate key: {status}"))
    } else {
        Error::Persistence(format!("store error {status}: {body}"))
    }
}

fn date_filter(op: &str, date: NaiveDate) -> String {
    format!("{}.{}", op, date.format("%Y-%m-%d"))
}

impl CategoryStore for RestStore {
    async fn insert_category(&self, name: &str) -> Result<Category, Error> {
        #[derive(Serialize)]
        struct Row<'a> {
            name: &'a str,
        }

        let resp = self
            .client
            .post(self.endpoint("categories"))
            .headers(self.headers()?)
            .header("Prefer", "return=representation")
            .json(&Row { name })
            .send()
            .await;
        let resp = Self::check(resp).await?;

        let mut rows: Vec<Category> = resp
            .json()
            .await
            .map_err(|e| Error::Persistence(format!("parse categories insert: {e}")))?;
        rows.pop()
            .ok_or_else(|| Error::Persistence("insert returned no row".to_string()))
    }

    async fn delete_category(&self, id: &str) -> Result<(), Error> {
        let resp = self
            .client
            .delete(self.endpoint("categories"))
            .headers(self.headers()?)
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await;
        Self::check(resp).await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        let resp = self
            .client
            .get(self.endpoint("categories"))
            .headers(self.headers()?)
            .query(&[
                ("select", "id,name,sort_order"),
                ("order", "sort_order.asc,name.asc"),
            ])
            .send()
            .await;
        let resp = Self::check(resp).await?;
        resp.json()
            .await
            .map_err(|e| Error::Persistence(format!("parse categories: {e}")))
    }

    async fn set_sort_order(&self, id: &str, sort_order: i32) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Patch {
            sort_order: i32,
        }

        let resp = self
            .client
            .patch(self.endpoint("categories"))
            .headers(self.headers()?)
            .query(&[("id", format!("eq.{id}"))])
            .json(&Patch { sort_order })
            .send()
            .await;
        Self::check(resp).await?;
        Ok(())
    }
}

impl BudgetStore for RestStore {
    async fn upsert_budgets(&self, rows: &[BudgetRow]) -> Result<(), Error> {
        log::debug!("upserting {} budget row(s)", rows.len());
        let resp = self
            .client
            .post(self.endpoint("budgets"))
            .headers(self.headers()?)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .query(&[("on_conflict", "owner_id,category_id,month_key")])
            .json(rows)
            .send()
            .await;
        Self::check(resp).await?;
        Ok(())
    }

    async fn budgets_in_range(
        &self,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BudgetRow>, Error> {
        let resp = self
            .client
            .get(self.endpoint("budgets"))
            .headers(self.headers()?)
            .query(&[
                ("select", "owner_id,category_id,month_key,amount".to_string()),
                ("owner_id", format!("eq.{owner_id}")),
                ("month_key", date_filter("gte", from)),
                ("month_key", date_filter("lte", to)),
            ])
            .send()
            .await;
        let resp = Self::check(resp).await?;
        resp.json()
            .await
            .map_err(|e| Error::Persistence(format!("parse budgets: {e}")))
    }
}

#[derive(Serialize)]
struct TransactionWrite<'a> {
    date: NaiveDate,
    amount: i64,
    description: Option<&'a str>,
    category_id: Option<&'a str>,
}

impl<'a> From<&'a NewTransaction> for TransactionWrite<'a> {
    fn from(tx: &'a NewTransaction) -> Self {
        Self {
            date: tx.date,
            amount: tx.amount,
            description: tx.description.as_deref(),
            category_id: tx.category_id.as_deref(),
        }
    }
}

impl TransactionStore for RestStore {
    async fn insert_transaction(&self, tx: &NewTransaction) -> Result<Transaction, Error> {
        let resp = self
            .client
            .post(self.endpoint("transactions"))
            .headers(self.headers()?)
            .header("Prefer", "return=representation")
            .json(&TransactionWrite::from(tx))
            .send()
            .await;
        let resp = Self::check(resp).await?;

        let mut rows: Vec<Transaction> = resp
            .json()
            .await
            .map_err(|e| Error::Persistence(format!("parse transaction insert: {e}")))?;
        rows.pop()
            .ok_or_else(|| Error::Persistence("insert returned no row".to_string()))
    }

    async fn update_transaction(&self, id: &str, tx: &NewTransaction) -> Result<(), Error> {
        let resp = self
            .client
            .patch(self.endpoint("transactions"))
            .headers(self.headers()?)
            .query(&[("id", format!("eq.{id}"))])
            .json(&TransactionWrite::from(tx))
            .send()
            .await;
        Self::check(resp).await?;
        Ok(())
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), Error> {
        let resp = self
            .client
            .delete(self.endpoint("transactions"))
            .headers(self.headers()?)
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await;
        Self::check(resp).await?;
        Ok(())
    }

    async fn transactions_in_window(
        &self,
        window: MonthWindow,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, Error> {
        let mut query = vec![
            ("select", "id,date,amount,description,category_id".to_string()),
            ("date", date_filter("gte", window.start)),
            ("date", date_filter("lt", window.end)),
            ("order", "date.desc".to_string()),
        ];
        if let Some(n) = limit {
            query.push(("limit", n.to_string()));
        }

        let resp = self
            .client
            .get(self.endpoint("transactions"))
            .headers(self.headers()?)
            .query(&query)
            .send()
            .await;
        let resp = Self::check(resp).await?;
        resp.json()
            .await
            .map_err(|e| Error::Persistence(format!("parse transactions: {e}")))
    }
}

#[derive(Serialize)]
struct FixedCostWrite<'a> {
    owner_id: &'a str,
    description: &'a str,
    amount: i64,
    category_id: &'a str,
    recurrence: Recurrence,
    execution_day: u32,
}

impl FixedCostStore for RestStore {
    async fn insert_fixed_cost(
        &self,
        owner_id: &str,
        cost: &NewFixedCost,
    ) -> Result<FixedCostTemplate, Error> {
        let resp = self
            .client
            .post(self.endpoint("fixed_costs"))
            .headers(self.headers()?)
            .header("Prefer", "return=representation")
            .json(&FixedCostWrite {
                owner_id,
                description: &cost.description,
                amount: cost.amount,
                category_id: &cost.category_id,
                recurrence: cost.recurrence,
                execution_day: cost.execution_day,
            })
            .send()
            .await;
        let resp = Self::check(resp).await?;

        let mut rows: Vec<FixedCostTemplate> = resp
            .json()
            .await
            .map_err(|e| Error::Persistence(format!("parse fixed cost insert: {e}")))?;
        rows.pop()
            .ok_or_else(|| Error::Persistence("insert returned no row".to_string()))
    }

    async fn update_fixed_cost(
        &self,
        owner_id: &str,
        id: &str,
        cost: &NewFixedCost,
    ) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Patch<'a> {
            description: &'a str,
            amount: i64,
            category_id: &'a str,
            recurrence: Recurrence,
            execution_day: u32,
        }

        // Owner filter keeps one user from touching another's rows.
        let resp = self
            .client
            .patch(self.endpoint("fixed_costs"))
            .headers(self.headers()?)
            .query(&[
                ("id", format!("eq.{id}")),
                ("owner_id", format!("eq.{owner_id}")),
            ])
            .json(&Patch {
                description: &cost.description,
                amount: cost.amount,
                category_id: &cost.category_id,
                recurrence: cost.recurrence,
                execution_day: cost.execution_day,
            })
            .send()
            .await;
        Self::check(resp).await?;
        Ok(())
    }

    async fn delete_fixed_cost(&self, owner_id: &str, id: &str) -> Result<(), Error> {
        let resp = self
            .client
            .delete(self.endpoint("fixed_costs"))
            .headers(self.headers()?)
            .query(&[
                ("id", format!("eq.{id}")),
                ("owner_id", format!("eq.{owner_id}")),
            ])
            .send()
            .await;
        Self::check(resp).await?;
        Ok(())
    }

    async fn list_fixed_costs(&self, owner_id: &str) -> Result<Vec<FixedCostTemplate>, Error> {
        let resp = self
            .client
            .get(self.endpoint("fixed_costs"))
            .headers(self.headers()?)
            .query(&[
                (
                    "select",
                    "id,owner_id,description,amount,category_id,recurrence,execution_day"
                        .to_string(),
                ),
                ("owner_id", format!("eq.{owner_id}")),
                ("order", "execution_day.asc".to_string()),
            ])
            .send()
            .await;
        let resp = Self::check(resp).await?;
        resp.json()
            .await
            .map_err(|e| Error::Persistence(format!("parse fixed costs: {e}")))
    }
}

impl ScheduleStore for RestStore {
    async fn insert_schedules(&self, entries: &[NewScheduleEntry]) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Row<'a> {
            date: NaiveDate,
            title: &'a str,
            kind: ScheduleKind,
        }

        let rows: Vec<Row> = entries
            .iter()
            .map(|e| Row {
                date: e.date,
                title: &e.title,
                kind: e.kind,
            })
            .collect();

        let resp = self
            .client
            .post(self.endpoint("schedules"))
            .headers(self.headers()?)
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await;
        Self::check(resp).await?;
        Ok(())
    }

    async fn delete_schedules_of_kind(&self, kind: ScheduleKind) -> Result<(), Error> {
        let resp = self
            .client
            .delete(self.endpoint("schedules"))
            .headers(self.headers()?)
            .query(&[("kind", format!("eq.{}", kind.as_str()))])
            .send()
            .await;
        Self::check(resp).await?;
        Ok(())
    }

    async fn list_schedules(&self) -> Result<Vec<ScheduleEntry>, Error> {
        let resp = self
            .client
            .get(self.endpoint("schedules"))
            .headers(self.headers()?)
            .query(&[("select", "id,date,title,kind")])
            .send()
            .await;
        let resp = Self::check(resp).await?;
        resp.json()
            .await
            .map_err(|e| Error::Persistence(format!("parse schedules: {e}")))
    }
}
