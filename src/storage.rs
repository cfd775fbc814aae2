use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::models::DrinkRow;
use crate::remote::RestStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{future::Future, path::Path, path::PathBuf, pin::Pin, sync::Arc};
use tokio::{fs, sync::Mutex};
use tracing::{error, info};

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Record store over the drinks table: one row per calendar date.
pub trait DrinkStore: Send + Sync {
    /// Rows dated within `[from, to]`, both ends inclusive.
    fn fetch_range(&self, from: NaiveDate, to: NaiveDate) -> StoreFuture<'_, Vec<DrinkRow>>;

    /// Inserts the row for `date`, or fully replaces the existing one.
    fn upsert(&self, date: NaiveDate, quantity: u8) -> StoreFuture<'_, ()>;
}

pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn DrinkStore>, StoreError> {
    match config {
        StoreConfig::File { path } => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await?;
            }
            info!("using drinks file {}", path.display());
            Ok(Arc::new(FileStore::open(path.clone()).await))
        }
        StoreConfig::Rest {
            url,
            table,
            api_key,
            timeout,
        } => {
            info!("using remote drinks table {table} at {url}");
            Ok(Arc::new(RestStore::new(url, table, api_key.clone(), *timeout)?))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct FileData {
    next_id: i64,
    drinks: Vec<DrinkRow>,
}

/// Drinks table kept in a local JSON file.
pub struct FileStore {
    path: PathBuf,
    data: Mutex<FileData>,
}

impl FileStore {
    pub async fn open(path: PathBuf) -> Self {
        let data = load_data(&path).await;
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    async fn fetch(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DrinkRow>, StoreError> {
        let data = self.data.lock().await;
        Ok(data
            .drinks
            .iter()
            .filter(|row| row.date >= from && row.date <= to)
            .cloned()
            .collect())
    }

    async fn write(&self, date: NaiveDate, quantity: u8) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        let mut updated = data.clone();
        match updated.drinks.iter().position(|row| row.date == date) {
            Some(index) => updated.drinks[index].quantity = quantity,
            None => {
                updated.next_id += 1;
                updated.drinks.push(DrinkRow {
                    id: Some(updated.next_id),
                    date,
                    quantity,
                });
                updated.drinks.sort_by_key(|row| row.date);
            }
        }

        persist_data(&self.path, &updated).await?;
        *data = updated;
        Ok(())
    }
}

impl DrinkStore for FileStore {
    fn fetch_range(&self, from: NaiveDate, to: NaiveDate) -> StoreFuture<'_, Vec<DrinkRow>> {
        Box::pin(self.fetch(from, to))
    }

    fn upsert(&self, date: NaiveDate, quantity: u8) -> StoreFuture<'_, ()> {
        Box::pin(self.write(date, quantity))
    }
}

async fn load_data(path: &Path) -> FileData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                FileData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => FileData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            FileData::default()
        }
    }
}

async fn persist_data(path: &Path, data: &FileData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}
