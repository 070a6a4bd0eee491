//! The main entry point: a client that downloads, decodes and caches climate
//! indices.

use crate::cache::csv_store::CsvStore;
use crate::cache::memory::TableMemo;
use crate::derive::join::outer_join;
use crate::error::ClimateIndexError;
use crate::fetch::error::FetchError;
use crate::fetch::raw_fetcher::RawFetcher;
use crate::indices::asymsam::{self, SamFeeds};
use crate::types::climate_index::{ClimateIndex, EnsoSelector};
use crate::types::index_table::{ColumnSpec, IndexTable};
use crate::types::sam_table::{SamLevels, SamTable};
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Logged whenever an index cannot be downloaded for lack of connectivity.
pub const CONNECTION_REQUIRED: &str =
    "A working internet connection is required to download and import the climate indices.";

/// Default file name of the combined ENSO snapshot.
pub const ENSO_SNAPSHOT_FILE: &str = "ENSO_Index.csv";

/// Columns kept in the combined ENSO table, after the key columns.
pub const ENSO_COLUMNS: [&str; 4] = ["ONI", "phase", "SOI", "NPGO"];

const ENSO_SOURCES: [ClimateIndex; 3] = [ClimateIndex::Oni, ClimateIndex::Soi, ClimateIndex::Npgo];

/// Column kinds of the combined ENSO table, in [`ENSO_COLUMNS`] order.
fn enso_schema() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::float(ENSO_COLUMNS[0]),
        ColumnSpec::phase(ENSO_COLUMNS[1]),
        ColumnSpec::float(ENSO_COLUMNS[2]),
        ColumnSpec::float(ENSO_COLUMNS[3]),
    ]
}

/// The client for downloading climate indices.
///
/// Each call performs at most one download per index, then decodes the
/// document into an [`IndexTable`]. Tables can be cached as CSV files, either
/// at a path of your choosing or in the client's cache folder, or memoised in
/// memory for the lifetime of the client.
///
/// Network and HTTP failures are not errors: they are logged and the call
/// returns `Ok(None)`. A detected upstream outage, undecodable data, cache
/// problems and invalid arguments are returned as [`ClimateIndexError`].
///
/// # Examples
///
/// ```no_run
/// # use climate_indices::{ClimateIndices, ClimateIndexError};
/// # async fn run() -> Result<(), ClimateIndexError> {
/// let client = ClimateIndices::new().await?;
/// if let Some(oni) = client.oni().call().await? {
///     println!("{} ONI rows", oni.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ClimateIndices {
    fetcher: RawFetcher,
    memo: TableMemo,
    cache_folder: PathBuf,
    url_overrides: HashMap<ClimateIndex, String>,
    sam_feeds: SamFeeds,
}

#[bon]
impl ClimateIndices {
    /// Creates a client that keeps its cache files in `cache_folder`,
    /// creating the directory if needed.
    ///
    /// # Errors
    ///
    /// [`ClimateIndexError::CacheDirCreation`] if the directory cannot be created.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, ClimateIndexError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| ClimateIndexError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            fetcher: RawFetcher::new(),
            memo: TableMemo::new(),
            cache_folder,
            url_overrides: HashMap::new(),
            sam_feeds: SamFeeds::default(),
        })
    }

    /// Creates a client using the platform cache directory
    /// (e.g. `~/.cache/climate_indices_rs_cache` on Linux).
    ///
    /// # Errors
    ///
    /// [`ClimateIndexError::CacheDirResolution`] if the platform has no cache
    /// directory, [`ClimateIndexError::CacheDirCreation`] if it cannot be created.
    pub async fn new() -> Result<Self, ClimateIndexError> {
        let cache_folder = get_cache_dir().ok_or(ClimateIndexError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }

    /// Downloads `index` from `url` instead of its published location.
    pub fn with_upstream_url(mut self, index: ClimateIndex, url: impl Into<String>) -> Self {
        self.url_overrides.insert(index, url.into());
        self
    }

    /// Downloads the SAM files from other locations.
    pub fn with_sam_feeds(mut self, feeds: SamFeeds) -> Self {
        self.sam_feeds = feeds;
        self
    }

    /// Downloads through `client`, e.g. one with a proxy, a user agent or a
    /// timeout.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.fetcher = RawFetcher::with_client(client);
        self
    }

    pub fn cache_folder(&self) -> &Path {
        &self.cache_folder
    }

    /// File name used for `index` inside the cache folder, e.g. `oni.csv`.
    pub fn cache_file_name(index: ClimateIndex) -> String {
        format!("{}.csv", index.name())
    }

    pub fn cache_file_path(&self, index: ClimateIndex) -> PathBuf {
        self.cache_folder.join(Self::cache_file_name(index))
    }

    /// The URL `index` is downloaded from on `today`.
    pub fn upstream_url(&self, index: ClimateIndex, today: NaiveDate) -> String {
        self.url_overrides
            .get(&index)
            .cloned()
            .unwrap_or_else(|| index.source().upstream_url(today))
    }

    /// Fetches any index.
    ///
    /// # Builder arguments
    ///
    /// * `.index(ClimateIndex)`: **Required.**
    /// * `.use_cache(bool)`: read a cached copy before downloading. With a
    ///   `cache_path` the file is read if it exists; without one the
    ///   client's in-memory memo is used. Defaults to `false`.
    /// * `.cache_path(impl Into<PathBuf>)`: CSV file to read from (with
    ///   `use_cache`) and to write after a successful download.
    /// * `.cached(bool)`: shorthand for `use_cache(true)` with the index's
    ///   file in the client cache folder, see [`Self::cache_file_path`].
    ///   Ignored when `cache_path` is given.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the download failed for network or HTTP reasons.
    ///
    /// # Errors
    ///
    /// * [`ClimateIndexError::Fetch`] for an upstream outage.
    /// * [`ClimateIndexError::Format`] if the document cannot be decoded.
    /// * [`ClimateIndexError::Cache`] if the cache file cannot be read or written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use climate_indices::{ClimateIndex, ClimateIndices, ClimateIndexError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), ClimateIndexError> {
    /// let client = ClimateIndices::new().await?;
    /// let pdo = client
    ///     .fetch()
    ///     .index(ClimateIndex::Pdo)
    ///     .cached(true)
    ///     .call()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn fetch(
        &self,
        index: ClimateIndex,
        #[builder(default)] use_cache: bool,
        #[builder(into)] cache_path: Option<PathBuf>,
        #[builder(default)] cached: bool,
    ) -> Result<Option<IndexTable>, ClimateIndexError> {
        match cache_path {
            Some(path) => self.load(index, use_cache, Some(path)).await,
            None if cached => {
                self.load(index, true, Some(self.cache_file_path(index)))
                    .await
            }
            None => self.load(index, use_cache, None).await,
        }
    }

    /// Oceanic Niño Index with `dSST3.4`, `ONI`, `ONI_month_window` and `phase`.
    #[builder]
    pub async fn oni(
        &self,
        #[builder(default)] use_cache: bool,
        #[builder(into)] cache_path: Option<PathBuf>,
    ) -> Result<Option<IndexTable>, ClimateIndexError> {
        self.load(ClimateIndex::Oni, use_cache, cache_path).await
    }

    /// Arctic Oscillation.
    #[builder]
    pub async fn ao(
        &self,
        #[builder(default)] use_cache: bool,
        #[builder(into)] cache_path: Option<PathBuf>,
    ) -> Result<Option<IndexTable>, ClimateIndexError> {
        self.load(ClimateIndex::Ao, use_cache, cache_path).await
    }

    /// North Atlantic Oscillation.
    #[builder]
    pub async fn nao(
        &self,
        #[builder(default)] use_cache: bool,
        #[builder(into)] cache_path: Option<PathBuf>,
    ) -> Result<Option<IndexTable>, ClimateIndexError> {
        self.load(ClimateIndex::Nao, use_cache, cache_path).await
    }

    /// Southern Oscillation Index with its 3-month average `SOI_3MON_AVG`.
    #[builder]
    pub async fn soi(
        &self,
        #[builder(default)] use_cache: bool,
        #[builder(into)] cache_path: Option<PathBuf>,
    ) -> Result<Option<IndexTable>, ClimateIndexError> {
        self.load(ClimateIndex::Soi, use_cache, cache_path).await
    }

    /// Multivariate ENSO Index v2, one row per two-month season, with `Phase`.
    #[builder]
    pub async fn mei(
        &self,
        #[builder(default)] use_cache: bool,
        #[builder(into)] cache_path: Option<PathBuf>,
    ) -> Result<Option<IndexTable>, ClimateIndexError> {
        self.load(ClimateIndex::Mei, use_cache, cache_path).await
    }

    /// North Pacific Gyre Oscillation.
    #[builder]
    pub async fn npgo(
        &self,
        #[builder(default)] use_cache: bool,
        #[builder(into)] cache_path: Option<PathBuf>,
    ) -> Result<Option<IndexTable>, ClimateIndexError> {
        self.load(ClimateIndex::Npgo, use_cache, cache_path).await
    }

    /// Antarctic Oscillation.
    #[builder]
    pub async fn aao(
        &self,
        #[builder(default)] use_cache: bool,
        #[builder(into)] cache_path: Option<PathBuf>,
    ) -> Result<Option<IndexTable>, ClimateIndexError> {
        self.load(ClimateIndex::Aao, use_cache, cache_path).await
    }

    /// Pacific Decadal Oscillation, up to today.
    #[builder]
    pub async fn pdo(
        &self,
        #[builder(default)] use_cache: bool,
        #[builder(into)] cache_path: Option<PathBuf>,
    ) -> Result<Option<IndexTable>, ClimateIndexError> {
        self.load(ClimateIndex::Pdo, use_cache, cache_path).await
    }

    /// Dipole Mode Index.
    #[builder]
    pub async fn dmi(
        &self,
        #[builder(default)] use_cache: bool,
        #[builder(into)] cache_path: Option<PathBuf>,
    ) -> Result<Option<IndexTable>, ClimateIndexError> {
        self.load(ClimateIndex::Dmi, use_cache, cache_path).await
    }

    /// ENSO indices, alone or combined.
    ///
    /// With [`EnsoSelector::All`] (the default) ONI, SOI and NPGO are
    /// downloaded one after another and outer-joined on date into
    /// `Year, Month, Date, ONI, phase, SOI, NPGO`. An index that could not be
    /// downloaded is left out; if none could, the result is `None`.
    /// Other selectors return that index's full table.
    ///
    /// # Builder arguments
    ///
    /// * `.selector(EnsoSelector)`: defaults to `All`.
    /// * `.use_cache(bool)`: read `cache_path` (or, without one, the
    ///   in-memory memo) before downloading. Defaults to `false`.
    /// * `.cache_path(impl Into<PathBuf>)`: CSV file for the selected table.
    ///   With `All` it is only written once all three indices are present.
    /// * `.create_csv(bool)`: write the combined table to `snapshot_path`.
    ///   Only applies to `All`.
    /// * `.snapshot_path(impl Into<PathBuf>)`: defaults to `ENSO_Index.csv`
    ///   in the working directory.
    #[builder]
    pub async fn enso(
        &self,
        #[builder(default)] selector: EnsoSelector,
        #[builder(default)] use_cache: bool,
        #[builder(into)] cache_path: Option<PathBuf>,
        #[builder(default)] create_csv: bool,
        #[builder(into)] snapshot_path: Option<PathBuf>,
    ) -> Result<Option<IndexTable>, ClimateIndexError> {
        if let Some(index) = selector.single() {
            return self.load(index, use_cache, cache_path).await;
        }

        if use_cache {
            if let Some(path) = &cache_path {
                if let Some(table) = CsvStore::read(path, &enso_schema()).await? {
                    info!("Cache hit for ENSO at {:?}", path);
                    return Ok(Some(table));
                }
                warn!("Cache miss for ENSO at {:?}. Downloading.", path);
            }
        }

        let mut parts = Vec::with_capacity(ENSO_SOURCES.len());
        for index in ENSO_SOURCES {
            match self.load(index, use_cache, None).await? {
                Some(table) => parts.push(table),
                None => warn!("{} is unavailable and is left out of the ENSO table", index),
            }
        }
        if parts.is_empty() {
            return Ok(None);
        }
        let complete = parts.len() == ENSO_SOURCES.len();

        let enso = outer_join(&parts)?.select(&ENSO_COLUMNS);
        if let Some(path) = &cache_path {
            if complete {
                CsvStore::write(path, &enso).await?;
            } else {
                warn!("Not caching a partial ENSO table to {:?}", path);
            }
        }
        if create_csv {
            let path = snapshot_path.unwrap_or_else(|| PathBuf::from(ENSO_SNAPSHOT_FILE));
            CsvStore::write(&path, &enso).await?;
        }
        Ok(Some(enso))
    }

    /// Monthly asymmetric/symmetric SAM at every level:
    /// `Lev, Date, Index, Value, Value_normalized`.
    #[builder]
    pub async fn asymsam_monthly(&self) -> Result<Option<SamTable>, ClimateIndexError> {
        let Some(raw) = self.download_text("asymsam", &self.sam_feeds.monthly_url).await? else {
            return Ok(None);
        };
        Ok(Some(asymsam::decode_monthly(&raw)?))
    }

    /// Daily asymmetric/symmetric SAM: `Lev, Date, Index, Value, R.squared`.
    ///
    /// Levels are downloaded one after another and concatenated in request
    /// order. A level whose download fails is skipped.
    ///
    /// # Builder arguments
    ///
    /// * `.levels(impl Into<SamLevels>)`: a level, a list of levels or
    ///   [`SamLevels::All`]. Defaults to 700 hPa.
    ///
    /// # Errors
    ///
    /// [`ClimateIndexError::InvalidArgument`] if a level is not published,
    /// before anything is downloaded.
    #[builder]
    pub async fn asymsam_daily(
        &self,
        #[builder(default, into)] levels: SamLevels,
    ) -> Result<Option<SamTable>, ClimateIndexError> {
        let levels = levels.resolve()?;

        let mut tables = Vec::with_capacity(levels.len());
        for level in levels {
            info!("Downloading SAM level: {} hPa", level);
            let url = self.sam_feeds.daily_url(level);
            match self.download_text("asymsam", &url).await? {
                Some(raw) => tables.push(asymsam::decode_daily(&raw)?),
                None => warn!("Skipping SAM level {} hPa", level),
            }
        }
        Ok(SamTable::concat(tables))
    }
}

impl ClimateIndices {
    /// Read-through cache around [`Self::download`].
    async fn load(
        &self,
        index: ClimateIndex,
        use_cache: bool,
        cache_path: Option<PathBuf>,
    ) -> Result<Option<IndexTable>, ClimateIndexError> {
        let Some(path) = cache_path else {
            return if use_cache {
                self.memo.get_or_load(index, || self.download(index)).await
            } else {
                self.download(index).await
            };
        };

        if use_cache {
            if let Some(table) = CsvStore::read(&path, &index.source().schema()).await? {
                info!("Cache hit for {} at {:?}", index, path);
                return Ok(Some(table));
            }
            warn!("Cache miss for {} at {:?}. Downloading.", index, path);
        }

        let Some(table) = self.download(index).await? else {
            return Ok(None);
        };
        CsvStore::write(&path, &table).await?;
        Ok(Some(table))
    }

    async fn download(&self, index: ClimateIndex) -> Result<Option<IndexTable>, ClimateIndexError> {
        let url = self.upstream_url(index, Utc::now().date_naive());
        let Some(raw) = self.download_text(index.label(), &url).await? else {
            return Ok(None);
        };
        index.source().build(&raw).map(Some)
    }

    /// Fetches `url`, turning soft failures into `None`.
    async fn download_text(&self, what: &str, url: &str) -> Result<Option<String>, ClimateIndexError> {
        match self.fetcher.fetch(url).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.is_soft() => {
                report_soft_failure(what, &e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn report_soft_failure(what: &str, error: &FetchError) {
    if error.is_connectivity() {
        warn!("{} ({}: {})", CONNECTION_REQUIRED, what, error);
    } else {
        warn!("Could not download {}: {}", what, error);
    }
}
