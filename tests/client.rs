use climate_indices::{
    ClimateIndex, ClimateIndexError, ClimateIndices, EnsoSelector, FetchError, Month, Phase,
    SamFeeds, SamIndex, SamLevels,
};
use mockito::{Server, ServerGuard};
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

const NINO34: &str = "YR   MON  TOTAL ClimAdjust ANOM\n\
1950   1   24.56   26.18   -1.62\n\
1950   2   25.07   26.39   -1.32\n\
1950   3   25.88   26.95   -1.07\n\
1950   4   26.29   27.39   -1.11\n";

const SOI: &str = "SOUTHERN OSCILLATION INDEX\n\
ANOMALY\n\
YEAR   JAN   FEB   MAR   APR   MAY   JUN   JUL   AUG   SEP   OCT   NOV   DEC\n\
1950   1.0   1.0   1.0   1.0   1.0   1.0   1.0   1.0   1.0   1.0   1.0   1.0\n\
STANDARDIZED    DATA\n\
YEAR   JAN   FEB   MAR   APR   MAY   JUN   JUL   AUG   SEP   OCT   NOV   DEC\n\
1950   1.5   0.9  -0.1  -0.3  -0.7   0.2  -1.0  -0.2  -1.1  -1.0  -0.8  -0.7\n";

const NPGO: &str = "# NPGO index\n# YEAR MONTH NPGO\n1950 1 -1.86\n1950 2 -0.49\n";

const AO: &str = "         Jan    Feb    Mar    Apr    May    Jun    Jul    Aug    Sep    Oct    Nov    Dec\n\
1950 -0.060  0.627 -0.008  0.555  0.072  0.539 -0.802 -0.851  0.358 -0.379 -0.515 -1.928\n";

const SAM_DAILY: &str = "Lev,Date,Index,Value,R.squared\n\
700,1979-01-01,sam,0.42,0.71\n\
700,1979-01-01,asam,0.12,0.33\n";

async fn client_in(dir: &TempDir) -> Result<ClimateIndices, ClimateIndexError> {
    ClimateIndices::with_cache_folder(dir.path().join("cache")).await
}

async fn serve(server: &mut ServerGuard, path: &str, body: &str) -> mockito::Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn oni_is_downloaded_and_derived() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    let _m = serve(&mut server, "/nino34.txt", NINO34).await;
    let dir = tempdir()?;
    let client = client_in(&dir)
        .await?
        .with_upstream_url(ClimateIndex::Oni, format!("{}/nino34.txt", server.url()));

    let oni = client.oni().call().await?.expect("ONI table");

    assert_eq!(oni.len(), 4);
    assert_eq!(oni.record(1).and_then(|r| r.month()), Some(Month::Feb));
    assert_eq!(oni.texts("ONI_month_window").unwrap()[1].as_deref(), Some("JFM"));
    assert_eq!(oni.phases("phase").unwrap()[1], Some(Phase::CoolLaNina));
    Ok(())
}

#[tokio::test]
async fn http_errors_yield_no_table() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/ao.txt")
        .with_status(404)
        .create_async()
        .await;
    let dir = tempdir()?;
    let client = client_in(&dir)
        .await?
        .with_upstream_url(ClimateIndex::Ao, format!("{}/ao.txt", server.url()));

    assert!(client.ao().call().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn unreachable_upstream_yields_no_table() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let client = client_in(&dir)
        .await?
        .with_upstream_url(ClimateIndex::Dmi, "http://127.0.0.1:9/dmi.data");

    assert!(client.dmi().call().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn upstream_outage_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    let _redirect = server
        .mock("GET", "/soi")
        .with_status(302)
        .with_header("location", "/shutdown.html")
        .create_async()
        .await;
    let _page = serve(&mut server, "/shutdown.html", "<html>closed</html>").await;
    let dir = tempdir()?;
    let client = client_in(&dir)
        .await?
        .with_upstream_url(ClimateIndex::Soi, format!("{}/soi", server.url()));

    let err = client.soi().call().await.unwrap_err();
    assert!(matches!(
        err,
        ClimateIndexError::Fetch(FetchError::UpstreamOutage { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn undecodable_document_is_a_format_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    let _m = serve(&mut server, "/soi", "maintenance window\n").await;
    let dir = tempdir()?;
    let client = client_in(&dir)
        .await?
        .with_upstream_url(ClimateIndex::Soi, format!("{}/soi", server.url()));

    let err = client.soi().call().await.unwrap_err();
    assert!(matches!(err, ClimateIndexError::Format(_)));
    Ok(())
}

#[tokio::test]
async fn cache_file_is_written_then_read() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    let download = server
        .mock("GET", "/ao.txt")
        .with_status(200)
        .with_body(AO)
        .expect(1)
        .create_async()
        .await;
    let dir = tempdir()?;
    let path: PathBuf = dir.path().join("ao.csv");
    let client = client_in(&dir)
        .await?
        .with_upstream_url(ClimateIndex::Ao, format!("{}/ao.txt", server.url()));

    let fresh = client
        .ao()
        .use_cache(true)
        .cache_path(&path)
        .call()
        .await?
        .expect("downloaded");
    assert!(path.is_file());

    let cached = client
        .ao()
        .use_cache(true)
        .cache_path(&path)
        .call()
        .await?
        .expect("cached");

    assert_eq!(fresh, cached);
    download.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn cached_flag_uses_the_cache_folder() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    let _m = serve(&mut server, "/npgo.txt", NPGO).await;
    let dir = tempdir()?;
    let client = client_in(&dir)
        .await?
        .with_upstream_url(ClimateIndex::Npgo, format!("{}/npgo.txt", server.url()));

    client
        .fetch()
        .index(ClimateIndex::Npgo)
        .cached(true)
        .call()
        .await?;

    assert!(client.cache_file_path(ClimateIndex::Npgo).is_file());
    Ok(())
}

#[tokio::test]
async fn memo_downloads_once_per_client() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    let download = server
        .mock("GET", "/npgo.txt")
        .with_status(200)
        .with_body(NPGO)
        .expect(1)
        .create_async()
        .await;
    let dir = tempdir()?;
    let client = client_in(&dir)
        .await?
        .with_upstream_url(ClimateIndex::Npgo, format!("{}/npgo.txt", server.url()));

    let first = client.npgo().use_cache(true).call().await?;
    let second = client.npgo().use_cache(true).call().await?;

    assert_eq!(first, second);
    download.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn enso_joins_oni_soi_and_npgo() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    let _oni = serve(&mut server, "/oni", NINO34).await;
    let _soi = serve(&mut server, "/soi", SOI).await;
    let _npgo = serve(&mut server, "/npgo", NPGO).await;
    let dir = tempdir()?;
    let snapshot = dir.path().join("ENSO_Index.csv");
    let client = client_in(&dir)
        .await?
        .with_upstream_url(ClimateIndex::Oni, format!("{}/oni", server.url()))
        .with_upstream_url(ClimateIndex::Soi, format!("{}/soi", server.url()))
        .with_upstream_url(ClimateIndex::Npgo, format!("{}/npgo", server.url()));

    let enso = client
        .enso()
        .create_csv(true)
        .snapshot_path(&snapshot)
        .call()
        .await?
        .expect("ENSO table");

    assert_eq!(
        enso.column_names(),
        vec!["Year", "Month", "Date", "ONI", "phase", "SOI", "NPGO"]
    );
    // SOI covers all of 1950, the others only its first months.
    assert_eq!(enso.len(), 12);
    assert_eq!(enso.floats("SOI").unwrap()[0], Some(1.5));
    assert_eq!(enso.floats("NPGO").unwrap()[1], Some(-0.49));
    assert_eq!(enso.floats("NPGO").unwrap()[2], None);
    assert!(snapshot.is_file());
    Ok(())
}

#[tokio::test]
async fn enso_leaves_out_unavailable_indices() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    let _npgo = serve(&mut server, "/npgo", NPGO).await;
    let dir = tempdir()?;
    let client = client_in(&dir)
        .await?
        .with_upstream_url(ClimateIndex::Oni, "http://127.0.0.1:9/oni")
        .with_upstream_url(ClimateIndex::Soi, "http://127.0.0.1:9/soi")
        .with_upstream_url(ClimateIndex::Npgo, format!("{}/npgo", server.url()));

    let enso = client.enso().call().await?.expect("NPGO alone");
    assert_eq!(enso.column_names(), vec!["Year", "Month", "Date", "NPGO"]);

    let single = client
        .enso()
        .selector(EnsoSelector::Npgo)
        .call()
        .await?
        .expect("NPGO table");
    assert_eq!(single.len(), 2);
    Ok(())
}

#[tokio::test]
async fn sam_daily_concatenates_levels_and_skips_failures() -> Result<(), Box<dyn std::error::Error>>
{
    let mut server = Server::new_async().await;
    let _ok = serve(&mut server, "/levels/sam_700hPa.csv", SAM_DAILY).await;
    let _missing = server
        .mock("GET", "/levels/sam_50hPa.csv")
        .with_status(404)
        .create_async()
        .await;
    let dir = tempdir()?;
    let client = client_in(&dir).await?.with_sam_feeds(SamFeeds {
        monthly_url: format!("{}/monthly.csv", server.url()),
        daily_root: format!("{}/levels/", server.url()),
    });

    let sam = client
        .asymsam_daily()
        .levels(vec![50u16, 700])
        .call()
        .await?
        .expect("700 hPa table");

    assert_eq!(sam.levels(), vec![700]);
    assert_eq!(sam.filter_index(SamIndex::Asam).count(), 1);

    let err = client
        .asymsam_daily()
        .levels(SamLevels::Levels(vec![123]))
        .call()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("123"));
    Ok(())
}

#[tokio::test]
async fn enso_composite_is_served_from_its_cache_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    let mut downloads = Vec::new();
    for (path, body) in [("/oni", NINO34), ("/soi", SOI), ("/npgo", NPGO)] {
        downloads.push(
            server
                .mock("GET", path)
                .with_status(200)
                .with_body(body)
                .expect(1)
                .create_async()
                .await,
        );
    }
    let dir = tempdir()?;
    let cache = dir.path().join("enso.csv");
    let client = client_in(&dir)
        .await?
        .with_upstream_url(ClimateIndex::Oni, format!("{}/oni", server.url()))
        .with_upstream_url(ClimateIndex::Soi, format!("{}/soi", server.url()))
        .with_upstream_url(ClimateIndex::Npgo, format!("{}/npgo", server.url()));

    let fresh = client
        .enso()
        .use_cache(true)
        .cache_path(&cache)
        .call()
        .await?
        .expect("downloaded ENSO table");
    assert!(cache.is_file());

    let cached = client
        .enso()
        .use_cache(true)
        .cache_path(&cache)
        .call()
        .await?
        .expect("cached ENSO table");

    assert_eq!(fresh, cached);
    assert_eq!(cached.phases("phase").unwrap()[1], Some(Phase::CoolLaNina));
    for download in &downloads {
        download.assert_async().await;
    }
    Ok(())
}

#[tokio::test]
async fn enso_single_selector_uses_the_cache_path() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    let download = server
        .mock("GET", "/npgo")
        .with_status(200)
        .with_body(NPGO)
        .expect(1)
        .create_async()
        .await;
    let dir = tempdir()?;
    let cache = dir.path().join("npgo.csv");
    let client = client_in(&dir)
        .await?
        .with_upstream_url(ClimateIndex::Npgo, format!("{}/npgo", server.url()));

    for _ in 0..2 {
        let npgo = client
            .enso()
            .selector(EnsoSelector::Npgo)
            .use_cache(true)
            .cache_path(&cache)
            .call()
            .await?
            .expect("NPGO table");
        assert_eq!(npgo.len(), 2);
    }
    download.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn injected_http_client_is_used_for_downloads() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    let download = server
        .mock("GET", "/npgo")
        .match_header("user-agent", "climate-indices-tests")
        .with_status(200)
        .with_body(NPGO)
        .expect(1)
        .create_async()
        .await;
    let http = reqwest::Client::builder()
        .user_agent("climate-indices-tests")
        .build()?;
    let dir = tempdir()?;
    let client = client_in(&dir)
        .await?
        .with_http_client(http)
        .with_upstream_url(ClimateIndex::Npgo, format!("{}/npgo", server.url()));

    assert!(client.npgo().call().await?.is_some());
    download.assert_async().await;
    Ok(())
}
