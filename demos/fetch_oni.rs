use climate_indices::{ClimateIndexError, ClimateIndices, IndexLazyFrame, Month, YearMonth};
use polars::prelude::*;
use std::env;

#[tokio::main]
async fn main() -> Result<(), ClimateIndexError> {
    configure_polars_display();
    let client = ClimateIndices::new().await?;

    let Some(oni) = client.oni().use_cache(true).call().await? else {
        eprintln!("ONI is unavailable right now");
        return Ok(());
    };
    println!("{} months of ONI", oni.len());

    let frame = IndexLazyFrame::from_table(&oni)?;
    let recent = frame
        .get_range(YearMonth::new(2023, Month::Jan), YearMonth::new(2024, Month::Dec))?
        .frame
        .select([col("Date"), col("ONI"), col("ONI_month_window"), col("phase")])
        .collect()?;
    println!("{}", recent);

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 24 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "24");
}
