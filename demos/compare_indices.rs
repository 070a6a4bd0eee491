//! Downloads the three CPC teleconnection indices and the PDO, joins them on
//! date and prints the most recent rows.

use climate_indices::derive::join::outer_join;
use climate_indices::{ClimateIndex, ClimateIndexError, ClimateIndices};
use std::env;

#[tokio::main]
async fn main() -> Result<(), ClimateIndexError> {
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    let client = ClimateIndices::new().await?;

    let mut tables = Vec::new();
    for index in [
        ClimateIndex::Ao,
        ClimateIndex::Nao,
        ClimateIndex::Aao,
        ClimateIndex::Pdo,
    ] {
        match client.fetch().index(index).cached(true).call().await? {
            Some(table) => {
                println!("{:>4}: {} rows", index.label(), table.len());
                tables.push(table);
            }
            None => println!("{:>4}: unavailable", index.label()),
        }
    }

    let joined = outer_join(&tables)?;
    let frame = joined.to_dataframe()?;
    println!("{}", frame.tail(Some(12)));

    Ok(())
}
