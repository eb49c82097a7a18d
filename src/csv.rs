use serde::Serialize;
use std::io;

use crate::Standing;

#[derive(Debug, Serialize)]
struct StandingRow<'a> {
    rank: usize,
    player: &'a str,
    name: &'a str,
    wins: u32,
    losses: u32,
}

/// Write standings in csv format, one row per player in rank order
pub fn write_standings<'a>(
    writer: impl io::Write,
    standings: impl IntoIterator<Item = &'a Standing>,
) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    // header is written even when there are no rows
    writer.write_record(["rank", "player", "name", "wins", "losses"])?;
    for standing in standings {
        writer.serialize(StandingRow {
            rank: standing.rank,
            player: &standing.player,
            name: &standing.name,
            wins: standing.wins,
            losses: standing.losses,
        })?;
    }

    writer.flush()?;
    Ok(())
}
