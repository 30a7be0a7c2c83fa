//! CSV roster import: `first_name,last_name,rating[,ladder][,active]`.

use crate::models::{LadderName, Player, MAX_RATING};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RosterRow {
    first_name: String,
    last_name: String,
    rating: u32,
    #[serde(default)]
    ladder: Option<String>,
    #[serde(default)]
    active: Option<bool>,
}

/// Players read from a roster file, in file order, plus the number of rows skipped.
#[derive(Debug, Default)]
pub struct ImportedRoster {
    pub players: Vec<Player>,
    pub skipped: usize,
}

/// Parse a roster. Rows that don't parse, have an empty name, an out-of-range rating or an
/// unknown ladder are logged and skipped. Without a ladder column a player goes to the
/// ladder their rating implies. Positions are assigned when the players are imported.
pub fn read_roster<R: Read>(reader: R) -> Result<ImportedRoster, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut out = ImportedRoster::default();

    for (i, row) in rdr.deserialize::<RosterRow>().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let row = match row {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e),
            Err(e) => {
                log::warn!("Roster line {}: {}", line, e);
                out.skipped += 1;
                continue;
            }
        };
        if row.first_name.is_empty() && row.last_name.is_empty() {
            log::warn!("Roster line {}: empty name", line);
            out.skipped += 1;
            continue;
        }
        if row.rating > MAX_RATING {
            log::warn!("Roster line {}: rating {} out of range", line, row.rating);
            out.skipped += 1;
            continue;
        }
        let ladder = match row.ladder.as_deref().filter(|l| !l.is_empty()) {
            None => LadderName::for_rating(row.rating),
            Some(name) => match name.parse::<LadderName>() {
                Ok(l) => l,
                Err(e) => {
                    log::warn!("Roster line {}: {}", line, e);
                    out.skipped += 1;
                    continue;
                }
            },
        };
        let mut player = Player::new(row.first_name, row.last_name, row.rating, ladder, 0);
        player.is_active = row.active.unwrap_or(true);
        out.players.push(player);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_column_is_optional() {
        let csv = "first_name,last_name,rating\nAnn,Archer,498\nBob,Brown,500\nCy,Cole,9999\n";
        let roster = read_roster(csv.as_bytes()).unwrap();
        let ladders: Vec<LadderName> = roster.players.iter().map(|p| p.ladder_name).collect();
        assert_eq!(
            ladders,
            vec![LadderName::Under500, LadderName::From500To549, LadderName::Plus550]
        );
        assert!(roster.players.iter().all(|p| p.is_active && p.position == 0));
        assert_eq!(roster.skipped, 0);
    }

    #[test]
    fn bad_rows_are_skipped() {
        let csv = "\
first_name,last_name,rating,ladder
,,450,
Dee,Dunn,12000,
Eve,Evans,470,top
Fay,Fox,-3,
 Gus , Gray ,440,500-549
";
        let roster = read_roster(csv.as_bytes()).unwrap();
        assert_eq!(roster.skipped, 4);
        assert_eq!(roster.players.len(), 1);
        assert_eq!(roster.players[0].full_name(), "Gus Gray");
        assert_eq!(roster.players[0].ladder_name, LadderName::From500To549);
    }
}
