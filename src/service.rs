//! Ladder ranking service: the roster in memory, per-ladder locking, and persistence.
//!
//! Each single-player change runs as one step:
//! lock the ladders it touches (in tier order), stage the change on a copy of those
//! ladders, save the changed records, then commit them to the in-memory roster.
//! A failed save commits nothing, so a ladder is never left with gaps.
//! Batches (promotion lists, rating lists) are not atomic: each entry is its own step.

use crate::logic;
use crate::models::{
    CandidateEntry, LadderError, LadderFix, LadderName, Player, PlayerId, PromotionCandidate,
    PromotionFailure, PromotionOutcome, PromotionRecord, PromotionReport, RatingChange,
    RatingUpdate, RatingUpdateEntry, RatingUpdateReport, Roster,
};
use crate::store::{self, PlayerStore, StoreError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

/// How often a promotion re-reads a player that moved between lookup and locking.
const MAX_LOCK_ATTEMPTS: usize = 3;

/// One mutex per ladder. Guards are always taken in tier order.
struct LadderLocks {
    locks: HashMap<LadderName, Mutex<()>>,
}

impl LadderLocks {
    fn new() -> Self {
        Self {
            locks: LadderName::ALL
                .into_iter()
                .map(|l| (l, Mutex::new(())))
                .collect(),
        }
    }

    /// The mutexes guard no data, so a guard poisoned by a panicking step is taken over as-is.
    fn lock(&self, ladders: &[LadderName]) -> Vec<MutexGuard<'_, ()>> {
        let mut ladders = ladders.to_vec();
        ladders.sort();
        ladders.dedup();
        ladders
            .into_iter()
            .filter_map(|l| self.locks.get(&l))
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner))
            .collect()
    }

    fn lock_all(&self) -> Vec<MutexGuard<'_, ()>> {
        self.lock(&LadderName::ALL)
    }
}

pub struct LadderService {
    roster: RwLock<Roster>,
    locks: LadderLocks,
    store: Box<dyn PlayerStore>,
    backup_dir: Option<PathBuf>,
}

impl LadderService {
    /// Load every record from `store`. Backups before promotion and rating batches go to
    /// `backup_dir`.
    pub fn open(
        store: Box<dyn PlayerStore>,
        backup_dir: Option<PathBuf>,
    ) -> Result<Self, StoreError> {
        let roster = Roster::from_players(store.load()?);
        for ladder in LadderName::ALL {
            if roster.max_position(ladder) == u32::MAX {
                log::warn!(
                    "{} has a player at position {}; promotions into it fail until fix-positions runs",
                    ladder,
                    u32::MAX
                );
            } else if !roster.is_dense(ladder) {
                log::warn!("{} has position gaps; run fix-positions to repair", ladder);
            }
        }
        Ok(Self {
            roster: RwLock::new(roster),
            locks: LadderLocks::new(),
            store,
            backup_dir,
        })
    }

    /// Service over an in-memory store with no backups.
    pub fn in_memory(players: Vec<Player>) -> Self {
        Self {
            roster: RwLock::new(Roster::from_players(players.iter().cloned())),
            locks: LadderLocks::new(),
            store: Box::new(store::MemoryStore::with_players(players)),
            backup_dir: None,
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Roster>, StoreError> {
        self.roster.read().map_err(|_| StoreError::LockPoisoned)
    }

    /// Save what changed between `base` and `staged`, then apply it to the live roster.
    /// Callers must hold the locks of every ladder the change touches.
    fn commit(&self, base: &Roster, staged: &Roster) -> Result<usize, StoreError> {
        let changed = staged.changed_since(base);
        if changed.is_empty() {
            return Ok(0);
        }
        self.store.save(&changed)?;
        let mut g = self.roster.write().map_err(|_| StoreError::LockPoisoned)?;
        let count = changed.len();
        for p in changed {
            g.upsert(p);
        }
        Ok(count)
    }

    /// Copy of every record, sorted by ladder and position.
    pub fn players(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.read()?.to_sorted_vec())
    }

    /// Records of one ladder in ladder order, active players first.
    pub fn ladder_players(&self, ladder: LadderName) -> Result<Vec<Player>, StoreError> {
        Ok(self.read()?.ladder(ladder).into_iter().cloned().collect())
    }

    pub fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        Ok(self.read()?.get(id).cloned())
    }

    /// Players ready to move up. Read-only.
    pub fn check_promotion_candidates(&self) -> Result<Vec<PromotionCandidate>, StoreError> {
        let roster = self.read()?;
        let candidates = logic::check_promotion_candidates(&roster);
        drop(roster);
        log::info!("Found {} players ready for promotion", candidates.len());
        Ok(candidates)
    }

    /// Promote one player as a single locked, persisted step.
    pub fn promote_one(&self, player_id: PlayerId) -> Result<PromotionRecord, LadderError> {
        for _ in 0..MAX_LOCK_ATTEMPTS {
            let (from, to) = {
                let roster = self.read()?;
                let p = roster
                    .get(player_id)
                    .ok_or(LadderError::PlayerNotFound(player_id))?;
                (p.ladder_name, p.promotion_target())
            };
            // No target: lock the source only and let promote_player report why.
            let ladders: Vec<LadderName> = std::iter::once(from).chain(to).collect();
            let _guards = self.locks.lock(&ladders);

            let base = self.read()?.subset(&ladders);
            let still_there = base
                .get(player_id)
                .map(|p| p.ladder_name == from && p.promotion_target() == to)
                .unwrap_or(false);
            if !still_there {
                log::debug!("Player {} moved before its ladders were locked, retrying", player_id);
                continue;
            }

            let mut staged = base.clone();
            let record = logic::promote_player(&mut staged, player_id)?;
            self.commit(&base, &staged)?;
            return Ok(record);
        }
        Err(LadderError::Contended(player_id))
    }

    /// Promote each candidate in order. Failures are recorded per candidate and never stop
    /// the rest of the batch.
    pub fn promote(&self, candidates: &[CandidateEntry]) -> PromotionReport {
        let backup_file = self.backup("ladder-promotion-backup");

        let outcomes: Vec<PromotionOutcome> = candidates
            .iter()
            .map(|entry| match entry {
                CandidateEntry::Valid(c) => match self.promote_one(c.id) {
                    Ok(record) => PromotionOutcome::Promoted(record),
                    Err(e) => {
                        log::warn!(
                            "Error promoting {}: {}",
                            c.display_name().unwrap_or_else(|| c.id.to_string()),
                            e
                        );
                        PromotionOutcome::Failed(PromotionFailure {
                            player_id: Some(c.id),
                            name: c.display_name(),
                            reason: e.to_string(),
                        })
                    }
                },
                CandidateEntry::Malformed(value) => {
                    let e = LadderError::MalformedCandidate(format!("no player id in {}", value));
                    log::warn!("Skipping candidate: {}", e);
                    PromotionOutcome::Failed(PromotionFailure {
                        player_id: None,
                        name: None,
                        reason: e.to_string(),
                    })
                }
            })
            .collect();

        let report = PromotionReport::from_outcomes(outcomes, backup_file);
        log::info!(
            "Ladder promotion completed. Promoted: {}, Errors: {}, Re-indexed: {}",
            report.promoted_count,
            report.error_count,
            report.total_reindexed()
        );
        report
    }

    /// Compress every ladder's positions to 1..=N. Holds all ladder locks for the duration.
    pub fn fix_positions(&self) -> Result<Vec<LadderFix>, StoreError> {
        let _guards = self.locks.lock_all();
        let base = self.read()?.clone();
        let mut staged = base.clone();
        let results = logic::fix_positions(&mut staged);
        self.commit(&base, &staged)?;
        log::info!(
            "Ladder position fix completed: {}",
            results
                .iter()
                .map(|r| format!("{} {}/{}", r.ladder, r.fixed_positions, r.total_players))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(results)
    }

    /// Apply rating updates one by one, after a backup of the roster.
    /// Bad entries and unknown players are counted as errors.
    pub fn update_ratings(&self, updates: &[RatingUpdateEntry]) -> RatingUpdateReport {
        let mut report = RatingUpdateReport {
            success: true,
            backup_file: self.backup("fargo-backup"),
            ..RatingUpdateReport::default()
        };
        for entry in updates {
            let update = match entry {
                RatingUpdateEntry::Valid(u) => u,
                RatingUpdateEntry::Malformed(value) => {
                    log::warn!("Skipping invalid update entry: {}", value);
                    report.error_count += 1;
                    continue;
                }
            };
            match self.update_rating(update) {
                Ok(Some(change)) => {
                    report.updated_count += 1;
                    report.changes.push(change);
                }
                Ok(None) => report.unchanged_count += 1,
                Err(e) => {
                    log::warn!("Rating update for {} failed: {}", update.player_id, e);
                    report.error_count += 1;
                }
            }
        }
        log::info!(
            "Rating update completed. Updated: {}, Unchanged: {}, Errors: {}",
            report.updated_count,
            report.unchanged_count,
            report.error_count
        );
        report
    }

    fn update_rating(&self, update: &RatingUpdate) -> Result<Option<RatingChange>, LadderError> {
        for _ in 0..MAX_LOCK_ATTEMPTS {
            let ladder = self
                .read()?
                .get(update.player_id)
                .map(|p| p.ladder_name)
                .ok_or(LadderError::PlayerNotFound(update.player_id))?;
            let _guards = self.locks.lock(&[ladder]);
            let base = self.read()?.subset(&[ladder]);
            if base.get(update.player_id).is_none() {
                continue;
            }
            let mut staged = base.clone();
            let change = logic::apply_rating(&mut staged, update)?;
            self.commit(&base, &staged)?;
            return Ok(change);
        }
        Err(LadderError::Contended(update.player_id))
    }

    /// Append new players at the bottom of their ladders, in the given order.
    /// Returns how many records were written. Nothing is written if any player can't be placed.
    pub fn import_players(&self, players: Vec<Player>) -> Result<usize, LadderError> {
        let _guards = self.locks.lock_all();
        let base = self.read()?.clone();
        let mut staged = base.clone();
        for p in players {
            staged.append(p)?;
        }
        let written = self.commit(&base, &staged)?;
        log::info!("Imported {} players", written);
        Ok(written)
    }

    fn backup(&self, prefix: &str) -> Option<String> {
        let dir = self.backup_dir.as_ref()?;
        let snapshot = match self.players() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Skipping backup: {}", e);
                return None;
            }
        };
        match store::write_backup(dir, prefix, &snapshot) {
            Ok(path) => Some(path.display().to_string()),
            Err(e) => {
                log::warn!("Backup to {} failed: {}", dir.display(), e);
                None
            }
        }
    }
}
