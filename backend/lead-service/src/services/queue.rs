/// Queue service - maintains ordering and scores of the active-lead set
///
/// Every operation runs as a single transaction so concurrent moves cannot
/// interleave and produce duplicate or skipped positions; row ordering
/// conflicts are left to PostgreSQL's transactional isolation.
use crate::db::lead_repo;
use crate::error::Result;
use crate::models::Lead;
use crate::services::scoring::{self, ScoreInputs};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Leads scoring at or above this are counted as high priority
const HIGH_PRIORITY_THRESHOLD: i32 = 70;

/// One entry of a bulk reorder request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeadPosition {
    pub lead_id: Uuid,
    pub position: i32,
}

/// Queue metrics for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct QueueStats {
    pub total_leads: i64,
    pub active_leads: i64,
    pub by_status: HashMap<String, i64>,
    pub by_tier: HashMap<String, i64>,
    pub total_value: f64,
    pub avg_score: f64,
    pub high_priority_count: i64,
}

/// Inclusive position band shifted to make room for a moved lead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ShiftBand {
    lo: i32,
    hi: i32,
    delta: i32,
}

/// Band of other leads displaced by moving a lead from `old` to `new`.
///
/// Moving earlier shifts `[new, old)` up by one; moving later shifts
/// `(old, new]` down by one. Equal positions displace nothing.
fn shift_band(old: i32, new: i32) -> Option<ShiftBand> {
    if new < old {
        Some(ShiftBand {
            lo: new,
            hi: old - 1,
            delta: 1,
        })
    } else if new > old {
        Some(ShiftBand {
            lo: old + 1,
            hi: new,
            delta: -1,
        })
    } else {
        None
    }
}

pub struct QueueService {
    pool: PgPool,
}

impl QueueService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Re-sort all active leads by score descending and reassign contiguous
    /// 0-based positions. Discards any prior manual ordering. Ties rank the
    /// earlier-created lead first.
    pub async fn auto_prioritize(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let ids = lead_repo::active_ids_by_score(&mut tx).await?;
        for (rank, id) in ids.iter().enumerate() {
            lead_repo::set_position(&mut tx, *id, rank as i32).await?;
        }

        tx.commit().await?;

        tracing::info!(count = ids.len(), "queue reprioritized by score");
        Ok(ids.len() as u64)
    }

    /// Recompute and persist the score of every active lead from its current
    /// attributes. Queue positions are untouched; repeat runs are no-ops for
    /// unchanged inputs.
    pub async fn recalculate_all_scores(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let leads = lead_repo::active_leads(&mut tx).await?;
        for lead in &leads {
            let score = scoring::calculate_score(&ScoreInputs::from(lead));
            if score != lead.score {
                lead_repo::set_score(&mut tx, lead.id, score).await?;
            }
        }

        tx.commit().await?;

        tracing::info!(count = leads.len(), "lead scores recalculated");
        Ok(leads.len() as u64)
    }

    /// Move a lead to a specific position, shifting the displaced band of
    /// other active leads by one slot. Returns `None` when the lead is
    /// unknown or inactive; equal old/new positions are a successful no-op.
    pub async fn move_lead(&self, lead_id: Uuid, new_position: i32) -> Result<Option<Lead>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut lead) = lead_repo::find_lead_for_update(&mut tx, lead_id).await? else {
            return Ok(None);
        };
        if !lead.is_active {
            return Ok(None);
        }

        let old_position = lead.queue_position;
        if let Some(band) = shift_band(old_position, new_position) {
            lead_repo::shift_positions(&mut tx, band.lo, band.hi, band.delta, lead_id).await?;
            lead_repo::set_position(&mut tx, lead_id, new_position).await?;
            lead.queue_position = new_position;
        }

        tx.commit().await?;

        tracing::debug!(
            %lead_id,
            old_position,
            new_position,
            "lead moved in queue"
        );
        Ok(Some(lead))
    }

    /// Apply caller-supplied positions directly, skipping unknown ids.
    ///
    /// No shift-compaction and no validation: the caller is trusted to
    /// supply a globally consistent assignment (e.g. a full drag-and-drop
    /// reorder). `normalize_positions` recovers from inconsistent input.
    pub async fn bulk_reorder(&self, positions: &[LeadPosition]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let mut count = 0u64;
        for item in positions {
            if lead_repo::set_position(&mut tx, item.lead_id, item.position).await? {
                count += 1;
            }
        }

        tx.commit().await?;

        tracing::info!(requested = positions.len(), updated = count, "bulk reorder applied");
        Ok(count)
    }

    /// Reassign contiguous 0-based positions to active leads in their
    /// current relative order, closing gaps left by soft deletes or
    /// inconsistent bulk updates. Stable: position ties keep their read
    /// order (creation time, then id).
    pub async fn normalize_positions(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let ids = lead_repo::active_ids_by_position(&mut tx).await?;
        for (rank, id) in ids.iter().enumerate() {
            lead_repo::set_position(&mut tx, *id, rank as i32).await?;
        }

        tx.commit().await?;

        tracing::info!(count = ids.len(), "queue positions normalized");
        Ok(ids.len() as u64)
    }

    /// Prioritized queue of active leads, position ascending
    pub async fn get_queue(&self, limit: i64) -> Result<Vec<Lead>> {
        Ok(lead_repo::get_queue(&self.pool, limit).await?)
    }

    /// Aggregate queue statistics; an empty queue yields zeros
    pub async fn get_stats(&self) -> Result<QueueStats> {
        let total_leads = lead_repo::count_all(&self.pool).await?;
        let active_leads = lead_repo::count_active(&self.pool).await?;
        let by_status: HashMap<String, i64> = lead_repo::count_active_by_status(&self.pool)
            .await?
            .into_iter()
            .collect();
        let by_tier: HashMap<String, i64> = lead_repo::count_active_by_tier(&self.pool)
            .await?
            .into_iter()
            .collect();
        let total_value = lead_repo::sum_active_value(&self.pool).await?;
        let avg_score = (lead_repo::avg_active_score(&self.pool).await? * 10.0).round() / 10.0;
        let high_priority_count =
            lead_repo::count_high_priority(&self.pool, HIGH_PRIORITY_THRESHOLD).await?;

        Ok(QueueStats {
            total_leads,
            active_leads,
            by_status,
            by_tier,
            total_value,
            avg_score,
            high_priority_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_band_moving_earlier() {
        // Moving from 5 to 2 displaces [2, 4] up by one
        let band = shift_band(5, 2).unwrap();
        assert_eq!(band, ShiftBand { lo: 2, hi: 4, delta: 1 });
    }

    #[test]
    fn test_shift_band_moving_later() {
        // Moving from 1 to 4 displaces [2, 4] down by one
        let band = shift_band(1, 4).unwrap();
        assert_eq!(band, ShiftBand { lo: 2, hi: 4, delta: -1 });
    }

    #[test]
    fn test_shift_band_adjacent_swap() {
        let band = shift_band(3, 2).unwrap();
        assert_eq!(band, ShiftBand { lo: 2, hi: 2, delta: 1 });

        let band = shift_band(2, 3).unwrap();
        assert_eq!(band, ShiftBand { lo: 3, hi: 3, delta: -1 });
    }

    #[test]
    fn test_shift_band_same_position_is_noop() {
        assert!(shift_band(4, 4).is_none());
    }

    #[test]
    fn test_shift_band_to_front_and_back() {
        // Lead at the back moves to the front: everyone in [0, old) shifts up
        let band = shift_band(9, 0).unwrap();
        assert_eq!(band, ShiftBand { lo: 0, hi: 8, delta: 1 });

        // Lead at the front moves to the back: everyone in (0, new] shifts down
        let band = shift_band(0, 9).unwrap();
        assert_eq!(band, ShiftBand { lo: 1, hi: 9, delta: -1 });
    }

    #[test]
    fn test_shift_band_preserves_permutation() {
        // Simulate a contiguous queue 0..n and verify every move keeps the
        // position set {0..n-1} intact.
        let n = 6;
        for old in 0..n {
            for new in 0..n {
                let mut positions: Vec<i32> = (0..n).collect();
                if let Some(band) = shift_band(old, new) {
                    for p in positions.iter_mut() {
                        if *p == old {
                            *p = new;
                        } else if *p >= band.lo && *p <= band.hi {
                            *p += band.delta;
                        }
                    }
                }
                let mut sorted = positions.clone();
                sorted.sort_unstable();
                let expected: Vec<i32> = (0..n).collect();
                assert_eq!(sorted, expected, "move {} -> {} broke the permutation", old, new);
            }
        }
    }
}
