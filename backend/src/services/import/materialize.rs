//! Writes a reconciled scorecard as a round and its hole results.
//!
//! The two writes are independent. A failed hole batch leaves the round in
//! place and is reported as `ImportError::HolePersistence`, which carries the
//! round so the caller can still show it.

use super::reconcile::ReconciledRound;
use crate::db::{NewHoleResult, NewRound, RoundStore};
use crate::error::ImportError;
use common::model::round::{Round, RoundSource};
use log::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Materialized {
    pub round: Round,
    pub holes_inserted: usize,
}

pub fn materialize(
    store: &dyn RoundStore,
    reconciled: &ReconciledRound,
    user_id: &str,
    source_filename: &str,
) -> Result<Materialized, ImportError> {
    let new_round = NewRound {
        user_id: user_id.to_string(),
        course_name: reconciled.course_name.clone(),
        layout_name: reconciled.layout_name.clone(),
        start_time: reconciled.start_time,
        end_time: reconciled.end_time,
        total_strokes: reconciled.total_strokes,
        score_vs_par: reconciled.score_vs_par,
        round_rating: reconciled.round_rating,
        holes_count: i32::try_from(reconciled.hole_count).ok(),
        source: RoundSource::UdiscImport,
        source_ref: Some(source_filename.to_string()),
    };

    let round = store
        .insert_round(&new_round)
        .map_err(ImportError::RoundPersistence)?;
    info!(
        "Created round {} for user {} from '{}'",
        round.id, user_id, source_filename
    );

    if reconciled.holes.is_empty() {
        return Ok(Materialized {
            round,
            holes_inserted: 0,
        });
    }

    let holes: Vec<NewHoleResult> = reconciled
        .holes
        .iter()
        .map(|hole| NewHoleResult {
            round_id: round.id.clone(),
            play_order: hole.play_order,
            hole_label: hole.label.clone(),
            par: hole.par,
            strokes: hole.strokes,
            ob: false,
            notes: String::new(),
        })
        .collect();

    match store.insert_hole_results(&holes) {
        Ok(inserted) => Ok(Materialized {
            round,
            holes_inserted: inserted.len(),
        }),
        Err(source) => {
            warn!(
                "Round {} kept, but {} hole results failed to insert: {}",
                round.id,
                holes.len(),
                source
            );
            Err(ImportError::HolePersistence {
                round: Box::new(round),
                attempted: holes.len(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use crate::error::StoreError;
    use crate::services::import::reconcile::ReconciledHole;
    use chrono::Utc;
    use common::model::round::HoleResult;
    use std::sync::Mutex;

    /// Records calls and fails the stages it is told to.
    #[derive(Default)]
    struct ScriptedStore {
        fail_round: bool,
        fail_holes: bool,
        hole_batches: Mutex<Vec<usize>>,
    }

    impl RoundStore for ScriptedStore {
        fn insert_round(&self, round: &NewRound) -> Result<Round, StoreError> {
            if self.fail_round {
                return Err(StoreError::Poisoned);
            }
            Ok(Round {
                id: "round-1".to_string(),
                user_id: round.user_id.clone(),
                course_name: round.course_name.clone(),
                layout_name: round.layout_name.clone(),
                start_time: round.start_time,
                end_time: round.end_time,
                total_strokes: round.total_strokes,
                score_vs_par: round.score_vs_par,
                round_rating: round.round_rating,
                holes_count: round.holes_count,
                source: round.source,
                source_ref: round.source_ref.clone(),
                created_at: Utc::now(),
            })
        }

        fn insert_hole_results(
            &self,
            holes: &[NewHoleResult],
        ) -> Result<Vec<HoleResult>, StoreError> {
            self.hole_batches.lock().unwrap().push(holes.len());
            if self.fail_holes {
                return Err(StoreError::Poisoned);
            }
            Ok(holes
                .iter()
                .enumerate()
                .map(|(i, h)| HoleResult {
                    id: format!("hole-{}", i),
                    round_id: h.round_id.clone(),
                    play_order: h.play_order,
                    hole_label: h.hole_label.clone(),
                    par: h.par,
                    strokes: h.strokes,
                    ob: h.ob,
                    notes: h.notes.clone(),
                })
                .collect())
        }

        fn list_rounds(&self, _user_id: &str) -> Result<Vec<Round>, StoreError> {
            Ok(Vec::new())
        }

        fn list_hole_results(&self, _round_id: &str) -> Result<Vec<HoleResult>, StoreError> {
            Ok(Vec::new())
        }
    }

    fn reconciled(holes: Vec<ReconciledHole>) -> ReconciledRound {
        ReconciledRound {
            player_name: "Alice".to_string(),
            course_name: "Maple Hill".to_string(),
            layout_name: Some("Gold".to_string()),
            start_time: None,
            end_time: None,
            total_strokes: Some(7),
            score_vs_par: Some(1),
            round_rating: None,
            hole_count: 3,
            holes,
        }
    }

    fn hole(play_order: i32, strokes: i32) -> ReconciledHole {
        ReconciledHole {
            play_order,
            label: play_order.to_string(),
            par: Some(3),
            strokes,
        }
    }

    #[test]
    fn writes_round_then_holes() {
        let store = SqliteStore::open_in_memory().unwrap();
        let result = materialize(
            &store,
            &reconciled(vec![hole(1, 3), hole(3, 4)]),
            "user-1",
            "scorecard.csv",
        )
        .unwrap();

        assert_eq!(result.holes_inserted, 2);
        assert_eq!(result.round.source, RoundSource::UdiscImport);
        assert_eq!(result.round.source_ref.as_deref(), Some("scorecard.csv"));
        assert_eq!(result.round.holes_count, Some(3));

        let stored = store.list_hole_results(&result.round.id).unwrap();
        let orders: Vec<i32> = stored.iter().map(|h| h.play_order).collect();
        assert_eq!(orders, vec![1, 3]);
        assert!(stored.iter().all(|h| !h.ob && h.notes.is_empty()));
    }

    #[test]
    fn no_retained_holes_skips_hole_write() {
        let store = ScriptedStore::default();
        let result = materialize(&store, &reconciled(vec![]), "user-1", "a.csv").unwrap();
        assert_eq!(result.holes_inserted, 0);
        assert!(store.hole_batches.lock().unwrap().is_empty());
    }

    #[test]
    fn round_failure_stops_before_holes() {
        let store = ScriptedStore {
            fail_round: true,
            ..Default::default()
        };
        let err = materialize(&store, &reconciled(vec![hole(1, 3)]), "user-1", "a.csv")
            .unwrap_err();
        assert!(matches!(err, ImportError::RoundPersistence(_)));
        assert!(store.hole_batches.lock().unwrap().is_empty());
    }

    #[test]
    fn hole_failure_keeps_the_round() {
        let store = ScriptedStore {
            fail_holes: true,
            ..Default::default()
        };
        let err = materialize(
            &store,
            &reconciled(vec![hole(1, 3), hole(2, 3)]),
            "user-1",
            "a.csv",
        )
        .unwrap_err();

        match err {
            ImportError::HolePersistence {
                round, attempted, ..
            } => {
                assert_eq!(round.id, "round-1");
                assert_eq!(round.course_name, "Maple Hill");
                assert_eq!(attempted, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(*store.hole_batches.lock().unwrap(), vec![2]);
    }
}
