//! Defensive timing system: a queue of adjustments drained and advanced by
//! the tick loop, replacing the cross-module event callbacks a dynamically
//! typed implementation might reach for (spec.md §4.12, §9).

use serde::{Deserialize, Serialize};

use crate::geometry::{ease_in_out_quad, lerp, Vector2D};

/// # `AdjustmentKind` enum
///
/// The kind of pre-snap or post-snap event that produced a defensive
/// adjustment. Lower-numbered kinds take priority, per spec.md §4.12:
/// blitz (1) < motion (2) < coverage (3) < formation (4) < playAction (5)
/// < shift (6).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AdjustmentKind {
    Blitz,
    Motion,
    Coverage,
    Formation,
    PlayAction,
    Shift,
}

impl AdjustmentKind {
    /// Numeric priority; lower values take precedence.
    pub fn priority(&self) -> u8 {
        match self {
            AdjustmentKind::Blitz => 1,
            AdjustmentKind::Motion => 2,
            AdjustmentKind::Coverage => 3,
            AdjustmentKind::Formation => 4,
            AdjustmentKind::PlayAction => 5,
            AdjustmentKind::Shift => 6,
        }
    }

    /// Default recognition time, in seconds, per spec.md §4.12
    /// (0.15-0.30s per kind).
    pub fn recognition_time(&self) -> f64 {
        match self {
            AdjustmentKind::Blitz => 0.15,
            AdjustmentKind::Motion => 0.20,
            AdjustmentKind::Coverage => 0.22,
            AdjustmentKind::Formation => 0.25,
            AdjustmentKind::PlayAction => 0.18,
            AdjustmentKind::Shift => 0.30,
        }
    }
}

/// Lifecycle state of a defensive adjustment.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AdjustmentState {
    Pending,
    Recognizing,
    Executing,
    Complete,
    Cancelled,
}

/// # `Adjustment` struct
///
/// A single entry in the defensive timing system: a defender's scheduled
/// move to `target_position`, gated by recognition and execution timers
/// and arbitrated by `priority`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Adjustment {
    pub id: u64,
    pub kind: AdjustmentKind,
    pub defender_id: String,
    pub target_position: Vector2D,
    pub recognition_time: f64,
    pub execution_time: f64,
    pub priority: u8,
    pub state: AdjustmentState,
    /// Seconds elapsed since this entry entered `Recognizing`.
    pub elapsed: f64,
    /// Seconds elapsed since this entry became `Complete` or `Cancelled`,
    /// used to garbage-collect terminal entries after 2s.
    pub terminal_elapsed: f64,
    /// The defender's position when this adjustment began executing,
    /// interpolation's start point.
    pub origin_position: Option<Vector2D>,
}

impl Adjustment {
    pub fn new(
        kind: AdjustmentKind,
        defender_id: &str,
        target_position: Vector2D,
        recognition_time: f64,
        execution_time: f64,
    ) -> Adjustment {
        Adjustment {
            id: 0,
            kind,
            defender_id: defender_id.to_string(),
            target_position,
            recognition_time,
            execution_time,
            priority: kind.priority(),
            state: AdjustmentState::Pending,
            elapsed: 0.0,
            terminal_elapsed: 0.0,
            origin_position: None,
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.state, AdjustmentState::Complete | AdjustmentState::Cancelled)
    }

    fn is_active(&self) -> bool {
        matches!(self.state, AdjustmentState::Recognizing | AdjustmentState::Executing)
    }
}

/// # `TimingSystem` struct
///
/// Maintains the full set of in-flight and recently terminal defensive
/// adjustments. Commands insert entries via `queue_adjustment`; the tick
/// loop drains/advances them via `advance`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimingSystem {
    adjustments: Vec<Adjustment>,
    next_id: u64,
}

impl TimingSystem {
    pub fn new() -> TimingSystem {
        TimingSystem::default()
    }

    /// Queue a new adjustment, cancelling any existing non-terminal entry
    /// on the same defender whose priority is equal to or lower
    /// (numerically greater than or equal to) the new entry's, per
    /// spec.md §4.12 and §5's cancellation rule.
    pub fn queue_adjustment(&mut self, mut adjustment: Adjustment) -> u64 {
        for existing in self.adjustments.iter_mut() {
            if existing.defender_id == adjustment.defender_id
                && !existing.is_terminal()
                && existing.priority >= adjustment.priority
            {
                existing.state = AdjustmentState::Cancelled;
                existing.terminal_elapsed = 0.0;
            }
        }
        self.next_id += 1;
        adjustment.id = self.next_id;
        let id = adjustment.id;
        self.adjustments.push(adjustment);
        id
    }

    /// Cancel every non-terminal adjustment for a given defender,
    /// regardless of priority (used by `resetPlay`, which per spec.md §5
    /// "cancels all").
    pub fn cancel_defender(&mut self, defender_id: &str) {
        for adjustment in self.adjustments.iter_mut() {
            if adjustment.defender_id == defender_id && !adjustment.is_terminal() {
                adjustment.state = AdjustmentState::Cancelled;
                adjustment.terminal_elapsed = 0.0;
            }
        }
    }

    /// Cancel every non-terminal adjustment, used by `resetPlay`.
    pub fn cancel_all(&mut self) {
        for adjustment in self.adjustments.iter_mut() {
            if !adjustment.is_terminal() {
                adjustment.state = AdjustmentState::Cancelled;
                adjustment.terminal_elapsed = 0.0;
            }
        }
    }

    /// Advance every adjustment's state machine by `dt` seconds, and
    /// garbage-collect terminal entries retained for 2+ seconds.
    pub fn advance(&mut self, dt: f64, positions: &std::collections::HashMap<String, Vector2D>) {
        for adjustment in self.adjustments.iter_mut() {
            match adjustment.state {
                AdjustmentState::Pending => {}
                AdjustmentState::Recognizing | AdjustmentState::Executing => {
                    adjustment.elapsed += dt;
                }
                AdjustmentState::Complete | AdjustmentState::Cancelled => {
                    adjustment.terminal_elapsed += dt;
                }
            }
        }

        // Promote Pending -> Recognizing where no higher-priority entry on
        // the same defender is currently recognizing/executing.
        for adjustment in self.adjustments.iter_mut() {
            if let AdjustmentState::Pending = adjustment.state {
                let blocking_higher_priority = self.adjustments.iter().any(|other| {
                    other.defender_id == adjustment.defender_id
                        && other.id != adjustment.id
                        && other.is_active()
                        && other.priority < adjustment.priority
                });
                if !blocking_higher_priority {
                    adjustment.state = AdjustmentState::Recognizing;
                    adjustment.elapsed = 0.0;
                    adjustment.origin_position = positions.get(&adjustment.defender_id).copied();
                }
            }
        }

        for adjustment in self.adjustments.iter_mut() {
            match adjustment.state {
                AdjustmentState::Recognizing if adjustment.elapsed >= adjustment.recognition_time => {
                    adjustment.state = AdjustmentState::Executing;
                }
                AdjustmentState::Executing
                    if adjustment.elapsed >= adjustment.recognition_time + adjustment.execution_time =>
                {
                    adjustment.state = AdjustmentState::Complete;
                    adjustment.terminal_elapsed = 0.0;
                }
                _ => {}
            }
        }

        self.adjustments
            .retain(|a| !(a.is_terminal() && a.terminal_elapsed >= 2.0));
    }

    /// The adjusted overlay position for a defender, if an adjustment for
    /// them is currently executing. During execution the position is
    /// `lerp(origin, target, ease_in_out_quad(progress))`.
    pub fn adjusted_position(&self, defender_id: &str) -> Option<Vector2D> {
        self.adjustments.iter().find_map(|a| {
            if a.defender_id != defender_id {
                return None;
            }
            if let AdjustmentState::Executing = a.state {
                let origin = a.origin_position?;
                let progress = ((a.elapsed - a.recognition_time) / a.execution_time.max(1e-9)).clamp(0.0, 1.0);
                Some(lerp(&origin, &a.target_position, ease_in_out_quad(progress)))
            } else {
                None
            }
        })
    }

    /// Whether a defender is currently frozen by an executing play-action
    /// adjustment, per spec.md §4.12.
    pub fn is_defender_frozen(&self, defender_id: &str) -> bool {
        self.adjustments.iter().any(|a| {
            a.defender_id == defender_id
                && matches!(a.kind, AdjustmentKind::PlayAction)
                && matches!(a.state, AdjustmentState::Executing)
        })
    }

    /// All currently non-terminal adjustments, for diagnostics/snapshots.
    pub fn active(&self) -> impl Iterator<Item = &Adjustment> {
        self.adjustments.iter().filter(|a| !a.is_terminal())
    }

    /// All adjustments, including terminal ones still within their 2s
    /// retention window.
    pub fn all(&self) -> &[Adjustment] {
        &self.adjustments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_higher_priority_cancels_lower() {
        let mut system = TimingSystem::new();
        let shift = Adjustment::new(AdjustmentKind::Shift, "def-lb1", Vector2D::new(10.0, 10.0), 0.3, 0.5);
        let shift_id = system.queue_adjustment(shift);
        let blitz = Adjustment::new(AdjustmentKind::Blitz, "def-lb1", Vector2D::new(0.0, 0.0), 0.15, 0.3);
        system.queue_adjustment(blitz);

        let cancelled = system.all().iter().find(|a| a.id == shift_id).unwrap();
        assert!(matches!(cancelled.state, AdjustmentState::Cancelled));
    }

    #[test]
    fn test_recognizing_promotes_to_executing_after_time() {
        let mut system = TimingSystem::new();
        let adj = Adjustment::new(AdjustmentKind::Motion, "def-cb1", Vector2D::new(10.0, 10.0), 0.2, 0.5);
        system.queue_adjustment(adj);
        let mut positions = HashMap::new();
        positions.insert("def-cb1".to_string(), Vector2D::new(0.0, 0.0));

        system.advance(0.25, &positions);
        let current = system.all()[0].state;
        assert!(matches!(current, AdjustmentState::Executing));
    }

    #[test]
    fn test_terminal_entries_garbage_collected_after_two_seconds() {
        let mut system = TimingSystem::new();
        let adj = Adjustment::new(AdjustmentKind::Motion, "def-cb1", Vector2D::new(10.0, 10.0), 0.0, 0.0);
        system.queue_adjustment(adj);
        let positions = HashMap::new();
        system.advance(0.01, &positions);
        system.advance(0.01, &positions);
        assert!(matches!(system.all()[0].state, AdjustmentState::Complete));
        system.advance(2.1, &positions);
        assert!(system.all().is_empty());
    }

    #[test]
    fn test_play_action_freeze() {
        let mut system = TimingSystem::new();
        let adj = Adjustment::new(AdjustmentKind::PlayAction, "def-lb1", Vector2D::new(0.0, 2.0), 0.0, 0.4);
        system.queue_adjustment(adj);
        let mut positions = HashMap::new();
        positions.insert("def-lb1".to_string(), Vector2D::new(0.0, 0.0));
        system.advance(0.1, &positions);
        assert!(system.is_defender_frozen("def-lb1"));
    }
}
