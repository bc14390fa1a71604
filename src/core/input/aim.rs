//=========================================================================
// Aim/Fire Mapper
//=========================================================================
//
// Turns one touch gesture on the aim surface into aim coordinates and an
// edge-triggered fire state.
//
// State machine:
//
//   Idle ──grant──► Active{firing}        emits AimMove, FireStart
//   Active ──move──► Active               emits AimMove (+ FireStart if
//                                           firing was lost)
//   Active ──release|terminate──► Idle    emits FireEnd
//
// `transition` is pure; `AimFireMapper` wraps it with the current
// `AimState` for callers that want a stateful object.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== AimState ============================================================

/// Aim coordinates (raw surface pixels) and the current fire state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AimState {
    pub screen_x: f32,
    pub screen_y: f32,
    pub firing: bool,
}

//=== AimPhase ============================================================

/// Phase of the aim gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AimPhase {
    /// No touch on the aim surface.
    #[default]
    Idle,

    /// A touch is down. `firing` tracks whether `FireStart` is outstanding.
    Active { firing: bool },
}

//=== AimGesture ==========================================================

/// Gesture lifecycle events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimGesture {
    Grant { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Release,
    Terminate,
}

//=== AimEmission =========================================================

/// Callbacks produced by a transition, in emission order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimEmission {
    AimMove { x: f32, y: f32 },
    FireStart,
    FireEnd,
}

//=== Transition Function =================================================

/// Computes the next phase and the emissions for `gesture`.
///
/// Release and terminate are handled identically. Events that make no
/// sense in the current phase (a move while idle, a release with no touch)
/// produce nothing, which keeps `FireStart`/`FireEnd` strictly paired.
pub fn transition(phase: AimPhase, gesture: AimGesture) -> (AimPhase, Vec<AimEmission>) {
    use AimEmission::*;

    match (phase, gesture) {
        (AimPhase::Idle, AimGesture::Grant { x, y }) => (
            AimPhase::Active { firing: true },
            vec![AimMove { x, y }, FireStart],
        ),

        (AimPhase::Active { firing }, AimGesture::Grant { x, y })
        | (AimPhase::Active { firing }, AimGesture::Move { x, y }) => {
            let mut emissions = vec![AimMove { x, y }];
            if !firing {
                emissions.push(FireStart);
            }
            (AimPhase::Active { firing: true }, emissions)
        }

        (AimPhase::Active { .. }, AimGesture::Release)
        | (AimPhase::Active { .. }, AimGesture::Terminate) => (AimPhase::Idle, vec![FireEnd]),

        (AimPhase::Idle, _) => (AimPhase::Idle, Vec::new()),
    }
}

//=== AimFireMapper =======================================================

/// Stateful wrapper around [`transition`] that also tracks [`AimState`].
#[derive(Debug, Clone, Default)]
pub struct AimFireMapper {
    phase: AimPhase,
    state: AimState,
}

impl AimFireMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one gesture event and returns what must be forwarded.
    pub fn apply(&mut self, gesture: AimGesture) -> Vec<AimEmission> {
        let (next, emissions) = transition(self.phase, gesture);

        for emission in &emissions {
            match *emission {
                AimEmission::AimMove { x, y } => {
                    self.state.screen_x = x;
                    self.state.screen_y = y;
                }
                AimEmission::FireStart => self.state.firing = true,
                AimEmission::FireEnd => self.state.firing = false,
            }
        }

        if next != self.phase {
            trace!(target: "platform::input", "Aim phase {:?} -> {:?}", self.phase, next);
        }
        self.phase = next;
        emissions
    }

    pub fn phase(&self) -> AimPhase {
        self.phase
    }

    pub fn state(&self) -> AimState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, AimPhase::Active { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn count(emissions: &[AimEmission], wanted: AimEmission) -> usize {
        emissions.iter().filter(|e| **e == wanted).count()
    }

    fn run(gestures: &[AimGesture]) -> Vec<AimEmission> {
        let mut mapper = AimFireMapper::new();
        gestures.iter().flat_map(|g| mapper.apply(*g)).collect()
    }

    //=====================================================================
    // Transition Tests
    //=====================================================================

    #[test]
    fn grant_emits_aim_then_fire_start() {
        let (phase, out) = transition(AimPhase::Idle, AimGesture::Grant { x: 12.0, y: 34.0 });
        assert_eq!(phase, AimPhase::Active { firing: true });
        assert_eq!(out, vec![AimEmission::AimMove { x: 12.0, y: 34.0 }, AimEmission::FireStart]);
    }

    #[test]
    fn move_while_firing_only_aims() {
        let (phase, out) = transition(
            AimPhase::Active { firing: true },
            AimGesture::Move { x: 1.0, y: 2.0 },
        );
        assert_eq!(phase, AimPhase::Active { firing: true });
        assert_eq!(out, vec![AimEmission::AimMove { x: 1.0, y: 2.0 }]);
    }

    #[test]
    fn move_recovers_lost_fire_state() {
        let (phase, out) = transition(
            AimPhase::Active { firing: false },
            AimGesture::Move { x: 5.0, y: 6.0 },
        );
        assert_eq!(phase, AimPhase::Active { firing: true });
        assert_eq!(out, vec![AimEmission::AimMove { x: 5.0, y: 6.0 }, AimEmission::FireStart]);
    }

    #[test]
    fn release_and_terminate_both_end_fire() {
        for exit in [AimGesture::Release, AimGesture::Terminate] {
            let (phase, out) = transition(AimPhase::Active { firing: true }, exit);
            assert_eq!(phase, AimPhase::Idle);
            assert_eq!(out, vec![AimEmission::FireEnd]);
        }
    }

    #[test]
    fn idle_ignores_everything_but_grant() {
        for gesture in [AimGesture::Move { x: 1.0, y: 1.0 }, AimGesture::Release, AimGesture::Terminate] {
            let (phase, out) = transition(AimPhase::Idle, gesture);
            assert_eq!(phase, AimPhase::Idle);
            assert!(out.is_empty());
        }
    }

    #[test]
    fn regrant_while_active_does_not_restart_fire() {
        let (_, out) = transition(
            AimPhase::Active { firing: true },
            AimGesture::Grant { x: 9.0, y: 9.0 },
        );
        assert_eq!(out, vec![AimEmission::AimMove { x: 9.0, y: 9.0 }]);
    }

    //=====================================================================
    // Gesture Session Tests
    //=====================================================================

    #[test]
    fn full_session_pairs_start_and_end() {
        let mut gestures = vec![AimGesture::Grant { x: 0.0, y: 0.0 }];
        for i in 0..25 {
            gestures.push(AimGesture::Move { x: i as f32, y: 2.0 * i as f32 });
        }
        gestures.push(AimGesture::Release);

        let out = run(&gestures);
        assert_eq!(count(&out, AimEmission::FireStart), 1);
        assert_eq!(count(&out, AimEmission::FireEnd), 1);

        let start = out.iter().position(|e| *e == AimEmission::FireStart).unwrap();
        let end = out.iter().position(|e| *e == AimEmission::FireEnd).unwrap();
        assert!(start < end);
        assert_eq!(out.last(), Some(&AimEmission::FireEnd));
    }

    #[test]
    fn terminate_session_counts_match_release() {
        let release = run(&[
            AimGesture::Grant { x: 1.0, y: 1.0 },
            AimGesture::Move { x: 2.0, y: 2.0 },
            AimGesture::Release,
        ]);
        let terminate = run(&[
            AimGesture::Grant { x: 1.0, y: 1.0 },
            AimGesture::Move { x: 2.0, y: 2.0 },
            AimGesture::Terminate,
        ]);
        assert_eq!(release, terminate);
    }

    #[test]
    fn repeated_sessions_never_double_fire() {
        let out = run(&[
            AimGesture::Grant { x: 0.0, y: 0.0 },
            AimGesture::Release,
            AimGesture::Release,
            AimGesture::Move { x: 3.0, y: 3.0 },
            AimGesture::Grant { x: 4.0, y: 4.0 },
            AimGesture::Grant { x: 5.0, y: 5.0 },
            AimGesture::Terminate,
        ]);

        let edges: Vec<_> = out
            .iter()
            .filter(|e| matches!(e, AimEmission::FireStart | AimEmission::FireEnd))
            .collect();
        assert_eq!(
            edges,
            vec![
                &AimEmission::FireStart,
                &AimEmission::FireEnd,
                &AimEmission::FireStart,
                &AimEmission::FireEnd,
            ]
        );
    }

    #[test]
    fn mapper_tracks_raw_coordinates_and_fire_state() {
        let mut mapper = AimFireMapper::new();
        mapper.apply(AimGesture::Grant { x: -10.0, y: 2000.0 });
        assert_eq!(
            mapper.state(),
            AimState { screen_x: -10.0, screen_y: 2000.0, firing: true }
        );

        mapper.apply(AimGesture::Terminate);
        assert!(!mapper.state().firing);
        assert!(!mapper.is_active());
        assert_eq!(mapper.state().screen_x, -10.0, "last aim is kept");
    }
}
