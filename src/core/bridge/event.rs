//=========================================================================
// Engine Events
//=========================================================================
//
// Typed notifications pushed by the engine (health, weapon, score, level
// and game-over changes).
//
// Each payload is its own struct implementing `EventPayload`, so handlers
// subscribe by payload type and receive a typed reference:
//
//   registry.subscribe(|e: &ScoreChanged| println!("{}", e.score));
//
//=========================================================================

//=== Payloads ============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HealthChanged {
    pub health: i32,
    pub max_health: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponChanged {
    pub weapon_id: i32,
    pub ammo: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreChanged {
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelComplete {
    pub level: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOver {
    pub final_score: i64,
    pub reason: String,
}

//=== EngineEvent =========================================================

/// An engine notification with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    HealthChanged(HealthChanged),
    WeaponChanged(WeaponChanged),
    ScoreChanged(ScoreChanged),
    LevelComplete(LevelComplete),
    GameOver(GameOver),
}

impl EngineEvent {
    pub fn kind(&self) -> EngineEventKind {
        match self {
            Self::HealthChanged(_) => EngineEventKind::HealthChanged,
            Self::WeaponChanged(_) => EngineEventKind::WeaponChanged,
            Self::ScoreChanged(_) => EngineEventKind::ScoreChanged,
            Self::LevelComplete(_) => EngineEventKind::LevelComplete,
            Self::GameOver(_) => EngineEventKind::GameOver,
        }
    }
}

//=== EngineEventKind =====================================================

/// Event discriminant, used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EngineEventKind {
    HealthChanged,
    WeaponChanged,
    ScoreChanged,
    LevelComplete,
    GameOver,
}

impl EngineEventKind {
    pub const ALL: [EngineEventKind; 5] = [
        Self::HealthChanged,
        Self::WeaponChanged,
        Self::ScoreChanged,
        Self::LevelComplete,
        Self::GameOver,
    ];

    /// Wire name used by the engine's event emitter.
    pub fn name(self) -> &'static str {
        match self {
            Self::HealthChanged => "onHealthChanged",
            Self::WeaponChanged => "onWeaponChanged",
            Self::ScoreChanged => "onScoreChanged",
            Self::LevelComplete => "onLevelComplete",
            Self::GameOver => "onGameOver",
        }
    }
}

impl std::fmt::Display for EngineEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

//=== EventPayload ========================================================

/// Links a payload type to its event kind.
pub trait EventPayload: 'static {
    const KIND: EngineEventKind;

    /// Borrows the payload if `event` carries this type.
    fn extract(event: &EngineEvent) -> Option<&Self>;
}

macro_rules! impl_event_payload {
    ($($payload:ident),* $(,)?) => {
        $(
            impl EventPayload for $payload {
                const KIND: EngineEventKind = EngineEventKind::$payload;

                fn extract(event: &EngineEvent) -> Option<&Self> {
                    match event {
                        EngineEvent::$payload(payload) => Some(payload),
                        _ => None,
                    }
                }
            }

            impl From<$payload> for EngineEvent {
                fn from(payload: $payload) -> Self {
                    EngineEvent::$payload(payload)
                }
            }
        )*
    };
}

impl_event_payload!(HealthChanged, WeaponChanged, ScoreChanged, LevelComplete, GameOver);

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_matches_only_own_kind() {
        let event: EngineEvent = ScoreChanged { score: 1200 }.into();

        assert_eq!(event.kind(), EngineEventKind::ScoreChanged);
        assert_eq!(ScoreChanged::extract(&event), Some(&ScoreChanged { score: 1200 }));
        assert_eq!(HealthChanged::extract(&event), None);
    }

    #[test]
    fn payload_kinds_line_up() {
        assert_eq!(HealthChanged::KIND, EngineEventKind::HealthChanged);
        assert_eq!(GameOver::KIND, EngineEventKind::GameOver);
        assert_eq!(EngineEventKind::LevelComplete.to_string(), "onLevelComplete");
    }
}
