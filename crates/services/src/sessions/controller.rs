use quiz_core::model::{Phase, QuizSession};

/// Token tying an in-flight supplier fetch to one configuration attempt.
///
/// The fetch is the only suspending operation; by the time its response
/// arrives the user may have abandoned configuration or started over. A
/// token minted before the fetch must still match for the response to land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigToken(u64);

/// Owns the one mutable session and the configuring phase around it.
///
/// There is exactly one mutator, so no locking is needed; the controller
/// only enforces the stale-response guard and exposes the session handle.
#[derive(Debug, Default)]
pub struct SessionController {
    generation: u64,
    session: Option<QuizSession>,
}

impl SessionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state machine position. `Configuring` while no session exists.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.session
            .as_ref()
            .map_or(Phase::Configuring, QuizSession::phase)
    }

    /// Discards any current session and opens a new configuration attempt.
    /// The returned token must accompany the eventual `install`.
    pub fn begin_configuring(&mut self) -> ConfigToken {
        self.generation += 1;
        self.session = None;
        ConfigToken(self.generation)
    }

    /// Installs a freshly started session, unless the token is stale.
    ///
    /// Returns false (and drops the session) when the user has abandoned or
    /// restarted configuration since the token was minted.
    pub fn install(&mut self, token: ConfigToken, session: QuizSession) -> bool {
        if token.0 != self.generation {
            return false;
        }
        self.session = Some(session);
        true
    }

    /// User-initiated exit: the in-memory session is dropped outright and any
    /// in-flight fetch response becomes stale.
    pub fn abandon(&mut self) {
        self.generation += 1;
        self.session = None;
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut QuizSession> {
        self.session.as_mut()
    }
}
