use space_shooter_core::PowerUpKind;

/// Edge reported by an [`EffectLink`] when its source power-up changes state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkTransition {
    /// The source power-up became active on this observation.
    Activated,
    /// The source power-up stopped being active on this observation.
    Deactivated,
}

/// Edge-triggered coupling between a timed power-up and a dependent effect.
///
/// The link remembers whether it last saw its source active, so the dependent
/// subsystem is switched exactly once per activation boundary. Refreshing an
/// already active power-up does not produce a second activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectLink {
    source: PowerUpKind,
    latched: bool,
}

impl EffectLink {
    /// Creates an unlatched link driven by the provided power-up.
    #[must_use]
    pub const fn new(source: PowerUpKind) -> Self {
        Self {
            source,
            latched: false,
        }
    }

    /// Power-up driving the link.
    #[must_use]
    pub const fn source(&self) -> PowerUpKind {
        self.source
    }

    /// Whether the link currently considers its source active.
    #[must_use]
    pub const fn is_latched(&self) -> bool {
        self.latched
    }

    /// Feeds the source's current activity and reports any edge crossed.
    pub fn observe(&mut self, active: bool) -> Option<LinkTransition> {
        match (self.latched, active) {
            (false, true) => {
                self.latched = true;
                Some(LinkTransition::Activated)
            }
            (true, false) => {
                self.latched = false;
                Some(LinkTransition::Deactivated)
            }
            _ => None,
        }
    }

    /// Forgets any observed activation.
    pub fn reset(&mut self) {
        self.latched = false;
    }
}
