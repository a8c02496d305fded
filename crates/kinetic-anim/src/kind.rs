use crate::component::AnimationComponent;
use crate::components::{BigDoor, Drawbridge, Flag, GarageDoor, Portcullis, Windmill};
use crate::error::AnimationError;
use crate::request::AnimationRequestData;
use kinetic_core::direction::{
    MovementDirection, CARDINAL_DIRECTIONS, ROTATIONAL_DIRECTIONS, VERTICAL_DIRECTIONS,
};

/// Structure archetype together with its archetype-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureKind {
    /// Hinged door swinging a quarter turn around a vertical axis.
    BigDoor,
    /// Door spinning `quarter_circles` quarter turns every toggle.
    RevolvingDoor { quarter_circles: u32 },
    /// Vertical translator. `blocks_to_move == 0` means "the structure's height".
    Portcullis { blocks_to_move: u32 },
    /// Tips a quarter turn over a horizontal axis.
    Drawbridge,
    /// Spins `quarter_circles` quarter turns over a horizontal axis and returns to rest.
    Windmill { quarter_circles: u32 },
    /// Rises to roof height, then slides in the open direction.
    GarageDoor,
    /// Waves in place.
    Flag,
}

impl StructureKind {
    pub fn name(&self) -> &'static str {
        match self {
            StructureKind::BigDoor => "big door",
            StructureKind::RevolvingDoor { .. } => "revolving door",
            StructureKind::Portcullis { .. } => "portcullis",
            StructureKind::Drawbridge => "drawbridge",
            StructureKind::Windmill { .. } => "windmill",
            StructureKind::GarageDoor => "garage door",
            StructureKind::Flag => "flag",
        }
    }

    /// Open directions this archetype accepts.
    pub fn valid_directions(&self) -> &'static [MovementDirection] {
        match self {
            StructureKind::BigDoor | StructureKind::RevolvingDoor { .. } => &ROTATIONAL_DIRECTIONS,
            StructureKind::Portcullis { .. } => &VERTICAL_DIRECTIONS,
            StructureKind::Drawbridge
            | StructureKind::Windmill { .. }
            | StructureKind::GarageDoor
            | StructureKind::Flag => &CARDINAL_DIRECTIONS,
        }
    }

    pub fn accepts_direction(&self, direction: MovementDirection) -> bool {
        self.valid_directions().contains(&direction)
    }

    /// Perpetual archetypes cycle without ever reaching an "open" state.
    pub fn is_perpetual(&self) -> bool {
        matches!(
            self,
            StructureKind::RevolvingDoor { .. } | StructureKind::Windmill { .. } | StructureKind::Flag
        )
    }

    /// Build the trajectory component for one animation request.
    pub fn create_component(
        &self,
        request: &AnimationRequestData,
    ) -> Result<Box<dyn AnimationComponent>, AnimationError> {
        let component: Box<dyn AnimationComponent> = match *self {
            StructureKind::BigDoor => Box::new(BigDoor::hinged(request)?),
            StructureKind::RevolvingDoor { quarter_circles } => {
                Box::new(BigDoor::revolving(request, quarter_circles)?)
            }
            StructureKind::Portcullis { blocks_to_move } => {
                Box::new(Portcullis::new(request, blocks_to_move)?)
            }
            StructureKind::Drawbridge => Box::new(Drawbridge::new(request)?),
            StructureKind::Windmill { quarter_circles } => {
                Box::new(Windmill::new(request, quarter_circles)?)
            }
            StructureKind::GarageDoor => Box::new(GarageDoor::new(request)?),
            StructureKind::Flag => Box::new(Flag::new(request)?),
        };
        Ok(component)
    }
}

/// Reject directions outside the archetype's set, logging the offending structure.
pub(crate) fn check_direction(
    request: &AnimationRequestData,
    reason: &'static str,
) -> Result<(), AnimationError> {
    let snapshot = request.snapshot();
    let kind = snapshot.kind;
    if kind.accepts_direction(snapshot.open_direction) {
        return Ok(());
    }
    Err(invalid_direction(request, reason))
}

/// Build (and log) an `InvalidOpenDirection` error for the request's structure.
pub(crate) fn invalid_direction(
    request: &AnimationRequestData,
    reason: &'static str,
) -> AnimationError {
    let snapshot = request.snapshot();
    log::error!(
        "Structure {} ({}) has invalid open direction {}: {}",
        snapshot.id,
        snapshot.kind.name(),
        snapshot.open_direction,
        reason
    );
    AnimationError::InvalidOpenDirection {
        structure: snapshot.id,
        kind: snapshot.kind.name(),
        direction: snapshot.open_direction,
        reason,
    }
}
