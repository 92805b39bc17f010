//! Unit death action
//!
//! Plays a dying unit's death animation, then either releases the unit or
//! turns it into its corpse type. This is where most explosions come from
//! outside of weapon impacts.

use std::rc::Rc;

use crate::Position;
use crate::particle::ParticleManager;

/// The parts of a unit type the die action looks at
#[derive(Debug, Clone, PartialEq)]
pub struct UnitType {
    pub name: String,
    /// Death animation length in animation steps; `None` dies instantly
    pub die_frames: Option<u32>,
    /// Type the unit becomes once the death animation ends
    pub corpse: Option<Rc<UnitType>>,
    /// Particle type spawned when the unit starts dying (e.g. "explosion")
    pub death_effect: Option<String>,
}

impl UnitType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            die_frames: None,
            corpse: None,
            death_effect: None,
        }
    }
}

/// Current order of a unit, as far as dying is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitAction {
    Still,
    Die,
}

/// A unit in the die action
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: u32,
    pub pos: Position,
    pub unit_type: Rc<UnitType>,
    pub action: UnitAction,
    /// Animation step within the current death animation
    pub frame: u32,
    pub sub_action: u32,
    effect_spawned: bool,
}

impl Unit {
    pub fn new(id: u32, pos: Position, unit_type: Rc<UnitType>) -> Self {
        Self {
            id,
            pos,
            unit_type,
            action: UnitAction::Still,
            frame: 0,
            sub_action: 0,
            effect_spawned: false,
        }
    }

    /// Switch to the die action from the start of its animation
    pub fn kill(&mut self) {
        self.action = UnitAction::Die;
        self.frame = 0;
        self.sub_action = 0;
    }

    /// Advance the death animation one step; true once it has ended
    fn show_die_animation(&mut self) -> bool {
        match self.unit_type.die_frames {
            Some(frames) => {
                self.frame += 1;
                self.frame >= frames
            }
            // Some units have no death animation
            None => true,
        }
    }
}

/// Result of one die action step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DieOutcome {
    /// Death animation still playing
    Dying,
    /// Unit became its corpse type and keeps dying as that type
    Corpse,
    /// No corpse; the unit should be removed from the game
    Released,
}

/// Run one step of the die action for `unit`
pub fn handle_action_die(unit: &mut Unit, particles: &mut ParticleManager) -> DieOutcome {
    if !unit.effect_spawned {
        unit.effect_spawned = true;
        if let Some(effect) = unit.unit_type.death_effect.as_deref() {
            // A missing effect is a data bug, not a reason to keep the unit alive
            if let Err(e) = particles.add_named(effect, unit.pos) {
                log::warn!("Unit {} death effect: {}", unit.id, e);
            }
        }
    }

    if !unit.show_die_animation() {
        return DieOutcome::Dying;
    }

    let Some(corpse) = unit.unit_type.corpse.clone() else {
        log::debug!("Unit {} released", unit.id);
        return DieOutcome::Released;
    };

    log::debug!("Unit {} becomes corpse '{}'", unit.id, corpse.name);
    unit.unit_type = corpse;
    unit.action = UnitAction::Die;
    unit.sub_action = 0;
    unit.frame = 0;
    // The corpse animation starts in the same step
    unit.show_die_animation();
    DieOutcome::Corpse
}
