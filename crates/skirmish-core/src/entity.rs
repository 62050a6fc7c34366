//! The tagged entity model.
//!
//! Every registry slot holds one [`Entity`]: the fields shared by all kinds
//! plus an [`EntityKind`] carrying the kind-specific state. Game logic lives
//! in the simulation systems; the methods here only guard invariants on a
//! single entity (hit points never rise, a depot never overfills).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::capability::{Damageable, Seer, Targetable};
use crate::constants::*;
use crate::enums::{SelectionState, Team, TurretPhase, UnitKind};
use crate::handle::EntityHandle;

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Remove hit points. Non-positive amounts are ignored so that hit points
    /// never increase through this path. Returns `true` if the entity is now
    /// destroyed.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        if amount > 0 {
            self.current = self.current.saturating_sub(amount);
        }
        self.is_destroyed()
    }

    pub fn is_destroyed(&self) -> bool {
        self.current <= 0
    }

    /// Explicit reset back to full health.
    pub fn reset(&mut self) {
        self.current = self.max;
    }
}

/// Selection and control flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub selected: bool,
    pub controlled: bool,
}

impl Selection {
    pub fn state(&self) -> SelectionState {
        match (self.selected, self.controlled) {
            (_, true) => SelectionState::Controlled,
            (true, false) => SelectionState::Selected,
            (false, false) => SelectionState::Unselected,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Laser-mining progress of a ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MiningState {
    /// Whether the beam was firing this tick.
    pub beam_active: bool,
    /// Where the beam stopped this tick (for drawing).
    pub beam_end: Option<Vec2>,
    /// Crystal the beam has been resting on.
    pub target: Option<EntityHandle>,
    /// Consecutive ticks of contact with `target`.
    pub dwell_ticks: u32,
}

impl MiningState {
    /// Drop the beam and forget all accumulated dwell.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Reset dwell without turning the beam off.
    pub fn lose_contact(&mut self) {
        self.target = None;
        self.dwell_ticks = 0;
    }
}

/// Mobile, human-pilotable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub speed: f32,
    pub rotation_speed: f32,
    pub fire_rate: f32,
    pub time_since_last_shot: f32,
    pub visibility_range: f32,
    pub laser_range: f32,
    pub crystals_carried: u32,
    pub crystal_capacity: u32,
    /// Outstanding movement order.
    pub waypoint: Option<Vec2>,
    pub mining: MiningState,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            speed: SHIP_SPEED,
            rotation_speed: SHIP_ROTATION_SPEED,
            fire_rate: SHIP_FIRE_RATE,
            time_since_last_shot: 0.0,
            visibility_range: SHIP_VISIBILITY_RANGE,
            laser_range: SHIP_LASER_RANGE,
            crystals_carried: 0,
            crystal_capacity: SHIP_CRYSTAL_CAPACITY,
            waypoint: None,
            mining: MiningState::default(),
        }
    }
}

impl Ship {
    pub fn is_full(&self) -> bool {
        self.crystals_carried >= self.crystal_capacity
    }
}

/// Static auto-firing defence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turret {
    pub fire_rate: f32,
    pub detection_range: f32,
    pub visibility_range: f32,
    pub time_since_last_shot: f32,
    pub current_target: Option<EntityHandle>,
    pub phase: TurretPhase,
}

impl Default for Turret {
    fn default() -> Self {
        Self {
            fire_rate: TURRET_FIRE_RATE,
            detection_range: TURRET_DETECTION_RANGE,
            visibility_range: TURRET_VISIBILITY_RANGE,
            time_since_last_shot: 0.0,
            current_target: None,
            phase: TurretPhase::Idle,
        }
    }
}

/// Team depot that stores delivered crystals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub size: f32,
    pub visibility_range: f32,
    pub crystals_stored: u32,
    pub capacity: u32,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            size: TARGET_SIZE,
            visibility_range: TARGET_VISIBILITY_RANGE,
            crystals_stored: 0,
            capacity: TARGET_CRYSTAL_CAPACITY,
        }
    }
}

/// Outcome of offering crystals to a depot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    pub requested: u32,
    pub accepted: u32,
}

impl DepositReceipt {
    /// Units that did not fit.
    pub fn rejected(&self) -> u32 {
        self.requested - self.accepted
    }

    pub fn is_partial(&self) -> bool {
        self.accepted < self.requested
    }
}

impl Target {
    pub fn remaining_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.crystals_stored)
    }

    /// Store as many of `amount` crystals as fit.
    pub fn accept(&mut self, amount: u32) -> DepositReceipt {
        let accepted = amount.min(self.remaining_capacity());
        self.crystals_stored += accepted;
        DepositReceipt {
            requested: amount,
            accepted,
        }
    }
}

/// Neutral mineable deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crystal {
    pub remaining_units: u32,
}

impl Crystal {
    /// Take one unit out of the deposit. Returns `false` if it was empty.
    pub fn extract(&mut self) -> bool {
        if self.remaining_units == 0 {
            return false;
        }
        self.remaining_units -= 1;
        true
    }

    pub fn is_depleted(&self) -> bool {
        self.remaining_units == 0
    }
}

/// Straight-flying shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Unit vector of travel.
    pub direction: Vec2,
    pub speed: f32,
    pub traveled_distance: f32,
    pub max_range: f32,
    pub damage: i32,
}

impl Projectile {
    pub fn new(direction: Vec2) -> Self {
        Self {
            direction,
            speed: PROJECTILE_SPEED,
            traveled_distance: 0.0,
            max_range: PROJECTILE_MAX_RANGE,
            damage: PROJECTILE_DAMAGE,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.traveled_distance >= self.max_range
    }
}

impl Seer for Ship {
    fn visibility_range(&self) -> f32 {
        self.visibility_range
    }
}

impl Seer for Turret {
    fn visibility_range(&self) -> f32 {
        self.visibility_range
    }
}

impl Seer for Target {
    fn visibility_range(&self) -> f32 {
        self.visibility_range
    }
}

impl Damageable for Ship {
    fn hit_radius(&self) -> f32 {
        SHIP_HIT_RADIUS
    }
}

impl Damageable for Turret {
    fn hit_radius(&self) -> f32 {
        TURRET_HIT_RADIUS
    }
}

impl Damageable for Target {
    fn hit_radius(&self) -> f32 {
        self.size / 2.0
    }
}

impl Targetable for Ship {
    fn controllable(&self) -> bool {
        true
    }
}

impl Targetable for Turret {}

impl Targetable for Target {}

/// Kind-specific state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntityKind {
    Ship(Ship),
    Turret(Turret),
    Target(Target),
    Crystal(Crystal),
    Projectile(Projectile),
}

impl EntityKind {
    pub fn unit_kind(&self) -> UnitKind {
        match self {
            EntityKind::Ship(_) => UnitKind::Ship,
            EntityKind::Turret(_) => UnitKind::Turret,
            EntityKind::Target(_) => UnitKind::Target,
            EntityKind::Crystal(_) => UnitKind::Crystal,
            EntityKind::Projectile(_) => UnitKind::Projectile,
        }
    }

    pub fn as_seer(&self) -> Option<&dyn Seer> {
        match self {
            EntityKind::Ship(ship) => Some(ship),
            EntityKind::Turret(turret) => Some(turret),
            EntityKind::Target(target) => Some(target),
            EntityKind::Crystal(_) | EntityKind::Projectile(_) => None,
        }
    }

    pub fn as_damageable(&self) -> Option<&dyn Damageable> {
        match self {
            EntityKind::Ship(ship) => Some(ship),
            EntityKind::Turret(turret) => Some(turret),
            EntityKind::Target(target) => Some(target),
            EntityKind::Crystal(_) | EntityKind::Projectile(_) => None,
        }
    }

    pub fn as_targetable(&self) -> Option<&dyn Targetable> {
        match self {
            EntityKind::Ship(ship) => Some(ship),
            EntityKind::Turret(turret) => Some(turret),
            EntityKind::Target(target) => Some(target),
            EntityKind::Crystal(_) | EntityKind::Projectile(_) => None,
        }
    }

    /// Radius with which this kind stops a mining beam, if it does.
    pub fn beam_blocking_radius(&self) -> Option<f32> {
        match self {
            EntityKind::Ship(ship) => Some(ship.hit_radius()),
            EntityKind::Turret(turret) => Some(turret.hit_radius()),
            EntityKind::Crystal(_) => Some(CRYSTAL_HIT_RADIUS),
            EntityKind::Target(_) | EntityKind::Projectile(_) => None,
        }
    }
}

/// One simulated entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub team: Team,
    pub position: Vec2,
    pub rotation: f32,
    pub health: Health,
    #[serde(default)]
    pub selection: Selection,
    pub kind: EntityKind,
}

impl Entity {
    fn new(team: Team, position: Vec2, max_hp: i32, kind: EntityKind) -> Self {
        Self {
            team,
            position,
            rotation: 0.0,
            health: Health::new(max_hp),
            selection: Selection::default(),
            kind,
        }
    }

    pub fn ship(team: Team, position: Vec2) -> Self {
        Self::new(team, position, SHIP_MAX_HP, EntityKind::Ship(Ship::default()))
    }

    pub fn turret(team: Team, position: Vec2) -> Self {
        Self::new(
            team,
            position,
            TURRET_MAX_HP,
            EntityKind::Turret(Turret::default()),
        )
    }

    pub fn target(team: Team, position: Vec2) -> Self {
        Self::new(
            team,
            position,
            TARGET_MAX_HP,
            EntityKind::Target(Target::default()),
        )
    }

    /// Crystals are team-less; they are stored under Spectator.
    pub fn crystal(position: Vec2, remaining_units: u32) -> Self {
        Self::new(
            Team::Spectator,
            position,
            1,
            EntityKind::Crystal(Crystal { remaining_units }),
        )
    }

    pub fn projectile(team: Team, position: Vec2, direction: Vec2) -> Self {
        let mut entity = Self::new(
            team,
            position,
            1,
            EntityKind::Projectile(Projectile::new(direction)),
        );
        entity.rotation = direction.y.atan2(direction.x);
        entity
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_max_hp(mut self, max_hp: i32) -> Self {
        self.health = Health::new(max_hp);
        self
    }

    pub fn unit_kind(&self) -> UnitKind {
        self.kind.unit_kind()
    }

    /// Team that owns this entity for the own-team visibility rule.
    /// Crystals and anything filed under Spectator have no owner.
    pub fn owner(&self) -> Option<Team> {
        match self.kind {
            EntityKind::Crystal(_) => None,
            _ if self.team.is_spectator() => None,
            _ => Some(self.team),
        }
    }

    /// Whether this entity should be removed at the next death resolution.
    pub fn is_dead(&self) -> bool {
        match &self.kind {
            EntityKind::Crystal(crystal) => crystal.is_depleted(),
            EntityKind::Projectile(projectile) => projectile.is_spent(),
            _ => self.health.is_destroyed(),
        }
    }

    pub fn as_ship(&self) -> Option<&Ship> {
        match &self.kind {
            EntityKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_ship_mut(&mut self) -> Option<&mut Ship> {
        match &mut self.kind {
            EntityKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_turret(&self) -> Option<&Turret> {
        match &self.kind {
            EntityKind::Turret(turret) => Some(turret),
            _ => None,
        }
    }

    pub fn as_turret_mut(&mut self) -> Option<&mut Turret> {
        match &mut self.kind {
            EntityKind::Turret(turret) => Some(turret),
            _ => None,
        }
    }

    pub fn as_target(&self) -> Option<&Target> {
        match &self.kind {
            EntityKind::Target(target) => Some(target),
            _ => None,
        }
    }

    pub fn as_target_mut(&mut self) -> Option<&mut Target> {
        match &mut self.kind {
            EntityKind::Target(target) => Some(target),
            _ => None,
        }
    }

    pub fn as_crystal_mut(&mut self) -> Option<&mut Crystal> {
        match &mut self.kind {
            EntityKind::Crystal(crystal) => Some(crystal),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            EntityKind::Projectile(projectile) => Some(projectile),
            _ => None,
        }
    }

    pub fn as_projectile_mut(&mut self) -> Option<&mut Projectile> {
        match &mut self.kind {
            EntityKind::Projectile(projectile) => Some(projectile),
            _ => None,
        }
    }
}
