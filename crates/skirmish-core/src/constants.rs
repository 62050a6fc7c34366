//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the default tick rate.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

/// Slack applied when comparing accumulated tick time against a threshold,
/// so that summing `f32` tick durations does not land one tick late.
pub const TIMER_EPSILON: f32 = 1e-4;

// --- Ships ---

/// Ship movement speed (units/s).
pub const SHIP_SPEED: f32 = 200.0;

/// Ship turn rate toward its waypoint (rad/s).
pub const SHIP_ROTATION_SPEED: f32 = 12.0;

/// Ship forward gun fire rate (shots/s).
pub const SHIP_FIRE_RATE: f32 = 2.0;

/// Ship hit points.
pub const SHIP_MAX_HP: i32 = 3;

/// Ship fog-of-war sight radius.
pub const SHIP_VISIBILITY_RANGE: f32 = 500.0;

/// Mining laser reach.
pub const SHIP_LASER_RANGE: f32 = 300.0;

/// Crystals a ship can carry at once.
pub const SHIP_CRYSTAL_CAPACITY: u32 = 5;

/// Collision radius used for projectile contact and beam blocking.
pub const SHIP_HIT_RADIUS: f32 = 16.0;

/// Distance at which a ship considers its waypoint reached.
pub const ARRIVAL_DISTANCE: f32 = 10.0;

/// Continuous same-crystal beam contact needed per extracted unit (seconds).
pub const MINING_DWELL_SECS: f32 = 1.0;

// --- Turrets ---

/// Turret fire rate (shots/s).
pub const TURRET_FIRE_RATE: f32 = 2.0;

/// Turret enemy detection radius.
pub const TURRET_DETECTION_RANGE: f32 = 200.0;

/// Turret hit points.
pub const TURRET_MAX_HP: i32 = 5;

/// Turret fog-of-war sight radius.
pub const TURRET_VISIBILITY_RANGE: f32 = 250.0;

/// Turret collision radius.
pub const TURRET_HIT_RADIUS: f32 = 20.0;

// --- Targets (team depots) ---

/// Depot hit points.
pub const TARGET_MAX_HP: i32 = 1;

/// Depot fog-of-war sight radius.
pub const TARGET_VISIBILITY_RANGE: f32 = 250.0;

/// Depot edge length; its hit radius is half of this.
pub const TARGET_SIZE: f32 = 50.0;

/// Crystals a depot can store.
pub const TARGET_CRYSTAL_CAPACITY: u32 = 20;

/// Distance within which a ship unloads into a same-team depot.
pub const DEPOSIT_RANGE: f32 = 50.0;

// --- Crystals ---

/// Collision radius of a crystal deposit (blocks and receives the beam).
pub const CRYSTAL_HIT_RADIUS: f32 = 20.0;

/// Smallest randomly generated deposit size.
pub const CRYSTAL_MIN_UNITS: u32 = 10;

/// Largest randomly generated deposit size.
pub const CRYSTAL_MAX_UNITS: u32 = 20;

// --- Projectiles ---

/// Projectile speed (units/s).
pub const PROJECTILE_SPEED: f32 = 700.0;

/// Distance a projectile travels before expiring.
pub const PROJECTILE_MAX_RANGE: f32 = 700.0;

/// Hit points removed per projectile contact.
pub const PROJECTILE_DAMAGE: i32 = 1;

// --- Selection ---

/// Pointer pick radius around a click position.
pub const PICK_RADIUS: f32 = 50.0;
