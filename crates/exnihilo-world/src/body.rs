//! The simulated body and its thruster capability.

use exnihilo_core::color::temperature_to_rgb;
use exnihilo_core::intent::ThrustDir;
use exnihilo_core::math::Vec2;

/// Default rock density, kg/m³.
pub const DENSITY_ROCK: f32 = 2000.0;

/// Default body lifetime, seconds.
pub const DEFAULT_LIFETIME: f32 = 300.0;

/// Absolute per-direction thrust levels, in world axes.
///
/// A body either carries this record or it does not: the presence of the
/// record *is* the "has thrusters" capability. Levels are set absolutely
/// (never accumulated), so repeated start/stop requests are idempotent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Thrusters {
    /// Thrust magnitude along −Y.
    pub up: f32,
    /// Thrust magnitude along +Y.
    pub down: f32,
    /// Thrust magnitude along −X.
    pub left: f32,
    /// Thrust magnitude along +X.
    pub right: f32,
}

impl Thrusters {
    /// All four levels at zero — thrusters fitted but cold.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Set one direction's absolute level, returning the previous level.
    pub fn set_level(&mut self, dir: ThrustDir, level: f32) -> f32 {
        let slot = match dir {
            ThrustDir::Up => &mut self.up,
            ThrustDir::Down => &mut self.down,
            ThrustDir::Left => &mut self.left,
            ThrustDir::Right => &mut self.right,
        };
        std::mem::replace(slot, level)
    }

    /// One direction's current level.
    pub fn level(&self, dir: ThrustDir) -> f32 {
        match dir {
            ThrustDir::Up => self.up,
            ThrustDir::Down => self.down,
            ThrustDir::Left => self.left,
            ThrustDir::Right => self.right,
        }
    }

    /// Net acceleration contribution in world axes (up = −Y, down = +Y).
    pub fn acceleration(&self) -> Vec2 {
        Vec2::new(self.right - self.left, self.down - self.up)
    }
}

/// Full field set for constructing a [`Body`].
///
/// There is no meaningful "empty" body; construction always goes through
/// this spec so the derived mass is computed exactly once at the boundary.
/// Fields left at their defaults match the original sandbox's presets.
#[derive(Clone, Debug, PartialEq)]
pub struct BodySpec {
    /// Radius, m.
    pub r: f32,
    /// Density, kg/m³. Defaults to half rock density.
    pub density: f32,
    /// Initial position.
    pub p: Vec2,
    /// Initial velocity.
    pub v: Vec2,
    /// Initial temperature, K.
    pub t: f32,
    /// Seconds of life remaining.
    pub lifetime: f32,
    /// Pinned RGB color; 0 means "derive from temperature".
    pub color: u32,
    /// Receives no gravitational acceleration when set.
    pub gravity_immune: bool,
    /// Temperature does not affect the display color when set.
    pub free_color: bool,
    /// Thruster capability; `None` for passive bodies.
    pub thrusters: Option<Thrusters>,
}

impl Default for BodySpec {
    fn default() -> Self {
        Self {
            r: 0.0,
            density: DENSITY_ROCK / 2.0,
            p: Vec2::ZERO,
            v: Vec2::ZERO,
            t: 0.0,
            lifetime: DEFAULT_LIFETIME,
            color: 0,
            gravity_immune: false,
            free_color: false,
            thrusters: None,
        }
    }
}

/// One simulated object: a point mass with a radius.
///
/// `mass` is always `r³ × density`; it is recomputed on construction and
/// whenever the radius or density changes, and is never settable directly.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    r: f32,
    density: f32,
    /// Position, m.
    pub p: Vec2,
    /// Velocity, m/s.
    pub v: Vec2,
    /// Temperature, K. Event-driven; drives the display color unless pinned.
    pub t: f32,
    /// Seconds of life remaining. At ≤ 0 the body is an expiry candidate.
    pub lifetime: f32,
    /// Pinned RGB color; 0 means "derive from temperature".
    pub color: u32,
    /// Receives no gravitational acceleration when set.
    pub gravity_immune: bool,
    /// Temperature does not affect the display color when set.
    pub free_color: bool,
    /// Thruster capability; present iff this body is player-capable.
    pub thrusters: Option<Thrusters>,
    mass: f32,
}

impl Body {
    /// Construct a body from a full field spec, deriving the mass.
    pub fn new(spec: BodySpec) -> Self {
        let mass = spec.r.powi(3) * spec.density;
        Self {
            r: spec.r,
            density: spec.density,
            p: spec.p,
            v: spec.v,
            t: spec.t,
            lifetime: spec.lifetime,
            color: spec.color,
            gravity_immune: spec.gravity_immune,
            free_color: spec.free_color,
            thrusters: spec.thrusters,
            mass,
        }
    }

    /// Radius, m.
    pub fn r(&self) -> f32 {
        self.r
    }

    /// Density, kg/m³.
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Derived mass, kg.
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Change the radius, recomputing the mass.
    pub fn set_radius(&mut self, r: f32) {
        self.r = r;
        self.recalc_mass();
    }

    /// Change the density, recomputing the mass.
    pub fn set_density(&mut self, density: f32) {
        self.density = density;
        self.recalc_mass();
    }

    fn recalc_mass(&mut self) {
        self.mass = self.r.powi(3) * self.density;
    }

    /// Whether this body is player-capable (equivalently: has thrusters).
    pub fn is_player(&self) -> bool {
        self.thrusters.is_some()
    }

    /// Fit an idle thruster record, making this body player-capable.
    /// No-op if thrusters are already fitted.
    pub fn add_thrusters(&mut self) {
        self.thrusters.get_or_insert_with(Thrusters::idle);
    }

    /// The color to present: the pinned color if nonzero or `free_color`
    /// is set, otherwise derived from the current temperature.
    pub fn display_color(&self) -> u32 {
        if self.color != 0 || self.free_color {
            self.color
        } else {
            temperature_to_rgb(self.t)
        }
    }
}
