use super::{Entity, SpriteKind, Tint};
use crate::pool::{Pool, Recyclable};

pub const PROJECTILE_WIDTH: i32 = 3 * 2;
pub const PROJECTILE_HEIGHT: i32 = 5 * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

/// Difficulty-linked projectile family. Each tier has its own live set and
/// pool inside a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Plain,
    N,
    H,
}

/// The round's difficulty is the tier its formation shoots with.
pub type Difficulty = Tier;

/// Shape of one enemy volley.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Volley {
    Single,
    Double,
    Triple,
}

impl Volley {
    /// Horizontal offsets of each bullet from the shooter's center.
    pub fn offsets(&self) -> &'static [i32] {
        match self {
            Volley::Single => &[0],
            Volley::Double => &[-6, 6],
            Volley::Triple => &[-12, 0, 12],
        }
    }
}

/// Per-tier gameplay numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierSpec {
    /// Hit points every formation member starts with.
    pub hit_points: u8,
    pub volley: Volley,
    /// An item drops with probability `1 / drop_one_in` on each kill.
    pub drop_one_in: u32,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Plain, Tier::N, Tier::H];

    pub fn spec(&self) -> TierSpec {
        match self {
            Tier::Plain => TierSpec {
                hit_points: 1,
                volley: Volley::Single,
                drop_one_in: 3,
            },
            Tier::N => TierSpec {
                hit_points: 2,
                volley: Volley::Double,
                drop_one_in: 2,
            },
            Tier::H => TierSpec {
                hit_points: 3,
                volley: Volley::Triple,
                drop_one_in: 2,
            },
        }
    }

    /// Position of this tier in per-tier arrays.
    pub fn index(&self) -> usize {
        match self {
            Tier::Plain => 0,
            Tier::N => 1,
            Tier::H => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub x: i32,
    pub y: i32,
    /// Pixels per frame; positive travels down the screen.
    pub speed: i32,
    pub tier: Tier,
}

impl Projectile {
    pub fn new(x: i32, y: i32, speed: i32, tier: Tier) -> Self {
        Self { x, y, speed, tier }
    }

    pub fn owner(&self) -> ProjectileOwner {
        if self.speed > 0 {
            ProjectileOwner::Enemy
        } else {
            ProjectileOwner::Player
        }
    }

    pub fn update(&mut self) {
        self.y += self.speed;
    }

    /// Outside the play field: above the interface line or below the screen.
    pub fn is_out_of_bounds(&self, top: i32, bottom: i32) -> bool {
        self.y < top || self.y > bottom
    }
}

impl Entity for Projectile {
    fn x(&self) -> i32 {
        self.x
    }

    fn y(&self) -> i32 {
        self.y
    }

    fn width(&self) -> i32 {
        PROJECTILE_WIDTH
    }

    fn height(&self) -> i32 {
        PROJECTILE_HEIGHT
    }

    fn sprite(&self) -> SpriteKind {
        SpriteKind::Bullet(self.tier)
    }

    fn tint(&self) -> Tint {
        match (self.owner(), self.tier) {
            (ProjectileOwner::Player, _) => Tint::Yellow,
            (ProjectileOwner::Enemy, Tier::Plain) => Tint::White,
            (ProjectileOwner::Enemy, Tier::N) => Tint::Magenta,
            (ProjectileOwner::Enemy, Tier::H) => Tint::Red,
        }
    }
}

/// Live projectiles of one tier together with that tier's pool.
#[derive(Debug, Clone)]
pub struct ProjectileLane {
    pub tier: Tier,
    pub live: Vec<Projectile>,
    pub pool: Pool<Projectile>,
}

impl ProjectileLane {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            live: Vec::new(),
            pool: Pool::new(),
        }
    }

    /// Puts a pooled projectile of this tier into play.
    pub fn fire(&mut self, x: i32, y: i32, speed: i32) {
        let projectile = self.pool.acquire((x, y, speed, self.tier));
        self.live.push(projectile);
    }

    /// Moves every projectile one frame and recycles those that left the
    /// field. Returns how many were recycled.
    pub fn advance(&mut self, top: i32, bottom: i32) -> usize {
        for projectile in &mut self.live {
            projectile.update();
        }
        let (spent, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.live)
            .into_iter()
            .partition(|p| p.is_out_of_bounds(top, bottom));
        self.live = live;
        let recycled = spent.len();
        self.pool.recycle(spent);
        recycled
    }
}

impl Recyclable for Projectile {
    type Spawn = (i32, i32, i32, Tier);

    fn spawn((x, y, speed, tier): Self::Spawn) -> Self {
        Self::new(x, y, speed, tier)
    }

    fn rearm(&mut self, (x, y, speed, tier): Self::Spawn) {
        self.x = x;
        self.y = y;
        self.speed = speed;
        self.tier = tier;
    }

    fn reset(&mut self) {
        self.speed = 0;
    }
}
