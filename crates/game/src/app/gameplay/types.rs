/// Paint order, back to front. The player is always drawn last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Category {
    Background,
    Ambient,
    Pickup,
    Enemy,
    Projectile,
    Player,
}

/// A supply counter that never exceeds its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Counter {
    current: u32,
    max: u32,
}

impl Counter {
    pub(crate) fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub(crate) fn current(&self) -> u32 {
        self.current
    }

    pub(crate) fn max(&self) -> u32 {
        self.max
    }

    pub(crate) fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub(crate) fn add(&mut self, amount: u32) -> u32 {
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current
    }

    pub(crate) fn try_spend(&mut self, amount: u32) -> bool {
        if self.current < amount {
            return false;
        }
        self.current -= amount;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlayerPose {
    Idle,
    LongIdle,
    Walking,
    Jumping,
    Hurt,
    Dead,
}

#[derive(Debug, Clone)]
pub(crate) struct PlayerState {
    pub(crate) bottles: Counter,
    pub(crate) coins: Counter,
    pub(crate) pose: PlayerPose,
    idle: Animation,
    long_idle: Animation,
    walk: Animation,
    jump: Animation,
    hurt: Animation,
    dead: Animation,
    pub(crate) hurt_elapsed_ms: f32,
    pub(crate) idle_elapsed_ms: f32,
    pub(crate) defeat_reported: bool,
}

impl PlayerState {
    pub(crate) fn new(tuning: &Tuning) -> Result<Self, LevelError> {
        Ok(Self {
            bottles: Counter::new(tuning.starting_bottles, tuning.max_bottles),
            coins: Counter::new(tuning.starting_coins, tuning.max_coins),
            pose: PlayerPose::Idle,
            idle: Animation::looping(PLAYER_IDLE, tuning.standard_interval_ms * 2.0)?,
            long_idle: Animation::looping(PLAYER_LONG_IDLE, tuning.standard_interval_ms * 2.0)?,
            walk: Animation::looping(PLAYER_WALK, tuning.standard_interval_ms)?,
            jump: Animation::looping(PLAYER_JUMP, tuning.standard_interval_ms)?,
            hurt: Animation::looping(PLAYER_HURT, tuning.standard_interval_ms)?,
            dead: Animation::once(PLAYER_DEAD, PLAYER_DEATH_FRAME_MS)?,
            hurt_elapsed_ms: 0.0,
            idle_elapsed_ms: 0.0,
            defeat_reported: false,
        })
    }

    fn animation(&self, pose: PlayerPose) -> &Animation {
        match pose {
            PlayerPose::Idle => &self.idle,
            PlayerPose::LongIdle => &self.long_idle,
            PlayerPose::Walking => &self.walk,
            PlayerPose::Jumping => &self.jump,
            PlayerPose::Hurt => &self.hurt,
            PlayerPose::Dead => &self.dead,
        }
    }

    fn animation_mut(&mut self, pose: PlayerPose) -> &mut Animation {
        match pose {
            PlayerPose::Idle => &mut self.idle,
            PlayerPose::LongIdle => &mut self.long_idle,
            PlayerPose::Walking => &mut self.walk,
            PlayerPose::Jumping => &mut self.jump,
            PlayerPose::Hurt => &mut self.hurt,
            PlayerPose::Dead => &mut self.dead,
        }
    }

    /// Switches pose (restarting its animation on change) and advances it.
    pub(crate) fn play(&mut self, pose: PlayerPose, dt_ms: f32) {
        if pose != self.pose {
            self.pose = pose;
            self.animation_mut(pose).rewind();
        }
        self.animation_mut(pose).advance(dt_ms);
    }

    pub(crate) fn death_finished(&self) -> bool {
        self.pose == PlayerPose::Dead && self.dead.is_after_last_frame()
    }

    pub(crate) fn sprite(&self) -> &'static str {
        self.animation(self.pose).current_frame()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct GroundEnemyState {
    pub(crate) walk: Animation,
}

#[derive(Debug, Clone)]
pub(crate) struct JumpingEnemyState {
    pub(crate) walk: Animation,
    pub(crate) hop_timer: ActionTimer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BossPhase {
    Walking,
    Alerted,
    Attacking,
    Hurt,
    Dead,
}

#[derive(Debug, Clone)]
pub(crate) struct BossState {
    pub(crate) phase: BossPhase,
    pub(crate) walk: Animation,
    pub(crate) alert: Animation,
    pub(crate) attack: Animation,
    pub(crate) hurt: Animation,
    pub(crate) dead: Animation,
    pub(crate) attack_timer: ActionTimer,
    pub(crate) hurt_timer: ActionTimer,
    pub(crate) facing_timer: ActionTimer,
    pub(crate) lunged: bool,
    pub(crate) defeat_reported: bool,
}

impl BossState {
    pub(crate) fn new(tuning: &Tuning) -> Result<Self, LevelError> {
        let attack = Animation::looping(BOSS_ATTACK, tuning.standard_interval_ms)?;
        let attack_timer = ActionTimer::new(attack.duration_ms(), BOSS_ATTACK_COOLDOWN_MS)?;
        Ok(Self {
            phase: BossPhase::Walking,
            walk: Animation::looping(BOSS_WALK, tuning.standard_interval_ms * 2.0)?,
            alert: Animation::looping(BOSS_ALERT, tuning.standard_interval_ms)?,
            attack,
            hurt: Animation::looping(BOSS_HURT, tuning.standard_interval_ms)?,
            dead: Animation::once(BOSS_DEAD, tuning.standard_interval_ms * 2.0)?,
            attack_timer,
            hurt_timer: ActionTimer::new(BOSS_HURT_MS, 0.0)?,
            facing_timer: ActionTimer::fire_once(BOSS_FACING_INTERVAL_MS)?,
            lunged: false,
            defeat_reported: false,
        })
    }

    pub(crate) fn enter_hurt(&mut self) {
        self.phase = BossPhase::Hurt;
        self.hurt.rewind();
        self.attack_timer.stop();
        self.attack_timer.take_stopped();
        self.hurt_timer.stop();
        self.hurt_timer.take_stopped();
        self.hurt_timer.execute(|| ());
    }

    pub(crate) fn enter_dead(&mut self) {
        self.phase = BossPhase::Dead;
        self.dead.rewind();
    }

    pub(crate) fn sprite(&self) -> &'static str {
        match self.phase {
            BossPhase::Walking => self.walk.current_frame(),
            BossPhase::Alerted => self.alert.current_frame(),
            BossPhase::Attacking => self.attack.current_frame(),
            BossPhase::Hurt => self.hurt.current_frame(),
            BossPhase::Dead => self.dead.current_frame(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ProjectileState {
    /// -1 flies left, +1 flies right.
    pub(crate) direction: f32,
    pub(crate) broken: bool,
    pub(crate) can_deal_damage: bool,
    pub(crate) rotation: Animation,
    pub(crate) splash: Animation,
}

impl ProjectileState {
    pub(crate) fn is_live(&self) -> bool {
        !self.broken && self.can_deal_damage
    }

    pub(crate) fn shatter(&mut self, body: &mut Body) {
        self.broken = true;
        self.can_deal_damage = false;
        self.splash.rewind();
        body.speed_x = 0.0;
        body.speed_y = 0.0;
        body.acceleration_y = 0.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PickupKind {
    Coin,
    Bottle,
}

#[derive(Debug, Clone)]
pub(crate) struct PickupState {
    pub(crate) kind: PickupKind,
    pub(crate) collected: bool,
    pub(crate) sprite: Animation,
}

#[derive(Debug, Clone)]
pub(crate) struct BackgroundState {
    pub(crate) sprite: &'static str,
    pub(crate) parallax: f32,
}

#[derive(Debug, Clone)]
pub(crate) enum ActorKind {
    Player(PlayerState),
    GroundEnemy(GroundEnemyState),
    JumpingEnemy(JumpingEnemyState),
    Boss(BossState),
    Projectile(ProjectileState),
    Pickup(PickupState),
    Background(BackgroundState),
    Cloud { sprite: &'static str },
}

#[derive(Debug, Clone)]
pub(crate) struct Actor {
    pub(crate) id: EntityId,
    pub(crate) body: Body,
    pub(crate) kind: ActorKind,
}

impl Actor {
    pub(crate) fn category(&self) -> Category {
        match &self.kind {
            ActorKind::Player(_) => Category::Player,
            ActorKind::GroundEnemy(_) | ActorKind::JumpingEnemy(_) | ActorKind::Boss(_) => {
                Category::Enemy
            }
            ActorKind::Projectile(_) => Category::Projectile,
            ActorKind::Pickup(_) => Category::Pickup,
            ActorKind::Background(_) => Category::Background,
            ActorKind::Cloud { .. } => Category::Ambient,
        }
    }

    /// Small enemies die when landed on.
    pub(crate) fn is_stompable(&self) -> bool {
        matches!(
            self.kind,
            ActorKind::GroundEnemy(_) | ActorKind::JumpingEnemy(_)
        )
    }

    pub(crate) fn sprite(&self) -> &'static str {
        match &self.kind {
            ActorKind::Player(state) => state.sprite(),
            ActorKind::GroundEnemy(_) if self.body.is_dead() => CHICKEN_DEAD,
            ActorKind::GroundEnemy(state) => state.walk.current_frame(),
            ActorKind::JumpingEnemy(_) if self.body.is_dead() => CHICK_DEAD,
            ActorKind::JumpingEnemy(state) => state.walk.current_frame(),
            ActorKind::Boss(state) => state.sprite(),
            ActorKind::Projectile(state) if state.broken => state.splash.current_frame(),
            ActorKind::Projectile(state) => state.rotation.current_frame(),
            ActorKind::Pickup(state) => state.sprite.current_frame(),
            ActorKind::Background(state) => state.sprite,
            ActorKind::Cloud { sprite } => sprite,
        }
    }

    pub(crate) fn parallax(&self) -> f32 {
        match &self.kind {
            ActorKind::Background(state) => state.parallax,
            _ => 1.0,
        }
    }

    /// Enemy art faces left; the player art faces right.
    pub(crate) fn mirrored(&self) -> bool {
        match &self.kind {
            ActorKind::Player(_) => self.body.facing_left,
            ActorKind::GroundEnemy(_) | ActorKind::JumpingEnemy(_) | ActorKind::Boss(_) => {
                !self.body.facing_left
            }
            _ => false,
        }
    }

    pub(crate) fn placeholder_color(&self) -> [u8; 4] {
        match &self.kind {
            ActorKind::Player(_) => [200, 60, 40, 255],
            ActorKind::GroundEnemy(_) => [150, 100, 60, 255],
            ActorKind::JumpingEnemy(_) => [240, 210, 90, 255],
            ActorKind::Boss(_) => [120, 40, 120, 255],
            ActorKind::Projectile(_) => [60, 160, 80, 255],
            ActorKind::Pickup(PickupState {
                kind: PickupKind::Coin,
                ..
            }) => [250, 200, 30, 255],
            ActorKind::Pickup(_) => [60, 160, 80, 255],
            ActorKind::Background(state) => background_placeholder(state.parallax),
            ActorKind::Cloud { .. } => [245, 245, 250, 160],
        }
    }
}

fn background_placeholder(parallax: f32) -> [u8; 4] {
    if parallax <= 0.0 {
        [170, 215, 245, 255]
    } else if parallax < 0.5 {
        [205, 170, 110, 90]
    } else if parallax < 1.0 {
        [185, 140, 80, 110]
    } else {
        [160, 110, 60, 130]
    }
}

impl Collidable for Actor {
    fn body(&self) -> &Body {
        &self.body
    }
}

impl Damageable for Actor {
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// Structural or outcome changes raised while entities update; applied by the world afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum WorldEvent {
    Despawn(EntityId),
    BottleLanded { id: EntityId, x: f32 },
    PlayerDefeated,
    BossDefeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeferredAction {
    Remove(EntityId),
}
