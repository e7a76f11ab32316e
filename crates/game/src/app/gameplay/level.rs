#[derive(Debug, Error)]
pub(crate) enum LevelError {
    #[error("level factory produced no player")]
    MissingPlayer,
    #[error("level factory produced {count} players, expected exactly one")]
    DuplicatePlayer { count: usize },
    #[error("level length factor must be at least 1")]
    EmptyLevel,
    #[error("invalid entity geometry: {0}")]
    Body(#[from] BodyError),
    #[error("invalid entity animation: {0}")]
    Animation(#[from] AnimationError),
    #[error("invalid entity timer: {0}")]
    Timer(#[from] TimerConfigError),
}

/// Flat entity arena kept sorted by paint order, plus level geometry and spawning.
/// Structural changes are queued and applied by `apply_pending`.
#[derive(Debug)]
pub(crate) struct Level {
    tuning: Tuning,
    level_end_x: f32,
    ids: EntityIdAllocator,
    actors: Vec<Actor>,
    pending_spawns: Vec<Actor>,
    pending_despawns: Vec<EntityId>,
    rng: StdRng,
    spawn_gate_open: bool,
}

impl Level {
    pub(crate) fn new(tuning: Tuning) -> Result<Self, LevelError> {
        if tuning.level_length_factor == 0 {
            return Err(LevelError::EmptyLevel);
        }
        let level_end_x = tuning.canvas_width
            * BACKGROUND_PARTS as f32
            * tuning.level_length_factor as f32
            - tuning.canvas_width;
        let rng = StdRng::seed_from_u64(tuning.rng_seed);
        Ok(Self {
            tuning,
            level_end_x,
            ids: EntityIdAllocator::default(),
            actors: Vec::new(),
            pending_spawns: Vec::new(),
            pending_despawns: Vec::new(),
            rng,
            spawn_gate_open: false,
        })
    }

    pub(crate) fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub(crate) fn level_end_x(&self) -> f32 {
        self.level_end_x
    }

    pub(crate) fn ground_y(&self) -> f32 {
        self.tuning.ground_y()
    }

    pub(crate) fn segment_width(&self) -> f32 {
        self.tuning.canvas_width
    }

    pub(crate) fn segment_count(&self) -> u32 {
        BACKGROUND_PARTS * self.tuning.level_length_factor
    }

    pub(crate) fn is_above_ground(&self, body: &Body) -> bool {
        body.bottom() < self.ground_y()
    }

    pub(crate) fn spawn_gate_open(&self) -> bool {
        self.spawn_gate_open
    }

    pub(crate) fn set_spawn_gate(&mut self, open: bool) {
        self.spawn_gate_open = open;
    }

    pub(crate) fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub(crate) fn len(&self) -> usize {
        self.actors.len()
    }

    pub(crate) fn iter_category(&self, category: Category) -> impl Iterator<Item = &Actor> + '_ {
        self.actors
            .iter()
            .filter(move |actor| actor.category() == category)
    }

    pub(crate) fn find(&self, id: EntityId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    /// The player sorts last, so this is normally the final slot.
    pub(crate) fn player_index(&self) -> Option<usize> {
        self.actors
            .iter()
            .rposition(|actor| actor.category() == Category::Player)
    }

    pub(crate) fn player(&self) -> Option<&Actor> {
        self.player_index().map(|index| &self.actors[index])
    }

    pub(crate) fn player_mut(&mut self) -> Option<&mut Actor> {
        let index = self.player_index()?;
        self.actors.get_mut(index)
    }

    /// Disjoint mutable access to two arena slots.
    pub(crate) fn pair_mut(&mut self, first: usize, second: usize) -> Option<(&mut Actor, &mut Actor)> {
        if first == second || first >= self.actors.len() || second >= self.actors.len() {
            return None;
        }
        if first < second {
            let (head, tail) = self.actors.split_at_mut(second);
            Some((&mut head[first], &mut tail[0]))
        } else {
            let (head, tail) = self.actors.split_at_mut(first);
            Some((&mut tail[0], &mut head[second]))
        }
    }

    pub(crate) fn random_x_in_segment(&mut self, segment: u32) -> f32 {
        let width = self.segment_width();
        let start = segment as f32 * width;
        self.rng.gen_range(start..start + width)
    }

    /// Runs `factory` once per segment `1..repeat_count`, or only for the
    /// outermost segment when `outside_only` is set. Returns the number of calls.
    pub(crate) fn repeat_across_segments<F>(
        &mut self,
        repeat_count: u32,
        outside_only: bool,
        mut factory: F,
    ) -> Result<usize, LevelError>
    where
        F: FnMut(&mut Level, u32) -> Result<(), LevelError>,
    {
        let first = if outside_only {
            repeat_count.saturating_sub(1).max(1)
        } else {
            1
        };
        let mut calls = 0;
        for segment in first..repeat_count {
            factory(self, segment)?;
            calls += 1;
        }
        Ok(calls)
    }

    fn outer_spawn_allowed(&self, what: &'static str) -> bool {
        if !self.spawn_gate_open {
            debug!(what, "spawn_skipped_gate_closed");
            return false;
        }
        let outermost_start = self.segment_count().saturating_sub(1) as f32 * self.segment_width();
        match self.player() {
            Some(player) if player.body.position.x >= outermost_start => {
                debug!(what, "spawn_skipped_player_in_outer_segment");
                false
            }
            _ => true,
        }
    }

    /// Adds a group of walking and hopping enemies in the outermost segment.
    pub(crate) fn spawn_enemies(&mut self) -> Result<usize, LevelError> {
        if !self.outer_spawn_allowed("enemies") {
            return Ok(0);
        }
        let before = self.pending_spawns.len();
        let segments = self.segment_count();
        self.repeat_across_segments(segments, true, add_enemy_group)?;
        let spawned = self.pending_spawns.len() - before;
        info!(spawned, "enemies_spawned");
        Ok(spawned)
    }

    /// Adds coins and ground bottles in the outermost segment.
    pub(crate) fn spawn_items(&mut self) -> Result<usize, LevelError> {
        if !self.outer_spawn_allowed("items") {
            return Ok(0);
        }
        let before = self.pending_spawns.len();
        let segments = self.segment_count();
        self.repeat_across_segments(segments, true, add_item_group)?;
        let spawned = self.pending_spawns.len() - before;
        info!(spawned, "items_spawned");
        Ok(spawned)
    }

    fn queue(&mut self, body: Body, kind: ActorKind) -> EntityId {
        let id = self.ids.allocate();
        self.pending_spawns.push(Actor { id, body, kind });
        id
    }

    pub(crate) fn spawn_player(&mut self, x: f32) -> Result<EntityId, LevelError> {
        let y = self.ground_y() + PLAYER_GROUND_CORRECTION - PLAYER_SIZE.y;
        let body = Body::new(Vec2::new(x, y), PLAYER_SIZE, PLAYER_INSETS)?
            .with_energy(self.tuning.player_max_energy)
            .with_speed(self.tuning.player_speed, PLAYER_ACCELERATION);
        let state = PlayerState::new(&self.tuning)?;
        Ok(self.queue(body, ActorKind::Player(state)))
    }

    pub(crate) fn spawn_chicken(&mut self, x: f32) -> Result<EntityId, LevelError> {
        let speed = CHICKEN_SPEED_MIN + self.rng.gen::<f32>() * CHICKEN_SPEED_SPREAD;
        let y = self.ground_y() - CHICKEN_SIZE.y;
        let body = Body::new(Vec2::new(x, y), CHICKEN_SIZE, CHICKEN_INSETS)?
            .with_energy(SMALL_ENEMY_ENERGY)
            .with_speed(speed, 0.0)
            .with_facing_left(true);
        let walk = Animation::looping(CHICKEN_WALK, self.tuning.standard_interval_ms * 2.0)?;
        Ok(self.queue(body, ActorKind::GroundEnemy(GroundEnemyState { walk })))
    }

    pub(crate) fn spawn_chick(&mut self, x: f32) -> Result<EntityId, LevelError> {
        let speed = CHICKEN_SPEED_MIN + self.rng.gen::<f32>() * CHICKEN_SPEED_SPREAD;
        let cooldown = self.random_hop_cooldown();
        let y = self.ground_y() - CHICK_SIZE.y;
        let body = Body::new(Vec2::new(x, y), CHICK_SIZE, CHICK_INSETS)?
            .with_energy(SMALL_ENEMY_ENERGY)
            .with_speed(speed, CHICK_ACCELERATION)
            .with_facing_left(true);
        let state = JumpingEnemyState {
            walk: Animation::looping(CHICK_WALK, self.tuning.standard_interval_ms * 2.0)?,
            hop_timer: ActionTimer::fire_once(cooldown)?,
        };
        Ok(self.queue(body, ActorKind::JumpingEnemy(state)))
    }

    fn random_hop_cooldown(&mut self) -> f32 {
        random_hop_cooldown(&mut self.rng)
    }

    pub(crate) fn spawn_boss(&mut self, x: f32) -> Result<EntityId, LevelError> {
        let y = self.ground_y() - BOSS_SIZE.y;
        let body = Body::new(Vec2::new(x, y), BOSS_SIZE, BOSS_INSETS)?
            .with_energy(self.tuning.boss_max_energy)
            .with_speed(BOSS_SPEED, 0.0)
            .with_facing_left(true);
        let state = BossState::new(&self.tuning)?;
        Ok(self.queue(body, ActorKind::Boss(state)))
    }

    pub(crate) fn spawn_projectile(
        &mut self,
        origin: Vec2,
        facing_left: bool,
    ) -> Result<EntityId, LevelError> {
        let mut body = Body::new(origin, BOTTLE_SIZE, BOTTLE_INSETS)?
            .with_speed(BOTTLE_SPEED_X, BOTTLE_ACCELERATION)
            .with_facing_left(facing_left);
        body.speed_y = -BOTTLE_LAUNCH_SPEED;
        let state = ProjectileState {
            direction: if facing_left { -1.0 } else { 1.0 },
            broken: false,
            can_deal_damage: true,
            rotation: Animation::looping(BOTTLE_ROTATION, self.tuning.standard_interval_ms)?,
            splash: Animation::once(BOTTLE_SPLASH, self.tuning.standard_interval_ms)?,
        };
        Ok(self.queue(body, ActorKind::Projectile(state)))
    }

    pub(crate) fn spawn_coin(&mut self, x: f32, y: f32) -> Result<EntityId, LevelError> {
        let body = Body::new(Vec2::new(x, y), COIN_SIZE, COIN_INSETS)?;
        let state = PickupState {
            kind: PickupKind::Coin,
            collected: false,
            sprite: Animation::looping(COIN, self.tuning.standard_interval_ms * 3.0)?,
        };
        Ok(self.queue(body, ActorKind::Pickup(state)))
    }

    /// Places a coin at a random height between the ground and the lift limit.
    pub(crate) fn spawn_floating_coin(&mut self, x: f32) -> Result<EntityId, LevelError> {
        let lift = self.rng.gen::<f32>() * self.tuning.canvas_height / COIN_MAX_LIFT_DIVISOR;
        let y = self.ground_y() - COIN_SIZE.y - lift;
        self.spawn_coin(x, y)
    }

    pub(crate) fn spawn_ground_bottle(&mut self, x: f32) -> Result<EntityId, LevelError> {
        let y = self.ground_y() - GROUND_BOTTLE_SIZE.y + GROUND_BOTTLE_INSETS.bottom;
        let frame = self.rng.gen_range(0..BOTTLE_ON_GROUND.len());
        let body = Body::new(Vec2::new(x, y), GROUND_BOTTLE_SIZE, GROUND_BOTTLE_INSETS)?;
        let state = PickupState {
            kind: PickupKind::Bottle,
            collected: false,
            sprite: Animation::looping(&BOTTLE_ON_GROUND[frame..frame + 1], self.tuning.standard_interval_ms)?,
        };
        Ok(self.queue(body, ActorKind::Pickup(state)))
    }

    pub(crate) fn spawn_cloud(&mut self, x: f32, sprite: &'static str) -> Result<EntityId, LevelError> {
        let size = Vec2::new(self.tuning.canvas_width, self.tuning.canvas_height / 2.0);
        let body = Body::new(Vec2::new(x, CLOUD_Y), size, Insets::default())?
            .with_speed(CLOUD_SPEED, 0.0);
        Ok(self.queue(body, ActorKind::Cloud { sprite }))
    }

    pub(crate) fn spawn_background(
        &mut self,
        x: f32,
        sprite: &'static str,
        parallax: f32,
    ) -> Result<EntityId, LevelError> {
        let size = Vec2::new(self.tuning.canvas_width, self.tuning.canvas_height);
        let body = Body::new(Vec2::new(x, 0.0), size, Insets::default())?;
        Ok(self.queue(body, ActorKind::Background(BackgroundState { sprite, parallax })))
    }

    /// Queues removal by identity. Returns false for unknown ids.
    pub(crate) fn despawn(&mut self, id: EntityId) -> bool {
        let known = self.actors.iter().any(|actor| actor.id == id)
            || self.pending_spawns.iter().any(|actor| actor.id == id);
        if !known {
            debug!(entity = id.0, "despawn_unknown_entity");
            return false;
        }
        if !self.pending_despawns.contains(&id) {
            self.pending_despawns.push(id);
        }
        true
    }

    /// Applies queued despawns, then queued spawns, then restores paint order.
    pub(crate) fn apply_pending(&mut self) -> bool {
        if self.pending_despawns.is_empty() && self.pending_spawns.is_empty() {
            return false;
        }
        let despawns = std::mem::take(&mut self.pending_despawns);
        let mut spawns = std::mem::take(&mut self.pending_spawns);
        if !despawns.is_empty() {
            self.actors.retain(|actor| !despawns.contains(&actor.id));
            spawns.retain(|actor| !despawns.contains(&actor.id));
        }
        self.actors.append(&mut spawns);
        self.actors.sort_by_key(Actor::category);
        true
    }

    /// Runs a level factory and checks that it produced exactly one player.
    pub(crate) fn populate<F>(&mut self, factory: F) -> Result<(), LevelError>
    where
        F: FnOnce(&mut Level) -> Result<(), LevelError>,
    {
        factory(self)?;
        self.apply_pending();
        let players = self.iter_category(Category::Player).count();
        match players {
            0 => Err(LevelError::MissingPlayer),
            1 => {
                info!(
                    entities = self.actors.len(),
                    level_end_x = self.level_end_x,
                    "level_populated"
                );
                Ok(())
            }
            count => Err(LevelError::DuplicatePlayer { count }),
        }
    }
}

fn random_hop_cooldown(rng: &mut StdRng) -> f32 {
    CHICK_HOP_COOLDOWN_MIN_MS + rng.gen::<f32>() * CHICK_HOP_COOLDOWN_SPREAD_MS
}

fn add_enemy_group(level: &mut Level, segment: u32) -> Result<(), LevelError> {
    for _ in 0..CHICKENS_PER_SEGMENT {
        let x = level.random_x_in_segment(segment);
        level.spawn_chicken(x)?;
    }
    for _ in 0..CHICKS_PER_SEGMENT {
        let x = level.random_x_in_segment(segment);
        level.spawn_chick(x)?;
    }
    Ok(())
}

fn add_item_group(level: &mut Level, segment: u32) -> Result<(), LevelError> {
    for _ in 0..COINS_PER_SEGMENT {
        let x = level.random_x_in_segment(segment);
        level.spawn_floating_coin(x)?;
    }
    for _ in 0..BOTTLES_PER_SEGMENT {
        let x = level.random_x_in_segment(segment);
        level.spawn_ground_bottle(x)?;
    }
    Ok(())
}
