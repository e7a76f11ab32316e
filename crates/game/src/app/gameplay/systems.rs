pub(crate) struct UpdateContext<'a> {
    pub(crate) dt_ms: f32,
    pub(crate) input: &'a InputSnapshot,
    pub(crate) tuning: &'a Tuning,
    pub(crate) level_end_x: f32,
    pub(crate) player_center_x: Option<f32>,
    pub(crate) rng: &'a mut StdRng,
    pub(crate) audio: &'a mut dyn AudioSink,
    pub(crate) events: &'a mut Vec<WorldEvent>,
}

impl UpdateContext<'_> {
    /// Fraction of a standard interval covered by this step; horizontal speeds scale by it.
    fn step_scale(&self) -> f32 {
        self.dt_ms / self.tuning.standard_interval_ms
    }

    fn ground_y(&self) -> f32 {
        self.tuning.ground_y()
    }
}

impl Level {
    /// Updates every entity once, in paint order.
    pub(crate) fn update_actors(
        &mut self,
        dt_ms: f32,
        input: &InputSnapshot,
        audio: &mut dyn AudioSink,
        events: &mut Vec<WorldEvent>,
    ) {
        let player_center_x = self.player().map(|player| player.body.center_x());
        let mut ctx = UpdateContext {
            dt_ms,
            input,
            tuning: &self.tuning,
            level_end_x: self.level_end_x,
            player_center_x,
            rng: &mut self.rng,
            audio,
            events,
        };
        for actor in &mut self.actors {
            update_actor(actor, &mut ctx);
        }
    }
}

fn update_actor(actor: &mut Actor, ctx: &mut UpdateContext<'_>) {
    let Actor { id, body, kind } = actor;
    match kind {
        ActorKind::Player(state) => update_player(body, state, ctx),
        ActorKind::GroundEnemy(state) => update_ground_enemy(*id, body, state, ctx),
        ActorKind::JumpingEnemy(state) => update_jumping_enemy(*id, body, state, ctx),
        ActorKind::Boss(state) => update_boss(body, state, ctx),
        ActorKind::Projectile(state) => update_projectile(*id, body, state, ctx),
        ActorKind::Pickup(state) => {
            state.sprite.advance(ctx.dt_ms);
        }
        ActorKind::Cloud { .. } => update_cloud(body, ctx),
        ActorKind::Background(_) => {}
    }
}

fn update_player(body: &mut Body, state: &mut PlayerState, ctx: &mut UpdateContext<'_>) {
    let dt_ms = ctx.dt_ms;
    if body.is_dead() {
        state.play(PlayerPose::Dead, dt_ms);
        if state.death_finished() && !state.defeat_reported {
            state.defeat_reported = true;
            ctx.events.push(WorldEvent::PlayerDefeated);
        }
        return;
    }

    let input = ctx.input;
    let ground_y = ctx.ground_y();
    let distance = body.speed_x * ctx.step_scale();
    let mut walking = false;
    if input.is_down(InputAction::MoveRight) && body.position.x < ctx.level_end_x {
        body.position.x = (body.position.x + distance).min(ctx.level_end_x);
        body.facing_left = false;
        walking = true;
    }
    if input.is_down(InputAction::MoveLeft) && body.position.x > 0.0 {
        body.position.x = (body.position.x - distance).max(0.0);
        body.facing_left = true;
        walking = true;
    }

    let airborne = body.bottom() < ground_y;
    if input.is_down(InputAction::Jump) && !airborne && body.speed_y >= 0.0 {
        body.speed_y = -ctx.tuning.player_jump_speed;
        ctx.audio.play(AudioCue::Jump);
    }
    settle_vertical(
        body,
        ground_y,
        ground_y + PLAYER_GROUND_CORRECTION,
        ctx.tuning.min_interval_ms,
        dt_ms,
    );

    if body.hurt {
        state.hurt_elapsed_ms += dt_ms;
        if state.hurt_elapsed_ms >= ctx.tuning.player_hurt_ms {
            body.hurt = false;
            state.hurt_elapsed_ms = 0.0;
        }
    }

    if input.no_key_pressed() {
        state.idle_elapsed_ms += dt_ms;
    } else {
        state.idle_elapsed_ms = 0.0;
    }

    let pose = if body.hurt {
        PlayerPose::Hurt
    } else if body.bottom() < ground_y {
        PlayerPose::Jumping
    } else if walking {
        PlayerPose::Walking
    } else if state.idle_elapsed_ms >= PLAYER_LONG_IDLE_AFTER_MS {
        PlayerPose::LongIdle
    } else {
        PlayerPose::Idle
    };
    state.play(pose, dt_ms);
}

/// Applies gravity while the body is above `ground_y` or still rising, then
/// rests it with its bottom at `rest_bottom` once it comes down.
fn settle_vertical(body: &mut Body, ground_y: f32, rest_bottom: f32, interval_ms: f32, dt_ms: f32) {
    if body.bottom() < ground_y || body.speed_y < 0.0 {
        body.apply_gravity(dt_ms, interval_ms);
    }
    if body.speed_y >= 0.0 && body.bottom() >= ground_y {
        body.position.y = rest_bottom - body.height();
        body.speed_y = 0.0;
    }
}

fn update_ground_enemy(
    id: EntityId,
    body: &mut Body,
    state: &mut GroundEnemyState,
    ctx: &mut UpdateContext<'_>,
) {
    if body.is_dead() {
        return;
    }
    body.position.x -= body.speed_x * ctx.step_scale();
    state.walk.advance(ctx.dt_ms);
    despawn_if_past_level_start(id, body, ctx);
}

fn update_jumping_enemy(
    id: EntityId,
    body: &mut Body,
    state: &mut JumpingEnemyState,
    ctx: &mut UpdateContext<'_>,
) {
    let ground_y = ctx.ground_y();
    if body.is_dead() {
        let rest_y = ground_y - body.height();
        if body.position.y < rest_y {
            body.position.y = (body.position.y + DEAD_SINK_STEP).min(rest_y);
        }
        return;
    }

    let airborne = body.bottom() < ground_y;
    let boost = if airborne { CHICK_HOP_BOOST } else { 0.0 };
    body.position.x -= (body.speed_x + boost) * ctx.step_scale();
    state.walk.advance(ctx.dt_ms);

    if state
        .hop_timer
        .update_and_is_executable(ctx.dt_ms, || !airborne)
    {
        if let Err(error) = state.hop_timer.set_cooldown_ms(random_hop_cooldown(ctx.rng)) {
            warn!(entity = id.0, error = %error, "hop_cooldown_rejected");
        }
        state.hop_timer.execute(|| body.speed_y = -CHICK_HOP_SPEED);
    }
    settle_vertical(body, ground_y, ground_y, ctx.tuning.min_interval_ms, ctx.dt_ms);
    despawn_if_past_level_start(id, body, ctx);
}

fn despawn_if_past_level_start(id: EntityId, body: &Body, ctx: &mut UpdateContext<'_>) {
    if body.position.x + body.width() < -ctx.tuning.visibility_padding {
        debug!(entity = id.0, "enemy_left_level");
        ctx.events.push(WorldEvent::Despawn(id));
    }
}

fn update_boss(body: &mut Body, state: &mut BossState, ctx: &mut UpdateContext<'_>) {
    let dt_ms = ctx.dt_ms;
    if state.phase == BossPhase::Dead {
        state.dead.advance(dt_ms);
        if state.dead.is_after_last_frame() && !state.defeat_reported {
            state.defeat_reported = true;
            ctx.events.push(WorldEvent::BossDefeated);
        }
        return;
    }
    let Some(player_x) = ctx.player_center_x else {
        state.walk.advance(dt_ms);
        return;
    };

    if state.facing_timer.update_and_is_executable(dt_ms, || true) {
        let face_left = player_x < body.center_x();
        state.facing_timer.execute(|| body.facing_left = face_left);
    }

    if state.phase == BossPhase::Hurt {
        state.hurt.advance(dt_ms);
        state.hurt_timer.update_and_is_executable(dt_ms, || false);
        if state.hurt_timer.take_stopped() {
            state.phase = BossPhase::Walking;
        }
        return;
    }

    let distance = (player_x - body.center_x()).abs();
    let direction = if body.facing_left { -1.0 } else { 1.0 };
    let very_close = distance <= ctx.tuning.boss_very_close_distance;
    let attacking = state.attack_timer.is_playing();
    if state
        .attack_timer
        .update_and_is_executable(dt_ms, || attacking || very_close)
    {
        if !state.attack_timer.is_playing() {
            state.attack.rewind();
            state.lunged = false;
        }
        state.attack_timer.execute(|| ());
        state.phase = BossPhase::Attacking;
        state.attack.advance(dt_ms);
        if !state.lunged && state.attack.frame_index() >= BOSS_LUNGE_FRAME {
            body.position.x += direction * BOSS_LUNGE_DISTANCE;
            state.lunged = true;
        }
        return;
    }
    state.attack_timer.take_stopped();

    if distance <= ctx.tuning.boss_close_distance {
        if state.phase == BossPhase::Walking {
            ctx.audio.play(AudioCue::BossAlerted);
        }
        if state.phase != BossPhase::Alerted {
            state.phase = BossPhase::Alerted;
            state.alert.rewind();
        }
        state.alert.advance(dt_ms);
        return;
    }

    state.phase = BossPhase::Walking;
    body.position.x += direction * body.speed_x * ctx.step_scale();
    state.walk.advance(dt_ms);
}

fn update_projectile(
    id: EntityId,
    body: &mut Body,
    state: &mut ProjectileState,
    ctx: &mut UpdateContext<'_>,
) {
    let dt_ms = ctx.dt_ms;
    if state.broken {
        state.splash.advance(dt_ms);
        if state.splash.is_after_last_frame() {
            ctx.events.push(WorldEvent::Despawn(id));
        }
        return;
    }
    if !state.can_deal_damage {
        return;
    }

    if body.apply_gravity(dt_ms, ctx.tuning.min_interval_ms) {
        body.position.x += state.direction * body.speed_x;
    }
    state.rotation.advance(dt_ms);

    let ground_y = ctx.ground_y();
    if body.bottom() >= ground_y {
        body.position.y = ground_y - body.height();
        if ctx.tuning.recover_bottles_on_ground {
            state.can_deal_damage = false;
            ctx.events.push(WorldEvent::BottleLanded {
                id,
                x: body.position.x,
            });
        } else {
            state.shatter(body);
            ctx.audio.play(AudioCue::BottleSmashed);
        }
        return;
    }

    let out_of_level = body.position.x + body.width() < -ctx.tuning.canvas_width
        || body.position.x > ctx.level_end_x + 2.0 * ctx.tuning.canvas_width;
    if out_of_level {
        ctx.events.push(WorldEvent::Despawn(id));
    }
}

fn update_cloud(body: &mut Body, ctx: &mut UpdateContext<'_>) {
    body.position.x -= body.speed_x * ctx.step_scale();
    if body.position.x + body.width() < 0.0 {
        body.position.x = ctx.level_end_x + ctx.tuning.canvas_width;
    }
}
