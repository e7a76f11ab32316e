/// The running game: level arena, camera, input-driven actions, periodic
/// spawning and healing, and the one-way game outcome.
#[derive(Debug)]
pub(crate) struct World {
    level: Level,
    camera: Camera2D,
    collision_elapsed_ms: f32,
    throw_timer: ActionTimer,
    buy_timer: ActionTimer,
    heal_timer: ActionTimer,
    enemy_spawn_timer: ActionTimer,
    item_spawn_timer: ActionTimer,
    deferred: DeferredQueue<DeferredAction>,
    events: Vec<WorldEvent>,
    outcome: Option<GameOutcome>,
}

impl World {
    pub(crate) fn new<F>(tuning: Tuning, factory: F) -> Result<Self, LevelError>
    where
        F: FnOnce(&mut Level) -> Result<(), LevelError>,
    {
        let throw_timer = ActionTimer::fire_once(tuning.throw_cooldown_ms)?;
        let buy_timer = ActionTimer::fire_once(tuning.buy_cooldown_ms)?;
        let heal_timer = ActionTimer::fire_once(tuning.heal_interval_ms)?;
        let enemy_spawn_timer = ActionTimer::fire_once(tuning.enemy_spawn_interval_ms)?;
        let item_spawn_timer = ActionTimer::fire_once(tuning.item_spawn_interval_ms)?;

        let mut level = Level::new(tuning)?;
        level.populate(factory)?;

        let mut world = Self {
            level,
            camera: Camera2D::default(),
            collision_elapsed_ms: 0.0,
            throw_timer,
            buy_timer,
            heal_timer,
            enemy_spawn_timer,
            item_spawn_timer,
            deferred: DeferredQueue::new(),
            events: Vec::new(),
            outcome: None,
        };
        world.update_camera();
        Ok(world)
    }

    pub(crate) fn level(&self) -> &Level {
        &self.level
    }

    #[cfg(test)]
    pub(crate) fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    #[cfg(test)]
    pub(crate) fn camera(&self) -> Camera2D {
        self.camera
    }

    fn player_state(&self) -> Option<&PlayerState> {
        match &self.level.player()?.kind {
            ActorKind::Player(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn bottles(&self) -> Option<Counter> {
        self.player_state().map(|state| state.bottles)
    }

    pub(crate) fn coins(&self) -> Option<Counter> {
        self.player_state().map(|state| state.coins)
    }

    fn boss(&self) -> Option<&Actor> {
        self.level
            .iter_category(Category::Enemy)
            .find(|actor| matches!(actor.kind, ActorKind::Boss(_)))
    }

    fn publish_status(&self, ui: &mut dyn UiSink) {
        if let Some(player) = self.level.player() {
            notify_status(
                ui,
                StatusBar::PlayerEnergy,
                player.body.energy(),
                player.body.max_energy(),
            );
        }
        if let Some(bottles) = self.bottles() {
            notify_counter(ui, StatusBar::Bottles, bottles);
        }
        if let Some(coins) = self.coins() {
            notify_counter(ui, StatusBar::Coins, coins);
        }
        if let Some(boss) = self.boss() {
            notify_status(
                ui,
                StatusBar::BossEnergy,
                boss.body.energy().max(0.0),
                boss.body.max_energy(),
            );
        }
    }

    fn try_throw(&mut self, dt_ms: f32, ctx: &mut SimContext<'_>) {
        let wants_throw = ctx.input.is_down(InputAction::Throw);
        let has_supply = self
            .bottles()
            .is_some_and(|bottles| bottles.current() > 0);
        if !self
            .throw_timer
            .update_and_is_executable(dt_ms, || wants_throw && has_supply)
        {
            return;
        }
        let Some(player) = self.level.player_mut() else {
            return;
        };
        if player.body.is_dead() {
            return;
        }
        let facing_left = player.body.facing_left;
        let insets = player.body.insets();
        let x = if facing_left {
            player.body.position.x
        } else {
            player.body.position.x + player.body.width() - insets.right
        };
        let origin = Vec2::new(x, player.body.position.y + insets.top);
        let ActorKind::Player(state) = &mut player.kind else {
            return;
        };
        if !state.bottles.try_spend(1) {
            return;
        }
        let bottles = state.bottles;
        self.throw_timer.execute(|| ());

        match self.level.spawn_projectile(origin, facing_left) {
            Ok(id) => debug!(entity = id.0, facing_left, "bottle_thrown"),
            Err(error) => warn!(error = %error, "bottle_spawn_failed"),
        }
        ctx.audio.play(AudioCue::BottleThrown);
        notify_counter(ctx.ui, StatusBar::Bottles, bottles);
    }

    fn try_buy(&mut self, dt_ms: f32, ctx: &mut SimContext<'_>) {
        let wants_buy = ctx.input.is_down(InputAction::Buy);
        let cost = self.level.tuning().bottle_cost;
        let affordable = match (self.coins(), self.bottles()) {
            (Some(coins), Some(bottles)) => coins.current() >= cost && !bottles.is_full(),
            _ => false,
        };
        if !self
            .buy_timer
            .update_and_is_executable(dt_ms, || wants_buy && affordable)
        {
            return;
        }
        let Some(ActorKind::Player(state)) = self.level.player_mut().map(|player| &mut player.kind)
        else {
            return;
        };
        if !state.coins.try_spend(cost) {
            return;
        }
        state.bottles.add(1);
        let (coins, bottles) = (state.coins, state.bottles);
        self.buy_timer.execute(|| ());

        ctx.audio.play(AudioCue::BottleBought);
        notify_counter(ctx.ui, StatusBar::Coins, coins);
        notify_counter(ctx.ui, StatusBar::Bottles, bottles);
        debug!(coins = coins.current(), bottles = bottles.current(), "bottle_bought");
    }

    fn heal_player(&mut self, dt_ms: f32, ctx: &mut SimContext<'_>) {
        let amount = self.level.tuning().heal_amount;
        let Some(player) = self.level.player_mut() else {
            return;
        };
        let wounded = !player.body.is_dead() && player.body.energy() < player.body.max_energy();
        if !self.heal_timer.update_and_is_executable(dt_ms, || wounded) {
            return;
        }
        let energy = self.heal_timer.execute(|| player.body.heal(amount));
        notify_status(ctx.ui, StatusBar::PlayerEnergy, energy, player.body.max_energy());
    }

    fn run_spawn_timers(&mut self, dt_ms: f32) {
        let gate_open = self.level.spawn_gate_open();
        if self
            .enemy_spawn_timer
            .update_and_is_executable(dt_ms, || gate_open)
        {
            let level = &mut self.level;
            if let Err(error) = self.enemy_spawn_timer.execute(|| level.spawn_enemies()) {
                warn!(error = %error, "enemy_spawn_failed");
            }
        }
        if self
            .item_spawn_timer
            .update_and_is_executable(dt_ms, || gate_open)
        {
            let level = &mut self.level;
            if let Err(error) = self.item_spawn_timer.execute(|| level.spawn_items()) {
                warn!(error = %error, "item_spawn_failed");
            }
        }
    }

    fn apply_events(&mut self) {
        for event in std::mem::take(&mut self.events) {
            match event {
                WorldEvent::Despawn(id) => {
                    self.level.despawn(id);
                }
                WorldEvent::BottleLanded { id, x } => {
                    self.level.despawn(id);
                    if let Err(error) = self.level.spawn_ground_bottle(x) {
                        warn!(error = %error, "bottle_recovery_failed");
                    }
                }
                WorldEvent::PlayerDefeated => self.finish(GameOutcome::Lost),
                WorldEvent::BossDefeated => self.finish(GameOutcome::Won),
            }
        }
    }

    fn finish(&mut self, outcome: GameOutcome) {
        if self.outcome.is_some() {
            debug!(?outcome, "outcome_already_decided");
            return;
        }
        self.outcome = Some(outcome);
        self.level.set_spawn_gate(false);
        info!(?outcome, "world_outcome_decided");
    }

    fn apply_deferred(&mut self, dt_ms: f32) {
        for action in self.deferred.drain_due(dt_ms) {
            match action {
                DeferredAction::Remove(id) => {
                    self.level.despawn(id);
                }
            }
        }
    }

    fn update_camera(&mut self) {
        let anchor = self.level.tuning().camera_anchor_x;
        if let Some(player) = self.level.player() {
            self.camera.offset_x = (anchor - player.body.position.x).min(0.0);
        }
    }
}

impl Scene for World {
    fn poll_actions(&mut self, dt_ms: f32, ctx: &mut SimContext<'_>) {
        if self.outcome.is_some() {
            return;
        }
        self.try_throw(dt_ms, ctx);
        self.try_buy(dt_ms, ctx);
    }

    fn update(&mut self, dt_ms: f32, ctx: &mut SimContext<'_>) {
        self.level
            .update_actors(dt_ms, ctx.input, &mut *ctx.audio, &mut self.events);
        self.apply_events();

        if self.outcome.is_none() {
            self.run_spawn_timers(dt_ms);
            self.heal_player(dt_ms, ctx);
        }
        self.apply_deferred(dt_ms);
        self.level.apply_pending();
        self.update_camera();
    }

    fn check_collisions(&mut self, dt_ms: f32, ctx: &mut SimContext<'_>) {
        if self.outcome.is_some() {
            return;
        }
        self.run_collision_pass(dt_ms, ctx);
    }

    fn draw_list(&self, out: &mut Vec<DrawItem>) {
        let tuning = self.level.tuning();
        for actor in self.level.actors() {
            let x = self.camera.screen_x(actor.body.position.x, actor.parallax());
            let width = actor.body.width();
            if !self
                .camera
                .is_visible(x, width, tuning.canvas_width, tuning.visibility_padding)
            {
                continue;
            }
            out.push(DrawItem {
                sprite_key: actor.sprite(),
                x,
                y: actor.body.position.y,
                width,
                height: actor.body.height(),
                mirrored: actor.mirrored(),
                placeholder_color: actor.placeholder_color(),
            });
        }
    }

    fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    fn entity_count(&self) -> usize {
        self.level.len()
    }

    fn on_start(&mut self, ui: &mut dyn UiSink) {
        if self.outcome.is_none() {
            self.level.set_spawn_gate(true);
        }
        self.publish_status(ui);
        info!(entities = self.level.len(), "world_started");
    }

    fn on_pause(&mut self) {
        self.level.set_spawn_gate(false);
        debug!("world_paused");
    }
}
