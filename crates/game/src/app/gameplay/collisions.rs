#[derive(Debug, Clone, Copy)]
struct CollisionRules {
    damage_interval_ms: f32,
    enemy_damage: f32,
    boss_damage: f32,
    projectile_damage: f32,
    stomp_recoil: f32,
    kill_removal_delay_ms: f32,
    coin_value: u32,
}

impl CollisionRules {
    fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            damage_interval_ms: tuning.standard_interval_ms,
            enemy_damage: tuning.enemy_damage,
            boss_damage: tuning.boss_damage,
            projectile_damage: tuning.projectile_damage,
            stomp_recoil: tuning.stomp_recoil,
            kill_removal_delay_ms: tuning.kill_removal_delay_ms,
            coin_value: tuning.coin_value,
        }
    }
}

impl World {
    /// Accumulates step time and runs a collision pass once the collision
    /// interval has been reached, handing the pass the accumulated time.
    pub(crate) fn run_collision_pass(&mut self, dt_ms: f32, ctx: &mut SimContext<'_>) {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.collision_elapsed_ms += dt_ms;
        }
        if self.collision_elapsed_ms < self.level.tuning().collision_interval_ms {
            return;
        }
        let elapsed_ms = std::mem::take(&mut self.collision_elapsed_ms);
        let rules = CollisionRules::from_tuning(self.level.tuning());

        self.resolve_player_contacts(elapsed_ms, rules, ctx);
        self.resolve_projectile_hits(rules, ctx);
        self.resolve_pickups(rules, ctx);
    }

    fn resolve_player_contacts(
        &mut self,
        elapsed_ms: f32,
        rules: CollisionRules,
        ctx: &mut SimContext<'_>,
    ) {
        let Some(player_index) = self.level.player_index() else {
            return;
        };
        let descending = self.level.player().is_some_and(|player| {
            player.body.speed_y > 0.0 && self.level.is_above_ground(&player.body)
        });

        let mut contact = None;
        for index in 0..self.level.len() {
            let Some((player, enemy)) = self.level.pair_mut(player_index, index) else {
                continue;
            };
            if player.body.is_dead() {
                return;
            }
            if enemy.category() != Category::Enemy {
                continue;
            }
            if enemy.body.is_dead() {
                continue;
            }
            if !player.collides_with(&*enemy) {
                continue;
            }

            if descending && enemy.is_stompable() {
                enemy.body.kill();
                player.body.speed_y = -rules.stomp_recoil;
                self.deferred
                    .schedule(DeferredAction::Remove(enemy.id), rules.kill_removal_delay_ms);
                ctx.audio.play(AudioCue::EnemyStomped);
                debug!(entity = enemy.id.0, "enemy_stomped");
                continue;
            }
            contact.get_or_insert(index);
        }

        // Contact damage is timed against a single enemy per pass.
        let Some(index) = contact else {
            return;
        };
        let Some((player, enemy)) = self.level.pair_mut(player_index, index) else {
            return;
        };
        let damage = if matches!(enemy.kind, ActorKind::Boss(_)) {
            rules.boss_damage
        } else {
            rules.enemy_damage
        };
        if player.receive_damage(elapsed_ms, rules.damage_interval_ms, damage) {
            ctx.audio.play(AudioCue::DamageTaken);
            notify_status(
                ctx.ui,
                StatusBar::PlayerEnergy,
                player.body.energy(),
                player.body.max_energy(),
            );
            if player.body.is_dead() {
                info!(energy = player.body.energy(), "player_died");
            }
        }
    }

    fn resolve_projectile_hits(&mut self, rules: CollisionRules, ctx: &mut SimContext<'_>) {
        for projectile_index in 0..self.level.len() {
            let live = matches!(
                &self.level.actors()[projectile_index].kind,
                ActorKind::Projectile(state) if state.is_live()
            );
            if !live {
                continue;
            }
            for enemy_index in 0..self.level.len() {
                let Some((projectile, enemy)) = self.level.pair_mut(projectile_index, enemy_index)
                else {
                    continue;
                };
                if enemy.category() != Category::Enemy || enemy.body.is_dead() {
                    continue;
                }
                if !projectile.collides_with(&*enemy) {
                    continue;
                }

                let Actor {
                    body: projectile_body,
                    kind: ActorKind::Projectile(projectile_state),
                    ..
                } = projectile
                else {
                    break;
                };
                projectile_state.shatter(projectile_body);
                ctx.audio.play(AudioCue::BottleSmashed);

                let enemy_id = enemy.id;
                match &mut enemy.kind {
                    ActorKind::Boss(boss) => {
                        if enemy.body.take_damage(0.0, 0.0, rules.projectile_damage) {
                            if enemy.body.is_dead() {
                                boss.enter_dead();
                                info!(entity = enemy_id.0, "boss_died");
                            } else {
                                boss.enter_hurt();
                                ctx.audio.play(AudioCue::BossHurt);
                            }
                            notify_status(
                                ctx.ui,
                                StatusBar::BossEnergy,
                                enemy.body.energy().max(0.0),
                                enemy.body.max_energy(),
                            );
                        }
                    }
                    _ => {
                        enemy.body.kill();
                        self.deferred.schedule(
                            DeferredAction::Remove(enemy_id),
                            rules.kill_removal_delay_ms,
                        );
                        debug!(entity = enemy_id.0, "enemy_hit_by_bottle");
                    }
                }
                break;
            }
        }
    }

    fn resolve_pickups(&mut self, rules: CollisionRules, ctx: &mut SimContext<'_>) {
        let Some(player_index) = self.level.player_index() else {
            return;
        };
        let coin_value = rules.coin_value;
        for index in 0..self.level.len() {
            let Some((player, pickup)) = self.level.pair_mut(player_index, index) else {
                continue;
            };
            if player.body.is_dead() {
                return;
            }
            let pickup_id = pickup.id;
            let touching = player.collides_with(&*pickup);
            let ActorKind::Pickup(pickup_state) = &mut pickup.kind else {
                continue;
            };
            if pickup_state.collected || !touching {
                continue;
            }
            let ActorKind::Player(player_state) = &mut player.kind else {
                continue;
            };

            pickup_state.collected = true;
            match pickup_state.kind {
                PickupKind::Coin => {
                    player_state.coins.add(coin_value);
                    ctx.audio.play(AudioCue::CoinCollected);
                    notify_counter(ctx.ui, StatusBar::Coins, player_state.coins);
                }
                PickupKind::Bottle => {
                    player_state.bottles.add(1);
                    ctx.audio.play(AudioCue::BottleCollected);
                    notify_counter(ctx.ui, StatusBar::Bottles, player_state.bottles);
                }
            }
            self.level.despawn(pickup_id);
        }
    }
}

fn notify_status(ui: &mut dyn UiSink, bar: StatusBar, current: f32, max: f32) {
    ui.notify(UiEvent::Status { bar, current, max });
}

fn notify_counter(ui: &mut dyn UiSink, bar: StatusBar, counter: Counter) {
    notify_status(ui, bar, counter.current() as f32, counter.max() as f32);
}
