    use super::*;
    use engine::{FrameOutcome, GameLoop};

    const STEP_MS: f32 = 25.0;

    #[derive(Debug, Default)]
    struct RecordingAudio {
        cues: Vec<AudioCue>,
    }

    impl RecordingAudio {
        fn count(&self, cue: AudioCue) -> usize {
            self.cues.iter().filter(|played| **played == cue).count()
        }
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: AudioCue) {
            self.cues.push(cue);
        }
    }

    #[derive(Debug, Default)]
    struct RecordingUi {
        events: Vec<UiEvent>,
    }

    impl RecordingUi {
        fn last_status(&self, bar: StatusBar) -> Option<(f32, f32)> {
            self.events.iter().rev().find_map(|event| match *event {
                UiEvent::Status {
                    bar: seen,
                    current,
                    max,
                } if seen == bar => Some((current, max)),
                _ => None,
            })
        }

        fn count_game_over(&self) -> usize {
            self.events
                .iter()
                .filter(|event| matches!(event, UiEvent::GameOver(_)))
                .count()
        }
    }

    impl UiSink for RecordingUi {
        fn notify(&mut self, event: UiEvent) {
            self.events.push(event);
        }
    }

    struct Harness {
        world: World,
        audio: RecordingAudio,
        ui: RecordingUi,
    }

    impl Harness {
        fn new(world: World) -> Self {
            Self {
                world,
                audio: RecordingAudio::default(),
                ui: RecordingUi::default(),
            }
        }

        fn step(&mut self, dt_ms: f32, input: InputSnapshot) {
            let mut ctx = SimContext {
                input: &input,
                audio: &mut self.audio,
                ui: &mut self.ui,
            };
            self.world.poll_actions(dt_ms, &mut ctx);
            self.world.update(dt_ms, &mut ctx);
            self.world.check_collisions(dt_ms, &mut ctx);
        }

        fn steps(&mut self, count: usize, input: InputSnapshot) {
            for _ in 0..count {
                self.step(STEP_MS, input);
            }
        }

        fn update_only(&mut self, count: usize) {
            let input = InputSnapshot::empty();
            for _ in 0..count {
                let mut ctx = SimContext {
                    input: &input,
                    audio: &mut self.audio,
                    ui: &mut self.ui,
                };
                self.world.update(STEP_MS, &mut ctx);
            }
        }

        fn collide_only(&mut self, dt_ms: f32) {
            let input = InputSnapshot::empty();
            let mut ctx = SimContext {
                input: &input,
                audio: &mut self.audio,
                ui: &mut self.ui,
            };
            self.world.check_collisions(dt_ms, &mut ctx);
        }

        fn start(&mut self) {
            self.world.on_start(&mut self.ui);
        }
    }

    fn world_with<F>(tuning: Tuning, factory: F) -> World
    where
        F: FnOnce(&mut Level) -> Result<(), LevelError>,
    {
        World::new(tuning, factory).expect("world")
    }

    fn player(world: &World) -> &Actor {
        world.level().player().expect("player")
    }

    fn player_mut(world: &mut World) -> &mut Actor {
        world.level_mut().player_mut().expect("player")
    }

    fn boss_state(world: &World) -> (&Body, &BossState) {
        world
            .level()
            .actors()
            .iter()
            .find_map(|actor| match &actor.kind {
                ActorKind::Boss(state) => Some((&actor.body, state)),
                _ => None,
            })
            .expect("boss")
    }

    fn count_enemies(world: &World) -> usize {
        world.level().iter_category(Category::Enemy).count()
    }

    fn held(action: InputAction) -> InputSnapshot {
        InputSnapshot::empty().with_action_down(action, true)
    }

    #[test]
    fn level_end_scales_with_length_factor() {
        let tuning = Tuning {
            level_length_factor: 4,
            ..Tuning::default()
        };
        let level = Level::new(tuning).expect("level");
        assert_eq!(level.level_end_x(), 1920.0 * 2.0 * 4.0 - 1920.0);
        assert_eq!(level.segment_count(), 8);

        let short = Level::new(Tuning {
            level_length_factor: 1,
            ..Tuning::default()
        })
        .expect("level");
        assert_eq!(short.level_end_x(), 1920.0);
    }

    #[test]
    fn zero_length_factor_is_rejected() {
        let err = Level::new(Tuning {
            level_length_factor: 0,
            ..Tuning::default()
        })
        .expect_err("empty level");
        assert!(matches!(err, LevelError::EmptyLevel));
    }

    #[test]
    fn random_x_stays_inside_its_segment() {
        let mut level = Level::new(Tuning::default()).expect("level");
        let start = 3.0 * 1920.0;
        let end = start + 1920.0;
        let samples: Vec<f32> = (0..1000).map(|_| level.random_x_in_segment(3)).collect();

        assert!(samples.iter().all(|x| (start..end).contains(x)));
        let min = samples.iter().copied().fold(f32::INFINITY, f32::min);
        let max = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!(min < start + 192.0, "samples cluster away from segment start");
        assert!(max > end - 192.0, "samples cluster away from segment end");
    }

    #[test]
    fn repeat_across_segments_visits_inner_or_outermost_segments() {
        let mut level = Level::new(Tuning::default()).expect("level");
        let mut seen = Vec::new();
        let calls = level
            .repeat_across_segments(4, false, |_, segment| {
                seen.push(segment);
                Ok(())
            })
            .expect("repeat");
        assert_eq!(calls, 3);
        assert_eq!(seen, vec![1, 2, 3]);

        seen.clear();
        level
            .repeat_across_segments(4, true, |_, segment| {
                seen.push(segment);
                Ok(())
            })
            .expect("repeat");
        assert_eq!(seen, vec![3]);

        let calls = level
            .repeat_across_segments(1, true, |_, _| panic!("no segment expected"))
            .expect("repeat");
        assert_eq!(calls, 0);
    }

    #[test]
    fn populate_requires_exactly_one_player() {
        let mut empty = Level::new(Tuning::default()).expect("level");
        let err = empty
            .populate(|level| {
                level.spawn_chicken(500.0)?;
                Ok(())
            })
            .expect_err("missing player");
        assert!(matches!(err, LevelError::MissingPlayer));

        let mut doubled = Level::new(Tuning::default()).expect("level");
        let err = doubled
            .populate(|level| {
                level.spawn_player(100.0)?;
                level.spawn_player(300.0)?;
                Ok(())
            })
            .expect_err("two players");
        assert!(matches!(err, LevelError::DuplicatePlayer { count: 2 }));
    }

    #[test]
    fn level_one_keeps_player_last_in_paint_order() {
        let world = build_world(Tuning::default()).expect("world");
        let actors = world.level().actors();

        assert_eq!(
            actors.last().map(Actor::category),
            Some(Category::Player)
        );
        assert!(actors
            .windows(2)
            .all(|pair| pair[0].category() <= pair[1].category()));
        let bosses = actors
            .iter()
            .filter(|actor| matches!(actor.kind, ActorKind::Boss(_)))
            .count();
        assert_eq!(bosses, 1);
        assert!(count_enemies(&world) > bosses);
    }

    #[test]
    fn level_one_places_pickups_in_the_spawn_segment() {
        let world = build_world(Tuning::default()).expect("world");
        let spawn_segment = 0.0..world.level().segment_width();
        let kinds: Vec<PickupKind> = world
            .level()
            .iter_category(Category::Pickup)
            .filter(|actor| spawn_segment.contains(&actor.body.position.x))
            .filter_map(|actor| match &actor.kind {
                ActorKind::Pickup(state) => Some(state.kind),
                _ => None,
            })
            .collect();

        assert!(kinds.contains(&PickupKind::Coin));
        assert!(kinds.contains(&PickupKind::Bottle));
        let enemies_near_spawn = world
            .level()
            .iter_category(Category::Enemy)
            .filter(|actor| spawn_segment.contains(&actor.body.position.x))
            .count();
        assert_eq!(enemies_near_spawn, 0);
    }

    #[test]
    fn despawn_waits_for_apply_pending() {
        let mut level = Level::new(Tuning::default()).expect("level");
        let mut chicken = None;
        level
            .populate(|level| {
                level.spawn_player(100.0)?;
                chicken = Some(level.spawn_chicken(900.0)?);
                Ok(())
            })
            .expect("populate");
        let chicken = chicken.expect("chicken id");

        assert!(level.despawn(chicken));
        assert!(level.find(chicken).is_some());
        assert!(level.apply_pending());
        assert!(level.find(chicken).is_none());
        assert!(!level.despawn(chicken));
        assert!(!level.apply_pending());
    }

    #[test]
    fn pair_mut_hands_out_disjoint_slots() {
        let mut level = Level::new(Tuning::default()).expect("level");
        level
            .populate(|level| {
                level.spawn_player(100.0)?;
                level.spawn_chicken(900.0)?;
                Ok(())
            })
            .expect("populate");

        assert!(level.pair_mut(0, 0).is_none());
        assert!(level.pair_mut(0, 5).is_none());
        let (first, second) = level.pair_mut(1, 0).expect("pair");
        assert_eq!(first.category(), Category::Player);
        assert_eq!(second.category(), Category::Enemy);
    }

    #[test]
    fn resting_player_takes_contact_damage_once_per_interval() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            level.spawn_chicken(150.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);
        assert!(player(&harness.world).body.speed_y <= 0.0);

        for _ in 0..3 {
            harness.collide_only(STEP_MS);
        }
        assert_eq!(player(&harness.world).body.energy(), 200.0);

        harness.collide_only(STEP_MS);
        assert_eq!(player(&harness.world).body.energy(), 197.0);
        assert!(player(&harness.world).body.hurt);

        for _ in 0..8 {
            harness.collide_only(STEP_MS);
        }
        assert_eq!(player(&harness.world).body.energy(), 191.0);
        assert_eq!(harness.audio.count(AudioCue::DamageTaken), 3);
        assert_eq!(
            harness.ui.last_status(StatusBar::PlayerEnergy),
            Some((191.0, 200.0))
        );
    }

    #[test]
    fn collision_pass_waits_for_its_interval() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            level.spawn_chicken(150.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);

        // 10 ms frames only reach the collision interval every third frame.
        for _ in 0..10 {
            harness.collide_only(10.0);
        }
        assert_eq!(player(&harness.world).body.energy(), 200.0);
        for _ in 0..2 {
            harness.collide_only(10.0);
        }
        assert_eq!(player(&harness.world).body.energy(), 197.0);
    }

    #[test]
    fn descending_player_stomps_ground_enemy() {
        let mut chicken = None;
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            chicken = Some(level.spawn_chicken(150.0)?);
            Ok(())
        });
        let chicken = chicken.expect("chicken id");
        let mut harness = Harness::new(world);
        {
            let body = &mut player_mut(&mut harness.world).body;
            body.position.y = 400.0;
            body.speed_y = 5.0;
        }

        harness.collide_only(STEP_MS);

        let enemy = harness.world.level().find(chicken).expect("still present");
        assert!(enemy.body.is_dead());
        assert_eq!(enemy.sprite(), CHICKEN_DEAD);
        assert_eq!(player(&harness.world).body.speed_y, -20.0);
        assert_eq!(player(&harness.world).body.energy(), 200.0);
        assert_eq!(harness.audio.count(AudioCue::EnemyStomped), 1);

        harness.update_only(19);
        assert!(harness.world.level().find(chicken).is_some());
        harness.update_only(2);
        assert!(harness.world.level().find(chicken).is_none());
    }

    #[test]
    fn descending_onto_boss_hurts_the_player() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            level.spawn_boss(0.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);
        {
            let body = &mut player_mut(&mut harness.world).body;
            body.position.y = 400.0;
            body.speed_y = 5.0;
        }

        for _ in 0..4 {
            harness.collide_only(STEP_MS);
        }
        let (boss_body, _) = boss_state(&harness.world);
        assert!(!boss_body.is_dead());
        assert_eq!(player(&harness.world).body.energy(), 190.0);
    }

    #[test]
    fn stomp_resolves_even_when_touching_the_boss() {
        let mut chicken = None;
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            level.spawn_boss(0.0)?;
            chicken = Some(level.spawn_chicken(150.0)?);
            Ok(())
        });
        let chicken = chicken.expect("chicken id");
        let mut harness = Harness::new(world);
        {
            let body = &mut player_mut(&mut harness.world).body;
            body.position.y = 400.0;
            body.speed_y = 5.0;
        }

        harness.collide_only(STEP_MS);
        let enemy = harness.world.level().find(chicken).expect("still present");
        assert!(enemy.body.is_dead());
        assert_eq!(harness.audio.count(AudioCue::EnemyStomped), 1);
        assert_eq!(player(&harness.world).body.speed_y, -20.0);

        for _ in 0..3 {
            harness.collide_only(STEP_MS);
        }
        let (boss_body, _) = boss_state(&harness.world);
        assert!(!boss_body.is_dead());
        assert_eq!(player(&harness.world).body.energy(), 190.0);
    }

    #[test]
    fn projectile_damages_boss_exactly_once() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            level.spawn_boss(1000.0)?;
            level.spawn_projectile(Vec2::new(1200.0, 400.0), false)?;
            Ok(())
        });
        let mut harness = Harness::new(world);

        for _ in 0..6 {
            harness.collide_only(STEP_MS);
        }

        let projectile = harness
            .world
            .level()
            .iter_category(Category::Projectile)
            .next()
            .expect("projectile");
        match &projectile.kind {
            ActorKind::Projectile(state) => {
                assert!(state.broken);
                assert!(!state.can_deal_damage);
            }
            other => panic!("unexpected actor: {other:?}"),
        }
        let (boss_body, boss) = boss_state(&harness.world);
        assert_eq!(boss_body.energy(), 75.0);
        assert_eq!(boss.phase, BossPhase::Hurt);
        assert_eq!(harness.audio.count(AudioCue::BossHurt), 1);
        assert_eq!(
            harness.ui.last_status(StatusBar::BossEnergy),
            Some((75.0, 100.0))
        );
    }

    #[test]
    fn projectile_kills_small_enemy() {
        let mut chicken = None;
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            chicken = Some(level.spawn_chicken(1000.0)?);
            level.spawn_projectile(Vec2::new(1040.0, 780.0), false)?;
            Ok(())
        });
        let chicken = chicken.expect("chicken id");
        let mut harness = Harness::new(world);

        harness.collide_only(STEP_MS);

        let enemy = harness.world.level().find(chicken).expect("chicken");
        assert!(enemy.body.is_dead());
        assert_eq!(harness.audio.count(AudioCue::BottleSmashed), 1);
    }

    #[test]
    fn boss_death_plays_out_and_wins_once() {
        let tuning = Tuning {
            projectile_damage: 150.0,
            ..Tuning::default()
        };
        let world = world_with(tuning, |level| {
            level.spawn_player(100.0)?;
            level.spawn_boss(1000.0)?;
            level.spawn_projectile(Vec2::new(1200.0, 400.0), false)?;
            Ok(())
        });
        let mut game = GameLoop::new(
            world,
            RecordingAudio::default(),
            RecordingUi::default(),
            25.0,
        );
        assert!(game.start(0.0));

        let input = InputSnapshot::empty();
        let mut now = 0.0;
        let mut outcome = None;
        let mut saw_dead_phase = false;
        for _ in 0..200 {
            now += 30.0;
            if let FrameOutcome::Finished(done) = game.on_frame(now, &input) {
                outcome = Some(done);
                break;
            }
            let (_, boss) = boss_state(game.scene());
            saw_dead_phase |= boss.phase == BossPhase::Dead;
        }

        assert_eq!(outcome, Some(GameOutcome::Won));
        assert!(saw_dead_phase);
        for _ in 0..10 {
            now += 30.0;
            assert_eq!(game.on_frame(now, &input), FrameOutcome::Idle);
        }
        assert_eq!(game.audio().count(AudioCue::GameWon), 1);
        assert_eq!(game.ui().count_game_over(), 1);
        assert_eq!(game.scene().outcome(), Some(GameOutcome::Won));
    }

    #[test]
    fn player_death_ends_the_game_lost() {
        let tuning = Tuning {
            enemy_damage: 500.0,
            ..Tuning::default()
        };
        let world = world_with(tuning, |level| {
            level.spawn_player(100.0)?;
            level.spawn_chicken(150.0)?;
            Ok(())
        });
        let mut game = GameLoop::new(
            world,
            RecordingAudio::default(),
            RecordingUi::default(),
            25.0,
        );
        game.start(0.0);

        let input = InputSnapshot::empty();
        let mut now = 0.0;
        let mut outcome = None;
        for _ in 0..200 {
            now += 30.0;
            if let FrameOutcome::Finished(done) = game.on_frame(now, &input) {
                outcome = Some(done);
                break;
            }
        }

        assert_eq!(outcome, Some(GameOutcome::Lost));
        assert!(player(game.scene()).body.is_dead());
        assert_eq!(game.audio().count(AudioCue::GameLost), 1);
        assert_eq!(game.ui().count_game_over(), 1);
    }

    #[test]
    fn boss_alerts_then_attacks_with_a_single_lunge() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            level.spawn_boss(275.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);
        let start_x = boss_state(&harness.world).0.position.x;

        harness.update_only(1);
        assert_eq!(boss_state(&harness.world).1.phase, BossPhase::Alerted);
        assert_eq!(harness.audio.count(AudioCue::BossAlerted), 1);

        let mut saw_attack = false;
        for _ in 0..90 {
            harness.update_only(1);
            saw_attack |= boss_state(&harness.world).1.phase == BossPhase::Attacking;
        }
        assert!(saw_attack);
        let (body, boss) = boss_state(&harness.world);
        assert!(boss.lunged);
        assert_eq!(boss.phase, BossPhase::Alerted);
        assert_eq!(body.position.x, start_x - 120.0);
        assert_eq!(harness.audio.count(AudioCue::BossAlerted), 1);
    }

    #[test]
    fn distant_boss_walks_toward_the_player() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            level.spawn_boss(3000.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);

        harness.update_only(10);
        let (body, boss) = boss_state(&harness.world);
        assert_eq!(boss.phase, BossPhase::Walking);
        assert!(body.position.x < 3000.0);
        assert_eq!(harness.audio.count(AudioCue::BossAlerted), 0);
    }

    #[test]
    fn throw_consumes_bottles_at_the_cooldown_rate() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);

        harness.steps(80, held(InputAction::Throw));

        assert_eq!(harness.audio.count(AudioCue::BottleThrown), 4);
        assert_eq!(harness.world.bottles().map(|b| b.current()), Some(1));
        assert_eq!(
            harness.ui.last_status(StatusBar::Bottles),
            Some((1.0, 10.0))
        );
    }

    #[test]
    fn throw_without_supply_does_nothing() {
        let tuning = Tuning {
            starting_bottles: 0,
            ..Tuning::default()
        };
        let world = world_with(tuning, |level| {
            level.spawn_player(100.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);

        harness.steps(80, held(InputAction::Throw));

        assert_eq!(harness.audio.count(AudioCue::BottleThrown), 0);
        assert_eq!(
            harness.world.level().iter_category(Category::Projectile).count(),
            0
        );
    }

    #[test]
    fn thrown_bottle_shatters_on_the_ground() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            level.spawn_projectile(Vec2::new(1000.0, 700.0), false)?;
            Ok(())
        });
        let mut harness = Harness::new(world);

        harness.update_only(120);

        assert_eq!(harness.audio.count(AudioCue::BottleSmashed), 1);
        assert_eq!(
            harness.world.level().iter_category(Category::Projectile).count(),
            0
        );
        assert_eq!(harness.world.level().iter_category(Category::Pickup).count(), 0);
    }

    #[test]
    fn grounded_bottle_can_be_recovered_as_pickup() {
        let tuning = Tuning {
            recover_bottles_on_ground: true,
            ..Tuning::default()
        };
        let world = world_with(tuning, |level| {
            level.spawn_player(100.0)?;
            level.spawn_projectile(Vec2::new(1000.0, 700.0), false)?;
            Ok(())
        });
        let mut harness = Harness::new(world);

        harness.update_only(120);

        assert_eq!(harness.audio.count(AudioCue::BottleSmashed), 0);
        assert_eq!(
            harness.world.level().iter_category(Category::Projectile).count(),
            0
        );
        let pickup = harness
            .world
            .level()
            .iter_category(Category::Pickup)
            .next()
            .expect("recovered bottle");
        assert!(matches!(
            pickup.kind,
            ActorKind::Pickup(PickupState {
                kind: PickupKind::Bottle,
                ..
            })
        ));
    }

    #[test]
    fn buying_trades_coins_until_bottles_are_full() {
        let tuning = Tuning {
            max_bottles: 7,
            ..Tuning::default()
        };
        let world = world_with(tuning, |level| {
            level.spawn_player(100.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);

        harness.steps(40, held(InputAction::Buy));

        assert_eq!(harness.audio.count(AudioCue::BottleBought), 2);
        assert_eq!(harness.world.bottles().map(|b| b.current()), Some(7));
        assert_eq!(harness.world.coins().map(|c| c.current()), Some(30));
        assert_eq!(harness.ui.last_status(StatusBar::Coins), Some((30.0, 100.0)));
    }

    #[test]
    fn buying_stops_when_coins_run_out() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);

        harness.steps(80, held(InputAction::Buy));

        assert_eq!(harness.audio.count(AudioCue::BottleBought), 5);
        assert_eq!(harness.world.coins().map(|c| c.current()), Some(0));
        assert_eq!(harness.world.bottles().map(|b| b.current()), Some(10));
    }

    #[test]
    fn pickups_are_collected_capped_and_removed() {
        let tuning = Tuning {
            starting_bottles: 10,
            ..Tuning::default()
        };
        let world = world_with(tuning, |level| {
            level.spawn_player(100.0)?;
            level.spawn_coin(150.0, 700.0)?;
            level.spawn_ground_bottle(150.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);

        harness.collide_only(STEP_MS);
        assert_eq!(harness.world.coins().map(|c| c.current()), Some(55));
        assert_eq!(harness.world.bottles().map(|b| b.current()), Some(10));
        assert_eq!(harness.audio.count(AudioCue::CoinCollected), 1);
        assert_eq!(harness.audio.count(AudioCue::BottleCollected), 1);

        harness.collide_only(STEP_MS);
        assert_eq!(harness.audio.count(AudioCue::CoinCollected), 1);

        harness.update_only(1);
        assert_eq!(harness.world.level().iter_category(Category::Pickup).count(), 0);
    }

    #[test]
    fn spawn_timers_only_fire_while_the_gate_is_open() {
        let tuning = Tuning {
            enemy_spawn_interval_ms: 1_000.0,
            item_spawn_interval_ms: 1_000.0,
            ..Tuning::default()
        };
        let world = world_with(tuning, |level| {
            level.spawn_player(100.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);

        harness.update_only(44);
        assert_eq!(count_enemies(&harness.world), 0);

        harness.start();
        harness.update_only(1);
        let spawned = CHICKENS_PER_SEGMENT + CHICKS_PER_SEGMENT;
        assert_eq!(count_enemies(&harness.world), spawned);
        assert_eq!(
            harness.world.level().iter_category(Category::Pickup).count(),
            COINS_PER_SEGMENT + BOTTLES_PER_SEGMENT
        );
        let outer_start = 7.0 * 1920.0;
        assert!(harness
            .world
            .level()
            .iter_category(Category::Enemy)
            .all(|enemy| enemy.body.position.x >= outer_start - 20.0));

        harness.world.on_pause();
        harness.update_only(44);
        assert_eq!(count_enemies(&harness.world), spawned);
    }

    #[test]
    fn no_spawns_while_player_is_in_the_outer_segment() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);
        harness.start();
        player_mut(&mut harness.world).body.position.x = 7.0 * 1920.0;

        let spawned = harness
            .world
            .level_mut()
            .spawn_enemies()
            .expect("spawn");
        assert_eq!(spawned, 0);
    }

    #[test]
    fn enemy_walking_past_level_start_is_despawned() {
        let mut chicken = None;
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            chicken = Some(level.spawn_chicken(-300.0)?);
            Ok(())
        });
        let chicken = chicken.expect("chicken id");
        let mut harness = Harness::new(world);

        harness.update_only(1);

        assert!(harness.world.level().find(chicken).is_none());
    }

    #[test]
    fn wounded_player_heals_periodically_up_to_max() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);
        player_mut(&mut harness.world)
            .body
            .take_damage(0.0, 0.0, 3.0);

        harness.update_only(119);
        assert_eq!(player(&harness.world).body.energy(), 197.0);
        harness.update_only(1);
        assert_eq!(player(&harness.world).body.energy(), 200.0);

        harness.update_only(240);
        assert_eq!(player(&harness.world).body.energy(), 200.0);
    }

    #[test]
    fn hurt_flag_clears_after_its_window() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);
        player_mut(&mut harness.world)
            .body
            .take_damage(0.0, 0.0, 1.0);

        harness.update_only(11);
        assert!(player(&harness.world).body.hurt);
        harness.update_only(1);
        assert!(!player(&harness.world).body.hurt);
    }

    #[test]
    fn player_moves_jumps_and_lands() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);
        let rest_y = player(&harness.world).body.position.y;

        harness.steps(4, held(InputAction::MoveRight));
        assert_eq!(player(&harness.world).body.position.x, 140.0);

        harness.steps(1, held(InputAction::Jump));
        assert_eq!(harness.audio.count(AudioCue::Jump), 1);
        harness.steps(4, InputSnapshot::empty());
        assert!(player(&harness.world).body.position.y < rest_y);

        harness.steps(120, InputSnapshot::empty());
        assert_eq!(player(&harness.world).body.position.y, rest_y);
        assert_eq!(player(&harness.world).body.speed_y, 0.0);
    }

    #[test]
    fn player_cannot_leave_the_level_bounds() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(10.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);

        harness.steps(10, held(InputAction::MoveLeft));
        assert_eq!(player(&harness.world).body.position.x, 0.0);
        assert!(player(&harness.world).body.facing_left);

        let end = harness.world.level().level_end_x();
        player_mut(&mut harness.world).body.position.x = end - 5.0;
        harness.steps(10, held(InputAction::MoveRight));
        assert_eq!(player(&harness.world).body.position.x, end);
    }

    #[test]
    fn camera_follows_player_past_the_anchor() {
        let world = world_with(Tuning::default(), |level| {
            level.spawn_player(100.0)?;
            Ok(())
        });
        let mut harness = Harness::new(world);
        assert_eq!(harness.world.camera().offset_x, 0.0);

        player_mut(&mut harness.world).body.position.x = 2_000.0;
        harness.update_only(1);
        assert_eq!(harness.world.camera().offset_x, -1_500.0);
    }

    #[test]
    fn draw_list_culls_offscreen_entities_and_draws_player_last() {
        let world = build_world(Tuning::default()).expect("world");
        let mut items = Vec::new();
        world.draw_list(&mut items);

        assert!(!items.is_empty());
        assert!(items.len() < world.entity_count());
        assert!(items
            .iter()
            .all(|item| item.x + item.width >= -80.0 && item.x <= 1920.0 + 80.0));
        let last = items.last().expect("player item");
        assert!(last.sprite_key.starts_with("character/"));
        assert_eq!(last.width, PLAYER_SIZE.x);
    }

    #[test]
    fn start_publishes_every_status_bar() {
        let world = build_world(Tuning::default()).expect("world");
        let mut harness = Harness::new(world);

        harness.start();

        assert_eq!(
            harness.ui.last_status(StatusBar::PlayerEnergy),
            Some((200.0, 200.0))
        );
        assert_eq!(harness.ui.last_status(StatusBar::Bottles), Some((5.0, 10.0)));
        assert_eq!(harness.ui.last_status(StatusBar::Coins), Some((50.0, 100.0)));
        assert_eq!(
            harness.ui.last_status(StatusBar::BossEnergy),
            Some((100.0, 100.0))
        );
        assert!(harness.world.level().spawn_gate_open());
    }

    #[test]
    fn counter_caps_and_spends() {
        let mut counter = Counter::new(12, 10);
        assert_eq!(counter.current(), 10);
        assert!(counter.is_full());
        assert!(counter.try_spend(4));
        assert_eq!(counter.add(9), 10);
        assert!(!counter.try_spend(11));
        assert_eq!(counter.current(), 10);
    }
