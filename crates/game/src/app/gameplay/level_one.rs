/// The playable level: a tiled backdrop, drifting clouds, enemies and items
/// across the reachable segments, the boss at the far end and the player.
pub(crate) fn populate_level_one(level: &mut Level) -> Result<(), LevelError> {
    let tiles = level.segment_count();
    let width = level.segment_width();
    let tile_x = |tile: u32| width * tile as f32;
    let part = |tile: u32| (tile % BACKGROUND_PARTS) as usize;

    // Back to front, one full pass per layer.
    for tile in 0..tiles {
        level.spawn_background(tile_x(tile), SKY, 0.0)?;
    }
    for (parts, parallax) in TERRAIN_LAYERS {
        for tile in 0..tiles {
            level.spawn_background(tile_x(tile), parts[part(tile)], parallax)?;
        }
    }
    for tile in 0..tiles {
        level.spawn_cloud(tile_x(tile), CLOUD_PARTS[part(tile)])?;
    }

    // Items start at the spawn segment, enemies one segment further out.
    let inner_segments = tiles.saturating_sub(1);
    add_item_group(level, 0)?;
    level.repeat_across_segments(inner_segments, false, add_enemy_group)?;
    level.repeat_across_segments(inner_segments, false, add_item_group)?;

    let boss_x = level.level_end_x();
    level.spawn_boss(boss_x)?;
    level.spawn_player(PLAYER_SPAWN_X)?;
    Ok(())
}
