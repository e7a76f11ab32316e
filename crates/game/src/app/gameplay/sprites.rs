const PLAYER_IDLE: &[&str] = &[
    "character/idle/i-1",
    "character/idle/i-2",
    "character/idle/i-3",
    "character/idle/i-4",
    "character/idle/i-5",
];
const PLAYER_LONG_IDLE: &[&str] = &[
    "character/long-idle/i-11",
    "character/long-idle/i-12",
    "character/long-idle/i-13",
    "character/long-idle/i-14",
];
const PLAYER_WALK: &[&str] = &[
    "character/walk/w-21",
    "character/walk/w-22",
    "character/walk/w-23",
    "character/walk/w-24",
    "character/walk/w-25",
    "character/walk/w-26",
];
const PLAYER_JUMP: &[&str] = &[
    "character/jump/j-31",
    "character/jump/j-32",
    "character/jump/j-33",
    "character/jump/j-34",
    "character/jump/j-35",
];
const PLAYER_HURT: &[&str] = &[
    "character/hurt/h-41",
    "character/hurt/h-42",
    "character/hurt/h-43",
];
const PLAYER_DEAD: &[&str] = &[
    "character/dead/d-51",
    "character/dead/d-52",
    "character/dead/d-53",
    "character/dead/d-54",
    "character/dead/d-55",
    "character/dead/d-56",
];

const CHICKEN_WALK: &[&str] = &[
    "enemies/chicken/walk-1",
    "enemies/chicken/walk-2",
    "enemies/chicken/walk-3",
];
const CHICKEN_DEAD: &str = "enemies/chicken/dead";
const CHICK_WALK: &[&str] = &[
    "enemies/chick/walk-1",
    "enemies/chick/walk-2",
    "enemies/chick/walk-3",
];
const CHICK_DEAD: &str = "enemies/chick/dead";

const BOSS_WALK: &[&str] = &[
    "enemies/boss/walk/g1",
    "enemies/boss/walk/g2",
    "enemies/boss/walk/g3",
    "enemies/boss/walk/g4",
];
const BOSS_ALERT: &[&str] = &[
    "enemies/boss/alert/g5",
    "enemies/boss/alert/g6",
    "enemies/boss/alert/g7",
    "enemies/boss/alert/g8",
    "enemies/boss/alert/g9",
    "enemies/boss/alert/g10",
    "enemies/boss/alert/g11",
    "enemies/boss/alert/g12",
];
const BOSS_ATTACK: &[&str] = &[
    "enemies/boss/attack/g13",
    "enemies/boss/attack/g14",
    "enemies/boss/attack/g15",
    "enemies/boss/attack/g16",
    "enemies/boss/attack/g17",
    "enemies/boss/attack/g18",
    "enemies/boss/attack/g19",
    "enemies/boss/attack/g20",
];
const BOSS_HURT: &[&str] = &[
    "enemies/boss/hurt/g21",
    "enemies/boss/hurt/g22",
    "enemies/boss/hurt/g23",
];
const BOSS_DEAD: &[&str] = &[
    "enemies/boss/dead/g24",
    "enemies/boss/dead/g25",
    "enemies/boss/dead/g26",
];

const BOTTLE_ROTATION: &[&str] = &[
    "bottle/rotation/r-1",
    "bottle/rotation/r-2",
    "bottle/rotation/r-3",
    "bottle/rotation/r-4",
];
const BOTTLE_SPLASH: &[&str] = &[
    "bottle/splash/s-1",
    "bottle/splash/s-2",
    "bottle/splash/s-3",
    "bottle/splash/s-4",
    "bottle/splash/s-5",
    "bottle/splash/s-6",
];
const BOTTLE_ON_GROUND: &[&str] = &["bottle/ground/left", "bottle/ground/right"];
const COIN: &[&str] = &["coin/coin-1", "coin/coin-2"];

const CLOUD_PARTS: [&str; 2] = ["background/clouds/part-1", "background/clouds/part-2"];
const SKY: &str = "background/air";
/// Terrain layers back to front with their parallax factor; one key per tile part.
const TERRAIN_LAYERS: [([&str; 2], f32); 3] = [
    (
        ["background/third-layer/part-1", "background/third-layer/part-2"],
        0.25,
    ),
    (
        ["background/second-layer/part-1", "background/second-layer/part-2"],
        0.5,
    ),
    (
        ["background/first-layer/part-1", "background/first-layer/part-2"],
        1.0,
    ),
];
