use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Margins cut from the bounding box to form the collision box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Insets {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Strict overlap; touching edges do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodyError {
    #[error("body size must be positive and finite, got {width}x{height}")]
    InvalidSize { width: f32, height: f32 },
    #[error("collision insets must be finite and non-negative, got {insets:?}")]
    InvalidInset { insets: Insets },
    #[error("horizontal insets {left}+{right} leave no collision box inside width {width}")]
    HorizontalInsetsTooWide { left: f32, right: f32, width: f32 },
    #[error("vertical insets {top}+{bottom} leave no collision box inside height {height}")]
    VerticalInsetsTooTall { top: f32, bottom: f32, height: f32 },
}

/// Physical state shared by every entity in a level.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    size: Vec2,
    insets: Insets,
    pub speed_x: f32,
    pub speed_y: f32,
    pub acceleration_y: f32,
    pub facing_left: bool,
    pub hurt: bool,
    dead: bool,
    energy: f32,
    max_energy: f32,
    gravity_accumulator_ms: f32,
    damage_accumulator_ms: f32,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2, insets: Insets) -> Result<Self, BodyError> {
        validate_geometry(size, insets)?;
        Ok(Self {
            position,
            size,
            insets,
            speed_x: 0.0,
            speed_y: 0.0,
            acceleration_y: 0.0,
            facing_left: false,
            hurt: false,
            dead: false,
            energy: 0.0,
            max_energy: 0.0,
            gravity_accumulator_ms: 0.0,
            damage_accumulator_ms: 0.0,
        })
    }

    /// Sets both current and maximum energy. Non-finite or negative values become zero.
    pub fn with_energy(mut self, energy: f32) -> Self {
        let energy = if energy.is_finite() {
            energy.max(0.0)
        } else {
            0.0
        };
        self.energy = energy;
        self.max_energy = energy;
        self
    }

    pub fn with_speed(mut self, speed_x: f32, acceleration_y: f32) -> Self {
        self.speed_x = speed_x;
        self.acceleration_y = acceleration_y;
        self
    }

    pub fn with_facing_left(mut self, facing_left: bool) -> Self {
        self.facing_left = facing_left;
        self
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn insets(&self) -> Insets {
        self.insets
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    pub fn center_x(&self) -> f32 {
        self.position.x + self.size.x * 0.5
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn max_energy(&self) -> f32 {
        self.max_energy
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn collision_box(&self) -> Rect {
        Rect {
            left: self.position.x + self.insets.left,
            top: self.position.y + self.insets.top,
            right: self.position.x + self.size.x - self.insets.right,
            bottom: self.position.y + self.size.y - self.insets.bottom,
        }
    }

    pub fn is_colliding_with(&self, other: &Body) -> bool {
        self.collision_box().overlaps(&other.collision_box())
    }

    /// Advances vertical motion once `interval_ms` of time has accumulated.
    /// Returns whether a gravity step was applied.
    pub fn apply_gravity(&mut self, dt_ms: f32, interval_ms: f32) -> bool {
        self.gravity_accumulator_ms += sanitize_dt(dt_ms);
        if self.gravity_accumulator_ms < interval_ms {
            return false;
        }
        self.position.y += self.speed_y;
        self.speed_y += self.acceleration_y;
        self.gravity_accumulator_ms = 0.0;
        true
    }

    /// Applies `damage` once `interval_ms` of contact time has accumulated.
    /// Returns whether damage was applied on this call.
    pub fn take_damage(&mut self, dt_ms: f32, interval_ms: f32, damage: f32) -> bool {
        if self.dead {
            return false;
        }
        self.damage_accumulator_ms += sanitize_dt(dt_ms);
        if self.damage_accumulator_ms < interval_ms {
            return false;
        }
        self.energy -= damage;
        self.dead = self.energy < 0.0;
        self.hurt = true;
        self.damage_accumulator_ms = 0.0;
        true
    }

    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.dead && amount.is_finite() && amount > 0.0 {
            self.energy = (self.energy + amount).min(self.max_energy);
        }
        self.energy
    }

    pub fn kill(&mut self) {
        self.dead = true;
        self.speed_x = 0.0;
    }
}

fn validate_geometry(size: Vec2, insets: Insets) -> Result<(), BodyError> {
    if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
        return Err(BodyError::InvalidSize {
            width: size.x,
            height: size.y,
        });
    }
    let margins = [insets.left, insets.top, insets.right, insets.bottom];
    if margins.iter().any(|m| !m.is_finite() || *m < 0.0) {
        return Err(BodyError::InvalidInset { insets });
    }
    if insets.left + insets.right >= size.x {
        return Err(BodyError::HorizontalInsetsTooWide {
            left: insets.left,
            right: insets.right,
            width: size.x,
        });
    }
    if insets.top + insets.bottom >= size.y {
        return Err(BodyError::VerticalInsetsTooTall {
            top: insets.top,
            bottom: insets.bottom,
            height: size.y,
        });
    }
    Ok(())
}

fn sanitize_dt(dt_ms: f32) -> f32 {
    if dt_ms.is_finite() && dt_ms > 0.0 {
        dt_ms
    } else {
        0.0
    }
}

/// Anything with a collision box.
pub trait Collidable {
    fn body(&self) -> &Body;

    fn collides_with(&self, other: &dyn Collidable) -> bool {
        self.body().is_colliding_with(other.body())
    }
}

/// Anything that can lose energy and die.
pub trait Damageable: Collidable {
    fn body_mut(&mut self) -> &mut Body;

    fn receive_damage(&mut self, dt_ms: f32, interval_ms: f32, damage: f32) -> bool {
        self.body_mut().take_damage(dt_ms, interval_ms, damage)
    }
}

impl Collidable for Body {
    fn body(&self) -> &Body {
        self
    }
}

impl Damageable for Body {
    fn body_mut(&mut self) -> &mut Body {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f32, y: f32, w: f32, h: f32, insets: Insets) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(w, h), insets).expect("valid body")
    }

    #[test]
    fn collision_box_subtracts_insets() {
        let body = body_at(10.0, 20.0, 100.0, 200.0, Insets::new(5.0, 10.0, 15.0, 20.0));
        let rect = body.collision_box();
        assert_eq!(rect.left, 15.0);
        assert_eq!(rect.top, 30.0);
        assert_eq!(rect.right, 95.0);
        assert_eq!(rect.bottom, 200.0);
    }

    #[test]
    fn collision_is_symmetric() {
        let cases = [
            (0.0, 0.0, 50.0, 0.0),
            (0.0, 0.0, 99.0, 99.0),
            (0.0, 0.0, 100.0, 0.0),
            (0.0, 0.0, -40.0, 30.0),
            (0.0, 0.0, 300.0, 300.0),
        ];
        for (ax, ay, bx, by) in cases {
            let a = body_at(ax, ay, 100.0, 100.0, Insets::uniform(10.0));
            let b = body_at(bx, by, 100.0, 100.0, Insets::default());
            assert_eq!(
                a.is_colliding_with(&b),
                b.is_colliding_with(&a),
                "a=({ax},{ay}) b=({bx},{by})"
            );
        }
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = body_at(0.0, 0.0, 100.0, 100.0, Insets::default());
        let b = body_at(100.0, 0.0, 100.0, 100.0, Insets::default());
        assert!(!a.is_colliding_with(&b));
    }

    #[test]
    fn insets_shrink_contact_area() {
        let a = body_at(0.0, 0.0, 100.0, 100.0, Insets::default());
        let b = body_at(95.0, 0.0, 100.0, 100.0, Insets::uniform(10.0));
        assert!(!a.is_colliding_with(&b));
        assert!(a.is_colliding_with(&body_at(95.0, 0.0, 100.0, 100.0, Insets::default())));
    }

    #[test]
    fn rejects_insets_wider_than_body() {
        let err = Body::new(
            Vec2::default(),
            Vec2::new(100.0, 100.0),
            Insets::new(60.0, 0.0, 40.0, 0.0),
        )
        .expect_err("insets too wide");
        assert!(matches!(err, BodyError::HorizontalInsetsTooWide { .. }));

        let err = Body::new(
            Vec2::default(),
            Vec2::new(100.0, 100.0),
            Insets::new(0.0, -1.0, 0.0, 0.0),
        )
        .expect_err("negative inset");
        assert!(matches!(err, BodyError::InvalidInset { .. }));
    }

    #[test]
    fn rejects_non_positive_size() {
        let err = Body::new(Vec2::default(), Vec2::new(0.0, 10.0), Insets::default())
            .expect_err("zero width");
        assert!(matches!(err, BodyError::InvalidSize { .. }));
    }

    #[test]
    fn gravity_waits_for_interval() {
        let mut body = body_at(0.0, 0.0, 10.0, 10.0, Insets::default()).with_speed(0.0, 2.0);
        body.speed_y = -10.0;

        assert!(!body.apply_gravity(10.0, 25.0));
        assert_eq!(body.position.y, 0.0);
        assert!(body.apply_gravity(15.0, 25.0));
        assert_eq!(body.position.y, -10.0);
        assert_eq!(body.speed_y, -8.0);
        assert!(!body.apply_gravity(10.0, 25.0));
    }

    #[test]
    fn damage_is_throttled_by_interval() {
        let mut body = body_at(0.0, 0.0, 10.0, 10.0, Insets::default()).with_energy(10.0);

        assert!(!body.take_damage(50.0, 100.0, 3.0));
        assert!(body.take_damage(50.0, 100.0, 3.0));
        assert_eq!(body.energy(), 7.0);
        assert!(body.hurt);
        assert!(!body.take_damage(99.0, 100.0, 3.0));
        assert_eq!(body.energy(), 7.0);
    }

    #[test]
    fn dead_exactly_when_energy_drops_below_zero() {
        let mut body = body_at(0.0, 0.0, 10.0, 10.0, Insets::default()).with_energy(6.0);

        assert!(body.take_damage(0.0, 0.0, 3.0));
        assert!(!body.is_dead());
        assert!(body.take_damage(0.0, 0.0, 3.0));
        assert_eq!(body.energy(), 0.0);
        assert!(!body.is_dead());
        assert!(body.take_damage(0.0, 0.0, 3.0));
        assert!(body.is_dead());
        assert!(!body.take_damage(0.0, 0.0, 3.0));
    }

    #[test]
    fn heal_never_exceeds_max_energy() {
        let mut body = body_at(0.0, 0.0, 10.0, 10.0, Insets::default()).with_energy(20.0);
        body.take_damage(0.0, 0.0, 5.0);

        assert_eq!(body.heal(3.0), 18.0);
        assert_eq!(body.heal(100.0), 20.0);
        assert!(body.energy() <= body.max_energy());
    }

    #[test]
    fn dead_bodies_do_not_heal() {
        let mut body = body_at(0.0, 0.0, 10.0, 10.0, Insets::default()).with_energy(1.0);
        body.take_damage(0.0, 0.0, 5.0);
        assert!(body.is_dead());
        assert_eq!(body.heal(10.0), -4.0);
    }

    #[test]
    fn trait_objects_share_collision_rules() {
        let a = body_at(0.0, 0.0, 50.0, 50.0, Insets::default());
        let b = body_at(25.0, 25.0, 50.0, 50.0, Insets::default());
        let other: &dyn Collidable = &b;
        assert!(a.collides_with(other));
    }
}
