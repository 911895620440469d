use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use space_shooter_core::{Aabb, EnemyId, PowerUpKind, Rgb};
use space_shooter_system_collision::CollisionSystem;
use space_shooter_world::{Bullet, BulletOwner, Enemy, Player, PowerUp};

fn random_box(rng: &mut ChaCha8Rng) -> Aabb {
    Aabb::new(
        rng.gen_range(-50.0..50.0),
        rng.gen_range(-50.0..50.0),
        rng.gen_range(0.0..40.0),
        rng.gen_range(0.0..40.0),
    )
}

#[test]
fn collision_is_symmetric() {
    let system = CollisionSystem::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let mut hits = 0;

    for _ in 0..2_000 {
        let a = random_box(&mut rng);
        let b = random_box(&mut rng);
        let forward = system.check_collision(&a, &b);
        assert_eq!(forward, system.check_collision(&b, &a), "{a:?} vs {b:?}");
        if forward {
            hits += 1;
        }
    }

    assert!(hits > 0, "sample should include overlapping pairs");
}

#[test]
fn entities_collide_through_their_bounds() {
    let system = CollisionSystem::new();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let player = Player::new(800.0, 600.0);
    let enemy = Enemy::basic(EnemyId::new(0), player.x, player.y - 25.0, 1, &mut rng);
    let far_enemy = Enemy::basic(EnemyId::new(1), player.x, player.y - 40.0, 1, &mut rng);
    let power_up = PowerUp::new(player.x + 35.0, player.y, PowerUpKind::Shield);
    let bullet = Bullet::new(
        glam::Vec2::new(enemy.x, enemy.y),
        glam::Vec2::ZERO,
        5.0,
        Rgb::from_hex(0xff0000),
        BulletOwner::Enemy,
    );

    assert!(system.check_collision(&player, &enemy));
    assert!(!system.check_collision(&player, &far_enemy));
    assert!(system.check_collision(&power_up, &player));
    assert!(system.check_collision(&bullet, &enemy));
}
