//! Batched enemy spawning across the level's waypoints.
//!
//! Spawning a hundred agents in one frame causes a visible hitch, so the
//! total is split into batches with a pause in between.

use bevy::prelude::*;
use rand::Rng;
use thiserror::Error;

use super::components::EnemyArchetype;
use super::patrol::PatrolRoute;

/// Configuration problems that keep the spawner from running.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("No waypoints available to spawn enemies on")]
    NoWaypoints,

    #[error("Enemy roster is empty")]
    EmptyRoster,
}

/// How many enemies to spawn and how to pace them.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPlan {
    pub total_enemies: usize,
    pub batches: usize,
    /// Simulation seconds between batches.
    pub batch_pause: f32,
    /// Waypoints per patrol route.
    pub route_length: usize,
}

impl Default for SpawnPlan {
    fn default() -> Self {
        Self {
            total_enemies: 100,
            batches: 10,
            batch_pause: 5.0,
            route_length: 5,
        }
    }
}

impl SpawnPlan {
    /// Size of batch `index`. The remainder of an uneven split lands in the last batch.
    pub fn batch_size(&self, index: usize) -> usize {
        let batches = self.batches.max(1);
        let per_batch = self.total_enemies / batches;
        if index + 1 == batches {
            per_batch + self.total_enemies % batches
        } else {
            per_batch
        }
    }
}

/// One enemy to instantiate.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnOrder {
    /// Index into the archetype roster.
    pub roster_index: usize,
    pub position: Vec3,
    /// Present for patrolling enemies only.
    pub route: Option<PatrolRoute>,
    /// Navigation avoidance priority, 1 for the first enemy, then increasing.
    pub avoidance_priority: u32,
}

/// Decides where and what to spawn, batch by batch.
#[derive(Debug, Clone)]
pub struct Spawner {
    waypoints: Vec<Vec3>,
    roster: Vec<EnemyArchetype>,
    plan: SpawnPlan,
    batches_spawned: usize,
    pause_timer: f32,
    next_priority: u32,
}

impl Spawner {
    pub fn new(
        waypoints: Vec<Vec3>,
        roster: Vec<EnemyArchetype>,
        plan: SpawnPlan,
    ) -> Result<Self, SpawnError> {
        if waypoints.is_empty() {
            return Err(SpawnError::NoWaypoints);
        }
        if roster.is_empty() {
            return Err(SpawnError::EmptyRoster);
        }

        Ok(Self {
            waypoints,
            roster,
            plan,
            batches_spawned: 0,
            pause_timer: 0.0,
            next_priority: 1,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.batches_spawned >= self.plan.batches
    }

    pub fn batches_spawned(&self) -> usize {
        self.batches_spawned
    }

    /// Advance the batch timer; returns the batch due this tick, if any.
    pub fn tick<R: Rng + ?Sized>(&mut self, delta: f32, rng: &mut R) -> Vec<SpawnOrder> {
        if self.is_finished() {
            return Vec::new();
        }

        self.pause_timer -= delta;
        if self.pause_timer > 0.0 {
            return Vec::new();
        }

        let count = self.plan.batch_size(self.batches_spawned);
        let batch = self.spawn_batch(count, rng);

        self.batches_spawned += 1;
        self.pause_timer = self.plan.batch_pause;

        debug!(
            "Spawn batch {}/{}: {} enemies",
            self.batches_spawned,
            self.plan.batches,
            batch.len()
        );
        batch
    }

    /// Produce `count` spawn orders.
    pub fn spawn_batch<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<SpawnOrder> {
        (0..count).map(|_| self.spawn_one(rng)).collect()
    }

    fn spawn_one<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SpawnOrder {
        let roster_index = rng.gen_range(0..self.roster.len());

        let (position, route) = match self.roster[roster_index] {
            EnemyArchetype::Patrollable => {
                let route = pick_distinct_waypoints(&self.waypoints, self.plan.route_length, rng);
                // Never empty: the pool is non-empty and at least one waypoint is picked
                let position = route.first().copied().unwrap_or(self.waypoints[0]);
                (position, Some(PatrolRoute::new(route)))
            }
            EnemyArchetype::StandingDuty => {
                let position = self.waypoints[rng.gen_range(0..self.waypoints.len())];
                (position, None)
            }
        };

        let avoidance_priority = self.next_priority;
        self.next_priority += 1;

        SpawnOrder {
            roster_index,
            position,
            route,
            avoidance_priority,
        }
    }
}

/// Pick up to `count` different waypoints (by pool index) in random order.
///
/// At least one waypoint is returned when the pool is non-empty.
pub fn pick_distinct_waypoints<R: Rng + ?Sized>(
    pool: &[Vec3],
    count: usize,
    rng: &mut R,
) -> Vec<Vec3> {
    let count = count.clamp(1, pool.len().max(1)).min(pool.len());
    let mut picked: Vec<usize> = Vec::with_capacity(count);

    while picked.len() < count {
        let index = rng.gen_range(0..pool.len());
        if !picked.contains(&index) {
            picked.push(index);
        }
    }

    picked.into_iter().map(|index| pool[index]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32 * 4.0, 0.0, 0.0)).collect()
    }

    fn plan(total: usize) -> SpawnPlan {
        SpawnPlan {
            total_enemies: total,
            ..SpawnPlan::default()
        }
    }

    #[test]
    fn missing_configuration_is_rejected() {
        assert_eq!(
            Spawner::new(Vec::new(), vec![EnemyArchetype::Patrollable], plan(10)).unwrap_err(),
            SpawnError::NoWaypoints
        );
        assert_eq!(
            Spawner::new(grid(3), Vec::new(), plan(10)).unwrap_err(),
            SpawnError::EmptyRoster
        );
    }

    #[test]
    fn routes_never_repeat_a_waypoint() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = grid(8);

        for _ in 0..200 {
            let route = pick_distinct_waypoints(&pool, 5, &mut rng);
            assert_eq!(route.len(), 5);
            for (i, a) in route.iter().enumerate() {
                assert!(route[i + 1..].iter().all(|b| b != a));
            }
        }
    }

    #[test]
    fn route_length_is_capped_by_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let route = pick_distinct_waypoints(&grid(3), 5, &mut rng);
        assert_eq!(route.len(), 3);
    }

    #[test]
    fn priorities_strictly_increase_across_batches() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut spawner = Spawner::new(
            grid(12),
            vec![EnemyArchetype::Patrollable, EnemyArchetype::StandingDuty],
            plan(40),
        )
        .unwrap();

        let mut priorities = Vec::new();
        while !spawner.is_finished() {
            priorities.extend(spawner.tick(5.0, &mut rng).iter().map(|o| o.avoidance_priority));
        }

        let expected: Vec<u32> = (1..=40).collect();
        assert_eq!(priorities, expected);
    }

    #[test]
    fn batches_wait_between_spawns() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut spawner =
            Spawner::new(grid(6), vec![EnemyArchetype::StandingDuty], plan(20)).unwrap();

        assert_eq!(spawner.tick(0.0, &mut rng).len(), 2);
        assert!(spawner.tick(4.0, &mut rng).is_empty());
        assert_eq!(spawner.tick(1.0, &mut rng).len(), 2);
        assert_eq!(spawner.batches_spawned(), 2);
    }

    #[test]
    fn uneven_total_is_still_fully_spawned() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut spawner =
            Spawner::new(grid(6), vec![EnemyArchetype::StandingDuty], plan(25)).unwrap();

        let mut spawned = 0;
        while !spawner.is_finished() {
            spawned += spawner.tick(10.0, &mut rng).len();
        }
        assert_eq!(spawned, 25);
        assert!(spawner.tick(10.0, &mut rng).is_empty());
    }

    #[test]
    fn patrollers_start_on_their_first_waypoint() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut spawner =
            Spawner::new(grid(10), vec![EnemyArchetype::Patrollable], plan(10)).unwrap();

        for order in spawner.spawn_batch(10, &mut rng) {
            let route = order.route.expect("patroller without route");
            assert_eq!(route.len(), 5);
            assert_eq!(route.waypoints()[0], order.position);
        }
    }

    #[test]
    fn standing_guards_get_no_route() {
        let mut rng = StdRng::seed_from_u64(2);
        let pool = grid(4);
        let mut spawner =
            Spawner::new(pool.clone(), vec![EnemyArchetype::StandingDuty], plan(10)).unwrap();

        for order in spawner.spawn_batch(5, &mut rng) {
            assert!(order.route.is_none());
            assert!(pool.contains(&order.position));
        }
    }
}
