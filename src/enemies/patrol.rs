//! Waypoint patrol with a pause at every node.

use bevy::prelude::*;

use super::services::Navigator;

/// Cyclic list of waypoints. Built once at spawn, never changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints }
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Walks a [`PatrolRoute`], waiting at each waypoint before moving on.
#[derive(Debug, Clone)]
pub struct PatrolController {
    route: PatrolRoute,
    next_index: usize,
    wait_time: f32,
    wait_timer: f32,
    waiting: bool,
    enabled: bool,
}

impl PatrolController {
    pub fn new(wait_time: f32) -> Self {
        Self {
            route: PatrolRoute::default(),
            next_index: 0,
            wait_time,
            wait_timer: 0.0,
            waiting: false,
            enabled: true,
        }
    }

    /// Assign the route and head for its first waypoint.
    pub fn assign_route(&mut self, route: PatrolRoute, nav: &mut dyn Navigator) {
        self.route = route;
        self.next_index = 0;
        self.waiting = false;
        self.go_to_next_waypoint(nav);
    }

    /// Pause or resume evaluation. The route is kept either way.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    /// Index of the waypoint that will be requested next.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn tick(&mut self, delta: f32, nav: &mut dyn Navigator) {
        if !self.enabled || self.route.is_empty() || nav.is_path_pending() {
            return;
        }

        if !self.waiting && nav.remaining_distance() <= nav.stopping_distance() {
            self.waiting = true;
            self.wait_timer = self.wait_time;
        }

        if self.waiting {
            self.wait_timer -= delta;
            if self.wait_timer <= 0.0 {
                self.waiting = false;
                self.go_to_next_waypoint(nav);
            }
        }
    }

    fn go_to_next_waypoint(&mut self, nav: &mut dyn Navigator) {
        let Some(&waypoint) = self.route.waypoints().get(self.next_index) else {
            return;
        };

        nav.request_destination(waypoint);
        self.next_index = (self.next_index + 1) % self.route.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::services::fakes::{log, Effect, FakeNav};

    fn square_route() -> PatrolRoute {
        PatrolRoute::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 10.0),
        ])
    }

    #[test]
    fn assigning_route_requests_first_waypoint() {
        let log = log();
        let mut nav = FakeNav::new(&log);
        let mut patrol = PatrolController::new(2.0);

        patrol.assign_route(square_route(), &mut nav);

        assert_eq!(log.borrow().as_slice(), &[Effect::Destination(Vec3::ZERO)]);
        assert_eq!(patrol.next_index(), 1);
    }

    #[test]
    fn waits_before_moving_on() {
        let log = log();
        let mut nav = FakeNav::new(&log);
        let mut patrol = PatrolController::new(2.0);
        patrol.assign_route(square_route(), &mut nav);
        log.borrow_mut().clear();

        patrol.tick(1.0, &mut nav);
        assert!(log.borrow().is_empty());

        patrol.tick(1.0, &mut nav);
        assert_eq!(
            log.borrow().as_slice(),
            &[Effect::Destination(Vec3::new(10.0, 0.0, 0.0))]
        );
    }

    #[test]
    fn no_wait_while_still_travelling() {
        let log = log();
        let mut nav = FakeNav::new(&log);
        nav.remaining = 8.0;
        let mut patrol = PatrolController::new(0.1);
        patrol.assign_route(square_route(), &mut nav);
        log.borrow_mut().clear();

        for _ in 0..10 {
            patrol.tick(1.0, &mut nav);
        }
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn pending_path_suspends_evaluation() {
        let log = log();
        let mut nav = FakeNav::new(&log);
        nav.pending = true;
        let mut patrol = PatrolController::new(0.0);
        patrol.assign_route(square_route(), &mut nav);
        log.borrow_mut().clear();

        patrol.tick(1.0, &mut nav);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn traversal_is_cyclic() {
        let log = log();
        let mut nav = FakeNav::new(&log);
        let mut patrol = PatrolController::new(0.5);
        patrol.assign_route(square_route(), &mut nav);
        let start = patrol.next_index();

        for _ in 0..square_route().len() {
            patrol.tick(0.5, &mut nav);
        }

        assert_eq!(patrol.next_index(), start);
    }

    #[test]
    fn disabling_keeps_route() {
        let log = log();
        let mut nav = FakeNav::new(&log);
        let mut patrol = PatrolController::new(0.0);
        patrol.assign_route(square_route(), &mut nav);
        log.borrow_mut().clear();

        patrol.set_enabled(false);
        patrol.tick(1.0, &mut nav);
        assert!(log.borrow().is_empty());
        assert_eq!(patrol.route().len(), 4);

        patrol.set_enabled(true);
        patrol.tick(1.0, &mut nav);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn empty_route_is_a_no_op() {
        let log = log();
        let mut nav = FakeNav::new(&log);
        let mut patrol = PatrolController::new(0.0);

        patrol.assign_route(PatrolRoute::default(), &mut nav);
        patrol.tick(1.0, &mut nav);

        assert!(log.borrow().is_empty());
        assert_eq!(patrol.next_index(), 0);
    }
}
