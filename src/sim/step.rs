//! Fixed timestep simulation step

use super::Session;
use crate::config::Config;

/// Score for clearing one pipe half; a full pair is worth 1.0.
pub const SCORE_PER_PIPE: f64 = 0.5;

/// Advance the session by one tick. Does nothing once the session is over.
pub fn step(session: &mut Session, config: &Config) {
    if session.over {
        return;
    }

    session.bird.apply_gravity(config);

    let bird = session.bird;
    let mut gained = 0.0;
    let mut crashed = false;
    // Every pipe moves and scores this tick, even after a hit
    session.pipes.advance_each(config, |pipe| {
        if pipe.try_pass(bird.x, config) {
            gained += SCORE_PER_PIPE;
        }
        if pipe.collides_with(&bird, config) {
            crashed = true;
        }
    });
    session.score += gained;
    if crashed {
        log::debug!("bird hit a pipe at y={}", bird.y);
        session.over = true;
    }

    session.pipes.cull_offscreen(config);

    if session.bird.has_hit_ground(config) {
        log::debug!("bird hit the ground, vy={}", session.bird.vy);
        session.over = true;
    }
}
