//! Aggregator functions: reduce the swarm to a row of numbers.

use ks_sim::AgentView;

/// Maps every agent's current view to one log row (without the time column).
pub type Aggregator = fn(&[AgentView]) -> Vec<f64>;

/// `[r, g, b]` averaged over all agents.  Empty for an empty swarm.
pub fn mean_color(agents: &[AgentView]) -> Vec<f64> {
    if agents.is_empty() {
        return Vec::new();
    }
    let n = agents.len() as f64;
    let (r, g, b) = agents
        .iter()
        .fold((0.0, 0.0, 0.0), |(r, g, b), a| (r + a.color.r, g + a.color.g, b + a.color.b));
    vec![r / n, g / n, b / n]
}

/// Mean remaining battery over agents with a finite battery.
pub fn mean_battery(agents: &[AgentView]) -> Vec<f64> {
    let levels: Vec<f64> = agents.iter().filter_map(|a| a.battery.level()).collect();
    if levels.is_empty() {
        return Vec::new();
    }
    vec![levels.iter().sum::<f64>() / levels.len() as f64]
}

/// Number of agents still alive.
pub fn alive_count(agents: &[AgentView]) -> Vec<f64> {
    vec![agents.iter().filter(|a| !a.dead).count() as f64]
}

/// `x, y, theta` of every agent, in id order.
pub fn poses(agents: &[AgentView]) -> Vec<f64> {
    agents.iter().flat_map(|a| [a.pose.x, a.pose.y, a.pose.theta]).collect()
}

/// Each agent's motor command code (0 stop, 1 forward, 2 CW, 3 CCW).
pub fn motor_codes(agents: &[AgentView]) -> Vec<f64> {
    agents.iter().map(|a| a.motor.code() as f64).collect()
}

/// Each agent's consecutive agent-collision tick count.
pub fn collision_timers(agents: &[AgentView]) -> Vec<f64> {
    agents.iter().map(|a| a.collision_timer as f64).collect()
}
