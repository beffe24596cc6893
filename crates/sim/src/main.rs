//! Headless demo: runs a scripted character through the test arena and
//! logs its position once per second.

use strider_sim::{Level, PlayerInput, Simulation, SimulationConfig};

fn scripted_input(frame: u64) -> PlayerInput {
    let mut input = PlayerInput::default();
    let second = frame / 60;

    match second {
        // Walk forward toward the pillar.
        0..=2 => input.movement.forward = true,
        // Sprint with a jump over the first stair.
        3..=5 => {
            input.movement.forward = true;
            input.actions.sprint = true;
            input.actions.jump = frame % 60 == 0;
        }
        // Strafe right while crouched.
        6..=8 => {
            input.movement.right = true;
            input.actions.crouch = true;
        }
        // Turn left for a second, then walk the new heading.
        9 => input.mouse_delta = (-8.0, 0.0),
        _ => input.movement.forward = true,
    }

    input
}

fn main() {
    env_logger::init();

    let config = SimulationConfig::default();
    let mut sim = Simulation::new(Level::test_arena(), config).unwrap_or_else(|err| {
        eprintln!("bad character config: {err}");
        std::process::exit(1);
    });

    let id = sim.add_character("demo");
    log::info!("running 15s of scripted input in {}", sim.level.name);

    for frame in 0..(15 * 60) {
        sim.tick(&[scripted_input(frame)]);

        if frame % 60 == 59 {
            if let Some(character) = sim.character(id) {
                let pos = character.position();
                let grounded = character.state.grounded.get();
                println!(
                    "t={:>4.1}s pos=({:+7.2}, {:+6.2}, {:+7.2}) grounded={}",
                    sim.time(),
                    pos.x,
                    pos.y,
                    pos.z,
                    grounded
                );
            }
        }
    }
}
