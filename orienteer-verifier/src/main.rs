use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, ArgMatches, Command};
use orienteer_env::op::{self, baselines, BatchShape, CapacityTable, EnvParams, Instance, Tours};
use orienteer_structs::core::RolloutSettings;
use orienteer_utils::{compress_obj_hex, decompress_obj_hex, dejsonify, jsonify};
use serde_json::{json, Map, Value};
use std::{cell::RefCell, fs, io::Read, path::Path};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("orienteer-verifier")
        .about("Generates, rolls out and verifies orienteering episodes")
        .arg_required_else_help(true)
        .arg(arg!(-v --verbose "Log debug events").action(ArgAction::SetTrue).global(true))
        .subcommand(
            Command::new("generate")
                .about("Prints the instance batch for a nonce")
                .arg(settings_arg())
                .arg(nonce_arg()),
        )
        .subcommand(
            Command::new("rollout")
                .about("Runs a baseline policy and prints its tours and rewards")
                .arg(settings_arg())
                .arg(nonce_arg())
                .arg(
                    arg!(--policy [POLICY] "Baseline policy")
                        .value_parser(["greedy", "random"])
                        .default_value("greedy"),
                )
                .arg(
                    arg!(--hyperparameters [HYPERPARAMETERS] "Policy hyperparameters json string")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(arg!(--compress "Print tours as hex encoded zlib json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("verify_tours")
                .about("Replays tours through the environment and validates them")
                .arg(settings_arg())
                .arg(nonce_arg())
                .arg(
                    arg!(<TOURS> "Tours json string, hex encoded zlib json, path to file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

fn settings_arg() -> clap::Arg {
    arg!(<SETTINGS> "Settings json string or path to json file")
        .value_parser(clap::value_parser!(String))
}

fn nonce_arg() -> clap::Arg {
    arg!(<NONCE> "Nonce value").value_parser(clap::value_parser!(u64))
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    if let Err(e) = match matches.subcommand() {
        Some(("generate", sub_m)) => generate(sub_m),
        Some(("rollout", sub_m)) => rollout(sub_m),
        Some(("verify_tours", sub_m)) => verify_tours(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct Episode {
    instance: Instance,
    capacities: CapacityTable,
}

fn load_episode(sub_m: &ArgMatches) -> Result<Episode> {
    let settings = load_settings(required::<String>(sub_m, "SETTINGS")?)?;
    let nonce = *required::<u64>(sub_m, "NONCE")?;
    let seed = settings.calc_seed(nonce)?;

    let env = &settings.env;
    let params = EnvParams {
        num_loc: env.num_loc,
        min_loc: env.min_loc,
        max_loc: env.max_loc,
        min_prize: env.min_prize_or_default(),
        max_prize: env.max_prize_or_default(),
    };
    let capacities = env
        .extra_capacities()
        .fold(CapacityTable::default(), |table, (num_loc, capacity)| {
            table.with_entry(num_loc, capacity)
        });
    // Surface an unsupported node count before doing any work.
    capacities.capacity_for(params.num_loc)?;

    let batch_shape = BatchShape::from(settings.batch_size.clone());
    let instance = Instance::generate_instance(&seed, &params, &batch_shape)?;
    tracing::info!(
        nonce,
        num_loc = params.num_loc,
        batch_size = instance.batch_size(),
        "generated episode"
    );
    Ok(Episode {
        instance,
        capacities,
    })
}

fn generate(sub_m: &ArgMatches) -> Result<()> {
    let episode = load_episode(sub_m)?;
    println!("{}", jsonify(&episode.instance)?);
    Ok(())
}

fn rollout(sub_m: &ArgMatches) -> Result<()> {
    let episode = load_episode(sub_m)?;
    let hyperparameters = match sub_m.get_one::<String>("hyperparameters") {
        Some(h) => Some(dejsonify::<Map<String, Value>>(h)?),
        None => None,
    };

    let tours = RefCell::new(Tours::new());
    let save_solution_fn = |t: &Tours| -> Result<()> {
        *tours.borrow_mut() = t.clone();
        Ok(())
    };
    let solve_challenge: fn(
        &Instance,
        &CapacityTable,
        &dyn Fn(&Tours) -> Result<()>,
        &Option<Map<String, Value>>,
    ) -> Result<()> = match required::<String>(sub_m, "policy")?.as_str() {
        "random" => baselines::random::solve_challenge,
        _ => baselines::greedy::solve_challenge,
    };
    solve_challenge(
        &episode.instance,
        &episode.capacities,
        &save_solution_fn,
        &hyperparameters,
    )?;
    let tours = tours.into_inner();
    let rewards = episode.instance.evaluate_tours(&episode.capacities, &tours)?;

    let tours_json = if sub_m.get_flag("compress") {
        json!(compress_obj_hex(&tours)?)
    } else {
        serde_json::to_value(&tours)?
    };
    println!("{}", json!({ "tours": tours_json, "rewards": rewards }));
    Ok(())
}

fn verify_tours(sub_m: &ArgMatches) -> Result<()> {
    let episode = load_episode(sub_m)?;
    let tours = load_tours(required::<String>(sub_m, "TOURS")?)?;
    let rewards = replay(&episode, &tours)?;
    println!("Tours are valid");
    println!("{}", json!({ "rewards": rewards }));
    Ok(())
}

/// Validates the tours, then steps them through a fresh state (short tours
/// are padded with the depot) checking every intermediate state against the
/// observation bounds, and finally cross-checks the live prize.
fn replay(episode: &Episode, tours: &Tours) -> Result<Vec<f32>> {
    let instance = &episode.instance;
    instance.evaluate_tours(&episode.capacities, tours)?;
    let capacity = episode.capacities.capacity_for(instance.params.num_loc)?;
    let observation_spec = op::ObservationSpec::new(&instance.params, capacity);
    let mut state = instance.reset(&episode.capacities)?;
    let num_steps = tours.tours.iter().map(Vec::len).max().unwrap_or(0);
    for t in 0..num_steps {
        let actions: Vec<usize> = tours
            .tours
            .iter()
            .map(|tour| tour.get(t).copied().unwrap_or(0))
            .collect();
        state.step(&actions)?;
        observation_spec
            .check(&state)
            .map_err(|e| anyhow!("Step {}: {}", t, e))?;
    }
    let unfinished = state.batch_size() - state.num_done();
    if unfinished > 0 {
        tracing::warn!(unfinished, "tours stop before their episodes terminate");
    }
    Ok(instance.get_reward(&episode.capacities, &state, tours)?)
}

fn required<'a, T>(sub_m: &'a ArgMatches, id: &str) -> Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    sub_m
        .get_one::<T>(id)
        .ok_or_else(|| anyhow!("Missing argument {}", id))
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if Path::new(input).is_file() {
        Ok(fs::read_to_string(input)?)
    } else {
        Ok(input.to_string())
    }
}

fn load_settings(settings: &str) -> Result<RolloutSettings> {
    let settings = read_input(settings)?;
    dejsonify::<RolloutSettings>(&settings).map_err(|e| anyhow!("Failed to parse settings: {}", e))
}

fn load_tours(tours: &str) -> Result<Tours> {
    let tours = read_input(tours)?;
    let tours = tours.trim();
    if tours.starts_with('{') {
        dejsonify::<Tours>(tours).map_err(|e| anyhow!("Failed to parse tours: {}", e))
    } else {
        decompress_obj_hex::<Tours>(tours)
            .map_err(|e| anyhow!("Failed to decode compressed tours: {}", e))
    }
}
