use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use cellworld_replay::config::ModelConfig;
use cellworld_replay::env::{Environment, EvadeEnv};
use cellworld_replay::paths::RunContext;
use cellworld_replay::replay::{
    discover, fill_from_file, filter_by_phases, filter_by_subjects, sort_files, ReplayBuffer,
    SortKey,
};
use cellworld_replay::world::World;

/// Generate a replay buffer from recorded cellworld experiments.
#[derive(Parser)]
#[command(name = "replay", about = "Build a replay buffer from recorded experiments")]
struct Cli {
    /// Name of the model configuration in the models folder
    model_name: String,

    /// Folder containing the recorded experiment subdirectories
    #[arg(short = 'f', long)]
    experiment_folder: PathBuf,

    /// Capacity of the replay buffer
    #[arg(short = 's', long, default_value_t = 10_000)]
    buffer_size: usize,

    /// Output buffer file (defaults to the run's buffer path)
    #[arg(short = 'o', long)]
    output_file: Option<PathBuf>,

    /// Comma-separated phase labels to include
    #[arg(long)]
    phases: Option<String>,

    /// Comma-separated subjects to include
    #[arg(long)]
    subjects: Option<String>,

    /// Comma-separated sort keys applied before filling
    /// (name, prefix, date, subject, occlusions, phase, iteration)
    #[arg(long)]
    sort_by: Option<String>,

    /// Task the model belongs to
    #[arg(long, default_value = "botevade")]
    task: String,

    /// Run identifier for the output paths
    #[arg(short = 'r', long)]
    run_id: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.buffer_size == 0 {
        bail!("buffer size must be > 0");
    }

    let mut context = RunContext::new(&cli.task, &cli.model_name);
    if let Some(run_id) = &cli.run_id {
        context = context.with_run_id(run_id);
    }

    // Load configuration
    let config_file = context.model_config_file();
    if !config_file.exists() {
        bail!("model configuration not found: {}", config_file.display());
    }
    let config = ModelConfig::load(&config_file)
        .with_context(|| format!("loading {}", config_file.display()))?;

    let output_file = cli.output_file.unwrap_or_else(|| context.buffer_file());
    if output_file.exists() {
        bail!("output file already exists: {}", output_file.display());
    }

    // Build both environments; experiments recorded with the robot present
    // replay against the predator-enabled one.
    let world_file = context.world_file(&config.environment.world_name);
    let world = World::load(&world_file)
        .with_context(|| format!("loading world '{}'", config.environment.world_name))?;

    let mut predator_config = config.environment.clone();
    predator_config.use_predator = true;
    let mut no_predator_config = config.environment;
    no_predator_config.use_predator = false;

    let mut predator_env = EvadeEnv::new(world.clone(), predator_config);
    let mut no_predator_env = EvadeEnv::new(world, no_predator_config);

    let mut buffer = ReplayBuffer::new(
        cli.buffer_size,
        EvadeEnv::OBSERVATION_LEN,
        predator_env.action_cells().len(),
    );

    // Select experiments
    println!(
        "Loading replay buffer from {}",
        cli.experiment_folder.display()
    );
    let mut files = discover(&cli.experiment_folder)
        .with_context(|| format!("scanning {}", cli.experiment_folder.display()))?;

    if let Some(phases) = &cli.phases {
        let phases: Vec<String> = phases.split(',').map(str::to_string).collect();
        files = filter_by_phases(files, &phases);
    }
    if let Some(subjects) = &cli.subjects {
        let subjects: Vec<String> = subjects.split(',').map(str::to_string).collect();
        files = filter_by_subjects(files, &subjects);
    }
    if let Some(sort_by) = &cli.sort_by {
        let keys = sort_by
            .split(',')
            .map(|key| key.parse::<SortKey>())
            .collect::<Result<Vec<SortKey>, String>>()
            .map_err(|e| anyhow::anyhow!(e))?;
        sort_files(&mut files, &keys);
    }

    // Fill
    for file in &files {
        println!("Loading experiment {}", file.name);
        let env: &mut dyn Environment = if file.phase.contains('R') {
            &mut predator_env
        } else {
            &mut no_predator_env
        };
        fill_from_file(&file.path, env, &mut buffer)
            .with_context(|| format!("replaying {}", file.path.display()))?;
        if buffer.is_full() {
            break;
        }
    }

    if let Some(parent) = output_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    println!("saving replay buffer file {}", output_file.display());
    buffer.save(&output_file)?;

    Ok(())
}
