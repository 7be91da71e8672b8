use std::path::PathBuf;

use chrono::Local;

/// Identity of one replay or training run: the task, the model
/// configuration name, and a run identifier. Every artifact path derives
/// from these three values. Constructing a context never touches the
/// filesystem; callers create directories when they write.
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    task: String,
    model: String,
    run_id: String,
    root: PathBuf,
}

impl RunContext {
    /// New context with a timestamp-derived run identifier.
    pub fn new(task: &str, model: &str) -> Self {
        RunContext {
            task: task.to_string(),
            model: model.to_string(),
            run_id: Local::now().format("%Y%m%d%H%M%S").to_string(),
            root: PathBuf::new(),
        }
    }

    /// Replace the generated run identifier, tying this run to an earlier one.
    pub fn with_run_id(mut self, run_id: &str) -> Self {
        self.run_id = run_id.to_string();
        self
    }

    /// Resolve all paths under `root` instead of the working directory.
    pub fn rooted_at(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Where this run's model snapshots live.
    pub fn data_dir(&self) -> PathBuf {
        self.root
            .join("data")
            .join(&self.task)
            .join(&self.model)
            .join(&self.run_id)
    }

    /// Where this run's replay buffers live.
    pub fn buffers_dir(&self) -> PathBuf {
        self.root
            .join("buffers")
            .join(&self.task)
            .join(&self.model)
            .join(&self.run_id)
    }

    /// Where the task's model configurations live.
    pub fn models_dir(&self) -> PathBuf {
        self.root.join("models").join(&self.task)
    }

    pub fn model_config_file(&self) -> PathBuf {
        self.models_dir().join(format!("{}_config.json", self.model))
    }

    pub fn world_file(&self, world_name: &str) -> PathBuf {
        self.root.join("worlds").join(format!("{}.json", world_name))
    }

    /// The run's model snapshot, also the resume point for a repeated run.
    pub fn data_file(&self) -> PathBuf {
        self.data_dir().join(format!("{}.bin", self.run_id))
    }

    /// A tagged model snapshot, e.g. a per-cycle or best-so-far save.
    pub fn tagged_data_file(&self, tag: &str) -> PathBuf {
        self.data_dir().join(format!("{}_{}.bin", self.run_id, tag))
    }

    /// The replay buffer written at the end of the run.
    pub fn buffer_file(&self) -> PathBuf {
        self.buffers_dir().join("buffer.bin")
    }

    /// A tagged buffer file for runs producing more than one buffer.
    pub fn tagged_buffer_file(&self, tag: &str) -> PathBuf {
        self.buffers_dir().join(format!("buffer_{}.bin", tag))
    }

    /// An input buffer by file name, resolved inside the buffers directory.
    pub fn in_buffer_file(&self, file_name: &str) -> PathBuf {
        self.buffers_dir().join(file_name)
    }
}
