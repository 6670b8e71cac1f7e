/// Output of one package-manager invocation.
#[derive(Clone, Debug)]
pub struct StepOutput {
    pub exit_code: i32,
    /// Combined stdout/stderr, surfaced verbatim in the install log.
    pub log: String,
}

impl StepOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Seam over the external package manager.
///
/// Implementations run one `install ...` invocation and report its exit
/// status; they never interpret the arguments.
pub trait PackageManager: Send {
    fn install(&self, args: &[String]) -> Result<StepOutput, Box<dyn std::error::Error>>;

    /// Version of the runtime interpreter the packages will run under.
    fn runtime_version(&self) -> Result<String, Box<dyn std::error::Error>>;
}
