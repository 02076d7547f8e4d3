use super::parse_coverage;
use crate::models::{FitnessOracle, OracleError, Probe, Step};
use futures::future::BoxFuture;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::instrument;

pub const DEFAULT_ANALYSIS_COMMAND: &str =
    "./bin/sikraken.sh release regression[{restarts},{tries}] -m32 {target}";
pub const DEFAULT_MEASUREMENT_COMMAND: &str = "./bin/run_testcov.sh {target} -32";

/// Fitness oracle backed by two shell commands run in a working directory.
///
/// The analysis command runs with the probed parameters, then the measurement
/// command prints a `Coverage: N%` line that becomes the fitness. Both are
/// templates where `{restarts}`, `{tries}` and `{target}` are substituted
/// verbatim, without shell quoting.
///
/// Each step runs in its own process group. A step that overruns its budget
/// has the whole group killed, including workers the tool forked, before the
/// timeout is reported.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    workdir: PathBuf,
    analysis: String,
    measurement: String,
}

impl CommandOracle {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            analysis: DEFAULT_ANALYSIS_COMMAND.to_string(),
            measurement: DEFAULT_MEASUREMENT_COMMAND.to_string(),
        }
    }

    pub fn with_analysis(mut self, template: impl Into<String>) -> Self {
        self.analysis = template.into();
        self
    }

    pub fn with_measurement(mut self, template: impl Into<String>) -> Self {
        self.measurement = template.into();
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn render(template: &str, probe: &Probe<'_>) -> String {
        template
            .replace("{restarts}", &probe.restarts.to_string())
            .replace("{tries}", &probe.tries.to_string())
            .replace("{target}", &probe.target.display().to_string())
    }

    #[instrument(level = "debug", skip(self), fields(workdir = %self.workdir.display()))]
    async fn run_step(
        &self,
        step: Step,
        script: &str,
        budget: Duration,
    ) -> Result<Output, OracleError> {
        let started = Instant::now();
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(script)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a timeout reaches every process the tool starts.
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command
            .spawn()
            .map_err(|source| OracleError::Io { step, source })?;
        let pid = child.id();

        let collected = timeout(budget, collect_output(&mut child)).await;
        let output = match collected {
            Ok(output) => output.map_err(|source| OracleError::Io { step, source })?,
            Err(_) => {
                terminate(&mut child, pid).await;
                tracing::debug!(elapsed = ?started.elapsed(), "Step killed after timeout");
                return Err(OracleError::Timeout { step, budget });
            }
        };

        tracing::debug!(
            status = ?output.status.code(),
            elapsed = ?started.elapsed(),
            "Step finished"
        );

        if !output.status.success() {
            tracing::debug!(
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Step failed"
            );
            return Err(OracleError::NonZeroExit {
                step,
                code: output.status.code(),
            });
        }

        Ok(output)
    }

    async fn measure(&self, probe: Probe<'_>) -> Result<f64, OracleError> {
        let analysis = Self::render(&self.analysis, &probe);
        self.run_step(Step::Analysis, &analysis, probe.budget.primary)
            .await?;

        let measurement = Self::render(&self.measurement, &probe);
        let output = self
            .run_step(Step::Measurement, &measurement, probe.budget.measure)
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let coverage = parse_coverage(&stdout).ok_or_else(|| {
            OracleError::ParseFailure(format!(
                "no coverage line in output of `{measurement}`"
            ))
        })?;

        if !(0.0..=100.0).contains(&coverage) {
            return Err(OracleError::ParseFailure(format!(
                "coverage {coverage} is outside 0-100"
            )));
        }

        Ok(coverage)
    }
}

/// Waits for the child to exit while draining both pipes.
async fn collect_output(child: &mut Child) -> io::Result<Output> {
    let stdout = read_pipe(child.stdout.take());
    let stderr = read_pipe(child.stderr.take());

    let (status, stdout, stderr) = tokio::try_join!(child.wait(), stdout, stderr)?;

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

async fn read_pipe(pipe: Option<impl AsyncRead + Unpin>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Kills the whole process group of a timed-out step and reaps its leader.
///
/// `pid` is taken at spawn: the leader may already be reaped while forked
/// workers still hold the group alive.
async fn terminate(child: &mut Child, pid: Option<u32>) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        // SAFETY: kill(2) has no memory-safety preconditions; a negative pid
        // addresses the process group created at spawn.
        unsafe {
            libc::kill(-(pid as libc::pid_t), libc::SIGKILL);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = pid;
        let _ = child.start_kill();
    }

    if let Err(err) = child.wait().await {
        tracing::warn!(err = %err, "Could not reap timed-out step");
    }
}

impl FitnessOracle for CommandOracle {
    fn coverage<'a>(&'a self, probe: Probe<'a>) -> BoxFuture<'a, Result<f64, OracleError>> {
        Box::pin(self.measure(probe))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::models::Budget;

    fn probe(restarts: i64, tries: i64) -> Probe<'static> {
        Probe {
            restarts,
            tries,
            target: Path::new("Problem03_label00.c"),
            budget: Budget {
                primary: Duration::from_secs(5),
                measure: Duration::from_secs(5),
            },
        }
    }

    fn oracle(analysis: &str, measurement: &str) -> CommandOracle {
        CommandOracle::new(std::env::temp_dir())
            .with_analysis(analysis)
            .with_measurement(measurement)
    }

    #[test]
    fn it_substitutes_placeholders() {
        let rendered = CommandOracle::render(DEFAULT_ANALYSIS_COMMAND, &probe(12, 5));

        assert_eq!(
            rendered,
            "./bin/sikraken.sh release regression[12,5] -m32 Problem03_label00.c"
        );
    }

    #[tokio::test]
    async fn it_parses_the_measured_coverage() {
        let oracle = oracle("true", "echo 'Coverage: 55.5%'");

        let coverage = oracle.coverage(probe(1, 1)).await.unwrap();

        assert_eq!(coverage, 55.5);
    }

    #[tokio::test]
    async fn it_passes_the_probed_values_to_the_commands() {
        let oracle = oracle("test {restarts} -eq 12", "echo \"Coverage: {restarts}.{tries}%\"");

        let coverage = oracle.coverage(probe(12, 5)).await.unwrap();

        assert_eq!(coverage, 12.5);
    }

    #[tokio::test]
    async fn it_runs_in_the_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker"), "").unwrap();
        let oracle = CommandOracle::new(dir.path())
            .with_analysis("test -f marker")
            .with_measurement("echo 'Coverage: 1%'");

        assert_eq!(oracle.coverage(probe(1, 1)).await.unwrap(), 1.0);
    }

    #[tokio::test]
    async fn it_reports_a_failing_analysis() {
        let oracle = oracle("exit 3", "echo 'Coverage: 55.5%'");

        let err = oracle.coverage(probe(1, 1)).await.unwrap_err();

        assert!(matches!(
            err,
            OracleError::NonZeroExit {
                step: Step::Analysis,
                code: Some(3)
            }
        ));
    }

    #[tokio::test]
    async fn it_reports_a_failing_measurement() {
        let oracle = oracle("true", "exit 1");

        let err = oracle.coverage(probe(1, 1)).await.unwrap_err();

        assert!(matches!(
            err,
            OracleError::NonZeroExit {
                step: Step::Measurement,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn it_times_out_a_slow_step() {
        let oracle = oracle("sleep 5", "echo 'Coverage: 55.5%'");
        let mut probe = probe(1, 1);
        probe.budget.primary = Duration::from_millis(100);

        let started = Instant::now();
        let err = oracle.coverage(probe).await.unwrap_err();

        assert!(err.is_timeout());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn it_times_out_a_slow_measurement() {
        let oracle = oracle("true", "sleep 5; echo 'Coverage: 55.5%'");
        let mut probe = probe(1, 1);
        probe.budget.measure = Duration::from_millis(100);

        let err = oracle.coverage(probe).await.unwrap_err();

        assert!(matches!(
            err,
            OracleError::Timeout {
                step: Step::Measurement,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn it_kills_nested_processes_on_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = CommandOracle::new(dir.path())
            .with_analysis("sh -c 'sleep 1; touch still_running'; true")
            .with_measurement("echo 'Coverage: 1%'");
        let mut probe = probe(1, 1);
        probe.budget.primary = Duration::from_millis(100);

        let err = oracle.coverage(probe).await.unwrap_err();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(err.is_timeout());
        assert!(!dir.path().join("still_running").exists());
    }

    #[tokio::test]
    async fn it_kills_forked_workers_after_the_shell_exits() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = CommandOracle::new(dir.path())
            .with_analysis("(sleep 1; touch forked) & exit 0")
            .with_measurement("echo 'Coverage: 1%'");
        let mut probe = probe(1, 1);
        probe.budget.primary = Duration::from_millis(300);

        let err = oracle.coverage(probe).await.unwrap_err();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(err.is_timeout());
        assert!(!dir.path().join("forked").exists());
    }

    #[tokio::test]
    async fn it_rejects_output_without_coverage() {
        let oracle = oracle("true", "echo 'nothing to see'");

        let err = oracle.coverage(probe(1, 1)).await.unwrap_err();

        assert!(matches!(err, OracleError::ParseFailure(_)));
    }

    #[tokio::test]
    async fn it_rejects_coverage_above_one_hundred() {
        let oracle = oracle("true", "echo 'Coverage: 150%'");

        let err = oracle.coverage(probe(1, 1)).await.unwrap_err();

        assert!(matches!(err, OracleError::ParseFailure(_)));
    }
}
