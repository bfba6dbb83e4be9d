//! MiniZinc running as a child process.

use std::fs;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process::Child;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use crossbeam_channel::Receiver;
use tempfile::TempDir;

use crate::bounds::Bounds;
use crate::dzn::DataFile;
use crate::dzn::Dzn;
use crate::error::SolverError;
use crate::graph::Graph;
use crate::params;
use crate::solver::ColoringSolver;
use crate::solver::Outcome;
use crate::solver::output::Answer;
use crate::solver::output::parse_checked;

/// Coloring model shipped with the crate.
pub const BUNDLED_MODEL: &str = include_str!("../../models/graph_coloring.mzn");

const MODEL_FILE: &str = "graph_coloring.mzn";
const DATA_FILE: &str = "data.dzn";

/// Time left to the pipes to close once the solver exited.
const OUTPUT_GRACE: Duration = Duration::from_secs(2);

/// How to run MiniZinc.
#[derive(Clone, Debug)]
pub struct MiniZincConfig {
    /// MiniZinc executable.
    pub program: PathBuf,
    /// Arguments placed before the model and data arguments.
    pub args: Vec<String>,
    /// Backend given to `--solver`, MiniZinc picks its default otherwise.
    pub backend: Option<String>,
    /// Model to use instead of the bundled one.
    pub model: Option<PathBuf>,
    /// Directory receiving the data file. A temporary directory, removed
    /// on drop, is used when absent.
    pub work_dir: Option<PathBuf>,
}

impl Default for MiniZincConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("minizinc"),
            args: vec![],
            backend: None,
            model: None,
            work_dir: None,
        }
    }
}

enum WorkDir {
    Temporary(TempDir),
    Kept(PathBuf),
}

impl WorkDir {
    fn path(&self) -> &Path {
        match self {
            WorkDir::Temporary(dir) => dir.path(),
            WorkDir::Kept(path) => path,
        }
    }
}

/// Solver calling `minizinc -m <model> -d <data>` once per window.
pub struct MiniZinc {
    config: MiniZincConfig,
    work_dir: WorkDir,
    model: PathBuf,
}

impl MiniZinc {
    /// Prepare the work directory and the model file.
    pub fn new(config: MiniZincConfig) -> Result<Self, SolverError> {
        let work_dir = match &config.work_dir {
            Some(path) => {
                fs::create_dir_all(path).map_err(|source| {
                    SolverError::Prepare {
                        path: path.clone(),
                        source,
                    }
                })?;
                WorkDir::Kept(path.clone())
            }
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("mzn-coloring")
                    .tempdir()
                    .map_err(|source| SolverError::Prepare {
                        path: std::env::temp_dir(),
                        source,
                    })?;
                WorkDir::Temporary(dir)
            }
        };
        let model = match &config.model {
            Some(model) => model.clone(),
            None => {
                let path = work_dir.path().join(MODEL_FILE);
                fs::write(&path, BUNDLED_MODEL).map_err(|source| {
                    SolverError::Prepare {
                        path: path.clone(),
                        source,
                    }
                })?;
                path
            }
        };
        tracing::debug!(
            "MiniZinc work directory: {}",
            work_dir.path().display()
        );
        Ok(Self {
            config,
            work_dir,
            model,
        })
    }

    /// Path of the data file written before each call.
    pub fn data_path(&self) -> PathBuf {
        self.work_dir.path().join(DATA_FILE)
    }

    pub fn model_path(&self) -> &Path {
        &self.model
    }

    fn command(&self, data: &Path) -> Command {
        let mut command = Command::new(&self.config.program);
        command.args(&self.config.args);
        if let Some(backend) = &self.config.backend {
            command.arg("--solver").arg(backend);
        }
        command
            .arg("-m")
            .arg(&self.model)
            .arg("-d")
            .arg(data)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            // own process group, so that the backend started by MiniZinc
            // can be killed along with it
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        command
    }

    fn run(
        &self,
        graph: &Graph,
        bounds: Bounds,
        timeout: Duration,
    ) -> Result<Outcome, SolverError> {
        let data = self.data_path();
        fs::write(&data, DataFile::new(graph, bounds).dzn()).map_err(
            |source| SolverError::Prepare {
                path: data.clone(),
                source,
            },
        )?;

        let mut command = self.command(&data);
        tracing::debug!(?command, "starting solver");
        let mut child =
            command.spawn().map_err(|source| SolverError::Spawn {
                program: self.config.program.display().to_string(),
                source,
            })?;
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let status = match wait_until(&mut child, timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                tracing::debug!("solver timed out, terminating it");
                terminate(&mut child);
                return Ok(Outcome::TimedOut);
            }
            Err(err) => {
                terminate(&mut child);
                return Err(SolverError::Wait(err));
            }
        };
        // leftover processes of the group could keep the pipes open
        #[cfg(unix)]
        signal_group(&child, nix::sys::signal::Signal::SIGKILL);
        let closing = Instant::now() + OUTPUT_GRACE;
        let stdout = collect(&stdout, closing)?;
        let stderr = collect(&stderr, closing)?;
        tracing::trace!(%status, %stdout, %stderr, "solver finished");

        match parse_checked(&stdout, graph) {
            Ok(Answer::Unsatisfiable) => Ok(Outcome::Unsatisfiable),
            _ if !status.success() => Err(SolverError::Exit {
                status,
                stderr: stderr.trim().to_string(),
            }),
            Ok(Answer::Solved(coloring)) => Ok(Outcome::Solved(coloring)),
            Err(err) => Err(err.into()),
        }
    }
}

impl ColoringSolver for MiniZinc {
    fn submit(
        &mut self,
        graph: &Graph,
        bounds: Bounds,
        timeout: Duration,
    ) -> Outcome {
        self.run(graph, bounds, timeout)
            .unwrap_or_else(Outcome::Errored)
    }
}

/// Drain a pipe of the child on a separate thread.
fn spawn_reader<R>(pipe: Option<R>) -> Receiver<String>
where
    R: Read + Send + 'static,
{
    let (snd, rcv) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        let mut buffer = vec![];
        if let Some(mut pipe) = pipe {
            if let Err(err) = pipe.read_to_end(&mut buffer) {
                tracing::debug!("error reading solver output: {err}");
            }
        }
        // the receiver is gone if the solver was abandoned
        let _ = snd.send(String::from_utf8_lossy(&buffer).into_owned());
    });
    rcv
}

/// Output drained by a reader, unless its pipe is still open at `deadline`.
fn collect(
    output: &Receiver<String>,
    deadline: Instant,
) -> Result<String, SolverError> {
    output.recv_deadline(deadline).map_err(|err| {
        SolverError::Wait(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("solver output not closed: {err}"),
        ))
    })
}

/// Wait for the child to exit, or return `None` once `timeout` is elapsed.
fn wait_until(
    child: &mut Child,
    timeout: Duration,
) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now().checked_add(timeout);
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        let delay = match deadline {
            Some(deadline) if now >= deadline => return Ok(None),
            Some(deadline) => params::poll_interval().min(deadline - now),
            None => params::poll_interval(),
        };
        thread::sleep(delay);
    }
}

/// Send `signal` to the process group led by `child`.
#[cfg(unix)]
fn signal_group(child: &Child, signal: nix::sys::signal::Signal) {
    use nix::sys::signal::killpg;
    use nix::unistd::Pid;

    let group = Pid::from_raw(child.id() as i32);
    match killpg(group, signal) {
        Ok(()) | Err(nix::errno::Errno::ESRCH) => {}
        Err(err) => {
            tracing::debug!("unable to signal process group {group}: {err}")
        }
    }
}

/// Kill the child and everything it started.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    signal_group(child, nix::sys::signal::Signal::SIGTERM);
    if let Err(err) = child.kill() {
        tracing::debug!("unable to kill solver: {err}");
    }
    if let Err(err) = child.wait() {
        tracing::warn!("unable to reap solver process: {err}");
    }
}
