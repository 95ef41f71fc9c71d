//! Open a written file with the OS default application.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Failed to launch viewer {program:?}: {source}")]
    Launch {
        program: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Viewer {program:?} exited with {status}")]
    Exit {
        program: &'static str,
        status: ExitStatus,
    },
}

const TUP_ARGS_WINDOWS: &[&str] = &["/C", "start", ""];
const TUP_ARGS_NONE: &[&str] = &[];

/// Program and leading arguments of the platform's "open" command.
fn derive_viewer_command() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "windows") {
        ("cmd", TUP_ARGS_WINDOWS)
    } else if cfg!(target_os = "macos") {
        ("open", TUP_ARGS_NONE)
    } else {
        ("xdg-open", TUP_ARGS_NONE)
    }
}

/// Open `path` in the default viewer and wait for the launcher to return.
pub fn open_in_default_viewer(path: &Path) -> Result<(), ViewerError> {
    let (program, l_args) = derive_viewer_command();
    debug!("Opening {} with {program}", path.display());

    let status = Command::new(program)
        .args(l_args)
        .arg(path)
        .status()
        .map_err(|source| ViewerError::Launch { program, source })?;
    if !status.success() {
        return Err(ViewerError::Exit { program, status });
    }
    Ok(())
}
