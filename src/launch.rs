use std::process::{Command, Stdio};

use crate::editors::find_in_path;

/// Terminal emulators probed by the "open a terminal here" action, in
/// preference order, each with its working-directory flag where it has one.
/// Emulators without a flag are started with the target as their cwd.
const TERMINALS: &[(&str, Option<&str>)] = &[
    ("konsole", Some("--workdir")),
    ("gnome-terminal", Some("--working-directory")),
    ("xfce4-terminal", Some("--working-directory")),
    ("x-terminal-emulator", None),
    ("kitty", None),
    ("alacritty", None),
];

/// Spawn `<command> <path>` detached from this session; the launcher never
/// waits for the editor.
pub fn launch_editor(command: &str, path: &str) -> anyhow::Result<()> {
    let mut cmd = Command::new(command);
    cmd.arg(path);
    spawn_detached(cmd)
}

/// Open a terminal in `path` using the first emulator found on PATH, handing
/// the path to the generic system opener when none is installed.
pub fn open_terminal(path: &str) -> anyhow::Result<()> {
    for (terminal, workdir_flag) in TERMINALS {
        if find_in_path(terminal).is_none() {
            continue;
        }
        let mut cmd = Command::new(terminal);
        match workdir_flag {
            Some(flag) => {
                cmd.arg(flag).arg(path);
            }
            None => {
                cmd.current_dir(path);
            }
        }
        return spawn_detached(cmd);
    }
    open::that(path)?;
    Ok(())
}

fn spawn_detached(mut cmd: Command) -> anyhow::Result<()> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // Own process group, so closing the launcher's terminal does not
        // take the editor down with it.
        cmd.process_group(0);
    }
    cmd.spawn()?;
    Ok(())
}
