//! Opens an external terminal running the coding-agent CLI in a working
//! directory. Command construction is pure; only [`launch`] touches the OS.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io;
use std::process::{Command, Stdio};
use std::str::FromStr;

use crate::settings::{
    dimension_from_json, SplitDirection, WindowMode, DEFAULT_WINDOW_HEIGHT,
    DEFAULT_WINDOW_WIDTH, WINDOW_HEIGHT_RANGE, WINDOW_WIDTH_RANGE,
};

const AGENT_COMMAND: &str = "claude";
const LINUX_TERMINALS: [&str; 3] = ["gnome-terminal", "konsole", "xterm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

/// Launch preferences. Absent wire fields take the settings-store defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalSettings {
    pub window_mode: WindowMode,
    pub show_split: bool,
    pub split_direction: SplitDirection,
    pub window_width: i64,
    pub window_height: i64,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            window_mode: WindowMode::Window,
            show_split: true,
            split_direction: SplitDirection::Vertical,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Loosely-typed settings as the renderer sends them. Every field is read
/// leniently: wrong types, unknown values and non-positive sizes fall back
/// per field, and sizes are clamped to the settings ranges.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TerminalSettingsInput {
    pub window_mode: Option<Value>,
    pub show_split: Option<Value>,
    pub split_direction: Option<Value>,
    pub window_width: Option<Value>,
    pub window_height: Option<Value>,
}

fn parsed<T: FromStr>(value: &Option<Value>) -> Option<T> {
    value.as_ref()?.as_str()?.parse().ok()
}

fn dimension(value: &Option<Value>, fallback: i64, (min, max): (i64, i64)) -> i64 {
    value
        .as_ref()
        .and_then(dimension_from_json)
        .filter(|v| *v > 0)
        .unwrap_or(fallback)
        .clamp(min, max)
}

impl TerminalSettingsInput {
    pub fn resolve(&self, base: &TerminalSettings) -> TerminalSettings {
        TerminalSettings {
            window_mode: parsed(&self.window_mode).unwrap_or(base.window_mode),
            show_split: self
                .show_split
                .as_ref()
                .and_then(Value::as_bool)
                .unwrap_or(base.show_split),
            split_direction: parsed(&self.split_direction).unwrap_or(base.split_direction),
            window_width: dimension(&self.window_width, base.window_width, WINDOW_WIDTH_RANGE),
            window_height: dimension(&self.window_height, base.window_height, WINDOW_HEIGHT_RANGE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalType {
    #[default]
    Terminal,
    Iterm,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    #[serde(default)]
    pub file_path: Option<String>,
    pub cwd: String,
    #[serde(default)]
    pub terminal_type: Option<Value>,
    #[serde(default)]
    pub terminal_settings: Option<TerminalSettingsInput>,
}

impl LaunchRequest {
    /// Only `iterm` selects iTerm2; anything else means Terminal.app.
    pub fn terminal_type(&self) -> TerminalType {
        match self.terminal_type.as_ref().and_then(Value::as_str) {
            Some("iterm") => TerminalType::Iterm,
            _ => TerminalType::Terminal,
        }
    }

    fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LaunchOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// One program invocation to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// POSIX single-quoting: nothing inside is expanded by the shell.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Body of an AppleScript string literal.
fn applescript_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn shell_agent_command(file_path: Option<&str>) -> String {
    match file_path {
        Some(path) => format!("{AGENT_COMMAND} {}", shell_quote(path)),
        None => AGENT_COMMAND.to_string(),
    }
}

fn iterm_split(cwd: &str, direction: SplitDirection) -> String {
    let split = match direction {
        SplitDirection::Vertical => "split vertically",
        SplitDirection::Horizontal => "split horizontally",
    };
    let listing = applescript_escape(&format!("cd {} && ls -la", shell_quote(cwd)));
    format!(
        "\n        tell ({split} with default profile)\n          write text \"{listing}\"\n        end tell"
    )
}

/// AppleScript for Terminal.app or iTerm2. Paths are shell-quoted, then the
/// whole command is escaped into an AppleScript string literal.
pub fn applescript(
    terminal: TerminalType,
    cwd: &str,
    file_path: Option<&str>,
    settings: &TerminalSettings,
) -> String {
    let shell = format!("cd {} && {}", shell_quote(cwd), shell_agent_command(file_path));
    let shell = applescript_escape(&shell);

    if terminal == TerminalType::Terminal {
        return format!(
            "tell application \"Terminal\"\n  activate\n  do script \"{shell}\"\nend tell"
        );
    }

    let run = format!("write text \"{shell}\"");
    let split = if settings.show_split {
        iterm_split(cwd, settings.split_direction)
    } else {
        String::new()
    };

    match settings.window_mode {
        WindowMode::Tab => format!(
            "tell application \"iTerm\"\n  activate\n  tell current window\n    create tab with default profile\n    tell current session\n      {run}{split}\n    end tell\n  end tell\nend tell"
        ),
        WindowMode::Window => {
            let right = settings.window_width.saturating_add(100);
            let bottom = settings.window_height.saturating_add(100);
            format!(
                "tell application \"iTerm\"\n  activate\n  create window with default profile\n  tell current window\n    set bounds to {{100, 100, {right}, {bottom}}}\n    tell current session\n      {run}{split}\n    end tell\n  end tell\nend tell"
            )
        }
    }
}

/// Characters cmd.exe treats specially even inside double quotes.
const CMD_UNSAFE: [char; 7] = ['"', '&', '|', '^', '%', '<', '>'];

fn cmd_safe(value: &str, what: &str) -> Result<(), String> {
    match value.chars().find(|c| CMD_UNSAFE.contains(c) || c.is_control()) {
        Some(c) => Err(format!("{what} contains a character cmd.exe cannot pass safely: {c:?}")),
        None => Ok(()),
    }
}

/// Candidate invocations in preference order; the first that spawns wins.
/// Fails only when a path cannot be passed to the platform shell safely.
pub fn build_commands(
    platform: Platform,
    request: &LaunchRequest,
    settings: &TerminalSettings,
) -> Result<Vec<LaunchCommand>, String> {
    let file_path = request.file_path();
    let cwd = request.cwd.as_str();

    match platform {
        Platform::MacOs => {
            let script = applescript(request.terminal_type(), cwd, file_path, settings);
            Ok(vec![LaunchCommand::new("osascript", &["-e", &script])])
        }
        Platform::Windows => {
            cmd_safe(cwd, "Working directory")?;
            let cmd = match file_path {
                Some(path) => {
                    cmd_safe(path, "File path")?;
                    format!("{AGENT_COMMAND} \"{path}\"")
                }
                None => AGENT_COMMAND.to_string(),
            };
            let inner = format!("cd /d \"{cwd}\" && {cmd}");
            Ok(vec![LaunchCommand::new(
                "cmd.exe",
                &["/c", "start", "cmd.exe", "/k", &inner],
            )])
        }
        Platform::Linux => {
            // Paths travel as positional parameters, never as script text.
            let script = match file_path {
                Some(_) => format!("cd \"$1\" && {AGENT_COMMAND} \"$2\"; exec bash"),
                None => format!("cd \"$1\" && {AGENT_COMMAND}; exec bash"),
            };
            let mut script_args = vec!["bash", "-c", script.as_str(), "bash", cwd];
            script_args.extend(file_path);
            Ok(LINUX_TERMINALS
                .iter()
                .map(|term| {
                    let flag = if *term == "gnome-terminal" { "--" } else { "-e" };
                    let mut args = vec![flag];
                    args.extend(&script_args);
                    LaunchCommand::new(term, &args)
                })
                .collect())
        }
    }
}

fn spawn_detached(command: &LaunchCommand) -> io::Result<()> {
    let mut child = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    // Reap the launcher so it does not linger as a zombie.
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}

/// Spawns the first candidate that starts. Failures are reported in the
/// outcome rather than as errors.
pub fn launch(request: &LaunchRequest, settings: &TerminalSettings) -> LaunchOutcome {
    let platform = Platform::current();
    info!(
        "Launching agent in external terminal ({:?}, {:?}) at {}",
        platform,
        request.terminal_type(),
        request.cwd
    );

    let commands = match build_commands(platform, request, settings) {
        Ok(commands) => commands,
        Err(message) => {
            warn!("Refusing terminal launch: {}", message);
            return LaunchOutcome::failed(message);
        }
    };

    let mut last_error = None;
    for command in commands {
        debug!("Trying terminal command: {} {:?}", command.program, command.args);
        match spawn_detached(&command) {
            Ok(()) => return LaunchOutcome::ok(),
            Err(e) => {
                warn!("Failed to spawn '{}': {}", command.program, e);
                last_error = Some(e);
            }
        }
    }

    match (platform, last_error) {
        (Platform::Linux, _) => LaunchOutcome::failed("No suitable terminal emulator found"),
        (_, Some(e)) => LaunchOutcome::failed(e.to_string()),
        (_, None) => LaunchOutcome::failed("No terminal command available"),
    }
}
