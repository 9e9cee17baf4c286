//! Paging policy: whether to page, and through which backend.
//!
//! Nothing here touches the process environment directly. Environment
//! variables are read from an [`Environment`] snapshot and the line pager's
//! defaults are applied to a copy, which the caller hands to the child
//! process.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Program looked up on `PATH` when paging is `auto`
pub const DEFAULT_PAGER: &str = "less";

/// Raw colors, quit if the output fits on one screen
pub const LESS_FLAGS: &str = "-RF";
/// As [`LESS_FLAGS`], but keep the content on screen after exit
pub const LESS_FLAGS_LEAVE_ON_EXIT: &str = "-RFX";

/// User preference for paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PagerMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Which pager presents the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PagerBackend {
    /// External line pager (`less`)
    #[default]
    Less,
    /// Built-in full-screen viewer
    Tui,
}

/// Immutable snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Snapshot the current process environment. Non-UTF-8 entries are skipped.
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Return a copy with `key` set to `value` unless `key` is already present.
    pub fn with_default(&self, key: &str, value: impl Into<String>) -> Self {
        let mut vars = self.vars.clone();
        vars.entry(key.to_string()).or_insert_with(|| value.into());
        Self { vars }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Startup configuration for the external line pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessSetup {
    pub flags: &'static str,
    /// Environment for the pager process, defaults applied
    pub env: Environment,
}

impl LessSetup {
    pub fn new(env: &Environment, leave_on_exit: bool) -> Self {
        let flags = if leave_on_exit {
            LESS_FLAGS_LEAVE_ON_EXIT
        } else {
            LESS_FLAGS
        };

        let env = env
            .with_default("LESS", flags)
            .with_default("LESSCHARSET", "utf-8")
            .with_default("PAGER", format!("{DEFAULT_PAGER} {flags}"));

        Self { flags, env }
    }

    /// The pager command line, `PAGER` or `less <flags>` when that is blank.
    pub fn command_line(&self) -> String {
        match self.env.get("PAGER").map(str::trim) {
            Some(line) if !line.is_empty() => line.to_string(),
            _ => format!("{DEFAULT_PAGER} {}", self.flags),
        }
    }

    /// Program and arguments that run the command line through the shell,
    /// so quoting in `PAGER` is honored.
    pub fn command(&self) -> (String, Vec<String>) {
        let (shell, flag) = if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") };
        (shell.to_string(), vec![flag.to_string(), self.command_line()])
    }
}

/// How the rendered document reaches the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagingDecision {
    NoPaging,
    Less(LessSetup),
    Viewer,
}

/// Paging-related user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PagerOptions {
    pub mode: PagerMode,
    pub backend: PagerBackend,
    pub leave_on_exit: bool,
}

/// Runtime facts the policy depends on.
pub trait Host {
    fn stdout_is_terminal(&self) -> bool;
    fn find_program(&self, name: &str) -> Result<Option<PathBuf>>;
}

/// Host backed by the real stdout and a `which` lookup over the snapshot's `PATH`.
pub struct SystemHost<'a> {
    env: &'a Environment,
}

impl<'a> SystemHost<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }
}

impl Host for SystemHost<'_> {
    fn stdout_is_terminal(&self) -> bool {
        use std::io::IsTerminal;
        std::io::stdout().is_terminal()
    }

    fn find_program(&self, name: &str) -> Result<Option<PathBuf>> {
        let Some(path) = self.env.get("PATH") else {
            bail!("PATH is not set");
        };
        let cwd = std::env::current_dir().context("Failed to read current directory")?;

        match which::which_in(name, Some(path), cwd) {
            Ok(found) => Ok(Some(found)),
            Err(which::Error::CannotFindBinaryPath) => Ok(None),
            Err(err) => Err(err).with_context(|| format!("Failed to look up '{name}'")),
        }
    }
}

/// Whether output should be paged at all.
pub fn should_page(mode: PagerMode, host: &dyn Host) -> bool {
    match mode {
        PagerMode::Always => true,
        PagerMode::Never => false,
        PagerMode::Auto => {
            if !host.stdout_is_terminal() {
                return false;
            }
            match host.find_program(DEFAULT_PAGER) {
                Ok(found) => {
                    log::debug!("pager discovery: {DEFAULT_PAGER} -> {found:?}");
                    found.is_some()
                }
                Err(err) => {
                    log::debug!("pager discovery failed, not paging: {err:#}");
                    false
                }
            }
        }
    }
}

/// Decide whether and how to page.
pub fn decide(options: &PagerOptions, host: &dyn Host, env: &Environment) -> PagingDecision {
    let decision = if !should_page(options.mode, host) {
        PagingDecision::NoPaging
    } else {
        match options.backend {
            PagerBackend::Less => PagingDecision::Less(LessSetup::new(env, options.leave_on_exit)),
            PagerBackend::Tui => PagingDecision::Viewer,
        }
    };

    log::debug!("paging decision for {:?}: {:?}", options, decision);
    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeHost {
        terminal: bool,
        pager: std::result::Result<bool, &'static str>,
    }

    impl Host for FakeHost {
        fn stdout_is_terminal(&self) -> bool {
            self.terminal
        }

        fn find_program(&self, _name: &str) -> Result<Option<PathBuf>> {
            match self.pager {
                Ok(true) => Ok(Some(PathBuf::from("/usr/bin/less"))),
                Ok(false) => Ok(None),
                Err(msg) => bail!(msg),
            }
        }
    }

    fn all_hosts() -> Vec<FakeHost> {
        let mut hosts = Vec::new();
        for terminal in [true, false] {
            for pager in [Ok(true), Ok(false), Err("lookup failed")] {
                hosts.push(FakeHost { terminal, pager });
            }
        }
        hosts
    }

    #[test]
    fn never_never_pages() {
        for host in all_hosts() {
            assert!(!should_page(PagerMode::Never, &host));
        }
    }

    #[test]
    fn always_always_pages() {
        for host in all_hosts() {
            assert!(should_page(PagerMode::Always, &host));
        }
    }

    #[test]
    fn auto_needs_terminal_and_pager() {
        for host in all_hosts() {
            let expected = host.terminal && host.pager == Ok(true);
            assert_eq!(should_page(PagerMode::Auto, &host), expected);
        }
    }

    #[test]
    fn auto_discovery_error_degrades_to_no_paging() {
        let host = FakeHost {
            terminal: true,
            pager: Err("which failed"),
        };
        assert!(!should_page(PagerMode::Auto, &host));
    }

    #[test]
    fn decide_picks_backend() {
        let host = FakeHost {
            terminal: true,
            pager: Ok(true),
        };
        let env = Environment::default();

        let less = decide(
            &PagerOptions {
                mode: PagerMode::Always,
                backend: PagerBackend::Less,
                leave_on_exit: false,
            },
            &host,
            &env,
        );
        assert!(matches!(less, PagingDecision::Less(ref setup) if setup.flags == "-RF"));

        let viewer = decide(
            &PagerOptions {
                mode: PagerMode::Always,
                backend: PagerBackend::Tui,
                leave_on_exit: true,
            },
            &host,
            &env,
        );
        assert_eq!(viewer, PagingDecision::Viewer);

        let none = decide(
            &PagerOptions {
                mode: PagerMode::Never,
                ..PagerOptions::default()
            },
            &host,
            &env,
        );
        assert_eq!(none, PagingDecision::NoPaging);
    }

    #[test]
    fn less_defaults_fill_missing_vars() {
        let setup = LessSetup::new(&Environment::default(), false);
        assert_eq!(setup.env.get("LESS"), Some("-RF"));
        assert_eq!(setup.env.get("LESSCHARSET"), Some("utf-8"));
        assert_eq!(setup.env.get("PAGER"), Some("less -RF"));
        assert_eq!(setup.command_line(), "less -RF");
    }

    #[test]
    fn leave_on_exit_switches_flags() {
        let setup = LessSetup::new(&Environment::default(), true);
        assert_eq!(setup.flags, "-RFX");
        assert_eq!(setup.env.get("LESS"), Some("-RFX"));
        assert_eq!(setup.env.get("PAGER"), Some("less -RFX"));
    }

    #[test]
    fn less_defaults_never_overwrite() {
        let env: Environment = [
            ("LESS", "-S"),
            ("LESSCHARSET", "latin1"),
            ("PAGER", "most -s"),
        ]
        .into_iter()
        .collect();

        let setup = LessSetup::new(&env, true);
        assert_eq!(setup.env.get("LESS"), Some("-S"));
        assert_eq!(setup.env.get("LESSCHARSET"), Some("latin1"));
        assert_eq!(setup.command_line(), "most -s");
        // The input snapshot is untouched
        assert_eq!(env.get("LESS"), Some("-S"));
    }

    #[test]
    fn with_default_does_not_mutate_original() {
        let env = Environment::default();
        let updated = env.with_default("LESS", "-R");
        assert_eq!(env.get("LESS"), None);
        assert_eq!(updated.get("LESS"), Some("-R"));
    }

    #[test]
    fn blank_pager_falls_back_to_less() {
        let env: Environment = [("PAGER", "  ")].into_iter().collect();
        let setup = LessSetup::new(&env, false);
        assert_eq!(setup.command_line(), "less -RF");
    }

    #[cfg(unix)]
    #[test]
    fn quoted_pager_arguments_reach_the_shell_intact() {
        let env: Environment = [("PAGER", "less -R --prompt='page %d'")].into_iter().collect();
        let setup = LessSetup::new(&env, false);
        assert_eq!(
            setup.command(),
            (
                "sh".to_string(),
                vec!["-c".to_string(), "less -R --prompt='page %d'".to_string()]
            )
        );
    }

    #[cfg(unix)]
    #[test]
    fn system_host_finds_executables_on_snapshot_path() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let exe = dir.path().join("less");
        std::fs::write(&exe, "#!/bin/sh\n")?;
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755))?;

        let env: Environment = [("PATH", dir.path().to_string_lossy().into_owned())]
            .into_iter()
            .collect();
        let host = SystemHost::new(&env);
        assert_eq!(host.find_program("less")?, Some(exe));
        assert_eq!(host.find_program("more")?, None);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn system_host_skips_non_executable_files() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let file = dir.path().join("less");
        std::fs::write(&file, "#!/bin/sh\n")?;
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644))?;

        let env: Environment = [("PATH", dir.path().to_string_lossy().into_owned())]
            .into_iter()
            .collect();
        assert_eq!(SystemHost::new(&env).find_program("less")?, None);
        Ok(())
    }

    #[test]
    fn system_host_without_path_errors() {
        let env = Environment::default();
        let host = SystemHost::new(&env);
        assert!(host.find_program("less").is_err());
    }
}
