//! Opening a URL with the host's default handler.
//!
//! The platform identifier (`std::env::consts::OS`) selects an argv prefix
//! from a [`LaunchTable`]; the URL is appended as the final argument.

use std::collections::BTreeMap;
use std::process::Command;

use docsearch_common::LaunchError;

/// Something that can open a URL. The selector only talks to this trait.
pub trait UrlOpener {
    fn open(&self, url: &str) -> Result<(), LaunchError>;
}

/// Platform identifier -> command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTable {
    commands: BTreeMap<String, Vec<String>>,
}

impl Default for LaunchTable {
    fn default() -> Self {
        let commands = [
            ("windows", vec!["cmd", "/c", "start"]),
            ("macos", vec!["open"]),
            ("linux", vec!["xdg-open"]),
        ]
        .into_iter()
        .map(|(os, argv)| {
            (
                os.to_string(),
                argv.into_iter().map(str::to_string).collect(),
            )
        })
        .collect();
        Self { commands }
    }
}

impl LaunchTable {
    /// Replace or add entries; later entries win.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        self.commands.extend(overrides);
        self
    }

    /// Full argv for opening `url` on `platform`.
    pub fn command_for(&self, platform: &str, url: &str) -> Result<Vec<String>, LaunchError> {
        let template = self
            .commands
            .get(platform)
            .ok_or_else(|| LaunchError::UnsupportedPlatform(platform.to_string()))?;
        if template.is_empty() {
            return Err(LaunchError::EmptyCommand(platform.to_string()));
        }
        let mut argv = template.clone();
        argv.push(url.to_string());
        Ok(argv)
    }
}

/// Spawns the platform command and waits for it.
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    table: LaunchTable,
    platform: String,
}

impl SystemLauncher {
    pub fn new(table: LaunchTable) -> Self {
        Self::for_platform(table, std::env::consts::OS)
    }

    pub fn for_platform(table: LaunchTable, platform: impl Into<String>) -> Self {
        Self {
            table,
            platform: platform.into(),
        }
    }
}

impl UrlOpener for SystemLauncher {
    fn open(&self, url: &str) -> Result<(), LaunchError> {
        let argv = self.table.command_for(&self.platform, url)?;
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| LaunchError::EmptyCommand(self.platform.clone()))?;

        tracing::info!(platform = %self.platform, %program, ?args, "launch.spawn");
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| LaunchError::Spawn {
                program: program.clone(),
                message: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            tracing::warn!(%program, code = ?status.code(), "launch.failed");
            Err(LaunchError::ExitStatus {
                program: program.clone(),
                code: status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_covers_three_platforms() {
        let table = LaunchTable::default();
        assert_eq!(
            table.command_for("linux", "https://docs.example").unwrap(),
            vec!["xdg-open", "https://docs.example"]
        );
        assert_eq!(
            table.command_for("macos", "https://docs.example").unwrap(),
            vec!["open", "https://docs.example"]
        );
        assert_eq!(
            table.command_for("windows", "https://docs.example").unwrap(),
            vec!["cmd", "/c", "start", "https://docs.example"]
        );
    }

    #[test]
    fn unknown_platform_is_a_typed_error() {
        let err = LaunchTable::default()
            .command_for("plan9", "https://docs.example")
            .unwrap_err();
        assert!(matches!(err, LaunchError::UnsupportedPlatform(ref p) if p == "plan9"));
        // Exact match only.
        assert!(LaunchTable::default().command_for("Linux", "u").is_err());
    }

    #[test]
    fn overrides_replace_and_extend() {
        let table = LaunchTable::default().with_overrides([
            ("linux".to_string(), vec!["firefox".to_string(), "--new-tab".to_string()]),
            ("freebsd".to_string(), vec!["xdg-open".to_string()]),
            ("haiku".to_string(), vec![]),
        ]);
        assert_eq!(
            table.command_for("linux", "u").unwrap(),
            vec!["firefox", "--new-tab", "u"]
        );
        assert_eq!(table.command_for("freebsd", "u").unwrap(), vec!["xdg-open", "u"]);
        assert!(matches!(
            table.command_for("haiku", "u"),
            Err(LaunchError::EmptyCommand(_))
        ));
    }

    #[test]
    fn unsupported_platform_never_spawns() {
        let launcher = SystemLauncher::for_platform(LaunchTable::default(), "plan9");
        assert!(matches!(
            launcher.open("https://docs.example"),
            Err(LaunchError::UnsupportedPlatform(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn successful_command_opens() {
        let table = LaunchTable::default()
            .with_overrides([("test".to_string(), vec!["true".to_string()])]);
        let launcher = SystemLauncher::for_platform(table, "test");
        launcher.open("https://docs.example").unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_reports_exit_status() {
        let table = LaunchTable::default()
            .with_overrides([("test".to_string(), vec!["false".to_string()])]);
        let launcher = SystemLauncher::for_platform(table, "test");
        let err = launcher.open("https://docs.example").unwrap_err();
        assert!(matches!(err, LaunchError::ExitStatus { code: Some(1), .. }));
    }

    #[test]
    fn missing_program_reports_spawn_failure() {
        let table = LaunchTable::default().with_overrides([(
            "test".to_string(),
            vec!["docsearch-no-such-opener".to_string()],
        )]);
        let launcher = SystemLauncher::for_platform(table, "test");
        let err = launcher.open("https://docs.example").unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { ref program, .. } if program == "docsearch-no-such-opener"));
    }
}
