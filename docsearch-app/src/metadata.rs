//! Command metadata, as the plugin registration used to advertise it.

use std::collections::BTreeMap;
use std::io::Write;

use docsearch_common::FormatError;
use serde::Serialize;

use crate::cli::{COMMAND_ALIAS, COMMAND_NAME, OPTIONS_HELP};

const PLUGIN_NAME: &str = "CloudGovDocSearchPlugin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionType {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Usage {
    pub usage: String,
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandMetadata {
    pub name: String,
    pub alias: String,
    pub help_text: String,
    pub usage_details: Usage,
}

#[derive(Debug, Clone, Serialize)]
pub struct PluginMetadata {
    pub name: String,
    pub version: VersionType,
    pub min_cli_version: VersionType,
    pub commands: Vec<CommandMetadata>,
}

fn crate_version() -> VersionType {
    let part = |s: &str| -> u32 { s.parse().unwrap_or(0) };
    VersionType {
        major: part(env!("CARGO_PKG_VERSION_MAJOR")),
        minor: part(env!("CARGO_PKG_VERSION_MINOR")),
        build: part(env!("CARGO_PKG_VERSION_PATCH")),
    }
}

pub fn plugin_metadata() -> PluginMetadata {
    let options = BTreeMap::from([
        (
            "format".to_string(),
            "Output format <human|json>, default human".to_string(),
        ),
        (
            "url".to_string(),
            "Search endpoint the term is appended to".to_string(),
        ),
    ]);

    PluginMetadata {
        name: PLUGIN_NAME.to_string(),
        version: crate_version(),
        min_cli_version: VersionType {
            major: 6,
            minor: 7,
            build: 0,
        },
        commands: vec![CommandMetadata {
            name: COMMAND_NAME.to_string(),
            alias: COMMAND_ALIAS.to_string(),
            help_text: "Search cloud.gov documentation for search-term".to_string(),
            usage_details: Usage {
                usage: format!("docsearch {COMMAND_NAME} {OPTIONS_HELP}"),
                options,
            },
        }],
    }
}

/// One JSON line on `out`.
pub fn print_metadata<W: Write>(out: &mut W) -> Result<(), FormatError> {
    let js = serde_json::to_string(&plugin_metadata())
        .map_err(|e| FormatError::Serialize(e.to_string()))?;
    writeln!(out, "{js}").map_err(|e| FormatError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_follows_the_package() {
        let meta = plugin_metadata();
        assert_eq!(
            meta.version,
            VersionType {
                major: 1,
                minor: 0,
                build: 0
            }
        );
        assert_eq!(meta.min_cli_version.major, 6);
        assert_eq!(meta.min_cli_version.minor, 7);
    }

    #[test]
    fn printed_as_single_json_line() {
        let mut out = Vec::new();
        print_metadata(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);

        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["name"], "CloudGovDocSearchPlugin");
        assert_eq!(v["commands"][0]["name"], "cloud-gov-doc-search");
        assert_eq!(v["commands"][0]["alias"], "cgds");
        assert_eq!(
            v["commands"][0]["usage_details"]["usage"],
            "docsearch cloud-gov-doc-search [-format <human|json>] [-url <uri>] <search-term>"
        );
    }
}
