//! Mount specification parsing.
//!
//! A mount string is the engine-facing `--mount` value: comma-separated
//! `key=value` pairs such as `type=bind,source=/a,target=/b`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by [`parse_mount`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MountParseError {
    #[error("Unhandled mount option '{0}'")]
    UnhandledOption(String),

    #[error("Mount option '{0}' requires a value")]
    MissingValue(String),
}

/// A parsed mount specification.
///
/// Fields absent from the input are empty strings. Read-only flags are
/// accepted by the parser but not represented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountSpec {
    #[serde(rename = "type")]
    pub mount_type: String,
    pub source: String,
    pub target: String,
}

impl MountSpec {
    pub fn is_bind(&self) -> bool {
        self.mount_type == "bind"
    }
}

impl FromStr for MountSpec {
    type Err = MountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_mount(s)
    }
}

impl fmt::Display for MountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type={},source={},target={}",
            self.mount_type, self.source, self.target
        )
    }
}

/// Parse a mount string.
///
/// Keys are matched case-sensitively. The value of a segment is the text
/// between its first and second `=`. Any unrecognised key fails the whole
/// parse; so does a value-bearing key written without `=`.
pub fn parse_mount(mount: &str) -> Result<MountSpec, MountParseError> {
    let mut spec = MountSpec::default();

    for segment in mount.split(',') {
        let mut parts = segment.split('=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next();

        let field = match key {
            "type" => &mut spec.mount_type,
            "src" | "source" => &mut spec.source,
            "dst" | "destination" | "target" => &mut spec.target,
            "readonly" | "ro" => continue,
            other => return Err(MountParseError::UnhandledOption(other.to_string())),
        };

        *field = value
            .ok_or_else(|| MountParseError::MissingValue(key.to_string()))?
            .to_string();
    }

    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_mount() {
        let mount = parse_mount("type=bind,source=/a,target=/b").unwrap();
        assert_eq!(
            mount,
            MountSpec {
                mount_type: "bind".to_string(),
                source: "/a".to_string(),
                target: "/b".to_string(),
            }
        );
        assert!(mount.is_bind());
    }

    #[test]
    fn test_parse_without_type() {
        let mount = parse_mount("src=home-cache,target=/home/vscode/.cache").unwrap();
        assert_eq!(mount.mount_type, "");
        assert_eq!(mount.source, "home-cache");
        assert_eq!(mount.target, "/home/vscode/.cache");
        assert!(!mount.is_bind());
    }

    #[test]
    fn test_key_aliases() {
        let short = parse_mount("type=volume,src=v,dst=/d").unwrap();
        let long = parse_mount("type=volume,source=v,destination=/d").unwrap();
        let target = parse_mount("type=volume,source=v,target=/d").unwrap();
        assert_eq!(short, long);
        assert_eq!(long, target);
    }

    #[test]
    fn test_unknown_option_fails() {
        assert_eq!(
            parse_mount("type=bind,unknown=x"),
            Err(MountParseError::UnhandledOption("unknown".to_string()))
        );
    }

    #[test]
    fn test_unknown_option_stops_at_first_offender() {
        assert_eq!(
            parse_mount("bogus=1,consistency=cached"),
            Err(MountParseError::UnhandledOption("bogus".to_string()))
        );
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        assert_eq!(
            parse_mount("Type=bind"),
            Err(MountParseError::UnhandledOption("Type".to_string()))
        );
    }

    #[test]
    fn test_key_order_does_not_matter() {
        assert_eq!(
            parse_mount("target=/b,source=/a").unwrap(),
            parse_mount("source=/a,target=/b").unwrap()
        );
    }

    #[test]
    fn test_readonly_has_no_effect() {
        let plain = parse_mount("type=bind,source=/a,target=/b").unwrap();
        for variant in [
            "type=bind,readonly,source=/a,target=/b",
            "type=bind,source=/a,target=/b,ro",
            "ro=true,type=bind,source=/a,target=/b",
            "type=bind,source=/a,readonly=1,target=/b",
        ] {
            assert_eq!(parse_mount(variant).unwrap(), plain, "variant: {}", variant);
        }
    }

    #[test]
    fn test_value_bearing_key_without_value() {
        assert_eq!(
            parse_mount("type=bind,source"),
            Err(MountParseError::MissingValue("source".to_string()))
        );
    }

    #[test]
    fn test_explicit_empty_value() {
        let mount = parse_mount("type=bind,source=,target=/b").unwrap();
        assert_eq!(mount.source, "");
    }

    #[test]
    fn test_value_is_second_token() {
        let mount = parse_mount("source=a=b,target=/t").unwrap();
        assert_eq!(mount.source, "a");
    }

    #[test]
    fn test_empty_string_is_rejected() {
        assert_eq!(
            parse_mount(""),
            Err(MountParseError::UnhandledOption(String::new()))
        );
    }

    #[test]
    fn test_from_str_and_display() {
        let mount: MountSpec = "dst=/t,src=/s,type=bind".parse().unwrap();
        assert_eq!(mount.to_string(), "type=bind,source=/s,target=/t");
    }
}
