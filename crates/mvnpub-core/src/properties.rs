use std::collections::BTreeMap;
use std::path::Path;

use mvnpub_util::errors::{MvnpubError, MvnpubResult};

/// Loads a `.mvnpub.env` file (shell-style `KEY=value` format).
///
/// `.mvnpub.env` holds repository credentials and proxy passwords so they
/// stay out of `publish.toml`. Values are available via `${env:VAR}`
/// interpolation. Surrounding single or double quotes are stripped.
pub fn load_env_file(path: &Path) -> MvnpubResult<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    if !path.is_file() {
        return Ok(map);
    }
    let content = std::fs::read_to_string(path).map_err(MvnpubError::Io)?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        if let Some((key, value)) = trimmed.split_once('=') {
            map.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        }
    }
    Ok(map)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Interpolate `${env:VAR}` references in a string.
///
/// Looks up values first from `env_overrides` (populated from `.mvnpub.env`),
/// then from the process environment. Unknown variables expand to the empty
/// string and are reported at `warn`.
pub fn interpolate(input: &str, env_overrides: &BTreeMap<String, String>) -> String {
    let mut result = input.to_string();
    let mut cursor = 0;
    while let Some(offset) = result[cursor..].find("${env:") {
        let start = cursor + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let end = start + end;
        let key = result[start + 6..end].to_string();
        let value = env_overrides
            .get(&key)
            .cloned()
            .or_else(|| std::env::var(&key).ok())
            .unwrap_or_else(|| {
                tracing::warn!("Environment variable {key} is not set, using an empty value");
                String::new()
            });
        result.replace_range(start..=end, &value);
        cursor = start + value.len();
    }
    result
}
