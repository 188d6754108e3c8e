use mvnpub_core::properties::{interpolate, load_env_file};
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn load_env_file_with_comments_quotes_and_export() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(
        tmp,
        "# credentials\n\
         REPO_USER=deployer\n\
         \n\
         export REPO_PASS='s3cret'\n\
         TOKEN = \"abc def\"\n"
    )
    .unwrap();
    tmp.flush().unwrap();

    let env = load_env_file(tmp.path()).unwrap();
    assert_eq!(env.get("REPO_USER"), Some(&"deployer".to_string()));
    assert_eq!(env.get("REPO_PASS"), Some(&"s3cret".to_string()));
    assert_eq!(env.get("TOKEN"), Some(&"abc def".to_string()));
    assert_eq!(env.len(), 3);
}

#[test]
fn load_env_file_nonexistent_path_returns_empty_map() {
    let path = std::path::Path::new("/nonexistent/path/to/.mvnpub.env");
    let env = load_env_file(path).unwrap();
    assert!(env.is_empty());
}

#[test]
fn interpolate_prefers_overrides() {
    let mut env_overrides = BTreeMap::new();
    env_overrides.insert("REPO_HOST".to_string(), "nexus.local".to_string());

    let result = interpolate("https://${env:REPO_HOST}/releases", &env_overrides);
    assert_eq!(result, "https://nexus.local/releases");
}

#[test]
fn interpolate_unknown_variable_is_empty() {
    let result = interpolate(
        "user=${env:MVNPUB_SURELY_UNSET_VARIABLE}",
        &BTreeMap::new(),
    );
    assert_eq!(result, "user=");
}

#[test]
fn interpolate_does_not_expand_values_twice() {
    let mut env_overrides = BTreeMap::new();
    env_overrides.insert("A".to_string(), "${env:B}".to_string());
    env_overrides.insert("B".to_string(), "nope".to_string());

    assert_eq!(interpolate("${env:A}", &env_overrides), "${env:B}");
}

#[test]
fn interpolate_unterminated_reference_is_left_alone() {
    assert_eq!(
        interpolate("x=${env:OPEN", &BTreeMap::new()),
        "x=${env:OPEN"
    );
}
