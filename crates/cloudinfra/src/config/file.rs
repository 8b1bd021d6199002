//! Credentials-file provider.
//!
//! The file is INI-style: one section per profile, each section holding the
//! same keys as the environment variables. The `default` section supplies a
//! fallback base URL for other profiles.
//!
//! ```ini
//! [default]
//! CLOUDINFRA_URL = https://cloudinfra-gw-us.portal.checkpoint.com
//!
//! [staging]
//! CLOUDINFRA_KEY = abc123
//! CLOUDINFRA_SECRET = def456
//! CLOUDINFRA_APP = app/waf
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Error};
use crate::types::GatewayUrl;

use super::{
    Credentials, DEFAULT_APP, DEFAULT_BASE_URL, DEFAULT_CREDENTIALS_FILE, DEFAULT_PROFILE,
    ENV_APP, ENV_CREDENTIALS_FILE, ENV_KEY, ENV_PROFILE, ENV_SECRET, ENV_URL,
};

type Profiles = BTreeMap<String, BTreeMap<String, String>>;

/// Reads credentials for one profile from the shared credentials file.
#[derive(Debug)]
pub struct FileProvider {
    path: PathBuf,
    profile: String,
}

impl FileProvider {
    /// Provider for the ambient profile: `CLOUDINFRA_PROFILE` or `default`,
    /// read from `CLOUDINFRA_SHARED_CREDENTIALS_FILE` or
    /// `~/.cloudinfra/credentials`.
    pub fn new() -> Self {
        let profile =
            std::env::var(ENV_PROFILE).unwrap_or_else(|_| DEFAULT_PROFILE.to_string());
        Self::for_profile(profile)
    }

    /// Provider scoped to a named profile.
    pub fn for_profile(profile: impl Into<String>) -> Self {
        Self {
            path: default_credentials_path(),
            profile: profile.into(),
        }
    }

    /// Provider reading an explicit file, for tests and tooling.
    pub fn with_path(path: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            profile: profile.into(),
        }
    }

    /// Returns the profile this provider resolves.
    pub fn profile(&self) -> &str {
        &self.profile
    }
}

impl Default for FileProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl super::CredentialProvider for FileProvider {
    fn name(&self) -> &'static str {
        "credentials file"
    }

    fn load(&self) -> Result<Option<Credentials>, Error> {
        let file = self.path.display().to_string();
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(ConfigError::Io { file, source: err }.into()),
        };

        let profiles = parse_ini(&content, &file)?;
        let Some(section) = profiles.get(&self.profile) else {
            return Err(ConfigError::ProfileNotFound {
                profile: self.profile.clone(),
                file,
            }
            .into());
        };
        let defaults = profiles.get(DEFAULT_PROFILE);

        let base_url = section
            .get(ENV_URL)
            .or_else(|| defaults.and_then(|s| s.get(ENV_URL)))
            .map_or(DEFAULT_BASE_URL, String::as_str);
        let base_url = GatewayUrl::new(base_url)?;

        let key = section.get(ENV_KEY).cloned();
        let secret = section.get(ENV_SECRET).cloned();
        let app = section
            .get(ENV_APP)
            .cloned()
            .unwrap_or_else(|| DEFAULT_APP.to_string());

        Ok(Some(Credentials::partial(base_url, key, secret, app)))
    }
}

/// List every profile stored in the credentials file, sorted.
///
/// A missing file is an empty list, matching the resolution chain's
/// treatment of it.
pub fn list_profiles() -> Result<Vec<String>, Error> {
    list_profiles_in(&default_credentials_path())
}

/// List every profile stored in the given file, sorted.
pub fn list_profiles_in(path: &Path) -> Result<Vec<String>, Error> {
    let file = path.display().to_string();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(ConfigError::Io { file, source: err }.into()),
    };

    let profiles = parse_ini(&content, &file)?;
    Ok(profiles.into_keys().collect())
}

fn default_credentials_path() -> PathBuf {
    if let Ok(path) = std::env::var(ENV_CREDENTIALS_FILE) {
        return PathBuf::from(path);
    }
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_CREDENTIALS_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE))
}

fn parse_ini(content: &str, file: &str) -> Result<Profiles, Error> {
    let mut profiles = Profiles::new();
    let mut current: Option<String> = None;

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let Some(name) = header.strip_suffix(']') else {
                return Err(parse_error(file, index, "unterminated section header"));
            };
            let name = name.trim().to_string();
            profiles.entry(name.clone()).or_default();
            current = Some(name);
        } else if let Some((key, value)) = line.split_once('=') {
            let Some(section) = &current else {
                return Err(parse_error(file, index, "key outside of a profile section"));
            };
            profiles
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        } else {
            return Err(parse_error(file, index, "expected 'KEY = value'"));
        }
    }

    Ok(profiles)
}

fn parse_error(file: &str, index: usize, reason: &str) -> Error {
    ConfigError::Parse {
        file: file.to_string(),
        line: index + 1,
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use crate::config::CredentialProvider;

    use super::*;

    const SAMPLE: &str = "\
[default]
CLOUDINFRA_URL = https://gw-default.example.com

[staging]
CLOUDINFRA_KEY = staging-key
CLOUDINFRA_SECRET = staging-secret
CLOUDINFRA_APP = app/waf

; full profile, no fallbacks needed
[production]
CLOUDINFRA_URL = https://gw-prod.example.com
CLOUDINFRA_KEY = prod-key
CLOUDINFRA_SECRET = prod-secret
";

    fn sample_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_full_profile() {
        let file = sample_file();
        let provider = FileProvider::with_path(file.path(), "production");

        let credentials = provider.load().unwrap().unwrap();
        assert_eq!(credentials.base_url().as_str(), "https://gw-prod.example.com");
        assert_eq!(credentials.key(), Some("prod-key"));
        assert_eq!(credentials.secret(), Some("prod-secret"));
        assert_eq!(credentials.app(), DEFAULT_APP);
    }

    #[test]
    fn base_url_falls_back_to_the_default_section() {
        let file = sample_file();
        let provider = FileProvider::with_path(file.path(), "staging");

        let credentials = provider.load().unwrap().unwrap();
        assert_eq!(
            credentials.base_url().as_str(),
            "https://gw-default.example.com"
        );
        assert_eq!(credentials.app(), "app/waf");
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let provider = FileProvider::with_path("/nonexistent/credentials", "default");
        assert!(provider.load().unwrap().is_none());
    }

    #[test]
    fn missing_profile_is_an_error() {
        let file = sample_file();
        let provider = FileProvider::with_path(file.path(), "qa");

        let err = provider.load().unwrap_err();
        assert!(err.to_string().contains("qa"));
    }

    #[test]
    fn malformed_line_is_an_error_with_position() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[default]\nno equals sign\n").unwrap();

        let provider = FileProvider::with_path(file.path(), "default");
        let err = provider.load().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn resolving_the_same_profile_twice_is_identical() {
        let file = sample_file();
        let first = FileProvider::with_path(file.path(), "staging")
            .load()
            .unwrap()
            .unwrap();
        let second = FileProvider::with_path(file.path(), "staging")
            .load()
            .unwrap()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn lists_profiles_sorted() {
        let file = sample_file();
        let profiles = list_profiles_in(file.path()).unwrap();
        assert_eq!(profiles, ["default", "production", "staging"]);
    }

    #[test]
    fn listing_a_missing_file_is_empty() {
        assert!(
            list_profiles_in(Path::new("/nonexistent/credentials"))
                .unwrap()
                .is_empty()
        );
    }
}
