//! Server configuration from the environment.
use anyhow::Context;
use std::path::Path;
use tempsafe_quality::ComplianceProfile;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8787";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub addr: String,
    pub profile: ComplianceProfile,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            profile: ComplianceProfile::standard(),
        }
    }
}

impl ApiConfig {
    /// `TEMPSAFE_ADDR` sets the listen address; `TEMPSAFE_PROFILE` is a
    /// profile name (`standard`, `strict`) or the path of a YAML profile.
    pub fn from_env() -> anyhow::Result<Self> {
        let addr = std::env::var("TEMPSAFE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let profile = match std::env::var("TEMPSAFE_PROFILE") {
            Ok(value) => resolve_profile(&value)?,
            Err(_) => ComplianceProfile::standard(),
        };
        Ok(Self { addr, profile })
    }
}

/// Load a profile from a YAML file when `value` looks like one, otherwise by name
pub fn resolve_profile(value: &str) -> anyhow::Result<ComplianceProfile> {
    let path = Path::new(value);
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if !is_yaml {
        return ComplianceProfile::for_name(value).map_err(Into::into);
    }

    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("reading compliance profile {}", path.display()))?;
    let profile = ComplianceProfile::from_yaml(&yaml)
        .with_context(|| format!("loading compliance profile {}", path.display()))?;
    Ok(profile)
}
