//! hms-config
//!
//! Layered YAML configuration for the daemon. Later documents override
//! earlier ones via deep merge; the effective config is canonicalized and
//! hashed so two deployments can prove they run the same configuration.
//!
//! Secrets never live in config files: any leaf string that looks like a
//! credential aborts the load with CONFIG_SECRET_DETECTED. Tokens are
//! injected through the environment instead.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;

/// Known secret-like prefixes. A leaf string value starting with one of
/// these fails the load.
const SECRET_PREFIXES: &[&str] = &[
    "sk-",
    "sk_live",
    "sk_test",
    "AKIA",
    "-----BEGIN",
    "ghp_",
    "gho_",
    "glpat-",
    "xoxb-",
    "xoxp-",
    "Bearer ",
];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw = fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

/// Merge YAML documents in order: earlier docs are base, later override.
pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    enforce_no_secret_literals(&merged)?;

    let canonical_json = serde_json::to_string(&sort_keys(&merged)).context("canonicalize")?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut new = serde_json::Map::new();
            for k in keys {
                new.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Secret guard
// ---------------------------------------------------------------------------

fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut leaves = Vec::new();
    collect_leaf_pointers(v, "", &mut leaves);

    for ptr in leaves {
        if let Some(val) = v.pointer(&ptr) {
            if let Some(s) = val.as_str() {
                if looks_like_secret(s) {
                    bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
                }
            }
        }
    }
    Ok(())
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    if t.len() < 8 {
        return false;
    }
    SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map.iter() {
                let next = format!("{}/{}", prefix, k.replace('~', "~0").replace('/', "~1"));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                let next = format!("{}/{}", prefix, i);
                collect_leaf_pointers(vv, &next, out);
            }
        }
        _ => {
            let p = if prefix.is_empty() {
                "/".to_string()
            } else {
                prefix.to_string()
            };
            out.push(p);
        }
    }
}

// ---------------------------------------------------------------------------
// Typed daemon settings
// ---------------------------------------------------------------------------

/// The subset of the effective config the daemon actually reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonSettings {
    /// Bind address, e.g. "127.0.0.1:8710".
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Path of the JSONL audit log.
    #[serde(default = "default_audit_log")]
    pub audit_log_path: String,
    /// Whether audit records carry the SHA-256 hash chain.
    #[serde(default = "default_true")]
    pub audit_hash_chain: bool,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8710".to_string()
}

fn default_audit_log() -> String {
    "data/audit.jsonl".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            audit_log_path: default_audit_log(),
            audit_hash_chain: default_true(),
        }
    }
}

impl DaemonSettings {
    /// Extract settings from the `/daemon` section of the effective
    /// config. A missing section yields the defaults.
    pub fn from_config(config: &LoadedConfig) -> Result<Self> {
        match config.config_json.pointer("/daemon") {
            None => Ok(Self::default()),
            Some(section) => {
                serde_json::from_value(section.clone()).context("invalid /daemon config section")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_layer_overrides_earlier() {
        let base = "daemon:\n  bind_addr: \"0.0.0.0:80\"\n  audit_hash_chain: false\n";
        let local = "daemon:\n  bind_addr: \"127.0.0.1:8710\"\n";
        let loaded = load_layered_yaml_from_strings(&[base, local]).unwrap();
        let settings = DaemonSettings::from_config(&loaded).unwrap();
        assert_eq!(settings.bind_addr, "127.0.0.1:8710");
        assert!(!settings.audit_hash_chain);
    }

    #[test]
    fn identical_configs_hash_identically_regardless_of_key_order() {
        let a = "daemon:\n  bind_addr: \"x\"\n  audit_hash_chain: true\n";
        let b = "daemon:\n  audit_hash_chain: true\n  bind_addr: \"x\"\n";
        let ha = load_layered_yaml_from_strings(&[a]).unwrap().config_hash;
        let hb = load_layered_yaml_from_strings(&[b]).unwrap().config_hash;
        assert_eq!(ha, hb);
    }

    #[test]
    fn secret_literal_aborts_load() {
        let doc = "broker:\n  api_key: \"sk_live_abcdef123456\"\n";
        let err = load_layered_yaml_from_strings(&[doc]).unwrap_err();
        assert!(err.to_string().contains("CONFIG_SECRET_DETECTED"));
    }

    #[test]
    fn missing_daemon_section_falls_back_to_defaults() {
        let loaded = load_layered_yaml_from_strings(&["other: {}\n"]).unwrap();
        let settings = DaemonSettings::from_config(&loaded).unwrap();
        assert_eq!(settings.bind_addr, default_bind_addr());
        assert!(settings.audit_hash_chain);
    }
}
