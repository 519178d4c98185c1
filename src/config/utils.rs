use std::fs;
use std::path::{Path, PathBuf};
use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, File, FileFormat};
use anyhow::Result;
use regex::Regex;
use serde_json::Value;

/// Add a configuration file as a source. YAML is used for `.yaml`/`.yml`,
/// anything else is parsed as JSON.
pub fn add_file(
    builder: ConfigBuilder<DefaultState>,
    config_path: &Path,
) -> Result<ConfigBuilder<DefaultState>> {
    if !config_path.exists() {
        anyhow::bail!("Configuration file not found: {}", config_path.display());
    }

    let content = load_text_file(config_path)?;
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path.display());
    }

    Ok(builder.add_source(File::from_str(&content, file_format(config_path))))
}

fn file_format(config_path: &Path) -> FileFormat {
    let extension = config_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        _ => FileFormat::Json,
    }
}

/// Decode as UTF-8 (dropping a BOM), falling back to Windows-1252
fn load_text_file(file_path: &Path) -> Result<String> {
    let bytes = fs::read(file_path)?;

    let (content, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if !had_errors {
        return Ok(content.into_owned());
    }

    let (content, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
    Ok(content.into_owned())
}

/// Replace `${VAR_NAME}` placeholders inside string values.
/// Unknown variables are left as written.
pub fn substitute_env<F>(value: &mut Value, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    substitute_leaves(value, &pattern, lookup);
    Ok(())
}

fn substitute_leaves<F>(value: &mut Value, pattern: &Regex, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::String(text) => {
            let replaced = pattern.replace_all(text.as_str(), |caps: &regex::Captures| {
                lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
            });
            *text = replaced.into_owned();
        }
        Value::Array(items) => {
            for item in items {
                substitute_leaves(item, pattern, lookup);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                substitute_leaves(item, pattern, lookup);
            }
        }
        _ => {}
    }
}

/// `appsettings.json` + `Production` -> `appsettings.Production.json`
pub fn environment_file(base: &Path, environment: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("appsettings");
    let file_name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}.{}", stem, environment, ext),
        None => format!("{}.{}", stem, environment),
    };
    base.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::Config;
    use serde_json::json;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "USER_NAME" => Some("Ada".to_string()),
            "QUOTED" => Some(r#"Say "hi" \o/"#.to_string()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_known_variables_only() {
        let mut value = json!({ "message": "Hello ${USER_NAME}", "other": "${NOT_SET}" });
        substitute_env(&mut value, &lookup).unwrap();

        assert_eq!(value, json!({ "message": "Hello Ada", "other": "${NOT_SET}" }));
    }

    #[test]
    fn substituted_quotes_stay_inside_the_string() {
        let mut value = json!({
            "greeting": { "message": "${QUOTED}", "language": "DE" },
            "list": ["${USER_NAME}", 3]
        });
        substitute_env(&mut value, &lookup).unwrap();

        assert_eq!(
            value,
            json!({
                "greeting": { "message": r#"Say "hi" \o/"#, "language": "DE" },
                "list": ["Ada", 3]
            })
        );
    }

    #[test]
    fn environment_file_keeps_directory_and_extension() {
        let path = environment_file(Path::new("/etc/app/appsettings.json"), "Development");
        assert_eq!(path, PathBuf::from("/etc/app/appsettings.Development.json"));
    }

    #[test]
    fn reads_yaml_and_strips_bom() {
        let dir = std::env::temp_dir().join(format!("greeting-app-utils-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let yaml = dir.join("settings.yaml");
        fs::write(&yaml, "Greeting:\n  Message: Welcome!\n  Language: DE\n").unwrap();
        let value: Value = add_file(Config::builder(), &yaml)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(value, json!({ "greeting": { "message": "Welcome!", "language": "DE" } }));

        let json_path = dir.join("settings.json");
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(br#"{ "Greeting": { "Message": "Hi" } }"#);
        fs::write(&json_path, bytes).unwrap();
        let value: Value = add_file(Config::builder(), &json_path)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(value, json!({ "greeting": { "message": "Hi" } }));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_file_is_an_error() {
        let path = std::env::temp_dir()
            .join(format!("greeting-app-empty-{}.json", std::process::id()));
        fs::write(&path, "  \n").unwrap();
        assert!(add_file(Config::builder(), &path).is_err());
        fs::remove_file(&path).ok();
    }
}
