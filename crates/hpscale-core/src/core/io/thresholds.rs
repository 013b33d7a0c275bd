use super::error::IoError;
use crate::core::models::thresholds::{TableState, ThresholdEntry, ThresholdTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThresholdArtifact {
    state: TableState,
    #[serde(default)]
    thresholds: Vec<ThresholdEntry>,
}

pub fn to_toml_string(table: &ThresholdTable) -> Result<String, IoError> {
    let artifact = ThresholdArtifact {
        state: table.state(),
        thresholds: table.entries().cloned().collect(),
    };
    Ok(toml::to_string_pretty(&artifact)?)
}

pub fn write_thresholds(path: &Path, table: &ThresholdTable) -> Result<(), IoError> {
    debug!("Writing {} threshold(s) to {:?}", table.len(), path);
    std::fs::write(path, to_toml_string(table)?)?;
    Ok(())
}

pub fn read_thresholds(path: &Path) -> Result<ThresholdTable, IoError> {
    debug!("Loading thresholds from {:?}", path);
    let content = std::fs::read_to_string(path)?;
    let artifact: ThresholdArtifact =
        toml::from_str(&content).map_err(|source| IoError::TomlParse {
            path: path.to_path_buf(),
            source,
        })?;
    ThresholdTable::from_parts(artifact.state, artifact.thresholds).map_err(|source| {
        IoError::Threshold {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::thresholds::ThresholdStatus;

    fn locked_table() -> ThresholdTable {
        let mut table = ThresholdTable::new();
        table
            .insert(ThresholdEntry {
                length: 20,
                energy: -12,
                status: ThresholdStatus::Calibrated,
            })
            .unwrap();
        table
            .insert(ThresholdEntry {
                length: 30,
                energy: 0,
                status: ThresholdStatus::Degenerate {
                    reason: "no pilot trial found an H-H contact".to_string(),
                },
            })
            .unwrap();
        table.lock();
        table
    }

    #[test]
    fn locked_table_survives_a_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.toml");
        let table = locked_table();
        write_thresholds(&path, &table).unwrap();
        let loaded = read_thresholds(&path).unwrap();
        assert_eq!(loaded, table);
        assert!(loaded.is_locked());
    }

    #[test]
    fn state_is_stored_in_kebab_case() {
        let text = to_toml_string(&locked_table()).unwrap();
        assert!(text.contains("state = \"locked\""));
        assert!(text.contains("kind = \"degenerate\""));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "state = \"locked\"\nextra = 1\n").unwrap();
        assert!(matches!(
            read_thresholds(&path),
            Err(IoError::TomlParse { .. })
        ));
    }

    #[test]
    fn duplicate_lengths_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dup.toml");
        std::fs::write(
            &path,
            r#"
state = "locked"

[[thresholds]]
length = 20
energy = -3
status = { kind = "calibrated" }

[[thresholds]]
length = 20
energy = -4
status = { kind = "calibrated" }
"#,
        )
        .unwrap();
        assert!(matches!(
            read_thresholds(&path),
            Err(IoError::Threshold { .. })
        ));
    }
}
