use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use anyhow::{bail, Context, Result};
use regex::Regex;
use serde_json::Value;
use crate::data::{PipelineError, PipelineResult};

/// Read-only class-name lookup, index -> label.
///
/// Cloning is cheap and the table is never mutated after construction, so
/// concurrent pipeline invocations read it without synchronisation. An empty
/// table is valid: every lookup then yields no name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelTable {
    names: Arc<[String]>,
}

impl From<Vec<String>> for LabelTable {
    fn from(names: Vec<String>) -> Self {
        Self { names: names.into() }
    }
}

impl LabelTable {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self::from(names.iter().map(|x| x.as_ref().to_string()).collect::<Vec<String>>())
    }

    pub fn empty() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, index: usize) -> PipelineResult<&str> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or(PipelineError::Index { index, len: self.names.len() })
    }

    /// Label for `index`, recovering a miss into `None`.
    pub fn name(&self, index: usize) -> Option<String> {
        match self.get(index) {
            Ok(name) => Some(name.to_string()),
            Err(err) => {
                if !self.is_empty() {
                    log::warn!("{err}, reporting class {index} without a name");
                }
                None
            }
        }
    }

    /// Loads a table from disk, picking the parser by file extension:
    /// `.json`, `.yaml`/`.yml`, anything else is one name per line.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read label table {}", path.display()))?;

        let ext = path
            .extension()
            .and_then(|x| x.to_str())
            .map(|x| x.to_lowercase());
        let table = match ext.as_deref() {
            Some("json") => Self::from_json(&text)?,
            Some("yaml") | Some("yml") => Self::from_yaml(&text)?,
            _ => Self::from_lines(&text),
        };
        log::info!("Loaded {} labels from {}", table.len(), path.display());
        Ok(table)
    }

    /// Loads the table at `path`, falling back to an empty table when it
    /// cannot be read or parsed.
    pub async fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path).await {
            Ok(table) => table,
            Err(err) => {
                log::warn!("{err:#}, continuing without class names");
                Self::empty()
            }
        }
    }

    /// One label per line, trailing blank lines dropped.
    pub fn from_lines(text: &str) -> Self {
        let mut names: Vec<String> = text.lines().map(|x| x.trim().to_string()).collect();
        while names.last().is_some_and(|x| x.is_empty()) {
            names.pop();
        }
        Self::from(names)
    }

    /// Accepts a JSON array of names, an array of `[id, name]` pairs (the
    /// last string of each entry is the name), or an object keyed by index
    /// whose values are names or such pairs.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("label table is not valid JSON")?;
        match value {
            Value::Array(entries) => {
                let names = entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| Self::json_name(entry).with_context(|| format!("label entry {i}")))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::from(names))
            }
            Value::Object(entries) => {
                let mut indexed = BTreeMap::new();
                for (key, entry) in entries.iter() {
                    let index: usize = key
                        .trim()
                        .parse()
                        .with_context(|| format!("label key {key:?} is not an index"))?;
                    indexed.insert(index, Self::json_name(entry).with_context(|| format!("label entry {key}"))?);
                }
                Ok(Self::from_indexed(indexed))
            }
            _ => bail!("label table JSON must be an array or an object"),
        }
    }

    /// Reads the `names:` section of a YOLO dataset YAML: an `index: name`
    /// block, a `- name` block list, or an inline list.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let entry = Regex::new(r#"^\s+(\d+)\s*:\s*['"]?(.*?)['"]?\s*$"#)?;
        let item = Regex::new(r#"^\s*-\s+['"]?(.*?)['"]?\s*$"#)?;
        let mut in_names = false;
        let mut next_item = 0;
        let mut indexed = BTreeMap::new();

        for line in text.lines() {
            if let Some(rest) = line.strip_prefix("names:") {
                let rest = rest.trim();
                if rest.starts_with('[') || rest.starts_with('{') {
                    return Ok(Self::from_metadata(rest));
                }
                in_names = true;
                continue;
            }
            if !in_names || line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            if let Some(caps) = entry.captures(line) {
                let index: usize = caps[1].parse()?;
                indexed.insert(index, caps[2].to_string());
            } else if let Some(caps) = item.captures(line) {
                indexed.insert(next_item, caps[1].to_string());
                next_item += 1;
            } else {
                // Next top-level key ends the block.
                break;
            }
        }

        if indexed.is_empty() {
            bail!("no `names:` entries found in YAML label table");
        }
        Ok(Self::from_indexed(indexed))
    }

    /// Parses the names string models embed in their metadata, e.g.
    /// `{0: 'person', 1: 'bicycle', 2: "yellow_lady's_slipper"}`.
    pub fn from_metadata(names: &str) -> Self {
        let re = match Regex::new(r#"(['"])([-()\w '"]+)(['"])"#) {
            Ok(re) => re,
            Err(_) => return Self::empty(),
        };
        let mut names_ = vec![];
        for (_, [_, name, _]) in re.captures_iter(names).map(|x| x.extract()) {
            names_.push(name.to_string());
        }
        Self::from(names_)
    }

    fn json_name(entry: &Value) -> Result<String> {
        match entry {
            Value::String(name) => Ok(name.clone()),
            Value::Array(parts) => match parts.iter().rev().find_map(Value::as_str) {
                Some(name) => Ok(name.to_string()),
                None => bail!("entry holds no string name"),
            },
            _ => bail!("entry must be a string or an array"),
        }
    }

    // Gaps in sparse indices get `# {index}` placeholders.
    fn from_indexed(indexed: BTreeMap<usize, String>) -> Self {
        let len = indexed.keys().next_back().map_or(0, |x| x + 1);
        let names = (0..len)
            .map(|i| indexed.get(&i).cloned().unwrap_or_else(|| format!("# {}", i)))
            .collect::<Vec<String>>();
        Self::from(names)
    }
}
