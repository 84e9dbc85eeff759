//! Filesystem vault: one `<name>.md` file per document, YAML front matter for
//! structured fields.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde_yaml::{Mapping, Value as YamlValue};
use tokio::io::AsyncWriteExt;

use super::{DocumentStore, FieldMap};
use crate::error::{VaultError, VaultResult};

const FENCE: &str = "---\n";

/// A vault rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
    front_matter: bool,
}

impl FsVault {
    /// Open a vault rooted at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), front_matter: true }
    }

    /// A vault whose host cannot edit structured fields.
    #[must_use]
    pub fn without_front_matter(mut self) -> Self {
        self.front_matter = false;
        self
    }

    /// Vault root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> VaultResult<PathBuf> {
        let relative = Path::new(name);
        let valid = !name.trim().is_empty()
            && relative.components().all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(VaultError::InvalidName { name: name.to_string() });
        }

        Ok(self.root.join(format!("{name}.md")))
    }

    async fn ensure_parent(path: &Path) -> VaultResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FsVault {
    fn supports_structured_fields(&self) -> bool {
        self.front_matter
    }

    async fn exists(&self, name: &str) -> VaultResult<bool> {
        let path = self.path_for(name)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    async fn read_document(&self, name: &str) -> VaultResult<String> {
        let path = self.path_for(name)?;
        tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => VaultError::not_found(name),
            _ => e.into(),
        })
    }

    async fn create_document(&self, name: &str, text: &str, overwrite: bool) -> VaultResult<()> {
        let path = self.path_for(name)?;
        Self::ensure_parent(&path).await?;

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut file = options.open(&path).await.map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => VaultError::already_exists(name),
            _ => e.into(),
        })?;
        file.write_all(text.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(document = name, overwrite, "Created document");
        Ok(())
    }

    async fn append(&self, name: &str, text: &str) -> VaultResult<()> {
        let path = self.path_for(name)?;
        Self::ensure_parent(&path).await?;

        let mut file =
            tokio::fs::OpenOptions::new().create(true).append(true).open(&path).await?;
        file.write_all(text.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(document = name, bytes = text.len(), "Appended to document");
        Ok(())
    }

    async fn set_structured_fields(&self, name: &str, fields: &FieldMap) -> VaultResult<()> {
        if !self.front_matter {
            return Err(std::io::Error::new(
                ErrorKind::Unsupported,
                "structured fields are disabled for this vault",
            )
            .into());
        }

        let content = self.read_document(name).await?;
        let (yaml, body) = split_front_matter(&content);

        let mut mapping = match yaml {
            Some(yaml) => parse_mapping(yaml)?,
            None => Mapping::new(),
        };
        for (key, value) in fields {
            mapping.insert(YamlValue::String(key.clone()), serde_yaml::to_value(value)?);
        }

        let rendered = format!("{FENCE}{}{FENCE}{body}", serde_yaml::to_string(&mapping)?);
        tokio::fs::write(self.path_for(name)?, rendered).await?;

        tracing::debug!(document = name, fields = fields.len(), "Merged structured fields");
        Ok(())
    }

    async fn rename_document(&self, from: &str, to: &str) -> VaultResult<()> {
        let source = self.path_for(from)?;
        let target = self.path_for(to)?;

        if !tokio::fs::try_exists(&source).await? {
            return Err(VaultError::not_found(from));
        }
        if tokio::fs::try_exists(&target).await? {
            return Err(VaultError::already_exists(to));
        }

        Self::ensure_parent(&target).await?;
        tokio::fs::rename(&source, &target).await?;

        tracing::info!(from, to, "Renamed document");
        Ok(())
    }
}

/// Split `---` fenced front matter from the body. Fences may end in `\n` or `\r\n`.
fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix(FENCE).or_else(|| content.strip_prefix("---\r\n")) else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = rest[..offset].trim_end_matches(['\r', '\n']);
            return (Some(yaml), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, content)
}

fn parse_mapping(yaml: &str) -> VaultResult<Mapping> {
    match serde_yaml::from_str::<YamlValue>(yaml)? {
        YamlValue::Mapping(mapping) => Ok(mapping),
        YamlValue::Null => Ok(Mapping::new()),
        _ => Err(VaultError::FrontMatter(<serde_yaml::Error as serde::de::Error>::custom(
            "front matter is not a mapping",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_split_front_matter() {
        assert_eq!(split_front_matter("# Body"), (None, "# Body"));
        assert_eq!(split_front_matter("---\na: 1\n---\n# Body"), (Some("a: 1"), "# Body"));
        assert_eq!(split_front_matter("---\n---\nBody"), (Some(""), "Body"));
        assert_eq!(split_front_matter("---\na: 1\n---"), (Some("a: 1"), ""));
        assert_eq!(split_front_matter("---\nunterminated"), (None, "---\nunterminated"));
    }

    #[test]
    fn test_split_front_matter_crlf() {
        assert_eq!(
            split_front_matter("---\r\na: 1\r\nb: 2\r\n---\r\n# Body\r\n"),
            (Some("a: 1\r\nb: 2"), "# Body\r\n")
        );
        assert_eq!(split_front_matter("---\r\n---\r\nBody"), (Some(""), "Body"));
    }

    #[tokio::test]
    async fn test_fields_merge_into_crlf_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FsVault::new(dir.path());
        vault.create_document("Note", "---\r\ntags: [paper]\r\n---\r\n# Body\r\n", false).await.unwrap();

        let mut fields = FieldMap::new();
        fields.insert("title".into(), json!("New"));
        vault.set_structured_fields("Note", &fields).await.unwrap();

        let content = vault.read_document("Note").await.unwrap();
        assert_eq!(content.matches("---").count(), 2);
        let (yaml, body) = split_front_matter(&content);
        let mapping = parse_mapping(yaml.unwrap()).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(body, "# Body\r\n");
    }

    #[test]
    fn test_rejects_escaping_names() {
        let vault = FsVault::new("/tmp/vault");
        assert!(matches!(vault.path_for("../etc/passwd"), Err(VaultError::InvalidName { .. })));
        assert!(matches!(vault.path_for("/abs"), Err(VaultError::InvalidName { .. })));
        assert!(matches!(vault.path_for("  "), Err(VaultError::InvalidName { .. })));
        assert!(vault.path_for("Papers/Note").is_ok());
    }

    #[tokio::test]
    async fn test_fields_merge_key_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FsVault::new(dir.path());
        vault.create_document("Note", "---\ntags: [paper]\ntitle: Old\n---\n# Body\n", false).await.unwrap();

        let mut fields = FieldMap::new();
        fields.insert("title".into(), json!("New"));
        fields.insert("cited_by".into(), json!(3));
        vault.set_structured_fields("Note", &fields).await.unwrap();

        let content = vault.read_document("Note").await.unwrap();
        let (yaml, body) = split_front_matter(&content);
        let mapping = parse_mapping(yaml.unwrap()).unwrap();

        assert_eq!(body, "# Body\n");
        assert_eq!(mapping.get("title").and_then(YamlValue::as_str), Some("New"));
        assert_eq!(mapping.get("cited_by").and_then(YamlValue::as_u64), Some(3));
        assert!(mapping.get("tags").is_some());
    }

    #[tokio::test]
    async fn test_create_respects_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FsVault::new(dir.path());

        vault.create_document("A", "one", false).await.unwrap();
        let err = vault.create_document("A", "two", false).await.unwrap_err();
        assert!(matches!(err, VaultError::AlreadyExists { .. }));

        vault.create_document("A", "three", true).await.unwrap();
        assert_eq!(vault.read_document("A").await.unwrap(), "three");
    }

    #[tokio::test]
    async fn test_disabled_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FsVault::new(dir.path()).without_front_matter();
        vault.append("A", "text").await.unwrap();

        assert!(!vault.supports_structured_fields());
        assert!(vault.set_structured_fields("A", &FieldMap::new()).await.is_err());
    }
}
