//! Collects grouped fields of one schema level into aggregate partials.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Fields sharing one group id at one schema level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Lower-cased group id.
    pub id: String,
    /// Aggregate partial this group is written to.
    pub file: PathBuf,
    /// Member blocks in encounter order.
    pub content: String,
    /// Partials the member blocks embed.
    pub imports: Vec<PathBuf>,
    /// Display name, set by the first member that supplies one.
    pub name: Option<String>,
}

/// Accumulates [`Group`]s for a single schema level.
#[derive(Debug)]
pub struct GroupCollector {
    directory: PathBuf,
    extension: String,
    groups: Vec<Group>,
}

impl GroupCollector {
    /// Creates a collector whose group files live in `directory`.
    pub fn new(directory: &Path, extension: &str) -> Self {
        Self {
            directory: directory.to_path_buf(),
            extension: extension.to_string(),
            groups: Vec::new(),
        }
    }

    /// Adds a rendered field block to the group `group_id`.
    ///
    /// Returns the group's file when this call created the group; the caller
    /// places the group's embed where this field would otherwise have gone.
    pub fn add(
        &mut self,
        group_id: &str,
        group_name: Option<&str>,
        block: &str,
        import: &Path,
    ) -> Option<PathBuf> {
        let id = group_id.to_lowercase();
        let (group, created) = match self.groups.iter().position(|group| group.id == id) {
            Some(index) => (&mut self.groups[index], false),
            None => {
                let file = self
                    .directory
                    .join(format!("group_{}.{}", file_stem(&id), self.extension));
                self.groups.push(Group {
                    id,
                    file,
                    content: String::new(),
                    imports: Vec::new(),
                    name: None,
                });
                let last = self.groups.len() - 1;
                (&mut self.groups[last], true)
            }
        };

        match (group.name.as_deref(), group_name.filter(|name| !name.is_empty())) {
            (None, Some(name)) => group.name = Some(name.to_string()),
            (Some(existing), Some(name)) if existing != name => {
                debug!(group = %group.id, kept = existing, ignored = name, "Group already named");
            }
            _ => {}
        }

        group.content.push_str(block);
        group.imports.push(import.to_path_buf());

        created.then(|| group.file.clone())
    }

    /// Finished groups in first-seen order.
    pub fn finish(self) -> Vec<Group> {
        self.groups
    }
}

/// Group id reduced to characters that are safe in a file name.
fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
