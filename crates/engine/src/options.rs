use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use filters::ModeSyntax;
use thiserror::Error;

/// Origin of the content a tree source contributes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TreeKind {
    /// A directory on the local filesystem.
    Dir,
    /// A tar archive.
    Tar,
    /// A container image layer.
    Layer,
    /// An existing commit in the repository.
    Ref,
}

impl TreeKind {
    /// Keyword used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dir => "dir",
            Self::Tar => "tar",
            Self::Layer => "layer",
            Self::Ref => "ref",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error produced when a `KIND=VALUE` tree argument cannot be parsed.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TreeSpecError {
    /// The argument has no `=`.
    #[error("tree '{0}' must be in the format KIND=VALUE")]
    MissingSeparator(String),
    /// The part before `=` is not a known tree kind.
    #[error("unknown tree kind '{kind}' (expected dir, tar, layer or ref)")]
    UnknownKind {
        /// Kind as written.
        kind: String,
    },
}

/// One layer of content to commit, in the order given.
///
/// ```
/// use engine::{TreeKind, TreeSpec};
///
/// let spec: TreeSpec = "dir=/srv/rootfs".parse()?;
/// assert_eq!(spec.kind(), TreeKind::Dir);
/// assert_eq!(spec.value(), "/srv/rootfs");
/// assert!("nope".parse::<TreeSpec>().is_err());
/// # Ok::<(), engine::TreeSpecError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeSpec {
    kind: TreeKind,
    value: String,
}

impl TreeSpec {
    /// A directory source rooted at `path`.
    #[must_use]
    pub fn dir<P: AsRef<Path>>(path: P) -> Self {
        Self {
            kind: TreeKind::Dir,
            value: path.as_ref().to_string_lossy().into_owned(),
        }
    }

    /// Source kind.
    #[must_use]
    pub const fn kind(&self) -> TreeKind {
        self.kind
    }

    /// Everything after the first `=`.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FromStr for TreeSpec {
    type Err = TreeSpecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (kind, value) = text
            .split_once('=')
            .ok_or_else(|| TreeSpecError::MissingSeparator(text.to_owned()))?;
        let kind = match kind {
            "dir" => TreeKind::Dir,
            "tar" => TreeKind::Tar,
            "layer" => TreeKind::Layer,
            "ref" => TreeKind::Ref,
            other => {
                return Err(TreeSpecError::UnknownKind {
                    kind: other.to_owned(),
                });
            }
        };
        Ok(Self {
            kind,
            value: value.to_owned(),
        })
    }
}

impl fmt::Display for TreeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind, self.value)
    }
}

/// Inputs for one commit preview.
///
/// Owner ids are kept in their raw signed form, where any negative value
/// means "leave unchanged"; they are validated when the preview starts.
#[derive(Clone, Debug)]
pub struct CommitOptions {
    trees: Vec<TreeSpec>,
    statoverride: Option<PathBuf>,
    skip_list: Option<PathBuf>,
    owner_uid: i64,
    owner_gid: i64,
    mode_syntax: ModeSyntax,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            trees: Vec::new(),
            statoverride: None,
            skip_list: None,
            owner_uid: -1,
            owner_gid: -1,
            mode_syntax: ModeSyntax::Integer,
        }
    }
}

impl CommitOptions {
    /// Options with no tree sources and no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tree source; later sources overlay earlier ones.
    #[must_use]
    pub fn tree(mut self, tree: TreeSpec) -> Self {
        self.trees.push(tree);
        self
    }

    /// Appends several tree sources.
    #[must_use]
    pub fn trees<I: IntoIterator<Item = TreeSpec>>(mut self, trees: I) -> Self {
        self.trees.extend(trees);
        self
    }

    /// Statoverride file to load before walking.
    #[must_use]
    pub fn statoverride<P: Into<PathBuf>>(mut self, path: Option<P>) -> Self {
        self.statoverride = path.map(Into::into);
        self
    }

    /// Skip-list file to load before walking.
    #[must_use]
    pub fn skip_list<P: Into<PathBuf>>(mut self, path: Option<P>) -> Self {
        self.skip_list = path.map(Into::into);
        self
    }

    /// Raw uid override; negative leaves ownership alone.
    #[must_use]
    pub const fn owner_uid(mut self, uid: i64) -> Self {
        self.owner_uid = uid;
        self
    }

    /// Raw gid override; negative leaves ownership alone.
    #[must_use]
    pub const fn owner_gid(mut self, gid: i64) -> Self {
        self.owner_gid = gid;
        self
    }

    /// Accepted spelling of statoverride mode bits.
    #[must_use]
    pub const fn mode_syntax(mut self, syntax: ModeSyntax) -> Self {
        self.mode_syntax = syntax;
        self
    }

    /// Configured tree sources.
    #[must_use]
    pub fn tree_specs(&self) -> &[TreeSpec] {
        &self.trees
    }

    /// Configured statoverride file.
    #[must_use]
    pub fn statoverride_path(&self) -> Option<&Path> {
        self.statoverride.as_deref()
    }

    /// Configured skip-list file.
    #[must_use]
    pub fn skip_list_path(&self) -> Option<&Path> {
        self.skip_list.as_deref()
    }

    /// Raw owner override values as `(uid, gid)`.
    #[must_use]
    pub const fn raw_owner(&self) -> (i64, i64) {
        (self.owner_uid, self.owner_gid)
    }

    /// Configured mode-bits syntax.
    #[must_use]
    pub const fn syntax(&self) -> ModeSyntax {
        self.mode_syntax
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_may_contain_equals() {
        let spec: TreeSpec = "ref=os/x86_64=stable".parse().expect("parse");
        assert_eq!(spec.kind(), TreeKind::Ref);
        assert_eq!(spec.value(), "os/x86_64=stable");
        assert_eq!(spec.to_string(), "ref=os/x86_64=stable");
    }

    #[test]
    fn every_kind_keyword_parses() {
        for kind in [TreeKind::Dir, TreeKind::Tar, TreeKind::Layer, TreeKind::Ref] {
            let spec: TreeSpec = format!("{kind}=x").parse().expect("parse");
            assert_eq!(spec.kind(), kind);
        }
    }

    #[test]
    fn malformed_specs_are_rejected() {
        assert_eq!(
            "rootfs".parse::<TreeSpec>(),
            Err(TreeSpecError::MissingSeparator("rootfs".to_owned()))
        );
        assert_eq!(
            "zip=a.zip".parse::<TreeSpec>(),
            Err(TreeSpecError::UnknownKind {
                kind: "zip".to_owned()
            })
        );
        assert_eq!(
            "DIR=/x".parse::<TreeSpec>(),
            Err(TreeSpecError::UnknownKind {
                kind: "DIR".to_owned()
            })
        );
    }

    #[test]
    fn options_default_to_no_overrides() {
        let options = CommitOptions::new();
        assert!(options.tree_specs().is_empty());
        assert_eq!(options.raw_owner(), (-1, -1));
        assert_eq!(options.syntax(), ModeSyntax::Integer);
        assert!(options.statoverride_path().is_none());
        assert!(options.skip_list_path().is_none());
    }

    #[test]
    fn builder_accumulates_trees_in_order() {
        let options = CommitOptions::new()
            .tree(TreeSpec::dir("/base"))
            .trees(["dir=/overlay".parse().expect("parse")])
            .statoverride(Some("/etc/statoverride"))
            .skip_list(None::<PathBuf>)
            .owner_uid(0)
            .owner_gid(-1)
            .mode_syntax(ModeSyntax::Lenient);

        let values: Vec<&str> = options.tree_specs().iter().map(TreeSpec::value).collect();
        assert_eq!(values, vec!["/base", "/overlay"]);
        assert_eq!(
            options.statoverride_path(),
            Some(Path::new("/etc/statoverride"))
        );
        assert_eq!(options.raw_owner(), (0, -1));
        assert_eq!(options.syntax(), ModeSyntax::Lenient);
    }
}
