#![allow(dead_code)]

use gitcore::{Hash, Kind, MemoryTransport, RawObject};

pub const FIXTURE_URL: &str = "https://github.com/git-fixtures/basic";
pub const MASTER: &str = "refs/heads/master";
pub const AUTHOR: &str = "Daniel Ripolles <daniel@lordran.local>";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn blob(content: &str) -> RawObject {
    RawObject::new(Kind::Blob, content.as_bytes().to_vec())
}

/// Entries must be given in git order (bytewise by name).
pub fn tree(entries: &[(&str, &str, Hash)]) -> RawObject {
    let mut body = Vec::new();
    for (mode, name, hash) in entries {
        body.extend_from_slice(format!("{} {}\0", mode, name).as_bytes());
        body.extend_from_slice(hash.as_bytes());
    }
    RawObject::new(Kind::Tree, body)
}

pub fn commit(tree: Hash, parent: Option<Hash>, time: i64, message: &str) -> RawObject {
    let mut body = format!("tree {}\n", tree);
    if let Some(parent) = parent {
        body.push_str(&format!("parent {}\n", parent));
    }
    body.push_str(&format!("author {} {} +0100\n", AUTHOR, time));
    body.push_str(&format!("committer {} {} +0100\n\n", AUTHOR, time));
    body.push_str(message);
    RawObject::new(Kind::Commit, body)
}

pub fn tag(target: Hash, kind: &str, name: &str) -> RawObject {
    RawObject::new(
        Kind::Tag,
        format!(
            "object {}\ntype {}\ntag {}\ntagger {} 1427364900 +0100\n\nRelease {}\n",
            target, kind, name, AUTHOR, name
        ),
    )
}

/// Objects of a fixture remote, also handy for writing to disk.
pub struct Fixture {
    pub objects: Vec<RawObject>,
    /// Oldest first.
    pub commits: Vec<Hash>,
    /// The commit that introduces CHANGELOG.
    pub changelog_commit: Hash,
    pub head_tree: Hash,
    pub tags: Vec<(String, Hash)>,
}

impl Fixture {
    pub fn head(&self) -> Hash {
        *self.commits.last().unwrap()
    }

    pub fn transport(&self) -> MemoryTransport {
        let transport = MemoryTransport::new();
        for object in &self.objects {
            transport.insert_object(object.clone());
        }
        transport.set_ref(MASTER, self.head());
        transport.set_ref("refs/heads/first", self.commits[0]);
        for (name, hash) in &self.tags {
            transport.set_ref(format!("refs/tags/{}", name), *hash);
        }
        transport
    }
}

/// Eight commits on a single line of history.
///
/// Commit 3 adds CHANGELOG, commit 5 adds go/example.go. The head tree is:
///
/// ```text
/// CHANGELOG
/// LICENSE
/// README.md
/// go/
///   example.go
/// ```
pub fn linear_history() -> Fixture {
    let mut objects = Vec::new();
    let mut commits: Vec<Hash> = Vec::new();
    let mut changelog_commit = Hash::ZERO;
    let mut head_tree = Hash::ZERO;

    let license = blob("MIT License\n");
    let example = blob("package main\n\nfunc main() {}\n");
    let go = tree(&[("100644", "example.go", example.hash())]);
    objects.extend([license.clone(), example, go.clone()]);

    for i in 1..=8 {
        let readme = blob(&format!("# fixture\n\nversion {}\n", i));
        let mut entries = Vec::new();

        let changelog = blob(&format!("changes up to {}\n", i));
        if i >= 3 {
            entries.push(("100644", "CHANGELOG", changelog.hash()));
            objects.push(changelog);
        }
        entries.push(("100644", "LICENSE", license.hash()));
        entries.push(("100644", "README.md", readme.hash()));
        if i >= 5 {
            entries.push(("40000", "go", go.hash()));
        }
        let root = tree(&entries);

        let message = match i {
            1 => "Initial commit\n".to_string(),
            3 => "Creating changelog\n".to_string(),
            _ => format!("Commit number {}\n", i),
        };
        let snapshot = commit(root.hash(), commits.last().copied(), 1427364000 + i * 60, &message);

        if i == 3 {
            changelog_commit = snapshot.hash();
        }
        head_tree = root.hash();
        commits.push(snapshot.hash());
        objects.extend([readme, root, snapshot]);
    }

    let head = *commits.last().unwrap();
    let release = tag(head, "commit", "v1.0");
    let license_tag = tag(license.hash(), "blob", "license");
    let tags = vec![
        ("v1.0".to_string(), release.hash()),
        ("license".to_string(), license_tag.hash()),
    ];
    objects.extend([release, license_tag]);

    Fixture {
        objects,
        commits,
        changelog_commit,
        head_tree,
        tags,
    }
}
