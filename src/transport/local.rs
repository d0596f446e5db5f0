use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::{FetchResponse, ObjectStream, ReachabilityWalk, Transport};
use crate::auth::AuthMethod;
use crate::hash::Hash;
use crate::object::RawObject;

/// Symbolic refs nested deeper than this are rejected.
const MAX_SYMREF_DEPTH: usize = 5;

/// Fetches from a repository directory on this machine.
///
/// Reads refs (loose and packed) and zlib-compressed loose objects. Objects
/// that only exist inside pack files are reported as missing.
#[derive(Debug, Clone)]
pub struct LocalTransport {
    git_dir: PathBuf,
}

impl LocalTransport {
    /// Accepts either a bare repository or a work tree containing `.git`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let dot_git = path.join(".git");
        let git_dir = if dot_git.is_dir() {
            dot_git
        } else {
            path.to_path_buf()
        };
        Self { git_dir }
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    fn objects_dir(&self) -> PathBuf {
        self.git_dir.join("objects")
    }

    /// Resolve a ref name (or a literal object id) to the object it points at.
    pub fn resolve_ref(&self, reference: &str) -> Result<Hash> {
        if let Ok(hash) = reference.parse::<Hash>() {
            return Ok(hash);
        }

        let mut name = reference.to_string();
        for _ in 0..MAX_SYMREF_DEPTH {
            if name.split('/').any(|component| component == ".." || component.is_empty()) {
                anyhow::bail!("Invalid reference name: {}", name);
            }

            let path = self.git_dir.join(&name);
            if path.is_file() {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read ref file: {}", path.display()))?;
                let content = content.trim();

                if let Some(target) = content.strip_prefix("ref: ") {
                    name = target.to_string();
                    continue;
                }
                return content
                    .parse::<Hash>()
                    .with_context(|| format!("Invalid object id in ref {}", name));
            }

            return self.packed_ref(&name)?.with_context(|| {
                format!("Reference {} not found in {}", name, self.git_dir.display())
            });
        }

        anyhow::bail!("Too many levels of symbolic refs resolving {}", reference)
    }

    fn packed_ref(&self, name: &str) -> Result<Option<Hash>> {
        let path = self.git_dir.join("packed-refs");
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read packed refs: {}", path.display()))?;

        for line in content.lines() {
            if line.starts_with('#') || line.starts_with('^') {
                continue;
            }
            if let Some((hash, refname)) = line.split_once(' ') {
                if refname.trim() == name {
                    let hash = hash
                        .parse::<Hash>()
                        .with_context(|| format!("Invalid object id for {} in packed-refs", name))?;
                    return Ok(Some(hash));
                }
            }
        }

        Ok(None)
    }
}

impl Transport for LocalTransport {
    fn fetch(&mut self, reference: &str, _auth: Option<&dyn AuthMethod>) -> Result<FetchResponse> {
        let head = self.resolve_ref(reference)?;
        let objects_dir = self.objects_dir();
        if !objects_dir.is_dir() {
            anyhow::bail!("Not a git repository: {}", self.git_dir.display());
        }

        tracing::debug!(
            "Fetching {} -> {} from {}",
            reference,
            head,
            self.git_dir.display()
        );

        Ok(FetchResponse {
            head,
            stream: Box::new(LocalStream {
                objects_dir,
                walk: ReachabilityWalk::new(head),
                closed: false,
            }),
        })
    }
}

struct LocalStream {
    objects_dir: PathBuf,
    walk: ReachabilityWalk,
    closed: bool,
}

impl Iterator for LocalStream {
    type Item = Result<RawObject>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        let objects_dir = &self.objects_dir;
        self.walk.next_with(|hash| {
            let path = loose_object_path(objects_dir, hash);
            if !path.exists() {
                anyhow::bail!("Object {} not found as a loose object", hash);
            }
            let object = read_loose_object(&path)?;
            if object.hash() != *hash {
                anyhow::bail!("Corrupt object {}: content hashes to {}", hash, object.hash());
            }
            Ok(object)
        })
    }
}

impl ObjectStream for LocalStream {
    fn close(&mut self) -> Result<()> {
        if self.closed {
            anyhow::bail!("Stream over {} already closed", self.objects_dir.display());
        }
        self.closed = true;
        self.walk.clear();
        Ok(())
    }
}

/// Loose objects are stored as `objects/ab/cdef123...`.
pub fn loose_object_path(objects_dir: &Path, hash: &Hash) -> PathBuf {
    let hex = hash.to_hex();
    let (dir, file) = hex.split_at(2);
    objects_dir.join(dir).join(file)
}

/// Read a loose object from filesystem path
pub fn read_loose_object(path: &Path) -> Result<RawObject> {
    // Loose objects are zlib compressed
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open object file: {}", path.display()))?;
    let mut decoder = flate2::read::ZlibDecoder::new(file);
    let mut content = Vec::new();
    decoder
        .read_to_end(&mut content)
        .context("Failed to decompress object")?;

    RawObject::from_loose_format(&content)
}

/// Write a loose object below `objects_dir` (creates intermediate directories)
pub fn write_loose_object(obj: &RawObject, objects_dir: &Path) -> Result<PathBuf> {
    let obj_path = loose_object_path(objects_dir, &obj.hash());
    if let Some(obj_dir) = obj_path.parent() {
        fs::create_dir_all(obj_dir)
            .with_context(|| format!("Failed to create object directory: {}", obj_dir.display()))?;
    }

    // Compress and write
    let content = obj.to_loose_format();
    let file = fs::File::create(&obj_path)
        .with_context(|| format!("Failed to create object file: {}", obj_path.display()))?;
    let mut encoder = flate2::write::ZlibEncoder::new(file, flate2::Compression::default());
    std::io::Write::write_all(&mut encoder, &content)
        .context("Failed to write compressed object")?;
    encoder.finish().context("Failed to finish compression")?;

    Ok(obj_path)
}
