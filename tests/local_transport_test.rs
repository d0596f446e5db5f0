mod common;

use std::fs;
use std::path::Path;

use common::{init_tracing, linear_history, Fixture, MASTER};
use gitcore::transport::{loose_object_path, write_loose_object};
use gitcore::{Endpoint, Error, Repository};
use tempfile::TempDir;

fn write_bare_repo(fixture: &Fixture) -> TempDir {
    let temp = TempDir::new().unwrap();
    let objects_dir = temp.path().join("objects");
    for object in &fixture.objects {
        write_loose_object(object, &objects_dir).unwrap();
    }

    write_ref(temp.path(), MASTER, &format!("{}\n", fixture.head()));
    fs::write(temp.path().join("HEAD"), format!("ref: {}\n", MASTER)).unwrap();
    temp
}

fn write_ref(git_dir: &Path, name: &str, content: &str) {
    let path = git_dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_pull_from_path() {
    init_tracing();
    let fixture = linear_history();
    let temp = write_bare_repo(&fixture);

    let url = temp.path().to_string_lossy().into_owned();
    let mut repo = Repository::new(&url, None).unwrap();
    assert!(matches!(
        repo.remote("origin").unwrap().endpoint(),
        Endpoint::Local(_)
    ));

    repo.pull("origin", MASTER).unwrap();
    assert_eq!(repo.reference("origin", MASTER), Some(fixture.head()));
    assert_eq!(repo.commits().count(), 8);
    assert_eq!(repo.object_count(), 33);
}

#[test]
fn test_pull_from_file_url_follows_head() {
    init_tracing();
    let fixture = linear_history();
    let temp = write_bare_repo(&fixture);

    let url = format!("file://{}", temp.path().display());
    let mut repo = Repository::new(&url, None).unwrap();
    repo.pull("origin", "HEAD").unwrap();

    let head = repo.reference("origin", "HEAD").unwrap();
    assert_eq!(head, fixture.head());
    let history: Vec<_> = repo.log(&head).unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(history.len(), 8);
    assert_eq!(history[7].message, "Initial commit\n");
}

#[test]
fn test_pull_tag_from_packed_refs() {
    init_tracing();
    let fixture = linear_history();
    let temp = write_bare_repo(&fixture);

    let (name, hash) = &fixture.tags[0];
    fs::write(
        temp.path().join("packed-refs"),
        format!("# pack-refs with: peeled fully-peeled sorted\n{} refs/tags/{}\n", hash, name),
    )
    .unwrap();

    let mut repo = Repository::new(&temp.path().to_string_lossy(), None).unwrap();
    repo.pull("origin", "refs/tags/v1.0").unwrap();

    let tag = repo.tag(hash).unwrap();
    assert_eq!(tag.commit().unwrap().hash, fixture.head());
    assert_eq!(repo.tags().count(), 1);
}

#[test]
fn test_pull_missing_object() {
    init_tracing();
    let fixture = linear_history();
    let temp = write_bare_repo(&fixture);

    let root = fixture.commits[0];
    fs::remove_file(loose_object_path(&temp.path().join("objects"), &root)).unwrap();

    let mut repo = Repository::new(&temp.path().to_string_lossy(), None).unwrap();
    let err = repo.pull("origin", MASTER).unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.to_string().contains(&root.to_hex()));
    assert_eq!(repo.reference("origin", MASTER), None);

    // everything newer than the missing commit was merged before the failure
    assert!(repo.commit(&fixture.head()).is_ok());
    assert!(repo.commit(&root).unwrap_err().is_not_found());
}

#[test]
fn test_pull_unknown_reference() {
    let fixture = linear_history();
    let temp = write_bare_repo(&fixture);

    let mut repo = Repository::new(&temp.path().to_string_lossy(), None).unwrap();
    let err = repo.pull("origin", "refs/heads/missing").unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(repo.object_count(), 0);
}
