//! Object store behavior against a real temp directory.

use minigit_hash::Hasher;
use minigit_object::{Blob, Object, ObjectType};
use minigit_odb::{ObjectStore, OdbError};

fn store() -> (tempfile::TempDir, ObjectStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = ObjectStore::open(dir.path().join("objects"));
    (dir, store)
}

#[test]
fn write_then_read_back() {
    let (_dir, store) = store();
    let oid = store.write_raw(ObjectType::Blob, b"hello\n").unwrap();
    assert_eq!(oid.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");

    let (kind, body) = store.read(&oid).unwrap();
    assert_eq!(kind, ObjectType::Blob);
    assert_eq!(body, b"hello\n");
}

#[test]
fn oid_is_hash_of_framed_payload() {
    let (_dir, store) = store();
    let body = b"some content";
    let oid = store.write_raw(ObjectType::Blob, body).unwrap();
    let expected = Hasher::hash_object("blob", body).unwrap();
    assert_eq!(oid, expected);
}

#[test]
fn write_is_idempotent() {
    let (_dir, store) = store();
    let a = store.write_raw(ObjectType::Blob, b"same\n").unwrap();
    let b = store.write_raw(ObjectType::Blob, b"same\n").unwrap();
    assert_eq!(a, b);
    assert!(store.contains(&a));
}

#[test]
fn read_missing_is_not_found() {
    let (_dir, store) = store();
    let oid = minigit_hash::ObjectId::from_hex("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
    assert!(matches!(store.read(&oid), Err(OdbError::NotFound(_))));
}

#[test]
fn read_typed_object() {
    let (_dir, store) = store();
    let obj = Object::Blob(Blob::new(b"typed\n".as_slice()));
    let oid = store.write(&obj).unwrap();
    assert_eq!(store.read_object(&oid).unwrap(), obj);
}

#[test]
fn corrupt_object_is_detected() {
    let (_dir, store) = store();
    let oid = store.write_raw(ObjectType::Blob, b"x\n").unwrap();

    // Overwrite the object file with garbage that will not inflate.
    let path = store.object_path(&oid);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
    }
    std::fs::write(&path, b"not zlib data").unwrap();

    assert!(matches!(store.read(&oid), Err(OdbError::Corrupt { .. })));
}

#[test]
fn expand_unique_prefix() {
    let (_dir, store) = store();
    let oid = store.write_raw(ObjectType::Blob, b"hello\n").unwrap();
    let expanded = store.expand_prefix(&oid.to_hex()[..6]).unwrap();
    assert_eq!(expanded, oid);
}

#[test]
fn expand_full_hex() {
    let (_dir, store) = store();
    let oid = store.write_raw(ObjectType::Blob, b"hello\n").unwrap();
    assert_eq!(store.expand_prefix(&oid.to_hex()).unwrap(), oid);
}

#[test]
fn expand_too_short_or_unknown() {
    let (_dir, store) = store();
    store.write_raw(ObjectType::Blob, b"hello\n").unwrap();
    assert!(matches!(store.expand_prefix("ce0"), Err(OdbError::NotFound(_))));
    assert!(matches!(store.expand_prefix("0123"), Err(OdbError::NotFound(_))));
    assert!(matches!(store.expand_prefix("nothex"), Err(OdbError::NotFound(_))));
}

#[test]
fn expand_ambiguous_prefix() {
    let (_dir, store) = store();
    let a = store.write_raw(ObjectType::Blob, b"first\n").unwrap();

    // Fabricate a second object file sharing the first 4 hex chars.
    let hex = a.to_hex();
    let mut other = hex.clone().into_bytes();
    // Flip the last character to something else.
    other[39] = if other[39] == b'0' { b'1' } else { b'0' };
    let other = String::from_utf8(other).unwrap();
    let fan = store.objects_dir().join(&other[..2]);
    std::fs::create_dir_all(&fan).unwrap();
    std::fs::write(fan.join(&other[2..]), b"junk").unwrap();

    assert!(matches!(
        store.expand_prefix(&hex[..4]),
        Err(OdbError::Ambiguous { count: 2, .. })
    ));
}

#[test]
fn object_file_is_readonly() {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = store();
        let oid = store.write_raw(ObjectType::Blob, b"ro\n").unwrap();
        let mode = std::fs::metadata(store.object_path(&oid))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o444);
    }
}
