//! Canonical tree ordering: a sub-tree sorts as if its name ended in '/'.

use bstr::BString;
use minigit_hash::ObjectId;
use minigit_object::{FileMode, Tree, TreeEntry};

fn entry(mode: FileMode, name: &str) -> TreeEntry {
    TreeEntry {
        mode,
        name: BString::from(name),
        oid: ObjectId::NULL,
    }
}

fn sorted_names(entries: Vec<TreeEntry>) -> Vec<String> {
    let tree = Tree { entries };
    let parsed = Tree::parse(&tree.serialize_body()).unwrap();
    parsed
        .entries
        .iter()
        .map(|e| e.name.to_string())
        .collect()
}

#[test]
fn mixed_files_and_dirs() {
    let names = sorted_names(vec![
        entry(FileMode::Tree, "foo"),
        entry(FileMode::Regular, "foo.c"),
        entry(FileMode::Regular, "foo-bar"),
        entry(FileMode::Regular, "foo0"),
    ]);
    // "foo" as a dir keys as "foo/": after "foo-bar" and "foo.c", before "foo0".
    assert_eq!(names, vec!["foo-bar", "foo.c", "foo", "foo0"]);
}

#[test]
fn plain_byte_order_for_files() {
    let names = sorted_names(vec![
        entry(FileMode::Regular, "b"),
        entry(FileMode::Regular, "a"),
        entry(FileMode::Regular, "Z"),
    ]);
    assert_eq!(names, vec!["Z", "a", "b"]);
}

#[test]
fn nested_dir_name_prefix() {
    let names = sorted_names(vec![
        entry(FileMode::Regular, "lib.rs"),
        entry(FileMode::Tree, "lib"),
    ]);
    // "lib/" > "lib." so the directory comes second.
    assert_eq!(names, vec!["lib.rs", "lib"]);
}

#[test]
fn serialization_is_deterministic() {
    let a = Tree {
        entries: vec![
            entry(FileMode::Regular, "x"),
            entry(FileMode::Tree, "y"),
        ],
    };
    let b = Tree {
        entries: vec![
            entry(FileMode::Tree, "y"),
            entry(FileMode::Regular, "x"),
        ],
    };
    assert_eq!(a.serialize_body(), b.serialize_body());
}
