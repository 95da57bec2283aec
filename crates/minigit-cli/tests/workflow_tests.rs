//! End-to-end scenarios driving the binary through complete workflows.

mod common;

use common::*;

#[test]
fn initial_commit_produces_expected_objects() {
    let dir = init_repo();
    write_file(dir.path(), "a.txt", "hello\n");

    minigit(dir.path(), &["add", "a.txt"]).assert_ok();
    minigit(dir.path(), &["commit", "-m", "init"]).assert_ok();

    // HEAD resolves to a commit whose tree has exactly one entry, a.txt,
    // pointing at the well-known blob of "hello\n".
    let head = rev_parse(dir.path(), "HEAD");
    assert_eq!(head.len(), 40);

    let blob = rev_parse(dir.path(), "HEAD:a.txt");
    assert_eq!(blob, "ce013625030ba8dba906f756967f9e9ca394464a");

    let tree_listing = minigit(dir.path(), &["ls-tree", "HEAD"]);
    tree_listing.assert_ok();
    assert_eq!(
        tree_listing.stdout,
        format!("100644 blob {blob}\ta.txt\n")
    );

    // The root commit has no parents.
    let parent = minigit(dir.path(), &["rev-parse", "HEAD^"]);
    assert_ne!(parent.exit_code, 0);
}

#[test]
fn short_sha_expansion_resolves_commits() {
    let dir = init_repo();
    write_file(dir.path(), "a.txt", "hello\n");
    let commit = commit_all(dir.path(), "init");

    assert_eq!(rev_parse(dir.path(), &commit[..6]), commit);

    // Planting a second object with the same 6-char prefix makes the
    // prefix ambiguous.
    let mut other = commit.clone().into_bytes();
    let last = other.len() - 1;
    other[last] = if other[last] == b'0' { b'1' } else { b'0' };
    let other = String::from_utf8(other).unwrap();
    let fan = dir.path().join(".minigit/objects").join(&other[..2]);
    std::fs::create_dir_all(&fan).unwrap();
    std::fs::write(fan.join(&other[2..]), b"junk").unwrap();

    let result = minigit(dir.path(), &["rev-parse", &commit[..6]]);
    assert_ne!(result.exit_code, 0);
    assert!(
        result.stderr.contains("ambiguous"),
        "stderr: {}",
        result.stderr
    );
}

#[test]
fn clean_three_way_merge() {
    let dir = init_repo();
    write_file(dir.path(), "a.txt", "hello\n");
    commit_all(dir.path(), "init");

    minigit(dir.path(), &["branch", "feat"]).assert_ok();

    // main: append a line.
    write_file(dir.path(), "a.txt", "hello\nM\n");
    let main_prev = commit_all(dir.path(), "main work");

    // feat: prepend a line.
    minigit(dir.path(), &["checkout", "feat"]).assert_ok();
    write_file(dir.path(), "a.txt", "F\nhello\n");
    let feat_tip = commit_all(dir.path(), "feat work");

    // Merge feat into main.
    minigit(dir.path(), &["checkout", "main"]).assert_ok();
    minigit(dir.path(), &["merge", "feat"]).assert_ok();

    assert_eq!(read_file(dir.path(), "a.txt"), "F\nhello\nM\n");

    let merge = rev_parse(dir.path(), "HEAD");
    assert_eq!(rev_parse(dir.path(), "HEAD^"), main_prev);
    assert_eq!(rev_parse(dir.path(), "HEAD^2"), feat_tip);
    assert_ne!(merge, main_prev);
}

#[test]
fn conflicting_merge_writes_markers_and_state() {
    let dir = init_repo();
    write_file(dir.path(), "a.txt", "hello\n");
    commit_all(dir.path(), "init");

    minigit(dir.path(), &["branch", "b"]).assert_ok();

    write_file(dir.path(), "a.txt", "X\n");
    commit_all(dir.path(), "ours");

    minigit(dir.path(), &["checkout", "b"]).assert_ok();
    write_file(dir.path(), "a.txt", "Y\n");
    commit_all(dir.path(), "theirs");

    minigit(dir.path(), &["checkout", "main"]).assert_ok();
    let result = minigit(dir.path(), &["merge", "b"]);
    assert_eq!(result.exit_code, 1, "stdout: {}", result.stdout);
    assert!(result.stdout.contains("CONFLICT (content): Merge conflict in a.txt"));

    assert_eq!(
        read_file(dir.path(), "a.txt"),
        "<<<<<<< HEAD\nX\n=======\nY\n>>>>>>> b\n"
    );
    assert!(dir.path().join(".minigit/MERGE_HEAD").exists());

    // Resolve and conclude the merge; state is cleared and the commit has
    // two parents.
    write_file(dir.path(), "a.txt", "X and Y\n");
    minigit(dir.path(), &["add", "a.txt"]).assert_ok();
    minigit(dir.path(), &["commit", "-m", "merge b"]).assert_ok();
    assert!(!dir.path().join(".minigit/MERGE_HEAD").exists());
    rev_parse(dir.path(), "HEAD^2");
}

#[test]
fn merge_abort_restores_pre_merge_state() {
    let dir = init_repo();
    write_file(dir.path(), "a.txt", "hello\n");
    commit_all(dir.path(), "init");

    minigit(dir.path(), &["branch", "b"]).assert_ok();
    write_file(dir.path(), "a.txt", "X\n");
    let main_tip = commit_all(dir.path(), "ours");

    minigit(dir.path(), &["checkout", "b"]).assert_ok();
    write_file(dir.path(), "a.txt", "Y\n");
    commit_all(dir.path(), "theirs");

    minigit(dir.path(), &["checkout", "main"]).assert_ok();
    let result = minigit(dir.path(), &["merge", "b"]);
    assert_eq!(result.exit_code, 1);

    minigit(dir.path(), &["merge", "--abort"]).assert_ok();
    assert_eq!(read_file(dir.path(), "a.txt"), "X\n");
    assert_eq!(rev_parse(dir.path(), "HEAD"), main_tip);
    assert!(!dir.path().join(".minigit/MERGE_HEAD").exists());
}

#[test]
fn checkout_refuses_to_overwrite_local_changes() {
    let dir = init_repo();
    write_file(dir.path(), "a.txt", "hello\n");
    commit_all(dir.path(), "init");

    minigit(dir.path(), &["branch", "feat"]).assert_ok();
    write_file(dir.path(), "a.txt", "main version\n");
    commit_all(dir.path(), "main work");

    minigit(dir.path(), &["checkout", "feat"]).assert_ok();
    write_file(dir.path(), "a.txt", "feat version\n");
    commit_all(dir.path(), "feat work");
    minigit(dir.path(), &["checkout", "main"]).assert_ok();

    // Uncommitted local edit, then try to switch.
    write_file(dir.path(), "a.txt", "local edit\n");
    let result = minigit(dir.path(), &["checkout", "feat"]);
    assert_ne!(result.exit_code, 0);
    assert!(
        result.stderr.contains("local changes"),
        "stderr: {}",
        result.stderr
    );
    // The worktree is untouched.
    assert_eq!(read_file(dir.path(), "a.txt"), "local edit\n");
}

#[test]
fn revision_expressions_resolve_consistently() {
    let dir = init_repo();
    write_file(dir.path(), "a.txt", "one\n");
    let c1 = commit_all(dir.path(), "c1");
    write_file(dir.path(), "a.txt", "two\n");
    let c2 = commit_all(dir.path(), "c2");

    assert_eq!(rev_parse(dir.path(), "HEAD"), c2);
    assert_eq!(rev_parse(dir.path(), "HEAD^"), c1);
    assert_eq!(rev_parse(dir.path(), "HEAD~1"), c1);
    assert_eq!(rev_parse(dir.path(), "main"), c2);

    // ^{tree} resolves to the commit's tree.
    let tree = rev_parse(dir.path(), "HEAD^{tree}");
    let kind = minigit(dir.path(), &["cat-file", "-t", &tree]);
    kind.assert_ok();
    assert_eq!(kind.stdout.trim(), "tree");

    // :path resolves to the blob at that path.
    let blob = rev_parse(dir.path(), "HEAD:a.txt");
    let content = minigit(dir.path(), &["cat-file", "-p", &blob]);
    content.assert_ok();
    assert_eq!(content.stdout, "two\n");
}

#[test]
fn fast_forward_merge_moves_branch() {
    let dir = init_repo();
    write_file(dir.path(), "a.txt", "one\n");
    commit_all(dir.path(), "one");

    minigit(dir.path(), &["checkout", "-b", "feat"]).assert_ok();
    write_file(dir.path(), "a.txt", "one\ntwo\n");
    let feat_tip = commit_all(dir.path(), "two");

    minigit(dir.path(), &["checkout", "main"]).assert_ok();
    let result = minigit(dir.path(), &["merge", "feat"]);
    result.assert_ok();
    assert!(result.stdout.contains("Fast-forward"));

    assert_eq!(rev_parse(dir.path(), "HEAD"), feat_tip);
    assert_eq!(read_file(dir.path(), "a.txt"), "one\ntwo\n");

    // Merging again reports up-to-date.
    let again = minigit(dir.path(), &["merge", "feat"]);
    again.assert_ok();
    assert!(again.stdout.contains("Already up to date."));
}

#[test]
fn detached_head_checkout_and_commit() {
    let dir = init_repo();
    write_file(dir.path(), "a.txt", "one\n");
    let c1 = commit_all(dir.path(), "one");
    write_file(dir.path(), "a.txt", "two\n");
    commit_all(dir.path(), "two");

    let result = minigit(dir.path(), &["checkout", &c1]);
    result.assert_ok();
    assert!(result.stdout.contains("HEAD is now at"));
    assert_eq!(read_file(dir.path(), "a.txt"), "one\n");

    // Commit on the detached HEAD updates HEAD directly.
    write_file(dir.path(), "a.txt", "detached\n");
    minigit(dir.path(), &["add", "a.txt"]).assert_ok();
    minigit(dir.path(), &["commit", "-m", "detached work"]).assert_ok();
    assert_eq!(rev_parse(dir.path(), "HEAD^"), c1);

    let head_file = std::fs::read_to_string(dir.path().join(".minigit/HEAD")).unwrap();
    assert!(!head_file.starts_with("ref:"));
}
