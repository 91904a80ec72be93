//! List loading integration tests: comments, ordering, missing files, and the
//! project-line grammar as seen through a real file.

use assert_fs::prelude::*;
use ghbatch_core::{
    lists::{load_accounts, load_projects},
    Account, Flag, ListError, Marker,
};
use predicates::prelude::*;

#[test]
fn accounts_keep_order_and_duplicates() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("accounts.txt");
    file.write_str("# primary first\nalice\n\n  bob   # trailing note\nalice\n")
        .expect("write");

    let accounts = load_accounts(file.path()).expect("load");
    assert_eq!(
        accounts,
        vec![
            Account::from("alice"),
            Account::from("bob"),
            Account::from("alice")
        ]
    );
}

#[test]
fn missing_accounts_file_is_fatal_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("accounts.txt");
    file.assert(predicate::path::missing());

    let err = load_accounts(file.path()).unwrap_err();
    assert!(matches!(err, ListError::MissingFile { .. }), "got: {err}");
    assert!(err.to_string().contains("list file not found"));
}

#[test]
fn projects_file_mixes_valid_and_malformed_lines() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("projects.txt");
    file.write_str(concat!(
        "# name [flags...]\n",
        "repoA\n",
        "repoB --public --description \"A tidy repo\"\n",
        "repoX --description \"line1\\nline2\"\n",
        "not valid/name --public\n",
        "repoC --internal --homepage https://c.example\n",
    ))
    .expect("write");

    let list = load_projects(file.path()).expect("load");
    let names: Vec<_> = list.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["repoA", "repoB", "repoX", "repoC"]);
    assert_eq!(list.rejected.len(), 1);

    assert_eq!(list.projects[0].flags, vec![Flag::switch("private")]);

    let b = &list.projects[1];
    assert_eq!(b.visibility(), Some("public"));
    assert_eq!(b.description.as_ref().unwrap().marker, Marker::Unmarked);

    let x = list.projects[2].description.as_ref().unwrap();
    assert_eq!(x.to_wire(), "⁉️ line1 line2");

    assert_eq!(
        list.projects[3].flags,
        vec![
            Flag::switch("internal"),
            Flag::with_value("homepage", "https://c.example")
        ]
    );
}
