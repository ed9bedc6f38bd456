//! Property-based tests for the archive codec
//!
//! Whatever entry list is packed, directories and files mixed, reads back
//! unchanged and in order; unpacking reproduces every file and directory,
//! and host folders are reported in entry order.

use courier_bundle::{ArchiveBuilder, ArchiveEntry, ArchiveReader, EntryKind};
use proptest::prelude::*;

// Strategy: relative paths of one to three lowercase segments
fn arb_relative_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}", 1..=3).prop_map(|segments| segments.join("/"))
}

// Strategy: unique file and directory entries in random order. Files end in
// `.dat` and directories in `.d/`, so no path is both a file and a directory.
fn arb_entries() -> impl Strategy<Value = Vec<ArchiveEntry>> {
    let files = prop::collection::btree_map(
        arb_relative_path().prop_map(|p| format!("{p}.dat")),
        prop::collection::vec(any::<u8>(), 0..1024),
        0..12,
    );
    let directories =
        prop::collection::btree_set(arb_relative_path().prop_map(|p| format!("{p}.d/")), 0..6);

    (files, directories).prop_flat_map(|(files, directories)| {
        let entries: Vec<ArchiveEntry> = directories
            .into_iter()
            .map(|path| ArchiveEntry {
                path,
                kind: EntryKind::Directory,
            })
            .chain(files.into_iter().map(|(path, contents)| ArchiveEntry {
                path,
                kind: EntryKind::File(contents),
            }))
            .collect();
        Just(entries).prop_shuffle()
    })
}

fn pack(entries: &[ArchiveEntry]) -> Vec<u8> {
    entries
        .iter()
        .fold(ArchiveBuilder::new(), |builder, entry| match &entry.kind {
            EntryKind::Directory => builder.add_directory(&entry.path),
            EntryKind::File(contents) => builder.add_bytes(&entry.path, contents.clone()),
        })
        .pack()
        .unwrap()
        .bytes
}

proptest! {
    /// Property: entries(pack(entries)) == entries, order included
    #[test]
    fn proptest_pack_then_read_preserves_entries(entries in arb_entries()) {
        let read_back = ArchiveReader::from_bytes(pack(&entries))
            .unwrap()
            .entries()
            .unwrap();

        prop_assert_eq!(read_back, entries);
    }

    /// Property: unpack(pack(entries)) reproduces every file and directory marker
    #[test]
    fn proptest_pack_unpack_reproduces_entries(entries in arb_entries()) {
        let dest = tempfile::tempdir().unwrap();

        let report = ArchiveReader::from_bytes(pack(&entries))
            .unwrap()
            .unpack(dest.path())
            .unwrap();

        let mut files = 0;
        for entry in &entries {
            let target = dest.path().join(entry.path.trim_end_matches('/'));
            match &entry.kind {
                EntryKind::Directory => {
                    prop_assert!(target.is_dir(), "{} missing", entry.path);
                }
                EntryKind::File(contents) => {
                    files += 1;
                    prop_assert_eq!(&std::fs::read(&target).unwrap(), contents);
                }
            }
        }
        prop_assert_eq!(report.written.len(), files);
    }

    /// Property: every second-level directory entry is reported as a host, in order
    #[test]
    fn proptest_hosts_follow_entry_order(hosts in prop::collection::vec("[A-Z][a-z]{0,6}", 1..6)) {
        let builder = hosts.iter().enumerate().fold(ArchiveBuilder::new(), |builder, (i, host)| {
            builder.add_directory(&format!("In{i}/{host}"))
        });
        let dest = tempfile::tempdir().unwrap();

        let report = ArchiveReader::from_bytes(builder.pack().unwrap().bytes)
            .unwrap()
            .unpack(dest.path())
            .unwrap();

        let expected: Vec<String> = hosts
            .iter()
            .enumerate()
            .map(|(i, host)| format!("In{i}/{host}"))
            .collect();
        prop_assert_eq!(report.hosts, expected);
    }
}
