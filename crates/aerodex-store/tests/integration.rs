//! End-to-end test: classify a small dataset tree and persist the results.

use aerodex_core::{ClassifierConfig, EntryClassifier, EntryType};
use aerodex_dsm::{DsmCache, DsmSettings};
use aerodex_exif::TimezoneResolver;
use aerodex_store::RecordStore;

#[test]
fn test_classify_tree_and_persist() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("flight1")).unwrap();
    std::fs::write(root.path().join("flight1").join("notes.txt"), b"windy day").unwrap();
    std::fs::write(root.path().join("cloud.laz"), b"LASF").unwrap();
    std::fs::create_dir_all(root.path().join("other").join(".aerodex")).unwrap();

    let config = ClassifierConfig {
        dsm: DsmSettings {
            url_template:
                "http://127.0.0.1:1/dsm?west={west}&south={south}&east={east}&north={north}"
                    .to_string(),
            timeout_secs: 1,
            ..DsmSettings::with_cache_dir(root.path().join(".dsm"))
        },
        ..ClassifierConfig::default()
    };
    let dsm = DsmCache::new(config.dsm.clone()).unwrap();
    let timezones = TimezoneResolver::new();
    let classifier = EntryClassifier::new(root.path(), &config, &dsm, &timezones);

    let mut store = RecordStore::new();
    store
        .open(root.path().join("index.db"))
        .expect("open store");
    store.create_tables().expect("create tables");

    for path in [
        root.path().join("flight1"),
        root.path().join("flight1").join("notes.txt"),
        root.path().join("cloud.laz"),
        root.path().join("other"),
    ] {
        let entry = classifier.classify(&path).expect("classification");
        store.insert_entry(&entry).expect("persist entry");
    }

    assert_eq!(store.count_entries().unwrap(), 4);
    assert!(store.entry_exists("flight1/notes.txt").unwrap());

    let entries = store.list_entries().unwrap();
    let types: Vec<EntryType> = entries.iter().map(|e| e.entry_type).collect();
    assert!(types.contains(&EntryType::Directory));
    assert!(types.contains(&EntryType::Generic));
    assert!(types.contains(&EntryType::PointCloud));
    assert!(types.contains(&EntryType::NestedDataset));

    let notes = store.load_entry("flight1/notes.txt").unwrap().unwrap();
    assert_eq!(notes.depth, 1);
    assert!(notes.hash.is_some());
    assert_eq!(notes.size, 9);
}
