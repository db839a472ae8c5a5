use std::{env, fs, process};

use embed_packed::RuntimeError;

mod embedded {
    include!(concat!(env!("OUT_DIR"), "/embedded.rs"));
}

fn main() {
    let assets = embedded::assets();
    assert_eq!(assets.len(), 2);
    assert_eq!(assets.codec(), embedded::CODEC);

    // No base path: both entries come from the embedded table.
    let readme = embedded::get_data(&assets, "README.md").expect("README.md is embedded");
    let binary = embedded::get_data(&assets, "data/x.bin").expect("data/x.bin is embedded");
    assert_eq!(readme, b"hello");
    assert_eq!(binary, b"\x00\x01");
    println!("{}", String::from_utf8(readme).expect("data is not valid UTF-8"));

    match embedded::get_data(&assets, "missing/path") {
        Err(RuntimeError::NotFound { path }) => assert_eq!(path, "missing/path"),
        other => panic!("expected NotFound, got {other:?}"),
    }

    let scratch = env::temp_dir().join(format!("embed_packed_test_project_{}", process::id()));

    // A real file under the base path wins over the embedded copy.
    let overrides = scratch.join("overrides");
    fs::create_dir_all(&overrides).expect("create override dir");
    fs::write(overrides.join("README.md"), "from disk").expect("write override");
    let live = assets.clone().with_base_path(&overrides);
    assert_eq!(embedded::get_data(&live, "README.md").unwrap(), b"from disk");
    assert_eq!(embedded::get_data(&live, "data/x.bin").unwrap(), b"\x00\x01");

    // Saving writes the decompressed originals below the base path.
    let saved = scratch.join("saved");
    let target = assets.clone().with_base_path(&saved);
    embedded::save_all_data(&target).expect("save all embedded files");
    assert_eq!(fs::read(saved.join("README.md")).unwrap(), b"hello");
    assert_eq!(fs::read(saved.join("data/x.bin")).unwrap(), b"\x00\x01");
    assert!(embedded::exists(saved.join("data")));

    let _ = fs::remove_dir_all(&scratch);
    println!("Embedded data matches original.");
}
