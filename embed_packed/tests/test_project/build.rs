fn main() {
    embed_packed_build::Config::new(["README.md", "data/x.bin"])
        .base_dir("assets")
        .save_helpers(true)
        .build()
        .expect("Failed to embed assets");
}
