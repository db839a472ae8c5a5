//! Builds the generated unit: runtime preamble, optional save helpers, the
//! table initialiser and the literal declarations, in that order.
//!
//! The unit is first assembled as a [`GeneratedUnit`] and then rendered, so the
//! table layout can be inspected without parsing text.
use embed_packed::Codec;
use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};

use crate::{EmbeddedAsset, Error, Result};

/// Name of the runtime crate as published.
pub const RUNTIME_CRATE: &str = "embed_packed";

/// Settings that shape the generated unit.
#[derive(Debug, Clone)]
pub struct UnitOptions {
    pub codec: Codec,
    /// Emit `save_data` and `save_all_data`.
    pub save_helpers: bool,
    /// Path generated code uses to reach the runtime crate.
    pub runtime: syn::Path,
}

impl Default for UnitOptions {
    fn default() -> Self {
        Self {
            codec: Codec::default(),
            save_helpers: false,
            runtime: default_runtime_path(),
        }
    }
}

fn default_runtime_path() -> syn::Path {
    Ident::new(RUNTIME_CRATE, Span::call_site()).into()
}

/// Works out how generated code should name the runtime crate.
///
/// An explicit path wins. Otherwise, when running under cargo, the consuming
/// crate's manifest is consulted so a renamed dependency still resolves.
///
/// # Errors
/// [`Error::InvalidRuntimePath`] if `explicit` is not a Rust path.
pub fn resolve_runtime_path(explicit: Option<&str>) -> Result<syn::Path> {
    if let Some(path) = explicit {
        return syn::parse_str(path).map_err(|_| Error::InvalidRuntimePath(path.to_owned()));
    }
    Ok(match crate_name(RUNTIME_CRATE) {
        Ok(FoundCrate::Name(name)) => Ident::new(&name, Span::call_site()).into(),
        Ok(FoundCrate::Itself) => Ident::new("crate", Span::call_site()).into(),
        Err(_) => default_runtime_path(), // Fallback
    })
}

/// One `path -> symbol` binding in the table initialiser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub path: String,
    pub symbol: String,
}

/// In-memory form of a generated unit.
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    options: UnitOptions,
    entries: Vec<TableEntry>,
    literals: Vec<String>,
}

impl GeneratedUnit {
    /// Lays out `assets` in the order given. An empty list is valid.
    #[must_use]
    pub fn new(assets: &[EmbeddedAsset], options: &UnitOptions) -> Self {
        Self {
            options: options.clone(),
            entries: assets
                .iter()
                .map(|asset| TableEntry {
                    path: asset.original_path().to_owned(),
                    symbol: asset.symbol(),
                })
                .collect(),
            literals: assets
                .iter()
                .map(|asset| asset.encoded_literal().to_owned())
                .collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// Number of literal declarations, one per entry.
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub const fn codec(&self) -> Codec {
        self.options.codec
    }

    fn preamble(&self) -> Vec<TokenStream> {
        let rt = &self.options.runtime;
        let codec = format_ident!("{}", self.options.codec.variant_name());
        let capacity = self.entries.len();

        vec![
            quote! {
                #[allow(dead_code)]
                pub type EmbeddedFileList = #rt::EmbeddedFileList;
            },
            quote! {
                #[allow(dead_code)]
                pub const CODEC: #rt::Codec = #rt::Codec::#codec;
            },
            quote! {
                static EMBEDDED_FILES: ::std::sync::LazyLock<EmbeddedFileList> =
                    ::std::sync::LazyLock::new(|| {
                        let mut files = EmbeddedFileList::with_capacity(#capacity);
                        init(&mut files);
                        files
                    });
            },
            quote! {
                #[allow(dead_code)]
                pub fn assets() -> #rt::Assets {
                    #rt::Assets::new(&EMBEDDED_FILES, CODEC)
                }
            },
            quote! {
                #[allow(dead_code)]
                pub fn exists<P: ::std::convert::AsRef<::std::path::Path>>(path: P) -> bool {
                    #rt::runtime::exists(path)
                }
            },
            quote! {
                #[allow(dead_code)]
                pub fn get_data(
                    assets: &#rt::Assets,
                    path: &str,
                ) -> ::std::result::Result<::std::vec::Vec<u8>, #rt::RuntimeError> {
                    assets.get_data(path)
                }
            },
        ]
    }

    fn save_helpers(&self) -> Vec<TokenStream> {
        if !self.options.save_helpers {
            return Vec::new();
        }
        let rt = &self.options.runtime;
        vec![
            quote! {
                #[allow(dead_code)]
                pub fn save_data(
                    assets: &#rt::Assets,
                    path: &str,
                ) -> ::std::result::Result<::std::path::PathBuf, #rt::RuntimeError> {
                    #rt::runtime::save_data(assets, path)
                }
            },
            quote! {
                #[allow(dead_code)]
                pub fn save_all_data(
                    assets: &#rt::Assets,
                ) -> ::std::result::Result<(), #rt::RuntimeError> {
                    #rt::runtime::save_all_data(assets)
                }
            },
        ]
    }

    fn init_block(&self) -> TokenStream {
        let paths = self.entries.iter().map(|entry| &entry.path);
        // Symbols are EMBED_ followed by ASCII alphanumerics, always valid.
        let symbols = self
            .entries
            .iter()
            .map(|entry| Ident::new(&entry.symbol, Span::call_site()));
        quote! {
            #[allow(unused_variables)]
            fn init(files: &mut EmbeddedFileList) {
                #( files.insert(#paths, #symbols); )*
            }
        }
    }

    /// Renders the unit as Rust source.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!(
            "// @generated by {} from {} file(s), codec {}. Do not edit.\n\n",
            env!("CARGO_PKG_NAME"),
            self.entries.len(),
            self.options.codec
        );
        let items = self
            .preamble()
            .into_iter()
            .chain(self.save_helpers())
            .chain(std::iter::once(self.init_block()));
        for item in items {
            out.push_str(&item.to_string());
            out.push_str("\n\n");
        }
        for literal in &self.literals {
            out.push_str(literal);
            out.push('\n');
        }
        out
    }
}

/// Builds and renders a unit for `assets`.
#[must_use]
pub fn build(assets: &[EmbeddedAsset], options: &UnitOptions) -> String {
    GeneratedUnit::new(assets, options).render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets() -> Vec<EmbeddedAsset> {
        vec![
            EmbeddedAsset::new("README.md", vec![1, 2, 3]).unwrap(),
            EmbeddedAsset::new("data/x.bin", vec![4]).unwrap(),
        ]
    }

    fn item_names(source: &str) -> Vec<String> {
        let file = syn::parse_file(source).expect("generated unit is valid Rust");
        file.items
            .iter()
            .map(|item| match item {
                syn::Item::Type(t) => t.ident.to_string(),
                syn::Item::Const(c) => c.ident.to_string(),
                syn::Item::Static(s) => s.ident.to_string(),
                syn::Item::Fn(f) => f.sig.ident.to_string(),
                other => panic!("unexpected item {other:?}"),
            })
            .collect()
    }

    fn init_fn(source: &str) -> syn::ItemFn {
        let file = syn::parse_file(source).unwrap();
        file.items
            .into_iter()
            .find_map(|item| match item {
                syn::Item::Fn(f) if f.sig.ident == "init" => Some(f),
                _ => None,
            })
            .expect("init function")
    }

    #[test]
    fn entries_follow_input_order() {
        let unit = GeneratedUnit::new(&assets(), &UnitOptions::default());
        assert_eq!(
            unit.entries(),
            &[
                TableEntry {
                    path: "README.md".into(),
                    symbol: "EMBED_READMEmd".into()
                },
                TableEntry {
                    path: "data/x.bin".into(),
                    symbol: "EMBED_dataxbin".into()
                },
            ]
        );
        assert_eq!(unit.literal_count(), 2);
    }

    #[test]
    fn items_in_order_without_save_helpers() {
        let source = build(&assets(), &UnitOptions::default());
        assert_eq!(
            item_names(&source),
            [
                "EmbeddedFileList",
                "CODEC",
                "EMBEDDED_FILES",
                "assets",
                "exists",
                "get_data",
                "init",
                "EMBED_READMEmd",
                "EMBED_dataxbin",
            ]
        );
        assert!(source.starts_with("// @generated"));
    }

    #[test]
    fn save_helpers_follow_preamble() {
        let options = UnitOptions {
            save_helpers: true,
            ..UnitOptions::default()
        };
        let names = item_names(&build(&assets(), &options));
        assert_eq!(&names[5..9], ["get_data", "save_data", "save_all_data", "init"]);
    }

    #[test]
    fn init_inserts_each_asset() {
        let init = init_fn(&build(&assets(), &UnitOptions::default()));
        assert_eq!(init.block.stmts.len(), 2);
        let rendered = quote!(#init).to_string().replace(' ', "");
        assert!(rendered.contains(r#"files.insert("README.md",EMBED_READMEmd);"#));
        assert!(rendered.contains(r#"files.insert("data/x.bin",EMBED_dataxbin);"#));
    }

    #[test]
    fn empty_asset_list_is_valid() {
        let source = build(&[], &UnitOptions::default());
        assert!(init_fn(&source).block.stmts.is_empty());
        assert_eq!(item_names(&source).len(), 7);
    }

    #[test]
    fn records_codec() {
        let options = UnitOptions {
            codec: Codec::Zstd,
            ..UnitOptions::default()
        };
        let source = build(&assets(), &options).replace(' ', "");
        assert!(source.contains("pubconstCODEC:embed_packed::Codec=embed_packed::Codec::Zstd;"));
    }

    #[test]
    fn explicit_runtime_path() {
        let options = UnitOptions {
            runtime: resolve_runtime_path(Some("my_app::vendored::embed_packed")).unwrap(),
            ..UnitOptions::default()
        };
        let source = build(&assets(), &options);
        syn::parse_file(&source).unwrap();
        assert!(source.replace(' ', "").contains("my_app::vendored::embed_packed::Assets"));
    }

    #[test]
    fn invalid_runtime_path() {
        assert!(matches!(
            resolve_runtime_path(Some("not a path!")),
            Err(Error::InvalidRuntimePath(_))
        ));
    }

    #[test]
    fn string_keys_are_escaped() {
        let asset = EmbeddedAsset::new("dir/quote\"d.txt", vec![9]).unwrap();
        let source = build(&[asset], &UnitOptions::default());
        syn::parse_file(&source).unwrap();
        assert!(source.contains(r#""dir/quote\"d.txt""#));
    }
}
