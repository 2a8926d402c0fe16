//! Attribute parsing for `#[env(...)]` annotations.
//!
//! This module extracts and validates the tags on a struct and its fields
//! during macro expansion.

use syn::{Attribute, Field, LitStr};

/// Parsed struct-level `#[env(...)]` attributes.
#[derive(Debug, Default)]
pub struct ContainerAttrs {
    /// Prepended to the variable name of every tagged field.
    pub prefix: String,
}

impl ContainerAttrs {
    /// Extract `#[env(prefix = "...")]` from the struct's attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut container = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("env")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("prefix") {
                    let prefix: LitStr = meta.value()?.parse()?;
                    container.prefix = prefix.value();
                    return Ok(());
                }

                Err(meta.error("unsupported struct-level env attribute"))
            })?;
        }

        Ok(container)
    }
}

/// Parsed field-level `#[env(...)]` attributes.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Environment variable the field binds from.
    ///
    /// `None` (no tag) and an empty name both leave the field alone.
    pub name: Option<String>,

    /// Custom parser function path (e.g., `"serde_json::from_str"`).
    ///
    /// When specified, bypasses the built-in conversion.
    pub deserializer: Option<syn::Path>,
}

impl FieldAttrs {
    /// Extract and parse `#[env(...)]` attributes from a struct field.
    ///
    /// Attributes other than `env` are left for other macros.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("env")) {
            attr.parse_nested_meta(|meta| {
                // name = "..."
                if meta.path.is_ident("name") {
                    let name: LitStr = meta.value()?.parse()?;
                    attrs.name = Some(name.value());
                    return Ok(());
                }

                // deserializer = "function::path"
                if meta.path.is_ident("deserializer") {
                    let func: LitStr = meta.value()?.parse()?;
                    attrs.deserializer = Some(func.parse()?);
                    return Ok(());
                }

                Err(meta.error("unsupported env attribute"))
            })?;
        }

        if attrs.name.is_none() && attrs.deserializer.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "deserializer requires a variable name: #[env(name = \"...\", deserializer = \"...\")]",
            ));
        }

        Ok(attrs)
    }

    /// The tag, if it names a variable.
    pub fn variable(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}
