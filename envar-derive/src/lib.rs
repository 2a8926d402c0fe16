//! Derive macro implementation for envar

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;

use attrs::{ContainerAttrs, FieldAttrs};

/// `Bind` derive macro
///
/// Implements `envar::Bind` for a struct with named fields.
///
/// # Supported Attributes
///
/// **Struct-level**:
/// - `#[env(prefix = "PREFIX_")]`: Add prefix to all env var names
///
/// **Field-level**:
/// - `#[env(name = "VAR")]`: Bind the field from `VAR`; untagged fields are ignored
/// - `#[env(deserializer = "func")]`: Parse with `func(&str) -> Result<T, E>`
///
/// # Example
///
/// See the `envar` crate documentation for usage examples.
#[proc_macro_derive(Bind, attributes(env))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let container = ContainerAttrs::from_attrs(&input.attrs)?;

    // Only a struct with named fields can be bound; anything else would have
    // no field for a tag to name.
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "Bind only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Bind only supports structs",
            ));
        }
    };

    let mut bindings = Vec::new();
    for field in fields {
        let attrs = FieldAttrs::from_field(field)?;
        let Some(variable) = attrs.variable() else {
            continue;
        };

        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let field_type = &field.ty;
        let field_str = field_name.to_string();
        let env_var_name = format!("{}{}", container.prefix, variable);

        let binding = match &attrs.deserializer {
            Some(func) => quote! {
                if let Some(__value) = ::envar::field::lookup(__env, #field_str, #env_var_name) {
                    match #func(&__value) {
                        Ok(__parsed) => self.#field_name = __parsed,
                        Err(__err) => ::envar::field::parse_failed::<#field_type>(
                            #field_str,
                            #env_var_name,
                            &__value,
                            __err,
                        ),
                    }
                }
            },
            None => quote! {
                ::envar::field::bind(__env, #field_str, #env_var_name, &mut self.#field_name);
            },
        };
        bindings.push(binding);
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::envar::Bind for #struct_name #ty_generics #where_clause {
            fn bind_fields(&mut self, __env: &dyn ::envar::Environment) {
                #(#bindings)*
            }
        }
    })
}
