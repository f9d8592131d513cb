use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr};

pub fn derive_dto(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let type_name = match extract_type_name(&input) {
        Ok(type_name) => type_name,
        Err(err) => return err.to_compile_error().into(),
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::network_bus::Dto for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
        }
    };

    TokenStream::from(expanded)
}

fn extract_type_name(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("dto") {
            continue;
        }

        let mut type_name = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("dto name must not be empty"));
                }
                type_name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported dto attribute, expected `name`"))
            }
        })?;

        if let Some(n) = type_name {
            return Ok(n);
        }
    }

    // Default: the type identifier as written
    Ok(input.ident.to_string())
}
