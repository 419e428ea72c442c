use proc_macro::TokenStream;
use proc_macro2::{Literal, TokenStream as TokenStream2};
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, Meta, Path, parse_macro_input};

/* ─────────────── the derive macro ─────────────── */

/// Bind spreadsheet columns to struct fields.
///
/// Every field marked `#[column]` takes the next column, in declaration
/// order: the first marked field reads column A, the second column B, and
/// so on. Unmarked fields are left at their `Default` value and do not
/// shift the numbering.
///
/// The runtime crate is referenced as `::sheetbind`; re-exporting crates
/// can point elsewhere with `#[sheetbind(crate = "my_crate::sheetbind")]`.
#[proc_macro_derive(SheetRecord, attributes(column, sheetbind))]
pub fn derive_sheet_record(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    /* -------- 1 · container attributes -------- */
    let krate = runtime_path(&input)?;

    /* -------- 2 · shape checks -------- */
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "SheetRecord cannot be derived for generic structs",
        ));
    }
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "SheetRecord requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "SheetRecord can only be derived for structs",
            ));
        }
    };

    /* -------- 3 · collect #[column] fields in declaration order -------- */
    let mut idents = Vec::new();
    let mut names = Vec::new();
    let mut types = Vec::new();
    for field in fields {
        let mut marked = false;
        for attr in &field.attrs {
            if !attr.path().is_ident("column") {
                continue;
            }
            if !matches!(attr.meta, Meta::Path(_)) {
                return Err(syn::Error::new_spanned(
                    attr,
                    "`#[column]` takes no arguments; columns follow declaration order",
                ));
            }
            if marked {
                return Err(syn::Error::new_spanned(attr, "duplicate `#[column]`"));
            }
            marked = true;
        }
        if marked {
            // Named fields always carry an ident.
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };
            names.push(ident.unraw().to_string());
            idents.push(ident.clone());
            types.push(field.ty.clone());
        }
    }

    /* -------- 4 · sequence numbers (1-based) -------- */
    let sequences: Vec<Literal> = (1..=idents.len()).map(Literal::usize_unsuffixed).collect();

    /* -------- 5 · assemble expanded code -------- */
    let ident = &input.ident;
    let record_name = ident.unraw().to_string();

    Ok(quote! {
        impl #krate::SheetRecord for #ident {
            fn bindings() -> &'static #krate::RecordBindings {
                static BINDINGS: #krate::__private::Lazy<#krate::RecordBindings> =
                    #krate::__private::Lazy::new(|| {
                        #krate::RecordBindings::new(
                            #record_name,
                            [ #( (#names, <#types as #krate::CellField>::KIND) ),* ],
                        )
                    });
                &BINDINGS
            }

            #[allow(unused_variables)]
            fn assign(
                &mut self,
                sequence: usize,
                value: #krate::FieldValue,
            ) -> ::core::result::Result<(), #krate::AssignError> {
                match sequence {
                    #( #sequences => #krate::assign_field(&mut self.#idents, value), )*
                    _ => ::core::result::Result::Err(
                        #krate::AssignError::UnknownSequence(sequence),
                    ),
                }
            }
        }
    })
}

/// Resolve `#[sheetbind(crate = "...")]`, defaulting to `::sheetbind`.
fn runtime_path(input: &DeriveInput) -> syn::Result<Path> {
    let mut krate: Path = syn::parse_quote!(::sheetbind);
    for attr in &input.attrs {
        if !attr.path().is_ident("sheetbind") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let lit: LitStr = meta.value()?.parse()?;
                krate = lit.parse()?;
                Ok(())
            } else {
                Err(meta.error("unsupported sheetbind attribute; expected `crate = \"...\"`"))
            }
        })?;
    }
    Ok(krate)
}
