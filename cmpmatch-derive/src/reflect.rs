use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Fields, GenericParam, Index, Visibility};

pub fn derive(input: TokenStream) -> TokenStream {
  let mut input = parse_macro_input!(input as DeriveInput);

  if let Some(lifetime) = input.generics.lifetimes().next() {
    return syn::Error::new_spanned(lifetime, "Reflect cannot be derived for types with lifetime parameters")
      .to_compile_error()
      .into();
  }
  let opaque = match opaque_attr(&input.attrs) {
    Ok(marked) => marked || matches!(input.data, Data::Enum(_)),
    Err(error) => return error.to_compile_error().into(),
  };
  if let Data::Union(_) = input.data {
    return syn::Error::new_spanned(&input.ident, "Reflect cannot be derived for unions").to_compile_error().into();
  }

  for param in input.generics.params.iter_mut() {
    if let GenericParam::Type(param) = param {
      param.bounds.push(parse_quote!(::cmpmatch::cmp::Reflect));
      if opaque {
        param.bounds.push(parse_quote!(::std::cmp::PartialEq));
      }
    }
  }

  let body = match &input.data {
    Data::Struct(data) if !opaque => structural(&data.fields),
    _ => opaque_body(),
  };
  let name = &input.ident;
  let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

  let expanded = quote! {
    impl #impl_generics ::cmpmatch::cmp::Reflect for #name #ty_generics #where_clause {
      #body
    }
  };

  TokenStream::from(expanded)
}

/// Whether the type carries `#[reflect(opaque)]`.
fn opaque_attr(attrs: &[Attribute]) -> syn::Result<bool> {
  let mut opaque = false;
  for attr in attrs.iter().filter(|attr| attr.path().is_ident("reflect")) {
    attr.parse_nested_meta(|meta| {
      if meta.path.is_ident("opaque") {
        opaque = true;
        Ok(())
      } else {
        Err(meta.error("unsupported reflect attribute, expected `opaque`"))
      }
    })?;
  }
  Ok(opaque)
}

fn structural(fields: &Fields) -> TokenStream2 {
  let fields = fields.iter().enumerate().map(|(index, field)| {
    let constructor = match field.vis {
      Visibility::Public(_) => format_ident!("exported"),
      _ => format_ident!("unexported"),
    };
    match &field.ident {
      Some(ident) => {
        let label = ident.unraw().to_string();
        quote!(::cmpmatch::cmp::Field::#constructor(#label, &self.#ident))
      }
      None => {
        let label = index.to_string();
        let member = Index::from(index);
        quote!(::cmpmatch::cmp::Field::#constructor(#label, &self.#member))
      }
    }
  });

  quote! {
    fn kind(&self) -> ::cmpmatch::cmp::Kind<'_> {
      ::cmpmatch::cmp::Kind::Struct(::std::vec![#(#fields),*])
    }
  }
}

fn opaque_body() -> TokenStream2 {
  quote! {
    fn kind(&self) -> ::cmpmatch::cmp::Kind<'_> {
      ::cmpmatch::cmp::Kind::Opaque
    }

    fn equal_method(&self, other: &dyn ::cmpmatch::cmp::Reflect) -> ::std::option::Option<bool> {
      ::cmpmatch::cmp::AsAny::as_any(other).downcast_ref::<Self>().map(|other| self == other)
    }
  }
}
