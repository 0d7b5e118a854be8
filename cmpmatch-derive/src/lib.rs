use proc_macro::TokenStream;

mod reflect;

/// Derives `cmpmatch::cmp::Reflect`.
///
/// Structs are compared field by field. `pub` fields are exported, every
/// other field is unexported and needs an option before it can be compared.
/// Enums, and structs marked `#[reflect(opaque)]`, are opaque and compared
/// through their `PartialEq` implementation.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn reflect_derive(input: TokenStream) -> TokenStream {
  reflect::derive(input)
}
