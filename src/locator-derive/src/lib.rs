mod attrs;
mod impls;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::Result as SynResult;

/// Turns the annotated `impl` block into a component.
///
/// Exactly one associated function must be marked with `#[inject]`. It
/// returns `Self` or `Result<Self, E>`, and each argument is a dependency
/// such as `Arc<dyn Trait>` or `Option<Arc<dyn Trait>>`, optionally narrowed
/// with `#[qualified(q1, q2, ...)]`.
///
/// The attribute itself accepts:
///
/// - `name = "..."`, the stable name configuration entries refer to. It
///   defaults to `module_path!()` joined to the type name with `::`;
/// - `singleton`, to share one instance per cache;
/// - `provides(Contract, ...)`, the contracts the type can be upcast to.
#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    match component_impl(attr, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn component_impl(attr: TokenStream, item: TokenStream) -> SynResult<TokenStream2> {
    let attr_data = attrs::parse_attributes(attr)?;
    let expanded = impls::expand_implementation(item, attr_data)?;
    Ok(expanded)
}
