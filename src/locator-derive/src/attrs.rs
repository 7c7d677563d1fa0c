use proc_macro::TokenStream;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::token::Comma;
use syn::{Error as SynError, Expr, ExprLit, Lit, LitStr, Meta, Result as SynResult, Type};

#[derive(Debug, Default)]
pub struct AttributeData {
    pub name: Option<LitStr>,
    pub singleton: bool,
    pub provides: Vec<Type>,
}

pub fn parse_attributes(attr: TokenStream) -> SynResult<AttributeData> {
    let mut data = AttributeData::default();
    if attr.is_empty() {
        return Ok(data);
    }

    let metas = Punctuated::<Meta, Comma>::parse_terminated.parse(attr)?;
    for meta in metas {
        match meta {
            Meta::Path(path) if path.is_ident("singleton") => {
                if data.singleton {
                    return Err(SynError::new(path.span(), "`singleton` is specified twice"));
                }
                data.singleton = true;
            }
            Meta::NameValue(nv) if nv.path.is_ident("name") => {
                if data.name.is_some() {
                    return Err(SynError::new(nv.span(), "`name` is specified twice"));
                }
                match unwrap_group(nv.value) {
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(name),
                        ..
                    }) => data.name = Some(name),
                    value => {
                        return Err(SynError::new(
                            value.span(),
                            "expects `name = \"...\"` to receive a string literal",
                        ));
                    }
                }
            }
            Meta::List(list) if list.path.is_ident("provides") => {
                let contracts = list.parse_args_with(Punctuated::<Type, Comma>::parse_terminated)?;
                data.provides.extend(contracts);
            }
            other => {
                return Err(SynError::new(
                    other.span(),
                    "expects `name = \"...\"`, `singleton` or `provides(...)`",
                ));
            }
        }
    }

    Ok(data)
}

// Literals forwarded by `macro_rules!` arrive in invisible groups.
fn unwrap_group(expr: Expr) -> Expr {
    match expr {
        Expr::Group(group) => unwrap_group(*group.expr),
        expr => expr,
    }
}
