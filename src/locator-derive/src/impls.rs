use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, quote_spanned};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::token::Comma;
use syn::visit_mut::{self, VisitMut};
use syn::{
    AngleBracketedGenericArguments, Attribute, Error as SynError, Expr, FnArg, GenericArgument,
    Ident, ImplItem, ImplItemFn, ItemImpl, Meta, PathArguments, Result as SynResult, ReturnType,
    Signature, Type, TypePath,
};

use crate::attrs::AttributeData;

const RETURN_TYPE_MESSAGE: &str = "a constructor's return type should be `Self` or `Result<Self, E>`";

#[derive(Debug)]
struct ConstructorData {
    self_type: TypePath,
    identifier: Ident,
    arguments: Vec<ArgumentData>,
    return_type: ReturnTypeData,
}

#[derive(Debug)]
struct ArgumentData {
    span: Span,
    ty: Type,
    qualifiers: Vec<Expr>,
}

#[derive(Debug)]
enum ReturnTypeData {
    Infallible,
    Result { error_type: TypePath },
}

struct AttributeRemovalVisitor;

impl AttributeRemovalVisitor {
    fn is_custom_attribute(attr: &Attribute) -> bool {
        match &attr.meta {
            Meta::Path(path) => path.is_ident("inject"),
            Meta::List(list) => list.path.is_ident("qualified"),
            Meta::NameValue(_) => false,
        }
    }
}

impl VisitMut for AttributeRemovalVisitor {
    fn visit_attributes_mut(&mut self, attrs: &mut Vec<Attribute>) {
        attrs.retain(|attr| !Self::is_custom_attribute(attr));
        attrs
            .iter_mut()
            .for_each(|attr| visit_mut::visit_attribute_mut(self, attr));
    }
}

pub fn expand_implementation(
    impls: TokenStream,
    attr_data: AttributeData,
) -> SynResult<TokenStream2> {
    let mut impls = match syn::parse::<ItemImpl>(impls) {
        Ok(impls) => impls,
        Err(err) => {
            return Err(SynError::new(
                err.span(),
                "`#[component]` should be annotated on the `impl` block",
            ))
        }
    };

    if let Some((_, path, _)) = &impls.trait_ {
        return Err(SynError::new(
            path.span(),
            "`#[component]` should be annotated on an inherent `impl` block",
        ));
    }
    if !impls.generics.params.is_empty() {
        return Err(SynError::new(
            impls.generics.span(),
            "generic components are not supported",
        ));
    }

    let self_type = get_self_type(&impls)?;
    let signature = get_constructor_signature(&impls.items, impls.span())?;
    let ctor_data = parse_constructor(self_type, signature)?;

    let expanded = expand_component_implementation(&ctor_data, &attr_data);

    let mut visitor = AttributeRemovalVisitor;
    visitor.visit_item_impl_mut(&mut impls);

    Ok(quote! {
        #impls
        #expanded
    })
}

fn get_self_type(impls: &ItemImpl) -> SynResult<TypePath> {
    if let Type::Path(ty) = impls.self_ty.as_ref() {
        Ok(ty.clone())
    } else {
        Err(SynError::new(impls.self_ty.span(), "invalid self type"))
    }
}

fn get_constructor_signature(items: &[ImplItem], impl_span: Span) -> SynResult<Signature> {
    let ctors: Vec<_> = items
        .iter()
        .filter_map(filter_and_map_item_fn)
        .filter(|item_fn| is_annotated_with_inject(item_fn))
        .collect();

    let signature = match ctors.as_slice() {
        [ctor] => ctor.sig.clone(),
        [] => {
            return Err(SynError::new(
                impl_span,
                "no associated function is annotated with `#[inject]`",
            ))
        }
        _ => {
            return Err(SynError::new(
                impl_span,
                "only one associated function can be annotated with `#[inject]`",
            ))
        }
    };

    if let Some(FnArg::Receiver(rec)) = signature.inputs.first() {
        return Err(SynError::new(
            rec.span(),
            "method is not allowed to be annotated with `#[inject]`",
        ));
    }
    if let Some(asyncness) = signature.asyncness {
        return Err(SynError::new(
            asyncness.span(),
            "an `#[inject]` constructor can't be async",
        ));
    }

    Ok(signature)
}

fn filter_and_map_item_fn(item: &ImplItem) -> Option<&ImplItemFn> {
    if let ImplItem::Fn(impl_fn) = item {
        Some(impl_fn)
    } else {
        None
    }
}

fn is_annotated_with_inject(item_fn: &ImplItemFn) -> bool {
    item_fn
        .attrs
        .iter()
        .any(|attr| matches!(&attr.meta, Meta::Path(path) if path.is_ident("inject")))
}

fn parse_constructor(self_type: TypePath, signature: Signature) -> SynResult<ConstructorData> {
    let identifier = signature.ident;
    let arguments = parse_constructor_arguments(signature.inputs)?;
    let return_type = parse_constructor_return_type(signature.output, &self_type)?;

    Ok(ConstructorData {
        self_type,
        identifier,
        arguments,
        return_type,
    })
}

fn parse_constructor_arguments(inputs: Punctuated<FnArg, Comma>) -> SynResult<Vec<ArgumentData>> {
    inputs
        .into_iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(arg) => Some(arg),
            FnArg::Receiver(_) => None,
        })
        .map(|arg| {
            let span = arg.span();
            let qualifiers = parse_argument_attributes(&arg.attrs)?;
            Ok(ArgumentData {
                span,
                ty: *arg.ty,
                qualifiers,
            })
        })
        .collect()
}

fn parse_argument_attributes(attrs: &[Attribute]) -> SynResult<Vec<Expr>> {
    let mut res: Option<Vec<Expr>> = None;

    for attr in attrs {
        if !attr.path().is_ident("qualified") {
            continue;
        }

        let Meta::List(list) = &attr.meta else {
            return Err(SynError::new(
                attr.span(),
                "expects `#[qualified(...)]` to receive one or more qualifier values",
            ));
        };
        if res.is_some() {
            return Err(SynError::new(
                list.span(),
                "only one `#[qualified(...)]` is allowed on an argument",
            ));
        }

        let qualifiers = list.parse_args_with(Punctuated::<Expr, Comma>::parse_terminated)?;
        res = Some(qualifiers.into_iter().collect());
    }

    Ok(res.unwrap_or_default())
}

fn parse_constructor_return_type(
    output: ReturnType,
    self_type: &TypePath,
) -> SynResult<ReturnTypeData> {
    let ReturnType::Type(_, return_type) = output else {
        return Err(SynError::new(output.span(), RETURN_TYPE_MESSAGE));
    };
    let Type::Path(return_type) = *return_type else {
        return Err(SynError::new(return_type.span(), RETURN_TYPE_MESSAGE));
    };

    if is_self_type(&return_type, self_type) {
        return Ok(ReturnTypeData::Infallible);
    }

    let segments = &return_type.path.segments;
    let idents = segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>();
    let is_result = matches!(
        idents.iter().map(String::as_str).collect::<Vec<_>>().as_slice(),
        ["Result"] | ["std", "result", "Result"] | ["core", "result", "Result"]
    );

    match segments.last() {
        Some(last) if is_result => parse_result_return_type(&last.arguments, self_type),
        _ => Err(SynError::new(return_type.span(), RETURN_TYPE_MESSAGE)),
    }
}

fn parse_result_return_type(
    type_args: &PathArguments,
    self_type: &TypePath,
) -> SynResult<ReturnTypeData> {
    let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) = type_args
    else {
        return Err(SynError::new(type_args.span(), RETURN_TYPE_MESSAGE));
    };

    let mut args = args.iter();
    match (args.next(), args.next(), args.next()) {
        (
            Some(GenericArgument::Type(Type::Path(ok_type))),
            Some(GenericArgument::Type(Type::Path(error_type))),
            None,
        ) if is_self_type(ok_type, self_type) => Ok(ReturnTypeData::Result {
            error_type: error_type.clone(),
        }),
        _ => Err(SynError::new(type_args.span(), RETURN_TYPE_MESSAGE)),
    }
}

fn is_self_type(ty: &TypePath, self_type: &TypePath) -> bool {
    ty == self_type || ty.path.is_ident("Self")
}

fn expand_component_implementation(
    ctor_data: &ConstructorData,
    attr_data: &AttributeData,
) -> TokenStream2 {
    let self_type = &ctor_data.self_type;

    let component = expand_component(self_type, attr_data);
    let injectable = expand_injectable(ctor_data);
    let instantiate = if ctor_data.arguments.is_empty() {
        expand_instantiate(ctor_data)
    } else {
        TokenStream2::new()
    };
    let upcasts = attr_data
        .provides
        .iter()
        .map(|contract| {
            quote_spanned! { contract.span() =>
                impl ::locator::component::Upcast<#contract> for #self_type {
                    fn upcast(this: ::std::sync::Arc<Self>) -> ::std::sync::Arc<#contract> {
                        this
                    }
                }
            }
        })
        .collect::<TokenStream2>();

    quote! {
        #component
        #injectable
        #instantiate
        #upcasts
    }
}

fn expand_component(self_type: &TypePath, attr_data: &AttributeData) -> TokenStream2 {
    let name = match &attr_data.name {
        Some(name) => quote! { #name },
        None => quote! { ::std::concat!(::std::module_path!(), "::", ::std::stringify!(#self_type)) },
    };
    let scope = if attr_data.singleton {
        quote! { ::locator::scope::Scope::Singleton }
    } else {
        quote! { ::locator::scope::Scope::Transient }
    };

    quote! {
        impl ::locator::component::Component for #self_type {
            const NAME: &'static str = #name;
            const SCOPE: ::locator::scope::Scope = #scope;
        }
    }
}

fn expand_injectable(ctor_data: &ConstructorData) -> TokenStream2 {
    let self_type = &ctor_data.self_type;
    let constructor = &ctor_data.identifier;

    let get_dep_statements = ctor_data
        .arguments
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            let dep = Ident::new(&format!("dep{i}"), arg.span);
            let ty = &arg.ty;
            let qualifiers = &arg.qualifiers;
            quote_spanned! { arg.span =>
                let #dep = <#ty as ::locator::component::Dependency>::resolve(
                    provider,
                    <Self as ::locator::component::Component>::NAME,
                    &::locator::key::Qualifiers::none()#(.and(#qualifiers))*,
                )?;
            }
        })
        .collect::<TokenStream2>();

    let dep_args = ctor_data
        .arguments
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            let dep = Ident::new(&format!("dep{i}"), arg.span);
            quote! { #dep, }
        })
        .collect::<TokenStream2>();

    let construct = match &ctor_data.return_type {
        ReturnTypeData::Infallible => quote! {
            ::std::result::Result::Ok(<#self_type>::#constructor(#dep_args))
        },
        ReturnTypeData::Result { .. } => quote! {
            <#self_type>::#constructor(#dep_args).map_err(|err| {
                ::locator::ServiceError::instantiation(
                    <Self as ::locator::component::Component>::NAME,
                    err,
                )
            })
        },
    };

    quote! {
        impl ::locator::component::Injectable for #self_type {
            #[allow(unused_variables)]
            fn inject(
                provider: &dyn ::locator::provider::Provider,
            ) -> ::std::result::Result<Self, ::locator::ServiceError> {
                #get_dep_statements
                #construct
            }
        }
    }
}

fn expand_instantiate(ctor_data: &ConstructorData) -> TokenStream2 {
    let self_type = &ctor_data.self_type;
    let constructor = &ctor_data.identifier;

    let (error_type, body) = match &ctor_data.return_type {
        ReturnTypeData::Infallible => (
            quote! { ::std::convert::Infallible },
            quote! { ::std::result::Result::Ok(<#self_type>::#constructor()) },
        ),
        ReturnTypeData::Result { error_type } => (
            quote! { #error_type },
            quote! { <#self_type>::#constructor() },
        ),
    };

    quote! {
        impl ::locator::component::Instantiate for #self_type {
            type Error = #error_type;

            fn instantiate() -> ::std::result::Result<Self, Self::Error> {
                #body
            }
        }
    }
}
