// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Procedural macros for the unittest toolkit.
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    Error, Expr, ExprLit, FnArg, ItemFn, Lit, Meta, ReturnType, Token, Type, parse_macro_input,
    punctuated::Punctuated,
};

/// Marks a function as a test unit.
///
/// # Example
///
/// ```rust,ignore
/// use unittest::{TestContext, def_test, test_assert_eq};
///
/// #[def_test]
/// fn test_addition() {
///     test_assert_eq!(2 + 2, 4, "addition");
/// }
///
/// #[def_test(skip_if_env = "SKIP_SLOW_TESTS")]
/// fn test_slow(ctx: &mut TestContext) {
///     ctx.repeat(1000, |_| {});
/// }
/// ```
///
/// Every marked function ends up with the signature
/// `fn(&mut unittest::TestContext) -> unittest::TestResult`, so it can be
/// handed to `TestRunner::run` or `run_test!`. A function without a return
/// type gets `TestResult::Ok` appended. A declared return type must be
/// `TestResult`. The assertion macros return `TestResult::Failed` early.
///
/// # Attributes
/// - `#[def_test]` - Normal test
/// - `#[def_test(ignore)]` - Test is always skipped
/// - `#[def_test(skip_if_env = "NAME")]` - Test is skipped while `NAME` is set
#[proc_macro_attribute]
pub fn def_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let options = parse_macro_input!(attr with Punctuated::<Meta, Token![,]>::parse_terminated);
    let input = parse_macro_input!(item as ItemFn);
    match generate_function_test(options, input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct TestOptions {
    ignore: bool,
    skip_if_env: Option<String>,
}

fn parse_options(options: Punctuated<Meta, Token![,]>) -> syn::Result<TestOptions> {
    let mut parsed = TestOptions::default();
    for meta in options {
        match &meta {
            Meta::Path(path) if path.is_ident("ignore") => parsed.ignore = true,
            Meta::NameValue(nv) if nv.path.is_ident("skip_if_env") => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => parsed.skip_if_env = Some(s.value()),
                other => {
                    return Err(Error::new_spanned(
                        other,
                        "expect a string literal: `skip_if_env = \"NAME\"`",
                    ));
                }
            },
            other => {
                return Err(Error::new_spanned(
                    other,
                    "unknown option, expect `ignore` or `skip_if_env = \"NAME\"`",
                ));
            }
        }
    }
    Ok(parsed)
}

/// Whether the unit spells out its return type, which must be `TestResult`.
fn declares_test_result(output: &ReturnType) -> syn::Result<bool> {
    let ty = match output {
        ReturnType::Default => return Ok(false),
        ReturnType::Type(_, ty) => ty,
    };
    match &**ty {
        Type::Path(path)
            if path.qself.is_none()
                && path
                    .path
                    .segments
                    .last()
                    .is_some_and(|seg| seg.ident == "TestResult" && seg.arguments.is_empty()) =>
        {
            Ok(true)
        }
        other => Err(Error::new_spanned(
            other,
            "a test unit returns `()` or `TestResult`; convert a `bool` with `TestResult::from`",
        )),
    }
}

/// Generate the test unit for a single function
fn generate_function_test(
    options: Punctuated<Meta, Token![,]>,
    input: ItemFn,
) -> syn::Result<TokenStream2> {
    let options = parse_options(options)?;

    if input.sig.asyncness.is_some() {
        return Err(Error::new_spanned(
            input.sig.fn_token,
            "test units must not be async",
        ));
    }

    let fn_name = &input.sig.ident;
    let fn_name_str = fn_name.to_string();
    let fn_attrs = &input.attrs;
    let fn_vis = &input.vis;
    let block = &input.block;

    // Test units always receive the context, named or not.
    let ctx_arg = match input.sig.inputs.len() {
        0 => quote! { _ctx: &mut ::unittest::TestContext },
        1 => match input.sig.inputs.first() {
            Some(arg @ FnArg::Typed(_)) => quote! { #arg },
            _ => {
                return Err(Error::new_spanned(
                    &input.sig.inputs,
                    "a test unit cannot take `self`",
                ));
            }
        },
        _ => {
            return Err(Error::new(
                Span::call_site(),
                "a test unit takes at most one argument: `&mut TestContext`",
            ));
        }
    };

    if options.ignore {
        let notice = format!("{fn_name_str} (ignored)");
        return Ok(quote! {
            #(#fn_attrs)*
            #[allow(unused_variables)]
            #fn_vis fn #fn_name(#ctx_arg) -> ::unittest::TestResult {
                ::unittest::report::skip(#notice);
                ::unittest::TestResult::Skipped
            }
        });
    }

    let skip_guard = options.skip_if_env.map(|env| {
        let notice = format!("{fn_name_str} ({env} is set)");
        quote! {
            if ::unittest::config::env_flag(#env) {
                ::unittest::report::skip(#notice);
                return ::unittest::TestResult::Skipped;
            }
        }
    });

    let has_return_type = declares_test_result(&input.sig.output)?;
    let body = if has_return_type {
        let stmts = &block.stmts;
        quote! { #(#stmts)* }
    } else {
        quote! {
            #block;
            ::unittest::TestResult::Ok
        }
    };

    Ok(quote! {
        #(#fn_attrs)*
        #[allow(unreachable_code)]
        #fn_vis fn #fn_name(#ctx_arg) -> ::unittest::TestResult {
            #skip_guard
            #body
        }
    })
}
