use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Expr, ExprLit, ItemFn, Lit, MetaNameValue, Token};

/// Runs an `async fn` test on `core_async::runtime`.
///
/// Accepts `flavor = "current_thread" | "multi_thread"` and, for the
/// multi-thread flavor, `worker_threads = N`.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(attr, item, MacroKind::Test)
}

#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(attr, item, MacroKind::Main)
}

enum MacroKind {
    Test,
    Main,
}

enum Flavor {
    CurrentThread,
    MultiThread { worker_threads: usize },
}

const DEFAULT_WORKER_THREADS: usize = 2;

fn parse_flavor(attr: TokenStream) -> syn::Result<Flavor> {
    let args = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse(attr)?;

    let mut multi_thread = false;
    let mut worker_threads = None;

    for arg in &args {
        let name = arg
            .path
            .get_ident()
            .map(|ident| ident.to_string())
            .unwrap_or_default();

        match (name.as_str(), &arg.value) {
            (
                "flavor",
                Expr::Lit(ExprLit {
                    lit: Lit::Str(value),
                    ..
                }),
            ) => match value.value().as_str() {
                "current_thread" => multi_thread = false,
                "multi_thread" => multi_thread = true,
                other => {
                    return Err(syn::Error::new_spanned(
                        value,
                        format!("unknown flavor `{other}`, expected `current_thread` or `multi_thread`"),
                    ))
                }
            },
            (
                "worker_threads",
                Expr::Lit(ExprLit {
                    lit: Lit::Int(value),
                    ..
                }),
            ) => {
                let count = value.base10_parse::<usize>()?;
                if count == 0 {
                    return Err(syn::Error::new_spanned(value, "worker_threads must be > 0"));
                }
                worker_threads = Some(count);
            }
            _ => {
                return Err(syn::Error::new_spanned(
                    arg,
                    "expected `flavor = \"...\"` or `worker_threads = N`",
                ))
            }
        }
    }

    match (multi_thread, worker_threads) {
        (false, Some(_)) => Err(syn::Error::new_spanned(
            &args,
            "worker_threads requires flavor = \"multi_thread\"",
        )),
        (false, None) => Ok(Flavor::CurrentThread),
        (true, threads) => Ok(Flavor::MultiThread {
            worker_threads: threads.unwrap_or(DEFAULT_WORKER_THREADS),
        }),
    }
}

fn expand(attr: TokenStream, item: TokenStream, kind: MacroKind) -> TokenStream {
    let flavor = match parse_flavor(attr) {
        Ok(flavor) => flavor,
        Err(error) => return error.to_compile_error().into(),
    };

    let input = parse_macro_input!(item as ItemFn);

    if input.sig.asyncness.is_none() {
        return syn::Error::new_spanned(
            input.sig.fn_token,
            "core_async attribute macros require `async fn`",
        )
        .to_compile_error()
        .into();
    }

    let mut sync_sig = input.sig;
    sync_sig.asyncness = None;

    let attrs = input.attrs;
    let vis = input.vis;
    let block = input.block;

    let body = match flavor {
        Flavor::CurrentThread => quote! {
            core_async::runtime::block_on(async move #block)
        },
        Flavor::MultiThread { worker_threads } => quote! {
            core_async::runtime::block_on_multi_thread(#worker_threads, async move #block)
        },
    };

    let test_attr: TokenStream2 = match kind {
        MacroKind::Test => quote!(#[test]),
        MacroKind::Main => TokenStream2::new(),
    };

    quote! {
        #(#attrs)*
        #test_attr
        #vis #sync_sig {
            #body
        }
    }
    .into()
}
